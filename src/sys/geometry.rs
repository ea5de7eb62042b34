use serde::{Deserialize, Serialize};

/// Aspect ratios that never carry a safe-area inset.
const COMMON_ASPECT_RATIOS: [f64; 4] = [16. / 9., 16. / 10., 4. / 3., 21. / 9.];
const ASPECT_RATIO_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect { x, y, width, height }
    }

    pub fn area(&self) -> f64 { self.width * self.height }

    pub fn aspect_ratio(&self) -> f64 { self.width / self.height }

    pub fn max_x(&self) -> f64 { self.x + self.width }

    pub fn max_y(&self) -> f64 { self.y + self.height }

    pub fn is_standard_aspect_ratio(&self) -> bool {
        let ratio = self.aspect_ratio();
        COMMON_ASPECT_RATIOS.iter().any(|r| (r - ratio).abs() < ASPECT_RATIO_TOLERANCE)
    }
}

pub trait Round {
    fn round(&self) -> Self;
}

impl Round for Rect {
    fn round(&self) -> Self {
        // Round edges rather than sizes so adjacent tiles keep sharing a border.
        let x = self.x.round();
        let y = self.y.round();
        Rect {
            x,
            y,
            width: self.max_x().round() - x,
            height: self.max_y().round() - y,
        }
    }
}

/// Approximate equality, for comparing frames reported back by a host.
pub trait SameAs {
    fn same_as(&self, other: Self) -> bool;
}

impl SameAs for Rect {
    fn same_as(&self, other: Self) -> bool {
        const EPS: f64 = 0.5;
        (self.x - other.x).abs() < EPS
            && (self.y - other.y).abs() < EPS
            && (self.width - other.width).abs() < EPS
            && (self.height - other.height).abs() < EPS
    }
}
