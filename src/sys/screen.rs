use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::geometry::Rect;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DisplayId(usize);

impl DisplayId {
    pub const fn new(index: usize) -> DisplayId { DisplayId(index) }

    pub fn index(&self) -> usize { self.0 }
}

impl std::fmt::Display for DisplayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
}

/// Which of a display's rectangles a window is laid out in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    /// The whole output, including areas reserved by panels.
    #[default]
    FullScreen,
    /// The maximal usable area with panels subtracted.
    WorkArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Display {
    pub id: DisplayId,
    pub work_area: Rect,
    pub full_area: Rect,
}

impl Display {
    pub fn area(&self, kind: AreaKind) -> Rect {
        match kind {
            AreaKind::FullScreen => self.full_area,
            AreaKind::WorkArea => self.work_area,
        }
    }
}

/// The displays that primary and secondary windows are sent to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSelection {
    pub primary: Display,
    pub secondary: Display,
    /// Number of physical displays the selection was made from.
    pub count: usize,
}

impl ScreenSelection {
    /// Picks the largest display as primary and the smallest as secondary,
    /// comparing work areas. Both fall back to the first display when there is
    /// only one.
    pub fn select(displays: &[Display], swap: bool) -> ScreenSelection {
        let Some(first) = displays.first() else {
            warn!("host reported no displays; using an empty placeholder");
            let placeholder = Display {
                id: DisplayId::default(),
                work_area: Rect::default(),
                full_area: Rect::default(),
            };
            return ScreenSelection {
                primary: placeholder,
                secondary: placeholder,
                count: 0,
            };
        };

        let mut primary = *first;
        let mut secondary = *first;
        for display in displays {
            if display.work_area.area() > primary.work_area.area() {
                primary = *display;
            }
            if display.work_area.area() < secondary.work_area.area() {
                secondary = *display;
            }
        }

        if swap {
            std::mem::swap(&mut primary, &mut secondary);
        }

        debug!(
            primary = %primary.id,
            primary_area = ?primary.work_area,
            secondary = %secondary.id,
            secondary_area = ?secondary.work_area,
            "selected displays"
        );

        ScreenSelection {
            primary,
            secondary,
            count: displays.len(),
        }
    }

    pub fn is_single_screen(&self) -> bool { self.count < 2 }

    /// The display the other role lives on.
    pub fn opposite(&self, display: DisplayId) -> Display {
        if display == self.primary.id {
            self.secondary
        } else {
            self.primary
        }
    }
}
