use enum_dispatch::enum_dispatch;

use super::{Layout, Side};
use crate::sys::geometry::Rect;

mod column;
mod separate;
mod square;

pub use column::ColumnLayout;
pub use separate::SeparateLayout;
pub use square::SquareLayout;

/// Position of a window within its share of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// 0 for the primary window, 1-based for secondaries.
    pub index: usize,
    /// Number of secondaries sharing the layout.
    pub count: usize,
}

impl Slot {
    pub fn primary(count: usize) -> Slot { Slot { index: 0, count } }

    pub fn is_primary(&self) -> bool { self.index == 0 }
}

#[enum_dispatch]
pub trait LayoutSystem {
    /// Computes the frame of `slot` inside `screen`. `aspect_ratio` is the
    /// width/height ratio secondaries are sized to.
    fn frame(&self, screen: Rect, slot: Slot, aspect_ratio: f64) -> Rect;
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[enum_dispatch(LayoutSystem)]
pub enum LayoutSystemKind {
    Separate(SeparateLayout),
    Column(ColumnLayout),
    Square(SquareLayout),
}

impl From<Layout> for LayoutSystemKind {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Separate => SeparateLayout.into(),
            Layout::ColumnLeft => ColumnLayout { side: Side::Left }.into(),
            Layout::ColumnRight => ColumnLayout { side: Side::Right }.into(),
            Layout::SquareLeft => SquareLayout { side: Side::Left }.into(),
            Layout::SquareRight => SquareLayout { side: Side::Right }.into(),
        }
    }
}
