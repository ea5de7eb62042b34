use super::{LayoutSystem, Slot};
use crate::layout_engine::Side;
use crate::sys::geometry::Rect;

/// Secondaries stacked top to bottom in a strip on one side of the primary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub side: Side,
}

impl ColumnLayout {
    /// Size of one secondary. The strip is at most half the screen wide; when
    /// that cap applies the height shrinks to keep the aspect ratio.
    pub fn secondary_size(screen: Rect, count: usize, aspect_ratio: f64) -> (f64, f64) {
        let max_width = screen.width / 2.;
        let height = screen.height / count.max(1) as f64;
        let width = (aspect_ratio * height).min(max_width);
        (width, width / aspect_ratio)
    }
}

impl LayoutSystem for ColumnLayout {
    fn frame(&self, screen: Rect, slot: Slot, aspect_ratio: f64) -> Rect {
        let (secondary_width, secondary_height) =
            Self::secondary_size(screen, slot.count, aspect_ratio);

        let mut frame = screen;
        if slot.is_primary() {
            if self.side == Side::Left {
                frame.x += secondary_width;
            }
            frame.width -= secondary_width;
            return frame;
        }

        if self.side == Side::Right {
            frame.x += screen.width - secondary_width;
        }
        frame.y += (slot.index - 1) as f64 * secondary_height;
        frame.width = secondary_width;
        frame.height = secondary_height;
        frame
    }
}
