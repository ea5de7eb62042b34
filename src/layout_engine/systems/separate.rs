use super::{LayoutSystem, Slot};
use crate::sys::geometry::Rect;

/// The primary fills its display. Secondaries are tiled over the other
/// display: one fills it, two split it into halves, three and four use
/// quadrants, with the third of three spanning the bottom half.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeparateLayout;

impl LayoutSystem for SeparateLayout {
    fn frame(&self, screen: Rect, slot: Slot, _aspect_ratio: f64) -> Rect {
        if slot.is_primary() {
            return screen;
        }

        let width = if slot.count > 1 { screen.width / 2. } else { screen.width };
        let height = if slot.count > 2 { screen.height / 2. } else { screen.height };

        let mut frame = screen;
        if slot.index % 2 == 0 {
            frame.x += width;
        }
        if !(slot.index == 3 && slot.count == 3) {
            frame.width = width;
        }
        frame.height = height;
        if slot.index > 2 {
            frame.y += height;
        }
        frame
    }
}
