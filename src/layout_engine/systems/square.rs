use super::{LayoutSystem, Slot};
use crate::layout_engine::Side;
use crate::sys::geometry::Rect;

/// Secondaries in a two-by-two grid beside the primary, vertically centered.
/// Only used with three or more secondaries; with exactly three the third one
/// takes the whole bottom row at double size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareLayout {
    pub side: Side,
}

impl SquareLayout {
    /// Size of one grid cell. Two cells side by side take at most half the
    /// screen width.
    pub fn cell_size(screen: Rect, aspect_ratio: f64) -> (f64, f64) {
        let max_width = screen.width / 4.;
        let height = screen.height / 2.;
        let width = (aspect_ratio * height).min(max_width);
        (width, width / aspect_ratio)
    }
}

impl LayoutSystem for SquareLayout {
    fn frame(&self, screen: Rect, slot: Slot, aspect_ratio: f64) -> Rect {
        let (cell_width, cell_height) = Self::cell_size(screen, aspect_ratio);
        let strip_width = cell_width * 2.;

        let mut frame = screen;
        if slot.is_primary() {
            if self.side == Side::Left {
                frame.x += strip_width;
            }
            frame.width -= strip_width;
            return frame;
        }

        if slot.index % 2 == 0 {
            frame.x += cell_width;
        }
        if slot.index > 2 {
            frame.y += cell_height;
        }
        if self.side == Side::Right {
            frame.x += screen.width - strip_width;
        }
        frame.width = cell_width;
        frame.height = cell_height;

        if slot.count == 3 {
            if slot.index == 3 {
                frame.width = cell_width * 2.;
                frame.height = cell_height * 2.;
            }
            frame.y += (screen.height - cell_height * 3.) / 2.;
        } else {
            frame.y += (screen.height - cell_height * 2.) / 2.;
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SCREEN: Rect = Rect::new(0., 0., 1920., 1080.);
    const RATIO: f64 = 3. / 2.;

    fn right(index: usize, count: usize) -> Rect {
        SquareLayout { side: Side::Right }.frame(SCREEN, Slot { index, count }, RATIO)
    }

    fn left(index: usize, count: usize) -> Rect {
        SquareLayout { side: Side::Left }.frame(SCREEN, Slot { index, count }, RATIO)
    }

    #[test]
    fn three_secondaries_center_the_block() {
        // Cells are capped at a quarter of the width: 480x320.
        let offset = (1080. - 3. * 320.) / 2.;
        assert_eq!(right(1, 3), Rect::new(960., offset, 480., 320.));
        assert_eq!(right(2, 3), Rect::new(1440., offset, 480., 320.));
        assert_eq!(right(3, 3), Rect::new(960., 320. + offset, 960., 640.));
        assert_eq!(right(0, 3), Rect::new(0., 0., 960., 1080.));
    }

    #[test]
    fn odd_slot_doubles_in_both_directions() {
        let regular = right(1, 3);
        let odd = right(3, 3);
        assert_eq!(odd.width, regular.width * 2.);
        assert_eq!(odd.height, regular.height * 2.);
    }

    #[test]
    fn four_secondaries_form_a_grid() {
        let offset = (1080. - 2. * 320.) / 2.;
        assert_eq!(right(3, 4), Rect::new(960., 320. + offset, 480., 320.));
        assert_eq!(right(4, 4), Rect::new(1440., 320. + offset, 480., 320.));
    }

    #[test]
    fn left_square_moves_primary_right() {
        assert_eq!(left(0, 4), Rect::new(960., 0., 960., 1080.));
        assert_eq!(left(1, 4), Rect::new(0., 220., 480., 320.));
        assert_eq!(left(2, 4), Rect::new(480., 220., 480., 320.));
    }
}
