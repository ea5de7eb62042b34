use tracing::trace;

use crate::sys::geometry::Rect;

const SAFE_AREA_THRESHOLD: f64 = 0.1;

/// Grows `screen` by whatever part of the virtual workspace height neither
/// display accounts for. Hosts only report such a gap for displays with a
/// cutout or inset, which never have one of the common aspect ratios.
pub fn compensate_safe_area(screen: Rect, other: Rect, workspace_height: f64) -> Rect {
    let diff = workspace_height - screen.height - other.height;
    if diff <= SAFE_AREA_THRESHOLD || screen.is_standard_aspect_ratio() {
        return screen;
    }

    trace!(?screen, diff, "compensating for safe area");
    Rect { height: screen.height + diff, ..screen }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: Rect = Rect::new(0., 0., 1280., 752.);
    const EXTERNAL: Rect = Rect::new(1280., 0., 1920., 1080.);

    #[test]
    fn grows_non_standard_screens() {
        let grown = compensate_safe_area(DECK, EXTERNAL, 1880.);
        assert_eq!(grown, Rect::new(0., 0., 1280., 800.));
    }

    #[test]
    fn standard_ratios_are_left_alone() {
        assert_eq!(compensate_safe_area(EXTERNAL, DECK, 1880.), EXTERNAL);
    }

    #[test]
    fn small_differences_are_ignored() {
        assert_eq!(compensate_safe_area(DECK, EXTERNAL, 1832.05), DECK);
        assert_eq!(compensate_safe_area(DECK, EXTERNAL, 1080.), DECK);
    }
}
