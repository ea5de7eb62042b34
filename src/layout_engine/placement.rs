use serde::Serialize;
use tracing::{debug, warn};

use super::utils::compensate_safe_area;
use super::{Layout, LayoutSystem, LayoutSystemKind, Slot};
use crate::common::config::AppSettings;
use crate::sys::geometry::Rect;
use crate::sys::screen::{AreaKind, DisplayId, ScreenSelection};

/// Slots beyond this many secondaries are left alone.
pub const MAX_SECONDARIES: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest<'a> {
    /// 0 for the primary window, 1-based for secondaries.
    pub index: usize,
    /// Number of secondaries sharing the layout.
    pub group_size: usize,
    pub settings: &'a AppSettings,
    pub screens: &'a ScreenSelection,
    pub area: AreaKind,
    pub workspace_height: f64,
    pub keep_above: bool,
}

/// Everything a host needs to apply to put one window in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Layout after demotion.
    pub layout: Layout,
    pub display: DisplayId,
    pub frame: Rect,
    pub fullscreen: bool,
    pub unminimize: bool,
    pub keep_above: bool,
    /// Reassign the display after a short delay instead of right away.
    pub delay_reconfigure: bool,
}

/// Picks the configured layout for the screen count and group size, before
/// any demotion.
pub fn resolve_layout(settings: &AppSettings, screen_count: usize, group_size: usize) -> Layout {
    if screen_count < 2 {
        settings.single_screen_layout
    } else if group_size == 1 {
        settings.multi_screen_single_secondary_layout
    } else {
        settings.multi_secondary_layout()
    }
}

/// Computes where one window of a group goes. Returns `None` for secondaries
/// past [`MAX_SECONDARIES`].
pub fn compute_placement(req: &PlacementRequest) -> Option<Placement> {
    if req.index > MAX_SECONDARIES {
        warn!(
            index = req.index,
            group_size = req.group_size,
            "too many secondary windows; leaving window untouched"
        );
        return None;
    }

    let resolved = resolve_layout(req.settings, req.screens.count, req.group_size);
    // The display follows the configured layout; demotion only changes tiling.
    let target = if req.index == 0 || resolved.shares_primary_display() {
        req.screens.primary
    } else {
        req.screens.secondary
    };
    let layout = resolved.demoted(req.group_size);

    let other = req.screens.opposite(target.id);
    let screen = compensate_safe_area(
        target.area(req.area),
        other.area(req.area),
        req.workspace_height,
    );

    let slot = Slot {
        index: req.index,
        count: req.group_size,
    };
    let frame = LayoutSystemKind::from(layout).frame(
        screen,
        slot,
        req.settings.secondary_window_aspect_ratio,
    );

    debug!(
        index = req.index,
        group_size = req.group_size,
        %resolved,
        %layout,
        display = %target.id,
        ?frame,
        "computed placement"
    );

    Some(Placement {
        layout,
        display: target.id,
        frame,
        fullscreen: !slot.is_primary(),
        unminimize: !slot.is_primary(),
        keep_above: req.keep_above,
        delay_reconfigure: req.settings.delay_reconfigure,
    })
}
