use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::sys::geometry::Rect;

/// Stable host handle for a top-level window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(id: u64) -> WindowId { WindowId(id) }

    pub fn get(&self) -> u64 { self.0 }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
}

/// A snapshot of the host's view of a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub caption: String,
    /// Window class (resource class) as reported by the host.
    pub class: String,
    /// Normal top-level window, as opposed to docks, menus, dialogs and the like.
    #[serde(default = "yes")]
    pub normal: bool,
    pub frame: Rect,
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default)]
    pub minimized: bool,
    #[serde(default)]
    pub keep_above: bool,
    #[serde(default)]
    pub keep_below: bool,
}

fn yes() -> bool { true }

bitflags! {
    /// Notifications the coordinator listens to for a classified window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowCapabilities: u8 {
        /// Fullscreen changes drive the group's layout.
        const WATCH_FULLSCREEN = 1 << 0;
        /// Caption changes may change the window's role.
        const WATCH_CAPTION = 1 << 1;
    }
}
