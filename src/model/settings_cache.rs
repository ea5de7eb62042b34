use tracing::trace;

use crate::common::collections::HashMap;
use crate::model::window::{WindowId, WindowInfo};
use crate::sys::geometry::Rect;
use crate::sys::host::Host;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SavedSettings {
    pub frame: Rect,
    pub fullscreen: bool,
    pub keep_above: bool,
    pub keep_below: bool,
}

impl From<&WindowInfo> for SavedSettings {
    fn from(info: &WindowInfo) -> Self {
        SavedSettings {
            frame: info.frame,
            fullscreen: info.fullscreen,
            keep_above: info.keep_above,
            keep_below: info.keep_below,
        }
    }
}

/// Window state captured before we first touched a window, so it can be put
/// back exactly when the window leaves management.
#[derive(Default, Debug)]
pub struct SettingsCache(HashMap<WindowId, SavedSettings>);

impl SettingsCache {
    pub fn new() -> Self { Self::default() }

    /// Records `info` unless an entry already exists; the first capture wins.
    pub fn save(&mut self, id: WindowId, info: &WindowInfo) -> bool {
        if self.0.contains_key(&id) {
            return false;
        }
        trace!(%id, frame = ?info.frame, "caching window settings");
        self.0.insert(id, info.into());
        true
    }

    pub fn get(&self, id: WindowId) -> Option<SavedSettings> { self.0.get(&id).copied() }

    pub fn contains(&self, id: WindowId) -> bool { self.0.contains_key(&id) }

    pub fn remove(&mut self, id: WindowId) -> Option<SavedSettings> { self.0.remove(&id) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Writes the cached state back to the window. Returns false if nothing
    /// was cached for it.
    pub fn restore<H: Host>(&self, host: &mut H, id: WindowId) -> bool {
        let Some(saved) = self.get(id) else {
            return false;
        };
        trace!(%id, frame = ?saved.frame, "restoring window settings");
        host.set_frame(id, saved.frame);
        host.set_fullscreen(id, saved.fullscreen);
        host.set_keep_above(id, saved.keep_above);
        host.set_keep_below(id, saved.keep_below);
        true
    }
}
