use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use tracing::debug;

use crate::common::collections::HashSet;
use crate::model::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum WindowRole {
    Primary,
    Secondary,
    Other,
}

/// How to choose between several windows matching an application's primary
/// caption pattern.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The window with the longest caption is the primary.
    #[default]
    LongestCaption,
    /// The first window seen stays the primary.
    FirstMatch,
}

impl TieBreak {
    /// Whether `challenger` should displace `incumbent`.
    fn prefers(self, challenger: &ManagedWindow, incumbent: &ManagedWindow) -> bool {
        match self {
            TieBreak::LongestCaption => challenger.caption.len() > incumbent.caption.len(),
            TieBreak::FirstMatch => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedWindow {
    pub id: WindowId,
    pub caption: String,
    /// Matched the primary pattern but lost the tie-break.
    pub primary_candidate: bool,
}

impl ManagedWindow {
    pub fn new(id: WindowId, caption: impl Into<String>) -> Self {
        ManagedWindow {
            id,
            caption: caption.into(),
            primary_candidate: false,
        }
    }
}

/// The classified windows of one application.
#[derive(Debug, Clone, Default)]
pub struct AppWindowGroup {
    primary: Vec<ManagedWindow>,
    secondary: Vec<ManagedWindow>,
    other: Vec<ManagedWindow>,
    /// Last fullscreen state of the primary window that we acted on.
    pub primary_fullscreen: bool,
    pub old_primary_fullscreen: bool,
}

impl AppWindowGroup {
    pub fn new() -> Self { Self::default() }

    pub fn primary(&self) -> Option<&ManagedWindow> { self.primary.first() }

    pub fn primaries(&self) -> &[ManagedWindow] { &self.primary }

    pub fn secondaries(&self) -> &[ManagedWindow] { &self.secondary }

    pub fn others(&self) -> &[ManagedWindow] { &self.other }

    pub fn len(&self) -> usize { self.primary.len() + self.secondary.len() + self.other.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn contains(&self, id: WindowId) -> bool { self.role_of(id).is_some() }

    pub fn is_primary(&self, id: WindowId) -> bool {
        self.primary().is_some_and(|w| w.id == id)
    }

    pub fn role_of(&self, id: WindowId) -> Option<WindowRole> {
        [
            (WindowRole::Primary, &self.primary),
            (WindowRole::Secondary, &self.secondary),
            (WindowRole::Other, &self.other),
        ]
        .into_iter()
        .find(|(_, seq)| seq.iter().any(|w| w.id == id))
        .map(|(role, _)| role)
    }

    /// Adds a window under `role`. Returns true if the window became the
    /// group's primary.
    pub fn insert(&mut self, role: WindowRole, window: ManagedWindow, tie_break: TieBreak) -> bool {
        if self.contains(window.id) {
            debug!(id = %window.id, "window already in group");
            return false;
        }
        match role {
            WindowRole::Primary => self.insert_primary(window, tie_break),
            WindowRole::Secondary => {
                self.secondary.push(window);
                false
            }
            WindowRole::Other => {
                self.other.push(window);
                false
            }
        }
    }

    fn insert_primary(&mut self, mut window: ManagedWindow, tie_break: TieBreak) -> bool {
        let Some(incumbent) = self.primary.first() else {
            self.primary.push(window);
            return true;
        };
        if tie_break.prefers(&window, incumbent) {
            let mut demoted = self.primary.remove(0);
            debug!(
                primary = %window.caption,
                demoted = %demoted.caption,
                "too many primary windows; demoting previous primary"
            );
            demoted.primary_candidate = true;
            self.other.push(demoted);
            self.primary.push(window);
            true
        } else {
            debug!(
                primary = %incumbent.caption,
                ignored = %window.caption,
                "too many primary windows; treating new match as other"
            );
            window.primary_candidate = true;
            self.other.push(window);
            false
        }
    }

    /// Removes the window from whichever sequence holds it. If it was the
    /// primary, the best demoted candidate takes its place.
    pub fn remove(&mut self, id: WindowId, tie_break: TieBreak) -> Option<WindowRole> {
        let role = self.role_of(id)?;
        let seq = match role {
            WindowRole::Primary => &mut self.primary,
            WindowRole::Secondary => &mut self.secondary,
            WindowRole::Other => &mut self.other,
        };
        seq.retain(|w| w.id != id);

        if role == WindowRole::Primary && self.primary.is_empty() {
            self.promote_candidate(tie_break);
        }
        Some(role)
    }

    fn promote_candidate(&mut self, tie_break: TieBreak) {
        let mut best: Option<usize> = None;
        for (idx, window) in self.other.iter().enumerate() {
            if !window.primary_candidate {
                continue;
            }
            match best {
                Some(b) if !tie_break.prefers(window, &self.other[b]) => {}
                _ => best = Some(idx),
            }
        }
        if let Some(idx) = best {
            let mut promoted = self.other.remove(idx);
            promoted.primary_candidate = false;
            debug!(primary = %promoted.caption, "promoting primary candidate");
            self.primary.push(promoted);
        }
    }

    /// Panics if any window appears more than once across the sequences or the
    /// primary invariant is broken. Either indicates a bookkeeping bug.
    pub fn assert_valid(&self, app: &str) {
        assert!(
            self.primary.len() <= 1,
            "group {app} holds {} primary windows",
            self.primary.len()
        );
        let mut seen = HashSet::default();
        for (scope, seq) in [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("other", &self.other),
        ] {
            for window in seq.iter() {
                assert!(
                    seen.insert(window.id),
                    "scope {scope} of group {app} contains duplicate window {}",
                    window.id
                );
            }
        }
    }
}
