use std::time::{Duration, Instant};

use tracing::trace;

/// Detects a window removal and a fullscreen change landing close together.
///
/// Hosts report both during window teardown, in either order. When they are
/// within `window` of each other, the fullscreen change is assumed to be a
/// side effect of the removal rather than something the user asked for.
#[derive(Debug)]
pub struct RaceWindow {
    window: Duration,
    last_fullscreen: Option<Instant>,
    last_removal: Option<Instant>,
    removal_seq: u64,
}

impl RaceWindow {
    pub fn new(window: Duration) -> Self {
        RaceWindow {
            window,
            last_fullscreen: None,
            last_removal: None,
            removal_seq: 0,
        }
    }

    /// Records a fullscreen change; returns whether it races a removal.
    pub fn record_fullscreen(&mut self, now: Instant) -> bool {
        self.last_fullscreen = Some(now);
        self.too_close()
    }

    /// Records a removal; returns whether it races a fullscreen change.
    pub fn record_removal(&mut self, now: Instant) -> bool {
        self.last_removal = Some(now);
        self.removal_seq += 1;
        self.too_close()
    }

    /// Sequence number of the latest removal. Deferred work compares it to
    /// find out whether another removal happened in the meantime.
    pub fn removal_seq(&self) -> u64 { self.removal_seq }

    fn too_close(&self) -> bool {
        let (Some(fullscreen), Some(removal)) = (self.last_fullscreen, self.last_removal) else {
            return false;
        };
        let diff = if fullscreen > removal {
            fullscreen - removal
        } else {
            removal - fullscreen
        };
        trace!(?diff, "fullscreen/removal distance");
        diff < self.window
    }
}
