//! The compositor surface the coordinator drives.
//!
//! Notifications (window added/removed, fullscreen and caption changes,
//! display changes) flow the other way as [`Event`]s; how they reach the
//! coordinator is up to the host.
//!
//! [`Event`]: crate::actor::coordinator::Event

use std::time::{Duration, Instant};

use crate::actor::coordinator::Deferred;
use crate::model::{WindowId, WindowInfo};
use crate::sys::geometry::Rect;
use crate::sys::screen::{Display, DisplayId};

pub trait Host {
    fn displays(&self) -> Vec<Display>;

    /// Height of the virtual desktop spanning every display.
    fn workspace_height(&self) -> f64;

    /// Open top-level windows, in stacking order.
    fn windows(&self) -> Vec<WindowId>;

    fn window(&self, id: WindowId) -> Option<WindowInfo>;

    fn set_frame(&mut self, id: WindowId, frame: Rect);

    fn set_fullscreen(&mut self, id: WindowId, fullscreen: bool);

    fn set_minimized(&mut self, id: WindowId, minimized: bool);

    fn set_keep_above(&mut self, id: WindowId, keep_above: bool);

    fn set_keep_below(&mut self, id: WindowId, keep_below: bool);

    fn maximize(&mut self, id: WindowId);

    fn send_to_display(&mut self, id: WindowId, display: DisplayId);

    /// Delivers `work` back to the coordinator as `Event::Deferred` once
    /// `after` has elapsed. There is no cancellation; stale work is
    /// recognized when it runs.
    fn schedule(&mut self, after: Duration, work: Deferred);

    fn now(&self) -> Instant;
}
