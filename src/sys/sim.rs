//! An in-memory compositor.
//!
//! `SimHost` keeps window and display state in plain maps and records the
//! notifications a real compositor would emit. By default time is virtual:
//! scheduled work sits in a timer queue until [`Coordinator::advance`] moves
//! the clock past it. Connected to a channel with [`SimHost::connect`] it
//! instead forwards notifications and timers to a running coordinator.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::geometry::Rect;
use super::host::Host;
use super::screen::{Display, DisplayId};
use crate::actor::coordinator::{Coordinator, Deferred, Event};
use crate::actor::{self, WeakSender};
use crate::common::collections::BTreeMap;
use crate::model::{WindowId, WindowInfo};

/// Upper bound on notification rounds per pump; the coordinator reacting to
/// its own changes must settle well before this.
const MAX_PUMP_ROUNDS: usize = 64;
const MAX_TIMER_FIRINGS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimWindow {
    pub id: WindowId,
    #[serde(flatten)]
    pub info: WindowInfo,
    pub display: Option<DisplayId>,
    pub maximized: bool,
    pub open: bool,
}

#[derive(Debug)]
struct Timer {
    due: Duration,
    seq: u64,
    work: Deferred,
}

/// Displays and windows to load into a [`SimHost`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    pub displays: Vec<SceneDisplay>,
    /// Defaults to the height spanned by the displays.
    #[serde(default)]
    pub workspace_height: Option<f64>,
    #[serde(default)]
    pub windows: Vec<WindowInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDisplay {
    pub work_area: Rect,
    /// Defaults to the work area.
    #[serde(default)]
    pub full_area: Option<Rect>,
}

#[derive(Debug)]
pub struct SimHost {
    displays: Vec<Display>,
    workspace_height: Option<f64>,
    windows: BTreeMap<WindowId, SimWindow>,
    next_window: u64,
    base: Instant,
    elapsed: Duration,
    timers: Vec<Timer>,
    timer_seq: u64,
    notifications: VecDeque<Event>,
    live: Option<WeakSender<Event>>,
}

impl Default for SimHost {
    fn default() -> Self { Self::new() }
}

impl SimHost {
    pub fn new() -> Self {
        SimHost {
            displays: Vec::new(),
            workspace_height: None,
            windows: BTreeMap::new(),
            next_window: 1,
            base: Instant::now(),
            elapsed: Duration::ZERO,
            timers: Vec::new(),
            timer_seq: 0,
            notifications: VecDeque::new(),
            live: None,
        }
    }

    /// Builds a host with the scene's displays and windows already present.
    /// Nothing is queued; start the coordinator to pick the windows up.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut host = SimHost::new();
        for display in &scene.displays {
            host.add_display(display.work_area, display.full_area.unwrap_or(display.work_area));
        }
        host.workspace_height = scene.workspace_height;
        for window in &scene.windows {
            host.add_window(window.clone());
        }
        host.notifications.clear();
        host
    }

    /// Sends notifications and scheduled work to `events` from now on,
    /// using wall-clock time.
    pub fn connect(&mut self, events: &actor::Sender<Event>) {
        self.live = Some(events.downgrade());
    }

    fn notify(&mut self, event: Event) {
        match &self.live {
            Some(weak) => match weak.upgrade() {
                Some(tx) => tx.send(event),
                None => trace!(?event, "coordinator gone; dropping notification"),
            },
            None => self.notifications.push_back(event),
        }
    }

    pub fn add_display(&mut self, work_area: Rect, full_area: Rect) -> DisplayId {
        let id = DisplayId::new(self.displays.len());
        self.displays.push(Display { id, work_area, full_area });
        self.notify(Event::DisplayCountChanged);
        id
    }

    pub fn set_display_geometry(&mut self, id: DisplayId, work_area: Rect, full_area: Rect) {
        let Some(display) = self.displays.get_mut(id.index()) else {
            warn!(%id, "no such display");
            return;
        };
        display.work_area = work_area;
        display.full_area = full_area;
        self.notify(Event::DisplayGeometryChanged);
    }

    /// Removes the last display.
    pub fn pop_display(&mut self) -> Option<Display> {
        let display = self.displays.pop()?;
        self.notify(Event::DisplayCountChanged);
        Some(display)
    }

    pub fn set_workspace_height(&mut self, height: f64) { self.workspace_height = Some(height); }

    pub fn add_window(&mut self, info: WindowInfo) -> WindowId {
        let id = WindowId::new(self.next_window);
        self.next_window += 1;
        self.windows.insert(id, SimWindow {
            id,
            info,
            display: None,
            maximized: false,
            open: true,
        });
        self.notify(Event::WindowAdded(id));
        id
    }

    /// Closes a window. Its last state stays readable and writable, the way a
    /// compositor still hands out a closing window to its removal listeners.
    pub fn remove_window(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if !window.open {
            return;
        }
        window.open = false;
        self.notify(Event::WindowRemoved(id));
    }

    pub fn set_caption(&mut self, id: WindowId, caption: &str) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.info.caption == caption {
            return;
        }
        window.info.caption = caption.to_string();
        if window.open {
            self.notify(Event::CaptionChanged(id));
        }
    }

    pub fn state(&self, id: WindowId) -> Option<&SimWindow> { self.windows.get(&id) }

    pub fn display_of(&self, id: WindowId) -> Option<DisplayId> {
        self.windows.get(&id).and_then(|w| w.display)
    }

    pub fn is_maximized(&self, id: WindowId) -> bool {
        self.windows.get(&id).is_some_and(|w| w.maximized)
    }

    /// Every window ever added, closed ones included.
    pub fn snapshot(&self) -> Vec<SimWindow> { self.windows.values().cloned().collect() }

    pub fn take_notifications(&mut self) -> Vec<Event> { self.notifications.drain(..).collect() }

    pub fn elapsed(&self) -> Duration { self.elapsed }

    pub fn pending_timers(&self) -> usize { self.timers.len() }

    fn next_due(&self) -> Option<Duration> { self.timers.iter().map(|t| t.due).min() }

    /// Pops the earliest timer due at or before `deadline`, moving the clock
    /// to its due time.
    fn pop_due(&mut self, deadline: Duration) -> Option<Deferred> {
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= deadline)
            .min_by_key(|(_, t)| (t.due, t.seq))?;
        let timer = self.timers.swap_remove(index);
        self.elapsed = self.elapsed.max(timer.due);
        Some(timer.work)
    }

    fn update(&mut self, id: WindowId, f: impl FnOnce(&mut SimWindow)) {
        match self.windows.get_mut(&id) {
            Some(window) => f(window),
            None => trace!(%id, "ignoring change to unknown window"),
        }
    }
}

impl Host for SimHost {
    fn displays(&self) -> Vec<Display> { self.displays.clone() }

    fn workspace_height(&self) -> f64 {
        if let Some(height) = self.workspace_height {
            return height;
        }
        let top = self.displays.iter().map(|d| d.full_area.y).fold(f64::INFINITY, f64::min);
        let bottom = self.displays.iter().map(|d| d.full_area.max_y()).fold(f64::NEG_INFINITY, f64::max);
        if self.displays.is_empty() { 0. } else { bottom - top }
    }

    fn windows(&self) -> Vec<WindowId> {
        self.windows.values().filter(|w| w.open).map(|w| w.id).collect()
    }

    fn window(&self, id: WindowId) -> Option<WindowInfo> {
        self.windows.get(&id).map(|w| w.info.clone())
    }

    fn set_frame(&mut self, id: WindowId, frame: Rect) {
        self.update(id, |w| {
            w.info.frame = frame;
            w.maximized = false;
        });
    }

    fn set_fullscreen(&mut self, id: WindowId, fullscreen: bool) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.info.fullscreen == fullscreen {
            return;
        }
        window.info.fullscreen = fullscreen;
        if window.open {
            self.notify(Event::FullscreenChanged(id));
        }
    }

    fn set_minimized(&mut self, id: WindowId, minimized: bool) {
        self.update(id, |w| w.info.minimized = minimized);
    }

    fn set_keep_above(&mut self, id: WindowId, keep_above: bool) {
        self.update(id, |w| w.info.keep_above = keep_above);
    }

    fn set_keep_below(&mut self, id: WindowId, keep_below: bool) {
        self.update(id, |w| w.info.keep_below = keep_below);
    }

    fn maximize(&mut self, id: WindowId) {
        let displays = &self.displays;
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        let display = window
            .display
            .and_then(|d| displays.get(d.index()))
            .or_else(|| displays.first());
        if let Some(display) = display {
            window.info.frame = display.work_area;
        }
        window.maximized = true;
    }

    fn send_to_display(&mut self, id: WindowId, display: DisplayId) {
        self.update(id, |w| w.display = Some(display));
    }

    fn schedule(&mut self, after: Duration, work: Deferred) {
        if let Some(weak) = &self.live {
            match weak.upgrade() {
                Some(tx) => actor::send_after(tx, after, Event::Deferred(work)),
                None => trace!(?work, "coordinator gone; dropping deferred work"),
            }
            return;
        }
        trace!(?after, ?work, "scheduling");
        self.timer_seq += 1;
        self.timers.push(Timer {
            due: self.elapsed + after,
            seq: self.timer_seq,
            work,
        });
    }

    fn now(&self) -> Instant {
        if self.live.is_some() {
            Instant::now()
        } else {
            self.base + self.elapsed
        }
    }
}

impl Coordinator<SimHost> {
    /// Delivers queued host notifications, including the ones handling them
    /// produces, until none are left.
    pub fn pump(&mut self) {
        for _ in 0..MAX_PUMP_ROUNDS {
            let events = self.host_mut().take_notifications();
            if events.is_empty() {
                return;
            }
            for event in events {
                self.handle_event(event);
            }
        }
        warn!("host notifications did not settle");
    }

    /// Moves the virtual clock forward, firing timers in due order.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.host().elapsed() + by;
        self.pump();
        while let Some(work) = self.host_mut().pop_due(deadline) {
            self.handle_event(Event::Deferred(work));
            self.pump();
        }
        self.host_mut().elapsed = deadline;
        self.pump();
    }

    /// Runs until no timers are left.
    pub fn run_until_idle(&mut self) {
        self.pump();
        for _ in 0..MAX_TIMER_FIRINGS {
            let Some(due) = self.host().next_due() else {
                return;
            };
            let by = due.saturating_sub(self.host().elapsed());
            self.advance(by);
        }
        warn!("timers did not settle");
    }
}
