//! The coordinator owns all session state: the window groups, the settings
//! caches and the selected displays.
//!
//! It consumes host notifications one at a time, keeps the groups in sync
//! with the open windows and re-runs placement for whatever an event affects.
//! Deferred work goes through [`Host::schedule`] tagged with a generation
//! [`Marker`] and is dropped on arrival if a newer event has superseded it.

use std::time::Duration;

pub mod error;
mod events;
pub mod generation;
pub mod race;

pub use error::CoordinatorError;
use events::{DisplayEventHandler, WindowEventHandler};
pub use generation::{Generation, Marker};
pub use race::RaceWindow;
use tracing::{debug, info, instrument, trace, warn};

use crate::actor;
use crate::classifier::{Classification, Classifier, SignatureError};
use crate::common::collections::{BTreeMap, BTreeSet, HashMap};
use crate::common::config::{AppSettings, Config, ScreenPreference, WindowingBehavior};
use crate::layout_engine::{Layout, MAX_SECONDARIES, Placement, PlacementRequest, compute_placement};
use crate::model::{AppWindowGroup, ManagedWindow, SettingsCache, WindowCapabilities, WindowId, WindowInfo};
use crate::sys::geometry::{Round, SameAs};
use crate::sys::host::Host;
use crate::sys::screen::{DisplayId, ScreenSelection};

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    WindowAdded(WindowId),
    WindowRemoved(WindowId),
    FullscreenChanged(WindowId),
    CaptionChanged(WindowId),
    DisplayCountChanged,
    DisplayGeometryChanged,
    /// Work handed to [`Host::schedule`] coming due.
    Deferred(Deferred),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    /// Reselect displays and reclassify every open window.
    Rebuild { marker: Marker },
    SendToDisplay {
        marker: Marker,
        window: WindowId,
        display: DisplayId,
    },
    /// Put back the primary's fullscreen state after a removal raced a
    /// fullscreen change. Dropped if another removal happened since, or the
    /// group has a different primary by then.
    RestorePrimaryFullscreen {
        app: String,
        removal: u64,
        primary: WindowId,
    },
}

#[derive(Debug, Clone)]
struct TrackedWindow {
    classification: Classification,
    capabilities: WindowCapabilities,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryAppWindow {
    /// Index into the configured secondary apps.
    pub config: usize,
    pub caption: String,
}

pub struct Coordinator<H: Host> {
    host: H,
    config: Config,
    classifier: Classifier,
    screens: ScreenSelection,
    groups: BTreeMap<String, AppWindowGroup>,
    secondary_apps: BTreeMap<WindowId, SecondaryAppWindow>,
    unmanaged: BTreeSet<WindowId>,
    tracked: HashMap<WindowId, TrackedWindow>,
    keyboards: BTreeSet<WindowId>,
    /// State from before we first touched each window.
    original_settings: SettingsCache,
    /// State from before windows were pushed back for an on-screen keyboard.
    keyboard_settings: SettingsCache,
    generation: Generation,
    race: RaceWindow,
    /// Settle delay of a display change whose rebuild has not run yet.
    pending_topology: Option<Duration>,
}

impl<H: Host> Coordinator<H> {
    pub fn new(host: H, config: Config) -> Result<Self, SignatureError> {
        let classifier = Classifier::new(&config)?;
        let screens = ScreenSelection::select(&host.displays(), config.settings.swap_screens);
        let race = RaceWindow::new(config.timing.race_window());
        Ok(Coordinator {
            host,
            config,
            classifier,
            screens,
            groups: BTreeMap::new(),
            secondary_apps: BTreeMap::new(),
            unmanaged: BTreeSet::new(),
            tracked: HashMap::default(),
            keyboards: BTreeSet::new(),
            original_settings: SettingsCache::new(),
            keyboard_settings: SettingsCache::new(),
            generation: Generation::new(),
            race,
            pending_topology: None,
        })
    }

    /// Classifies every open window and arranges the resulting groups.
    pub fn start(&mut self) {
        let marker = self.generation.next();
        info!(%marker, "starting");
        self.rebuild(marker);
    }

    pub async fn run(mut self, mut events: Receiver) -> Self {
        while let Some((span, event)) = events.recv().await {
            let _guard = span.enter();
            self.handle_event(event);
        }
        self
    }

    fn log_event(&self, event: &Event) {
        match event {
            Event::Deferred(..) | Event::CaptionChanged(..) => trace!(?event, "Event"),
            _ => debug!(?event, "Event"),
        }
    }

    #[instrument(name = "coordinator::handle_event", skip(self), fields(event = ?event))]
    pub fn handle_event(&mut self, event: Event) {
        self.log_event(&event);
        let result = match event {
            Event::WindowAdded(id) => WindowEventHandler::handle_window_added(self, id),
            Event::WindowRemoved(id) => WindowEventHandler::handle_window_removed(self, id),
            Event::FullscreenChanged(id) => WindowEventHandler::handle_fullscreen_changed(self, id),
            Event::CaptionChanged(id) => WindowEventHandler::handle_caption_changed(self, id),
            Event::DisplayCountChanged => {
                DisplayEventHandler::handle_display_count_changed(self);
                Ok(())
            }
            Event::DisplayGeometryChanged => {
                DisplayEventHandler::handle_display_geometry_changed(self);
                Ok(())
            }
            Event::Deferred(work) => self.handle_deferred(work),
        };
        if let Err(err) = result {
            warn!(%err, "failed to handle event");
        }
    }

    fn handle_deferred(&mut self, work: Deferred) -> Result<(), CoordinatorError> {
        match work {
            Deferred::Rebuild { marker } => self.rebuild(marker),
            Deferred::SendToDisplay { marker, window, display: target } => {
                if !self.generation.is_current(marker) {
                    trace!(%marker, %window, "dropping stale display reassignment");
                    return Ok(());
                }
                self.host.send_to_display(window, target);
            }
            Deferred::RestorePrimaryFullscreen { app, removal, primary } => {
                let Some(group) = self.groups.get(&app) else {
                    trace!(%app, "group gone before fullscreen restore");
                    return Ok(());
                };
                if self.race.removal_seq() != removal || !group.is_primary(primary) {
                    trace!(%app, %primary, "fullscreen restore superseded");
                    return Ok(());
                }
                info!(
                    %app,
                    %primary,
                    fullscreen = group.old_primary_fullscreen,
                    "restoring primary fullscreen after window removal"
                );
                self.host.set_fullscreen(primary, group.old_primary_fullscreen);
            }
        }
        Ok(())
    }

    /// Starts a new generation. A display change still waiting for its
    /// rebuild gets the rebuild rescheduled under the new marker.
    fn supersede(&mut self) -> Marker {
        let marker = self.generation.next();
        if let Some(delay) = self.pending_topology {
            debug!(%marker, ?delay, "carrying pending display rebuild forward");
            self.host.schedule(delay, Deferred::Rebuild { marker });
        }
        marker
    }

    /// Records a display change whose rebuild is scheduled after `settle`.
    fn topology_changed(&mut self, settle: Duration) { self.pending_topology = Some(settle); }

    fn select_screens(&mut self) {
        self.screens =
            ScreenSelection::select(&self.host.displays(), self.config.settings.swap_screens);
    }

    /// Drops all group state and rebuilds it from the host's open windows.
    fn rebuild(&mut self, marker: Marker) {
        if !self.generation.is_current(marker) {
            trace!(%marker, current = %self.generation.current(), "dropping stale rebuild");
            return;
        }

        self.pending_topology = None;
        self.select_screens();
        info!(
            %marker,
            primary = %self.screens.primary.id,
            secondary = %self.screens.secondary.id,
            displays = self.screens.count,
            "rebuilding window groups"
        );

        self.groups.clear();
        self.secondary_apps.clear();
        self.unmanaged.clear();
        self.tracked.clear();

        for id in self.host.windows() {
            if self.keyboards.contains(&id) {
                continue;
            }
            let Some(info) = self.host.window(id) else {
                continue;
            };
            self.register(id, &info);
        }

        self.arrange_all(marker);
    }

    /// Classifies a window and records it in the matching collection.
    fn register(&mut self, id: WindowId, info: &WindowInfo) -> Classification {
        let verdict = self.classifier.classify(&info.caption, &info.class);
        if let Some(enforcement) = verdict.enforce {
            enforcement.apply(&mut self.host, id);
        }

        let classification = verdict.classification;
        match classification {
            Classification::Unmanaged => {
                self.unmanaged.insert(id);
            }
            Classification::SecondaryApp { config } => {
                self.original_settings.save(id, info);
                // Maximized companions are also routed like unmanaged windows.
                if self.classifier.secondary_app(config).windowing == WindowingBehavior::Maximized {
                    self.unmanaged.insert(id);
                }
                self.secondary_apps.insert(id, SecondaryAppWindow {
                    config,
                    caption: info.caption.clone(),
                });
            }
            Classification::Primary { app }
            | Classification::Secondary { app }
            | Classification::Other { app } => {
                self.original_settings.save(id, info);
                if let Some(role) = classification.role()
                    && info.normal
                {
                    let name = self.classifier.app(app).name.clone();
                    let tie_break = self.config.settings.primary_tie_break;
                    let group = self.groups.entry(name).or_default();
                    let window = ManagedWindow::new(id, info.caption.clone());
                    if group.insert(role, window, tie_break) {
                        group.primary_fullscreen = info.fullscreen;
                        group.old_primary_fullscreen = info.fullscreen;
                    }
                } else {
                    debug!(%id, caption = %info.caption, "not a normal window; not grouping");
                }
            }
        }

        self.tracked.insert(id, TrackedWindow {
            classification,
            capabilities: verdict.capabilities,
        });
        classification
    }

    fn arrange_all(&mut self, marker: Marker) {
        let apps: Vec<String> = self.groups.keys().cloned().collect();
        for app in apps {
            if let Err(err) = self.arrange_group(&app, marker) {
                warn!(%app, %err, "failed to arrange group");
            }
        }
    }

    /// Places every window of a group, along with companion apps and
    /// unmanaged windows.
    fn arrange_group(&mut self, app: &str, marker: Marker) -> Result<(), CoordinatorError> {
        if !self.generation.is_current(marker) {
            trace!(app, %marker, "dropping stale arrangement");
            return Ok(());
        }
        if self.pending_topology.is_some() {
            // Displays changed and the settle rebuild has not run yet.
            self.select_screens();
        }

        let group = self
            .groups
            .get(app)
            .ok_or_else(|| CoordinatorError::MissingGroup(app.to_string()))?;
        group.assert_valid(app);

        let total = group.len() + self.secondary_apps.len();
        if total < 2 {
            trace!(app, total, "too few windows to arrange");
            return Ok(());
        }
        let Some(primary) = group.primary().map(|w| w.id) else {
            debug!(app, "group has no primary window");
            return Ok(());
        };
        let primary_fullscreen = group.primary_fullscreen;

        let mut secondaries: Vec<&ManagedWindow> = group.secondaries().iter().collect();
        secondaries.sort_by(|a, b| a.caption.cmp(&b.caption));
        let secondaries: Vec<WindowId> = secondaries.into_iter().map(|w| w.id).collect();
        let others: Vec<WindowId> = group.others().iter().map(|w| w.id).collect();

        let mut companions: Vec<(&WindowId, &SecondaryAppWindow)> = self
            .secondary_apps
            .iter()
            .filter(|(_, w)| {
                self.classifier.secondary_app(w.config).windowing == WindowingBehavior::Fullscreen
            })
            .collect();
        companions.sort_by(|a, b| a.1.caption.cmp(&b.1.caption));

        let settings = self
            .classifier
            .app_index(app)
            .map(|index| self.classifier.app(index).settings.clone())
            .ok_or_else(|| CoordinatorError::MissingGroup(app.to_string()))?;
        let mut primary_settings = settings.clone();
        let mut secondary_settings = settings.clone();
        let mut on_primary = Vec::new();
        let mut on_secondary = Vec::new();

        if self.screens.is_single_screen() {
            on_primary.extend(secondaries);
            on_primary.extend(companions.iter().map(|(id, _)| **id));
        } else {
            if settings.multi_secondary_layout() == Layout::Separate {
                on_secondary.extend(secondaries);
            } else {
                on_primary.extend(secondaries);
            }
            for &(id, window) in &companions {
                match self.classifier.secondary_app(window.config).screen_preference {
                    ScreenPreference::PreferPrimary => {
                        on_primary.push(*id);
                        share_primary_display(&mut primary_settings);
                    }
                    ScreenPreference::PreferSecondary => {
                        on_secondary.push(*id);
                        secondary_settings.multi_screen_single_secondary_layout = Layout::Separate;
                        secondary_settings.multi_screen_multi_secondary_layout =
                            Some(Layout::Separate);
                    }
                }
            }
        }

        debug!(
            app,
            %primary,
            primary_fullscreen,
            ?on_primary,
            ?on_secondary,
            ?others,
            "arranging group"
        );

        let primary_info =
            self.host.window(primary).ok_or(CoordinatorError::WindowVanished(primary))?;
        if primary_info.fullscreen {
            if let Some(placement) = self.placement(0, on_primary.len(), &primary_settings) {
                self.place(primary, placement, marker);
            }
        } else {
            debug!(app, %primary, "primary is not fullscreen; leaving it in place");
        }

        for (settings, shared) in [
            (&primary_settings, &on_primary),
            (&secondary_settings, &on_secondary),
        ] {
            for (slot, &id) in shared.iter().enumerate() {
                let index = slot + 1;
                if primary_fullscreen {
                    if let Some(placement) = self.placement(index, shared.len(), settings) {
                        self.place(id, placement, marker);
                    }
                } else if index <= MAX_SECONDARIES {
                    self.original_settings.restore(&mut self.host, id);
                    self.host.set_fullscreen(id, false);
                    self.host.set_keep_above(id, false);
                }
            }
        }

        if !primary_info.fullscreen {
            return Ok(());
        }

        let secondary_display = self.screens.secondary.id;
        let other_keep_above = self.config.settings.keep_above && self.config.settings.other_keep_above;
        for id in others {
            trace!(%id, "routing other window");
            self.host.send_to_display(id, secondary_display);
            self.host.set_fullscreen(id, false);
            self.host.maximize(id);
            if other_keep_above {
                self.host.set_keep_above(id, true);
            }
        }

        for &id in &self.unmanaged {
            self.host.send_to_display(id, secondary_display);
        }

        Ok(())
    }

    fn placement(&self, index: usize, group_size: usize, settings: &AppSettings) -> Option<Placement> {
        compute_placement(&PlacementRequest {
            index,
            group_size,
            settings,
            screens: &self.screens,
            area: self.config.settings.placement_area,
            workspace_height: self.host.workspace_height(),
            keep_above: self.config.settings.keep_above,
        })
    }

    fn place(&mut self, id: WindowId, placement: Placement, marker: Marker) {
        let frame = placement.frame.round();
        if placement.unminimize {
            self.host.set_minimized(id, false);
        }
        if placement.fullscreen {
            self.host.set_fullscreen(id, true);
        }
        if placement.keep_above {
            self.host.set_keep_above(id, true);
        }
        let current = self.host.window(id).map(|w| w.frame);
        if !current.is_some_and(|c| c.same_as(frame)) {
            self.host.set_frame(id, frame);
        }

        if placement.delay_reconfigure {
            self.host.schedule(self.config.timing.reconfigure_delay(), Deferred::SendToDisplay {
                marker,
                window: id,
                display: placement.display,
            });
        } else {
            self.host.send_to_display(id, placement.display);
        }
    }

    /// Every window we know about, managed or not.
    fn known_windows(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.unmanaged.iter().copied().collect();
        ids.extend(self.secondary_apps.keys().copied());
        for group in self.groups.values() {
            ids.extend(group.others().iter().map(|w| w.id));
            ids.extend(group.secondaries().iter().map(|w| w.id));
            ids.extend(group.primaries().iter().map(|w| w.id));
        }
        ids.sort();
        ids.dedup();
        ids
    }

    fn background_for_keyboard(&mut self) {
        let windows = self.known_windows();
        info!(count = windows.len(), "sending windows to background for keyboard");
        for id in windows {
            if let Some(info) = self.host.window(id) {
                self.keyboard_settings.save(id, &info);
            }
            self.host.set_keep_above(id, false);
            self.host.set_keep_below(id, true);
        }
    }

    fn restore_from_keyboard(&mut self) {
        let windows = self.known_windows();
        info!(count = windows.len(), "restoring windows from keyboard background");
        for id in windows {
            self.keyboard_settings.restore(&mut self.host, id);
            self.keyboard_settings.remove(id);
        }
    }

    pub fn host(&self) -> &H { &self.host }

    pub fn host_mut(&mut self) -> &mut H { &mut self.host }

    pub fn config(&self) -> &Config { &self.config }

    pub fn screens(&self) -> &ScreenSelection { &self.screens }

    pub fn group(&self, app: &str) -> Option<&AppWindowGroup> { self.groups.get(app) }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &AppWindowGroup)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    pub fn secondary_app_windows(&self) -> &BTreeMap<WindowId, SecondaryAppWindow> {
        &self.secondary_apps
    }

    pub fn is_unmanaged(&self, id: WindowId) -> bool { self.unmanaged.contains(&id) }

    pub fn original_settings(&self) -> &SettingsCache { &self.original_settings }

    pub fn generation(&self) -> Marker { self.generation.current() }
}

/// Companions tiled next to the primary need a layout that shares its display.
fn share_primary_display(settings: &mut AppSettings) {
    if settings.multi_screen_single_secondary_layout == Layout::Separate {
        settings.multi_screen_single_secondary_layout = Layout::ColumnRight;
    }
    if settings.multi_screen_multi_secondary_layout == Some(Layout::Separate) {
        settings.multi_screen_multi_secondary_layout = Some(Layout::ColumnRight);
    }
}

#[cfg(test)]
mod tests;
