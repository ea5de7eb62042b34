use tracing::{debug, info, trace};

use crate::actor::coordinator::{Coordinator, CoordinatorError, Deferred};
use crate::classifier::Classification;
use crate::common::config::WindowingBehavior;
use crate::model::{WindowCapabilities, WindowId, WindowRole};
use crate::sys::host::Host;

pub struct WindowEventHandler;

impl WindowEventHandler {
    pub fn handle_window_added<H: Host>(
        coordinator: &mut Coordinator<H>,
        id: WindowId,
    ) -> Result<(), CoordinatorError> {
        let info = coordinator.host.window(id).ok_or(CoordinatorError::WindowVanished(id))?;

        if coordinator.classifier.is_keyboard(&info.caption, &info.class) {
            coordinator.keyboards.insert(id);
            coordinator.background_for_keyboard();
            return Ok(());
        }
        if coordinator.tracked.contains_key(&id) {
            debug!(%id, "window already tracked");
            return Ok(());
        }

        let first_sight = !coordinator.original_settings.contains(id);
        let classification = coordinator.register(id, &info);

        if first_sight {
            let target = match classification {
                Classification::Primary { .. } => Some(coordinator.screens.primary.id),
                Classification::SecondaryApp { .. } | Classification::Unmanaged => {
                    Some(coordinator.screens.secondary.id)
                }
                Classification::Secondary { .. } | Classification::Other { .. } => None,
            };
            if let Some(target) = target {
                trace!(%id, %target, "routing new window");
                coordinator.host.send_to_display(id, target);
            }
        }

        // Adding a window arranges only what it affects and supersedes nothing.
        let marker = coordinator.generation.current();
        match classification {
            Classification::SecondaryApp { config }
                if coordinator.classifier.secondary_app(config).windowing
                    == WindowingBehavior::Fullscreen =>
            {
                coordinator.arrange_all(marker);
                Ok(())
            }
            _ => match classification.app() {
                Some(app) if info.normal => {
                    let name = coordinator.classifier.app(app).name.clone();
                    coordinator.arrange_group(&name, marker)
                }
                _ => Ok(()),
            },
        }
    }

    pub fn handle_window_removed<H: Host>(
        coordinator: &mut Coordinator<H>,
        id: WindowId,
    ) -> Result<(), CoordinatorError> {
        let marker = coordinator.supersede();

        if coordinator.keyboards.remove(&id) {
            coordinator.restore_from_keyboard();
            return Ok(());
        }

        coordinator.unmanaged.remove(&id);
        coordinator.keyboard_settings.remove(id);
        let Some(tracked) = coordinator.tracked.remove(&id) else {
            trace!(%id, "removed window was never tracked");
            return Ok(());
        };

        if coordinator.original_settings.restore(&mut coordinator.host, id) {
            coordinator.original_settings.remove(id);
        }

        match tracked.classification {
            Classification::SecondaryApp { config } => {
                coordinator.secondary_apps.remove(&id);
                if coordinator.classifier.secondary_app(config).windowing
                    == WindowingBehavior::Fullscreen
                {
                    info!(%id, "fullscreen secondary app closed; rebuilding shortly");
                    let delay = coordinator.config.timing.secondary_app_settle();
                    coordinator.host.schedule(delay, Deferred::Rebuild { marker });
                }
                Ok(())
            }
            classification => {
                let Some(app) = classification.app() else {
                    return Ok(());
                };
                let name = coordinator.classifier.app(app).name.clone();
                let tie_break = coordinator.config.settings.primary_tie_break;
                let Some(group) = coordinator.groups.get_mut(&name) else {
                    return Ok(());
                };
                let Some(role) = group.remove(id, tie_break) else {
                    return Ok(());
                };
                if role == WindowRole::Primary
                    && let Some(promoted) = group.primary()
                    && let Some(promoted_info) = coordinator.host.window(promoted.id)
                {
                    debug!(
                        primary = %promoted.id,
                        fullscreen = promoted_info.fullscreen,
                        "primary closed; tracking the promoted window"
                    );
                    group.primary_fullscreen = promoted_info.fullscreen;
                }

                let now = coordinator.host.now();
                let racing = coordinator.race.record_removal(now);
                if racing && let Some(primary) = group.primary() {
                    debug!(%id, primary = %primary.id, "removal raced a fullscreen change");
                    let work = Deferred::RestorePrimaryFullscreen {
                        app: name.clone(),
                        removal: coordinator.race.removal_seq(),
                        primary: primary.id,
                    };
                    let delay = coordinator.config.timing.race_restore_delay();
                    coordinator.host.schedule(delay, work);
                }

                if group.is_empty() {
                    debug!(app = %name, "last window closed; dropping group");
                    coordinator.groups.remove(&name);
                    return Ok(());
                }
                coordinator.arrange_group(&name, marker)
            }
        }
    }

    pub fn handle_fullscreen_changed<H: Host>(
        coordinator: &mut Coordinator<H>,
        id: WindowId,
    ) -> Result<(), CoordinatorError> {
        let Some(tracked) = coordinator.tracked.get(&id) else {
            return Ok(());
        };
        if !tracked.capabilities.contains(WindowCapabilities::WATCH_FULLSCREEN) {
            return Ok(());
        }
        let Some(app) = tracked.classification.app() else {
            return Ok(());
        };
        let name = coordinator.classifier.app(app).name.clone();
        let info = coordinator.host.window(id).ok_or(CoordinatorError::WindowVanished(id))?;
        let now = coordinator.host.now();

        let Some(group) = coordinator.groups.get_mut(&name) else {
            return Ok(());
        };
        if !group.is_primary(id) {
            trace!(%id, "fullscreen change of a window that is no longer primary");
            return Ok(());
        }

        // Only drops out of fullscreen can be teardown side effects.
        let racing = !info.fullscreen && coordinator.race.record_fullscreen(now);
        if racing && group.primary_fullscreen {
            info!(%id, "fullscreen dropped during window teardown; restoring");
            coordinator.host.set_fullscreen(id, group.primary_fullscreen);
            return Ok(());
        }

        group.old_primary_fullscreen = group.primary_fullscreen;
        group.primary_fullscreen = info.fullscreen;
        info!(%id, app = %name, fullscreen = info.fullscreen, "primary fullscreen changed");

        let marker = coordinator.supersede();
        coordinator.arrange_group(&name, marker)
    }

    pub fn handle_caption_changed<H: Host>(
        coordinator: &mut Coordinator<H>,
        id: WindowId,
    ) -> Result<(), CoordinatorError> {
        let Some(tracked) = coordinator.tracked.get(&id) else {
            return Ok(());
        };
        if !tracked.capabilities.contains(WindowCapabilities::WATCH_CAPTION) {
            return Ok(());
        }

        let marker = coordinator.generation.next();
        info!(%id, %marker, "caption of a watched window changed; rebuilding");
        coordinator.rebuild(marker);
        Ok(())
    }
}
