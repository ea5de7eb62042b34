use tracing::info;

use crate::actor::coordinator::{Coordinator, Deferred};
use crate::sys::host::Host;

pub struct DisplayEventHandler;

impl DisplayEventHandler {
    /// Hosts report new outputs before they finish reflowing windows, so the
    /// rebuild waits and then runs again later to catch stragglers.
    pub fn handle_display_count_changed<H: Host>(coordinator: &mut Coordinator<H>) {
        let marker = coordinator.generation.next();
        info!(
            %marker,
            count = coordinator.host.displays().len(),
            "display count changed"
        );
        for delay in coordinator.config.timing.display_count_settle() {
            coordinator.host.schedule(delay, Deferred::Rebuild { marker });
        }
        let settle = coordinator.config.timing.display_count_settle().max().unwrap_or_default();
        coordinator.topology_changed(settle);
    }

    pub fn handle_display_geometry_changed<H: Host>(coordinator: &mut Coordinator<H>) {
        let marker = coordinator.generation.next();
        info!(%marker, "display geometry changed");
        for delay in coordinator.config.timing.display_geometry_settle() {
            coordinator.host.schedule(delay, Deferred::Rebuild { marker });
        }
        let settle = coordinator.config.timing.display_geometry_settle().max().unwrap_or_default();
        coordinator.topology_changed(settle);
    }
}
