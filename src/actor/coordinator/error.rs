use thiserror::Error;

use crate::model::WindowId;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("window {0} disappeared from the host while being handled")]
    WindowVanished(WindowId),
    #[error("no window group for app {0}")]
    MissingGroup(String),
}
