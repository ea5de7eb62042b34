pub mod group;
pub mod settings_cache;
pub mod window;

pub use group::{AppWindowGroup, ManagedWindow, TieBreak, WindowRole};
pub use settings_cache::{SavedSettings, SettingsCache};
pub use window::{WindowCapabilities, WindowId, WindowInfo};
