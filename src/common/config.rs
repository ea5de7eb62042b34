use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::classifier::Classifier;
use crate::layout_engine::Layout;
use crate::model::TieBreak;
use crate::sys::screen::AreaKind;

pub fn config_file() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("emuwin.toml")
}

static DEFAULT_CONFIG: Lazy<Config> =
    Lazy::new(|| Config::parse(include_str!("../../emuwin.default.toml")).unwrap());

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub timing: TimingSettings,
    /// Emulators to manage, tried in order.
    #[serde(default)]
    pub apps: Vec<AppConfig>,
    /// Companion applications placed independently of any emulator.
    #[serde(default)]
    pub secondary_apps: Vec<SecondaryAppConfig>,
    /// On-screen keyboards that push managed windows to the background.
    #[serde(default)]
    pub keyboards: Vec<KeyboardConfig>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Render the primary window to the smaller display instead of the larger one.
    #[serde(default)]
    pub swap_screens: bool,
    /// Keep placed windows above other windows.
    #[serde(default = "yes")]
    pub keep_above: bool,
    /// Whether windows classified as "other" also get keep-above.
    #[serde(default)]
    pub other_keep_above: bool,
    #[serde(default)]
    pub primary_tie_break: TieBreak,
    #[serde(default)]
    pub placement_area: AreaKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            swap_screens: false,
            keep_above: true,
            other_keep_above: false,
            primary_tie_break: TieBreak::default(),
            placement_area: AreaKind::default(),
        }
    }
}

/// Delays, in milliseconds.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct TimingSettings {
    /// Delay before reassigning a window's display, for apps with
    /// `delay_reconfigure`.
    #[serde(default = "default_reconfigure_delay")]
    pub reconfigure_delay: u64,
    /// A window removal and a fullscreen change closer together than this
    /// are treated as one teardown.
    #[serde(default = "default_race_window")]
    pub race_window: u64,
    /// How long after such a removal the primary's fullscreen state is put back.
    #[serde(default = "default_race_restore_delay")]
    pub race_restore_delay: u64,
    /// Rebuild delay after a fullscreen secondary-app window closes.
    #[serde(default = "default_secondary_app_settle")]
    pub secondary_app_settle: u64,
    /// Rebuild delays after the number of displays changes.
    #[serde(default = "default_display_count_settle")]
    pub display_count_settle: Vec<u64>,
    /// Rebuild delays after display geometry changes.
    #[serde(default = "default_display_geometry_settle")]
    pub display_geometry_settle: Vec<u64>,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            reconfigure_delay: default_reconfigure_delay(),
            race_window: default_race_window(),
            race_restore_delay: default_race_restore_delay(),
            secondary_app_settle: default_secondary_app_settle(),
            display_count_settle: default_display_count_settle(),
            display_geometry_settle: default_display_geometry_settle(),
        }
    }
}

impl TimingSettings {
    pub fn reconfigure_delay(&self) -> Duration { Duration::from_millis(self.reconfigure_delay) }

    pub fn race_window(&self) -> Duration { Duration::from_millis(self.race_window) }

    pub fn race_restore_delay(&self) -> Duration { Duration::from_millis(self.race_restore_delay) }

    pub fn secondary_app_settle(&self) -> Duration {
        Duration::from_millis(self.secondary_app_settle)
    }

    pub fn display_count_settle(&self) -> impl Iterator<Item = Duration> + '_ {
        self.display_count_settle.iter().copied().map(Duration::from_millis)
    }

    pub fn display_geometry_settle(&self) -> impl Iterator<Item = Duration> + '_ {
        self.display_geometry_settle.iter().copied().map(Duration::from_millis)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.race_window == 0 {
            issues.push("timing.race_window must be positive".to_string());
        }
        if self.display_count_settle.is_empty() {
            issues.push("timing.display_count_settle must list at least one delay".to_string());
        }
        if self.display_geometry_settle.is_empty() {
            issues.push("timing.display_geometry_settle must list at least one delay".to_string());
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.race_window == 0 {
            self.race_window = default_race_window();
            fixes += 1;
        }
        if self.display_count_settle.is_empty() {
            self.display_count_settle = default_display_count_settle();
            fixes += 1;
        }
        if self.display_geometry_settle.is_empty() {
            self.display_geometry_settle = default_display_geometry_settle();
            fixes += 1;
        }

        fixes
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub name: String,
    /// Substrings of the window class, matched case-insensitively.
    pub classes: Vec<String>,
    /// Pattern matching the primary window's caption.
    pub primary: String,
    /// Pattern matching secondary window captions.
    pub secondary: String,
    #[serde(default)]
    pub settings: AppSettings,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct AppSettings {
    #[serde(default = "default_aspect_ratio")]
    pub secondary_window_aspect_ratio: f64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_single_screen_layout")]
    pub single_screen_layout: Layout,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_multi_screen_layout")]
    pub multi_screen_single_secondary_layout: Layout,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub multi_screen_multi_secondary_layout: Option<Layout>,
    /// Caption patterns of windows that get minimized instead of managed.
    #[serde(default)]
    pub blacklist: Vec<String>,
    /// Reassign displays after a short delay; some apps pick the wrong
    /// display when moved in the same turn as a fullscreen change.
    #[serde(default)]
    pub delay_reconfigure: bool,
    /// Caption changes can change a window's role, so rebuild on them.
    #[serde(default)]
    pub watch_caption: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            secondary_window_aspect_ratio: default_aspect_ratio(),
            single_screen_layout: default_single_screen_layout(),
            multi_screen_single_secondary_layout: default_multi_screen_layout(),
            multi_screen_multi_secondary_layout: None,
            blacklist: Vec::new(),
            delay_reconfigure: false,
            watch_caption: false,
        }
    }
}

impl AppSettings {
    pub fn multi_secondary_layout(&self) -> Layout {
        self.multi_screen_multi_secondary_layout
            .unwrap_or(self.multi_screen_single_secondary_layout)
    }

    pub fn validate(&self, app: &str) -> Vec<String> {
        let mut issues = Vec::new();

        let ratio = self.secondary_window_aspect_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            issues.push(format!(
                "{app}: secondary_window_aspect_ratio must be positive, got {ratio}"
            ));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let ratio = self.secondary_window_aspect_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            self.secondary_window_aspect_ratio = default_aspect_ratio();
            return 1;
        }
        0
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowingBehavior {
    #[default]
    Fullscreen,
    Maximized,
    #[serde(alias = "hidden")]
    Minimized,
    Unmanaged,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScreenPreference {
    /// Share the secondary display with the emulator's secondaries.
    #[default]
    PreferSecondary,
    /// Tile next to the primary window.
    PreferPrimary,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct SecondaryAppConfig {
    pub primary: String,
    pub classes: Vec<String>,
    #[serde(default)]
    pub windowing_behavior: WindowingBehavior,
    #[serde(default)]
    pub screen_preference: ScreenPreference,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct KeyboardConfig {
    pub primary: String,
    pub classes: Vec<String>,
}

fn yes() -> bool { true }

fn default_aspect_ratio() -> f64 { 16. / 9. }

fn default_single_screen_layout() -> Layout { Layout::ColumnRight }

fn default_multi_screen_layout() -> Layout { Layout::Separate }

fn default_reconfigure_delay() -> u64 { 100 }

fn default_race_window() -> u64 { 100 }

fn default_race_restore_delay() -> u64 { 1000 }

fn default_secondary_app_settle() -> u64 { 200 }

fn default_display_count_settle() -> Vec<u64> { vec![2000, 5000] }

fn default_display_geometry_settle() -> Vec<u64> { vec![500, 1000] }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    /// Reads `path` if it exists, otherwise returns the built-in defaults.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        if path.exists() { Self::read(path) } else { Ok(Self::default()) }
    }

    pub fn default() -> Config { DEFAULT_CONFIG.clone() }

    pub fn app(&self, name: &str) -> Option<&AppConfig> { self.apps.iter().find(|a| a.name == name) }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        issues.extend(self.timing.validate());

        let mut seen_names = crate::common::collections::HashSet::default();
        for app in &self.apps {
            if !seen_names.insert(app.name.as_str()) {
                issues.push(format!("duplicate app name '{}'", app.name));
            }
            if app.classes.iter().all(|c| c.trim().is_empty()) {
                issues.push(format!("{}: no window classes configured", app.name));
            }
            issues.extend(app.settings.validate(&app.name));
        }

        for (index, app) in self.secondary_apps.iter().enumerate() {
            if app.classes.iter().all(|c| c.trim().is_empty()) {
                issues.push(format!("secondary app {index}: no window classes configured"));
            }
        }

        for (index, keyboard) in self.keyboards.iter().enumerate() {
            if keyboard.classes.iter().all(|c| c.trim().is_empty()) {
                issues.push(format!("keyboard {index}: no window classes configured"));
            }
        }

        issues
    }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = self.timing.auto_fix_values();
        for app in &mut self.apps {
            fixes += app.settings.auto_fix_values();
        }
        fixes
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(buf)?;
        // Surface bad patterns at load time rather than on the first window.
        Classifier::new(&config)?;
        Ok(config)
    }
}
