//! Maps a window's caption and class to its role.
//!
//! Signatures are compiled once from the configuration. Classification itself
//! is pure: the corrective actions some outcomes call for (minimizing a
//! blacklisted window, maximizing a companion app) are returned in the
//! [`Verdict`] for the caller to apply.

use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::common::config::{
    AppConfig, AppSettings, Config, KeyboardConfig, ScreenPreference, SecondaryAppConfig,
    WindowingBehavior,
};
use crate::model::{WindowCapabilities, WindowId, WindowRole};
use crate::sys::host::Host;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("{owner}: invalid {field} pattern {pattern:?}")]
    InvalidPattern {
        owner: String,
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

fn compile(owner: &str, field: &'static str, pattern: &str) -> Result<Regex, SignatureError> {
    Regex::new(pattern).map_err(|source| SignatureError::InvalidPattern {
        owner: owner.to_string(),
        field,
        pattern: pattern.to_string(),
        source,
    })
}

/// Lowercased class substrings; blank entries would match every window.
#[derive(Debug, Clone)]
struct ClassMatcher(Vec<String>);

impl ClassMatcher {
    fn new(classes: &[String]) -> Self {
        ClassMatcher(
            classes
                .iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }

    fn matches(&self, class: &str) -> bool {
        let class = class.to_lowercase();
        self.0.iter().any(|c| class.contains(c.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct AppSignature {
    pub name: String,
    classes: ClassMatcher,
    primary: Regex,
    secondary: Regex,
    blacklist: Vec<Regex>,
    pub settings: AppSettings,
}

impl AppSignature {
    pub fn compile(config: &AppConfig) -> Result<Self, SignatureError> {
        let name = &config.name;
        Ok(AppSignature {
            name: name.clone(),
            classes: ClassMatcher::new(&config.classes),
            primary: compile(name, "primary", &config.primary)?,
            secondary: compile(name, "secondary", &config.secondary)?,
            blacklist: config
                .settings
                .blacklist
                .iter()
                .map(|p| compile(name, "blacklist", p))
                .collect::<Result<_, _>>()?,
            settings: config.settings.clone(),
        })
    }

    fn is_blacklisted(&self, caption: &str) -> bool {
        self.blacklist.iter().any(|rx| rx.is_match(caption))
    }
}

#[derive(Debug, Clone)]
pub struct SecondaryAppSignature {
    classes: ClassMatcher,
    primary: Regex,
    pub windowing: WindowingBehavior,
    pub screen_preference: ScreenPreference,
}

impl SecondaryAppSignature {
    pub fn compile(index: usize, config: &SecondaryAppConfig) -> Result<Self, SignatureError> {
        Ok(SecondaryAppSignature {
            classes: ClassMatcher::new(&config.classes),
            primary: compile(&format!("secondary app {index}"), "primary", &config.primary)?,
            windowing: config.windowing_behavior,
            screen_preference: config.screen_preference,
        })
    }
}

#[derive(Debug, Clone)]
pub struct KeyboardSignature {
    classes: ClassMatcher,
    primary: Regex,
}

impl KeyboardSignature {
    pub fn compile(index: usize, config: &KeyboardConfig) -> Result<Self, SignatureError> {
        Ok(KeyboardSignature {
            classes: ClassMatcher::new(&config.classes),
            primary: compile(&format!("keyboard {index}"), "primary", &config.primary)?,
        })
    }
}

/// Index of an [`AppSignature`] within the classifier.
pub type AppIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Primary { app: AppIndex },
    Secondary { app: AppIndex },
    Other { app: AppIndex },
    /// A companion application, by its position in the secondary-app list.
    SecondaryApp { config: usize },
    Unmanaged,
}

impl Classification {
    pub fn app(&self) -> Option<AppIndex> {
        match *self {
            Classification::Primary { app }
            | Classification::Secondary { app }
            | Classification::Other { app } => Some(app),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<WindowRole> {
        match self {
            Classification::Primary { .. } => Some(WindowRole::Primary),
            Classification::Secondary { .. } => Some(WindowRole::Secondary),
            Classification::Other { .. } => Some(WindowRole::Other),
            _ => None,
        }
    }

    pub fn is_managed(&self) -> bool { !matches!(self, Classification::Unmanaged) }
}

/// A state the classifier wants forced on a window regardless of layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Out of fullscreen and minimized.
    Minimize,
    /// Out of fullscreen, restored, then maximized.
    Maximize,
}

impl Enforcement {
    pub fn apply<H: Host>(self, host: &mut H, id: WindowId) {
        trace!(%id, enforcement = ?self, "enforcing window state");
        host.set_fullscreen(id, false);
        match self {
            Enforcement::Minimize => host.set_minimized(id, true),
            Enforcement::Maximize => {
                host.set_minimized(id, false);
                host.maximize(id);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub classification: Classification,
    pub enforce: Option<Enforcement>,
    pub capabilities: WindowCapabilities,
}

impl Verdict {
    fn new(classification: Classification) -> Self {
        Verdict {
            classification,
            enforce: None,
            capabilities: WindowCapabilities::empty(),
        }
    }

    fn enforcing(mut self, enforcement: Enforcement) -> Self {
        self.enforce = Some(enforcement);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    apps: Vec<AppSignature>,
    secondary_apps: Vec<SecondaryAppSignature>,
    keyboards: Vec<KeyboardSignature>,
}

impl Classifier {
    pub fn new(config: &Config) -> Result<Self, SignatureError> {
        Ok(Classifier {
            apps: config.apps.iter().map(AppSignature::compile).collect::<Result<_, _>>()?,
            secondary_apps: config
                .secondary_apps
                .iter()
                .enumerate()
                .map(|(i, c)| SecondaryAppSignature::compile(i, c))
                .collect::<Result<_, _>>()?,
            keyboards: config
                .keyboards
                .iter()
                .enumerate()
                .map(|(i, c)| KeyboardSignature::compile(i, c))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn apps(&self) -> &[AppSignature] { &self.apps }

    pub fn app(&self, index: AppIndex) -> &AppSignature { &self.apps[index] }

    pub fn app_index(&self, name: &str) -> Option<AppIndex> {
        self.apps.iter().position(|a| a.name == name)
    }

    pub fn secondary_app(&self, index: usize) -> &SecondaryAppSignature {
        &self.secondary_apps[index]
    }

    pub fn is_keyboard(&self, caption: &str, class: &str) -> bool {
        self.keyboards
            .iter()
            .any(|k| k.classes.matches(class) && k.primary.is_match(caption))
    }

    /// Classifies a window. Companion apps are tried first so an emulator's
    /// auxiliary windows can't be mistaken for one, then primary captions of
    /// every application, then class-only matches.
    pub fn classify(&self, caption: &str, class: &str) -> Verdict {
        let verdict = self.classify_inner(caption, class);
        debug!(caption, class, classification = ?verdict.classification, "classified window");
        verdict
    }

    fn classify_inner(&self, caption: &str, class: &str) -> Verdict {
        for (config, app) in self.secondary_apps.iter().enumerate() {
            if !(app.classes.matches(class) && app.primary.is_match(caption)) {
                continue;
            }
            return match app.windowing {
                WindowingBehavior::Minimized => {
                    Verdict::new(Classification::Unmanaged).enforcing(Enforcement::Minimize)
                }
                WindowingBehavior::Unmanaged => Verdict::new(Classification::Unmanaged),
                WindowingBehavior::Maximized => {
                    Verdict::new(Classification::SecondaryApp { config })
                        .enforcing(Enforcement::Maximize)
                }
                WindowingBehavior::Fullscreen => {
                    Verdict::new(Classification::SecondaryApp { config })
                }
            };
        }

        for (index, app) in self.apps.iter().enumerate() {
            if app.classes.matches(class) && app.primary.is_match(caption) {
                return self.app_verdict(index, caption, Classification::Primary { app: index });
            }
        }

        for (index, app) in self.apps.iter().enumerate() {
            if !app.classes.matches(class) {
                continue;
            }
            let classification = if app.secondary.is_match(caption) {
                Classification::Secondary { app: index }
            } else {
                Classification::Other { app: index }
            };
            return self.app_verdict(index, caption, classification);
        }

        Verdict::new(Classification::Unmanaged)
    }

    fn app_verdict(&self, index: AppIndex, caption: &str, classification: Classification) -> Verdict {
        let app = &self.apps[index];
        if app.is_blacklisted(caption) {
            debug!(caption, app = %app.name, "window blacklisted");
            return Verdict::new(Classification::Unmanaged).enforcing(Enforcement::Minimize);
        }

        let mut verdict = Verdict::new(classification);
        match classification {
            Classification::Primary { .. } => {
                verdict.capabilities |= WindowCapabilities::WATCH_FULLSCREEN;
            }
            _ if app.settings.watch_caption => {
                verdict.capabilities |= WindowCapabilities::WATCH_CAPTION;
            }
            _ => {}
        }
        verdict
    }
}
