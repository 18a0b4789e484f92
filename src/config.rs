use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::typing_policy::TimingProfile;

pub const DEFAULT_CURSOR_CHAR: &str = "|";

/// Split a comma-delimited word list, trimming each entry and dropping blanks.
/// Order is preserved and duplicates are kept.
pub fn parse_word_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Effective configuration of a single typewriter widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TypewriterOptions {
    pub typing_speed: u64,
    pub deleting_speed: u64,
    pub pause_duration: u64,
    pub cursor_char: String,
    pub cursor_blink_speed: u64,
    pub responsive_breakpoint: u32,
    pub max_word_length: usize,
    pub mobile: TimingProfile,
}

impl Default for TypewriterOptions {
    fn default() -> Self {
        Self {
            typing_speed: 100,
            deleting_speed: 50,
            pause_duration: 2000,
            cursor_char: DEFAULT_CURSOR_CHAR.to_string(),
            cursor_blink_speed: 500,
            responsive_breakpoint: 768,
            max_word_length: 20,
            mobile: TimingProfile::mobile(),
        }
    }
}

impl TypewriterOptions {
    /// Timing used above the breakpoint
    pub fn desktop_profile(&self) -> TimingProfile {
        TimingProfile {
            typing_speed: self.typing_speed,
            deleting_speed: self.deleting_speed,
            pause_duration: self.pause_duration,
        }
    }

    /// Clamp values that would stall or spin the animation loop.
    fn harden(mut self) -> Self {
        self.typing_speed = self.typing_speed.max(1);
        self.deleting_speed = self.deleting_speed.max(1);
        self.cursor_blink_speed = self.cursor_blink_speed.max(1);
        self.max_word_length = self.max_word_length.max(1);
        self.mobile.typing_speed = self.mobile.typing_speed.max(1);
        self.mobile.deleting_speed = self.mobile.deleting_speed.max(1);
        if self.cursor_char.is_empty() {
            self.cursor_char = DEFAULT_CURSOR_CHAR.to_string();
        }
        self
    }
}

/// Caller-supplied overrides; `None` keeps the underlying value
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptionOverrides {
    pub typing_speed: Option<u64>,
    pub deleting_speed: Option<u64>,
    pub pause_duration: Option<u64>,
    pub cursor_char: Option<String>,
    pub cursor_blink_speed: Option<u64>,
    pub responsive_breakpoint: Option<u32>,
    pub max_word_length: Option<usize>,
}

/// Shallow-merge `overrides` onto `defaults`.
pub fn merge_options(defaults: &TypewriterOptions, overrides: &OptionOverrides) -> TypewriterOptions {
    TypewriterOptions {
        typing_speed: overrides.typing_speed.unwrap_or(defaults.typing_speed),
        deleting_speed: overrides.deleting_speed.unwrap_or(defaults.deleting_speed),
        pause_duration: overrides.pause_duration.unwrap_or(defaults.pause_duration),
        cursor_char: overrides
            .cursor_char
            .clone()
            .unwrap_or_else(|| defaults.cursor_char.clone()),
        cursor_blink_speed: overrides
            .cursor_blink_speed
            .unwrap_or(defaults.cursor_blink_speed),
        responsive_breakpoint: overrides
            .responsive_breakpoint
            .unwrap_or(defaults.responsive_breakpoint),
        max_word_length: overrides.max_word_length.unwrap_or(defaults.max_word_length),
        mobile: defaults.mobile,
    }
    .harden()
}

/// Persisted user configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub options: TypewriterOptions,
    pub reduced_motion: bool,
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typecycle") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typecycle_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring unreadable config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
