use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_REVEAL_DELAY_SECS: u64 = 1;
pub const MAX_REVEAL_DELAY_SECS: u64 = 10;

/// How the current item is interpreted and presented; the session state
/// machine is identical in both modes.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    SpellingBee,
    MathGeneral,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub max_items: usize,
    pub randomize: bool,
    pub auto_reveal: bool,
    pub reveal_delay_secs: u64,
    pub mode: PracticeMode,
    /// Spelling-bee only: revealing also plays the word once.
    pub speak_on_reveal: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: 10,
            randomize: true,
            auto_reveal: false,
            reveal_delay_secs: 3,
            mode: PracticeMode::SpellingBee,
            speak_on_reveal: false,
        }
    }
}

impl Config {
    /// Clamp hand-edited config values back into their documented ranges.
    pub fn sanitized(mut self) -> Self {
        if self.max_items == 0 {
            self.max_items = Config::default().max_items;
        }
        self.reveal_delay_secs = self
            .reveal_delay_secs
            .clamp(MIN_REVEAL_DELAY_SECS, MAX_REVEAL_DELAY_SECS);
        self
    }
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
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "spellbee") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("spellbee_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
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
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg.sanitized();
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
