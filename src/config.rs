use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::highlight::ColorScheme;
use crate::util::{env_nonempty, parse_bool_flag};

pub const DEFAULT_PROMPT: &str = "@ ";
pub const DEFAULT_THEME: &str = "dark";
pub const DEFAULT_MAX_SEED: usize = 500;
/// Rows of the inline edit area.
pub const DEFAULT_VIEWPORT_ROWS: u16 = 6;
const HISTORY_FILE_NAME: &str = ".replf_history";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub theme: String,
    pub history_enabled: bool,
    pub history_path: PathBuf,
    pub max_seed: usize,
    pub viewport_rows: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            theme: DEFAULT_THEME.to_string(),
            history_enabled: true,
            history_path: default_history_path(),
            max_seed: DEFAULT_MAX_SEED,
            viewport_rows: DEFAULT_VIEWPORT_ROWS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let prompt = std::env::var("REPLF_PROMPT").unwrap_or(defaults.prompt);
        let theme = env_nonempty("REPLF_THEME")
            .map(|v| v.to_lowercase())
            .unwrap_or(defaults.theme);
        let history_enabled = match env_nonempty("REPLF_HISTORY") {
            Some(raw) => match parse_bool_flag(raw.clone()) {
                Some(enabled) => enabled,
                None => bail!("Invalid REPLF_HISTORY '{raw}': expected true or false"),
            },
            None => defaults.history_enabled,
        };
        let history_path = env_nonempty("REPLF_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.history_path);
        let max_seed = match env_nonempty("REPLF_MAX_SEED") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(limit) => limit,
                Err(_) => bail!("Invalid REPLF_MAX_SEED '{raw}': expected a number"),
            },
            None => defaults.max_seed,
        };

        Ok(Self {
            prompt,
            theme,
            history_enabled,
            history_path,
            max_seed,
            viewport_rows: defaults.viewport_rows,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.prompt.is_empty() {
            bail!("REPLF_PROMPT must not be empty");
        }

        if self.prompt.contains(['\n', '\r']) {
            bail!("REPLF_PROMPT must fit on one line: {:?}", self.prompt);
        }

        if ColorScheme::by_name(&self.theme).is_none() {
            bail!(
                "Unknown REPLF_THEME '{}'. Expected one of: {}",
                self.theme,
                ColorScheme::NAMES.join(", ")
            );
        }

        if self.max_seed == 0 {
            bail!("REPLF_MAX_SEED must be at least 1");
        }

        Ok(())
    }

    pub fn color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.theme).unwrap_or_default()
    }
}

fn default_history_path() -> PathBuf {
    match env_nonempty("HOME") {
        Some(home) => PathBuf::from(home).join(HISTORY_FILE_NAME),
        None => PathBuf::from(HISTORY_FILE_NAME),
    }
}
