use crate::due::{is_valid_time_format, DEFAULT_TIME_FORMAT};
use crate::error::{Result, TodoError};
use crate::store::fs::FileStore;
use crate::store::DecodePolicy;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Lives in the todo home directory and is never read as an entry.
pub const CONFIG_FILENAME: &str = "config.json";
/// Overrides the todo home directory.
pub const HOME_ENV_VAR: &str = "TODO_USER_HOME";

const DEFAULT_HOME_DIR: &str = ".todo";
const DEFAULT_FILE_EXT: &str = ".yml";

/// Resolves the todo home directory: `$TODO_USER_HOME`, else `~/.todo`.
pub fn home_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV_VAR) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let base = BaseDirs::new()
        .ok_or_else(|| TodoError::Config("could not determine home directory".to_string()))?;
    Ok(base.home_dir().join(DEFAULT_HOME_DIR))
}

/// Configuration for todoz, stored in `<home>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TodoConfig {
    /// Directory holding the entries. Defaults to the home directory itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo_dir: Option<PathBuf>,

    /// File extension for new entries
    pub file_ext: String,

    /// Seconds between two notifier scans
    pub tick_secs: u64,

    /// Program run for each due entry, as `<cmd> <title> <text>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_command: Option<String>,

    pub rest_host: String,
    pub rest_port: u16,

    /// What to do with entry files that can not be read
    pub decode_policy: DecodePolicy,

    /// strftime pattern for due times in CLI output and notifications
    pub time_format: String,

    /// When set, the CLI talks to the REST API at this url instead of the
    /// local entries directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_base_url: Option<String>,

    pub remote_timeout_secs: u64,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            todo_dir: None,
            file_ext: DEFAULT_FILE_EXT.to_string(),
            tick_secs: 1,
            notification_command: None,
            rest_host: "0.0.0.0".to_string(),
            rest_port: 8080,
            decode_policy: DecodePolicy::Strict,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            remote_base_url: None,
            remote_timeout_secs: 10,
        }
    }
}

impl TodoConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TodoError::Io)?;
        let mut config: TodoConfig = serde_json::from_str(&content)
            .map_err(|e| TodoError::Config(format!("{}: {}", config_path.display(), e)))?;
        let ext = config.file_ext.clone();
        config.set_file_ext(&ext);
        if !is_valid_time_format(&config.time_format) {
            warn!(time_format = %config.time_format, "unusable time_format, using default");
            config.time_format = DEFAULT_TIME_FORMAT.to_string();
        }
        Ok(config)
    }

    /// Like [`TodoConfig::load`], but a broken config file only costs a warning.
    pub fn load_or_default<P: AsRef<Path>>(config_dir: P) -> Self {
        match Self::load(config_dir) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "no config loaded, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TodoError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TodoError::Config(e.to_string()))?;
        fs::write(config_path, content).map_err(TodoError::Io)?;
        Ok(())
    }

    /// Set the file extension (normalizes to start with a dot)
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }

    pub fn entries_dir(&self, home: &Path) -> PathBuf {
        self.todo_dir.clone().unwrap_or_else(|| home.to_path_buf())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs.max(1))
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs.max(1))
    }

    /// The configured remote url, if any. Blank values count as unset.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote_base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn rest_addr(&self) -> String {
        format!("{}:{}", self.rest_host, self.rest_port)
    }

    /// A file store over the configured entries directory.
    pub fn open_store(&self, home: &Path) -> FileStore {
        FileStore::new(self.entries_dir(home))
            .with_file_ext(&self.file_ext)
            .with_decode_policy(self.decode_policy)
    }
}
