use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main persona configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub paths: PathsConfig,
    pub agent: AgentConfig,
    pub status: StatusConfig,
}

/// Log verbosity used when RUST_LOG is not set
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Document and ledger locations, relative to the root unless absolute
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root every relative path resolves against
    pub root: Option<PathBuf>,
    pub personality: PathBuf,
    pub boundaries: PathBuf,
    /// Chat exchange ledger (JSONL)
    pub chat_history: PathBuf,
    /// Improvement memory ledger read by `status` (JSONL)
    pub memory: PathBuf,
}

/// External agent process
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Executable name or path
    pub program: String,
    /// Value passed to `--agent`
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Identity documents summarized, in display order
    pub documents: Vec<String>,
    /// Number of memory records shown
    pub recent: usize,
    /// Lines shown per document
    pub preview_lines: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: None,
            personality: PathBuf::from("PERSONALITY.md"),
            boundaries: PathBuf::from("BOUNDARIES.md"),
            chat_history: PathBuf::from("chat_history.jsonl"),
            memory: PathBuf::from("memory").join("improvement_history.jsonl"),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            program: "openclaw".to_string(),
            name: "self".to_string(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            documents: vec![
                "AGENT_IDENTITY.md".to_string(),
                "PERSONALITY.md".to_string(),
                "BOUNDARIES.md".to_string(),
            ],
            recent: 5,
            preview_lines: 5,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>, root: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::discover(config_path, root)?;

        // --root beats anything the file says
        if let Some(root) = root {
            config.paths.root = Some(root.clone());
        }

        Ok(config)
    }

    fn discover(config_path: Option<&PathBuf>, root: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check PERSONA_CONFIG env var
        if let Ok(env_path) = std::env::var("PERSONA_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from PERSONA_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try <root>/persona.yaml
        let root_dir = root.cloned().or_else(Self::env_root);
        if let Some(root_dir) = root_dir {
            let path = Self::expand_path(&root_dir).join("persona.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ~/.config/persona/persona.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("persona").join("persona.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./persona.yaml (for development)
        let local_config = PathBuf::from("persona.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn env_root() -> Option<PathBuf> {
        std::env::var("PERSONA_ROOT").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
    }

    /// The directory all relative document and ledger paths hang off
    pub fn root(&self) -> PathBuf {
        self.paths
            .root
            .clone()
            .or_else(Self::env_root)
            .map(|p| Self::expand_path(&p))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve a configured path against the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let expanded = Self::expand_path(path);
        if expanded.is_absolute() {
            expanded
        } else {
            self.root().join(expanded)
        }
    }

    pub fn personality_path(&self) -> PathBuf {
        self.resolve(&self.paths.personality)
    }

    pub fn boundaries_path(&self) -> PathBuf {
        self.resolve(&self.paths.boundaries)
    }

    pub fn chat_history_path(&self) -> PathBuf {
        self.resolve(&self.paths.chat_history)
    }

    pub fn memory_path(&self) -> PathBuf {
        self.resolve(&self.paths.memory)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
