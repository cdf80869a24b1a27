use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "BoardConfig::default_height")]
    pub height: usize,
    #[serde(default = "BoardConfig::default_width")]
    pub width: usize,
}

impl BoardConfig {
    fn default_height() -> usize {
        100
    }
    fn default_width() -> usize {
        100
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            height: Self::default_height(),
            width: Self::default_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// External automaton engine binary.
    #[serde(default = "EngineConfig::default_command")]
    pub command: String,
    /// Per-run timeout before a hung engine process is killed.
    #[serde(default = "EngineConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory for per-worker input/output scratch files.
    #[serde(default = "EngineConfig::default_scratch_dir")]
    pub scratch_dir: String,
}

impl EngineConfig {
    fn default_command() -> String {
        "life".to_string()
    }
    fn default_timeout_secs() -> u64 {
        600
    }
    fn default_scratch_dir() -> String {
        "artifacts".to_string()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: Self::default_command(),
            timeout_secs: Self::default_timeout_secs(),
            scratch_dir: Self::default_scratch_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum engine processes in flight at once.
    #[serde(default = "DispatchConfig::default_concurrency")]
    pub concurrency: usize,
}

impl DispatchConfig {
    fn default_concurrency() -> usize {
        24
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: Self::default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "SweepConfig::default_trials")]
    pub trials: usize,
    #[serde(default = "SweepConfig::default_generations")]
    pub generations: u32,
}

impl SweepConfig {
    fn default_trials() -> usize {
        50
    }
    fn default_generations() -> u32 {
        1000
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            trials: Self::default_trials(),
            generations: Self::default_generations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl AppConfig {
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    eprintln!("Failed to write default config to {path}: {err}");
                }
            }
            Err(_) => {
                eprintln!("Failed to serialize default config; continuing with defaults");
            }
        }
        default_cfg
    }
}
