mod api;
mod defaults;
mod speech;
mod validation;

use crate::cli::Args;
use crate::models::ThemeMode;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::ApiConfig;
pub use defaults::PLACEHOLDER_API_KEY;
pub use speech::{RecognitionConfig, SpeechConfig};
pub use validation::expand_env_var_in_string;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "defaults::default_shared_secret")]
    pub secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: defaults::default_shared_secret(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Contents of a `.onecard.yaml` / `.onecard.json` file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub speech: SpeechConfig,
    pub speech_enabled: bool,
    pub recognition: RecognitionConfig,
    pub shared_secret: String,
    pub theme: ThemeMode,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::resolve(file_config, args, |key| env::var(key).ok())
    }

    /// Merge the layers: CLI args > environment > config file > defaults.
    pub fn resolve<F>(file_config: FileConfig, args: &Args, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let FileConfig {
            mut api,
            mut speech,
            recognition,
            auth,
            ui,
        } = file_config;

        // Chat endpoint: CLI args > env var > file
        if let Some(endpoint) = args
            .api_endpoint
            .clone()
            .or_else(|| env("ONECARD_API_URL"))
        {
            api.endpoint = endpoint;
        }
        if api.endpoint.trim().is_empty() {
            return Err(anyhow!("chat endpoint must not be empty"));
        }

        if let Some(timeout) = env("ONECARD_TIMEOUT").and_then(|s| s.parse::<u64>().ok()) {
            api.timeout_secs = timeout;
        }

        if let Some(key) = env("ELEVEN_LABS_API_KEY") {
            speech.api_key = Some(key);
        }
        if let Some(voice_id) = env("ELEVEN_LABS_VOICE_ID") {
            speech.voice_id = voice_id;
        }

        let shared_secret = env("ONECARD_SECRET").unwrap_or(auth.secret);

        let theme = match args
            .theme
            .clone()
            .or_else(|| env("ONECARD_THEME"))
            .or(ui.theme)
        {
            Some(theme) => theme.parse::<ThemeMode>().map_err(|e| anyhow!(e))?,
            None => ThemeMode::default(),
        };

        let verbose = args.verbose
            || env("ONECARD_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(ui.verbose)
                .unwrap_or(false);

        Ok(Config {
            api,
            speech,
            speech_enabled: !args.no_speech,
            recognition,
            shared_secret,
            theme,
            verbose,
        })
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        if matches!(extension, Some("yaml") | Some("yml")) {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
        }
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".onecard.yaml"),
            PathBuf::from(".onecard.yml"),
            PathBuf::from(".onecard.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("onecard");
            paths.push(config_dir.join("onecard.yaml"));
            paths.push(config_dir.join("onecard.yml"));
            paths.push(config_dir.join("onecard.json"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(FileConfig::default(), &Args::default(), no_env).unwrap();
        assert_eq!(config.api.endpoint, "http://localhost:8000/chat");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.shared_secret, "1234");
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.speech.voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(config.recognition.locale, "en-US");
        assert!(config.speech_enabled);
        assert!(!config.verbose);
    }

    #[test]
    fn test_precedence_args_over_env_over_file() {
        let mut file = FileConfig::default();
        file.api.endpoint = "http://file/chat".to_string();
        file.ui.theme = Some("dark".to_string());

        let vars: HashMap<&str, &str> = [
            ("ONECARD_API_URL", "http://env/chat"),
            ("ONECARD_THEME", "light"),
        ]
        .into_iter()
        .collect();
        let env = |k: &str| vars.get(k).map(|v| v.to_string());

        let config = Config::resolve(file.clone(), &Args::default(), &env).unwrap();
        assert_eq!(config.api.endpoint, "http://env/chat");
        assert_eq!(config.theme, ThemeMode::Light);

        let args = Args {
            api_endpoint: Some("http://cli/chat".to_string()),
            theme: Some("dark".to_string()),
            no_speech: true,
            ..Args::default()
        };
        let config = Config::resolve(file, &args, &env).unwrap();
        assert_eq!(config.api.endpoint, "http://cli/chat");
        assert_eq!(config.theme, ThemeMode::Dark);
        assert!(!config.speech_enabled);
    }

    #[test]
    fn test_invalid_theme_is_rejected() {
        let args = Args {
            theme: Some("neon".to_string()),
            ..Args::default()
        };
        assert!(Config::resolve(FileConfig::default(), &args, no_env).is_err());
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".onecard.yaml");
        fs::write(
            &path,
            "api:\n  endpoint: http://bank.local/chat\nspeech:\n  api_key: abc\n  stability: 0.8\nrecognition:\n  command: [\"transcribe\", \"--lang\", \"{locale}\"]\n",
        )
        .unwrap();

        let config = FileConfig::load_from(&path).unwrap();
        assert_eq!(config.api.endpoint, "http://bank.local/chat");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.speech.api_key.as_deref(), Some("abc"));
        assert_eq!(config.speech.stability, 0.8);
        assert_eq!(config.speech.similarity_boost, 0.5);
        assert_eq!(config.recognition.command.len(), 3);
    }

    #[test]
    fn test_load_json_file_and_reject_garbage() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".onecard.json");
        fs::write(&path, r#"{"auth": {"secret": "s3cret"}, "ui": {"theme": "dark"}}"#).unwrap();
        let config = FileConfig::load_from(&path).unwrap();
        assert_eq!(config.auth.secret, "s3cret");
        assert_eq!(config.ui.theme.as_deref(), Some("dark"));

        fs::write(&path, "{not json").unwrap();
        assert!(FileConfig::load_from(&path).is_err());
    }
}
