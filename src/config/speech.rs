use super::defaults::*;
use super::validation::expand_env_var_in_string;
use serde::{Deserialize, Serialize};

/// Text-to-speech settings. Without a usable `api_key` replies are not spoken.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_tts_base_url")]
    pub base_url: String,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    #[serde(default = "default_tts_model_id")]
    pub model_id: String,
    #[serde(default = "default_voice_stability")]
    pub stability: f32,
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,
    /// Player command line; the audio file path is appended as the last argument.
    #[serde(default = "default_player_command")]
    pub player: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tts_base_url(),
            voice_id: default_voice_id(),
            model_id: default_tts_model_id(),
            stability: default_voice_stability(),
            similarity_boost: default_similarity_boost(),
            player: default_player_command(),
        }
    }
}

impl SpeechConfig {
    /// The API key after `${VAR}` expansion, or `None` when it is missing,
    /// blank, still the placeholder, or references an unset variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        let key = expand_env_var_in_string(self.api_key.as_deref()?);
        let key = key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY || key.contains("${") {
            None
        } else {
            Some(key.to_string())
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecognitionConfig {
    /// Transcription command line. `{locale}` in any argument is replaced
    /// with `locale`. Recognition is unavailable when this is empty.
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_recognition_timeout")]
    pub timeout_secs: u64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            locale: default_locale(),
            timeout_secs: default_recognition_timeout(),
        }
    }
}
