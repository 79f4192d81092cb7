use super::player::AudioPlayer;
use crate::config::SpeechConfig;
use crate::error::SpeechError;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Remove the markdown emphasis characters the voice would otherwise read out.
pub fn strip_markup(text: &str) -> String {
    text.replace(['*', '#', '_'], "")
}

/// Reads bot replies aloud through a text-to-speech HTTP service.
pub struct SpeechSynthesizer {
    client: reqwest::Client,
    config: SpeechConfig,
    api_key: Option<String>,
    player: Arc<dyn AudioPlayer>,
}

impl SpeechSynthesizer {
    pub fn new(config: SpeechConfig, player: Arc<dyn AudioPlayer>) -> Result<Self, SpeechError> {
        let api_key = config.resolved_api_key();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("audio/mpeg"));
        if let Some(ref key) = api_key {
            headers.insert(
                "xi-api-key",
                HeaderValue::from_str(key)
                    .map_err(|e| SpeechError::Config(format!("invalid API key header: {}", e)))?,
            );
        }

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            config,
            api_key,
            player,
        })
    }

    /// False when no usable API key is configured; `speak` is then a no-op.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }

    /// Fetch the audio for `text`. Returns `None` when synthesis is disabled
    /// or nothing speakable remains after stripping markup.
    pub async fn synthesize(&self, text: &str) -> Result<Option<Bytes>, SpeechError> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let clean = strip_markup(text);
        if clean.trim().is_empty() {
            return Ok(None);
        }

        let body = SynthesisRequest {
            text: &clean,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettings {
                stability: self.config.stability,
                similarity_boost: self.config.similarity_boost,
            },
        };

        let response = self.client.post(self.endpoint()).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(Some(response.bytes().await?))
    }

    /// Synthesize and play `text`, waiting for playback to finish.
    pub async fn speak_now(&self, text: &str) -> Result<(), SpeechError> {
        if let Some(audio) = self.synthesize(text).await? {
            self.player.play(audio).await?;
        }
        Ok(())
    }

    /// Fire-and-forget speech. Failures are logged and dropped. Returns the
    /// task handle, or `None` when synthesis is disabled.
    pub fn speak(self: &Arc<Self>, text: impl Into<String>) -> Option<JoinHandle<()>> {
        if !self.is_enabled() {
            return None;
        }

        let this = Arc::clone(self);
        let text = text.into();
        Some(tokio::spawn(async move {
            if let Err(e) = this.speak_now(&text).await {
                tracing::warn!(error = %e, "text-to-speech failed");
            }
        }))
    }
}
