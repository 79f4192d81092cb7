use crate::config::RecognitionConfig;
use crate::error::RecognitionError;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Notify;
use tokio::time::timeout;

/// Turns one spoken utterance into text.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// `Ok(None)` means the recognizer heard nothing usable.
    async fn recognize(&self, locale: &str) -> Result<Option<String>, RecognitionError>;
}

/// Runs an external transcription program and takes the first non-empty
/// line it prints as the transcript.
pub struct CommandRecognizer {
    command: Vec<String>,
    timeout_secs: u64,
}

impl CommandRecognizer {
    pub fn new(command: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            command,
            timeout_secs,
        }
    }

    /// `None` when no command is configured.
    pub fn from_config(config: &RecognitionConfig) -> Option<Self> {
        if config.command.is_empty() {
            None
        } else {
            Some(Self::new(config.command.clone(), config.timeout_secs))
        }
    }
}

#[async_trait]
impl Recognizer for CommandRecognizer {
    async fn recognize(&self, locale: &str) -> Result<Option<String>, RecognitionError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or(RecognitionError::Unavailable)?;
        let args: Vec<String> = args.iter().map(|a| a.replace("{locale}", locale)).collect();

        tracing::debug!(program = %program, locale, "starting speech recognition");

        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RecognitionError::Failed(format!("failed to start {}: {}", program, e)))?;

        let output = timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| RecognitionError::Timeout(self.timeout_secs))?
        .map_err(|e| RecognitionError::Failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Failed(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenState {
    Idle,
    Listening,
}

/// Mic button semantics: at most one recognition session at a time, which
/// can be cut short with [`SpeechInput::stop`].
pub struct SpeechInput {
    recognizer: Option<Arc<dyn Recognizer>>,
    locale: String,
    /// Stop signal of the running session; `None` while idle.
    session: Mutex<Option<Arc<Notify>>>,
}

impl SpeechInput {
    pub fn new(recognizer: Option<Arc<dyn Recognizer>>, locale: impl Into<String>) -> Self {
        Self {
            recognizer,
            locale: locale.into(),
            session: Mutex::new(None),
        }
    }

    pub fn from_config(config: &RecognitionConfig) -> Self {
        let recognizer = CommandRecognizer::from_config(config)
            .map(|r| Arc::new(r) as Arc<dyn Recognizer>);
        Self::new(recognizer, config.locale.clone())
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn state(&self) -> ListenState {
        match self.session.lock() {
            Ok(session) if session.is_some() => ListenState::Listening,
            _ => ListenState::Idle,
        }
    }

    fn finish(&self) {
        if let Ok(mut session) = self.session.lock() {
            *session = None;
        }
    }

    /// Listen for one utterance. Errors other than missing capability or a
    /// session already running are logged and reported as no transcript.
    pub async fn listen(&self) -> Result<Option<String>, RecognitionError> {
        let recognizer = self
            .recognizer
            .as_ref()
            .ok_or(RecognitionError::Unavailable)?;

        let stop = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| RecognitionError::Failed("recognizer state poisoned".to_string()))?;
            if session.is_some() {
                return Err(RecognitionError::AlreadyListening);
            }
            Arc::clone(session.insert(Arc::new(Notify::new())))
        };

        let outcome = tokio::select! {
            result = recognizer.recognize(&self.locale) => result,
            _ = stop.notified() => {
                tracing::debug!("speech recognition stopped");
                Ok(None)
            }
        };

        // A stop that raced the result dies with this session's signal.
        self.finish();

        match outcome {
            Ok(transcript) => Ok(transcript),
            Err(e) => {
                tracing::warn!(error = %e, "speech recognition failed");
                Ok(None)
            }
        }
    }

    /// End a running session without a transcript. No effect when idle.
    pub fn stop(&self) {
        if let Ok(session) = self.session.lock() {
            if let Some(stop) = session.as_ref() {
                stop.notify_one();
            }
        }
    }
}
