use crate::error::SpeechError;
use async_trait::async_trait;
use bytes::Bytes;
use std::process::Stdio;
use tokio::process::Command;
use uuid::Uuid;

/// Plays one synthesized clip to completion.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, audio: Bytes) -> Result<(), SpeechError>;
}

/// Writes the clip to a temp file and hands it to an external player such as
/// `ffplay`, `mpv` or `afplay`.
pub struct CommandPlayer {
    command: Vec<String>,
}

impl CommandPlayer {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, audio: Bytes) -> Result<(), SpeechError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| SpeechError::Config("no audio player configured".to_string()))?;

        let path = std::env::temp_dir().join(format!("onecard-{}.mp3", Uuid::new_v4()));
        tokio::fs::write(&path, &audio).await?;
        tracing::debug!(player = %program, file = %path.display(), bytes = audio.len(), "playing reply audio");

        let status = Command::new(program)
            .args(args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::debug!(error = %e, "failed to remove temp audio file");
        }

        let status = status
            .map_err(|e| SpeechError::Playback(format!("failed to start {}: {}", program, e)))?;
        if !status.success() {
            return Err(SpeechError::Playback(format!(
                "{} exited with {}",
                program, status
            )));
        }
        Ok(())
    }
}
