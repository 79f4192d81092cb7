use thiserror::Error;

/// Errors from talking to the chat endpoint.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("chat request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Errors from the text-to-speech service or the local audio player.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech synthesis failed (status {status}): {message}")]
    Status { status: u16, message: String },
    #[error("speech synthesis request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid speech configuration: {0}")]
    Config(String),
    #[error("audio playback failed: {0}")]
    Playback(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the speech recognizer.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("speech recognition is not available")]
    Unavailable,
    #[error("speech recognition is already listening")]
    AlreadyListening,
    #[error("speech recognition timed out after {0} seconds")]
    Timeout(u64),
    #[error("speech recognition failed: {0}")]
    Failed(String),
}

/// Login failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    LoginRejected,
}

/// Top-level error for the terminal front end.
#[derive(Debug, Error)]
pub enum OneCardError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Speech(#[from] SpeechError),
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("terminal error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OneCardError>;
