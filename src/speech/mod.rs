pub mod player;
pub mod recognition;
pub mod synthesis;

pub use player::{AudioPlayer, CommandPlayer};
pub use recognition::{CommandRecognizer, ListenState, Recognizer, SpeechInput};
pub use synthesis::{strip_markup, SpeechSynthesizer};
