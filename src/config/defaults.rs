pub const PLACEHOLDER_API_KEY: &str = "YOUR_KEY_HERE";

pub fn default_chat_endpoint() -> String {
    "http://localhost:8000/chat".to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_tts_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

pub fn default_voice_id() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

pub fn default_tts_model_id() -> String {
    "eleven_monolingual_v1".to_string()
}

pub fn default_voice_stability() -> f32 {
    0.5
}

pub fn default_similarity_boost() -> f32 {
    0.5
}

pub fn default_player_command() -> Vec<String> {
    ["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_locale() -> String {
    "en-US".to_string()
}

pub fn default_recognition_timeout() -> u64 {
    15
}

pub fn default_shared_secret() -> String {
    "1234".to_string()
}
