//! Canned replies keyed by emotion label.

pub const HAPPY_REPLY: &str = "I'm glad to hear that!";
pub const SAD_REPLY: &str = "I'm here for you. It’s okay to feel sad sometimes.";
pub const ANGRY_REPLY: &str = "Take a deep breath. Want to talk about it?";
pub const NEUTRAL_REPLY: &str = "I see. Tell me more.";
pub const FALLBACK_REPLY: &str = "Thanks for sharing how you feel.";

/// Maps a label (any case) to its reply; unknown labels get [`FALLBACK_REPLY`].
pub fn generate_response(emotion: &str) -> &'static str {
    match emotion.to_lowercase().as_str() {
        "happy" => HAPPY_REPLY,
        "sad" => SAD_REPLY,
        "angry" => ANGRY_REPLY,
        "neutral" => NEUTRAL_REPLY,
        _ => FALLBACK_REPLY,
    }
}
