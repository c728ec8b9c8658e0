use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of moods a journal entry can carry.
///
/// Serialized with the camelCase keys the mobile client has always stored
/// (`"veryHappy"`, `"verySad"`, ...).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum MoodKey {
    VeryHappy,
    Happy,
    Content,
    #[default]
    Neutral,
    Anxious,
    Angry,
    Sad,
    VerySad,
    Overwhelmed,
    Tired,
    Hopeful,
}

impl MoodKey {
    pub const ALL: [MoodKey; 11] = [
        MoodKey::VeryHappy,
        MoodKey::Happy,
        MoodKey::Content,
        MoodKey::Neutral,
        MoodKey::Anxious,
        MoodKey::Angry,
        MoodKey::Sad,
        MoodKey::VerySad,
        MoodKey::Overwhelmed,
        MoodKey::Tired,
        MoodKey::Hopeful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodKey::VeryHappy => "veryHappy",
            MoodKey::Happy => "happy",
            MoodKey::Content => "content",
            MoodKey::Neutral => "neutral",
            MoodKey::Anxious => "anxious",
            MoodKey::Angry => "angry",
            MoodKey::Sad => "sad",
            MoodKey::VerySad => "verySad",
            MoodKey::Overwhelmed => "overwhelmed",
            MoodKey::Tired => "tired",
            MoodKey::Hopeful => "hopeful",
        }
    }

    /// Exact lookup by stored key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == key)
    }

    /// Lenient lookup used when reading decrypted payloads: anything outside
    /// the set reads as [`MoodKey::Neutral`].
    pub fn from_key_or_neutral(key: &str) -> Self {
        Self::from_key(key).unwrap_or_default()
    }
}

impl fmt::Display for MoodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| format!("unknown mood \"{s}\""))
    }
}
