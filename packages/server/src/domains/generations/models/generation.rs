use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A song generation row as stored in the backend.
///
/// Column types vary across deployments (Discord snowflakes arrive as text
/// or numbers, the cover may be a URL or an object), so loosely typed
/// columns are kept as raw JSON and inspected through the helpers below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    #[serde(default)]
    pub generation_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub initial_reply_id: Option<Value>,
    #[serde(default)]
    pub replies_guild: Option<Value>,
    #[serde(default)]
    pub replies_channel_id: Option<Value>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub output_song: Option<Value>,
    #[serde(default)]
    pub song_output_genre: Option<String>,
    #[serde(default)]
    pub song_output_title: Option<String>,
    #[serde(default)]
    pub song_output_lyrics: Option<String>,
    #[serde(default)]
    pub song_output_cover: Option<Value>,
    #[serde(default)]
    pub song_output_lyrics_video: Option<Value>,
}

/// The playable song reference stored inside `output_song`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongReference {
    /// Object path of the audio file in the song bucket
    pub path: String,
    /// Search key for the object listing; falls back to the path
    pub search_key: String,
}

impl Generation {
    pub fn has_user(&self) -> bool {
        is_filled(&self.user_id)
    }

    /// Reply routing is what lets the bot post the finished song back.
    pub fn has_reply_routing(&self) -> bool {
        is_filled(&self.initial_reply_id)
            && is_filled(&self.replies_guild)
            && is_filled(&self.replies_channel_id)
    }

    pub fn has_prior_error(&self) -> bool {
        self.error_message.is_some()
    }

    /// Any of the song outputs written by a finished scrape.
    pub fn has_output(&self) -> bool {
        self.output_song.is_some()
            || self.song_output_genre.is_some()
            || self.song_output_title.is_some()
            || self.song_output_lyrics.is_some()
            || self.song_output_cover.is_some()
    }

    pub fn has_lyrics_video(&self) -> bool {
        self.song_output_lyrics_video.is_some()
    }

    /// Genre, title and lyrics are all non-empty.
    pub fn has_text_output(&self) -> bool {
        [
            &self.song_output_genre,
            &self.song_output_title,
            &self.song_output_lyrics,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }

    pub fn song_reference(&self) -> Option<SongReference> {
        let output = self.output_song.as_ref()?;
        let path = output
            .get("song")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())?;
        let search_key = output
            .get("song_key")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(path);

        Some(SongReference {
            path: path.to_string(),
            search_key: search_key.to_string(),
        })
    }
}

/// Present and not an empty string.
fn is_filled(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
