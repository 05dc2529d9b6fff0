mod generation;
mod phone_number_status;

pub use generation::{Generation, SongReference};
pub use phone_number_status::PhoneNumberStatus;

/// A downloaded song file and its title.
#[derive(Debug, Clone)]
pub struct SongFile {
    pub song_file: bytes::Bytes,
    pub song_title: Option<String>,
}

/// An object found in the song bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub name: String,
}
