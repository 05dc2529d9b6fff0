//! Business rejections.
//!
//! Every validation step and gateway call in a handler resolves to either a
//! validated value or a `Rejection`. The `Display` text is what the caller
//! receives in the `{error}` body and what the error email carries.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    // Generation checks
    #[error("Invalid generation ID.")]
    MissingGenerationId,

    #[error("Could not pull the generation data from Supabase.")]
    GenerationNotFound,

    /// Launch-eligibility lookup failed; carries the underlying reason
    #[error("Error checking if a song generation exists: {0}")]
    EligibilityLookup(String),

    #[error("Invalid generation info: {0}")]
    MissingReplyRouting(String),

    #[error("This generation had a prior error.")]
    PriorError,

    #[error("This generation already has output data.")]
    OutputAlreadyPresent,

    #[error("This generation already has a lyrics video.")]
    LyricsVideoPresent,

    #[error("Checked the generation user ID but it was empty.")]
    MissingUser,

    #[error("Invalid output genre, output song title or output song lyrics.")]
    IncompleteOutput,

    #[error("Invalid song in output_song: {0}")]
    MissingSong(String),

    #[error("Could not find a song associated with the generation in the audio bucket.")]
    SongNotInBucket,

    #[error("There's no audio file at {0}.")]
    EmptySongFile(String),

    // Phone number checks
    #[error("Got a null phone number")]
    MissingPhoneNumber,

    #[error("Could not find the phone number on Supabase.")]
    PhoneNumberLookup,

    #[error("Null scraper/phone number data.")]
    PhoneNumberNotFound,

    #[error("The phone number already has an associated error.")]
    PhoneNumberErrored,

    #[error("Invalid Suno credits number.")]
    InsufficientCredits,

    // Runtime budget
    #[error("The max runtime is null.")]
    MissingRuntime,

    #[error("The max runtime for this call is smaller than or equal to the Fargate warmup time.")]
    RuntimeWithinWarmup,

    #[error("Invalid runtime for the scraper.")]
    RuntimeOutOfBounds,

    // Task launcher
    #[error("Failed to start the Fargate task.")]
    TaskNotStarted,

    #[error("ECS task not found.")]
    TaskNotFound,

    #[error("ECS task failed: {0}")]
    TaskFailed(String),

    /// Backend or launcher error forwarded verbatim
    #[error("{0}")]
    External(String),
}

impl Rejection {
    pub fn external(err: impl std::fmt::Display) -> Self {
        Rejection::External(err.to_string())
    }
}
