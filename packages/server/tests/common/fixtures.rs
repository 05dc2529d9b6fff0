//! Backend rows and task snapshots shared by the handler tests.

use serde_json::{json, Value};

pub const GENERATION_ID: &str = "c678a46c-fd62-45d2-b0c9-c08a3065a514";
pub const PHONE_NUMBER: &str = "+15555551234";
pub const TASK_ARN: &str =
    "arn:aws:ecs:us-east-1:123456789012:task/fargate-suno-scraper-cluster/tasknumber";

/// A generation that may be launched: routed, error-free, no output yet.
pub fn pending_generation() -> Value {
    json!({
        "generation_id": GENERATION_ID,
        "user_id": "user-1",
        "initial_reply_id": "1190000000000000000",
        "replies_guild": "1180000000000000000",
        "replies_channel_id": "1170000000000000000",
        "error_message": null,
        "output_song": null,
        "song_output_genre": null,
        "song_output_title": null,
        "song_output_lyrics": null,
        "song_output_cover": null,
        "song_output_lyrics_video": null
    })
}

/// A generation whose scrape wrote every output.
pub fn finished_generation() -> Value {
    json!({
        "generation_id": GENERATION_ID,
        "user_id": "user-1",
        "initial_reply_id": "1190000000000000000",
        "replies_guild": "1180000000000000000",
        "replies_channel_id": "1170000000000000000",
        "error_message": null,
        "output_song": { "song": "generations/night-drive.mp3", "song_key": "night-drive.mp3" },
        "song_output_genre": "synthwave",
        "song_output_title": "Night Drive",
        "song_output_lyrics": "neon lights",
        "song_output_cover": "generations/night-drive.png"
    })
}

pub fn usable_phone_number() -> Value {
    json!({
        "phone_number": PHONE_NUMBER,
        "latest_error": null,
        "remaining_credits": 500
    })
}

pub fn running_task() -> Value {
    json!({ "taskArn": TASK_ARN, "lastStatus": "RUNNING" })
}

pub fn stopped_task(stop_code: &str, exit_code: i32, reason: &str) -> Value {
    json!({
        "taskArn": TASK_ARN,
        "lastStatus": "STOPPED",
        "stopCode": stop_code,
        "stoppedReason": reason,
        "containers": [{ "name": "fargate-suno-scraper-container", "exitCode": exit_code }]
    })
}
