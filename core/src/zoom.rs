//! Zoom meeting records. The upstream meeting API already returns flat
//! shapes, so normalization here is direct field mapping — the only rules
//! worth noting are which fields are genuinely required (a meeting without
//! an id, topic, start time, or duration is unusable) and the fixed
//! defaults baked into meeting creation.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Error;
use crate::extract::str_at;

fn i64_at(raw: &Value, key: &str) -> Option<i64> {
    raw.get(key).and_then(Value::as_i64)
}

fn required_i64(raw: &Value, entity: &'static str, field: &'static str) -> Result<i64, Error> {
    i64_at(raw, field).ok_or(Error::MissingField { entity, field })
}

fn required_str(raw: &Value, entity: &'static str, field: &'static str) -> Result<String, Error> {
    str_at(raw, &[field]).ok_or(Error::MissingField { entity, field })
}

fn opt_string_vec(raw: &Value, key: &str) -> Option<Vec<String>> {
    raw.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub topic: String,
    pub start_time: String,
    pub duration: i64,
    pub timezone: String,
    pub join_url: Option<String>,
    pub start_url: Option<String>,
    pub password: Option<String>,
    pub agenda: Option<String>,
    pub status: Option<String>,
    pub host_email: Option<String>,
}

impl Meeting {
    /// Unlike the management records, meetings are rejected outright when
    /// the identity fields are absent — there is nothing useful to display
    /// without them.
    pub fn from_raw(raw: &Value) -> Result<Self, Error> {
        Ok(Self {
            id: required_i64(raw, "meeting", "id")?,
            topic: required_str(raw, "meeting", "topic")?,
            start_time: required_str(raw, "meeting", "start_time")?,
            duration: required_i64(raw, "meeting", "duration")?,
            timezone: str_at(raw, &["timezone"]).unwrap_or_else(|| "UTC".to_string()),
            join_url: str_at(raw, &["join_url"]),
            start_url: str_at(raw, &["start_url"]),
            password: str_at(raw, &["password"]),
            agenda: str_at(raw, &["agenda"]),
            status: str_at(raw, &["status"]),
            host_email: str_at(raw, &["host_email"]),
        })
    }
}

/// Input for creating a meeting. Never returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingCreate {
    pub topic: String,
    /// ISO-8601 local start time.
    pub start_time: String,
    pub duration: i64,
    pub timezone: String,
    pub agenda: Option<String>,
    pub waiting_room: bool,
    /// "cloud", "local", or "none".
    pub auto_recording: String,
}

impl MeetingCreate {
    pub fn new(topic: impl Into<String>, start_time: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            start_time: start_time.into(),
            duration: 45,
            timezone: "America/New_York".to_string(),
            agenda: None,
            waiting_room: true,
            auto_recording: "cloud".to_string(),
        }
    }

    /// Request body for ZOOM_CREATE_A_MEETING. `host_video`,
    /// `participant_video`, and `mute_upon_entry` are fixed, not inputs;
    /// meeting type 2 = scheduled.
    pub fn to_action_params(&self) -> Value {
        let mut params = json!({
            "userId": "me",
            "topic": self.topic,
            "type": 2,
            "start_time": self.start_time,
            "duration": self.duration,
            "timezone": self.timezone,
            "settings": {
                "host_video": true,
                "participant_video": true,
                "waiting_room": self.waiting_room,
                "auto_recording": self.auto_recording,
                "mute_upon_entry": true,
            },
        });
        if let Some(agenda) = &self.agenda {
            params["agenda"] = json!(agenda);
        }
        params
    }
}

/// Partial meeting update. `None` fields are left untouched and omitted
/// from the request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingUpdate {
    pub topic: Option<String>,
    pub start_time: Option<String>,
    pub duration: Option<i64>,
    pub agenda: Option<String>,
}

impl MeetingUpdate {
    pub fn to_action_params(&self, meeting_id: i64) -> Value {
        let mut params = json!({"meetingId": meeting_id, "type": 2});
        if let Some(topic) = &self.topic {
            params["topic"] = json!(topic);
        }
        if let Some(start_time) = &self.start_time {
            params["start_time"] = json!(start_time);
        }
        if let Some(duration) = self.duration {
            params["duration"] = json!(duration);
        }
        if let Some(agenda) = &self.agenda {
            params["agenda"] = json!(agenda);
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registrant {
    pub registrant_id: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub join_url: Option<String>,
}

impl Registrant {
    /// The registration response echoes little back; identity fields come
    /// from the caller's own input.
    pub fn from_raw(raw: &Value, email: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            registrant_id: str_at(raw, &["registrant_id", "id"]),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            join_url: str_at(raw, &["join_url"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingFile {
    pub id: String,
    pub file_type: String,
    pub file_size: i64,
    pub download_url: Option<String>,
    pub play_url: Option<String>,
    pub status: Option<String>,
}

impl RecordingFile {
    pub fn from_raw(raw: &Value) -> Result<Self, Error> {
        Ok(Self {
            id: required_str(raw, "recording file", "id")?,
            file_type: required_str(raw, "recording file", "file_type")?,
            file_size: i64_at(raw, "file_size").unwrap_or(0),
            download_url: str_at(raw, &["download_url"]),
            play_url: str_at(raw, &["play_url"]),
            status: str_at(raw, &["status"]),
        })
    }
}

/// A meeting's cloud recording. Files have no identity beyond their parent
/// meeting; the listing endpoint returns none of them (see
/// [`Recording::from_list_raw`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub meeting_id: i64,
    pub topic: String,
    pub start_time: String,
    pub duration: i64,
    pub share_url: Option<String>,
    pub password: Option<String>,
    pub files: Vec<RecordingFile>,
}

impl Recording {
    /// ZOOM_LIST_ALL_RECORDINGS omits file metadata entirely; `files` is
    /// always empty here and a follow-up `get_recording` call fills it.
    /// A deliberate two-step protocol, not an omission.
    pub fn from_list_raw(raw: &Value) -> Result<Self, Error> {
        Ok(Self {
            meeting_id: required_i64(raw, "recording", "id")?,
            topic: required_str(raw, "recording", "topic")?,
            start_time: required_str(raw, "recording", "start_time")?,
            duration: i64_at(raw, "duration").unwrap_or(0),
            share_url: None,
            password: None,
            files: Vec::new(),
        })
    }

    pub fn from_detail_raw(raw: &Value) -> Result<Self, Error> {
        let files = raw
            .get("recording_files")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(RecordingFile::from_raw).collect())
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            meeting_id: required_i64(raw, "recording", "id")?,
            topic: required_str(raw, "recording", "topic")?,
            start_time: required_str(raw, "recording", "start_time")?,
            duration: i64_at(raw, "duration").unwrap_or(0),
            share_url: str_at(raw, &["share_url"]),
            password: str_at(raw, &["password"]),
            files,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: Option<String>,
    pub email: Option<String>,
    pub join_time: Option<String>,
    pub leave_time: Option<String>,
    pub duration: Option<i64>,
}

impl Participant {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            name: str_at(raw, &["name"]),
            email: str_at(raw, &["user_email"]),
            join_time: str_at(raw, &["join_time"]),
            leave_time: str_at(raw, &["leave_time"]),
            duration: i64_at(raw, "duration"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub meeting_id: i64,
    pub summary: Option<String>,
    pub next_steps: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
}

impl MeetingSummary {
    pub fn from_raw(meeting_id: i64, raw: &Value) -> Self {
        Self {
            meeting_id,
            summary: str_at(raw, &["summary"]),
            next_steps: opt_string_vec(raw, "next_steps"),
            topics: opt_string_vec(raw, "topics"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_params_always_fix_video_and_mute_settings() {
        let mut input = MeetingCreate::new("Demo", "2026-02-15T10:00:00");
        input.waiting_room = false;
        input.auto_recording = "none".to_string();
        let params = input.to_action_params();

        let settings = &params["settings"];
        assert_eq!(settings["host_video"], json!(true));
        assert_eq!(settings["participant_video"], json!(true));
        assert_eq!(settings["mute_upon_entry"], json!(true));
        // Configurable settings pass through.
        assert_eq!(settings["waiting_room"], json!(false));
        assert_eq!(settings["auto_recording"], json!("none"));
        assert_eq!(params["type"], json!(2));
        assert_eq!(params["userId"], json!("me"));
        assert!(params.get("agenda").is_none());
    }

    #[test]
    fn create_params_include_agenda_when_present() {
        let mut input = MeetingCreate::new("Demo", "2026-02-15T10:00:00");
        input.agenda = Some("quarterly sync".to_string());
        assert_eq!(input.to_action_params()["agenda"], json!("quarterly sync"));
    }

    #[test]
    fn update_params_carry_only_set_fields() {
        let update = MeetingUpdate {
            topic: Some("Renamed".to_string()),
            duration: Some(60),
            ..MeetingUpdate::default()
        };
        let params = update.to_action_params(77);
        assert_eq!(params["meetingId"], json!(77));
        assert_eq!(params["type"], json!(2));
        assert_eq!(params["topic"], json!("Renamed"));
        assert_eq!(params["duration"], json!(60));
        assert!(params.get("start_time").is_none());
        assert!(params.get("agenda").is_none());
    }

    #[test]
    fn meeting_requires_identity_fields() {
        let raw = json!({
            "id": 91,
            "topic": "Sync",
            "start_time": "2026-02-15T10:00:00Z",
            "duration": 30
        });
        let meeting = Meeting::from_raw(&raw).unwrap();
        assert_eq!(meeting.id, 91);
        assert_eq!(meeting.timezone, "UTC");

        let missing = json!({"id": 91, "topic": "Sync", "duration": 30});
        match Meeting::from_raw(&missing) {
            Err(Error::MissingField { entity, field }) => {
                assert_eq!(entity, "meeting");
                assert_eq!(field, "start_time");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn list_recordings_records_have_empty_files() {
        let raw = json!({
            "id": 42,
            "topic": "Sync",
            "start_time": "2026-02-15T10:00:00Z",
            "duration": 30
        });
        let recording = Recording::from_list_raw(&raw).unwrap();
        assert!(recording.files.is_empty());
        assert_eq!(recording.share_url, None);
    }

    #[test]
    fn recording_detail_populates_files() {
        let raw = json!({
            "id": 42,
            "topic": "Sync",
            "start_time": "2026-02-15T10:00:00Z",
            "duration": 30,
            "share_url": "https://zoom.us/rec/42",
            "recording_files": [
                {"id": "f1", "file_type": "MP4", "file_size": 1048576},
                {"id": "f2", "file_type": "TRANSCRIPT"}
            ]
        });
        let recording = Recording::from_detail_raw(&raw).unwrap();
        assert_eq!(recording.files.len(), 2);
        assert_eq!(recording.files[0].file_size, 1048576);
        assert_eq!(recording.files[1].file_size, 0);
        assert_eq!(recording.share_url.as_deref(), Some("https://zoom.us/rec/42"));
    }

    #[test]
    fn participant_maps_user_email_key() {
        let raw = json!({"name": "Ada", "user_email": "ada@example.com", "duration": 120});
        let p = Participant::from_raw(&raw);
        assert_eq!(p.email.as_deref(), Some("ada@example.com"));
        assert_eq!(p.duration, Some(120));
    }

    #[test]
    fn summary_collects_string_lists() {
        let raw = json!({
            "summary": "Went well",
            "next_steps": ["ship it", 7, "tell people"],
            "topics": []
        });
        let summary = MeetingSummary::from_raw(9, &raw);
        assert_eq!(summary.meeting_id, 9);
        assert_eq!(
            summary.next_steps,
            Some(vec!["ship it".to_string(), "tell people".to_string()])
        );
        assert_eq!(summary.topics, Some(vec![]));
    }
}
