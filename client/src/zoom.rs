//! Zoom operations via Composio actions, bound to one connected account.

use composio_core::Error;
use composio_core::zoom::{
    Meeting, MeetingCreate, MeetingSummary, MeetingUpdate, Participant, Recording, Registrant,
};
use serde_json::{Value, json};

use crate::ComposioClient;
use crate::credentials::{resolve_api_key, resolve_zoom_account};
use crate::envelope::unwrap_data;

/// Zoom client using Composio as the OAuth/API layer.
pub struct ZoomClient {
    manage: ComposioClient,
    connected_account_id: String,
}

impl ZoomClient {
    pub fn new(manage: ComposioClient, connected_account_id: impl Into<String>) -> Self {
        Self {
            manage,
            connected_account_id: connected_account_id.into(),
        }
    }

    /// Build from `COMPOSIO_API_KEY` and `ZOOM_CONNECTED_ACCOUNT_ID`, with
    /// credential-store fallback for both.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(
            ComposioClient::new(resolve_api_key()?)?,
            resolve_zoom_account()?,
        ))
    }

    async fn execute(&self, action: &str, params: Value) -> Result<Value, Error> {
        let raw = self
            .manage
            .execute_action(action, &self.connected_account_id, params)
            .await?;
        Ok(unwrap_data(raw))
    }

    fn meeting_array(data: &Value) -> Vec<Value> {
        data.get("meetings")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    /// List meetings of one type: "upcoming", "scheduled", "live", or
    /// "pending".
    pub async fn list_meetings(&self, meeting_type: &str) -> Result<Vec<Meeting>, Error> {
        let data = self
            .execute(
                "ZOOM_LIST_MEETINGS",
                json!({"userId": "me", "type": meeting_type}),
            )
            .await?;
        Self::meeting_array(&data)
            .iter()
            .map(Meeting::from_raw)
            .collect()
    }

    pub async fn create_meeting(&self, input: &MeetingCreate) -> Result<Meeting, Error> {
        let data = self
            .execute("ZOOM_CREATE_A_MEETING", input.to_action_params())
            .await?;
        let mut meeting = Meeting::from_raw(&data)?;
        if data.get("timezone").is_none() {
            meeting.timezone = input.timezone.clone();
        }
        Ok(meeting)
    }

    pub async fn get_meeting(&self, meeting_id: i64) -> Result<Meeting, Error> {
        let data = self
            .execute("ZOOM_GET_A_MEETING", json!({"meetingId": meeting_id}))
            .await?;
        Meeting::from_raw(&data)
    }

    pub async fn update_meeting(
        &self,
        meeting_id: i64,
        update: &MeetingUpdate,
    ) -> Result<(), Error> {
        self.execute("ZOOM_UPDATE_A_MEETING", update.to_action_params(meeting_id))
            .await?;
        Ok(())
    }

    pub async fn delete_meeting(&self, meeting_id: i64) -> Result<(), Error> {
        self.execute("ZOOM_DELETE_A_MEETING", json!({"meetingId": meeting_id}))
            .await?;
        Ok(())
    }

    pub async fn add_registrant(
        &self,
        meeting_id: i64,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Registrant, Error> {
        let data = self
            .execute(
                "ZOOM_ADD_A_MEETING_REGISTRANT",
                json!({
                    "meetingId": meeting_id,
                    "email": email,
                    "first_name": first_name,
                    "last_name": last_name,
                }),
            )
            .await?;
        Ok(Registrant::from_raw(&data, email, first_name, last_name))
    }

    /// List cloud recordings in a date range. The listing carries no file
    /// metadata; call [`get_recording`](Self::get_recording) per meeting
    /// for the files.
    pub async fn list_recordings(
        &self,
        from_date: &str,
        to_date: Option<&str>,
    ) -> Result<Vec<Recording>, Error> {
        let mut params = json!({"userId": "me", "from": from_date});
        if let Some(to_date) = to_date {
            params["to"] = json!(to_date);
        }
        let data = self.execute("ZOOM_LIST_ALL_RECORDINGS", params).await?;
        Self::meeting_array(&data)
            .iter()
            .map(Recording::from_list_raw)
            .collect()
    }

    pub async fn get_recording(&self, meeting_id: i64) -> Result<Recording, Error> {
        let data = self
            .execute(
                "ZOOM_GET_MEETING_RECORDINGS",
                json!({"meetingId": meeting_id}),
            )
            .await?;
        Recording::from_detail_raw(&data)
    }

    pub async fn get_participants(&self, meeting_id: i64) -> Result<Vec<Participant>, Error> {
        let data = self
            .execute(
                "ZOOM_GET_PAST_MEETING_PARTICIPANTS",
                json!({"meetingId": meeting_id}),
            )
            .await?;
        Ok(data
            .get("participants")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Participant::from_raw).collect())
            .unwrap_or_default())
    }

    pub async fn get_meeting_summary(&self, meeting_id: i64) -> Result<MeetingSummary, Error> {
        let data = self
            .execute(
                "ZOOM_GET_A_MEETING_SUMMARY",
                json!({"meetingId": meeting_id}),
            )
            .await?;
        Ok(MeetingSummary::from_raw(meeting_id, &data))
    }
}
