//! Records exchanged with the ClickMeeting API.
//!
//! # Design
//! Field names are the vendor's wire contract and are reproduced exactly,
//! including irregular ones (`name_url`, `embed_room_url`,
//! `phonegateway_enabled`). Response records default every field so a reply
//! that leaves something out still decodes, and timestamps are optional for
//! the same reason.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Decode a JSON `null` as the field's default value.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Required arguments for creating a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    /// Visible to attendees and part of the room URL.
    pub name: String,
    pub room_type: RoomType,
    /// `false` creates a one-time scheduled meeting, `true` an endless room.
    pub permanent_room: bool,
    pub access_type: AccessType,
}

/// A conference room as returned by the vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    #[serde(deserialize_with = "null_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(rename = "name_url", deserialize_with = "null_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_default")]
    pub room_url: String,
    #[serde(deserialize_with = "null_default")]
    pub embed_room_url: String,

    #[serde(deserialize_with = "null_default")]
    pub status: RoomStatus,
    #[serde(deserialize_with = "null_default")]
    pub access_type: AccessType,
    #[serde(deserialize_with = "null_default")]
    pub room_type: RoomType,

    pub updated_at: Option<DateTime<FixedOffset>>,

    #[serde(deserialize_with = "null_default")]
    pub lobby_enabled: bool,
    #[serde(deserialize_with = "null_default")]
    pub lobby_description: String,
    #[serde(deserialize_with = "null_default")]
    pub registration_enabled: i64,
    #[serde(deserialize_with = "null_default")]
    pub permanent_room: bool,

    #[serde(deserialize_with = "null_default")]
    pub room_pin: i64,
    #[serde(deserialize_with = "null_default")]
    pub phone_presenter_pin: i64,
    #[serde(deserialize_with = "null_default")]
    pub phone_listener_pin: i64,

    #[serde(deserialize_with = "null_default")]
    pub timezone: String,
    #[serde(deserialize_with = "null_default")]
    pub timezone_offset: i64,

    #[serde(deserialize_with = "null_default")]
    pub access_role_hashes: AccessRoleHashes,
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "null_default")]
    pub recorder_list: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub widgets_hash: String,
    #[serde(deserialize_with = "null_default")]
    pub settings: RoomSettings,
}

/// Per-role hashes used to build direct entry links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessRoleHashes {
    #[serde(deserialize_with = "null_default")]
    pub listener: String,
    #[serde(deserialize_with = "null_default")]
    pub presenter: String,
    #[serde(deserialize_with = "null_default")]
    pub host: String,
}

/// Feature switches of a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSettings {
    /// Display the conference on the personal page.
    #[serde(deserialize_with = "null_default")]
    pub show_on_personal_page: bool,
    #[serde(deserialize_with = "null_default")]
    pub thank_you_emails_enabled: bool,
    #[serde(deserialize_with = "null_default")]
    pub connection_tester_enabled: bool,
    #[serde(rename = "phonegateway_enabled", deserialize_with = "null_default")]
    pub phone_gateway_enabled: bool,
    #[serde(deserialize_with = "null_default")]
    pub recorder_autostart_enabled: bool,
    /// Invite option inside the conference room.
    #[serde(deserialize_with = "null_default")]
    pub room_invite_button_enabled: bool,
    #[serde(deserialize_with = "null_default")]
    pub social_media_sharing_enabled: bool,
    #[serde(deserialize_with = "null_default")]
    pub connection_status_enabled: bool,
    #[serde(deserialize_with = "null_default")]
    pub thank_you_page_url: String,
}

/// Admission policy of a room. Travels as an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccessType {
    #[default]
    Unknown,
    /// Not protected by password or token.
    Open,
    /// Access granted with a password provided in advance.
    PasswordProtected,
    /// Every invitee gets a single-use token.
    TokenProtected,
}

impl AccessType {
    pub fn code(self) -> u8 {
        match self {
            AccessType::Unknown => 0,
            AccessType::Open => 1,
            AccessType::PasswordProtected => 2,
            AccessType::TokenProtected => 3,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            1 => AccessType::Open,
            2 => AccessType::PasswordProtected,
            3 => AccessType::TokenProtected,
            _ => AccessType::Unknown,
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessType::Unknown => "UnknownType",
            AccessType::Open => "OpenType",
            AccessType::PasswordProtected => "PasswordProtected",
            AccessType::TokenProtected => "TokenProtected",
        };
        f.write_str(name)
    }
}

impl Serialize for AccessType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for AccessType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(AccessType::from_code)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    #[default]
    Meeting,
    Webinar,
}

impl RoomType {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Meeting => "meeting",
            RoomType::Webinar => "webinar",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room status, used both as a listing filter and as an update value.
///
/// Any status the vendor reports besides these two decodes as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Active,
    Inactive,
    #[serde(other)]
    Unknown,
}

impl RoomStatus {
    /// Value sent to the vendor.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Active => "active",
            // TODO: confirm with the vendor whether this should be "inactive".
            RoomStatus::Inactive => "active",
            RoomStatus::Unknown => "active",
        }
    }
}

impl Serialize for RoomStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single-use access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessToken {
    #[serde(deserialize_with = "null_default")]
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_to_email: Option<String>,
    #[serde(alias = "first_use_date", skip_serializing_if = "Option::is_none")]
    pub first_use_data: Option<DateTime<FixedOffset>>,
}

/// Required arguments for registering a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A registration entry of a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    pub registration_date: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "null_default")]
    pub registration_confirmed: String,
    #[serde(deserialize_with = "null_default")]
    pub fields: RegistrationFields,
    #[serde(deserialize_with = "null_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_default")]
    pub session_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
    #[serde(deserialize_with = "null_default")]
    pub visitor_nickname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationFields {
    #[serde(rename = "First Name", deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(rename = "Last Name", deserialize_with = "null_default")]
    pub last_name: String,
    #[serde(rename = "Email Address", deserialize_with = "null_default")]
    pub email_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSummary {
    #[serde(deserialize_with = "null_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_default")]
    pub total_visitors: i64,
    #[serde(deserialize_with = "null_default")]
    pub max_visitors: i64,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
}

/// One occurrence of a meeting, with its attendees and generated reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    #[serde(deserialize_with = "null_default")]
    pub max_visitors: i64,
    #[serde(deserialize_with = "null_default")]
    pub attendees: Vec<Attendee>,
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "null_default")]
    pub pdf: std::collections::BTreeMap<String, PdfSummary>,
    pub end_date: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "null_default")]
    pub total_visitors: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attendee {
    #[serde(deserialize_with = "null_default")]
    pub id: i64,
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
    pub end_date: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "null_default")]
    pub login: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSummary {
    #[serde(rename = "generate_pdf_url", deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub progress: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_decodes_vendor_field_names() {
        let json = r#"{
            "id": 42,
            "name": "Weekly sync",
            "name_url": "weekly-sync",
            "room_url": "https://acme.clickmeeting.com/weekly-sync",
            "embed_room_url": "https://embed.clickmeeting.com/weekly-sync",
            "status": "active",
            "access_type": 2,
            "room_type": "webinar",
            "updated_at": "2024-05-01T10:00:00+02:00",
            "lobby_enabled": true,
            "lobby_description": "Please wait",
            "permanent_room": false,
            "access_role_hashes": {"listener": "l1", "presenter": "p1", "host": "h1"},
            "settings": {"phonegateway_enabled": true, "thank_you_page_url": "https://acme.test/thanks"}
        }"#;

        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.id, 42);
        assert_eq!(room.slug, "weekly-sync");
        assert_eq!(room.embed_room_url, "https://embed.clickmeeting.com/weekly-sync");
        assert_eq!(room.access_type, AccessType::PasswordProtected);
        assert_eq!(room.room_type, RoomType::Webinar);
        assert!(room.lobby_enabled);
        assert_eq!(room.access_role_hashes.host, "h1");
        assert!(room.settings.phone_gateway_enabled);
        assert!(!room.settings.show_on_personal_page);
        assert_eq!(room.settings.thank_you_page_url, "https://acme.test/thanks");
        assert_eq!(
            room.updated_at.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+02:00"
        );
        assert!(room.created_at.is_none());
    }

    #[test]
    fn room_decodes_with_missing_fields() {
        let room: Room = serde_json::from_str(r#"{"id":7,"name":"X"}"#).unwrap();
        assert_eq!(room.id, 7);
        assert_eq!(room.name, "X");
        assert_eq!(room.access_type, AccessType::Unknown);
        assert!(room.recorder_list.is_empty());
    }

    #[test]
    fn unknown_access_type_code_decodes_to_unknown() {
        let room: Room = serde_json::from_str(r#"{"access_type":9}"#).unwrap();
        assert_eq!(room.access_type, AccessType::Unknown);
    }

    #[test]
    fn access_type_display_names() {
        assert_eq!(AccessType::Open.to_string(), "OpenType");
        assert_eq!(AccessType::PasswordProtected.to_string(), "PasswordProtected");
        assert_eq!(AccessType::TokenProtected.to_string(), "TokenProtected");
        assert_eq!(AccessType::Unknown.to_string(), "UnknownType");
    }

    #[test]
    fn both_room_statuses_send_active() {
        assert_eq!(RoomStatus::Active.as_str(), "active");
        assert_eq!(RoomStatus::Inactive.as_str(), "active");
        assert_eq!(RoomStatus::Unknown.as_str(), "active");
    }

    #[test]
    fn room_status_decodes_both_values() {
        let active: RoomStatus = serde_json::from_str(r#""active""#).unwrap();
        let inactive: RoomStatus = serde_json::from_str(r#""inactive""#).unwrap();
        assert_eq!(active, RoomStatus::Active);
        assert_eq!(inactive, RoomStatus::Inactive);
    }

    #[test]
    fn room_status_decodes_unlisted_values_as_unknown() {
        let status: RoomStatus = serde_json::from_str(r#""expired""#).unwrap();
        assert_eq!(status, RoomStatus::Unknown);

        let rooms: Vec<Room> =
            serde_json::from_str(r#"[{"id":1,"status":"expired"},{"id":2,"status":"active"}]"#)
                .unwrap();
        assert_eq!(rooms[0].status, RoomStatus::Unknown);
        assert_eq!(rooms[1].status, RoomStatus::Active);
    }

    #[test]
    fn room_decodes_null_fields_as_defaults() {
        let json = r#"{
            "id": 42,
            "name": "X",
            "lobby_description": null,
            "widgets_hash": null,
            "access_type": null,
            "status": null,
            "recorder_list": null,
            "access_role_hashes": {"listener": null, "host": "h1"},
            "settings": {"phonegateway_enabled": null, "thank_you_page_url": null},
            "updated_at": null
        }"#;

        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.id, 42);
        assert_eq!(room.lobby_description, "");
        assert_eq!(room.widgets_hash, "");
        assert_eq!(room.access_type, AccessType::Unknown);
        assert_eq!(room.status, RoomStatus::Active);
        assert!(room.recorder_list.is_empty());
        assert_eq!(room.access_role_hashes.host, "h1");
        assert!(!room.settings.phone_gateway_enabled);
        assert!(room.updated_at.is_none());
    }

    #[test]
    fn participant_and_session_decode_null_fields() {
        let participant: Participant = serde_json::from_str(
            r#"{"id":3,"email":null,"visitor_nickname":null,"fields":{"First Name":null}}"#,
        )
        .unwrap();
        assert_eq!(participant.id, 3);
        assert_eq!(participant.email, "");
        assert_eq!(participant.fields.first_name, "");

        let session: Session =
            serde_json::from_str(r#"{"attendees":null,"pdf":null,"total_visitors":null}"#).unwrap();
        assert!(session.attendees.is_empty());
        assert!(session.pdf.is_empty());
        assert_eq!(session.total_visitors, 0);
    }

    #[test]
    fn participant_decodes_spaced_field_names() {
        let json = r#"{
            "id": 3,
            "email": "jon@doe.com",
            "registration_confirmed": "1",
            "fields": {"First Name": "Jon", "Last Name": "Doe", "Email Address": "jon@doe.com"}
        }"#;
        let participant: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(participant.id, 3);
        assert_eq!(participant.fields.first_name, "Jon");
        assert_eq!(participant.fields.last_name, "Doe");
        assert_eq!(participant.fields.email_address, "jon@doe.com");
    }

    #[test]
    fn access_token_accepts_either_first_use_spelling() {
        let a: AccessToken =
            serde_json::from_str(r#"{"token":"T1","first_use_data":"2024-01-01T00:00:00Z"}"#).unwrap();
        let b: AccessToken =
            serde_json::from_str(r#"{"token":"T2","first_use_date":"2024-01-01T00:00:00Z"}"#).unwrap();
        assert!(a.first_use_data.is_some());
        assert!(b.first_use_data.is_some());
        assert!(a.sent_to_email.is_none());
    }

    #[test]
    fn session_decodes_pdf_map() {
        let json = r#"{
            "max_visitors": 4,
            "attendees": [{"id": 1, "email": "a@x.com", "login": "a"}],
            "pdf": {"en": {"generate_pdf_url": "https://pdf.test/1", "progress": 100}}
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.attendees.len(), 1);
        assert_eq!(session.pdf["en"].url, "https://pdf.test/1");
        assert_eq!(session.pdf["en"].progress, 100);
    }
}
