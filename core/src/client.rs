//! Stateless request builder and response parser for the ClickMeeting API.
//!
//! # Design
//! `ClickMeetingClient` holds the API key and base URL and never changes
//! after construction. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; [`Api`](crate::Api) glues the two together through a
//! [`Transport`](crate::Transport).
//!
//! Every URL is `base + resource path + ".json"`. Reads carry the parameter
//! set in the query string, writes carry it as a form-encoded body.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{
    apply_all, CreateRoomOption, InvitationOption, RegistrationOption, UpdateRoomOption,
};
use crate::params::{flag, key, Params};
use crate::types::{NewParticipant, NewRoom, Participant, Room, RoomStatus};

pub const API_KEY_HEADER: &str = "X-Api-Key";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds vendor requests and decodes vendor replies without doing any I/O.
#[derive(Clone)]
pub struct ClickMeetingClient {
    api_key: String,
    base_url: String,
}

impl ClickMeetingClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}.json", self.base_url)
    }

    fn read(&self, path: &str, params: &Params) -> HttpRequest {
        let mut url = self.url(path);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.encode());
        }
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![(API_KEY_HEADER.to_string(), self.api_key.clone())],
            body: None,
        }
    }

    fn write(&self, method: HttpMethod, path: &str, params: &Params) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(path),
            headers: vec![
                (API_KEY_HEADER.to_string(), self.api_key.clone()),
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(params.encode()),
        }
    }

    pub fn build_list_rooms(&self, status: RoomStatus) -> HttpRequest {
        self.read(&format!("conferences/{}", status.as_str()), &Params::new())
    }

    pub fn build_create_room(&self, room: &NewRoom, options: &[CreateRoomOption]) -> HttpRequest {
        let mut params = Params::new();
        params.set("name", room.name.as_str());
        params.set("room_type", room.room_type.as_str());
        params.set("permanent_room", flag(room.permanent_room));
        params.set("access_type", room.access_type.code().to_string());
        apply_all(&mut params, options);
        self.write(HttpMethod::Post, "conferences", &params)
    }

    pub fn build_update_room(&self, room_id: i64, options: &[UpdateRoomOption]) -> HttpRequest {
        let mut params = Params::new();
        apply_all(&mut params, options);
        self.write(HttpMethod::Put, &format!("conferences/{room_id}"), &params)
    }

    pub fn build_delete_room(&self, room_id: i64) -> HttpRequest {
        self.write(HttpMethod::Delete, &format!("conferences/{room_id}"), &Params::new())
    }

    pub fn build_send_invitation(
        &self,
        room_id: i64,
        language: &str,
        attendees: &[String],
        options: &[InvitationOption],
    ) -> HttpRequest {
        let mut params = Params::new();
        let attendee_key = key::repeated("attendees", "email");
        for email in attendees {
            params.append(attendee_key.as_str(), email.as_str());
        }
        apply_all(&mut params, options);
        self.write(
            HttpMethod::Post,
            &format!("conferences/{room_id}/invitation/email/{language}"),
            &params,
        )
    }

    pub fn build_register_participant(
        &self,
        room_id: i64,
        participant: &NewParticipant,
        options: &[RegistrationOption],
    ) -> HttpRequest {
        let mut params = Params::new();
        // The vendor only accepts positional keys here.
        params.set(key::indexed("registration", 1), participant.first_name.as_str());
        params.set(key::indexed("registration", 2), participant.last_name.as_str());
        params.set(key::indexed("registration", 3), participant.email.as_str());
        apply_all(&mut params, options);
        self.write(
            HttpMethod::Post,
            &format!("conferences/{room_id}/registration"),
            &params,
        )
    }

    pub fn build_get_registrations(&self, room_id: i64, status: &str) -> HttpRequest {
        self.read(
            &format!("conferences/{room_id}/registrations/{status}"),
            &Params::new(),
        )
    }

    pub fn parse_list_rooms(&self, response: HttpResponse) -> Result<Vec<Room>> {
        decode(response)
    }

    pub fn parse_create_room(&self, response: HttpResponse) -> Result<Room> {
        decode::<CreatedRoom>(response).map(|envelope| envelope.room)
    }

    pub fn parse_update_room(&self, response: HttpResponse) -> Result<Room> {
        decode::<UpdatedRoom>(response).map(|envelope| envelope.conference)
    }

    pub fn parse_delete_room(&self, response: HttpResponse) -> Result<()> {
        decode::<DeleteResult>(response).map(|_| ())
    }

    pub fn parse_send_invitation(&self, response: HttpResponse) -> Result<()> {
        decode::<IgnoredAny>(response).map(|_| ())
    }

    /// Returns the confirmation URL of the new registration.
    pub fn parse_register_participant(&self, response: HttpResponse) -> Result<String> {
        decode::<Registration>(response).map(|registration| registration.url)
    }

    pub fn parse_get_registrations(&self, response: HttpResponse) -> Result<Vec<Participant>> {
        decode(response)
    }
}

impl std::fmt::Debug for ClickMeetingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickMeetingClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// `create` answers with the room under `room`.
#[derive(Deserialize)]
struct CreatedRoom {
    room: Room,
}

/// `update` answers with the same record under `conference`.
#[derive(Deserialize)]
struct UpdatedRoom {
    conference: Room,
}

#[derive(Deserialize)]
struct DeleteResult {
    #[allow(dead_code)]
    result: String,
}

#[derive(Deserialize)]
struct Registration {
    #[allow(dead_code)]
    #[serde(default)]
    status: String,
    url: String,
}

/// Decode a 200/201 body as `T`, anything else as [`ApiError`].
///
/// An error body that does not decode is reported as the decode failure
/// itself rather than as an API error.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    if response.is_success() {
        return Ok(serde_json::from_str(&response.body)?);
    }
    let err: ApiError = serde_json::from_str(&response.body)?;
    Err(err.into())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::Error;
    use crate::options::{InviteeRole, TemplateType};
    use crate::types::{AccessType, RoomType};

    fn client() -> ClickMeetingClient {
        ClickMeetingClient::new(&Config::new("test-key"))
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn form(req: &HttpRequest) -> Vec<(String, String)> {
        url::form_urlencoded::parse(req.body.as_deref().unwrap().as_bytes())
            .into_owned()
            .collect()
    }

    fn new_room() -> NewRoom {
        NewRoom {
            name: "Weekly sync".to_string(),
            room_type: RoomType::Meeting,
            permanent_room: false,
            access_type: AccessType::Open,
        }
    }

    #[test]
    fn build_list_rooms_produces_correct_request() {
        let req = client().build_list_rooms(RoomStatus::Active);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.clickmeeting.com/v1/conferences/active.json");
        assert_eq!(req.header("x-api-key"), Some("test-key"));
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let a = ClickMeetingClient::new(&Config::new("k").with_base_url("http://localhost:3000/v1"));
        let b = ClickMeetingClient::new(&Config::new("k").with_base_url("http://localhost:3000/v1/"));
        assert_eq!(a.build_delete_room(1).url, "http://localhost:3000/v1/conferences/1.json");
        assert_eq!(a.build_delete_room(1).url, b.build_delete_room(1).url);
    }

    #[test]
    fn build_create_room_always_sends_required_fields() {
        let req = client().build_create_room(&new_room(), &[]);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://api.clickmeeting.com/v1/conferences.json");
        assert_eq!(req.header("content-type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(
            form(&req),
            vec![
                ("name".to_string(), "Weekly sync".to_string()),
                ("room_type".to_string(), "meeting".to_string()),
                ("permanent_room".to_string(), "0".to_string()),
                ("access_type".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn build_create_room_applies_options_after_required_fields() {
        let req = client().build_create_room(
            &new_room(),
            &[
                CreateRoomOption::duration(Duration::from_secs(3 * 3600)),
                CreateRoomOption::lobby(true, ""),
                CreateRoomOption::password("secret"),
            ],
        );
        let pairs = form(&req);
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["name", "room_type", "permanent_room", "access_type", "duration", "lobby_enabled", "password"]
        );
        assert_eq!(pairs[4].1, "3:0");
    }

    #[test]
    fn build_update_room_sends_only_modifiers() {
        let req = client().build_update_room(
            42,
            &[UpdateRoomOption::name("Renamed"), UpdateRoomOption::Permanence(true)],
        );
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "https://api.clickmeeting.com/v1/conferences/42.json");
        assert_eq!(
            form(&req),
            vec![
                ("name".to_string(), "Renamed".to_string()),
                ("permanent_room".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn build_delete_room_produces_correct_request() {
        let req = client().build_delete_room(42);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "https://api.clickmeeting.com/v1/conferences/42.json");
        assert_eq!(req.body.as_deref(), Some(""));
    }

    #[test]
    fn build_send_invitation_repeats_attendee_key() {
        let attendees = vec!["a@x.com".to_string(), "b@y.com".to_string()];
        let req = client().build_send_invitation(
            7,
            "en",
            &attendees,
            &[
                InvitationOption::Role(InviteeRole::Listener),
                InvitationOption::Template(TemplateType::Basic),
            ],
        );
        assert_eq!(
            req.url,
            "https://api.clickmeeting.com/v1/conferences/7/invitation/email/en.json"
        );
        assert_eq!(
            form(&req),
            vec![
                ("attendees[][email]".to_string(), "a@x.com".to_string()),
                ("attendees[][email]".to_string(), "b@y.com".to_string()),
                ("role".to_string(), "listener".to_string()),
                ("template".to_string(), "basic".to_string()),
            ]
        );
    }

    #[test]
    fn build_register_participant_uses_positional_keys() {
        let participant = NewParticipant {
            first_name: "Jon".to_string(),
            last_name: "Doe".to_string(),
            email: "jon@doe.com".to_string(),
        };
        let req = client().build_register_participant(
            7,
            &participant,
            &[RegistrationOption::email_confirmation("en")],
        );
        assert_eq!(req.url, "https://api.clickmeeting.com/v1/conferences/7/registration.json");
        assert_eq!(
            form(&req),
            vec![
                ("registration[1]".to_string(), "Jon".to_string()),
                ("registration[2]".to_string(), "Doe".to_string()),
                ("registration[3]".to_string(), "jon@doe.com".to_string()),
                ("confirmation_email[enabled]".to_string(), "1".to_string()),
                ("confirmation_email[lang]".to_string(), "en".to_string()),
            ]
        );
    }

    #[test]
    fn build_get_registrations_produces_correct_request() {
        let req = client().build_get_registrations(7, "all");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.clickmeeting.com/v1/conferences/7/registrations/all.json");
    }

    #[test]
    fn parse_create_room_unwraps_room_envelope() {
        let room = client()
            .parse_create_room(response(201, r#"{"room":{"id":42,"name":"X"}}"#))
            .unwrap();
        assert_eq!(room.id, 42);
        assert_eq!(room.name, "X");
    }

    #[test]
    fn parse_create_room_tolerates_null_fields() {
        let body = r#"{"room":{"id":42,"name":"X","lobby_description":null,"widgets_hash":null}}"#;
        let room = client().parse_create_room(response(201, body)).unwrap();
        assert_eq!(room.id, 42);
        assert_eq!(room.lobby_description, "");
        assert_eq!(room.widgets_hash, "");
    }

    #[test]
    fn parse_list_rooms_keeps_rooms_with_unlisted_status() {
        let rooms = client()
            .parse_list_rooms(response(200, r#"[{"id":1,"status":"expired"}]"#))
            .unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].status, RoomStatus::Unknown);
    }

    #[test]
    fn parse_update_room_unwraps_conference_envelope() {
        let room = client()
            .parse_update_room(response(200, r#"{"conference":{"id":42,"name":"Renamed"}}"#))
            .unwrap();
        assert_eq!(room.name, "Renamed");

        let err = client()
            .parse_update_room(response(200, r#"{"room":{"id":42}}"#))
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn parse_create_room_api_error() {
        let body = r#"{"code":4000,"name":"bad_request","errors":[{"name":"password","message":"too short"}]}"#;
        let err = client().parse_create_room(response(400, body)).unwrap_err();
        assert!(err.is_api_error());
        assert_eq!(err.to_string(), "4000-bad_request: too short");
    }

    #[test]
    fn undecodable_error_body_is_a_decode_error() {
        let err = client()
            .parse_list_rooms(response(502, "<html>Bad Gateway</html>"))
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(!err.is_api_error());
    }

    #[test]
    fn parse_list_rooms_bad_json() {
        let err = client().parse_list_rooms(response(200, "not json")).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn parse_delete_room_requires_result_field() {
        assert!(client().parse_delete_room(response(200, r#"{"result":"OK"}"#)).is_ok());
        let err = client().parse_delete_room(response(200, "{}")).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn parse_send_invitation_accepts_any_json() {
        assert!(client().parse_send_invitation(response(200, r#"{"status":"OK"}"#)).is_ok());
        assert!(client().parse_send_invitation(response(200, "[]")).is_ok());
    }

    #[test]
    fn parse_register_participant_returns_url() {
        let url = client()
            .parse_register_participant(response(
                201,
                r#"{"status":"OK","url":"https://acme.clickmeeting.com/r/abc"}"#,
            ))
            .unwrap();
        assert_eq!(url, "https://acme.clickmeeting.com/r/abc");
    }

    #[test]
    fn status_other_than_200_or_201_is_an_error() {
        let err = client()
            .parse_list_rooms(response(204, r#"{"code":204,"name":"no_content"}"#))
            .unwrap_err();
        assert!(err.is_api_error());
    }

    #[test]
    fn debug_hides_api_key() {
        assert!(!format!("{:?}", client()).contains("test-key"));
    }
}
