//! Blocking gateway: one vendor round-trip per call.

use tracing::debug;

use crate::client::ClickMeetingClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::options::{CreateRoomOption, InvitationOption, RegistrationOption, UpdateRoomOption};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    AccessToken, NewParticipant, NewRoom, Participant, Room, RoomStatus, Session, SessionSummary,
};

/// Every operation of the ClickMeeting API.
///
/// [`Api`] is the implementation; code that only needs the operations can
/// take a `&dyn Client` and be handed a stand-in.
pub trait Client {
    fn list_rooms(&self, status: RoomStatus) -> Result<Vec<Room>>;
    fn create_room(&self, room: &NewRoom, options: &[CreateRoomOption]) -> Result<Room>;
    /// Only the fields named by `options` change.
    fn update_room(&self, room_id: i64, options: &[UpdateRoomOption]) -> Result<Room>;
    fn delete_room(&self, room_id: i64) -> Result<()>;
    fn get_sessions(&self, room_id: i64) -> Result<Vec<SessionSummary>>;
    fn get_session(&self, room_id: i64, session_id: i64) -> Result<Session>;
    fn generate_access_tokens(&self, room_id: i64, how_many: u32) -> Result<Vec<AccessToken>>;
    fn get_access_tokens(&self, room_id: i64) -> Result<Vec<AccessToken>>;
    fn auto_login_hash(&self, room_id: i64) -> Result<String>;
    /// Email an invitation to every address in `attendees`.
    fn send_invitation(
        &self,
        room_id: i64,
        language: &str,
        attendees: &[String],
        options: &[InvitationOption],
    ) -> Result<()>;
    /// Registrations of a room filtered by `status` (e.g. `"all"`, `"active"`).
    fn get_registrations(&self, room_id: i64, status: &str) -> Result<Vec<Participant>>;
    /// Register a participant and return the confirmation URL.
    fn register_participant(
        &self,
        room_id: i64,
        participant: &NewParticipant,
        options: &[RegistrationOption],
    ) -> Result<String>;
    fn get_participants(&self, room_id: i64, session_id: i64) -> Result<Vec<Participant>>;
}

/// Blocking [`Client`] over a [`Transport`].
///
/// Holds no mutable state, so a single value can serve concurrent callers
/// when the transport allows it.
#[derive(Debug, Clone)]
pub struct Api<T = UreqTransport> {
    client: ClickMeetingClient,
    transport: T,
}

impl Api<UreqTransport> {
    /// Client for the public vendor endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(Config::new(api_key))
    }

    pub fn from_config(config: Config) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> Api<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            client: ClickMeetingClient::new(&config),
            transport,
        }
    }

    pub fn client(&self) -> &ClickMeetingClient {
        &self.client
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

impl<T: Transport> Client for Api<T> {
    fn list_rooms(&self, status: RoomStatus) -> Result<Vec<Room>> {
        let response = self.send(self.client.build_list_rooms(status))?;
        self.client.parse_list_rooms(response)
    }

    fn create_room(&self, room: &NewRoom, options: &[CreateRoomOption]) -> Result<Room> {
        let response = self.send(self.client.build_create_room(room, options))?;
        self.client.parse_create_room(response)
    }

    fn update_room(&self, room_id: i64, options: &[UpdateRoomOption]) -> Result<Room> {
        let response = self.send(self.client.build_update_room(room_id, options))?;
        self.client.parse_update_room(response)
    }

    fn delete_room(&self, room_id: i64) -> Result<()> {
        let response = self.send(self.client.build_delete_room(room_id))?;
        self.client.parse_delete_room(response)
    }

    fn get_sessions(&self, _room_id: i64) -> Result<Vec<SessionSummary>> {
        Err(Error::NotImplemented("get_sessions"))
    }

    fn get_session(&self, _room_id: i64, _session_id: i64) -> Result<Session> {
        Err(Error::NotImplemented("get_session"))
    }

    fn generate_access_tokens(&self, _room_id: i64, _how_many: u32) -> Result<Vec<AccessToken>> {
        Err(Error::NotImplemented("generate_access_tokens"))
    }

    fn get_access_tokens(&self, _room_id: i64) -> Result<Vec<AccessToken>> {
        Err(Error::NotImplemented("get_access_tokens"))
    }

    fn auto_login_hash(&self, _room_id: i64) -> Result<String> {
        Err(Error::NotImplemented("auto_login_hash"))
    }

    fn send_invitation(
        &self,
        room_id: i64,
        language: &str,
        attendees: &[String],
        options: &[InvitationOption],
    ) -> Result<()> {
        let request = self
            .client
            .build_send_invitation(room_id, language, attendees, options);
        let response = self.send(request)?;
        self.client.parse_send_invitation(response)
    }

    fn get_registrations(&self, room_id: i64, status: &str) -> Result<Vec<Participant>> {
        let response = self.send(self.client.build_get_registrations(room_id, status))?;
        self.client.parse_get_registrations(response)
    }

    fn register_participant(
        &self,
        room_id: i64,
        participant: &NewParticipant,
        options: &[RegistrationOption],
    ) -> Result<String> {
        let request = self
            .client
            .build_register_participant(room_id, participant, options);
        let response = self.send(request)?;
        self.client.parse_register_participant(response)
    }

    fn get_participants(&self, _room_id: i64, _session_id: i64) -> Result<Vec<Participant>> {
        Err(Error::NotImplemented("get_participants"))
    }
}
