//! Typed client for the ClickMeeting REST API.
//!
//! # Overview
//! Manages conference rooms, sends invitations and registers participants.
//! Optional call arguments are expressed as ordered modifier lists that are
//! applied one by one to a flat parameter set, then sent as a query string
//! (reads) or a form-encoded body (writes).
//!
//! # Design
//! - `ClickMeetingClient` builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - `Transport` executes the round-trip; `UreqTransport` is the default.
//! - `Api` combines the two into one blocking call per operation and
//!   implements the `Client` trait.
//! - Vendor error bodies become `Error::Api`; unreadable replies stay
//!   `Error::Decode`.
//!
//! ```no_run
//! use clickmeeting_core::{AccessType, Api, Client, CreateRoomOption, NewRoom, RoomType};
//!
//! # fn main() -> clickmeeting_core::Result<()> {
//! let api = Api::new("my-api-key");
//! let room = api.create_room(
//!     &NewRoom {
//!         name: "Weekly sync".to_string(),
//!         room_type: RoomType::Meeting,
//!         permanent_room: false,
//!         access_type: AccessType::PasswordProtected,
//!     },
//!     &[CreateRoomOption::password("secret"), CreateRoomOption::lobby(true, "")],
//! )?;
//! println!("created room {}", room.id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod params;
pub mod transport;
pub mod types;

pub use api::{Api, Client};
pub use client::ClickMeetingClient;
pub use config::Config;
pub use error::{ApiError, Error, FieldError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::{
    CreateRoomOption, InvitationOption, InviteeRole, ParamOption, RegistrationOption,
    TemplateType, UpdateRoomOption,
};
pub use params::Params;
pub use transport::{Transport, UreqTransport};
pub use types::{
    AccessRoleHashes, AccessToken, AccessType, Attendee, NewParticipant, NewRoom, Participant,
    PdfSummary, RegistrationFields, Room, RoomSettings, RoomStatus, RoomType, Session,
    SessionSummary,
};
