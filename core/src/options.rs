//! Optional modifiers for room, invitation and registration calls.
//!
//! Each operation accepts a slice of modifiers of its own category. They are
//! applied one after another against the same [`Params`], in the order the
//! caller wrote them, and a later modifier touching the same field wins.
//! Because some modifiers write more than one field (`UpdateRoomOption::Password`
//! also forces the access type), reordering a list can change the outcome.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::params::{duration as encode_duration, flag, key, Params};
use crate::types::{AccessType, RoomSettings, RoomStatus, RoomType};

/// Something that writes fields into an outgoing parameter set.
pub trait ParamOption {
    fn apply(&self, params: &mut Params);
}

/// Apply `options` in order.
pub fn apply_all<O: ParamOption>(params: &mut Params, options: &[O]) {
    for option in options {
        option.apply(params);
    }
}

/// Modifiers accepted by `create_room`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateRoomOption {
    Settings(RoomSettings),
    /// A blank description is not sent at all.
    Lobby { enabled: bool, description: String },
    /// Enables registration; `template` must be 1 to 3 when given.
    Registration { template: Option<u8> },
    Duration(Duration),
    Password(String),
}

impl CreateRoomOption {
    pub fn settings(settings: RoomSettings) -> Self {
        CreateRoomOption::Settings(settings)
    }

    pub fn lobby(enabled: bool, description: impl Into<String>) -> Self {
        CreateRoomOption::Lobby {
            enabled,
            description: description.into(),
        }
    }

    pub fn registration() -> Self {
        CreateRoomOption::Registration { template: None }
    }

    pub fn registration_with_template(template: u8) -> Self {
        CreateRoomOption::Registration {
            template: Some(template),
        }
    }

    pub fn duration(duration: Duration) -> Self {
        CreateRoomOption::Duration(duration)
    }

    pub fn password(password: impl Into<String>) -> Self {
        CreateRoomOption::Password(password.into())
    }
}

impl ParamOption for CreateRoomOption {
    fn apply(&self, params: &mut Params) {
        match self {
            CreateRoomOption::Settings(settings) => apply_settings(params, settings),
            CreateRoomOption::Lobby {
                enabled,
                description,
            } => {
                params.set("lobby_enabled", flag(*enabled));
                if !description.is_empty() {
                    params.set("lobby_description", description.as_str());
                }
            }
            CreateRoomOption::Registration { template } => {
                params.set(key::nested("registration", "enabled"), "1");
                if let Some(template) = template {
                    params.set(key::nested("registration", "template"), template.to_string());
                }
            }
            CreateRoomOption::Duration(duration) => {
                params.set("duration", encode_duration(*duration));
            }
            CreateRoomOption::Password(password) => params.set("password", password.as_str()),
        }
    }
}

fn apply_settings(params: &mut Params, settings: &RoomSettings) {
    let flags = [
        ("show_on_personal_page", settings.show_on_personal_page),
        ("thank_you_emails_enabled", settings.thank_you_emails_enabled),
        ("connection_tester_enabled", settings.connection_tester_enabled),
        ("phonegateway_enabled", settings.phone_gateway_enabled),
        ("recorder_autostart_enabled", settings.recorder_autostart_enabled),
        ("room_invite_button_enabled", settings.room_invite_button_enabled),
        ("social_media_sharing_enabled", settings.social_media_sharing_enabled),
        ("connection_status_enabled", settings.connection_status_enabled),
    ];
    for (name, value) in flags {
        params.set(key::nested("settings", name), flag(value));
    }
    params.set(
        key::nested("settings", "thank_you_page_url"),
        settings.thank_you_page_url.as_str(),
    );
}

/// Modifiers accepted by `update_room`. Only the fields they name are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRoomOption {
    Name(String),
    RoomType(RoomType),
    Permanence(bool),
    AccessType(AccessType),
    Lobby { enabled: bool, description: String },
    Duration(Duration),
    StartsAt(DateTime<FixedOffset>),
    /// Also switches the room to [`AccessType::PasswordProtected`].
    Password(String),
    Status(RoomStatus),
    Settings(RoomSettings),
}

impl UpdateRoomOption {
    pub fn name(name: impl Into<String>) -> Self {
        UpdateRoomOption::Name(name.into())
    }

    pub fn lobby(enabled: bool, description: impl Into<String>) -> Self {
        UpdateRoomOption::Lobby {
            enabled,
            description: description.into(),
        }
    }

    pub fn starts_at(at: impl Into<DateTime<FixedOffset>>) -> Self {
        UpdateRoomOption::StartsAt(at.into())
    }

    pub fn password(password: impl Into<String>) -> Self {
        UpdateRoomOption::Password(password.into())
    }
}

impl ParamOption for UpdateRoomOption {
    fn apply(&self, params: &mut Params) {
        match self {
            UpdateRoomOption::Name(name) => params.set("name", name.as_str()),
            UpdateRoomOption::RoomType(room_type) => params.set("room_type", room_type.as_str()),
            UpdateRoomOption::Permanence(permanent) => {
                params.set("permanent_room", flag(*permanent));
            }
            UpdateRoomOption::AccessType(access_type) => {
                params.set("access_type", access_type.code().to_string());
            }
            UpdateRoomOption::Lobby {
                enabled,
                description,
            } => CreateRoomOption::Lobby {
                enabled: *enabled,
                description: description.clone(),
            }
            .apply(params),
            UpdateRoomOption::Duration(duration) => {
                CreateRoomOption::Duration(*duration).apply(params);
            }
            UpdateRoomOption::StartsAt(at) => {
                params.set("starts_at", at.to_rfc3339_opts(SecondsFormat::Secs, true));
            }
            UpdateRoomOption::Password(password) => {
                UpdateRoomOption::AccessType(AccessType::PasswordProtected).apply(params);
                params.set("password", password.as_str());
            }
            UpdateRoomOption::Status(status) => params.set("status", status.as_str()),
            UpdateRoomOption::Settings(settings) => apply_settings(params, settings),
        }
    }
}

/// Invitation e-mail template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    Advanced,
    Basic,
}

impl TemplateType {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateType::Advanced => "advanced",
            TemplateType::Basic => "basic",
        }
    }
}

/// Role the invitee joins with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteeRole {
    Listener,
    Presenter,
}

impl InviteeRole {
    pub fn as_str(self) -> &'static str {
        match self {
            InviteeRole::Listener => "listener",
            InviteeRole::Presenter => "presenter",
        }
    }
}

/// Modifiers accepted by `send_invitation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationOption {
    Template(TemplateType),
    Role(InviteeRole),
}

impl ParamOption for InvitationOption {
    fn apply(&self, params: &mut Params) {
        match self {
            InvitationOption::Template(template) => params.set("template", template.as_str()),
            InvitationOption::Role(role) => params.set("role", role.as_str()),
        }
    }
}

/// Modifiers accepted by `register_participant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOption {
    /// Send a confirmation e-mail in `language`.
    EmailConfirmation { language: String },
}

impl RegistrationOption {
    pub fn email_confirmation(language: impl Into<String>) -> Self {
        RegistrationOption::EmailConfirmation {
            language: language.into(),
        }
    }
}

impl ParamOption for RegistrationOption {
    fn apply(&self, params: &mut Params) {
        match self {
            RegistrationOption::EmailConfirmation { language } => {
                params.set(key::nested("confirmation_email", "enabled"), "1");
                params.set(key::nested("confirmation_email", "lang"), language.as_str());
            }
        }
    }
}
