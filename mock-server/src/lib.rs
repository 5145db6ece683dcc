//! In-memory stand-in for the ClickMeeting v1 API.
//!
//! Serves the endpoints the client uses under `/v1`, requires an
//! `X-Api-Key` header, reads form-encoded bodies and answers with vendor
//! shaped JSON, including `{code, name, errors}` error bodies.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub name_url: String,
    pub room_url: String,
    pub embed_room_url: String,
    pub status: String,
    pub access_type: i64,
    pub room_type: String,
    pub permanent_room: bool,
    pub lobby_enabled: bool,
    pub lobby_description: String,
    pub registration_enabled: i64,
    pub duration: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub settings: HashMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub email: String,
    pub registration_confirmed: String,
    pub registration_date: DateTime<Utc>,
    pub fields: HashMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invitation {
    pub room_id: i64,
    pub language: String,
    pub emails: Vec<String>,
    pub role: Option<String>,
    pub template: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub name: String,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub name: String,
    pub message: String,
}

#[derive(Default)]
pub struct Store {
    pub rooms: HashMap<i64, Room>,
    pub registrations: HashMap<i64, Vec<Registration>>,
    pub invitations: Vec<Invitation>,
}

#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    next_id: Arc<AtomicI64>,
}

impl AppState {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

type Fields = Form<Vec<(String, String)>>;

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/v1/conferences.json", post(create_room))
        .route(
            "/v1/conferences/{id}",
            get(list_rooms).put(update_room).delete(delete_room),
        )
        .route(
            "/v1/conferences/{id}/invitation/email/{language}",
            post(send_invitation),
        )
        .route("/v1/conferences/{id}/registration.json", post(register))
        .route(
            "/v1/conferences/{id}/registrations/{status}",
            get(list_registrations),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, field: &str, message: &str) -> Response {
    let errors = if field.is_empty() {
        Vec::new()
    } else {
        vec![FieldError {
            name: field.to_string(),
            message: message.to_string(),
        }]
    };
    let body = ErrorBody {
        code: status.as_u16(),
        name: status
            .canonical_reason()
            .unwrap_or("error")
            .to_lowercase()
            .replace(' ', "_"),
        errors,
    };
    (status, Json(body)).into_response()
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(error(StatusCode::UNAUTHORIZED, "", "")),
    }
}

/// Strip the `.json` suffix from the last path segment.
fn resource(segment: &str) -> Option<&str> {
    segment.strip_suffix(".json")
}

fn room_id(segment: &str) -> Result<i64, Response> {
    resource(segment)
        .unwrap_or(segment)
        .parse()
        .map_err(|_| error(StatusCode::NOT_FOUND, "id", "unknown conference"))
}

fn field<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn apply_fields(room: &mut Room, fields: &[(String, String)]) -> Result<(), Response> {
    for (name, value) in fields {
        match name.as_str() {
            "name" => room.name = value.clone(),
            "room_type" => room.room_type = value.clone(),
            "permanent_room" => room.permanent_room = value == "1",
            "access_type" => {
                room.access_type = value
                    .parse()
                    .map_err(|_| error(StatusCode::BAD_REQUEST, "access_type", "invalid value"))?;
            }
            "lobby_enabled" => room.lobby_enabled = value == "1",
            "lobby_description" => room.lobby_description = value.clone(),
            "registration[enabled]" => room.registration_enabled = 1,
            "duration" => room.duration = value.clone(),
            "status" => room.status = value.clone(),
            "starts_at" => {
                let at = DateTime::parse_from_rfc3339(value)
                    .map_err(|_| error(StatusCode::BAD_REQUEST, "starts_at", "invalid date"))?;
                room.starts_at = Some(at.with_timezone(&Utc));
            }
            other => {
                if let Some(setting) = other
                    .strip_prefix("settings[")
                    .and_then(|s| s.strip_suffix(']'))
                {
                    let value = match value.as_str() {
                        "1" => serde_json::Value::Bool(true),
                        "0" => serde_json::Value::Bool(false),
                        text => serde_json::Value::String(text.to_string()),
                    };
                    room.settings.insert(setting.to_string(), value);
                }
            }
        }
    }
    if room.access_type == 2 && field(fields, "password").is_some_and(|p| p.len() < 4) {
        return Err(error(StatusCode::BAD_REQUEST, "password", "too short"));
    }
    Ok(())
}

async fn list_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(segment): Path<String>,
) -> Response {
    if let Err(resp) = authorize(&headers) {
        return resp;
    }
    let Some(status) = resource(&segment) else {
        return error(StatusCode::NOT_FOUND, "", "");
    };
    let store = state.store.read().await;
    let mut rooms: Vec<Room> = store
        .rooms
        .values()
        .filter(|room| room.status == status)
        .cloned()
        .collect();
    rooms.sort_by_key(|room| room.id);
    Json(rooms).into_response()
}

async fn create_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(fields): Fields,
) -> Response {
    if let Err(resp) = authorize(&headers) {
        return resp;
    }
    let name = field(&fields, "name").unwrap_or_default();
    if name.is_empty() {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "name", "is required");
    }

    let id = state.next_id();
    let now = Utc::now();
    let slug = name.to_lowercase().replace(' ', "-");
    let mut room = Room {
        id,
        name_url: slug.clone(),
        room_url: format!("https://mock.clickmeeting.test/{slug}"),
        embed_room_url: format!("https://mock.clickmeeting.test/embed/{slug}"),
        status: "active".to_string(),
        created_at: now,
        updated_at: now,
        ..Room::default()
    };
    if let Err(resp) = apply_fields(&mut room, &fields) {
        return resp;
    }

    debug!(id, name = %room.name, "created room");
    state.store.write().await.rooms.insert(id, room.clone());
    (StatusCode::CREATED, Json(serde_json::json!({ "room": room }))).into_response()
}

async fn update_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(segment): Path<String>,
    Form(fields): Fields,
) -> Response {
    if let Err(resp) = authorize(&headers) {
        return resp;
    }
    let id = match room_id(&segment) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let mut store = state.store.write().await;
    let Some(room) = store.rooms.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "id", "unknown conference");
    };
    let mut updated = room.clone();
    if let Err(resp) = apply_fields(&mut updated, &fields) {
        return resp;
    }
    updated.updated_at = Utc::now();
    *room = updated.clone();
    Json(serde_json::json!({ "conference": updated })).into_response()
}

async fn delete_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(segment): Path<String>,
) -> Response {
    if let Err(resp) = authorize(&headers) {
        return resp;
    }
    let id = match room_id(&segment) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let mut store = state.store.write().await;
    match store.rooms.remove(&id) {
        Some(_) => {
            store.registrations.remove(&id);
            Json(serde_json::json!({ "result": "OK" })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "id", "unknown conference"),
    }
}

async fn send_invitation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, language)): Path<(i64, String)>,
    Form(fields): Fields,
) -> Response {
    if let Err(resp) = authorize(&headers) {
        return resp;
    }
    let Some(language) = resource(&language) else {
        return error(StatusCode::NOT_FOUND, "", "");
    };
    let mut store = state.store.write().await;
    if !store.rooms.contains_key(&id) {
        return error(StatusCode::NOT_FOUND, "id", "unknown conference");
    }
    let emails: Vec<String> = fields
        .iter()
        .filter(|(k, _)| k == "attendees[][email]")
        .map(|(_, v)| v.clone())
        .collect();
    if emails.is_empty() {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "attendees", "at least one attendee is required");
    }
    store.invitations.push(Invitation {
        room_id: id,
        language: language.to_string(),
        emails,
        role: field(&fields, "role").map(str::to_string),
        template: field(&fields, "template").map(str::to_string),
    });
    Json(serde_json::json!({ "status": "OK" })).into_response()
}

async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(fields): Fields,
) -> Response {
    if let Err(resp) = authorize(&headers) {
        return resp;
    }
    let mut store = state.store.write().await;
    let Some(room) = store.rooms.get(&id) else {
        return error(StatusCode::NOT_FOUND, "id", "unknown conference");
    };
    let slug = room.name_url.clone();

    let mut values = HashMap::new();
    for (index, label) in [(1, "First Name"), (2, "Last Name"), (3, "Email Address")] {
        match field(&fields, &format!("registration[{index}]")) {
            Some(value) if !value.is_empty() => {
                values.insert(label.to_string(), value.to_string());
            }
            _ => {
                return error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    &format!("registration[{index}]"),
                    "is required",
                )
            }
        }
    }

    let registration_id = state.next_id();
    let email = values["Email Address"].clone();
    let confirmed = if field(&fields, "confirmation_email[enabled]") == Some("1") {
        "0"
    } else {
        "1"
    };
    store.registrations.entry(id).or_default().push(Registration {
        id: registration_id,
        email,
        registration_confirmed: confirmed.to_string(),
        registration_date: Utc::now(),
        fields: values,
    });
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "OK",
            "url": format!("https://mock.clickmeeting.test/{slug}/register/{registration_id}"),
        })),
    )
        .into_response()
}

async fn list_registrations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, status)): Path<(i64, String)>,
) -> Response {
    if let Err(resp) = authorize(&headers) {
        return resp;
    }
    let Some(status) = resource(&status) else {
        return error(StatusCode::NOT_FOUND, "", "");
    };
    let store = state.store.read().await;
    if !store.rooms.contains_key(&id) {
        return error(StatusCode::NOT_FOUND, "id", "unknown conference");
    }
    let registrations: Vec<Registration> = store
        .registrations
        .get(&id)
        .map(|all| {
            all.iter()
                .filter(|r| match status {
                    "confirmed" => r.registration_confirmed == "1",
                    "unconfirmed" => r.registration_confirmed == "0",
                    _ => true,
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(registrations).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resource_strips_json_suffix() {
        assert_eq!(resource("active.json"), Some("active"));
        assert_eq!(resource("active"), None);
    }

    #[test]
    fn room_id_parses_numeric_segment() {
        assert_eq!(room_id("42.json").ok(), Some(42));
        assert!(room_id("abc.json").is_err());
    }

    #[test]
    fn last_field_value_wins() {
        let fields = pairs(&[("role", "listener"), ("role", "presenter")]);
        assert_eq!(field(&fields, "role"), Some("presenter"));
        assert_eq!(field(&fields, "template"), None);
    }

    #[test]
    fn apply_fields_reads_flags_and_settings() {
        let mut room = Room::default();
        let fields = pairs(&[
            ("lobby_enabled", "1"),
            ("permanent_room", "0"),
            ("settings[phonegateway_enabled]", "1"),
            ("settings[thank_you_page_url]", "https://x.test"),
        ]);
        apply_fields(&mut room, &fields).unwrap();
        assert!(room.lobby_enabled);
        assert!(!room.permanent_room);
        assert_eq!(room.settings["phonegateway_enabled"], serde_json::json!(true));
        assert_eq!(room.settings["thank_you_page_url"], serde_json::json!("https://x.test"));
    }

    #[test]
    fn short_password_is_rejected_for_protected_rooms() {
        let mut room = Room::default();
        let fields = pairs(&[("access_type", "2"), ("password", "abc")]);
        let resp = apply_fields(&mut room, &fields).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn room_serializes_vendor_field_names() {
        let room = Room {
            id: 1,
            name_url: "weekly".to_string(),
            ..Room::default()
        };
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["name_url"], "weekly");
        assert_eq!(json["access_type"], 0);
    }
}
