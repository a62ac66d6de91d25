use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response;
use rocket::response::{Responder, Response};
use rocket::serde::json::serde_json::json;
use rocket::serde::json::Value;
use rocket::serde::Deserialize;

use renju_core::{Color, GameInfo};

use crate::state::ServerError;

/// Generic API response with an arbitrary HTTP status code and JSON payload,
/// so every handler can return one concrete type.
pub struct ApiResponse {
    status: Status,
    payload: Value,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiResponse {
    fn respond_to(self, req: &'r Request) -> response::Result<'o> {
        Response::build_from(self.payload.respond_to(req).unwrap()).status(self.status).header(ContentType::JSON).ok()
    }
}

impl ApiResponse {
    pub fn bad_request(msg: String) -> Self {
        Self { status: Status::BadRequest, payload: json!({ "msg": msg }) }
    }

    pub fn not_found(msg: String) -> Self {
        Self { status: Status::NotFound, payload: json!({ "msg": msg }) }
    }

    pub fn game_created(key: String, info: GameInfo) -> Self {
        Self { status: Status::Created, payload: json!({ "key": key, "game_info": info }) }
    }

    pub fn game_info(info: GameInfo) -> Self {
        Self { status: Status::Ok, payload: json!({ "game_info": info }) }
    }

    pub fn move_suggestion(row: usize, col: usize) -> Self {
        Self { status: Status::Ok, payload: json!({ "row": row, "col": col }) }
    }

    pub fn no_legal_move() -> Self {
        Self { status: Status::Ok, payload: json!({ "row": null, "col": null }) }
    }

    pub fn from_server_error(err: ServerError) -> Self {
        match err {
            ServerError::GameNotFound => Self::not_found(err.to_string()),
            ServerError::Move(_) => Self::bad_request(err.to_string()),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(crate = "rocket::serde")]
pub struct CreateGameRequest {
    pub mode: Option<renju_core::GameMode>,
    pub starting_rule: Option<renju_core::StartingRule>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct MoveRequest {
    pub row: usize,
    pub col: usize,
}

/// Either half of the game-state choice API, dispatched by whichever field
/// is present: `choose_color` during Swap's single choice point, or
/// `choose_swap2_option` during Swap2's three-way choice point.
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ChoiceRequest {
    pub color: Option<Color>,
    pub swap2_option: Option<u8>,
}
