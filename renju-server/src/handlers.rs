use std::sync::Mutex;

use rocket::serde::json::Json;
use rocket::{Route, State};

use crate::messages::{ApiResponse, ChoiceRequest, CreateGameRequest, MoveRequest};
use crate::state::ServerState;

type StateMutex = State<Mutex<ServerState>>;

pub fn get_routes() -> Vec<Route> {
    routes![create_game, get_game_info, make_move, move_suggestion, choose]
}

#[post("/games", data = "<req>")]
pub fn create_game(state: &StateMutex, req: Option<Json<CreateGameRequest>>) -> ApiResponse {
    let req = req.map(|j| j.into_inner()).unwrap_or_default();
    let mode = req.mode.unwrap_or(renju_core::GameMode::Pvp);
    let starting_rule = req.starting_rule.unwrap_or(renju_core::StartingRule::Standard);

    let mut state_lock = state.inner().lock().unwrap();
    let (key, info) = state_lock.create_game(mode, starting_rule);
    log::info!("created game {key} (mode {mode:?}, starting rule {starting_rule:?})");
    ApiResponse::game_created(key, info)
}

#[get("/games/<game_id>")]
pub fn get_game_info(state: &StateMutex, game_id: &str) -> ApiResponse {
    let state_lock = state.inner().lock().unwrap();
    match state_lock.get_info(game_id) {
        Some(info) => ApiResponse::game_info(info),
        None => ApiResponse::not_found("game not found".to_owned()),
    }
}

#[post("/games/<game_id>/move", data = "<req>")]
pub fn make_move(state: &StateMutex, game_id: &str, req: Json<MoveRequest>) -> ApiResponse {
    let mut state_lock = state.inner().lock().unwrap();
    match state_lock.make_move(game_id, req.row, req.col) {
        Ok(info) => ApiResponse::game_info(info),
        Err(e) => ApiResponse::from_server_error(e),
    }
}

#[get("/games/<game_id>/move_suggestion")]
pub fn move_suggestion(state: &StateMutex, game_id: &str) -> ApiResponse {
    let mut state_lock = state.inner().lock().unwrap();
    match state_lock.move_suggestion(game_id) {
        Ok(Some((row, col))) => ApiResponse::move_suggestion(row, col),
        Ok(None) => ApiResponse::no_legal_move(),
        Err(e) => ApiResponse::from_server_error(e),
    }
}

#[post("/games/<game_id>/choice", data = "<req>")]
pub fn choose(state: &StateMutex, game_id: &str, req: Json<ChoiceRequest>) -> ApiResponse {
    let mut state_lock = state.inner().lock().unwrap();
    let result = match (req.color, req.swap2_option) {
        (Some(color), _) => state_lock.choose_color(game_id, color),
        (None, Some(option)) => state_lock.choose_swap2_option(game_id, option),
        (None, None) => return ApiResponse::bad_request("choice request needs either `color` or `swap2_option`".to_owned()),
    };
    match result {
        Ok(info) => ApiResponse::game_info(info),
        Err(e) => ApiResponse::from_server_error(e),
    }
}
