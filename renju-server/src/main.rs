#[macro_use]
extern crate rocket;

mod handlers;
mod messages;
mod state;

use std::sync::Mutex;

use state::ServerState;

#[launch]
fn run() -> _ {
    env_logger::init();
    rocket::build().mount("/", handlers::get_routes()).manage(Mutex::from(ServerState::new()))
}
