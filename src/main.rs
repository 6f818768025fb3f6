extern crate image;
extern crate rand;
extern crate serde;
extern crate threadpool;

mod cli_app;
mod game;
mod geometry;
mod hunt;
mod imagery;
mod inout;
mod loader;
mod prefs;
mod tui;

fn main() {
    hunt::play();
}
