mod app;
mod audio;
mod config;
mod library;
mod mpris;
mod permission;
mod player;
mod presenter;
mod runtime;
mod service;
mod transfer;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
