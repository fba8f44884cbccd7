pub mod config;
pub mod service;
pub mod syncthing_client;
pub mod types;
pub mod ui;
