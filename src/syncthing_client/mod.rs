mod api;
mod client;
mod helpers;
mod models;
mod rest_api;

pub use api::{
    ConnectionState, ConnectionsResponse, DeviceConfig, FolderConfig, FolderDevice, Gui, Options,
};
pub use client::SyncthingClient;
pub use helpers::format_relative_time;
pub use models::{DeviceConnection, FolderStateCode, FolderStatus, SyncthingOverview};
pub use rest_api::RestApi;
