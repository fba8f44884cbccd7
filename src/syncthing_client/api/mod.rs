mod queries;
mod responses;
mod types;

pub use queries::FolderStatusQuery;
pub use responses::PingResponse;
pub use types::{
    ConnectionState, ConnectionsResponse, DeviceConfig, FolderConfig, FolderDevice, Gui, Options,
    SyncthingConfig,
};
