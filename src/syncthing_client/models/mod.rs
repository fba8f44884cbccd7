mod device;
mod folder;
mod overview;

pub use device::DeviceConnection;
pub use folder::{FolderStateCode, FolderStatus};
pub use overview::SyncthingOverview;
