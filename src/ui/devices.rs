use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use crate::syncthing_client::{DeviceConfig, DeviceConnection, RestApi};

use super::event_loop::ScreenId;
use super::list::{ListAdapter, ListItem, ListKind, ListRow, ListScreen, ListSource};
use super::navigation::{Destination, NavigationIntent};

pub type DeviceListScreen = ListScreen<DeviceSource>;

impl ListItem for DeviceConfig {
    type Status = DeviceConnection;

    fn item_id(&self) -> &str {
        &self.device_id
    }

    fn row(&self, status: Option<&DeviceConnection>) -> ListRow {
        let short_id = self.device_id.split('-').next().unwrap_or(&self.device_id);
        ListRow {
            id: self.device_id.clone(),
            title: self.display_name().to_string(),
            subtitle: Some(short_id.to_string()),
            status: status.map(DeviceConnection::summary),
        }
    }
}

/// Remote devices of the cached daemon config, annotated with their
/// connection state.
pub struct DeviceSource;

#[async_trait]
impl ListSource for DeviceSource {
    type Item = DeviceConfig;

    const KIND: ListKind = ListKind::Devices;
    const SCREEN: ScreenId = ScreenId::Devices;
    const EMPTY_TEXT: &'static str = "No devices configured";

    fn fetch(api: &dyn RestApi) -> Option<Vec<DeviceConfig>> {
        api.devices(false)
    }

    async fn update_status(adapter: &mut ListAdapter<DeviceConfig>, api: &dyn RestApi) {
        let connections = match api.connections().await {
            Ok(response) => response.connections,
            Err(err) => {
                warn!(error = ?err, "Failed to fetch device connections");
                return;
            }
        };

        let now = Utc::now();
        let devices = adapter.items().to_vec();
        for device in &devices {
            let connection = DeviceConnection::from_state(
                device.paused.unwrap_or(false),
                connections.get(&device.device_id),
                now,
            );
            adapter.set_status(&device.device_id, connection);
        }
    }

    fn detail_intent(entity_id: Option<String>) -> NavigationIntent {
        match entity_id {
            Some(id) => NavigationIntent::edit(Destination::Device, id),
            None => NavigationIntent::create(Destination::Device),
        }
    }
}
