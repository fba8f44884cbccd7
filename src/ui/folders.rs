use async_trait::async_trait;
use tracing::warn;

use crate::syncthing_client::{FolderConfig, FolderStatus, RestApi};

use super::event_loop::ScreenId;
use super::list::{ListAdapter, ListItem, ListKind, ListRow, ListScreen, ListSource};
use super::navigation::{Destination, NavigationIntent};

pub type FolderListScreen = ListScreen<FolderSource>;

impl ListItem for FolderConfig {
    type Status = FolderStatus;

    fn item_id(&self) -> &str {
        &self.id
    }

    fn row(&self, status: Option<&FolderStatus>) -> ListRow {
        ListRow {
            id: self.id.clone(),
            title: self.display_label().to_string(),
            subtitle: self.path.clone(),
            status: status.map(FolderStatus::summary),
        }
    }
}

/// Folders of the cached daemon config, annotated with `/rest/db/status`.
pub struct FolderSource;

#[async_trait]
impl ListSource for FolderSource {
    type Item = FolderConfig;

    const KIND: ListKind = ListKind::Folders;
    const SCREEN: ScreenId = ScreenId::Folders;
    const EMPTY_TEXT: &'static str = "No folders configured";

    fn fetch(api: &dyn RestApi) -> Option<Vec<FolderConfig>> {
        api.folders()
    }

    async fn update_status(adapter: &mut ListAdapter<FolderConfig>, api: &dyn RestApi) {
        let folders = adapter.items().to_vec();
        for folder in &folders {
            match api.folder_status(folder).await {
                Ok(status) => adapter.set_status(&folder.id, status),
                Err(err) => {
                    warn!(folder = %folder.id, error = ?err, "Failed to fetch folder status");
                }
            }
        }
    }

    fn detail_intent(entity_id: Option<String>) -> NavigationIntent {
        match entity_id {
            Some(id) => NavigationIntent::edit(Destination::Folder, id),
            None => NavigationIntent::create(Destination::Folder),
        }
    }
}
