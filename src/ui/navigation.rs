use serde::{Deserialize, Serialize};

use crate::types::UiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Folder,
    Device,
    Settings,
}

/// Request to open another screen. The payload is opaque to the platform
/// and travels as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    pub destination: Destination,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub entity_id: Option<String>,
    pub is_create: bool,
}

impl NavigationIntent {
    pub fn edit(destination: Destination, entity_id: impl Into<String>) -> Self {
        Self {
            destination,
            entity_id: Some(entity_id.into()),
            is_create: false,
        }
    }

    pub fn create(destination: Destination) -> Self {
        Self {
            destination,
            entity_id: None,
            is_create: true,
        }
    }

    pub fn settings() -> Self {
        Self {
            destination: Destination::Settings,
            entity_id: None,
            is_create: false,
        }
    }

    pub fn to_payload(&self) -> Result<String, UiError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_payload(payload: &str) -> Result<Self, UiError> {
        Ok(serde_json::from_str(payload)?)
    }
}
