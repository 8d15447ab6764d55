use super::common::{deserialize_blank_as_none, deserialize_optional_status};
use crate::core::error::{InventoryError, Result};
use crate::db::models::{now_timestamp, Site, Status};
use serde::Deserialize;

pub const VALIDATION_MESSAGE: &str = "Error de validación: faltan campos o son inválidos.";

/// Tower/server body for create and partial update
#[derive(Debug, Default, Deserialize)]
pub struct SiteInput {
    #[serde(rename = "nombre", default, deserialize_with = "deserialize_blank_as_none")]
    pub name: Option<String>,
    #[serde(rename = "ubicacion", default, deserialize_with = "deserialize_blank_as_none")]
    pub location: Option<String>,
    #[serde(rename = "estado", default, deserialize_with = "deserialize_optional_status")]
    pub status: Option<Status>,
}

impl SiteInput {
    /// Build a new record; name and location are required
    pub fn into_site(self) -> Result<Site> {
        let (Some(name), Some(location)) = (self.name, self.location) else {
            return Err(InventoryError::ValidationError(VALIDATION_MESSAGE.to_string()));
        };

        let now = now_timestamp();
        let site = Site {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            location: location.trim().to_string(),
            status: self.status.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        };
        validate(&site)?;
        Ok(site)
    }

    /// Merge present fields into `site` and bump its update time
    pub fn apply_to(self, site: &mut Site) -> Result<()> {
        if let Some(name) = self.name {
            site.name = name.trim().to_string();
        }
        if let Some(location) = self.location {
            site.location = location.trim().to_string();
        }
        if let Some(status) = self.status {
            site.status = status;
        }
        validate(site)?;
        site.updated_at = now_timestamp();
        Ok(())
    }
}

fn validate(site: &Site) -> Result<()> {
    if site.name.is_empty() || site.location.is_empty() {
        return Err(InventoryError::ValidationError(VALIDATION_MESSAGE.to_string()));
    }
    Ok(())
}
