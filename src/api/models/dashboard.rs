use super::common::deserialize_blank_as_none;
use super::sites::VALIDATION_MESSAGE;
use crate::core::error::{InventoryError, Result};
use crate::db::models::{now_timestamp, DashboardCard, Equipment, Site, DEFAULT_ACTION_TYPE};
use serde::{Deserialize, Deserializer, Serialize};

/// Reference field: absent keeps the stored value, `null` or `""` clears it
fn deserialize_reference<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_blank_as_none(deserializer).map(Some)
}

/// Dashboard card body for create and partial update
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub action_type: Option<String>,
    pub data_value: Option<String>,
    #[serde(rename = "torreId", default, deserialize_with = "deserialize_reference")]
    pub tower_id: Option<Option<String>>,
    #[serde(rename = "servidorId", default, deserialize_with = "deserialize_reference")]
    pub server_id: Option<Option<String>>,
    #[serde(rename = "equipoIds")]
    pub equipment_ids: Option<Vec<String>>,
}

fn clean_ids(ids: Vec<String>) -> Vec<String> {
    ids.into_iter().filter(|id| !id.trim().is_empty()).collect()
}

impl CardInput {
    /// Build a new card owned by `created_by`; only the label is required
    pub fn into_card(self, created_by: &str) -> Result<DashboardCard> {
        let Some(label) = self.label else {
            return Err(InventoryError::ValidationError(VALIDATION_MESSAGE.to_string()));
        };

        let now = now_timestamp();
        Ok(DashboardCard {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.trim().to_string(),
            action_type: self
                .action_type
                .unwrap_or_else(|| DEFAULT_ACTION_TYPE.to_string()),
            data_value: self.data_value.unwrap_or_default(),
            tower_id: self.tower_id.flatten(),
            server_id: self.server_id.flatten(),
            equipment_ids: clean_ids(self.equipment_ids.unwrap_or_default()),
            created_by: Some(created_by.to_string()),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Merge present fields into `card` and bump its update time
    pub fn apply_to(self, card: &mut DashboardCard) -> Result<()> {
        if let Some(label) = self.label {
            card.label = label.trim().to_string();
        }
        if let Some(action_type) = self.action_type {
            card.action_type = action_type;
        }
        if let Some(data_value) = self.data_value {
            card.data_value = data_value;
        }
        if let Some(tower_id) = self.tower_id {
            card.tower_id = tower_id;
        }
        if let Some(server_id) = self.server_id {
            card.server_id = server_id;
        }
        if let Some(ids) = self.equipment_ids {
            card.equipment_ids = clean_ids(ids);
        }
        if card.label.is_empty() {
            return Err(InventoryError::ValidationError(VALIDATION_MESSAGE.to_string()));
        }
        card.updated_at = now_timestamp();
        Ok(())
    }
}

/// Card with its references replaced by the referenced records
///
/// A tower or server that no longer exists shows up as `null`; missing
/// equipment is left out of `equipoIds`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedCard {
    #[serde(rename = "_id")]
    pub id: String,
    pub label: String,
    pub action_type: String,
    pub data_value: String,
    #[serde(rename = "torreId")]
    pub tower: Option<Site>,
    #[serde(rename = "servidorId")]
    pub server: Option<Site>,
    #[serde(rename = "equipoIds")]
    pub equipment: Vec<Equipment>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PopulatedCard {
    pub fn new(
        card: DashboardCard,
        tower: Option<Site>,
        server: Option<Site>,
        equipment: Vec<Equipment>,
    ) -> Self {
        Self {
            id: card.id,
            label: card.label,
            action_type: card.action_type,
            data_value: card.data_value,
            tower,
            server,
            equipment,
            created_by: card.created_by,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: &str) -> CardInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_create_applies_defaults() {
        let card = input(r#"{"label":"Norte","torreId":"","equipoIds":["e1",""]}"#)
            .into_card("u1")
            .unwrap();

        assert_eq!(card.action_type, DEFAULT_ACTION_TYPE);
        assert_eq!(card.data_value, "");
        assert!(card.tower_id.is_none());
        assert_eq!(card.equipment_ids, vec!["e1".to_string()]);
        assert_eq!(card.created_by.as_deref(), Some("u1"));
    }

    #[test]
    fn test_create_requires_label() {
        assert!(input(r#"{"dataValue":"x"}"#).into_card("u1").is_err());
    }

    #[test]
    fn test_update_distinguishes_absent_and_null_references() {
        let mut card = input(r#"{"label":"Norte","torreId":"t1","servidorId":"s1"}"#)
            .into_card("u1")
            .unwrap();

        input(r#"{"servidorId":null}"#).apply_to(&mut card).unwrap();
        assert_eq!(card.tower_id.as_deref(), Some("t1"));
        assert!(card.server_id.is_none());

        input(r#"{"torreId":"t2","label":"Sur"}"#).apply_to(&mut card).unwrap();
        assert_eq!(card.tower_id.as_deref(), Some("t2"));
        assert_eq!(card.label, "Sur");
    }

    #[test]
    fn test_populated_card_wire_shape() {
        let card = input(r#"{"label":"Norte","torreId":"t1"}"#).into_card("u1").unwrap();
        let value = serde_json::to_value(PopulatedCard::new(card, None, None, Vec::new())).unwrap();

        assert!(value["torreId"].is_null());
        assert_eq!(value["equipoIds"], serde_json::json!([]));
        assert_eq!(value["actionType"], "Detalle");
    }
}
