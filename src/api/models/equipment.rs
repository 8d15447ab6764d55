use super::common::{deserialize_blank_as_none, deserialize_optional_status, deserialize_price};
use super::sites::VALIDATION_MESSAGE;
use crate::core::error::{InventoryError, Result};
use crate::db::models::{now_timestamp, Equipment, Status};
use serde::Deserialize;

/// Equipment body for create and partial update
#[derive(Debug, Default, Deserialize)]
pub struct EquipmentInput {
    #[serde(rename = "Nombre", default, deserialize_with = "deserialize_blank_as_none")]
    pub name: Option<String>,
    #[serde(rename = "tipo", default, deserialize_with = "deserialize_blank_as_none")]
    pub kind: Option<String>,
    #[serde(rename = "estado", default, deserialize_with = "deserialize_optional_status")]
    pub status: Option<Status>,
    #[serde(rename = "Precio", default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,
}

impl EquipmentInput {
    /// Build a new record; name, kind and price are required
    pub fn into_equipment(self) -> Result<Equipment> {
        let (Some(name), Some(kind), Some(price)) = (self.name, self.kind, self.price) else {
            return Err(InventoryError::ValidationError(VALIDATION_MESSAGE.to_string()));
        };

        let now = now_timestamp();
        let equipment = Equipment {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            kind: kind.trim().to_string(),
            status: self.status.unwrap_or_default(),
            price,
            created_at: now.clone(),
            updated_at: now,
        };
        validate(&equipment)?;
        Ok(equipment)
    }

    /// Merge present fields into `equipment` and bump its update time
    pub fn apply_to(self, equipment: &mut Equipment) -> Result<()> {
        if let Some(name) = self.name {
            equipment.name = name.trim().to_string();
        }
        if let Some(kind) = self.kind {
            equipment.kind = kind.trim().to_string();
        }
        if let Some(status) = self.status {
            equipment.status = status;
        }
        if let Some(price) = self.price {
            equipment.price = price;
        }
        validate(equipment)?;
        equipment.updated_at = now_timestamp();
        Ok(())
    }
}

fn validate(equipment: &Equipment) -> Result<()> {
    if equipment.name.is_empty() || equipment.kind.is_empty() {
        return Err(InventoryError::ValidationError(VALIDATION_MESSAGE.to_string()));
    }
    if !equipment.price.is_finite() || equipment.price < 0.0 {
        return Err(InventoryError::ValidationError(
            "Error de validación: el precio debe ser un número mayor o igual a 0.".to_string(),
        ));
    }
    Ok(())
}

/// Body of the price quote endpoint
#[derive(Debug, Default, Deserialize)]
pub struct QuoteRequest {
    #[serde(rename = "equipoIds", default)]
    pub equipment_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: &str) -> EquipmentInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_create_accepts_string_price() {
        let equipment = input(r#"{"Nombre":"Radio","tipo":"Antena","Precio":"150.5"}"#)
            .into_equipment()
            .unwrap();
        assert_eq!(equipment.price, 150.5);
        assert_eq!(equipment.status, Status::Activo);
    }

    #[test]
    fn test_create_rejects_missing_or_negative_price() {
        assert!(input(r#"{"Nombre":"Radio","tipo":"Antena"}"#).into_equipment().is_err());
        assert!(input(r#"{"Nombre":"Radio","tipo":"Antena","Precio":-1}"#)
            .into_equipment()
            .is_err());
    }

    #[test]
    fn test_update_revalidates_merged_record() {
        let mut equipment = input(r#"{"Nombre":"Radio","tipo":"Antena","Precio":10}"#)
            .into_equipment()
            .unwrap();

        assert!(input(r#"{"Precio":-5}"#).apply_to(&mut equipment).is_err());

        input(r#"{"Precio":0,"estado":"Inactivo"}"#)
            .apply_to(&mut equipment)
            .unwrap();
        assert_eq!(equipment.price, 0.0);
        assert_eq!(equipment.status, Status::Inactivo);
        assert_eq!(equipment.name, "Radio");
    }
}
