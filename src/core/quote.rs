//! Equipment price quotes
//!
//! Builds a priced list from a selection of equipment ids. Ids may repeat;
//! each occurrence becomes its own line.

use crate::core::error::{InventoryError, Result};
use crate::db::models::{Equipment, Status};
use crate::db::repository::EquipmentRepository;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// One priced line of a quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteLine {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "Precio")]
    pub price: f64,
}

impl From<&Equipment> for QuoteLine {
    fn from(equipment: &Equipment) -> Self {
        Self {
            id: equipment.id.clone(),
            name: equipment.name.clone(),
            kind: equipment.kind.clone(),
            price: equipment.price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub items: Vec<QuoteLine>,
    pub total: f64,
    pub count: usize,
    pub generated_at: String,
}

/// Sum of line prices rounded to cents
pub fn quote_total(lines: &[QuoteLine]) -> f64 {
    let sum: f64 = lines.iter().map(|line| line.price).sum();
    (sum * 100.0).round() / 100.0
}

pub struct QuoteService {
    equipment: Arc<EquipmentRepository>,
}

impl QuoteService {
    pub fn new(equipment: Arc<EquipmentRepository>) -> Self {
        Self { equipment }
    }

    /// Price the given selection; every id must name active equipment
    pub async fn quote(&self, ids: &[String]) -> Result<Quote> {
        if ids.is_empty() {
            return Err(InventoryError::ValidationError(
                "Debe seleccionar al menos un equipo.".to_string(),
            ));
        }

        let found: HashMap<String, Equipment> = self
            .equipment
            .find_many(ids)
            .await?
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();

        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            let equipment = found.get(id).ok_or_else(|| {
                InventoryError::ValidationError(format!("Equipo no encontrado: {}.", id))
            })?;
            if equipment.status != Status::Activo {
                return Err(InventoryError::ValidationError(format!(
                    "El equipo {} no está activo.",
                    equipment.name
                )));
            }
            items.push(QuoteLine::from(equipment));
        }

        let total = quote_total(&items);
        tracing::info!(lines = items.len(), total, "Quote generated");

        Ok(Quote {
            count: items.len(),
            total,
            items,
            generated_at: crate::db::models::now_timestamp(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::manager::DatabaseManager;
    use crate::db::models::now_timestamp;
    use crate::db::repository::Repository;
    use proptest::prelude::*;

    fn equipment(id: &str, price: f64, status: Status) -> Equipment {
        Equipment {
            id: id.into(),
            name: format!("Equipo {}", id),
            kind: "Antena".into(),
            status,
            price,
            created_at: now_timestamp(),
            updated_at: now_timestamp(),
        }
    }

    async fn service() -> QuoteService {
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let repo = Arc::new(EquipmentRepository::new(db));
        repo.create(&equipment("e1", 10.10, Status::Activo)).await.unwrap();
        repo.create(&equipment("e2", 20.25, Status::Activo)).await.unwrap();
        repo.create(&equipment("off", 99.0, Status::Inactivo)).await.unwrap();
        QuoteService::new(repo)
    }

    #[tokio::test]
    async fn test_quote_counts_repeated_ids() {
        let service = service().await;
        let quote = service
            .quote(&["e1".into(), "e2".into(), "e1".into()])
            .await
            .unwrap();

        assert_eq!(quote.count, 3);
        assert_eq!(quote.items[2].id, "e1");
        assert_eq!(quote.total, 40.45);
    }

    #[tokio::test]
    async fn test_quote_with_many_repeats_of_one_id() {
        let service = service().await;
        let ids = vec!["e2".to_string(); 40_000];

        let quote = service.quote(&ids).await.unwrap();
        assert_eq!(quote.count, 40_000);
        assert_eq!(quote.total, 810_000.0);
    }

    #[tokio::test]
    async fn test_quote_rejects_unknown_and_inactive() {
        let service = service().await;

        let err = service.quote(&["e1".into(), "ghost".into()]).await.unwrap_err();
        assert!(matches!(err, InventoryError::ValidationError(ref m) if m.contains("ghost")));

        let err = service.quote(&["off".into()]).await.unwrap_err();
        assert!(matches!(err, InventoryError::ValidationError(_)));

        let err = service.quote(&[]).await.unwrap_err();
        assert!(matches!(err, InventoryError::ValidationError(_)));
    }

    #[test]
    fn test_quote_line_wire_names() {
        let line = QuoteLine::from(&equipment("e1", 5.0, Status::Activo));
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["_id"], "e1");
        assert_eq!(value["Precio"], 5.0);
        assert!(value.get("estado").is_none());
    }

    fn line(price: f64) -> QuoteLine {
        QuoteLine {
            id: "x".into(),
            name: "x".into(),
            kind: "x".into(),
            price,
        }
    }

    proptest! {
        #[test]
        fn total_matches_cent_sum(cents in proptest::collection::vec(0u32..1_000_000, 0..20)) {
            let lines: Vec<QuoteLine> = cents.iter().map(|c| line(*c as f64 / 100.0)).collect();
            let expected = cents.iter().map(|c| *c as u64).sum::<u64>() as f64 / 100.0;
            prop_assert!((quote_total(&lines) - expected).abs() < 0.005);
        }

        #[test]
        fn total_has_at_most_two_decimals(prices in proptest::collection::vec(0.0f64..10_000.0, 1..10)) {
            let lines: Vec<QuoteLine> = prices.into_iter().map(line).collect();
            let total = quote_total(&lines);
            prop_assert!(((total * 100.0).round() - total * 100.0).abs() < 1e-6);
        }
    }
}
