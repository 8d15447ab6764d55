//! Database models
//!
//! Data structures representing database tables. Records serialize with the
//! field names the web client already consumes (`_id`, `nombre`, `Precio`, ...).

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Operational status of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Activo,
    Inactivo,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Activo => "Activo",
            Status::Inactivo => "Inactivo",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Activo" => Ok(Status::Activo),
            "Inactivo" => Ok(Status::Inactivo),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

macro_rules! text_column {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: String| FromSqlError::Other(e.into()))
            }
        }
    };
}

text_column!(Role);
text_column!(Status);

/// User record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub must_change_password: bool,
    pub created_at: String,
}

/// Tower or server record; both collections share this shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "ubicacion")]
    pub location: String,
    #[serde(rename = "estado")]
    pub status: Status,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Equipment record in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "estado")]
    pub status: Status,
    #[serde(rename = "Precio")]
    pub price: f64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Dashboard card record in the database
///
/// References are stored as plain ids; nothing keeps them in sync with the
/// referenced collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCard {
    #[serde(rename = "_id")]
    pub id: String,
    pub label: String,
    pub action_type: String,
    pub data_value: String,
    #[serde(rename = "torreId")]
    pub tower_id: Option<String>,
    #[serde(rename = "servidorId")]
    pub server_id: Option<String>,
    #[serde(rename = "equipoIds")]
    pub equipment_ids: Vec<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Default `actionType` for cards created without one
pub const DEFAULT_ACTION_TYPE: &str = "Detalle";

/// Timestamp format shared by every table (sortable as text)
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_site_wire_names() {
        let site = Site {
            id: "t1".into(),
            name: "Torre Norte".into(),
            location: "Flores".into(),
            status: Status::Inactivo,
            created_at: "2024-01-01T00:00:00.000Z".into(),
            updated_at: "2024-01-01T00:00:00.000Z".into(),
        };
        let value = serde_json::to_value(&site).unwrap();
        assert_eq!(value["_id"], "t1");
        assert_eq!(value["nombre"], "Torre Norte");
        assert_eq!(value["ubicacion"], "Flores");
        assert_eq!(value["estado"], "Inactivo");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_equipment_wire_names() {
        let equipment = Equipment {
            id: "e1".into(),
            name: "Radio".into(),
            kind: "Antena".into(),
            status: Status::Activo,
            price: 150.5,
            created_at: now_timestamp(),
            updated_at: now_timestamp(),
        };
        let value = serde_json::to_value(&equipment).unwrap();
        assert_eq!(value["Nombre"], "Radio");
        assert_eq!(value["tipo"], "Antena");
        assert_eq!(value["Precio"], 150.5);
    }

    #[test]
    fn test_timestamps_sort_chronologically() {
        let earlier = now_timestamp();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let later = now_timestamp();
        assert!(earlier < later);
    }

    proptest::proptest! {
        #[test]
        fn role_round_trips_through_text(idx in 0usize..2) {
            let role = Role::ALL[idx];
            proptest::prop_assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }

        #[test]
        fn unknown_roles_are_rejected(s in "[a-z]{1,8}") {
            proptest::prop_assume!(s != "user" && s != "admin");
            proptest::prop_assert!(s.parse::<Role>().is_err());
        }
    }
}
