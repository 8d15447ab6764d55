//! Repository pattern implementation for data access layer
//!
//! This module provides the Repository pattern for abstracting database operations.

use crate::core::error::{InventoryError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::{DashboardCard, Equipment, Role, Site, User};
use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Find an entity by its ID
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Find all entities, newest first
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<()>;

    /// Update an existing entity, returns false when nothing matched
    async fn update(&self, entity: &T) -> Result<bool>;

    /// Delete an entity by its ID, returns false when nothing matched
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Turn a UNIQUE constraint failure into the given client error
fn on_unique_violation(
    err: rusqlite::Error,
    to_error: impl FnOnce() -> InventoryError,
) -> InventoryError {
    let err = InventoryError::from(err);
    if err.is_unique_violation() {
        to_error()
    } else {
        err
    }
}

async fn delete_row(db: &DatabaseManager, table: &'static str, id: &str) -> Result<bool> {
    let id = id.to_string();
    db.execute(move |conn| {
        let affected = conn.execute(&format!("DELETE FROM {} WHERE id = ?", table), [&id])?;
        Ok(affected > 0)
    })
    .await
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

const USER_COLUMNS: &str = "id, username, password_hash, role, must_change_password, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get(3)?,
        must_change_password: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn duplicate_username() -> InventoryError {
    InventoryError::DuplicateUsername("El nombre de usuario ya existe.".to_string())
}

/// Repository for user accounts
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
                        [&username],
                        user_from_row,
                    )
                    .optional()?)
            })
            .await
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?))
            .await
    }

    /// Store a new password hash and clear the forced-change flag
    pub async fn complete_password_change(&self, user_id: &str, password_hash: &str) -> Result<bool> {
        let user_id = user_id.to_string();
        let password_hash = password_hash.to_string();
        self.db
            .execute(move |conn| {
                let affected = conn.execute(
                    "UPDATE users SET password_hash = ?, must_change_password = 0 WHERE id = ?",
                    rusqlite::params![&password_hash, &user_id],
                )?;
                Ok(affected > 0)
            })
            .await
    }

    /// Change the role of a user
    pub async fn update_role(&self, user_id: &str, role: Role) -> Result<bool> {
        let user_id = user_id.to_string();
        self.db
            .execute(move |conn| {
                let affected = conn.execute(
                    "UPDATE users SET role = ? WHERE id = ?",
                    rusqlite::params![role, &user_id],
                )?;
                Ok(affected > 0)
            })
            .await
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                        [&id],
                        user_from_row,
                    )
                    .optional()?)
            })
            .await
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM users ORDER BY created_at DESC, rowid DESC",
                    USER_COLUMNS
                ))?;
                let users = stmt
                    .query_map([], user_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(users)
            })
            .await
    }

    async fn create(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, username, password_hash, role, must_change_password, created_at) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        &user.id,
                        &user.username,
                        &user.password_hash,
                        user.role,
                        user.must_change_password,
                        &user.created_at,
                    ],
                )
                .map_err(|e| on_unique_violation(e, duplicate_username))?;
                Ok(())
            })
            .await
    }

    async fn update(&self, user: &User) -> Result<bool> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                let affected = conn
                    .execute(
                        "UPDATE users SET username = ?, password_hash = ?, role = ?, must_change_password = ? \
                         WHERE id = ?",
                        rusqlite::params![
                            &user.username,
                            &user.password_hash,
                            user.role,
                            user.must_change_password,
                            &user.id,
                        ],
                    )
                    .map_err(|e| on_unique_violation(e, duplicate_username))?;
                Ok(affected > 0)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        delete_row(&self.db, "users", id).await
    }
}

// ---------------------------------------------------------------------------
// Towers and servers
// ---------------------------------------------------------------------------

/// Which of the two site collections a [`SiteRepository`] works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Tower,
    Server,
}

impl SiteKind {
    fn table(&self) -> &'static str {
        match self {
            SiteKind::Tower => "torres",
            SiteKind::Server => "servidores",
        }
    }

    /// Message for a lookup that matched nothing
    pub fn not_found_message(&self) -> &'static str {
        match self {
            SiteKind::Tower => "Torre no encontrada.",
            SiteKind::Server => "Servidor no encontrado.",
        }
    }

    /// Message for a successful delete
    pub fn deleted_message(&self) -> &'static str {
        match self {
            SiteKind::Tower => "Torre eliminada con éxito.",
            SiteKind::Server => "Servidor eliminado con éxito.",
        }
    }

    /// Message for a name that is already taken
    pub fn duplicate_message(&self) -> &'static str {
        match self {
            SiteKind::Tower => "Ya existe una torre con ese nombre.",
            SiteKind::Server => "Ya existe un servidor con ese nombre.",
        }
    }
}

const SITE_COLUMNS: &str = "id, name, location, status, created_at, updated_at";

fn site_from_row(row: &Row<'_>) -> rusqlite::Result<Site> {
    Ok(Site {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Repository for towers (`torres`) or servers (`servidores`)
pub struct SiteRepository {
    db: Arc<DatabaseManager>,
    kind: SiteKind,
}

impl SiteRepository {
    /// Create a new SiteRepository for the given collection
    pub fn new(db: Arc<DatabaseManager>, kind: SiteKind) -> Self {
        Self { db, kind }
    }
}

#[async_trait]
impl Repository<Site> for SiteRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Site>> {
        let id = id.to_string();
        let table = self.kind.table();
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM {} WHERE id = ?", SITE_COLUMNS, table),
                        [&id],
                        site_from_row,
                    )
                    .optional()?)
            })
            .await
    }

    async fn find_all(&self) -> Result<Vec<Site>> {
        let table = self.kind.table();
        self.db
            .execute(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM {} ORDER BY created_at DESC, rowid DESC",
                    SITE_COLUMNS, table
                ))?;
                let sites = stmt
                    .query_map([], site_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(sites)
            })
            .await
    }

    async fn create(&self, site: &Site) -> Result<()> {
        let site = site.clone();
        let kind = self.kind;
        self.db
            .execute(move |conn| {
                conn.execute(
                    &format!(
                        "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?)",
                        kind.table(),
                        SITE_COLUMNS
                    ),
                    rusqlite::params![
                        &site.id,
                        &site.name,
                        &site.location,
                        site.status,
                        &site.created_at,
                        &site.updated_at,
                    ],
                )
                .map_err(|e| {
                    on_unique_violation(e, || {
                        InventoryError::Conflict(kind.duplicate_message().to_string())
                    })
                })?;
                Ok(())
            })
            .await
    }

    async fn update(&self, site: &Site) -> Result<bool> {
        let site = site.clone();
        let kind = self.kind;
        self.db
            .execute(move |conn| {
                let affected = conn
                    .execute(
                        &format!(
                            "UPDATE {} SET name = ?, location = ?, status = ?, updated_at = ? WHERE id = ?",
                            kind.table()
                        ),
                        rusqlite::params![
                            &site.name,
                            &site.location,
                            site.status,
                            &site.updated_at,
                            &site.id,
                        ],
                    )
                    .map_err(|e| {
                        on_unique_violation(e, || {
                            InventoryError::Conflict(kind.duplicate_message().to_string())
                        })
                    })?;
                Ok(affected > 0)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        delete_row(&self.db, self.kind.table(), id).await
    }
}

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

const EQUIPMENT_COLUMNS: &str = "id, name, kind, status, price, created_at, updated_at";

fn equipment_from_row(row: &Row<'_>) -> rusqlite::Result<Equipment> {
    Ok(Equipment {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        status: row.get(3)?,
        price: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Ids bound per `IN (...)` lookup
pub const ID_BATCH_SIZE: usize = 500;

fn duplicate_equipment() -> InventoryError {
    InventoryError::Conflict("Ya existe un equipo con ese nombre.".to_string())
}

/// Repository for equipment (`equipos`)
pub struct EquipmentRepository {
    db: Arc<DatabaseManager>,
}

impl EquipmentRepository {
    /// Create a new EquipmentRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Fetch every record whose id is in `ids`; unknown ids are skipped
    ///
    /// Repeated ids are looked up once. Lookups run in batches of
    /// [`ID_BATCH_SIZE`] to stay under SQLite's bound parameter limit.
    pub async fn find_many(&self, ids: &[String]) -> Result<Vec<Equipment>> {
        let unique: BTreeSet<String> = ids.iter().cloned().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let unique: Vec<String> = unique.into_iter().collect();
        self.db
            .execute(move |conn| {
                let mut equipment = Vec::with_capacity(unique.len());
                for batch in unique.chunks(ID_BATCH_SIZE) {
                    let placeholders = vec!["?"; batch.len()].join(", ");
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM equipos WHERE id IN ({})",
                        EQUIPMENT_COLUMNS, placeholders
                    ))?;
                    let rows = stmt.query_map(rusqlite::params_from_iter(batch.iter()), equipment_from_row)?;
                    for row in rows {
                        equipment.push(row?);
                    }
                }
                Ok(equipment)
            })
            .await
    }
}

#[async_trait]
impl Repository<Equipment> for EquipmentRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Equipment>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM equipos WHERE id = ?", EQUIPMENT_COLUMNS),
                        [&id],
                        equipment_from_row,
                    )
                    .optional()?)
            })
            .await
    }

    async fn find_all(&self) -> Result<Vec<Equipment>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM equipos ORDER BY created_at DESC, rowid DESC",
                    EQUIPMENT_COLUMNS
                ))?;
                let equipment = stmt
                    .query_map([], equipment_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(equipment)
            })
            .await
    }

    async fn create(&self, equipment: &Equipment) -> Result<()> {
        let equipment = equipment.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    &format!(
                        "INSERT INTO equipos ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
                        EQUIPMENT_COLUMNS
                    ),
                    rusqlite::params![
                        &equipment.id,
                        &equipment.name,
                        &equipment.kind,
                        equipment.status,
                        equipment.price,
                        &equipment.created_at,
                        &equipment.updated_at,
                    ],
                )
                .map_err(|e| on_unique_violation(e, duplicate_equipment))?;
                Ok(())
            })
            .await
    }

    async fn update(&self, equipment: &Equipment) -> Result<bool> {
        let equipment = equipment.clone();
        self.db
            .execute(move |conn| {
                let affected = conn
                    .execute(
                        "UPDATE equipos SET name = ?, kind = ?, status = ?, price = ?, updated_at = ? \
                         WHERE id = ?",
                        rusqlite::params![
                            &equipment.name,
                            &equipment.kind,
                            equipment.status,
                            equipment.price,
                            &equipment.updated_at,
                            &equipment.id,
                        ],
                    )
                    .map_err(|e| on_unique_violation(e, duplicate_equipment))?;
                Ok(affected > 0)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        delete_row(&self.db, "equipos", id).await
    }
}

// ---------------------------------------------------------------------------
// Dashboard cards
// ---------------------------------------------------------------------------

const CARD_COLUMNS: &str = "id, label, action_type, data_value, torre_id, servidor_id, \
                            equipo_ids, created_by, created_at, updated_at";

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<DashboardCard> {
    let raw_ids: String = row.get(6)?;
    let equipment_ids = serde_json::from_str(&raw_ids)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(DashboardCard {
        id: row.get(0)?,
        label: row.get(1)?,
        action_type: row.get(2)?,
        data_value: row.get(3)?,
        tower_id: row.get(4)?,
        server_id: row.get(5)?,
        equipment_ids,
        created_by: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn encode_ids(ids: &[String]) -> rusqlite::Result<String> {
    serde_json::to_string(ids).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Repository for dashboard cards
pub struct DashboardRepository {
    db: Arc<DatabaseManager>,
}

impl DashboardRepository {
    /// Create a new DashboardRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<DashboardCard> for DashboardRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<DashboardCard>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM dashboard_cards WHERE id = ?", CARD_COLUMNS),
                        [&id],
                        card_from_row,
                    )
                    .optional()?)
            })
            .await
    }

    async fn find_all(&self) -> Result<Vec<DashboardCard>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM dashboard_cards ORDER BY created_at DESC, rowid DESC",
                    CARD_COLUMNS
                ))?;
                let cards = stmt
                    .query_map([], card_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(cards)
            })
            .await
    }

    async fn create(&self, card: &DashboardCard) -> Result<()> {
        let card = card.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    &format!(
                        "INSERT INTO dashboard_cards ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                        CARD_COLUMNS
                    ),
                    rusqlite::params![
                        &card.id,
                        &card.label,
                        &card.action_type,
                        &card.data_value,
                        &card.tower_id,
                        &card.server_id,
                        encode_ids(&card.equipment_ids)?,
                        &card.created_by,
                        &card.created_at,
                        &card.updated_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    async fn update(&self, card: &DashboardCard) -> Result<bool> {
        let card = card.clone();
        self.db
            .execute(move |conn| {
                let affected = conn.execute(
                    "UPDATE dashboard_cards SET label = ?, action_type = ?, data_value = ?, \
                     torre_id = ?, servidor_id = ?, equipo_ids = ?, updated_at = ? WHERE id = ?",
                    rusqlite::params![
                        &card.label,
                        &card.action_type,
                        &card.data_value,
                        &card.tower_id,
                        &card.server_id,
                        encode_ids(&card.equipment_ids)?,
                        &card.updated_at,
                        &card.id,
                    ],
                )?;
                Ok(affected > 0)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        delete_row(&self.db, "dashboard_cards", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{now_timestamp, Status};

    fn db() -> Arc<DatabaseManager> {
        Arc::new(DatabaseManager::new_in_memory().unwrap())
    }

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.into(),
            username: username.into(),
            password_hash: "hash".into(),
            role: Role::User,
            must_change_password: true,
            created_at: now_timestamp(),
        }
    }

    fn site(id: &str, name: &str) -> Site {
        Site {
            id: id.into(),
            name: name.into(),
            location: "Flores".into(),
            status: Status::Activo,
            created_at: now_timestamp(),
            updated_at: now_timestamp(),
        }
    }

    fn equipment(id: &str, name: &str, price: f64) -> Equipment {
        Equipment {
            id: id.into(),
            name: name.into(),
            kind: "Antena".into(),
            status: Status::Activo,
            price,
            created_at: now_timestamp(),
            updated_at: now_timestamp(),
        }
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let repo = UserRepository::new(db());
        repo.create(&user("u1", "alice")).await.unwrap();

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert!(found.must_change_password);
        assert_eq!(repo.count().await.unwrap(), 1);

        assert!(repo.complete_password_change("u1", "new-hash").await.unwrap());
        let found = repo.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "new-hash");
        assert!(!found.must_change_password);

        assert!(repo.update_role("u1", Role::Admin).await.unwrap());
        assert_eq!(repo.find_by_id("u1").await.unwrap().unwrap().role, Role::Admin);

        assert!(!repo.update_role("missing", Role::Admin).await.unwrap());
        assert!(repo.delete("u1").await.unwrap());
        assert!(!repo.delete("u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_reported() {
        let repo = UserRepository::new(db());
        repo.create(&user("u1", "alice")).await.unwrap();

        let err = repo.create(&user("u2", "alice")).await.unwrap_err();
        assert!(matches!(err, InventoryError::DuplicateUsername(_)));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_towers_and_servers_are_separate_collections() {
        let db = db();
        let towers = SiteRepository::new(db.clone(), SiteKind::Tower);
        let servers = SiteRepository::new(db, SiteKind::Server);

        towers.create(&site("t1", "Norte")).await.unwrap();
        servers.create(&site("s1", "Norte")).await.unwrap();

        assert_eq!(towers.find_all().await.unwrap().len(), 1);
        assert!(servers.find_by_id("t1").await.unwrap().is_none());

        let err = towers.create(&site("t2", "Norte")).await.unwrap_err();
        assert!(matches!(err, InventoryError::Conflict(ref m) if m == SiteKind::Tower.duplicate_message()));
    }

    #[tokio::test]
    async fn test_site_update_and_order() {
        let towers = SiteRepository::new(db(), SiteKind::Tower);
        towers.create(&site("t1", "Norte")).await.unwrap();
        towers.create(&site("t2", "Sur")).await.unwrap();

        let all = towers.find_all().await.unwrap();
        assert_eq!(all[0].id, "t2");

        let mut updated = all[1].clone();
        updated.status = Status::Inactivo;
        updated.location = "Choluteca".into();
        assert!(towers.update(&updated).await.unwrap());

        let stored = towers.find_by_id("t1").await.unwrap().unwrap();
        assert_eq!(stored.status, Status::Inactivo);
        assert_eq!(stored.location, "Choluteca");

        let mut renamed = stored.clone();
        renamed.name = "Sur".into();
        assert!(matches!(towers.update(&renamed).await, Err(InventoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_equipment_find_many_skips_unknown_ids() {
        let repo = EquipmentRepository::new(db());
        repo.create(&equipment("e1", "Radio", 10.0)).await.unwrap();
        repo.create(&equipment("e2", "Switch", 25.5)).await.unwrap();

        let found = repo
            .find_many(&["e1".to_string(), "ghost".to_string(), "e2".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(repo.find_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_equipment_find_many_handles_long_id_lists() {
        let repo = EquipmentRepository::new(db());
        repo.create(&equipment("e1", "Radio", 10.0)).await.unwrap();
        repo.create(&equipment("e2", "Switch", 25.5)).await.unwrap();

        let repeated = vec!["e1".to_string(); 40_000];
        let found = repo.find_many(&repeated).await.unwrap();
        assert_eq!(found.len(), 1);

        let mut mixed: Vec<String> = (0..3 * ID_BATCH_SIZE).map(|i| format!("ghost-{}", i)).collect();
        mixed.insert(ID_BATCH_SIZE + 7, "e2".to_string());
        mixed.push("e1".to_string());
        let found = repo.find_many(&mixed).await.unwrap();
        let mut ids: Vec<&str> = found.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn test_dashboard_card_keeps_dangling_references() {
        let db = db();
        let towers = SiteRepository::new(db.clone(), SiteKind::Tower);
        let cards = DashboardRepository::new(db);

        towers.create(&site("t1", "Norte")).await.unwrap();
        let card = DashboardCard {
            id: "c1".into(),
            label: "Norte".into(),
            action_type: "Detalle".into(),
            data_value: String::new(),
            tower_id: Some("t1".into()),
            server_id: None,
            equipment_ids: vec!["e1".into(), "e2".into()],
            created_by: Some("u1".into()),
            created_at: now_timestamp(),
            updated_at: now_timestamp(),
        };
        cards.create(&card).await.unwrap();

        assert!(towers.delete("t1").await.unwrap());

        let stored = cards.find_by_id("c1").await.unwrap().unwrap();
        assert_eq!(stored, card);
    }
}
