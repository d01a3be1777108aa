//! Embedded persistence for store and delivery-fee records.
//!
//! A thin layer over SQLite. Uniqueness of the normalized key pairs is
//! enforced by unique indexes inside the engine, so two writers racing the
//! same key cannot both land: the loser gets [`DbError::Duplicate`]. The
//! `find_*_duplicate` reads exist only as a user-experience pre-check; the
//! index is the source of truth.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::WriteToken;
use crate::geo::Point;
use crate::models::{DeliveryFeeRecord, NewDeliveryFee, NewStore, StoreRecord, StoreStatus};
use crate::normalize::normalize;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("a {entity} with the normalized key `{key}` already exists")]
    Duplicate { entity: &'static str, key: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS stores (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    lat REAL NOT NULL,
    lon REAL NOT NULL,
    contact_number TEXT,
    supervisor TEXT,
    hours TEXT,
    status TEXT,
    category TEXT,
    pin_location TEXT,
    normalized_name TEXT NOT NULL,
    normalized_address TEXT NOT NULL,
    normalized_category TEXT,
    created_at INTEGER NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS stores_normalized_key
    ON stores (normalized_name, normalized_address);

CREATE TABLE IF NOT EXISTS delivery_fees (
    id INTEGER PRIMARY KEY,
    location TEXT NOT NULL,
    zone TEXT NOT NULL DEFAULT '',
    min_order_amount TEXT NOT NULL,
    delivery_charge TEXT NOT NULL,
    amount_for_free_delivery TEXT NOT NULL,
    normalized_location TEXT NOT NULL,
    normalized_zone TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS delivery_fees_normalized_key
    ON delivery_fees (normalized_location, normalized_zone);
";

const STORE_COLUMNS: &str = "id, name, address, lat, lon, contact_number, supervisor, hours, \
     status, category, pin_location, normalized_name, normalized_address, normalized_category, \
     created_at";

const FEE_COLUMNS: &str = "id, location, zone, min_order_amount, delivery_charge, \
     amount_for_free_delivery, normalized_location, normalized_zone, created_at";

/// Handle on the embedded database.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, DbError> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ----- stores -----

    pub fn add_store(&self, store: &NewStore, _token: &WriteToken) -> Result<StoreRecord, DbError> {
        require_field("name", &store.name)?;
        require_field("address", &store.address)?;

        let (normalized_name, normalized_address) = store.normalized_key();
        let normalized_category = store.normalized_category();
        let created_at = unix_now();

        self.conn
            .execute(
                "INSERT INTO stores (name, address, lat, lon, contact_number, supervisor, hours, \
                 status, category, pin_location, normalized_name, normalized_address, \
                 normalized_category, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    store.name,
                    store.address,
                    store.location.lat(),
                    store.location.lon(),
                    store.contact_number,
                    store.supervisor,
                    store.hours,
                    store.status,
                    store.category,
                    store.pin_location,
                    normalized_name,
                    normalized_address,
                    normalized_category,
                    created_at,
                ],
            )
            .map_err(|err| duplicate_or(err, "store", &normalized_name, &normalized_address))?;

        let id = self.conn.last_insert_rowid();
        debug!(id, name = %store.name, "store added");
        self.get_store(id)
    }

    pub fn update_store(
        &self,
        id: i64,
        store: &NewStore,
        _token: &WriteToken,
    ) -> Result<StoreRecord, DbError> {
        require_field("name", &store.name)?;
        require_field("address", &store.address)?;

        let (normalized_name, normalized_address) = store.normalized_key();
        let normalized_category = store.normalized_category();

        let changed = self
            .conn
            .execute(
                "UPDATE stores SET name = ?1, address = ?2, lat = ?3, lon = ?4, \
                 contact_number = ?5, supervisor = ?6, hours = ?7, status = ?8, category = ?9, \
                 pin_location = ?10, normalized_name = ?11, normalized_address = ?12, \
                 normalized_category = ?13 WHERE id = ?14",
                params![
                    store.name,
                    store.address,
                    store.location.lat(),
                    store.location.lon(),
                    store.contact_number,
                    store.supervisor,
                    store.hours,
                    store.status,
                    store.category,
                    store.pin_location,
                    normalized_name,
                    normalized_address,
                    normalized_category,
                    id,
                ],
            )
            .map_err(|err| duplicate_or(err, "store", &normalized_name, &normalized_address))?;

        if changed == 0 {
            return Err(DbError::NotFound {
                entity: "store",
                id,
            });
        }
        debug!(id, name = %store.name, "store updated");
        self.get_store(id)
    }

    pub fn delete_store(&self, id: i64, _token: &WriteToken) -> Result<(), DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM stores WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound {
                entity: "store",
                id,
            });
        }
        debug!(id, "store deleted");
        Ok(())
    }

    pub fn get_store(&self, id: i64) -> Result<StoreRecord, DbError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_store)
            .optional()?
            .ok_or(DbError::NotFound {
                entity: "store",
                id,
            })
    }

    /// All stores, the candidate snapshot for nearest-resolution.
    pub fn list_stores(&self) -> Result<Vec<StoreRecord>, DbError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores ORDER BY name");
        let mut statement = self.conn.prepare(&sql)?;
        let rows = statement.query_map([], row_to_store)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Substring search over the normalized name, address, and category.
    ///
    /// The query is normalized first, so it contains only `[a-z0-9 ]` and
    /// needs no LIKE escaping.
    pub fn search_stores(&self, query: &str) -> Result<Vec<StoreRecord>, DbError> {
        let needle = format!("%{}%", normalize(query));
        let sql = format!(
            "SELECT {STORE_COLUMNS} FROM stores \
             WHERE normalized_name LIKE ?1 OR normalized_address LIKE ?1 \
                OR normalized_category LIKE ?1 \
             ORDER BY name"
        );
        let mut statement = self.conn.prepare(&sql)?;
        let rows = statement.query_map(params![needle], row_to_store)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// UX pre-check for an existing store under the same normalized key.
    /// The unique index remains the authority at write time.
    pub fn find_store_duplicate(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Option<StoreRecord>, DbError> {
        let sql = format!(
            "SELECT {STORE_COLUMNS} FROM stores \
             WHERE normalized_name = ?1 AND normalized_address = ?2"
        );
        Ok(self
            .conn
            .query_row(&sql, params![normalize(name), normalize(address)], row_to_store)
            .optional()?)
    }

    // ----- delivery fees -----

    pub fn add_delivery_fee(
        &self,
        fee: &NewDeliveryFee,
        _token: &WriteToken,
    ) -> Result<DeliveryFeeRecord, DbError> {
        require_field("location", &fee.location)?;

        let (normalized_location, normalized_zone) = fee.normalized_key();
        let created_at = unix_now();

        self.conn
            .execute(
                "INSERT INTO delivery_fees (location, zone, min_order_amount, delivery_charge, \
                 amount_for_free_delivery, normalized_location, normalized_zone, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    fee.location,
                    fee.zone,
                    fee.min_order_amount.to_string(),
                    fee.delivery_charge.to_string(),
                    fee.amount_for_free_delivery.to_string(),
                    normalized_location,
                    normalized_zone,
                    created_at,
                ],
            )
            .map_err(|err| {
                duplicate_or(err, "delivery fee", &normalized_location, &normalized_zone)
            })?;

        let id = self.conn.last_insert_rowid();
        debug!(id, location = %fee.location, "delivery fee added");
        self.get_delivery_fee(id)
    }

    pub fn update_delivery_fee(
        &self,
        id: i64,
        fee: &NewDeliveryFee,
        _token: &WriteToken,
    ) -> Result<DeliveryFeeRecord, DbError> {
        require_field("location", &fee.location)?;

        let (normalized_location, normalized_zone) = fee.normalized_key();
        let changed = self
            .conn
            .execute(
                "UPDATE delivery_fees SET location = ?1, zone = ?2, min_order_amount = ?3, \
                 delivery_charge = ?4, amount_for_free_delivery = ?5, normalized_location = ?6, \
                 normalized_zone = ?7 WHERE id = ?8",
                params![
                    fee.location,
                    fee.zone,
                    fee.min_order_amount.to_string(),
                    fee.delivery_charge.to_string(),
                    fee.amount_for_free_delivery.to_string(),
                    normalized_location,
                    normalized_zone,
                    id,
                ],
            )
            .map_err(|err| {
                duplicate_or(err, "delivery fee", &normalized_location, &normalized_zone)
            })?;

        if changed == 0 {
            return Err(DbError::NotFound {
                entity: "delivery fee",
                id,
            });
        }
        debug!(id, location = %fee.location, "delivery fee updated");
        self.get_delivery_fee(id)
    }

    pub fn delete_delivery_fee(&self, id: i64, _token: &WriteToken) -> Result<(), DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM delivery_fees WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound {
                entity: "delivery fee",
                id,
            });
        }
        debug!(id, "delivery fee deleted");
        Ok(())
    }

    pub fn get_delivery_fee(&self, id: i64) -> Result<DeliveryFeeRecord, DbError> {
        let sql = format!("SELECT {FEE_COLUMNS} FROM delivery_fees WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_fee)
            .optional()?
            .ok_or(DbError::NotFound {
                entity: "delivery fee",
                id,
            })
    }

    pub fn list_delivery_fees(&self) -> Result<Vec<DeliveryFeeRecord>, DbError> {
        let sql = format!("SELECT {FEE_COLUMNS} FROM delivery_fees ORDER BY location");
        let mut statement = self.conn.prepare(&sql)?;
        let rows = statement.query_map([], row_to_fee)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Substring search over the normalized location and zone.
    pub fn search_delivery_fees(&self, query: &str) -> Result<Vec<DeliveryFeeRecord>, DbError> {
        let needle = format!("%{}%", normalize(query));
        let sql = format!(
            "SELECT {FEE_COLUMNS} FROM delivery_fees \
             WHERE normalized_location LIKE ?1 OR normalized_zone LIKE ?1 \
             ORDER BY location"
        );
        let mut statement = self.conn.prepare(&sql)?;
        let rows = statement.query_map(params![needle], row_to_fee)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// UX pre-check for an existing fee entry under the same normalized key.
    pub fn find_delivery_fee_duplicate(
        &self,
        location: &str,
        zone: &str,
    ) -> Result<Option<DeliveryFeeRecord>, DbError> {
        let sql = format!(
            "SELECT {FEE_COLUMNS} FROM delivery_fees \
             WHERE normalized_location = ?1 AND normalized_zone = ?2"
        );
        Ok(self
            .conn
            .query_row(&sql, params![normalize(location), normalize(zone)], row_to_fee)
            .optional()?)
    }
}

impl FromSql for StoreStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

impl ToSql for StoreStatus {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

fn row_to_store(row: &Row<'_>) -> rusqlite::Result<StoreRecord> {
    let lat: f64 = row.get(3)?;
    let lon: f64 = row.get(4)?;
    let location = Point::new(lat, lon)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(3, Type::Real, Box::new(err)))?;

    Ok(StoreRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        location,
        contact_number: row.get(5)?,
        supervisor: row.get(6)?,
        hours: row.get(7)?,
        status: row.get(8)?,
        category: row.get(9)?,
        pin_location: row.get(10)?,
        normalized_name: row.get(11)?,
        normalized_address: row.get(12)?,
        normalized_category: row.get(13)?,
        created_at: row.get(14)?,
    })
}

fn row_to_fee(row: &Row<'_>) -> rusqlite::Result<DeliveryFeeRecord> {
    Ok(DeliveryFeeRecord {
        id: row.get(0)?,
        location: row.get(1)?,
        zone: row.get(2)?,
        min_order_amount: decimal_column(row, 3)?,
        delivery_charge: decimal_column(row, 4)?,
        amount_for_free_delivery: decimal_column(row, 5)?,
        normalized_location: row.get(6)?,
        normalized_zone: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn decimal_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(index)?;
    text.parse().map_err(|err: rust_decimal::Error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
    })
}

fn require_field(field: &'static str, value: &str) -> Result<(), DbError> {
    if value.trim().is_empty() {
        Err(DbError::EmptyField(field))
    } else {
        Ok(())
    }
}

fn duplicate_or(err: rusqlite::Error, entity: &'static str, key_a: &str, key_b: &str) -> DbError {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            let key = format!("{key_a} / {key_b}");
            warn!(entity, %key, "rejected duplicate normalized key");
            return DbError::Duplicate { entity, key };
        }
    }
    DbError::Sqlite(err)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0)
}
