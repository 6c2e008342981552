//! Persistent local store on LMDB.
//!
//! Records live in one named database (`cars`) as JSON values keyed by id, so
//! a fallback collection built while offline survives a process restart.
//! Listing returns records in key order.

use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Cursor, Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{info, warn};

use crate::app_error::AppError;
use crate::car_model::{Car, CarCreateRequest, CarUpdateRequest};
use crate::local_store::{LocalCarStore, NOT_FOUND_MESSAGE};
use crate::utils::generate_id;

const DB_NAME: &str = "cars";
const MAP_SIZE: usize = 10 * 1024 * 1024;

pub struct LmdbCarStore {
    env: Environment,
    db: Database,
    path: PathBuf,
}

impl LmdbCarStore {
    /// Opens (or creates) the environment directory at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path).map_err(|e| {
            AppError::Database(format!("Failed to create {}: {e}", path.display()))
        })?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(MAP_SIZE)
            .open(&path)?;
        let db = env.create_db(Some(DB_NAME), DatabaseFlags::empty())?;

        info!("Opened LMDB car store at {}", path.display());
        Ok(Self { env, db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `seed` only when the store holds no record yet. Returns how many were written.
    pub fn seed_if_empty(&self, seed: &[Car]) -> Result<usize, AppError> {
        if !self.is_empty()? {
            return Ok(0);
        }

        let mut written = 0;
        let mut txn = self.env.begin_rw_txn()?;
        for car in seed {
            let Some(id) = car.id.as_deref() else {
                warn!("Skipping seed car without id: {} {}", car.brand, car.model);
                continue;
            };
            let json = serde_json::to_vec(car)?;
            txn.put(self.db, &id, &json, WriteFlags::empty())?;
            written += 1;
        }
        txn.commit()?;

        info!("Seeded LMDB car store with {written} records");
        Ok(written)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Car>, AppError> {
        let txn = self.env.begin_ro_txn()?;
        let car = match txn.get(self.db, &id) {
            Ok(bytes) => Some(serde_json::from_slice::<Car>(bytes)?),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        Ok(car)
    }

    pub fn clear(&self) -> Result<(), AppError> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.clear_db(self.db)?;
        txn.commit()?;
        info!("Cleared LMDB car store at {}", self.path.display());
        Ok(())
    }

    fn put(&self, car: &Car) -> Result<(), AppError> {
        let id = car
            .id
            .as_deref()
            .ok_or_else(|| AppError::Validation("Stored cars need an id".to_string()))?;
        let json = serde_json::to_vec(car)?;

        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &id, &json, WriteFlags::empty())?;
        txn.commit()?;
        Ok(())
    }
}

impl LocalCarStore for LmdbCarStore {
    fn list(&self) -> Result<Vec<Car>, AppError> {
        let txn = self.env.begin_ro_txn()?;
        let mut cars = Vec::new();
        {
            // A fresh cursor sits before the first key; `iter` yields nothing on an empty db.
            let mut cursor = txn.open_ro_cursor(self.db)?;
            for (_key, value) in cursor.iter() {
                cars.push(serde_json::from_slice::<Car>(value)?);
            }
        }
        Ok(cars)
    }

    fn create(&self, request: CarCreateRequest) -> Result<Car, AppError> {
        let car = Car::from_request(generate_id(), request);
        self.put(&car)?;
        Ok(car)
    }

    fn update(&self, id: &str, changes: &CarUpdateRequest) -> Result<Car, AppError> {
        let mut txn = self.env.begin_rw_txn()?;
        let mut car = match txn.get(self.db, &id) {
            Ok(bytes) => serde_json::from_slice::<Car>(bytes)?,
            Err(lmdb::Error::NotFound) => {
                return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        car.apply_changes(changes);
        let json = serde_json::to_vec(&car)?;
        txn.put(self.db, &id, &json, WriteFlags::empty())?;
        txn.commit()?;
        Ok(car)
    }

    fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.db, &id, None) {
            Ok(()) => {}
            Err(lmdb::Error::NotFound) => {
                return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
            }
            Err(e) => return Err(e.into()),
        }
        txn.commit()?;
        Ok(())
    }

    fn len(&self) -> Result<usize, AppError> {
        let txn = self.env.begin_ro_txn()?;
        let count = {
            let mut cursor = txn.open_ro_cursor(self.db)?;
            cursor.iter().count()
        };
        Ok(count)
    }
}
