//! Local stores used in mock mode and as the fallback when the backend is unreachable.

use std::sync::{Mutex, MutexGuard};

use log::info;

use crate::app_error::AppError;
use crate::car_model::{Car, CarCreateRequest, CarUpdateRequest};
use crate::utils::generate_id;

pub const NOT_FOUND_MESSAGE: &str = "Car not found";

/// Storage the access layer can serve every operation from without a backend.
pub trait LocalCarStore: Send + Sync {
    /// Snapshot of the whole collection.
    fn list(&self) -> Result<Vec<Car>, AppError>;

    /// Appends a record under a freshly generated id.
    fn create(&self, request: CarCreateRequest) -> Result<Car, AppError>;

    /// Shallow-merges `changes` into the record with `id`.
    fn update(&self, id: &str, changes: &CarUpdateRequest) -> Result<Car, AppError>;

    fn delete(&self, id: &str) -> Result<(), AppError>;

    fn len(&self) -> Result<usize, AppError> {
        Ok(self.list()?.len())
    }

    fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}

/// In-memory collection, owned by whoever builds it.
///
/// Each instance is independent, so tests can build one per case. Mutations
/// hold the lock for their whole read-modify-write.
#[derive(Debug, Default)]
pub struct MemoryCarStore {
    cars: Mutex<Vec<Car>>,
}

impl MemoryCarStore {
    pub fn new(seed: Vec<Car>) -> Self {
        Self {
            cars: Mutex::new(seed),
        }
    }

    /// Store preloaded with [`seed_cars`].
    pub fn seeded() -> Self {
        Self::new(seed_cars())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Car>>, AppError> {
        self.cars
            .lock()
            .map_err(|_| AppError::Database("In-memory car store lock poisoned".to_string()))
    }
}

impl LocalCarStore for MemoryCarStore {
    fn list(&self) -> Result<Vec<Car>, AppError> {
        Ok(self.lock()?.clone())
    }

    fn create(&self, request: CarCreateRequest) -> Result<Car, AppError> {
        let car = Car::from_request(generate_id(), request);
        self.lock()?.push(car.clone());
        info!("Created car {:?} in memory store", car.id);
        Ok(car)
    }

    fn update(&self, id: &str, changes: &CarUpdateRequest) -> Result<Car, AppError> {
        let mut cars = self.lock()?;
        let car = cars
            .iter_mut()
            .find(|car| car.has_id(id))
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;
        car.apply_changes(changes);
        Ok(car.clone())
    }

    fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut cars = self.lock()?;
        let index = cars
            .iter()
            .position(|car| car.has_id(id))
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;
        cars.remove(index);
        Ok(())
    }

    fn len(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.len())
    }
}

fn seed_car(id: &str, model: &str, brand: &str, color: &str, year: &str, plate: &str, image: &str) -> Car {
    Car::from_request(
        id,
        CarCreateRequest {
            model: model.to_string(),
            brand: brand.to_string(),
            color: color.to_string(),
            year: year.to_string(),
            plate_number: plate.to_string(),
            image_url: Some(image.to_string()),
        },
    )
}

/// Fixture the default memory store starts with.
pub fn seed_cars() -> Vec<Car> {
    vec![
        seed_car(
            "1",
            "Fiesta",
            "Ford",
            "Azul",
            "2025",
            "ASD123",
            "https://images.unsplash.com/photo-1533473359331-0135ef1b58bf?w=400&h=300&fit=crop",
        ),
        seed_car(
            "2",
            "Corolla",
            "Toyota",
            "Blanco",
            "2024",
            "XYZ789",
            "https://images.unsplash.com/photo-1621007947382-bb3c3994e3fb?w=400&h=300&fit=crop",
        ),
        seed_car(
            "3",
            "Civic",
            "Honda",
            "Negro",
            "2023",
            "ABC456",
            "https://images.unsplash.com/photo-1606664515524-ed2f786a0bd6?w=400&h=300&fit=crop",
        ),
        seed_car(
            "4",
            "Sentra",
            "Nissan",
            "Gris",
            "2024",
            "DEF789",
            "https://images.unsplash.com/photo-1602731288648-4abf765b99ad?w=400&h=300&fit=crop",
        ),
    ]
}
