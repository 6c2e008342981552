//! # Car Records Core
//!
//! A data-access layer for a small fleet of car records. Operations go to a
//! REST backend when one is configured and reachable, and are served from a
//! local store otherwise.
//!
//! ## Features
//!
//! - **Dual-mode access**: `list`, `create`, `update` and `delete` run against
//!   the backend or a local store, chosen once from [`ApiConfig`]
//! - **Offline fallback**: a backend that cannot be reached at all is replaced,
//!   for that one call, by the local store; application errors are never masked
//! - **Injectable stores**: an in-memory [`MemoryCarStore`] per instance, or a
//!   persistent [`LmdbCarStore`]
//! - **Shape-tolerant parsing**: bare arrays or `{ "data": [...] }`, numeric or
//!   string ids and years, all normalized into one [`Car`] type
//! - **Safe error handling**: every failure is an [`AppError`], no `unwrap()`
//!   in production code
//!
//! ## Quick Start
//!
//! ```no_run
//! use car_records_core::{ApiConfig, CarCreateRequest, CarService};
//!
//! # async fn run() -> Result<(), car_records_core::AppError> {
//! let service = CarService::new(ApiConfig::from_env()?)?;
//!
//! let car = service
//!     .create(
//!         CarCreateRequest {
//!             model: "Corolla".to_string(),
//!             brand: "Toyota".to_string(),
//!             color: "Blanco".to_string(),
//!             year: "2024".to_string(),
//!             plate_number: "xyz789".to_string(),
//!             image_url: None,
//!         },
//!         Some("session-token"),
//!     )
//!     .await?;
//! assert_eq!(car.plate_number, "XYZ789");
//!
//! let cars = service.list(Some("session-token")).await?;
//! # let _ = cars;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`car_service`] - the access layer itself
//! - [`auth_service`] - login and registration with the same mode policy
//! - [`local_store`] / [`lmdb_car_store`] - local stores
//! - [`car_filter`] - client-side filtering of loaded records
//! - [`validation`] - field rules applied before any I/O

pub mod app_config;
pub mod app_error;
pub mod auth_service;
pub mod backend_client;
pub mod car_filter;
pub mod car_model;
pub mod car_service;
pub mod lmdb_car_store;
pub mod local_store;
pub mod utils;
pub mod validation;

pub use crate::app_config::ApiConfig;
pub use crate::app_error::AppError;
pub use crate::auth_service::{AuthResponse, AuthService, LoginRequest, RegisterRequest, RegisterResponse};
pub use crate::car_filter::CarFilter;
pub use crate::car_model::{Car, CarCreateRequest, CarId, CarOwner, CarUpdateRequest};
pub use crate::car_service::CarService;
pub use crate::lmdb_car_store::LmdbCarStore;
pub use crate::local_store::{seed_cars, LocalCarStore, MemoryCarStore};
