//! Car records access layer.
//!
//! Every operation follows the same policy:
//!
//! 1. mock mode on: serve from the local store only;
//! 2. otherwise call the backend, and if (and only if) the call fails with
//!    [`AppError::NetworkUnreachable`], run the same operation once against
//!    the local store and return that instead.
//!
//! Input is validated before either path runs, so a rejected plate never
//! reaches the network and never triggers the fallback.

use std::sync::Arc;

use log::{debug, warn};
use reqwest::Method;

use crate::app_config::ApiConfig;
use crate::app_error::AppError;
use crate::backend_client::BackendClient;
use crate::car_model::{Car, CarCreateRequest, CarId, CarListPayload, CarUpdateRequest};
use crate::local_store::{LocalCarStore, MemoryCarStore};
use crate::utils::simulate_latency;
use crate::validation::{validate_create, validate_update};

const CARS_PATH: &[&str] = &["api", "cars"];

pub struct CarService {
    config: ApiConfig,
    backend: Option<BackendClient>,
    local: Arc<dyn LocalCarStore>,
}

impl CarService {
    /// Service backed by a freshly seeded in-memory store.
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        Self::with_store(config, Arc::new(MemoryCarStore::seeded()))
    }

    pub fn with_store(config: ApiConfig, local: Arc<dyn LocalCarStore>) -> Result<Self, AppError> {
        let backend = if config.use_mock_data || config.base_url.is_empty() {
            None
        } else {
            Some(BackendClient::new(&config.base_url, config.request_timeout)?)
        };

        Ok(Self {
            config,
            backend,
            local,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn local_store(&self) -> &Arc<dyn LocalCarStore> {
        &self.local
    }

    pub async fn list(&self, token: Option<&str>) -> Result<Vec<Car>, AppError> {
        if self.config.use_mock_data {
            return self.list_local().await;
        }

        match self.list_remote(token).await {
            Err(err) if err.is_network_unreachable() => {
                log_fallback("list", &err);
                self.list_local().await
            }
            other => other,
        }
    }

    pub async fn create(
        &self,
        request: CarCreateRequest,
        token: Option<&str>,
    ) -> Result<Car, AppError> {
        validate_create(&request)?;
        let request = request.normalized();

        if self.config.use_mock_data {
            return self.create_local(request).await;
        }

        match self.create_remote(&request, token).await {
            Err(err) if err.is_network_unreachable() => {
                log_fallback("create", &err);
                self.create_local(request).await
            }
            other => other,
        }
    }

    pub async fn update(
        &self,
        id: impl Into<CarId>,
        changes: CarUpdateRequest,
        token: Option<&str>,
    ) -> Result<Car, AppError> {
        let id = id.into();
        validate_update(&changes)?;
        let changes = changes.normalized();

        if self.config.use_mock_data {
            return self.update_local(&id, &changes).await;
        }

        match self.update_remote(&id, &changes, token).await {
            Err(err) if err.is_network_unreachable() => {
                log_fallback("update", &err);
                self.update_local(&id, &changes).await
            }
            other => other,
        }
    }

    pub async fn delete(&self, id: impl Into<CarId>, token: Option<&str>) -> Result<(), AppError> {
        let id = id.into();

        if self.config.use_mock_data {
            return self.delete_local(&id).await;
        }

        match self.delete_remote(&id, token).await {
            Err(err) if err.is_network_unreachable() => {
                log_fallback("delete", &err);
                self.delete_local(&id).await
            }
            other => other,
        }
    }

    fn backend(&self) -> Result<&BackendClient, AppError> {
        self.backend
            .as_ref()
            .ok_or_else(|| AppError::Configuration("Backend URL not configured".to_string()))
    }

    async fn list_remote(&self, token: Option<&str>) -> Result<Vec<Car>, AppError> {
        let payload: CarListPayload = self.backend()?.get_json(CARS_PATH, token).await?;
        Ok(payload.into_cars())
    }

    async fn create_remote(
        &self,
        request: &CarCreateRequest,
        token: Option<&str>,
    ) -> Result<Car, AppError> {
        debug!("Sending new car {} to the backend", request.plate_number);
        self.backend()?
            .send_json(Method::POST, CARS_PATH, request, token)
            .await
    }

    async fn update_remote(
        &self,
        id: &CarId,
        changes: &CarUpdateRequest,
        token: Option<&str>,
    ) -> Result<Car, AppError> {
        self.backend()?
            .send_json(Method::PUT, &car_path(id), changes, token)
            .await
    }

    async fn delete_remote(&self, id: &CarId, token: Option<&str>) -> Result<(), AppError> {
        self.backend()?
            .send_empty(Method::DELETE, &car_path(id), token)
            .await
    }

    async fn list_local(&self) -> Result<Vec<Car>, AppError> {
        simulate_latency(self.config.mock_latency).await;
        self.local.list()
    }

    async fn create_local(&self, request: CarCreateRequest) -> Result<Car, AppError> {
        simulate_latency(self.config.mock_latency).await;
        self.local.create(request)
    }

    async fn update_local(&self, id: &CarId, changes: &CarUpdateRequest) -> Result<Car, AppError> {
        simulate_latency(self.config.mock_latency).await;
        self.local.update(id.as_str(), changes)
    }

    async fn delete_local(&self, id: &CarId) -> Result<(), AppError> {
        simulate_latency(self.config.mock_latency).await;
        self.local.delete(id.as_str())
    }
}

/// Segments of a single record's resource; the id is percent-encoded as one segment.
fn car_path(id: &CarId) -> [&str; 3] {
    [CARS_PATH[0], CARS_PATH[1], id.as_str()]
}

fn log_fallback(operation: &str, err: &AppError) {
    warn!(
        "Backend not reachable during {operation} ({}); falling back to local store",
        err.message()
    );
}
