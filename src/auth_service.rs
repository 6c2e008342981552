//! Login and registration calls against `/api/auth/*`.
//!
//! Same mode policy as the car operations: mock mode answers locally, an
//! unreachable backend falls back to the mock answer, anything else is
//! returned to the caller.

use log::warn;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use validator::Validate;

use crate::app_config::ApiConfig;
use crate::app_error::AppError;
use crate::backend_client::BackendClient;
use crate::car_model::CarOwner;
use crate::utils::{simulate_latency, unix_millis};

const LOGIN_PATH: &[&str] = &["api", "auth", "login"];
const REGISTER_PATH: &[&str] = &["api", "auth", "register"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: CarOwner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: CarOwner,
}

pub struct AuthService {
    config: ApiConfig,
    backend: Option<BackendClient>,
}

impl AuthService {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let backend = if config.use_mock_data || config.base_url.is_empty() {
            None
        } else {
            Some(BackendClient::new(&config.base_url, config.request_timeout)?)
        };
        Ok(Self { config, backend })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        if self.config.use_mock_data {
            return Ok(self.login_mock(&request).await);
        }

        let result = match &self.backend {
            Some(backend) => {
                backend
                    .send_json(Method::POST, LOGIN_PATH, &request, None)
                    .await
            }
            None => Err(not_configured()),
        };

        match result {
            Err(err) if err.is_network_unreachable() => {
                warn!("Auth backend not reachable during login ({}); using mock login", err.message());
                Ok(self.login_mock(&request).await)
            }
            other => other,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, AppError> {
        request.validate()?;

        if self.config.use_mock_data {
            return Ok(self.register_mock(&request).await);
        }

        let result = match &self.backend {
            Some(backend) => {
                backend
                    .send_json(Method::POST, REGISTER_PATH, &request, None)
                    .await
            }
            None => Err(not_configured()),
        };

        match result {
            Err(err) if err.is_network_unreachable() => {
                warn!(
                    "Auth backend not reachable during register ({}); using mock registration",
                    err.message()
                );
                Ok(self.register_mock(&request).await)
            }
            other => other,
        }
    }

    async fn login_mock(&self, request: &LoginRequest) -> AuthResponse {
        simulate_latency(self.config.mock_latency).await;
        AuthResponse {
            token: format!("mock-jwt-token-{}", unix_millis()),
            user: CarOwner {
                id: "1".to_string(),
                username: request.username.clone(),
                email: "user@example.com".to_string(),
                extra: Map::new(),
            },
        }
    }

    async fn register_mock(&self, request: &RegisterRequest) -> RegisterResponse {
        simulate_latency(self.config.mock_latency).await;
        RegisterResponse {
            message: "User registered successfully".to_string(),
            user: CarOwner {
                id: rand::random_range(0..1000u32).to_string(),
                username: request.username.clone(),
                email: request.email.clone(),
                extra: Map::new(),
            },
        }
    }
}

fn not_configured() -> AppError {
    AppError::Configuration("Backend URL not configured".to_string())
}
