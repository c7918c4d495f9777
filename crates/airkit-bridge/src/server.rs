//! IP transport surface for the accessory.
//!
//! [`AccessoryServer`] owns the characteristic store the bridge publishes
//! into and exposes it to clients over HTTP. It stands in for the external
//! accessory-protocol transport: pairing, encryption and client discovery
//! belong to that protocol and are out of scope here; this surface serves the
//! same characteristic database as plain JSON.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use airkit_core::AccessorySink;
use airkit_types::AccessoryState;

use crate::config::AccessoryConfig;

/// Accessory identity served beside the characteristics.
#[derive(Debug, Clone, Serialize)]
pub struct AccessoryInfo {
    /// Display name.
    pub name: String,
    /// Serial number.
    pub serial: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model number.
    pub model: String,
}

impl From<&AccessoryConfig> for AccessoryInfo {
    fn from(config: &AccessoryConfig) -> Self {
        Self {
            name: config.name.clone(),
            serial: config.serial.clone(),
            manufacturer: config.manufacturer.clone(),
            model: config.model.clone(),
        }
    }
}

/// The accessory transport's characteristic store.
///
/// The bridge loop is the only writer (via [`AccessorySink`]); HTTP clients
/// are concurrent readers of whole-state snapshots.
pub struct AccessoryServer {
    info: AccessoryInfo,
    state: RwLock<AccessoryState>,
}

impl AccessoryServer {
    /// Create a server with all characteristics at their defaults.
    #[must_use]
    pub fn new(info: AccessoryInfo) -> Arc<Self> {
        Arc::new(Self {
            info,
            state: RwLock::new(AccessoryState::default()),
        })
    }

    /// Snapshot of the characteristic store.
    pub async fn state(&self) -> AccessoryState {
        self.state.read().await.clone()
    }

    /// Router exposing the accessory surface.
    #[must_use]
    pub fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route("/accessory", get(get_accessory))
            .route("/health", get(health))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(self))
    }
}

/// Full accessory document: identity plus current characteristics.
#[derive(Debug, Serialize)]
struct AccessoryDocument {
    info: AccessoryInfo,
    characteristics: AccessoryState,
}

async fn get_accessory(State(server): State<Arc<AccessoryServer>>) -> Json<AccessoryDocument> {
    Json(AccessoryDocument {
        info: server.info.clone(),
        characteristics: server.state().await,
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[async_trait]
impl AccessorySink for AccessoryServer {
    async fn set_temperature(&self, value: f64, step: f64) {
        let mut state = self.state.write().await;
        state.temperature = value;
        state.temperature_step = step;
        state.updated_at = Some(OffsetDateTime::now_utc());
    }

    async fn set_humidity(&self, value: f64, step: f64) {
        let mut state = self.state.write().await;
        state.humidity = value;
        state.humidity_step = step;
        state.updated_at = Some(OffsetDateTime::now_utc());
    }

    async fn set_co2_level(&self, value: f64) {
        let mut state = self.state.write().await;
        state.co2_level = value;
        state.updated_at = Some(OffsetDateTime::now_utc());
    }

    async fn set_co2_detected(&self, detected: bool) {
        let mut state = self.state.write().await;
        state.co2_detected = detected;
        state.updated_at = Some(OffsetDateTime::now_utc());
    }
}
