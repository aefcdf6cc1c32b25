//! # Application State
//!
//! Shared state for the Axum application: the registry of in-memory stores,
//! the injected collaborators, and the runtime configuration.

use std::path::PathBuf;
use std::sync::Arc;

use checkpoint_state::{
    DocumentValidator, FaceMatcher, MockFaceMatcher, MockOfficialValidator, Registry, Workflow,
};

/// Default request body limit for uploads, in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared bearer secret. If `None`, authentication is disabled.
    pub auth_token: Option<String>,
    /// Request body limit for document and photo uploads.
    pub max_upload_bytes: usize,
    /// YAML file seeding toll offices and required documents.
    pub reference_data: Option<PathBuf>,
}

impl AppConfig {
    /// Build configuration from `PORT`, `AUTH_TOKEN`, `MAX_UPLOAD_BYTES` and
    /// `REFERENCE_DATA`. Unparseable numbers fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            auth_token: lookup("AUTH_TOKEN").filter(|t| !t.is_empty()),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            reference_data: lookup("REFERENCE_DATA")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            reference_data: None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("reference_data", &self.reference_data)
            .finish()
    }
}

/// Shared application state. Clones share the underlying stores.
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub validator: Arc<dyn DocumentValidator>,
    pub face_matcher: Arc<dyn FaceMatcher>,
    pub config: AppConfig,
}

impl AppState {
    /// Empty state with default configuration and mock collaborators.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Empty state with the given configuration and mock collaborators.
    pub fn with_config(config: AppConfig) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(MockOfficialValidator),
            Arc::new(MockFaceMatcher),
        )
    }

    /// Empty state with explicit collaborators.
    pub fn with_collaborators(
        config: AppConfig,
        validator: Arc<dyn DocumentValidator>,
        face_matcher: Arc<dyn FaceMatcher>,
    ) -> Self {
        Self {
            registry: Registry::new(),
            validator,
            face_matcher,
            config,
        }
    }

    /// Workflow bound to this state's registry and validator.
    pub fn workflow(&self) -> Workflow<'_> {
        Workflow::new(&self.registry, self.validator.as_ref())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("crossings", &self.registry.crossings.len())
            .field("toll_offices", &self.registry.toll_offices.len())
            .field("persons", &self.registry.persons.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
