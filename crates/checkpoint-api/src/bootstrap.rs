//! # Reference Data Bootstrap
//!
//! Seeds toll offices and required-document links at startup.
//!
//! If `REFERENCE_DATA` names a YAML file, it is loaded:
//!
//! ```yaml
//! toll_offices:
//!   - country: fr
//!   - country: gb
//! required_documents:
//!   - country: fr
//!     links:
//!       - https://www.service-public.fr/particuliers/vosdroits/N360
//! ```
//!
//! Otherwise the built-in defaults are used.

use std::path::{Path, PathBuf};

use checkpoint_core::CountryCode;
use checkpoint_state::RequiredDocument;
use serde::Deserialize;

use crate::state::{AppConfig, AppState};

/// Errors during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Reference data file not found at the given path.
    #[error("reference data not found: {path}")]
    NotFound { path: PathBuf },

    /// Reference data file is not valid YAML for [`ReferenceData`].
    #[error("invalid reference data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Reference data parsed but failed validation.
    #[error("invalid reference data: {errors:?}")]
    Invalid { errors: Vec<String> },

    /// IO error during bootstrap.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Seed file layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub toll_offices: Vec<TollOfficeSeed>,
    #[serde(default)]
    pub required_documents: Vec<RequiredDocument>,
}

/// One toll office to create.
#[derive(Debug, Clone, Deserialize)]
pub struct TollOfficeSeed {
    pub country: CountryCode,
}

impl ReferenceData {
    /// Built-in reference data: one toll office each in France and the
    /// United Kingdom, with their entry-document links.
    pub fn builtin() -> Self {
        let code = |c: &str| CountryCode::new(c);
        let (Ok(fr), Ok(gb)) = (code("FR"), code("GB")) else {
            return Self::default();
        };
        Self {
            toll_offices: vec![
                TollOfficeSeed {
                    country: fr.clone(),
                },
                TollOfficeSeed {
                    country: gb.clone(),
                },
            ],
            required_documents: vec![
                RequiredDocument {
                    country: fr,
                    links: vec![
                        "https://www.service-public.fr/particuliers/vosdroits/N360".into(),
                        "https://france-visas.gouv.fr/".into(),
                    ],
                },
                RequiredDocument {
                    country: gb,
                    links: vec![
                        "https://www.gov.uk/uk-border-control".into(),
                        "https://www.gov.uk/check-uk-visa".into(),
                    ],
                },
            ],
        }
    }

    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        if !path.exists() {
            return Err(BootstrapError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let data: Self = serde_yaml::from_str(&text).map_err(|source| BootstrapError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        data.validate()?;
        Ok(data)
    }

    /// Every country must be an assigned ISO 3166-1 code, and each
    /// required-document country may appear only once.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        let mut errors = Vec::new();
        for seed in &self.toll_offices {
            if !seed.country.is_assigned() {
                errors.push(format!("toll office country {} is not assigned", seed.country));
            }
        }
        let mut seen: Vec<&CountryCode> = Vec::new();
        for required in &self.required_documents {
            if !required.country.is_assigned() {
                errors.push(format!(
                    "required-document country {} is not assigned",
                    required.country
                ));
            }
            if seen.contains(&&required.country) {
                errors.push(format!(
                    "required-document country {} listed twice",
                    required.country
                ));
            }
            seen.push(&required.country);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BootstrapError::Invalid { errors })
        }
    }

    /// Insert everything into `state`'s registry.
    pub fn apply(self, state: &AppState) {
        for seed in self.toll_offices {
            state.registry.add_toll_office(seed.country);
        }
        for required in self.required_documents {
            state.registry.set_required_documents(required);
        }
    }
}

/// Build the application state and seed its reference data.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let data = match &config.reference_data {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading reference data");
            ReferenceData::load(path)?
        }
        None => ReferenceData::builtin(),
    };
    let state = AppState::with_config(config);
    let (tolls, required) = (data.toll_offices.len(), data.required_documents.len());
    data.apply(&state);
    tracing::info!(
        toll_offices = tolls,
        required_documents = required,
        auth_enabled = state.config.auth_token.is_some(),
        "checkpoint bootstrapped"
    );
    Ok(state)
}
