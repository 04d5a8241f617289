// ABOUTME: Panic classifier boundary: trait for classifier backends plus a fault-absorbing client
// Backends are an HTTP inference service or the simulated demo classifier

/// Classifier errors
pub mod error;
/// HTTP inference backend
pub mod http;
/// Scene input
pub mod scene;
/// Random demo backend
pub mod simulated;

pub use error::ClassifierError;
pub use http::HttpClassifier;
pub use scene::{Scene, PLACEHOLDER_SCENE_URI};
pub use simulated::SimulatedClassifier;

use crate::config::{ClassifierBackend, ClassifierConfig};
use crate::models::Verdict;
use async_trait::async_trait;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A service that judges whether a scene shows panic or distress
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &str;

    /// Classify one scene
    async fn classify(&self, scene: &Scene) -> Result<Verdict, ClassifierError>;
}

/// Wraps a classifier backend so callers always receive a verdict
#[derive(Clone)]
pub struct ClassifierClient {
    backend: Arc<dyn Classifier>,
}

impl ClassifierClient {
    /// Wrap an existing backend
    pub fn new(backend: Arc<dyn Classifier>) -> Self {
        Self { backend }
    }

    /// Build the backend selected in configuration
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let backend: Arc<dyn Classifier> = match config.backend {
            ClassifierBackend::Simulated => Arc::new(match config.seed {
                Some(seed) => SimulatedClassifier::seeded(seed),
                None => SimulatedClassifier::new(),
            }),
            ClassifierBackend::Http => {
                let endpoint = config.endpoint.clone().ok_or_else(|| {
                    ClassifierError::Unavailable("http backend selected without an endpoint".to_string())
                })?;
                Arc::new(HttpClassifier::new(
                    endpoint,
                    Duration::from_secs(config.timeout_secs),
                )?)
            }
        };
        Ok(Self::new(backend))
    }

    /// Name of the wrapped backend
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Classify a scene. Faults and panics inside the backend yield the safe default.
    pub async fn analyze(&self, scene: &Scene) -> Verdict {
        let outcome = AssertUnwindSafe(self.backend.classify(scene))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(verdict)) => {
                debug!(
                    "Classifier '{}' verdict: panic={} level={}",
                    self.backend.name(),
                    verdict.panic_detected,
                    verdict.alert_level
                );
                verdict
            }
            Ok(Err(e)) => {
                warn!("Error during panic detection ({}): {}", self.backend.name(), e);
                Verdict::safe_default()
            }
            Err(_) => {
                warn!("Classifier '{}' panicked during analysis", self.backend.name());
                Verdict::safe_default()
            }
        }
    }
}

impl std::fmt::Debug for ClassifierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierClient")
            .field("backend", &self.backend.name())
            .finish()
    }
}
