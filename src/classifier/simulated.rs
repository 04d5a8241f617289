// ABOUTME: Simulated classifier that draws a random outcome instead of running inference
// Used by the demo front end and as a seedable stand-in for the real service

use super::{Classifier, ClassifierError, Scene};
use crate::models::{ActionTag, AlertLevel, Verdict};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

/// Demo backend drawing a random verdict per scene
#[derive(Debug)]
pub struct SimulatedClassifier {
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl SimulatedClassifier {
    /// Seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            latency: Duration::ZERO,
        }
    }

    /// Reproducible sequence of verdicts
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency: Duration::ZERO,
        }
    }

    /// Delay each classification to mimic a network round trip
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Map a uniform sample in [0, 1) onto one of the three demo outcomes
    pub fn outcome_for(sample: f64) -> Verdict {
        if sample < 0.33 {
            Verdict::new(
                true,
                AlertLevel::High,
                vec![ActionTag::ShareAlertWithAuthorities, ActionTag::InitiateRecording],
            )
        } else if sample < 0.66 {
            Verdict::new(
                true,
                AlertLevel::Medium,
                vec![ActionTag::TakeScreenshot, ActionTag::InitiateRecording],
            )
        } else {
            Verdict::clear()
        }
    }

    fn draw(&self) -> Result<f64, ClassifierError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ClassifierError::Unavailable("simulated rng poisoned".to_string()))?;
        Ok(rng.gen::<f64>())
    }
}

impl Default for SimulatedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for SimulatedClassifier {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn classify(&self, _scene: &Scene) -> Result<Verdict, ClassifierError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(Self::outcome_for(self.draw()?))
    }
}
