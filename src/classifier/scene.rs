// ABOUTME: Opaque visual scene handed to the classifier as a base64 data URI

use super::ClassifierError;
use serde::{Deserialize, Serialize};

/// 1x1 transparent PNG used when no camera frame is available
pub const PLACEHOLDER_SCENE_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// A captured frame encoded as a data URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    data_uri: String,
}

impl Scene {
    /// Accepts `data:<mimetype>;base64,<encoded_data>`
    pub fn parse(data_uri: impl Into<String>) -> Result<Self, ClassifierError> {
        let data_uri = data_uri.into();
        let rest = data_uri
            .strip_prefix("data:")
            .ok_or_else(|| ClassifierError::InvalidScene("missing data: prefix".to_string()))?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| ClassifierError::InvalidScene("expected ;base64, separator".to_string()))?;

        if mime.is_empty() || !mime.contains('/') {
            return Err(ClassifierError::InvalidScene(format!("bad mime type '{}'", mime)));
        }
        if payload.is_empty() {
            return Err(ClassifierError::InvalidScene("empty payload".to_string()));
        }

        Ok(Self { data_uri })
    }

    /// Scene used when no frame is available
    pub fn placeholder() -> Self {
        Self {
            data_uri: PLACEHOLDER_SCENE_URI.to_string(),
        }
    }

    /// Media type from the URI header, e.g. `image/png`
    pub fn mime_type(&self) -> &str {
        self.data_uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map_or("", |(mime, _)| mime)
    }

    /// The full data URI
    pub fn as_data_uri(&self) -> &str {
        &self.data_uri
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::placeholder()
    }
}
