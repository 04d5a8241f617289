// ABOUTME: Verdict data model returned by the panic classifier
// Mirrors the classifier wire schema: panicDetected, alertLevel, actionsTaken

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Marker attached to the safe default when classification failed
pub const ANALYSIS_ERROR_MARKER: &str = "Error during analysis.";

/// Severity assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// No action needed
    Low,
    /// Possible distress
    Medium,
    /// Likely distress; notified as destructive
    High,
}

impl AlertLevel {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Low => "low",
            AlertLevel::Medium => "medium",
            AlertLevel::High => "high",
        }
    }

    /// Badge text shown in the analysis panel, e.g. "High Alert"
    pub fn badge(&self) -> &'static str {
        match self {
            AlertLevel::Low => "Low Alert",
            AlertLevel::Medium => "Medium Alert",
            AlertLevel::High => "High Alert",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Automatic action the classifier reports having taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    /// Captured a still frame
    TakeScreenshot,
    /// Started recording video
    InitiateRecording,
    /// Forwarded the alert to emergency services
    ShareAlertWithAuthorities,
}

impl ActionTag {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTag::TakeScreenshot => "take_screenshot",
            ActionTag::InitiateRecording => "initiate_recording",
            ActionTag::ShareAlertWithAuthorities => "share_alert_with_authorities",
        }
    }

    /// Human readable form with underscores replaced by spaces
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl FromStr for ActionTag {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "take_screenshot" => Ok(ActionTag::TakeScreenshot),
            "initiate_recording" => Ok(ActionTag::InitiateRecording),
            "share_alert_with_authorities" => Ok(ActionTag::ShareAlertWithAuthorities),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for one scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// Whether the scene shows panic or distress
    pub panic_detected: bool,
    /// Severity
    pub alert_level: AlertLevel,
    /// Actions already taken; unknown tags are dropped
    #[serde(default, deserialize_with = "known_actions")]
    pub actions_taken: Vec<ActionTag>,
    /// Set only on the safe default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Keep the tags we can act on; an unfamiliar tag must not cost us the alert itself
fn known_actions<'de, D>(deserializer: D) -> Result<Vec<ActionTag>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Vec::<String>::deserialize(deserializer)?;
    Ok(tags
        .into_iter()
        .filter_map(|tag| match tag.parse() {
            Ok(action) => Some(action),
            Err(unknown) => {
                warn!("Ignoring unknown action tag '{}'", unknown);
                None
            }
        })
        .collect())
}

impl Verdict {
    /// A verdict without the error marker
    pub fn new(panic_detected: bool, alert_level: AlertLevel, actions_taken: Vec<ActionTag>) -> Self {
        Self {
            panic_detected,
            alert_level,
            actions_taken,
            error: None,
        }
    }

    /// No panic, low alert, no actions
    pub fn clear() -> Self {
        Self::new(false, AlertLevel::Low, Vec::new())
    }

    /// The verdict substituted when the classifier faults
    pub fn safe_default() -> Self {
        Self {
            error: Some(ANALYSIS_ERROR_MARKER.to_string()),
            ..Self::clear()
        }
    }

    /// Whether this stands in for a failed classification
    pub fn is_fault(&self) -> bool {
        self.error.is_some()
    }

    /// Comma separated wire tags, e.g. "take_screenshot, initiate_recording"
    pub fn actions_summary(&self) -> String {
        self.actions_taken
            .iter()
            .map(ActionTag::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma separated labels for display, underscores replaced by spaces
    pub fn actions_label(&self) -> String {
        self.actions_taken
            .iter()
            .map(ActionTag::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_classifier_response() {
        let json = r#"{
            "panicDetected": true,
            "alertLevel": "high",
            "actionsTaken": ["share_alert_with_authorities", "initiate_recording"]
        }"#;

        let verdict: Verdict = serde_json::from_str(json).unwrap();
        assert!(verdict.panic_detected);
        assert_eq!(verdict.alert_level, AlertLevel::High);
        assert_eq!(
            verdict.actions_taken,
            vec![ActionTag::ShareAlertWithAuthorities, ActionTag::InitiateRecording]
        );
        assert!(verdict.error.is_none());
    }

    #[test]
    fn unknown_action_tags_do_not_discard_alert() {
        let json = r#"{
            "panicDetected": true,
            "alertLevel": "high",
            "actionsTaken": ["call_mom", "initiate_recording"]
        }"#;

        let verdict: Verdict = serde_json::from_str(json).unwrap();
        assert!(verdict.panic_detected);
        assert_eq!(verdict.alert_level, AlertLevel::High);
        assert_eq!(verdict.actions_taken, vec![ActionTag::InitiateRecording]);
        assert!(!verdict.is_fault());
    }

    #[test]
    fn unknown_alert_level_is_still_rejected() {
        let json = r#"{"panicDetected":true,"alertLevel":"severe","actionsTaken":[]}"#;
        assert!(serde_json::from_str::<Verdict>(json).is_err());
    }

    #[test]
    fn parses_wire_action_tags() {
        for tag in [
            ActionTag::TakeScreenshot,
            ActionTag::InitiateRecording,
            ActionTag::ShareAlertWithAuthorities,
        ] {
            assert_eq!(tag.as_str().parse::<ActionTag>(), Ok(tag));
        }
        assert_eq!("call_mom".parse::<ActionTag>(), Err("call_mom".to_string()));
    }

    #[test]
    fn safe_default_carries_error_marker() {
        let verdict = Verdict::safe_default();
        assert!(!verdict.panic_detected);
        assert_eq!(verdict.alert_level, AlertLevel::Low);
        assert!(verdict.actions_taken.is_empty());
        assert_eq!(verdict.error.as_deref(), Some(ANALYSIS_ERROR_MARKER));
        assert!(verdict.is_fault());
    }

    #[test]
    fn actions_label_replaces_underscores() {
        let verdict = Verdict::new(
            true,
            AlertLevel::Medium,
            vec![ActionTag::TakeScreenshot, ActionTag::InitiateRecording],
        );
        assert_eq!(verdict.actions_summary(), "take_screenshot, initiate_recording");
        assert_eq!(verdict.actions_label(), "take screenshot, initiate recording");
    }

    #[test]
    fn clear_verdict_serializes_without_error_field() {
        let json = serde_json::to_string(&Verdict::clear()).unwrap();
        assert_eq!(json, r#"{"panicDetected":false,"alertLevel":"low","actionsTaken":[]}"#);
    }
}
