//! Request validation
//!
//! Every generation request is checked here before any raster work
//! starts, so a bad request never produces a partial image.

use crate::layers::CharacterLayerSet;
use crate::layout::Animation;
use serde::Serialize;
use thiserror::Error;

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// A single problem found in a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// The request field the issue refers to, e.g. `animations[2]`
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, field: field.into(), message: message.into() }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, field: field.into(), message: message.into() }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.severity, self.message, self.field)
    }
}

/// Outcome of validating a generation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when there are no errors (warnings are allowed)
    pub fn ok(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Severity::Warning)
    }

    fn messages(&self, severity: Severity) -> Vec<String> {
        self.issues.iter().filter(|i| i.severity == severity).map(|i| i.message.clone()).collect()
    }

    /// Turn a failing report into a [`ValidationError`].
    pub fn into_result(self) -> Result<ValidationReport, ValidationError> {
        if self.ok() {
            Ok(self)
        } else {
            Err(ValidationError { issues: self.issues.into_iter().filter(|i| i.severity == Severity::Error).collect() })
        }
    }
}

/// A request failed validation; carries every error found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid spritesheet request: {}", .issues.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

/// Validate layer configuration and animation selection.
///
/// `None` means the caller supplied nothing for that field. A missing
/// layer configuration, unknown animation ids and repeated ids are errors; an empty
/// selection is only a warning because callers substitute the full set.
///
/// # Examples
///
/// ```
/// use lpc_spritegen::layers::CharacterLayerSet;
/// use lpc_spritegen::validate::validate_request;
///
/// let layers = CharacterLayerSet::default();
/// let report = validate_request(Some(&layers), Some(&["walk", "not-a-real-animation"][..]));
/// assert!(!report.ok());
/// assert!(report.errors()[0].contains("not-a-real-animation"));
/// ```
pub fn validate_request<S: AsRef<str>>(
    layers: Option<&CharacterLayerSet>,
    selected: Option<&[S]>,
) -> ValidationReport {
    let mut issues = Vec::new();

    match layers {
        None => issues.push(ValidationIssue::error("layers", "Character parts configuration is required")),
        Some(layers) if !layers.any_enabled() => issues.push(ValidationIssue::warning(
            "layers",
            "No character layers enabled, frames will be blank",
        )),
        Some(_) => {}
    }

    if let Some(selected) = selected {
        if selected.is_empty() {
            issues.push(ValidationIssue::warning("animations", "No animations selected, will use default set"));
        }

        let mut seen = Vec::with_capacity(selected.len());
        for (i, id) in selected.iter().enumerate() {
            let id = id.as_ref();
            match Animation::from_id(id) {
                None => issues.push(ValidationIssue::error(
                    format!("animations[{}]", i),
                    format!("Unknown animation: {}", id),
                )),
                // Each animation owns exactly one block of rows
                Some(animation) if seen.contains(&animation) => issues.push(ValidationIssue::error(
                    format!("animations[{}]", i),
                    format!("Duplicate animation: {}", id),
                )),
                Some(animation) => seen.push(animation),
            }
        }
    }

    ValidationReport { issues }
}

/// Validate a selection and resolve it to animations.
///
/// An empty selection resolves to every animation in registry order.
pub fn resolve_animations<S: AsRef<str>>(selected: &[S]) -> Result<Vec<Animation>, ValidationError> {
    validate_request(Some(&CharacterLayerSet::default()), Some(selected)).into_result()?;

    if selected.is_empty() {
        return Ok(Animation::ALL.to_vec());
    }

    Ok(selected.iter().filter_map(|id| Animation::from_id(id.as_ref())).collect())
}
