use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

/// What went wrong while compiling a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// A node or attribute named a component the registry does not define
    UnresolvedComponent,
    /// An uppercase attribute held a value that is neither a component name nor a node
    UnevaluableAttribute,
    /// The registry already defined the reserved root adapter name
    ReservedNameCollision,
    /// Top-level input could not be compiled at all
    MalformedInput,
}

/// Advisory message produced during compilation.
///
/// Diagnostics never abort a compilation; they describe what was skipped
/// or overridden so callers can decide whether to surface them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The severity level
    pub level: DiagnosticLevel,

    /// Category of the problem
    pub kind: DiagnosticKind,

    /// Human-readable message
    pub message: String,

    /// Location of the offending node in the data tree (empty for the root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            kind,
            message: message.into(),
            path: None,
        }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            kind,
            message: message.into(),
            path: None,
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }

    /// Forward this diagnostic to the tracing subscriber
    pub fn emit(&self) {
        match self.level {
            DiagnosticLevel::Error => tracing::error!(kind = ?self.kind, "{}", self),
            DiagnosticLevel::Warning => tracing::warn!(kind = ?self.kind, "{}", self),
            DiagnosticLevel::Info => tracing::info!(kind = ?self.kind, "{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.as_deref() {
            Some(path) if !path.is_empty() => write!(f, "{} (at `{}`)", self.message, path),
            _ => f.write_str(&self.message),
        }
    }
}
