// ABOUTME: Non-fatal warnings raised while a deployment runs.
// ABOUTME: Warnings are logged when recorded and reported after the command finishes.

use std::fmt;

/// What went wrong without failing the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The deploy lock file could not be removed.
    LockRelease,
    /// Local deployment tags could not be removed after a release.
    TagCleanup,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::LockRelease => f.write_str("lock release"),
            WarningKind::TagCleanup => f.write_str("tag cleanup"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn lock_release(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LockRelease,
            message: message.into(),
        }
    }

    pub fn tag_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::TagCleanup,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Warnings collected over one command.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record `warning` and emit it through tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = %warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Move every warning from `other` into this collection.
    pub fn absorb(&mut self, other: &mut Diagnostics) {
        self.warnings.append(&mut other.warnings);
    }
}
