// ABOUTME: Diagnostics accumulator for non-fatal warnings during a deployment run.
// ABOUTME: Collects warnings that shouldn't fail an artifact but should be shown to users.

/// Collects non-fatal warnings during a run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a substitution fallback warning.
    pub fn substitution_fallback(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SubstitutionFallback,
            message: message.into(),
        }
    }

    /// Create a placeholder deploy warning.
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Placeholder,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Pipeline body wasn't valid JSON; only text substitution was applied.
    SubstitutionFallback,
    /// Artifact counted as deployed without being published.
    Placeholder,
}
