// ABOUTME: Environment-specific parameter substitution for pipeline bodies.
// ABOUTME: Text replacement first, then JSON-aware replacement with a text-only fallback.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{MissingEnvVar, ParameterRules};
use crate::types::Environment;

#[derive(Debug, Error)]
pub enum SubstitutionError {
    #[error("cannot resolve {env} value for {target}: {source}")]
    Unresolved {
        target: String,
        env: Environment,
        #[source]
        source: MissingEnvVar,
    },
}

/// Source of environment-keyed replacement rules.
pub trait EnvironmentConfig: Send + Sync {
    /// Plain text replacement on the raw body.
    fn substitute_text(&self, text: &str, env: Environment) -> Result<String, SubstitutionError>;

    /// Replacement on the parsed body.
    fn substitute_structured(
        &self,
        body: Value,
        env: Environment,
    ) -> Result<Value, SubstitutionError>;
}

impl EnvironmentConfig for ParameterRules {
    fn substitute_text(&self, text: &str, env: Environment) -> Result<String, SubstitutionError> {
        let mut out = text.to_string();
        for rule in &self.find_replace {
            if rule.find.is_empty() {
                continue;
            }
            let Some(value) = rule.replace_value.get(&env) else {
                continue;
            };
            let replacement = value.resolve().map_err(|source| SubstitutionError::Unresolved {
                target: rule.find.clone(),
                env,
                source,
            })?;
            out = out.replace(&rule.find, &replacement);
        }
        Ok(out)
    }

    fn substitute_structured(
        &self,
        mut body: Value,
        env: Environment,
    ) -> Result<Value, SubstitutionError> {
        for rule in &self.key_value_replace {
            let Some(value) = rule.replace_value.get(&env) else {
                continue;
            };
            let Some(slot) = body.pointer_mut(&rule.path) else {
                debug!(path = %rule.path, "pointer not present in body");
                continue;
            };
            let replacement = value.resolve().map_err(|source| SubstitutionError::Unresolved {
                target: rule.path.clone(),
                env,
                source,
            })?;
            *slot = Value::String(replacement);
        }
        Ok(body)
    }
}

/// A substituted pipeline body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    pub body: String,
    /// Parse error that forced the text-only result, if any.
    pub fallback: Option<String>,
}

impl Substituted {
    pub fn fell_back(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Apply both substitution phases to a pipeline body.
///
/// A body that is not valid JSON after the text phase keeps the text result.
pub fn substitute<C>(
    config: &C,
    body: &str,
    env: Environment,
) -> Result<Substituted, SubstitutionError>
where
    C: EnvironmentConfig + ?Sized,
{
    let text = config.substitute_text(body, env)?;

    let parsed: Value = match serde_json::from_str(&text) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "pipeline body is not valid JSON, keeping text substitution only");
            return Ok(Substituted {
                body: text,
                fallback: Some(e.to_string()),
            });
        }
    };

    let rewritten = config.substitute_structured(parsed, env)?;
    match serde_json::to_string(&rewritten) {
        Ok(body) => Ok(Substituted {
            body,
            fallback: None,
        }),
        Err(e) => {
            warn!(
                error = %e,
                "failed to serialize substituted body, keeping text substitution only"
            );
            Ok(Substituted {
                body: text,
                fallback: Some(e.to_string()),
            })
        }
    }
}
