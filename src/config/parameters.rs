// ABOUTME: Environment-keyed substitution rules loaded from the config file.
// ABOUTME: Text find/replace rules and JSON-pointer rules for pipeline bodies.

use serde::Deserialize;
use std::collections::HashMap;

use super::EnvValue;
use crate::types::Environment;

/// All substitution rules for a project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterRules {
    /// Applied to the raw pipeline text.
    #[serde(default)]
    pub find_replace: Vec<FindReplace>,

    /// Applied to the parsed pipeline body.
    #[serde(default)]
    pub key_value_replace: Vec<KeyValueReplace>,
}

/// Replace every occurrence of `find` with the value for the target environment.
#[derive(Debug, Clone, Deserialize)]
pub struct FindReplace {
    pub find: String,
    pub replace_value: HashMap<Environment, EnvValue>,
}

/// Replace the value at a JSON pointer with the value for the target environment.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyValueReplace {
    pub path: String,
    pub replace_value: HashMap<Environment, EnvValue>,
}

impl FindReplace {
    pub fn new(find: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace_value: HashMap::new(),
        }
    }

    pub fn with(mut self, env: Environment, value: impl Into<EnvValue>) -> Self {
        self.replace_value.insert(env, value.into());
        self
    }
}

impl KeyValueReplace {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            replace_value: HashMap::new(),
        }
    }

    pub fn with(mut self, env: Environment, value: impl Into<EnvValue>) -> Self {
        self.replace_value.insert(env, value.into());
        self
    }
}

impl ParameterRules {
    pub fn is_empty(&self) -> bool {
        self.find_replace.is_empty() && self.key_value_replace.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_a_rule_is_added() {
        assert!(ParameterRules::default().is_empty());

        let rules = ParameterRules {
            find_replace: vec![],
            key_value_replace: vec![
                KeyValueReplace::new("/properties/pool").with(Environment::Prod, "p"),
            ],
        };
        assert!(!rules.is_empty());
    }
}
