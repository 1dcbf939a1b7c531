use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Runtime parameters handed to a config at load time.
///
/// This is how credentials reach a flow: configs reference `${username}`
/// and `${password}` instead of carrying secrets, and the values arrive
/// from the CLI (`-P key=value`) or from the embedding program.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    /// Create empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse from CLI args like "key=value".
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut params = Self::new();
        for arg in args {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                Error::Config(format!("invalid param '{}', expected key=value", arg))
            })?;
            params.values.insert(key.to_string(), value.to_string());
        }
        Ok(params)
    }
}

/// Parameter definition in a config's `params` block.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDef {
    /// Whether this parameter must be supplied.
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided.
    pub default: Option<String>,

    /// Description for `--check` output.
    pub description: Option<String>,
}

/// Substitute `${var}` patterns in a string.
///
/// Resolution order: supplied value, then the definition's default. A
/// missing required parameter is an error naming the parameter; an
/// undeclared `${var}` is left untouched. Substituted values are not
/// re-scanned.
pub fn substitute(
    template: &str,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        let Some(close) = rest[start..].find('}') else {
            // Unterminated pattern, keep the tail verbatim
            break;
        };
        let end = start + close;

        out.push_str(&rest[..start]);
        let name = &rest[start + 2..end];
        match resolve(name, params, defs)? {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..=end]),
        }
        rest = &rest[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Resolve one parameter name; `None` means it was never declared.
fn resolve(
    name: &str,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<Option<String>> {
    if let Some(value) = params.get(name) {
        return Ok(Some(value.to_string()));
    }
    match defs.get(name) {
        Some(def) => {
            if let Some(ref default) = def.default {
                Ok(Some(default.clone()))
            } else if def.required {
                Err(Error::Config(format!(
                    "missing required parameter: {}",
                    name
                )))
            } else {
                // Optional with no default resolves to empty
                Ok(Some(String::new()))
            }
        }
        None => Ok(None),
    }
}

/// Recursively substitute params in a serde_yaml::Value.
pub fn substitute_value(
    value: &mut serde_yaml::Value,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<()> {
    match value {
        serde_yaml::Value::String(s) => {
            *s = substitute(s, params, defs)?;
        }
        serde_yaml::Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        serde_yaml::Value::Sequence(seq) => {
            for v in seq.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        _ => {}
    }
    Ok(())
}
