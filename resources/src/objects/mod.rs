use std::collections::HashMap;
use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub mod metric_spec;
pub mod metrics;
pub mod object_reference;
pub mod pod;

/// Identifies an object by kind and name, for diagnostics.
pub trait Object {
    fn kind(&self) -> &'static str;
    fn name(&self) -> &String;
}

/// Common metadata carried by the workload the autoscaler scales.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

/// A set of key/value labels attached to a pod or workload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Labels(pub HashMap<String, String>);

impl Labels {
    pub fn matches(&self, selector: &Selector) -> bool {
        selector.0.iter().all(|(k, v)| self.0.get(k) == Some(v))
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        pairs.sort();
        write!(f, "{}", pairs.join(","))
    }
}

/// An equality-based label selector, e.g. `app=web,tier=frontend`. Set-based
/// selectors (`in`, `notin`, `exists`) are not supported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector(pub HashMap<String, String>);

impl Selector {
    /// Parses a comma-separated list of `key=value` terms. An empty or
    /// whitespace-only string is the selector that matches everything.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Selector::default());
        }
        let mut map = HashMap::new();
        for term in raw.split(',') {
            let (key, value) = term
                .split_once('=')
                .ok_or_else(|| anyhow!("invalid label selector term \"{term}\""))?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return Err(anyhow!("invalid label selector term \"{term}\""));
            }
            map.insert(key.to_string(), value.to_string());
        }
        Ok(Selector(map))
    }

    /// Parses `raw`, defaulting to the match-everything selector when absent.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(raw) => Selector::parse(raw),
            None => Ok(Selector::default()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        pairs.sort();
        write!(f, "{}", pairs.join(","))
    }
}
