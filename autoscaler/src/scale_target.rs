//! Resolves the `ScaleSubresource` collaborator (§6) from the unstructured
//! `"resource"` JSON both CLI modes receive on stdin.

use anyhow::{anyhow, Result};
use resources::objects::Selector;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTarget {
    pub namespace: String,
    pub name: String,
    pub replicas: u32,
    pub selector: Selector,
}

#[derive(Debug, Deserialize)]
struct UnstructuredResource {
    kind: String,
    #[serde(default)]
    metadata: UnstructuredMetadata,
    #[serde(default)]
    spec: UnstructuredSpec,
}

#[derive(Debug, Deserialize, Default)]
struct UnstructuredMetadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    namespace: String,
}

#[derive(Debug, Deserialize, Default)]
struct UnstructuredSpec {
    #[serde(default)]
    replicas: u32,
    #[serde(default)]
    selector: Option<String>,
}

/// Workload kinds this system knows how to scale. Anything else is an
/// `UnsupportedResource` error, raised before any metric spec is evaluated.
const SUPPORTED_KINDS: [&str; 3] = ["Deployment", "ReplicaSet", "StatefulSet"];

pub fn resolve(raw: &Value) -> Result<ScaleTarget> {
    let resource: UnstructuredResource =
        serde_json::from_value(raw.clone()).map_err(|err| anyhow!("malformed resource descriptor: {err}"))?;
    if !SUPPORTED_KINDS.contains(&resource.kind.as_str()) {
        return Err(anyhow!("Unsupported resource of type {}", resource.kind));
    }
    let selector = Selector::parse_optional(resource.spec.selector.as_deref())?;
    Ok(ScaleTarget {
        namespace: resource.metadata.namespace,
        name: resource.metadata.name,
        replicas: resource.spec.replicas,
        selector,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_supported_kind() {
        let raw = json!({
            "kind": "Deployment",
            "metadata": {"name": "web", "namespace": "default"},
            "spec": {"replicas": 3, "selector": "app=web"},
        });
        let target = resolve(&raw).unwrap();
        assert_eq!(target.name, "web");
        assert_eq!(target.namespace, "default");
        assert_eq!(target.replicas, 3);
        assert_eq!(target.selector, Selector::parse("app=web").unwrap());
    }

    #[test]
    fn rejects_unsupported_kind() {
        let raw = json!({"kind": "DaemonSet", "metadata": {"name": "x"}});
        let err = resolve(&raw).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported resource of type DaemonSet");
    }

    #[test]
    fn missing_selector_matches_everything() {
        let raw = json!({"kind": "StatefulSet", "metadata": {"name": "db"}, "spec": {"replicas": 1}});
        let target = resolve(&raw).unwrap();
        assert_eq!(target.selector, Selector::default());
    }
}
