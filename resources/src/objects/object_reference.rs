use serde::{Deserialize, Serialize};

/// A reference to another object, e.g. the workload an HPA scales
/// or the object an Object metric source describes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// Kind of the referent, e.g. "Deployment".
    pub kind: String,
    /// Name of the referent.
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}
