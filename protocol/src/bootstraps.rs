//! Bootstrap configuration records (`/api/bootstraps/`).

use serde::{Deserialize, Serialize};

use crate::base::Entity;

/// Bootstrap configuration dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapKind {
    #[default]
    #[serde(rename = "ignition")]
    Ignition,
    #[serde(rename = "cloud-init")]
    CloudInit,
}

/// Full bootstrap configuration representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bootstrap {
    pub uid: String,
    pub name: String,
    pub kind: BootstrapKind,
    /// Raw configuration text in the dialect named by `kind`.
    pub content: String,
    /// Template keys the content references, in order of appearance.
    /// Computed by the server, read-only.
    #[serde(default)]
    pub required_keys: Vec<String>,
}

impl Entity for Bootstrap {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Caller-supplied payload for bootstrap creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BootstrapCreate {
    pub name: String,
    pub kind: BootstrapKind,
    pub content: String,
}

impl BootstrapCreate {
    pub fn new(name: impl Into<String>, kind: BootstrapKind, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            content: content.into(),
        }
    }
}

/// Caller-mutable fields for bootstrap modification. `required_keys` is
/// recomputed server-side and never accepted on modify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapModify {
    pub name: String,
    pub kind: BootstrapKind,
    pub content: String,
}

impl From<&Bootstrap> for BootstrapModify {
    fn from(current: &Bootstrap) -> Self {
        Self {
            name: current.name.clone(),
            kind: current.kind,
            content: current.content.clone(),
        }
    }
}
