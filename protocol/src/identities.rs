//! Identity records (`/api/identities/`).

use serde::{Deserialize, Serialize};

use crate::base::Entity;

/// Credential flavor of an identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityKind {
    #[default]
    #[serde(rename = "pubkey")]
    Pubkey,
    #[serde(rename = "password")]
    Password,
}

/// Full identity representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub name: String,
    pub kind: IdentityKind,
    pub gecos: String,
    pub homedir: String,
    pub shell: String,
    /// Public key material or raw password, depending on `kind`.
    pub credential: String,
}

impl Entity for Identity {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Caller-supplied payload for identity creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityCreate {
    pub name: String,
    pub kind: IdentityKind,
    pub gecos: String,
    pub homedir: String,
    pub shell: String,
    pub credential: String,
}

/// Caller-mutable fields for identity modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityModify {
    pub name: String,
    pub kind: IdentityKind,
    pub gecos: String,
    pub homedir: String,
    pub shell: String,
    pub credential: String,
}

impl From<&Identity> for IdentityModify {
    fn from(current: &Identity) -> Self {
        Self {
            name: current.name.clone(),
            kind: current.kind,
            gecos: current.gecos.clone(),
            homedir: current.homedir.clone(),
            shell: current.shell.clone(),
            credential: current.credential.clone(),
        }
    }
}
