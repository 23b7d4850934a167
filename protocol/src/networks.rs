//! Network records (`/api/networks/`).
//!
//! Address fields are passed through as literal strings; the client performs
//! no CIDR or address validation.

use serde::{Deserialize, Serialize};

use crate::base::Entity;

/// Virtual network attachment modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkKind {
    #[serde(rename = "host")]
    Host,
    #[default]
    #[serde(rename = "shared")]
    Shared,
    #[serde(rename = "bridged")]
    Bridged,
}

/// Full network representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub uid: String,
    pub name: String,
    pub kind: NetworkKind,
    pub cidr: String,
    pub gateway: String,
    pub dhcp_start: String,
    pub dhcp_end: String,
}

impl Entity for Network {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Caller-supplied payload for network creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkCreate {
    pub name: String,
    pub kind: NetworkKind,
    pub cidr: String,
    pub gateway: String,
    pub dhcp_start: String,
    pub dhcp_end: String,
}

/// Caller-mutable fields for network modification. The attachment mode is
/// fixed after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkModify {
    pub name: String,
    pub cidr: String,
    pub gateway: String,
    pub dhcp_start: String,
    pub dhcp_end: String,
}

impl From<&Network> for NetworkModify {
    fn from(current: &Network) -> Self {
        Self {
            name: current.name.clone(),
            cidr: current.cidr.clone(),
            gateway: current.gateway.clone(),
            dhcp_start: current.dhcp_start.clone(),
            dhcp_end: current.dhcp_end.clone(),
        }
    }
}
