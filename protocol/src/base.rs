//! Shared value objects and envelope shapes used by every collection.

use serde::{Deserialize, Serialize};

/// Common surface of every full entity record.
///
/// `uid` is the server-assigned identity and the sole cache key; `name` is
/// the mutable human-facing label. Generic code (caches, select options)
/// reaches records only through this trait.
pub trait Entity {
    /// Server-assigned unique identifier, immutable for the record's lifetime.
    fn uid(&self) -> &str;
    /// Mutable display name.
    fn name(&self) -> &str;
}

/// Binary magnitude units for storage and memory quantities.
///
/// Serialized as the spelled-out unit names the backend uses on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryScale {
    #[serde(rename = "Bytes")]
    Bytes,
    #[serde(rename = "Kilobytes")]
    Kilobytes,
    #[serde(rename = "Megabytes")]
    Megabytes,
    #[default]
    #[serde(rename = "Gigabytes")]
    Gigabytes,
    #[serde(rename = "Terabytes")]
    Terabytes,
    #[serde(rename = "Petabytes")]
    Petabytes,
    #[serde(rename = "Exabytes")]
    Exabytes,
}

/// A (magnitude, binary unit) pair.
///
/// Values are never normalized across units: equality is structural, so
/// 1024 Megabytes and 1 Gigabyte are distinct values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySizedValue {
    pub value: u64,
    pub scale: BinaryScale,
}

impl BinarySizedValue {
    pub fn new(value: u64, scale: BinaryScale) -> Self {
        Self { value, scale }
    }

    pub fn megabytes(value: u64) -> Self {
        Self::new(value, BinaryScale::Megabytes)
    }

    pub fn gigabytes(value: u64) -> Self {
        Self::new(value, BinaryScale::Gigabytes)
    }
}

impl std::fmt::Display for BinarySizedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = match self.scale {
            BinaryScale::Bytes => "B",
            BinaryScale::Kilobytes => "KB",
            BinaryScale::Megabytes => "MB",
            BinaryScale::Gigabytes => "GB",
            BinaryScale::Terabytes => "TB",
            BinaryScale::Petabytes => "PB",
            BinaryScale::Exabytes => "EB",
        };
        write!(f, "{} {unit}", self.value)
    }
}

/// List envelope returned by `GET /api/<collection>/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryList<G> {
    pub entries: Vec<G>,
}

/// Minimal (uid, name) projection for selection widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub uid: String,
    pub name: String,
}

impl SelectOption {
    pub fn of(entity: &impl Entity) -> Self {
        Self {
            uid: entity.uid().to_owned(),
            name: entity.name().to_owned(),
        }
    }
}

/// Discriminator carried in a fault body.
///
/// Anything the client does not recognize collapses to `Generic`, which
/// must stay the last variant for the `other` fallback to derive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    #[serde(rename = "not-found")]
    NotFound,
    #[serde(rename = "invariant-violation")]
    InvariantViolation,
    #[default]
    #[serde(rename = "generic-fault", other)]
    Generic,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultSchema {
    pub status: u16,
    pub msg: String,
    #[serde(default)]
    pub kind: FaultKind,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scale_uses_wire_names() {
        let json = serde_json::to_string(&BinarySizedValue::gigabytes(2)).expect("serialize");
        assert_eq!(json, r#"{"value":2,"scale":"Gigabytes"}"#);
    }

    #[test]
    fn sized_values_compare_structurally() {
        assert_ne!(
            BinarySizedValue::new(1024, BinaryScale::Megabytes),
            BinarySizedValue::gigabytes(1)
        );
    }

    #[test]
    fn unknown_fault_kind_collapses_to_generic() {
        let fault: FaultSchema =
            serde_json::from_str(r#"{"status":500,"msg":"boom","kind":"surprise"}"#)
                .expect("deserialize");
        assert_eq!(fault.kind, FaultKind::Generic);
        // The fallback variant still serializes under its own wire name.
        let json = serde_json::to_string(&fault.kind).expect("serialize");
        assert_eq!(json, r#""generic-fault""#);
    }

    #[test]
    fn missing_fault_kind_defaults_to_generic() {
        let fault: FaultSchema =
            serde_json::from_str(r#"{"status":500,"msg":"boom"}"#).expect("deserialize");
        assert_eq!(fault.kind, FaultKind::Generic);
    }
}
