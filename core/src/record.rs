//! # bbot Output Records
//!
//! bbot writes one JSON event per line. Each line is decoded into a closed
//! set of shapes keyed on its `"type"` field. Only `DNS_NAME` events carry
//! data this tool uses; anything else is [`DiscoveryRecord::Ignored`].
//! Decoding never fails outright: problems are reported as
//! [`DiscoveryRecord::Malformed`] so the caller can pick the policy.

use serde::Deserialize;
use serde_json::Value;

pub const DNS_NAME: &str = "DNS_NAME";

/// A hostname and the addresses it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsName {
    pub host: String,
    pub resolved_hosts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryRecord {
    DnsName(DnsName),
    /// Any event type other than `DNS_NAME`, including a missing or non-string type.
    Ignored { kind: Option<String> },
    Malformed { reason: String },
}

impl DiscoveryRecord {
    pub fn decode(line: &str) -> Self {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Self::Malformed {
                    reason: format!("invalid JSON: {e}"),
                };
            }
        };

        let fields = match value {
            Value::Object(fields) => fields,
            // `null` decodes to an empty event with no type.
            Value::Null => return Self::Ignored { kind: None },
            _ => {
                return Self::Malformed {
                    reason: "expected a JSON object".to_string(),
                };
            }
        };

        match fields.get("type").and_then(Value::as_str) {
            Some(DNS_NAME) => match serde_json::from_value::<DnsName>(Value::Object(fields)) {
                Ok(record) => Self::DnsName(record),
                Err(e) => Self::Malformed {
                    reason: format!("unexpected {DNS_NAME} shape: {e}"),
                },
            },
            kind => Self::Ignored {
                kind: kind.map(String::from),
            },
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
