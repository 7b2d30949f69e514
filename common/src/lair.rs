//! # Lair Project Model
//!
//! Serde mirror of the Lair API's project and host documents.
//!
//! Only the fields the importer touches are typed. Every other host field
//! (services, notes, os, status, ...) is kept in [`Host::extra`] so that a
//! fetched host is written back unchanged apart from the merged data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::TOOL;

/// A host inside a Lair project, keyed by its IPv4 address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default)]
    pub ipv4: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hostnames: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(rename = "lastModifiedBy", default)]
    pub last_modified_by: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Host {
    pub fn new(ipv4: impl Into<String>) -> Self {
        Self {
            ipv4: ipv4.into(),
            ..Self::default()
        }
    }

    /// Builder used for hosts this tool creates from scratch.
    pub fn with_hostnames(mut self, hostnames: Vec<String>) -> Self {
        self.hostnames = hostnames;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// An entry in the project's command log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    pub command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub tool: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: Vec<Command>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hosts: Vec<Host>,
}

impl Project {
    /// Project document submitted back to Lair: the merged hosts, attributed
    /// to this tool with a single command record.
    pub fn for_import(id: impl Into<String>, hosts: Vec<Host>) -> Self {
        Self {
            id: id.into(),
            tool: TOOL.to_string(),
            commands: vec![Command {
                tool: TOOL.to_string(),
                command: String::new(),
            }],
            hosts,
        }
    }
}

/// Lair serializes empty Go slices as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
