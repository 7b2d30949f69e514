//! Types shared by every crate in the `drone-bbot` workspace.
//!
//! * **[`config`]**: the immutable run configuration, resolved once at startup.
//! * **[`lair`]**: the subset of the Lair project model this tool reads and writes.

pub mod config;
pub mod lair;

/// Name this tool records as `lastModifiedBy` and in the project command log.
pub const TOOL: &str = "drone-bbot";
