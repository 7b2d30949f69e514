//! # drone-bbot core
//!
//! The import pipeline, independent of any terminal or process concerns:
//!
//! * **[`record`]**: decoding of a single bbot output line.
//! * **[`reader`]**: line-by-line streaming over the input, applying the malformed-line policy.
//! * **[`merge`]**: reconciliation of DNS names with the project's hosts.
//! * **[`gateway`]**: the boundary to the Lair API server.
//! * **[`import`]**: the service that runs fetch, merge and submit in order.

pub mod gateway;
pub mod import;
pub mod merge;
pub mod reader;
pub mod record;
