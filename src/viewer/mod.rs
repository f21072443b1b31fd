//! Diagnostic viewer for raw status payloads. Independent of the poller:
//! fetched on demand, redacted, then rendered as a highlighted tree.

pub mod mask;
pub mod render;
