//! Core domain types and shared logic for the Atelier material sync client.
//!
//! This crate defines the canonical data model used by the CLI:
//! - Registry environments and the host resolution table
//! - Sessions (resolved host + validated token)
//! - Sites and their derived upload endpoints
//! - Material items, kinds, and batch payloads
//! - Remote response envelopes
//! - The sync error taxonomy

pub mod envelope;
pub mod environment;
pub mod error;
pub mod material;
pub mod session;
pub mod site;
pub mod upload;

pub use envelope::Envelope;
pub use environment::{Environment, HostTable, NetworkScope};
pub use error::{Error, Result};
pub use material::{MaterialItem, MaterialKind};
pub use session::Session;
pub use site::{RemoteSite, Site};
pub use upload::{BatchPayload, ItemFailure, UploadOutcome};

/// Default number of material items per upload request.
pub const DEFAULT_BATCH_SIZE: usize = 4;
