//! Audit journal for FinGrid
//!
//! Records session transitions and every mutation sent to the backend in an
//! append-only JSON-lines file.
//!
//! # Example
//!
//! ```rust,ignore
//! use fingrid::audit::{AuditEntry, AuditLogger, Operation};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::session(Operation::Login, Some("user@example.com")))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
