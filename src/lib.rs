//! FinGrid - personal budget client core
//!
//! This library holds the client side of the FinGrid budget app: the
//! persisted session, the route guard that gates screens on it, the ledger
//! aggregator that merges the backend's summary, account and history views
//! into one consistent snapshot, and the budget and analytics reports built
//! from that snapshot.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Wire-level data models (accounts, categories, transactions)
//! - `storage`: Atomic file writes and the encrypted credential store
//! - `crypto`: Key derivation and sealing for the stored token
//! - `session`: Session store, route guard and navigator
//! - `api`: Backend REST client
//! - `ledger`: Snapshot aggregation with stale-refresh protection
//! - `reports`: Budget progress and spending breakdown
//! - `services`: User-facing flows on top of the API and ledger
//! - `audit`: Audit logging of state-changing actions
//! - `display` and `cli`: Terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use fingrid::config::{paths::FinGridPaths, settings::Settings};
//! use fingrid::cli::AppContext;
//!
//! let paths = FinGridPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let ctx = AppContext::open(paths, settings)?;
//! let snapshot = ctx.load_snapshot().await?;
//! ```

pub mod api;
pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod services;
pub mod session;
pub mod storage;

pub use error::{FinGridError, FinGridResult};
