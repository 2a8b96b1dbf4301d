//! Selection module - page-independent selection over a paginated source
//!
//! This module holds every rule about what is selected. It is UI-agnostic:
//! a frontend reports which page is visible and which of its rows are
//! checked, and asks back which rows to render as checked.
//!
//! # Architecture
//!
//! - `state`: the two disjoint id sets and per-page reconciliation
//! - `bulk`: the "select the first N records" scan
//! - `manager`: `SelectionManager`, the single owner of the state
//! - `error`: errors surfaced by bulk-select and page loading

pub mod bulk;
pub mod error;
pub mod manager;
pub mod state;

pub use bulk::BulkSelectReport;
pub use error::SelectionError;
pub use manager::SelectionManager;
pub use state::{Decision, PageDelta, SelectionState};
