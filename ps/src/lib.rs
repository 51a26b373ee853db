//! PlanStore - keyed JSON document store for TaskWise
//!
//! The local-storage analogue for the planner: each key maps to one JSON
//! document (a whole collection serialized at once). Collections are
//! written through on every mutation and read once at startup.
//!
//! # Architecture
//!
//! ```text
//! {store_path}/
//! ├── taskwise_saved_goals.json     # saved plans
//! └── taskwise_tracked_goals.json   # tracked goals
//! ```
//!
//! A document that fails to parse is discarded (the file is removed and
//! the caller sees an absent key), matching how the planner treats a
//! corrupted entry: fall back to defaults rather than surface an error.
//!
//! # Example
//!
//! ```ignore
//! use planstore::PlanStore;
//!
//! let store = PlanStore::open(".planstore")?;
//! store.save("taskwise_saved_goals", &plans)?;
//! let plans: Option<Vec<SavedGoal>> = store.load("taskwise_saved_goals")?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{PlanStore, StoreError};
