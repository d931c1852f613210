//! Stocklink Source - ERP inventory read adapter
//!
//! Implements the `IInventorySource` port over a SQL database using sqlx.
//! The adapter runs one fixed tabular read per sync pass (item number,
//! description, location, quantities, last cost) plus a cheap connectivity
//! probe; it contains no decision logic of its own.
//!
//! The sqlx `Any` driver is used so the configured database URL selects the
//! backend; tests run against in-memory SQLite.

pub mod repository;

pub use repository::SqlInventorySource;
