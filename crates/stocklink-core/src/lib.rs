//! Stocklink Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `SourceRecord`, `LocationMap`, `SyncRunRecord`
//! - **Error taxonomy** - `SyncError`, `RemoteError`
//! - **Port definitions** - Traits for adapters: `IInventorySource`,
//!   `IRemoteInventory`, `ITokenStore`
//! - **Configuration** - Typed YAML configuration with validation
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external
//! dependencies. Ports define trait interfaces that adapter crates implement
//! (`stocklink-cloud` for the remote API, `stocklink-source` for the ERP
//! database). The sync engine in `stocklink-sync` orchestrates domain logic
//! through the port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
