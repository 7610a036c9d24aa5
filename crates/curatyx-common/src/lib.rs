//! curatyx-common: shared table model, errors and configuration used across the Curatyx crates.

pub mod config;
pub mod entities;
pub mod error;
pub mod table;

// Re-export commonly used types
pub use config::{AliasCollision, Config, CurationConfig, ReferenceConfig};
pub use entities::EntityKind;
pub use error::{CurateError, Result, TableRole};
pub use table::{Column, Table, Value};
