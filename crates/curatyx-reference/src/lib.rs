//! Reference table access for Curatyx.
//!
//! Curation only ever reads a reference table through [`ReferenceProvider`].
//! Two providers ship here:
//! - `StaticProvider`: tables registered in memory (fixtures, embedded data)
//! - `TsvProvider`: tables stored as TSV files under a local data directory
//!
//! [`ReferenceCache`] memoises one loaded table per entity instance.

pub mod cache;
pub mod provider;
pub mod tsv;

pub use cache::{CachedReference, ReferenceCache};
pub use provider::{ReferenceKey, ReferenceProvider, StaticProvider};
pub use tsv::TsvProvider;
