//! # salarydb-core
//!
//! Storage and query layer for SalaryDB.
//!
//! This crate holds everything the interactive shell needs that does not
//! touch a terminal:
//!
//! - **Model**: the `JobRecord` row and its lenient `Numeric` cells
//! - **Store**: a SQLite-backed `RecordStore` with parameterized reads and writes
//! - **Import**: a delimited-file `Importer` producing records in file order
//! - **Catalog**: the fixed table of preset "top paid" queries
//!
//! ## Example
//!
//! ```rust
//! use salarydb_core::{Query, RecordStore};
//!
//! fn example() -> salarydb_core::CoreResult<()> {
//!     let store = RecordStore::open_in_memory()?;
//!     let rows = Query::TopPaidAt("Apple".into()).run(&store)?;
//!     assert!(rows.is_empty());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod import;
pub mod model;
pub mod store;

pub use catalog::{Category, MenuAction, MenuEntry, Query, QueryCatalog};
pub use error::{CoreError, CoreResult};
pub use import::Importer;
pub use model::{JobRecord, MatchCriteria, Numeric};
pub use store::{FilterColumn, RecordStore, SortOrder, UpdateColumn};
