//! Row transformations.
//!
//! The processing layer turns decoded [`crate::types::RawRow`]s into
//! [`crate::types::TargetRecord`]s:
//!
//! - [`normalize`]: cell cleaning (trim, digits-only phones, nullable email)
//! - [`mapper`]: column extraction and the skip-vs-record decision
//!
//! ## Example
//!
//! ```rust
//! use sheet_import::processing::{RowDecision, RowMapper};
//! use sheet_import::types::RawRow;
//!
//! let row = RawRow::new()
//!     .with("A", "12.345.678/0001-99")
//!     .with("C", "  ACME Ltda ")
//!     .with("M", "(11) 98888-7777");
//!
//! match RowMapper::default().map_row(&row) {
//!     RowDecision::Record(record) => {
//!         assert_eq!(record.name, "ACME Ltda");
//!         assert_eq!(record.phone_primary.as_deref(), Some("11988887777"));
//!         assert_eq!(record.email, None);
//!     }
//!     RowDecision::Skip => unreachable!(),
//! }
//! ```

pub mod mapper;
pub mod normalize;

pub use mapper::{ColumnBinding, ColumnMapping, DEFAULT_STATUS, RowDecision, RowMapper};
pub use normalize::{clean_email, clean_phone, trim};
