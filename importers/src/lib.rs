//! Importers Crate
//!
//! Turns user-supplied files into records ready for a bulk import call.
//!
//! # Available Importers
//!
//! - `contact_csv`: decodes a contact list CSV (`phone` required; `name`,
//!   `email`, `tags` optional) into [`ContactRecord`]s
//!
//! # Example
//!
//! ```rust
//! use importers::contact_csv;
//!
//! let contacts = contact_csv::decode("phone,name\n+1234567890,John").unwrap();
//! assert_eq!(contacts[0].name.as_deref(), Some("John"));
//! ```

pub mod contact_csv;

pub use contact_csv::{decode, sample_csv, split_csv_row, ContactCsvDecoder, SAMPLE_FILE_NAME};

// Re-export the record and error types from shared-types for convenience
pub use shared_types::{ContactRecord, DecodeResult, ImportError};
