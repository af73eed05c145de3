//! eaf2txt library
//!
//! Converts ELAN annotation (EAF) files to tab-delimited text.
//!
//! The pipeline is parse → resolve times → project/order → (summarize):
//!
//! ```rust,ignore
//! use eaf2txt::{convert_eaf_to_rows, summarize, RowOrder};
//!
//! let rows = convert_eaf_to_rows(Path::new("session.eaf"), RowOrder::Chronological)?;
//! println!("{}", summarize(&rows));
//! ```

pub mod batch;
pub mod convert;
pub mod eaf;
pub mod tsv;

pub use convert::{convert_eaf_to_rows, convert_eaf_to_txt, write_txt};
pub use eaf::{summarize, RowOrder, Summary};
pub use eaf2txt_common::{Error, OutputRow, Result};
