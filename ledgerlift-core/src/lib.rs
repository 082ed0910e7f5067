//! ledgerlift-core: transaction model, model-reply sanitization, and export rendering.

pub mod transaction;
pub mod sanitize;
pub mod export;

pub use transaction::{Transaction, TxnKind, Totals, totals};
pub use sanitize::parse_model_reply;
pub use export::{render_csv, default_csv_filename, to_row, HEADER};
