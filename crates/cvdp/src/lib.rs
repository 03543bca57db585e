//! CVDP explorer data
//!
//! Normalizes CVDP benchmark JSONL files (agentic and nonagentic task shapes)
//! into per-record JSON, a summary index and dataset stats for the frontend.

pub mod error;
pub mod fields;
pub mod language;
pub mod source;
pub mod schema;
pub mod normalize;
pub mod writer;
pub mod batch;

pub use error::*;
pub use language::infer_language;
pub use source::*;
pub use schema::*;
pub use normalize::{infer_title, normalize_record};
pub use batch::{process_all, BatchSummary};
