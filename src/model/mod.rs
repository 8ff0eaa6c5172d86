//! Model types shared by the extractors and the router.
//!
//! Blocks and tables are transient, scoped to one extraction call; the
//! result types are what callers receive.

mod block;
mod result;
mod table;

pub use block::{Block, MAX_HEADING_LEVEL};
pub use result::{ErrorResponse, ExtractionMetadata, ExtractionResponse, ExtractionResult};
pub use table::Table;
