//! Rendering of extracted structure into markdown-like text.

mod markdown;

pub use markdown::{
    join_non_empty, render_block, render_blocks, rows_to_markdown, table_to_markdown,
    BLOCK_SEPARATOR,
};
