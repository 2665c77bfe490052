//! CSV reading for the framework table.

mod columns;
mod reader;

pub use columns::{FrameworkColumns, TOPIC_COLUMN};
pub use reader::{FrameworkTable, read_framework_table, read_framework_table_from_reader};
