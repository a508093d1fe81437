// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV reading with encoding fallback and strict row widths

mod reader;

pub use reader::{CsvReader, CsvTable};
