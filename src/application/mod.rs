pub mod use_cases;

pub use use_cases::export::{ExportReservations, ExportSummary};
pub use use_cases::normalize::RecordNormalizer;
