/// Report records
///
/// Lost-pet searches and found-pet reports share one schema and live in
/// two parallel tables.

pub mod models;
pub mod store;
pub mod uploads;

pub use models::*;
pub use store::ReportStore;
pub use uploads::{StaleUpload, UploadLedger};
