/// Report intake
///
/// Turns a multipart submission into a stored image plus a report row.

pub mod form;
pub mod lifecycle;
pub mod pipeline;

pub use form::{parse_or_default, ImagePart, IntakeForm};
pub use lifecycle::IntakeStage;
pub use pipeline::IntakeService;
