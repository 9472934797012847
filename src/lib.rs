/// Lostpaw - lost and found pet intake service
///
/// Accepts photo-backed reports of lost and found pets, stores the images
/// in an object store and the reports in SQLite, and serves both back.

pub mod api;
pub mod community;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod ids;
pub mod intake;
pub mod jobs;
pub mod metrics;
pub mod mutation;
pub mod object_store;
pub mod rate_limit;
pub mod reports;
pub mod server;
