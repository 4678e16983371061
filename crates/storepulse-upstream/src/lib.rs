pub mod buckets;
pub mod classify;
pub mod client;
pub mod error;
pub mod normalize;
pub mod reports;
pub mod requests;
pub mod retry;
pub mod types;
pub mod worktrack;

pub use client::UpstreamClient;
pub use error::UpstreamError;
pub use reports::{ReportService, StaticToken, TokenProvider};
pub use requests::{ApiRequest, MemberFilter};
