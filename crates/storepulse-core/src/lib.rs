pub mod app_config;
pub mod attendance;
pub mod config;
pub mod reports;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use attendance::AttendanceRecord;
pub use config::{load_app_config, load_app_config_from_env};
pub use reports::{
    BookingCounters, CustomerBucket, HourBucket, SalesDetailLine, SalesHourBucket, SalesSummary,
    ServiceItem, ServiceSummary,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
