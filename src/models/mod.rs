pub mod consultation;
pub mod prediction;
pub mod user;

pub use consultation::*;
pub use prediction::*;
pub use user::*;

/// Render a stored timestamp as RFC 3339
pub fn format_datetime(dt: bson::DateTime) -> String {
    dt.try_to_rfc3339_string()
        .unwrap_or_else(|_| dt.timestamp_millis().to_string())
}
