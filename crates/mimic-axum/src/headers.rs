//! Conversions between `http` header maps and plain string pairs.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

/// Every header whose value is valid UTF-8, in map order.
///
/// Values outside UTF-8 cannot travel as strings; they are logged and
/// skipped.
pub(crate) fn utf8_pairs(headers: &HeaderMap) -> Vec<(&str, &str)> {
    headers
        .iter()
        .filter_map(|(name, value)| match std::str::from_utf8(value.as_bytes()) {
            Ok(value) => Some((name.as_str(), value)),
            Err(_) => {
                debug!(header = %name, "Skipping header value that is not UTF-8");
                None
            }
        })
        .collect()
}

/// Set each pair on `target`, replacing existing values.
pub(crate) fn apply_pairs(target: &mut HeaderMap, pairs: Vec<(String, String)>) {
    for (name, value) in pairs {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                target.insert(name, value);
            }
            _ => debug!(header = %name, "Skipping header that cannot be relayed"),
        }
    }
}
