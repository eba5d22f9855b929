//! # Correlation IDs
//!
//! A correlation ID ties together every log line, span, and metric
//! emitted while handling one request, propagated through `tracing`'s
//! span fields rather than a bespoke thread-local.

use uuid::Uuid;

/// Generate a new correlation ID in the `corr-<12 hex chars>` shape.
pub fn generate_correlation_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("corr-{}", &hex[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_id_has_expected_prefix_and_length() {
        let id = generate_correlation_id();
        assert!(id.starts_with("corr-"));
        assert_eq!(id.len(), "corr-".len() + 12);
    }

    #[test]
    fn test_correlation_ids_are_unique() {
        assert_ne!(generate_correlation_id(), generate_correlation_id());
    }
}
