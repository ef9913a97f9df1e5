use super::FetchError;
use crate::util::truncate_chars;

/// Cap applied to raw messages that do not match any category.
const MAX_RAW_CHARS: usize = 100;

/// Maps a fetch failure to its fixed user-facing category.
///
/// The retry wrapper is stripped first, so a wrapped failure classifies
/// exactly like a bare one.
pub fn classify(error: &FetchError) -> String {
    match error.root() {
        FetchError::Connect(_) => "unreachable/connection failed".to_string(),
        FetchError::Tls(_) => "SSL/certificate error".to_string(),
        FetchError::Status(404) => "not found (404)".to_string(),
        FetchError::Status(401) | FetchError::Status(403) => "access denied (401/403)".to_string(),
        FetchError::Status(code) if (500..=599).contains(code) => "server error (5xx)".to_string(),
        FetchError::Status(_) => "generic HTTP error".to_string(),
        FetchError::Timeout => "timed out".to_string(),
        FetchError::InvalidUrl(_) => "invalid URL (missing scheme)".to_string(),
        FetchError::Request(_) => "generic connection error".to_string(),
        FetchError::Other(raw) => truncate_chars(raw, MAX_RAW_CHARS),
        FetchError::RetriesExhausted { source, .. } => classify(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped(inner: FetchError) -> FetchError {
        FetchError::RetriesExhausted {
            attempts: 3,
            source: Box::new(inner),
        }
    }

    #[test]
    fn test_status_categories() {
        assert_eq!(classify(&FetchError::Status(404)), "not found (404)");
        assert_eq!(classify(&FetchError::Status(401)), "access denied (401/403)");
        assert_eq!(classify(&FetchError::Status(403)), "access denied (401/403)");
        assert_eq!(classify(&FetchError::Status(500)), "server error (5xx)");
        assert_eq!(classify(&FetchError::Status(503)), "server error (5xx)");
        assert_eq!(classify(&FetchError::Status(418)), "generic HTTP error");
    }

    #[test]
    fn test_transport_categories() {
        assert_eq!(
            classify(&FetchError::Connect("connection refused".into())),
            "unreachable/connection failed"
        );
        assert_eq!(
            classify(&FetchError::Tls("invalid peer certificate".into())),
            "SSL/certificate error"
        );
        assert_eq!(classify(&FetchError::Timeout), "timed out");
        assert_eq!(
            classify(&FetchError::InvalidUrl("no scheme".into())),
            "invalid URL (missing scheme)"
        );
        assert_eq!(
            classify(&FetchError::Request("channel closed".into())),
            "generic connection error"
        );
    }

    #[test]
    fn test_wrapper_is_transparent() {
        let inner = FetchError::Status(404);
        assert_eq!(classify(&wrapped(FetchError::Status(404))), classify(&inner));

        let timeout = FetchError::Timeout;
        assert_eq!(classify(&wrapped(FetchError::Timeout)), classify(&timeout));
    }

    #[test]
    fn test_unmatched_error_truncated_to_100_chars() {
        let raw = "x".repeat(250);
        let category = classify(&FetchError::Other(raw));
        assert_eq!(category.chars().count(), 100);
    }

    #[test]
    fn test_short_unmatched_error_kept_verbatim() {
        let category = classify(&FetchError::Other("disk full".into()));
        assert_eq!(category, "disk full");
    }
}
