//! Google login entry-point URL for browser clients.

/// Fallback when no API base URL is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:3000";

/// Where a client should send the browser to start a Google login.
///
/// Built fresh on every call from the injected base URL so reconfiguration
/// takes effect without a restart. The base is used as-is: a trailing slash
/// in the configured value produces a double slash in the result.
pub fn google_auth_url(api_base_url: &str) -> String {
    let base = if api_base_url.is_empty() {
        DEFAULT_API_BASE
    } else {
        api_base_url
    };

    format!("{base}/auth/google")
}

#[cfg(test)]
mod tests {
    use super::google_auth_url;

    #[test]
    fn test_configured_base() {
        assert_eq!(
            google_auth_url("https://api.example.com"),
            "https://api.example.com/auth/google"
        );
    }

    #[test]
    fn test_empty_base_falls_back_to_localhost() {
        assert_eq!(google_auth_url(""), "http://localhost:3000/auth/google");
    }

    #[test]
    fn test_ip_base() {
        assert_eq!(
            google_auth_url("http://192.168.1.1:3000"),
            "http://192.168.1.1:3000/auth/google"
        );
    }

    #[test]
    fn test_trailing_slash_is_not_normalized() {
        assert_eq!(
            google_auth_url("https://api.example.com/"),
            "https://api.example.com//auth/google"
        );
    }
}
