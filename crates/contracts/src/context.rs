//! RequestContext - the visitor request an event belongs to
//!
//! Supplied by the caller at invocation time; read-only for the relay.

use std::collections::HashMap;

/// Browser cookie set by the pixel script
pub const FBP_COOKIE: &str = "_fbp";

/// Click-id cookie set when the visitor arrives from an ad
pub const FBC_COOKIE: &str = "_fbc";

/// Ambient request data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// `Host` header
    pub host: String,

    /// Request URI (path plus query)
    pub path: String,

    /// Request arrived over TLS
    pub is_tls: bool,

    /// Visitor IP address
    pub client_ip: String,

    /// `User-Agent` header
    pub user_agent: String,

    /// Request cookies by name
    pub cookies: HashMap<String, String>,
}

impl RequestContext {
    /// Create a context for a plain HTTP request
    pub fn new(
        host: impl Into<String>,
        path: impl Into<String>,
        client_ip: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            is_tls: false,
            client_ip: client_ip.into(),
            user_agent: user_agent.into(),
            cookies: HashMap::new(),
        }
    }

    /// Mark the request as HTTPS
    pub fn with_tls(mut self, is_tls: bool) -> Self {
        self.is_tls = is_tls;
        self
    }

    /// Add a cookie
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Reconstructed page URL: `http[s]://{host}{path}`
    pub fn current_url(&self) -> String {
        let scheme = if self.is_tls { "https" } else { "http" };
        format!("{}://{}{}", scheme, self.host, self.path)
    }

    /// Cookie value, `None` when absent or empty
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_url_scheme() {
        let ctx = RequestContext::new("shop.example", "/cart?step=2", "10.0.0.1", "UA");
        assert_eq!(ctx.current_url(), "http://shop.example/cart?step=2");
        assert_eq!(
            ctx.with_tls(true).current_url(),
            "https://shop.example/cart?step=2"
        );
    }

    #[test]
    fn test_cookie_ignores_empty_values() {
        let ctx = RequestContext::default()
            .with_cookie(FBP_COOKIE, "fb.1.111")
            .with_cookie(FBC_COOKIE, "");
        assert_eq!(ctx.cookie(FBP_COOKIE), Some("fb.1.111"));
        assert_eq!(ctx.cookie(FBC_COOKIE), None);
        assert_eq!(ctx.cookie("missing"), None);
    }
}
