//! Origin host addressing
//!
//! `HttpHost` identifies the origin a request is sent to. Together with the
//! request target it determines the primary cache key.

use std::fmt;

use http::Uri;

/// Scheme, host name and optional explicit port of an origin server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpHost {
    scheme: String,
    hostname: String,
    port: Option<u16>,
}

impl HttpHost {
    /// Create a host; scheme and host name are normalized to lower case
    pub fn new(scheme: impl AsRef<str>, hostname: impl AsRef<str>, port: Option<u16>) -> Self {
        Self {
            scheme: scheme.as_ref().to_ascii_lowercase(),
            hostname: hostname.as_ref().to_ascii_lowercase(),
            port,
        }
    }

    #[must_use]
    pub fn http(hostname: impl AsRef<str>) -> Self {
        Self::new("http", hostname, None)
    }

    #[must_use]
    pub fn https(hostname: impl AsRef<str>) -> Self {
        Self::new("https", hostname, None)
    }

    /// Extract the host from an absolute URI, `None` for origin-form targets
    #[must_use]
    pub fn from_uri(uri: &Uri) -> Option<Self> {
        let scheme = uri.scheme_str()?;
        let authority = uri.authority()?;
        Some(Self::new(scheme, authority.host(), authority.port_u16()))
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The explicit port, if one was given
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The explicit port or the scheme's well-known port
    #[must_use]
    pub fn effective_port(&self) -> Option<u16> {
        self.port.or_else(|| default_port(&self.scheme))
    }
}

/// Well-known port for a URI scheme
#[must_use]
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

impl fmt::Display for HttpHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.hostname)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_normalizes_case() {
        let host = HttpHost::new("HTTP", "Example.COM", Some(8080));
        assert_eq!(host.to_string(), "http://example.com:8080");
    }

    #[test]
    fn test_effective_port_defaults() {
        assert_eq!(HttpHost::http("a").effective_port(), Some(80));
        assert_eq!(HttpHost::https("a").effective_port(), Some(443));
        assert_eq!(HttpHost::new("ftp", "a", None).effective_port(), None);
    }

    #[test]
    fn test_from_uri() {
        let uri: Uri = "https://Example.com:8443/x?y".parse().unwrap();
        let host = HttpHost::from_uri(&uri).unwrap();
        assert_eq!(host, HttpHost::new("https", "example.com", Some(8443)));

        let origin_form: Uri = "/x".parse().unwrap();
        assert!(HttpHost::from_uri(&origin_form).is_none());
    }
}
