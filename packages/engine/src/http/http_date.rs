//! HTTP date parsing and formatting
//!
//! Accepts the three HTTP-date forms (IMF-fixdate, RFC 850, asctime) and
//! always formats as IMF-fixdate.

use std::time::{Duration, SystemTime};

use http::HeaderValue;

/// HTTP date parsing error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpDateParseError {
    /// Date format was not recognized by any of the supported parsers
    #[error("Unrecognized HTTP date format: {0}")]
    UnrecognizedFormat(String),
    /// Date was parsed but represents a time before Unix epoch
    #[error("Invalid timestamp in HTTP date: {0}")]
    InvalidTimestamp(String),
}

/// HTTP date parsing utilities
pub mod httpdate {
    use super::{Duration, HeaderValue, HttpDateParseError, SystemTime};

    use chrono::{DateTime, NaiveDateTime, Utc};

    const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
    const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
    const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

    /// Parse HTTP date string into `SystemTime`
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedFormat` when no HTTP-date form matches and
    /// `InvalidTimestamp` for dates before the Unix epoch.
    pub fn parse_http_date(date_str: &str) -> Result<SystemTime, HttpDateParseError> {
        let date_str = date_str.trim();

        let timestamp = [IMF_FIXDATE, RFC_850, ASCTIME]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(date_str, format).ok())
            .map(|naive| naive.and_utc().timestamp())
            .or_else(|| {
                DateTime::parse_from_rfc2822(date_str)
                    .ok()
                    .map(|dt| dt.timestamp())
            })
            .ok_or_else(|| HttpDateParseError::UnrecognizedFormat(date_str.to_string()))?;

        let seconds = u64::try_from(timestamp)
            .map_err(|_| HttpDateParseError::InvalidTimestamp(date_str.to_string()))?;
        Ok(SystemTime::UNIX_EPOCH + Duration::from_secs(seconds))
    }

    /// Parse a header value as an HTTP date, `None` if it is not one
    #[must_use]
    pub fn parse_header(value: &HeaderValue) -> Option<SystemTime> {
        value.to_str().ok().and_then(|s| parse_http_date(s).ok())
    }

    /// Format `SystemTime` as an IMF-fixdate string
    #[must_use]
    pub fn fmt_http_date(time: SystemTime) -> String {
        let seconds = time
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);

        DateTime::<Utc>::from_timestamp(seconds, 0)
            .unwrap_or_default()
            .format(IMF_FIXDATE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::httpdate::{fmt_http_date, parse_http_date};
    use super::*;

    const EXPECTED: u64 = 784_111_777;

    #[test]
    fn test_parse_all_http_date_forms() {
        for form in [
            "Sun, 06 Nov 1994 08:49:37 GMT",
            "Sunday, 06-Nov-94 08:49:37 GMT",
            "Sun Nov  6 08:49:37 1994",
        ] {
            let parsed = parse_http_date(form).unwrap_or_else(|e| panic!("{form}: {e}"));
            assert_eq!(
                parsed,
                SystemTime::UNIX_EPOCH + Duration::from_secs(EXPECTED),
                "{form}"
            );
        }
    }

    #[test]
    fn test_format_is_imf_fixdate() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(EXPECTED);
        assert_eq!(fmt_http_date(time), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            parse_http_date("yesterday"),
            Err(HttpDateParseError::UnrecognizedFormat(_))
        ));
    }
}
