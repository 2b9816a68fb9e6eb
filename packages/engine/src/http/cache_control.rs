//! Cache-Control directive parsing
//!
//! Only the directives the cache needs to read are retained. Unknown
//! extensions are ignored.

use http::HeaderValue;

/// Parsed `Cache-Control` response directives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    pub max_age: Option<u64>,
    pub s_maxage: Option<u64>,
    pub no_cache: bool,
    pub no_store: bool,
    pub public: bool,
    pub private: bool,
    pub must_revalidate: bool,
    pub proxy_revalidate: bool,
    pub stale_while_revalidate: Option<u64>,
    pub stale_if_error: Option<u64>,
}

impl CacheControl {
    /// Parse every value of the `Cache-Control` header
    pub fn parse<'a>(values: impl IntoIterator<Item = &'a HeaderValue>) -> Self {
        let mut parsed = Self::default();

        for value in values {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for directive in split_directives(value) {
                parsed.apply(directive);
            }
        }

        parsed
    }

    fn apply(&mut self, directive: &str) {
        let (name, argument) = match directive.split_once('=') {
            Some((name, argument)) => (name.trim(), Some(argument.trim().trim_matches('"'))),
            None => (directive.trim(), None),
        };

        match name.to_ascii_lowercase().as_str() {
            "max-age" => self.max_age = Some(delta_seconds(argument)),
            "s-maxage" => self.s_maxage = Some(delta_seconds(argument)),
            "no-cache" => self.no_cache = true,
            "no-store" => self.no_store = true,
            "public" => self.public = true,
            "private" => self.private = true,
            "must-revalidate" => self.must_revalidate = true,
            "proxy-revalidate" => self.proxy_revalidate = true,
            "stale-while-revalidate" => self.stale_while_revalidate = Some(delta_seconds(argument)),
            "stale-if-error" => self.stale_if_error = Some(delta_seconds(argument)),
            _ => {}
        }
    }

    /// True when the response carries an explicit lifetime directive
    #[must_use]
    pub fn has_explicit_lifetime(&self) -> bool {
        self.max_age.is_some() || self.s_maxage.is_some()
    }
}

/// Malformed or missing delta-seconds count as zero, which makes the entry stale
fn delta_seconds(argument: Option<&str>) -> u64 {
    argument.and_then(|value| value.parse().ok()).unwrap_or(0)
}

/// Split on commas that are not inside a quoted string
fn split_directives(value: &str) -> impl Iterator<Item = &str> {
    let mut quoted = false;
    let mut start = 0;
    let mut parts = Vec::new();

    for (index, ch) in value.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                parts.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: &'static str) -> CacheControl {
        CacheControl::parse([HeaderValue::from_static(value)].iter())
    }

    #[test]
    fn test_parse_common_directives() {
        let cc = parse("public, max-age=3600, must-revalidate");
        assert!(cc.public);
        assert!(cc.must_revalidate);
        assert_eq!(cc.max_age, Some(3600));
        assert!(cc.has_explicit_lifetime());
    }

    #[test]
    fn test_quoted_field_list_does_not_split() {
        let cc = parse(r#"no-cache="set-cookie, x-token", s-maxage=60"#);
        assert!(cc.no_cache);
        assert_eq!(cc.s_maxage, Some(60));
    }

    #[test]
    fn test_invalid_delta_seconds_is_zero() {
        assert_eq!(parse("max-age=soon").max_age, Some(0));
    }

    #[test]
    fn test_directives_span_header_values() {
        let values = [
            HeaderValue::from_static("no-store"),
            HeaderValue::from_static("stale-while-revalidate=30, stale-if-error=600"),
        ];
        let cc = CacheControl::parse(values.iter());
        assert!(cc.no_store);
        assert_eq!(cc.stale_while_revalidate, Some(30));
        assert_eq!(cc.stale_if_error, Some(600));
    }
}
