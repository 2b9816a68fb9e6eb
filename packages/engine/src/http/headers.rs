//! Header list helpers
//!
//! Cache entries keep their headers as an ordered list so that duplicates
//! and per-name order survive a store/render round trip.

use http::{HeaderMap, HeaderName, HeaderValue};

/// Ordered header list, duplicates allowed
pub type HeaderList = Vec<(HeaderName, HeaderValue)>;

/// Flatten a `HeaderMap` into an ordered list
#[must_use]
pub fn header_list(map: &HeaderMap) -> HeaderList {
    map.iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Rebuild a `HeaderMap`, appending so repeated names are all kept
#[must_use]
pub fn header_map(list: &[(HeaderName, HeaderValue)]) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(list.len());
    for (name, value) in list {
        map.append(name.clone(), value.clone());
    }
    map
}

/// All values of one header as trimmed strings joined by `", "`
pub fn joined_values<'a>(values: impl IntoIterator<Item = &'a HeaderValue>) -> String {
    values
        .into_iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-separated elements across all values of a list-valued header
pub fn comma_elements<'a>(values: impl IntoIterator<Item = &'a HeaderValue>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|element| !element.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// First value of a header as a string, if it is valid visible ASCII
#[must_use]
pub fn first_str<'a>(map: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    map.get(name).and_then(|value| value.to_str().ok())
}
