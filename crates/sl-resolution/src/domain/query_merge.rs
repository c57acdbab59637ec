//! Query-string propagation onto the redirect destination.

/// Appends every `key=value` pair in `raw_query_string` to `destination`'s
/// existing query, duplicates allowed. Falls back to the unmerged
/// `destination` on any parse failure.
pub fn merge_query(destination: &str, raw_query_string: &str) -> String {
    let mut url = match url::Url::parse(destination) {
        Ok(url) => url,
        Err(_) => return destination.to_string(),
    };

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url.query_pairs() {
        serializer.append_pair(&key, &value);
    }
    for (key, value) in url::form_urlencoded::parse(raw_query_string.as_bytes()) {
        serializer.append_pair(&key, &value);
    }
    let merged = serializer.finish();

    url.set_query(Some(&merged));
    url.to_string()
}
