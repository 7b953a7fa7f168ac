use wheel_core::WheelSeed;

/// `location.search` without the `?`, or `None` when there is nothing to parse.
#[inline]
pub fn query_from_search(search: &str) -> Option<&str> {
    let q = search.trim_start_matches('?');
    (!q.is_empty()).then_some(q)
}

/// Same-page URL carrying the seed, for `history.replaceState`.
pub fn share_url(pathname: &str, seed: &WheelSeed) -> String {
    let path = if pathname.is_empty() { "/" } else { pathname };
    format!("{}?{}", path, seed.to_query())
}
