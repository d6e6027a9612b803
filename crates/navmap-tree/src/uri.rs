//! URI string handling
//!
//! URIs are slash-delimited paths; a single leading slash is tolerated
//! and ignored. The empty string denotes the application root and
//! parses to no segments.

/// Split a URI into its path segments
///
/// # Examples
/// ```
/// use navmap_tree::uri::parse_segments;
///
/// assert_eq!(parse_segments("a/b/c"), vec!["a", "b", "c"]);
/// assert_eq!(parse_segments("/a/b"), vec!["a", "b"]);
/// assert!(parse_segments("").is_empty());
/// ```
#[must_use]
pub fn parse_segments(uri: &str) -> Vec<&str> {
    let trimmed = uri.strip_prefix('/').unwrap_or(uri);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

/// Join segments back into a URI
#[must_use]
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.push_str(seg.as_ref());
    }
    out
}

/// Proper prefixes of a URI, longest first
///
/// `"a/b/c"` yields `["a/b", "a"]`. The empty root prefix is not
/// included; callers that treat the root as a match point handle it
/// separately.
#[must_use]
pub fn prefixes(uri: &str) -> Vec<String> {
    let segments = parse_segments(uri);
    let mut out = Vec::new();
    for len in (1..segments.len()).rev() {
        out.push(join_segments(&segments[..len]));
    }
    out
}
