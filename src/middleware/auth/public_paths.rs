//! Paths that skip authentication.
//!
//! Patterns are glob-style over `/`-separated segments:
//! - `**` matches any number of segments, including zero
//! - `*` as a whole segment matches exactly one segment
//! - `*` inside a segment matches any characters within that segment
//!
//! The list is fixed at build time. A path never matches when any segment is
//! `.` or `..` (plain or percent-encoded) or hides a separator (`\`, `%2f`,
//! `%5c`), so `/actuator/../api/v1/users/me` and
//! `/actuator/%2e%2e%2fapi/v1/users/me` still require a token.

/// Token issuance, operational, and API documentation endpoints.
pub const PUBLIC_PATHS: &[PublicPathRule] = &[
    PublicPathRule::new("/api/v1/users/auth/**"),
    PublicPathRule::new("/actuator/**"),
    PublicPathRule::new("/v3/api-docs/**"),
    PublicPathRule::new("/swagger-ui/**"),
    PublicPathRule::new("/swagger-ui.html"),
    PublicPathRule::new("/webjars/**"),
];

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|rule| rule.matches(path))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicPathRule {
    pattern: &'static str,
}

impl PublicPathRule {
    pub const fn new(pattern: &'static str) -> Self {
        Self { pattern }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = segments(path);
        if path.iter().any(|s| is_dot_segment(s) || hides_separator(s)) {
            return false;
        }
        match_segments(&segments(self.pattern), &path)
    }
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

fn hides_separator(segment: &str) -> bool {
    let lower = segment.to_ascii_lowercase();
    lower.contains('\\') || lower.contains("%2f") || lower.contains("%5c")
}

fn segments(s: &str) -> Vec<&str> {
    s.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((head, rest)) => match path.split_first() {
            Some((segment, tail)) => match_segment(head, segment) && match_segments(rest, tail),
            None => false,
        },
    }
}

// Single-segment glob where `*` matches any run of characters.
fn match_segment(pattern: &str, segment: &str) -> bool {
    let (p, s) = (pattern.as_bytes(), segment.as_bytes());
    let (mut pi, mut si) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while si < s.len() {
        if pi < p.len() && p[pi] == b'*' {
            backtrack = Some((pi, si));
            pi += 1;
        } else if pi < p.len() && p[pi] == s[si] {
            pi += 1;
            si += 1;
        } else if let Some((star, consumed)) = backtrack {
            pi = star + 1;
            si = consumed + 1;
            backtrack = Some((star, consumed + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&b| b == b'*')
}
