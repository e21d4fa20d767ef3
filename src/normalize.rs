//! Canonicalization of request-supplied host and path strings.
//!
//! Hosts and paths arrive in many spellings; everything downstream (tenant
//! resolution, screen lookup) compares against the canonical forms produced
//! here.

/// Canonicalize a raw `Host` header value.
///
/// Lowercases, trims, strips one trailing dot and a numeric port, and
/// converts internationalized labels to their ASCII (punycode) form so
/// stored domains stay comparable. Returns `None` for anything that is not
/// a plain host: scheme fragments, paths, whitespace, backslashes, or a
/// non-numeric port.
pub fn normalize_host(raw: &str) -> Option<String> {
    let mut host = raw.trim().to_lowercase();
    if host.is_empty() {
        return None;
    }

    if let Some(stripped) = host.strip_suffix('.') {
        host = stripped.to_string();
    }

    if host.contains("://")
        || host.contains('/')
        || host.contains('\\')
        || host.chars().any(char::is_whitespace)
    {
        return None;
    }

    // A remaining colon must introduce a 1-5 digit port, which is stripped.
    if let Some((name, port)) = host.split_once(':') {
        if port.is_empty() || port.len() > 5 || !port.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        host = name.to_string();
    }

    match url::Host::parse(&host) {
        Ok(url::Host::Domain(ascii)) => Some(ascii),
        Ok(_) => Some(host),
        Err(_) => None,
    }
}

/// Canonicalize a screen path. Total function: any input yields a path that
/// starts with `/`, contains no empty, `.` or `..` segments, and is
/// lowercase. `..` pops the last retained segment and never escapes the
/// root.
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }

    let lowered = trimmed.replace('\\', "/").to_lowercase();

    let mut segments: Vec<&str> = Vec::new();
    for segment in lowered.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Paths that tenants may not claim for their own screens.
pub fn is_reserved_path(normalized: &str) -> bool {
    if normalized == "/admin" || normalized.starts_with("/admin/") {
        return true;
    }
    // e.g. /_api, /_assets
    normalized.starts_with("/_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_lowercases_and_strips_port() {
        assert_eq!(
            normalize_host("Example.COM:8080"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn host_strips_trailing_dot() {
        assert_eq!(
            normalize_host("example.com."),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn host_rejects_scheme_path_whitespace_and_backslash() {
        assert_eq!(normalize_host("http://example.com"), None);
        assert_eq!(normalize_host("example.com/path"), None);
        assert_eq!(normalize_host("example.com path"), None);
        assert_eq!(normalize_host("a b.com"), None);
        assert_eq!(normalize_host("example.com\\back"), None);
    }

    #[test]
    fn host_rejects_non_numeric_or_oversized_port() {
        assert_eq!(normalize_host("example.com:abc"), None);
        assert_eq!(normalize_host("example.com:123456"), None);
        assert_eq!(normalize_host("example.com:"), None);
    }

    #[test]
    fn host_converts_idn_to_punycode() {
        assert_eq!(
            normalize_host("münich.example.com"),
            Some("xn--mnich-kva.example.com".to_string())
        );
    }

    #[test]
    fn host_rejects_blank() {
        assert_eq!(normalize_host(""), None);
        assert_eq!(normalize_host("   "), None);
        assert_eq!(normalize_host("."), None);
    }

    #[test]
    fn path_handles_leading_trailing_slash_and_case() {
        assert_eq!(normalize_path("Blog/"), "/blog");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("hello"), "/hello");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn path_collapses_slashes_and_backslashes() {
        assert_eq!(normalize_path("/a//b"), "/a/b");
        assert_eq!(normalize_path("\\a\\b\\"), "/a/b");
    }

    #[test]
    fn path_resolves_dot_and_dot_dot() {
        assert_eq!(normalize_path("/a/./b/"), "/a/b");
        assert_eq!(normalize_path("/a/b/../"), "/a");
        assert_eq!(normalize_path("/../../"), "/");
    }

    #[test]
    fn reserved_paths() {
        assert!(is_reserved_path("/admin"));
        assert!(is_reserved_path("/admin/settings"));
        assert!(is_reserved_path("/_api"));
        assert!(!is_reserved_path("/administrator"));
        assert!(!is_reserved_path("/blog"));
    }
}
