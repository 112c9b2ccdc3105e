//! Remote path handling. Remote paths always use `/` regardless of the local platform.

/// Joins a remote directory and a file name with exactly one `/` between them.
pub fn remote_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if dir.is_empty() {
        if name.is_empty() { "/".to_owned() } else { format!("/{name}") }
    } else if name.is_empty() {
        dir.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Every ancestor of `path` followed by the path itself, shortest first.
///
/// `/a/b/c` gives `["/a", "/a/b", "/a/b/c"]`; relative paths stay relative.
pub fn ancestors(path: &str) -> Vec<String> {
    let absolute = path.starts_with('/');
    let mut current = String::new();
    let mut out = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if absolute || !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        out.push(current.clone());
    }
    out
}

/// Name filter used by batch downloads. A missing or blank bound matches everything.
pub fn matches_filter(name: &str, prefix: Option<&str>, suffix: Option<&str>) -> bool {
    let prefix_ok = prefix.is_none_or(|p| p.is_empty() || name.starts_with(p));
    let suffix_ok = suffix.is_none_or(|s| s.is_empty() || name.ends_with(s));
    prefix_ok && suffix_ok
}

pub(crate) fn is_dot_entry(name: &str) -> bool {
    name == "." || name == ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_remote_path_joins_once() {
        assert_eq!(remote_path("/upload/", "/a.txt"), "/upload/a.txt");
        assert_eq!(remote_path("upload", "a.txt"), "upload/a.txt");
        assert_eq!(remote_path("", "a.txt"), "/a.txt");
        assert_eq!(remote_path("/upload", ""), "/upload");
    }

    #[test]
    fn test_ancestors() {
        assert_eq!(ancestors("/a/b/c"), vec!["/a", "/a/b", "/a/b/c"]);
        assert_eq!(ancestors("a//b/"), vec!["a", "a/b"]);
        assert_eq!(ancestors("./x"), vec!["x"]);
        assert!(ancestors("/").is_empty());
    }

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter("report_2024.csv", Some("report"), Some(".csv")));
        assert!(!matches_filter("report_2024.txt", Some("report"), Some(".csv")));
        assert!(!matches_filter("data.csv", Some("report"), None));
        assert!(matches_filter("anything", None, Some("")));
    }

    proptest! {
        #[test]
        fn test_ancestors_end_with_path(segments in proptest::collection::vec("[a-z]{1,6}", 1..6)) {
            let path = format!("/{}", segments.join("/"));
            let list = ancestors(&path);
            prop_assert_eq!(list.len(), segments.len());
            prop_assert_eq!(list.last().cloned(), Some(path));
        }
    }
}
