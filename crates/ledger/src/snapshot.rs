//! The on-disk snapshot format: one asset name per line, UTF-8, no header.
//!
//! Older snapshots may contain blank lines or Windows line endings; both are
//! tolerated when reading. Writing always produces `\n`-joined names.

use std::collections::HashSet;

/// Parses a snapshot into an ordered, de-duplicated list of asset names.
pub fn parse(contents: &str) -> Vec<String> {
    unique(contents.lines().map(|line| line.trim_end_matches('\r')).filter(|line| !line.is_empty()))
}

/// Renders asset names into the snapshot format.
pub fn render<S: AsRef<str>>(names: &[S]) -> String {
    names.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n")
}

/// Keeps the first occurrence of each name, preserving order.
pub(crate) fn unique<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names.into_iter().filter(|name| seen.insert(*name)).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", &[])]
    #[case("a.js", &["a.js"])]
    #[case("a.js\nb.js", &["a.js", "b.js"])]
    #[case("a.js\n\n\nb.js\n", &["a.js", "b.js"])]
    #[case("a.js\r\nb.js\r\n", &["a.js", "b.js"])]
    #[case("a.js\nb.js\na.js", &["a.js", "b.js"])]
    fn test_parse(#[case] contents: &str, #[case] expected: &[&str]) {
        assert_eq!(parse(contents), expected);
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&["a.js", "css/b.css"]), "a.js\ncss/b.css");
        assert_eq!(render::<&str>(&[]), "");
    }

    #[test]
    fn test_render_then_parse_keeps_names() {
        let names = vec!["js/app.js".to_string(), "css/app.css".to_string(), ".hidden".to_string()];
        assert_eq!(parse(&render(&names)), names);
    }
}
