//! Changelog grouping and document rendering.
//!
//! Messages harvested from commits are grouped by scope, then by category.
//! Within one (scope, category) bucket the insertion order is preserved;
//! rendering orders named scopes alphabetically with the scope-less bucket
//! last, and categories in `Feature < Fix < Other` order.

use crate::conventional::CommitCategory;
use chrono::{DateTime, Local};
use semver::Version;
use std::collections::BTreeMap;

/// Grouped changelog content for one release.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changelog {
    buckets: BTreeMap<Option<String>, BTreeMap<CommitCategory, Vec<String>>>,
}

impl Changelog {
    pub fn new() -> Self {
        Changelog::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(|categories| {
            categories.values().all(|messages| messages.is_empty())
        })
    }

    /// Append one message to its (scope, category) bucket.
    pub fn push(&mut self, scope: Option<String>, category: CommitCategory, message: String) {
        self.buckets
            .entry(scope)
            .or_default()
            .entry(category)
            .or_default()
            .push(message);
    }

    /// Append several messages to one bucket, keeping their order.
    pub fn extend(
        &mut self,
        scope: Option<String>,
        category: CommitCategory,
        messages: Vec<String>,
    ) {
        self.buckets
            .entry(scope)
            .or_default()
            .entry(category)
            .or_default()
            .extend(messages);
    }

    /// Fold another changelog into this one, bucket by bucket.
    pub fn merge(&mut self, other: Changelog) {
        for (scope, categories) in other.buckets {
            for (category, messages) in categories {
                self.extend(scope.clone(), category, messages);
            }
        }
    }

    /// Render the markdown section for one release.
    pub fn render(&self, version: &Version, generated_at: DateTime<Local>) -> String {
        let mut doc = format!(
            "## {} ({})\n",
            version,
            generated_at.format("%Y-%m-%d %H:%M")
        );

        let named = self.buckets.iter().filter(|(scope, _)| scope.is_some());
        let unscoped = self.buckets.iter().filter(|(scope, _)| scope.is_none());

        for (scope, categories) in named.chain(unscoped) {
            let heading = match scope {
                Some(s) if !s.is_empty() => format_scope(s),
                _ => "Other".to_string(),
            };
            doc.push_str(&format!("\n### {}\n", heading));

            for (category, messages) in categories {
                if messages.is_empty() {
                    continue;
                }
                doc.push_str(&format!("\n#### {}\n", category));
                for message in messages {
                    doc.push_str(&format!("- {}\n", message));
                }
            }
        }

        doc
    }
}

/// Turn a raw scope token into a changelog heading.
///
/// Comma lists rejoin with `", "`, slash lists with `"/"`. A single segment
/// is split at word boundaries (camelCase, ACRONYMWord, snake/kebab) and each
/// word gets its first letter capitalized, the remainder untouched so
/// acronyms survive.
pub fn format_scope(scope: &str) -> String {
    if scope.contains(',') {
        return scope
            .split(',')
            .map(format_scope)
            .collect::<Vec<_>>()
            .join(", ");
    }
    if scope.contains('/') {
        return scope
            .split('/')
            .map(format_scope)
            .collect::<Vec<_>>()
            .join("/");
    }
    if scope.is_empty() {
        return String::new();
    }

    capitalize_words(&split_words(scope))
}

fn split_words(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut spaced = String::with_capacity(segment.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' {
            spaced.push(' ');
            continue;
        }
        if i > 0 {
            let prev = chars[i - 1];
            let lower_to_upper =
                (prev.is_lowercase() || prev.is_ascii_digit()) && c.is_uppercase();
            let acronym_to_word = prev.is_uppercase()
                && c.is_uppercase()
                && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            if lower_to_upper || acronym_to_word {
                spaced.push(' ');
            }
        }
        spaced.push(c);
    }

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_scope_camel_case() {
        assert_eq!(format_scope("fooBar"), "Foo Bar");
    }

    #[test]
    fn test_format_scope_acronym() {
        assert_eq!(format_scope("HTTPServer"), "HTTP Server");
    }

    #[test]
    fn test_format_scope_separators() {
        assert_eq!(format_scope("a_b-c"), "A B C");
    }

    #[test]
    fn test_format_scope_comma_list() {
        assert_eq!(format_scope("a,b"), "A, B");
    }

    #[test]
    fn test_format_scope_slash_list() {
        assert_eq!(format_scope("x/y"), "X/Y");
    }

    #[test]
    fn test_format_scope_empty() {
        assert_eq!(format_scope(""), "");
    }

    #[test]
    fn test_format_scope_mixed() {
        assert_eq!(format_scope("authServer,HTTPClient"), "Auth Server, HTTP Client");
        assert_eq!(format_scope("core/fastPath"), "Core/Fast Path");
    }

    #[test]
    fn test_format_scope_digit_boundary() {
        assert_eq!(format_scope("ipv6Stack"), "Ipv6 Stack");
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_render_header() {
        let log = Changelog::new();
        let doc = log.render(&Version::parse("1.2.0").unwrap(), fixed_time());
        assert_eq!(doc, "## 1.2.0 (2024-03-01 12:30)\n");
    }

    #[test]
    fn test_render_orders_scopes_and_categories() {
        let mut log = Changelog::new();
        log.push(None, CommitCategory::Other, "misc note".to_string());
        log.push(
            Some("zeta".to_string()),
            CommitCategory::Fix,
            "zeta fix".to_string(),
        );
        log.push(
            Some("alpha".to_string()),
            CommitCategory::Feature,
            "alpha feature".to_string(),
        );
        log.push(
            Some("alpha".to_string()),
            CommitCategory::Fix,
            "alpha fix".to_string(),
        );

        let doc = log.render(&Version::parse("2.0.0").unwrap(), fixed_time());
        let expected = "\
## 2.0.0 (2024-03-01 12:30)

### Alpha

#### FEATURE
- alpha feature

#### FIX
- alpha fix

### Zeta

#### FIX
- zeta fix

### Other

#### OTHER
- misc note
";
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_bucket_preserves_insertion_order() {
        let mut log = Changelog::new();
        log.push(None, CommitCategory::Fix, "first".to_string());
        log.push(None, CommitCategory::Fix, "second".to_string());
        log.push(None, CommitCategory::Fix, "third".to_string());

        let doc = log.render(&Version::parse("0.1.0").unwrap(), fixed_time());
        let first = doc.find("- first").unwrap();
        let second = doc.find("- second").unwrap();
        let third = doc.find("- third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_merge_appends_within_buckets() {
        let mut base = Changelog::new();
        base.push(None, CommitCategory::Other, "kept first".to_string());

        let mut incoming = Changelog::new();
        incoming.push(None, CommitCategory::Other, "added after".to_string());
        incoming.push(
            Some("io".to_string()),
            CommitCategory::Feature,
            "new scope".to_string(),
        );
        base.merge(incoming);

        let doc = base.render(&Version::parse("0.1.0").unwrap(), fixed_time());
        assert!(doc.find("- kept first").unwrap() < doc.find("- added after").unwrap());
        assert!(doc.contains("### Io"));
    }

    #[test]
    fn test_is_empty() {
        let mut log = Changelog::new();
        assert!(log.is_empty());
        log.push(None, CommitCategory::Other, "entry".to_string());
        assert!(!log.is_empty());
    }
}
