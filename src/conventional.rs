//! Conventional-commit classification.
//!
//! One ordered rule table, evaluated fully per line: the last rule whose
//! pattern matches a line wins, and a later matching line overrides an
//! earlier one within the same commit.

use crate::domain::version::Severity;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Changelog grouping bucket, independent of severity.
///
/// The derived ordering fixes the section order in the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommitCategory {
    Feature,
    Fix,
    #[default]
    Other,
}

impl fmt::Display for CommitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitCategory::Feature => write!(f, "FEATURE"),
            CommitCategory::Fix => write!(f, "FIX"),
            CommitCategory::Other => write!(f, "OTHER"),
        }
    }
}

struct Rule {
    pattern: Regex,
    severity: Severity,
    category: CommitCategory,
}

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        // Order matters: the breaking-change variants sit after the plain
        // fix/feat rules so that last-match-wins resolves them correctly.
        vec![
            Rule {
                pattern: Regex::new(r"(?i)^fix(\((?P<scope>.*)\))?:").unwrap(),
                severity: Severity::Patch,
                category: CommitCategory::Fix,
            },
            Rule {
                pattern: Regex::new(r"(?i)^feat(\((?P<scope>.*)\))?:").unwrap(),
                severity: Severity::Minor,
                category: CommitCategory::Feature,
            },
            Rule {
                pattern: Regex::new(r"(?i)^fix(\((?P<scope>.*)\))?!:").unwrap(),
                severity: Severity::Major,
                category: CommitCategory::Fix,
            },
            Rule {
                pattern: Regex::new(r"(?i)^feat(\((?P<scope>.*)\))?!:").unwrap(),
                severity: Severity::Major,
                category: CommitCategory::Feature,
            },
            Rule {
                pattern: Regex::new(r"(?i)^breaking\s+change:").unwrap(),
                severity: Severity::Major,
                category: CommitCategory::Other,
            },
        ]
    })
}

fn changelog_line() -> &'static Regex {
    static CHANGELOG: OnceLock<Regex> = OnceLock::new();
    CHANGELOG.get_or_init(|| Regex::new(r"^CHANGELOG:\s*(?P<message>.*)$").unwrap())
}

/// What one commit message contributes to a range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitClassification {
    /// Severity of the last matching rule: decides changelog grouping and
    /// the breaking-change annotation.
    pub net_severity: Severity,
    /// Highest severity matched on any line: feeds the range fold.
    pub max_severity: Severity,
    pub category: CommitCategory,
    pub scope: Option<String>,
    /// Messages harvested from `CHANGELOG:` lines, in message order.
    pub changelog: Vec<String>,
}

/// Classify a full commit message, line by line.
pub fn classify_commit(message: &str) -> CommitClassification {
    let mut classification = CommitClassification::default();

    for line in message.lines() {
        if let Some(caps) = changelog_line().captures(line) {
            classification.changelog.push(caps["message"].to_string());
        }

        for rule in rules() {
            if let Some(caps) = rule.pattern.captures(line) {
                classification.net_severity = rule.severity;
                classification.category = rule.category;
                classification.scope = caps.name("scope").map(|m| m.as_str().to_string());
                classification.max_severity = classification.max_severity.max(rule.severity);
            }
        }
    }

    classification
}
