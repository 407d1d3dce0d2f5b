//! Brace tokens embedded in class strings.
//!
//! Two token forms share the brace syntax:
//! - `{Name}`: nested component reference. `Name` is a single identifier
//!   starting with an ASCII uppercase letter followed by ASCII letters or
//!   digits (`{UButton}`, `{Icon2}`). Nothing else may appear between the
//!   braces.
//! - `{>key}`: extends reference to another style key (`{>wrapper}`).

use std::sync::OnceLock;

use regex_lite::Regex;

fn component_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Z][A-Za-z0-9]*)\}").expect("component token pattern"))
}

fn extends_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{>([A-Za-z_][A-Za-z0-9_-]*)\}").expect("extends token pattern")
    })
}

/// Name of the first nested component token in `classes`, if any.
pub fn component_token(classes: &str) -> Option<&str> {
    component_re()
        .captures(classes)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Remove every nested component token, normalizing whitespace.
pub fn strip_component_tokens(classes: &str) -> String {
    normalize(&component_re().replace_all(classes, " "))
}

/// Keys referenced by extends tokens, in order of appearance, deduplicated.
pub fn extends_targets(classes: &str) -> Vec<&str> {
    let mut targets: Vec<&str> = Vec::new();
    for caps in extends_re().captures_iter(classes) {
        if let Some(m) = caps.get(1) {
            if !targets.contains(&m.as_str()) {
                targets.push(m.as_str());
            }
        }
    }
    targets
}

/// Remove every extends token, normalizing whitespace.
pub fn strip_extends_tokens(classes: &str) -> String {
    normalize(&extends_re().replace_all(classes, " "))
}

fn normalize(classes: &str) -> String {
    classes.split_whitespace().collect::<Vec<_>>().join(" ")
}
