//! Conflict-aware merging of utility class lists.
//!
//! Class lists are merged left to right, later sources winning. When two
//! classes set the same property in the same scope (same modifiers, same
//! important marker) only the later one survives; everything else is kept
//! in its original relative order.

mod groups;
mod parser;
mod tokens;

pub use groups::{group_of, ClassGroup};
pub use parser::{parse_class, ParsedClass};
pub use tokens::{
    component_token, extends_targets, strip_component_tokens, strip_extends_tokens,
};

use std::collections::HashSet;

/// Merge class lists in priority order (lowest first).
///
/// Absent and empty sources are skipped. Nested component tokens are
/// removed from the result.
pub fn merge_classes<'a, I>(sources: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    resolve_conflicts(&join_classes(sources))
}

/// Concatenate class lists without resolving conflicts.
pub fn join_classes<'a, I>(sources: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    sources
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop every class overridden by a later class of the same group.
pub fn resolve_conflicts(classes: &str) -> String {
    let stripped = strip_component_tokens(classes);
    let tokens: Vec<&str> = stripped.split_whitespace().collect();

    let mut claimed: HashSet<String> = HashSet::new();
    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());

    // Walk backwards so the last class of a group claims it first
    for token in tokens.iter().rev() {
        let parsed = parse_class(token);

        match group_of(parsed.utility) {
            Some(group) => {
                let scope = parsed.scope();
                if !claimed.insert(format!("{}{}", scope, group.id)) {
                    continue;
                }
                for shadow in group.shadows {
                    claimed.insert(format!("{}{}", scope, shadow));
                }
            }
            None => {
                if !claimed.insert(format!("={}", token)) {
                    continue;
                }
            }
        }

        kept.push(token);
    }

    kept.reverse();
    kept.join(" ")
}
