//! Utility class token parser.
//!
//! Splits a single class token into its modifier chain, important marker,
//! negative marker and the bare utility name.

/// Parsed utility class token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedClass<'a> {
    /// Variant modifiers in source order (e.g. `hover`, `md`, `[&>*]`).
    pub modifiers: Vec<&'a str>,

    /// `!` marker, leading or trailing.
    pub important: bool,

    /// Leading `-` (negative value such as `-mt-2`).
    pub negative: bool,

    /// The utility without modifiers or markers (e.g. `mt-2`).
    pub utility: &'a str,
}

impl<'a> ParsedClass<'a> {
    /// Scope prefix used to build conflict identities.
    ///
    /// Two classes can only conflict when their modifier sets and important
    /// markers are equal; modifier order is irrelevant.
    pub fn scope(&self) -> String {
        let mut modifiers = self.modifiers.clone();
        modifiers.sort_unstable();
        let mut scope = modifiers.join(":");
        scope.push(':');
        if self.important {
            scope.push('!');
        }
        scope
    }
}

/// Parse a class token.
///
/// Modifiers are split on `:` outside square brackets, so arbitrary
/// variants like `[&>*]:p-2` and arbitrary values like `bg-[url(a:b)]`
/// stay intact.
pub fn parse_class(token: &str) -> ParsedClass<'_> {
    let mut modifiers = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (i, ch) in token.char_indices() {
        match ch {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                modifiers.push(&token[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    let mut utility = &token[start..];
    let mut important = false;

    if let Some(rest) = utility.strip_prefix('!') {
        utility = rest;
        important = true;
    } else if let Some(rest) = utility.strip_suffix('!') {
        utility = rest;
        important = true;
    }

    let mut negative = false;
    if let Some(rest) = utility.strip_prefix('-') {
        if !rest.is_empty() {
            utility = rest;
            negative = true;
        }
    }

    ParsedClass {
        modifiers,
        important,
        negative,
        utility,
    }
}
