//! The stylesheet model handed to the cascade.
//!
//! Tokenizing and parsing CSS text happens upstream. What arrives here is an
//! immutable, ordered list of rules. The only text this module ever splits is
//! a `style` attribute, which is a bare declaration list.

use crate::selector::Selector;

/// An ordered list of rules. Later rules win ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Rules in source order.
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Create a stylesheet from rules in source order.
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// A stylesheet with no rules.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }
}

/// [§ 9.1 Style rules](https://www.w3.org/TR/css-syntax-3/#style-rules)
///
/// A selector list and the declarations it applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    /// The comma-separated selector list.
    pub selectors: Vec<Selector>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

impl Rule {
    /// Create a rule.
    #[must_use]
    pub const fn new(selectors: Vec<Selector>, declarations: Vec<Declaration>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }

    /// Create a rule whose declarations come from a `prop: value; ...` block.
    #[must_use]
    pub fn with_block(selectors: Vec<Selector>, block: &str) -> Self {
        Self::new(selectors, parse_declarations(block))
    }
}

/// [§ 5.4.5 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A property name and its raw value string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, ASCII-lowercased.
    pub property: String,
    /// Raw value, trimmed.
    pub value: String,
}

impl Declaration {
    /// Create a declaration, normalizing the property name.
    #[must_use]
    pub fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.trim().to_ascii_lowercase(),
            value: value.trim().to_string(),
        }
    }
}

/// [§ 5.3.10 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
///
/// Split a `style` attribute into declarations. Fragments without a colon or
/// with an empty property are dropped.
#[must_use]
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    split_outside_parens(text, ';')
        .into_iter()
        .filter_map(|fragment| {
            let (property, value) = fragment.split_once(':')?;
            let declaration = Declaration::new(property, value);
            (!declaration.property.is_empty() && !declaration.value.is_empty())
                .then_some(declaration)
        })
        .collect()
}

/// Split on `separator`, ignoring separators nested in parentheses or quotes
/// (`url(a;b)`, `"a;b"`).
fn split_outside_parens(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, _) if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
