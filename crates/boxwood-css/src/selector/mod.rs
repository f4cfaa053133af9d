//! CSS selector matching and specificity.
//!
//! Selectors arrive already parsed. A [`Selector`] is a descendant chain of
//! [`SimpleSelector`]s; the rightmost part is the subject and every earlier
//! part must match some ancestor, in order, walking upward.
//!
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/)

use boxwood_dom::{DomTree, ElementData, NodeId};

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// `(inline, ids, classes, elements)`, compared lexicographically.
///
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors ... (= B)
///  - count the number of type selectors ... (= C)"
///
/// The leading component is 1 only for declarations from a `style` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32, pub u32, pub u32, pub u32);

impl Specificity {
    /// Specificity of the inline `style` attribute.
    pub const INLINE: Self = Self(1, 0, 0, 0);

    /// Create a new specificity from its four components.
    #[must_use]
    pub const fn new(inline: u32, ids: u32, classes: u32, elements: u32) -> Self {
        Self(inline, ids, classes, elements)
    }
}

impl std::ops::Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(
            self.0 + rhs.0,
            self.1 + rhs.1,
            self.2 + rhs.2,
            self.3 + rhs.3,
        )
    }
}

/// [§ 3.1 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// Optional tag name, optional id, and a set of classes. Every present field
/// must match. A selector with no fields at all is the universal selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleSelector {
    /// Type selector, compared ASCII case-insensitively.
    pub tag_name: Option<String>,
    /// ID selector.
    pub id: Option<String>,
    /// Class selectors.
    pub classes: Vec<String>,
}

impl SimpleSelector {
    /// `*`
    #[must_use]
    pub fn universal() -> Self {
        Self::default()
    }

    /// A type selector such as `div`.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::universal().with_tag(name)
    }

    /// Set the type selector.
    #[must_use]
    pub fn with_tag(mut self, name: &str) -> Self {
        self.tag_name = Some(name.to_string());
        self
    }

    /// Set the ID selector.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add a class selector.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// An empty name anywhere makes the selector unmatchable.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.tag_name.as_deref().is_some_and(str::is_empty)
            || self.id.as_deref().is_some_and(str::is_empty)
            || self.classes.iter().any(String::is_empty)
    }

    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        Specificity(
            0,
            u32::from(self.id.is_some()),
            u32::try_from(self.classes.len()).unwrap_or(u32::MAX),
            u32::from(self.tag_name.is_some()),
        )
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// All present fields must match the element (AND semantics).
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        if self.is_malformed() {
            return false;
        }
        if let Some(tag) = &self.tag_name {
            if tag != "*" && !element.is(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let element_classes = element.classes();
            if !self.classes.iter().all(|c| element_classes.contains(c.as_str())) {
                return false;
            }
        }
        true
    }
}

/// [§ 3.2 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// A descendant-combinator chain, leftmost ancestor first, subject last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Compound parts in source order; the last one is the subject.
    pub parts: Vec<SimpleSelector>,
}

impl Selector {
    /// Build a descendant chain from its parts.
    #[must_use]
    pub const fn new(parts: Vec<SimpleSelector>) -> Self {
        Self { parts }
    }

    /// A selector made of a single compound.
    #[must_use]
    pub fn simple(part: SimpleSelector) -> Self {
        Self { parts: vec![part] }
    }

    /// No parts, or a malformed part: never matches anything.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.parts.is_empty() || self.parts.iter().any(SimpleSelector::is_malformed)
    }

    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Sum of the specificities of every compound in the chain.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.parts
            .iter()
            .map(SimpleSelector::specificity)
            .fold(Specificity::default(), |acc, s| acc + s)
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// The subject must match `id`; then each remaining part, right to left,
    /// must match a strictly higher ancestor than the previous match.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some((subject, ancestors)) = self.parts.split_last() else {
            return false;
        };
        let Some(element) = tree.as_element(id) else {
            return false;
        };
        if !subject.matches(element) {
            return false;
        }

        // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
        //
        // Greedy matching is exact for descendant-only chains: taking the
        // nearest matching ancestor never rules out a later part.
        let mut cursor = tree.ancestors(id);
        ancestors.iter().rev().all(|part| {
            cursor.by_ref().any(|ancestor| {
                tree.as_element(ancestor)
                    .is_some_and(|data| part.matches(data))
            })
        })
    }
}
