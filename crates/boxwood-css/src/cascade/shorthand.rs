//! Shorthand expansion.
//!
//! Property maps only ever hold longhands. Every shorthand is rewritten here
//! before it reaches the map.
//!
//! [§ 1.3 Shorthand properties](https://www.w3.org/TR/css-cascade-4/#shorthand)

use crate::values::{LengthValue, parse_number};

/// Box sides in the order CSS lists them.
pub const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Result of trying to expand a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Not a shorthand; store the declaration as-is.
    Longhand,
    /// The longhand declarations the shorthand stands for.
    Longhands(Vec<(String, String)>),
    /// A shorthand whose value could not be expanded. Dropped.
    Invalid,
}

/// True if `property` is one of the shorthands we expand.
#[must_use]
pub fn is_shorthand(property: &str) -> bool {
    !longhands(property).is_empty()
}

/// The longhands a shorthand sets, or an empty list for non-shorthands.
#[must_use]
pub fn longhands(property: &str) -> Vec<String> {
    match property {
        "margin" | "padding" => SIDES.iter().map(|s| format!("{property}-{s}")).collect(),
        "border-width" | "border-style" | "border-color" => {
            let component = &property["border-".len()..];
            SIDES
                .iter()
                .map(|s| format!("border-{s}-{component}"))
                .collect()
        }
        "border" => SIDES
            .iter()
            .flat_map(|s| border_side_longhands(s))
            .collect(),
        _ => border_side(property)
            .map(|side| border_side_longhands(side).to_vec())
            .unwrap_or_default(),
    }
}

/// Expand `property: value` into longhands.
#[must_use]
pub fn expand(property: &str, value: &str) -> Expansion {
    match property {
        "margin" | "padding" => expand_edges(value).map_or(Expansion::Invalid, |edges| {
            Expansion::Longhands(
                SIDES
                    .iter()
                    .zip(edges)
                    .map(|(side, v)| (format!("{property}-{side}"), v))
                    .collect(),
            )
        }),
        "border-width" | "border-style" | "border-color" => {
            let component = &property["border-".len()..];
            expand_edges(value).map_or(Expansion::Invalid, |edges| {
                Expansion::Longhands(
                    SIDES
                        .iter()
                        .zip(edges)
                        .map(|(side, v)| (format!("border-{side}-{component}"), v))
                        .collect(),
                )
            })
        }
        "border" => parse_border(value).map_or(Expansion::Invalid, |parts| {
            Expansion::Longhands(SIDES.iter().flat_map(|side| parts.longhands(side)).collect())
        }),
        _ => match border_side(property) {
            Some(side) => parse_border(value)
                .map_or(Expansion::Invalid, |parts| Expansion::Longhands(parts.longhands(side))),
            None => Expansion::Longhand,
        },
    }
}

/// `border-top` → `top`, etc.
fn border_side(property: &str) -> Option<&'static str> {
    let side = property.strip_prefix("border-")?;
    SIDES.iter().copied().find(|s| *s == side)
}

fn border_side_longhands(side: &str) -> [String; 3] {
    [
        format!("border-{side}-width"),
        format!("border-{side}-style"),
        format!("border-{side}-color"),
    ]
}

/// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
///
/// "If there is only one component value, it applies to all sides. If there
/// are two values, the top and bottom margins are set to the first value and
/// the right and left margins are set to the second. If there are three
/// values, the top is set to the first value, the left and right are set to
/// the second, and the bottom is set to the third. If there are four values,
/// they apply to the top, right, bottom, and left, respectively."
///
/// Returns `[top, right, bottom, left]`, or `None` for zero or more than four
/// components.
#[must_use]
pub fn expand_edges(value: &str) -> Option<[String; 4]> {
    let parts = split_components(value);
    let [top, right, bottom, left] = match parts.as_slice() {
        [all] => [all, all, all, all],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => return None,
    };
    Some([top, right, bottom, left].map(|s| (*s).to_string()))
}

/// Split a value into whitespace-separated components, keeping function
/// arguments such as `rgb(1, 2, 3)` together.
#[must_use]
pub fn split_components(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut start: Option<usize> = None;

    for (i, c) in value.char_indices() {
        match c {
            '(' => {
                depth += 1;
                let _ = start.get_or_insert(i);
            }
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&value[s..i]);
                }
            }
            _ => {
                let _ = start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        parts.push(&value[s..]);
    }
    parts
}

/// [§ 4.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
const BORDER_STYLES: [&str; 10] = [
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

/// The components found in a `border` or `border-<side>` value.
#[derive(Debug, Default)]
struct BorderParts {
    width: Option<String>,
    style: Option<String>,
    color: Option<String>,
}

impl BorderParts {
    /// Longhands for one side. Components that were not given are left
    /// untouched, except that a styled border without a width gets `medium`.
    fn longhands(&self, side: &str) -> Vec<(String, String)> {
        let width = self
            .width
            .clone()
            .or_else(|| self.style.as_ref().map(|_| "medium".to_string()));
        [("width", width), ("style", self.style.clone()), ("color", self.color.clone())]
            .into_iter()
            .filter_map(|(component, v)| v.map(|v| (format!("border-{side}-{component}"), v)))
            .collect()
    }
}

/// [§ 4.4 'border'](https://www.w3.org/TR/css-backgrounds-3/#border-shorthands)
///
/// `<line-width> || <line-style> || <color>`, in any order, each at most once.
fn parse_border(value: &str) -> Option<BorderParts> {
    let mut parts = BorderParts::default();
    let components = split_components(value);
    if components.is_empty() || components.len() > 3 {
        return None;
    }

    for component in components {
        let lower = component.to_ascii_lowercase();
        let slot = if BORDER_STYLES.contains(&lower.as_str()) {
            &mut parts.style
        } else if is_line_width(&lower) {
            &mut parts.width
        } else {
            &mut parts.color
        };
        if slot.replace(component.to_string()).is_some() {
            return None;
        }
    }
    Some(parts)
}

fn is_line_width(component: &str) -> bool {
    matches!(component, "thin" | "medium" | "thick")
        || parse_number(component).is_some()
        || !LengthValue::parse(component).is_auto()
}
