//! Box-model shorthand expansion
//!
//! The same expansion runs at two points: while parsing a declaration block
//! (`padding: 4px 8px`) and while merging style fragments at render time,
//! where any remaining shorthand key has to become longhand so it can
//! override longhand base values. Both call [`expand_box_model`] with their
//! own set of target property names.

use crate::types::StyleMap;
use crate::utils::normalize_value;

/// Shorthands expanded while parsing (original, pre-normalization names)
pub const PARSE_TIME_SHORTHANDS: &[&str] = &["padding", "margin"];

/// Shorthands expanded while merging fragments (canonical names)
pub const MERGE_TIME_SHORTHANDS: &[&str] = &[
    "padding",
    "margin",
    "paddingHorizontal",
    "paddingVertical",
    "marginHorizontal",
    "marginVertical",
];

/// Which sides a box property addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoxAxis {
    All,
    Vertical,
    Horizontal,
}

/// `paddingHorizontal` -> (`padding`, Horizontal)
pub fn split_box_property(property: &str) -> Option<(&'static str, BoxAxis)> {
    let family = if property.starts_with("padding") {
        "padding"
    } else if property.starts_with("margin") {
        "margin"
    } else {
        return None;
    };

    let axis = match &property[family.len()..] {
        "" => BoxAxis::All,
        "Vertical" => BoxAxis::Vertical,
        "Horizontal" => BoxAxis::Horizontal,
        _ => return None,
    };

    Some((family, axis))
}

/// Positional expansion of a box shorthand.
///
/// `None` when `property` is not in `targets` or the value count has no
/// positional meaning for it. Values are taken as given; callers normalize.
pub fn expand_box_model<V: Clone>(
    property: &str,
    values: &[V],
    targets: &[&str],
) -> Option<Vec<(String, V)>> {
    if !targets.contains(&property) {
        return None;
    }

    let (family, axis) = split_box_property(property)?;
    let side = |suffix: &str, value: &V| (format!("{}{}", family, suffix), value.clone());

    let expanded = match (axis, values) {
        (BoxAxis::All, [all]) => vec![
            side("Top", all),
            side("Right", all),
            side("Bottom", all),
            side("Left", all),
        ],
        (BoxAxis::All, [vertical, horizontal]) => vec![
            side("Vertical", vertical),
            side("Horizontal", horizontal),
        ],
        (BoxAxis::All, [top, right, bottom, left]) => vec![
            side("Top", top),
            side("Right", right),
            side("Bottom", bottom),
            side("Left", left),
        ],
        (BoxAxis::Vertical, [vertical]) => vec![side("Top", vertical), side("Bottom", vertical)],
        (BoxAxis::Horizontal, [horizontal]) => {
            vec![side("Left", horizontal), side("Right", horizontal)]
        }
        _ => return None,
    };

    Some(expanded)
}

/// Parse-time expansion of `padding`/`margin` with 2 or 4 space separated values.
///
/// Single values are not shorthand (`padding: 16px` stays `padding: 16`).
/// 3 or 5+ values return `None` as well and the caller keeps the raw text.
pub fn expand_shorthand(property: &str, raw_value: &str) -> Option<StyleMap> {
    let trimmed = raw_value.trim();
    if !trimmed.contains(char::is_whitespace) {
        return None;
    }

    let parts: Vec<_> = trimmed.split_whitespace().map(normalize_value).collect();

    expand_box_model(property.trim(), &parts, PARSE_TIME_SHORTHANDS)
        .map(|pairs| pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StyleValue;

    fn map(pairs: &[(&str, f64)]) -> StyleMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), StyleValue::Number(*v)))
            .collect()
    }

    #[test]
    fn test_two_value_shorthand() {
        let expanded = expand_shorthand("padding", "4px 8px").unwrap();
        assert_eq!(
            expanded,
            map(&[("paddingVertical", 4.0), ("paddingHorizontal", 8.0)])
        );

        let expanded = expand_shorthand("margin", "0 auto").unwrap();
        assert_eq!(expanded["marginVertical"], StyleValue::Number(0.0));
        assert_eq!(expanded["marginHorizontal"], StyleValue::text("auto"));
    }

    #[test]
    fn test_four_value_shorthand() {
        let expanded = expand_shorthand("padding", "10px 20px 30px 40px").unwrap();
        assert_eq!(
            expanded,
            map(&[
                ("paddingTop", 10.0),
                ("paddingRight", 20.0),
                ("paddingBottom", 30.0),
                ("paddingLeft", 40.0),
            ])
        );
    }

    #[test]
    fn test_declined_shorthands() {
        assert!(expand_shorthand("padding", "16px").is_none());
        assert!(expand_shorthand("padding", "1px 2px 3px").is_none());
        assert!(expand_shorthand("margin", "1 2 3 4 5").is_none());
        assert!(expand_shorthand("shadow-offset", "1 1").is_none());
        // Canonical axis names are not parse-time shorthands
        assert!(expand_shorthand("paddingHorizontal", "1 2").is_none());
    }

    #[test]
    fn test_merge_time_targets() {
        let expanded = expand_box_model("paddingHorizontal", &[5], MERGE_TIME_SHORTHANDS).unwrap();
        assert_eq!(
            expanded,
            vec![("paddingLeft".to_string(), 5), ("paddingRight".to_string(), 5)]
        );

        let expanded = expand_box_model("margin", &[2], MERGE_TIME_SHORTHANDS).unwrap();
        assert_eq!(expanded.len(), 4);
        assert!(expanded.iter().all(|(_, v)| *v == 2));

        assert!(expand_box_model("margin", &[2], PARSE_TIME_SHORTHANDS).is_some());
        assert!(expand_box_model("marginVertical", &[2], PARSE_TIME_SHORTHANDS).is_none());
        assert!(expand_box_model("paddingTop", &[2], MERGE_TIME_SHORTHANDS).is_none());
    }

    #[test]
    fn test_split_box_property() {
        assert_eq!(split_box_property("padding"), Some(("padding", BoxAxis::All)));
        assert_eq!(split_box_property("marginVertical"), Some(("margin", BoxAxis::Vertical)));
        assert_eq!(split_box_property("paddingTop"), None);
        assert_eq!(split_box_property("border"), None);
    }
}
