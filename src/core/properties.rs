// FILE: src/core/properties.rs

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static HYPHEN_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-([a-z])").unwrap());

/// Canonical target property name for a raw declaration property.
///
/// Names without a hyphen are taken as already canonical, so one block may mix
/// `background-color` and `backgroundColor` freely. Hyphenated names go through
/// the lookup table first and fall back to plain kebab-to-camel conversion.
pub fn normalize_property(raw: &str) -> String {
    let trimmed = raw.trim();

    if !trimmed.contains('-') {
        return trimmed.to_string();
    }

    if let Some(mapped) = mapped_property(&trimmed.to_lowercase()) {
        return mapped.to_string();
    }

    kebab_to_camel(trimmed)
}

/// Generic conversion: every `-x` (lowercase letter) becomes `X`.
pub fn kebab_to_camel(name: &str) -> String {
    HYPHEN_LETTER
        .replace_all(name, |caps: &Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Hyphenated property names with a fixed target name
pub const PROPERTY_TABLE: &[(&str, &str)] = &[
    // Background & colors
    ("background-color", "backgroundColor"),

    // Border
    ("border-width", "borderWidth"),
    ("border-color", "borderColor"),
    ("border-style", "borderStyle"),
    ("border-radius", "borderRadius"),
    ("border-top-width", "borderTopWidth"),
    ("border-right-width", "borderRightWidth"),
    ("border-bottom-width", "borderBottomWidth"),
    ("border-left-width", "borderLeftWidth"),
    ("border-start-width", "borderStartWidth"),
    ("border-end-width", "borderEndWidth"),
    ("border-top-color", "borderTopColor"),
    ("border-right-color", "borderRightColor"),
    ("border-bottom-color", "borderBottomColor"),
    ("border-left-color", "borderLeftColor"),
    ("border-start-color", "borderStartColor"),
    ("border-end-color", "borderEndColor"),
    ("border-block-color", "borderBlockColor"),
    ("border-block-end-color", "borderBlockEndColor"),
    ("border-block-start-color", "borderBlockStartColor"),
    ("border-top-left-radius", "borderTopLeftRadius"),
    ("border-top-right-radius", "borderTopRightRadius"),
    ("border-bottom-left-radius", "borderBottomLeftRadius"),
    ("border-bottom-right-radius", "borderBottomRightRadius"),
    ("border-top-start-radius", "borderTopStartRadius"),
    ("border-top-end-radius", "borderTopEndRadius"),
    ("border-bottom-start-radius", "borderBottomStartRadius"),
    ("border-bottom-end-radius", "borderBottomEndRadius"),
    ("border-start-start-radius", "borderStartStartRadius"),
    ("border-start-end-radius", "borderStartEndRadius"),
    ("border-end-start-radius", "borderEndStartRadius"),
    ("border-end-end-radius", "borderEndEndRadius"),
    ("border-curve", "borderCurve"),

    // Shadow & elevation
    ("shadow-color", "shadowColor"),
    ("shadow-offset", "shadowOffset"),
    ("shadow-opacity", "shadowOpacity"),
    ("shadow-radius", "shadowRadius"),
    ("box-shadow", "boxShadow"),
    ("drop-shadow", "dropShadow"),

    // Display & outline
    ("backface-visibility", "backfaceVisibility"),
    ("pointer-events", "pointerEvents"),
    ("outline-color", "outlineColor"),
    ("outline-offset", "outlineOffset"),
    ("outline-style", "outlineStyle"),
    ("outline-width", "outlineWidth"),
    ("mix-blend-mode", "mixBlendMode"),
    ("transform-origin", "transformOrigin"),

    // Margin
    ("margin-top", "marginTop"),
    ("margin-right", "marginRight"),
    ("margin-bottom", "marginBottom"),
    ("margin-left", "marginLeft"),
    ("margin-start", "marginStart"),
    ("margin-end", "marginEnd"),
    ("margin-vertical", "marginVertical"),
    ("margin-horizontal", "marginHorizontal"),
    ("margin-block", "marginBlock"),
    ("margin-block-start", "marginBlockStart"),
    ("margin-block-end", "marginBlockEnd"),
    ("margin-inline", "marginInline"),
    ("margin-inline-start", "marginInlineStart"),
    ("margin-inline-end", "marginInlineEnd"),

    // Padding
    ("padding-top", "paddingTop"),
    ("padding-right", "paddingRight"),
    ("padding-bottom", "paddingBottom"),
    ("padding-left", "paddingLeft"),
    ("padding-start", "paddingStart"),
    ("padding-end", "paddingEnd"),
    ("padding-vertical", "paddingVertical"),
    ("padding-horizontal", "paddingHorizontal"),
    ("padding-block", "paddingBlock"),
    ("padding-block-start", "paddingBlockStart"),
    ("padding-block-end", "paddingBlockEnd"),
    ("padding-inline", "paddingInline"),
    ("padding-inline-start", "paddingInlineStart"),
    ("padding-inline-end", "paddingInlineEnd"),

    // Dimensions & positioning
    ("min-width", "minWidth"),
    ("max-width", "maxWidth"),
    ("min-height", "minHeight"),
    ("max-height", "maxHeight"),
    ("aspect-ratio", "aspectRatio"),
    ("z-index", "zIndex"),
    ("box-sizing", "boxSizing"),
    ("inset-block", "insetBlock"),
    ("inset-inline", "insetInline"),

    // Flexbox
    ("flex-direction", "flexDirection"),
    ("flex-wrap", "flexWrap"),
    ("justify-content", "justifyContent"),
    ("align-items", "alignItems"),
    ("align-self", "alignSelf"),
    ("align-content", "alignContent"),
    ("flex-grow", "flexGrow"),
    ("flex-shrink", "flexShrink"),
    ("flex-basis", "flexBasis"),
    ("row-gap", "rowGap"),
    ("column-gap", "columnGap"),

    // Text
    ("font-size", "fontSize"),
    ("font-weight", "fontWeight"),
    ("font-family", "fontFamily"),
    ("font-style", "fontStyle"),
    ("font-variant", "fontVariant"),
    ("line-height", "lineHeight"),
    ("letter-spacing", "letterSpacing"),
    ("text-align", "textAlign"),
    ("text-align-vertical", "textAlignVertical"),
    ("text-decoration", "textDecorationLine"),
    ("text-decoration-line", "textDecorationLine"),
    ("text-decoration-color", "textDecorationColor"),
    ("text-decoration-style", "textDecorationStyle"),
    ("text-shadow-color", "textShadowColor"),
    ("text-shadow-offset", "textShadowOffset"),
    ("text-shadow-radius", "textShadowRadius"),
    ("text-transform", "textTransform"),
    ("vertical-align", "verticalAlign"),
    ("writing-direction", "writingDirection"),
    ("include-font-padding", "includeFontPadding"),
    ("user-select", "userSelect"),

    // Image
    ("resize-mode", "resizeMode"),
    ("object-fit", "objectFit"),
    ("tint-color", "tintColor"),
    ("overlay-color", "overlayColor"),
];

/// Hyphenated property name to target property name
pub fn mapped_property(key: &str) -> Option<&'static str> {
    PROPERTY_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, mapped)| *mapped)
}

/// Whether the target platform defines `property` (canonical form).
///
/// Diagnostics only: the parser never rejects a property.
pub fn is_valid_property(property: &str) -> bool {
    matches!(
        property,
        // Layout & dimensions
        "width" | "height" | "minWidth" | "maxWidth" | "minHeight" | "maxHeight" | "aspectRatio"
        // Margin
        | "margin" | "marginTop" | "marginRight" | "marginBottom" | "marginLeft"
        | "marginVertical" | "marginHorizontal" | "marginStart" | "marginEnd"
        | "marginBlock" | "marginBlockStart" | "marginBlockEnd"
        | "marginInline" | "marginInlineStart" | "marginInlineEnd"
        // Padding
        | "padding" | "paddingTop" | "paddingRight" | "paddingBottom" | "paddingLeft"
        | "paddingVertical" | "paddingHorizontal" | "paddingStart" | "paddingEnd"
        | "paddingBlock" | "paddingBlockStart" | "paddingBlockEnd"
        | "paddingInline" | "paddingInlineStart" | "paddingInlineEnd"
        // Flexbox
        | "flex" | "flexDirection" | "flexWrap" | "justifyContent" | "alignItems" | "alignSelf"
        | "alignContent" | "flexGrow" | "flexShrink" | "flexBasis" | "rowGap" | "columnGap" | "gap"
        // Position
        | "position" | "top" | "right" | "bottom" | "left" | "start" | "end" | "zIndex"
        | "inset" | "insetBlock" | "insetInline"
        // Display
        | "opacity" | "overflow" | "display" | "backfaceVisibility" | "pointerEvents" | "cursor"
        | "direction" | "boxSizing" | "isolation" | "mixBlendMode"
        // Colors
        | "backgroundColor" | "color"
        // Border
        | "borderWidth" | "borderTopWidth" | "borderRightWidth" | "borderBottomWidth"
        | "borderLeftWidth" | "borderStartWidth" | "borderEndWidth"
        | "borderColor" | "borderTopColor" | "borderRightColor" | "borderBottomColor"
        | "borderLeftColor" | "borderStartColor" | "borderEndColor" | "borderBlockColor"
        | "borderBlockStartColor" | "borderBlockEndColor"
        | "borderStyle" | "borderCurve"
        | "borderRadius" | "borderTopLeftRadius" | "borderTopRightRadius"
        | "borderBottomLeftRadius" | "borderBottomRightRadius" | "borderTopStartRadius"
        | "borderTopEndRadius" | "borderBottomStartRadius" | "borderBottomEndRadius"
        | "borderStartStartRadius" | "borderStartEndRadius" | "borderEndStartRadius"
        | "borderEndEndRadius"
        // Shadow, elevation, effects
        | "shadowColor" | "shadowOffset" | "shadowOpacity" | "shadowRadius" | "elevation"
        | "boxShadow" | "dropShadow" | "filter"
        | "outlineColor" | "outlineOffset" | "outlineStyle" | "outlineWidth"
        // Text
        | "fontSize" | "fontWeight" | "fontFamily" | "fontStyle" | "fontVariant" | "lineHeight"
        | "letterSpacing" | "textAlign" | "textAlignVertical" | "textDecorationLine"
        | "textDecorationColor" | "textDecorationStyle" | "textShadowColor"
        | "textShadowOffset" | "textShadowRadius" | "textTransform" | "verticalAlign"
        | "writingDirection" | "includeFontPadding" | "userSelect"
        // Image
        | "resizeMode" | "objectFit" | "tintColor" | "overlayColor"
        // Transform
        | "transform" | "transformOrigin" | "transformMatrix" | "rotation"
        | "scaleX" | "scaleY" | "translateX" | "translateY"
    )
}
