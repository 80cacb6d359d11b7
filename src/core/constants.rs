// FILE: src/core/constants.rs

// Interpolation placeholders: __EXPR_<index>__
pub const PLACEHOLDER_PREFIX: &str = "__EXPR_";
pub const PLACEHOLDER_SUFFIX: &str = "__";

// Units stripped from a placeholder (the expression result carries its own)
pub const PLACEHOLDER_UNITS: &[&str] = &["px", "em", "rem", "pt", "vh", "vw", "%"];

// Units dropped from plain numeric literals
pub const NUMERIC_UNITS: &[&str] = &["px", "em", "rem"];

// Generated names
pub const STYLE_KEY_BASE: &str = "base";
pub const STYLE_ID_PREFIX: &str = "__ks";
pub const PATCH_PARAM_NAME: &str = "p";
pub const METADATA_FIELD: &str = "__kstyled_metadata__";
pub const WITH_STYLES_METHOD: &str = "__withStyles";

// Defaults for the materializer
pub const DEFAULT_IMPORT_NAME: &str = "kstyled";
pub const DEFAULT_STYLE_SHEET_NAME: &str = "StyleSheet";
pub const DEFAULT_STYLE_SHEET_IMPORT: &str = "react-native";
pub const DEFAULT_STYLED_NAME: &str = "styled";
pub const DEFAULT_CSS_NAME: &str = "css";

// Wrapper chains (forwardRef/memo/...) deeper than this are not searched
pub const MAX_UNWRAP_DEPTH: usize = 5;

// Props never forwarded to the wrapped component
pub const PROP_AS: &str = "as";
pub const PROP_THEME: &str = "theme";
pub const PROP_STYLE: &str = "style";
pub const TRANSIENT_PROP_PREFIX: char = '$';
