// FILE: src/core/mod.rs

pub mod constants;
pub mod properties;

pub use constants::*;
pub use properties::{is_valid_property, kebab_to_camel, mapped_property, normalize_property};
