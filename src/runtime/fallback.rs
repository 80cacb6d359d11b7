//! First-use template parsing
//!
//! Used when a template reaches the runtime without having been compiled.
//! The same parser and emitter as the build step run here, so the result
//! has exactly the shape compiled output would have had.

use super::metadata::StyleMetadata;
use super::registry::StyleSheetRegistry;
use super::Interpolation;
use crate::emitter::{emit, CompilationUnit};
use crate::parser::Parser;
use crate::utils::build_css_string;

const RUNTIME_UNIT: &str = "<runtime>";

pub fn parse_template(
    strings: &[&str],
    interpolations: &[Interpolation],
    registry: &mut StyleSheetRegistry,
) -> StyleMetadata {
    let css = build_css_string(strings, interpolations.len());

    let mut parser = Parser::new();
    let rule = parser.parse(&css);
    if !parser.diagnostics().is_clean() {
        log::debug!("runtime template parsed with notes: {:?}", parser.diagnostics());
    }

    let mut unit = CompilationUnit::new(RUNTIME_UNIT);
    let instructions = emit(&rule, interpolations.len(), &mut unit);
    StyleMetadata::from_instructions(&instructions, interpolations, registry)
}
