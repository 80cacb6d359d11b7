//! KStyled Compiler
//!
//! Build-time transformer for styled template CSS. Each tagged template
//! (`styled(View)`...`` or `css`...``) is parsed into a static property map
//! and a list of interpolated properties, then rewritten as a hoisted
//! `StyleSheet.create` call plus a small metadata object the runtime merges
//! on every render.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use kstyc::{compile_file, Result};
//!
//! fn main() -> Result<()> {
//!     compile_file("Button.styles.json", "Button.styles.js")?;
//!     Ok(())
//! }
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Phase 1**: Template reconstruction - join quasis with `__EXPR_<n>__` markers
//! 2. **Phase 2**: Parser - declarations to a static map and dynamic entries
//! 3. **Phase 3**: Emitter - stylesheet registration and dynamic patch instructions
//! 4. **Phase 4**: Code generation - instructions to JS; failures pass the
//!    original template through unchanged
//!
//! The [`runtime`] module implements the render-time side: style merging,
//! metadata inheritance, attrs, theming and the uncompiled fallback.

pub mod ast;
pub mod cli;
pub mod codegen;
pub mod core;
pub mod emitter;
pub mod error;
pub mod parser;
pub mod runtime;
pub mod shorthand;
pub mod types;
pub mod utils;

use serde::Serialize;
use std::path::Path;

// Re-export commonly used types and functions
pub use ast::{ExpressionSource, StyleSource, TemplateKind, TemplateSource};
pub use codegen::{CodeGenerator, GeneratedTemplate};
pub use crate::core::{is_valid_property, normalize_property};
pub use emitter::{emit, CompilationUnit, InstructionSet};
pub use error::{CompilerError, Result};
pub use parser::{parse_css, style_map_to_css, ParseDiagnostics, Parser};
pub use shorthand::expand_shorthand;
pub use types::{Declaration, DynamicStyle, StyleMap, StyleRule, StyleValue};
pub use utils::{build_css_string, normalize_value};

pub use cli::EnhancedCli;

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// What `compile_file` writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// JS module with the rewritten templates
    #[default]
    Js,
    /// Instruction sets, diagnostics and generated code as JSON
    Json,
    /// Rust debug dump of the compiled module
    Debug,
}

/// Compilation options and settings
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Log every pipeline phase
    pub debug_mode: bool,

    /// Module the `styled`/`css` helpers are imported from
    pub import_name: String,

    /// Module `StyleSheet` is imported from
    pub style_sheet_import: String,

    pub style_sheet_name: String,
    pub styled_name: String,
    pub css_name: String,

    /// Add `debug: true` to every metadata object
    pub debug_metadata: bool,

    pub output_format: OutputFormat,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            debug_mode: false,
            import_name: crate::core::DEFAULT_IMPORT_NAME.to_string(),
            style_sheet_import: crate::core::DEFAULT_STYLE_SHEET_IMPORT.to_string(),
            style_sheet_name: crate::core::DEFAULT_STYLE_SHEET_NAME.to_string(),
            styled_name: crate::core::DEFAULT_STYLED_NAME.to_string(),
            css_name: crate::core::DEFAULT_CSS_NAME.to_string(),
            debug_metadata: false,
            output_format: OutputFormat::Js,
        }
    }
}

/// Compilation statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompilationStats {
    /// Input size in bytes
    pub source_size: u64,

    /// Written output size in bytes
    pub output_size: u64,

    pub template_count: usize,

    /// Templates rewritten to precompiled form
    pub transformed_count: usize,

    /// Templates left as written (empty, unparseable or failed to materialize)
    pub passthrough_count: usize,

    /// `StyleSheet.create` registrations emitted
    pub style_sheet_count: usize,

    pub static_property_count: usize,
    pub dynamic_property_count: usize,

    /// Declarations dropped by the parser
    pub skipped_declarations: usize,

    /// Compilation time in milliseconds
    pub compile_time_ms: u64,
}

/// Result for one template
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledTemplate {
    pub name: Option<String>,
    pub instructions: InstructionSet,
    pub diagnostics: ParseDiagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoisted: Option<String>,
    /// Replacement expression, or the original template on passthrough
    pub code: String,
    pub transformed: bool,
}

/// Result for one input file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledModule {
    pub file_name: String,
    pub templates: Vec<CompiledTemplate>,
}

impl CompiledModule {
    /// Render as a JS module. Hoisted registrations come before every export.
    pub fn to_js(&self, options: &CompilerOptions) -> String {
        let mut out = format!("// Generated by {} v{} from {}\n", NAME, VERSION, self.file_name);

        let hoisted: Vec<&str> = self
            .templates
            .iter()
            .filter_map(|template| template.hoisted.as_deref())
            .collect();

        if !hoisted.is_empty() {
            out.push_str(&format!(
                "import {{ {} }} from '{}';\n",
                options.style_sheet_name, options.style_sheet_import
            ));
        }

        let mut helpers = Vec::new();
        if self.templates.iter().any(|t| t.code.starts_with(&options.styled_name)) {
            helpers.push(options.styled_name.as_str());
        }
        if self.templates.iter().any(|t| t.code.starts_with(&options.css_name)) {
            helpers.push(options.css_name.as_str());
        }
        if !helpers.is_empty() {
            out.push_str(&format!(
                "import {{ {} }} from '{}';\n",
                helpers.join(", "),
                options.import_name
            ));
        }

        if !hoisted.is_empty() {
            out.push('\n');
            for declaration in &hoisted {
                out.push_str(declaration);
                out.push('\n');
            }
        }

        for (index, template) in self.templates.iter().enumerate() {
            let name = template
                .name
                .as_deref()
                .filter(|name| utils::is_valid_identifier(name))
                .map(str::to_string)
                .unwrap_or_else(|| format!("style{}", index));
            out.push_str(&format!("\nexport const {} = {};\n", name, template.code));
        }

        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CompilerError::codegen(format!("JSON serialization error: {}", e)))
    }

    pub fn render(&self, options: &CompilerOptions) -> Result<String> {
        match options.output_format {
            OutputFormat::Js => Ok(self.to_js(options)),
            OutputFormat::Json => self.to_json(),
            OutputFormat::Debug => Ok(format!("{:#?}", self)),
        }
    }
}

/// Main compiler entry point with default options
pub fn compile_file(input_path: &str, output_path: &str) -> Result<CompilationStats> {
    compile_file_with_options(input_path, output_path, CompilerOptions::default())
}

/// Compile with custom options
pub fn compile_file_with_options(
    input_path: &str,
    output_path: &str,
    options: CompilerOptions,
) -> Result<CompilationStats> {
    use std::fs;
    use std::time::Instant;

    let start_time = Instant::now();

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!("Compiling '{}' to '{}'...", input_path, output_path);
        log::debug!("Compiler options: {:?}", options);
    }

    let text = fs::read_to_string(input_path).map_err(|e| CompilerError::FileNotFound {
        path: format!("{}: {}", input_path, e),
    })?;
    let source = parse_source(&text, input_path)?;

    let (module, mut stats) = compile_source_with_options(&source, input_path, &options);
    let rendered = module.render(&options)?;

    stats.source_size = text.len() as u64;
    stats.output_size = rendered.len() as u64;
    stats.compile_time_ms = start_time.elapsed().as_millis() as u64;

    fs::write(output_path, rendered)?;

    if options.debug_mode {
        log::info!("Compilation successful!");
        log::info!(
            "Templates: {} transformed, {} passed through",
            stats.transformed_count,
            stats.passthrough_count
        );
        log::info!("Compile time: {}ms", stats.compile_time_ms);
        log::debug!("Full stats: {:?}", stats);
    }

    Ok(stats)
}

/// Read an input file: a JSON template manifest, or a plain declaration
/// block compiled as a single `css` template.
pub fn parse_source(text: &str, file_name: &str) -> Result<StyleSource> {
    let path = Path::new(file_name);
    let is_manifest = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    if is_manifest {
        return serde_json::from_str(text).map_err(|e| CompilerError::parse(file_name, e.to_string()));
    }

    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.split('.').next())
        .filter(|stem| utils::is_valid_identifier(stem))
        .map(str::to_string);

    Ok(StyleSource {
        templates: vec![TemplateSource {
            name,
            ..TemplateSource::css(vec![text.to_string()], Vec::new())
        }],
    })
}

/// Compile templates with default options
pub fn compile_source(source: &StyleSource, file_name: &str) -> CompiledModule {
    compile_source_with_options(source, file_name, &CompilerOptions::default()).0
}

/// Compile every template of one file. Individual templates never fail the
/// file; they pass through instead.
pub fn compile_source_with_options(
    source: &StyleSource,
    file_name: &str,
    options: &CompilerOptions,
) -> (CompiledModule, CompilationStats) {
    let mut unit = CompilationUnit::new(file_name);
    let mut stats = CompilationStats {
        template_count: source.templates.len(),
        ..CompilationStats::default()
    };

    if options.debug_mode {
        log::debug!(
            "Starting compilation pipeline for {} ({} templates)",
            file_name,
            source.templates.len()
        );
    }

    let templates: Vec<CompiledTemplate> = source
        .templates
        .iter()
        .enumerate()
        .map(|(index, template)| transform_template(template, index, &mut unit, options))
        .collect();

    for template in &templates {
        if template.transformed {
            stats.transformed_count += 1;
        } else {
            stats.passthrough_count += 1;
        }
        if let Some(registration) = &template.instructions.style_sheet_registration {
            stats.style_sheet_count += 1;
            stats.static_property_count += registration.properties.len();
        }
        if let Some(builder) = &template.instructions.dynamic_patch_builder {
            stats.dynamic_property_count += builder.entries.len();
        }
        stats.skipped_declarations += template.diagnostics.skipped.len();
    }

    (
        CompiledModule {
            file_name: file_name.to_string(),
            templates,
        },
        stats,
    )
}

/// Parse, emit and materialize one template.
///
/// An empty instruction set or a code generation error leaves the template
/// exactly as written.
pub fn transform_template(
    template: &TemplateSource,
    index: usize,
    unit: &mut CompilationUnit,
    options: &CompilerOptions,
) -> CompiledTemplate {
    let css = template.css_text();

    // Phase 2: Parse
    let mut parser = Parser::new();
    let rule = parser.parse(&css);
    let diagnostics = parser.into_diagnostics();
    if options.debug_mode {
        log::debug!(
            "Template {}: {} static, {} dynamic",
            index,
            rule.static_styles.len(),
            rule.dynamic_properties().count()
        );
    }

    // Phase 3: Emit
    let instructions = emit(&rule, template.expressions.len(), unit);
    let passthrough = |instructions: InstructionSet, diagnostics: ParseDiagnostics| CompiledTemplate {
        name: template.name.clone(),
        instructions,
        diagnostics,
        hoisted: None,
        code: template.original_text(&options.styled_name, &options.css_name),
        transformed: false,
    };

    if instructions.is_empty() {
        log::warn!(
            "{}: template {} has no usable declarations, left unchanged",
            unit.file_name(),
            index
        );
        return passthrough(instructions, diagnostics);
    }

    // Phase 4: Materialize
    let generated = CodeGenerator::new(options)
        .generate(template, &instructions)
        .map_err(|e| CompilerError::transform(unit.file_name(), index, e.to_string()));

    match generated {
        Ok(code) => CompiledTemplate {
            name: template.name.clone(),
            instructions,
            diagnostics,
            hoisted: code.hoisted,
            code: code.expression,
            transformed: true,
        },
        Err(e) => {
            log::error!("{}; keeping the original template", e);
            passthrough(instructions, diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::DynamicEntry;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn template(quasis: &[&str], expressions: Vec<ExpressionSource>) -> TemplateSource {
        TemplateSource::styled("View", quasis.iter().map(|q| q.to_string()).collect(), expressions)
    }

    #[test]
    fn test_scenario_two_value_padding() {
        let rule = parse_css("padding: 4px 8px;");
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({ "static": { "paddingVertical": 4, "paddingHorizontal": 8 }, "dynamic": [] })
        );
    }

    #[test]
    fn test_scenario_function_expression() {
        let source = StyleSource {
            templates: vec![template(
                &["background-color: ", ";"],
                vec![ExpressionSource::function("p => p.$variant === 'primary' ? '#007AFF' : '#fff'")],
            )
            .with_name("Card")],
        };
        let module = compile_source(&source, "Card.tsx");
        let compiled = &module.templates[0];

        assert!(compiled.transformed);
        assert_eq!(
            compiled.instructions.dynamic_patch_builder.as_ref().unwrap().entries,
            vec![DynamicEntry {
                property: "backgroundColor".into(),
                expression_index: 0
            }]
        );
        assert!(compiled
            .code
            .contains("getDynamicPatch: (p) => ({ backgroundColor: (p => p.$variant === 'primary' ? '#007AFF' : '#fff')(p) })"));
    }

    #[test]
    fn test_scenario_single_value_padding() {
        let rule = parse_css("padding: 16px;");
        assert_eq!(rule.static_styles.len(), 1);
        assert_eq!(rule.static_styles["padding"], StyleValue::Number(16.0));
        assert!(rule.dynamic.is_empty());
    }

    #[test]
    fn test_scenario_empty_block_passes_through() {
        let source = StyleSource {
            templates: vec![template(&[""], vec![])],
        };
        let (module, stats) =
            compile_source_with_options(&source, "Empty.tsx", &CompilerOptions::default());
        let compiled = &module.templates[0];

        assert!(compiled.instructions.is_empty());
        assert!(!compiled.transformed);
        assert_eq!(compiled.code, "styled(View)``");
        assert_eq!(stats.passthrough_count, 1);
        assert_eq!(stats.style_sheet_count, 0);
    }

    #[test]
    fn test_materializer_failure_passes_through() {
        let source = StyleSource {
            templates: vec![
                template(&["color: ", ";"], vec![ExpressionSource::function("   ")]),
                template(&["flex: 1;"], vec![]),
            ],
        };
        let (module, stats) =
            compile_source_with_options(&source, "Broken.tsx", &CompilerOptions::default());

        assert!(!module.templates[0].transformed);
        assert_eq!(module.templates[0].code, "styled(View)`color: ${   };`");
        assert!(module.templates[1].transformed);
        assert_eq!(stats.transformed_count, 1);
        assert_eq!(stats.passthrough_count, 1);
    }

    #[test]
    fn test_module_output_order() {
        let source = StyleSource {
            templates: vec![
                template(&["padding: 4px 8px; color: ", ";"], vec![ExpressionSource::value("tint")])
                    .with_name("Box"),
                TemplateSource::css(vec!["opacity: 0.5".into()], vec![]),
            ],
        };
        let options = CompilerOptions::default();
        let (module, _) = compile_source_with_options(&source, "Box.tsx", &options);
        let js = module.to_js(&options);

        assert!(js.contains("import { StyleSheet } from 'react-native';"));
        assert!(js.contains("import { styled, css } from 'kstyled';"));
        let first_registration = js.find("const __ks0 = StyleSheet.create").unwrap();
        let second_registration = js.find("const __ks1 = StyleSheet.create").unwrap();
        let first_use = js.find("export const Box = styled(View)").unwrap();
        assert!(first_registration < first_use);
        assert!(second_registration < first_use);
        assert!(js.contains("export const style1 = css.__withStyles({ compiledStyles: __ks1"));
    }

    #[test]
    fn test_invalid_export_name_falls_back() {
        let source = StyleSource {
            templates: vec![
                template(&["flex: 1;"], vec![]).with_name("my-card"),
                template(&["flex: 2;"], vec![]).with_name("Card"),
            ],
        };
        let options = CompilerOptions::default();
        let js = compile_source(&source, "Cards.tsx").to_js(&options);

        assert!(js.contains("export const style0 = styled(View)"));
        assert!(js.contains("export const Card = styled(View)"));
        assert!(!js.contains("my-card"));
    }

    #[test]
    fn test_compile_manifest_file() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("Button.json");
        let output_path = temp_dir.path().join("Button.js");

        let manifest = json!({
            "templates": [{
                "name": "Button",
                "kind": "styled",
                "component": "Pressable",
                "quasis": ["padding: 12px; border-radius: 8px; background-color: ", ";"],
                "expressions": [{ "source": "p => p.theme.colors.primary", "function": true }]
            }]
        });
        fs::write(&input_path, manifest.to_string()).unwrap();

        let stats = compile_file(input_path.to_str().unwrap(), output_path.to_str().unwrap()).unwrap();

        assert!(output_path.exists());
        assert_eq!(stats.template_count, 1);
        assert_eq!(stats.transformed_count, 1);
        assert_eq!(stats.static_property_count, 2);
        assert_eq!(stats.dynamic_property_count, 1);
        assert!(stats.output_size > 0);

        let js = fs::read_to_string(&output_path).unwrap();
        assert!(js.contains("const __ks0 = StyleSheet.create({ base: { padding: 12, borderRadius: 8 } });"));
        assert!(js.contains("export const Button = styled(Pressable).__withStyles("));
    }

    #[test]
    fn test_compile_plain_file_as_json() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("card.css");
        let output_path = temp_dir.path().join("card.json");
        fs::write(&input_path, "margin: 0 auto;\nopacity: 0.9;\nbroken\n").unwrap();

        let options = CompilerOptions {
            debug_mode: true,
            output_format: OutputFormat::Json,
            ..Default::default()
        };
        let stats = compile_file_with_options(
            input_path.to_str().unwrap(),
            output_path.to_str().unwrap(),
            options,
        )
        .unwrap();
        assert_eq!(stats.static_property_count, 3);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
        let template = &written["templates"][0];
        assert_eq!(template["name"], json!("card"));
        assert_eq!(
            template["instructions"]["styleSheetRegistration"]["properties"],
            json!({ "marginVertical": 0, "marginHorizontal": "auto", "opacity": 0.9 })
        );
        assert_eq!(template["diagnostics"]["skipped"], json!(["broken"]));
    }

    #[test]
    fn test_missing_input_and_bad_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("out.js");
        let missing = temp_dir.path().join("missing.json");
        let err = compile_file(missing.to_str().unwrap(), output_path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CompilerError::FileNotFound { .. }));

        let bad = temp_dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        let err = compile_file(bad.to_str().unwrap(), output_path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CompilerError::Parse { .. }));
    }

    #[test]
    fn test_compiler_options_default() {
        let options = CompilerOptions::default();
        assert!(!options.debug_mode);
        assert_eq!(options.import_name, "kstyled");
        assert_eq!(options.style_sheet_name, "StyleSheet");
        assert_eq!(options.output_format, OutputFormat::Js);
        assert!(!options.debug_metadata);
    }
}
