//! JS code generation
//!
//! Materializes an [`InstructionSet`] into target source text: a hoisted
//! `StyleSheet.create` declaration and the metadata object handed to
//! `__withStyles`.

use crate::ast::{ExpressionSource, TemplateKind, TemplateSource};
use crate::core::constants::WITH_STYLES_METHOD;
use crate::emitter::{DynamicPatchBuilder, Instruction, InstructionSet, StyleSheetRegistration};
use crate::error::{CompilerError, Result};
use crate::types::{format_number, StyleMap, StyleValue};
use crate::utils::is_valid_identifier;
use crate::CompilerOptions;

/// Code for one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTemplate {
    /// Declaration that must precede every use of the registration id
    pub hoisted: Option<String>,
    /// Replacement for the tagged template expression
    pub expression: String,
}

pub struct CodeGenerator<'a> {
    options: &'a CompilerOptions,
    output: String,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(options: &'a CompilerOptions) -> Self {
        Self {
            options,
            output: String::new(),
        }
    }

    pub fn generate(
        &mut self,
        template: &TemplateSource,
        instructions: &InstructionSet,
    ) -> Result<GeneratedTemplate> {
        if instructions.is_empty() {
            return Err(CompilerError::codegen("nothing to materialize"));
        }

        let mut hoisted = None;
        let mut fields = Vec::new();

        for instruction in instructions.instructions() {
            match instruction {
                Instruction::RegisterStyleSheet(registration) => {
                    hoisted = Some(self.style_sheet_declaration(registration)?);
                    fields.push(format!("compiledStyles: {}", registration.id));
                    fields.push(format!(
                        "styleKeys: [{}]",
                        quote_string(&registration.key)?
                    ));
                }
                Instruction::BuildDynamicPatch(builder) => {
                    let patch = self.dynamic_patch(builder, &template.expressions)?;
                    fields.push(format!("getDynamicPatch: {}", patch));
                }
            }
        }

        if self.options.debug_metadata {
            fields.push("debug: true".to_string());
        }

        self.output.clear();
        match &template.kind {
            TemplateKind::Styled { component } => {
                if component.trim().is_empty() {
                    return Err(CompilerError::codegen("styled() target is empty"));
                }
                self.output.push_str(&self.options.styled_name);
                self.output.push('(');
                self.output.push_str(component.trim());
                self.output.push(')');
            }
            TemplateKind::Css => self.output.push_str(&self.options.css_name),
        }
        self.output.push('.');
        self.output.push_str(WITH_STYLES_METHOD);
        self.output.push_str("({ ");
        self.output.push_str(&fields.join(", "));
        self.output.push_str(" })");

        Ok(GeneratedTemplate {
            hoisted,
            expression: std::mem::take(&mut self.output),
        })
    }

    fn style_sheet_declaration(&self, registration: &StyleSheetRegistration) -> Result<String> {
        Ok(format!(
            "const {} = {}.create({{ {}: {} }});",
            registration.id,
            self.options.style_sheet_name,
            object_key(&registration.key)?,
            style_object(&registration.properties)?
        ))
    }

    fn dynamic_patch(
        &self,
        builder: &DynamicPatchBuilder,
        expressions: &[ExpressionSource],
    ) -> Result<String> {
        let param = &builder.param_name;
        let mut entries = Vec::with_capacity(builder.entries.len());

        for entry in &builder.entries {
            let expression = expressions.get(entry.expression_index).ok_or_else(|| {
                CompilerError::codegen(format!(
                    "expression {} for '{}' is out of range ({} expressions)",
                    entry.expression_index,
                    entry.property,
                    expressions.len()
                ))
            })?;

            let source = expression.source.trim();
            if source.is_empty() {
                return Err(CompilerError::codegen(format!(
                    "expression {} for '{}' is empty",
                    entry.expression_index, entry.property
                )));
            }

            let value = if expression.function {
                format!("({})({})", source, param)
            } else if is_simple_expression(source) {
                source.to_string()
            } else {
                format!("({})", source)
            };

            entries.push(format!("{}: {}", object_key(&entry.property)?, value));
        }

        Ok(format!("({}) => ({{ {} }})", param, entries.join(", ")))
    }
}

/// `{ paddingTop: 4, color: "red" }`
pub fn style_object(properties: &StyleMap) -> Result<String> {
    if properties.is_empty() {
        return Ok("{}".to_string());
    }

    let mut parts = Vec::with_capacity(properties.len());
    for (property, value) in properties {
        parts.push(format!("{}: {}", object_key(property)?, style_literal(property, value)?));
    }
    Ok(format!("{{ {} }}", parts.join(", ")))
}

fn style_literal(property: &str, value: &StyleValue) -> Result<String> {
    match value {
        StyleValue::Number(n) if !n.is_finite() => Err(CompilerError::codegen(format!(
            "'{}' has a value with no JS literal form: {}",
            property, n
        ))),
        StyleValue::Number(n) => Ok(format_number(*n)),
        StyleValue::Text(text) => quote_string(text),
    }
}

fn object_key(name: &str) -> Result<String> {
    if is_valid_identifier(name) {
        Ok(name.to_string())
    } else {
        quote_string(name)
    }
}

fn quote_string(text: &str) -> Result<String> {
    serde_json::to_string(text).map_err(|e| CompilerError::codegen(e.to_string()))
}

/// Identifier paths (`theme.colors.primary`) are inlined without parentheses.
fn is_simple_expression(source: &str) -> bool {
    source.split('.').all(is_valid_identifier)
}
