//! Template source model
//!
//! A tagged template split into its literal parts and the source text of the
//! expressions between them. This is what a front end extracts from a file
//! and what the compiler consumes.

use crate::utils::build_css_string;
use serde::{Deserialize, Serialize};

/// How the template was tagged in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateKind {
    /// `styled(Component)` / `styled.Component`
    Styled { component: String },
    /// `css` inline helper
    Css,
}

impl Default for TemplateKind {
    fn default() -> Self {
        TemplateKind::Css
    }
}

/// One interpolated expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionSource {
    pub source: String,
    /// Arrow/function expressions are called with the props argument
    #[serde(default)]
    pub function: bool,
}

impl ExpressionSource {
    pub fn value(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            function: false,
        }
    }

    pub fn function(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            function: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TemplateRecord", into = "TemplateRecord")]
pub struct TemplateSource {
    pub name: Option<String>,
    pub kind: TemplateKind,
    pub quasis: Vec<String>,
    pub expressions: Vec<ExpressionSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum KindTag {
    Styled,
    #[default]
    Css,
}

/// Manifest form of a template: `kind` plus an optional `component`
#[derive(Serialize, Deserialize)]
struct TemplateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    kind: KindTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component: Option<String>,
    quasis: Vec<String>,
    #[serde(default)]
    expressions: Vec<ExpressionSource>,
}

impl From<TemplateRecord> for TemplateSource {
    fn from(record: TemplateRecord) -> Self {
        // A component implies styled even when the tag was left out
        let kind = match (record.kind, record.component) {
            (_, Some(component)) => TemplateKind::Styled { component },
            (KindTag::Styled, None) => TemplateKind::Styled {
                component: String::new(),
            },
            (KindTag::Css, None) => TemplateKind::Css,
        };
        Self {
            name: record.name,
            kind,
            quasis: record.quasis,
            expressions: record.expressions,
        }
    }
}

impl From<TemplateSource> for TemplateRecord {
    fn from(template: TemplateSource) -> Self {
        let (kind, component) = match template.kind {
            TemplateKind::Styled { component } => (KindTag::Styled, Some(component)),
            TemplateKind::Css => (KindTag::Css, None),
        };
        Self {
            name: template.name,
            kind,
            component,
            quasis: template.quasis,
            expressions: template.expressions,
        }
    }
}

impl TemplateSource {
    pub fn css(quasis: Vec<String>, expressions: Vec<ExpressionSource>) -> Self {
        Self {
            name: None,
            kind: TemplateKind::Css,
            quasis,
            expressions,
        }
    }

    pub fn styled(
        component: impl Into<String>,
        quasis: Vec<String>,
        expressions: Vec<ExpressionSource>,
    ) -> Self {
        Self {
            name: None,
            kind: TemplateKind::Styled {
                component: component.into(),
            },
            quasis,
            expressions,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declaration block with `__EXPR_<i>__` markers
    pub fn css_text(&self) -> String {
        build_css_string(&self.quasis, self.expressions.len())
    }

    /// The template as originally written; used when a transform is abandoned.
    pub fn original_text(&self, styled_name: &str, css_name: &str) -> String {
        let mut body = String::new();
        for (i, part) in self.quasis.iter().enumerate() {
            body.push_str(&escape_quasi(part));
            if let Some(expr) = self.expressions.get(i).filter(|_| i + 1 < self.quasis.len()) {
                body.push_str("${");
                body.push_str(&expr.source);
                body.push('}');
            }
        }

        match &self.kind {
            TemplateKind::Styled { component } => {
                format!("{}({})`{}`", styled_name, component, body)
            }
            TemplateKind::Css => format!("{}`{}`", css_name, body),
        }
    }
}

/// Template literal text for a quasi. Backslashes go first so the escapes
/// added afterwards are not doubled.
fn escape_quasi(part: &str) -> String {
    part.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// A file's worth of templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSource {
    pub templates: Vec<TemplateSource>,
}
