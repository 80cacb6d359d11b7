//! Error types for the KStyled compiler
//!
//! Parsing and instruction emission never fail: malformed declarations are
//! skipped and unknown properties pass through. Only the stages around them
//! (reading inputs, loading config, materializing code, theme lookup) can
//! report an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Code generation error: {message}")]
    CodeGen { message: String },

    #[error("Transform error in {file} (template {template}): {message}")]
    Transform { file: String, template: usize, message: String },

    #[error("Theme error: {message}")]
    Theme { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

pub type Result<T> = std::result::Result<T, CompilerError>;

impl CompilerError {
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn codegen(message: impl Into<String>) -> Self {
        Self::CodeGen {
            message: message.into(),
        }
    }

    pub fn transform(file: impl Into<String>, template: usize, message: impl Into<String>) -> Self {
        Self::Transform {
            file: file.into(),
            template,
            message: message.into(),
        }
    }

    pub fn theme(message: impl Into<String>) -> Self {
        Self::Theme {
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
