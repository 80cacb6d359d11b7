// FILE: src/cli/config.rs

use crate::error::{CompilerError, Result};
use crate::utils::is_valid_identifier;
use crate::{CompilerOptions, OutputFormat};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub debug: Option<bool>,
    pub debug_metadata: Option<bool>,
    pub import_name: Option<String>,
    pub style_sheet_name: Option<String>,
    pub style_sheet_import: Option<String>,
    pub styled_name: Option<String>,
    pub css_name: Option<String>,
    pub output_format: Option<String>,
    pub output_directory: Option<String>,
}

impl ConfigFile {
    pub fn apply(&self, options: &mut CompilerOptions) -> Result<()> {
        if let Some(debug) = self.debug {
            options.debug_mode = debug;
        }
        if let Some(debug_metadata) = self.debug_metadata {
            options.debug_metadata = debug_metadata;
        }
        if let Some(import_name) = &self.import_name {
            options.import_name = import_name.clone();
        }
        if let Some(style_sheet_import) = &self.style_sheet_import {
            options.style_sheet_import = style_sheet_import.clone();
        }

        // These end up as identifiers in generated code
        for (field, value, target) in [
            ("styleSheetName", &self.style_sheet_name, &mut options.style_sheet_name),
            ("styledName", &self.styled_name, &mut options.styled_name),
            ("cssName", &self.css_name, &mut options.css_name),
        ] {
            if let Some(name) = value {
                if !is_valid_identifier(name) {
                    return Err(CompilerError::invalid_format(format!(
                        "{} must be a JS identifier, got '{}'",
                        field, name
                    )));
                }
                *target = name.clone();
            }
        }

        if let Some(format) = &self.output_format {
            options.output_format = OutputFormat::from_str(format, true).map_err(|_| {
                CompilerError::invalid_format(format!("Unknown output format in config: {}", format))
            })?;
        }

        Ok(())
    }
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| CompilerError::FileNotFound {
        path: format!("Config file {}: {}", config_path, e),
    })?;

    let config = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| CompilerError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| CompilerError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })?
    } else {
        return Err(CompilerError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        });
    };

    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}
