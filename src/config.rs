// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Graphologue-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Graphologue and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor settings, loadable from JSON. Every field has a default.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::Size;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Size used to place dropped and generated nodes before they are measured.
    pub node_size: Size,
    /// Gap between nodes placed on the provisional grid.
    pub node_gap: f64,
    /// Columns of the provisional grid.
    pub grid_columns: usize,
    pub node_background: String,
    /// Correction requests sent for one response before its consistent subset is committed.
    pub max_correction_rounds: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node_size: Size::new(160.0, 43.0),
            node_gap: 30.0,
            grid_columns: 4,
            node_background: "#ffffff".to_owned(),
            max_correction_rounds: 1,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(input).map_err(|source| ConfigError::Json { path: None, source })?;
        config.validated()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config: Self = serde_json::from_str(&input).map_err(|source| ConfigError::Json {
            path: Some(path.to_path_buf()),
            source,
        })?;
        config.validated()
    }

    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(EditorConfig)).unwrap_or_default()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.grid_columns == 0 {
            return Err(ConfigError::Invalid {
                field: "grid_columns",
                reason: "must be at least 1",
            });
        }
        let Size { width, height } = self.node_size;
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "node_size",
                reason: "must be finite and non-negative",
            });
        }
        if !(self.node_gap.is_finite() && self.node_gap >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "node_gap",
                reason: "must be finite and non-negative",
            });
        }
        Ok(self)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: Option<PathBuf>, source: serde_json::Error },
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path: Some(path), source } => {
                write!(f, "json error at {path:?}: {source}")
            }
            Self::Json { path: None, source } => write!(f, "json error: {source}"),
            Self::Invalid { field, reason } => write!(f, "invalid config field {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}
