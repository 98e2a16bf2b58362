// Copyright 2024 The Jujutsu Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![allow(missing_docs)]

use std::num::NonZeroUsize;

/// Graph options of a log view, backed by a layered config.
///
/// Missing keys fall back to defaults; keys of the wrong type are reported as
/// errors.
#[derive(Debug, Clone, Default)]
pub struct GraphSettings {
    config: config::Config,
}

impl GraphSettings {
    pub fn from_config(config: config::Config) -> Self {
        GraphSettings { config }
    }

    /// Parses settings from a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        Ok(GraphSettings { config })
    }

    /// Whether to lay out one column per branch instead of one per head.
    pub fn compact_graph(&self) -> Result<bool, config::ConfigError> {
        self.get_bool_or("graph.compact", false)
    }

    /// Whether to color revisions by branch name.
    pub fn branch_color(&self) -> Result<bool, config::ConfigError> {
        self.get_bool_or("graph.branch-color", false)
    }

    /// Number of distinct colors the renderer can draw, if limited.
    pub fn palette_size(&self) -> Result<Option<NonZeroUsize>, config::ConfigError> {
        match self.config.get_int("graph.palette-size") {
            Ok(size) => Ok(usize::try_from(size).ok().and_then(NonZeroUsize::new)),
            Err(config::ConfigError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn config(&self) -> &config::Config {
        &self.config
    }

    fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, config::ConfigError> {
        match self.config.get_bool(key) {
            Ok(value) => Ok(value),
            Err(config::ConfigError::NotFound(_)) => Ok(default),
            Err(err) => Err(err),
        }
    }
}
