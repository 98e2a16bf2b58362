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

//! Selection of a grapher from settings.

use std::num::NonZeroUsize;

use thiserror::Error;

use crate::branch_grapher::BranchGrapher;
use crate::error::GraphError;
use crate::error::GraphResult;
use crate::graph::GraphRow;
use crate::graph::Revision;
use crate::linear_grapher::LinearGrapher;
use crate::settings::GraphSettings;
use crate::source::RevisionSource;

/// Error while setting up a graph from settings.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The settings couldn't be read.
    #[error("Invalid graph settings")]
    Config(#[from] config::ConfigError),
    /// The grapher rejected the request.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Boxed iterator over graph rows.
pub type GraphRows<'a> = Box<dyn Iterator<Item = GraphResult<GraphRow>> + 'a>;

/// How columns of the graph are allocated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GraphLayout {
    /// One column per open head; every edge is drawn.
    #[default]
    Linear,
    /// One column per branch; edges may elide revisions.
    Compact,
}

/// Options for [`GraphLayout::rows()`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LayoutOptions {
    /// Only show revisions on this branch. Linear layout only.
    pub branch_filter: Option<String>,
    /// Only show ancestors of the start revision. Linear layout only.
    pub noheads: bool,
    /// Color revisions by branch name. Linear layout only.
    pub branch_color: bool,
    /// Limit colors to `0..palette_size`.
    pub palette_size: Option<NonZeroUsize>,
}

impl LayoutOptions {
    /// Reads the options stored in `settings`.
    pub fn from_settings(settings: &GraphSettings) -> Result<Self, config::ConfigError> {
        Ok(LayoutOptions {
            branch_color: settings.branch_color()?,
            palette_size: settings.palette_size()?,
            ..Default::default()
        })
    }
}

impl GraphLayout {
    /// Reads the layout selected by `graph.compact`.
    pub fn from_settings(settings: &GraphSettings) -> Result<Self, config::ConfigError> {
        if settings.compact_graph()? {
            Ok(GraphLayout::Compact)
        } else {
            Ok(GraphLayout::Linear)
        }
    }

    /// Lays out `start` down to `stop` of `source`.
    pub fn rows<'a, S>(
        self,
        source: &'a S,
        start: Revision,
        stop: Revision,
        options: &LayoutOptions,
    ) -> GraphResult<GraphRows<'a>>
    where
        S: RevisionSource + ?Sized,
    {
        match self {
            GraphLayout::Linear => {
                let mut grapher = LinearGrapher::new(source, start, stop)?
                    .with_noheads(options.noheads)
                    .with_branch_color(options.branch_color)
                    .with_palette_size(options.palette_size);
                if let Some(branch) = &options.branch_filter {
                    grapher = grapher.with_branch_filter(branch.as_str());
                }
                Ok(Box::new(grapher))
            }
            GraphLayout::Compact => {
                let grapher = BranchGrapher::new(source, start, stop)?
                    .with_palette_size(options.palette_size);
                Ok(Box::new(grapher))
            }
        }
    }
}

/// Lays out the whole log of `source` as configured by `settings`.
pub fn graph_from_settings<'a, S>(
    source: &'a S,
    settings: &GraphSettings,
) -> Result<GraphRows<'a>, LayoutError>
where
    S: RevisionSource + ?Sized,
{
    let layout = GraphLayout::from_settings(settings)?;
    let options = LayoutOptions::from_settings(settings)?;
    let tip = source.tip().ok_or(GraphError::EmptySource)?;
    Ok(layout.rows(source, tip, Revision(0), &options)?)
}
