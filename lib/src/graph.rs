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

//! Row types produced by the graphers.

#![allow(missing_docs)]

use std::fmt;

use smallvec::SmallVec;

/// Revision number in a repository's changelog (or in a file's own log).
///
/// Every parent of a revision has a strictly smaller number than the revision
/// itself.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Revision(pub u32);

impl Revision {
    /// Returns the underlying number.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the revision numbered one lower, or `None` at revision 0.
    pub fn prev(self) -> Option<Revision> {
        self.0.checked_sub(1).map(Revision)
    }

    fn as_usize(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    /// Returns true if the revision is a valid index into a log of `len`
    /// revisions.
    pub fn is_within(self, len: usize) -> bool {
        self.as_usize() < len
    }
}

impl From<u32> for Revision {
    fn from(value: u32) -> Self {
        Revision(value)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parents of a revision, in parent order. Never more than two.
pub type ParentRevisions = SmallVec<[Revision; 2]>;

/// Color index of a node or line. Mapping to an actual palette is up to the
/// renderer.
pub type Color = usize;

/// Where and how a revision's own marker is drawn within its row.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct GraphNode {
    pub column: usize,
    pub color: Color,
}

impl GraphNode {
    pub fn new(column: usize, color: Color) -> Self {
        GraphNode { column, color }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EdgeType {
    /// Connects a revision to a revision drawn in the next row of the same
    /// column chain.
    Plain,
    /// Upper half of a loose edge, as drawn below the row that opened it.
    LooseUpper,
    /// The edge skips intermediate revisions that are rendered elsewhere.
    LooseLower,
}

impl EdgeType {
    pub fn is_loose(self) -> bool {
        match self {
            EdgeType::Plain => false,
            EdgeType::LooseUpper | EdgeType::LooseLower => true,
        }
    }

    /// Returns the type the renderer should use when continuing this edge into
    /// the upper half of the next row.
    pub fn continuation(self) -> EdgeType {
        match self {
            EdgeType::Plain => EdgeType::Plain,
            EdgeType::LooseUpper | EdgeType::LooseLower => EdgeType::LooseUpper,
        }
    }
}

/// Line segment between a column of this row and a column of the next row.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GraphLine {
    pub from_column: usize,
    pub to_column: usize,
    pub color: Color,
    pub edge_type: EdgeType,
}

impl GraphLine {
    pub fn plain(from_column: usize, to_column: usize, color: Color) -> Self {
        GraphLine {
            from_column,
            to_column,
            color,
            edge_type: EdgeType::Plain,
        }
    }

    pub fn loose_lower(from_column: usize, to_column: usize, color: Color) -> Self {
        GraphLine {
            from_column,
            to_column,
            color,
            edge_type: EdgeType::LooseLower,
        }
    }
}

/// One unit of graph output: a revision, its marker, the lines leading to the
/// next row, and its parents.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphRow {
    pub revision: Revision,
    pub node: GraphNode,
    pub lines: Vec<GraphLine>,
    pub parents: ParentRevisions,
}

impl GraphRow {
    /// Returns the lines that start at the revision's own column.
    pub fn outgoing_lines(&self) -> impl Iterator<Item = &GraphLine> {
        let column = self.node.column;
        self.lines
            .iter()
            .filter(move |line| line.from_column == column)
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Row of a file history graph. `changeset` is the changelog revision that
/// introduced this file revision.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileGraphRow {
    pub row: GraphRow,
    pub changeset: Revision,
}
