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

use std::collections::HashMap;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use itertools::Itertools as _;
use tracing::instrument;

use crate::color::ColorAllocator;
use crate::error::GraphError;
use crate::error::GraphResult;
use crate::graph::Color;
use crate::graph::EdgeType;
use crate::graph::GraphLine;
use crate::graph::GraphNode;
use crate::graph::GraphRow;
use crate::graph::Revision;
use crate::source::checked_parents;
use crate::source::validate_range;
use crate::source::RevisionSource;

/// Lays out a log with one column per branch.
///
/// A branch here is a first-parent chain, identified by its newest revision
/// (the head where its column was opened). The chain is discovered lazily
/// when its head is first seen, and it spans every revision reachable by
/// first parents until the walk leaves the visited range or runs into a
/// revision that already belongs to another branch. The oldest revision of
/// the chain is its tail; the column is closed after the tail is visited.
///
/// Every revision in the range gets a row. An edge from a revision to a
/// parent that isn't the next scheduled revision of the parent's branch
/// skips revisions drawn in that column in between, and is marked
/// [`EdgeType::LooseLower`].
pub struct BranchGrapher<'a, S: ?Sized> {
    source: &'a S,
    start: Revision,
    stop: Revision,
    curr_rev: Option<Revision>,
    /// Branch (head revision) each classified revision belongs to.
    branch4rev: HashMap<Revision, Revision>,
    /// First parent of each classified revision.
    parent_of: HashMap<Revision, Revision>,
    /// Oldest revision of each branch within the visited range.
    branch_tail: HashMap<Revision, Revision>,
    /// Next revision to be visited on each branch.
    next_in_branch: HashMap<Revision, Revision>,
    color4branch: HashMap<Revision, Color>,
    /// Open branches. The index of a branch is its column.
    curr_branches: Vec<Revision>,
    colors: ColorAllocator,
}

impl<'a, S> BranchGrapher<'a, S>
where
    S: RevisionSource + ?Sized,
{
    /// Creates a grapher visiting `start` down to `stop`, both inclusive.
    #[instrument(skip(source))]
    pub fn new(source: &'a S, start: Revision, stop: Revision) -> GraphResult<Self> {
        validate_range(start, stop, source.len())?;
        Ok(BranchGrapher {
            source,
            start,
            stop,
            curr_rev: Some(start),
            branch4rev: HashMap::new(),
            parent_of: HashMap::new(),
            branch_tail: HashMap::new(),
            next_in_branch: HashMap::new(),
            color4branch: HashMap::new(),
            curr_branches: vec![],
            colors: ColorAllocator::new(),
        })
    }

    pub fn from_tip(source: &'a S) -> GraphResult<Self> {
        let tip = source.tip().ok_or(GraphError::EmptySource)?;
        Self::new(source, tip, Revision(0))
    }

    pub fn with_palette_size(mut self, palette_size: Option<NonZeroUsize>) -> Self {
        self.colors = self.colors.with_palette_size(palette_size);
        self
    }

    pub fn start(&self) -> Revision {
        self.start
    }

    pub fn stop(&self) -> Revision {
        self.stop
    }

    /// Number of open branch columns after the last emitted row.
    pub fn width(&self) -> usize {
        self.curr_branches.len()
    }

    /// Classifies the first-parent chain starting at `head` as a new branch.
    ///
    /// A head below the visited range is a parent of a visited revision. It
    /// becomes a one-revision branch whose column is never closed.
    fn new_branch(&mut self, head: Revision) -> GraphResult<()> {
        let mut rev = head;
        loop {
            self.branch4rev.insert(rev, head);
            self.branch_tail.insert(head, rev);
            if rev < self.stop {
                break;
            }
            let Some(&parent) = checked_parents(self.source, rev)?.first() else {
                break;
            };
            self.parent_of.insert(rev, parent);
            if parent < self.stop || self.branch4rev.contains_key(&parent) {
                break;
            }
            rev = parent;
        }
        let color = self.colors.next_color();
        tracing::debug!(%head, tail = %rev, color, "new branch");
        self.color4branch.insert(head, color);
        self.next_in_branch.insert(head, head);
        Ok(())
    }

    fn branch_of(&mut self, rev: Revision) -> GraphResult<Revision> {
        if let Some(&branch) = self.branch4rev.get(&rev) {
            return Ok(branch);
        }
        self.new_branch(rev)?;
        Ok(rev)
    }

    fn layout_row(&mut self, curr_rev: Revision) -> GraphResult<GraphRow> {
        let branch = self.branch_of(curr_rev)?;
        if !self.curr_branches.contains(&branch) {
            self.curr_branches.push(branch);
        }
        let column = position(&self.curr_branches, branch);
        let parents = checked_parents(self.source, curr_rev)?;

        let mut next_branches = self.curr_branches.clone();
        let mut insert_at = column + 1;
        if self.branch_tail[&branch] == curr_rev {
            tracing::debug!(%branch, column, "closing branch");
            next_branches.remove(column);
            insert_at = column;
        }
        for &parent in &parents {
            let parent_branch = self.branch_of(parent)?;
            if !next_branches.contains(&parent_branch) {
                next_branches.insert(insert_at, parent_branch);
                insert_at += 1;
            }
        }
        debug_assert!(next_branches.iter().all_unique());

        if let Some(&parent) = self.parent_of.get(&curr_rev) {
            self.next_in_branch.insert(branch, parent);
        }

        let mut lines = vec![];
        for (i, &open_branch) in self.curr_branches.iter().enumerate() {
            if i == column {
                for &parent in &parents {
                    let parent_branch = self.branch4rev[&parent];
                    let to_column = position(&next_branches, parent_branch);
                    let color = self.color4branch[&parent_branch];
                    let line = if self.next_in_branch.get(&parent_branch) == Some(&parent) {
                        GraphLine::plain(i, to_column, color)
                    } else {
                        GraphLine::loose_lower(i, to_column, color)
                    };
                    // Parents sharing a column get one line, plain if either
                    // edge is.
                    match lines.iter_mut().find(|l: &&mut GraphLine| {
                        l.from_column == line.from_column && l.to_column == line.to_column
                    }) {
                        Some(existing) if line.edge_type == EdgeType::Plain => *existing = line,
                        Some(_) => {}
                        None => lines.push(line),
                    }
                }
            } else if let Some(to_column) = next_branches.iter().position(|b| *b == open_branch) {
                lines.push(GraphLine::plain(
                    i,
                    to_column,
                    self.color4branch[&open_branch],
                ));
            }
        }

        let row = GraphRow {
            revision: curr_rev,
            node: GraphNode::new(column, self.color4branch[&branch]),
            lines,
            parents,
        };
        tracing::trace!(rev = %curr_rev, column, width = next_branches.len(), "laid out row");
        self.curr_branches = next_branches;
        Ok(row)
    }

    fn next_row(&mut self) -> GraphResult<Option<GraphRow>> {
        let Some(curr_rev) = self.curr_rev else {
            return Ok(None);
        };
        let row = self.layout_row(curr_rev)?;
        self.curr_rev = curr_rev.prev().filter(|rev| *rev >= self.stop);
        Ok(Some(row))
    }
}

fn position(branches: &[Revision], branch: Revision) -> usize {
    branches
        .iter()
        .position(|b| *b == branch)
        .expect("branch should have a column")
}

impl<S> Iterator for BranchGrapher<'_, S>
where
    S: RevisionSource + ?Sized,
{
    type Item = GraphResult<GraphRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_row() {
            Ok(row) => row.map(Ok),
            Err(err) => {
                self.curr_rev = None;
                Some(Err(err))
            }
        }
    }
}

impl<S> FusedIterator for BranchGrapher<'_, S> where S: RevisionSource + ?Sized {}
