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
use crate::graph::GraphLine;
use crate::graph::GraphNode;
use crate::graph::GraphRow;
use crate::graph::ParentRevisions;
use crate::graph::Revision;
use crate::source::checked_parents;
use crate::source::validate_range;
use crate::source::RevisionSource;

/// Lays out every revision-to-parent edge of a log.
///
/// Revisions are visited from `start` down to `stop`. Each open head occupies
/// one column. When a head is visited, it is replaced in its column by those
/// of its parents that aren't open yet, so a linear chain of revisions stays
/// in one column:
///
/// ```text
/// 5        revs: [5]        next: [4]
/// |
/// 4        revs: [4]        next: [3, 2]
/// |\
/// 3 |      revs: [3, 2]     next: [1, 2]
/// | |
/// | 2      revs: [1, 2]     next: [1]
/// |/
/// 1        revs: [1]        next: [0]
/// |
/// 0        revs: [0]        next: []
/// ```
///
/// Revisions that are not the ancestor of an already-visited revision start a
/// new head. New heads can be hidden with `noheads` (only ancestors of `start`
/// are shown) or a branch filter (only revisions on that branch are shown,
/// and parents on other branches aren't followed).
///
/// The iterator is finite and can't be restarted. A parent link that isn't
/// older than its child is reported as an error, after which the iterator is
/// exhausted.
pub struct LinearGrapher<'a, S: ?Sized> {
    source: &'a S,
    start: Revision,
    stop: Revision,
    branch_filter: Option<String>,
    noheads: bool,
    branch_color: bool,
    /// Next revision to visit. `None` once the traversal is over.
    curr_rev: Option<Revision>,
    /// Open heads. The index of a head is its column.
    revs: Vec<Revision>,
    rev_color: HashMap<Revision, Color>,
    colors: ColorAllocator,
}

impl<'a, S> LinearGrapher<'a, S>
where
    S: RevisionSource + ?Sized,
{
    /// Creates a grapher visiting `start` down to `stop`, both inclusive.
    #[instrument(skip(source))]
    pub fn new(source: &'a S, start: Revision, stop: Revision) -> GraphResult<Self> {
        validate_range(start, stop, source.len())?;
        Ok(LinearGrapher {
            source,
            start,
            stop,
            branch_filter: None,
            noheads: false,
            branch_color: false,
            curr_rev: Some(start),
            revs: vec![],
            rev_color: HashMap::new(),
            colors: ColorAllocator::new(),
        })
    }

    /// Creates a grapher visiting the whole log, from the tip down to the
    /// root.
    pub fn from_tip(source: &'a S) -> GraphResult<Self> {
        let tip = source.tip().ok_or(GraphError::EmptySource)?;
        Self::new(source, tip, Revision(0))
    }

    /// Only shows revisions on the given branch.
    pub fn with_branch_filter(mut self, branch: impl Into<String>) -> Self {
        self.branch_filter = Some(branch.into());
        self
    }

    /// If set, revisions that aren't ancestors of the start revision are
    /// skipped.
    pub fn with_noheads(mut self, noheads: bool) -> Self {
        self.noheads = noheads;
        self
    }

    /// If set, revisions are colored by branch name instead of by head.
    pub fn with_branch_color(mut self, branch_color: bool) -> Self {
        self.branch_color = branch_color;
        self
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

    fn on_filtered_branch(&self, rev: Revision) -> bool {
        match &self.branch_filter {
            Some(branch) => self.source.branch(rev) == branch.as_str(),
            None => true,
        }
    }

    /// Parents used for layout. With a branch filter, parents on other
    /// branches are left out.
    fn layout_parents(&self, rev: Revision) -> GraphResult<ParentRevisions> {
        let mut parents = checked_parents(self.source, rev)?;
        if self.branch_filter.is_some() {
            parents.retain(|parent| self.on_filtered_branch(*parent));
        }
        Ok(parents)
    }

    fn new_color(&mut self, rev: Revision) -> Color {
        if self.branch_color {
            self.colors.branch_color(self.source.branch(rev))
        } else {
            self.colors.next_color()
        }
    }

    /// Opens a column for `head` and colors the first-parent chain below it.
    fn open_head(&mut self, head: Revision) -> GraphResult<()> {
        let color = self.new_color(head);
        tracing::debug!(%head, column = self.revs.len(), color, "opening head");
        self.revs.push(head);
        self.rev_color.insert(head, color);
        let mut rev = head;
        while let Some(&parent) = self.layout_parents(rev)?.first() {
            if parent < self.stop || self.rev_color.contains_key(&parent) {
                break;
            }
            let parent_color = if self.branch_color {
                self.colors.branch_color(self.source.branch(parent))
            } else {
                color
            };
            self.rev_color.insert(parent, parent_color);
            rev = parent;
        }
        Ok(())
    }

    fn layout_row(&mut self, curr_rev: Revision) -> GraphResult<GraphRow> {
        let column = self
            .revs
            .iter()
            .position(|rev| *rev == curr_rev)
            .expect("visited revision should be an open head");
        let parents = self.layout_parents(curr_rev)?;

        // Replace the current revision by its parents that aren't open yet.
        // The first of them inherits the current color.
        let mut preferred_color = Some(self.rev_color[&curr_rev]);
        let mut parents_to_add = ParentRevisions::new();
        for &parent in &parents {
            if self.revs.contains(&parent) || parents_to_add.contains(&parent) {
                continue;
            }
            parents_to_add.push(parent);
            let inherited = preferred_color.take();
            if !self.rev_color.contains_key(&parent) {
                let color = match inherited {
                    Some(color) if !self.branch_color => color,
                    _ => self.new_color(parent),
                };
                self.rev_color.insert(parent, color);
            }
        }
        let mut next_revs = self.revs.clone();
        next_revs.splice(column..column + 1, parents_to_add);
        debug_assert!(next_revs.iter().all_unique());

        let mut lines = vec![];
        for (i, &rev) in self.revs.iter().enumerate() {
            if rev == curr_rev {
                for &parent in &parents {
                    let to_column = position(&next_revs, parent);
                    let line = GraphLine::plain(i, to_column, self.rev_color[&parent]);
                    if !lines.contains(&line) {
                        lines.push(line);
                    }
                }
            } else if let Some(to_column) = next_revs.iter().position(|r| *r == rev) {
                lines.push(GraphLine::plain(i, to_column, self.rev_color[&rev]));
            }
        }

        let row = GraphRow {
            revision: curr_rev,
            node: GraphNode::new(column, self.rev_color[&curr_rev]),
            lines,
            parents: checked_parents(self.source, curr_rev)?,
        };
        tracing::trace!(rev = %curr_rev, column, width = next_revs.len(), "laid out row");
        self.revs = next_revs;
        Ok(row)
    }

    fn advance(&mut self, curr_rev: Revision) {
        self.curr_rev = curr_rev.prev().filter(|rev| *rev >= self.stop);
    }

    fn next_row(&mut self) -> GraphResult<Option<GraphRow>> {
        while let Some(curr_rev) = self.curr_rev {
            if !self.revs.contains(&curr_rev) {
                let hidden_head = self.noheads && curr_rev != self.start;
                if hidden_head || !self.on_filtered_branch(curr_rev) {
                    self.advance(curr_rev);
                    continue;
                }
                self.open_head(curr_rev)?;
            }
            let row = self.layout_row(curr_rev)?;
            self.advance(curr_rev);
            return Ok(Some(row));
        }
        Ok(None)
    }
}

fn position(revs: &[Revision], rev: Revision) -> usize {
    revs.iter()
        .position(|r| *r == rev)
        .expect("parent should have a column in the next row")
}

impl<S> Iterator for LinearGrapher<'_, S>
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

impl<S> FusedIterator for LinearGrapher<'_, S> where S: RevisionSource + ?Sized {}
