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

//! Filtering of an externally ordered log.

use std::iter::FusedIterator;

use itertools::Itertools as _;

use crate::error::GraphResult;
use crate::graph::GraphNode;
use crate::graph::GraphRow;
use crate::graph::ParentRevisions;
use crate::graph::Revision;
use crate::source::validate_parents;
use crate::source::CommitMetadata;
use crate::source::CommitMetadataSource;
use crate::time_util::DateRange;

/// Which revisions to keep based on their number of parents.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MergeFilter {
    /// Keep every revision.
    #[default]
    All,
    /// Drop merge revisions.
    NoMerges,
    /// Keep only merge revisions.
    OnlyMerges,
}

impl MergeFilter {
    /// Determines whether a revision with `parent_count` parents is kept.
    pub fn matches(self, parent_count: usize) -> bool {
        match self {
            MergeFilter::All => true,
            MergeFilter::NoMerges => parent_count < 2,
            MergeFilter::OnlyMerges => parent_count >= 2,
        }
    }
}

/// Set of conditions a revision must satisfy to be shown. Inactive conditions
/// match everything.
#[derive(Clone, Debug, Default)]
pub struct LogFilter {
    /// Lowercased keywords. Any of them may match.
    keywords: Vec<String>,
    date_range: Option<DateRange>,
    merges: MergeFilter,
}

impl LogFilter {
    /// Creates a filter that keeps every revision.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps revisions whose description, user, or changed files contain any
    /// of `keywords`, ignoring case.
    pub fn with_keywords<K: AsRef<str>>(mut self, keywords: impl IntoIterator<Item = K>) -> Self {
        self.keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Keeps revisions committed within `date_range`.
    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = Some(date_range);
        self
    }

    /// Keeps revisions by number of parents.
    pub fn with_merge_filter(mut self, merges: MergeFilter) -> Self {
        self.merges = merges;
        self
    }

    /// Returns true if matching needs the commit metadata.
    pub fn needs_metadata(&self) -> bool {
        !self.keywords.is_empty() || self.date_range.is_some()
    }

    fn matches_keywords(&self, metadata: &CommitMetadata) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let haystack = [
            metadata.description.as_str(),
            metadata.user.as_str(),
            metadata.files.iter().join(" ").as_str(),
        ]
        .join(" ")
        .to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| haystack.contains(keyword.as_str()))
    }

    fn matches_date(&self, metadata: &CommitMetadata) -> bool {
        match &self.date_range {
            Some(date_range) => date_range.matches(&metadata.date),
            None => true,
        }
    }

    /// Determines whether a revision with the given parents and metadata is
    /// kept.
    pub fn matches(&self, parents: &[Revision], metadata: Option<&CommitMetadata>) -> bool {
        if !self.merges.matches(parents.len()) {
            return false;
        }
        match metadata {
            Some(metadata) => self.matches_keywords(metadata) && self.matches_date(metadata),
            None => !self.needs_metadata(),
        }
    }
}

/// Applies a [`LogFilter`] to an ordered sequence of revisions.
///
/// The order of the input is kept. Rows are emitted with a placeholder node at
/// column 0, color 0, and no lines; laying them out is left to the consumer.
pub struct FilteredLogGrapher<'a, I, M: ?Sized> {
    input: I,
    metadata: &'a M,
    filter: LogFilter,
    done: bool,
}

impl<'a, I, M> FilteredLogGrapher<'a, I, M>
where
    I: Iterator<Item = (Revision, ParentRevisions)>,
    M: CommitMetadataSource + ?Sized,
{
    /// Wraps `input`, looking up commit information in `metadata` when the
    /// filter needs it.
    pub fn new(input: I, metadata: &'a M, filter: LogFilter) -> Self {
        FilteredLogGrapher {
            input,
            metadata,
            filter,
            done: false,
        }
    }

    fn keep(&self, rev: Revision, parents: &[Revision]) -> bool {
        if self.filter.needs_metadata() {
            let metadata = self.metadata.metadata(rev);
            self.filter.matches(parents, Some(&metadata))
        } else {
            self.filter.matches(parents, None)
        }
    }

    fn next_row(&mut self) -> GraphResult<Option<GraphRow>> {
        while let Some((rev, parents)) = self.input.next() {
            validate_parents(rev, &parents)?;
            if !self.keep(rev, &parents) {
                tracing::trace!(%rev, "filtered out");
                continue;
            }
            return Ok(Some(GraphRow {
                revision: rev,
                node: GraphNode::default(),
                lines: vec![],
                parents,
            }));
        }
        Ok(None)
    }
}

impl<I, M> Iterator for FilteredLogGrapher<'_, I, M>
where
    I: Iterator<Item = (Revision, ParentRevisions)>,
    M: CommitMetadataSource + ?Sized,
{
    type Item = GraphResult<GraphRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<I, M> FusedIterator for FilteredLogGrapher<'_, I, M>
where
    I: Iterator<Item = (Revision, ParentRevisions)>,
    M: CommitMetadataSource + ?Sized,
{
}
