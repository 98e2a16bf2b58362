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

//! Graph of a single file's history.

use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use crate::error::GraphResult;
use crate::graph::FileGraphRow;
use crate::graph::Revision;
use crate::linear_grapher::LinearGrapher;
use crate::source::FileLogSource;

/// Lays out a file log the same way [`LinearGrapher`] lays out the changelog.
///
/// Revisions are file revisions and parents are earlier revisions of the same
/// file. Each row also carries the changeset that introduced the file
/// revision.
pub struct FileHistoryGrapher<'a, S: ?Sized> {
    source: &'a S,
    inner: LinearGrapher<'a, S>,
}

impl<'a, S> FileHistoryGrapher<'a, S>
where
    S: FileLogSource + ?Sized,
{
    /// Creates a grapher visiting file revisions `start` down to `stop`.
    pub fn new(source: &'a S, start: Revision, stop: Revision) -> GraphResult<Self> {
        let inner = LinearGrapher::new(source, start, stop)?;
        Ok(FileHistoryGrapher { source, inner })
    }

    /// Creates a grapher visiting every revision of the file.
    pub fn from_tip(source: &'a S) -> GraphResult<Self> {
        let inner = LinearGrapher::from_tip(source)?;
        Ok(FileHistoryGrapher { source, inner })
    }

    /// Limits colors to `0..palette_size`.
    pub fn with_palette_size(mut self, palette_size: Option<NonZeroUsize>) -> Self {
        self.inner = self.inner.with_palette_size(palette_size);
        self
    }
}

impl<S> Iterator for FileHistoryGrapher<'_, S>
where
    S: FileLogSource + ?Sized,
{
    type Item = GraphResult<FileGraphRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.inner.next()? {
            Ok(row) => row,
            Err(err) => return Some(Err(err)),
        };
        let changeset = self.source.changeset(row.revision);
        Some(Ok(FileGraphRow { row, changeset }))
    }
}

impl<S> FusedIterator for FileHistoryGrapher<'_, S> where S: FileLogSource + ?Sized {}
