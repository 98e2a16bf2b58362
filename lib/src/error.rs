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

//! Errors reported at the boundary between the graphers and the revision
//! store.

use thiserror::Error;

use crate::graph::Revision;

/// Error detected while setting up or running a graph traversal.
///
/// The layout algorithms themselves cannot fail. All of these indicate a bad
/// request from the caller or corrupt data from the revision store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The start revision is older than the stop revision.
    #[error("Start revision {start} is lower than stop revision {stop}")]
    InvalidRange {
        /// Requested start revision.
        start: Revision,
        /// Requested stop revision.
        stop: Revision,
    },
    /// A revision past the end of the log was requested.
    #[error("Revision {rev} is out of range (log has {len} revisions)")]
    RevisionOutOfRange {
        /// Requested revision.
        rev: Revision,
        /// Number of revisions in the log.
        len: usize,
    },
    /// The store reported a parent that isn't older than its child.
    #[error("Revision {rev} has invalid parent {parent}")]
    InvalidParent {
        /// Child revision.
        rev: Revision,
        /// Offending parent.
        parent: Revision,
    },
    /// The store reported more than two parents.
    #[error("Revision {rev} has {count} parents")]
    TooManyParents {
        /// Child revision.
        rev: Revision,
        /// Number of parents reported.
        count: usize,
    },
    /// There is no tip revision to start from.
    #[error("The log is empty")]
    EmptySource,
}

/// Result of a graph operation.
pub type GraphResult<T> = Result<T, GraphError>;
