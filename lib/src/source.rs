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

//! Interfaces to the revision store consumed by the graphers.
//!
//! The store is expected to be an in-memory index, so every lookup is
//! synchronous and cheap. Parent links are validated here, once, before any
//! grapher uses them.

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::TimeZone;

use crate::error::GraphError;
use crate::error::GraphResult;
use crate::graph::ParentRevisions;
use crate::graph::Revision;

/// Read-only access to the parent links and branch labels of a log.
pub trait RevisionSource {
    /// Returns the parents of `rev` in parent order. Root revisions have no
    /// parents.
    fn parents(&self, rev: Revision) -> ParentRevisions;

    /// Returns the name of the branch `rev` was committed on.
    fn branch(&self, rev: Revision) -> &str;

    /// Returns the number of revisions in the log.
    fn len(&self) -> usize;

    /// Returns true if the log has no revisions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the newest revision, if any.
    fn tip(&self) -> Option<Revision> {
        let len = u32::try_from(self.len()).ok()?;
        len.checked_sub(1).map(Revision)
    }
}

/// Log of a single file. Its revisions form their own numbering, independent
/// of the changelog.
pub trait FileLogSource: RevisionSource {
    /// Returns the changelog revision that introduced the file revision
    /// `file_rev`.
    fn changeset(&self, file_rev: Revision) -> Revision;
}

/// Milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MillisSinceEpoch(pub i64);

/// Commit time with the committer's timezone.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Timestamp {
    /// Instant of the commit.
    pub timestamp: MillisSinceEpoch,
    /// Time zone offset in minutes
    pub tz_offset: i32,
}

impl Timestamp {
    /// Creates a timestamp in UTC.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp {
            timestamp: MillisSinceEpoch(millis),
            tz_offset: 0,
        }
    }

    /// Creates a timestamp keeping the offset of `datetime`.
    pub fn from_datetime<Tz: TimeZone<Offset = FixedOffset>>(datetime: DateTime<Tz>) -> Self {
        Timestamp {
            timestamp: MillisSinceEpoch(datetime.timestamp_millis()),
            tz_offset: datetime.offset().local_minus_utc() / 60,
        }
    }
}

/// Commit information the log filters match against.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommitMetadata {
    /// Full commit message.
    pub description: String,
    /// Committer, usually `Name <email>`.
    pub user: String,
    /// Paths changed by the commit.
    pub files: Vec<String>,
    /// Commit time.
    pub date: Timestamp,
}

/// Read-only access to commit information.
pub trait CommitMetadataSource {
    /// Returns the metadata of the changelog revision `rev`.
    fn metadata(&self, rev: Revision) -> CommitMetadata;
}

/// Checks that `parents` is a valid parent list for `rev`.
pub fn validate_parents(rev: Revision, parents: &[Revision]) -> GraphResult<()> {
    if parents.len() > 2 {
        return Err(GraphError::TooManyParents {
            rev,
            count: parents.len(),
        });
    }
    match parents.iter().find(|&&parent| parent >= rev) {
        Some(&parent) => Err(GraphError::InvalidParent { rev, parent }),
        None => Ok(()),
    }
}

/// Looks up the parents of `rev` and validates them.
pub fn checked_parents<S>(source: &S, rev: Revision) -> GraphResult<ParentRevisions>
where
    S: RevisionSource + ?Sized,
{
    let parents = source.parents(rev);
    validate_parents(rev, &parents)?;
    Ok(parents)
}

/// Checks a `[stop, start]` range against a source of `len` revisions.
pub fn validate_range(start: Revision, stop: Revision, len: usize) -> GraphResult<()> {
    if start < stop {
        return Err(GraphError::InvalidRange { start, stop });
    }
    if !start.is_within(len) {
        return Err(GraphError::RevisionOutOfRange { rev: start, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_validate_parents() {
        assert_eq!(validate_parents(Revision(0), &[]), Ok(()));
        assert_eq!(validate_parents(Revision(3), &[Revision(1), Revision(2)]), Ok(()));
        assert_eq!(
            validate_parents(Revision(3), &[Revision(1), Revision(3)]),
            Err(GraphError::InvalidParent {
                rev: Revision(3),
                parent: Revision(3),
            })
        );
        assert_eq!(
            validate_parents(Revision(3), &[Revision(7)]),
            Err(GraphError::InvalidParent {
                rev: Revision(3),
                parent: Revision(7),
            })
        );
        assert_matches!(
            validate_parents(Revision(5), &[Revision(1), Revision(2), Revision(3)]),
            Err(GraphError::TooManyParents { count: 3, .. })
        );
    }

    #[test]
    fn test_timestamp_from_datetime() {
        let datetime = DateTime::parse_from_rfc3339("2023-03-25T01:30:00+09:00").unwrap();
        let timestamp = Timestamp::from_datetime(datetime);
        assert_eq!(timestamp.tz_offset, 540);
        assert_eq!(
            timestamp.timestamp,
            MillisSinceEpoch(datetime.timestamp_millis())
        );
        let utc = DateTime::parse_from_rfc3339("2023-03-24T16:30:00Z").unwrap();
        assert_eq!(timestamp.timestamp, Timestamp::from_datetime(utc).timestamp);
        assert_eq!(Timestamp::from_datetime(utc).tz_offset, 0);
    }

    #[test]
    fn test_validate_range() {
        assert_eq!(validate_range(Revision(2), Revision(0), 3), Ok(()));
        assert_eq!(validate_range(Revision(2), Revision(2), 3), Ok(()));
        assert_matches!(
            validate_range(Revision(1), Revision(2), 3),
            Err(GraphError::InvalidRange { .. })
        );
        assert_matches!(
            validate_range(Revision(3), Revision(0), 3),
            Err(GraphError::RevisionOutOfRange { len: 3, .. })
        );
    }
}
