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

use std::fs;
use std::path::Path;

use itertools::Itertools as _;
use revgraph_lib::error::GraphResult;
use revgraph_lib::graph::EdgeType;
use revgraph_lib::graph::GraphRow;
use revgraph_lib::graph::ParentRevisions;
use revgraph_lib::graph::Revision;
use revgraph_lib::source::CommitMetadata;
use revgraph_lib::source::CommitMetadataSource;
use revgraph_lib::source::FileLogSource;
use revgraph_lib::source::RevisionSource;

pub const DEFAULT_BRANCH: &str = "default";

#[derive(Clone, Debug)]
struct TestRevision {
    parents: ParentRevisions,
    branch: String,
    metadata: CommitMetadata,
    changeset: Revision,
}

/// In-memory log. Parent links are stored as given, without validation, so
/// tests can also build corrupt logs.
#[derive(Clone, Debug, Default)]
pub struct TestRevisionSource {
    revisions: Vec<TestRevision>,
}

impl TestRevisionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log on the default branch where revision `i` has parents
    /// `parents[i]`.
    pub fn from_parents(parents: &[&[u32]]) -> Self {
        let mut source = Self::new();
        for revision_parents in parents {
            let revision_parents = revision_parents.iter().copied().map(Revision).collect_vec();
            source.add(&revision_parents, DEFAULT_BRANCH);
        }
        source
    }

    /// Builds a chain `0 <- 1 <- ... <- len-1` on the default branch.
    pub fn linear(len: u32) -> Self {
        let mut source = Self::new();
        for i in 0..len {
            let parents = i.checked_sub(1).map(Revision).into_iter().collect_vec();
            source.add(&parents, DEFAULT_BRANCH);
        }
        source
    }

    pub fn add(&mut self, parents: &[Revision], branch: &str) -> Revision {
        let rev = self.next_revision();
        self.revisions.push(TestRevision {
            parents: parents.iter().copied().collect(),
            branch: branch.to_owned(),
            metadata: CommitMetadata::default(),
            changeset: rev,
        });
        rev
    }

    pub fn initial_revision(&mut self) -> Revision {
        self.add(&[], DEFAULT_BRANCH)
    }

    pub fn revision_with_parents(&mut self, parents: &[Revision]) -> Revision {
        self.add(parents, DEFAULT_BRANCH)
    }

    pub fn set_metadata(&mut self, rev: Revision, metadata: CommitMetadata) {
        self.entry_mut(rev).metadata = metadata;
    }

    /// Sets the changeset a file revision was introduced in. Defaults to the
    /// file revision's own number.
    pub fn set_changeset(&mut self, rev: Revision, changeset: Revision) {
        self.entry_mut(rev).changeset = changeset;
    }

    /// Returns `(revision, parents)` pairs, newest first.
    pub fn log_entries(&self) -> Vec<(Revision, ParentRevisions)> {
        (0..self.revisions.len())
            .rev()
            .map(|i| {
                let rev = Revision(i as u32);
                (rev, self.entry(rev).parents.clone())
            })
            .collect()
    }

    fn next_revision(&self) -> Revision {
        Revision(self.revisions.len() as u32)
    }

    fn entry(&self, rev: Revision) -> &TestRevision {
        &self.revisions[rev.value() as usize]
    }

    fn entry_mut(&mut self, rev: Revision) -> &mut TestRevision {
        &mut self.revisions[rev.value() as usize]
    }
}

impl RevisionSource for TestRevisionSource {
    fn parents(&self, rev: Revision) -> ParentRevisions {
        self.entry(rev).parents.clone()
    }

    fn branch(&self, rev: Revision) -> &str {
        &self.entry(rev).branch
    }

    fn len(&self) -> usize {
        self.revisions.len()
    }
}

impl FileLogSource for TestRevisionSource {
    fn changeset(&self, file_rev: Revision) -> Revision {
        self.entry(file_rev).changeset
    }
}

impl CommitMetadataSource for TestRevisionSource {
    fn metadata(&self, rev: Revision) -> CommitMetadata {
        self.entry(rev).metadata.clone()
    }
}

/// Collects rows, panicking on the first error.
pub fn collect_rows(rows: impl IntoIterator<Item = GraphResult<GraphRow>>) -> Vec<GraphRow> {
    rows.into_iter()
        .map(|row| row.unwrap())
        .collect()
}

/// Formats a row as `rev @column:color [parents] | from->to:color ...`.
/// A trailing `~` marks a loose line; `^` marks the upper half of one.
pub fn format_row(row: &GraphRow) -> String {
    let parents = row.parents.iter().join(",");
    let lines = row
        .lines
        .iter()
        .map(|line| {
            let marker = match line.edge_type {
                EdgeType::Plain => "",
                EdgeType::LooseLower => "~",
                EdgeType::LooseUpper => "^",
            };
            format!(
                "{}->{}:{}{marker}",
                line.from_column, line.to_column, line.color
            )
        })
        .join(" ");
    let node = format!(
        "{} @{}:{} [{parents}]",
        row.revision, row.node.column, row.node.color
    );
    if lines.is_empty() {
        node
    } else {
        format!("{node} | {lines}")
    }
}

/// Formats rows one per line, suitable for snapshots.
pub fn format_rows<'a>(rows: impl IntoIterator<Item = &'a GraphRow>) -> String {
    rows.into_iter().map(format_row).join("\n")
}

/// Asserts that every test file next to `runner.rs` is declared as a module in
/// it.
pub fn assert_no_forgotten_test_files(test_dir: &Path) {
    let runner_path = test_dir.join("runner.rs");
    let runner = fs::read_to_string(&runner_path).unwrap();
    let entries = fs::read_dir(test_dir).unwrap();
    for entry in entries {
        let path = entry.unwrap().path();
        if let Some(ext) = path.extension() {
            let name = path.file_stem().unwrap();
            if ext == "rs" && name != "runner" {
                let search = format!("mod {};", name.to_str().unwrap());
                assert!(
                    runner.contains(&search),
                    "missing `{search}` declaration in {}",
                    runner_path.display()
                );
            }
        }
    }
}
