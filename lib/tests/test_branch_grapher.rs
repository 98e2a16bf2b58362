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

use assert_matches::assert_matches;
use itertools::Itertools as _;
use revgraph_lib::branch_grapher::BranchGrapher;
use revgraph_lib::error::GraphError;
use revgraph_lib::graph::EdgeType;
use revgraph_lib::graph::Revision;
use test_case::test_case;
use testutils::collect_rows;
use testutils::format_rows;
use testutils::TestRevisionSource;

fn rev(n: u32) -> Revision {
    Revision(n)
}

#[test]
fn test_linear_chain_uses_one_column() {
    let source = TestRevisionSource::linear(5);
    let mut grapher = BranchGrapher::new(&source, rev(4), rev(0)).unwrap();
    let mut rows = vec![];
    while let Some(row) = grapher.next() {
        rows.push(row.unwrap());
        assert!(grapher.width() <= 1);
    }
    insta::assert_snapshot!(format_rows(&rows), @r###"
    4 @0:0 [3] | 0->0:0
    3 @0:0 [2] | 0->0:0
    2 @0:0 [1] | 0->0:0
    1 @0:0 [0] | 0->0:0
    0 @0:0 []
    "###);
    assert_eq!(grapher.width(), 0);
}

#[test]
fn test_merge() {
    // 3
    // |\
    // 1 2
    // |/
    // 0
    //
    // 1 and 0 are on the first-parent chain of 3. The edge from 2 to 0 skips
    // over 1, which is drawn in that column in between.
    let source = TestRevisionSource::from_parents(&[&[], &[0], &[0], &[1, 2]]);
    let rows = collect_rows(BranchGrapher::from_tip(&source).unwrap());
    insta::assert_snapshot!(format_rows(&rows), @r###"
    3 @0:0 [1,2] | 0->0:0 0->1:1
    2 @1:1 [0] | 0->0:0 1->0:0~
    1 @0:0 [0] | 0->0:0
    0 @0:0 []
    "###);
}

#[test]
fn test_fork() {
    // 3
    // | 2
    // |/
    // 1
    // |
    // 0
    let source = TestRevisionSource::from_parents(&[&[], &[0], &[1], &[1]]);
    let rows = collect_rows(BranchGrapher::from_tip(&source).unwrap());
    insta::assert_snapshot!(format_rows(&rows), @r###"
    3 @0:0 [1] | 0->0:0
    2 @1:1 [1] | 0->0:0 1->0:0
    1 @0:0 [0] | 0->0:0
    0 @0:0 []
    "###);
}

#[test]
fn test_parents_sharing_column_get_one_line() {
    // 4
    // |\
    // 3 |
    // | |
    // 2 |
    // |/
    // 1
    // |
    // 0
    //
    // 3 and 1 are both on the branch of 4, so both edges land in column 0.
    let source = TestRevisionSource::from_parents(&[&[], &[0], &[1], &[2], &[3, 1]]);
    let rows = collect_rows(BranchGrapher::from_tip(&source).unwrap());
    insta::assert_snapshot!(format_rows(&rows), @r###"
    4 @0:0 [3,1] | 0->0:0
    3 @0:0 [2] | 0->0:0
    2 @0:0 [1] | 0->0:0
    1 @0:0 [0] | 0->0:0
    0 @0:0 []
    "###);
    let edge_types = rows[0].outgoing_lines().map(|line| line.edge_type).collect_vec();
    assert_eq!(edge_types, vec![EdgeType::Plain]);
}

#[test]
fn test_parent_below_stop_keeps_column() {
    let source = TestRevisionSource::linear(5);
    let rows = collect_rows(BranchGrapher::new(&source, rev(4), rev(2)).unwrap());
    insta::assert_snapshot!(format_rows(&rows), @r###"
    4 @0:0 [3] | 0->0:0
    3 @0:0 [2] | 0->0:0
    2 @0:0 [1] | 0->0:1
    "###);
}

#[test_case(&[&[], &[0], &[1], &[2]] ; "chain")]
#[test_case(&[&[], &[0], &[0], &[1, 2]] ; "diamond")]
#[test_case(&[&[], &[0], &[1], &[1], &[2, 3], &[], &[4, 5], &[6], &[3], &[7, 8]] ; "criss-cross")]
#[test_case(&[&[], &[], &[], &[0, 1], &[1, 2], &[3, 4]] ; "many roots")]
#[test_case(&[&[], &[0], &[1], &[2], &[3, 1]] ; "parents in one column")]
fn test_visits_every_revision(parents: &[&[u32]]) {
    let source = TestRevisionSource::from_parents(parents);
    let rows = collect_rows(BranchGrapher::from_tip(&source).unwrap());
    let revisions = rows.iter().map(|row| row.revision.value()).collect_vec();
    let expected = (0..parents.len() as u32).rev().collect_vec();
    assert_eq!(revisions, expected);

    for row in &rows {
        // One line per distinct target column
        let targets = row.outgoing_lines().map(|line| line.to_column).collect_vec();
        assert!(targets.iter().all_unique(), "row {}", row.revision);
        assert!(targets.len() <= row.parents.len(), "row {}", row.revision);
        assert_eq!(targets.is_empty(), row.parents.is_empty(), "row {}", row.revision);
    }
}

#[test]
fn test_roots_close_their_column() {
    let source = TestRevisionSource::from_parents(&[&[], &[], &[], &[0, 1], &[1, 2], &[3, 4]]);
    let mut grapher = BranchGrapher::from_tip(&source).unwrap();
    let mut rows = vec![];
    let mut widths = vec![];
    while let Some(row) = grapher.next() {
        rows.push(row.unwrap());
        widths.push(grapher.width());
    }
    insta::assert_snapshot!(format_rows(&rows), @r###"
    5 @0:0 [3,4] | 0->0:0 0->1:1
    4 @1:1 [1,2] | 0->0:0 1->1:1 1->2:2
    3 @0:0 [0,1] | 0->0:0 0->1:1 1->1:1 2->2:2
    2 @2:2 [] | 0->0:0 1->1:1
    1 @1:1 [] | 0->0:0
    0 @0:0 []
    "###);
    assert_eq!(widths, vec![2, 3, 3, 2, 1, 0]);
}

#[test]
fn test_colors_are_per_branch() {
    let source = TestRevisionSource::from_parents(&[&[], &[0], &[0], &[1, 2], &[3]]);
    let rows = collect_rows(BranchGrapher::from_tip(&source).unwrap());
    let color_of = |r: u32| rows.iter().find(|row| row.revision == rev(r)).unwrap().node.color;
    // 4, 3, 1, 0 form one first-parent chain
    assert_eq!(color_of(4), color_of(3));
    assert_eq!(color_of(3), color_of(1));
    assert_eq!(color_of(1), color_of(0));
    assert_ne!(color_of(2), color_of(0));
}

#[test]
fn test_invalid_parent_ends_iteration() {
    let mut source = TestRevisionSource::new();
    source.initial_revision();
    source.revision_with_parents(&[rev(1)]);

    let mut grapher = BranchGrapher::from_tip(&source).unwrap();
    assert_matches!(
        grapher.next(),
        Some(Err(GraphError::InvalidParent { rev: r, parent: p })) if r == rev(1) && p == rev(1)
    );
    assert_eq!(grapher.next(), None);
}
