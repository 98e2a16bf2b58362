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

//! Revision-graph layout engine.
//!
//! Every grapher in this crate walks revisions from a start revision down to a
//! stop revision and yields one [`graph::GraphRow`] per visited revision. A
//! row tells the renderer which column holds the revision, which color it is
//! drawn in, and which line segments connect it to the next row.

#![warn(missing_docs)]
#![deny(unused_must_use)]
#![forbid(unsafe_code)]

pub mod branch_grapher;
pub mod color;
pub mod error;
pub mod file_grapher;
pub mod filtered_log;
pub mod graph;
pub mod layout;
pub mod linear_grapher;
pub mod settings;
pub mod source;
pub mod time_util;
