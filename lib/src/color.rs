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

//! Color assignment for graph nodes and lines.

use std::num::NonZeroUsize;

use blake2::Blake2b512;
use digest::Digest as _;

use crate::graph::Color;

/// Hands out colors for a single traversal.
///
/// Sequential colors start at 0 and are never reused. Branch colors are
/// derived from the branch name, so the same name always maps to the same
/// color. With a palette size set, both kinds are reduced modulo that size.
#[derive(Clone, Debug, Default)]
pub struct ColorAllocator {
    next: Color,
    palette_size: Option<NonZeroUsize>,
}

impl ColorAllocator {
    /// Creates an allocator with an unbounded palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits colors to `0..palette_size`.
    pub fn with_palette_size(mut self, palette_size: Option<NonZeroUsize>) -> Self {
        self.palette_size = palette_size;
        self
    }

    /// Returns a color no earlier call has returned (until the palette wraps
    /// around).
    pub fn next_color(&mut self) -> Color {
        let color = self.next;
        self.next += 1;
        self.wrap(color)
    }

    /// Returns the color for the branch named `branch`.
    pub fn branch_color(&self, branch: &str) -> Color {
        self.wrap(branch_name_hash(branch))
    }

    fn wrap(&self, color: Color) -> Color {
        match self.palette_size {
            Some(size) => color % size.get(),
            None => color,
        }
    }
}

fn branch_name_hash(branch: &str) -> Color {
    let digest = Blake2b512::digest(branch.as_bytes());
    let bytes = [digest[0], digest[1], digest[2], digest[3]];
    u32::from_le_bytes(bytes) as Color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_color_is_sequential() {
        let mut colors = ColorAllocator::new();
        assert_eq!(colors.next_color(), 0);
        assert_eq!(colors.next_color(), 1);
        assert_eq!(colors.next_color(), 2);
    }

    #[test]
    fn test_next_color_wraps_around_palette() {
        let mut colors = ColorAllocator::new().with_palette_size(NonZeroUsize::new(2));
        let seq: Vec<_> = (0..5).map(|_| colors.next_color()).collect();
        assert_eq!(seq, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_branch_color_is_deterministic() {
        let colors = ColorAllocator::new();
        assert_eq!(colors.branch_color("default"), colors.branch_color("default"));
        assert_eq!(
            ColorAllocator::new().branch_color("stable"),
            colors.branch_color("stable")
        );
        assert_ne!(colors.branch_color("default"), colors.branch_color("stable"));
    }

    #[test]
    fn test_branch_color_within_palette() {
        let colors = ColorAllocator::new().with_palette_size(NonZeroUsize::new(8));
        for name in ["default", "stable", "feature", ""] {
            assert!(colors.branch_color(name) < 8);
        }
    }
}
