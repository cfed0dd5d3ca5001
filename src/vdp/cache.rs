// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Preallocated tilemaps for every page geometry and pattern size.

use super::registers::PatternSize;
use crate::gfx::GfxSet;
use crate::tilemap::Tilemap;

/// Page dimensions in tiles, by cache index.
const GEOMETRIES: [(u32, u32); 3] = [(32, 32), (64, 32), (32, 64)];

/// One tilemap per (geometry, pattern size) for each plane.
pub struct TilemapCache {
    plane_a: Vec<Tilemap>,
    plane_b: Vec<Tilemap>,
    active: usize,
}

impl TilemapCache {
    pub fn new() -> Self {
        let build = || {
            [GfxSet::Pts8x8x4, GfxSet::Pts16x16x4]
                .into_iter()
                .flat_map(|set| GEOMETRIES.iter().map(move |&(cols, rows)| Tilemap::new(set, cols, rows)))
                .collect::<Vec<_>>()
        };
        Self {
            plane_a: build(),
            plane_b: build(),
            active: 0,
        }
    }

    /// Make the pair for `geometry` (0..=2) and `pattern_size` active.
    /// Anything larger than 8x8 uses the 16x16 maps.
    pub fn select(&mut self, geometry: usize, pattern_size: PatternSize) {
        let large = pattern_size != PatternSize::Pts8x8;
        self.active = large as usize * GEOMETRIES.len() + geometry.min(GEOMETRIES.len() - 1);
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Active (A, B) tilemaps.
    pub fn pair_mut(&mut self) -> (&mut Tilemap, &mut Tilemap) {
        (&mut self.plane_a[self.active], &mut self.plane_b[self.active])
    }
}

impl Default for TilemapCache {
    fn default() -> Self {
        Self::new()
    }
}
