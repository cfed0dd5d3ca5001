// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scrollable tile layer with a lazily refreshed tile cache.
//!
//! Tiles are fetched through a caller-supplied resolver the first time they
//! are drawn after being marked dirty. Scrolling follows the usual raster
//! convention: one global horizontal scroll and one vertical scroll per
//! column band.

use bitvec::prelude::*;

use crate::core::{Bitmap, Rect};
use crate::gfx::{GfxRom, GfxSet};

/// What to draw in one tile cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileInfo {
    pub set: GfxSet,
    pub code: u32,
    pub color: u8,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl TileInfo {
    pub const fn blank(set: GfxSet) -> Self {
        Self {
            set,
            code: 0,
            color: 0,
            flip_x: false,
            flip_y: false,
        }
    }
}

/// Affine sampling parameters in 16.16 fixed point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affine {
    pub start_x: i32,
    pub start_y: i32,
    pub inc_xx: i32,
    pub inc_xy: i32,
    pub inc_yx: i32,
    pub inc_yy: i32,
}

pub struct Tilemap {
    tile_size: u32,
    cols: u32,
    rows: u32,
    tiles: Vec<TileInfo>,
    dirty: BitVec,
    col_scroll: Vec<i32>,
    scroll_x: i32,
    transparent_pen: Option<u8>,
    enabled: bool,
}

impl Tilemap {
    pub fn new(set: GfxSet, cols: u32, rows: u32) -> Self {
        let count = (cols * rows) as usize;
        Self {
            tile_size: set.size(),
            cols,
            rows,
            tiles: vec![TileInfo::blank(set); count],
            dirty: bitvec![1; count],
            col_scroll: vec![0],
            scroll_x: 0,
            transparent_pen: None,
            enabled: true,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn width(&self) -> i32 {
        (self.cols * self.tile_size) as i32
    }

    pub fn height(&self) -> i32 {
        (self.rows * self.tile_size) as i32
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.count_ones()
    }

    pub fn set_transparent_pen(&mut self, pen: u8) {
        self.transparent_pen = Some(pen);
    }

    /// Split the layer into `count` equal column bands for vertical scroll.
    pub fn set_scroll_cols(&mut self, count: u32) {
        self.col_scroll.resize(count.max(1) as usize, 0);
    }

    pub fn scroll_cols(&self) -> usize {
        self.col_scroll.len()
    }

    pub fn set_scrolly(&mut self, col: usize, value: i32) {
        if let Some(slot) = self.col_scroll.get_mut(col) {
            *slot = value;
        }
    }

    pub fn scrolly(&self, col: usize) -> i32 {
        self.col_scroll.get(col).copied().unwrap_or(0)
    }

    pub fn set_scrollx(&mut self, value: i32) {
        self.scroll_x = value;
    }

    pub fn scrollx(&self) -> i32 {
        self.scroll_x
    }

    pub fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Re-fetch every dirty tile.
    pub fn refresh(&mut self, resolve: &mut dyn FnMut(u32, u32) -> TileInfo) {
        for index in self.dirty.iter_ones() {
            let row = index as u32 / self.cols;
            let col = index as u32 % self.cols;
            self.tiles[index] = resolve(row, col);
        }
        self.dirty.fill(false);
    }

    /// Pen at layer pixel (`px`, `py`), or `None` if transparent.
    fn sample(&self, gfx: &GfxRom, px: i32, py: i32) -> Option<u16> {
        let size = self.tile_size as i32;
        let (col, row) = (px / size, py / size);
        let info = &self.tiles[(row as u32 * self.cols + col as u32) as usize];
        let mut tx = (px % size) as u32;
        let mut ty = (py % size) as u32;
        if info.flip_x {
            tx = self.tile_size - 1 - tx;
        }
        if info.flip_y {
            ty = self.tile_size - 1 - ty;
        }
        let pixel = gfx.pixel(info.set, info.code, tx, ty);
        if self.transparent_pen == Some(pixel) {
            return None;
        }
        Some(info.color as u16 * info.set.granularity() + pixel as u16)
    }

    /// Scrolled draw into `bitmap`.
    pub fn draw(
        &mut self,
        gfx: &GfxRom,
        bitmap: &mut Bitmap,
        clip: &Rect,
        resolve: &mut dyn FnMut(u32, u32) -> TileInfo,
    ) {
        if !self.enabled {
            return;
        }
        self.refresh(resolve);
        let clip = clip.intersect(&bitmap.bounds());
        if clip.is_empty() {
            return;
        }
        let (width, height) = (self.width(), self.height());
        let band = (width / self.col_scroll.len() as i32).max(1);
        for y in clip.min_y..=clip.max_y {
            for x in clip.min_x..=clip.max_x {
                let px = (x + self.scroll_x).rem_euclid(width);
                let scroll_y = self.col_scroll[(px / band) as usize % self.col_scroll.len()];
                let py = (y + scroll_y).rem_euclid(height);
                if let Some(pen) = self.sample(gfx, px, py) {
                    bitmap.set_pix(x, y, pen);
                }
            }
        }
    }

    /// Affine draw into `bitmap`. Without `wrap`, samples outside the layer
    /// are left untouched.
    pub fn draw_roz(
        &mut self,
        gfx: &GfxRom,
        bitmap: &mut Bitmap,
        clip: &Rect,
        affine: &Affine,
        wrap: bool,
        resolve: &mut dyn FnMut(u32, u32) -> TileInfo,
    ) {
        if !self.enabled {
            return;
        }
        self.refresh(resolve);
        let clip = clip.intersect(&bitmap.bounds());
        if clip.is_empty() {
            return;
        }
        let (width, height) = (self.width() as i64, self.height() as i64);
        for y in clip.min_y..=clip.max_y {
            for x in clip.min_x..=clip.max_x {
                let cx = affine.start_x as i64
                    + x as i64 * affine.inc_xx as i64
                    + y as i64 * affine.inc_yx as i64;
                let cy = affine.start_y as i64
                    + x as i64 * affine.inc_xy as i64
                    + y as i64 * affine.inc_yy as i64;
                let (mut px, mut py) = (cx >> 16, cy >> 16);
                if wrap {
                    px = px.rem_euclid(width);
                    py = py.rem_euclid(height);
                } else if px < 0 || py < 0 || px >= width || py >= height {
                    continue;
                }
                if let Some(pen) = self.sample(gfx, px as i32, py as i32) {
                    bitmap.set_pix(x, y, pen);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ROM with pattern N filled with pixel value N (patterns 0..=15).
    fn solid_rom() -> GfxRom {
        let mut data = Vec::with_capacity(16 * 32);
        for code in 0..16u8 {
            data.extend(std::iter::repeat_n((code << 4) | code, 32));
        }
        GfxRom::new(data)
    }

    fn by_column(_row: u32, col: u32) -> TileInfo {
        TileInfo {
            code: col % 16,
            ..TileInfo::blank(GfxSet::Pts8x8x4)
        }
    }

    #[test]
    fn refresh_only_fetches_dirty_tiles() {
        let mut map = Tilemap::new(GfxSet::Pts8x8x4, 4, 2);
        let mut calls = 0;
        map.refresh(&mut |row, col| {
            calls += 1;
            by_column(row, col)
        });
        assert_eq!(calls, 8);
        map.refresh(&mut |_, _| unreachable!());
        assert_eq!(map.dirty_count(), 0);
        map.mark_all_dirty();
        assert_eq!(map.dirty_count(), 8);
    }

    #[test]
    fn scroll_x_shifts_columns() {
        let rom = solid_rom();
        let mut map = Tilemap::new(GfxSet::Pts8x8x4, 4, 2);
        map.set_scrollx(8);
        let mut bitmap = Bitmap::new(32, 16);
        let clip = bitmap.bounds();
        map.draw(&rom, &mut bitmap, &clip, &mut by_column);
        assert_eq!(bitmap.pix(0, 0), 1);
        // wraps back to column 0
        assert_eq!(bitmap.pix(31, 0), 0);
        assert_eq!(bitmap.pix(23, 15), 3);
    }

    #[test]
    fn column_scroll_and_transparency() {
        let rom = solid_rom();
        let mut map = Tilemap::new(GfxSet::Pts8x8x4, 4, 2);
        map.set_scroll_cols(4);
        map.set_scrolly(1, 8);
        map.set_transparent_pen(0);
        let mut bitmap = Bitmap::new(32, 16);
        bitmap.fill(0x77, &Rect::new(0, 31, 0, 15));
        let clip = bitmap.bounds();
        map.draw(&rom, &mut bitmap, &clip, &mut |row, col| TileInfo {
            code: row * 4 + col,
            ..TileInfo::blank(GfxSet::Pts8x8x4)
        });
        // pen 0 is transparent
        assert_eq!(bitmap.pix(0, 0), 0x77);
        // column 1 is scrolled down one row
        assert_eq!(bitmap.pix(8, 0), 5);
        assert_eq!(bitmap.pix(16, 0), 2);
    }

    #[test]
    fn disabled_layer_draws_nothing() {
        let rom = solid_rom();
        let mut map = Tilemap::new(GfxSet::Pts8x8x4, 4, 2);
        map.enable(false);
        let mut bitmap = Bitmap::new(32, 16);
        let clip = bitmap.bounds();
        map.draw(&rom, &mut bitmap, &clip, &mut by_column);
        assert!(bitmap.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn roz_without_wrap_skips_outside() {
        let rom = solid_rom();
        let mut map = Tilemap::new(GfxSet::Pts8x8x4, 4, 2);
        // 2x zoom starting 16 pixels in
        let affine = Affine {
            start_x: 16 << 16,
            inc_xx: 2 << 16,
            inc_yy: 1 << 16,
            ..Affine::default()
        };
        let mut bitmap = Bitmap::new(32, 16);
        bitmap.fill(0x55, &Rect::new(0, 31, 0, 15));
        let clip = bitmap.bounds();
        map.draw_roz(&rom, &mut bitmap, &clip, &affine, false, &mut by_column);
        assert_eq!(bitmap.pix(0, 0), 2);
        assert_eq!(bitmap.pix(4, 0), 3);
        assert_eq!(bitmap.pix(8, 0), 0x55);

        map.draw_roz(&rom, &mut bitmap, &clip, &affine, true, &mut by_column);
        assert_eq!(bitmap.pix(8, 0), 0);
    }
}
