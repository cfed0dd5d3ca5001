// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pattern generator ROM decoding.
//!
//! The chip addresses its pattern ROM through six layouts: 8x8, 16x16,
//! 32x32 and 64x64 at 4 bits per pixel, and 8x8 and 16x16 at 8 bits per
//! pixel. The 4bpp layouts interleave their quadrants so that a large
//! pattern is built from the same 8x8 cells a small one would use.

use crate::core::{Bitmap, Rect};

/// Pattern layout selector, in the chip's set numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GfxSet {
    Pts8x8x4 = 0,
    Pts16x16x4 = 1,
    Pts32x32x4 = 2,
    Pts64x64x4 = 3,
    Pts8x8x8 = 4,
    Pts16x16x8 = 5,
}

impl GfxSet {
    /// 4bpp set used for a 2-bit sprite size field.
    pub const fn from_sprite_size(size: u8) -> Self {
        match size & 0x03 {
            0 => GfxSet::Pts8x8x4,
            1 => GfxSet::Pts16x16x4,
            2 => GfxSet::Pts32x32x4,
            _ => GfxSet::Pts64x64x4,
        }
    }

    /// Width and height in pixels.
    pub const fn size(self) -> u32 {
        match self {
            GfxSet::Pts8x8x4 | GfxSet::Pts8x8x8 => 8,
            GfxSet::Pts16x16x4 | GfxSet::Pts16x16x8 => 16,
            GfxSet::Pts32x32x4 => 32,
            GfxSet::Pts64x64x4 => 64,
        }
    }

    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            GfxSet::Pts8x8x8 | GfxSet::Pts16x16x8 => 8,
            _ => 4,
        }
    }

    /// Pens per colour code.
    pub const fn granularity(self) -> u16 {
        1 << self.bits_per_pixel()
    }

    /// Bits occupied by one pattern.
    pub const fn char_bits(self) -> usize {
        (self.size() * self.size() * self.bits_per_pixel()) as usize
    }
}

const fn quadrant_offsets(bases: [u32; 8], unit: u32, step: u32) -> [u32; 64] {
    let mut table = [0; 64];
    let mut i = 0;
    while i < 64 {
        table[i] = bases[i / 8] * unit + (i % 8) as u32 * step;
        i += 1;
    }
    table
}

const LAYOUT4_X: [u32; 64] = quadrant_offsets([0, 1, 4, 5, 16, 17, 20, 21], 256, 4);
const LAYOUT4_Y: [u32; 64] = quadrant_offsets([0, 2, 8, 10, 32, 34, 40, 42], 256, 32);
// only the first 16 entries are reachable by the 8bpp sets
const LAYOUT8_X: [u32; 64] = quadrant_offsets([0, 1, 0, 0, 0, 0, 0, 0], 512, 8);
const LAYOUT8_Y: [u32; 64] = quadrant_offsets([0, 2, 0, 0, 0, 0, 0, 0], 512, 64);

/// One pattern placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blit {
    pub set: GfxSet,
    pub code: u32,
    pub color: u8,
    pub flip_x: bool,
    pub flip_y: bool,
    pub x: i32,
    pub y: i32,
}

/// Pattern generator ROM.
#[derive(Debug, Clone, Default)]
pub struct GfxRom {
    data: Vec<u8>,
}

impl GfxRom {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of whole patterns of `set` that fit in the ROM.
    pub fn elements(&self, set: GfxSet) -> u32 {
        (self.data.len() * 8 / set.char_bits()) as u32
    }

    /// Raw pixel value of pattern `code` at (`x`, `y`). Codes wrap at the
    /// element count.
    pub fn pixel(&self, set: GfxSet, code: u32, x: u32, y: u32) -> u8 {
        let elements = self.elements(set);
        if elements == 0 {
            return 0;
        }
        let (xs, ys) = match set.bits_per_pixel() {
            4 => (&LAYOUT4_X, &LAYOUT4_Y),
            _ => (&LAYOUT8_X, &LAYOUT8_Y),
        };
        let bit = (code % elements) as usize * set.char_bits()
            + xs[x as usize & 0x3F] as usize
            + ys[y as usize & 0x3F] as usize;
        let byte = self.data[bit / 8];
        match set.bits_per_pixel() {
            4 if bit % 8 == 0 => byte >> 4,
            4 => byte & 0x0F,
            _ => byte,
        }
    }

    /// Draw a pattern, skipping raw pixels equal to `transparent`.
    pub fn draw_transpen(&self, bitmap: &mut Bitmap, clip: &Rect, blit: &Blit, transparent: u8) {
        let size = blit.set.size() as i32;
        let target = Rect::new(blit.x, blit.x + size - 1, blit.y, blit.y + size - 1)
            .intersect(clip)
            .intersect(&bitmap.bounds());
        if target.is_empty() {
            return;
        }
        let base = blit.color as u16 * blit.set.granularity();
        for y in target.min_y..=target.max_y {
            let mut src_y = (y - blit.y) as u32;
            if blit.flip_y {
                src_y = size as u32 - 1 - src_y;
            }
            for x in target.min_x..=target.max_x {
                let mut src_x = (x - blit.x) as u32;
                if blit.flip_x {
                    src_x = size as u32 - 1 - src_x;
                }
                let pixel = self.pixel(blit.set, blit.code, src_x, src_y);
                if pixel != transparent {
                    bitmap.set_pix(x, y, base + pixel as u16);
                }
            }
        }
    }
}
