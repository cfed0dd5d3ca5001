// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Page geometry and pattern name resolution.
//!
//! The pattern name table packs both planes into 4 KiB. Its layout depends
//! on the display mode (8 or 16 bit names) and the page size; the scroll
//! table adds a per-page bank and the base address registers a per-row-band
//! offset on top of the stored name.

use super::registers::{Decoded, Mode, PatternSize};
use super::{PATTERN_NAME_BYTES, Vram};
use crate::gfx::GfxSet;
use crate::tilemap::TileInfo;

/// Pattern plane selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    A = 0,
    B = 1,
}

impl Plane {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Addressing parameters derived from MD, PGS, FLIP and SLV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageGeometry {
    /// Page width in tiles.
    pub page_x: u8,
    /// Page height in tiles.
    pub page_y: u8,
    /// Pattern names are two bytes wide.
    pub bits16: bool,
    pub pny_shift: u8,
    /// Row shift selecting a base address nibble.
    pub base_y_shift: u8,
    /// Mask applied to the high name byte.
    pub na8_mask: u8,
    /// Column shift for screen-division scrolling.
    pub col_shift: u8,
}

impl PageGeometry {
    pub fn setup(&mut self, mode: Mode, page_size: bool) {
        self.bits16 = mode != Mode::TwoPlane8Bit;
        (self.page_x, self.page_y) = match (mode, page_size) {
            (Mode::TwoPlane16Bit, _) => (32, 32),
            (_, false) => (64, 32),
            (_, true) => (32, 64),
        };
        self.pny_shift = if self.page_x == 32 { 5 } else { 6 };
        self.base_y_shift = if self.page_y == 32 { 2 } else { 3 };
    }

    /// Division shift for the vertical split size `slv`. Unhandled sizes
    /// fall back to full-screen scrolling.
    pub fn column_shift(slv: u8, pattern_size: PatternSize) -> u8 {
        if slv == 0 {
            return 8;
        }
        let shift = match pattern_size {
            PatternSize::Pts8x8 => slv as i8 - 4,
            _ => slv as i8 - 5,
        };
        if shift < 0 {
            log::warn!("unhandled SLV condition (pts={pattern_size:?}, slv={slv})");
            return 8;
        }
        shift as u8
    }

    /// Scroll table entry holding the vertical scroll for `col`.
    pub fn col_division(&self, v_div_size: u8, col: u32) -> usize {
        if v_div_size & 0x04 == 0 {
            return 0;
        }
        (((col >> self.col_shift) * 2) & 0x7F) as usize
    }

    pub fn is_valid(&self) -> bool {
        self.page_x != 0 && self.page_y != 0
    }

    /// Byte offset of plane B inside the pattern name table.
    pub fn plane_b_base(&self) -> usize {
        ((self.page_y as usize) << self.pny_shift) << self.bits16 as usize
    }

    /// Byte offset of the cell at (`row`, `col`) relative to a plane base.
    pub fn pattern_index(&self, row: u32, col: u32) -> usize {
        (((row as usize) << self.pny_shift) + col as usize) << self.bits16 as usize
    }

    /// Which of the three cached tilemap geometries fits this page.
    pub fn cache_index(&self) -> usize {
        if self.page_x == 64 {
            1
        } else if self.page_y == 64 {
            2
        } else {
            0
        }
    }
}

/// Resolves one plane's tiles from the pattern name and scroll tables.
pub struct TileResolver<'a> {
    pub plane: Plane,
    pub set: GfxSet,
    pub decoded: &'a Decoded,
    pub vram: &'a Vram,
    pub decrypt: fn(u32) -> u32,
    pub gfx_bank: u8,
    /// Patterns available in `set`.
    pub elements: u32,
}

impl TileResolver<'_> {
    /// Pattern set used by `plane` for the current mode and pattern size.
    pub fn set_for(plane: Plane, mode: Mode, pattern_size: PatternSize) -> GfxSet {
        let wide = plane == Plane::A && mode == Mode::OnePlane256Colour;
        match (pattern_size, wide) {
            (PatternSize::Pts8x8, false) => GfxSet::Pts8x8x4,
            (PatternSize::Pts8x8, true) => GfxSet::Pts8x8x8,
            (_, false) => GfxSet::Pts16x16x4,
            (_, true) => GfxSet::Pts16x16x8,
        }
    }

    /// Board bank stride for `set`.
    pub fn bank_stride(set: GfxSet) -> u32 {
        match set {
            GfxSet::Pts8x8x4 => 0x10000,
            GfxSet::Pts8x8x8 => 0x8000,
            GfxSet::Pts16x16x8 => 0x2000,
            _ => 0x4000,
        }
    }

    pub fn resolve(&self, row: u32, col: u32) -> TileInfo {
        let d = self.decoded;
        let geometry = &d.geometry;
        let blank = TileInfo::blank(self.set);
        if col >= geometry.page_x as u32 || row >= geometry.page_y as u32 {
            return blank;
        }
        if self.plane == Plane::B && d.mode.is_single_plane() {
            return blank;
        }

        let small = self.set.size() == 8;
        let four_bpp = self.set.bits_per_pixel() == 4;
        let colour_from_name = four_bpp || self.plane == Plane::B;
        let names = &self.vram.pattern_names;
        let scroll = &self.vram.scroll[self.plane.index()];

        let base = match self.plane {
            Plane::A => 0,
            Plane::B => geometry.plane_b_base(),
        };
        let i = (base + geometry.pattern_index(row, col)) % PATTERN_NAME_BYTES;
        let mut code = names[i] as u32;
        let mut color = 0u8;
        let mut flip_x = false;
        let mut flip_y = false;
        if geometry.bits16 {
            let high = names[(i + 1) % PATTERN_NAME_BYTES];
            code += ((high & geometry.na8_mask) as u32) << 8;
            if colour_from_name {
                color = high >> 4;
            }
            if d.flip {
                flip_x = high & 0x08 != 0;
                flip_y = high & 0x04 != 0;
            }
        }

        let tc = geometry.col_division(d.v_div_size, col);
        let sy = scroll[tc] as u32 + (((scroll[tc + 1] & 0x0F) as u32) << 8);
        let sx = scroll[0x80] as u32 + (((scroll[0x81] & 0x0F) as u32) << 8);
        let page = Self::page(d.mode, d.page_size, small, sx, sy, row, col) & 0x1F;

        code += (scroll[0xC0 + page as usize] as u32) << if small { 10 } else { 8 };
        code += (d.base_addr[self.plane.index()][(row >> geometry.base_y_shift) as usize & 7] as u32) << 8;
        code = (self.decrypt)(code);

        if code >= self.elements {
            log::warn!(
                "plane {:?} {}x{}: pattern {code} out of range",
                self.plane,
                self.set.size(),
                self.set.size()
            );
            code = 0;
        }

        let fetch = match self.plane {
            Plane::A => d.a_color_fetch,
            Plane::B => d.b_color_fetch,
        };
        if fetch != 0 && colour_from_name {
            let shift = if small { (fetch - 1) * 2 } else { fetch * 2 };
            color = ((code >> shift) & 0x0F) as u8;
        }

        code += self.gfx_bank as u32 * Self::bank_stride(self.set);

        TileInfo {
            set: self.set,
            code,
            color: color & 0x0F,
            flip_x,
            flip_y,
        }
    }

    /// Scroll page holding the cell at (`row`, `col`).
    fn page(mode: Mode, page_size: bool, small: bool, sx: u32, sy: u32, row: u32, col: u32) -> u32 {
        if small {
            let (x, y) = (sx + col * 8, sy + row * 8);
            if mode == Mode::TwoPlane16Bit {
                (x % 1024) / 256 + ((y % 2048) / 256) * 4
            } else if page_size {
                (x % 2048) / 512 + ((y % 2048) / 256) * 4
            } else {
                (x % 2048) / 256 + ((y % 2048) / 512) * 8
            }
        } else {
            let (x, y) = (sx + col * 16, sy + row * 16);
            if mode == Mode::TwoPlane16Bit {
                (x % 2048) / 512 + (y / 512) * 4
            } else if page_size {
                x / 512 + (y / 1024) * 8
            } else {
                x / 1024 + (y / 512) * 4
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn geometry(mode: Mode, page_size: bool) -> PageGeometry {
        let mut geometry = PageGeometry::default();
        geometry.setup(mode, page_size);
        geometry.na8_mask = 0x0F;
        geometry
    }

    #[test]
    fn setup_follows_mode_and_page_size() {
        let g = geometry(Mode::TwoPlane8Bit, false);
        assert_eq!((g.page_x, g.page_y, g.bits16, g.pny_shift, g.base_y_shift), (64, 32, false, 6, 2));
        let g = geometry(Mode::TwoPlane16Bit, true);
        assert_eq!((g.page_x, g.page_y, g.bits16, g.pny_shift, g.base_y_shift), (32, 32, true, 5, 2));
        let g = geometry(Mode::OnePlane256Colour, true);
        assert_eq!((g.page_x, g.page_y, g.bits16, g.pny_shift, g.base_y_shift), (32, 64, true, 5, 3));
        assert_eq!(g.cache_index(), 2);
    }

    #[test]
    fn pattern_index_is_injective() {
        let modes = [
            (Mode::TwoPlane8Bit, false),
            (Mode::TwoPlane8Bit, true),
            (Mode::TwoPlane16Bit, false),
            (Mode::OnePlane16Colour, false),
            (Mode::OnePlane16Colour, true),
        ];
        for (mode, page_size) in modes {
            let g = geometry(mode, page_size);
            let planes = if mode.is_single_plane() {
                vec![0]
            } else {
                vec![0, g.plane_b_base()]
            };
            let mut seen = HashSet::new();
            for base in planes {
                for row in 0..g.page_y as u32 {
                    for col in 0..g.page_x as u32 {
                        let index = base + g.pattern_index(row, col);
                        assert!(index < PATTERN_NAME_BYTES);
                        assert!(seen.insert(index), "{mode:?} ({row}, {col}) collides");
                    }
                }
            }
        }
    }

    #[test]
    fn column_shift_and_division() {
        assert_eq!(PageGeometry::column_shift(0, PatternSize::Pts8x8), 8);
        assert_eq!(PageGeometry::column_shift(5, PatternSize::Pts8x8), 1);
        assert_eq!(PageGeometry::column_shift(5, PatternSize::Pts16x16), 0);
        // 8 dot division with 16x16 patterns cannot be expressed
        assert_eq!(PageGeometry::column_shift(4, PatternSize::Pts16x16), 8);

        let mut g = geometry(Mode::TwoPlane8Bit, false);
        g.col_shift = 1;
        assert_eq!(g.col_division(0, 9), 0);
        assert_eq!(g.col_division(5, 9), 8);
        assert_eq!(g.col_division(5, 200), (100 * 2) & 0x7F);
    }

    fn decoded(mode: Mode) -> Decoded {
        let mut d = Decoded {
            mode,
            ..Decoded::default()
        };
        d.geometry.setup(mode, false);
        d.geometry.na8_mask = 0x0F;
        d.geometry.col_shift = 8;
        d
    }

    fn resolver<'a>(plane: Plane, set: GfxSet, decoded: &'a Decoded, vram: &'a Vram) -> TileResolver<'a> {
        TileResolver {
            plane,
            set,
            decoded,
            vram,
            decrypt: |code| code,
            gfx_bank: 0,
            elements: 0x10000,
        }
    }

    #[test]
    fn sixteen_bit_names_carry_colour_and_flip() {
        let mut d = decoded(Mode::TwoPlane16Bit);
        d.flip = true;
        d.geometry.na8_mask = 0x03;
        let mut vram = Vram::new();
        let i = d.geometry.pattern_index(2, 3);
        vram.pattern_names[i] = 0x45;
        vram.pattern_names[i + 1] = 0x7D;
        let tile = resolver(Plane::A, GfxSet::Pts8x8x4, &d, &vram).resolve(2, 3);
        assert_eq!(tile.code, 0x145);
        assert_eq!(tile.color, 7);
        assert!(tile.flip_x);
        assert!(tile.flip_y);
    }

    #[test]
    fn page_bank_and_base_address_offset_code() {
        let mut d = decoded(Mode::TwoPlane8Bit);
        let mut vram = Vram::new();
        // row 8 -> base nibble 2
        d.base_addr[0][2] = 3;
        let i = d.geometry.pattern_index(8, 40);
        vram.pattern_names[i] = 0x11;
        // column 40 is 320 dots in: page 1
        vram.scroll[0][0xC1] = 2;
        let tile = resolver(Plane::A, GfxSet::Pts8x8x4, &d, &vram).resolve(8, 40);
        assert_eq!(tile.code, 0x11 + (2 << 10) + (3 << 8));
    }

    #[test]
    fn out_of_range_codes_clamp_and_bank_applies() {
        let d = decoded(Mode::TwoPlane8Bit);
        let mut vram = Vram::new();
        vram.pattern_names[0] = 0x80;
        let mut r = resolver(Plane::A, GfxSet::Pts8x8x4, &d, &vram);
        r.elements = 0x40;
        r.gfx_bank = 2;
        let tile = r.resolve(0, 0);
        assert_eq!(tile.code, 2 * 0x10000);
    }

    #[test]
    fn plane_b_blank_in_single_plane_mode() {
        let d = decoded(Mode::OnePlane16Colour);
        let mut vram = Vram::new();
        vram.pattern_names.fill(0x22);
        let tile = resolver(Plane::B, GfxSet::Pts16x16x4, &d, &vram).resolve(0, 0);
        assert_eq!(tile, TileInfo::blank(GfxSet::Pts16x16x4));
        let tile = resolver(Plane::A, GfxSet::Pts16x16x4, &d, &vram).resolve(0, 0);
        assert_eq!(tile.code, 0x222);
    }

    #[test]
    fn large_patterns_use_their_own_page_bank_and_stride() {
        let mut d = decoded(Mode::TwoPlane8Bit);
        d.a_color_fetch = 1;
        d.base_addr[0][2] = 3;
        let mut vram = Vram::new();
        let i = d.geometry.pattern_index(8, 40);
        vram.pattern_names[i] = 0x11;
        // 512 dots of horizontal scroll put column 40 at 1152: page 1
        vram.scroll[0][0x81] = 0x02;
        vram.scroll[0][0xC1] = 2;
        let mut r = resolver(Plane::A, GfxSet::Pts16x16x4, &d, &vram);
        r.gfx_bank = 1;
        let tile = r.resolve(8, 40);
        // page bank shifts by 8, base address by 8
        let code = 0x11 + (2 << 8) + (3 << 8);
        // cf * 2 = 2
        assert_eq!(tile.color, ((code >> 2) & 0x0F) as u8);
        assert_eq!(tile.code, code + 0x4000);
    }

    #[test]
    fn plane_a_is_8bpp_in_256_colour_mode() {
        let mode = Mode::OnePlane256Colour;
        assert_eq!(TileResolver::set_for(Plane::A, mode, PatternSize::Pts16x16), GfxSet::Pts16x16x8);
        assert_eq!(TileResolver::set_for(Plane::A, mode, PatternSize::Pts8x8), GfxSet::Pts8x8x8);
        assert_eq!(TileResolver::set_for(Plane::B, mode, PatternSize::Pts16x16), GfxSet::Pts16x16x4);
        assert_eq!(TileResolver::bank_stride(GfxSet::Pts8x8x8), 0x8000);

        let mut d = decoded(mode);
        d.a_color_fetch = 1;
        let mut vram = Vram::new();
        vram.pattern_names[0] = 0x22;
        vram.pattern_names[1] = 0x31;
        vram.scroll[0][0xC0] = 1;
        let mut r = resolver(Plane::A, GfxSet::Pts16x16x8, &d, &vram);
        r.gfx_bank = 1;
        let tile = r.resolve(0, 0);
        // neither the name's high nibble nor the fetch field colours 8bpp tiles
        assert_eq!(tile.color, 0);
        assert_eq!(tile.code, 0x122 + (1 << 8) + 0x2000);
    }

    #[test]
    fn colour_fetch_uses_code_bits() {
        let mut d = decoded(Mode::TwoPlane8Bit);
        d.a_color_fetch = 2;
        let mut vram = Vram::new();
        vram.pattern_names[0] = 0b1011_0100;
        let tile = resolver(Plane::A, GfxSet::Pts8x8x4, &d, &vram).resolve(0, 0);
        // (cf - 1) * 2 = 2
        assert_eq!(tile.color, 0b1101);
    }
}
