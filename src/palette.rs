// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Display palette fed by the colour palette port.

use crate::core::Bitmap;

pub const PALETTE_ENTRIES: usize = 256;

/// Expand a 6-bit colour component to 8 bits.
pub const fn pal6bit(value: u8) -> u8 {
    let value = value & 0x3F;
    (value << 2) | (value >> 4)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as 0x00RRGGBB.
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pens: [Rgb; PALETTE_ENTRIES],
}

impl Palette {
    pub fn new() -> Self {
        Self {
            pens: [Rgb::default(); PALETTE_ENTRIES],
        }
    }

    pub fn set_pen_color(&mut self, pen: usize, color: Rgb) {
        if let Some(slot) = self.pens.get_mut(pen) {
            *slot = color;
        }
    }

    /// Colour of `pen`. Pens past the end wrap around the palette.
    pub fn pen_color(&self, pen: u16) -> Rgb {
        self.pens[pen as usize % PALETTE_ENTRIES]
    }

    /// Resolve an indexed bitmap to packed RGB.
    pub fn resolve(&self, bitmap: &Bitmap) -> Vec<u32> {
        bitmap
            .pixels()
            .iter()
            .map(|&pen| self.pen_color(pen).to_u32())
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
