// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Board variants.
//!
//! A board can override two things: how pattern codes map onto the ROM
//! address lines, and what the frame is filled with before the planes are
//! drawn. A [`Variant`] bundles both choices. Only the stock chip matches a
//! known board; [`Variant::SCRAMBLED`] is an example of a custom strategy
//! for hosts wiring the ROM bus differently.

/// What [`crate::Ygv608::update_screen`] fills the visible area with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// The border colour register (R#13).
    Border,
    /// A fixed pen.
    Pen(u16),
}

#[derive(Debug, Clone, Copy)]
pub struct Variant {
    pub name: &'static str,
    /// Applied to every resolved pattern code before the range check.
    pub decrypt: fn(u32) -> u32,
    pub background: Background,
}

fn plain(code: u32) -> u32 {
    code
}

/// Swap pattern code bits 13 and 14.
fn swap_13_14(code: u32) -> u32 {
    let b13 = (code >> 13) & 1;
    let b14 = (code >> 14) & 1;
    (code & !0x6000) | (b13 << 14) | (b14 << 13)
}

impl Variant {
    /// Stock chip as fitted to ND-1 boards.
    pub const YGV608: Variant = Variant {
        name: "ygv608",
        decrypt: plain,
        background: Background::Border,
    };

    /// Example strategy: pattern ROM address lines 13 and 14 crossed, with a
    /// pen 0 backdrop. No known board ships this wiring.
    pub const SCRAMBLED: Variant = Variant {
        name: "ygv608-scrambled",
        decrypt: swap_13_14,
        background: Background::Pen(0),
    };

    pub fn decrypt(&self, code: u32) -> u32 {
        (self.decrypt)(code)
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::YGV608
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variant {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_variant_is_identity() {
        let variant = Variant::default();
        assert_eq!(variant.decrypt(0x1234), 0x1234);
        assert_eq!(variant.background, Background::Border);
    }

    #[test]
    fn scrambled_variant_swaps_bits() {
        let variant = Variant::SCRAMBLED;
        assert_eq!(variant.decrypt(0x2000), 0x4000);
        assert_eq!(variant.decrypt(0x4001), 0x2001);
        assert_eq!(variant.decrypt(0x6000), 0x6000);
        assert_ne!(variant, Variant::YGV608);
    }
}
