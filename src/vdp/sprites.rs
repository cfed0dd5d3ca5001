// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sprite attribute table decode.
//!
//! Sprites live on a 512x512 plane that wraps; a sprite hanging off the
//! right or bottom edge is drawn again on the opposite side.

use super::registers::Decoded;
use super::{MAX_SPRITES, SPRITE_TABLE_BYTES};
use crate::gfx::{Blit, GfxRom, GfxSet};

/// Side of the wrapping sprite plane.
pub const SPRITE_PLANE: i32 = 512;

const BANK_STRIDE: [u32; 4] = [0x10000, 0x4000, 0x1000, 0x400];
const BANK_SHIFT: [u32; 4] = [8, 6, 4, 2];
const BANK_MASK: [u8; 4] = [0xFF, 0xFC, 0xF0, 0xC0];
const SPF_SHIFT: [i32; 4] = [-1, 0, 1, 2];

const FLIP_X: u8 = 0x02;
const FLIP_Y: u8 = 0x01;

/// Blits for every visible sprite, back to front: slot 63 first.
pub fn build_draw_list(table: &[u8; SPRITE_TABLE_BYTES], d: &Decoded, gfx: &GfxRom, gfx_bank: u8) -> Vec<Blit> {
    let mut blits = Vec::new();
    if !d.dspe || d.sprite_disable {
        return blits;
    }

    for slot in (0..MAX_SPRITES).rev() {
        let [sy, sx, attr, sn] = [0, 1, 2, 3].map(|i| table[slot * 4 + i]);

        let mut color = attr >> 4;
        let x = (((attr & 0x02) as i32) << 7) | sx as i32;
        let y = (((((attr & 0x01) as i32) << 8) | sy as i32) + 1) & 0x1FF;
        let own = (attr & 0x0C) >> 2;
        let global = d.sprite_aux & 0x03;

        let (size, flip) = if d.sprite_aux_mode { (own, global) } else { (global, own) };
        let size_index = size as usize;
        let set = GfxSet::from_sprite_size(size);

        let mut code = ((d.sprite_bank & BANK_MASK[size_index]) as u32) << BANK_SHIFT[size_index] | sn as u32;
        if d.sprite_color_fetch != 0 {
            let shift = (d.sprite_color_fetch as i32 + SPF_SHIFT[size_index]) * 2;
            color = ((code >> shift) & 0x0F) as u8;
        }
        if code >= gfx.elements(set) {
            log::warn!("sprite {slot}: pattern {code} out of range for {0}x{0}", set.size());
            code = 0;
        }

        let blit = Blit {
            set,
            code: code + gfx_bank as u32 * BANK_STRIDE[size_index],
            color,
            flip_x: flip & FLIP_X != 0,
            flip_y: flip & FLIP_Y != 0,
            x,
            y,
        };
        blits.push(blit);

        let limit = SPRITE_PLANE - set.size() as i32;
        if x > limit || y > limit {
            for (dx, dy) in [(SPRITE_PLANE, 0), (0, SPRITE_PLANE), (SPRITE_PLANE, SPRITE_PLANE)] {
                blits.push(Blit {
                    x: x - dx,
                    y: y - dy,
                    ..blit
                });
            }
        }
    }
    blits
}
