// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rotate/zoom parameters, R#25 - R#38.
//!
//! The start coordinates are 21-bit and the increments 13-bit two's
//! complement values. Both are widened to 16.16 fixed point by a 7-bit
//! shift.

use crate::tilemap::Affine;

/// ROZ staging registers and their converted values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-config", derive(serde::Serialize, serde::Deserialize))]
pub struct Roz {
    raw_ax: u32,
    raw_ay: u32,
    raw_dx: u16,
    raw_dxy: u16,
    raw_dy: u16,
    raw_dyx: u16,
    ax: i32,
    ay: i32,
    dx: i32,
    dxy: i32,
    dy: i32,
    dyx: i32,
}

/// Replace byte `offset` of a 24-bit staging register and convert.
fn convert_raw24(raw: &mut u32, offset: usize, data: u8) -> i32 {
    let shift = offset * 8;
    *raw = (*raw & !(0xFF << shift)) | ((data as u32) << shift);
    let mut value = (*raw & 0x1F_FFFF) << 7;
    if value & 0x0800_0000 != 0 {
        value |= 0xF800_0000;
    }
    value as i32
}

/// Replace byte `offset` of a 16-bit staging register and convert.
fn convert_raw16(raw: &mut u16, offset: usize, data: u8) -> i32 {
    let shift = offset * 8;
    *raw = (*raw & !(0xFF << shift)) | ((data as u16) << shift);
    let mut value = ((*raw & 0x1FFF) as u32) << 7;
    if value & 0x0008_0000 != 0 {
        value |= 0xFFF8_0000;
    }
    value as i32
}

impl Roz {
    /// Handle a write to register `reg` (25..=38).
    pub fn write(&mut self, reg: usize, data: u8) {
        match reg {
            25..=27 => self.ax = convert_raw24(&mut self.raw_ax, reg - 25, data),
            28..=29 => self.dx = convert_raw16(&mut self.raw_dx, reg - 28, data),
            30..=31 => self.dxy = convert_raw16(&mut self.raw_dxy, reg - 30, data),
            32..=34 => self.ay = convert_raw24(&mut self.raw_ay, reg - 32, data),
            35..=36 => self.dy = convert_raw16(&mut self.raw_dy, reg - 35, data),
            37..=38 => self.dyx = convert_raw16(&mut self.raw_dyx, reg - 37, data),
            _ => log::warn!("R#{reg} is not a ROZ register"),
        }
    }

    /// Sampling transform for the pattern planes.
    pub fn affine(&self) -> Affine {
        Affine {
            start_x: self.ax,
            start_y: self.ay,
            inc_xx: self.dx,
            inc_xy: self.dxy,
            inc_yx: self.dyx,
            inc_yy: self.dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_coordinates_sign_extend_from_bit_20() {
        let mut raw = 0;
        assert_eq!(convert_raw24(&mut raw, 0, 0x01), 0x80);
        assert_eq!(convert_raw24(&mut raw, 2, 0x10), 0xF800_0080_u32 as i32);
        // bits above 20 are staged but ignored
        assert_eq!(convert_raw24(&mut raw, 2, 0xE0), 0x80);
        assert_eq!(raw, 0xE0_0001);
    }

    #[test]
    fn increments_sign_extend_from_bit_12() {
        let mut raw = 0;
        assert_eq!(convert_raw16(&mut raw, 1, 0x02), 0x200 << 7);
        assert_eq!(convert_raw16(&mut raw, 1, 0x1F), -(0x100 << 7));
        assert_eq!(convert_raw16(&mut raw, 0, 0xFF), -(1 << 7));
    }

    #[test]
    fn unit_zoom() {
        let mut roz = Roz::default();
        // DX = DY = 0x200 -> 1.0 in 16.16
        roz.write(29, 0x02);
        roz.write(36, 0x02);
        let affine = roz.affine();
        assert_eq!(affine.inc_xx, 1 << 16);
        assert_eq!(affine.inc_yy, 1 << 16);
        assert_eq!(affine.inc_xy, 0);
        assert_eq!(affine.start_x, 0);
    }
}
