// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Register file decode.
//!
//! The raw 64-byte bank lives on [`Ygv608`]; every write goes through
//! [`Ygv608::apply_register`], which stores the byte and immediately
//! re-derives the decoded fields below. Reads of the control registers are
//! rebuilt from the decoded state so that pointer registers report their
//! live values.

use bitflags::bitflags;

use super::Ygv608;
use super::addressing::PageGeometry;

bitflags! {
    /// P#6 status byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        const VB = 0x01;
        const HB = 0x02;
        /// Sprite collision.
        const FC = 0x04;
        /// Vertical border interval started.
        const FV = 0x08;
        /// Raster position reached.
        const FP = 0x10;
        const LATCHED = Self::FC.bits() | Self::FV.bits() | Self::FP.bits();
    }
}

bitflags! {
    /// R#2 built-in RAM access control.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde-config", derive(serde::Serialize, serde::Deserialize))]
    pub struct RamAccess: u8 {
        const SAAR = 0x01;
        const SAAW = 0x02;
        const SCAR = 0x04;
        const SCAW = 0x08;
        /// P#2 accesses plane B.
        const SCROLL_B = 0x10;
        const CPAR = 0x40;
        const CPAW = 0x80;
    }
}

bitflags! {
    /// P#7 system control byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SystemControl: u8 {
        const RESET = 0x01;
        const ROM_TRANSFER = 0x3E;
    }
}

/// Display mode, R#7 bits 2:1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Mode {
    #[default]
    TwoPlane8Bit = 0,
    TwoPlane16Bit = 1,
    OnePlane16Colour = 2,
    OnePlane256Colour = 3,
}

impl Mode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Mode::TwoPlane8Bit,
            1 => Mode::TwoPlane16Bit,
            2 => Mode::OnePlane16Colour,
            _ => Mode::OnePlane256Colour,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn is_single_plane(self) -> bool {
        self.bits() & 0x02 != 0
    }
}

/// Pattern size in the pattern planes, R#9 bits 7:6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PatternSize {
    #[default]
    Pts8x8 = 0,
    Pts16x16 = 1,
    Pts32x32 = 2,
    Pts64x64 = 3,
}

impl PatternSize {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => PatternSize::Pts8x8,
            1 => PatternSize::Pts16x16,
            2 => PatternSize::Pts32x32,
            _ => PatternSize::Pts64x64,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// Plane/sprite priority, R#11 bits 3:2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Priority {
    #[default]
    Sabdex = 0,
    Asbdex = 1,
    Seabdx = 2,
    Asebdx = 3,
}

impl Priority {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Priority::Sabdex,
            1 => Priority::Asbdex,
            2 => Priority::Seabdx,
            _ => Priority::Asebdx,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Sprites are drawn before plane A and end up underneath it.
    pub fn sprites_behind_a(self) -> bool {
        matches!(self, Priority::Asbdex | Priority::Asebdx)
    }
}

/// Fields derived from the control registers (R#6 - R#24).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub sprite_bank: u8,

    // R#7
    pub dckm: bool,
    pub flip: bool,
    pub zron: bool,
    pub mode: Mode,
    pub dspe: bool,

    // R#8
    pub h_display_size: u8,
    pub v_display_size: u8,
    pub roz_wrap_disable: bool,
    pub scroll_wrap_disable: bool,
    pub page_size: bool,

    // R#9
    pub pattern_size: PatternSize,
    pub h_div_size: u8,
    pub v_div_size: u8,

    // R#10
    pub sprite_aux: u8,
    pub sprite_aux_mode: bool,
    pub sprite_disable: bool,
    pub mosaic_b: u8,
    pub mosaic_a: u8,

    // R#11
    pub scm: u8,
    pub yse: bool,
    pub cbdr: bool,
    pub priority: Priority,
    pub trans_b: bool,
    pub trans_a: bool,

    // R#12
    pub sprite_color_fetch: u8,
    pub b_color_fetch: u8,
    pub a_color_fetch: u8,

    pub border_color: u8,

    // R#14 - R#16
    pub vblank_mask: bool,
    pub raster_mask: bool,
    pub raster_mode: bool,
    pub raster_vpos: u16,
    pub raster_hpos: u16,

    /// Per-plane base address nibbles, R#17 - R#24.
    pub base_addr: [[u8; 8]; 2],

    pub geometry: PageGeometry,
}

impl Ygv608 {
    /// Store a register byte and re-derive everything that depends on it.
    pub(crate) fn apply_register(&mut self, reg: usize, data: u8) {
        let reg = reg & 0x3F;
        log::trace!("R#{reg:02} <- ${data:02X}");
        self.regs[reg] = data;

        match reg {
            0 => {
                let cursors = &mut self.cursors;
                cursors.ytile = data & 0x3F & self.decoded.geometry.page_y.wrapping_sub(1);
                cursors.ytile_autoinc = data & 0x80 != 0;
                cursors.plane_b_access = data & 0x40 != 0;
                self.warn_dual_autoinc();
            }
            1 => {
                let cursors = &mut self.cursors;
                cursors.xtile = data & 0x3F & self.decoded.geometry.page_x.wrapping_sub(1);
                cursors.xtile_autoinc = data & 0x80 != 0;
                self.warn_dual_autoinc();
            }
            2 => self.cursors.access = RamAccess::from_bits_truncate(data),
            3 => self.cursors.sprite_address = data,
            4 => self.cursors.scroll_address = data,
            5 => self.cursors.palette_address = data,
            6 => self.decoded.sprite_bank = data,
            7 => self.write_screen_ctrl_7(data),
            8 => self.write_screen_ctrl_8(data),
            9 => self.write_screen_ctrl_9(data),
            10 => {
                let d = &mut self.decoded;
                d.sprite_aux = (data >> 6) & 0x03;
                d.sprite_aux_mode = data & 0x20 != 0;
                d.sprite_disable = data & 0x10 != 0;
                d.mosaic_b = (data >> 2) & 0x03;
                d.mosaic_a = data & 0x03;
                if d.mosaic_a != 0 || d.mosaic_b != 0 {
                    log::warn!("mosaic effect unsupported (A={}, B={})", d.mosaic_a, d.mosaic_b);
                }
            }
            11 => {
                let d = &mut self.decoded;
                d.scm = (data >> 6) & 0x03;
                d.yse = data & 0x20 != 0;
                d.cbdr = data & 0x10 != 0;
                d.priority = Priority::from_bits(data >> 2);
                d.trans_b = data & 0x02 != 0;
                d.trans_a = data & 0x01 != 0;
            }
            12 => {
                let d = &mut self.decoded;
                d.sprite_color_fetch = (data >> 6) & 0x03;
                d.b_color_fetch = (data >> 3) & 0x07;
                d.a_color_fetch = data & 0x07;
            }
            13 => self.decoded.border_color = data,
            14 => {
                self.decoded.vblank_mask = data & 0x01 != 0;
                self.decoded.raster_mask = data & 0x02 != 0;
                self.check_vblank_irq();
                self.check_raster_irq();
            }
            15 => {
                self.decoded.raster_vpos = (self.decoded.raster_vpos & !0xFF) | data as u16;
                self.rearm_raster();
            }
            16 => {
                let d = &mut self.decoded;
                d.raster_mode = data & 0x80 != 0;
                d.raster_vpos = (d.raster_vpos & !0x100) | (((data >> 6) & 1) as u16) << 8;
                d.raster_hpos = (data & 0x1F) as u16 * 32;
                self.rearm_raster();
            }
            17..=24 => {
                let offset = reg - 17;
                let plane = offset >> 2;
                let addr = (offset << 1) & 0x07;
                self.decoded.base_addr[plane][addr] = data & 0x07;
                self.decoded.base_addr[plane][addr + 1] = (data >> 4) & 0x07;
                self.tilemap_resize = true;
            }
            25..=38 => self.roz.write(reg, data),
            39..=46 => self.write_crtc(reg, data),
            _ => {}
        }
    }

    /// Register value as seen through P#4.
    pub(crate) fn register_value(&self, reg: usize) -> u8 {
        let reg = reg & 0x3F;
        let d = &self.decoded;
        let c = &self.cursors;
        match reg {
            0 => ((c.ytile_autoinc as u8) << 7) | ((c.plane_b_access as u8) << 6) | c.ytile,
            1 => ((c.xtile_autoinc as u8) << 7) | c.xtile,
            2 => c.access.bits(),
            3 => c.sprite_address,
            4 => c.scroll_address,
            5 => c.palette_address,
            6 => d.sprite_bank,
            7 => {
                ((d.dckm as u8) << 7)
                    | ((d.flip as u8) << 6)
                    | ((d.zron as u8) << 3)
                    | (d.mode.bits() << 1)
                    | d.dspe as u8
            }
            8 => {
                (d.h_display_size << 6)
                    | (d.v_display_size << 4)
                    | ((d.roz_wrap_disable as u8) << 3)
                    | ((d.scroll_wrap_disable as u8) << 2)
                    | d.page_size as u8
            }
            9 => (d.pattern_size.bits() << 6) | (d.h_div_size << 3) | d.v_div_size,
            10 => {
                (d.sprite_aux << 6)
                    | ((d.sprite_aux_mode as u8) << 5)
                    | ((d.sprite_disable as u8) << 4)
                    | (d.mosaic_b << 2)
                    | d.mosaic_a
            }
            11 => {
                (d.scm << 6)
                    | ((d.yse as u8) << 5)
                    | ((d.cbdr as u8) << 4)
                    | (d.priority.bits() << 2)
                    | ((d.trans_b as u8) << 1)
                    | d.trans_a as u8
            }
            12 => (d.sprite_color_fetch << 6) | (d.b_color_fetch << 3) | d.a_color_fetch,
            14 => ((d.raster_mask as u8) << 1) | d.vblank_mask as u8,
            15 => (d.raster_vpos & 0xFF) as u8,
            16 => {
                ((d.raster_mode as u8) << 7)
                    | ((((d.raster_vpos >> 8) & 1) as u8) << 6)
                    | ((d.raster_hpos / 32) & 0x1F) as u8
            }
            _ => self.regs[reg],
        }
    }

    fn warn_dual_autoinc(&self) {
        if self.cursors.xtile_autoinc && self.cursors.ytile_autoinc {
            log::warn!("both X and Y pattern pointer autoincrement enabled");
        }
    }

    fn write_screen_ctrl_7(&mut self, data: u8) {
        let mode = Mode::from_bits(data >> 1);
        if mode != self.decoded.mode {
            self.tilemap_resize = true;
        }
        let d = &mut self.decoded;
        d.dckm = data & 0x80 != 0;
        d.flip = data & 0x40 != 0;
        d.zron = data & 0x08 != 0;
        d.mode = mode;
        d.dspe = data & 0x01 != 0;
        d.geometry.na8_mask = if d.flip { 0x03 } else { 0x0F };

        // a mode change restarts both pattern name port sequences
        self.cursors.read_phase.reset();
        self.cursors.write_phase.reset();
        self.decoded.geometry.setup(mode, self.decoded.page_size);
    }

    fn write_screen_ctrl_8(&mut self, data: u8) {
        let page_size = data & 0x01 != 0;
        if page_size != self.decoded.page_size {
            self.tilemap_resize = true;
        }
        let d = &mut self.decoded;
        d.h_display_size = (data >> 6) & 0x03;
        d.v_display_size = (data >> 4) & 0x03;
        d.roz_wrap_disable = data & 0x08 != 0;
        d.scroll_wrap_disable = data & 0x04 != 0;
        d.page_size = page_size;
        d.geometry.setup(d.mode, page_size);
    }

    fn write_screen_ctrl_9(&mut self, data: u8) {
        let pattern_size = PatternSize::from_bits(data >> 6);
        if pattern_size != self.decoded.pattern_size {
            self.tilemap_resize = true;
        }
        let d = &mut self.decoded;
        d.pattern_size = pattern_size;
        d.h_div_size = (data >> 3) & 0x07;
        d.v_div_size = data & 0x07;
        d.geometry.col_shift = PageGeometry::column_shift(d.v_div_size, pattern_size);
    }

    /// Dump the register file at debug level.
    pub fn log_registers(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let r = &self.regs;
        let d = &self.decoded;
        let c = &self.cursors;
        log::debug!("YGV608 registers");
        log::debug!(
            "  R#00: ${:02X} : PNYA({}),B/A({}),PNY({})",
            r[0],
            c.ytile_autoinc as u8,
            if c.plane_b_access { 'B' } else { 'A' },
            c.ytile
        );
        log::debug!("  R#01: ${:02X} : PNXA({}),PNX({})", r[1], c.xtile_autoinc as u8, c.xtile);
        log::debug!("  R#02: ${:02X} : {:?}", r[2], c.access);
        log::debug!("  R#03: ${:02X} : SAA(${:02X})", r[3], c.sprite_address);
        log::debug!("  R#04: ${:02X} : SCA(${:02X})", r[4], c.scroll_address);
        log::debug!("  R#05: ${:02X} : CC(${:02X})", r[5], c.palette_address);
        log::debug!("  R#06: ${:02X} : SBA(${:02X})", r[6], d.sprite_bank);
        log::debug!(
            "  R#07: ${:02X} : DSPE({}),MD({:?}),ZRON({}),FLIP({}),DCKM({})",
            r[7],
            d.dspe as u8,
            d.mode,
            d.zron as u8,
            d.flip as u8,
            d.dckm as u8
        );
        log::debug!(
            "  R#08: ${:02X} : HDS({}),VDS({}),RLRT({}),RLSC({}),PGS({})",
            r[8],
            d.h_display_size,
            d.v_display_size,
            d.roz_wrap_disable as u8,
            d.scroll_wrap_disable as u8,
            d.page_size as u8
        );
        log::debug!(
            "  R#09: ${:02X} : PTS({:?}),SLH({}),SLV({})",
            r[9],
            d.pattern_size,
            d.h_div_size,
            d.v_div_size
        );
        log::debug!(
            "  R#11: ${:02X} : CTPA({}),CTPB({}),PRM({:?}),CBDR({}),YSE({}),SCM({})",
            r[11],
            d.trans_a as u8,
            d.trans_b as u8,
            d.priority,
            d.cbdr as u8,
            d.yse as u8,
            d.scm
        );
        log::debug!(
            "  R#40-42: HTL=${:03X} HDSP=${:03X} HDW({})",
            self.crtc.htotal,
            self.crtc.display_hstart,
            self.crtc.display_width
        );
        log::debug!(
            "  R#47-49: TB=${:06X} TN=${:04X}",
            ((r[48] as u32) << 13) | ((r[47] as u32) << 5),
            (r[49] as u32) << 4
        );
        log::debug!("  geometry: {:?}", d.geometry);
        for (plane, bases) in d.base_addr.iter().enumerate() {
            log::debug!("  base[{plane}]: {bases:02X?}");
        }
    }
}
