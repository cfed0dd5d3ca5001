// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! CPU-facing port interface (P#0 - P#7) and the access cursors behind it.

use super::registers::{Mode, RamAccess, Status, SystemControl};
use super::{PATTERN_NAME_BYTES, REGISTER_COUNT, Ygv608};
use crate::palette::{Rgb, pal6bit};

/// Port selected by the low three address bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Port {
    PatternName = 0,
    SpriteData = 1,
    ScrollData = 2,
    PaletteData = 3,
    RegisterData = 4,
    RegisterSelect = 5,
    Status = 6,
    SystemControl = 7,
}

impl Port {
    pub fn from_offset(offset: u8) -> Self {
        match offset & 0x07 {
            0 => Port::PatternName,
            1 => Port::SpriteData,
            2 => Port::ScrollData,
            3 => Port::PaletteData,
            4 => Port::RegisterData,
            5 => Port::RegisterSelect,
            6 => Port::Status,
            _ => Port::SystemControl,
        }
    }
}

/// Progress through one pattern name cell on P#0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-config", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternPhase {
    pub step: u8,
    /// Plane base latched at step 0.
    pub base: u16,
}

impl PatternPhase {
    pub fn reset(&mut self) {
        *self = PatternPhase::default();
    }
}

/// Live access pointers. Registers R#0 - R#5 write these directly; the
/// ports advance them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-config", derive(serde::Serialize, serde::Deserialize))]
pub struct Cursors {
    pub xtile: u8,
    pub ytile: u8,
    pub xtile_autoinc: bool,
    pub ytile_autoinc: bool,
    /// P#0 addresses plane B.
    pub plane_b_access: bool,
    pub read_phase: PatternPhase,
    pub write_phase: PatternPhase,

    pub access: RamAccess,
    pub sprite_address: u8,
    pub scroll_address: u8,
    pub palette_address: u8,
    /// Colour component sub-cursors, 0..=2.
    pub color_state_r: u8,
    pub color_state_w: u8,

    pub register_address: u8,
    pub register_autoinc_r: bool,
    pub register_autoinc_w: bool,
}

impl Cursors {
    /// Step the pattern pointer after a completed cell, wrapping at the page
    /// edge and flipping the A/B plane at the end of the page.
    fn advance_pattern(&mut self, page_x: u8, page_y: u8) {
        let last_x = page_x.wrapping_sub(1);
        let last_y = page_y.wrapping_sub(1);
        if self.ytile_autoinc {
            if self.ytile == last_y {
                self.ytile = 0;
                if self.xtile == last_x {
                    self.xtile = 0;
                    self.plane_b_access = !self.plane_b_access;
                } else {
                    self.xtile = self.xtile.wrapping_add(1);
                }
            } else {
                self.ytile = self.ytile.wrapping_add(1);
            }
        } else if self.xtile_autoinc {
            if self.xtile == last_x {
                self.xtile = 0;
                if self.ytile == last_y {
                    self.ytile = 0;
                    self.plane_b_access = !self.plane_b_access;
                } else {
                    self.ytile = self.ytile.wrapping_add(1);
                }
            } else {
                self.xtile = self.xtile.wrapping_add(1);
            }
        }
    }
}

impl Ygv608 {
    pub fn read_port(&mut self, port: Port) -> u8 {
        match port {
            Port::PatternName => {
                let index = self.pattern_name_access(false);
                self.vram.pattern_names[index]
            }
            Port::SpriteData => {
                let value = self.vram.sprites[self.cursors.sprite_address as usize];
                if self.cursors.access.contains(RamAccess::SAAR) {
                    self.cursors.sprite_address = self.cursors.sprite_address.wrapping_add(1);
                }
                value
            }
            Port::ScrollData => {
                let value = self.vram.scroll[self.scroll_plane()][self.cursors.scroll_address as usize];
                if self.cursors.access.contains(RamAccess::SCAR) {
                    self.advance_scroll_cursor();
                }
                value
            }
            Port::PaletteData => {
                let c = &mut self.cursors;
                let value = self.vram.colours[c.palette_address as usize][c.color_state_r as usize];
                c.color_state_r += 1;
                if c.color_state_r == 3 {
                    c.color_state_r = 0;
                    if c.access.contains(RamAccess::CPAR) {
                        c.palette_address = c.palette_address.wrapping_add(1);
                    }
                }
                value
            }
            Port::RegisterData => self.read_register(),
            // write only
            Port::RegisterSelect => 0,
            Port::Status => {
                let latched = self.ports[Port::Status as usize] & Status::LATCHED.bits();
                let mut status = Status::from_bits_truncate(latched);
                status.set(Status::HB, self.screen.hblank());
                status.set(Status::VB, self.screen.vblank());
                status.bits()
            }
            Port::SystemControl => self.ports[Port::SystemControl as usize],
        }
    }

    pub fn write_port(&mut self, port: Port, data: u8) {
        match port {
            Port::PatternName => {
                let index = self.pattern_name_access(true);
                self.vram.pattern_names[index] = data;
            }
            Port::SpriteData => {
                self.vram.sprites[self.cursors.sprite_address as usize] = data;
                if self.cursors.access.contains(RamAccess::SAAW) {
                    self.cursors.sprite_address = self.cursors.sprite_address.wrapping_add(1);
                }
            }
            Port::ScrollData => {
                let plane = self.scroll_plane();
                self.vram.scroll[plane][self.cursors.scroll_address as usize] = data;
                if self.cursors.access.contains(RamAccess::SCAW) {
                    self.advance_scroll_cursor();
                }
            }
            Port::PaletteData => {
                let address = self.cursors.palette_address as usize;
                self.vram.colours[address][self.cursors.color_state_w as usize] = data;
                self.cursors.color_state_w += 1;
                if self.cursors.color_state_w == 3 {
                    self.cursors.color_state_w = 0;
                    self.commit_colour(address);
                    if self.cursors.access.contains(RamAccess::CPAW) {
                        self.cursors.palette_address = self.cursors.palette_address.wrapping_add(1);
                    }
                }
            }
            Port::RegisterData => self.write_register(data),
            Port::RegisterSelect => self.select_register(data),
            Port::Status => {
                let status = &mut self.ports[Port::Status as usize];
                *status &= !data;
                let ack = Status::from_bits_truncate(data);
                if ack.contains(Status::FV) {
                    self.lines.vblank = false;
                }
                if ack.contains(Status::FP) {
                    self.lines.raster = false;
                }
            }
            Port::SystemControl => {
                self.ports[Port::SystemControl as usize] = data;
                let control = SystemControl::from_bits_truncate(data);
                if control.intersects(SystemControl::ROM_TRANSFER) {
                    log::warn!("ROM transfer ${:02X} requested, not supported", data & 0x3E);
                }
                if control.contains(SystemControl::RESET) {
                    self.reset();
                }
            }
        }
    }

    /// P#5: select a register. Bit 6 enables read autoincrement, bit 7
    /// write autoincrement.
    pub fn select_register(&mut self, data: u8) {
        let c = &mut self.cursors;
        c.register_address = data & 0x3F;
        c.register_autoinc_r = data & 0x40 != 0;
        c.register_autoinc_w = data & 0x80 != 0;
    }

    /// P#4 read.
    pub fn read_register(&mut self) -> u8 {
        let reg = self.cursors.register_address as usize;
        let value = self.register_value(reg);
        if self.cursors.register_autoinc_r {
            self.cursors.register_address = ((reg + 1) % REGISTER_COUNT) as u8;
        }
        value
    }

    /// P#4 write.
    pub fn write_register(&mut self, data: u8) {
        let reg = self.cursors.register_address as usize;
        self.apply_register(reg, data);
        if self.cursors.register_autoinc_w {
            self.cursors.register_address = ((reg + 1) % REGISTER_COUNT) as u8;
        }
    }

    fn scroll_plane(&self) -> usize {
        self.cursors.access.contains(RamAccess::SCROLL_B) as usize
    }

    fn advance_scroll_cursor(&mut self) {
        let c = &mut self.cursors;
        c.scroll_address = c.scroll_address.wrapping_add(1);
        if c.scroll_address == 0 {
            c.access.toggle(RamAccess::SCROLL_B);
        }
    }

    /// Push colour table entry `address` to the display palette.
    pub(crate) fn commit_colour(&mut self, address: usize) {
        let [r, g, b] = self.vram.colours[address];
        self.palette
            .set_pen_color(address, Rgb::new(pal6bit(r), pal6bit(g), pal6bit(b)));
    }

    /// Table index for the next P#0 access in the given direction.
    fn pattern_name_access(&mut self, write: bool) -> usize {
        let geometry = self.decoded.geometry;
        let mode = self.decoded.mode;
        let c = &mut self.cursors;
        let phase = if write {
            &mut c.write_phase
        } else {
            &mut c.read_phase
        };

        if phase.step == 0 && !mode.is_single_plane() && c.plane_b_access {
            phase.base = geometry.plane_b_base() as u16;
        }
        let mut index = phase.base as usize
            + geometry.pattern_index(c.ytile as u32, c.xtile as u32)
            + phase.step as usize;
        if index >= PATTERN_NAME_BYTES {
            log::warn!(
                "pattern name {index} out of range ({}: step {}, mode {mode:?}, page {}x{}, base {}, pnx {}, pny {})",
                if write { "write" } else { "read" },
                phase.step,
                geometry.page_x,
                geometry.page_y,
                phase.base,
                c.xtile,
                c.ytile
            );
            index = 0;
        }

        phase.step += if mode == Mode::TwoPlane8Bit { 2 } else { 1 };
        if phase.step >= 2 {
            phase.reset();
            c.advance_pattern(geometry.page_x, geometry.page_y);
        }
        index
    }
}
