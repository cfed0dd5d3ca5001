// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! YGV608 pattern-mode video display processor.
//!
//! The host talks to the chip through eight byte ports. Everything else,
//! the register file, the four RAM tables and the CRTC, sits behind them.
//! [`Ygv608::advance`] moves the raster beam and raises the interrupt
//! lines; [`Ygv608::update_screen`] composes a frame.

mod addressing;
mod cache;
mod crtc;
mod ports;
mod registers;
mod render;
mod roz;
mod sprites;
mod state;

pub use addressing::{PageGeometry, Plane};
pub use crtc::{Crtc, InterruptLines};
pub use ports::{Cursors, PatternPhase, Port};
pub use registers::{Decoded, Mode, PatternSize, Priority, RamAccess, Status, SystemControl};
pub use roz::Roz;
pub use state::Snapshot;

use crate::config::{ScreenConfig, VdpConfig};
use crate::core::{Bitmap, Rect, Screen, Timer};
use crate::error::Result;
use crate::gfx::GfxRom;
use crate::palette::{PALETTE_ENTRIES, Palette};
use crate::variant::Variant;
use cache::TilemapCache;

pub const REGISTER_COUNT: usize = 64;
pub const PORT_COUNT: usize = 8;
pub const PATTERN_NAME_BYTES: usize = 4096;
pub const SPRITE_TABLE_BYTES: usize = 256;
pub const SCROLL_TABLE_BYTES: usize = 256;
pub const MAX_SPRITES: usize = SPRITE_TABLE_BYTES / 4;

/// Registers cleared by a reset, besides 0 - 38.
const RESET_EXTRA: std::ops::RangeInclusive<usize> = 47..=49;

/// On-chip RAM tables.
#[derive(Clone)]
pub(crate) struct Vram {
    pub pattern_names: [u8; PATTERN_NAME_BYTES],
    pub sprites: [u8; SPRITE_TABLE_BYTES],
    /// Scroll tables for planes A and B.
    pub scroll: [[u8; SCROLL_TABLE_BYTES]; 2],
    /// 6-bit R, G, B per palette entry.
    pub colours: [[u8; 3]; PALETTE_ENTRIES],
}

impl Vram {
    pub fn new() -> Self {
        Self {
            pattern_names: [0; PATTERN_NAME_BYTES],
            sprites: [0; SPRITE_TABLE_BYTES],
            scroll: [[0; SCROLL_TABLE_BYTES]; 2],
            colours: [[0; 3]; PALETTE_ENTRIES],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

pub struct Ygv608 {
    variant: Variant,
    regs: [u8; REGISTER_COUNT],
    ports: [u8; PORT_COUNT],
    decoded: Decoded,
    cursors: Cursors,
    vram: Vram,
    palette: Palette,
    roz: Roz,
    crtc: Crtc,

    screen: Screen,
    screen_configured: bool,
    vblank_timer: Timer,
    raster_timer: Timer,
    lines: InterruptLines,

    cache: TilemapCache,
    work: Bitmap,
    gfx: GfxRom,
    gfx_bank: u8,
    dot_clock_hz: u32,

    /// Tilemaps need reselecting before the next frame.
    tilemap_resize: bool,
    /// The work bitmap needs reallocating before the next frame.
    screen_resize: bool,
}

impl Ygv608 {
    /// Stock chip with the default power-on geometry.
    pub fn new(gfx: GfxRom) -> Self {
        Self::build(gfx, &VdpConfig::default())
    }

    pub fn with_config(gfx: GfxRom, config: &VdpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(gfx, config))
    }

    fn build(gfx: GfxRom, config: &VdpConfig) -> Self {
        let ScreenConfig {
            htotal,
            vtotal,
            visible_width,
            visible_height,
        } = config.screen;
        let visible = Rect::new(0, visible_width as i32 - 1, 0, visible_height as i32 - 1);
        let variant = config.variant.variant();
        log::info!("{} with {} bytes of pattern ROM", variant.name, gfx.len());

        Self {
            variant,
            regs: [0; REGISTER_COUNT],
            ports: [0; PORT_COUNT],
            decoded: Decoded::default(),
            cursors: Cursors::default(),
            vram: Vram::new(),
            palette: Palette::new(),
            roz: Roz::default(),
            crtc: Crtc::default(),
            screen: Screen::new(htotal, vtotal, visible),
            screen_configured: false,
            vblank_timer: Timer::new(),
            raster_timer: Timer::new(),
            lines: InterruptLines::default(),
            cache: TilemapCache::new(),
            work: Bitmap::new(visible_width as usize, visible_height as usize),
            gfx,
            gfx_bank: config.gfx_bank,
            dot_clock_hz: config.dot_clock_hz,
            tilemap_resize: true,
            screen_resize: true,
        }
    }

    /// Byte-addressed port read; only the low three address bits decode.
    pub fn read(&mut self, offset: u8) -> u8 {
        self.read_port(Port::from_offset(offset))
    }

    pub fn write(&mut self, offset: u8, data: u8) {
        self.write_port(Port::from_offset(offset), data);
    }

    /// Select the board-level pattern ROM bank.
    pub fn set_gfx_bank(&mut self, bank: u8) {
        if bank != self.gfx_bank {
            self.gfx_bank = bank;
            self.tilemap_resize = true;
        }
    }

    pub fn gfx_bank(&self) -> u8 {
        self.gfx_bank
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Raw register file.
    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.regs
    }

    /// Decoded control state.
    pub fn decoded(&self) -> &Decoded {
        &self.decoded
    }

    pub fn cursors(&self) -> &Cursors {
        &self.cursors
    }

    /// Frames per second at the configured dot clock and current totals.
    pub fn frame_rate(&self) -> f64 {
        self.dot_clock_hz as f64 / self.screen.frame_period() as f64
    }

    /// Chip reset, as triggered by P#7 bit 0.
    pub fn reset(&mut self) {
        log::debug!("reset");
        self.ports = [0; PORT_COUNT];
        for reg in (0..=38).chain(RESET_EXTRA) {
            self.regs[reg] = 0;
        }
        self.vram.clear();
        self.lines = InterruptLines::default();

        let c = &mut self.cursors;
        c.color_state_r = 0;
        c.color_state_w = 0;
        c.read_phase.reset();
        c.write_phase.reset();
        c.register_address = 0;
        c.register_autoinc_r = false;
        c.register_autoinc_w = false;

        for reg in 0..=38 {
            self.apply_register(reg, 0);
        }
        for address in 0..PALETTE_ENTRIES {
            self.commit_colour(address);
        }
        self.tilemap_resize = true;
        self.screen_resize = true;
    }
}
