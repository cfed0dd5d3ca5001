// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Save states.
//!
//! A snapshot holds what the chip itself stores: registers, ports, the RAM
//! tables and the access cursors. Everything derived from them (decoded
//! fields, page geometry, tilemaps, timers) is rebuilt on restore.

use super::ports::Cursors;
use super::roz::Roz;
use super::{PATTERN_NAME_BYTES, PORT_COUNT, REGISTER_COUNT, SCROLL_TABLE_BYTES, SPRITE_TABLE_BYTES, Ygv608};
use crate::error::{Result, VdpError};
use crate::palette::PALETTE_ENTRIES;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-config", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub registers: Vec<u8>,
    pub ports: Vec<u8>,
    pub pattern_names: Vec<u8>,
    pub sprites: Vec<u8>,
    /// Plane A table followed by plane B.
    pub scroll: Vec<u8>,
    /// R, G, B triplets.
    pub colours: Vec<u8>,
    pub cursors: Cursors,
    pub roz: Roz,
    pub gfx_bank: u8,
}

fn check_len(table: &'static str, data: &[u8], expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(VdpError::SnapshotSize {
            table,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

impl Snapshot {
    fn validate(&self) -> Result<()> {
        check_len("registers", &self.registers, REGISTER_COUNT)?;
        check_len("ports", &self.ports, PORT_COUNT)?;
        check_len("pattern names", &self.pattern_names, PATTERN_NAME_BYTES)?;
        check_len("sprites", &self.sprites, SPRITE_TABLE_BYTES)?;
        check_len("scroll", &self.scroll, SCROLL_TABLE_BYTES * 2)?;
        check_len("colours", &self.colours, PALETTE_ENTRIES * 3)?;
        for state in [self.cursors.color_state_r, self.cursors.color_state_w] {
            if state >= 3 {
                return Err(VdpError::SnapshotCursor(state));
            }
        }
        Ok(())
    }
}

impl Ygv608 {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registers: self.regs.to_vec(),
            ports: self.ports.to_vec(),
            pattern_names: self.vram.pattern_names.to_vec(),
            sprites: self.vram.sprites.to_vec(),
            scroll: self.vram.scroll.concat(),
            colours: self.vram.colours.concat(),
            cursors: self.cursors,
            roz: self.roz,
            gfx_bank: self.gfx_bank,
        }
    }

    /// Load a snapshot. The device is untouched if the snapshot is malformed.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        snapshot.validate()?;

        self.ports.copy_from_slice(&snapshot.ports);
        self.vram.pattern_names.copy_from_slice(&snapshot.pattern_names);
        self.vram.sprites.copy_from_slice(&snapshot.sprites);
        for (plane, chunk) in self.vram.scroll.iter_mut().zip(snapshot.scroll.chunks_exact(SCROLL_TABLE_BYTES)) {
            plane.copy_from_slice(chunk);
        }
        for (entry, chunk) in self.vram.colours.iter_mut().zip(snapshot.colours.chunks_exact(3)) {
            entry.copy_from_slice(chunk);
        }

        // replaying re-derives decoded state, geometry and the CRTC
        for (reg, &data) in snapshot.registers.iter().enumerate() {
            self.apply_register(reg, data);
        }
        self.cursors = snapshot.cursors;
        self.roz = snapshot.roz;
        self.gfx_bank = snapshot.gfx_bank;

        for address in 0..PALETTE_ENTRIES {
            self.commit_colour(address);
        }
        self.lines = Default::default();
        self.check_vblank_irq();
        self.check_raster_irq();
        self.tilemap_resize = true;
        self.screen_resize = true;
        log::debug!("state restored");
        Ok(())
    }
}
