// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Display scan control (R#39 - R#46), raster and vblank interrupts.

use super::Ygv608;
use super::ports::Port;
use super::registers::Status;
use crate::core::Rect;

/// Interrupt outputs. Lines stay asserted until acknowledged through P#6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptLines {
    pub vblank: bool,
    pub raster: bool,
}

/// CRTC geometry in dots and lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crtc {
    pub htotal: u16,
    pub vtotal: u16,
    pub display_hstart: u16,
    pub display_vstart: u16,
    pub display_width: u16,
    pub display_height: u16,
    pub display_hsync: u16,
    pub display_vsync: u16,
    pub border_width: u16,
    pub border_height: u16,
}

impl Ygv608 {
    pub(crate) fn write_crtc(&mut self, reg: usize, data: u8) {
        let data16 = data as u16;
        let crtc = &mut self.crtc;
        let (old_htotal, old_vtotal) = (crtc.htotal, crtc.vtotal);
        match reg {
            39 => {
                crtc.display_hsync = ((data16 >> 5) & 0x07) * 16;
                crtc.border_width = (data16 & 0x1F) * 16;
            }
            40 => {
                let width = (data16 & 0x3F) * 16;
                crtc.htotal = (crtc.htotal & !0x600) | ((data16 & 0xC0) << 3);
                if width != crtc.display_width {
                    self.screen_resize = true;
                }
                crtc.display_width = width;
            }
            41 => crtc.display_hstart = (crtc.display_hstart & !0x1FE) | (data16 << 1),
            42 => crtc.htotal = (crtc.htotal & !0x1FE) | (data16 << 1),
            43 => {
                crtc.display_vsync = (data16 >> 5) & 0x07;
                crtc.border_height = (data16 & 0x1F) * 8;
            }
            44 => {
                let height = (data16 & 0x3F) * 8;
                if height != crtc.display_height {
                    self.screen_resize = true;
                }
                crtc.display_height = height;
            }
            45 => {
                crtc.vtotal = (crtc.vtotal & !0x100) | (((data16 >> 7) & 1) << 8);
                crtc.display_vstart = data16 & 0x3F;
            }
            46 => {
                crtc.vtotal = (crtc.vtotal & !0xFF) | data16;
                self.screen_configure();
                return;
            }
            _ => return,
        }

        let totals_changed = (self.crtc.htotal, self.crtc.vtotal) != (old_htotal, old_vtotal);
        if self.screen_configured && totals_changed {
            self.screen_configure();
        }
    }

    /// Apply the CRTC geometry to the raster model and re-arm both timers.
    pub(crate) fn screen_configure(&mut self) {
        let crtc = self.crtc;
        let width = crtc.display_width as u32 / 2;
        let height = crtc.display_height as u32;
        let htotal = crtc.htotal as u32 / 2;
        let vtotal = crtc.vtotal as u32;
        if width == 0 || height == 0 || htotal == 0 || vtotal == 0 {
            log::warn!(
                "ignoring degenerate CRTC geometry: display {width}x{height}, total {htotal}x{vtotal}"
            );
            return;
        }

        let visible = Rect::new(0, width as i32 - 1, 0, height as i32 - 1);
        self.screen.configure(htotal, vtotal, visible);
        self.screen_configured = true;
        log::debug!("screen configured: {width}x{height} visible, {htotal}x{vtotal} total");

        self.vblank_timer.reset();
        let frame = self.screen.frame_period();
        self.vblank_timer
            .adjust(Some(self.screen.time_until_pos(height, 0)), Some(frame));
        self.rearm_raster();
    }

    /// Dots until the programmed raster position, or `None` if it can never
    /// be reached.
    fn raster_sync_offset(&self) -> Option<u64> {
        let d = &self.decoded;
        if d.raster_hpos > self.crtc.htotal || d.raster_vpos > self.crtc.vtotal {
            return None;
        }
        if d.raster_mode {
            log::warn!("raster interrupt mode 1 is not supported");
            return None;
        }
        Some(
            self.screen
                .time_until_pos(d.raster_vpos as u32, d.raster_hpos as u32),
        )
    }

    pub(crate) fn rearm_raster(&mut self) {
        self.raster_timer.reset();
        let delay = self.raster_sync_offset();
        self.raster_timer.adjust(delay, None);
    }

    pub(crate) fn check_vblank_irq(&mut self) {
        if self.decoded.vblank_mask && self.status().contains(Status::FV) {
            self.lines.vblank = true;
        }
    }

    pub(crate) fn check_raster_irq(&mut self) {
        if self.decoded.raster_mask && self.status().contains(Status::FP) {
            self.lines.raster = true;
        }
    }

    fn status(&self) -> Status {
        Status::from_bits_truncate(self.ports[Port::Status as usize])
    }

    fn latch_status(&mut self, flag: Status) {
        self.ports[Port::Status as usize] |= flag.bits();
    }

    fn on_vblank(&mut self) {
        self.latch_status(Status::FV);
        self.check_vblank_irq();
    }

    fn on_raster(&mut self) {
        self.latch_status(Status::FP);
        self.check_raster_irq();
        self.rearm_raster();
    }

    /// Move the beam forward by `dots`, firing the vblank and raster timers
    /// as they expire.
    pub fn advance(&mut self, dots: u64) {
        let mut left = dots;
        while left > 0 {
            let step = [self.vblank_timer.remaining(), self.raster_timer.remaining()]
                .into_iter()
                .flatten()
                .fold(left, u64::min);
            self.screen.advance(step);
            left -= step;
            let vblank = self.vblank_timer.elapse(step);
            let raster = self.raster_timer.elapse(step);
            if vblank {
                self.on_vblank();
            }
            if raster {
                self.on_raster();
            }
        }
    }

    /// Run until the start of the next frame.
    pub fn run_frame(&mut self) {
        let remaining = self.screen.frame_period() - self.screen.beam_position();
        self.advance(remaining);
    }

    pub fn lines(&self) -> InterruptLines {
        self.lines
    }

    pub fn crtc(&self) -> &Crtc {
        &self.crtc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::GfxRom;

    /// 256x224 visible in a 320x262 frame.
    fn configured() -> Ygv608 {
        let mut vdp = Ygv608::new(GfxRom::default());
        vdp.apply_register(40, (640u16 >> 9 << 6) as u8 | (512u16 / 16) as u8);
        vdp.apply_register(42, ((640 >> 1) & 0xFF) as u8);
        vdp.apply_register(44, 224 / 8);
        vdp.apply_register(45, 0x80);
        vdp.apply_register(46, (262 & 0xFF) as u8);
        vdp
    }

    #[test]
    fn crtc_decode() {
        let vdp = configured();
        assert_eq!(vdp.crtc.htotal, 640);
        assert_eq!(vdp.crtc.vtotal, 262);
        assert_eq!(vdp.crtc.display_width, 512);
        assert_eq!(vdp.crtc.display_height, 224);
        assert_eq!(vdp.screen.width(), 320);
        assert_eq!(vdp.screen.height(), 262);
        assert_eq!(vdp.screen.visible_area(), Rect::new(0, 255, 0, 223));
        assert!(vdp.screen_resize);
    }

    #[test]
    fn hsync_and_border() {
        let mut vdp = Ygv608::new(GfxRom::default());
        vdp.apply_register(39, 0xA3);
        vdp.apply_register(43, 0x45);
        assert_eq!(vdp.crtc.display_hsync, 5 * 16);
        assert_eq!(vdp.crtc.border_width, 3 * 16);
        assert_eq!(vdp.crtc.display_vsync, 2);
        assert_eq!(vdp.crtc.border_height, 5 * 8);
    }

    #[test]
    fn degenerate_geometry_is_ignored() {
        let mut vdp = Ygv608::new(GfxRom::default());
        let before = vdp.screen.clone();
        vdp.apply_register(46, 0x10);
        assert_eq!(vdp.screen, before);
        assert!(!vdp.vblank_timer.is_armed());
    }

    #[test]
    fn vblank_fires_once_per_frame() {
        let mut vdp = configured();
        vdp.apply_register(14, 0x01);
        vdp.advance(224 * 320 - 1);
        assert!(!vdp.lines().vblank);
        vdp.advance(1);
        assert!(vdp.lines().vblank);
        assert_ne!(vdp.read_port(Port::Status) & Status::FV.bits(), 0);

        vdp.write_port(Port::Status, Status::FV.bits());
        assert!(!vdp.lines().vblank);
        vdp.advance(320 * 262);
        assert!(vdp.lines().vblank);
    }

    #[test]
    fn masked_vblank_is_raised_on_unmask() {
        let mut vdp = configured();
        vdp.advance(320 * 262);
        assert!(!vdp.lines().vblank);
        vdp.apply_register(14, 0x01);
        assert!(vdp.lines().vblank);
    }

    #[test]
    fn raster_fires_at_position() {
        let mut vdp = configured();
        vdp.apply_register(14, 0x02);
        vdp.apply_register(15, 100);
        vdp.apply_register(16, 0x02);
        vdp.advance(100 * 320 + 64 - 1);
        assert!(!vdp.lines().raster);
        vdp.advance(1);
        assert!(vdp.lines().raster);
        // re-armed for the next frame
        assert_eq!(vdp.raster_timer.remaining(), Some(320 * 262));
    }

    #[test]
    fn raster_beyond_totals_never_fires() {
        let mut vdp = configured();
        vdp.apply_register(14, 0x02);
        vdp.apply_register(15, 0xFF);
        vdp.apply_register(16, 0x40); // vpos 511 > vtotal
        assert!(!vdp.raster_timer.is_armed());
        vdp.advance(320 * 262 * 3);
        assert!(!vdp.lines().raster);
        assert_eq!(vdp.read_port(Port::Status) & Status::FP.bits(), 0);
    }

    #[test]
    fn raster_mode_one_is_disarmed() {
        let mut vdp = configured();
        vdp.apply_register(16, 0x80);
        assert!(!vdp.raster_timer.is_armed());
    }

    #[test]
    fn total_change_reconfigures_screen() {
        let mut vdp = configured();
        vdp.apply_register(42, ((800 >> 1) & 0xFF) as u8);
        assert_eq!(vdp.crtc.htotal, 512 | 288);
        assert_eq!(vdp.screen.width(), (512 + 288) / 2);
    }
}
