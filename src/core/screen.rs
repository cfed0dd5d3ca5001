// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Raster screen model: total geometry, visible area and beam position.

use super::bitmap::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    htotal: u32,
    vtotal: u32,
    visible: Rect,
    beam: u64,
    frame: u64,
}

impl Screen {
    pub fn new(htotal: u32, vtotal: u32, visible: Rect) -> Self {
        Self {
            htotal: htotal.max(1),
            vtotal: vtotal.max(1),
            visible,
            beam: 0,
            frame: 0,
        }
    }

    /// Change the geometry. The beam keeps its position modulo the new frame.
    pub fn configure(&mut self, htotal: u32, vtotal: u32, visible: Rect) {
        self.htotal = htotal.max(1);
        self.vtotal = vtotal.max(1);
        self.visible = visible;
        self.beam %= self.frame_period();
    }

    pub fn width(&self) -> u32 {
        self.htotal
    }

    pub fn height(&self) -> u32 {
        self.vtotal
    }

    pub fn visible_area(&self) -> Rect {
        self.visible
    }

    /// Dots per frame.
    pub fn frame_period(&self) -> u64 {
        self.htotal as u64 * self.vtotal as u64
    }

    pub fn hpos(&self) -> u32 {
        (self.beam % self.htotal as u64) as u32
    }

    pub fn vpos(&self) -> u32 {
        (self.beam / self.htotal as u64) as u32
    }

    /// Dots elapsed since the start of the current frame.
    pub fn beam_position(&self) -> u64 {
        self.beam
    }

    pub fn frame_number(&self) -> u64 {
        self.frame
    }

    pub fn hblank(&self) -> bool {
        let h = self.hpos() as i32;
        h < self.visible.min_x || h > self.visible.max_x
    }

    pub fn vblank(&self) -> bool {
        let v = self.vpos() as i32;
        v < self.visible.min_y || v > self.visible.max_y
    }

    pub fn advance(&mut self, dots: u64) {
        let period = self.frame_period();
        let total = self.beam + dots;
        self.frame += total / period;
        self.beam = total % period;
    }

    /// Dots until the beam next reaches (`vpos`, `hpos`). Never zero: a
    /// position equal to the current one is a full frame away.
    pub fn time_until_pos(&self, vpos: u32, hpos: u32) -> u64 {
        let period = self.frame_period();
        let mut target = vpos as u64 * self.htotal as u64 + hpos as u64;
        while target <= self.beam {
            target += period;
        }
        target - self.beam
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Screen {
        Screen::new(100, 10, Rect::new(0, 79, 0, 7))
    }

    #[test]
    fn beam_wraps_into_next_frame() {
        let mut screen = screen();
        screen.advance(1_050);
        assert_eq!(screen.frame_number(), 1);
        assert_eq!(screen.vpos(), 0);
        assert_eq!(screen.hpos(), 50);
    }

    #[test]
    fn time_until_pos_wraps() {
        let mut screen = screen();
        assert_eq!(screen.time_until_pos(2, 10), 210);
        screen.advance(210);
        assert_eq!(screen.time_until_pos(2, 10), 1_000);
        assert_eq!(screen.time_until_pos(0, 0), 790);
    }

    #[test]
    fn blanking_follows_visible_area() {
        let mut screen = screen();
        assert!(!screen.hblank());
        assert!(!screen.vblank());
        screen.advance(85);
        assert!(screen.hblank());
        screen.advance(800);
        assert!(screen.vblank());
    }
}
