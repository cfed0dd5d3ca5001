// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Frame composition.
//!
//! Plane B is drawn first, then sprites and plane A in the order the
//! priority field selects. Each plane goes through the work bitmap so the
//! CTPA/CTPB bits can choose between an opaque and a transparent copy.

use super::Ygv608;
use super::addressing::{Plane, TileResolver};
use super::sprites::{self, SPRITE_PLANE};
use crate::core::{Bitmap, Rect};
use crate::tilemap::Tilemap;
use crate::variant::Background;

impl Ygv608 {
    /// Compose the current frame into `bitmap` inside `clip`.
    pub fn update_screen(&mut self, bitmap: &mut Bitmap, clip: &Rect) {
        let background = match self.variant.background {
            Background::Border => self.decoded.border_color as u16,
            Background::Pen(pen) => pen,
        };
        bitmap.fill(background, clip);

        if !self.decoded.geometry.is_valid() {
            return;
        }

        if self.screen_resize || self.work.width() != bitmap.width() || self.work.height() != bitmap.height() {
            self.work.resize(bitmap.width(), bitmap.height());
            self.screen_resize = false;
        }
        if self.tilemap_resize {
            self.rebuild_tilemaps();
        }
        self.apply_scroll();

        let single_plane = self.decoded.mode.is_single_plane();
        let dspe = self.decoded.dspe;
        {
            let (a, b) = self.cache.pair_mut();
            a.enable(dspe);
            b.enable(dspe && !single_plane);
            a.mark_all_dirty();
            b.mark_all_dirty();
        }

        self.work.fill(0, clip);
        if !single_plane {
            self.draw_plane(Plane::B, clip);
            if self.decoded.trans_b {
                bitmap.copy_trans_from(&self.work, clip, 0);
            } else {
                bitmap.copy_from(&self.work, clip);
            }
        }

        self.work.fill(0, clip);
        let behind_a = self.decoded.priority.sprites_behind_a();
        if behind_a {
            self.draw_sprites(bitmap, clip);
        }
        self.draw_plane(Plane::A, clip);
        if self.decoded.trans_a {
            bitmap.copy_trans_from(&self.work, clip, 0);
        } else {
            bitmap.copy_from(&self.work, clip);
        }
        if !behind_a {
            self.draw_sprites(bitmap, clip);
        }
    }

    /// Render one frame at the size of the visible area.
    pub fn render_frame(&mut self) -> Bitmap {
        let visible = self.screen.visible_area();
        let mut bitmap = Bitmap::new(visible.width().max(0) as usize, visible.height().max(0) as usize);
        let clip = bitmap.bounds();
        self.update_screen(&mut bitmap, &clip);
        bitmap
    }

    fn rebuild_tilemaps(&mut self) {
        let d = &self.decoded;
        self.cache.select(d.geometry.cache_index(), d.pattern_size);
        let columns = d.geometry.page_x as u32;
        let (a, b) = self.cache.pair_mut();
        a.set_transparent_pen(0);
        for map in [a, b] {
            map.set_scroll_cols(columns);
            map.mark_all_dirty();
        }
        let bounds = self.work.bounds();
        self.work.fill(0, &bounds);
        self.tilemap_resize = false;
        log::debug!(
            "tilemaps rebuilt: cache slot {}, {}x{} page",
            self.cache.active_index(),
            d.geometry.page_x,
            d.geometry.page_y
        );
    }

    /// Load the per-column vertical and global horizontal scroll.
    fn apply_scroll(&mut self) {
        let d = &self.decoded;
        let (a, b) = self.cache.pair_mut();
        for (plane, map) in [(Plane::A, a), (Plane::B, b)] {
            let table = &self.vram.scroll[plane.index()];
            for col in 0..map.scroll_cols() {
                let entry = d.geometry.col_division(d.v_div_size, col as u32);
                let value = table[entry] as i32 | (table[entry + 1] as i32) << 8;
                map.set_scrolly(col, value);
            }
            map.set_scrollx(table[0x80] as i32 | (table[0x81] as i32) << 8);
        }
    }

    fn draw_plane(&mut self, plane: Plane, clip: &Rect) {
        let d = &self.decoded;
        let set = TileResolver::set_for(plane, d.mode, d.pattern_size);
        let resolver = TileResolver {
            plane,
            set,
            decoded: d,
            vram: &self.vram,
            decrypt: self.variant.decrypt,
            gfx_bank: self.gfx_bank,
            elements: self.gfx.elements(set),
        };
        let (a, b) = self.cache.pair_mut();
        let map: &mut Tilemap = match plane {
            Plane::A => a,
            Plane::B => b,
        };
        let resolve = &mut |row, col| resolver.resolve(row, col);
        if d.zron {
            let affine = self.roz.affine();
            map.draw_roz(&self.gfx, &mut self.work, clip, &affine, !d.roz_wrap_disable, resolve);
        } else {
            map.draw(&self.gfx, &mut self.work, clip, resolve);
        }
    }

    fn draw_sprites(&self, bitmap: &mut Bitmap, clip: &Rect) {
        let clip = Rect::new(0, SPRITE_PLANE - 1, 0, SPRITE_PLANE - 1).intersect(clip);
        for blit in sprites::build_draw_list(&self.vram.sprites, &self.decoded, &self.gfx, self.gfx_bank) {
            self.gfx.draw_transpen(bitmap, &clip, &blit, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::GfxRom;
    use crate::variant::Variant;
    use crate::vdp::Port;
    use pretty_assertions::assert_eq;

    /// Pattern N (8x8, 4bpp) filled with pixel N & 0xF.
    fn solid_rom() -> GfxRom {
        let mut data = Vec::with_capacity(0x100 * 32);
        for code in 0..0x100u32 {
            let nibble = (code & 0x0F) as u8;
            data.extend(std::iter::repeat_n((nibble << 4) | nibble, 32));
        }
        GfxRom::new(data)
    }

    fn set_reg(vdp: &mut Ygv608, reg: u8, data: u8) {
        vdp.write_port(Port::RegisterSelect, reg);
        vdp.write_port(Port::RegisterData, data);
    }

    /// Display on, 2-plane 8-bit names, 64x32 pages, 8x8 patterns.
    fn vdp() -> Ygv608 {
        let mut vdp = Ygv608::new(solid_rom());
        set_reg(&mut vdp, 7, 0x01);
        vdp
    }

    fn frame(vdp: &mut Ygv608) -> Bitmap {
        let mut bitmap = Bitmap::new(64, 32);
        let clip = bitmap.bounds();
        vdp.update_screen(&mut bitmap, &clip);
        bitmap
    }

    #[test]
    fn zero_geometry_draws_background_only() {
        // nothing has set up a page yet
        let mut vdp = Ygv608::new(solid_rom());
        vdp.vram.pattern_names.fill(3);
        set_reg(&mut vdp, 13, 0x21);
        let bitmap = frame(&mut vdp);
        assert!(bitmap.pixels().iter().all(|&p| p == 0x21));
    }

    #[test]
    fn scrambled_variant_fills_fixed_pen() {
        let mut vdp = Ygv608::new(solid_rom());
        vdp.variant = Variant::SCRAMBLED;
        set_reg(&mut vdp, 13, 0x21);
        let mut bitmap = Bitmap::new(16, 16);
        bitmap.fill(0x55, &Rect::new(0, 15, 0, 15));
        let clip = bitmap.bounds();
        vdp.update_screen(&mut bitmap, &clip);
        assert!(bitmap.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn plane_a_is_transparent_over_plane_b() {
        let mut vdp = vdp();
        set_reg(&mut vdp, 11, 0x01);
        let b = vdp.decoded.geometry.plane_b_base();
        // plane A cell (0, 0) = pattern 0 (transparent), cell (0, 1) = 3
        vdp.vram.pattern_names[1] = 3;
        for i in 0..64 {
            vdp.vram.pattern_names[b + i] = 5;
        }
        let bitmap = frame(&mut vdp);
        assert_eq!(bitmap.pix(0, 0), 5);
        assert_eq!(bitmap.pix(8, 0), 3);
        assert!(!vdp.tilemap_resize);
    }

    #[test]
    fn transparent_copies_let_the_border_show() {
        let mut vdp = vdp();
        set_reg(&mut vdp, 13, 0x40);
        let bitmap = frame(&mut vdp);
        // opaque copies of all-zero planes
        assert_eq!(bitmap.pix(0, 0), 0);

        set_reg(&mut vdp, 11, 0x03);
        let bitmap = frame(&mut vdp);
        assert_eq!(bitmap.pix(0, 0), 0x40);
    }

    #[test]
    fn horizontal_scroll_shifts_plane_a() {
        let mut vdp = vdp();
        vdp.vram.pattern_names[2] = 7;
        vdp.vram.scroll[0][0x80] = 8;
        let bitmap = frame(&mut vdp);
        assert_eq!(bitmap.pix(8, 0), 7);
        assert_eq!(bitmap.pix(16, 0), 0);
    }

    #[test]
    fn sprite_priority_against_plane_a() {
        let mut vdp = vdp();
        set_reg(&mut vdp, 11, 0x01);
        vdp.vram.pattern_names[0] = 2;
        // slot 0: pattern 9 on line 0, (0x1FF + 1) & 0x1FF
        vdp.vram.sprites[..4].copy_from_slice(&[0xFF, 0x00, 0x01, 9]);
        let bitmap = frame(&mut vdp);
        assert_eq!(bitmap.pix(0, 0), 9);

        // ASBDEX: plane A covers the sprite
        set_reg(&mut vdp, 11, 0x05);
        let bitmap = frame(&mut vdp);
        assert_eq!(bitmap.pix(0, 0), 2);

        vdp.vram.pattern_names[0] = 0;
        let bitmap = frame(&mut vdp);
        assert_eq!(bitmap.pix(0, 0), 9);
    }

    #[test]
    fn display_disable_blanks_pattern_planes() {
        // reset leaves a valid 64x32 page with DSPE off
        let mut vdp = Ygv608::new(solid_rom());
        vdp.reset();
        assert!(vdp.decoded.geometry.is_valid());
        vdp.vram.pattern_names.fill(3);
        set_reg(&mut vdp, 13, 0x21);

        // opaque copies of empty planes
        let bitmap = frame(&mut vdp);
        assert!(bitmap.pixels().iter().all(|&p| p == 0));

        set_reg(&mut vdp, 11, 0x03);
        let bitmap = frame(&mut vdp);
        assert!(bitmap.pixels().iter().all(|&p| p == 0x21));

        // a page size write while blanked keeps the planes off
        set_reg(&mut vdp, 8, 0x01);
        let bitmap = frame(&mut vdp);
        assert!(bitmap.pixels().iter().all(|&p| p == 0x21));

        set_reg(&mut vdp, 8, 0x00);
        set_reg(&mut vdp, 7, 0x01);
        let bitmap = frame(&mut vdp);
        assert_eq!(bitmap.pix(0, 0), 3);
    }

    #[test]
    fn roz_plane_wraps_unless_disabled() {
        let mut vdp = Ygv608::new(solid_rom());
        // ZRON and DSPE, both planes transparent over the border
        set_reg(&mut vdp, 7, 0x09);
        set_reg(&mut vdp, 11, 0x03);
        set_reg(&mut vdp, 13, 0x21);
        // unit steps on both axes, starting 8 dots left of the page
        for (reg, data) in [(25, 0x00), (26, 0xF0), (27, 0x1F), (28, 0x00), (29, 0x02), (35, 0x00), (36, 0x02)] {
            set_reg(&mut vdp, reg, data);
        }
        vdp.vram.pattern_names[0] = 4;
        vdp.vram.pattern_names[63] = 6;

        let bitmap = frame(&mut vdp);
        assert_eq!(bitmap.pix(8, 0), 4);
        // column 63 wraps round to the left edge
        assert_eq!(bitmap.pix(0, 0), 6);
        assert_eq!(bitmap.pix(7, 0), 6);

        // RLRT
        set_reg(&mut vdp, 8, 0x08);
        let bitmap = frame(&mut vdp);
        assert_eq!(bitmap.pix(0, 0), 0x21);
        assert_eq!(bitmap.pix(8, 0), 4);
    }

    #[test]
    fn render_frame_uses_visible_area() {
        let mut vdp = vdp();
        let bitmap = vdp.render_frame();
        let visible = vdp.screen().visible_area();
        assert_eq!(bitmap.width() as i32, visible.width());
        assert_eq!(bitmap.height() as i32, visible.height());
    }
}
