// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Rect {
    pub const fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
        }
    }
}

/// Indexed 16-bit frame buffer. Each pixel is a palette pen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<u16>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, self.width as i32 - 1, 0, self.height as i32 - 1)
    }

    /// Resize the bitmap; the contents are cleared.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    pub fn pix(&self, x: i32, y: i32) -> u16 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.pixels[y as usize * self.width + x as usize]
    }

    pub fn set_pix(&mut self, x: i32, y: i32, pen: u16) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.pixels[y as usize * self.width + x as usize] = pen;
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn fill(&mut self, pen: u16, clip: &Rect) {
        let clip = clip.intersect(&self.bounds());
        if clip.is_empty() {
            return;
        }
        for y in clip.min_y..=clip.max_y {
            let row = y as usize * self.width;
            self.pixels[row + clip.min_x as usize..=row + clip.max_x as usize].fill(pen);
        }
    }

    /// Opaque copy of `src` inside `clip`.
    pub fn copy_from(&mut self, src: &Bitmap, clip: &Rect) {
        let clip = clip.intersect(&self.bounds()).intersect(&src.bounds());
        if clip.is_empty() {
            return;
        }
        for y in clip.min_y..=clip.max_y {
            let dst_row = y as usize * self.width;
            let src_row = y as usize * src.width;
            let (lo, hi) = (clip.min_x as usize, clip.max_x as usize);
            self.pixels[dst_row + lo..=dst_row + hi]
                .copy_from_slice(&src.pixels[src_row + lo..=src_row + hi]);
        }
    }

    /// Copy of `src` inside `clip`, skipping pixels equal to `transparent`.
    pub fn copy_trans_from(&mut self, src: &Bitmap, clip: &Rect, transparent: u16) {
        let clip = clip.intersect(&self.bounds()).intersect(&src.bounds());
        if clip.is_empty() {
            return;
        }
        for y in clip.min_y..=clip.max_y {
            for x in clip.min_x..=clip.max_x {
                let pen = src.pix(x, y);
                if pen != transparent {
                    self.set_pix(x, y, pen);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_clipped_to_bounds() {
        let mut bitmap = Bitmap::new(4, 4);
        bitmap.fill(7, &Rect::new(-5, 1, 2, 10));
        assert_eq!(bitmap.pix(0, 2), 7);
        assert_eq!(bitmap.pix(1, 3), 7);
        assert_eq!(bitmap.pix(2, 2), 0);
        assert_eq!(bitmap.pix(0, 1), 0);
    }

    #[test]
    fn transparent_copy_keeps_destination() {
        let mut src = Bitmap::new(2, 1);
        src.set_pix(1, 0, 5);
        let mut dst = Bitmap::new(2, 1);
        dst.fill(9, &dst.bounds());
        dst.copy_trans_from(&src, &src.bounds(), 0);
        assert_eq!(dst.pixels(), &[9, 5]);

        dst.copy_from(&src, &src.bounds());
        assert_eq!(dst.pixels(), &[0, 5]);
    }

    #[test]
    fn out_of_range_access_is_ignored() {
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.set_pix(5, 5, 1);
        assert_eq!(bitmap.pix(-1, 0), 0);
        assert!(Rect::new(3, 2, 0, 0).is_empty());
    }
}
