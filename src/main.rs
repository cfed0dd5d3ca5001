// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

// A simple demo program for the YGV608 emulator.
use anyhow::Result;
use ygv608_core::vdp::Status;
use ygv608_core::{GfxRom, Port, VdpConfig, Ygv608};

/// Checkerboard pattern ROM: pattern N alternates pixel N & 0xF with 0.
fn demo_rom() -> GfxRom {
    let mut data = Vec::with_capacity(0x100 * 32);
    for code in 0..0x100u32 {
        let pen = (code & 0x0F) as u8;
        for row in 0..8 {
            let pair = if row % 2 == 0 { pen << 4 } else { pen };
            data.extend([pair; 4]);
        }
    }
    GfxRom::new(data)
}

fn set_reg(vdp: &mut Ygv608, reg: u8, data: u8) {
    vdp.write_port(Port::RegisterSelect, reg);
    vdp.write_port(Port::RegisterData, data);
}

/// 256x224 visible inside a 320x262 frame.
fn program_crtc(vdp: &mut Ygv608) {
    // auto-increment through R#39 - R#46
    vdp.write_port(Port::RegisterSelect, 0x80 | 39);
    for data in [0x00, 0x40 | (512u16 / 16) as u8, 0x10, 0x40, 0x00, 224 / 8, 0x80, 0x06] {
        vdp.write_port(Port::RegisterData, data);
    }
}

fn program_scene(vdp: &mut Ygv608) {
    // display on, 2-plane 8-bit names, 64x32 pages, 8x8 patterns
    set_reg(vdp, 7, 0x01);
    // CTPA: plane A is transparent over plane B
    set_reg(vdp, 11, 0x01);
    // vblank and raster interrupts enabled, raster at line 100
    set_reg(vdp, 14, 0x03);
    set_reg(vdp, 15, 100);
    set_reg(vdp, 16, 0x00);

    // a 16-entry grey ramp, written as 6-bit triplets with auto-increment
    set_reg(vdp, 2, 0x80);
    set_reg(vdp, 5, 0);
    for level in 0..16u8 {
        for _ in 0..3 {
            vdp.write_port(Port::PaletteData, level * 4);
        }
    }

    // plane A: every ninth cell of the top row, X auto-increment from (0, 0)
    set_reg(vdp, 0, 0x00);
    set_reg(vdp, 1, 0x80);
    for i in 0..64u8 {
        vdp.write_port(Port::PatternName, if i % 9 == 0 { i & 0x0F } else { 0 });
    }

    // one sprite in the middle of the screen
    set_reg(vdp, 2, 0x02);
    set_reg(vdp, 3, 0);
    for data in [112, 128, 0x00, 0x0C] {
        vdp.write_port(Port::SpriteData, data);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("YGV608 Video Display Processor v0.1.0");
    println!("=====================================");
    println!();

    let config = VdpConfig::default();
    let mut vdp = Ygv608::with_config(demo_rom(), &config)?;

    println!("Programming CRTC and scene...");
    program_crtc(&mut vdp);
    program_scene(&mut vdp);

    let crtc = *vdp.crtc();
    println!("CRTC:");
    println!("  Total:       {}x{}", crtc.htotal, crtc.vtotal);
    println!("  Display:     {}x{}", crtc.display_width, crtc.display_height);
    println!("  Frame rate:  {:.2} Hz", vdp.frame_rate());
    println!();

    println!("Running one frame...");
    let mut vblanks = 0;
    let mut rasters = 0;
    let period = vdp.screen().frame_period();
    let line = vdp.screen().width() as u64;
    for _ in 0..period / line {
        vdp.advance(line);
        let lines = vdp.lines();
        if lines.vblank {
            vblanks += 1;
            vdp.write_port(Port::Status, Status::FV.bits());
        }
        if lines.raster {
            rasters += 1;
            vdp.write_port(Port::Status, Status::FP.bits());
        }
    }

    let frame = vdp.render_frame();
    let drawn = frame.pixels().iter().filter(|&&pen| pen != 0).count();
    let rgb = vdp.palette().resolve(&frame);
    let brightest = rgb.iter().max().copied().unwrap_or(0);

    println!("Frame complete!");
    println!();
    println!("Statistics:");
    println!("  Frame:        {}", vdp.screen().frame_number());
    println!("  Size:         {}x{}", frame.width(), frame.height());
    println!("  Vblank IRQs:  {}", vblanks);
    println!("  Raster IRQs:  {}", rasters);
    println!("  Drawn pixels: {}", drawn);
    println!("  Brightest:    #{:06X}", brightest);
    println!();

    vdp.log_registers();

    if vblanks == 1 && rasters == 1 && drawn > 0 {
        println!("✓ Demo frame rendered successfully!");
    } else {
        println!("✗ Demo frame did not render as expected.");
    }
    Ok(())
}
