// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Yamaha YGV608 Video Display Processor
//!
//! This library emulates the YGV608 pattern-mode VDP: its port and
//! register interface, the pattern name, sprite, scroll and palette RAM,
//! the CRTC with its vblank and raster interrupts, and frame composition
//! of two tile planes, rotate/zoom and sprites.

pub mod config;
pub mod core;
pub mod error;
pub mod gfx;
pub mod palette;
pub mod tilemap;
pub mod variant;
pub mod vdp;

// Re-export commonly used types
pub use config::{VariantKind, VdpConfig};
pub use crate::core::{Bitmap, Rect};
pub use error::{Result, VdpError};
pub use gfx::GfxRom;
pub use palette::{Palette, Rgb};
pub use variant::Variant;
pub use vdp::{InterruptLines, Port, Snapshot, Ygv608};
