// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Construction-time settings for a [`crate::Ygv608`].

use crate::error::{Result, VdpError};
use crate::variant::Variant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-config", serde(rename_all = "kebab-case"))]
pub enum VariantKind {
    #[default]
    Ygv608,
    Scrambled,
}

impl VariantKind {
    pub fn variant(self) -> Variant {
        match self {
            VariantKind::Ygv608 => Variant::YGV608,
            VariantKind::Scrambled => Variant::SCRAMBLED,
        }
    }
}

/// Power-on raster geometry, used until the CRTC registers are programmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-config", serde(default))]
pub struct ScreenConfig {
    pub htotal: u32,
    pub vtotal: u32,
    pub visible_width: u32,
    pub visible_height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            htotal: 424,
            vtotal: 262,
            visible_width: 288,
            visible_height: 224,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-config", serde(default))]
pub struct VdpConfig {
    pub variant: VariantKind,
    /// Board-level pattern ROM bank.
    pub gfx_bank: u8,
    /// Dot clock in Hz; only used to report timing.
    pub dot_clock_hz: u32,
    pub screen: ScreenConfig,
}

impl Default for VdpConfig {
    fn default() -> Self {
        Self {
            variant: VariantKind::default(),
            gfx_bank: 0,
            dot_clock_hz: 6_144_000,
            screen: ScreenConfig::default(),
        }
    }
}

impl VdpConfig {
    /// Reject geometry the raster model cannot represent.
    pub fn validate(&self) -> Result<()> {
        let screen = &self.screen;
        if screen.htotal == 0 || screen.vtotal == 0 {
            return Err(VdpError::Config("screen totals must be non-zero".into()));
        }
        if screen.visible_width == 0
            || screen.visible_height == 0
            || screen.visible_width > screen.htotal
            || screen.visible_height > screen.vtotal
        {
            return Err(VdpError::Config(format!(
                "visible area {}x{} does not fit in {}x{}",
                screen.visible_width, screen.visible_height, screen.htotal, screen.vtotal
            )));
        }
        if self.dot_clock_hz == 0 {
            return Err(VdpError::Config("dot clock must be non-zero".into()));
        }
        Ok(())
    }

    /// Frames per second at the configured dot clock.
    pub fn refresh_rate(&self) -> f64 {
        self.dot_clock_hz as f64 / (self.screen.htotal as f64 * self.screen.vtotal as f64)
    }

    #[cfg(feature = "serde-config")]
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: VdpConfig =
            serde_yaml::from_str(text).map_err(|e| VdpError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = VdpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.variant.variant(), Variant::YGV608);
        assert!((config.refresh_rate() - 55.3).abs() < 0.1);
    }

    #[test]
    fn oversized_visible_area_is_rejected() {
        let mut config = VdpConfig::default();
        config.screen.visible_width = 500;
        assert!(matches!(config.validate(), Err(VdpError::Config(_))));
    }

    #[cfg(feature = "serde-config")]
    #[test]
    fn yaml_overrides_defaults() {
        let config = VdpConfig::from_yaml("variant: scrambled\ngfx_bank: 1\n").unwrap();
        assert_eq!(config.variant, VariantKind::Scrambled);
        assert_eq!(config.gfx_bank, 1);
        assert_eq!(config.screen, ScreenConfig::default());
    }
}
