// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

/// Errors surfaced by host-facing operations. Port and register traffic
/// never fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VdpError {
    #[error("snapshot {table} holds {actual} bytes, expected {expected}")]
    SnapshotSize {
        table: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("snapshot palette cursor {0} out of range")]
    SnapshotCursor(u8),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VdpError>;
