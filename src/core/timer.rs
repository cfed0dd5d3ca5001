// Copyright (C) 2025 Dayton Fishell
// YGV608 Video Display Controller Emulator
// This file is part of ygv608.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dot-clock timer owned by a device.
//!
//! Delays are measured in dots. A delay of `None` means "never"; an armed
//! timer with a period re-arms itself every time it expires.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    remaining: Option<u64>,
    period: Option<u64>,
}

impl Timer {
    pub const fn new() -> Self {
        Self {
            remaining: None,
            period: None,
        }
    }

    /// Arm the timer to expire after `delay` dots, then every `period` dots.
    pub fn adjust(&mut self, delay: Option<u64>, period: Option<u64>) {
        self.remaining = delay;
        self.period = period.filter(|&p| p > 0);
    }

    /// Disarm the timer.
    pub fn reset(&mut self) {
        self.remaining = None;
        self.period = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Dots left until the next expiry.
    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Let `dots` elapse. Returns true when the timer expired.
    ///
    /// Callers never step past an expiry: `dots` is at most [`Timer::remaining`].
    pub fn elapse(&mut self, dots: u64) -> bool {
        let Some(left) = self.remaining else {
            return false;
        };
        let left = left.saturating_sub(dots);
        if left == 0 {
            self.remaining = self.period;
            true
        } else {
            self.remaining = Some(left);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_expires_once() {
        let mut timer = Timer::new();
        timer.adjust(Some(10), None);
        assert!(!timer.elapse(9));
        assert!(timer.elapse(1));
        assert!(!timer.is_armed());
        assert!(!timer.elapse(100));
    }

    #[test]
    fn periodic_rearms() {
        let mut timer = Timer::new();
        timer.adjust(Some(4), Some(16));
        assert!(timer.elapse(4));
        assert_eq!(timer.remaining(), Some(16));
        assert!(timer.elapse(16));
        assert_eq!(timer.remaining(), Some(16));
    }

    #[test]
    fn never_does_not_fire() {
        let mut timer = Timer::new();
        timer.adjust(None, Some(10));
        assert!(!timer.is_armed());
        assert!(!timer.elapse(u64::MAX));
    }
}
