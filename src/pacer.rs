// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Randomized inter-request delay between tournament probes, to avoid
//! tripping the upstream's rate-limit ban.

use std::time::Duration;

use rand::RngExt;

/// Sleeps for `delay * (1 + U(-0.25, +0.25))`. Pure delay — it never
/// suspends independent tasks, only the caller's own await point.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn jittered_duration(&self) -> Duration {
        let jitter = rand::rng().random_range(-0.25..=0.25);
        self.delay.mul_f64(1.0 + jitter)
    }

    pub async fn delay(&self) {
        tokio::time::sleep(self.jittered_duration()).await;
    }
}
