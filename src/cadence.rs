// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::{Duration, Instant};

// Decides when the next poll is due on a fixed interval.
pub struct Cadence {
	interval: Duration,
	next: Instant,
}

impl Cadence {
	pub fn new(interval: Duration, now: Instant) -> Self {
		Self { interval, next: now + interval }
	}

	pub fn next(&self) -> Instant {
		self.next
	}

	// Ticks missed while the loop was busy collapse into a single one.
	pub fn is_due(&mut self, now: Instant) -> bool {
		if now < self.next {
			return false;
		}
		self.next += self.interval;
		if self.next <= now {
			self.next = now + self.interval;
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const INTERVAL: Duration = Duration::from_millis(5);

	#[test]
	fn nothing_is_due_before_the_first_interval() {
		let start = Instant::now();
		let mut cadence = Cadence::new(INTERVAL, start);
		assert!(!cadence.is_due(start));
		assert!(!cadence.is_due(start + Duration::from_millis(4)));
		assert_eq!(cadence.next(), start + INTERVAL);
	}

	#[test]
	fn due_ticks_stay_on_the_grid() {
		let start = Instant::now();
		let mut cadence = Cadence::new(INTERVAL, start);
		assert!(cadence.is_due(start + Duration::from_millis(6)));
		assert_eq!(cadence.next(), start + Duration::from_millis(10));
		assert!(!cadence.is_due(start + Duration::from_millis(9)));
		assert!(cadence.is_due(start + Duration::from_millis(10)));
		assert_eq!(cadence.next(), start + Duration::from_millis(15));
	}

	#[test]
	fn missed_ticks_do_not_burst() {
		let start = Instant::now();
		let mut cadence = Cadence::new(INTERVAL, start);
		let late = start + Duration::from_millis(100);
		assert!(cadence.is_due(late));
		assert_eq!(cadence.next(), late + INTERVAL);
		assert!(!cadence.is_due(late));
	}
}
