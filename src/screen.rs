// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use winit::dpi::{PhysicalPosition, PhysicalSize};

/// The bounding rectangle of every monitor, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VirtualScreen {
	pub left: i32,
	pub top: i32,
	pub width: i32,
	pub height: i32,
}

impl VirtualScreen {
	pub const FALLBACK: Self = Self { left: 0, top: 0, width: 1920, height: 1080 };

	pub fn query(window: &winit::window::Window) -> Option<Self> {
		#[cfg(target_os = "windows")]
		{
			let _ = window;
			Self::from_system_metrics()
		}
		#[cfg(not(target_os = "windows"))]
		{
			Self::from_monitors(window.available_monitors().map(|monitor| (monitor.position(), monitor.size())))
		}
	}

	#[cfg(target_os = "windows")]
	fn from_system_metrics() -> Option<Self> {
		use windows_sys::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN};

		let screen = unsafe {
			Self {
				left: GetSystemMetrics(SM_XVIRTUALSCREEN),
				top: GetSystemMetrics(SM_YVIRTUALSCREEN),
				width: GetSystemMetrics(SM_CXVIRTUALSCREEN),
				height: GetSystemMetrics(SM_CYVIRTUALSCREEN),
			}
		};
		(screen.width > 0 && screen.height > 0).then_some(screen)
	}

	#[cfg_attr(target_os = "windows", allow(dead_code))]
	pub fn from_monitors(monitors: impl IntoIterator<Item = (PhysicalPosition<i32>, PhysicalSize<u32>)>) -> Option<Self> {
		let mut bounds: Option<[i32; 4]> = None;
		for (position, size) in monitors {
			let right = position.x.saturating_add(i32::try_from(size.width).unwrap_or(i32::MAX));
			let bottom = position.y.saturating_add(i32::try_from(size.height).unwrap_or(i32::MAX));
			bounds = Some(match bounds {
				None => [position.x, position.y, right, bottom],
				Some([left, top, r, b]) => [left.min(position.x), top.min(position.y), r.max(right), b.max(bottom)],
			});
		}
		let [left, top, right, bottom] = bounds?;
		let screen = Self { left, top, width: right.saturating_sub(left), height: bottom.saturating_sub(top) };
		(screen.width > 0 && screen.height > 0).then_some(screen)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn monitor(x: i32, y: i32, width: u32, height: u32) -> (PhysicalPosition<i32>, PhysicalSize<u32>) {
		(PhysicalPosition::new(x, y), PhysicalSize::new(width, height))
	}

	#[test]
	fn single_monitor_is_the_virtual_screen() {
		assert_eq!(VirtualScreen::from_monitors([monitor(0, 0, 2560, 1440)]), Some(VirtualScreen { left: 0, top: 0, width: 2560, height: 1440 }));
	}

	#[test]
	fn monitors_are_bounded_together() {
		// A portrait monitor to the left of the primary, sitting higher up.
		let screen = VirtualScreen::from_monitors([monitor(0, 0, 1920, 1080), monitor(-1080, -420, 1080, 1920)]);
		assert_eq!(screen, Some(VirtualScreen { left: -1080, top: -420, width: 3000, height: 1920 }));
	}

	#[test]
	fn oversized_monitors_saturate() {
		let screen = VirtualScreen::from_monitors([monitor(0, 0, u32::MAX, u32::MAX), monitor(-200, -200, 1920, 1080)]);
		assert_eq!(screen, Some(VirtualScreen { left: -200, top: -200, width: i32::MAX, height: i32::MAX }));
	}

	#[test]
	fn no_monitors_means_no_screen() {
		assert_eq!(VirtualScreen::from_monitors([]), None);
		assert_eq!(VirtualScreen::from_monitors([monitor(0, 0, 0, 0)]), None);
	}
}
