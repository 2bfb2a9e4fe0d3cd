// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Axis, ContextOptions, LogicalContext, PacketFields, PacketRecord};
use crate::screen::VirtualScreen;

/// Where the output area's horizontal axis comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalOutput {
	Fixed { origin: i32, extent: i32 },
	VirtualScreen,
}

impl Default for HorizontalOutput {
	// Spanning several monitors horizontally has caused trouble, so this stays fixed unless asked.
	fn default() -> Self {
		Self::Fixed { origin: 0, extent: 1920 }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextSettings {
	pub horizontal_output: HorizontalOutput,
	/// Options added on top of `MESSAGES`, such as `PEN` to let the pen drive the system cursor.
	pub extra_options: ContextOptions,
}

impl Default for ContextSettings {
	fn default() -> Self {
		Self { horizontal_output: HorizontalOutput::default(), extra_options: ContextOptions::empty() }
	}
}

impl LogicalContext {
	/// Turns a default context into one delivering `P` packets in absolute mode, with the whole tablet
	/// mapped onto `screen`.
	pub fn configure<P: PacketRecord>(mut self, x: &Axis, y: &Axis, screen: &VirtualScreen, settings: &ContextSettings) -> Self {
		self.pkt_data = P::FIELDS;
		self.options |= ContextOptions::MESSAGES | settings.extra_options;
		self.pkt_mode = PacketFields::empty();
		self.move_mask = P::FIELDS;
		self.btn_up_mask = self.btn_dn_mask;

		// The entire tablet is active.
		self.in_org_x = 0;
		self.in_org_y = 0;
		self.in_ext_x = x.max;
		self.in_ext_y = y.max;

		match settings.horizontal_output {
			HorizontalOutput::Fixed { origin, extent } => {
				self.out_org_x = origin;
				self.out_ext_x = extent;
			},
			HorizontalOutput::VirtualScreen => {
				self.out_org_x = screen.left;
				self.out_ext_x = screen.width;
			},
		}

		// Tablet space starts at the bottom left; screen space starts at the top left.
		self.out_org_y = screen.top;
		self.out_ext_y = -screen.height;

		self
	}
}
