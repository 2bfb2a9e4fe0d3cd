// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ffi::{c_int, c_uint, c_void};

use super::LogicalContext;

pub type RawContext = *mut c_void;

/// The raw Wintab entry points this crate calls.
///
/// Each method has the contract of the Wintab function it is named after. Callers are responsible
/// for passing pointers that are valid for what the driver will write through them.
#[allow(clippy::missing_safety_doc)]
pub trait Driver {
	/// `WTInfoA`. With a null `output`, returns the size the item needs.
	unsafe fn info(&self, category: c_uint, index: c_uint, output: *mut c_void) -> c_uint;

	/// `WTOpenA`. Returns null on failure.
	unsafe fn open(&self, window: isize, logical_context: *const LogicalContext, enable: c_int) -> RawContext;

	/// `WTGetA`.
	unsafe fn get(&self, context: RawContext, logical_context: *mut LogicalContext) -> c_int;

	/// `WTQueueSizeGet`.
	unsafe fn queue_size(&self, context: RawContext) -> c_int;

	/// `WTPacketsGet`. Writes at most `max_packets` records and returns how many it wrote.
	unsafe fn packets_get(&self, context: RawContext, max_packets: c_int, packets: *mut c_void) -> c_int;

	/// `WTClose`.
	unsafe fn close(&self, context: RawContext) -> c_int;
}
