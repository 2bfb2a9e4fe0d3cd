// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![cfg(not(target_os = "windows"))]

use std::ffi::{c_int, c_uint, c_void};

use super::{Driver, LogicalContext, RawContext, WintabError};

// Wintab only ships for Windows, so there is never a library to hold.
pub enum WintabLibrary {}

impl WintabLibrary {
	pub fn load() -> Result<Self, WintabError> {
		Err(WintabError::LibraryNotFound("wintab32.dll is only available on Windows".to_owned()))
	}
}

impl Driver for WintabLibrary {
	unsafe fn info(&self, _: c_uint, _: c_uint, _: *mut c_void) -> c_uint {
		match *self {}
	}

	unsafe fn open(&self, _: isize, _: *const LogicalContext, _: c_int) -> RawContext {
		match *self {}
	}

	unsafe fn get(&self, _: RawContext, _: *mut LogicalContext) -> c_int {
		match *self {}
	}

	unsafe fn queue_size(&self, _: RawContext) -> c_int {
		match *self {}
	}

	unsafe fn packets_get(&self, _: RawContext, _: c_int, _: *mut c_void) -> c_int {
		match *self {}
	}

	unsafe fn close(&self, _: RawContext) -> c_int {
		match *self {}
	}
}
