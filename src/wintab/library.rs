// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![cfg(target_os = "windows")]

use std::ffi::{c_int, c_uint, c_void};

use super::{Driver, LogicalContext, RawContext, WintabError};

macro_rules! impl_interface {
	{$Name:ident: $($function:ident: fn($($parameter:ident: $factor:ty),*) -> $codomain:ty),* $(,)?} => {
		#[allow(non_snake_case)]
		struct $Name {
			$($function: unsafe extern "system" fn($($parameter: $factor),*) -> $codomain),*
		}

		impl $Name {
			fn new(library: &libloading::Library) -> Result<Self, WintabError> {
				Ok(Self {
					$($function: *unsafe {
						library.get::<unsafe extern "system" fn($($factor),*) -> $codomain>(concat!(stringify!($function), "\0").as_bytes())
					}
					.map_err(|_| WintabError::MissingEntryPoint(stringify!($function)))?),*
				})
			}
		}
	}
}

impl_interface! {
	WintabInterface:
	WTInfoA: fn(wCategory: c_uint, nIndex: c_uint, lpOutput: *mut c_void) -> c_uint,
	WTOpenA: fn(hWnd: isize, lpLogCtx: *const LogicalContext, fEnable: c_int) -> *mut c_void,
	WTGetA: fn(hCtx: *mut c_void, lpLogCtx: *mut LogicalContext) -> c_int,
	WTQueueSizeGet: fn(hCtx: *mut c_void) -> c_int,
	WTPacketsGet: fn(hCtx: *mut c_void, cMaxPkts: c_int, lpPkts: *mut c_void) -> c_int,
	WTClose: fn(hCtx: *mut c_void) -> c_int,
}

// The function pointers are only valid while `_library` stays loaded.
pub struct WintabLibrary {
	wintab: WintabInterface,
	_library: libloading::Library,
}

impl WintabLibrary {
	const PATH: &'static str = "wintab32.dll";

	pub fn load() -> Result<Self, WintabError> {
		let library = unsafe { libloading::Library::new(Self::PATH) }.map_err(|error| WintabError::LibraryNotFound(error.to_string()))?;
		let wintab = WintabInterface::new(&library)?;
		Ok(Self { wintab, _library: library })
	}
}

impl Driver for WintabLibrary {
	unsafe fn info(&self, category: c_uint, index: c_uint, output: *mut c_void) -> c_uint {
		unsafe { (self.wintab.WTInfoA)(category, index, output) }
	}

	unsafe fn open(&self, window: isize, logical_context: *const LogicalContext, enable: c_int) -> RawContext {
		unsafe { (self.wintab.WTOpenA)(window, logical_context, enable) }
	}

	unsafe fn get(&self, context: RawContext, logical_context: *mut LogicalContext) -> c_int {
		unsafe { (self.wintab.WTGetA)(context, logical_context) }
	}

	unsafe fn queue_size(&self, context: RawContext) -> c_int {
		unsafe { (self.wintab.WTQueueSizeGet)(context) }
	}

	unsafe fn packets_get(&self, context: RawContext, max_packets: c_int, packets: *mut c_void) -> c_int {
		unsafe { (self.wintab.WTPacketsGet)(context, max_packets, packets) }
	}

	unsafe fn close(&self, context: RawContext) -> c_int {
		unsafe { (self.wintab.WTClose)(context) }
	}
}
