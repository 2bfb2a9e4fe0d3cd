// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod context;
mod driver;
#[cfg(test)]
pub mod fake;
mod info;
#[cfg(target_os = "windows")]
mod library;
mod records;
mod session;
#[cfg(not(target_os = "windows"))]
mod unsupported;

pub use context::{ContextSettings, HorizontalOutput};
pub use driver::{Driver, RawContext};
pub use info::{DefaultContext, TabletInfo};
#[cfg(target_os = "windows")]
pub use library::WintabLibrary;
pub use records::*;
pub use session::{Session, WindowHandle, MAX_PACKET_CAPACITY};
#[cfg(not(target_os = "windows"))]
pub use unsupported::WintabLibrary;

#[derive(thiserror::Error, Debug)]
pub enum WintabError {
	/// The driver library couldn't be loaded at all; nothing else can work.
	#[error("wintab32.dll couldn't be loaded ({0}); try installing or reinstalling the tablet drivers")]
	LibraryNotFound(String),
	#[error("wintab32.dll has no `{0}` entry point")]
	#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
	MissingEntryPoint(&'static str),
	#[error("the driver has no default context for {0:?}")]
	NoDefaultContext(DefaultContext),
	#[error("the driver wrote {actual} bytes into a {expected}-byte record")]
	RecordSize { expected: usize, actual: usize },
	#[error("couldn't get the window handle: {0}")]
	WindowHandle(#[from] raw_window_handle::HandleError),
	#[error("the window isn't a Win32 window")]
	UnsupportedWindow,
	#[error("the driver refused to open a context")]
	OpenFailed,
	/// Packets for one set of fields would be decoded as another.
	#[error("the context requests {requested:?} but packets are received as {received:?}")]
	FieldMismatch { requested: PacketFields, received: PacketFields },
	#[error("the context is already open")]
	AlreadyOpen,
	#[error("the context was never opened")]
	NotOpened,
	#[error("the context has already been closed")]
	Closed,
}

/// Typed access to a Wintab driver.
pub struct Wintab<D = WintabLibrary> {
	driver: D,
}

impl Wintab {
	/// Loads `wintab32.dll`. Failure here is fatal for the caller.
	pub fn load() -> Result<Self, WintabError> {
		Ok(Self::with_driver(WintabLibrary::load()?))
	}
}

impl<D: Driver> Wintab<D> {
	pub fn with_driver(driver: D) -> Self {
		Self { driver }
	}

	pub(crate) fn driver(&self) -> &D {
		&self.driver
	}
}
