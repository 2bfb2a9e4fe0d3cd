// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{
	ffi::{c_int, c_void},
	num::NonZeroIsize,
	ptr::{self, NonNull},
};

use bytemuck::Zeroable;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};

use super::{Driver, LogicalContext, Packet, PacketRecord, Wintab, WintabError};

/// The Win32 window a context delivers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowHandle(NonZeroIsize);

impl WindowHandle {
	pub fn from_window(window: &impl HasWindowHandle) -> Result<Self, WintabError> {
		match window.window_handle()?.as_raw() {
			RawWindowHandle::Win32(handle) => Ok(Self(handle.hwnd)),
			_ => Err(WintabError::UnsupportedWindow),
		}
	}

	#[cfg(test)]
	pub fn fake() -> Self {
		Self(NonZeroIsize::MIN)
	}
}

/// The most packets one poll drains. Driver queues hold far fewer.
pub const MAX_PACKET_CAPACITY: usize = 4096;

#[derive(Clone, Copy)]
enum State {
	Unopened,
	Open(NonNull<c_void>),
	Closed,
}

/// One tablet context, from opening to closing, and the buffer its packets are drained into.
///
/// A session only moves forward: unopened, open, closed. Dropping an open session closes it.
pub struct Session<'w, D: Driver, P: PacketRecord = Packet> {
	wintab: &'w Wintab<D>,
	state: State,
	packets: Vec<P>,
	capacity: usize,
}

impl<'w, D: Driver, P: PacketRecord> Session<'w, D, P> {
	pub fn new(wintab: &'w Wintab<D>, capacity: usize) -> Self {
		let capacity = capacity.clamp(1, MAX_PACKET_CAPACITY);
		Self { wintab, state: State::Unopened, packets: Vec::with_capacity(capacity), capacity }
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn is_open(&self) -> bool {
		matches!(self.state, State::Open(_))
	}

	fn handle(&self) -> Result<NonNull<c_void>, WintabError> {
		match self.state {
			State::Unopened => Err(WintabError::NotOpened),
			State::Open(handle) => Ok(handle),
			State::Closed => Err(WintabError::Closed),
		}
	}

	pub fn open(&mut self, window: WindowHandle, logical_context: &LogicalContext) -> Result<(), WintabError> {
		match self.state {
			State::Unopened => {},
			State::Open(_) => return Err(WintabError::AlreadyOpen),
			State::Closed => return Err(WintabError::Closed),
		}
		if logical_context.pkt_data != P::FIELDS {
			return Err(WintabError::FieldMismatch { requested: logical_context.pkt_data, received: P::FIELDS });
		}

		let handle = unsafe { self.wintab.driver().open(window.0.get(), logical_context, 1) };
		let handle = NonNull::new(handle).ok_or(WintabError::OpenFailed)?;
		self.state = State::Open(handle);
		log::info!("Opened tablet context {:?}", logical_context.name());
		Ok(())
	}

	/// Drains up to `capacity` packets from the driver's queue, oldest first.
	///
	/// An empty queue gives an empty slice. Packets the driver keeps past a full buffer stay queued
	/// for the next poll, unless the driver drops them first.
	pub fn poll(&mut self) -> Result<&[P], WintabError> {
		let handle = self.handle()?;
		// Zeroed on every poll, so records the driver didn't write this time never carry old packets.
		self.packets.clear();
		self.packets.resize(self.capacity, P::zeroed());
		let reported = unsafe { self.wintab.driver().packets_get(handle.as_ptr(), self.capacity as c_int, self.packets.as_mut_ptr().cast::<c_void>()) };
		let count = match usize::try_from(reported) {
			Ok(count) if count <= self.capacity => count,
			_ => {
				log::warn!("Wintab reported {reported} packets for a buffer of {}", self.capacity);
				usize::try_from(reported).map_or(0, |_| self.capacity)
			},
		};
		self.packets.truncate(count);
		Ok(&self.packets)
	}

	/// The number of packets waiting in the driver's queue.
	pub fn queue_size(&self) -> Result<usize, WintabError> {
		let handle = self.handle()?;
		let size = unsafe { self.wintab.driver().queue_size(handle.as_ptr()) };
		Ok(usize::try_from(size).unwrap_or(0))
	}

	/// Reads the context back as the driver sees it, after clipping.
	pub fn logical_context(&self) -> Result<LogicalContext, WintabError> {
		let handle = self.handle()?;
		let mut logical_context = LogicalContext::zeroed();
		match unsafe { self.wintab.driver().get(handle.as_ptr(), ptr::addr_of_mut!(logical_context)) } {
			// The driver no longer knows the handle.
			0 => Err(WintabError::Closed),
			_ => Ok(logical_context),
		}
	}

	pub fn close(&mut self) -> Result<(), WintabError> {
		let handle = self.handle()?;
		unsafe { self.wintab.driver().close(handle.as_ptr()) };
		self.state = State::Closed;
		self.packets.clear();
		log::info!("Closed tablet context");
		Ok(())
	}
}

impl<D: Driver, P: PacketRecord> Drop for Session<'_, D, P> {
	fn drop(&mut self) {
		if let State::Open(handle) = self.state {
			log::warn!("Closing a tablet context that was still open");
			unsafe { self.wintab.driver().close(handle.as_ptr()) };
		}
	}
}
