// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// An in-memory driver for exercising the typed layers without wintab32.dll.

use std::{
	cell::{Cell, RefCell},
	collections::VecDeque,
	ffi::{c_int, c_uint, c_void},
	mem::size_of,
	ptr::{self, NonNull},
};

use bytemuck::Zeroable;

use super::{
	info::{DVC_NAME, DVC_NPRESSURE, DVC_TPRESSURE, DVC_X, DVC_Y, IFC_NDEVICES, IFC_WINTABID, WTI_DDCTXS, WTI_DEFCONTEXT, WTI_DEFSYSCTX, WTI_DEVICES, WTI_INTERFACE},
	Axis, Driver, LogicalContext, Packet, RawContext,
};

#[derive(Clone, Debug)]
pub struct FakeDevice {
	pub name: String,
	pub x: Axis,
	pub y: Axis,
	pub normal_pressure: Axis,
	pub tangent_pressure: Axis,
}

impl FakeDevice {
	pub fn new(name: &str, [x, y]: [i32; 2]) -> Self {
		Self {
			name: name.to_owned(),
			x: Axis { min: 0, max: x, units: 2, resolution: 1000 << 16 },
			y: Axis { min: 0, max: y, units: 2, resolution: 1000 << 16 },
			normal_pressure: Axis { min: 0, max: 8191, units: 0, resolution: 0 },
			tangent_pressure: Axis { min: 0, max: 1023, units: 0, resolution: 0 },
		}
	}
}

pub struct FakeDriver {
	pub devices: Vec<FakeDevice>,
	/// What `WTInfoA` claims to have written for a default context.
	pub context_size: usize,
	pub refuse_open: bool,
	pub queue: RefCell<VecDeque<Packet>>,
	/// Added to every `WTPacketsGet` count, as a misbehaving driver might.
	pub over_report: Cell<c_int>,
	pub opened: RefCell<Vec<LogicalContext>>,
	pub closes: Cell<usize>,
}

impl FakeDriver {
	pub const INTERFACE_ID: &'static str = "Fake Wintab Interface";
	pub const DIGITIZING_NAME: &'static str = "Fake Digitizing";
	pub const SYSTEM_NAME: &'static str = "Fake System";

	pub fn new(devices: Vec<FakeDevice>) -> Self {
		Self {
			devices,
			context_size: size_of::<LogicalContext>(),
			refuse_open: false,
			queue: RefCell::new(VecDeque::new()),
			over_report: Cell::new(0),
			opened: RefCell::new(Vec::new()),
			closes: Cell::new(0),
		}
	}

	pub fn push_packets(&self, packets: impl IntoIterator<Item = Packet>) {
		self.queue.borrow_mut().extend(packets);
	}

	pub fn default_context(name: &str) -> LogicalContext {
		let mut logical_context = LogicalContext::zeroed();
		logical_context.name[..name.len()].copy_from_slice(name.as_bytes());
		logical_context.btn_dn_mask = 0b101;
		logical_context.btn_up_mask = 0b111;
		logical_context.out_ext_x = 1280;
		logical_context.out_ext_y = 720;
		logical_context
	}

	fn handle() -> RawContext {
		NonNull::<c_void>::dangling().as_ptr()
	}

	unsafe fn write_string(value: &str, output: *mut c_void) -> c_uint {
		if !output.is_null() {
			unsafe {
				ptr::copy_nonoverlapping(value.as_ptr(), output.cast::<u8>(), value.len());
				output.cast::<u8>().add(value.len()).write(0);
			}
		}
		(value.len() + 1) as c_uint
	}

	unsafe fn write_record<T: Copy>(&self, value: T, output: *mut c_void) -> c_uint {
		if !output.is_null() {
			unsafe { output.cast::<T>().write_unaligned(value) };
		}
		size_of::<T>() as c_uint
	}

	unsafe fn write_context(&self, name: &str, output: *mut c_void) -> c_uint {
		let logical_context = Self::default_context(name);
		if !output.is_null() {
			let written = self.context_size.min(size_of::<LogicalContext>());
			unsafe { ptr::copy_nonoverlapping(ptr::addr_of!(logical_context).cast::<u8>(), output.cast::<u8>(), written) };
		}
		self.context_size as c_uint
	}
}

impl Driver for FakeDriver {
	unsafe fn info(&self, category: c_uint, index: c_uint, output: *mut c_void) -> c_uint {
		let device = self.devices.first();
		unsafe {
			match (category, index, device) {
				(WTI_INTERFACE, IFC_WINTABID, _) => Self::write_string(Self::INTERFACE_ID, output),
				(WTI_INTERFACE, IFC_NDEVICES, _) => self.write_record(self.devices.len() as u32, output),
				(WTI_DEVICES, DVC_NAME, Some(device)) => Self::write_string(&device.name, output),
				(WTI_DEVICES, DVC_X, Some(device)) => self.write_record(device.x, output),
				(WTI_DEVICES, DVC_Y, Some(device)) => self.write_record(device.y, output),
				(WTI_DEVICES, DVC_NPRESSURE, Some(device)) => self.write_record(device.normal_pressure, output),
				(WTI_DEVICES, DVC_TPRESSURE, Some(device)) => self.write_record(device.tangent_pressure, output),
				(WTI_DEFCONTEXT, 0, _) => self.write_context(Self::DIGITIZING_NAME, output),
				(WTI_DEFSYSCTX, 0, _) => self.write_context(Self::SYSTEM_NAME, output),
				(category, 0, _) if category >= WTI_DDCTXS && ((category - WTI_DDCTXS) as usize) < self.devices.len() => {
					self.write_context(&self.devices[(category - WTI_DDCTXS) as usize].name, output)
				},
				_ => 0,
			}
		}
	}

	unsafe fn open(&self, _: isize, logical_context: *const LogicalContext, _: c_int) -> RawContext {
		if self.refuse_open {
			return ptr::null_mut();
		}
		self.opened.borrow_mut().push(unsafe { logical_context.read() });
		Self::handle()
	}

	unsafe fn get(&self, _: RawContext, logical_context: *mut LogicalContext) -> c_int {
		match self.opened.borrow().last() {
			Some(opened) => {
				unsafe { logical_context.write(*opened) };
				1
			},
			None => 0,
		}
	}

	unsafe fn queue_size(&self, _: RawContext) -> c_int {
		self.queue.borrow().len() as c_int
	}

	unsafe fn packets_get(&self, _: RawContext, max_packets: c_int, packets: *mut c_void) -> c_int {
		let mut queue = self.queue.borrow_mut();
		let count = queue.len().min(max_packets.max(0) as usize);
		for (i, packet) in queue.drain(..count).enumerate() {
			unsafe { packets.cast::<Packet>().add(i).write(packet) };
		}
		count as c_int + self.over_report.get()
	}

	unsafe fn close(&self, _: RawContext) -> c_int {
		self.closes.set(self.closes.get() + 1);
		1
	}
}

pub fn packet(serial_number: u32, x: i32, y: i32, normal_pressure: u32) -> Packet {
	Packet { serial_number, x, y, normal_pressure, ..Packet::default() }
}
