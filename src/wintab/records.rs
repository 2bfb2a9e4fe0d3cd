// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::mem::{align_of, size_of};

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

/*
char : u8
UINT : u32
WTPKT, DWORD, FIX32 : u32
LONG : i32
BOOL, int : i32
HCTX : usize
*/

bitflags! {
	#[repr(transparent)]
	#[derive(Clone, Copy, Debug, PartialEq, Eq)]
	pub struct ContextOptions: u32 {
		const SYSTEM      = 0x0001;
		const PEN         = 0x0002;
		const MESSAGES    = 0x0004;
		const CSRMESSAGES = 0x0008;
		const MGNINSIDE   = 0x4000;
		const MARGIN      = 0x8000;
	}

	#[repr(transparent)]
	#[derive(Clone, Copy, Debug, PartialEq, Eq)]
	pub struct PacketFields: u32 {
		const CONTEXT          = 0x0001;
		const STATUS           = 0x0002;
		const TIME             = 0x0004;
		const CHANGED          = 0x0008;
		const SERIAL_NUMBER    = 0x0010;
		const CURSOR           = 0x0020;
		const BUTTONS          = 0x0040;
		const X                = 0x0080;
		const Y                = 0x0100;
		const Z                = 0x0200;
		const NORMAL_PRESSURE  = 0x0400;
		const TANGENT_PRESSURE = 0x0800;
		const ORIENTATION      = 0x1000;
		const ROTATION         = 0x2000;
	}
}

impl PacketFields {
	// Wintab lays packet fields out in ascending bit order.
	const LAYOUT_ORDER: [Self; 14] = [
		Self::CONTEXT,
		Self::STATUS,
		Self::TIME,
		Self::CHANGED,
		Self::SERIAL_NUMBER,
		Self::CURSOR,
		Self::BUTTONS,
		Self::X,
		Self::Y,
		Self::Z,
		Self::NORMAL_PRESSURE,
		Self::TANGENT_PRESSURE,
		Self::ORIENTATION,
		Self::ROTATION,
	];

	// Size in bytes of the single field named by `field`.
	const fn field_size(field: Self) -> usize {
		match field.bits() {
			0x0001 => size_of::<usize>(),
			0x1000 => size_of::<Orientation>(),
			0x2000 => size_of::<Rotation>(),
			_ => 4,
		}
	}

	/// Byte offset of `field` within a packet carrying `self`, or `None` if `self` doesn't carry it.
	pub const fn field_offset(self, field: Self) -> Option<usize> {
		if self.bits() & field.bits() == 0 {
			return None;
		}
		let mut offset = 0;
		let mut i = 0;
		while i < Self::LAYOUT_ORDER.len() {
			let candidate = Self::LAYOUT_ORDER[i];
			if candidate.bits() == field.bits() {
				return Some(offset);
			}
			if self.bits() & candidate.bits() != 0 {
				offset += Self::field_size(candidate);
			}
			i += 1;
		}
		None
	}

	/// Size in bytes of a packet carrying exactly these fields, trailing padding included.
	pub const fn record_size(self) -> usize {
		let mut size = 0;
		let mut i = 0;
		while i < Self::LAYOUT_ORDER.len() {
			if self.bits() & Self::LAYOUT_ORDER[i].bits() != 0 {
				size += Self::field_size(Self::LAYOUT_ORDER[i]);
			}
			i += 1;
		}
		let align = if self.bits() & Self::CONTEXT.bits() != 0 { align_of::<usize>() } else { 4 };
		(size + align - 1) / align * align
	}
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Axis {
	pub min: i32,
	pub max: i32,
	pub units: u32,
	pub resolution: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisUnits {
	Inches,
	Centimeters,
}

impl Axis {
	pub fn units(&self) -> Option<AxisUnits> {
		match self.units {
			1 => Some(AxisUnits::Inches),
			2 => Some(AxisUnits::Centimeters),
			_ => None,
		}
	}

	// FIX32 is 16.16 fixed point.
	pub fn resolution(&self) -> f64 {
		f64::from(self.resolution) / 65536.
	}
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct LogicalContext {
	pub name: [u8; 40],
	pub options: ContextOptions,
	pub status: u32,
	pub locks: u32,
	pub msg_base: u32,
	pub device: u32,
	pub pkt_rate: u32,
	pub pkt_data: PacketFields,
	pub pkt_mode: PacketFields,
	pub move_mask: PacketFields,
	pub btn_dn_mask: u32,
	pub btn_up_mask: u32,
	pub in_org_x: i32,
	pub in_org_y: i32,
	pub in_org_z: i32,
	pub in_ext_x: i32,
	pub in_ext_y: i32,
	pub in_ext_z: i32,
	pub out_org_x: i32,
	pub out_org_y: i32,
	pub out_org_z: i32,
	pub out_ext_x: i32,
	pub out_ext_y: i32,
	pub out_ext_z: i32,
	pub sens_x: u32,
	pub sens_y: u32,
	pub sens_z: u32,
	pub sys_mode: i32,
	pub sys_org_x: i32,
	pub sys_org_y: i32,
	pub sys_ext_x: i32,
	pub sys_ext_y: i32,
	pub sys_sens_x: u32,
	pub sys_sens_y: u32,
}

// SAFETY: Every field is an integer or a transparent wrapper around one.
unsafe impl Zeroable for LogicalContext {}

impl LogicalContext {
	pub fn name(&self) -> String {
		let end = self.name.iter().position(|&c| c == 0).unwrap_or(self.name.len());
		String::from_utf8_lossy(&self.name[..end]).into_owned()
	}
}

impl std::fmt::Debug for LogicalContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LogicalContext")
			.field("name", &self.name())
			.field("options", &self.options)
			.field("pkt_data", &self.pkt_data)
			.field("pkt_mode", &self.pkt_mode)
			.field("in_org", &[self.in_org_x, self.in_org_y])
			.field("in_ext", &[self.in_ext_x, self.in_ext_y])
			.field("out_org", &[self.out_org_x, self.out_org_y])
			.field("out_ext", &[self.out_ext_x, self.out_ext_y])
			.finish_non_exhaustive()
	}
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Orientation {
	pub azimuth: i32,
	pub altitude: i32,
	pub twist: i32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rotation {
	pub pitch: i32,
	pub roll: i32,
	pub yaw: i32,
}

/// What the host reports from any packet record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
	pub serial_number: u32,
	pub cursor: u32,
	pub buttons: u32,
	pub x: i32,
	pub y: i32,
	pub normal_pressure: u32,
	pub time: Option<u32>,
}

/// A record the driver writes packets into.
///
/// # Safety
/// `Self` must be `#[repr(C)]`, valid for any bit pattern, and laid out exactly as Wintab lays out
/// a packet whose data bits are `FIELDS`.
pub unsafe trait PacketRecord: Copy + Zeroable {
	const FIELDS: PacketFields;

	fn sample(&self) -> Sample;
}

// Mirrors `FIELDS` below field for field; change both together.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Packet {
	pub changed: u32,
	pub serial_number: u32,
	pub cursor: u32,
	pub buttons: u32,
	pub x: i32,
	pub y: i32,
	pub normal_pressure: u32,
}

unsafe impl PacketRecord for Packet {
	const FIELDS: PacketFields = PacketFields::CHANGED
		.union(PacketFields::SERIAL_NUMBER)
		.union(PacketFields::CURSOR)
		.union(PacketFields::BUTTONS)
		.union(PacketFields::X)
		.union(PacketFields::Y)
		.union(PacketFields::NORMAL_PRESSURE);

	fn sample(&self) -> Sample {
		Sample {
			serial_number: self.serial_number,
			cursor: self.cursor,
			buttons: self.buttons,
			x: self.x,
			y: self.y,
			normal_pressure: self.normal_pressure,
			time: None,
		}
	}
}

const _: () = assert!(size_of::<Packet>() == Packet::FIELDS.record_size());

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Zeroable)]
pub struct FullPacket {
	pub context: usize,
	pub status: u32,
	pub time: u32,
	pub changed: u32,
	pub serial_number: u32,
	pub cursor: u32,
	pub buttons: u32,
	pub x: i32,
	pub y: i32,
	pub z: i32,
	pub normal_pressure: u32,
	pub tangent_pressure: u32,
	pub orientation: Orientation,
	pub rotation: Rotation,
}

unsafe impl PacketRecord for FullPacket {
	const FIELDS: PacketFields = PacketFields::all();

	fn sample(&self) -> Sample {
		Sample {
			serial_number: self.serial_number,
			cursor: self.cursor,
			buttons: self.buttons,
			x: self.x,
			y: self.y,
			normal_pressure: self.normal_pressure,
			time: Some(self.time),
		}
	}
}

const _: () = assert!(size_of::<FullPacket>() == FullPacket::FIELDS.record_size());

#[cfg(test)]
mod tests {
	use std::mem::offset_of;

	use super::*;

	#[test]
	fn fixed_records_match_the_driver_abi() {
		assert_eq!(size_of::<Axis>(), 16);
		assert_eq!(size_of::<Orientation>(), 12);
		assert_eq!(size_of::<Rotation>(), 12);
		assert_eq!(size_of::<LogicalContext>(), 172);
		assert_eq!(offset_of!(LogicalContext, options), 40);
		assert_eq!(offset_of!(LogicalContext, pkt_data), 64);
		assert_eq!(offset_of!(LogicalContext, in_org_x), 84);
		assert_eq!(offset_of!(LogicalContext, out_org_x), 108);
		assert_eq!(offset_of!(LogicalContext, sys_mode), 144);
		assert_eq!(offset_of!(LogicalContext, sys_sens_y), 168);
	}

	#[test]
	fn reduced_packet_fields_sit_where_their_bits_put_them() {
		let fields = Packet::FIELDS;
		let expected = [
			(PacketFields::CHANGED, offset_of!(Packet, changed)),
			(PacketFields::SERIAL_NUMBER, offset_of!(Packet, serial_number)),
			(PacketFields::CURSOR, offset_of!(Packet, cursor)),
			(PacketFields::BUTTONS, offset_of!(Packet, buttons)),
			(PacketFields::X, offset_of!(Packet, x)),
			(PacketFields::Y, offset_of!(Packet, y)),
			(PacketFields::NORMAL_PRESSURE, offset_of!(Packet, normal_pressure)),
		];
		for (field, offset) in expected {
			assert_eq!(fields.field_offset(field), Some(offset), "{field:?}");
		}

		// No bit is requested without a field to receive it.
		let received = expected.iter().fold(PacketFields::empty(), |acc, (field, _)| acc | *field);
		assert_eq!(received, fields);
		assert_eq!(size_of::<Packet>(), fields.record_size());
	}

	#[test]
	fn full_packet_fields_sit_where_their_bits_put_them() {
		let fields = FullPacket::FIELDS;
		let expected = [
			(PacketFields::CONTEXT, offset_of!(FullPacket, context)),
			(PacketFields::STATUS, offset_of!(FullPacket, status)),
			(PacketFields::TIME, offset_of!(FullPacket, time)),
			(PacketFields::CHANGED, offset_of!(FullPacket, changed)),
			(PacketFields::SERIAL_NUMBER, offset_of!(FullPacket, serial_number)),
			(PacketFields::CURSOR, offset_of!(FullPacket, cursor)),
			(PacketFields::BUTTONS, offset_of!(FullPacket, buttons)),
			(PacketFields::X, offset_of!(FullPacket, x)),
			(PacketFields::Y, offset_of!(FullPacket, y)),
			(PacketFields::Z, offset_of!(FullPacket, z)),
			(PacketFields::NORMAL_PRESSURE, offset_of!(FullPacket, normal_pressure)),
			(PacketFields::TANGENT_PRESSURE, offset_of!(FullPacket, tangent_pressure)),
			(PacketFields::ORIENTATION, offset_of!(FullPacket, orientation)),
			(PacketFields::ROTATION, offset_of!(FullPacket, rotation)),
		];
		for (field, offset) in expected {
			assert_eq!(fields.field_offset(field), Some(offset), "{field:?}");
		}
		assert_eq!(size_of::<FullPacket>(), fields.record_size());
	}

	#[test]
	fn offsets_skip_fields_that_are_not_requested() {
		let fields = PacketFields::X | PacketFields::NORMAL_PRESSURE;
		assert_eq!(fields.field_offset(PacketFields::X), Some(0));
		assert_eq!(fields.field_offset(PacketFields::NORMAL_PRESSURE), Some(4));
		assert_eq!(fields.field_offset(PacketFields::Y), None);
		assert_eq!(fields.record_size(), 8);
	}

	#[test]
	fn axis_decodes_units_and_fixed_point_resolution() {
		let axis = Axis { min: 0, max: 20000, units: 2, resolution: 1000 << 16 };
		assert_eq!(axis.units(), Some(AxisUnits::Centimeters));
		assert_eq!(axis.resolution(), 1000.);
		assert_eq!(Axis::default().units(), None);
	}

	#[test]
	fn context_name_stops_at_the_terminator() {
		let mut context = LogicalContext::zeroed();
		context.name[..7].copy_from_slice(b"Digitiz");
		assert_eq!(context.name(), "Digitiz");
	}
}
