// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{
	ffi::{c_uint, c_void},
	mem::size_of,
	ptr,
};

use bytemuck::{Pod, Zeroable};

use super::{Axis, Driver, LogicalContext, Wintab, WintabError};

// Info categories and their items.
pub(crate) const WTI_INTERFACE: c_uint = 1;
pub(crate) const IFC_WINTABID: c_uint = 1;
pub(crate) const IFC_NDEVICES: c_uint = 4;

pub(crate) const WTI_DEFCONTEXT: c_uint = 3;
// Sets CXO_SYSTEM; see https://developer-docs.wacom.com/intuos-cintiq-business-tablets/docs/wintab-faqs for details
pub(crate) const WTI_DEFSYSCTX: c_uint = 4;

pub(crate) const WTI_DEVICES: c_uint = 100;
pub(crate) const DVC_NAME: c_uint = 1;
pub(crate) const DVC_X: c_uint = 12;
pub(crate) const DVC_Y: c_uint = 13;
pub(crate) const DVC_Z: c_uint = 14;
pub(crate) const DVC_NPRESSURE: c_uint = 15;
pub(crate) const DVC_TPRESSURE: c_uint = 16;

pub(crate) const WTI_DDCTXS: c_uint = 400;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceAxis {
	X,
	Y,
	Z,
	NormalPressure,
	TangentPressure,
}

impl DeviceAxis {
	fn index(self) -> c_uint {
		match self {
			Self::X => DVC_X,
			Self::Y => DVC_Y,
			Self::Z => DVC_Z,
			Self::NormalPressure => DVC_NPRESSURE,
			Self::TangentPressure => DVC_TPRESSURE,
		}
	}
}

/// Which of the driver's default contexts to start from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefaultContext {
	/// Detaches the pen from the system cursor.
	#[default]
	Digitizing,
	System,
	/// The default digitizing context of one device.
	Device(u32),
}

impl DefaultContext {
	fn category(self) -> Option<c_uint> {
		match self {
			Self::Digitizing => Some(WTI_DEFCONTEXT),
			Self::System => Some(WTI_DEFSYSCTX),
			Self::Device(index) => WTI_DDCTXS.checked_add(index),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabletInfo {
	pub interface_id: Option<String>,
	pub device_count: u32,
	/// Absent when no device is attached.
	pub device_name: Option<String>,
	pub x: Axis,
	pub y: Axis,
	/// Absent on tablets without height sensing.
	pub z: Option<Axis>,
	pub normal_pressure: Axis,
	pub tangent_pressure: Axis,
}

impl<D: Driver> Wintab<D> {
	fn info_size(&self, category: c_uint, index: c_uint) -> usize {
		unsafe { self.driver().info(category, index, ptr::null_mut()) as usize }
	}

	fn info_record<T: Pod>(&self, category: c_uint, index: c_uint) -> Option<T> {
		let mut record = T::zeroed();
		let written = unsafe { self.driver().info(category, index, bytemuck::bytes_of_mut(&mut record).as_mut_ptr().cast::<c_void>()) };
		(written != 0).then_some(record)
	}

	fn info_string(&self, category: c_uint, index: c_uint) -> Option<String> {
		let size = self.info_size(category, index);
		if size == 0 {
			return None;
		}
		let mut buffer = vec![0u8; size];
		let written = unsafe { self.driver().info(category, index, buffer.as_mut_ptr().cast::<c_void>()) as usize };
		buffer.truncate(written.min(size));
		let end = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
		Some(String::from_utf8_lossy(&buffer[..end]).into_owned())
	}

	pub fn device_count(&self) -> u32 {
		self.info_record::<u32>(WTI_INTERFACE, IFC_NDEVICES).unwrap_or(0)
	}

	/// The tablet hardware identification string, make and model included.
	pub fn interface_id(&self) -> Option<String> {
		self.info_string(WTI_INTERFACE, IFC_WINTABID)
	}

	pub fn device_name(&self) -> Option<String> {
		if self.device_count() == 0 {
			return None;
		}
		self.info_string(WTI_DEVICES, DVC_NAME)
	}

	pub fn axis(&self, axis: DeviceAxis) -> Option<Axis> {
		self.info_record::<Axis>(WTI_DEVICES, axis.index())
	}

	pub fn tablet_info(&self) -> TabletInfo {
		let device_count = self.device_count();
		let device_name = if device_count == 0 { None } else { self.info_string(WTI_DEVICES, DVC_NAME) };
		let range = |axis| {
			self.axis(axis).unwrap_or_else(|| {
				log::debug!("Wintab reported no range for {axis:?}");
				Axis::default()
			})
		};
		TabletInfo {
			interface_id: self.interface_id(),
			device_count,
			device_name,
			x: range(DeviceAxis::X),
			y: range(DeviceAxis::Y),
			z: self.axis(DeviceAxis::Z),
			normal_pressure: range(DeviceAxis::NormalPressure),
			tangent_pressure: range(DeviceAxis::TangentPressure),
		}
	}

	pub fn default_context(&self, which: DefaultContext) -> Result<LogicalContext, WintabError> {
		let category = which.category().ok_or(WintabError::NoDefaultContext(which))?;
		let mut logical_context = LogicalContext::zeroed();
		// An index of zero returns every item of the category as one record.
		let written = unsafe { self.driver().info(category, 0, ptr::addr_of_mut!(logical_context).cast::<c_void>()) as usize };
		match written {
			0 => Err(WintabError::NoDefaultContext(which)),
			n if n != size_of::<LogicalContext>() => Err(WintabError::RecordSize { expected: size_of::<LogicalContext>(), actual: n }),
			_ => Ok(logical_context),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::wintab::fake::{FakeDevice, FakeDriver};

	#[test]
	fn no_devices_means_no_name() {
		let wintab = Wintab::with_driver(FakeDriver::new(Vec::new()));
		assert_eq!(wintab.device_count(), 0);
		assert_eq!(wintab.device_name(), None);

		let info = wintab.tablet_info();
		assert_eq!(info.device_name, None);
		assert_eq!(info.x, Axis::default());
		assert_eq!(info.interface_id.as_deref(), Some(FakeDriver::INTERFACE_ID));
	}

	#[test]
	fn attached_device_reports_name_and_ranges() {
		let device = FakeDevice::new("Intuos S", [20000, 15000]);
		let wintab = Wintab::with_driver(FakeDriver::new(vec![device.clone()]));

		assert_eq!(wintab.device_count(), 1);
		assert_eq!(wintab.device_name().as_deref(), Some("Intuos S"));

		let info = wintab.tablet_info();
		assert_eq!(info.device_count, 1);
		assert_eq!(info.x, device.x);
		assert_eq!(info.y, device.y);
		assert_eq!(info.normal_pressure, device.normal_pressure);
		assert_eq!(info.tangent_pressure, device.tangent_pressure);
		assert_eq!(wintab.axis(DeviceAxis::Z), None);
		assert_eq!(info.z, None);
	}

	#[test]
	fn default_contexts_are_read_per_category() {
		let wintab = Wintab::with_driver(FakeDriver::new(Vec::new()));
		assert_eq!(wintab.default_context(DefaultContext::Digitizing).unwrap().name(), FakeDriver::DIGITIZING_NAME);
		assert_eq!(wintab.default_context(DefaultContext::System).unwrap().name(), FakeDriver::SYSTEM_NAME);
		assert!(matches!(wintab.default_context(DefaultContext::Device(3)), Err(WintabError::NoDefaultContext(DefaultContext::Device(3)))));
		assert!(matches!(
			wintab.default_context(DefaultContext::Device(u32::MAX)),
			Err(WintabError::NoDefaultContext(DefaultContext::Device(u32::MAX)))
		));
	}

	#[test]
	fn short_default_context_is_rejected() {
		let mut driver = FakeDriver::new(Vec::new());
		driver.context_size = 100;
		let wintab = Wintab::with_driver(driver);
		assert!(matches!(
			wintab.default_context(DefaultContext::Digitizing),
			Err(WintabError::RecordSize { expected: 172, actual: 100 })
		));
	}
}
