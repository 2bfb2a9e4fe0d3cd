// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{fs::File, time::Duration};

use kdl::{KdlDocument, KdlValue};

use crate::{
	wintab::{ContextOptions, ContextSettings, DefaultContext, HorizontalOutput, MAX_PACKET_CAPACITY},
	APP_NAME_LOWERCASE,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PacketLayout {
	#[default]
	Reduced,
	Full,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	pub poll_interval: Duration,
	pub packet_capacity: usize,
	pub default_context: DefaultContext,
	pub context: ContextSettings,
	pub packet_layout: PacketLayout,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_millis(5),
			packet_capacity: 100,
			default_context: DefaultContext::default(),
			context: ContextSettings::default(),
			packet_layout: PacketLayout::default(),
		}
	}
}

impl Config {
	pub fn load() -> Option<Self> {
		let mut config_file_path = dirs::config_dir()?;
		config_file_path.push(APP_NAME_LOWERCASE);
		if !config_file_path.exists() {
			std::fs::create_dir(config_file_path.clone()).ok()?;
		}
		config_file_path.push(format!("{APP_NAME_LOWERCASE}.kdl"));
		if !config_file_path.exists() {
			File::create(config_file_path).ok()?;
			return None;
		}

		let config_file_data = std::fs::read_to_string(&config_file_path).ok()?;

		let config_document = match config_file_data.parse::<KdlDocument>() {
			Ok(document) => document,
			Err(error) => {
				log::warn!("Ignoring {}: {error}", config_file_path.display());
				return None;
			},
		};

		Some(Self::from_document(&config_document))
	}

	// Every key is optional; anything missing or malformed keeps its default.
	pub fn from_document(document: &KdlDocument) -> Self {
		let default = Self::default();

		let poll_interval = parse_kdl_integer::<u64>(document.get_args("poll-interval")).map(|ms| Duration::from_millis(ms.max(1))).unwrap_or(default.poll_interval);
		let packet_capacity = parse_kdl_integer::<usize>(document.get_args("packet-capacity")).map(|n| n.clamp(1, MAX_PACKET_CAPACITY)).unwrap_or(default.packet_capacity);
		let default_context = parse_default_context(document.get_args("default-context")).unwrap_or(default.default_context);
		let horizontal_output = parse_horizontal_output(document.get_args("output-x")).unwrap_or(default.context.horizontal_output);
		let extra_options = match parse_kdl_bool(document.get_args("pen-cursor")) {
			Some(true) => ContextOptions::PEN,
			_ => default.context.extra_options,
		};
		let packet_layout = match parse_kdl_string(document.get_args("packet-layout")) {
			Some("full") => PacketLayout::Full,
			Some("reduced") => PacketLayout::Reduced,
			_ => default.packet_layout,
		};

		Config {
			poll_interval,
			packet_capacity,
			default_context,
			context: ContextSettings { horizontal_output, extra_options },
			packet_layout,
		}
	}
}

fn parse_kdl_integer<T: TryFrom<i64>>(values: Vec<&KdlValue>) -> Option<T> {
	let [value] = <[_; 1]>::try_from(values).ok()?;
	T::try_from(value.as_i64()?).ok()
}

fn parse_kdl_bool(values: Vec<&KdlValue>) -> Option<bool> {
	let [value] = <[_; 1]>::try_from(values).ok()?;
	value.as_bool()
}

fn parse_kdl_string<'a>(values: Vec<&'a KdlValue>) -> Option<&'a str> {
	let [value] = <[_; 1]>::try_from(values).ok()?;
	value.as_string()
}

fn parse_default_context(values: Vec<&KdlValue>) -> Option<DefaultContext> {
	let [value] = <[_; 1]>::try_from(values).ok()?;
	match value.as_string() {
		Some("digitizing") => Some(DefaultContext::Digitizing),
		Some("system") => Some(DefaultContext::System),
		Some(_) => None,
		None => u32::try_from(value.as_i64()?).ok().map(DefaultContext::Device),
	}
}

fn parse_horizontal_output(values: Vec<&KdlValue>) -> Option<HorizontalOutput> {
	match values.as_slice() {
		[value] if value.as_string() == Some("virtual-screen") => Some(HorizontalOutput::VirtualScreen),
		[origin, extent] => Some(HorizontalOutput::Fixed {
			origin: i32::try_from(origin.as_i64()?).ok()?,
			extent: i32::try_from(extent.as_i64()?).ok()?,
		}),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(source: &str) -> Config {
		Config::from_document(&source.parse::<KdlDocument>().unwrap())
	}

	#[test]
	fn empty_document_gives_defaults() {
		let config = parse("");
		assert_eq!(config, Config::default());
		assert_eq!(config.poll_interval, Duration::from_millis(5));
		assert_eq!(config.packet_capacity, 100);
		assert_eq!(config.context.horizontal_output, HorizontalOutput::Fixed { origin: 0, extent: 1920 });
	}

	#[test]
	fn every_key_is_read() {
		let config = parse(
			r#"
			poll-interval 8
			packet-capacity 256
			default-context "system"
			output-x "virtual-screen"
			pen-cursor true
			packet-layout "full"
			"#,
		);
		assert_eq!(config.poll_interval, Duration::from_millis(8));
		assert_eq!(config.packet_capacity, 256);
		assert_eq!(config.default_context, DefaultContext::System);
		assert_eq!(config.context.horizontal_output, HorizontalOutput::VirtualScreen);
		assert_eq!(config.context.extra_options, ContextOptions::PEN);
		assert_eq!(config.packet_layout, PacketLayout::Full);
	}

	#[test]
	fn fixed_output_and_device_contexts() {
		let config = parse("output-x -1280 3200\ndefault-context 1");
		assert_eq!(config.context.horizontal_output, HorizontalOutput::Fixed { origin: -1280, extent: 3200 });
		assert_eq!(config.default_context, DefaultContext::Device(1));
	}

	#[test]
	fn malformed_values_keep_defaults() {
		let config = parse(
			r#"
			poll-interval "fast"
			packet-capacity -3
			default-context "nonsense"
			output-x 1 2 3
			packet-layout "tiny"
			"#,
		);
		assert_eq!(config, Config::default());
	}

	#[test]
	fn packet_capacity_is_capped() {
		assert_eq!(parse("packet-capacity 2147483647").packet_capacity, MAX_PACKET_CAPACITY);
		assert_eq!(parse("packet-capacity 4096").packet_capacity, 4096);
	}

	#[test]
	fn huge_device_index_is_kept_for_the_driver_to_refuse() {
		assert_eq!(parse("default-context 4294967295").default_context, DefaultContext::Device(u32::MAX));
	}

	#[test]
	fn zero_limits_are_raised_to_one() {
		let config = parse("poll-interval 0\npacket-capacity 0");
		assert_eq!(config.poll_interval, Duration::from_millis(1));
		assert_eq!(config.packet_capacity, 1);
	}
}
