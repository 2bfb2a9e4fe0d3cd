// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod app;
mod cadence;
mod config;
mod dialog;
mod screen;
#[path = "wintab/_.rs"]
mod wintab;

use std::{error::Error, process::ExitCode};

use app::App;
use config::{Config, PacketLayout};
use winit::{dpi::LogicalSize, event_loop::EventLoop, window::WindowBuilder};
use wintab::{Driver, FullPacket, Packet, PacketRecord, Wintab};

pub const APP_NAME_CAPITALIZED: &str = "Penpoll";
pub const APP_NAME_LOWERCASE: &str = "penpoll";

// Program entry point.
fn main() -> ExitCode {
	// Set up the event logger.
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = Config::load().unwrap_or_default();

	// Nothing works without the driver library, so this is the one fatal check.
	let wintab = match Wintab::load() {
		Ok(wintab) => wintab,
		Err(error) => {
			dialog::show_driver_missing(&error);
			return ExitCode::FAILURE;
		},
	};

	let result = match config.packet_layout {
		PacketLayout::Reduced => run::<_, Packet>(&wintab, &config),
		PacketLayout::Full => run::<_, FullPacket>(&wintab, &config),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			log::error!("{error}");
			ExitCode::FAILURE
		},
	}
}

fn run<D: Driver, P: PacketRecord>(wintab: &Wintab<D>, config: &Config) -> Result<(), Box<dyn Error>> {
	// Initialize the event loop.
	let event_loop = EventLoop::new()?;

	// The context needs a live window to deliver to.
	let window = WindowBuilder::new().with_title(APP_NAME_CAPITALIZED).with_inner_size(LogicalSize::new(480., 320.)).build(&event_loop)?;

	// Open the tablet context at the window and poll it with the event loop.
	let app = App::<D, P>::new(&window, wintab, config)?;
	app.run(event_loop)?;
	Ok(())
}
