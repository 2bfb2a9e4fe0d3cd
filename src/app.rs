// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Instant;

use winit::{
	error::EventLoopError,
	event::*,
	event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
};

use crate::{
	cadence::Cadence,
	config::Config,
	screen::VirtualScreen,
	wintab::{Driver, PacketRecord, Session, TabletInfo, WindowHandle, Wintab, WintabError},
	APP_NAME_CAPITALIZED,
};

// Current state of our app.
pub struct App<'a, D: Driver, P: PacketRecord> {
	pub window: &'a winit::window::Window,
	pub tablet_info: TabletInfo,
	pub session: Session<'a, D, P>,
	pub cadence: Cadence,
	pub total_packets: u64,
}

impl<'a, D: Driver, P: PacketRecord> App<'a, D, P> {
	// Queries the tablet and opens a context delivering to the window.
	pub fn new(window: &'a winit::window::Window, wintab: &'a Wintab<D>, config: &Config) -> Result<Self, WintabError> {
		let tablet_info = wintab.tablet_info();
		log::info!("Wintab: found {} connected devices", tablet_info.device_count);
		if let Some(interface_id) = &tablet_info.interface_id {
			log::debug!("Wintab interface: {interface_id}");
		}
		match &tablet_info.device_name {
			Some(device_name) => {
				log::info!("Tablet found: {device_name}");
				window.set_title(&format!("{device_name} - {APP_NAME_CAPITALIZED}"));
			},
			None => log::warn!("No tablet is connected"),
		}
		for (name, axis) in [("x", &tablet_info.x), ("y", &tablet_info.y)] {
			log::debug!("Tablet {name}: {}..={} at {} per {:?}", axis.min, axis.max, axis.resolution(), axis.units());
		}
		match &tablet_info.z {
			Some(z) => log::debug!("Tablet z: {}..={}", z.min, z.max),
			None => log::debug!("Tablet has no z axis"),
		}
		log::debug!("Tablet pressure: normal {:?}, tangential {:?}", tablet_info.normal_pressure, tablet_info.tangent_pressure);

		let screen = VirtualScreen::query(window).unwrap_or_else(|| {
			log::warn!("Couldn't measure the virtual screen; assuming {:?}", VirtualScreen::FALLBACK);
			VirtualScreen::FALLBACK
		});

		let logical_context = wintab.default_context(config.default_context)?.configure::<P>(&tablet_info.x, &tablet_info.y, &screen, &config.context);

		let mut session = Session::new(wintab, config.packet_capacity);
		session.open(WindowHandle::from_window(window)?, &logical_context)?;
		match session.logical_context() {
			Ok(opened) => log::debug!("Opened {opened:?}"),
			Err(error) => log::debug!("Couldn't read the opened context back: {error}"),
		}

		Ok(Self {
			window,
			tablet_info,
			session,
			cadence: Cadence::new(config.poll_interval, Instant::now()),
			total_packets: 0,
		})
	}

	// Runs the event loop with the event handler.
	pub fn run(mut self, event_loop: EventLoop<()>) -> Result<(), EventLoopError> {
		event_loop.run(move |event, window_target| self.handle_event(event, window_target))
	}

	// Handles a single event.
	fn handle_event(&mut self, event: Event<()>, window_target: &EventLoopWindowTarget<()>) {
		match event {
			Event::WindowEvent { event: WindowEvent::CloseRequested, window_id } if window_id == self.window.id() => window_target.exit(),
			Event::AboutToWait => {
				if self.cadence.is_due(Instant::now()) {
					self.poll();
				}
				window_target.set_control_flow(ControlFlow::WaitUntil(self.cadence.next()));
			},
			// Stop polling, then release the context.
			Event::LoopExiting => {
				if self.session.is_open() {
					if let Err(error) = self.session.close() {
						log::error!("Couldn't close the tablet context: {error}");
					}
				}
				log::info!("Received {} packets in total", self.total_packets);
			},
			_ => {},
		}
	}

	fn poll(&mut self) {
		let capacity = self.session.capacity();
		let packets = match self.session.poll() {
			Ok(packets) => packets,
			Err(error) => {
				log::error!("Couldn't poll the tablet context: {error}");
				return;
			},
		};
		let count = packets.len();
		for sample in packets.iter().map(PacketRecord::sample) {
			log::trace!(
				"Packet {}: cursor {}, buttons {:#b}, ({}, {}), pressure {}, time {:?}",
				sample.serial_number,
				sample.cursor,
				sample.buttons,
				sample.x,
				sample.y,
				sample.normal_pressure,
				sample.time,
			);
		}
		if let Some(latest) = packets.last().map(PacketRecord::sample) {
			log::info!(
				"{} | Packet serial number: {} | X: {}, Y: {}, Pressure: {}",
				self.tablet_info.device_name.as_deref().unwrap_or("No tablet"),
				latest.serial_number,
				latest.x,
				latest.y,
				latest.normal_pressure,
			);
		}
		self.total_packets += count as u64;

		// The driver decides what happens to packets that don't fit in its queue.
		if count == capacity {
			let waiting = self.session.queue_size().unwrap_or(0);
			log::warn!("Packet buffer filled ({capacity} packets, {waiting} still queued); samples may be dropped");
		}
	}
}
