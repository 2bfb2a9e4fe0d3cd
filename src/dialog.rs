// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::wintab::WintabError;

// Tells the user the driver couldn't be loaded, through a message box where one is available.
pub fn show_driver_missing(error: &WintabError) {
	log::error!("{error}");

	#[cfg(target_os = "windows")]
	{
		let _ = rfd::MessageDialog::new()
			.set_level(rfd::MessageLevel::Error)
			.set_title("Couldn't load wintab32.dll")
			.set_description(error.to_string())
			.set_buttons(rfd::MessageButtons::Ok)
			.show();
	}
}
