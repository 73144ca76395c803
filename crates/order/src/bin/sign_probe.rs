// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sign a fixed sample order with the vault omitted and with an empty vault
//!
//! Uses a throwaway key and never touches the network.

use std::io;

use anyhow::{Context, Result, bail};
use hlforge_order::{
	logging::init_logging,
	probe::{PROBE_KEY, run_probe},
};
use hlforge_sdk::Wallet;
use tracing::info;

fn main() -> Result<()> {
	init_logging()?;

	let wallet = Wallet::from_hex(PROBE_KEY).context("Invalid probe key")?;
	info!(address = %wallet.address(), "Running signing probe");

	let report = run_probe(&wallet);
	report
		.render(&mut io::stdout().lock())
		.context("Failed to write probe report")?;

	if !report.all_signed() {
		bail!("Signing failed for at least one vault variant");
	}
	Ok(())
}
