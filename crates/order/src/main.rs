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

//! Place one signed order on HyperLiquid
//!
//! Reads `PRIVATE_KEY` (and optionally `.env`, `HL_API_URL`, the order
//! file and `ORDER_*` overrides), prints the account state, resolves the
//! asset and submits the order once. Exits non-zero on configuration or
//! asset errors; a rejected order still exits 0.

use std::io;

use anyhow::{Context, Result};
use hlforge_order::{RunConfig, SubmissionOutcome, execute, logging::init_logging};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	init_logging()?;

	let config = RunConfig::from_env().context("Failed to load configuration")?;
	info!(
		symbol = %config.order.symbol,
		order_type = %config.order.order_type,
		api_url = %config.api_url,
		"Starting order run"
	);

	let mut stdout = io::stdout().lock();
	let report = execute(&config, &mut stdout)
		.await
		.context("Order run failed")?;

	if let SubmissionOutcome::Rejected { .. } = report.outcome {
		// Rejections are reported on stdout; the exit status stays 0
		warn!("Order was rejected; exiting with status 0");
	}

	Ok(())
}
