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

//! The order run: wallet, account, asset, submission
//!
//! [`run`] writes a human-readable report to `out` and returns the same
//! facts as a [`RunReport`]. A rejected order is a completed run.

use std::io::Write;

use hlforge_sdk::{Address, ExchangeClient, InfoClient, client::timestamp_ms};
use serde::Serialize;
use tracing::{info, warn};

use crate::account::{AccountInspection, MarginMode, inspect_account};
use crate::api::{InfoApi, OrderApi};
use crate::assets::fetch_asset_index;
use crate::config::{OrderConfig, RunConfig};
use crate::credentials::Credentials;
use crate::error::WorkflowError;
use crate::order::{OrderDescriptor, SubmissionOutcome, submit_order};

/// What a completed run observed
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
	pub address: Address,
	pub account: AccountInspection,
	pub asset_index: u32,
	pub outcome: SubmissionOutcome,
}

fn pretty<T: Serialize>(value: &T) -> Result<String, WorkflowError> {
	serde_json::to_string_pretty(value).map_err(|e| WorkflowError::Output(e.into()))
}

fn write_account<W: Write>(out: &mut W, account: &AccountInspection) -> std::io::Result<()> {
	writeln!(out, "Checking account state...")?;
	match account {
		AccountInspection::Snapshot(snapshot) => {
			writeln!(out, "  Account value: ${}", snapshot.account_value)?;
			writeln!(out, "  Margin used: ${}", snapshot.margin_used)?;
			writeln!(out, "  Free collateral: ${}", snapshot.free_collateral())?;
			match snapshot.margin_mode {
				MarginMode::Cross { account_value } => writeln!(
					out,
					"  Cross margin active (account value ${})",
					account_value
				),
				MarginMode::IsolatedOrFlat => writeln!(out, "  Isolated margin or no positions"),
			}
		}
		AccountInspection::Warning(message) => {
			writeln!(out, "  Warning: could not check account state: {}", message)
		}
	}
}

/// Run the order workflow against the given services
pub async fn run<I, E, W>(
	order: &OrderConfig,
	address: &Address,
	info: &I,
	exchange: &E,
	out: &mut W,
) -> Result<RunReport, WorkflowError>
where
	I: InfoApi + ?Sized,
	E: OrderApi + ?Sized,
	W: Write,
{
	writeln!(out, "=== HyperLiquid order ===")?;
	writeln!(out, "Wallet: {}", address)?;

	let account = inspect_account(info, address).await;
	write_account(out, &account)?;

	writeln!(out, "Looking up {}...", order.symbol)?;
	let asset_index = fetch_asset_index(info, &order.symbol).await?;
	writeln!(out, "  {} asset index: {}", order.symbol, asset_index)?;

	let descriptor = OrderDescriptor::build(order, asset_index)?;
	writeln!(out, "Order:")?;
	writeln!(out, "{}", pretty(&descriptor)?)?;
	writeln!(
		out,
		"Order type: {} ({})",
		order.order_type,
		order.order_type.label()
	)?;
	if let Some(vault) = &order.vault_address {
		writeln!(out, "Vault: {}", vault)?;
	}

	writeln!(out, "Submitting order...")?;
	let response = submit_order(exchange, order).await?;
	writeln!(out, "Response:")?;
	writeln!(out, "{}", pretty(&response)?)?;

	let outcome = SubmissionOutcome::from_response(&response);
	match &outcome {
		SubmissionOutcome::Accepted { outcomes } => {
			writeln!(out, "Order accepted")?;
			for (i, status) in outcomes.iter().enumerate() {
				writeln!(out, "  Order {}: {}", i, status)?;
			}
			info!(orders = outcomes.len(), "Order accepted");
		}
		SubmissionOutcome::Rejected { payload } => {
			writeln!(out, "Order failed: {}", payload)?;
			warn!(payload = %payload, "Order rejected by exchange");
		}
	}

	Ok(RunReport {
		address: *address,
		account,
		asset_index,
		outcome,
	})
}

/// Build the live clients from `config` and run
pub async fn execute<W: Write>(config: &RunConfig, out: &mut W) -> Result<RunReport, WorkflowError> {
	let credentials = Credentials::load(config.private_key.as_deref())?;
	let address = credentials.address();

	let expires_after = config.order.expires_after(timestamp_ms());
	let info = InfoClient::new(config.api_url.clone())?;
	let exchange = ExchangeClient::new(
		credentials.into_wallet(),
		config.api_url.clone(),
		config.order.vault_address.clone(),
	)?
	.with_expires_after(expires_after);
	info!(
		api_url = %config.api_url,
		mainnet = exchange.is_mainnet(),
		expires_after = ?expires_after,
		"Clients ready"
	);

	run(&config.order, &address, &info, &exchange, out).await
}
