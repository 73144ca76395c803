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

//! Order construction and response classification
//!
//! Two shapes of the same order exist here:
//!
//! - [`OrderDescriptor`], the canonical `{a, b, p, s, r, t}` record, built with
//!   the resolved asset index and used only for display.
//! - [`hlforge_sdk::OrderRequest`], the symbol-addressed request handed to the
//!   exchange client, which resolves the asset and builds the wire form again
//!   on its own.

use std::{fmt, str::FromStr};

use hlforge_sdk::{
	ExchangeResponse, OrderRequest, OrderStatus, OrderType, TimeInForce, signing::decimal_to_wire,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::api::OrderApi;
use crate::config::OrderConfig;
use crate::error::WorkflowError;

/// Order type as configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderTypeVariant {
	Limit(TimeInForce),
	/// Submitted as an IOC limit at the configured price, which caps slippage
	Market,
}

impl Default for OrderTypeVariant {
	fn default() -> Self {
		OrderTypeVariant::Limit(TimeInForce::Ioc)
	}
}

impl OrderTypeVariant {
	pub const ALL: [OrderTypeVariant; 4] = [
		OrderTypeVariant::Limit(TimeInForce::Ioc),
		OrderTypeVariant::Limit(TimeInForce::Gtc),
		OrderTypeVariant::Limit(TimeInForce::Alo),
		OrderTypeVariant::Market,
	];

	/// Configuration name
	pub fn name(&self) -> &'static str {
		match self {
			OrderTypeVariant::Limit(TimeInForce::Ioc) => "limit-ioc",
			OrderTypeVariant::Limit(TimeInForce::Gtc) => "limit-gtc",
			OrderTypeVariant::Limit(TimeInForce::Alo) => "limit-alo",
			OrderTypeVariant::Market => "market",
		}
	}

	/// Human-readable description
	pub fn label(&self) -> &'static str {
		match self {
			OrderTypeVariant::Limit(TimeInForce::Ioc) => {
				"IOC: executes immediately or cancels (requires less margin)"
			}
			OrderTypeVariant::Limit(TimeInForce::Gtc) => {
				"GTC: stays on the book until filled or canceled (requires more margin)"
			}
			OrderTypeVariant::Limit(TimeInForce::Alo) => {
				"ALO: post only, adds liquidity and earns the maker rebate (requires less margin)"
			}
			OrderTypeVariant::Market => "Market: executes at the best available price immediately",
		}
	}

	/// JSON form shown in the descriptor, e.g. `{"limit": {"tif": "Ioc"}}`
	pub fn display_json(&self) -> Value {
		match self {
			OrderTypeVariant::Limit(tif) => json!({"limit": {"tif": tif}}),
			OrderTypeVariant::Market => json!({"market": {}}),
		}
	}

	/// Order type submitted to the exchange
	pub fn to_order_type(&self) -> OrderType {
		match self {
			OrderTypeVariant::Limit(tif) => OrderType::limit(*tif),
			OrderTypeVariant::Market => OrderType::limit(TimeInForce::Ioc),
		}
	}
}

impl fmt::Display for OrderTypeVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for OrderTypeVariant {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"limit-ioc" | "ioc" => Ok(OrderTypeVariant::Limit(TimeInForce::Ioc)),
			"limit-gtc" | "gtc" => Ok(OrderTypeVariant::Limit(TimeInForce::Gtc)),
			"limit-alo" | "alo" => Ok(OrderTypeVariant::Limit(TimeInForce::Alo)),
			"market" => Ok(OrderTypeVariant::Market),
			other => Err(format!(
				"Unknown order type {:?} (expected limit-ioc, limit-gtc, limit-alo or market)",
				other
			)),
		}
	}
}

impl TryFrom<String> for OrderTypeVariant {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<OrderTypeVariant> for String {
	fn from(value: OrderTypeVariant) -> Self {
		value.name().to_string()
	}
}

/// Canonical order descriptor, for display only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDescriptor {
	/// Asset index
	pub a: u32,
	/// Buy
	pub b: bool,
	/// Limit price
	pub p: String,
	/// Size
	pub s: String,
	/// Reduce only
	pub r: bool,
	/// Order type
	pub t: Value,
}

impl OrderDescriptor {
	pub fn build(order: &OrderConfig, asset: u32) -> Result<Self, WorkflowError> {
		let wire = |value| {
			decimal_to_wire(value).map_err(|e| WorkflowError::Configuration(e.to_string()))
		};
		Ok(Self {
			a: asset,
			b: order.is_buy,
			p: wire(order.limit_price)?,
			s: wire(order.size)?,
			r: order.reduce_only,
			t: order.order_type.display_json(),
		})
	}
}

/// Symbol-addressed request for the exchange client
pub fn to_request(order: &OrderConfig) -> OrderRequest {
	OrderRequest {
		coin: order.symbol.clone(),
		is_buy: order.is_buy,
		sz: order.size,
		limit_px: order.limit_price,
		order_type: order.order_type.to_order_type(),
		reduce_only: order.reduce_only,
		cloid: None,
	}
}

/// Classified outcome of one order in an accepted action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
	Resting { oid: u64 },
	Filled { oid: u64, total_sz: String, avg_px: String },
	Error(String),
	/// Acknowledged without a fill or resting order yet
	Pending(&'static str),
	/// Status the client does not model, as returned
	Unrecognized(Value),
}

impl From<OrderStatus> for OrderOutcome {
	fn from(status: OrderStatus) -> Self {
		match status {
			OrderStatus::Resting(resting) => OrderOutcome::Resting { oid: resting.oid },
			OrderStatus::Filled(filled) => OrderOutcome::Filled {
				oid: filled.oid,
				total_sz: filled.total_sz,
				avg_px: filled.avg_px,
			},
			OrderStatus::Error(message) => OrderOutcome::Error(message),
			OrderStatus::Success => OrderOutcome::Pending("success"),
			OrderStatus::WaitingForFill => OrderOutcome::Pending("waiting for fill"),
			OrderStatus::WaitingForTrigger => OrderOutcome::Pending("waiting for trigger"),
		}
	}
}

impl fmt::Display for OrderOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderOutcome::Resting { oid } => write!(f, "Resting (Order ID: {})", oid),
			OrderOutcome::Filled {
				oid,
				total_sz,
				avg_px,
			} => write!(f, "Filled! {} @ {} (Order ID: {})", total_sz, avg_px, oid),
			OrderOutcome::Error(message) => write!(f, "Error - {}", message),
			OrderOutcome::Pending(state) => write!(f, "Acknowledged ({})", state),
			OrderOutcome::Unrecognized(raw) => write!(f, "Unrecognized status {}", raw),
		}
	}
}

/// Interpreted exchange response
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
	/// `status == "ok"`; one outcome per order
	Accepted { outcomes: Vec<OrderOutcome> },
	/// Any other status; the error payload as returned
	Rejected { payload: Value },
}

impl SubmissionOutcome {
	pub fn from_response(response: &ExchangeResponse) -> Self {
		if !response.is_ok() {
			return SubmissionOutcome::Rejected {
				payload: response.response.clone(),
			};
		}

		let outcomes = response
			.statuses()
			.into_iter()
			.map(|status| match status {
				Ok(status) => OrderOutcome::from(status),
				Err(raw) => {
					warn!(status = %raw, "Unrecognized order status");
					OrderOutcome::Unrecognized(raw)
				}
			})
			.collect();
		SubmissionOutcome::Accepted { outcomes }
	}
}

/// Submit the configured order once
///
/// No retries. Transport and signing failures surface as
/// [`WorkflowError::ExternalService`].
pub async fn submit_order<E: OrderApi + ?Sized>(
	exchange: &E,
	order: &OrderConfig,
) -> Result<ExchangeResponse, WorkflowError> {
	let request = to_request(order);
	info!(
		coin = %request.coin,
		is_buy = request.is_buy,
		sz = %request.sz,
		limit_px = %request.limit_px,
		order_type = %order.order_type,
		reduce_only = request.reduce_only,
		"Submitting order"
	);
	let response = exchange.place_order(request).await?;
	info!(status = %response.status, "Exchange responded");
	Ok(response)
}
