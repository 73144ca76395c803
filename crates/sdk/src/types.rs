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

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Time in force for limit orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
	/// Add liquidity only (post only)
	Alo,
	/// Immediate or cancel
	Ioc,
	/// Good till cancel
	Gtc,
}

/// Limit order parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
	pub tif: TimeInForce,
}

/// Order type as carried on the wire
///
/// Serializes externally tagged, e.g. `{"limit": {"tif": "Gtc"}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
	Limit(Limit),
}

impl OrderType {
	pub fn limit(tif: TimeInForce) -> Self {
		OrderType::Limit(Limit { tif })
	}
}

/// High-level order request accepted by [`crate::ExchangeClient::order`]
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
	/// Asset symbol (e.g., "HYPE")
	pub coin: String,
	pub is_buy: bool,
	pub sz: Decimal,
	pub limit_px: Decimal,
	pub order_type: OrderType,
	pub reduce_only: bool,
	/// Client order id (16-byte hex, `0x`-prefixed)
	pub cloid: Option<String>,
}

/// Order in wire form
///
/// Field order is significant: the msgpack encoding of the action is hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWire {
	/// Asset index
	#[serde(rename = "a")]
	pub asset: u32,
	#[serde(rename = "b")]
	pub is_buy: bool,
	/// Limit price
	#[serde(rename = "p")]
	pub limit_px: String,
	/// Size
	#[serde(rename = "s")]
	pub sz: String,
	#[serde(rename = "r")]
	pub reduce_only: bool,
	#[serde(rename = "t")]
	pub order_type: OrderType,
	#[serde(rename = "c", skip_serializing_if = "Option::is_none", default)]
	pub cloid: Option<String>,
}

/// Order grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grouping {
	Na,
	NormalTpsl,
	PositionTpsl,
}

/// Batch of orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkOrder {
	pub orders: Vec<OrderWire>,
	pub grouping: Grouping,
}

/// L1 action, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
	Order(BulkOrder),
}

impl Action {
	pub fn order(orders: Vec<OrderWire>) -> Self {
		Action::Order(BulkOrder {
			orders,
			grouping: Grouping::Na,
		})
	}
}

/// ECDSA signature in the `{r, s, v}` form the exchange expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
	pub r: String,
	pub s: String,
	pub v: u8,
}

/// Signed request body posted to `/exchange`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePayload {
	pub action: Action,
	pub nonce: u64,
	pub signature: Signature,
	pub vault_address: Option<String>,
	pub expires_after: Option<u64>,
}

/// Raw exchange response
///
/// `{"status": "ok", "response": {...}}` or `{"status": "err", "response": "..."}`.
/// The raw JSON is kept so callers can display it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeResponse {
	pub status: String,
	#[serde(default)]
	pub response: Value,
}

impl ExchangeResponse {
	pub fn is_ok(&self) -> bool {
		self.status == "ok"
	}

	/// Per-order statuses of an accepted order action, in order
	///
	/// Each entry parses on its own; an unrecognized status comes back as
	/// its raw JSON. Empty when the response carries no `data.statuses` list.
	pub fn statuses(&self) -> Vec<Result<OrderStatus, Value>> {
		self.response
			.get("data")
			.and_then(|d| d.get("statuses"))
			.and_then(Value::as_array)
			.map(|statuses| {
				statuses
					.iter()
					.map(|status| serde_json::from_value(status.clone()).map_err(|_| status.clone()))
					.collect()
			})
			.unwrap_or_default()
	}
}

/// Resting order acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrder {
	pub oid: u64,
}

/// Fill acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledOrder {
	pub oid: u64,
	pub total_sz: String,
	pub avg_px: String,
}

/// Outcome of a single order within an order action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
	Success,
	WaitingForFill,
	WaitingForTrigger,
	Resting(RestingOrder),
	Filled(FilledOrder),
	Error(String),
}

/// Margin summary block of a clearinghouse state
///
/// Every field is optional so an empty object (`{}`) deserializes. Fields
/// not modelled here are kept in `other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarginSummary {
	pub account_value: Option<String>,
	pub total_margin_used: Option<String>,
	pub total_ntl_pos: Option<String>,
	pub total_raw_usd: Option<String>,
	#[serde(flatten)]
	pub other: serde_json::Map<String, Value>,
}

impl MarginSummary {
	/// True for an object with no fields at all
	pub fn is_empty(&self) -> bool {
		self.account_value.is_none()
			&& self.total_margin_used.is_none()
			&& self.total_ntl_pos.is_none()
			&& self.total_raw_usd.is_none()
			&& self.other.is_empty()
	}
}

/// Clearinghouse state for a user (`{"type": "clearinghouseState"}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserState {
	pub margin_summary: Option<MarginSummary>,
	pub cross_margin_summary: Option<MarginSummary>,
	pub withdrawable: Option<String>,
	pub asset_positions: Vec<Value>,
}

/// Perpetual asset descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMeta {
	pub name: String,
	#[serde(default)]
	pub sz_decimals: u32,
}

/// Perpetuals metadata (`{"type": "meta"}`); index into `universe` is the asset id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
	#[serde(default)]
	pub universe: Vec<AssetMeta>,
}

impl Meta {
	/// Index of the first asset named `coin`
	pub fn asset_index(&self, coin: &str) -> Option<u32> {
		self.universe
			.iter()
			.position(|asset| asset.name == coin)
			.map(|idx| idx as u32)
	}
}
