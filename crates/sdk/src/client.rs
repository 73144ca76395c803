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

use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::signing::{SigningError, decimal_to_wire, sign_l1_action};
use crate::types::{
	Action, ExchangePayload, ExchangeResponse, Meta, OrderRequest, OrderWire, UserState,
};
use crate::wallet::{Address, Wallet};

/// Mainnet API base URL
pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";

/// Testnet API base URL
pub const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";

/// Default HTTP timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Server error: {0}")]
	Server(String),
	#[error("Signing error: {0}")]
	Signing(#[from] SigningError),
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	#[error("Unknown asset: {0}")]
	UnknownAsset(String),
}

/// Current time in milliseconds, used as the action nonce
pub fn timestamp_ms() -> u64 {
	chrono::Utc::now().timestamp_millis() as u64
}

fn build_http_client(timeout: Duration) -> Result<ReqwestClient, ClientError> {
	ReqwestClient::builder()
		.timeout(timeout)
		.build()
		.map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))
}

async fn post_json<B: Serialize, T: DeserializeOwned>(
	client: &ReqwestClient,
	url: &str,
	body: &B,
) -> Result<T, ClientError> {
	let response = client
		.post(url)
		.json(body)
		.send()
		.await
		.map_err(|e| ClientError::Network(format!("Request failed: {}", e)))?;

	if !response.status().is_success() {
		let status = response.status();
		let error_text = response
			.text()
			.await
			.unwrap_or_else(|_| format!("HTTP {}", status));
		return Err(ClientError::Server(format!("{}: {}", status, error_text)));
	}

	response
		.json()
		.await
		.map_err(|e| ClientError::Serialization(format!("Failed to parse response: {}", e)))
}

/// Read-only client for the `/info` endpoint
#[derive(Debug, Clone)]
pub struct InfoClient {
	base_url: String,
	client: ReqwestClient,
}

impl InfoClient {
	/// Create a new client with the given base URL
	pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
		Self::with_timeout(base_url, DEFAULT_TIMEOUT)
	}

	/// Create a new client with a custom timeout
	pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
		Ok(Self {
			base_url: base_url.into(),
			client: build_http_client(timeout)?,
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	async fn query<T: DeserializeOwned>(&self, body: serde_json::Value) -> Result<T, ClientError> {
		let url = format!("{}/info", self.base_url);
		debug!(url = %url, request = %body, "info query");
		post_json(&self.client, &url, &body).await
	}

	/// Clearinghouse state (margin summaries, positions) of a user
	pub async fn user_state(&self, user: &Address) -> Result<UserState, ClientError> {
		self.query(json!({"type": "clearinghouseState", "user": user.to_hex()}))
			.await
	}

	/// Perpetuals universe
	pub async fn meta(&self) -> Result<Meta, ClientError> {
		self.query(json!({"type": "meta"})).await
	}
}

/// Signing client for the `/exchange` endpoint
///
/// Orders are addressed by symbol; the client resolves the asset index from
/// `meta` itself, builds the wire action, signs it, and posts it.
pub struct ExchangeClient {
	wallet: Wallet,
	base_url: String,
	vault_address: Option<String>,
	expires_after: Option<u64>,
	info: InfoClient,
	client: ReqwestClient,
}

impl ExchangeClient {
	/// Create a new exchange client
	///
	/// `vault_address` selects a sub-account; `None` trades the main account.
	pub fn new(
		wallet: Wallet,
		base_url: impl Into<String>,
		vault_address: Option<String>,
	) -> Result<Self, ClientError> {
		let base_url = base_url.into();
		Ok(Self {
			wallet,
			info: InfoClient::new(base_url.clone())?,
			client: build_http_client(DEFAULT_TIMEOUT)?,
			base_url,
			vault_address,
			expires_after: None,
		})
	}

	/// Reject the action if it lands after `expires_after` (ms)
	pub fn with_expires_after(mut self, expires_after: Option<u64>) -> Self {
		self.expires_after = expires_after;
		self
	}

	pub fn address(&self) -> Address {
		self.wallet.address()
	}

	/// Signing domain source follows the base URL
	pub fn is_mainnet(&self) -> bool {
		self.base_url == MAINNET_API_URL
	}

	/// Place a single order
	pub async fn order(&self, request: OrderRequest) -> Result<ExchangeResponse, ClientError> {
		self.bulk_orders(vec![request]).await
	}

	/// Place several orders in one signed action
	pub async fn bulk_orders(
		&self,
		requests: Vec<OrderRequest>,
	) -> Result<ExchangeResponse, ClientError> {
		let meta = self.info.meta().await?;

		let orders = requests
			.into_iter()
			.map(|request| {
				let asset = meta
					.asset_index(&request.coin)
					.ok_or_else(|| ClientError::UnknownAsset(request.coin.clone()))?;
				to_order_wire(request, asset)
			})
			.collect::<Result<Vec<_>, _>>()?;

		let nonce = timestamp_ms();
		let payload = self.signed_payload(Action::order(orders), nonce)?;

		let url = format!("{}/exchange", self.base_url);
		debug!(url = %url, nonce, "posting signed action");
		post_json(&self.client, &url, &payload).await
	}

	fn signed_payload(&self, action: Action, nonce: u64) -> Result<ExchangePayload, ClientError> {
		let signature = sign_l1_action(
			&self.wallet,
			&action,
			self.vault_address.as_deref(),
			nonce,
			self.expires_after,
			self.is_mainnet(),
		)?;

		Ok(ExchangePayload {
			action,
			nonce,
			signature,
			vault_address: self.vault_address.clone(),
			expires_after: self.expires_after,
		})
	}
}

/// Convert a high-level request to its wire form for `asset`
pub fn to_order_wire(request: OrderRequest, asset: u32) -> Result<OrderWire, ClientError> {
	Ok(OrderWire {
		asset,
		is_buy: request.is_buy,
		limit_px: decimal_to_wire(request.limit_px)?,
		sz: decimal_to_wire(request.sz)?,
		reduce_only: request.reduce_only,
		order_type: request.order_type,
		cloid: request.cloid,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::signing::{action_hash, agent_digest, recover_signer};
	use crate::types::{OrderType, TimeInForce};
	use rust_decimal_macros::dec;

	const KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

	#[test]
	fn test_client_creation() {
		let client = InfoClient::new("http://localhost:3001").unwrap();
		assert_eq!(client.base_url(), "http://localhost:3001");
	}

	#[test]
	fn test_network_follows_base_url() {
		let wallet = Wallet::from_hex(KEY).unwrap();
		let mainnet = ExchangeClient::new(wallet.clone(), MAINNET_API_URL, None).unwrap();
		let testnet = ExchangeClient::new(wallet, TESTNET_API_URL, None).unwrap();
		assert!(mainnet.is_mainnet());
		assert!(!testnet.is_mainnet());
	}

	#[test]
	fn test_payload_carries_expires_after() {
		let wallet = Wallet::from_hex(KEY).unwrap();
		let action = Action::order(vec![
			to_order_wire(
				OrderRequest {
					coin: "BTC".to_string(),
					is_buy: false,
					sz: dec!(0.001),
					limit_px: dec!(90000),
					order_type: OrderType::limit(TimeInForce::Gtc),
					reduce_only: false,
					cloid: None,
				},
				0,
			)
			.unwrap(),
		]);

		let client = ExchangeClient::new(wallet.clone(), MAINNET_API_URL, None)
			.unwrap()
			.with_expires_after(Some(2000));
		let payload = client.signed_payload(action.clone(), 1000).unwrap();
		let body = serde_json::to_value(&payload).unwrap();
		assert_eq!(body["expiresAfter"], json!(2000));
		assert_eq!(body["vaultAddress"], serde_json::Value::Null);
		assert_eq!(body["nonce"], json!(1000));

		// The signature must cover the expiry
		let id = action_hash(&action, None, 1000, Some(2000)).unwrap();
		let signer = recover_signer(&agent_digest(&id, true), &payload.signature).unwrap();
		assert_eq!(signer, wallet.address());

		let unexpiring = ExchangeClient::new(wallet, MAINNET_API_URL, None).unwrap();
		let plain = unexpiring.signed_payload(action, 1000).unwrap();
		assert_eq!(plain.expires_after, None);
		assert_ne!(plain.signature, payload.signature);
	}

	#[test]
	fn test_to_order_wire() {
		let wire = to_order_wire(
			OrderRequest {
				coin: "HYPE".to_string(),
				is_buy: true,
				sz: dec!(0.40),
				limit_px: dec!(35.084),
				order_type: OrderType::limit(TimeInForce::Ioc),
				reduce_only: false,
				cloid: None,
			},
			159,
		)
		.unwrap();
		assert_eq!(wire.asset, 159);
		assert_eq!(wire.sz, "0.4");
		assert_eq!(wire.limit_px, "35.084");
		assert_eq!(wire.order_type, OrderType::limit(TimeInForce::Ioc));
	}
}
