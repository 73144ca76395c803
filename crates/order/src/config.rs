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

use std::env;

use hlforge_sdk::{Address, MAINNET_API_URL};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::order::OrderTypeVariant;

// Logging configuration constants
/// Default log level (can be overridden by RUST_LOG environment variable)
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log directory component name
pub const LOG_COMPONENT_NAME: &str = "order";

/// Default console output enabled (can be overridden by LOG_TO_CONSOLE environment variable)
pub const DEFAULT_LOG_TO_CONSOLE: bool = false;

// Runtime configuration constants
/// Environment variable holding the hex private key
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";

/// Default API base URL (can be overridden by HL_API_URL environment variable)
pub const DEFAULT_API_URL: &str = MAINNET_API_URL;

/// Default order file name, without extension (can be overridden by HLFORGE_CONFIG)
pub const DEFAULT_CONFIG_FILE: &str = "hlforge";

/// Prefix of the order override environment variables (ORDER_SYMBOL, ORDER_SIZE, ...)
pub const ORDER_ENV_PREFIX: &str = "ORDER";

/// Order to place
///
/// Every field falls back to the default order, so a config file or the
/// `ORDER_*` variables only need to name what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
	/// Asset symbol (e.g., "HYPE")
	pub symbol: String,
	/// true = buy/long, false = sell/short
	pub is_buy: bool,
	pub size: Decimal,
	pub limit_price: Decimal,
	/// Only reduce an existing position
	pub reduce_only: bool,
	pub order_type: OrderTypeVariant,
	/// Sub-account address (None for the main account)
	pub vault_address: Option<String>,
	/// Window in ms after the run starts during which the exchange accepts the order
	pub expires_in_ms: Option<u64>,
}

impl Default for OrderConfig {
	fn default() -> Self {
		Self {
			symbol: "HYPE".to_string(),
			is_buy: true,
			size: Decimal::new(4, 1),
			limit_price: Decimal::new(35084, 3),
			reduce_only: false,
			order_type: OrderTypeVariant::default(),
			vault_address: None,
			expires_in_ms: None,
		}
	}
}

impl OrderConfig {
	/// Load configuration from file
	///
	/// A missing file is not an error; environment overrides still apply.
	pub fn from_file(path: &str) -> Result<Self, WorkflowError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path).required(false))
			.add_source(config::Environment::with_prefix(ORDER_ENV_PREFIX))
			.build()?;

		let order: Self = cfg.try_deserialize()?;
		order.validated()
	}

	/// Check invariants and normalize the vault address
	///
	/// A blank vault address means the main account.
	pub fn validated(mut self) -> Result<Self, WorkflowError> {
		self.symbol = self.symbol.trim().to_string();
		if self.symbol.is_empty() {
			return Err(WorkflowError::Configuration(
				"Order symbol must not be empty".to_string(),
			));
		}
		if self.size <= Decimal::ZERO {
			return Err(WorkflowError::Configuration(format!(
				"Order size must be positive, got {}",
				self.size
			)));
		}
		if self.limit_price <= Decimal::ZERO {
			return Err(WorkflowError::Configuration(format!(
				"Limit price must be positive, got {}",
				self.limit_price
			)));
		}

		if self.expires_in_ms == Some(0) {
			return Err(WorkflowError::Configuration(
				"Expiry window must be positive".to_string(),
			));
		}

		self.vault_address = match self.vault_address.take() {
			Some(vault) if vault.trim().is_empty() => None,
			Some(vault) => {
				let address: Address = vault.trim().parse().map_err(|e| {
					WorkflowError::Configuration(format!("Invalid vault address {}: {}", vault, e))
				})?;
				Some(address.to_hex())
			}
			None => None,
		};

		Ok(self)
	}

	/// Absolute `expiresAfter` timestamp for a run starting at `now_ms`
	pub fn expires_after(&self, now_ms: u64) -> Option<u64> {
		self.expires_in_ms.map(|window| now_ms.saturating_add(window))
	}
}

/// Everything a run needs, loaded once at startup
#[derive(Debug, Clone)]
pub struct RunConfig {
	/// Raw `PRIVATE_KEY` value; checked by [`crate::credentials::Credentials::load`]
	pub private_key: Option<String>,
	pub api_url: String,
	pub order: OrderConfig,
}

impl RunConfig {
	/// Load from `.env` (if present), the process environment, and the order file
	pub fn from_env() -> Result<Self, WorkflowError> {
		dotenv::dotenv().ok();

		let private_key = env::var(PRIVATE_KEY_VAR).ok();

		let api_url = env::var("HL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
		let api_url = api_url.trim_end_matches('/').to_string();

		let config_file =
			env::var("HLFORGE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
		let order = OrderConfig::from_file(&config_file)?;

		Ok(Self {
			private_key,
			api_url,
			order,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hlforge_sdk::TimeInForce;
	use rust_decimal_macros::dec;

	#[test]
	fn test_default_order() {
		let order = OrderConfig::default();
		assert_eq!(order.symbol, "HYPE");
		assert!(order.is_buy);
		assert_eq!(order.size, dec!(0.4));
		assert_eq!(order.limit_price, dec!(35.084));
		assert!(!order.reduce_only);
		assert_eq!(order.order_type, OrderTypeVariant::Limit(TimeInForce::Ioc));
		assert_eq!(order.vault_address, None);
		assert_eq!(order.expires_after(1_000), None);
		assert!(order.validated().is_ok());
	}

	#[test]
	fn test_validation_rejects_bad_values() {
		let empty_symbol = OrderConfig {
			symbol: "  ".to_string(),
			..OrderConfig::default()
		};
		assert!(matches!(
			empty_symbol.validated(),
			Err(WorkflowError::Configuration(_))
		));

		let zero_size = OrderConfig {
			size: Decimal::ZERO,
			..OrderConfig::default()
		};
		assert!(zero_size.validated().is_err());

		let negative_price = OrderConfig {
			limit_price: dec!(-1),
			..OrderConfig::default()
		};
		assert!(negative_price.validated().is_err());

		let bad_vault = OrderConfig {
			vault_address: Some("0x1234".to_string()),
			..OrderConfig::default()
		};
		assert!(bad_vault.validated().is_err());
	}

	#[test]
	fn test_expiry_window() {
		let order = OrderConfig {
			expires_in_ms: Some(60_000),
			..OrderConfig::default()
		}
		.validated()
		.unwrap();
		assert_eq!(order.expires_after(1_700_000_000_000), Some(1_700_000_060_000));

		let zero = OrderConfig {
			expires_in_ms: Some(0),
			..OrderConfig::default()
		};
		assert!(matches!(zero.validated(), Err(WorkflowError::Configuration(_))));
	}

	#[test]
	fn test_vault_normalization() {
		let blank = OrderConfig {
			vault_address: Some(" ".to_string()),
			..OrderConfig::default()
		}
		.validated()
		.unwrap();
		assert_eq!(blank.vault_address, None);

		let checksummed = OrderConfig {
			vault_address: Some("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".to_string()),
			..OrderConfig::default()
		}
		.validated()
		.unwrap();
		assert_eq!(
			checksummed.vault_address.as_deref(),
			Some("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf")
		);
	}

	#[test]
	fn test_from_file_layers_over_defaults() {
		let dir = std::env::temp_dir().join(format!("hlforge-config-{}", std::process::id()));
		std::fs::create_dir_all(&dir).unwrap();
		let path = dir.join("order.toml");
		std::fs::write(
			&path,
			"symbol = \"BTC\"\nis_buy = false\nsize = \"0.001\"\norder_type = \"limit-gtc\"\nexpires_in_ms = 30000\n",
		)
		.unwrap();

		let order = OrderConfig::from_file(path.to_str().unwrap()).unwrap();
		assert_eq!(order.symbol, "BTC");
		assert!(!order.is_buy);
		assert_eq!(order.size, dec!(0.001));
		assert_eq!(order.limit_price, dec!(35.084));
		assert_eq!(order.order_type, OrderTypeVariant::Limit(TimeInForce::Gtc));
		assert_eq!(order.expires_in_ms, Some(30_000));

		std::fs::remove_dir_all(&dir).ok();
	}
}
