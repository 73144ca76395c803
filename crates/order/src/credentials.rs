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

use hlforge_sdk::{Address, Wallet};
use tracing::info;

use crate::config::PRIVATE_KEY_VAR;
use crate::error::WorkflowError;

/// Strip surrounding whitespace and one leading `0x`
pub fn normalize_key(raw: &str) -> &str {
	let trimmed = raw.trim();
	trimmed.strip_prefix("0x").unwrap_or(trimmed)
}

/// Loaded signing identity
#[derive(Debug, Clone)]
pub struct Credentials {
	wallet: Wallet,
}

impl Credentials {
	/// Derive the wallet from the raw `PRIVATE_KEY` value
	///
	/// Absent or blank keys are a configuration error.
	pub fn load(raw: Option<&str>) -> Result<Self, WorkflowError> {
		let raw = raw
			.filter(|key| !key.trim().is_empty())
			.ok_or_else(|| {
				WorkflowError::Configuration(format!(
					"{} environment variable not set",
					PRIVATE_KEY_VAR
				))
			})?;

		let wallet = Wallet::from_hex(normalize_key(raw))?;
		info!(address = %wallet.address(), "Wallet loaded");
		Ok(Self { wallet })
	}

	pub fn address(&self) -> Address {
		self.wallet.address()
	}

	pub fn into_wallet(self) -> Wallet {
		self.wallet
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

	#[test]
	fn test_normalize_key() {
		assert_eq!(normalize_key("0xabc"), "abc");
		assert_eq!(normalize_key("  abc\n"), "abc");
		assert_eq!(normalize_key("abc"), "abc");
	}

	#[test]
	fn test_prefix_does_not_change_identity() {
		let bare = Credentials::load(Some(KEY)).unwrap();
		let prefixed = Credentials::load(Some(&format!("0x{}", KEY))).unwrap();
		assert_eq!(bare.address(), prefixed.address());
	}

	#[test]
	fn test_missing_key() {
		assert!(matches!(
			Credentials::load(None),
			Err(WorkflowError::Configuration(_))
		));
		assert!(matches!(
			Credentials::load(Some("   ")),
			Err(WorkflowError::Configuration(_))
		));
	}

	#[test]
	fn test_malformed_key() {
		assert!(matches!(
			Credentials::load(Some("0xnot-a-key")),
			Err(WorkflowError::Configuration(_))
		));
	}
}
