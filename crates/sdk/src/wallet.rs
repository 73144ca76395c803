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

//! secp256k1 wallet identity
//!
//! A [`Wallet`] owns the signing key; its [`Address`] is the Ethereum-style
//! identity the exchange keys accounts by (last 20 bytes of the Keccak-256
//! hash of the uncompressed public key).

use std::{fmt, str::FromStr};

use k256::ecdsa::{SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Error types for wallet operations
#[derive(Debug, Error)]
pub enum WalletError {
	#[error("Invalid hex: {0}")]
	InvalidHex(String),
	#[error("Invalid key length: expected 32 bytes, got {0}")]
	InvalidKeyLength(usize),
	#[error("Invalid private key: {0}")]
	InvalidKey(String),
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
}

/// 20-byte account address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
	pub const ZERO: Address = Address([0u8; 20]);

	pub fn as_bytes(&self) -> &[u8; 20] {
		&self.0
	}

	/// Derive the address of a secp256k1 public key
	pub fn from_verifying_key(key: &VerifyingKey) -> Self {
		let point = key.to_encoded_point(false);
		// Skip the 0x04 SEC1 tag, hash the 64-byte X || Y
		let hash = Keccak256::digest(&point.as_bytes()[1..]);
		let mut bytes = [0u8; 20];
		bytes.copy_from_slice(&hash[12..]);
		Self(bytes)
	}

	/// Lowercase `0x`-prefixed hex, the form the API expects
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(self.0))
	}

	/// EIP-55 mixed-case checksum encoding
	pub fn to_checksum(&self) -> String {
		let lower = hex::encode(self.0);
		let hash = Keccak256::digest(lower.as_bytes());

		let mut out = String::with_capacity(42);
		out.push_str("0x");
		for (i, c) in lower.chars().enumerate() {
			let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
			if c.is_ascii_alphabetic() && nibble >= 8 {
				out.push(c.to_ascii_uppercase());
			} else {
				out.push(c);
			}
		}
		out
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_checksum())
	}
}

impl FromStr for Address {
	type Err = WalletError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let digits = s.strip_prefix("0x").unwrap_or(s);
		let bytes = hex::decode(digits).map_err(|e| WalletError::InvalidHex(e.to_string()))?;
		let bytes: [u8; 20] = bytes
			.try_into()
			.map_err(|b: Vec<u8>| WalletError::InvalidAddress(format!("{} bytes", b.len())))?;
		Ok(Self(bytes))
	}
}

impl Serialize for Address {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

/// Signing wallet
#[derive(Clone)]
pub struct Wallet {
	signing_key: SigningKey,
	address: Address,
}

impl Wallet {
	/// Build a wallet from a hex private key, with or without `0x`
	pub fn from_hex(key: &str) -> Result<Self, WalletError> {
		let digits = key.trim();
		let digits = digits.strip_prefix("0x").unwrap_or(digits);
		let bytes = hex::decode(digits).map_err(|e| WalletError::InvalidHex(e.to_string()))?;
		Self::from_bytes(&bytes)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
		if bytes.len() != 32 {
			return Err(WalletError::InvalidKeyLength(bytes.len()));
		}
		let signing_key =
			SigningKey::from_slice(bytes).map_err(|e| WalletError::InvalidKey(e.to_string()))?;
		let address = Address::from_verifying_key(signing_key.verifying_key());
		Ok(Self {
			signing_key,
			address,
		})
	}

	pub fn address(&self) -> Address {
		self.address
	}

	pub(crate) fn signing_key(&self) -> &SigningKey {
		&self.signing_key
	}
}

impl fmt::Debug for Wallet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// Never print key material
		f.debug_struct("Wallet")
			.field("address", &self.address)
			.finish_non_exhaustive()
	}
}
