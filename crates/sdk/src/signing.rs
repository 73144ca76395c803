// Copyright 2025 chenjjiaa
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

//! L1 action signing
//!
//! An L1 action is signed in two steps:
//!
//! 1. The action hash (`connectionId`) is Keccak-256 over
//!    `msgpack(action) || nonce_be64 || vault_flag [|| vault_bytes] [|| 0x00 || expires_be64]`.
//! 2. A "phantom agent" `Agent { source, connectionId }` is signed as EIP-712
//!    typed data under the `Exchange` domain (chain id 1337). `source` is
//!    `"a"` on mainnet and `"b"` elsewhere.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use rust_decimal::Decimal;
use serde::Serialize;
use sha3::{Digest, Keccak256};

use crate::types::Signature;
use crate::wallet::{Address, Wallet};

/// Maximum decimals accepted on the wire
pub const MAX_WIRE_DECIMALS: u32 = 8;

/// EIP-712 domain chain id used for L1 actions
pub const L1_CHAIN_ID: u64 = 1337;

const DOMAIN_NAME: &str = "Exchange";
const DOMAIN_VERSION: &str = "1";
const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
const AGENT_TYPE: &str = "Agent(string source,bytes32 connectionId)";

/// Error types for signing operations
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Signing error: {0}")]
	Signing(String),
	#[error("Invalid vault address: {0}")]
	InvalidVaultAddress(String),
	#[error("Value {0} has more than 8 decimals")]
	Precision(Decimal),
}

fn keccak(data: &[u8]) -> [u8; 32] {
	let mut out = [0u8; 32];
	out.copy_from_slice(&Keccak256::digest(data));
	out
}

/// Format a decimal for the wire: normalized, no trailing zeros, no `-0`
pub fn decimal_to_wire(value: Decimal) -> Result<String, SigningError> {
	let normalized = value.normalize();
	if normalized.scale() > MAX_WIRE_DECIMALS {
		return Err(SigningError::Precision(value));
	}
	if normalized.is_zero() {
		return Ok("0".to_string());
	}
	Ok(normalized.to_string())
}

/// Hash an action into its `connectionId`
///
/// `vault_address` is taken as hex text. `None` writes a single `0x00` flag;
/// `Some(..)` writes `0x01` followed by the decoded bytes, so an empty string
/// yields the flag with no address bytes and hashes differently from `None`.
pub fn action_hash<T: Serialize>(
	action: &T,
	vault_address: Option<&str>,
	nonce: u64,
	expires_after: Option<u64>,
) -> Result<[u8; 32], SigningError> {
	let mut data =
		rmp_serde::to_vec_named(action).map_err(|e| SigningError::Serialization(e.to_string()))?;

	data.extend_from_slice(&nonce.to_be_bytes());

	match vault_address {
		None => data.push(0x00),
		Some(vault) => {
			let digits = vault.strip_prefix("0x").unwrap_or(vault);
			let bytes = hex::decode(digits)
				.map_err(|e| SigningError::InvalidVaultAddress(format!("{}: {}", vault, e)))?;
			data.push(0x01);
			data.extend_from_slice(&bytes);
		}
	}

	if let Some(expires_after) = expires_after {
		data.push(0x00);
		data.extend_from_slice(&expires_after.to_be_bytes());
	}

	Ok(keccak(&data))
}

fn domain_separator() -> [u8; 32] {
	let mut encoded = Vec::with_capacity(32 * 5);
	encoded.extend_from_slice(&keccak(DOMAIN_TYPE.as_bytes()));
	encoded.extend_from_slice(&keccak(DOMAIN_NAME.as_bytes()));
	encoded.extend_from_slice(&keccak(DOMAIN_VERSION.as_bytes()));

	let mut chain_id = [0u8; 32];
	chain_id[24..].copy_from_slice(&L1_CHAIN_ID.to_be_bytes());
	encoded.extend_from_slice(&chain_id);

	// verifyingContract is the zero address, left-padded to 32 bytes
	let mut contract = [0u8; 32];
	contract[12..].copy_from_slice(Address::ZERO.as_bytes());
	encoded.extend_from_slice(&contract);

	keccak(&encoded)
}

/// EIP-712 digest of the phantom agent for a `connectionId`
pub fn agent_digest(connection_id: &[u8; 32], is_mainnet: bool) -> [u8; 32] {
	let source = if is_mainnet { "a" } else { "b" };

	let mut struct_data = Vec::with_capacity(32 * 3);
	struct_data.extend_from_slice(&keccak(AGENT_TYPE.as_bytes()));
	struct_data.extend_from_slice(&keccak(source.as_bytes()));
	struct_data.extend_from_slice(connection_id);
	let struct_hash = keccak(&struct_data);

	let mut message = Vec::with_capacity(2 + 64);
	message.extend_from_slice(&[0x19, 0x01]);
	message.extend_from_slice(&domain_separator());
	message.extend_from_slice(&struct_hash);
	keccak(&message)
}

/// Sign a prehashed 32-byte digest with recoverable ECDSA
pub fn sign_digest(wallet: &Wallet, digest: &[u8; 32]) -> Result<Signature, SigningError> {
	let (signature, recovery_id) = wallet
		.signing_key()
		.sign_prehash_recoverable(digest)
		.map_err(|e| SigningError::Signing(e.to_string()))?;

	let bytes = signature.to_bytes();
	Ok(Signature {
		r: format!("0x{}", hex::encode(&bytes[..32])),
		s: format!("0x{}", hex::encode(&bytes[32..])),
		v: 27 + recovery_id.to_byte(),
	})
}

/// Sign an L1 action
///
/// Takes the same inputs as [`action_hash`] plus the network selector.
pub fn sign_l1_action<T: Serialize>(
	wallet: &Wallet,
	action: &T,
	vault_address: Option<&str>,
	nonce: u64,
	expires_after: Option<u64>,
	is_mainnet: bool,
) -> Result<Signature, SigningError> {
	let connection_id = action_hash(action, vault_address, nonce, expires_after)?;
	let digest = agent_digest(&connection_id, is_mainnet);
	sign_digest(wallet, &digest)
}

/// Recover the signer address of a digest
pub fn recover_signer(digest: &[u8; 32], signature: &Signature) -> Result<Address, SigningError> {
	let decode = |field: &str| {
		hex::decode(field.strip_prefix("0x").unwrap_or(field))
			.map_err(|e| SigningError::Signing(format!("Invalid hex: {}", e)))
	};
	let mut bytes = decode(&signature.r)?;
	bytes.extend(decode(&signature.s)?);

	let ecdsa = EcdsaSignature::from_slice(&bytes)
		.map_err(|e| SigningError::Signing(format!("Invalid signature: {}", e)))?;
	let recovery_id = signature
		.v
		.checked_sub(27)
		.and_then(RecoveryId::from_byte)
		.ok_or_else(|| SigningError::Signing(format!("Invalid v: {}", signature.v)))?;

	let key = VerifyingKey::recover_from_prehash(digest, &ecdsa, recovery_id)
		.map_err(|e| SigningError::Signing(format!("Recovery failed: {}", e)))?;
	Ok(Address::from_verifying_key(&key))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{Action, OrderType, OrderWire, TimeInForce};
	use rust_decimal_macros::dec;

	fn sample_action() -> Action {
		Action::order(vec![OrderWire {
			asset: 0,
			is_buy: true,
			limit_px: "100".to_string(),
			sz: "0.1".to_string(),
			reduce_only: false,
			order_type: OrderType::limit(TimeInForce::Gtc),
			cloid: None,
		}])
	}

	fn wallet() -> Wallet {
		Wallet::from_hex(&"1".repeat(64)).unwrap()
	}

	#[test]
	fn test_decimal_to_wire() {
		assert_eq!(decimal_to_wire(dec!(35.0840)).unwrap(), "35.084");
		assert_eq!(decimal_to_wire(dec!(0.4)).unwrap(), "0.4");
		assert_eq!(decimal_to_wire(dec!(100.000)).unwrap(), "100");
		assert_eq!(decimal_to_wire(dec!(0.00000001)).unwrap(), "0.00000001");
		assert_eq!(decimal_to_wire(dec!(0.000)).unwrap(), "0");
		assert!(matches!(
			decimal_to_wire(dec!(0.000000001)),
			Err(SigningError::Precision(_))
		));
	}

	#[test]
	fn test_msgpack_starts_with_type_tag() {
		let encoded = rmp_serde::to_vec_named(&sample_action()).unwrap();
		// fixmap(3), fixstr "type", fixstr "order"
		assert_eq!(encoded[0], 0x83);
		assert_eq!(&encoded[1..6], &[0xa4, b't', b'y', b'p', b'e']);
		assert_eq!(&encoded[6..12], &[0xa5, b'o', b'r', b'd', b'e', b'r']);
	}

	#[test]
	fn test_action_hash_is_deterministic() {
		let a = action_hash(&sample_action(), None, 1000, Some(2000)).unwrap();
		let b = action_hash(&sample_action(), None, 1000, Some(2000)).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn test_action_hash_inputs_matter() {
		let base = action_hash(&sample_action(), None, 1000, Some(2000)).unwrap();
		let other_nonce = action_hash(&sample_action(), None, 1001, Some(2000)).unwrap();
		let no_expiry = action_hash(&sample_action(), None, 1000, None).unwrap();
		let vault = action_hash(
			&sample_action(),
			Some("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"),
			1000,
			Some(2000),
		)
		.unwrap();
		assert_ne!(base, other_nonce);
		assert_ne!(base, no_expiry);
		assert_ne!(base, vault);
	}

	#[test]
	fn test_empty_vault_diverges_from_none() {
		let none = action_hash(&sample_action(), None, 1000, Some(2000)).unwrap();
		let empty = action_hash(&sample_action(), Some(""), 1000, Some(2000)).unwrap();
		assert_ne!(none, empty);
	}

	#[test]
	fn test_invalid_vault_rejected() {
		assert!(matches!(
			action_hash(&sample_action(), Some("0xnothex"), 1000, None),
			Err(SigningError::InvalidVaultAddress(_))
		));
	}

	#[test]
	fn test_network_changes_digest() {
		let id = action_hash(&sample_action(), None, 1000, None).unwrap();
		assert_ne!(agent_digest(&id, true), agent_digest(&id, false));
	}

	#[test]
	fn test_signature_recovers_signer() {
		let wallet = wallet();
		for is_mainnet in [true, false] {
			let signature =
				sign_l1_action(&wallet, &sample_action(), None, 1000, Some(2000), is_mainnet)
					.unwrap();
			assert!(signature.v == 27 || signature.v == 28);
			assert_eq!(signature.r.len(), 66);
			assert_eq!(signature.s.len(), 66);

			let id = action_hash(&sample_action(), None, 1000, Some(2000)).unwrap();
			let digest = agent_digest(&id, is_mainnet);
			assert_eq!(recover_signer(&digest, &signature).unwrap(), wallet.address());
		}
	}

	fn order_action(asset: u32, sz: Decimal, px: Decimal, tif: TimeInForce) -> Action {
		Action::order(vec![OrderWire {
			asset,
			is_buy: true,
			limit_px: decimal_to_wire(px).unwrap(),
			sz: decimal_to_wire(sz).unwrap(),
			reduce_only: false,
			order_type: OrderType::limit(tif),
			cloid: None,
		}])
	}

	// Reference vectors published with the HyperLiquid Python SDK
	#[test]
	fn test_known_order_signatures() {
		let wallet =
			Wallet::from_hex("0x0123456789012345678901234567890123456789012345678901234567890123")
				.unwrap();
		let action = order_action(1, dec!(100), dec!(100), TimeInForce::Gtc);

		let mainnet = sign_l1_action(&wallet, &action, None, 0, None, true).unwrap();
		assert_eq!(
			mainnet.r,
			"0xd65369825a9df5d80099e513cce430311d7d26ddf477f5b3a33d2806b100d78e"
		);
		assert_eq!(
			mainnet.s,
			"0x2b54116ff64054968aa237c20ca9ff68000f977c93289157748a3162b6ea940e"
		);
		assert_eq!(mainnet.v, 28);

		let testnet = sign_l1_action(&wallet, &action, None, 0, None, false).unwrap();
		assert!(testnet.r.starts_with("0x82b2ba28"));
		assert!(testnet.r.ends_with("3d54"));
		assert_eq!(testnet.v, 27);
	}

	#[test]
	fn test_known_connection_id() {
		let action = order_action(4, dec!(0.0147), dec!(1670.1), TimeInForce::Ioc);
		let id = action_hash(&action, None, 1677777606040, None).unwrap();
		assert_eq!(
			hex::encode(id),
			"0fcbeda5ae3c4950a548021552a4fea2226858c4453571bf3f24ba017eac2908"
		);
	}

	#[test]
	fn test_signing_is_deterministic() {
		let wallet = wallet();
		let a = sign_l1_action(&wallet, &sample_action(), Some(""), 1000, Some(2000), true).unwrap();
		let b = sign_l1_action(&wallet, &sample_action(), Some(""), 1000, Some(2000), true).unwrap();
		assert_eq!(a, b);
	}
}
