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

//! Vault-parameter signing probe
//!
//! Signs one fixed order action twice, with the vault omitted and with the
//! vault set to the empty string, and reports both action hashes. The two
//! encodings differ (`0x00` flag vs `0x01` flag with no address bytes), so the
//! hashes are expected to diverge.

use std::{fmt, io::Write};

use hlforge_sdk::{
	Action, OrderType, OrderWire, Signature, SigningError, TimeInForce, Wallet, action_hash,
	sign_l1_action,
};
use tracing::{debug, warn};

/// Throwaway key used only by the probe
pub const PROBE_KEY: &str = "1111111111111111111111111111111111111111111111111111111111111111";
pub const PROBE_NONCE: u64 = 1000;
pub const PROBE_EXPIRES_AFTER: u64 = 2000;
/// Hex characters of the action hash shown per variant
pub const HASH_PREFIX_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultVariant {
	Omitted,
	Empty,
}

impl VaultVariant {
	pub const ALL: [VaultVariant; 2] = [VaultVariant::Omitted, VaultVariant::Empty];

	pub fn vault_address(&self) -> Option<&'static str> {
		match self {
			VaultVariant::Omitted => None,
			VaultVariant::Empty => Some(""),
		}
	}
}

impl fmt::Display for VaultVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			VaultVariant::Omitted => f.write_str("vault omitted"),
			VaultVariant::Empty => f.write_str("vault \"\""),
		}
	}
}

/// Asset 0, buy 0.1 @ 100, GTC, grouping `na`
pub fn sample_action() -> Action {
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedSample {
	pub hash: [u8; 32],
	pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
	pub variant: VaultVariant,
	pub outcome: Result<SignedSample, String>,
}

impl ProbeResult {
	/// First [`HASH_PREFIX_LEN`] hex characters of the action hash
	pub fn hash_prefix(&self) -> Option<String> {
		self.outcome.as_ref().ok().map(|signed| {
			let mut digits = hex::encode(signed.hash);
			digits.truncate(HASH_PREFIX_LEN);
			digits
		})
	}
}

fn sign_variant(
	wallet: &Wallet,
	action: &Action,
	variant: VaultVariant,
) -> Result<SignedSample, SigningError> {
	let vault = variant.vault_address();
	let hash = action_hash(action, vault, PROBE_NONCE, Some(PROBE_EXPIRES_AFTER))?;
	let signature = sign_l1_action(
		wallet,
		action,
		vault,
		PROBE_NONCE,
		Some(PROBE_EXPIRES_AFTER),
		true,
	)?;
	Ok(SignedSample { hash, signature })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
	pub results: Vec<ProbeResult>,
}

impl ProbeReport {
	pub fn all_signed(&self) -> bool {
		self.results.iter().all(|r| r.outcome.is_ok())
	}

	/// True when every variant signed and no two hashes agree
	pub fn hashes_diverge(&self) -> bool {
		if !self.all_signed() {
			return false;
		}
		let hashes: Vec<_> = self
			.results
			.iter()
			.filter_map(|r| r.outcome.as_ref().ok().map(|s| s.hash))
			.collect();
		hashes
			.iter()
			.enumerate()
			.all(|(i, a)| hashes[i + 1..].iter().all(|b| a != b))
	}

	pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
		writeln!(
			out,
			"Signing probe (nonce {}, expires after {}, mainnet)",
			PROBE_NONCE, PROBE_EXPIRES_AFTER
		)?;
		for result in &self.results {
			match &result.outcome {
				Ok(_) => writeln!(
					out,
					"  {}: signed, action hash {}...",
					result.variant,
					result.hash_prefix().unwrap_or_default()
				)?,
				Err(e) => writeln!(out, "  {}: FAILED - {}", result.variant, e)?,
			}
		}
		let verdict = if self.hashes_diverge() {
			"hashes diverge"
		} else {
			"hashes do NOT diverge"
		};
		writeln!(out, "Result: {}", verdict)
	}
}

/// Sign the sample action once per [`VaultVariant`]
pub fn run_probe(wallet: &Wallet) -> ProbeReport {
	let action = sample_action();
	let results = VaultVariant::ALL
		.into_iter()
		.map(|variant| {
			let outcome = sign_variant(wallet, &action, variant).map_err(|e| {
				warn!(%variant, error = %e, "Probe signing failed");
				e.to_string()
			});
			if let Ok(signed) = &outcome {
				debug!(
					%variant,
					hash = %hex::encode(signed.hash),
					v = signed.signature.v,
					"Probe signed"
				);
			}
			ProbeResult { variant, outcome }
		})
		.collect();
	ProbeReport { results }
}

#[cfg(test)]
mod tests {
	use super::*;
	use hlforge_sdk::{agent_digest, recover_signer};

	fn probe_wallet() -> Wallet {
		Wallet::from_hex(PROBE_KEY).unwrap()
	}

	#[test]
	fn test_both_variants_sign_and_diverge() {
		let report = run_probe(&probe_wallet());
		assert_eq!(report.results.len(), 2);
		assert!(report.all_signed());
		assert!(report.hashes_diverge());

		let omitted = report.results[0].hash_prefix().unwrap();
		let empty = report.results[1].hash_prefix().unwrap();
		assert_eq!(omitted, "c0d4ed7993086180cbc9");
		assert_eq!(empty, "7517126673fd468644e1");
		assert_eq!(omitted.len(), HASH_PREFIX_LEN);
	}

	#[test]
	fn test_signatures_recover_probe_wallet() {
		let wallet = probe_wallet();
		for result in run_probe(&wallet).results {
			let signed = result.outcome.unwrap();
			let digest = agent_digest(&signed.hash, true);
			assert_eq!(recover_signer(&digest, &signed.signature).unwrap(), wallet.address());
		}
	}

	#[test]
	fn test_render() {
		let mut out = Vec::new();
		run_probe(&probe_wallet()).render(&mut out).unwrap();
		let text = String::from_utf8(out).unwrap();
		assert!(text.contains("vault omitted: signed"));
		assert!(text.contains("vault \"\": signed"));
		assert!(text.contains("Result: hashes diverge"));
	}

	#[test]
	fn test_failed_variant_does_not_diverge() {
		let report = ProbeReport {
			results: vec![ProbeResult {
				variant: VaultVariant::Empty,
				outcome: Err("boom".to_string()),
			}],
		};
		assert!(!report.all_signed());
		assert!(!report.hashes_diverge());
		assert_eq!(report.results[0].hash_prefix(), None);
	}
}
