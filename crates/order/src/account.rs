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

//! Account inspection
//!
//! Inspection is informational: a failed query becomes
//! [`AccountInspection::Warning`] and the run goes on.

use std::str::FromStr;

use hlforge_sdk::{Address, ClientError, UserState};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::api::InfoApi;

/// Margin mode inferred from the clearinghouse state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginMode {
	/// Cross-margin summary present and non-empty
	Cross { account_value: Decimal },
	/// No cross-margin data: isolated margin, or no positions
	IsolatedOrFlat,
}

/// Point-in-time margin figures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSnapshot {
	pub account_value: Decimal,
	pub margin_used: Decimal,
	pub margin_mode: MarginMode,
}

/// Account value minus margin used
pub fn free_collateral(account_value: Decimal, margin_used: Decimal) -> Decimal {
	account_value - margin_used
}

fn parse_amount(field: &str, value: Option<&str>) -> Result<Decimal, ClientError> {
	match value {
		None => Ok(Decimal::ZERO),
		Some(raw) => Decimal::from_str(raw)
			.map_err(|e| ClientError::InvalidResponse(format!("{} = {:?}: {}", field, raw, e))),
	}
}

impl AccountSnapshot {
	/// Missing figures count as zero
	pub fn from_user_state(state: &UserState) -> Result<Self, ClientError> {
		let summary = state.margin_summary.clone().unwrap_or_default();
		let account_value = parse_amount("accountValue", summary.account_value.as_deref())?;
		let margin_used = parse_amount("totalMarginUsed", summary.total_margin_used.as_deref())?;

		let margin_mode = match &state.cross_margin_summary {
			Some(cross) if !cross.is_empty() => MarginMode::Cross {
				account_value: parse_amount(
					"crossMarginSummary.accountValue",
					cross.account_value.as_deref(),
				)?,
			},
			_ => MarginMode::IsolatedOrFlat,
		};

		Ok(Self {
			account_value,
			margin_used,
			margin_mode,
		})
	}

	pub fn free_collateral(&self) -> Decimal {
		free_collateral(self.account_value, self.margin_used)
	}
}

/// Result of the account inspection step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountInspection {
	Snapshot(AccountSnapshot),
	/// The state could not be fetched or read; carried as a message
	Warning(String),
}

/// Fetch and summarize the account state of `user`
pub async fn inspect_account<I: InfoApi + ?Sized>(info: &I, user: &Address) -> AccountInspection {
	let snapshot = match info.user_state(user).await {
		Ok(state) => AccountSnapshot::from_user_state(&state),
		Err(e) => Err(e),
	};

	match snapshot {
		Ok(snapshot) => {
			info!(
				account_value = %snapshot.account_value,
				margin_used = %snapshot.margin_used,
				free_collateral = %snapshot.free_collateral(),
				cross = matches!(snapshot.margin_mode, MarginMode::Cross { .. }),
				"Account state"
			);
			AccountInspection::Snapshot(snapshot)
		}
		Err(e) => {
			warn!(user = %user, error = %e, "Could not check account state");
			AccountInspection::Warning(e.to_string())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hlforge_sdk::MarginSummary;
	use rust_decimal_macros::dec;

	fn summary(value: &str, used: &str) -> MarginSummary {
		MarginSummary {
			account_value: Some(value.to_string()),
			total_margin_used: Some(used.to_string()),
			..MarginSummary::default()
		}
	}

	#[test]
	fn test_free_collateral() {
		assert_eq!(free_collateral(dec!(120.50), dec!(20.25)), dec!(100.25));
		assert_eq!(free_collateral(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
		assert_eq!(free_collateral(dec!(5), Decimal::ZERO), dec!(5));
		assert_eq!(free_collateral(dec!(0), dec!(0.0)), Decimal::ZERO);
	}

	#[test]
	fn test_snapshot_from_state() {
		let state = UserState {
			margin_summary: Some(summary("1000.0", "250.5")),
			cross_margin_summary: Some(summary("1000.0", "250.5")),
			..UserState::default()
		};
		let snapshot = AccountSnapshot::from_user_state(&state).unwrap();
		assert_eq!(snapshot.free_collateral(), dec!(749.5));
		assert_eq!(
			snapshot.margin_mode,
			MarginMode::Cross {
				account_value: dec!(1000)
			}
		);
	}

	#[test]
	fn test_empty_or_absent_cross_summary_is_isolated() {
		let empty = UserState {
			margin_summary: Some(summary("10", "0")),
			cross_margin_summary: Some(MarginSummary::default()),
			..UserState::default()
		};
		let absent = UserState {
			margin_summary: Some(summary("10", "0")),
			..UserState::default()
		};
		for state in [empty, absent] {
			let snapshot = AccountSnapshot::from_user_state(&state).unwrap();
			assert_eq!(snapshot.margin_mode, MarginMode::IsolatedOrFlat);
		}
	}

	#[test]
	fn test_any_cross_field_means_cross() {
		let cross: MarginSummary =
			serde_json::from_value(serde_json::json!({"totalNtlPos": "0.0", "futureField": 1}))
				.unwrap();
		let state = UserState {
			cross_margin_summary: Some(cross),
			..UserState::default()
		};
		let snapshot = AccountSnapshot::from_user_state(&state).unwrap();
		assert_eq!(
			snapshot.margin_mode,
			MarginMode::Cross {
				account_value: Decimal::ZERO
			}
		);
	}

	#[test]
	fn test_missing_summary_counts_as_zero() {
		let snapshot = AccountSnapshot::from_user_state(&UserState::default()).unwrap();
		assert_eq!(snapshot.account_value, Decimal::ZERO);
		assert_eq!(snapshot.margin_used, Decimal::ZERO);
		assert_eq!(snapshot.free_collateral(), Decimal::ZERO);
	}

	#[test]
	fn test_unparseable_amount() {
		let state = UserState {
			margin_summary: Some(summary("lots", "0")),
			..UserState::default()
		};
		assert!(matches!(
			AccountSnapshot::from_user_state(&state),
			Err(ClientError::InvalidResponse(_))
		));
	}
}
