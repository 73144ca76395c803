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

use hlforge_sdk::{ClientError, WalletError};
use thiserror::Error;

/// Error types for the order workflow
///
/// Configuration and asset errors abort a run. Account inspection never
/// surfaces an error (see [`crate::account::AccountInspection`]).
#[derive(Debug, Error)]
pub enum WorkflowError {
	#[error("Configuration error: {0}")]
	Configuration(String),
	#[error("Asset {0} not found in universe")]
	AssetNotFound(String),
	#[error("External service error: {0}")]
	ExternalService(#[from] ClientError),
	#[error("Output error: {0}")]
	Output(#[from] std::io::Error),
}

impl From<WalletError> for WorkflowError {
	fn from(e: WalletError) -> Self {
		WorkflowError::Configuration(format!("Invalid private key: {}", e))
	}
}

impl From<config::ConfigError> for WorkflowError {
	fn from(e: config::ConfigError) -> Self {
		WorkflowError::Configuration(e.to_string())
	}
}
