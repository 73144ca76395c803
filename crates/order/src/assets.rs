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

use hlforge_sdk::AssetMeta;
use tracing::{debug, info};

use crate::api::InfoApi;
use crate::error::WorkflowError;

/// Position of the first asset named `symbol`
///
/// An empty universe is a configuration error, an absent symbol an
/// [`WorkflowError::AssetNotFound`].
pub fn resolve_asset(universe: &[AssetMeta], symbol: &str) -> Result<u32, WorkflowError> {
	if universe.is_empty() {
		return Err(WorkflowError::Configuration(
			"Failed to get meta: asset universe is empty".to_string(),
		));
	}

	universe
		.iter()
		.position(|asset| asset.name == symbol)
		.map(|idx| idx as u32)
		.ok_or_else(|| WorkflowError::AssetNotFound(symbol.to_string()))
}

/// Fetch the universe and resolve `symbol` against it
pub async fn fetch_asset_index<I: InfoApi + ?Sized>(
	info: &I,
	symbol: &str,
) -> Result<u32, WorkflowError> {
	let meta = info.meta().await?;
	debug!(assets = meta.universe.len(), "Fetched universe");

	let index = resolve_asset(&meta.universe, symbol)?;
	info!(symbol, index, "Resolved asset");
	Ok(index)
}
