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

//! Seams to the external services
//!
//! The workflow only talks to these traits. The SDK clients implement them
//! for real runs; tests plug in fakes.

use async_trait::async_trait;
use hlforge_sdk::{
	Address, ClientError, ExchangeClient, ExchangeResponse, InfoClient, Meta, OrderRequest,
	UserState,
};

/// Read-only query service
#[async_trait]
pub trait InfoApi: Send + Sync {
	/// Margin summary and positions of a user
	async fn user_state(&self, user: &Address) -> Result<UserState, ClientError>;

	/// Tradable instrument universe
	async fn meta(&self) -> Result<Meta, ClientError>;
}

/// Signing and submission service
#[async_trait]
pub trait OrderApi: Send + Sync {
	/// Sign and submit one order
	async fn place_order(&self, request: OrderRequest) -> Result<ExchangeResponse, ClientError>;
}

#[async_trait]
impl InfoApi for InfoClient {
	async fn user_state(&self, user: &Address) -> Result<UserState, ClientError> {
		InfoClient::user_state(self, user).await
	}

	async fn meta(&self) -> Result<Meta, ClientError> {
		InfoClient::meta(self).await
	}
}

#[async_trait]
impl OrderApi for ExchangeClient {
	async fn place_order(&self, request: OrderRequest) -> Result<ExchangeResponse, ClientError> {
		self.order(request).await
	}
}
