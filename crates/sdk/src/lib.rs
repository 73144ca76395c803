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

//! hlforge SDK - Client library for the HyperLiquid exchange API
//!
//! This crate provides typed clients for the info and exchange endpoints,
//! shared request/response structures, wallet identity, and L1 action signing.
//!
//! The SDK is designed to be lightweight and embeddable:
//! - No background threads
//! - No runtime initialization
//! - No environment or configuration loading

pub mod client;
pub mod signing;
pub mod types;
pub mod wallet;

pub use client::{ClientError, ExchangeClient, InfoClient, MAINNET_API_URL, TESTNET_API_URL};
pub use signing::{SigningError, action_hash, agent_digest, recover_signer, sign_l1_action};
pub use types::*;
pub use wallet::{Address, Wallet, WalletError};
