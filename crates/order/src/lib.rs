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

//! hlforge order workflow
//!
//! A single linear run that places one signed order:
//! - Credential loading (private key -> wallet address)
//! - Account inspection (margin summary, non-fatal)
//! - Asset resolution (symbol -> universe index)
//! - Order submission (signing and transport delegated to `hlforge-sdk`)
//!
//! The external services sit behind the [`api::InfoApi`] and
//! [`api::OrderApi`] seams so the workflow can run against in-process fakes.

pub mod account;
pub mod api;
pub mod assets;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod order;
pub mod probe;
pub mod workflow;

pub use account::{AccountInspection, AccountSnapshot, MarginMode, inspect_account};
pub use api::{InfoApi, OrderApi};
pub use assets::{fetch_asset_index, resolve_asset};
pub use config::{OrderConfig, RunConfig};
pub use credentials::Credentials;
pub use error::WorkflowError;
pub use order::{OrderDescriptor, OrderOutcome, OrderTypeVariant, SubmissionOutcome};
pub use workflow::{RunReport, execute, run};
