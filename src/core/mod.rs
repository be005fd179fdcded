// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// The `config` module provides layered project configuration
pub mod config;

/// The `error` module provides error handling
pub mod error;

/// The `traits` module provides the collaborator traits of the build pipeline
pub mod traits;
