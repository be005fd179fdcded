// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Output Generators
//!
//! Implementations of [`OutputGenerator`](crate::OutputGenerator).

/// HTML page writer.
pub mod html;

pub use html::HtmlGenerator;
