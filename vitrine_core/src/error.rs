// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

/// A site configuration that cannot be used.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    #[error("malformed configuration: {0}")]
    Parse(String),
    /// An interval that must be positive is zero.
    #[error("`{0}` must be greater than zero")]
    ZeroInterval(&'static str),
    /// A visibility threshold outside `[0, 1]`.
    #[error("`{field}` must be within [0, 1], got {value}")]
    Threshold {
        /// Offending field.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// The simulated success ratio is outside `[0, 1]`.
    #[error("`form.success_ratio` must be within [0, 1], got {0}")]
    SuccessRatio(f64),
    /// The typing animation has nothing to type.
    #[error("`typing.phrases` must not be empty")]
    NoPhrases,
}
