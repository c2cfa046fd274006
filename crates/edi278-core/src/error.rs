// Dweve EDI278 - X12 278 Prior Authorization Parsing and Validation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for X12 parsing.
//!
//! A [`ParseError`] is raised only for conditions the parser cannot recover
//! from: an interchange envelope too damaged to discover the delimiters, or
//! an input that exceeds the configured [`Limits`](crate::Limits). Every
//! other defect found in an interchange is recoverable and is reported by
//! the `edi278-validate` crate as a validation issue, not an error.

use std::fmt;
use thiserror::Error;

/// The kind of unrecoverable parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The ISA envelope is absent, truncated, or declares unusable delimiters.
    MalformedEnvelope,
    /// A configured resource limit was exceeded.
    LimitExceeded,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedEnvelope => write!(f, "MALFORMED_ENVELOPE"),
            Self::LimitExceeded => write!(f, "LIMIT_EXCEEDED"),
        }
    }
}

/// An unrecoverable error raised while parsing an X12 interchange.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ParseError {
    /// The kind of failure.
    pub kind: ParseErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Byte offset into the input, when a single offset is meaningful.
    pub offset: Option<usize>,
}

impl ParseError {
    /// Create a new error.
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            offset: None,
        }
    }

    /// Add a byte offset.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn malformed_envelope(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::MalformedEnvelope, message)
    }

    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::LimitExceeded, message)
    }
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
