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

//! Parse entry points.
//!
//! The pipeline is a synchronous, single-pass sequence per stage: sniff the
//! delimiters, tokenize once, build the envelope and loop tree once. The
//! only hard failures are an envelope too damaged to sniff and a breached
//! [`Limits`] bound; everything else degrades to builder notes and, later,
//! validation issues, so the caller always receives a full document-shaped
//! result to report against.

use crate::builder::build;
use crate::delimiters::Delimiters;
use crate::document::ParsedDocument;
use crate::error::{ParseError, ParseResult};
use crate::limits::Limits;
use crate::segment::Segment;
use crate::tokenizer::SegmentIter;

/// Parsing options.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Security limits.
    pub limits: Limits,
}

impl ParseOptions {
    /// Create a new builder for ParseOptions.
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }
}

/// Builder for ergonomic construction of [`ParseOptions`].
#[derive(Debug, Clone)]
pub struct ParseOptionsBuilder {
    limits: Limits,
}

impl ParseOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
        }
    }

    /// Set the maximum input size in bytes.
    pub fn max_input_size(mut self, size: usize) -> Self {
        self.limits.max_input_size = size;
        self
    }

    /// Set the maximum number of segments.
    pub fn max_segments(mut self, count: usize) -> Self {
        self.limits.max_segments = count;
        self
    }

    /// Set the maximum elements per segment.
    pub fn max_elements_per_segment(mut self, count: usize) -> Self {
        self.limits.max_elements_per_segment = count;
        self
    }

    /// Build the options.
    pub fn build(self) -> ParseOptions {
        ParseOptions {
            limits: self.limits,
        }
    }
}

impl Default for ParseOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one X12 interchange with default limits.
///
/// Fails only for the unrecoverable cases: input shorter than the
/// fixed-width ISA segment, colliding declared delimiters, or a breached
/// limit. Everything else is recoverable and surfaces through
/// [`ParsedDocument::notes`] and the validators.
#[inline]
pub fn parse(input: &str) -> ParseResult<ParsedDocument> {
    parse_with_limits(input, ParseOptions::default())
}

/// Parse one X12 interchange with explicit options.
pub fn parse_with_limits(input: &str, options: ParseOptions) -> ParseResult<ParsedDocument> {
    let limits = &options.limits;
    if input.len() > limits.max_input_size {
        return Err(ParseError::limit_exceeded(format!(
            "input is {} bytes, limit is {}",
            input.len(),
            limits.max_input_size
        )));
    }

    let delimiters = Delimiters::sniff(input)?;
    let mut segments: Vec<Segment> = Vec::new();
    for segment in SegmentIter::new(input, delimiters) {
        if segments.len() >= limits.max_segments {
            return Err(ParseError::limit_exceeded(format!(
                "interchange exceeds {} segments",
                limits.max_segments
            )));
        }
        if segment.element_count() > limits.max_elements_per_segment {
            return Err(ParseError::limit_exceeded(format!(
                "segment {} at position {} has {} elements, limit is {}",
                segment.tag(),
                segment.position(),
                segment.element_count(),
                limits.max_elements_per_segment
            )));
        }
        segments.push(segment);
    }

    Ok(build(segments, delimiters))
}
