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

//! Delimiter discovery from the fixed-width ISA envelope.
//!
//! X12 does not fix its delimiters; each interchange declares them by
//! position inside the ISA segment, which is the one segment with fixed
//! element widths. The element separator sits at byte offset 3 (right after
//! the `ISA` tag), the component separator is the ISA16 value at offset 104,
//! and the segment terminator is the byte at offset 105, immediately after
//! ISA16.

use crate::error::{ParseError, ParseResult};

/// Minimum input length: the fixed-width ISA segment plus its terminator.
pub const MIN_ISA_LENGTH: usize = 106;

/// Byte offset of the element separator (first byte after the ISA tag).
const ELEMENT_OFFSET: usize = 3;
/// Byte offset of the component separator (the ISA16 value).
const COMPONENT_OFFSET: usize = 104;
/// Byte offset of the segment terminator.
const SEGMENT_OFFSET: usize = 105;

/// The three delimiters an interchange declares for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delimiters {
    /// Element separator (conventionally `*`).
    pub element: u8,
    /// Component (sub-element) separator (conventionally `:`).
    pub component: u8,
    /// Segment terminator (conventionally `~`).
    pub segment: u8,
}

impl Delimiters {
    /// Discover the delimiters declared by the ISA envelope.
    ///
    /// Pure function of the input. Fails when the input is shorter than the
    /// fixed ISA width, does not start with the `ISA` tag, or declares
    /// delimiters that are not three mutually distinct ASCII bytes.
    pub fn sniff(input: &str) -> ParseResult<Self> {
        let bytes = input.as_bytes();
        if bytes.len() < MIN_ISA_LENGTH {
            return Err(ParseError::malformed_envelope(format!(
                "interchange is {} bytes, the fixed-width ISA segment needs at least {}",
                bytes.len(),
                MIN_ISA_LENGTH
            )));
        }
        if &bytes[..3] != b"ISA" {
            return Err(ParseError::malformed_envelope(
                "interchange does not begin with an ISA segment",
            )
            .with_offset(0));
        }

        let delimiters = Self {
            element: bytes[ELEMENT_OFFSET],
            component: bytes[COMPONENT_OFFSET],
            segment: bytes[SEGMENT_OFFSET],
        };
        delimiters.check_usable()?;
        Ok(delimiters)
    }

    /// The conventional delimiter set (`*`, `:`, `~`), useful for building
    /// fixtures and for re-serialization defaults.
    pub fn conventional() -> Self {
        Self {
            element: b'*',
            component: b':',
            segment: b'~',
        }
    }

    /// Element separator as a char.
    pub fn element_char(&self) -> char {
        self.element as char
    }

    /// Component separator as a char.
    pub fn component_char(&self) -> char {
        self.component as char
    }

    /// Segment terminator as a char.
    pub fn segment_char(&self) -> char {
        self.segment as char
    }

    fn check_usable(&self) -> ParseResult<()> {
        if self.element == self.component
            || self.element == self.segment
            || self.component == self.segment
        {
            return Err(ParseError::malformed_envelope(format!(
                "ISA declares colliding delimiters: element {:?}, component {:?}, terminator {:?}",
                self.element_char(),
                self.component_char(),
                self.segment_char()
            ))
            .with_offset(COMPONENT_OFFSET));
        }
        // Splitting happens on &str slices, so a multi-byte delimiter would
        // land inside a UTF-8 sequence.
        for byte in [self.element, self.component, self.segment] {
            if !byte.is_ascii() {
                return Err(ParseError::malformed_envelope(format!(
                    "ISA declares a non-ASCII delimiter byte 0x{byte:02x}"
                ))
                .with_offset(ELEMENT_OFFSET));
            }
        }
        Ok(())
    }
}
