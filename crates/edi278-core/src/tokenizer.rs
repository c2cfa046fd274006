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

//! Segment tokenizer.
//!
//! Splits a raw interchange into its ordered segment sequence using the
//! delimiters discovered from the ISA envelope. The iterator is lazy,
//! restartable (`Clone`), and finite: each downstream consumer can take an
//! independent pass over the same input.
//!
//! Guarantees:
//! - segment order is exactly input order;
//! - empty trailing *elements* are preserved (absence is a value in X12);
//! - empty trailing *segments* produced by the final terminator or by
//!   line-break noise between segments are discarded.

use crate::delimiters::Delimiters;
use crate::segment::{Element, Segment};

/// Lazy iterator over the segments of a raw interchange.
#[derive(Debug, Clone)]
pub struct SegmentIter<'a> {
    input: &'a str,
    cursor: usize,
    position: usize,
    delimiters: Delimiters,
}

impl<'a> SegmentIter<'a> {
    /// Start a pass over `input` with the interchange's declared delimiters.
    pub fn new(input: &'a str, delimiters: Delimiters) -> Self {
        Self {
            input,
            cursor: 0,
            position: 0,
            delimiters,
        }
    }

    /// The delimiters this pass splits on.
    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    fn next_raw(&mut self) -> Option<&'a str> {
        while self.cursor < self.input.len() {
            let rest = &self.input.as_bytes()[self.cursor..];
            let (chunk, advance) = match memchr::memchr(self.delimiters.segment, rest) {
                Some(end) => (&self.input[self.cursor..self.cursor + end], end + 1),
                None => (&self.input[self.cursor..], rest.len()),
            };
            self.cursor += advance;
            // Line breaks and stray whitespace between segments are noise,
            // not content.
            let chunk = chunk.trim_matches(|c: char| c == '\r' || c == '\n' || c == ' ');
            if !chunk.is_empty() {
                return Some(chunk);
            }
        }
        None
    }
}

impl Iterator for SegmentIter<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let raw = self.next_raw()?;
        self.position += 1;
        Some(tokenize_segment(raw, self.position, self.delimiters))
    }
}

/// Split one raw segment string into its tag and elements.
fn tokenize_segment(raw: &str, position: usize, delimiters: Delimiters) -> Segment {
    let component = delimiters.component_char();
    let mut parts = raw.split(delimiters.element_char());
    // The split always yields at least one part; an element-less segment is
    // just its tag.
    let tag = parts.next().unwrap_or_default();
    let elements: Vec<Element> = parts.map(|value| Element::new(value, component)).collect();
    Segment::new(tag, position, elements, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conventional(input: &str) -> SegmentIter<'_> {
        SegmentIter::new(input, Delimiters::conventional())
    }

    // ==================== Splitting tests ====================

    #[test]
    fn test_tokenize_two_segments() {
        let segments: Vec<Segment> = conventional("ST*278*0001~SE*2*0001~").collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].tag(), "ST");
        assert_eq!(segments[1].tag(), "SE");
    }

    #[test]
    fn test_positions_are_one_based_and_sequential() {
        let segments: Vec<Segment> = conventional("ST*278*0001~BHT*0007~SE*3*0001~").collect();
        let positions: Vec<usize> = segments.iter().map(Segment::position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_final_terminator_yields_no_empty_segment() {
        let segments: Vec<Segment> = conventional("ST*278*0001~").collect();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_missing_final_terminator_still_yields_segment() {
        let segments: Vec<Segment> = conventional("ST*278*0001~SE*2*0001").collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].raw(), "SE*2*0001");
    }

    #[test]
    fn test_newline_noise_between_segments_discarded() {
        let segments: Vec<Segment> = conventional("ST*278*0001~\r\nBHT*0007~\n\nSE*3*0001~\n").collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].tag(), "BHT");
        assert_eq!(segments[1].position(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(conventional("").count(), 0);
        assert_eq!(conventional("~~~\n").count(), 0);
    }

    // ==================== Element preservation tests ====================

    #[test]
    fn test_empty_interior_elements_preserved() {
        let segments: Vec<Segment> = conventional("HL*1**20*1~").collect();
        assert_eq!(segments[0].element_count(), 4);
        assert_eq!(segments[0].value(2), Some(""));
    }

    #[test]
    fn test_empty_trailing_elements_preserved() {
        let segments: Vec<Segment> = conventional("NM1*IL*1*DOE*JANE****MI*123456~").collect();
        let nm1 = &segments[0];
        assert_eq!(nm1.element_count(), 9);
        assert_eq!(nm1.value(5), Some(""));
        assert_eq!(nm1.value(8), Some("MI"));
        assert_eq!(nm1.value(9), Some("123456"));
    }

    #[test]
    fn test_components_split_on_declared_separator() {
        let segments: Vec<Segment> = conventional("UM*AR*I*2*21:B~").collect();
        let um = &segments[0];
        assert_eq!(um.value(4), Some("21:B"));
        assert_eq!(um.element(4).unwrap().component(1), Some("21"));
        assert_eq!(um.element(4).unwrap().component(2), Some("B"));
    }

    #[test]
    fn test_nonstandard_delimiters() {
        let delimiters = Delimiters {
            element: b'|',
            component: b'>',
            segment: b'!',
        };
        let segments: Vec<Segment> =
            SegmentIter::new("ST|278|0001!UM|AR|I|2|21>B!", delimiters).collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].element(4).unwrap().component(2), Some("B"));
    }

    // ==================== Restartability tests ====================

    #[test]
    fn test_clone_restarts_the_pass() {
        let first = conventional("ST*278*0001~BHT*0007~SE*3*0001~");
        let second = first.clone();
        let a: Vec<String> = first.map(|s| s.tag().to_string()).collect();
        let b: Vec<String> = second.map(|s| s.tag().to_string()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_clone_mid_pass_is_independent() {
        let mut first = conventional("ST*278*0001~BHT*0007~SE*3*0001~");
        first.next();
        let resumed = first.clone();
        assert_eq!(first.count(), 2);
        assert_eq!(resumed.count(), 2);
    }

    #[test]
    fn test_order_matches_input() {
        let input = "ISA*X~GS*X~ST*X~BHT*X~HL*X~SE*X~GE*X~IEA*X~";
        let tags: Vec<String> = conventional(input).map(|s| s.tag().to_string()).collect();
        assert_eq!(tags, vec!["ISA", "GS", "ST", "BHT", "HL", "SE", "GE", "IEA"]);
    }
}
