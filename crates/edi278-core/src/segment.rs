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

//! Segment and element model.
//!
//! A [`Segment`] is immutable once tokenized: a tag, a 1-based position
//! within the interchange, the ordered elements, and the raw text kept for
//! diagnostics and exact-order re-serialization. An [`Element`] is a string
//! value which may additionally carry the ordered component strings when the
//! interchange's component separator appears inside it.

/// One element of a segment.
///
/// Empty elements are preserved: X12 treats absence as a meaningful value
/// (`HL*1**20*1` declares an empty parent id, not a three-element segment).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    value: String,
    components: Vec<String>,
}

impl Element {
    /// Create an element from its raw value and the component separator.
    pub fn new(value: impl Into<String>, component_separator: char) -> Self {
        let value = value.into();
        let components = if value.contains(component_separator) {
            value
                .split(component_separator)
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };
        Self { value, components }
    }

    /// Create a simple element with no components.
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            components: Vec::new(),
        }
    }

    /// The full raw value, component separators included.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The ordered components, empty unless the component separator occurs
    /// in the value.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Component by 1-based index.
    pub fn component(&self, index: usize) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.components.get(index - 1).map(String::as_str)
    }

    /// Whether the element carries no value at all.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// One tokenized segment of an interchange.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    tag: String,
    position: usize,
    elements: Vec<Element>,
    raw: String,
}

impl Segment {
    /// Create a segment. `position` is 1-based within the interchange.
    pub fn new(
        tag: impl Into<String>,
        position: usize,
        elements: Vec<Element>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            position,
            elements,
            raw: raw.into(),
        }
    }

    /// The segment identifier, e.g. `ISA`, `HL`, `NM1`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// 1-based position of the segment within the interchange.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The ordered elements, tag excluded.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements (the X12 element count, tag excluded).
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Element by 1-based X12 index, so `isa.element(13)` is ISA13.
    pub fn element(&self, index: usize) -> Option<&Element> {
        if index == 0 {
            return None;
        }
        self.elements.get(index - 1)
    }

    /// Element value by 1-based X12 index.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.element(index).map(Element::value)
    }

    /// The original segment text, terminator excluded.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}
