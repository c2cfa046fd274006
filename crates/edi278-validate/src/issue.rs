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

//! Validation issue types.

use std::fmt;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Cosmetic or advisory observation with no compliance weight.
    Info,
    /// A recommended-but-not-mandated expectation is violated.
    Warning,
    /// A defined rule is violated but the document remains navigable.
    Error,
    /// The document is not mechanically usable.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Which validator family produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleSource {
    /// Presence, order, and cardinality of segments and loops.
    Structural,
    /// Per-element TR3 rules (type, length, code lists).
    Element,
    /// Header/trailer control numbers and declared counts.
    ControlNumber,
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "STRUCTURAL"),
            Self::Element => write!(f, "ELEMENT"),
            Self::ControlNumber => write!(f, "CONTROL_NUMBER"),
        }
    }
}

/// Kind of validation issue, carrying its stable report code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IssueKind {
    /// A required envelope or header segment is absent.
    MissingSegment,
    /// A segment required exactly once appears again.
    DuplicateSegment,
    /// A segment appears before its declared predecessor.
    SegmentOutOfOrder,
    /// A required hierarchical loop is absent.
    MissingLoop,
    /// An HL referenced a parent id that was never declared.
    OrphanHlReference,
    /// An HL re-declared an id already in use.
    DuplicateHlId,
    /// An HL too short to carry its id and level code.
    MalformedHl,
    /// A segment carries fewer elements than its documented minimum.
    InsufficientElements,
    /// A required element is empty.
    MissingRequiredElement,
    /// An element value violates its length bounds.
    InvalidElementLength,
    /// An element value violates its declared format.
    InvalidElementFormat,
    /// An element value is outside its allowed code list.
    InvalidCodeValue,
    /// A trailer disagrees with its header control number or declared count.
    ControlNumberMismatch,
    /// A recommended identification segment is absent.
    MissingRecommendedSegment,
}

impl IssueKind {
    /// The stable report code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingSegment => "MISSING_SEGMENT",
            Self::DuplicateSegment => "DUPLICATE_SEGMENT",
            Self::SegmentOutOfOrder => "SEGMENT_OUT_OF_ORDER",
            Self::MissingLoop => "MISSING_LOOP",
            Self::OrphanHlReference => "ORPHAN_HL_REFERENCE",
            Self::DuplicateHlId => "DUPLICATE_HL_ID",
            Self::MalformedHl => "MALFORMED_HL",
            Self::InsufficientElements => "INSUFFICIENT_ELEMENTS",
            Self::MissingRequiredElement => "MISSING_REQUIRED_ELEMENT",
            Self::InvalidElementLength => "INVALID_ELEMENT_LENGTH",
            Self::InvalidElementFormat => "INVALID_ELEMENT_FORMAT",
            Self::InvalidCodeValue => "INVALID_CODE_VALUE",
            Self::ControlNumberMismatch => "CONTROL_NUMBER_MISMATCH",
            Self::MissingRecommendedSegment => "MISSING_RECOMMENDED_SEGMENT",
        }
    }
}

/// One validation finding.
///
/// Created only by validators, never mutated after creation, and never
/// discarded by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationIssue {
    severity: Severity,
    kind: IssueKind,
    message: String,
    segment_position: Option<usize>,
    source: RuleSource,
}

impl ValidationIssue {
    pub fn info(kind: IssueKind, message: impl Into<String>, source: RuleSource) -> Self {
        Self::new(Severity::Info, kind, message, source)
    }

    pub fn warning(kind: IssueKind, message: impl Into<String>, source: RuleSource) -> Self {
        Self::new(Severity::Warning, kind, message, source)
    }

    pub fn error(kind: IssueKind, message: impl Into<String>, source: RuleSource) -> Self {
        Self::new(Severity::Error, kind, message, source)
    }

    pub fn critical(kind: IssueKind, message: impl Into<String>, source: RuleSource) -> Self {
        Self::new(Severity::Critical, kind, message, source)
    }

    fn new(
        severity: Severity,
        kind: IssueKind,
        message: impl Into<String>,
        source: RuleSource,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            segment_position: None,
            source,
        }
    }

    /// Point the issue at a position in the flat segment sequence.
    pub fn at_segment(mut self, position: usize) -> Self {
        self.segment_position = Some(position);
        self
    }

    // Public getters

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn kind(&self) -> &IssueKind {
        &self.kind
    }

    /// The stable report code, e.g. `CONTROL_NUMBER_MISMATCH`.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based position into the flat segment sequence, when applicable.
    pub fn segment_position(&self) -> Option<usize> {
        self.segment_position
    }

    pub fn source(&self) -> RuleSource {
        self.source
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(position) = self.segment_position {
            write!(f, "segment {}: ", position)?;
        }
        write!(f, "[{}] {}: {}", self.code(), self.severity, self.message)
    }
}
