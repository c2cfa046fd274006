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

//! Document structure for a parsed interchange.
//!
//! The hierarchical levels declared by HL segments form a tree, but the
//! references between them are ids in text, not links. Loops therefore live
//! in an index-addressed arena ([`LoopTree`]): parent/child edges are arena
//! indices resolved through an id map while building, so orphan and forward
//! references degrade to recorded [`BuilderNote`]s instead of dangling
//! pointers.

use crate::delimiters::Delimiters;
use crate::segment::Segment;
use std::fmt;

/// Index of a loop inside its [`LoopTree`] arena.
pub type LoopIndex = usize;

/// Hierarchical level code from HL03.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelCode {
    /// `20` - the UMO / payer originating the review outcome (loop 2000A).
    InformationSource,
    /// `21` - the provider system receiving it (loop 2000B).
    InformationReceiver,
    /// `22` - the subscriber (loop 2000C).
    Subscriber,
    /// `23` - the dependent (loop 2000D).
    Dependent,
    /// Any other declared level code, kept verbatim.
    Other(String),
}

impl LevelCode {
    /// Interpret an HL03 value.
    pub fn from_code(code: &str) -> Self {
        match code {
            "20" => Self::InformationSource,
            "21" => Self::InformationReceiver,
            "22" => Self::Subscriber,
            "23" => Self::Dependent,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire value of this level code.
    pub fn code(&self) -> &str {
        match self {
            Self::InformationSource => "20",
            Self::InformationReceiver => "21",
            Self::Subscriber => "22",
            Self::Dependent => "23",
            Self::Other(code) => code,
        }
    }

    /// The TR3 loop identifier for the known 278 levels.
    pub fn loop_id(&self) -> Option<&'static str> {
        match self {
            Self::InformationSource => Some("2000A"),
            Self::InformationReceiver => Some("2000B"),
            Self::Subscriber => Some("2000C"),
            Self::Dependent => Some("2000D"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for LevelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InformationSource => write!(f, "Information Source (2000A)"),
            Self::InformationReceiver => write!(f, "Information Receiver (2000B)"),
            Self::Subscriber => write!(f, "Subscriber (2000C)"),
            Self::Dependent => write!(f, "Dependent (2000D)"),
            Self::Other(code) => write!(f, "level {code}"),
        }
    }
}

/// One header/trailer segment pair of the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPair {
    /// The header segment (ISA, GS, or ST), when present.
    pub header: Option<Segment>,
    /// The trailer segment (IEA, GE, or SE), when present.
    pub trailer: Option<Segment>,
}

impl ControlPair {
    /// Whether both halves of the pair were seen.
    pub fn is_complete(&self) -> bool {
        self.header.is_some() && self.trailer.is_some()
    }
}

/// The ISA/IEA, GS/GE, ST/SE envelope of one interchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    /// ISA / IEA pair.
    pub interchange: ControlPair,
    /// GS / GE pair.
    pub group: ControlPair,
    /// ST / SE pair.
    pub transaction: ControlPair,
}

impl Envelope {
    pub fn isa(&self) -> Option<&Segment> {
        self.interchange.header.as_ref()
    }

    pub fn iea(&self) -> Option<&Segment> {
        self.interchange.trailer.as_ref()
    }

    pub fn gs(&self) -> Option<&Segment> {
        self.group.header.as_ref()
    }

    pub fn ge(&self) -> Option<&Segment> {
        self.group.trailer.as_ref()
    }

    pub fn st(&self) -> Option<&Segment> {
        self.transaction.header.as_ref()
    }

    pub fn se(&self) -> Option<&Segment> {
        self.transaction.trailer.as_ref()
    }

    /// Declared interchange control numbers: (ISA13, IEA02).
    pub fn interchange_controls(&self) -> (Option<&str>, Option<&str>) {
        (
            self.isa().and_then(|s| s.value(13)),
            self.iea().and_then(|s| s.value(2)),
        )
    }

    /// Declared group control numbers: (GS06, GE02).
    pub fn group_controls(&self) -> (Option<&str>, Option<&str>) {
        (
            self.gs().and_then(|s| s.value(6)),
            self.ge().and_then(|s| s.value(2)),
        )
    }

    /// Declared transaction set control numbers: (ST02, SE02).
    pub fn transaction_controls(&self) -> (Option<&str>, Option<&str>) {
        (
            self.st().and_then(|s| s.value(2)),
            self.se().and_then(|s| s.value(2)),
        )
    }

    /// IEA01, the declared number of functional groups.
    pub fn declared_group_count(&self) -> Option<&str> {
        self.iea().and_then(|s| s.value(1))
    }

    /// GE01, the declared number of transaction sets in the group.
    pub fn declared_transaction_count(&self) -> Option<&str> {
        self.ge().and_then(|s| s.value(1))
    }

    /// SE01, the declared number of segments from ST through SE inclusive.
    pub fn declared_segment_count(&self) -> Option<&str> {
        self.se().and_then(|s| s.value(1))
    }
}

/// One hierarchical loop: the root transaction-level loop, or a loop opened
/// by an HL segment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loop {
    hl_id: Option<String>,
    parent_hl_id: Option<String>,
    level_code: Option<LevelCode>,
    child_code: Option<String>,
    segments: Vec<Segment>,
    children: Vec<LoopIndex>,
}

impl Loop {
    pub(crate) fn root() -> Self {
        Self {
            hl_id: None,
            parent_hl_id: None,
            level_code: None,
            child_code: None,
            segments: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn from_hl(
        hl_id: String,
        parent_hl_id: Option<String>,
        level_code: LevelCode,
        child_code: Option<String>,
    ) -> Self {
        Self {
            hl_id: Some(hl_id),
            parent_hl_id,
            level_code: Some(level_code),
            child_code,
            segments: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub(crate) fn push_child(&mut self, child: LoopIndex) {
        self.children.push(child);
    }

    /// HL01 of the opening HL segment; `None` only for the root loop.
    pub fn hl_id(&self) -> Option<&str> {
        self.hl_id.as_deref()
    }

    /// HL02 of the opening HL segment, when declared.
    pub fn parent_hl_id(&self) -> Option<&str> {
        self.parent_hl_id.as_deref()
    }

    /// The hierarchical level; `None` only for the root loop.
    pub fn level_code(&self) -> Option<&LevelCode> {
        self.level_code.as_ref()
    }

    /// HL04, the hierarchical child code ("1" when child loops follow).
    pub fn child_code(&self) -> Option<&str> {
        self.child_code.as_deref()
    }

    /// Whether this is the transaction-level root loop.
    pub fn is_root(&self) -> bool {
        self.hl_id.is_none()
    }

    /// The non-HL segments owned by this loop, in input order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First owned segment with the given tag.
    pub fn segment(&self, tag: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.tag() == tag)
    }

    /// Arena indices of the child loops, in declaration order.
    pub fn children(&self) -> &[LoopIndex] {
        &self.children
    }
}

/// Index-addressed arena holding the transaction's loop tree.
///
/// Index 0 is always the root transaction-level loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopTree {
    loops: Vec<Loop>,
}

impl LoopTree {
    pub(crate) fn new() -> Self {
        Self {
            loops: vec![Loop::root()],
        }
    }

    pub(crate) fn push(&mut self, node: Loop) -> LoopIndex {
        self.loops.push(node);
        self.loops.len() - 1
    }

    pub(crate) fn get_mut(&mut self, index: LoopIndex) -> &mut Loop {
        &mut self.loops[index]
    }

    /// Arena index of the root loop.
    pub fn root_index(&self) -> LoopIndex {
        0
    }

    /// The transaction-level root loop.
    pub fn root(&self) -> &Loop {
        &self.loops[0]
    }

    /// Loop by arena index.
    pub fn get(&self, index: LoopIndex) -> Option<&Loop> {
        self.loops.get(index)
    }

    /// All loops in declaration order, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Loop> {
        self.loops.iter()
    }

    /// Number of loops, root included.
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// First loop declared with the given level code.
    pub fn find_level(&self, level: &LevelCode) -> Option<&Loop> {
        self.loops.iter().find(|l| l.level_code() == Some(level))
    }

    /// First loop declared with the given HL id.
    pub fn find_hl_id(&self, hl_id: &str) -> Option<&Loop> {
        self.loops.iter().find(|l| l.hl_id() == Some(hl_id))
    }
}

/// A defect the builder recovered from while assembling the loop tree.
///
/// Notes are plain data on the document; the structural validator turns
/// them into reportable issues so that issue creation stays with the
/// validators.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuilderNote {
    /// An HL referenced a parent id that had not been declared; the loop was
    /// attached to the root instead.
    OrphanParent {
        hl_id: String,
        parent_hl_id: String,
        position: usize,
    },
    /// An HL re-declared an id already in use; references keep resolving to
    /// the first declaration.
    DuplicateHlId { hl_id: String, position: usize },
    /// An HL was too short to carry an id and level code; no loop was opened.
    MalformedHl { position: usize },
}

impl BuilderNote {
    /// Position of the offending segment within the interchange.
    pub fn position(&self) -> usize {
        match self {
            Self::OrphanParent { position, .. }
            | Self::DuplicateHlId { position, .. }
            | Self::MalformedHl { position } => *position,
        }
    }
}

/// A parsed interchange: envelope, loop tree, and the flat segment sequence.
///
/// Immutable after construction and exclusively owned by the caller that
/// requested the parse. The flat sequence retains every segment (envelope
/// and HL segments included) in input order for exact-order
/// re-serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedDocument {
    envelope: Envelope,
    tree: LoopTree,
    segments: Vec<Segment>,
    notes: Vec<BuilderNote>,
    delimiters: Delimiters,
}

impl ParsedDocument {
    pub(crate) fn new(
        envelope: Envelope,
        tree: LoopTree,
        segments: Vec<Segment>,
        notes: Vec<BuilderNote>,
        delimiters: Delimiters,
    ) -> Self {
        Self {
            envelope,
            tree,
            segments,
            notes,
            delimiters,
        }
    }

    /// The interchange envelope.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The hierarchical loop tree.
    pub fn tree(&self) -> &LoopTree {
        &self.tree
    }

    /// The flat ordered segment sequence, envelope segments included.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Defects the builder recovered from.
    pub fn notes(&self) -> &[BuilderNote] {
        &self.notes
    }

    /// The delimiters the interchange declared.
    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    /// First loop matching a level code.
    pub fn find_loop(&self, level: &LevelCode) -> Option<&Loop> {
        self.tree.find_level(level)
    }

    /// First segment in the flat sequence with the given tag.
    pub fn find_segment(&self, tag: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.tag() == tag)
    }

    /// Re-serialize the interchange from the retained segment sequence.
    ///
    /// Reproduces the original byte sequence for any input that parsed
    /// without noise between segments.
    pub fn to_x12(&self) -> String {
        let terminator = self.delimiters.segment_char();
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(segment.raw());
            out.push(terminator);
        }
        out
    }
}
