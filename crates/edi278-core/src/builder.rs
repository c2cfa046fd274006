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

//! Envelope and loop builder.
//!
//! Walks the tokenized segment sequence once. Envelope tags are pulled into
//! the [`Envelope`]; each HL segment opens a loop in the arena; every other
//! segment attaches to the most recently opened loop (the root before any HL
//! has been seen). Malformed or out-of-order HL chains are common in
//! real-world files, so the builder never aborts: it records a
//! [`BuilderNote`] and attaches the loop to the root so downstream
//! validators still have a full tree to inspect.

use crate::delimiters::Delimiters;
use crate::document::{BuilderNote, Envelope, LevelCode, Loop, LoopIndex, LoopTree, ParsedDocument};
use crate::segment::Segment;
use std::collections::HashMap;

/// Assemble a [`ParsedDocument`] from the flat segment sequence.
pub(crate) fn build(segments: Vec<Segment>, delimiters: Delimiters) -> ParsedDocument {
    let mut envelope = Envelope::default();
    let mut tree = LoopTree::new();
    let mut notes = Vec::new();
    // HL id -> arena index; first declaration wins so later references stay
    // stable even when an id is re-declared.
    let mut by_hl_id: HashMap<String, LoopIndex> = HashMap::new();
    let mut current: LoopIndex = tree.root_index();

    for segment in &segments {
        match segment.tag() {
            "ISA" => capture(&mut envelope.interchange.header, segment),
            "IEA" => capture(&mut envelope.interchange.trailer, segment),
            "GS" => capture(&mut envelope.group.header, segment),
            "GE" => capture(&mut envelope.group.trailer, segment),
            "ST" => capture(&mut envelope.transaction.header, segment),
            "SE" => capture(&mut envelope.transaction.trailer, segment),
            "HL" => {
                current = open_loop(segment, &mut tree, &mut by_hl_id, &mut notes, current);
            }
            _ => tree.get_mut(current).push_segment(segment.clone()),
        }
    }

    ParsedDocument::new(envelope, tree, segments, notes, delimiters)
}

/// Keep the first occurrence of an envelope segment; duplicates stay in the
/// flat sequence for the structural validator to flag.
fn capture(slot: &mut Option<Segment>, segment: &Segment) {
    if slot.is_none() {
        *slot = Some(segment.clone());
    }
}

fn open_loop(
    segment: &Segment,
    tree: &mut LoopTree,
    by_hl_id: &mut HashMap<String, LoopIndex>,
    notes: &mut Vec<BuilderNote>,
    current: LoopIndex,
) -> LoopIndex {
    let hl_id = segment.value(1).unwrap_or_default().to_string();
    let level = segment.value(3).unwrap_or_default();
    if hl_id.is_empty() || level.is_empty() {
        notes.push(BuilderNote::MalformedHl {
            position: segment.position(),
        });
        // No loop can be opened; subsequent segments stay with the
        // previously open loop.
        return current;
    }

    let parent_hl_id = segment
        .value(2)
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    let child_code = segment
        .value(4)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let parent_index = match &parent_hl_id {
        None => tree.root_index(),
        Some(parent) => match by_hl_id.get(parent) {
            Some(index) => *index,
            None => {
                notes.push(BuilderNote::OrphanParent {
                    hl_id: hl_id.clone(),
                    parent_hl_id: parent.clone(),
                    position: segment.position(),
                });
                tree.root_index()
            }
        },
    };

    let node = Loop::from_hl(
        hl_id.clone(),
        parent_hl_id,
        LevelCode::from_code(level),
        child_code,
    );
    let index = tree.push(node);
    tree.get_mut(parent_index).push_child(index);

    if by_hl_id.contains_key(&hl_id) {
        notes.push(BuilderNote::DuplicateHlId {
            hl_id,
            position: segment.position(),
        });
    } else {
        by_hl_id.insert(hl_id, index);
    }
    index
}
