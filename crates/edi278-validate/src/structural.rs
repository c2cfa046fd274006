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

//! Structural validation against the 278 implementation-guide skeleton.
//!
//! The skeleton is declarative data: the envelope and header tags the guide
//! requires exactly once, in guide order, plus the hierarchical loops it
//! requires at least once. A missing required segment makes the document
//! mechanically unusable (CRITICAL); out-of-order segments in an otherwise
//! complete set leave it parseable (ERROR).

use crate::issue::{IssueKind, RuleSource, ValidationIssue};
use crate::runner::ValidationPass;
use edi278_core::{BuilderNote, LevelCode, Loop, ParsedDocument};

/// Tags the 278 guide requires exactly once, in declared guide order.
const REQUIRED_SEGMENTS: &[(&str, &str)] = &[
    ("ISA", "Interchange Control Header"),
    ("GS", "Functional Group Header"),
    ("ST", "Transaction Set Header"),
    ("BHT", "Beginning of Hierarchical Transaction"),
    ("SE", "Transaction Set Trailer"),
    ("GE", "Functional Group Trailer"),
    ("IEA", "Interchange Control Trailer"),
];

/// Loops the 278 guide requires at least once.
const REQUIRED_LOOPS: &[LevelCode] = &[
    LevelCode::InformationSource,
    LevelCode::InformationReceiver,
    LevelCode::Subscriber,
];

/// Structural validator pass.
pub struct StructuralPass;

impl ValidationPass for StructuralPass {
    fn id(&self) -> &str {
        "structural"
    }

    fn description(&self) -> &str {
        "Presence, order, and cardinality of required segments and loops"
    }

    fn source(&self) -> RuleSource {
        RuleSource::Structural
    }

    fn check(&self, doc: &ParsedDocument) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        check_builder_notes(doc, &mut issues);
        check_required_segments(doc, &mut issues);
        check_segment_order(doc, &mut issues);
        check_required_loops(doc, &mut issues);
        issues
    }
}

/// Surface the defects the builder recovered from while assembling the
/// loop tree.
fn check_builder_notes(doc: &ParsedDocument, issues: &mut Vec<ValidationIssue>) {
    for note in doc.notes() {
        let issue = match note {
            BuilderNote::OrphanParent {
                hl_id,
                parent_hl_id,
                position,
            } => ValidationIssue::error(
                IssueKind::OrphanHlReference,
                format!(
                    "HL {hl_id} references parent {parent_hl_id} which has not been declared; \
                     loop attached to the transaction root"
                ),
                RuleSource::Structural,
            )
            .at_segment(*position),
            BuilderNote::DuplicateHlId { hl_id, position } => ValidationIssue::error(
                IssueKind::DuplicateHlId,
                format!("HL id {hl_id} is declared more than once"),
                RuleSource::Structural,
            )
            .at_segment(*position),
            BuilderNote::MalformedHl { position } => ValidationIssue::error(
                IssueKind::MalformedHl,
                "HL segment is too short to declare an id and level code",
                RuleSource::Structural,
            )
            .at_segment(*position),
        };
        issues.push(issue);
    }
}

fn check_required_segments(doc: &ParsedDocument, issues: &mut Vec<ValidationIssue>) {
    for &(tag, name) in REQUIRED_SEGMENTS {
        let mut occurrences = doc.segments().iter().filter(|s| s.tag() == tag);
        match occurrences.next() {
            None => issues.push(ValidationIssue::critical(
                IssueKind::MissingSegment,
                format!("Missing {tag} ({name}) segment"),
                RuleSource::Structural,
            )),
            Some(_) => {
                for duplicate in occurrences {
                    issues.push(
                        ValidationIssue::error(
                            IssueKind::DuplicateSegment,
                            format!("{tag} ({name}) must appear exactly once"),
                            RuleSource::Structural,
                        )
                        .at_segment(duplicate.position()),
                    );
                }
            }
        }
    }
}

/// First occurrences of the skeleton tags must be non-decreasing in guide
/// order.
fn check_segment_order(doc: &ParsedDocument, issues: &mut Vec<ValidationIssue>) {
    let first_position = |tag: &str| {
        doc.segments()
            .iter()
            .find(|s| s.tag() == tag)
            .map(|s| s.position())
    };

    let mut previous: Option<(&str, usize)> = None;
    for &(tag, name) in REQUIRED_SEGMENTS {
        let Some(position) = first_position(tag) else {
            continue; // absence is already a MISSING_SEGMENT
        };
        if let Some((prior_tag, prior_position)) = previous {
            if position < prior_position {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::SegmentOutOfOrder,
                        format!("{tag} ({name}) appears before {prior_tag}"),
                        RuleSource::Structural,
                    )
                    .at_segment(position),
                );
                // Keep the earlier anchor so one displaced segment is
                // reported once, not for every successor.
                continue;
            }
        }
        previous = Some((tag, position));
    }
}

fn check_required_loops(doc: &ParsedDocument, issues: &mut Vec<ValidationIssue>) {
    for level in REQUIRED_LOOPS {
        if doc.find_loop(level).is_none() {
            issues.push(ValidationIssue::error(
                IssueKind::MissingLoop,
                format!("Missing {level} loop"),
                RuleSource::Structural,
            ));
        }
    }

    // 2000D is required only when a subscriber declares a child level.
    let dependent_expected = doc
        .tree()
        .iter()
        .filter(|l| l.level_code() == Some(&LevelCode::Subscriber))
        .any(|l: &Loop| l.child_code() == Some("1"));
    if dependent_expected && doc.find_loop(&LevelCode::Dependent).is_none() {
        issues.push(ValidationIssue::warning(
            IssueKind::MissingLoop,
            "Subscriber declares a child level but no Dependent (2000D) loop is present",
            RuleSource::Structural,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use edi278_core::parse;

    const ISA: &str = "ISA*00*          *00*          *ZZ*SUBMITTERID    *ZZ*RECEIVERID     *250101*1200*^*00501*000000001*0*T*:~";

    fn minimal(body: &[&str]) -> String {
        let mut segments = vec![ISA.to_string()];
        segments.extend(body.iter().map(|s| s.to_string()));
        segments.concat()
    }

    fn check(input: &str) -> Vec<ValidationIssue> {
        let doc = parse(input).unwrap();
        StructuralPass.check(&doc)
    }

    fn complete_body() -> Vec<&'static str> {
        vec![
            "GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~",
            "ST*278*0001~",
            "BHT*0007*13*A12345*20250101*1200~",
            "HL*1**20*1~",
            "HL*2*1*21*1~",
            "HL*3*2*22*0~",
            "SE*6*0001~",
            "GE*1*1~",
            "IEA*1*000000001~",
        ]
    }

    // ==================== Presence tests ====================

    #[test]
    fn test_complete_skeleton_is_clean() {
        let issues = check(&minimal(&complete_body()));
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_missing_bht_is_critical() {
        let body: Vec<&str> = complete_body()
            .into_iter()
            .filter(|s| !s.starts_with("BHT"))
            .collect();
        let issues = check(&minimal(&body));
        let missing: Vec<_> = issues
            .iter()
            .filter(|i| *i.kind() == IssueKind::MissingSegment)
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity(), Severity::Critical);
        assert!(missing[0].message().contains("BHT"));
    }

    #[test]
    fn test_missing_trailers_each_reported() {
        let body: Vec<&str> = complete_body()
            .into_iter()
            .filter(|s| !s.starts_with("SE") && !s.starts_with("GE") && !s.starts_with("IEA"))
            .collect();
        let issues = check(&minimal(&body));
        let missing = issues
            .iter()
            .filter(|i| *i.kind() == IssueKind::MissingSegment)
            .count();
        assert_eq!(missing, 3);
    }

    #[test]
    fn test_duplicate_st_is_error() {
        let mut body = complete_body();
        body.insert(2, "ST*278*0002~");
        let issues = check(&minimal(&body));
        let duplicates: Vec<_> = issues
            .iter()
            .filter(|i| *i.kind() == IssueKind::DuplicateSegment)
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].severity(), Severity::Error);
        assert_eq!(duplicates[0].segment_position(), Some(4));
    }

    // ==================== Ordering tests ====================

    #[test]
    fn test_bht_before_st_is_order_error() {
        let body = vec![
            "GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~",
            "BHT*0007*13*A12345*20250101*1200~",
            "ST*278*0001~",
            "HL*1**20*1~",
            "HL*2*1*21*1~",
            "HL*3*2*22*0~",
            "SE*6*0001~",
            "GE*1*1~",
            "IEA*1*000000001~",
        ];
        let issues = check(&minimal(&body));
        let out_of_order: Vec<_> = issues
            .iter()
            .filter(|i| *i.kind() == IssueKind::SegmentOutOfOrder)
            .collect();
        assert_eq!(out_of_order.len(), 1);
        assert_eq!(out_of_order[0].severity(), Severity::Error);
        assert!(out_of_order[0].message().contains("BHT"));
    }

    #[test]
    fn test_one_displaced_segment_reported_once() {
        // GE before everything: one violation, not one per successor.
        let body = vec![
            "GE*1*1~",
            "GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~",
            "ST*278*0001~",
            "BHT*0007*13*A12345*20250101*1200~",
            "HL*1**20*1~",
            "HL*2*1*21*1~",
            "HL*3*2*22*0~",
            "SE*6*0001~",
            "IEA*1*000000001~",
        ];
        let issues = check(&minimal(&body));
        let out_of_order = issues
            .iter()
            .filter(|i| *i.kind() == IssueKind::SegmentOutOfOrder)
            .count();
        assert_eq!(out_of_order, 1);
    }

    // ==================== Loop tests ====================

    #[test]
    fn test_missing_receiver_loop_is_error() {
        let body = vec![
            "GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~",
            "ST*278*0001~",
            "BHT*0007*13*A12345*20250101*1200~",
            "HL*1**20*1~",
            "HL*3*1*22*0~",
            "SE*5*0001~",
            "GE*1*1~",
            "IEA*1*000000001~",
        ];
        let issues = check(&minimal(&body));
        let missing_loops: Vec<_> = issues
            .iter()
            .filter(|i| *i.kind() == IssueKind::MissingLoop)
            .collect();
        assert_eq!(missing_loops.len(), 1);
        assert_eq!(missing_loops[0].severity(), Severity::Error);
        assert!(missing_loops[0].message().contains("Information Receiver"));
    }

    #[test]
    fn test_no_hl_at_all_reports_three_missing_loops() {
        let body = vec![
            "GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~",
            "ST*278*0001~",
            "BHT*0007*13*A12345*20250101*1200~",
            "SE*3*0001~",
            "GE*1*1~",
            "IEA*1*000000001~",
        ];
        let issues = check(&minimal(&body));
        let missing_loops = issues
            .iter()
            .filter(|i| *i.kind() == IssueKind::MissingLoop)
            .count();
        assert_eq!(missing_loops, 3);
    }

    #[test]
    fn test_subscriber_with_child_but_no_dependent_warns() {
        let body = vec![
            "GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~",
            "ST*278*0001~",
            "BHT*0007*13*A12345*20250101*1200~",
            "HL*1**20*1~",
            "HL*2*1*21*1~",
            "HL*3*2*22*1~",
            "SE*6*0001~",
            "GE*1*1~",
            "IEA*1*000000001~",
        ];
        let issues = check(&minimal(&body));
        let warnings: Vec<_> = issues
            .iter()
            .filter(|i| *i.kind() == IssueKind::MissingLoop)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity(), Severity::Warning);
        assert!(warnings[0].message().contains("Dependent"));
    }

    #[test]
    fn test_subscriber_without_child_needs_no_dependent() {
        let issues = check(&minimal(&complete_body()));
        assert!(issues.iter().all(|i| *i.kind() != IssueKind::MissingLoop));
    }

    // ==================== Builder note tests ====================

    #[test]
    fn test_orphan_parent_surfaces_as_error() {
        let body = vec![
            "GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~",
            "ST*278*0001~",
            "BHT*0007*13*A12345*20250101*1200~",
            "HL*1**20*1~",
            "HL*2*1*21*1~",
            "HL*3*9*22*0~",
            "SE*6*0001~",
            "GE*1*1~",
            "IEA*1*000000001~",
        ];
        let issues = check(&minimal(&body));
        let orphans: Vec<_> = issues
            .iter()
            .filter(|i| *i.kind() == IssueKind::OrphanHlReference)
            .collect();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].severity(), Severity::Error);
        assert_eq!(orphans[0].segment_position(), Some(7));
        assert!(orphans[0].message().contains('9'));
    }

    #[test]
    fn test_duplicate_hl_id_surfaces_as_error() {
        let body = vec![
            "GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~",
            "ST*278*0001~",
            "BHT*0007*13*A12345*20250101*1200~",
            "HL*1**20*1~",
            "HL*1*1*21*1~",
            "HL*3*1*22*0~",
            "SE*6*0001~",
            "GE*1*1~",
            "IEA*1*000000001~",
        ];
        let issues = check(&minimal(&body));
        assert!(issues
            .iter()
            .any(|i| *i.kind() == IssueKind::DuplicateHlId));
    }
}
