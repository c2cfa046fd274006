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

//! Control-number consistency checking.
//!
//! Each envelope layer declares a control number in its header that the
//! paired trailer must repeat textually, and each trailer declares how many
//! children its layer holds: IEA01 functional groups, GE01 transaction
//! sets, SE01 segments from ST through SE inclusive. A mismatch is a
//! reportable finding carrying both the declared and observed values, never
//! a parse abort; the rest of the document may still be informative.

use crate::issue::{IssueKind, RuleSource, ValidationIssue};
use crate::runner::ValidationPass;
use edi278_core::{ParsedDocument, Segment};

/// Control-number validator pass.
pub struct ControlNumberPass;

impl ValidationPass for ControlNumberPass {
    fn id(&self) -> &str {
        "control-number"
    }

    fn description(&self) -> &str {
        "Header/trailer control number pairing and declared counts"
    }

    fn source(&self) -> RuleSource {
        RuleSource::ControlNumber
    }

    fn check(&self, doc: &ParsedDocument) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let envelope = doc.envelope();

        check_pair(
            "ISA13",
            "IEA02",
            envelope.interchange_controls(),
            envelope.iea(),
            &mut issues,
        );
        check_pair(
            "GS06",
            "GE02",
            envelope.group_controls(),
            envelope.ge(),
            &mut issues,
        );
        check_pair(
            "ST02",
            "SE02",
            envelope.transaction_controls(),
            envelope.se(),
            &mut issues,
        );

        check_count(
            "IEA01",
            "functional groups",
            envelope.declared_group_count(),
            count_tag(doc, "GS"),
            envelope.iea(),
            &mut issues,
        );
        check_count(
            "GE01",
            "transaction sets",
            envelope.declared_transaction_count(),
            count_tag(doc, "ST"),
            envelope.ge(),
            &mut issues,
        );
        check_count(
            "SE01",
            "segments in the transaction set",
            envelope.declared_segment_count(),
            transaction_span(doc),
            envelope.se(),
            &mut issues,
        );

        issues
    }
}

/// Header and trailer control numbers must be textually identical. Either
/// half missing is the structural validator's finding, not a mismatch.
fn check_pair(
    header_name: &str,
    trailer_name: &str,
    controls: (Option<&str>, Option<&str>),
    trailer: Option<&Segment>,
    issues: &mut Vec<ValidationIssue>,
) {
    let (Some(declared), Some(echoed)) = controls else {
        return;
    };
    if declared != echoed {
        let mut issue = ValidationIssue::error(
            IssueKind::ControlNumberMismatch,
            format!("{header_name} '{declared}' does not match {trailer_name} '{echoed}'"),
            RuleSource::ControlNumber,
        );
        if let Some(trailer) = trailer {
            issue = issue.at_segment(trailer.position());
        }
        issues.push(issue);
    }
}

fn check_count(
    name: &str,
    what: &str,
    declared: Option<&str>,
    observed: Option<usize>,
    trailer: Option<&Segment>,
    issues: &mut Vec<ValidationIssue>,
) {
    let (Some(declared), Some(observed)) = (declared, observed) else {
        return;
    };
    // Unparsable declared counts are the element validator's finding.
    let Ok(declared_count) = declared.parse::<usize>() else {
        return;
    };
    if declared_count != observed {
        let mut issue = ValidationIssue::error(
            IssueKind::ControlNumberMismatch,
            format!("{name} declares {declared_count} {what}, observed {observed}"),
            RuleSource::ControlNumber,
        );
        if let Some(trailer) = trailer {
            issue = issue.at_segment(trailer.position());
        }
        issues.push(issue);
    }
}

fn count_tag(doc: &ParsedDocument, tag: &str) -> Option<usize> {
    Some(doc.segments().iter().filter(|s| s.tag() == tag).count())
}

/// Number of segments from the first ST through its SE, both inclusive.
fn transaction_span(doc: &ParsedDocument) -> Option<usize> {
    let segments = doc.segments();
    let st = segments.iter().position(|s| s.tag() == "ST")?;
    let se = segments[st..].iter().position(|s| s.tag() == "SE")?;
    Some(se + 1)
}
