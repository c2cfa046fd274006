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

//! End-to-end validation scenarios over whole interchanges.

use edi278_core::parse;
use edi278_validate::{
    validate, validate_with_config, IssueKind, RuleSource, Severity, ValidationConfig,
};

const ISA: &str = "ISA*00*          *00*          *ZZ*SUBMITTERID    *ZZ*RECEIVERID     *250101*1200*^*00501*000000001*0*T*:~";

fn minimal_278() -> String {
    [
        ISA,
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
    .concat()
}

fn full_278() -> String {
    [
        ISA,
        "GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~",
        "ST*278*0001~",
        "BHT*0007*13*A12345*20250101*1200~",
        "HL*1**20*1~",
        "NM1*X3*2*ACME HEALTH PLAN*****PI*12345~",
        "HL*2*1*21*1~",
        "NM1*1P*2*DOWNTOWN CLINIC*****XX*1234567890~",
        "HL*3*2*22*1~",
        "NM1*IL*1*DOE*JANE****MI*MEMBER001~",
        "HL*4*3*23*0~",
        "NM1*QC*1*DOE*JIMMY~",
        "UM*HS*I*2*21:B~",
        "DTP*435*D8*20250115~",
        "SE*13*0001~",
        "GE*1*1~",
        "IEA*1*000000001~",
    ]
    .concat()
}

// ==================== Happy path scenarios ====================

#[test]
fn minimal_skeleton_is_valid_with_at_most_info_issues() {
    let doc = parse(&minimal_278()).unwrap();
    let report = validate(&doc);
    assert!(report.is_valid());
    assert_eq!(report.issues_at_least(Severity::Warning).count(), 0);
}

#[test]
fn full_request_is_valid_with_at_most_info_issues() {
    let doc = parse(&full_278()).unwrap();
    let report = validate(&doc);
    assert!(report.is_valid(), "issues: {:?}", report.issues());
    assert_eq!(report.issues_at_least(Severity::Warning).count(), 0);
    // The only advisory: no NM1 names the payer with qualifier PR.
    assert!(report
        .issues()
        .iter()
        .all(|i| *i.kind() == IssueKind::MissingRecommendedSegment));
}

// ==================== Control number scenarios ====================

#[test]
fn interchange_control_mismatch_reports_both_values() {
    let input = minimal_278().replace("IEA*1*000000001", "IEA*1*000000002");
    let doc = parse(&input).unwrap();
    let report = validate(&doc);
    let mismatches: Vec<_> = report
        .issues()
        .iter()
        .filter(|i| *i.kind() == IssueKind::ControlNumberMismatch)
        .collect();
    assert_eq!(mismatches.len(), 1);
    assert!(mismatches[0].message().contains("000000001"));
    assert!(mismatches[0].message().contains("000000002"));
}

#[test]
fn ge_count_mutation_exercises_the_tolerance_knob() {
    // GE01 says two transaction sets while one exists: exactly one ERROR.
    let input = minimal_278().replace("GE*1*1", "GE*2*1");
    let doc = parse(&input).unwrap();

    let report = validate(&doc);
    let errors: Vec<_> = report
        .issues()
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(*errors[0].kind(), IssueKind::ControlNumberMismatch);
    // Within the default tolerance of two the verdict holds...
    assert!(report.is_valid());
    // ...and flips once the tolerance is exhausted.
    let strict = validate_with_config(&doc, ValidationConfig::strict());
    assert!(!strict.is_valid());
}

// ==================== Structural scenarios ====================

#[test]
fn missing_envelope_makes_the_document_invalid() {
    let input = minimal_278().replace("ST*278*0001~", "");
    let doc = parse(&input).unwrap();
    let report = validate(&doc);
    assert!(!report.is_valid());
    assert!(report
        .issues()
        .iter()
        .any(|i| i.severity() == Severity::Critical && *i.kind() == IssueKind::MissingSegment));
}

#[test]
fn orphan_hl_is_an_error_not_an_abort() {
    let input = minimal_278().replace("HL*3*2*22*0", "HL*3*9*22*0");
    let doc = parse(&input).unwrap();
    let report = validate(&doc);
    let orphans: Vec<_> = report
        .issues()
        .iter()
        .filter(|i| *i.kind() == IssueKind::OrphanHlReference)
        .collect();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].source(), RuleSource::Structural);
    // One recoverable error stays within tolerance.
    assert!(report.is_valid());
}

// ==================== Element scenarios ====================

#[test]
fn bht_boundary_four_elements_clean_three_elements_one_issue() {
    let four = minimal_278().replace(
        "BHT*0007*13*A12345*20250101*1200~",
        "BHT*0007*13*A12345*20250101~",
    );
    let doc = parse(&four).unwrap();
    let report = validate(&doc);
    assert!(report
        .issues()
        .iter()
        .all(|i| *i.kind() != IssueKind::InsufficientElements));

    let three = minimal_278().replace(
        "BHT*0007*13*A12345*20250101*1200~",
        "BHT*0007*13*A12345~",
    );
    let doc = parse(&three).unwrap();
    let report = validate(&doc);
    let insufficient: Vec<_> = report
        .issues()
        .iter()
        .filter(|i| *i.kind() == IssueKind::InsufficientElements)
        .collect();
    assert_eq!(insufficient.len(), 1);
    assert_eq!(insufficient[0].segment_position(), Some(4));
}

#[test]
fn wrong_transaction_type_is_a_closed_list_error() {
    let input = minimal_278().replace("ST*278*0001", "ST*270*0001");
    let doc = parse(&input).unwrap();
    let report = validate(&doc);
    assert!(report.issues().iter().any(|i| {
        *i.kind() == IssueKind::InvalidCodeValue
            && i.severity() == Severity::Error
            && i.message().contains("270")
    }));
}

// ==================== Accumulation scenarios ====================

#[test]
fn every_finding_is_kept_not_just_the_first() {
    // Three independent defects: unusual HL level, GE count, IEA pairing.
    let input = minimal_278()
        .replace("HL*2*1*21*1", "HL*2*1*19*1")
        .replace("GE*1*1", "GE*2*1")
        .replace("IEA*1*000000001", "IEA*1*000000009");
    let doc = parse(&input).unwrap();
    let report = validate(&doc);

    assert!(report
        .issues()
        .iter()
        .any(|i| *i.kind() == IssueKind::InvalidCodeValue));
    assert_eq!(
        report
            .issues()
            .iter()
            .filter(|i| *i.kind() == IssueKind::ControlNumberMismatch)
            .count(),
        2
    );
    // Missing receiver loop is a consequence of the level rewrite.
    assert!(report
        .issues()
        .iter()
        .any(|i| *i.kind() == IssueKind::MissingLoop));
}

#[test]
fn severity_counts_match_the_issue_list() {
    let input = minimal_278()
        .replace("HL*2*1*21*1", "HL*2*1*19*1")
        .replace("GE*1*1", "GE*3*1");
    let doc = parse(&input).unwrap();
    let report = validate(&doc);
    let counts = report.counts();
    assert_eq!(
        counts.total(),
        report.issues().len(),
        "counts must cover every issue"
    );
    assert_eq!(
        counts.error,
        report
            .issues()
            .iter()
            .filter(|i| i.severity() == Severity::Error)
            .count()
    );
}

#[test]
fn validation_is_idempotent_across_runs() {
    let input = minimal_278().replace("GE*1*1", "GE*2*1");
    let doc = parse(&input).unwrap();
    let first = validate(&doc);
    let second = validate(&doc);
    assert_eq!(first, second);
    assert_eq!(first.issues(), second.issues());
}
