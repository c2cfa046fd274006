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

//! Element-level TR3 validation.
//!
//! The rules are data, not per-segment handler types: one declarative table
//! keyed by `(segment tag, 1-based element index)` giving the required
//! flag, length bounds, value format, and optional allowed-code list. The
//! table is built once per process and shared read-only across concurrent
//! validations.
//!
//! Element counts are checked against each segment's documented *minimum*:
//! a variable-length segment such as BHT (4-6 elements depending on use
//! case) is satisfied once the observed count meets the minimum, and a
//! shortfall is reported once per segment, not once per absent element.

use crate::issue::{IssueKind, RuleSource, ValidationIssue};
use crate::runner::ValidationPass;
use edi278_core::{ParsedDocument, Segment};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Expected shape of an element value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Free-form text; only the length bounds apply.
    AlphaNumeric,
    /// ASCII digits only.
    Numeric,
    /// CCYYMMDD.
    Date,
    /// YYMMDD (the ISA date carries no century).
    ShortDate,
    /// HHMM, optionally HHMMSS.
    Time,
}

/// How strictly an allowed-code list binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeListMode {
    /// The guide closes the list: a value outside it is an error.
    Closed,
    /// The list covers the expected values but the guide leaves room:
    /// a value outside it is a warning.
    Open,
    /// Purely advisory: a value outside it is informational.
    Advisory,
}

/// One rule for one element position.
#[derive(Debug, Clone)]
pub struct ElementRule {
    pub tag: &'static str,
    /// 1-based X12 element index (ISA13 is index 13).
    pub index: usize,
    /// The element reference used in messages, e.g. `BHT01`.
    pub name: &'static str,
    pub required: bool,
    pub min_len: usize,
    pub max_len: usize,
    pub format: ValueFormat,
    pub codes: Option<&'static [&'static str]>,
    pub mode: CodeListMode,
}

const fn rule(
    tag: &'static str,
    index: usize,
    name: &'static str,
    required: bool,
    min_len: usize,
    max_len: usize,
    format: ValueFormat,
) -> ElementRule {
    ElementRule {
        tag,
        index,
        name,
        required,
        min_len,
        max_len,
        format,
        codes: None,
        mode: CodeListMode::Open,
    }
}

const fn coded(
    tag: &'static str,
    index: usize,
    name: &'static str,
    required: bool,
    min_len: usize,
    max_len: usize,
    codes: &'static [&'static str],
    mode: CodeListMode,
) -> ElementRule {
    ElementRule {
        tag,
        index,
        name,
        required,
        min_len,
        max_len,
        format: ValueFormat::AlphaNumeric,
        codes: Some(codes),
        mode,
    }
}

/// The 278 element rule table.
///
/// Length bounds and code rosters follow the 005010X217 guide for the
/// segments this engine inspects; list modes encode how hard the guide
/// closes each roster.
static RULES: &[ElementRule] = &[
    // ISA - Interchange Control Header
    coded("ISA", 1, "ISA01", true, 2, 2, &["00", "03"], CodeListMode::Closed),
    coded(
        "ISA",
        5,
        "ISA05",
        true,
        2,
        2,
        &["01", "14", "20", "27", "28", "29", "30", "33", "ZZ"],
        CodeListMode::Open,
    ),
    coded(
        "ISA",
        7,
        "ISA07",
        true,
        2,
        2,
        &["01", "14", "20", "27", "28", "29", "30", "33", "ZZ"],
        CodeListMode::Open,
    ),
    rule("ISA", 9, "ISA09", true, 6, 6, ValueFormat::ShortDate),
    rule("ISA", 10, "ISA10", true, 4, 4, ValueFormat::Time),
    coded("ISA", 12, "ISA12", true, 5, 5, &["00401", "00501"], CodeListMode::Open),
    rule("ISA", 13, "ISA13", true, 9, 9, ValueFormat::Numeric),
    coded("ISA", 15, "ISA15", true, 1, 1, &["P", "T"], CodeListMode::Closed),
    // GS - Functional Group Header
    coded("GS", 1, "GS01", true, 2, 2, &["HI", "HS"], CodeListMode::Open),
    rule("GS", 4, "GS04", true, 8, 8, ValueFormat::Date),
    rule("GS", 5, "GS05", true, 4, 8, ValueFormat::Time),
    rule("GS", 6, "GS06", true, 1, 9, ValueFormat::Numeric),
    coded("GS", 7, "GS07", true, 1, 2, &["X", "T"], CodeListMode::Closed),
    coded(
        "GS",
        8,
        "GS08",
        true,
        1,
        12,
        &["005010X217", "005010X279A1"],
        CodeListMode::Advisory,
    ),
    // ST - Transaction Set Header
    coded("ST", 1, "ST01", true, 3, 3, &["278"], CodeListMode::Closed),
    rule("ST", 2, "ST02", true, 4, 9, ValueFormat::AlphaNumeric),
    // BHT - Beginning of Hierarchical Transaction
    coded("BHT", 1, "BHT01", true, 4, 4, &["0007", "0078"], CodeListMode::Closed),
    coded("BHT", 2, "BHT02", true, 2, 2, &["01", "11", "13", "36"], CodeListMode::Open),
    rule("BHT", 3, "BHT03", true, 1, 50, ValueFormat::AlphaNumeric),
    rule("BHT", 4, "BHT04", false, 8, 8, ValueFormat::Date),
    rule("BHT", 5, "BHT05", false, 4, 8, ValueFormat::Time),
    // HL - Hierarchical Level
    rule("HL", 1, "HL01", true, 1, 12, ValueFormat::Numeric),
    rule("HL", 2, "HL02", false, 1, 12, ValueFormat::Numeric),
    coded("HL", 3, "HL03", true, 1, 2, &["20", "21", "22", "23"], CodeListMode::Open),
    coded("HL", 4, "HL04", false, 1, 1, &["0", "1"], CodeListMode::Closed),
    // NM1 - Individual or Organizational Name
    coded(
        "NM1",
        1,
        "NM101",
        true,
        2,
        3,
        &["PR", "IL", "82", "1P", "FA", "X3", "QC", "SJ"],
        CodeListMode::Open,
    ),
    coded("NM1", 2, "NM102", true, 1, 1, &["1", "2"], CodeListMode::Closed),
    rule("NM1", 3, "NM103", true, 1, 60, ValueFormat::AlphaNumeric),
    coded(
        "NM1",
        8,
        "NM108",
        false,
        1,
        2,
        &["MI", "PI", "XX", "SV", "24", "34", "46"],
        CodeListMode::Open,
    ),
    // UM - Health Care Services Review Information
    coded("UM", 1, "UM01", true, 1, 2, &["AR", "HS", "IN", "SF"], CodeListMode::Open),
    coded("UM", 2, "UM02", true, 1, 1, &["I", "R", "S"], CodeListMode::Open),
    // DTP - Date or Time Period
    rule("DTP", 1, "DTP01", true, 3, 3, ValueFormat::Numeric),
    coded("DTP", 2, "DTP02", true, 2, 3, &["D8", "RD8", "DT"], CodeListMode::Open),
    rule("DTP", 3, "DTP03", true, 1, 35, ValueFormat::AlphaNumeric),
    // REF - Reference Identification
    rule("REF", 1, "REF01", true, 1, 3, ValueFormat::AlphaNumeric),
    rule("REF", 2, "REF02", false, 1, 50, ValueFormat::AlphaNumeric),
    // TRN - Trace Number
    coded("TRN", 1, "TRN01", true, 1, 2, &["1", "2"], CodeListMode::Closed),
    rule("TRN", 2, "TRN02", true, 1, 50, ValueFormat::AlphaNumeric),
    // SE / GE / IEA - Trailers
    rule("SE", 1, "SE01", true, 1, 10, ValueFormat::Numeric),
    rule("SE", 2, "SE02", true, 4, 9, ValueFormat::AlphaNumeric),
    rule("GE", 1, "GE01", true, 1, 6, ValueFormat::Numeric),
    rule("GE", 2, "GE02", true, 1, 9, ValueFormat::Numeric),
    rule("IEA", 1, "IEA01", true, 1, 5, ValueFormat::Numeric),
    rule("IEA", 2, "IEA02", true, 9, 9, ValueFormat::Numeric),
];

/// Minimum element counts per segment tag.
///
/// These are the guide minimums, deliberately not the maximums: BHT is
/// complete at 4 elements even though it may carry 6.
static MIN_ELEMENTS: &[(&str, usize)] = &[
    ("ISA", 16),
    ("GS", 8),
    ("ST", 2),
    ("BHT", 4),
    ("HL", 3),
    ("NM1", 3),
    ("UM", 2),
    ("DTP", 3),
    ("REF", 2),
    ("TRN", 2),
    ("SE", 2),
    ("GE", 2),
    ("IEA", 2),
];

fn rules_by_tag() -> &'static HashMap<&'static str, Vec<&'static ElementRule>> {
    static MAP: OnceLock<HashMap<&'static str, Vec<&'static ElementRule>>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map: HashMap<&'static str, Vec<&'static ElementRule>> = HashMap::new();
        for rule in RULES {
            map.entry(rule.tag).or_default().push(rule);
        }
        map
    })
}

fn min_elements(tag: &str) -> Option<usize> {
    MIN_ELEMENTS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, min)| *min)
}

/// Element-level validator pass.
pub struct ElementPass;

impl ValidationPass for ElementPass {
    fn id(&self) -> &str {
        "element"
    }

    fn description(&self) -> &str {
        "Per-element data type, length, and code list rules"
    }

    fn source(&self) -> RuleSource {
        RuleSource::Element
    }

    fn check(&self, doc: &ParsedDocument) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for segment in doc.segments() {
            check_segment(segment, &mut issues);
        }
        check_name_identification(doc, &mut issues);
        issues
    }
}

fn check_segment(segment: &Segment, issues: &mut Vec<ValidationIssue>) {
    let tag = segment.tag();
    if let Some(min) = min_elements(tag) {
        if segment.element_count() < min {
            issues.push(
                ValidationIssue::error(
                    IssueKind::InsufficientElements,
                    format!(
                        "{tag} has {} elements, the guide minimum is {min}",
                        segment.element_count()
                    ),
                    RuleSource::Element,
                )
                .at_segment(segment.position()),
            );
            // The shortfall is one finding; per-element checks on a
            // truncated segment would only restate it.
            return;
        }
    }

    let Some(rules) = rules_by_tag().get(tag) else {
        return;
    };
    for rule in rules.iter().copied() {
        check_element(segment, rule, issues);
    }
}

fn check_element(segment: &Segment, rule: &ElementRule, issues: &mut Vec<ValidationIssue>) {
    let value = segment.value(rule.index).unwrap_or("");
    if value.is_empty() {
        if rule.required {
            issues.push(
                ValidationIssue::error(
                    IssueKind::MissingRequiredElement,
                    format!("{} is required but empty", rule.name),
                    RuleSource::Element,
                )
                .at_segment(segment.position()),
            );
        }
        return;
    }

    if value.len() < rule.min_len || value.len() > rule.max_len {
        issues.push(
            ValidationIssue::error(
                IssueKind::InvalidElementLength,
                format!(
                    "{} is {} characters, expected {}..{}",
                    rule.name,
                    value.len(),
                    rule.min_len,
                    rule.max_len
                ),
                RuleSource::Element,
            )
            .at_segment(segment.position()),
        );
    }

    if let Some(reason) = format_violation(value, rule.format) {
        issues.push(
            ValidationIssue::error(
                IssueKind::InvalidElementFormat,
                format!("{} value '{value}' {reason}", rule.name),
                RuleSource::Element,
            )
            .at_segment(segment.position()),
        );
    }

    if let Some(codes) = rule.codes {
        if !codes.contains(&value) {
            let message = format!(
                "{} value '{value}' is not in the expected set [{}]",
                rule.name,
                codes.join(", ")
            );
            let issue = match rule.mode {
                CodeListMode::Closed => {
                    ValidationIssue::error(IssueKind::InvalidCodeValue, message, RuleSource::Element)
                }
                CodeListMode::Open => ValidationIssue::warning(
                    IssueKind::InvalidCodeValue,
                    message,
                    RuleSource::Element,
                ),
                CodeListMode::Advisory => ValidationIssue::info(
                    IssueKind::InvalidCodeValue,
                    message,
                    RuleSource::Element,
                ),
            };
            issues.push(issue.at_segment(segment.position()));
        }
    }
}

/// Format check only; semantic correctness (does the date exist in a
/// calendar) is out of scope.
fn format_violation(value: &str, format: ValueFormat) -> Option<&'static str> {
    match format {
        ValueFormat::AlphaNumeric => None,
        ValueFormat::Numeric => {
            if value.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                Some("is not numeric")
            }
        }
        ValueFormat::Date => {
            if value.len() == 8 && all_digits(value) && digits_make_date(&value[4..]) {
                None
            } else {
                Some("is not a CCYYMMDD date")
            }
        }
        ValueFormat::ShortDate => {
            if value.len() == 6 && all_digits(value) && digits_make_date(&value[2..]) {
                None
            } else {
                Some("is not a YYMMDD date")
            }
        }
        ValueFormat::Time => {
            if (value.len() == 4 || value.len() == 6) && all_digits(value) && digits_make_time(value)
            {
                None
            } else {
                Some("is not an HHMM time")
            }
        }
    }
}

fn all_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

/// `mmdd` month/day range check over the last four digits.
fn digits_make_date(mmdd: &str) -> bool {
    if mmdd.len() != 4 || !all_digits(mmdd) {
        return false;
    }
    let month: u32 = mmdd[..2].parse().unwrap_or(0);
    let day: u32 = mmdd[2..].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

fn digits_make_time(value: &str) -> bool {
    let hour: u32 = value[..2].parse().unwrap_or(99);
    let minute: u32 = value[2..4].parse().unwrap_or(99);
    let second: u32 = if value.len() == 6 {
        value[4..6].parse().unwrap_or(99)
    } else {
        0
    };
    hour <= 23 && minute <= 59 && second <= 59
}

/// Party identification advisory: a 278 is expected to name the payer and
/// the insured. Only advisory, and only once NM1 segments exist at all, so
/// a bare structural skeleton stays clean.
fn check_name_identification(doc: &ParsedDocument, issues: &mut Vec<ValidationIssue>) {
    let qualifiers: Vec<&str> = doc
        .segments()
        .iter()
        .filter(|s| s.tag() == "NM1")
        .filter_map(|s| s.value(1))
        .collect();
    if qualifiers.is_empty() {
        return;
    }
    for (qualifier, party) in [("PR", "payer"), ("IL", "insured")] {
        if !qualifiers.contains(&qualifier) {
            issues.push(ValidationIssue::info(
                IssueKind::MissingRecommendedSegment,
                format!("No NM1 with qualifier '{qualifier}' identifies the {party}"),
                RuleSource::Element,
            ));
        }
    }
}
