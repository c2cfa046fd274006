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

//! # EDI278 - X12 278 Parsing and TR3 Validation
//!
//! EDI278 turns raw, delimiter-based X12 278 (health care services review)
//! text into a structured, hierarchically organized document plus a
//! severity-classified compliance report.
//!
//! ## Quick Start
//!
//! ```rust
//! use edi278::parse_and_validate;
//!
//! let interchange = "ISA*00*          *00*          *ZZ*SUBMITTERID    \
//!                    *ZZ*RECEIVERID     *250101*1200*^*00501*000000001*0*T*:~\
//!                    GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~\
//!                    ST*278*0001~BHT*0007*13*A12345*20250101*1200~\
//!                    HL*1**20*1~HL*2*1*21*1~HL*3*2*22*0~\
//!                    SE*6*0001~GE*1*1~IEA*1*000000001~";
//!
//! let (doc, report) = parse_and_validate(interchange).expect("parseable envelope");
//!
//! assert!(report.is_valid());
//! assert_eq!(doc.segments().len(), 10);
//! ```
//!
//! ## Design
//!
//! - Only an unusable envelope (too short to sniff delimiters, colliding
//!   delimiters) or a breached [`Limits`] bound is a hard [`ParseError`].
//!   Every other defect is recorded and parsing continues, so callers
//!   always receive a complete document-shaped report.
//! - A [`ParsedDocument`] and its [`ValidationResult`] are exclusively
//!   owned by the call that produced them; the rule tables are read-only,
//!   so independent documents validate safely in parallel.
//! - The error tolerance in [`ValidationConfig`] is the single policy knob:
//!   how many ERROR-level findings a document may carry and still be
//!   called valid (default: 2).
//!
//! ## Modules
//!
//! - [`core`](mod@core): parsing and the document model
//! - [`validate`](mod@validate): TR3 validation passes and the report model

// Re-export core types
pub use edi278_core::{
    parse,
    parse_with_limits,
    BuilderNote,
    ControlPair,
    Delimiters,
    Element,
    Envelope,
    LevelCode,
    Limits,
    Loop,
    LoopIndex,
    LoopTree,
    ParseError,
    ParseErrorKind,
    ParseOptions,
    ParseResult,
    ParsedDocument,
    Segment,
    SegmentIter,
};

// Re-export validation types
pub use edi278_validate::{
    validate, validate_with_config, IssueKind, RuleSource, Severity, SeverityCounts,
    ValidationConfig, ValidationIssue, ValidationPass, ValidationResult, Validator,
    DEFAULT_ERROR_TOLERANCE,
};

/// Core parsing utilities.
pub mod core {
    //! Parsing and document model re-exports.
    pub use edi278_core::{
        parse, parse_with_limits, Delimiters, Limits, ParseOptions, ParseOptionsBuilder,
        ParsedDocument, SegmentIter, MIN_ISA_LENGTH,
    };
}

/// Validation utilities.
pub mod validate {
    //! TR3 validation re-exports.
    pub use edi278_validate::{
        validate, validate_with_config, CodeListMode, ControlNumberPass, ElementPass, ElementRule,
        StructuralPass, ValidationConfig, ValidationPass, Validator, ValueFormat,
    };
}

/// Parse and validate one interchange with default limits and policy.
///
/// The composition of [`parse`] and [`validate()`](validate()): a hard
/// error only for the unrecoverable envelope cases, otherwise the full
/// document and its compliance report.
#[inline]
pub fn parse_and_validate(
    input: &str,
) -> Result<(ParsedDocument, ValidationResult), ParseError> {
    let doc = parse(input)?;
    let report = validate(&doc);
    Ok((doc, report))
}

/// Parse and validate with explicit limits and policy configuration.
pub fn parse_and_validate_with(
    input: &str,
    options: ParseOptions,
    config: ValidationConfig,
) -> Result<(ParsedDocument, ValidationResult), ParseError> {
    let doc = parse_with_limits(input, options)?;
    let report = validate_with_config(&doc, config);
    Ok((doc, report))
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
