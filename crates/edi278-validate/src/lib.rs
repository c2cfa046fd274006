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

//! TR3 compliance validation for parsed X12 278 interchanges.
//!
//! Three read-only passes walk the [`ParsedDocument`] produced by
//! `edi278-core` and report severity-classified findings:
//!
//! - structural: presence, order, and cardinality of required segments and
//!   hierarchical loops;
//! - element-level: data type, length bounds, and allowed-code lists from a
//!   declarative rule table;
//! - control numbers: header/trailer pairing and declared counts.
//!
//! Nothing here aborts: every finding, however severe, lands in the
//! [`ValidationResult`] so a caller always gets the complete picture in one
//! pass.
//!
//! ## Quick Start
//!
//! ```rust
//! use edi278_core::parse;
//! use edi278_validate::{validate, Severity};
//!
//! let input = "ISA*00*          *00*          *ZZ*SUBMITTERID    \
//!              *ZZ*RECEIVERID     *250101*1200*^*00501*000000001*0*T*:~\
//!              GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~\
//!              ST*278*0001~BHT*0007*13*A12345*20250101*1200~\
//!              HL*1**20*1~HL*2*1*21*1~HL*3*2*22*0~\
//!              SE*6*0001~GE*1*1~IEA*1*000000001~";
//! let doc = parse(input).unwrap();
//! let report = validate(&doc);
//!
//! assert!(report.is_valid());
//! for issue in report.issues_at_least(Severity::Warning) {
//!     eprintln!("{}", issue);
//! }
//! ```
//!
//! ## Custom Configuration
//!
//! The error tolerance is the one policy knob business judgment owns: how
//! many ERROR-level findings a document may carry and still be usable.
//!
//! ```rust
//! use edi278_validate::{validate_with_config, ValidationConfig};
//! # use edi278_core::parse;
//! # let input = "ISA*00*          *00*          *ZZ*SUBMITTERID    \
//! #              *ZZ*RECEIVERID     *250101*1200*^*00501*000000001*0*T*:~\
//! #              GS*HI*SUBMITTER*RECEIVER*20250101*1200*1*X*005010X217~\
//! #              ST*278*0001~BHT*0007*13*A12345*20250101*1200~\
//! #              HL*1**20*1~HL*2*1*21*1~HL*3*2*22*0~\
//! #              SE*6*0001~GE*1*1~IEA*1*000000001~";
//! # let doc = parse(input).unwrap();
//! let report = validate_with_config(&doc, ValidationConfig::strict());
//! assert!(report.is_valid());
//! ```

mod control;
mod element;
mod issue;
mod report;
mod runner;
mod structural;

pub use control::ControlNumberPass;
pub use element::{CodeListMode, ElementPass, ElementRule, ValueFormat};
pub use issue::{IssueKind, RuleSource, Severity, ValidationIssue};
pub use report::{SeverityCounts, ValidationResult};
pub use runner::{
    ValidationConfig, ValidationPass, Validator, DEFAULT_ERROR_TOLERANCE,
};
pub use structural::StructuralPass;

use edi278_core::ParsedDocument;

/// Validate a document with the default configuration.
///
/// Pure function of its input; calling it twice on the same document yields
/// an identical result.
pub fn validate(doc: &ParsedDocument) -> ValidationResult {
    Validator::new(ValidationConfig::default()).run(doc)
}

/// Validate a document with an explicit policy configuration.
pub fn validate_with_config(doc: &ParsedDocument, config: ValidationConfig) -> ValidationResult {
    Validator::new(config).run(doc)
}
