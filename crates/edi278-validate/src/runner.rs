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

//! Validation runner and policy configuration.

use crate::control::ControlNumberPass;
use crate::element::ElementPass;
use crate::issue::{RuleSource, ValidationIssue};
use crate::report::ValidationResult;
use crate::structural::StructuralPass;
use edi278_core::ParsedDocument;

/// Default number of ERROR-level issues an otherwise clean document may
/// carry and still be called valid.
///
/// Real-world 278 files routinely carry a small number of non-blocking
/// element deviations (an off-roster code, a short identifier) that should
/// not flip an otherwise usable document to invalid. Two is the shipped
/// policy; it is a business judgment, not a grammar rule, which is why it
/// lives in [`ValidationConfig`] instead of a constant inside the
/// aggregator.
pub const DEFAULT_ERROR_TOLERANCE: usize = 2;

/// Maximum number of issues to collect before stopping.
///
/// A degenerate document (thousands of truncated segments) could otherwise
/// produce an unbounded report. Legitimate 278 files produce well under a
/// hundred findings.
const MAX_ISSUES: usize = 10_000;

/// Policy configuration for the validation run.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// ERROR-level issues tolerated before `is_valid` flips to false.
    /// CRITICAL issues are never tolerated. See [`DEFAULT_ERROR_TOLERANCE`].
    pub error_tolerance: usize,
    /// Cap on collected issues (default: 10,000).
    pub max_issues: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            error_tolerance: DEFAULT_ERROR_TOLERANCE,
            max_issues: MAX_ISSUES,
        }
    }
}

impl ValidationConfig {
    /// A configuration that tolerates no ERROR-level issues at all.
    pub fn strict() -> Self {
        Self {
            error_tolerance: 0,
            ..Self::default()
        }
    }

    /// Override the error tolerance.
    pub fn with_error_tolerance(mut self, tolerance: usize) -> Self {
        self.error_tolerance = tolerance;
        self
    }
}

/// Trait for validator passes.
///
/// Passes read the document; they never mutate it, so a document can be
/// validated repeatedly (or concurrently with other documents) with
/// identical results.
pub trait ValidationPass: Send + Sync {
    /// Pass identifier.
    fn id(&self) -> &str;

    /// Pass description.
    fn description(&self) -> &str;

    /// Which rule family this pass reports under.
    fn source(&self) -> RuleSource;

    /// Run the pass over a document.
    fn check(&self, doc: &ParsedDocument) -> Vec<ValidationIssue>;
}

/// Runs the validator passes in fixed order and aggregates their findings.
pub struct Validator {
    config: ValidationConfig,
    passes: Vec<Box<dyn ValidationPass>>,
}

/// The shipped passes, in emission order: structural, element-level,
/// control numbers.
fn default_passes() -> Vec<Box<dyn ValidationPass>> {
    vec![
        Box::new(StructuralPass),
        Box::new(ElementPass),
        Box::new(ControlNumberPass),
    ]
}

impl Validator {
    /// Create a validator with the default passes.
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            passes: default_passes(),
        }
    }

    /// Create a validator with custom passes.
    pub fn with_passes(config: ValidationConfig, passes: Vec<Box<dyn ValidationPass>>) -> Self {
        Self { config, passes }
    }

    /// Add a custom pass after the shipped ones.
    pub fn add_pass(&mut self, pass: Box<dyn ValidationPass>) {
        self.passes.push(pass);
    }

    /// Validate a document.
    ///
    /// Pure function of its input: running it twice over the same document
    /// yields an identical report, issues in identical order.
    pub fn run(&self, doc: &ParsedDocument) -> ValidationResult {
        let mut issues = Vec::new();
        'passes: for pass in &self.passes {
            for issue in pass.check(doc) {
                if issues.len() >= self.config.max_issues {
                    break 'passes;
                }
                issues.push(issue);
            }
        }
        ValidationResult::new(issues, self.config.error_tolerance)
    }
}
