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

//! Aggregated validation report.

use crate::issue::{Severity, ValidationIssue};

/// Per-severity counts over a validation report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeverityCounts {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
}

impl SeverityCounts {
    fn tally(issues: &[ValidationIssue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity() {
                Severity::Info => counts.info += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Error => counts.error += 1,
                Severity::Critical => counts.critical += 1,
            }
        }
        counts
    }

    /// Total number of issues across all severities.
    pub fn total(&self) -> usize {
        self.info + self.warning + self.error + self.critical
    }
}

/// The ordered issue list plus the derived verdict.
///
/// Built once per validation run and read-only thereafter. Issue order is
/// the validators' emission order; nothing is ever dropped below the
/// configured cap, so `issues` is the complete drill-down regardless of the
/// verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
    counts: SeverityCounts,
    is_valid: bool,
}

impl ValidationResult {
    /// Build a report from collected issues and the configured error
    /// tolerance.
    pub(crate) fn new(issues: Vec<ValidationIssue>, error_tolerance: usize) -> Self {
        let counts = SeverityCounts::tally(&issues);
        let is_valid = counts.critical == 0 && counts.error <= error_tolerance;
        Self {
            issues,
            counts,
            is_valid,
        }
    }

    /// All issues in emission order.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// The single boolean summary: no CRITICAL issues and the ERROR count
    /// within the configured tolerance.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Per-severity counts.
    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }

    /// Issues at or above a severity threshold.
    pub fn issues_at_least(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity() >= severity)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
