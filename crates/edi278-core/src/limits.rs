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

//! Security limits for X12 parsing.

/// Configurable limits for parser security.
///
/// The only unbounded resource in the pipeline is memory proportional to
/// input size, so callers must bound the input before tokenizing. These
/// limits protect against memory exhaustion from oversized or degenerate
/// interchanges.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum input size in bytes (default: 16MB, generous for a single
    /// interchange; realistic 278 files are a few KB).
    pub max_input_size: usize,
    /// Maximum number of segments (default: 100k).
    pub max_segments: usize,
    /// Maximum elements per segment (default: 1k).
    pub max_elements_per_segment: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_size: 16 * 1024 * 1024, // 16MB
            max_segments: 100_000,
            max_elements_per_segment: 1_000,
        }
    }
}

impl Limits {
    /// Create limits with no restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_input_size: usize::MAX,
            max_segments: usize::MAX,
            max_elements_per_segment: usize::MAX,
        }
    }
}
