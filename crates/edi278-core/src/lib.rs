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

//! Core parser and data model for X12 278 interchanges.
//!
//! This crate turns raw, delimiter-based X12 text into a structured
//! [`ParsedDocument`]:
//!
//! - [`Delimiters`] discovers the per-document delimiters from the
//!   fixed-width ISA envelope;
//! - [`SegmentIter`] tokenizes the stream into ordered [`Segment`]s,
//!   lazily and restartably;
//! - the builder assembles the ISA/GS/ST envelope and the HL loop tree,
//!   recovering from orphan and duplicate HL references instead of
//!   aborting.
//!
//! TR3 compliance checking lives in the companion `edi278-validate` crate,
//! which reads the document produced here without mutating it.

mod builder;
mod delimiters;
mod document;
mod error;
mod limits;
mod parser;
mod segment;
mod tokenizer;

pub use delimiters::{Delimiters, MIN_ISA_LENGTH};
pub use document::{
    BuilderNote, ControlPair, Envelope, LevelCode, Loop, LoopIndex, LoopTree, ParsedDocument,
};
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use limits::Limits;
pub use parser::{parse, parse_with_limits, ParseOptions, ParseOptionsBuilder};
pub use segment::{Element, Segment};
pub use tokenizer::SegmentIter;
