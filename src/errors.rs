// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Error codes
//!

use thiserror::Error;

use crate::automata::StateId;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
///
/// Errors produced by the lexer, the automaton builders, and the graph mutators
///
pub enum Error {
    /// A bracket is not balanced in a pattern.
    ///
    /// Either a closing bracket has no matching opening bracket (then `offset`
    /// is the byte offset of that closing bracket), or a bracket is still open
    /// at the end of the pattern (then `offset` is the pattern length and
    /// `bracket` is the opening bracket).
    #[error("malformed pattern: unbalanced '{bracket}' at offset {offset}")]
    MalformedPattern {
        /// The offending bracket
        bracket: char,
        /// Byte offset in the pattern
        offset: usize,
    },

    /// Too many brackets are nested in a pattern.
    ///
    /// `offset` is the byte offset of the first opening bracket beyond
    /// [MAX_NESTING](crate::lexer::MAX_NESTING).
    #[error("malformed pattern: brackets nested too deeply at offset {offset}")]
    NestingTooDeep {
        /// Byte offset in the pattern
        offset: usize,
    },

    /// A builder found a token it can't expand.
    ///
    /// This happens if an unresolved sequence reaches a builder, or if a
    /// strong iteration `[...]` is given to a builder that doesn't support it.
    #[error("cannot build automaton: {0}")]
    BuildError(String),

    /// A state id is used but the state doesn't exist.
    #[error("state {0} does not exist")]
    UnknownState(StateId),

    /// Attempt to add a state that already exists.
    #[error("state {0} already exists")]
    DuplicateState(StateId),

    /// The initial state of a graph can only be set once.
    #[error("the initial state is already set")]
    InitialStateRedefined,

    /// The graph has no initial state.
    #[error("no initial state")]
    MissingInitialState,
}
