// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Compile a small regular-expression language to finite-state automata
//!
//! # Overview
//!
//! Patterns are built from characters and four constructs:
//! groups `( ... )`, disjunctions `a|b`, iterations `{ ... }` (zero or more
//! repetitions), and strong iterations `[ ... ]` (loop forever).
//!
//! The [lexer](crate::lexer) converts a pattern to a list of [tokens](crate::tokens).
//! The [builders](crate::builders) turn token lists into nondeterministic
//! automata, represented as [graphs](crate::automata::Graph). There are three flavors:
//! - plain NFAs that accept or reject a string
//! - labelling machines built from several named patterns. Final states
//!   are labelled with the names of the patterns they accept.
//! - Buchi-style machines: labelling machines that also support strong
//!   iteration. A strong iteration contracts the loop of its sub-automaton
//!   into its entry state.
//!
//! Module [determinizer](crate::determinizer) converts any of these graphs
//! to an equivalent deterministic graph by subset construction, and module
//! [compile](crate::compile) chains all the steps.
//!
//! # Example
//!
//! ```
//! use regex_fsm::{builders::build_nfa, determinizer::determinize, lexer::tokenize};
//!
//! let tokens = tokenize("(ab|c){d}").unwrap();
//! let nfa = build_nfa(&tokens).unwrap();
//! let dfa = determinize(&nfa).unwrap();
//! assert!(dfa.accepts("abdd"));
//! assert!(!dfa.accepts("abc"));
//! ```
//!

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod automata;
pub mod builders;
pub mod compile;
pub mod determinizer;
pub mod errors;
pub mod lexer;
pub mod tokens;

mod bfs_queues;
