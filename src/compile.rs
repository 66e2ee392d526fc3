// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Compile patterns to deterministic automata in one call
//!
//! Each function lexes its input, builds the nondeterministic graph,
//! and determinizes it.
//!

use indexmap::IndexMap;

use crate::{
    automata::{Graph, Infinite, Labelled, Plain},
    builders::{build_infinite, build_labelling, build_nfa},
    determinizer::determinize,
    errors::Error,
    lexer::tokenize,
    tokens::Token,
};

// lex every pattern, keeping the map order
fn tokenize_all(patterns: &IndexMap<String, String>) -> Result<IndexMap<String, Vec<Token>>, Error> {
    patterns
        .iter()
        .map(|(name, pattern)| Ok((name.clone(), tokenize(pattern)?)))
        .collect()
}

///
/// Compile a pattern to a DFA
///
/// # Errors
///
/// Return [Error::MalformedPattern] if the pattern's brackets are not balanced,
/// or [Error::BuildError] if the pattern contains a strong iteration.
///
/// # Example
///
/// ```
/// use regex_fsm::compile::compile;
///
/// let dfa = compile("(ab|c){d}").unwrap();
/// assert!(dfa.accepts("abdd"));
/// assert!(dfa.accepts("c"));
/// assert!(!dfa.accepts("d"));
/// ```
pub fn compile(pattern: &str) -> Result<Graph<Plain>, Error> {
    determinize(&build_nfa(&tokenize(pattern)?)?)
}

///
/// Compile named patterns to a deterministic labelling machine
///
/// The labels of a final state are the names of the patterns it accepts,
/// in the order of the map.
///
/// # Errors
///
/// Return [Error::MalformedPattern] if a pattern's brackets are not balanced,
/// or [Error::BuildError] if a pattern contains a strong iteration.
///
/// # Example
///
/// ```
/// use indexmap::IndexMap;
/// use regex_fsm::compile::compile_labelling;
///
/// let mut patterns = IndexMap::new();
/// patterns.insert("x".to_string(), "ab".to_string());
/// patterns.insert("y".to_string(), "cd".to_string());
/// let m = compile_labelling(&patterns).unwrap();
/// assert_eq!(m.accepts("cd"), Some(vec!["y".to_string()]));
/// assert_eq!(m.accepts("zz"), None);
/// ```
pub fn compile_labelling(patterns: &IndexMap<String, String>) -> Result<Graph<Labelled>, Error> {
    determinize(&build_labelling(&tokenize_all(patterns)?)?)
}

///
/// Compile named patterns to a deterministic Buchi-style machine
///
/// Same as [compile_labelling] but strong iterations `[...]` are allowed.
///
/// # Errors
///
/// Return [Error::MalformedPattern] if a pattern's brackets are not balanced.
///
pub fn compile_infinite(patterns: &IndexMap<String, String>) -> Result<Graph<Infinite>, Error> {
    determinize(&build_infinite(&tokenize_all(patterns)?)?)
}
