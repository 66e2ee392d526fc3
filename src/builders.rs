// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Construction of automata from token lists
//!
//! A builder never recurses into composite tokens. It keeps a FIFO queue of
//! obligations. An obligation `(placeholder, payload, source, target)` means
//! that the graph has a transition `source --placeholder--> target` that must
//! be replaced by a sub-automaton for `payload`, wired between `source` and
//! `target`. Expanding an obligation removes the placeholder transition and
//! adds transitions and fresh states, possibly with new obligations for
//! composite sub-tokens. Each token is expanded once, so construction
//! terminates after a number of steps bounded by the number of tokens.
//!
//! Expansion rules:
//! - token list: a chain of fresh states between source and target, one
//!   transition or obligation per token. An empty list is an epsilon transition.
//! - literal `c`: a transition `source --c--> target`
//! - group: its token list replaces it
//! - disjunction: one obligation per branch, all from source to target
//! - iteration `{...}`: a fresh loop state `L` with epsilon transitions
//!   `source --> L --> target` and an obligation for the body from `L` to `L`
//! - strong iteration `[...]`: an obligation for the body from source to source,
//!   then target is merged into source.
//!
//! Strong iteration is supported only by [Infinite] builders.
//!

use std::{
    collections::{HashMap, VecDeque},
    fmt::Display,
};

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    automata::{Flavor, Graph, Infinite, Labelled, Plain, StateId, Symbol},
    errors::Error,
    tokens::Token,
};

///
/// What an obligation must expand
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A single token
    Token(Token),
    /// A sequence of tokens
    Tokens(Vec<Token>),
}

impl Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Token(t) => t.fmt(f),
            Payload::Tokens(v) => {
                write!(f, "[")?;
                for (i, t) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    t.fmt(f)?;
                }
                write!(f, "]")
            }
        }
    }
}

///
/// Pending expansion of a placeholder transition
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obligation {
    /// Symbol of the placeholder transition
    pub placeholder: Symbol,
    /// What to build
    pub payload: Payload,
    /// Source of the placeholder transition
    pub source: StateId,
    /// Target of the placeholder transition
    pub target: StateId,
}

///
/// Work-list automaton builder
///
/// All the patterns added to a builder share the same initial state.
/// Each pattern gets its own final state.
///
#[derive(Debug)]
pub struct GraphBuilder<F> {
    graph: Graph<F>,
    pending: VecDeque<Obligation>,
    next_state: usize,
    next_placeholder: usize,
    // absorbed state -> state it was merged into
    merged: HashMap<StateId, StateId>,
}

/// Builder for plain NFAs
pub type NfaBuilder = GraphBuilder<Plain>;

/// Builder for labelling machines
pub type LabellingBuilder = GraphBuilder<Labelled>;

/// Builder for Buchi-style machines
pub type InfiniteBuilder = GraphBuilder<Infinite>;

impl<F: Flavor> Default for GraphBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Flavor> GraphBuilder<F> {
    ///
    /// Create a new builder
    ///
    pub fn new() -> Self {
        GraphBuilder {
            graph: Graph::new(),
            pending: VecDeque::new(),
            next_state: 0,
            next_placeholder: 0,
            merged: HashMap::new(),
        }
    }

    fn fresh_state(&mut self, labels: Vec<String>, is_final: bool) -> Result<StateId, Error> {
        let id = StateId(self.next_state);
        self.graph.add_labelled_state(id, labels, is_final)?;
        self.next_state += 1;
        Ok(id)
    }

    fn fresh_placeholder(&mut self) -> Symbol {
        let p = Symbol::Pending(self.next_placeholder);
        self.next_placeholder += 1;
        p
    }

    // initial state, created on first use
    fn start(&mut self) -> Result<StateId, Error> {
        match self.graph.initial_id() {
            Some(i) => Ok(i),
            None => {
                let i = self.fresh_state(Vec::new(), false)?;
                self.graph.set_initial_state(i)?;
                Ok(i)
            }
        }
    }

    // current id of a state that may have been merged into another one
    fn resolve(&self, mut id: StateId) -> StateId {
        while let Some(&next) = self.merged.get(&id) {
            id = next;
        }
        id
    }

    // add a placeholder transition and the matching obligation
    fn defer(&mut self, payload: Payload, source: StateId, target: StateId) -> Result<(), Error> {
        let placeholder = self.fresh_placeholder();
        self.graph.add_transition(source, target, placeholder)?;
        self.pending.push_back(Obligation {
            placeholder,
            payload,
            source,
            target,
        });
        Ok(())
    }

    // connect source to target with one element of a token list
    fn link(&mut self, token: &Token, source: StateId, target: StateId) -> Result<(), Error> {
        match token {
            Token::Literal(c) => self.graph.add_transition(source, target, Symbol::Char(*c)),
            Token::Group(v) => self.defer(Payload::Tokens(v.clone()), source, target),
            t => self.defer(Payload::Token(t.clone()), source, target),
        }
    }

    fn expand_list(&mut self, list: &[Token], source: StateId, target: StateId) -> Result<(), Error> {
        match list.split_last() {
            None => self.graph.add_transition(source, target, Symbol::Epsilon),
            Some((last, prefix)) => {
                let mut prev = source;
                for token in prefix {
                    let next = self.fresh_state(Vec::new(), false)?;
                    self.link(token, prev, next)?;
                    prev = next;
                }
                self.link(last, prev, target)
            }
        }
    }

    fn expand_token(&mut self, token: Token, source: StateId, target: StateId) -> Result<(), Error> {
        match token {
            Token::Literal(c) => self.graph.add_transition(source, target, Symbol::Char(c)),
            Token::Sequence(s) => Err(Error::BuildError(format!(
                "unresolved sequence {s:?} in {}",
                F::NAME
            ))),
            Token::Group(v) => self.defer(Payload::Tokens(v), source, target),
            Token::Disjunction(branches) => {
                for b in branches {
                    self.defer(Payload::Tokens(b), source, target)?;
                }
                Ok(())
            }
            Token::Repeat01(v) => {
                let lp = self.fresh_state(Vec::new(), false)?;
                self.graph.add_transition(source, lp, Symbol::Epsilon)?;
                self.graph.add_transition(lp, target, Symbol::Epsilon)?;
                self.defer(Payload::Tokens(v), lp, lp)
            }
            Token::RepeatForever(v) => {
                if !F::STRONG_ITERATION {
                    return Err(Error::BuildError(format!(
                        "strong iteration is not supported in {}",
                        F::NAME
                    )));
                }
                // the body loops on source and target collapses into source
                let placeholder = self.fresh_placeholder();
                self.graph.add_transition(source, target, placeholder)?;
                self.pending.push_back(Obligation {
                    placeholder,
                    payload: Payload::Tokens(v),
                    source,
                    target: source,
                });
                if source != target {
                    trace!("merge {target} into {source}");
                    self.graph.merge_states(source, target)?;
                    self.merged.insert(target, source);
                }
                Ok(())
            }
        }
    }

    fn expand(&mut self, obligation: Obligation) -> Result<(), Error> {
        let source = self.resolve(obligation.source);
        let target = self.resolve(obligation.target);
        trace!(
            "expand {}: {} from {source} to {target}",
            obligation.placeholder,
            obligation.payload
        );
        self.graph
            .remove_transitions(source, obligation.placeholder)?;
        match obligation.payload {
            Payload::Tokens(list) => self.expand_list(&list, source, target),
            Payload::Token(token) => self.expand_token(token, source, target),
        }
    }

    ///
    /// Add a pattern
    ///
    /// - create a final state with the given labels and an obligation
    ///   to build the tokens between the initial state and this final state
    /// - return the new final state
    ///
    /// # Errors
    ///
    /// Return [Error::BuildError] if the tokens contain an unresolved sequence,
    /// or a strong iteration and this flavor doesn't support it. The graph is
    /// not modified in this case.
    ///
    pub fn add_pattern(&mut self, labels: Vec<String>, tokens: &[Token]) -> Result<StateId, Error> {
        if let Some(t) = tokens.iter().find(|t| !t.is_resolved()) {
            return Err(Error::BuildError(format!(
                "unresolved sequence in {} for {}",
                t,
                F::NAME
            )));
        }
        if !F::STRONG_ITERATION {
            if let Some(t) = tokens.iter().find(|t| t.has_strong_iteration()) {
                return Err(Error::BuildError(format!(
                    "strong iteration is not supported in {}: {}",
                    F::NAME,
                    t
                )));
            }
        }
        let start = self.start()?;
        let accept = self.fresh_state(labels, true)?;
        self.defer(Payload::Tokens(tokens.to_vec()), start, accept)?;
        Ok(accept)
    }

    ///
    /// Expand all obligations and return the automaton
    ///
    /// # Errors
    ///
    /// Return [Error::BuildError] if a token can't be expanded.
    /// No graph is returned in this case.
    ///
    pub fn build(mut self) -> Result<Graph<F>, Error> {
        self.start()?;
        let mut steps = 0;
        while let Some(obligation) = self.pending.pop_front() {
            self.expand(obligation)?;
            steps += 1;
        }
        debug!(
            "built {}: {} states, {} transitions, {} expansions, {} merges",
            F::NAME,
            self.graph.num_states(),
            self.graph.num_transitions(),
            steps,
            self.merged.len()
        );
        Ok(self.graph)
    }
}

// one final state per pattern, labelled with the pattern name
fn build_named<F: Flavor>(patterns: &IndexMap<String, Vec<Token>>) -> Result<Graph<F>, Error> {
    let mut builder = GraphBuilder::<F>::new();
    for (name, tokens) in patterns {
        builder.add_pattern(vec![name.clone()], tokens)?;
    }
    builder.build()
}

///
/// Build an NFA from a token list
///
/// The NFA has initial state `s0` and a single final state `s1`.
///
/// # Errors
///
/// Return [Error::BuildError] if the tokens contain a strong iteration or an unresolved sequence.
///
/// # Example
///
/// ```
/// use regex_fsm::{builders::build_nfa, lexer::tokenize};
///
/// let nfa = build_nfa(&tokenize("a{b}").unwrap()).unwrap();
/// assert!(nfa.accepts("abbb"));
/// assert!(!nfa.accepts("ba"));
/// ```
pub fn build_nfa(tokens: &[Token]) -> Result<Graph<Plain>, Error> {
    let mut builder = NfaBuilder::new();
    builder.add_pattern(Vec::new(), tokens)?;
    builder.build()
}

///
/// Build a labelling machine for a list of named patterns
///
/// The machine has initial state `s0` and states `s1` ... `sN` are the final
/// states, one per pattern in order, each labelled with the pattern name.
///
/// # Errors
///
/// Return [Error::BuildError] if the tokens contain a strong iteration or an unresolved sequence.
///
pub fn build_labelling(patterns: &IndexMap<String, Vec<Token>>) -> Result<Graph<Labelled>, Error> {
    build_named(patterns)
}

///
/// Build a Buchi-style machine for a list of named patterns
///
/// Same as [build_labelling] but strong iterations are supported.
///
/// # Errors
///
/// Return [Error::BuildError] if the tokens contain an unresolved sequence.
///
pub fn build_infinite(patterns: &IndexMap<String, Vec<Token>>) -> Result<Graph<Infinite>, Error> {
    build_named(patterns)
}
