// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Finite-state automata as labelled transition graphs
//!
//! A [Graph] is a directed multigraph. Each state has an identifier ([StateId]),
//! a final flag, and a list of labels. Transitions are triples `(source, target, symbol)`
//! where a symbol is either a character, the epsilon symbol, or a placeholder
//! used while an automaton is being built (see [builders](crate::builders)).
//! A source state may have several transitions on the same symbol.
//!
//! Graphs come in three flavors, given by a type parameter that implements [Flavor]:
//! - [Plain]: ordinary NFA/DFA. Acceptance is a Boolean.
//! - [Labelled]: Moore-style labelling machine. Final states are labelled
//!   with the names of the patterns they accept, and acceptance returns these names.
//! - [Infinite]: Buchi-style machine. Same acceptance as [Labelled], but the builder
//!   supports strong iteration.
//!
//! All mutators check their arguments: a transition can only refer to existing
//! states and a state can't be added twice.
//!
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{Debug, Display},
    marker::PhantomData,
};

use crate::errors::Error;

/// Character used to display the epsilon symbol
pub const EPSILON: char = '$';

///
/// State identifier
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub usize);

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

///
/// Transition symbols
///
/// Placeholder symbols `Pending(i)` mark transitions that a builder still has
/// to expand. A finished graph does not contain them.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// Free move
    Epsilon,
    /// Input character
    Char(char),
    /// Placeholder for a sub-automaton under construction
    Pending(usize),
}

impl Symbol {
    /// Check whether this is the epsilon symbol
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "{EPSILON}"),
            Symbol::Char(c) => write!(f, "{c}"),
            Symbol::Pending(i) => write!(f, "@{i}"),
        }
    }
}

/// Set of states, sorted by id
pub type StateSet = BTreeSet<StateId>;

///
/// Automaton flavor
///
/// The flavor decides what acceptance returns and which constructs the
/// builders accept.
///
pub trait Flavor: Debug + Clone + Copy + Default {
    /// Result of running the automaton on an input
    type Outcome: Debug + PartialEq;

    /// Name used in logs and error messages
    const NAME: &'static str;

    /// Whether builders of this flavor support strong iteration `[...]`
    const STRONG_ITERATION: bool;

    /// Outcome of a run, given the final states reached at the end of the input
    /// (in increasing id order).
    fn outcome<'a>(final_states: impl Iterator<Item = &'a State>) -> Self::Outcome;
}

/// Flavor for plain NFAs and DFAs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

/// Flavor for labelling (Moore-style) machines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Labelled;

/// Flavor for infinite-acceptance (Buchi-style) machines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Infinite;

// labels of all the final states reached, or None if there's none
fn collect_labels<'a>(final_states: impl Iterator<Item = &'a State>) -> Option<Vec<String>> {
    let mut result: Option<Vec<String>> = None;
    for s in final_states {
        result
            .get_or_insert_with(Vec::new)
            .extend(s.labels.iter().cloned());
    }
    result
}

impl Flavor for Plain {
    type Outcome = bool;
    const NAME: &'static str = "NFA";
    const STRONG_ITERATION: bool = false;

    fn outcome<'a>(mut final_states: impl Iterator<Item = &'a State>) -> bool {
        final_states.next().is_some()
    }
}

impl Flavor for Labelled {
    type Outcome = Option<Vec<String>>;
    const NAME: &'static str = "labelling machine";
    const STRONG_ITERATION: bool = false;

    fn outcome<'a>(final_states: impl Iterator<Item = &'a State>) -> Option<Vec<String>> {
        collect_labels(final_states)
    }
}

impl Flavor for Infinite {
    type Outcome = Option<Vec<String>>;
    const NAME: &'static str = "Buchi machine";
    const STRONG_ITERATION: bool = true;

    fn outcome<'a>(final_states: impl Iterator<Item = &'a State>) -> Option<Vec<String>> {
        collect_labels(final_states)
    }
}

///
/// State of a graph
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    is_final: bool,
    // names of the patterns accepted in this state (empty for plain automata)
    labels: Vec<String>,
    // successors for each symbol: no duplicates in each list
    transitions: BTreeMap<Symbol, Vec<StateId>>,
}

impl State {
    fn new(id: StateId, labels: Vec<String>, is_final: bool) -> Self {
        State {
            id,
            is_final,
            labels,
            transitions: BTreeMap::new(),
        }
    }

    /// State id
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Check whether this state is final
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Labels attached to this state
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Successors via a symbol
    /// - return an empty slice if there's no transition on this symbol
    pub fn successors(&self, symbol: Symbol) -> &[StateId] {
        self.transitions
            .get(&symbol)
            .map_or(&[], |targets| targets.as_slice())
    }

    /// Symbols on the outgoing transitions of this state (sorted)
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.transitions.keys().copied()
    }

    /// Iterator to list the outgoing transitions as pairs (symbol, target)
    pub fn transitions(&self) -> impl Iterator<Item = (Symbol, StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(symbol, targets)| targets.iter().map(move |t| (*symbol, *t)))
    }

    /// Number of outgoing transitions
    pub fn num_transitions(&self) -> usize {
        self.transitions.values().map(|v| v.len()).sum()
    }

    fn add_successor(&mut self, symbol: Symbol, target: StateId) {
        let targets = self.transitions.entry(symbol).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    fn add_label(&mut self, label: &str) {
        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }
    }

    // replace target `from` by `to` in all transitions
    fn redirect(&mut self, from: StateId, to: StateId) {
        for targets in self.transitions.values_mut() {
            if let Some(i) = targets.iter().position(|&t| t == from) {
                if targets.contains(&to) {
                    targets.remove(i);
                } else {
                    targets[i] = to;
                }
            }
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

///
/// Node in the structural export of a graph
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
    /// State id
    pub id: StateId,
    /// Whether the state is final
    pub is_final: bool,
    /// Labels of the state
    pub labels: &'a [String],
}

///
/// Edge in the structural export of a graph
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Source state
    pub source: StateId,
    /// Target state
    pub target: StateId,
    /// Transition symbol
    pub symbol: Symbol,
}

///
/// Structure of a graph: what an external renderer needs to draw it
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure<'a> {
    /// Initial state
    pub initial: StateId,
    /// All states in increasing id order
    pub nodes: Vec<Node<'a>>,
    /// All transitions, sorted by source then symbol
    pub edges: Vec<Edge>,
}

///
/// Labelled transition graph
///
#[derive(Debug, Clone)]
pub struct Graph<F> {
    states: BTreeMap<StateId, State>,
    initial_state: Option<StateId>,
    flavor: PhantomData<F>,
}

/// Nondeterministic or deterministic finite-state automaton
pub type Nfa = Graph<Plain>;

/// Moore-style labelling machine
pub type LabellingMachine = Graph<Labelled>;

/// Buchi-style infinite-acceptance machine
pub type BuchiMachine = Graph<Infinite>;

impl<F: Flavor> Default for Graph<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Flavor> Graph<F> {
    /// Create an empty graph
    pub fn new() -> Self {
        Graph {
            states: BTreeMap::new(),
            initial_state: None,
            flavor: PhantomData,
        }
    }

    /// Id of the initial state, if set
    pub fn initial_id(&self) -> Option<StateId> {
        self.initial_state
    }

    /// Initial state, if set
    pub fn initial_state(&self) -> Option<&State> {
        self.initial_state.and_then(|i| self.states.get(&i))
    }

    /// Get a state from its id
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    /// Check whether a state exists
    pub fn contains(&self, id: StateId) -> bool {
        self.states.contains_key(&id)
    }

    /// Number of states
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Number of final states
    pub fn num_final_states(&self) -> usize {
        self.final_states().count()
    }

    /// Number of transitions
    pub fn num_transitions(&self) -> usize {
        self.states.values().map(State::num_transitions).sum()
    }

    /// Iterator to go through the states in increasing id order
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    /// Iterator to list the final states
    pub fn final_states(&self) -> impl Iterator<Item = &State> {
        self.states.values().filter(|s| s.is_final)
    }

    fn get_mut(&mut self, id: StateId) -> Result<&mut State, Error> {
        self.states.get_mut(&id).ok_or(Error::UnknownState(id))
    }

    fn check(&self, id: StateId) -> Result<(), Error> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::UnknownState(id))
        }
    }

    ///
    /// Add a state without labels
    ///
    /// # Errors
    ///
    /// Return [Error::DuplicateState] if the state already exists.
    ///
    pub fn add_state(&mut self, id: StateId, is_final: bool) -> Result<(), Error> {
        self.add_labelled_state(id, Vec::new(), is_final)
    }

    ///
    /// Add a state with labels
    ///
    /// # Errors
    ///
    /// Return [Error::DuplicateState] if the state already exists.
    ///
    pub fn add_labelled_state(
        &mut self,
        id: StateId,
        labels: Vec<String>,
        is_final: bool,
    ) -> Result<(), Error> {
        if self.contains(id) {
            return Err(Error::DuplicateState(id));
        }
        self.states.insert(id, State::new(id, labels, is_final));
        Ok(())
    }

    ///
    /// Add a transition
    ///
    /// Adding a transition that's already present has no effect.
    ///
    /// # Errors
    ///
    /// Return [Error::UnknownState] if source or target doesn't exist.
    ///
    pub fn add_transition(
        &mut self,
        source: StateId,
        target: StateId,
        symbol: Symbol,
    ) -> Result<(), Error> {
        self.check(target)?;
        self.get_mut(source)?.add_successor(symbol, target);
        Ok(())
    }

    ///
    /// Remove all the transitions from source on a symbol
    /// - return the targets of the removed transitions
    ///
    /// # Errors
    ///
    /// Return [Error::UnknownState] if source doesn't exist.
    ///
    pub fn remove_transitions(
        &mut self,
        source: StateId,
        symbol: Symbol,
    ) -> Result<Vec<StateId>, Error> {
        let s = self.get_mut(source)?;
        Ok(s.transitions.remove(&symbol).unwrap_or_default())
    }

    ///
    /// Set the initial state
    ///
    /// # Errors
    ///
    /// Return [Error::UnknownState] if the state doesn't exist or
    /// [Error::InitialStateRedefined] if the initial state is already set.
    ///
    pub fn set_initial_state(&mut self, id: StateId) -> Result<(), Error> {
        self.check(id)?;
        if self.initial_state.is_some() {
            return Err(Error::InitialStateRedefined);
        }
        self.initial_state = Some(id);
        Ok(())
    }

    ///
    /// Mark a state as final
    ///
    /// # Errors
    ///
    /// Return [Error::UnknownState] if the state doesn't exist.
    ///
    pub fn add_final_state(&mut self, id: StateId) -> Result<(), Error> {
        self.get_mut(id)?.is_final = true;
        Ok(())
    }

    ///
    /// Merge state `absorbed` into state `keep`
    ///
    /// - all transitions to `absorbed` are redirected to `keep`
    /// - the transitions from `absorbed` are added to `keep`
    /// - if `absorbed` is final, then `keep` becomes final and gets the labels of `absorbed`
    /// - if `absorbed` is the initial state, `keep` becomes the initial state
    /// - `absorbed` is removed
    ///
    /// Duplicate transitions produced by the merge are removed.
    /// Merging a state with itself does nothing.
    ///
    /// # Errors
    ///
    /// Return [Error::UnknownState] if one of the states doesn't exist.
    ///
    pub fn merge_states(&mut self, keep: StateId, absorbed: StateId) -> Result<(), Error> {
        self.check(keep)?;
        if keep == absorbed {
            return Ok(());
        }
        let old = self
            .states
            .remove(&absorbed)
            .ok_or(Error::UnknownState(absorbed))?;
        for s in self.states.values_mut() {
            s.redirect(absorbed, keep);
        }
        let k = self.get_mut(keep)?;
        for (symbol, targets) in old.transitions {
            for t in targets {
                let t = if t == absorbed { keep } else { t };
                k.add_successor(symbol, t);
            }
        }
        if old.is_final {
            k.is_final = true;
            for label in &old.labels {
                k.add_label(label);
            }
        }
        if self.initial_state == Some(absorbed) {
            self.initial_state = Some(keep);
        }
        Ok(())
    }

    ///
    /// Successors of a state via a symbol
    /// - return an empty slice if the state doesn't exist or has no transition on symbol
    ///
    pub fn successors(&self, id: StateId, symbol: Symbol) -> &[StateId] {
        self.states.get(&id).map_or(&[], |s| s.successors(symbol))
    }

    ///
    /// Epsilon closure of a state: all states reachable via epsilon transitions
    ///
    pub fn epsilon_closure(&self, id: StateId) -> StateSet {
        let mut closure = StateSet::new();
        let mut stack = vec![id];
        while let Some(s) = stack.pop() {
            if closure.insert(s) {
                stack.extend(
                    self.successors(s, Symbol::Epsilon)
                        .iter()
                        .filter(|t| !closure.contains(*t)),
                );
            }
        }
        closure
    }

    /// Epsilon closures of all states, in increasing state id order
    pub fn epsilon_closures(&self) -> Vec<(StateId, StateSet)> {
        self.states
            .keys()
            .map(|&id| (id, self.epsilon_closure(id)))
            .collect()
    }

    ///
    /// Symbols on the transitions out of a set of states, epsilon excluded
    ///
    pub fn symbols<'a>(&self, set: impl IntoIterator<Item = &'a StateId>) -> BTreeSet<Symbol> {
        set.into_iter()
            .filter_map(|id| self.states.get(id))
            .flat_map(State::symbols)
            .filter(|x| !x.is_epsilon())
            .collect()
    }

    ///
    /// States reachable from a set of states via a symbol
    ///
    /// This is the union of the epsilon closures of all the successors of
    /// states in the set.
    ///
    pub fn step<'a>(&self, set: impl IntoIterator<Item = &'a StateId>, symbol: Symbol) -> StateSet {
        let mut result = StateSet::new();
        for &s in set {
            for &t in self.successors(s, symbol) {
                if !result.contains(&t) {
                    result.extend(self.epsilon_closure(t));
                }
            }
        }
        result
    }

    ///
    /// States reached after reading an input from the initial state
    /// - return an empty set if no run reads the whole input
    ///
    pub fn run(&self, input: impl IntoIterator<Item = char>) -> StateSet {
        let mut current = match self.initial_state {
            Some(i) => self.epsilon_closure(i),
            None => return StateSet::new(),
        };
        for c in input {
            if current.is_empty() {
                break;
            }
            current = self.step(&current, Symbol::Char(c));
        }
        current
    }

    ///
    /// Run the automaton on an input string
    ///
    /// For [Plain] graphs, return true if the input is accepted.
    /// For [Labelled] and [Infinite] graphs, return the labels of the final
    /// states reached, or None if no final state is reached.
    ///
    pub fn accepts(&self, input: &str) -> F::Outcome {
        let reached = self.run(input.chars());
        F::outcome(
            reached
                .iter()
                .filter_map(|id| self.states.get(id))
                .filter(|s| s.is_final),
        )
    }

    ///
    /// Check whether this graph is deterministic
    ///
    /// A graph is deterministic if it has no epsilon transitions and
    /// at most one transition per state and symbol.
    ///
    pub fn is_deterministic(&self) -> bool {
        self.states.values().all(|s| {
            s.transitions
                .iter()
                .all(|(symbol, targets)| !symbol.is_epsilon() && targets.len() <= 1)
        })
    }

    ///
    /// Export the graph structure for rendering
    ///
    /// # Errors
    ///
    /// Return [Error::MissingInitialState] if the initial state is not set.
    ///
    pub fn export(&self) -> Result<Structure<'_>, Error> {
        let initial = self.initial_state.ok_or(Error::MissingInitialState)?;
        let nodes = self
            .states
            .values()
            .map(|s| Node {
                id: s.id,
                is_final: s.is_final,
                labels: &s.labels,
            })
            .collect();
        let edges = self
            .states
            .values()
            .flat_map(|s| {
                s.transitions().map(move |(symbol, target)| Edge {
                    source: s.id,
                    target,
                    symbol,
                })
            })
            .collect();
        Ok(Structure {
            initial,
            nodes,
            edges,
        })
    }
}

impl<F: Flavor> Display for Graph<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn plural(n: usize) -> &'static str {
            if n == 1 {
                ""
            } else {
                "s"
            }
        }

        let n = self.num_states();
        writeln!(f, "{}: {} state{}", F::NAME, n, plural(n))?;
        match self.initial_state {
            Some(i) => writeln!(f, "initial state: {i}")?,
            None => writeln!(f, "initial state: none")?,
        }
        write!(f, "final state{}:", plural(self.num_final_states()))?;
        for s in self.final_states() {
            write!(f, " {s}")?;
            if !s.labels.is_empty() {
                write!(f, " {:?}", s.labels)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "transitions:")?;
        for s in self.states.values() {
            for (symbol, target) in s.transitions() {
                writeln!(f, "  \u{03B4}({s}, {symbol}) = {target}")?;
            }
        }
        Ok(())
    }
}
