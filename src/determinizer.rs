// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Subset construction
//!
//! Convert a graph of any [flavor](crate::automata::Flavor) to an equivalent
//! deterministic graph. Each state of the result stands for a set of
//! states of the source graph, closed under epsilon transitions.
//!
//! States of the result are numbered in the order they are discovered
//! by a breadth-first exploration: `s0` is the epsilon closure of the
//! source initial state. Symbols are explored in sorted order so the
//! result does not depend on hashing.
//!

use log::{debug, trace};

use crate::{
    automata::{Flavor, Graph, StateId, StateSet},
    bfs_queues::BfsQueue,
    errors::Error,
};

// labels of the final states in set, in increasing id order
fn subset_labels<F: Flavor>(graph: &Graph<F>, set: &StateSet) -> (bool, Vec<String>) {
    let mut is_final = false;
    let mut labels = Vec::new();
    for s in set.iter().filter_map(|id| graph.state(*id)) {
        if s.is_final() {
            is_final = true;
            labels.extend(s.labels().iter().cloned());
        }
    }
    (is_final, labels)
}

///
/// Determinize a graph
///
/// The source graph is not modified.
///
/// - a state of the result is final iff its subset contains a final state
/// - its labels are the labels of these final states, in increasing id order
/// - the result has no epsilon transitions and at most one transition per state and symbol
///
/// # Errors
///
/// Return [Error::MissingInitialState] if the source graph has no initial state.
///
/// # Example
///
/// ```
/// use regex_fsm::{builders::build_nfa, determinizer::determinize, lexer::tokenize};
///
/// let nfa = build_nfa(&tokenize("{a|ab}").unwrap()).unwrap();
/// let dfa = determinize(&nfa).unwrap();
/// assert!(dfa.is_deterministic());
/// assert!(dfa.accepts("aaba"));
/// assert!(!dfa.accepts("abb"));
/// ```
pub fn determinize<F: Flavor>(graph: &Graph<F>) -> Result<Graph<F>, Error> {
    let initial = graph.initial_id().ok_or(Error::MissingInitialState)?;
    let mut result = Graph::<F>::new();
    let mut queue = BfsQueue::new();

    let start = graph.epsilon_closure(initial);
    let (is_final, labels) = subset_labels(graph, &start);
    result.add_labelled_state(StateId(0), labels, is_final)?;
    result.set_initial_state(StateId(0))?;
    queue.push(start);

    while let Some((i, subset)) = queue.pop() {
        let source = StateId(i);
        for symbol in graph.symbols(&subset) {
            let next = graph.step(&subset, symbol);
            let target = match queue.index_of(&next) {
                Some(j) => StateId(j),
                None => {
                    let (is_final, labels) = subset_labels(graph, &next);
                    trace!("new subset {} = {:?}", StateId(queue.num_seen()), next);
                    let (j, _) = queue.push(next);
                    result.add_labelled_state(StateId(j), labels, is_final)?;
                    StateId(j)
                }
            };
            result.add_transition(source, target, symbol)?;
        }
    }

    debug!(
        "determinized {}: {} states -> {} states",
        F::NAME,
        graph.num_states(),
        result.num_states()
    );
    Ok(result)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        automata::{Nfa, Symbol},
        builders::{build_infinite, build_labelling, build_nfa},
        lexer::tokenize,
        tokens::Token,
    };
    use indexmap::IndexMap;
    use proptest::prelude::*;

    fn nfa(pattern: &str) -> Nfa {
        build_nfa(&tokenize(pattern).unwrap()).unwrap()
    }

    fn named(list: &[(&str, &str)]) -> IndexMap<String, Vec<Token>> {
        list.iter()
            .map(|(name, p)| (name.to_string(), tokenize(p).unwrap()))
            .collect()
    }

    // all strings of length <= n over alphabet
    fn words(alphabet: &[char], n: usize) -> Vec<String> {
        let mut result = vec![String::new()];
        let mut last = vec![String::new()];
        for _ in 0..n {
            let mut next = Vec::new();
            for w in &last {
                for c in alphabet {
                    let mut x = w.clone();
                    x.push(*c);
                    next.push(x);
                }
            }
            result.extend(next.iter().cloned());
            last = next;
        }
        result
    }

    #[test]
    fn test_end_to_end() {
        let n = nfa("(ab|c){d}");
        let d = determinize(&n).unwrap();
        println!("NFA\n{n}\nDFA\n{d}");
        assert!(d.is_deterministic());
        for s in &["ab", "c", "abd", "abdd", "cdddd"] {
            assert!(d.accepts(s), "{:?} should be accepted", s);
        }
        for s in &["", "d", "x", "a", "b"] {
            assert!(!d.accepts(s), "{:?} should be rejected", s);
        }
    }

    #[test]
    fn test_structure() {
        // {a}: NFA s0 -$-> s2 -$-> s1, s2 -a-> s2
        let d = determinize(&nfa("{a}")).unwrap();
        println!("{d}");
        assert_eq!(d.num_states(), 2);
        assert_eq!(d.initial_id(), Some(StateId(0)));
        assert!(d.state(StateId(0)).unwrap().is_final());
        assert_eq!(d.successors(StateId(0), Symbol::Char('a')), &[StateId(1)]);
        assert_eq!(d.successors(StateId(1), Symbol::Char('a')), &[StateId(1)]);
    }

    #[test]
    fn test_reproducible() {
        let d1 = determinize(&nfa("{a|b}ab(c|{d})")).unwrap();
        let d2 = determinize(&nfa("{a|b}ab(c|{d})")).unwrap();
        assert_eq!(d1.export().unwrap(), d2.export().unwrap());
    }

    #[test]
    fn test_language_preserved() {
        let alphabet = ['a', 'b', 'c'];
        let all = words(&alphabet, 5);
        for pattern in &["abc", "a|b|c", "{a}b", "{ab|c}", "({a}|b)c{c}", "{{a}b}", ""] {
            let n = nfa(pattern);
            let d = determinize(&n).unwrap();
            assert!(d.is_deterministic());
            for w in &all {
                assert_eq!(n.accepts(w), d.accepts(w), "pattern {pattern:?}, input {w:?}");
            }
        }
    }

    #[test]
    fn test_labelling() {
        let g = build_labelling(&named(&[("x", "ab"), ("y", "cd"), ("z", "{a}b")])).unwrap();
        let d = determinize(&g).unwrap();
        println!("{d}");
        assert!(d.is_deterministic());
        assert_eq!(
            d.accepts("ab"),
            Some(vec!["x".to_string(), "z".to_string()])
        );
        assert_eq!(d.accepts("cd"), Some(vec!["y".to_string()]));
        assert_eq!(d.accepts("aab"), Some(vec!["z".to_string()]));
        assert_eq!(d.accepts("zz"), None);
        assert_eq!(d.accepts("a"), None);
    }

    #[test]
    fn test_infinite() {
        let g = build_infinite(&named(&[("r", "b[c]"), ("s", "[a]")])).unwrap();
        let d = determinize(&g).unwrap();
        println!("NFA\n{g}\nDFA\n{d}");
        assert!(d.is_deterministic());
        assert_eq!(d.accepts("bcc"), Some(vec!["r".to_string()]));
        assert_eq!(d.accepts("aaa"), Some(vec!["s".to_string()]));
        assert_eq!(d.accepts("ba"), None);
    }

    #[test]
    fn test_missing_initial_state() {
        assert!(matches!(
            determinize(&Nfa::new()),
            Err(Error::MissingInitialState)
        ));
    }

    // random patterns over {a, b}
    fn arb_pattern() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![Just("a".to_string()), Just("b".to_string())];
        leaf.prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(x, y)| format!("{x}{y}")),
                (inner.clone(), inner.clone()).prop_map(|(x, y)| format!("({x}|{y})")),
                inner.clone().prop_map(|x| format!("{{{x}}}")),
                inner.prop_map(|x| format!("({x})")),
            ]
        })
    }

    proptest! {
        #[test]
        fn determinize_preserves_language(pattern in arb_pattern(), input in "[ab]{0,8}") {
            let n = nfa(&pattern);
            let d = determinize(&n).unwrap();
            prop_assert!(d.is_deterministic());
            prop_assert_eq!(n.accepts(&input), d.accepts(&input));
        }
    }
}
