// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Tokens produced by the [lexer](crate::lexer)
//!
//! A pattern is lexed into a list of tokens. Composite tokens (groups,
//! disjunctions, iterations) contain token lists themselves, so the
//! lexer output is a tree.
//!
//! After lexing, a token list contains only [Literal](Token::Literal),
//! [Group](Token::Group), [Disjunction](Token::Disjunction),
//! [Repeat01](Token::Repeat01), and [RepeatForever](Token::RepeatForever).
//! A [Sequence](Token::Sequence) is an intermediate token that the lexer
//! always resolves.
//!

use std::fmt::Display;

///
/// Regular expression fragments
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    /// A single character
    Literal(char),
    /// Raw text between brackets, not lexed yet
    Sequence(String),
    /// Parenthesized sub-pattern `( ... )`, matched once
    Group(Vec<Token>),
    /// Alternatives `a|b|c`. The order of branches is preserved.
    Disjunction(Vec<Vec<Token>>),
    /// Iteration `{ ... }`: zero or more repetitions
    Repeat01(Vec<Token>),
    /// Strong iteration `[ ... ]`: the sub-pattern loops forever through its entry state
    RepeatForever(Vec<Token>),
}

impl Token {
    /// Check whether this token is fully lexed
    ///
    /// This is true if neither this token nor its children are sequences.
    pub fn is_resolved(&self) -> bool {
        match self {
            Token::Literal(_) => true,
            Token::Sequence(_) => false,
            Token::Group(v) | Token::Repeat01(v) | Token::RepeatForever(v) => {
                v.iter().all(Token::is_resolved)
            }
            Token::Disjunction(branches) => {
                branches.iter().all(|b| b.iter().all(Token::is_resolved))
            }
        }
    }

    /// Check whether this token or one of its children is a strong iteration
    pub fn has_strong_iteration(&self) -> bool {
        match self {
            Token::Literal(_) | Token::Sequence(_) => false,
            Token::RepeatForever(_) => true,
            Token::Group(v) | Token::Repeat01(v) => v.iter().any(Token::has_strong_iteration),
            Token::Disjunction(branches) => branches
                .iter()
                .any(|b| b.iter().any(Token::has_strong_iteration)),
        }
    }
}

fn fmt_list(f: &mut std::fmt::Formatter<'_>, list: &[Token]) -> std::fmt::Result {
    write!(f, "[")?;
    for (i, t) in list.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        t.fmt(f)?;
    }
    write!(f, "]")
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Literal(c) => write!(f, "Literal({c})"),
            Token::Sequence(s) => write!(f, "Sequence({s:?})"),
            Token::Group(v) => {
                write!(f, "Group")?;
                fmt_list(f, v)
            }
            Token::Disjunction(branches) => {
                write!(f, "Disjunction(")?;
                for (i, b) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    fmt_list(f, b)?;
                }
                write!(f, ")")
            }
            Token::Repeat01(v) => {
                write!(f, "Repeat01")?;
                fmt_list(f, v)
            }
            Token::RepeatForever(v) => {
                write!(f, "RepeatForever")?;
                fmt_list(f, v)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_resolved() {
        let a = Token::Literal('a');
        let seq = Token::Sequence("bc".to_string());
        assert!(a.is_resolved());
        assert!(!seq.is_resolved());
        assert!(Token::Group(vec![a.clone()]).is_resolved());
        assert!(!Token::Repeat01(vec![a.clone(), seq.clone()]).is_resolved());
        assert!(!Token::Disjunction(vec![vec![a.clone()], vec![seq]]).is_resolved());
    }

    #[test]
    fn test_strong_iteration() {
        let a = Token::Literal('a');
        let forever = Token::RepeatForever(vec![a.clone()]);
        assert!(!a.has_strong_iteration());
        assert!(forever.has_strong_iteration());
        assert!(Token::Disjunction(vec![vec![], vec![Token::Group(vec![forever])]])
            .has_strong_iteration());
    }

    #[test]
    fn test_display() {
        let t = Token::Disjunction(vec![
            vec![Token::Literal('a'), Token::Literal('b')],
            vec![Token::Repeat01(vec![Token::Literal('c')])],
        ]);
        println!("{t}");
        assert_eq!(
            t.to_string(),
            "Disjunction([Literal(a), Literal(b)] | [Repeat01[Literal(c)]])"
        );
    }
}
