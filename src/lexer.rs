// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Lexer: convert a pattern to a list of [tokens](crate::tokens::Token)
//!
//! The pattern syntax is
//! - `a` any character except `(`, `)`, `{`, `}`, `[`, `]`, `|` matches itself
//! - `( ... )` is a group
//! - `{ ... }` is an iteration (zero or more repetitions)
//! - `[ ... ]` is a strong iteration (loop forever)
//! - `a|b` is a disjunction. The disjunction operator binds the characters
//!   between brackets only: in `x(y)a|bz`, the alternatives are `a` and `bz`.
//!
//! Lexing is done in two passes. The first pass splits the pattern into
//! top-level bracketed segments and plain runs of characters. At the top level,
//! only one kind of bracket is open at a time: once a `(` is open, the
//! characters `{`, `}`, `[`, `]` are ordinary content until the matching `)`,
//! and the content is lexed again recursively. The second pass resolves plain
//! runs into literals or disjunctions.
//!

use crate::{errors::Error, tokens::Token};

// Segment of a pattern found by the first pass.
// Bracketed segments keep their inner text and its offset in the full pattern.
#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Plain(&'a str),
    Group(&'a str, usize),
    Iteration(&'a str, usize),
    StrongIteration(&'a str, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bracket {
    Paren,
    Curly,
    Square,
}

impl Bracket {
    fn classify(c: char) -> Option<(Bracket, bool)> {
        match c {
            '(' => Some((Bracket::Paren, true)),
            ')' => Some((Bracket::Paren, false)),
            '{' => Some((Bracket::Curly, true)),
            '}' => Some((Bracket::Curly, false)),
            '[' => Some((Bracket::Square, true)),
            ']' => Some((Bracket::Square, false)),
            _ => None,
        }
    }

    fn open_char(self) -> char {
        match self {
            Bracket::Paren => '(',
            Bracket::Curly => '{',
            Bracket::Square => '[',
        }
    }
}

// Nesting depth of the three bracket kinds
#[derive(Debug, Default)]
struct Depth {
    paren: usize,
    curly: usize,
    square: usize,
}

impl Depth {
    fn get_mut(&mut self, b: Bracket) -> &mut usize {
        match b {
            Bracket::Paren => &mut self.paren,
            Bracket::Curly => &mut self.curly,
            Bracket::Square => &mut self.square,
        }
    }

    // a bracket of kind b is a delimiter only if no other kind is open
    fn is_delimiter(&self, b: Bracket) -> bool {
        match b {
            Bracket::Paren => self.curly == 0 && self.square == 0,
            Bracket::Curly => self.paren == 0 && self.square == 0,
            Bracket::Square => self.paren == 0 && self.curly == 0,
        }
    }

    fn is_top_level(&self) -> bool {
        self.paren == 0 && self.curly == 0 && self.square == 0
    }

    fn still_open(&self) -> Option<Bracket> {
        if self.paren > 0 {
            Some(Bracket::Paren)
        } else if self.curly > 0 {
            Some(Bracket::Curly)
        } else if self.square > 0 {
            Some(Bracket::Square)
        } else {
            None
        }
    }
}

//
// First pass: split the pattern into segments
// - base is the offset of pattern in the full pattern (for error reporting)
//
fn split_segments(pattern: &str, base: usize) -> Result<Vec<Segment<'_>>, Error> {
    let mut segments = Vec::new();
    let mut depth = Depth::default();
    // start of the current segment
    let mut start = 0;

    for (i, c) in pattern.char_indices() {
        let (kind, is_open) = match Bracket::classify(c) {
            Some(x) if depth.is_delimiter(x.0) => x,
            _ => continue,
        };
        if is_open {
            if depth.is_top_level() {
                if start < i {
                    segments.push(Segment::Plain(&pattern[start..i]));
                }
                start = i;
            }
            *depth.get_mut(kind) += 1;
        } else {
            let d = depth.get_mut(kind);
            if *d == 0 {
                return Err(Error::MalformedPattern {
                    bracket: c,
                    offset: base + i,
                });
            }
            *d -= 1;
            if *d == 0 {
                let inner = &pattern[start + 1..i];
                let offset = base + start + 1;
                segments.push(match kind {
                    Bracket::Paren => Segment::Group(inner, offset),
                    Bracket::Curly => Segment::Iteration(inner, offset),
                    Bracket::Square => Segment::StrongIteration(inner, offset),
                });
                start = i + 1;
            }
        }
    }

    if let Some(kind) = depth.still_open() {
        return Err(Error::MalformedPattern {
            bracket: kind.open_char(),
            offset: base + pattern.len(),
        });
    }
    if start < pattern.len() {
        segments.push(Segment::Plain(&pattern[start..]));
    }
    Ok(segments)
}

fn literals(s: &str) -> Vec<Token> {
    s.chars().map(Token::Literal).collect()
}

///
/// Resolve a sequence token
///
/// - a sequence that contains `|` is converted to a disjunction
///   (one branch per `|`-separated part, each part converted to literals)
/// - any other sequence is converted to a list of literals
///
/// Other tokens are returned unchanged.
///
pub fn resolve(token: Token) -> Vec<Token> {
    match token {
        Token::Sequence(s) if s.contains('|') => {
            vec![Token::Disjunction(s.split('|').map(literals).collect())]
        }
        Token::Sequence(s) => literals(&s),
        t => vec![t],
    }
}

/// Maximal number of nested brackets in a pattern
pub const MAX_NESTING: usize = 256;

// level is the number of brackets enclosing pattern
fn tokenize_at(pattern: &str, base: usize, level: usize) -> Result<Vec<Token>, Error> {
    let mut result = Vec::new();
    for segment in split_segments(pattern, base)? {
        // resolve then flatten into result
        let (inner, offset) = match segment {
            Segment::Plain(s) => {
                result.extend(resolve(Token::Sequence(s.to_string())));
                continue;
            }
            Segment::Group(s, offset)
            | Segment::Iteration(s, offset)
            | Segment::StrongIteration(s, offset) => (s, offset),
        };
        if level >= MAX_NESTING {
            // offset - 1 is the opening bracket
            return Err(Error::NestingTooDeep { offset: offset - 1 });
        }
        let tokens = tokenize_at(inner, offset, level + 1)?;
        result.push(match segment {
            Segment::Iteration(..) => Token::Repeat01(tokens),
            Segment::StrongIteration(..) => Token::RepeatForever(tokens),
            _ => Token::Group(tokens),
        });
    }
    Ok(result)
}

///
/// Convert a pattern to a list of tokens
///
/// # Errors
///
/// Return [Error::MalformedPattern] if brackets are not balanced in the pattern,
/// or [Error::NestingTooDeep] if more than [MAX_NESTING] brackets are nested.
///
/// # Example
///
/// ```
/// use regex_fsm::{lexer::tokenize, tokens::Token};
///
/// let tokens = tokenize("a{b}").unwrap();
/// assert_eq!(
///     tokens,
///     vec![Token::Literal('a'), Token::Repeat01(vec![Token::Literal('b')])]
/// );
/// ```
pub fn tokenize(pattern: &str) -> Result<Vec<Token>, Error> {
    tokenize_at(pattern, 0, 0)
}

#[cfg(test)]
mod test {
    use super::*;
    use Token::*;

    fn lit(s: &str) -> Vec<Token> {
        s.chars().map(Literal).collect()
    }

    #[test]
    fn test_literals() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("abc").unwrap(), lit("abc"));
    }

    #[test]
    fn test_disjunction() {
        assert_eq!(
            tokenize("ab|c").unwrap(),
            vec![Disjunction(vec![lit("ab"), lit("c")])]
        );
        assert_eq!(
            tokenize("a|").unwrap(),
            vec![Disjunction(vec![lit("a"), vec![]])]
        );
        // the disjunction only covers the plain run it appears in
        assert_eq!(
            tokenize("x(y)a|bz").unwrap(),
            vec![
                Literal('x'),
                Group(lit("y")),
                Disjunction(vec![lit("a"), lit("bz")])
            ]
        );
    }

    #[test]
    fn test_groups() {
        let tokens = tokenize("(ab|c){d}").unwrap();
        for t in &tokens {
            println!("{t}");
        }
        assert_eq!(
            tokens,
            vec![
                Group(vec![Disjunction(vec![lit("ab"), lit("c")])]),
                Repeat01(lit("d")),
            ]
        );
        assert_eq!(
            tokenize("((a)b)").unwrap(),
            vec![Group(vec![Group(lit("a")), Literal('b')])]
        );
        assert_eq!(
            tokenize("x[y]").unwrap(),
            vec![Literal('x'), RepeatForever(lit("y"))]
        );
    }

    #[test]
    fn test_nested_kinds() {
        // inside a group, other brackets are content, then lexed again
        assert_eq!(
            tokenize("({a}[b])").unwrap(),
            vec![Group(vec![Repeat01(lit("a")), RepeatForever(lit("b"))])]
        );
        assert_eq!(
            tokenize("{(a)b}").unwrap(),
            vec![Repeat01(vec![Group(lit("a")), Literal('b')])]
        );
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            tokenize("(ab"),
            Err(Error::MalformedPattern {
                bracket: '(',
                offset: 3
            })
        );
        assert_eq!(
            tokenize("ab)"),
            Err(Error::MalformedPattern {
                bracket: ')',
                offset: 2
            })
        );
        assert_eq!(
            tokenize("{a"),
            Err(Error::MalformedPattern {
                bracket: '{',
                offset: 2
            })
        );
        assert_eq!(
            tokenize("[a"),
            Err(Error::MalformedPattern {
                bracket: '[',
                offset: 2
            })
        );
        assert_eq!(
            tokenize("a]"),
            Err(Error::MalformedPattern {
                bracket: ']',
                offset: 1
            })
        );
        // errors in nested groups report offsets in the full pattern
        assert_eq!(
            tokenize("x({a)"),
            Err(Error::MalformedPattern {
                bracket: '{',
                offset: 4
            })
        );
    }

    // n nested groups around a
    fn nested(n: usize) -> String {
        format!("{}a{}", "(".repeat(n), ")".repeat(n))
    }

    #[test]
    fn test_nesting_limit() {
        let mut tokens = tokenize(&nested(MAX_NESTING)).unwrap();
        let mut depth = 0;
        while let [Group(inner)] = tokens.as_slice() {
            tokens = inner.clone();
            depth += 1;
        }
        assert_eq!(depth, MAX_NESTING);
        assert_eq!(tokens, lit("a"));

        assert_eq!(
            tokenize(&nested(MAX_NESTING + 1)),
            Err(Error::NestingTooDeep {
                offset: MAX_NESTING
            })
        );
        assert_eq!(
            tokenize(&nested(2000)),
            Err(Error::NestingTooDeep {
                offset: MAX_NESTING
            })
        );

        // mixed brackets count the same, the offset points at the first bracket too deep
        let p = format!("x{}b{}", "{[(".repeat(100), ")]}".repeat(100));
        let e = tokenize(&p).unwrap_err();
        println!("{e}");
        assert_eq!(
            e,
            Error::NestingTooDeep {
                offset: 1 + MAX_NESTING
            }
        );
        assert_eq!(&p[1 + MAX_NESTING..2 + MAX_NESTING], "[");
    }
}
