//! Textual encoding of deterministic finite automata.
//!
//! ```text
//! 2          # alphabet size
//! 1 0        # accepting states: count, then ids (the count may be 0)
//! 0 1 0      # edges, one `from to symbol` triple per line, until end of input
//! 0 0 1
//! 1 0 0
//! 1 1 1
//! ```
//!
//! This is the paired transition form of the Büchi encoding with a third
//! label field. The state count is inferred as one more than the largest id
//! mentioned; state 0 is the initial state.

use super::{Dfa, Symbol};
use crate::automaton::StateId;
use crate::automaton::text::TokenReader;
use anyhow::{Result, anyhow};
use std::fmt;

pub fn parse_dfa(input: &str) -> Result<Dfa> {
    let mut tokens = TokenReader::new(input);

    let alphabet = tokens.next_number("alphabet size")?;
    let accepting_count = tokens.next_number("accepting state count")?;
    let mut accepting = Vec::new();
    for _ in 0..accepting_count {
        accepting.push(tokens.next_number("accepting state")?);
    }

    let mut edges: Vec<(StateId, StateId, Symbol)> = Vec::new();
    while let Some(from) = tokens.try_next_number()? {
        let to = tokens
            .try_next_number()?
            .ok_or_else(|| anyhow!("edge from state {from} has no target state"))?;
        let symbol = tokens
            .try_next_number()?
            .ok_or_else(|| anyhow!("edge {from} -> {to} has no symbol label"))?;
        edges.push((from, to, symbol));
    }

    let max_id = edges
        .iter()
        .flat_map(|&(from, to, _)| [from, to])
        .chain(accepting.iter().copied())
        .max()
        .unwrap_or(Dfa::INITIAL_STATE);
    let state_count = max_id
        .checked_add(1)
        .ok_or_else(|| anyhow!("state id {max_id} is too large"))?;

    Dfa::from_edges(state_count, alphabet, accepting, edges)
}

impl Dfa {
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl std::str::FromStr for Dfa {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_dfa(s)
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.alphabet_size())?;
        write!(f, "{}", self.accepting_states().len())?;
        for state in self.accepting_states() {
            write!(f, " {state}")?;
        }
        writeln!(f)?;
        for (from, to, symbol) in self.edges() {
            writeln!(f, "{from} {to} {symbol}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVEN_ZEROS: &str = "2\n1 0 # even number of zeros\n0 1 0\n0 0 1\n1 0 0\n1 1 1\n";

    #[test]
    fn test_parse() {
        let dfa = parse_dfa(EVEN_ZEROS).unwrap();
        assert_eq!(dfa, Dfa::new(2, 2, [0], vec![1, 0, 0, 1]).unwrap());
    }

    #[test]
    fn test_edge_order_is_free() {
        let shuffled = parse_dfa("2 1 0\n1 1 1\n0 0 1\n1 0 0\n0 1 0").unwrap();
        assert_eq!(shuffled, parse_dfa(EVEN_ZEROS).unwrap());
    }

    #[test]
    fn test_no_accepting_states() {
        let dfa = parse_dfa("1\n0\n0 0 0\n").unwrap();
        assert!(dfa.accepting_states().is_empty());
        assert!(dfa.is_language_empty());
    }

    #[test]
    fn test_serialize_layout() {
        let dfa = Dfa::new(2, 1, [1, 0], vec![1, 1]).unwrap();
        assert_eq!(dfa.to_text(), "1\n2 0 1\n0 1 0\n1 1 0\n");
    }

    #[test]
    fn test_round_trip() {
        let dfa = Dfa::new(3, 2, [2], vec![1, 0, 2, 0, 2, 2]).unwrap();
        let parsed: Dfa = dfa.to_text().parse().unwrap();
        assert_eq!(parsed, dfa);
    }

    #[test]
    fn test_rejects_missing_label() {
        let err = parse_dfa("1\n0\n0 0\n").unwrap_err();
        assert!(err.to_string().contains("no symbol label"));
    }

    #[test]
    fn test_rejects_label_outside_alphabet() {
        let err = parse_dfa("1\n0\n0 0 0\n0 0 1\n").unwrap_err();
        assert!(err.to_string().contains("outside the alphabet"));
    }

    #[test]
    fn test_rejects_incomplete_table() {
        let err = parse_dfa("2\n0\n0 0 0\n0 0 0\n").unwrap_err();
        assert!(err.to_string().contains("no transition on symbol 1"));
    }

    #[test]
    fn test_rejects_empty_alphabet() {
        assert!(parse_dfa("0\n0\n").is_err());
    }
}
