//! Textual encoding of Büchi automata.
//!
//! ```text
//! 2          # number of acceptance sets
//! 1 0        # set 0: one state, {0}
//! 2 1 2      # set 1: two states, {1, 2}
//! 0 1        # edges, one `from to` pair per line, until end of input
//! 1 2
//! 2 0
//! ```
//!
//! Tokens are whitespace separated, so line breaks are not significant.
//! The state count is inferred as one more than the largest id mentioned.

use super::{Automaton, StateId};
use anyhow::{Result, anyhow, bail};
use std::fmt;

pub fn parse_automaton(input: &str) -> Result<Automaton> {
    let mut tokens = TokenReader::new(input);

    let set_count = tokens.next_number("acceptance set count")?;
    if set_count == 0 {
        bail!("automaton must have at least one acceptance set");
    }

    let mut accepting_sets = Vec::new();
    for index in 0..set_count {
        let size = tokens.next_number("acceptance set size")?;
        if size == 0 {
            bail!(
                "acceptance set {index} is declared empty (line {})",
                tokens.line()
            );
        }
        let mut set = Vec::new();
        for _ in 0..size {
            set.push(tokens.next_number("accepting state")?);
        }
        accepting_sets.push(set);
    }

    let mut edges = Vec::new();
    while let Some(from) = tokens.try_next_number()? {
        let to = tokens
            .try_next_number()?
            .ok_or_else(|| anyhow!("edge from state {from} has no target state"))?;
        edges.push((from, to));
    }

    Automaton::with_inferred_states(edges, accepting_sets)
}

impl Automaton {
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl std::str::FromStr for Automaton {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_automaton(s)
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.acceptance_count())?;
        for set in self.accepting_sets() {
            write!(f, "{}", set.len())?;
            for state in set {
                write!(f, " {state}")?;
            }
            writeln!(f)?;
        }
        for (from, to) in self.edges() {
            writeln!(f, "{from} {to}")?;
        }
        Ok(())
    }
}

/// Whitespace token cursor that skips `#` comments and remembers line numbers.
pub(crate) struct TokenReader<'a> {
    tokens: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> TokenReader<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        let tokens = src
            .lines()
            .enumerate()
            .flat_map(|(idx, line)| {
                strip_comment(line)
                    .split_whitespace()
                    .map(move |token| (idx + 1, token))
            })
            .collect();
        Self { tokens, pos: 0 }
    }

    pub(crate) fn line(&self) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map_or(0, |(line, _)| *line)
    }

    pub(crate) fn try_next_number(&mut self) -> Result<Option<StateId>> {
        let Some(&(line, token)) = self.tokens.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;
        token
            .parse::<StateId>()
            .map(Some)
            .map_err(|_| anyhow!("expected a non-negative integer on line {line}, got '{token}'"))
    }

    pub(crate) fn next_number(&mut self, what: &str) -> Result<StateId> {
        self.try_next_number()?
            .ok_or_else(|| anyhow!("unexpected end of input while reading {what}"))
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_parse_generalized() {
        let automaton = parse_automaton(
            "2\n1 0\n2 1 2 # second set\n0 1\n1 2\n2 0\n# trailing comment\n",
        )
        .unwrap();

        assert_eq!(automaton.state_count(), 3);
        assert_eq!(automaton.acceptance_count(), 2);
        assert_eq!(automaton.accepting_sets()[1], BTreeSet::from([1, 2]));
        assert_eq!(
            automaton.edges().collect::<Vec<_>>(),
            vec![(0, 1), (1, 2), (2, 0)]
        );
    }

    #[test]
    fn test_line_breaks_are_not_significant() {
        let a = parse_automaton("1 1 1 0 1 1 0").unwrap();
        let b = parse_automaton("1\n1 1\n0 1\n1 0\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_accepting_state_extends_state_count() {
        let automaton = parse_automaton("1\n1 5\n0 0\n").unwrap();
        assert_eq!(automaton.state_count(), 6);
    }

    #[test]
    fn test_rejects_zero_sets() {
        let err = parse_automaton("0\n0 1\n").unwrap_err();
        assert!(err.to_string().contains("at least one acceptance set"));
    }

    #[test]
    fn test_rejects_empty_set() {
        let err = parse_automaton("2\n1 0\n0\n0 1\n").unwrap_err();
        assert!(err.to_string().contains("declared empty"));
    }

    #[test]
    fn test_rejects_dangling_edge() {
        let err = parse_automaton("1\n1 0\n0 1\n1\n").unwrap_err();
        assert!(err.to_string().contains("no target state"));
    }

    #[test]
    fn test_rejects_truncated_acceptance_block() {
        let err = parse_automaton("1\n3 0 1").unwrap_err();
        assert!(err.to_string().contains("unexpected end of input"));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = parse_automaton("1\n1 0\n0 -1\n").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_serialize_layout() {
        let automaton =
            Automaton::new(3, [(2, 0), (0, 1), (1, 2)], vec![vec![1], vec![2, 0]]).unwrap();
        assert_eq!(automaton.to_text(), "2\n1 1\n2 0 2\n0 1\n1 2\n2 0\n");
    }

    #[test]
    fn test_round_trip() {
        let automaton = Automaton::new(
            4,
            [(0, 1), (1, 0), (1, 3), (3, 2), (2, 2)],
            vec![vec![0, 3], vec![2]],
        )
        .unwrap();
        let parsed: Automaton = automaton.to_text().parse().unwrap();
        assert_eq!(parsed, automaton);
    }

    #[test]
    fn test_round_trip_drops_trailing_isolated_states() {
        // State 3 has no edge and is in no set, so the text cannot mention it.
        let automaton = Automaton::new(4, [(0, 1), (1, 0)], vec![vec![1]]).unwrap();
        let parsed = parse_automaton(&automaton.to_text()).unwrap();
        assert_eq!(parsed.state_count(), 2);
        assert!(parsed.same_structure(&automaton));
    }
}
