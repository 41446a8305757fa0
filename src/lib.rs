pub mod automaton;
pub mod bench;
pub mod convert;
pub mod emptiness;
pub mod finite;
pub mod generator;

pub use automaton::{Automaton, InverseAutomaton, StateId, parse_automaton};
pub use convert::{Conversion, to_simple};
pub use emptiness::Algorithm;
pub use finite::{Dfa, Operator, parse_dfa, product};
