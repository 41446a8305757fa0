#![no_main]

use libfuzzer_sys::fuzz_target;
use omegacheck::{Operator, parse_dfa, product};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(dfa) = parse_dfa(input) else {
        return;
    };

    // A complete table mentions every state, so the text round trip is exact.
    let reparsed = parse_dfa(&dfa.to_text()).expect("serialized automaton must parse");
    assert_eq!(reparsed, dfa);

    if dfa.state_count() <= 64 {
        let difference = product(&dfa, &dfa, Operator::Difference).expect("same alphabet");
        assert!(difference.is_language_empty());
        let union = product(&dfa, &dfa, Operator::Union).expect("same alphabet");
        assert_eq!(union.is_language_empty(), dfa.is_language_empty());
    }
});
