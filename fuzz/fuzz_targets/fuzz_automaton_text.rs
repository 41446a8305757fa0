#![no_main]

use libfuzzer_sys::fuzz_target;
use omegacheck::{Algorithm, parse_automaton, to_simple};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(automaton) = parse_automaton(input) else {
        return;
    };

    // Anything that parses must serialize back to the same structure.
    let reparsed = parse_automaton(&automaton.to_text()).expect("serialized automaton must parse");
    assert!(reparsed.same_structure(&automaton));

    // Keep the engines on small inputs so a single case stays fast.
    if automaton.state_count() <= 64 {
        let expected = Algorithm::TwoStack.is_empty(&automaton).unwrap();
        for algorithm in [Algorithm::EmersonLei, Algorithm::ModifiedEmersonLei] {
            assert_eq!(algorithm.is_empty(&automaton).unwrap(), expected);
        }
        if let Some(simple) = to_simple(&automaton).unwrap().into_option() {
            assert_eq!(Algorithm::NestedDfs.is_empty(&simple).unwrap(), expected);
        }
    }
});
