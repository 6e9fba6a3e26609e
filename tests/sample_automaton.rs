use enfa::{
    accepts, epsilon_closure, minimize, symbols_from_chars, to_dfa, AutomatonEditor,
    AutomatonError, StateSet, Symbol,
};
use proptest::{collection, prelude::*};

const SAMPLE: &str = include_str!("../demos/sample-enfa.json");

fn build_sample() -> AutomatonEditor {
    let mut editor = AutomatonEditor::new();

    assert_eq!(editor.add_state(false).unwrap(), "q2");
    assert_eq!(editor.add_state(false).unwrap(), "q3");
    assert_eq!(editor.add_state(true).unwrap(), "q4");

    for (from, to, symbol) in [
        (1, 2, "0"),
        (1, 3, "0"),
        (1, 4, "0"),
        (1, 4, "1"),
        (1, 4, ""),
        (2, 2, "1"),
        (2, 3, "1"),
        (2, 4, "1"),
        (4, 2, "1"),
        (4, 1, "1"),
    ] {
        editor.add_transition(from, to, Symbol::token(symbol)).unwrap();
    }

    editor
}

#[test]
fn test_built_sample_matches_imported_sample() {
    let built = build_sample();
    let imported = AutomatonEditor::import_from_text(SAMPLE).unwrap();

    assert_eq!(built.automaton(), imported.automaton());

    // Building merges symbols per node pair, importing draws one edge per transition.
    assert_eq!(built.graph().edges().len(), 8);
    assert_eq!(imported.graph().edges().len(), 10);
    assert_eq!(built.graph().edge(1, 4).unwrap().label(), "0, 1, ε");
}

#[test]
fn test_sample_acceptance() {
    let editor = build_sample();

    for accepted in ["", "0", "1", "10", "11", "101", "0111"] {
        assert!(
            editor.accepts(&symbols_from_chars(accepted)),
            "{:?} should be accepted",
            accepted
        );
    }
    for rejected in ["00", "100", "3", "E"] {
        assert!(
            !editor.accepts(&symbols_from_chars(rejected)),
            "{:?} should be rejected",
            rejected
        );
    }
}

#[test]
fn test_sample_export_round_trip() {
    let editor = build_sample();
    let spec = editor.export();

    assert_eq!(spec.q, vec!["q0", "q2", "q3", "q4"]);
    assert_eq!(spec.initial_state, "q0");
    assert_eq!(spec.f, vec!["q4"]);

    let json = editor.export_json().unwrap();
    let reimported = AutomatonEditor::import_from_text(&json).unwrap();
    assert_eq!(reimported.automaton(), editor.automaton());
}

#[test]
fn test_sample_conversions_preserve_language() {
    let editor = build_sample();
    let dfa = to_dfa(editor.automaton()).unwrap();
    let minimal = minimize(editor.automaton()).unwrap();

    for input in ["", "0", "1", "00", "01", "10", "11", "011", "110", "1111"] {
        let symbols = symbols_from_chars(input);
        let expected = editor.accepts(&symbols);

        assert_eq!(accepts(&dfa, &symbols), expected, "dfa on {:?}", input);
        assert_eq!(accepts(&minimal, &symbols), expected, "minimal on {:?}", input);
    }
}

#[test]
fn test_rejected_import_is_reported() {
    let mut editor = build_sample();

    let result = editor.import_text(
        r#"{"q": ["q0"], "sigma": ["0"], "delta": {"q0": {"0": "q9"}},
            "initial_state": "q0", "f": []}"#,
    );

    assert!(matches!(result, Err(AutomatonError::ParseError(_))));
    assert_eq!(editor, build_sample());
}

fn arb_symbol() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        Just(Symbol::Epsilon),
        Just(Symbol::token("0")),
        Just(Symbol::token("1")),
        Just(Symbol::token("a")),
    ]
}

/// An editor with up to 6 states and random transitions between them.
fn arb_editor() -> impl Strategy<Value = AutomatonEditor> {
    (
        collection::vec(any::<bool>(), 0..6),
        collection::vec((0u32..8, 0u32..8, arb_symbol()), 0..16),
    )
        .prop_map(|(accepting, transitions)| {
            let mut editor = AutomatonEditor::new();
            for accepting in accepting {
                editor.add_state(accepting).unwrap();
            }

            let count = editor.graph().nodes().len() as u32;
            for (from, to, symbol) in transitions {
                editor
                    .add_transition(from % count + 1, to % count + 1, symbol)
                    .unwrap();
            }

            editor
        })
}

fn arb_input() -> impl Strategy<Value = Vec<Symbol>> {
    collection::vec(
        prop_oneof![
            Just(Symbol::token("0")),
            Just(Symbol::token("1")),
            Just(Symbol::token("a")),
        ],
        0..8,
    )
}

proptest! {
    #[test]
    fn export_then_import_is_identity(editor in arb_editor()) {
        let json = editor.export_json().unwrap();
        let imported = AutomatonEditor::import_from_text(&json).unwrap();

        prop_assert_eq!(imported.automaton(), editor.automaton());
    }

    #[test]
    fn epsilon_closure_is_a_fixed_point(editor in arb_editor(), picks in collection::vec(any::<usize>(), 0..4)) {
        let automaton = editor.automaton();
        let states: Vec<&str> = automaton.states().iter().map(String::as_str).collect();
        let seed: StateSet = picks.iter().map(|pick| states[pick % states.len()]).collect();

        let closure = epsilon_closure(automaton, &seed);

        prop_assert!(seed.is_subset(&closure));
        prop_assert_eq!(epsilon_closure(automaton, &closure), closure);
    }

    #[test]
    fn every_transition_is_drawn(editor in arb_editor()) {
        for (source, symbol, destination) in editor.automaton().transitions() {
            let from = editor.id_of(source).unwrap();
            let to = editor.id_of(destination).unwrap();
            let edge = editor.graph().edge(from, to);

            prop_assert!(edge.is_some());
            prop_assert!(edge.unwrap().symbols.contains(symbol));
        }
        prop_assert!(editor.graph().edges().len() <= editor.automaton().transition_count());
    }

    #[test]
    fn repeated_transition_is_a_no_op(editor in arb_editor(), from in 0u32..8, to in 0u32..8, symbol in arb_symbol()) {
        let count = editor.graph().nodes().len() as u32;
        let (from, to) = (from % count + 1, to % count + 1);

        let mut once = editor.clone();
        once.add_transition(from, to, symbol.clone()).unwrap();
        let mut twice = once.clone();
        twice.add_transition(from, to, symbol).unwrap();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn conversions_preserve_language(editor in arb_editor(), input in arb_input()) {
        let automaton = editor.automaton();
        let expected = accepts(automaton, &input);

        prop_assert_eq!(accepts(&to_dfa(automaton).unwrap(), &input), expected);
        prop_assert_eq!(accepts(&minimize(automaton).unwrap(), &input), expected);
    }

    #[test]
    fn minimize_is_idempotent(editor in arb_editor()) {
        let minimal = minimize(editor.automaton()).unwrap();
        let again = minimize(&minimal).unwrap();

        prop_assert_eq!(again.states().len(), minimal.states().len());
    }

    #[test]
    fn minimize_never_exceeds_subset_construction(editor in arb_editor()) {
        let dfa = to_dfa(editor.automaton()).unwrap();
        let minimal = minimize(editor.automaton()).unwrap();

        prop_assert!(minimal.states().len() <= dfa.states().len());
    }
}
