//! This module converts automata between equivalent forms: epsilon-NFA to DFA by subset
//! construction, and DFA minimization by partition refinement.
//!
//! Results are partial DFAs: the empty subset is never materialised, so a missing
//! transition means rejection. States are renamed `q0`, `q1`, ... in breadth-first
//! discovery order, the initial state always being `q0`.

use crate::automaton::{Automaton, TransitionMap};
use crate::engine::{epsilon_closure, move_on_symbol, StateSet};
use crate::types::{AutomatonError, Symbol, STATE_PREFIX};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use std::collections::{HashMap, VecDeque};

/// A deterministic automaton over dense state indices, `0` being the initial state.
struct Table {
    symbols: Vec<Symbol>,
    /// `next[state][symbol]` is the destination, if any.
    next: Vec<Vec<Option<usize>>>,
    accepting: Vec<bool>,
}

impl Table {
    fn into_automaton(self) -> Result<Automaton, AutomatonError> {
        let name = |index: usize| format!("{}{}", STATE_PREFIX, index);

        let states: IndexSet<String> = (0..self.next.len()).map(name).collect();
        let accepting: IndexSet<String> = self
            .accepting
            .iter()
            .enumerate()
            .filter(|(_, accepting)| **accepting)
            .map(|(index, _)| name(index))
            .collect();

        let delta: IndexMap<String, TransitionMap> = self
            .next
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let map: TransitionMap = row
                    .iter()
                    .zip(&self.symbols)
                    .filter_map(|(destination, symbol)| {
                        destination
                            .map(|destination| (symbol.clone(), IndexSet::from([name(destination)])))
                    })
                    .collect();
                (name(index), map)
            })
            .collect();

        Automaton::from_parts(
            states,
            self.symbols.into_iter().collect(),
            delta,
            name(0),
            accepting,
        )
    }
}

/// Input symbols of an automaton, epsilon excluded, in alphabet order.
fn input_symbols(automaton: &Automaton) -> Vec<Symbol> {
    automaton
        .alphabet()
        .iter()
        .filter(|symbol| !symbol.is_epsilon())
        .cloned()
        .collect()
}

fn subset_table(automaton: &Automaton) -> Table {
    let symbols = input_symbols(automaton);

    let start = epsilon_closure(
        automaton,
        &StateSet::from([automaton.initial_state()]),
    );

    let mut mapping: IndexMap<StateSet, usize> = IndexMap::new();
    let mut worklist = VecDeque::new();
    let mut next = Vec::new();

    mapping.insert(start.clone(), 0);
    worklist.push_back(start);

    while let Some(current) = worklist.pop_front() {
        let mut row = Vec::with_capacity(symbols.len());

        for symbol in &symbols {
            let reached = move_on_symbol(automaton, &current, symbol);
            if reached.is_empty() {
                row.push(None);
                continue;
            }

            let index = match mapping.get(&reached) {
                Some(&existing) => existing,
                None => {
                    let index = mapping.len();
                    mapping.insert(reached.clone(), index);
                    worklist.push_back(reached);
                    index
                }
            };
            row.push(Some(index));
        }

        next.push(row);
    }

    let accepting = mapping
        .keys()
        .map(|subset| subset.iter().any(|state| automaton.is_accepting(state)))
        .collect();

    Table {
        symbols,
        next,
        accepting,
    }
}

/// Converts an automaton into an equivalent deterministic one.
///
/// Each resulting state stands for the epsilon-closed set of original states the automaton
/// may be in. Only subsets reachable from the initial state are created.
pub fn to_dfa(automaton: &Automaton) -> Result<Automaton, AutomatonError> {
    let table = subset_table(automaton);

    debug!(
        "Subset construction produced {} states from {}",
        table.next.len(),
        automaton.states().len()
    );

    table.into_automaton()
}

/// Converts an automaton into the minimal equivalent deterministic one.
///
/// The automaton is determinised first. Transitions into states that cannot reach an
/// accepting state are removed, so such states behave like the implicit rejecting sink of a
/// missing transition. Equivalent states are then merged by iterated partition refinement.
pub fn minimize(automaton: &Automaton) -> Result<Automaton, AutomatonError> {
    let mut table = subset_table(automaton);
    let state_count = table.next.len();

    let live = live_states(&table.next, &table.accepting);
    for row in table.next.iter_mut() {
        for destination in row.iter_mut() {
            if matches!(destination, Some(d) if !live[*d]) {
                *destination = None;
            }
        }
    }

    let classes = refine(&table);
    let class_count = classes.iter().max().map_or(0, |max| max + 1);

    // One representative per class; all members agree on every class-level transition.
    let mut representative = vec![usize::MAX; class_count];
    for (state, &class) in classes.iter().enumerate() {
        if representative[class] == usize::MAX {
            representative[class] = state;
        }
    }

    let class_next: Vec<Vec<Option<usize>>> = representative
        .iter()
        .map(|&state| {
            table.next[state]
                .iter()
                .map(|destination| destination.map(|d| classes[d]))
                .collect()
        })
        .collect();

    // Renumber the classes reachable from the initial one, breadth-first.
    let initial = classes[0];
    let mut order: HashMap<usize, usize> = HashMap::from([(initial, 0)]);
    let mut queue = VecDeque::from([initial]);
    let mut kept = vec![initial];

    while let Some(class) = queue.pop_front() {
        for destination in class_next[class].iter().flatten() {
            if !order.contains_key(destination) {
                order.insert(*destination, kept.len());
                kept.push(*destination);
                queue.push_back(*destination);
            }
        }
    }

    let next = kept
        .iter()
        .map(|&class| {
            class_next[class]
                .iter()
                .map(|destination| destination.and_then(|d| order.get(&d).copied()))
                .collect()
        })
        .collect();
    let accepting = kept
        .iter()
        .map(|&class| table.accepting[representative[class]])
        .collect();

    debug!(
        "Minimization merged {} deterministic states into {}",
        state_count,
        kept.len()
    );

    Table {
        symbols: table.symbols,
        next,
        accepting,
    }
    .into_automaton()
}

/// Returns the equivalence class of every state of `table`.
///
/// Starts from the accepting/rejecting split and refines by transition signatures until
/// the number of classes stops growing.
fn refine(table: &Table) -> Vec<usize> {
    let mut classes: Vec<usize> = table
        .accepting
        .iter()
        .map(|&accepting| usize::from(accepting))
        .collect();
    let mut count = normalize(&mut classes);

    loop {
        let signatures: Vec<(usize, Vec<Option<usize>>)> = table
            .next
            .iter()
            .enumerate()
            .map(|(state, row)| {
                let targets = row.iter().map(|d| d.map(|d| classes[d])).collect();
                (classes[state], targets)
            })
            .collect();

        let mut ids: HashMap<&(usize, Vec<Option<usize>>), usize> = HashMap::new();
        let mut refined = Vec::with_capacity(signatures.len());
        for signature in &signatures {
            let next_id = ids.len();
            refined.push(*ids.entry(signature).or_insert(next_id));
        }

        let refined_count = ids.len();
        classes = refined;
        if refined_count == count {
            return classes;
        }
        count = refined_count;
    }
}

/// Renumbers classes by first occurrence and returns how many there are.
fn normalize(classes: &mut [usize]) -> usize {
    let mut ids = HashMap::new();
    for class in classes.iter_mut() {
        let next_id = ids.len();
        *class = *ids.entry(*class).or_insert(next_id);
    }
    ids.len()
}

/// Marks the states from which an accepting state can be reached.
fn live_states(next: &[Vec<Option<usize>>], accepting: &[bool]) -> Vec<bool> {
    let mut live = accepting.to_vec();
    let mut changed = true;

    while changed {
        changed = false;
        for (state, row) in next.iter().enumerate() {
            if !live[state] && row.iter().flatten().any(|d| live[*d]) {
                live[state] = true;
                changed = true;
            }
        }
    }

    live
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::decode_str;
    use crate::engine::accepts;
    use crate::types::symbols_from_chars;

    const SAMPLE: &str = r#"{
        "q": ["q0", "q2", "q3", "q4"],
        "sigma": ["0", "1", ""],
        "delta": {
            "q0": {"0": ["q2", "q3", "q4"], "1": "q4", "": "q4"},
            "q2": {"1": ["q2", "q3", "q4"]},
            "q3": {},
            "q4": {"1": ["q2", "q0"]}
        },
        "initial_state": "q0",
        "f": ["q4"]
    }"#;

    /// Every binary string of length at most `max_len`.
    fn binary_strings(max_len: usize) -> Vec<String> {
        let mut all = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .flat_map(|s| [format!("{}0", s), format!("{}1", s)])
                .collect();
            all.extend(frontier.iter().cloned());
        }
        all
    }

    fn assert_equivalent(a: &Automaton, b: &Automaton) {
        for input in binary_strings(6) {
            let symbols = symbols_from_chars(&input);
            assert_eq!(
                accepts(a, &symbols),
                accepts(b, &symbols),
                "automata disagree on {:?}",
                input
            );
        }
    }

    fn assert_deterministic(automaton: &Automaton) {
        for state in automaton.states() {
            let map = automaton.transitions_from(state).unwrap();
            assert!(!map.contains_key(&Symbol::Epsilon));
            assert!(map.values().all(|destinations| destinations.len() == 1));
        }
    }

    #[test]
    fn test_to_dfa_sample() {
        let nfa = decode_str(SAMPLE).unwrap();
        let dfa = to_dfa(&nfa).unwrap();

        assert_eq!(dfa.initial_state(), "q0");
        assert!(dfa.is_accepting("q0"));
        assert!(!dfa.alphabet().contains(&Symbol::Epsilon));
        assert_deterministic(&dfa);
        assert_equivalent(&nfa, &dfa);
    }

    #[test]
    fn test_to_dfa_without_transitions() {
        let dfa = to_dfa(&Automaton::new()).unwrap();

        assert_eq!(dfa.states().len(), 1);
        assert_eq!(dfa.transition_count(), 0);
        assert!(!dfa.is_accepting("q0"));
    }

    #[test]
    fn test_minimize_merges_equivalent_states() {
        // Strings ending in 1, with q1 and q2 both playing the "just read 1" role.
        let dfa = decode_str(
            r#"{"q": ["q0", "q1", "q2"], "sigma": ["0", "1"],
                "delta": {
                    "q0": {"0": "q0", "1": "q1"},
                    "q1": {"0": "q0", "1": "q2"},
                    "q2": {"0": "q0", "1": "q1"}
                },
                "initial_state": "q0", "f": ["q1", "q2"]}"#,
        )
        .unwrap();

        let minimal = minimize(&dfa).unwrap();

        assert_eq!(minimal.states().len(), 2);
        assert_deterministic(&minimal);
        assert_equivalent(&dfa, &minimal);
    }

    #[test]
    fn test_minimize_drops_dead_states() {
        let nfa = decode_str(
            r#"{"q": ["a", "b", "trap"], "sigma": ["0", "1"],
                "delta": {
                    "a": {"1": "b", "0": "trap"},
                    "trap": {"0": "trap", "1": "trap"}
                },
                "initial_state": "a", "f": ["b"]}"#,
        )
        .unwrap();

        let minimal = minimize(&nfa).unwrap();

        assert_eq!(minimal.states().len(), 2);
        assert!(minimal.destinations("q0", &"0".into()).is_none());
        assert_equivalent(&nfa, &minimal);
    }

    #[test]
    fn test_minimize_merges_missing_transition_with_trap() {
        // Accepts exactly "01" and "11". `b` fails into a trap on 0 while `c` has no
        // 0-transition at all; both must end up in the same class.
        let nfa = decode_str(
            r#"{"q": ["a", "b", "c", "trap", "f"], "sigma": ["0", "1"],
                "delta": {
                    "a": {"0": "b", "1": "c"},
                    "b": {"0": "trap", "1": "f"},
                    "c": {"1": "f"},
                    "trap": {"0": "trap", "1": "trap"}
                },
                "initial_state": "a", "f": ["f"]}"#,
        )
        .unwrap();

        let minimal = minimize(&nfa).unwrap();
        assert_eq!(minimal.states().len(), 3);
        assert_equivalent(&nfa, &minimal);

        let again = minimize(&minimal).unwrap();
        assert_eq!(again.states().len(), minimal.states().len());
    }

    #[test]
    fn test_minimize_sample() {
        let nfa = decode_str(SAMPLE).unwrap();
        let dfa = to_dfa(&nfa).unwrap();
        let minimal = minimize(&nfa).unwrap();

        assert!(minimal.states().len() <= dfa.states().len());
        assert_deterministic(&minimal);
        assert_equivalent(&nfa, &minimal);
    }

    #[test]
    fn test_minimize_empty_language_keeps_initial_state() {
        let minimal = minimize(&Automaton::new()).unwrap();

        assert_eq!(minimal.states().len(), 1);
        assert!(minimal.accepting_states().is_empty());
    }
}
