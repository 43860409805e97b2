//! Property-based tests for the RGA join.
//!
//! Replica states are produced by random editing scripts over three replicas
//! that exchange deltas in arbitrary order, so every state under test is one
//! a real replica could hold: partial knowledge, detached chains and all.
//!
//! ## Properties Verified
//!
//! - Join is associative: (a ⊔ b) ⊔ c = a ⊔ (b ⊔ c)
//! - Join is commutative: a ⊔ b = b ⊔ a
//! - Join is idempotent: a ⊔ a = a
//! - The initial state is the identity: a ⊔ ⊥ = a
//! - Replaying every delta in any order, with duplicates, yields the same state

use delta_rga::{LamportClock, State, initial, join, mutators, value};
use proptest::prelude::*;

const REPLICAS: usize = 3;

#[derive(Debug, Clone)]
enum Step {
    Insert {
        replica: usize,
        position: usize,
        ch: char,
    },
    Push {
        replica: usize,
        ch: char,
    },
    Remove {
        replica: usize,
        position: usize,
    },
    Set {
        replica: usize,
        position: usize,
        ch: char,
    },
    /// Joins the logged delta at `delta` (modulo the log length) into `replica`
    Deliver {
        replica: usize,
        delta: usize,
    },
}

fn arb_step() -> impl Strategy<Value = Step> {
    let replica = 0..REPLICAS;
    let ch = prop::char::range('a', 'z');
    prop_oneof![
        3 => (replica.clone(), any::<usize>(), ch.clone())
            .prop_map(|(replica, position, ch)| Step::Insert { replica, position, ch }),
        2 => (replica.clone(), ch.clone()).prop_map(|(replica, ch)| Step::Push { replica, ch }),
        2 => (replica.clone(), any::<usize>())
            .prop_map(|(replica, position)| Step::Remove { replica, position }),
        1 => (replica.clone(), any::<usize>(), ch)
            .prop_map(|(replica, position, ch)| Step::Set { replica, position, ch }),
        4 => (replica, any::<usize>()).prop_map(|(replica, delta)| Step::Deliver { replica, delta }),
    ]
}

fn arb_script() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(arb_step(), 0..60)
}

struct Replica {
    clock: LamportClock,
    state: State<char>,
}

/// The outcome of a script: every replica's final state and every delta
/// minted along the way, in minting order.
struct History {
    replicas: Vec<Replica>,
    log: Vec<State<char>>,
}

impl History {
    fn state(&self, replica: usize) -> &State<char> {
        &self.replicas[replica].state
    }
}

fn run(script: &[Step]) -> History {
    let mut replicas: Vec<Replica> = (1..=REPLICAS as u64)
        .map(|id| Replica {
            clock: LamportClock::new(id),
            state: initial(),
        })
        .collect();
    let mut log: Vec<State<char>> = Vec::new();

    for step in script {
        let (target, batch) = match *step {
            Step::Insert {
                replica,
                position,
                ch,
            } => {
                let r = &replicas[replica];
                // Reaching one past the end exercises filler synthesis
                let len = r.state.len().unwrap();
                let batch = mutators::insert_at(&r.state, &r.clock, position % (len + 2), ch);
                (replica, batch.unwrap())
            }
            Step::Push { replica, ch } => {
                let r = &replicas[replica];
                (replica, vec![mutators::push(&r.state, &r.clock, ch).unwrap()])
            }
            Step::Remove { replica, position } => {
                let r = &replicas[replica];
                let len = r.state.len().unwrap();
                if len == 0 {
                    continue;
                }
                (replica, vec![mutators::remove_at(&r.state, position % len).unwrap()])
            }
            Step::Set {
                replica,
                position,
                ch,
            } => {
                let r = &replicas[replica];
                let len = r.state.len().unwrap();
                let batch = mutators::set(&r.state, &r.clock, position % (len + 2), ch);
                (replica, batch.unwrap())
            }
            Step::Deliver { replica, delta } => {
                if !log.is_empty() {
                    let delta = &log[delta % log.len()];
                    let r = &mut replicas[replica];
                    r.state = join(&r.state, delta).unwrap();
                }
                continue;
            }
        };

        let r = &mut replicas[target];
        for delta in &batch {
            r.state = join(&r.state, delta).unwrap();
        }
        log.extend(batch);
    }

    History { replicas, log }
}

fn replay<'a>(deltas: impl IntoIterator<Item = &'a State<char>>) -> State<char> {
    deltas
        .into_iter()
        .try_fold(initial(), |acc, delta| join(&acc, delta))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: join is commutative
    #[test]
    fn prop_join_commutative(script in arb_script()) {
        let history = run(&script);
        let (a, b) = (history.state(0), history.state(1));

        prop_assert_eq!(join(a, b).unwrap(), join(b, a).unwrap(), "join must be commutative");
    }

    /// Property: join is associative
    #[test]
    fn prop_join_associative(script in arb_script()) {
        let history = run(&script);
        let (a, b, c) = (history.state(0), history.state(1), history.state(2));

        let left = join(&join(a, b).unwrap(), c).unwrap();
        let right = join(a, &join(b, c).unwrap()).unwrap();

        prop_assert_eq!(left, right, "join must be associative");
    }

    /// Property: join is idempotent
    #[test]
    fn prop_join_idempotent(script in arb_script()) {
        let history = run(&script);
        for replica in 0..REPLICAS {
            let state = history.state(replica);
            prop_assert_eq!(&join(state, state).unwrap(), state, "join must be idempotent");
        }
    }

    /// Property: the initial state is the identity for join
    #[test]
    fn prop_initial_is_identity(script in arb_script()) {
        let history = run(&script);
        let state = history.state(0);

        prop_assert_eq!(&join(state, &initial()).unwrap(), state);
        prop_assert_eq!(&join(&initial(), state).unwrap(), state);
    }

    /// Property: delivery order and duplication do not affect the result
    #[test]
    fn prop_delivery_order_is_irrelevant(
        script in arb_script(),
        keys in prop::collection::vec(any::<u64>(), 1..64),
        duplicates in prop::collection::vec(any::<bool>(), 1..64),
    ) {
        let history = run(&script);
        let expected = replay(&history.log);

        let mut order: Vec<usize> = (0..history.log.len()).collect();
        order.sort_by_key(|&i| (keys[i % keys.len()], i));
        let again: Vec<usize> = order
            .iter()
            .rev()
            .copied()
            .filter(|&i| duplicates[i % duplicates.len()])
            .collect();
        order.extend(again);

        let shuffled = replay(order.iter().map(|&i| &history.log[i]));

        prop_assert_eq!(&shuffled, &expected);
        prop_assert_eq!(value(&shuffled).unwrap(), value(&expected).unwrap());
    }

    /// Property: replicas hold subsets of the history and catch up to it
    #[test]
    fn prop_replicas_converge_on_full_history(script in arb_script()) {
        let history = run(&script);
        let full = replay(&history.log);

        let merged = history
            .replicas
            .iter()
            .try_fold(initial(), |acc, r| join(&acc, &r.state))
            .unwrap();
        prop_assert_eq!(&merged, &full);

        for replica in &history.replicas {
            // Joining what a replica has into the full state adds nothing
            prop_assert_eq!(&join(&full, &replica.state).unwrap(), &full);
            let caught_up = replay(std::iter::once(&replica.state).chain(&history.log));
            prop_assert_eq!(&caught_up, &full);
        }
    }
}
