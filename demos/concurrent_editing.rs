//! Concurrent editing example for the delta RGA.
//!
//! This example showcases:
//! - Several threads editing through one shared replica handle
//! - Many replicas editing in parallel, then exchanging shuffled deltas
//! - Deterministic resolution of concurrent insertions at the same anchor
//!
//! Run with: cargo run --example concurrent_editing

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use delta_rga::{Anchor, Rga, State};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

fn main() {
    println!("=== Concurrent Delta RGA Example ===\n");

    shared_handle_demo();
    println!();

    stress_test_demo();
    println!();

    conflict_resolution_demo();
}

/// Several threads edit through the same replica; the write lock serializes
/// every mutate-then-join step.
fn shared_handle_demo() {
    println!("--- Shared Replica Handle ---");

    let num_threads = 4;
    let operations_per_thread = 100;
    let rga = Arc::new(Rga::new(1));

    println!(
        "Starting {} threads, each performing {} operations",
        num_threads, operations_per_thread
    );
    let start_time = Instant::now();

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let rga = Arc::clone(&rga);
            thread::spawn(move || {
                let mut deltas = 0;
                for i in 0..operations_per_thread {
                    let ch = (b'A' + ((thread_id * 4 + i) % 26) as u8) as char;
                    deltas += rga.insert_at(i / 2, ch).unwrap().len();

                    // Occasionally delete what was just typed
                    if i % 10 == 0 && i > 0 {
                        deltas += rga.remove_at(i / 2).map(|_| 1).unwrap_or(0);
                    }
                }
                deltas
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let total_time = start_time.elapsed();

    println!("All threads completed!");
    println!("Deltas produced: {}", total);
    println!("Total time: {:?}", total_time);
    println!("Final document length: {}", rga.len().unwrap());
    println!(
        "Total vertices (including tombstones): {}",
        rga.total_vertex_count()
    );
}

/// Every replica edits on its own thread, then receives every other
/// replica's deltas in a shuffled order.
fn stress_test_demo() {
    println!("--- Stress Test: Multiple Replicas ---");

    let num_replicas = 8;
    let operations_per_replica = 200;
    let rgas: Vec<Arc<Rga<char>>> = (1..=num_replicas)
        .map(|id| Arc::new(Rga::new(id)))
        .collect();

    println!(
        "Creating {} replicas, each performing {} operations",
        num_replicas, operations_per_replica
    );
    let start_time = Instant::now();

    let handles: Vec<_> = rgas
        .iter()
        .enumerate()
        .map(|(replica_idx, rga)| {
            let rga = Arc::clone(rga);
            thread::spawn(move || {
                let mut deltas = Vec::new();
                for i in 0..operations_per_replica {
                    let ch = match i % 5 {
                        0 => (b'A' + replica_idx as u8) as char,
                        1 => (b'a' + replica_idx as u8) as char,
                        2 => (b'0' + replica_idx as u8) as char,
                        3 => ' ',
                        _ => '.',
                    };
                    if i % 20 == 0 {
                        deltas.extend(rga.insert_at(0, ch).unwrap());
                    } else {
                        deltas.push(rga.push(ch).unwrap());
                    }
                    if i % 15 == 0 {
                        deltas.push(rga.remove_at(0).unwrap());
                    }
                }
                (rga.replica_id(), deltas)
            })
        })
        .collect();

    let produced: BTreeMap<u64, Vec<State<char>>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    let operation_time = start_time.elapsed();
    let total_deltas: usize = produced.values().map(Vec::len).sum();

    println!("Phase 1 - Concurrent edits completed in {:?}", operation_time);
    println!("Total deltas: {}", total_deltas);

    println!("\nPhase 2 - Network Synchronization...");
    let sync_start = Instant::now();
    let mut rng = StdRng::seed_from_u64(42);

    for rga in &rgas {
        let mut inbox: Vec<&State<char>> = produced
            .iter()
            .filter(|(from, _)| **from != rga.replica_id())
            .flat_map(|(_, deltas)| deltas)
            .collect();
        inbox.shuffle(&mut rng);
        for delta in inbox {
            rga.apply_remote(delta).unwrap();
        }
    }
    let sync_time = sync_start.elapsed();

    let reference = rgas[0].state();
    let mut all_converged = true;
    for rga in &rgas[1..] {
        if rga.state() != reference {
            println!("ERROR: Replica {} did not converge!", rga.replica_id());
            all_converged = false;
        }
    }
    if all_converged {
        println!("✓ All {} replicas successfully converged!", num_replicas);
    }

    println!("Synchronization completed in {:?}", sync_time);
    println!("Final document length: {}", rgas[0].len().unwrap());
    println!("Total vertices: {}", reference.added().len());
    println!(
        "Sync throughput: {:.2} deltas/sec",
        (total_deltas * (num_replicas as usize - 1)) as f64 / sync_time.as_secs_f64()
    );
}

/// All replicas type at HEAD at the same time; the merged order is decided by
/// vertex identifiers alone.
fn conflict_resolution_demo() {
    println!("--- Conflict Resolution at One Anchor ---");

    let num_replicas = 6;
    let rgas: Vec<Rga<char>> = (1..=num_replicas).map(Rga::new).collect();
    println!("Testing conflict resolution with {} replicas", num_replicas);

    let deltas: Vec<State<char>> = rgas
        .iter()
        .enumerate()
        .flat_map(|(idx, rga)| {
            let ch = (b'A' + idx as u8) as char;
            (0..5)
                .map(|_| rga.insert_after(Anchor::Head, ch).unwrap())
                .collect::<Vec<_>>()
        })
        .collect();

    for rga in &rgas {
        for delta in &deltas {
            rga.apply_remote(delta).unwrap();
        }
    }

    let reference = rgas[0].text().unwrap();
    if rgas.iter().all(|rga| rga.text().unwrap() == reference) {
        println!("✓ All replicas have identical state: '{}'", reference);
    } else {
        println!("✗ Conflict resolution failed - replicas have different states");
    }

    println!("\nChain order (newest identifiers first at each anchor):");
    let state = rgas[0].state();
    for step in state.chain().take(10) {
        let id = step.unwrap();
        println!("  {:>5}  {:?}", id.to_string(), state.get(&id).unwrap());
    }
}
