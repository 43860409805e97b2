//! Simple standalone example of delta RGA usage.
//!
//! Two users edit the same document while offline, then swap the deltas
//! their edits produced.
//!
//! Run with: cargo run --example simple

use delta_rga::{Anchor, Rga, State};

fn sync(from: &[State<char>], to: &Rga<char>) {
    for delta in from {
        to.apply_remote(delta).unwrap();
    }
}

fn main() {
    println!("=== Simple Delta RGA Example ===\n");

    // Create two replicas representing two users
    let alice = Rga::new(1);
    let bob = Rga::new(2);

    println!("Alice (replica 1) and Bob (replica 2) start editing a document\n");

    // Alice types "Hello"
    println!("Alice types 'Hello':");
    let alice_deltas: Vec<_> = "Hello".chars().map(|ch| alice.push(ch).unwrap()).collect();
    println!("  Alice's document: '{}'", alice.text().unwrap());

    // Bob concurrently types "World!" from the beginning of his own copy
    println!("\nBob concurrently types 'World!' (also from the start):");
    let bob_deltas: Vec<_> = "World!".chars().map(|ch| bob.push(ch).unwrap()).collect();
    println!("  Bob's document: '{}'", bob.text().unwrap());

    println!("\n--- Before Synchronization ---");
    println!("  Alice sees: '{}'", alice.text().unwrap());
    println!("  Bob sees:   '{}'", bob.text().unwrap());

    // Deltas are tiny states: one vertex and its edges each
    println!("\n--- Synchronizing Changes ---");
    println!(
        "One of Alice's deltas on the wire: {}",
        serde_json::to_string(&alice_deltas[0]).unwrap()
    );
    println!("Alice receives Bob's deltas...");
    sync(&bob_deltas, &alice);
    println!("Bob receives Alice's deltas, newest first...");
    let reversed: Vec<_> = alice_deltas.iter().rev().cloned().collect();
    sync(&reversed, &bob);

    println!("\n--- After Synchronization ---");
    println!("  Alice sees: '{}'", alice.text().unwrap());
    println!("  Bob sees:   '{}'", bob.text().unwrap());

    // Verify convergence
    if alice.state() == bob.state() {
        println!("\n✓ SUCCESS: Both users converged to the same document!");
        println!("✓ Final content: '{}'", alice.text().unwrap());
    } else {
        println!("\n✗ ERROR: Documents did not converge!");
    }

    // Show the ordering details
    println!("\n--- Technical Details ---");
    println!("Both runs start at HEAD; the greater Lamport identifier comes first:");
    let state = alice.state();
    for step in state.chain() {
        let id = step.unwrap();
        println!("  {:>5}  {:?}", id.to_string(), state.get(&id).unwrap());
    }

    // Demonstrate deletion and insertion after a tombstone
    println!("\n=== Deletion Example ===");

    let position = alice.to_vec().unwrap().iter().position(|&ch| ch == 'W');
    if let Some(position) = position {
        println!("Alice deletes 'W'");
        let removal = alice.remove_at(position).unwrap();
        let w = *removal.removed().iter().next().unwrap();
        println!("  Alice's document: '{}'", alice.text().unwrap());

        // Bob still anchors on the vertex Alice just removed
        println!("Bob concurrently inserts 'w' right after the same 'W'");
        let insertion = bob.insert_after(Anchor::Vertex(w), 'w').unwrap();

        sync(&[removal], &bob);
        sync(&[insertion], &alice);

        println!("  Alice's document: '{}'", alice.text().unwrap());
        println!("  Bob's document:   '{}'", bob.text().unwrap());

        if alice.state() == bob.state() {
            println!("✓ Deletion synchronized successfully!");
        }
    }

    println!("\n=== Example Complete ===");
    println!("Deltas can arrive late, twice or out of order: every replica");
    println!("that has received the same deltas shows the same document.");
}
