//! Basic usage of the theory builders
//!
//! Run with `cargo run --example basic_theories`.

use std::rc::Rc;

use theoria::sources::{integers, vecs};
use theoria::{ConsoleReporter, TheoryError, theory};

// Example 1: a theory that holds
fn example_1_commutative_addition() {
    println!("=== Example 1: A theory that holds ===");

    let result = theory()
        .for_all2(integers(-1000i64, 1000), integers(-1000i64, 1000))
        .check(|a, b| a + b == b + a);

    match result {
        Ok(()) => println!("✓ addition commutes"),
        Err(error) => println!("✗ {}", error),
    }
}

// Example 2: a falsified theory, shrunk to the boundary
fn example_2_threshold() {
    println!("\n=== Example 2: Shrinking to the boundary ===");

    let result = theory()
        .with_reporter(Rc::new(ConsoleReporter::new().verbose()))
        .for_all3(integers(0i32, 100), integers(0i32, 100), integers(0i32, 100))
        .check(|a, b, c| !(*a > 50 && *b > 50 && *c > 50));

    if let Err(TheoryError::Falsified { smallest, .. }) = result {
        println!("smallest falsifying triple: {}", smallest);
    }
}

// Example 3: assumptions and mapped values
fn example_3_assumptions_and_mapping() {
    println!("\n=== Example 3: Assumptions and precursors ===");

    let result = theory()
        .for_all2(vecs(integers(0u8, 9), 0, 8), integers(0usize, 8))
        .assuming(|items, index| *index < items.len())
        .map_with_precursor(|items, index| items.get(*index).copied())
        .check(|items, index, item| item.is_some_and(|item| items[*index] == item));

    match result {
        Ok(()) => println!("✓ indexing returns a contained element"),
        Err(error) => println!("✗ {}", error),
    }
}

// Example 4: panics falsify with a cause
fn example_4_check_assert() {
    println!("\n=== Example 4: Assertions ===");

    let result = theory()
        .for_all(integers(0u32, 10_000))
        .check_assert(|n| assert!(n.to_string().len() < 4, "{} has too many digits", n));

    if let Err(error) = result {
        println!("caught: {}", error);
    }
}

fn main() {
    example_1_commutative_addition();
    example_2_threshold();
    example_3_assumptions_and_mapping();
    example_4_check_assert();
}
