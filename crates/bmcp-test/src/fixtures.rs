//! Instance fixtures.

use bmcp_core::{Instance, InstanceBuilder};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Three items sharing two elements.
///
/// Weights 2, 3, 4; profits 5, 5; capacity 5. Item 0 covers element 0,
/// item 1 covers both, item 2 covers element 1. The optimum is profit 10,
/// reached by item 1 alone (weight 3) or items 0 and 1 (weight 5).
pub fn three_item_instance() -> Instance {
    let mut builder = InstanceBuilder::new(5);
    let a = builder.add_item(2);
    let b = builder.add_item(3);
    let c = builder.add_item(4);
    let e0 = builder.add_element(5);
    let e1 = builder.add_element(5);
    builder.cover(a, e0).cover(b, e0).cover(b, e1).cover(c, e1);
    builder
        .build()
        .expect("three item fixture is valid")
}

/// Capacity 0 with positively weighted items: nothing fits.
pub fn zero_capacity_instance() -> Instance {
    let mut builder = InstanceBuilder::new(0);
    let a = builder.add_item(1);
    let b = builder.add_item(2);
    let e0 = builder.add_element(4);
    let e1 = builder.add_element(6);
    builder.cover(a, e0).cover(b, e0).cover(b, e1);
    builder
        .build()
        .expect("zero capacity fixture is valid")
}

/// One item whose weight equals the capacity, covering every element.
pub fn single_item_instance() -> Instance {
    let mut builder = InstanceBuilder::new(7);
    let item = builder.add_item(7);
    for profit in [3, 4, 5] {
        let element = builder.add_element(profit);
        builder.cover(item, element);
    }
    builder
        .build()
        .expect("single item fixture is valid")
}

/// Seeded random instance.
///
/// Weights and profits are uniform in `1..=20`; each item covers each
/// element with probability `density`; the capacity is a third of the total
/// weight.
pub fn random_instance(seed: u64, items: usize, elements: usize, density: f64) -> Instance {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let weights: Vec<i64> = (0..items).map(|_| rng.random_range(1..=20)).collect();
    let profits: Vec<i64> = (0..elements).map(|_| rng.random_range(1..=20)).collect();
    let capacity = weights.iter().sum::<i64>() / 3;

    let mut builder = InstanceBuilder::new(capacity);
    for &weight in &weights {
        builder.add_item(weight);
    }
    for &profit in &profits {
        builder.add_element(profit);
    }
    for item in 0..items {
        for element in 0..elements {
            if rng.random_bool(density) {
                builder.cover(item, element);
            }
        }
    }
    builder
        .build()
        .expect("generated instance is valid")
}
