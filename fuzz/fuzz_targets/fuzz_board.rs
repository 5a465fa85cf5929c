#![no_main]

//! Board text parser and cascade fuzzer.
//!
//! Parses arbitrary text as a board. Anything that parses must print back
//! to the same board, and a collapse must leave it full.

use libfuzzer_sys::fuzz_target;
use orbclash::game::{find_matches, Board};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut board) = text.parse::<Board>() else {
        return;
    };

    let printed = board.to_string();
    assert_eq!(printed.parse::<Board>().ok().as_ref(), Some(&board));

    let groups = find_matches(&board, 3);
    board.clear(groups.iter().flatten());
    let mut rng = ChaCha8Rng::seed_from_u64(data.len() as u64);
    board.collapse_and_refill(6, &mut rng);
    assert_eq!(board.empty_count(), 0);
});
