//! Kani proofs for the packed encodings
//!
//! - **C1: Step Word** - every representable pair survives packing
//! - **C2: Compact Blob** - encode and decode are inverse on one bucket

use rate_model::{decode_compact_blob, encode_compact_blob, StepWord, COMPACT_SLOTS};

/// C1: StepWord decode inverts encode
#[kani::proof]
#[kani::unwind(33)]
fn c1_step_word_round_trip() {
    let x: i128 = kani::any();
    let y: i128 = kani::any();
    kani::assume(x != i128::MIN && y != i128::MIN);

    let word = StepWord::encode(x, y).unwrap();
    assert_eq!(word.decode(), Ok((x, y)), "C1: step word changed its pair");
}

/// C2: a full bucket of deltas round trips through one blob
#[kani::proof]
#[kani::unwind(15)]
fn c2_compact_blob_round_trip() {
    let deltas: [i8; COMPACT_SLOTS] = kani::any();

    let blob = encode_compact_blob(&deltas).unwrap();
    assert_eq!(decode_compact_blob(&blob), Ok(deltas), "C2: blob changed deltas");
}
