//! Compact delta blobs
//!
//! One blob carries a bucket's worth of signed 8-bit deltas, one byte per
//! asset in two's complement (-128 is 0x80). Each delta is in units of
//! 10 bps. Short blobs are zero-padded.

use crate::{ModelError, Result, COMPACT_SLOTS};

/// Deltas for every slot of one bucket
pub type CompactDeltas = [i8; COMPACT_SLOTS];

/// Unpack a blob of at most 14 bytes
pub fn decode_compact_blob(blob: &[u8]) -> Result<CompactDeltas> {
    if blob.len() > COMPACT_SLOTS {
        return Err(ModelError::BlobTooLong);
    }
    let mut deltas = [0i8; COMPACT_SLOTS];
    for (slot, byte) in deltas.iter_mut().zip(blob) {
        *slot = i8::from_be_bytes([*byte]);
    }
    Ok(deltas)
}

/// Pack up to 14 deltas into a full-width blob
pub fn encode_compact_blob(deltas: &[i8]) -> Result<[u8; COMPACT_SLOTS]> {
    if deltas.len() > COMPACT_SLOTS {
        return Err(ModelError::BlobTooLong);
    }
    let mut blob = [0u8; COMPACT_SLOTS];
    for (byte, delta) in blob.iter_mut().zip(deltas) {
        *byte = delta.to_be_bytes()[0];
    }
    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twos_complement_bytes() {
        let blob = encode_compact_blob(&[-128, -1, 0, 1, 127]).unwrap();
        assert_eq!(&blob[..5], &[0x80, 0xff, 0x00, 0x01, 0x7f]);
        assert!(blob[5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_decode_pads_short_blob() {
        let deltas = decode_compact_blob(&[0x80, 0x05]).unwrap();
        assert_eq!(deltas[0], -128);
        assert_eq!(deltas[1], 5);
        assert!(deltas[2..].iter().all(|d| *d == 0));

        assert_eq!(decode_compact_blob(&[]), Ok([0; COMPACT_SLOTS]));
    }

    #[test]
    fn test_full_bucket() {
        let values: [i8; 14] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14];
        let blob = encode_compact_blob(&values).unwrap();
        assert_eq!(decode_compact_blob(&blob), Ok(values));
    }

    #[test]
    fn test_blob_too_long() {
        assert_eq!(decode_compact_blob(&[0; 15]), Err(ModelError::BlobTooLong));
        assert_eq!(encode_compact_blob(&[0; 15]), Err(ModelError::BlobTooLong));
    }
}
