//! Reference executors: FNV-1a fingerprints over open file handles.
//!
//! These are the canonical workloads plugged into [`BatchPool`], and they
//! define the expected executor shape: take one work item by value, return
//! one `u64`, encode any failure in-band. Each call gets exclusive use of
//! its file handle, so the executors are safe to run from many workers at
//! once.
//!
//! [`BatchPool`]: crate::pool::BatchPool

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use log::warn;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;
const FNV64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV64_PRIME: u64 = 0x0000_0100_0000_01b3;

const CHUNK_SIZE: usize = 4096;

/// Computes the 32-bit FNV-1a hash of a file's contents, zero-extended to
/// 64 bits (the upper half is always zero).
///
/// Seeks to the start first, so an already-read handle hashes the same as a
/// fresh one. The result slot has no error channel, so an I/O failure is
/// encoded in-band as `u64::MAX` and logged.
pub fn hash32(file: File) -> u64 {
    let folded = fold(file, FNV32_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV32_PRIME)
    });
    match folded {
        Ok(hash) => u64::from(hash),
        Err(e) => {
            warn!("hash32: read failed: {e}");
            u64::MAX
        }
    }
}

/// Computes the 64-bit FNV-1a hash of a file's contents.
///
/// Same contract as [`hash32`]: seeks to the start, reads in 4096-byte
/// chunks, returns `u64::MAX` on I/O failure.
pub fn hash64(file: File) -> u64 {
    let folded = fold(file, FNV64_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV64_PRIME)
    });
    match folded {
        Ok(hash) => hash,
        Err(e) => {
            warn!("hash64: read failed: {e}");
            u64::MAX
        }
    }
}

/// Seeks to the start and folds every byte of `source` through `step`.
fn fold<R, H>(mut source: R, seed: H, mut step: impl FnMut(H, u8) -> H) -> io::Result<H>
where
    R: Read + Seek,
    H: Copy,
{
    source.seek(SeekFrom::Start(0))?;
    let mut hash = seed;
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = source.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            hash = step(hash, byte);
        }
    }
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn fold32(bytes: &[u8]) -> u32 {
        fold(Cursor::new(bytes), FNV32_OFFSET_BASIS, |hash, byte| {
            (hash ^ u32::from(byte)).wrapping_mul(FNV32_PRIME)
        })
        .unwrap()
    }

    fn fold64(bytes: &[u8]) -> u64 {
        fold(Cursor::new(bytes), FNV64_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV64_PRIME)
        })
        .unwrap()
    }

    #[test]
    fn known_vectors() {
        assert_eq!(fold32(b"hello"), 0x4f9f2cab);
        assert_eq!(fold64(b"hello"), 0xa430d84680aabd0b);
    }

    #[test]
    fn empty_input_is_offset_basis() {
        assert_eq!(fold32(b""), FNV32_OFFSET_BASIS);
        assert_eq!(fold64(b""), FNV64_OFFSET_BASIS);
    }

    #[test]
    fn input_spanning_multiple_chunks() {
        let bytes = vec![b'a'; 5000];
        assert_eq!(fold32(&bytes), 0x4dda656d);
        assert_eq!(fold64(&bytes), 0x9168c27c5851404d);
    }

    #[test]
    fn fold_rewinds_before_reading() {
        let mut cursor = Cursor::new(b"hello".to_vec());
        cursor.set_position(3);
        let hash = fold(&mut cursor, FNV32_OFFSET_BASIS, |hash, byte| {
            (hash ^ u32::from(byte)).wrapping_mul(FNV32_PRIME)
        })
        .unwrap();
        assert_eq!(hash, 0x4f9f2cab);
    }
}
