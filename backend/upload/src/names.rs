//! Collision-resistant file name generation.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{UploadError, UploadResult};

/// The 62-symbol alphabet generated names are drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of names produced for renamed uploads.
pub const GENERATED_NAME_LEN: usize = 25;

// Largest multiple of 62 that fits in a byte. Bytes at or above it are
// discarded so every symbol keeps probability 1/62.
const ACCEPT_BELOW: u8 = (ALPHABET.len() * 4) as u8;

/// Random alphanumeric string of `length` characters from the OS CSPRNG.
pub fn generate(length: usize) -> UploadResult<String> {
    generate_with(&mut OsRng, length)
}

/// Same as [`generate`] with a caller-supplied entropy source.
pub fn generate_with<R>(rng: &mut R, length: usize) -> UploadResult<String>
where
    R: RngCore + ?Sized,
{
    let mut out = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while out.len() < length {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| UploadError::RandomnessUnavailable(e.to_string()))?;

        for &b in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
            out.push(ALPHABET[(b % 62) as usize] as char);
            if out.len() == length {
                break;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::other("entropy pool closed")))
        }
    }

    /// Always yields 255, which the sampler must reject forever, then 0.
    struct HighThenZero(usize);

    impl RngCore for HighThenZero {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let byte = if self.0 == 0 { 0 } else { 255 };
            self.0 = self.0.saturating_sub(1);
            dest.fill(byte);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn generates_requested_length_from_alphabet() {
        let name = generate(GENERATED_NAME_LEN).unwrap();
        assert_eq!(name.len(), GENERATED_NAME_LEN);
        assert!(name.bytes().all(|b| ALPHABET.contains(&b)));
        assert_eq!(generate(0).unwrap(), "");
    }

    #[test]
    fn rejected_bytes_are_skipped() {
        let name = generate_with(&mut HighThenZero(3), 10).unwrap();
        assert_eq!(name, "aaaaaaaaaa");
    }

    #[test]
    fn entropy_failure_is_reported() {
        let err = generate_with(&mut BrokenRng, 8).unwrap_err();
        assert!(matches!(err, UploadError::RandomnessUnavailable(_)));
    }

    #[test]
    fn ten_thousand_names_are_unique_and_uniform() {
        const NAMES: usize = 10_000;

        let mut seen = HashSet::with_capacity(NAMES);
        let mut counts = [0u64; 62];
        for _ in 0..NAMES {
            let name = generate(GENERATED_NAME_LEN).unwrap();
            for b in name.bytes() {
                let idx = ALPHABET.iter().position(|&a| a == b).unwrap();
                counts[idx] += 1;
            }
            assert!(seen.insert(name), "duplicate generated name");
        }

        let total = (NAMES * GENERATED_NAME_LEN) as f64;
        let expected = total / 62.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        // 61 degrees of freedom: mean 61, p < 1e-6 beyond ~130.
        assert!(chi_square < 130.0, "chi-square {chi_square} suggests bias");
    }
}
