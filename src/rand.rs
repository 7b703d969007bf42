//! Deterministic "random" bytes.
//!
//! Proof generation requires every run of a program to be bit-exact, so the board has no
//! entropy to offer. Requests for random bytes are answered with a fixed pattern,
//! `byte[i] = i mod 256`, which keeps the interface contract (the call always succeeds and
//! fills the whole buffer) while giving up on unpredictability entirely.
//!
//! **This is not a source of randomness.** Anything deriving keys, nonces or other secrets
//! from it is broken. On the target the first request is reported on the console.

/// Fills `buf` with the deterministic byte pattern.
pub fn fill(buf: &mut [u8]) {
    for (i, b) in buf.iter_mut().enumerate() {
        *b = (i & 0xff) as u8;
    }
}

/// Prepares the random source. There is nothing to seed.
pub fn init() {}
