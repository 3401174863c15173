//! Deterministic pseudo-random number generation for resampling.
//!
//! All resampling routines draw from an explicit [`SeededRng`] rather than a
//! global source, so the same seed always reproduces the same bootstrap and
//! permutation draws. The generator is xorshift64: fast, tiny state, and
//! more than adequate for resampling indices.

/// Xorshift64 generator with explicit state.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator from `seed`. Zero is remapped to 1 since the
    /// xorshift state must be non-zero.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform draw in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    pub fn next_index(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Draw `k` indices from `[0, n)` with replacement.
    pub fn sample_with_replacement(&mut self, k: usize, n: usize) -> Vec<usize> {
        (0..k).map(|_| self.next_index(n)).collect()
    }

    /// Draw `k` distinct indices from `[0, n)` via a partial Fisher-Yates
    /// shuffle. `k` must not exceed `n`.
    pub fn sample_without_replacement(&mut self, k: usize, n: usize) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = i + self.next_index(n - i);
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool
    }

    /// Shuffle `items` in place (full Fisher-Yates).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        let n = items.len();
        for i in (1..n).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
