//! Deterministic random number generation for synthetic rosters.
//!
//! RULE: Synthetic data never touches a platform RNG. Every stream is
//! derived from one master seed plus a stable stream slot, so the same
//! seed always produces the same roster.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct RosterRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl RosterRng {
    /// Create a stream from the master seed and a stable slot.
    /// The slot index must never change once assigned.
    pub fn new(master_seed: u64, slot: RosterSlot) -> Self {
        let derived_seed = master_seed ^ (slot as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            name: slot.name(),
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n). Returns 0 when `n` is 0.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        if n == 0 {
            return 0;
        }
        self.inner.next_u64() % n
    }

    /// Pick an index into a slice of length `len`.
    pub fn pick(&mut self, len: usize) -> usize {
        self.next_u64_below(len as u64) as usize
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Stable stream slots.
/// NEVER reorder or remove entries. Only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RosterSlot {
    People = 0,
    Shifts = 1,
    Staffing = 2,
    Dirt = 3,
}

impl RosterSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Shifts => "shifts",
            Self::Staffing => "staffing",
            Self::Dirt => "dirt",
        }
    }
}
