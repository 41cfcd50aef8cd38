//! Streaming cardinality estimator over a fixed bank of HyperLogLog registers,
//! defined with a const `P` parameter:
//! - `P`: precision parameter in [4..18] range, which defines the number of hash
//!   bits used for register indices; the bank holds `M = 2^P` registers.
//!
//! Each inserted key is hashed to a 64-bit pattern. The top `P` bits select a
//! register and the rank of the remaining `W = 64 - P` bits (leading zeros plus
//! one, capped at `W + 1`) is max-aggregated into it. Estimation recomputes the
//! harmonic sum of all registers on every request:
//!
//! - raw estimate `E = α·M²/S` with the fixed bias constant `α = 0.709`,
//! - small-range: for `E ≤ 2.5·M` with `Z > 0` zero registers, linear counting
//!   `M·ln(M/Z)` replaces the raw estimate,
//! - large-range: for `E > 2^32/30`, the saturation correction
//!   `-2^32·ln(1 - E/2^32)` replaces it, skipped once `E ≥ 2^32` leaves the
//!   logarithm's domain.
//!
//! Expected relative error is about `1.04 / sqrt(2^P)`:
//! P = 4:  1.04 / sqrt(2^4)  = 26%
//! P = 10: 1.04 / sqrt(2^10) = 3.25%
//! P = 12: 1.04 / sqrt(2^12) = 1.62%
//!
//! The estimator performs no I/O and has no failure paths; memory is fixed at
//! `M` one-byte registers for its entire lifetime. Access is exclusive-owner,
//! single-threaded; callers needing concurrent ingestion must serialize
//! externally.

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};
use std::marker::PhantomData;
use std::mem::size_of;

use wyhash::WyHash;

use crate::registers::RegisterBank;

/// Fixed bias-correction constant calibrated for this register-count regime.
const ALPHA: f64 = 0.709;
/// Hash-space size used by the large-range saturation correction.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Streaming estimator of the number of distinct keys of type `T`.
///
/// Keys are hashed through `H` (any `Hasher + Default`); estimation quality
/// assumes the hash distributes bits uniformly, which is not verified here.
pub struct HyperLogLog<T: Hash + ?Sized, H: Hasher + Default = WyHash, const P: usize = 12> {
    /// Fixed bank of `2^P` rank registers
    registers: RegisterBank,
    /// Most recently computed estimate; 0 until `compute_cardinality` runs
    cardinality: usize,
    /// Zero-sized build hasher
    build_hasher: BuildHasherDefault<H>,
    _phantom: PhantomData<T>,
}

impl<T: Hash + ?Sized, H: Hasher + Default, const P: usize> HyperLogLog<T, H, P> {
    /// Ensure that `P` is in correct range at compile time
    const VALID_PARAMS: () = assert!(P >= 4 && P <= 18);
    /// Number of registers
    const M: usize = 1 << P;
    /// Number of hash bits measured for the rank
    const W: usize = 64 - P;

    /// Creates new instance of `HyperLogLog` with all registers at 0.
    #[inline]
    pub fn new() -> Self {
        // compile time check of params
        _ = Self::VALID_PARAMS;

        Self {
            registers: RegisterBank::new(Self::M),
            cardinality: 0,
            build_hasher: BuildHasherDefault::default(),
            _phantom: PhantomData,
        }
    }

    /// Insert a key into the estimator.
    ///
    /// Updates at most one register and never lowers it. The stored estimate
    /// is left untouched until the next [`compute_cardinality`] call.
    ///
    /// [`compute_cardinality`]: Self::compute_cardinality
    #[inline]
    pub fn insert(&mut self, item: &T) {
        let mut hasher = self.build_hasher.build_hasher();
        item.hash(&mut hasher);
        self.insert_hash(hasher.finish());
    }

    /// Insert an already computed 64-bit hash into the estimator.
    #[inline]
    pub fn insert_hash(&mut self, hash: u64) {
        let (idx, rank) = Self::index_and_rank(hash);
        self.registers.update(idx, rank);
    }

    /// Recompute the cardinality estimate from the current register state,
    /// store it, and return it.
    ///
    /// Always recomputed in full (O(M)); repeated calls without intervening
    /// inserts return the same value.
    pub fn compute_cardinality(&mut self) -> usize {
        let m = Self::M as f64;
        let sum = self.registers.harmonic_sum();
        let mut estimate = ALPHA * m * m / sum;

        if estimate <= 2.5 * m {
            // sparse regime: linear counting over the zero registers,
            // unless every register has been touched already
            let zeros = self.registers.zeros();
            if zeros > 0 {
                estimate = m * (m / (zeros as f64)).ln();
            }
        } else if estimate > TWO_POW_32 / 30.0 && estimate < TWO_POW_32 {
            // near hash-space saturation: correct for collision undercounting;
            // past 2^32 the logarithm leaves its domain and the raw estimate stands
            estimate = -TWO_POW_32 * (1.0 - estimate / TWO_POW_32).ln();
        }

        self.cardinality = estimate as usize;
        self.cardinality
    }

    /// Return the most recently computed estimate without recomputing.
    #[inline]
    pub fn get_cardinality(&self) -> usize {
        self.cardinality
    }

    /// Return memory size of `HyperLogLog`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.len()
    }

    /// Split a hash into a register index (top `P` bits) and the rank of the
    /// remaining `W` bits.
    ///
    /// The rank is the number of leading zeros of the suffix plus one, capped
    /// at `W + 1` for an all-zero suffix. An all-zero hash therefore lands in
    /// register 0 with the maximum rank rather than falling out of bounds.
    #[inline]
    fn index_and_rank(hash: u64) -> (usize, u8) {
        let idx = (hash >> (64 - P)) as usize;
        let suffix = hash << P;
        let rank = (suffix.leading_zeros() as usize + 1).min(Self::W + 1) as u8;
        (idx, rank)
    }
}

impl<T: Hash + ?Sized, H: Hasher + Default, const P: usize> Default for HyperLogLog<T, H, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + ?Sized, H: Hasher + Default, const P: usize> Clone for HyperLogLog<T, H, P> {
    fn clone(&self) -> Self {
        Self {
            registers: self.registers.clone(),
            cardinality: self.cardinality,
            build_hasher: BuildHasherDefault::default(),
            _phantom: PhantomData,
        }
    }
}

impl<T: Hash + ?Sized, H: Hasher + Default, const P: usize> PartialEq for HyperLogLog<T, H, P> {
    /// Compare estimators by register state
    fn eq(&self, rhs: &Self) -> bool {
        self.registers.as_slice() == rhs.registers.as_slice()
    }
}

impl<T: Hash + ?Sized, H: Hasher + Default, const P: usize> Debug for HyperLogLog<T, H, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ registers: {}, cardinality: {}, size: {} }}",
            Self::M,
            self.cardinality,
            self.size_of()
        )
    }
}
