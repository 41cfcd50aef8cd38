//! Fixed-size bank of HyperLogLog registers.
//!
//! Each register holds the maximum rank observed among all keys whose hash
//! mapped to its index. The bank is sized once at construction and never
//! grows, shrinks, or decreases a register value afterwards.

/// Fixed-length register storage with max-aggregation updates.
#[derive(Clone)]
pub(crate) struct RegisterBank {
    registers: Box<[u8]>,
}

impl RegisterBank {
    /// Create a bank of `m` registers, all set to 0.
    pub(crate) fn new(m: usize) -> Self {
        Self {
            registers: vec![0u8; m].into_boxed_slice(),
        }
    }

    /// Number of registers in the bank.
    pub(crate) fn len(&self) -> usize {
        self.registers.len()
    }

    /// Update register `idx` to `max(current, rank)`.
    #[inline]
    pub(crate) fn update(&mut self, idx: usize, rank: u8) {
        let register = &mut self.registers[idx];
        if rank > *register {
            *register = rank;
        }
    }

    /// Harmonic-style sum `S = Σ 2^(-register)` over all registers.
    ///
    /// Every register contributes at least `2^0 = 1`, so the sum is always
    /// at least the register count and never zero.
    pub(crate) fn harmonic_sum(&self) -> f64 {
        self.registers
            .iter()
            .map(|&r| 1.0 / ((1u64 << r) as f64))
            .sum()
    }

    /// Number of registers still at their initial value 0.
    pub(crate) fn zeros(&self) -> usize {
        self.registers.iter().filter(|&&r| r == 0).count()
    }

    /// View of the raw register values.
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.registers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bank_is_zeroed() {
        let bank = RegisterBank::new(16);
        assert_eq!(bank.len(), 16);
        assert_eq!(bank.zeros(), 16);
        assert!(bank.as_slice().iter().all(|&r| r == 0));
    }

    #[test]
    fn test_update_keeps_maximum() {
        let mut bank = RegisterBank::new(4);
        bank.update(2, 5);
        assert_eq!(bank.as_slice(), &[0, 0, 5, 0]);

        // a smaller rank must not lower the register
        bank.update(2, 3);
        assert_eq!(bank.as_slice(), &[0, 0, 5, 0]);

        bank.update(2, 7);
        assert_eq!(bank.as_slice(), &[0, 0, 7, 0]);
    }

    #[test]
    fn test_harmonic_sum_and_zeros() {
        let mut bank = RegisterBank::new(4);
        bank.update(1, 1);
        bank.update(2, 2);
        // registers are [0, 1, 2, 0]: S = 1 + 1/2 + 1/4 + 1 = 2.75
        assert_eq!(bank.harmonic_sum(), 2.75);
        assert_eq!(bank.zeros(), 2);
    }

    #[test]
    fn test_empty_bank_sums_to_register_count() {
        let bank = RegisterBank::new(64);
        assert_eq!(bank.harmonic_sum(), 64.0);
    }
}
