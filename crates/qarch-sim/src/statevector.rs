//! Statevector simulation engine.

use std::collections::BTreeMap;

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use qarch_ir::{Gate, GateMatrix, GateOperation, QubitId};

use crate::config::SimConfig;
use crate::error::{EngineError, EngineResult};

/// A statevector representing a quantum state.
///
/// Basis index `i` has qubit `q` in state `(i >> q) & 1`, so qubit 0 is the
/// least significant bit.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: u32,
    tolerance: f64,
    check_normalization: bool,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// Fails with [`EngineError::CapacityExceeded`] before any amplitude
    /// storage is allocated when `num_qubits` is above the configured limit.
    pub fn new(num_qubits: u32, config: &SimConfig) -> EngineResult<Self> {
        let max = config.qubit_limit();
        if num_qubits > max {
            return Err(EngineError::CapacityExceeded {
                requested: num_qubits,
                max,
            });
        }

        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
            tolerance: config.tolerance,
            check_normalization: config.check_normalization,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The raw amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply a circuit operation.
    pub fn apply_operation(&mut self, op: &GateOperation) -> EngineResult<()> {
        self.apply(&op.gate, &op.targets)
    }

    /// Apply `gate` to `targets`, in the gate's matrix order.
    pub fn apply(&mut self, gate: &Gate, targets: &[QubitId]) -> EngineResult<()> {
        let arity = gate.num_qubits() as usize;
        if targets.len() != arity {
            return Err(EngineError::ArityMismatch {
                gate: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: targets.len(),
            });
        }

        let mut seen = 0usize;
        for target in targets {
            let mask = 1usize << target.0.min(usize::BITS - 1);
            if target.0 >= self.num_qubits || seen & mask != 0 {
                return Err(EngineError::InvalidTarget {
                    qubit: target.0,
                    gate: gate.name().to_string(),
                    num_qubits: self.num_qubits,
                });
            }
            seen |= mask;
        }

        if *gate != Gate::I {
            let qubits: Vec<usize> = targets.iter().map(|q| q.index()).collect();
            self.apply_matrix(&gate.matrix(), &qubits);
        }
        trace!(gate = gate.name(), ?targets, "applied");

        if self.check_normalization {
            let norm_sqr = self.norm_sqr();
            if (norm_sqr - 1.0).abs() > self.tolerance {
                return Err(EngineError::NormalizationError {
                    norm_sqr,
                    gate: gate.name().to_string(),
                    tolerance: self.tolerance,
                });
            }
        }
        Ok(())
    }

    /// Left-multiply every target sub-vector by `matrix`.
    ///
    /// Local index bit `k-1-j` of the matrix corresponds to `qubits[j]`: the
    /// first target is the most significant.
    fn apply_matrix(&mut self, matrix: &GateMatrix, qubits: &[usize]) {
        let k = qubits.len();
        let dim = 1usize << k;

        let offsets: Vec<usize> = (0..dim)
            .map(|local| {
                qubits
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (local >> (k - 1 - j)) & 1 == 1)
                    .fold(0usize, |acc, (_, &q)| acc | (1usize << q))
            })
            .collect();
        let target_mask = offsets[dim - 1];

        let mut local = vec![Complex64::new(0.0, 0.0); dim];
        for base in 0..self.amplitudes.len() {
            if base & target_mask != 0 {
                continue;
            }
            for (slot, &off) in local.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | off];
            }
            for (row, &off) in offsets.iter().enumerate() {
                let mut acc = Complex64::new(0.0, 0.0);
                for (col, &amp) in local.iter().enumerate() {
                    acc += matrix[[row, col]] * amp;
                }
                self.amplitudes[base | off] = acc;
            }
        }
    }

    /// Squared norm of the state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Get the probability distribution.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Sample one basis state, reproducibly for a given seed.
    pub fn sample(&self, seed: u64) -> usize {
        let mut rng = StdRng::seed_from_u64(seed);
        self.sample_with_rng(&mut rng)
    }

    /// Sample one basis state by inverting the cumulative distribution.
    pub fn sample_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();
        let mut cumulative = 0.0;
        let mut last_possible = 0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sqr();
            if p > 0.0 {
                last_possible = i;
            }
            cumulative += p;
            if r < cumulative {
                return i;
            }
        }
        // Rounding left the total just under r.
        last_possible
    }

    /// Histogram of `shots` samples keyed by bit-string.
    pub fn sample_counts(&self, shots: u32, seed: u64) -> BTreeMap<String, u32> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counts = BTreeMap::new();
        for _ in 0..shots {
            let outcome = self.sample_with_rng(&mut rng);
            *counts
                .entry(self.outcome_to_bitstring(outcome))
                .or_insert(0) += 1;
        }
        counts
    }

    /// Format a basis index as a bit-string, qubit 0 rightmost.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        bitstring(outcome, self.num_qubits)
    }
}

/// Format `index` as an `n`-character bit-string with qubit 0 rightmost.
pub fn bitstring(index: usize, num_qubits: u32) -> String {
    if num_qubits == 0 {
        return String::new();
    }
    format!("{index:0width$b}", width = num_qubits as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::FRAC_1_SQRT_2;

    fn state(n: u32) -> Statevector {
        Statevector::new(n, &SimConfig::default()).unwrap()
    }

    fn assert_probs(sv: &Statevector, expected: &[f64]) {
        let probs = sv.probabilities();
        assert_eq!(probs.len(), expected.len());
        for (got, want) in probs.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "got {probs:?}, want {expected:?}");
        }
    }

    #[test]
    fn test_initial_state() {
        let sv = state(2);
        assert_eq!(sv.num_qubits(), 2);
        assert_probs(&sv, &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_x_gate() {
        let mut sv = state(1);
        sv.apply(&Gate::X, &[QubitId(0)]).unwrap();
        assert_probs(&sv, &[0.0, 1.0]);
    }

    #[test]
    fn test_h_gate() {
        let mut sv = state(1);
        sv.apply(&Gate::H, &[QubitId(0)]).unwrap();
        assert!((sv.amplitudes()[0].re - FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((sv.amplitudes()[1].re - FRAC_1_SQRT_2).abs() < 1e-12);

        sv.apply(&Gate::H, &[QubitId(0)]).unwrap();
        assert_probs(&sv, &[1.0, 0.0]);
    }

    #[test]
    fn test_bell_state() {
        let mut sv = state(2);
        sv.apply(&Gate::H, &[QubitId(0)]).unwrap();
        sv.apply(&Gate::CX, &[QubitId(0), QubitId(1)]).unwrap();
        assert_probs(&sv, &[0.5, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_cx_control_order() {
        // Control on q1, which is still |0⟩: nothing happens.
        let mut sv = state(2);
        sv.apply(&Gate::X, &[QubitId(0)]).unwrap();
        sv.apply(&Gate::CX, &[QubitId(1), QubitId(0)]).unwrap();
        assert_probs(&sv, &[0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_toffoli() {
        let mut sv = state(3);
        sv.apply(&Gate::X, &[QubitId(0)]).unwrap();
        sv.apply(&Gate::X, &[QubitId(2)]).unwrap();
        sv.apply(&Gate::CCX, &[QubitId(0), QubitId(2), QubitId(1)])
            .unwrap();
        // |111⟩
        assert!((sv.probabilities()[7] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_swap() {
        let mut sv = state(2);
        sv.apply(&Gate::X, &[QubitId(1)]).unwrap();
        sv.apply(&Gate::Swap, &[QubitId(0), QubitId(1)]).unwrap();
        assert_probs(&sv, &[0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_arity_mismatch() {
        let mut sv = state(2);
        let err = sv.apply(&Gate::CX, &[QubitId(0)]).unwrap_err();
        assert_eq!(
            err,
            EngineError::ArityMismatch {
                gate: "cx".into(),
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_invalid_targets() {
        let mut sv = state(2);
        assert!(matches!(
            sv.apply(&Gate::H, &[QubitId(2)]),
            Err(EngineError::InvalidTarget { qubit: 2, .. })
        ));
        assert!(matches!(
            sv.apply(&Gate::CZ, &[QubitId(1), QubitId(1)]),
            Err(EngineError::InvalidTarget { qubit: 1, .. })
        ));
        assert!(matches!(
            sv.apply(&Gate::X, &[QubitId(u32::MAX)]),
            Err(EngineError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_normalization_drift_detected() {
        let config = SimConfig {
            tolerance: 1e-18,
            ..SimConfig::default()
        };
        let mut sv = Statevector::new(1, &config).unwrap();
        let err = sv.apply(&Gate::H, &[QubitId(0)]).unwrap_err();
        match &err {
            EngineError::NormalizationError {
                norm_sqr,
                gate,
                tolerance,
            } => {
                assert_eq!(gate, "h");
                assert!((norm_sqr - 1.0).abs() > *tolerance);
            }
            other => panic!("expected NormalizationError, got {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("drifted by"), "{message}");
        assert!(message.contains("e-16"), "{message}");
    }

    #[test]
    fn test_normalization_check_can_be_disabled() {
        let config = SimConfig {
            tolerance: 1e-18,
            check_normalization: false,
            ..SimConfig::default()
        };
        let mut sv = Statevector::new(1, &config).unwrap();
        assert!(sv.apply(&Gate::H, &[QubitId(0)]).is_ok());
    }

    #[test]
    fn test_capacity_exceeded() {
        let config = SimConfig::default().with_max_qubits(4);
        let err = Statevector::new(5, &config).unwrap_err();
        assert_eq!(
            err,
            EngineError::CapacityExceeded {
                requested: 5,
                max: 4
            }
        );
    }

    #[test]
    fn test_sample_deterministic() {
        // |1⟩ state should always sample to 1
        let mut sv = state(1);
        sv.apply(&Gate::X, &[QubitId(0)]).unwrap();
        for seed in 0..100 {
            assert_eq!(sv.sample(seed), 1);
        }
    }

    #[test]
    fn test_sample_reproducible() {
        let mut sv = state(3);
        for q in 0..3 {
            sv.apply(&Gate::H, &[QubitId(q)]).unwrap();
        }
        assert_eq!(sv.sample(42), sv.sample(42));
        assert_eq!(sv.sample_counts(64, 7), sv.sample_counts(64, 7));
        assert_eq!(sv.sample_counts(64, 7).values().sum::<u32>(), 64);
    }

    #[test]
    fn test_bitstring() {
        let sv = state(3);
        assert_eq!(sv.outcome_to_bitstring(1), "001");
        assert_eq!(sv.outcome_to_bitstring(6), "110");
        assert_eq!(bitstring(0, 0), "");
    }
}
