//! Gate library: the closed set of supported gates and their unitaries.
//!
//! Matrices are indexed big-endian in target order: for an operation on
//! targets `[a, b]` the local basis index is `2·bit(a) + bit(b)`. Controlled
//! gates list their controls first, so `CX` on `[c, t]` has the textbook
//! matrix with the X block in the lower-right corner.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use ndarray::{Array2, arr2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// A unitary gate matrix of dimension 2^k × 2^k.
pub type GateMatrix = Array2<Complex64>;

/// Standard gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Identity gate.
    I,
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),

    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled phase gate.
    CP(f64),

    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::I => "id",
            Gate::H => "h",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::T => "t",
            Gate::Tdg => "tdg",
            Gate::SX => "sx",
            Gate::Rx(_) => "rx",
            Gate::Ry(_) => "ry",
            Gate::Rz(_) => "rz",
            Gate::P(_) => "p",
            Gate::CX => "cx",
            Gate::CY => "cy",
            Gate::CZ => "cz",
            Gate::CH => "ch",
            Gate::Swap => "swap",
            Gate::CP(_) => "cp",
            Gate::CCX => "ccx",
            Gate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::I
            | Gate::H
            | Gate::X
            | Gate::Y
            | Gate::Z
            | Gate::S
            | Gate::Sdg
            | Gate::T
            | Gate::Tdg
            | Gate::SX
            | Gate::Rx(_)
            | Gate::Ry(_)
            | Gate::Rz(_)
            | Gate::P(_) => 1,

            Gate::CX | Gate::CY | Gate::CZ | Gate::CH | Gate::Swap | Gate::CP(_) => 2,

            Gate::CCX | Gate::CSwap => 3,
        }
    }

    /// Get the angle parameters of this gate.
    pub fn params(&self) -> Vec<f64> {
        match self {
            Gate::Rx(t) | Gate::Ry(t) | Gate::Rz(t) | Gate::P(t) | Gate::CP(t) => vec![*t],
            _ => vec![],
        }
    }

    /// Build the unitary matrix of this gate.
    pub fn matrix(&self) -> GateMatrix {
        let zero = c(0.0, 0.0);
        let one = c(1.0, 0.0);
        match *self {
            Gate::I => Array2::eye(2),
            Gate::H => {
                let s = c(FRAC_1_SQRT_2, 0.0);
                arr2(&[[s, s], [s, -s]])
            }
            Gate::X => arr2(&[[zero, one], [one, zero]]),
            Gate::Y => arr2(&[[zero, c(0.0, -1.0)], [c(0.0, 1.0), zero]]),
            Gate::Z => diagonal(&[one, -one]),
            Gate::S => diagonal(&[one, c(0.0, 1.0)]),
            Gate::Sdg => diagonal(&[one, c(0.0, -1.0)]),
            Gate::T => diagonal(&[one, Complex64::from_polar(1.0, FRAC_PI_4)]),
            Gate::Tdg => diagonal(&[one, Complex64::from_polar(1.0, -FRAC_PI_4)]),
            Gate::SX => {
                let p = c(0.5, 0.5);
                let m = c(0.5, -0.5);
                arr2(&[[p, m], [m, p]])
            }
            Gate::Rx(theta) => {
                let (s, co) = (theta / 2.0).sin_cos();
                arr2(&[[c(co, 0.0), c(0.0, -s)], [c(0.0, -s), c(co, 0.0)]])
            }
            Gate::Ry(theta) => {
                let (s, co) = (theta / 2.0).sin_cos();
                arr2(&[[c(co, 0.0), c(-s, 0.0)], [c(s, 0.0), c(co, 0.0)]])
            }
            Gate::Rz(theta) => diagonal(&[
                Complex64::from_polar(1.0, -theta / 2.0),
                Complex64::from_polar(1.0, theta / 2.0),
            ]),
            Gate::P(lambda) => diagonal(&[one, Complex64::from_polar(1.0, lambda)]),

            Gate::CX => controlled(&Gate::X.matrix(), 1),
            Gate::CY => controlled(&Gate::Y.matrix(), 1),
            Gate::CZ => controlled(&Gate::Z.matrix(), 1),
            Gate::CH => controlled(&Gate::H.matrix(), 1),
            Gate::CP(lambda) => controlled(&Gate::P(lambda).matrix(), 1),
            Gate::Swap => swap_matrix(),

            Gate::CCX => controlled(&Gate::X.matrix(), 2),
            Gate::CSwap => controlled(&swap_matrix(), 1),
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params();
        if params.is_empty() {
            write!(f, "{}", self.name().to_uppercase())
        } else {
            let rendered: Vec<String> = params.iter().map(|p| format!("{p:.4}")).collect();
            write!(f, "{}({})", self.name().to_uppercase(), rendered.join(", "))
        }
    }
}

#[inline]
fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn diagonal(entries: &[Complex64]) -> GateMatrix {
    Array2::from_diag(&ndarray::Array1::from(entries.to_vec()))
}

fn swap_matrix() -> GateMatrix {
    let mut m = GateMatrix::zeros((4, 4));
    m[[0, 0]] = c(1.0, 0.0);
    m[[1, 2]] = c(1.0, 0.0);
    m[[2, 1]] = c(1.0, 0.0);
    m[[3, 3]] = c(1.0, 0.0);
    m
}

/// Embed `u` as the all-controls-set block of a gate with `controls` extra
/// leading control qubits.
fn controlled(u: &GateMatrix, controls: u32) -> GateMatrix {
    let block = u.nrows();
    let dim = block << controls;
    let mut m = GateMatrix::eye(dim);
    let offset = dim - block;
    for r in 0..block {
        for col in 0..block {
            m[[offset + r, offset + col]] = u[[r, col]];
        }
    }
    m
}

/// Description of one gate-library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateInfo {
    /// Canonical name.
    pub name: &'static str,
    /// Accepted aliases (upper-case).
    pub aliases: &'static [&'static str],
    /// Number of qubits.
    pub num_qubits: u32,
    /// Number of angle parameters.
    pub num_params: usize,
}

const LIBRARY: &[GateInfo] = &[
    info("id", &["I", "ID", "IDENTITY"], 1, 0),
    info("h", &["H", "HADAMARD"], 1, 0),
    info("x", &["X", "NOT"], 1, 0),
    info("y", &["Y"], 1, 0),
    info("z", &["Z"], 1, 0),
    info("s", &["S"], 1, 0),
    info("sdg", &["SDG", "SDAG"], 1, 0),
    info("t", &["T"], 1, 0),
    info("tdg", &["TDG", "TDAG"], 1, 0),
    info("sx", &["SX", "SQRTX"], 1, 0),
    info("rx", &["RX"], 1, 1),
    info("ry", &["RY"], 1, 1),
    info("rz", &["RZ"], 1, 1),
    info("p", &["P", "PHASE"], 1, 1),
    info("cx", &["CX", "CNOT"], 2, 0),
    info("cy", &["CY"], 2, 0),
    info("cz", &["CZ"], 2, 0),
    info("ch", &["CH"], 2, 0),
    info("swap", &["SWAP"], 2, 0),
    info("cp", &["CP", "CPHASE"], 2, 1),
    info("ccx", &["CCX", "CCNOT", "TOFFOLI"], 3, 0),
    info("cswap", &["CSWAP", "FREDKIN"], 3, 0),
];

const fn info(
    name: &'static str,
    aliases: &'static [&'static str],
    num_qubits: u32,
    num_params: usize,
) -> GateInfo {
    GateInfo {
        name,
        aliases,
        num_qubits,
        num_params,
    }
}

/// Fixed lookup from gate names to [`Gate`] values.
pub struct GateLibrary;

impl GateLibrary {
    /// All library entries in canonical order.
    pub fn entries() -> &'static [GateInfo] {
        LIBRARY
    }

    /// Find the library entry for a name or alias (case-insensitive).
    pub fn info(name: &str) -> Option<&'static GateInfo> {
        let upper = name.trim().to_ascii_uppercase();
        LIBRARY.iter().find(|g| g.aliases.contains(&upper.as_str()))
    }

    /// Resolve a gate by name.
    ///
    /// Missing angle parameters are taken as `0.0`; extra parameters are
    /// ignored. Use [`GateInfo::num_params`] to detect the former.
    pub fn lookup(name: &str, params: &[f64]) -> IrResult<Gate> {
        let info = Self::info(name).ok_or_else(|| IrError::UnknownGate(name.to_string()))?;
        let angle = params.first().copied().unwrap_or(0.0);
        let gate = match info.name {
            "id" => Gate::I,
            "h" => Gate::H,
            "x" => Gate::X,
            "y" => Gate::Y,
            "z" => Gate::Z,
            "s" => Gate::S,
            "sdg" => Gate::Sdg,
            "t" => Gate::T,
            "tdg" => Gate::Tdg,
            "sx" => Gate::SX,
            "rx" => Gate::Rx(angle),
            "ry" => Gate::Ry(angle),
            "rz" => Gate::Rz(angle),
            "p" => Gate::P(angle),
            "cx" => Gate::CX,
            "cy" => Gate::CY,
            "cz" => Gate::CZ,
            "ch" => Gate::CH,
            "swap" => Gate::Swap,
            "cp" => Gate::CP(angle),
            "ccx" => Gate::CCX,
            "cswap" => Gate::CSwap,
            other => return Err(IrError::UnknownGate(other.to_string())),
        };
        Ok(gate)
    }

    /// Resolve a gate by name and return its unitary.
    pub fn matrix(name: &str, params: &[f64]) -> IrResult<GateMatrix> {
        Self::lookup(name, params).map(|g| g.matrix())
    }
}
