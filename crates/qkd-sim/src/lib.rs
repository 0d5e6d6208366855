//! `qkd-sim`: qubit register simulation for quantum key distribution.
//!
//! The engine models a register of independent qubits, each held as an
//! explicit amplitude pair `(α, β)`:
//!
//! - **Gates**: the closed [`Gate`] set (identity, Pauli-X, Hadamard)
//!   applied as 2×2 unitaries
//! - **Noise**: a per-gate depolarizing [`NoiseChannel`]
//! - **Measurement**: independent Bernoulli(|β|²) collapse of every qubit,
//!   see [`measure()`]
//!
//! All randomness comes from a caller-supplied `rand::Rng`, so seeding the
//! generator makes a run reproducible.
//!
//! # Quick start
//!
//! ```rust
//! use qkd_sim::{Gate, QuantumRegister, measure};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! // |0⟩ → H → H → |0⟩, |0⟩ → X → |1⟩
//! let mut reg = QuantumRegister::new(2).unwrap();
//! reg.apply_gate(0, Gate::Hadamard).unwrap();
//! reg.apply_gate(0, Gate::Hadamard).unwrap();
//! reg.apply_gate(1, Gate::PauliX).unwrap();
//!
//! let outcome = measure(reg, &mut rng).unwrap();
//! assert_eq!(outcome.bits(), &[0, 1]);
//! ```

pub mod error;
pub mod gate;
pub mod measure;
pub mod noise;
pub mod qubit;
pub mod register;

pub use error::{SimError, SimResult};
pub use gate::Gate;
pub use measure::{MeasurementOutcome, measure, measure_qubit};
pub use noise::NoiseChannel;
pub use qubit::QubitState;
pub use register::QuantumRegister;
