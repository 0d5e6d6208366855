//! `qkd-bb84`: BB84 quantum key distribution on top of `qkd-sim`.
//!
//! Alice encodes random bits in random bases, Bob measures in his own
//! random bases, and both keep the positions where the bases agree. With
//! the optional depolarizing channel enabled the sifted keys diverge at a
//! rate close to [`batch::predicted_qber`].
//!
//! # Quick start
//!
//! ```rust
//! use qkd_bb84::{Bb84Config, Bb84Protocol, PartyChoices};
//! use rand::SeedableRng;
//!
//! let protocol = Bb84Protocol::new(Bb84Config::default().with_num_qubits(4)).unwrap();
//! let choices = PartyChoices::from_bits(&[1, 0, 1, 1], &[0, 1, 1, 0], &[0, 0, 1, 1]).unwrap();
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let record = protocol.run_with_choices(choices, &mut rng).unwrap();
//!
//! assert_eq!(record.key.indices, vec![0, 2]);
//! assert_eq!(record.key.sender, vec![1, 1]);
//! assert_eq!(record.key.receiver, vec![1, 1]);
//! ```

pub mod basis;
pub mod batch;
pub mod config;
pub mod error;
pub mod protocol;
pub mod record;
pub mod sifting;

pub use basis::Basis;
pub use batch::{BatchSummary, predicted_qber, run_batch, run_batch_with};
pub use config::{Bb84Config, DEFAULT_NOISE_PROBABILITY, DEFAULT_NUM_QUBITS, NoiseSetting};
pub use error::{ProtocolError, ProtocolResult};
pub use protocol::{Bb84Protocol, PartyChoices, PreparedRegister};
pub use record::ProtocolRecord;
pub use sifting::{SiftedKey, sift};
