//! BB84 protocol driver.
//!
//! A run goes through fixed stages, each executed exactly once:
//!
//! 1. **Random generation**: Alice draws bits `a` and bases `b`, Bob draws
//!    bases `b'`, all uniform over {0, 1}.
//! 2. **Encoding**: qubit `i` gets X if `a[i] = 1`, then H if `b[i]` is the
//!    Hadamard basis.
//! 3. **Measurement basis change**: H on qubit `i` if `b'[i]` is the
//!    Hadamard basis.
//! 4. **Measurement**: one pass over the register gives Bob's bits `k`.
//! 5. **Sifting**: keep `(a[i], k[i])` wherever `b[i] = b'[i]`.
//!
//! When noise is enabled the depolarizing channel follows every X and H.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

use qkd_sim::{Gate, NoiseChannel, QuantumRegister, measure};

use crate::basis::Basis;
use crate::config::Bb84Config;
use crate::error::{ProtocolError, ProtocolResult};
use crate::record::ProtocolRecord;
use crate::sifting::{SiftedKey, check_len, sift};

/// The parties' classical random choices for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyChoices {
    sender_bits: Vec<u8>,
    sender_bases: Vec<Basis>,
    receiver_bases: Vec<Basis>,
}

impl PartyChoices {
    /// Bundle explicit choices.
    ///
    /// # Errors
    /// [`ProtocolError::LengthMismatch`] if the sequences differ in length,
    /// [`ProtocolError::InvalidBit`] if a sender bit is not 0 or 1.
    pub fn new(
        sender_bits: Vec<u8>,
        sender_bases: Vec<Basis>,
        receiver_bases: Vec<Basis>,
    ) -> ProtocolResult<Self> {
        let n = sender_bits.len();
        check_len("sender bases", n, sender_bases.len())?;
        check_len("receiver bases", n, receiver_bases.len())?;
        if let Some((index, &value)) = sender_bits.iter().enumerate().find(|(_, b)| **b > 1) {
            return Err(ProtocolError::InvalidBit { index, value });
        }
        Ok(Self {
            sender_bits,
            sender_bases,
            receiver_bases,
        })
    }

    /// Bundle choices given as 0/1 sequences (`a`, `b`, `b'`).
    pub fn from_bits(
        sender_bits: &[u8],
        sender_bases: &[u8],
        receiver_bases: &[u8],
    ) -> ProtocolResult<Self> {
        Self::new(
            sender_bits.to_vec(),
            bases_from_bits(sender_bases)?,
            bases_from_bits(receiver_bases)?,
        )
    }

    /// Draw `n` uniform choices for each sequence.
    ///
    /// All of `a` is drawn first, then `b`, then `b'`.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let sender_bits = (0..n).map(|_| rng.gen_range(0..2)).collect();
        let sender_bases = (0..n).map(|_| Basis::random(rng)).collect();
        let receiver_bases = (0..n).map(|_| Basis::random(rng)).collect();
        Self {
            sender_bits,
            sender_bases,
            receiver_bases,
        }
    }

    /// Number of qubits these choices describe.
    pub fn len(&self) -> usize {
        self.sender_bits.len()
    }

    /// True for zero-length choices.
    pub fn is_empty(&self) -> bool {
        self.sender_bits.is_empty()
    }

    /// Alice's bits `a`.
    pub fn sender_bits(&self) -> &[u8] {
        &self.sender_bits
    }

    /// Alice's bases `b`.
    pub fn sender_bases(&self) -> &[Basis] {
        &self.sender_bases
    }

    /// Bob's bases `b'`.
    pub fn receiver_bases(&self) -> &[Basis] {
        &self.receiver_bases
    }
}

fn bases_from_bits(bits: &[u8]) -> ProtocolResult<Vec<Basis>> {
    bits.iter()
        .enumerate()
        .map(|(index, &value)| match value {
            0 | 1 => Ok(Basis::from_bit(value)),
            _ => Err(ProtocolError::InvalidBit { index, value }),
        })
        .collect()
}

/// A register ready for measurement.
#[derive(Debug, Clone)]
pub struct PreparedRegister {
    /// Encoded and basis-rotated qubits.
    pub register: QuantumRegister,
    /// Depolarizing errors that fired while building it.
    pub noise_events: usize,
}

/// BB84 driver for a fixed configuration.
#[derive(Debug, Clone)]
pub struct Bb84Protocol {
    config: Bb84Config,
    noise: NoiseChannel,
}

impl Bb84Protocol {
    /// Validate `config` and build the noise channel.
    pub fn new(config: Bb84Config) -> ProtocolResult<Self> {
        config.validate()?;
        let noise = config.noise.channel()?;
        Ok(Self { config, noise })
    }

    /// The configuration in force.
    pub fn config(&self) -> &Bb84Config {
        &self.config
    }

    /// The channel attached to X and H.
    pub fn noise(&self) -> &NoiseChannel {
        &self.noise
    }

    /// Stage 1: draw both parties' random choices.
    pub fn generate_choices<R: Rng + ?Sized>(&self, rng: &mut R) -> PartyChoices {
        PartyChoices::random(self.config.num_qubits, rng)
    }

    /// Stages 2 and 3: encode Alice's bits and rotate into Bob's bases.
    pub fn prepare<R: Rng + ?Sized>(
        &self,
        choices: &PartyChoices,
        rng: &mut R,
    ) -> ProtocolResult<PreparedRegister> {
        check_len("party choices", self.config.num_qubits, choices.len())?;

        let mut register = QuantumRegister::new(choices.len())?;
        let mut noise_events = 0;

        for (i, (&bit, &basis)) in choices
            .sender_bits
            .iter()
            .zip(&choices.sender_bases)
            .enumerate()
        {
            if bit == 1 {
                noise_events += usize::from(register.apply_gate_with_noise(
                    i,
                    Gate::PauliX,
                    &self.noise,
                    rng,
                )?);
            }
            if basis.needs_hadamard() {
                noise_events += usize::from(register.apply_gate_with_noise(
                    i,
                    Gate::Hadamard,
                    &self.noise,
                    rng,
                )?);
            }
        }

        for (i, basis) in choices.receiver_bases.iter().enumerate() {
            if basis.needs_hadamard() {
                noise_events += usize::from(register.apply_gate_with_noise(
                    i,
                    Gate::Hadamard,
                    &self.noise,
                    rng,
                )?);
            }
        }

        debug!(
            num_qubits = choices.len(),
            noise_events, "prepared register"
        );
        Ok(PreparedRegister {
            register,
            noise_events,
        })
    }

    /// Stage 4: Bob reads out the whole register.
    pub fn measure<R: Rng + ?Sized>(
        &self,
        register: QuantumRegister,
        rng: &mut R,
    ) -> ProtocolResult<Vec<u8>> {
        Ok(measure(register, rng)?.into_bits())
    }

    /// Stage 5: keep the positions where both parties chose the same basis.
    pub fn sift(
        &self,
        choices: &PartyChoices,
        receiver_bits: &[u8],
    ) -> ProtocolResult<SiftedKey> {
        sift(
            &choices.sender_bits,
            &choices.sender_bases,
            &choices.receiver_bases,
            receiver_bits,
        )
    }

    /// Run every stage with choices drawn from `rng`.
    #[instrument(
        skip(self, rng),
        fields(num_qubits = self.config.num_qubits, noise = %self.config.noise)
    )]
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> ProtocolResult<ProtocolRecord> {
        let choices = self.generate_choices(rng);
        self.run_with_choices(choices, rng)
    }

    /// Run stages 2-5 with caller-supplied choices.
    ///
    /// `rng` still drives measurement collapse and noise.
    pub fn run_with_choices<R: Rng + ?Sized>(
        &self,
        choices: PartyChoices,
        rng: &mut R,
    ) -> ProtocolResult<ProtocolRecord> {
        let PreparedRegister {
            register,
            noise_events,
        } = self.prepare(&choices, rng)?;

        let receiver_bits = self.measure(register, rng)?;
        let key = self.sift(&choices, &receiver_bits)?;

        info!(
            sifted = key.len(),
            mismatches = key.mismatches(),
            noise_events,
            "BB84 run complete"
        );

        Ok(ProtocolRecord {
            num_qubits: choices.len(),
            noise: self.config.noise,
            sender_bits: choices.sender_bits,
            sender_bases: choices.sender_bases,
            receiver_bases: choices.receiver_bases,
            receiver_bits,
            key,
            noise_events,
        })
    }

    /// Run with an RNG seeded from `config.seed`, or OS entropy if unset.
    pub fn run_seeded(&self) -> ProtocolResult<ProtocolRecord> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run(&mut rng)
    }
}
