//! End-to-end timing runs: key generation, encryption, decryption and the
//! ciphertext-only attack, repeated for a fixed parameter set.
use crate::attack::attack;
use crate::errors::IKKCryptoError;
use crate::keypair::helper::random_vector;
use crate::keypair::keys::generate_keypair;
use crate::keypair::params::IKKParams;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Measurements of one key-generation → encrypt → decrypt → attack run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub keygen: Duration,
    pub encrypt: Duration,
    pub decrypt: Duration,
    pub attack: Duration,
    /// Decryption returned the original plaintext.
    pub decrypted: bool,
    /// The attack left no free coordinates.
    pub attack_unique: bool,
    /// The attack's fixed solution equals the original plaintext.
    pub attack_recovered: bool,
}

/// Per-stage durations collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub keygen: Vec<Duration>,
    pub encrypt: Vec<Duration>,
    pub decrypt: Vec<Duration>,
    pub attack: Vec<Duration>,
}

impl StageTimings {
    fn record(&mut self, outcome: &TrialOutcome) {
        self.keygen.push(outcome.keygen);
        self.encrypt.push(outcome.encrypt);
        self.decrypt.push(outcome.decrypt);
        self.attack.push(outcome.attack);
    }
}

/// Aggregate over `trials` runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialReport {
    pub params: IKKParams,
    pub trials: usize,
    pub timings: StageTimings,
    /// Trials whose attack left a nonzero-dimensional ambiguity.
    pub attack_failures: usize,
    /// Trials where decryption produced a different plaintext.
    pub decryption_mismatches: usize,
    /// Trials aborted by an error in any stage.
    pub errored: usize,
}

impl TrialReport {
    pub fn average_keygen(&self) -> Duration {
        average(&self.timings.keygen)
    }

    pub fn average_encrypt(&self) -> Duration {
        average(&self.timings.encrypt)
    }

    pub fn average_decrypt(&self) -> Duration {
        average(&self.timings.decrypt)
    }

    pub fn average_attack(&self) -> Duration {
        average(&self.timings.attack)
    }

    /// Fraction of completed trials in which the attack was unique.
    pub fn attack_success_rate(&self) -> f64 {
        let completed = self.trials - self.errored;
        if completed == 0 {
            return 0.0;
        }
        (completed - self.attack_failures) as f64 / completed as f64
    }
}

fn average(durations: &[Duration]) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }
    let total = durations.iter().sum::<Duration>().as_nanos();
    let nanos = total / durations.len() as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// Runs a single trial on a uniformly random plaintext.
pub fn run_trial<R: Rng + ?Sized>(
    params: &IKKParams,
    rng: &mut R,
) -> Result<TrialOutcome, IKKCryptoError> {
    let field = params.field()?;

    let started = Instant::now();
    let (pk, sk) = generate_keypair(params, rng)?;
    let keygen = started.elapsed();

    let u = random_vector(params.dimension, &field, rng);

    let started = Instant::now();
    let ct = pk.encrypt(&u, rng)?;
    let encrypt = started.elapsed();

    let started = Instant::now();
    let decrypted = sk.decrypt(&ct)?;
    let decrypt = started.elapsed();

    let started = Instant::now();
    let outcome = attack(&pk, &ct)?;
    let attack = started.elapsed();

    Ok(TrialOutcome {
        keygen,
        encrypt,
        decrypt,
        attack,
        decrypted: decrypted == u,
        attack_unique: outcome.is_unique(),
        attack_recovered: outcome.u_fixed == u,
    })
}

/// Runs `trials` independent trials. Failing trials are counted in
/// [`TrialReport::errored`] and contribute no timings.
pub fn run_trials<R: Rng + ?Sized>(params: &IKKParams, trials: usize, rng: &mut R) -> TrialReport {
    let mut report = TrialReport {
        params: *params,
        trials,
        timings: StageTimings::default(),
        attack_failures: 0,
        decryption_mismatches: 0,
        errored: 0,
    };

    for trial in 0..trials {
        match run_trial(params, rng) {
            Ok(outcome) => {
                report.timings.record(&outcome);
                if !outcome.attack_unique {
                    report.attack_failures += 1;
                }
                if !outcome.decrypted {
                    report.decryption_mismatches += 1;
                }
            }
            Err(err) => {
                warn!(trial, %err, "trial aborted");
                report.errored += 1;
            }
        }
    }

    info!(
        q = params.modulus,
        n = params.code_length,
        k = params.dimension,
        trials,
        keygen = ?report.average_keygen(),
        encrypt = ?report.average_encrypt(),
        decrypt = ?report.average_decrypt(),
        attack = ?report.average_attack(),
        failures = report.attack_failures,
        errored = report.errored,
        "trial run finished"
    );

    report
}
