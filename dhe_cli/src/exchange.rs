use dhe_crypto::{
    DomainParameters, Error, GeneratorConfig, ParameterGenerator, Participant, Result,
    DEFAULT_MODULUS_BITS,
};
use num_bigint::BigUint;
use std::sync::Arc;
use std::time::Duration;

/// Settings for one exchange run. `verbose` controls whether the report is printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeConfig {
    pub verbose: bool,
    pub bits: u64,
    pub safe_prime: bool,
    pub named_group: bool,
    pub deadline: Option<Duration>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            bits: DEFAULT_MODULUS_BITS,
            safe_prime: false,
            named_group: false,
            deadline: None,
        }
    }
}

/// Everything observable from one exchange between an initiator and a responder.
#[derive(Debug)]
pub struct ExchangeReport {
    pub parameters: Arc<DomainParameters>,
    pub initiator_public: BigUint,
    pub responder_public: BigUint,
    pub initiator_secret: BigUint,
    pub responder_secret: BigUint,
}

impl ExchangeReport {
    pub fn keys_match(&self) -> bool {
        self.initiator_secret == self.responder_secret
    }

    pub fn render(&self) -> String {
        let hex = |value: &BigUint| hex::encode(value.to_bytes_be());
        [
            format!("Parameters: {}", self.parameters),
            format!("Responder's public key: {}", hex(&self.responder_public)),
            format!("Initiator's public key: {}", hex(&self.initiator_public)),
            format!("Initiator's computed shared key: {}", hex(&self.initiator_secret)),
            format!("Responder's computed shared key: {}", hex(&self.responder_secret)),
            format!("Do the keys match? {}", self.keys_match()),
        ]
        .join("\n")
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EndToEndSummary {
    pub passed: u32,
    pub failed: u32,
}

impl EndToEndSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

fn load_parameters(config: &ExchangeConfig) -> Result<DomainParameters> {
    if config.named_group {
        return Ok(DomainParameters::rfc3526_group14());
    }
    let mut generator_config = GeneratorConfig::default()
        .with_min_bits(config.bits)
        .with_safe_prime(config.safe_prime);
    if let Some(deadline) = config.deadline {
        generator_config = generator_config.with_deadline(deadline);
    }
    Ok(ParameterGenerator::new(generator_config).generate_default()?)
}

/// Generates (or loads) parameters, runs both sides of the exchange and reports the outcome.
pub fn run_exchange(config: &ExchangeConfig) -> Result<ExchangeReport> {
    log::info!("Beginning a Diffie-Hellman exchange...");
    let parameters = Arc::new(load_parameters(config)?);
    log::info!("Parameters: {}", parameters);

    let responder = Participant::responder(parameters.clone())?;
    let initiator = Participant::initiator(parameters.clone())?;

    let initiator_secret = initiator.compute_shared_key(&responder.public_key())?;
    let responder_secret = responder.compute_shared_key(&initiator.public_key())?;

    let report = ExchangeReport {
        parameters,
        initiator_public: initiator.public_key(),
        responder_public: responder.public_key(),
        initiator_secret,
        responder_secret,
    };

    if config.verbose {
        println!("{}", report.render());
    }
    log::info!("Diffie-Hellman exchange completed");
    Ok(report)
}

/// Runs the exchange `iterations` times.
///
/// A rejected peer key counts as a failed run; any other error ends the session.
pub fn run_end_to_end(config: &ExchangeConfig, iterations: u32) -> Result<EndToEndSummary> {
    let mut summary = EndToEndSummary::default();

    for i in 1..=iterations {
        if config.verbose {
            println!("\n===== [{}/{}] =====", i, iterations);
        }
        match run_exchange(config) {
            Ok(report) if report.keys_match() => summary.passed += 1,
            Ok(_) => {
                log::warn!("run {} derived different secrets", i);
                summary.failed += 1;
            }
            Err(Error::InvalidPeerKey(e)) => {
                log::warn!("run {} rejected a peer key: {}", i, e);
                summary.failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    println!("Tests Complete! Passed: {}, Failed: {}", summary.passed, summary.failed);
    Ok(summary)
}
