use crate::exchange::ExchangeConfig;
use clap::{Args, Parser, Subcommand};
use dhe_crypto::DEFAULT_MODULUS_BITS;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "dhe",
    version,
    about = "Diffie-Hellman key exchange between two local participants"
)]
pub struct Cli {
    /// Print parameters, public keys and derived secrets
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single exchange and report whether both sides agree
    Exchange(ExchangeArgs),
    /// Repeat the exchange and tally passed and failed runs
    EndToEnd {
        #[arg(short = 'n', long, default_value_t = 20)]
        iterations: u32,

        #[command(flatten)]
        exchange: ExchangeArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ExchangeArgs {
    /// Modulus size for freshly generated parameters
    #[arg(short, long, default_value_t = DEFAULT_MODULUS_BITS)]
    pub bits: u64,

    /// Generate a safe prime p = 2q + 1 and a generator of order q
    #[arg(long)]
    pub safe_prime: bool,

    /// Use the RFC 3526 2048-bit MODP group instead of generating parameters
    #[arg(long, conflicts_with_all = ["safe_prime", "bits", "timeout"])]
    pub named_group: bool,

    /// Abort parameter generation after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ExchangeArgs {
    pub fn to_config(&self, verbose: bool) -> ExchangeConfig {
        ExchangeConfig {
            verbose,
            bits: self.bits,
            safe_prime: self.safe_prime,
            named_group: self.named_group,
            deadline: self.timeout.map(Duration::from_secs),
        }
    }
}
