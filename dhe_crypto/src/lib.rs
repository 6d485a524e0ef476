pub mod crypto;
pub mod encoding;
pub mod error;
pub mod number_theory;
pub mod primality;

pub use crypto::{
    DomainParameters, GeneratorConfig, KeyAgreement, ParameterGenerator, Participant,
    ParticipantState, Role, DEFAULT_ERROR_BITS, DEFAULT_MODULUS_BITS, SAFETY_FLOOR_BITS,
};
pub use error::{
    EncodingError, Error, InvalidConfigurationError, InvalidPeerKeyError, ParameterGenerationError,
    Result,
};
