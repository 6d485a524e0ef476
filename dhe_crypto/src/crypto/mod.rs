//! Diffie-Hellman domain parameters, their generation, and the participants that use them.

pub mod key_exchange_traits;
pub mod parameter_generator;
pub mod parameters;
pub mod participant;

pub use self::key_exchange_traits::KeyAgreement;
pub use self::parameter_generator::{
    GeneratorConfig, ParameterGenerator, DEFAULT_ERROR_BITS, DEFAULT_MODULUS_BITS,
    SAFETY_FLOOR_BITS,
};
pub use self::parameters::DomainParameters;
pub use self::participant::{Participant, ParticipantState, Role};
