use dhe_crypto::{DomainParameters, Participant, Role};
use rand::rngs::StdRng; // StdRng for demo reproducibility; Participant::new uses OsRng
use rand::SeedableRng;
use std::sync::Arc;

fn short_hex(bytes: &[u8]) -> String {
    bytes[..16.min(bytes.len())]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
}

fn main() -> Result<(), dhe_crypto::Error> {
    println!("=== Diffie-Hellman Key Exchange Demo ===");

    let params = Arc::new(DomainParameters::rfc3526_group14());
    println!("Using DH Parameters: {}", params);

    let mut rng_alice = StdRng::seed_from_u64(0xAF1CE5EED);
    let mut rng_bob = StdRng::seed_from_u64(0xB0B5EED);

    println!("Alice is generating her key pair...");
    let alice = Participant::with_rng(params.clone(), Some(Role::Initiator), &mut rng_alice)?;
    let alice_public = alice.public_key_bytes()?;
    println!("  Alice's Public Key (first 16 bytes):  {}...\n", short_hex(&alice_public));

    println!("Bob is generating his key pair...");
    let bob = Participant::with_rng(params.clone(), Some(Role::Responder), &mut rng_bob)?;
    let bob_public = bob.public_key_bytes()?;
    println!("  Bob's Public Key (first 16 bytes):  {}...\n", short_hex(&bob_public));

    // public keys travel as fixed-width big-endian bytes
    let secret_alice = alice.compute_shared_key_bytes(&bob_public)?;
    let secret_bob = bob.compute_shared_key_bytes(&alice_public)?;

    if secret_alice == secret_bob {
        println!("SUCCESS: Shared secrets match!");
        println!("Full Shared Secret (hex): {}", secret_alice.to_str_radix(16));
    } else {
        println!("ERROR: Shared secrets DO NOT match!");
    }

    // The raw secret still needs a KDF before use as a symmetric key.
    Ok(())
}
