//! Key generation, encryption and decryption for the IKK cryptosystem.

pub mod helper;
pub mod keys;
pub mod params;

pub use keys::{
    Ciphertext, KeyMaterial, PublicKey, SecretKey, assemble_keypair, generate_keypair,
    sample_key_material,
};
pub use params::{DEFAULT_MAX_SAMPLING_ATTEMPTS, IKKParams};
