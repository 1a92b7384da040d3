#![allow(non_snake_case)]

//! The Ivanov–Kabatiansky–Krouk code-based cryptosystem over GF(q) and the
//! ciphertext-only linear attack that breaks it.
//!
//! ```
//! use ikk_crypto::attack::attack;
//! use ikk_crypto::keypair::{IKKParams, generate_keypair};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let params = IKKParams::try_with(2, 20, 10).unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//! let (pk, sk) = generate_keypair(&params, &mut rng).unwrap();
//!
//! let u = vec![1, 0, 1, 1, 0, 0, 1, 0, 1, 1];
//! let ct = pk.encrypt(&u, &mut rng).unwrap();
//!
//! assert_eq!(sk.decrypt(&ct).unwrap(), u);
//! assert_eq!(attack(&pk, &ct).unwrap().u_fixed, u);
//! ```

pub mod attack;
pub mod errors;
pub mod field;
pub mod keypair;
pub mod sle;
pub mod trials;
