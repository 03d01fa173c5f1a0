//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password digests (Argon2id) with zeroized clear text
//! - Bearer token extraction from `Authorization` headers
//! - Random secret generation

pub mod bearer;
pub mod crypto;
pub mod password;
