//! Shared utilities and common types for the Lead Manager backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (token generation, hashing, constant-time compare)
//! - Password hashing with Argon2id
//! - Field-level validation for lead data

pub mod crypto;
pub mod password;
pub mod validation;
