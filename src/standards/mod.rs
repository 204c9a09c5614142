//! Protocol standards.
//!
//! Wire-format mapping for the provider dialects this crate speaks. Only the
//! OpenAI(-compatible) dialect is modeled.
#![deny(unsafe_code)]

pub mod openai;
