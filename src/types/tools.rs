//! Provider-neutral tool descriptors.
//!
//! A [`ToolDescriptor`] is what callers hand to the request builder. Its `name`
//! selects the wire branch during compilation; its `provider_options` carry the
//! typed configuration for that branch.

mod descriptor;
mod openai;

pub use descriptor::*;
pub use openai::*;

#[cfg(test)]
mod tests;
