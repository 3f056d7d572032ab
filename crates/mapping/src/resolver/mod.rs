//! Public facade over the stores and the joiner.

mod identifier_resolver;

pub use identifier_resolver::IdentifierResolver;
