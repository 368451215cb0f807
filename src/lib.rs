//! JSON Schema → Nix option-module compiler.
//!
//! Pipeline: deref `$ref`s against the document's definitions table, strip
//! nullable unions, synthesize `lib.types` expressions, render one sorted
//! `lib.mkOption` block per property. The transform is a pure function of
//! (root schema, definitions table); output is byte-deterministic.
pub mod schema;
pub mod resolve;
pub mod normalize;
pub mod expr;
pub mod synth;
pub mod codegen;
pub mod provider;
pub mod cli;
