//! # dart-abstract-core
//!
//! Extracts the first class of a Dart source text and generates an abstract
//! interface for it together with an implementing class.
//!
//! The pipeline is a chain of small scanners, each usable on its own:
//!
//! - [`strip_comments`] blanks comments while keeping byte offsets
//! - [`match_header`] finds the class declaration line
//! - [`extract_body`] balances braces to find the class body
//! - [`classify`] splits the body into fields, methods and accessors
//! - [`generate`] renders both classes
//!
//! [`ExtractionStrategy`] lets the first four steps be replaced by an
//! external AST helper ([`AstToolStrategy`]).
//!
//! ## Example
//!
//! ```
//! let result = dart_abstract_core::convert(
//!     "class User { String id; void save() {} }",
//!     "I",
//!     "Impl",
//! )
//! .expect("class found");
//!
//! assert!(result.interface_text.starts_with("abstract class IUser {"));
//! assert!(result.concrete_text.starts_with("class UserImpl implements IUser {"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod body;
mod classify;
mod config;
mod converter;
mod error;
mod external;
mod generate;
mod header;
mod lexer;
mod strategy;
mod strip;
mod types;

pub use body::{body_span, extract_body, BodySpan};
pub use classify::{classify, Members};
pub use config::{Config, ConfigError, ExtractorConfig, Naming, StrategyKind};
pub use converter::{Converter, ConverterBuilder};
pub use error::ConvertError;
pub use external::{parse_tool_output, AstToolStrategy};
pub use generate::generate;
pub use header::{match_header, HeaderMatch};
pub use strategy::{ExtractionStrategy, StrategyBox, TextStrategy};
pub use strip::strip_comments;
pub use types::{
    is_private, ClassHeader, ClassShape, ConversionResult, FieldDescriptor, MethodDescriptor,
};

/// Converts the first class in `source` with the built-in text scanner.
///
/// Returns `None` when the text holds no class. Never fails otherwise.
#[must_use]
pub fn convert(
    source: &str,
    interface_prefix: &str,
    implementation_suffix: &str,
) -> Option<ConversionResult> {
    let shape = TextStrategy::extract_shape(source)?.into_public();
    let naming = Naming::new(interface_prefix, implementation_suffix);
    Some(generate(
        &shape.header.name,
        &naming,
        &shape.fields,
        &shape.methods,
    ))
}
