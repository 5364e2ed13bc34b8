//! Extraction strategy trait and the built-in text scanner.

use tracing::{debug, warn};

use crate::body::body_span;
use crate::classify::classify;
use crate::error::ConvertError;
use crate::header::match_header;
use crate::strip::strip_comments;
use crate::types::ClassShape;

/// Turns Dart source text into the shape of its first class.
///
/// Implementations must be stateless between calls. Results pass through
/// [`ClassShape::into_public`] before generation, whatever the strategy.
///
/// # Example
///
/// ```ignore
/// use dart_abstract_core::{ClassShape, ConvertError, ExtractionStrategy};
///
/// struct Canned(ClassShape);
///
/// impl ExtractionStrategy for Canned {
///     fn name(&self) -> &'static str { "canned" }
///
///     fn extract(&self, _source: &str) -> Result<Option<ClassShape>, ConvertError> {
///         Ok(Some(self.0.clone()))
///     }
/// }
/// ```
pub trait ExtractionStrategy: Send + Sync {
    /// Short name for logs and `--format json` output (e.g. "text").
    fn name(&self) -> &'static str;

    /// Extracts the first class in `source`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures outside the text itself, such as
    /// an external helper crashing.
    fn extract(&self, source: &str) -> Result<Option<ClassShape>, ConvertError>;
}

/// Type alias for boxed strategy trait objects.
pub type StrategyBox = Box<dyn ExtractionStrategy>;

/// Pure text scanner: strip comments, match the header, balance the body,
/// classify members. Performs no I/O and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStrategy;

impl TextStrategy {
    /// Infallible form of [`ExtractionStrategy::extract`].
    #[must_use]
    pub fn extract_shape(source: &str) -> Option<ClassShape> {
        let stripped = strip_comments(source);
        let Some(found) = match_header(&stripped) else {
            debug!("no class header found");
            return None;
        };
        let class_name = found.header.name.clone();

        let body = match body_span(&stripped, found.offset) {
            Some(span) => {
                if !span.closed {
                    warn!(
                        class = %class_name,
                        "class body is not closed, using the rest of the input"
                    );
                }
                source.get(span.start..span.end).unwrap_or_default()
            }
            None => "",
        };

        let members = classify(body, &class_name);
        debug!(
            class = %class_name,
            fields = members.fields.len(),
            methods = members.methods.len(),
            "classified class body"
        );

        Some(ClassShape {
            header: found.header,
            fields: members.fields,
            methods: members.methods,
        })
    }
}

impl ExtractionStrategy for TextStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, source: &str) -> Result<Option<ClassShape>, ConvertError> {
        Ok(Self::extract_shape(source))
    }
}
