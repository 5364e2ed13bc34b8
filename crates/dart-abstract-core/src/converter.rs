//! Conversion facade with injectable strategy and naming.

use tracing::debug;

use crate::config::{Config, ConfigError, Naming};
use crate::error::ConvertError;
use crate::generate::generate;
use crate::strategy::{ExtractionStrategy, StrategyBox, TextStrategy};
use crate::types::ConversionResult;

/// Builder for configuring a [`Converter`].
#[derive(Default)]
pub struct ConverterBuilder {
    naming: Option<Naming>,
    strategy: Option<StrategyBox>,
}

impl ConverterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the naming scheme (default: `I` / `Impl`).
    #[must_use]
    pub fn naming(mut self, naming: Naming) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Sets the extraction strategy (default: [`TextStrategy`]).
    #[must_use]
    pub fn strategy<S: ExtractionStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    /// Sets a boxed extraction strategy.
    #[must_use]
    pub fn strategy_box(mut self, strategy: StrategyBox) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Builds the converter.
    #[must_use]
    pub fn build(self) -> Converter {
        Converter {
            naming: self.naming.unwrap_or_default(),
            strategy: self.strategy.unwrap_or_else(|| Box::new(TextStrategy)),
        }
    }
}

/// Extracts the first class of a source text and generates its interface
/// and implementation.
///
/// Holds no state between calls; the same input always gives the same
/// output.
pub struct Converter {
    naming: Naming,
    strategy: StrategyBox,
}

impl Converter {
    /// Creates a builder for configuring a converter.
    #[must_use]
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    /// Text-scanning converter with the given naming.
    #[must_use]
    pub fn new(naming: Naming) -> Self {
        Self::builder().naming(naming).build()
    }

    /// Converter with the naming and strategy from a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured strategy cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::builder()
            .naming(config.naming.clone())
            .strategy_box(config.extractor.build()?)
            .build())
    }

    /// The naming scheme in use.
    #[must_use]
    pub fn naming(&self) -> &Naming {
        &self.naming
    }

    /// Name of the extraction strategy in use.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Converts the first class in `source`.
    ///
    /// Private members and members named like the class are dropped before
    /// generation, whichever strategy produced them.
    ///
    /// # Errors
    ///
    /// Returns an error if the strategy fails. Not finding a class is
    /// `Ok(None)`.
    pub fn convert(&self, source: &str) -> Result<Option<ConversionResult>, ConvertError> {
        let Some(shape) = self.strategy.extract(source)? else {
            return Ok(None);
        };
        let shape = shape.into_public();
        debug!(
            strategy = self.strategy.name(),
            class = %shape.header.name,
            "generating interface and implementation"
        );
        Ok(Some(generate(
            &shape.header.name,
            &self.naming,
            &shape.fields,
            &shape.methods,
        )))
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("naming", &self.naming)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
