//! Named rank expressions (`rank-<name>` parameters).
//!
//! An expression is either fixed text or a producer evaluated each time the
//! parameters are built, so it can follow state that changes between
//! searches.

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::params::{ParameterSet, grammar};

pub use error::ExpressionError;

type Producer = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub enum ExpressionSource {
    Static(String),
    Producer(Producer),
}

impl ExpressionSource {
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Producer(Arc::new(f))
    }

    /// Current text of the expression. Producers are called every time.
    pub fn evaluate(&self) -> String {
        match self {
            Self::Static(text) => text.clone(),
            Self::Producer(f) => f(),
        }
    }
}

impl fmt::Debug for ExpressionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl From<&str> for ExpressionSource {
    fn from(value: &str) -> Self {
        Self::Static(value.to_string())
    }
}

impl From<String> for ExpressionSource {
    fn from(value: String) -> Self {
        Self::Static(value)
    }
}

/// Input accepted by [`ExpressionRegistry::create`].
#[derive(Debug, Clone)]
pub enum ExpressionInput {
    Name(String),
    Descriptor {
        name: String,
        source: ExpressionSource,
    },
}

impl ExpressionInput {
    pub fn new(name: impl Into<String>, source: impl Into<ExpressionSource>) -> Self {
        Self::Descriptor {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Descriptor { name, .. } => name,
        }
    }
}

impl From<&str> for ExpressionInput {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for ExpressionInput {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

#[derive(Debug, Clone)]
pub struct Expression {
    name: String,
    source: Option<ExpressionSource>,
}

impl Expression {
    pub fn new(name: impl Into<String>, source: Option<ExpressionSource>) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> Option<&ExpressionSource> {
        self.source.as_ref()
    }

    pub fn set_expression(&mut self, source: impl Into<ExpressionSource>) -> &mut Self {
        self.source = Some(source.into());
        self
    }

    pub fn clear_expression(&mut self) -> &mut Self {
        self.source = None;
        self
    }

    /// `rank-<name>` with the current expression text; empty when no
    /// expression has been set.
    pub fn serialize(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        if let Some(source) = &self.source {
            params.insert(grammar::rank_key(&self.name), source.evaluate());
        }
        params
    }
}

/// One expression per name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ExpressionRegistry {
    expressions: Vec<Expression>,
}

impl ExpressionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the expression registered under the input's name, creating it
    /// on first use. An existing expression is returned untouched.
    pub fn create(&mut self, input: impl Into<ExpressionInput>) -> Result<&mut Expression, ExpressionError> {
        let input = input.into();
        let name = input.name().trim().to_string();
        if name.is_empty() {
            return Err(ExpressionError::InvalidExpressionName(
                "expression name must not be empty".to_string(),
            ));
        }

        if let Some(pos) = self.position(&name) {
            return Ok(&mut self.expressions[pos]);
        }

        debug!(name = %name, "Registering rank expression");
        let source = match input {
            ExpressionInput::Name(_) => None,
            ExpressionInput::Descriptor { source, .. } => Some(source),
        };
        self.expressions.push(Expression::new(name, source));
        let last = self.expressions.len() - 1;
        Ok(&mut self.expressions[last])
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.position(name).map(|pos| &self.expressions[pos])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Expression> {
        self.position(name).map(move |pos| &mut self.expressions[pos])
    }

    pub fn remove(&mut self, name: &str) -> Option<Expression> {
        self.position(name).map(|pos| self.expressions.remove(pos))
    }

    pub fn remove_all(&mut self) {
        self.expressions.clear();
    }

    pub fn all(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn serialize(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        for expression in &self.expressions {
            params.merge(expression.serialize());
        }
        params
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.expressions.iter().position(|e| e.name() == name)
    }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug, PartialEq, Eq)]
    pub enum ExpressionError {
        #[error("Invalid expression name: {0}")]
        InvalidExpressionName(String),
    }
}
