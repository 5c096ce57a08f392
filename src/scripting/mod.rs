//! Rhai expression engine for pipeline filters
//!
//! Expressions are evaluated with the current input bound to `x` (also
//! available as `value`). The result must be numeric.
//!
//! ## Available functions
//!
//! Beyond Rhai's own arithmetic and comparison operators:
//!
//! - `abs`, `sqrt`, `pow`, `exp`, `ln`, `log10`
//! - `sin`, `cos`, `tan`, `atan2`
//! - `floor`, `ceil`, `round`
//! - `clamp(x, min, max)`, `min(a, b)`, `max(a, b)`
//! - `lerp(a, b, t)`, `sign(x)`
//! - `pi()`, `e()`
//!
//! ## Example
//!
//! ```rhai
//! // Scale and clamp
//! clamp(x * 2.0, 0.0, 100.0)
//! ```

mod engine;

pub use engine::ExpressionEngine;

use crate::error::{PipelineError, PipelineResult};
use rhai::{Engine, AST};
use std::collections::{HashMap, VecDeque};

/// A compiled expression ready for repeated evaluation.
#[derive(Clone)]
pub struct CompiledExpression {
    ast: AST,
    source: String,
}

impl CompiledExpression {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn ast(&self) -> &AST {
        &self.ast
    }
}

impl std::fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .finish()
    }
}

/// Most expressions an `ExpressionCache` keeps before evicting the oldest.
pub const MAX_CACHED_EXPRESSIONS: usize = 32;

/// Compiled expressions keyed by source text, oldest evicted first.
#[derive(Default)]
pub struct ExpressionCache {
    cache: HashMap<String, CompiledExpression>,
    order: VecDeque<String>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached expression or compile and cache it
    pub fn get_or_compile(&mut self, engine: &Engine, source: &str) -> PipelineResult<CompiledExpression> {
        if let Some(compiled) = self.cache.get(source) {
            return Ok(compiled.clone());
        }

        let ast = engine
            .compile_expression(source)
            .map_err(|e| PipelineError::Script(format!("Compilation error: {}", e)))?;

        let compiled = CompiledExpression {
            ast,
            source: source.to_string(),
        };
        if self.order.len() >= MAX_CACHED_EXPRESSIONS {
            if let Some(oldest) = self.order.pop_front() {
                self.cache.remove(&oldest);
            }
        }
        self.order.push_back(source.to_string());
        self.cache.insert(source.to_string(), compiled.clone());
        Ok(compiled)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.cache.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.order.clear();
    }
}
