//! Rhai engine configuration and evaluation.

use crate::error::{PipelineError, PipelineResult};
use crate::scripting::{CompiledExpression, ExpressionCache};
use rhai::{Dynamic, Engine, Scope};

/// Sandboxed Rhai engine with a small numeric function library.
pub struct ExpressionEngine {
    engine: Engine,
    cache: ExpressionCache,
}

impl ExpressionEngine {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        Self::configure_engine(&mut engine);
        Self {
            engine,
            cache: ExpressionCache::new(),
        }
    }

    /// Configure the Rhai engine with helper functions and safety limits
    fn configure_engine(engine: &mut Engine) {
        // Set safety limits
        engine.set_max_expr_depths(64, 64);
        engine.set_max_call_levels(32);
        engine.set_max_operations(10_000);
        engine.set_max_string_size(10_000);
        engine.set_max_array_size(1_000);
        engine.set_max_map_size(1_000);

        engine.register_fn("abs", |x: f64| x.abs());
        engine.register_fn("sqrt", |x: f64| x.sqrt());
        engine.register_fn("pow", |x: f64, y: f64| x.powf(y));
        engine.register_fn("exp", |x: f64| x.exp());
        engine.register_fn("ln", |x: f64| x.ln());
        engine.register_fn("log10", |x: f64| x.log10());
        engine.register_fn("sin", |x: f64| x.sin());
        engine.register_fn("cos", |x: f64| x.cos());
        engine.register_fn("tan", |x: f64| x.tan());
        engine.register_fn("atan2", |y: f64, x: f64| y.atan2(x));

        engine.register_fn("floor", |x: f64| x.floor());
        engine.register_fn("ceil", |x: f64| x.ceil());
        engine.register_fn("round", |x: f64| x.round());

        engine.register_fn("clamp", |x: f64, min: f64, max: f64| x.clamp(min, max));
        engine.register_fn("min", |a: f64, b: f64| a.min(b));
        engine.register_fn("max", |a: f64, b: f64| a.max(b));

        engine.register_fn("pi", || std::f64::consts::PI);
        engine.register_fn("e", || std::f64::consts::E);

        engine.register_fn("sign", |x: f64| {
            if x > 0.0 {
                1.0
            } else if x < 0.0 {
                -1.0
            } else {
                0.0
            }
        });
        engine.register_fn("lerp", |a: f64, b: f64, t: f64| a + (b - a) * t);
    }

    /// Compile an expression, reusing a cached AST for identical source.
    pub fn compile(&mut self, source: &str) -> PipelineResult<CompiledExpression> {
        self.cache.get_or_compile(&self.engine, source)
    }

    /// Evaluate a compiled expression with `x` bound to `input`.
    pub fn evaluate(&self, expression: &CompiledExpression, input: f64) -> PipelineResult<f64> {
        let mut scope = Scope::new();
        scope.push("x", input);
        scope.push("value", input);

        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, expression.ast())
            .map_err(|e| PipelineError::Script(format!("Execution error: {}", e)))?;

        if let Ok(f) = result.as_float() {
            Ok(f)
        } else if let Ok(i) = result.as_int() {
            Ok(i as f64)
        } else {
            Err(PipelineError::Script(format!(
                "Expression must return a numeric value, got {}",
                result.type_name()
            )))
        }
    }

    /// Compile and evaluate in one step.
    pub fn eval(&mut self, source: &str, input: f64) -> PipelineResult<f64> {
        let expression = self.compile(source)?;
        self.evaluate(&expression, input)
    }

    /// Check that `source` compiles, without caching it.
    pub fn validate(&self, source: &str) -> PipelineResult<()> {
        self.engine
            .compile_expression(source)
            .map(|_| ())
            .map_err(|e| PipelineError::Script(format!("Validation error: {}", e)))
    }

    pub fn cached_expressions(&self) -> usize {
        self.cache.len()
    }
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExpressionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionEngine")
            .field("cache_size", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_expression() {
        let mut engine = ExpressionEngine::new();
        assert_eq!(engine.eval("x * 2.0", 5.0).unwrap(), 10.0);
        assert_eq!(engine.eval("value + 1.0", 5.0).unwrap(), 6.0);
    }

    #[test]
    fn test_integer_result_is_widened() {
        let mut engine = ExpressionEngine::new();
        assert_eq!(engine.eval("40 + 2", 0.0).unwrap(), 42.0);
    }

    #[test]
    fn test_non_numeric_result() {
        let mut engine = ExpressionEngine::new();
        assert!(matches!(
            engine.eval("\"text\"", 1.0),
            Err(PipelineError::Script(_))
        ));
    }

    #[test]
    fn test_math_functions() {
        let mut engine = ExpressionEngine::new();

        assert_eq!(engine.eval("sqrt(16.0)", 0.0).unwrap(), 4.0);
        assert_eq!(engine.eval("pow(2.0, 3.0)", 0.0).unwrap(), 8.0);
        assert_eq!(engine.eval("clamp(x, 0.0, 100.0)", 150.0).unwrap(), 100.0);
        assert_eq!(engine.eval("clamp(x, 0.0, 100.0)", -50.0).unwrap(), 0.0);
        assert!((engine.eval("cos(0.0)", 0.0).unwrap() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_sign_and_lerp() {
        let mut engine = ExpressionEngine::new();
        assert_eq!(engine.eval("sign(x)", -3.0).unwrap(), -1.0);
        assert_eq!(engine.eval("lerp(0.0, 10.0, x)", 0.25).unwrap(), 2.5);
    }

    #[test]
    fn test_validation() {
        let engine = ExpressionEngine::new();
        assert!(engine.validate("x * 2.0").is_ok());
        assert!(engine.validate("x * ").is_err());
    }

    #[test]
    fn test_compile_is_cached() {
        let mut engine = ExpressionEngine::new();
        engine.compile("x * 2.0").unwrap();
        engine.compile("x * 2.0").unwrap();
        assert_eq!(engine.cached_expressions(), 1);
    }
}
