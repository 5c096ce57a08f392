//! Test pipeline builders

use datavis_pipeline::pipeline::nodes::{ExpressionFilter, ValueSource};
use datavis_pipeline::{Executive, Node};

/// A `ValueSource` followed by a chain of expression filters.
pub struct Chain {
    pub source: Node,
    pub filters: Vec<Node>,
}

impl Chain {
    pub fn sink(&self) -> &Node {
        self.filters.last().unwrap_or(&self.source)
    }

    /// Every node, source first.
    pub fn nodes(&self) -> Vec<Node> {
        std::iter::once(self.source.clone())
            .chain(self.filters.iter().cloned())
            .collect()
    }
}

/// Builder for source → filter → ... → filter chains
pub struct ChainBuilder {
    value: f64,
    expressions: Vec<String>,
}

impl ChainBuilder {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            expressions: Vec::new(),
        }
    }

    pub fn then(mut self, expression: &str) -> Self {
        self.expressions.push(expression.to_string());
        self
    }

    /// `count` identical filters.
    pub fn repeat(mut self, expression: &str, count: usize) -> Self {
        for _ in 0..count {
            self.expressions.push(expression.to_string());
        }
        self
    }

    pub fn build(self, exec: &Executive) -> Chain {
        let source = exec.create(ValueSource::with_value(self.value));
        let mut filters: Vec<Node> = Vec::with_capacity(self.expressions.len());
        for expression in self.expressions {
            let filter = exec.create(ExpressionFilter::with_expression(expression));
            let upstream = filters.last().unwrap_or(&source);
            filter
                .set_input_connection(0, &upstream.output_port(0).unwrap())
                .unwrap();
            filters.push(filter);
        }
        Chain { source, filters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_builder() {
        let exec = Executive::default();
        let chain = ChainBuilder::new(1.0).then("x + 1.0").repeat("x * 2.0", 2).build(&exec);

        assert_eq!(chain.filters.len(), 3);
        assert_eq!(chain.nodes().len(), 4);
        assert!(chain.sink().ptr_eq(&chain.filters[2]));
    }
}
