//! Reference compose and query-plan transforms for Federation Workbench.
//!
//! The workbench engine drives its transforms through the [`Composer`] and
//! [`Planner`] traits and never looks inside them. This crate supplies a
//! compact implementation over a federated SDL subset so sessions can be
//! composed and planned end to end:
//!
//! - `sdl` - service document parser (`type`, `extend type`, `scalar`,
//!   `@key`, `@external`)
//! - `supergraph` - merging service documents and printing the result
//! - `query` - operation parser (nested selection sets)
//! - `planner` - fetch splitting and `QueryPlan { ... }` serialization

mod error;
mod lexer;
pub mod planner;
pub mod query;
pub mod sdl;
pub mod supergraph;

use fwb_model::{Composed, Composer, Diagnostic, Planner, ServiceDefinition, TransformFault};

pub use error::ParseError;
pub use planner::{PlanContext, QueryPlan};
pub use query::Operation;
pub use sdl::ServiceDocument;
pub use supergraph::Supergraph;

/// The reference federation toolkit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Federation;

impl Federation {
    pub fn new() -> Self {
        Self
    }
}

impl Composer for Federation {
    type Document = ServiceDocument;
    type Schema = Supergraph;

    fn parse_document(&self, name: &str, text: &str) -> Result<ServiceDocument, Diagnostic> {
        sdl::parse_document(text).map_err(|error| {
            let diagnostic = Diagnostic::from(error);
            Diagnostic {
                message: format!("[{name}] {}", diagnostic.message),
                ..diagnostic
            }
        })
    }

    fn compose(
        &self,
        definitions: Vec<ServiceDefinition<ServiceDocument>>,
    ) -> Result<Composed<Supergraph>, TransformFault> {
        tracing::debug!(services = definitions.len(), "composing supergraph");
        Ok(match supergraph::compose_services(&definitions) {
            Ok(supergraph) => Composed::ok(supergraph),
            Err(errors) => Composed::invalid(errors),
        })
    }

    fn print_schema(&self, schema: &Supergraph) -> String {
        schema.print()
    }
}

impl Planner<Supergraph> for Federation {
    type Query = Operation;
    type Context = PlanContext;
    type Plan = QueryPlan;

    fn parse_query(&self, text: &str) -> Result<Operation, Diagnostic> {
        query::parse_operation(text).map_err(Diagnostic::from)
    }

    fn build_context(
        &self,
        schema: &Supergraph,
        query: Operation,
    ) -> Result<PlanContext, TransformFault> {
        planner::build_context(schema, &query)
    }

    fn plan(&self, context: PlanContext) -> Result<Option<QueryPlan>, TransformFault> {
        planner::build_plan(&context)
    }

    fn serialize_plan(&self, plan: &QueryPlan) -> String {
        planner::serialize_plan(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_name_the_service() {
        let err = Federation
            .parse_document("products", "type Query {")
            .unwrap_err();
        assert_eq!(err.message, "[products] Syntax Error: Unexpected <EOF>.");
        assert!(err.location.is_some());
    }

    #[test]
    fn test_structural_errors_are_returned_not_faulted() {
        let document = Federation
            .parse_document("a", "type Query { me: User }")
            .unwrap();
        let composed = Federation
            .compose(vec![ServiceDefinition {
                name: "a".to_string(),
                document,
            }])
            .unwrap();

        assert!(composed.schema.is_none());
        assert_eq!(composed.errors.len(), 1);
    }
}
