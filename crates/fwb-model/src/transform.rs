//! Interfaces of the external compose and plan transforms.
//!
//! The engine treats both transforms as black boxes. A transform may fail
//! by returning [`TransformFault`] or by panicking; callers in `fwb-core`
//! catch both at the pipeline boundary.

use thiserror::Error;

use crate::Diagnostic;

/// One parsed service handed to [`Composer::compose`].
#[derive(Debug, Clone)]
pub struct ServiceDefinition<D> {
    pub name: String,
    pub document: D,
}

/// Output of a composition that ran to completion.
///
/// `errors` non-empty means the merge was structurally invalid; the
/// schema, if any, must not be shown.
#[derive(Debug, Clone)]
pub struct Composed<S> {
    pub schema: Option<S>,
    pub errors: Vec<Diagnostic>,
}

impl<S> Composed<S> {
    pub fn ok(schema: S) -> Self {
        Self {
            schema: Some(schema),
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<Diagnostic>) -> Self {
        Self {
            schema: None,
            errors,
        }
    }
}

/// An unexpected failure inside a transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransformFault {
    message: String,
}

impl TransformFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TransformFault> for Diagnostic {
    fn from(fault: TransformFault) -> Self {
        Diagnostic::new(fault.message)
    }
}

/// The schema merge transform.
pub trait Composer: Send + Sync + 'static {
    /// A parsed service document.
    type Document: Send;
    /// The merged schema handle.
    type Schema: Send + Sync + 'static;

    /// Parse one service document.
    fn parse_document(&self, name: &str, text: &str) -> Result<Self::Document, Diagnostic>;

    /// Merge parsed service documents into one schema.
    fn compose(
        &self,
        definitions: Vec<ServiceDefinition<Self::Document>>,
    ) -> Result<Composed<Self::Schema>, TransformFault>;

    /// Render a merged schema as text.
    fn print_schema(&self, schema: &Self::Schema) -> String;
}

/// The query planning transform, over schemas of type `S`.
pub trait Planner<S>: Send + Sync + 'static {
    type Query;
    type Context;
    type Plan;

    /// Parse query text. A parse failure is not a fault; it yields no plan.
    fn parse_query(&self, text: &str) -> Result<Self::Query, Diagnostic>;

    fn build_context(&self, schema: &S, query: Self::Query) -> Result<Self::Context, TransformFault>;

    /// Plan the query. `Ok(None)` means there is nothing to execute.
    fn plan(&self, context: Self::Context) -> Result<Option<Self::Plan>, TransformFault>;

    fn serialize_plan(&self, plan: &Self::Plan) -> String;
}
