//! Query-plan pipeline: (schema, query text) -> plan artifact.

use std::panic::{self, AssertUnwindSafe};

use fwb_model::{Diagnostic, PlanArtifact, Planner, TransformFault};

use super::panic_message;

/// Recompute the plan artifact.
///
/// A missing schema or unparsable query yields no plan and no error; both
/// are expected while the user is typing. Faults and panics from the
/// transform become a single error entry.
pub fn replan<S, P>(planner: &P, schema: Option<&S>, query: &str) -> PlanArtifact
where
    P: Planner<S>,
{
    let Some(schema) = schema else {
        return PlanArtifact::none();
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(
        || -> Result<Option<String>, TransformFault> {
            let Ok(parsed) = planner.parse_query(query) else {
                return Ok(None);
            };
            let context = planner.build_context(schema, parsed)?;
            let plan = planner.plan(context)?;
            Ok(plan.map(|plan| planner.serialize_plan(&plan)))
        },
    ));

    match outcome {
        Ok(Ok(Some(text))) => PlanArtifact::planned(text),
        Ok(Ok(None)) => PlanArtifact::none(),
        Ok(Err(fault)) => {
            tracing::warn!(fault = fault.message(), "Plan transform faulted");
            PlanArtifact::failed(vec![Diagnostic::from(fault)])
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(%message, "Plan transform panicked");
            PlanArtifact::failed(vec![Diagnostic::new(message)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plans queries against a list of known field names.
    struct Fields;

    impl Planner<Vec<&'static str>> for Fields {
        type Query = String;
        type Context = (bool, String);
        type Plan = String;

        fn parse_query(&self, text: &str) -> Result<String, Diagnostic> {
            let field = text.trim();
            if field.is_empty() || field.contains(' ') {
                Err(Diagnostic::new("Syntax Error"))
            } else {
                Ok(field.to_string())
            }
        }

        fn build_context(
            &self,
            schema: &Vec<&'static str>,
            query: String,
        ) -> Result<(bool, String), TransformFault> {
            if query == "boom" {
                panic!("context exploded");
            }
            if !schema.contains(&query.as_str()) {
                return Err(TransformFault::new(format!("Cannot query field \"{query}\".")));
            }
            Ok((query == "nothing", query))
        }

        fn plan(&self, context: (bool, String)) -> Result<Option<String>, TransformFault> {
            let (empty, field) = context;
            Ok((!empty).then_some(field))
        }

        fn serialize_plan(&self, plan: &String) -> String {
            format!("Fetch({plan})")
        }
    }

    const SCHEMA: &[&str] = &["me", "nothing"];

    fn schema() -> Vec<&'static str> {
        SCHEMA.to_vec()
    }

    #[test]
    fn test_plans_known_field() {
        assert_eq!(
            replan(&Fields, Some(&schema()), "me"),
            PlanArtifact::planned("Fetch(me)")
        );
    }

    #[test]
    fn test_no_schema_means_no_plan() {
        for query in ["me", "", "not parseable", "boom"] {
            assert_eq!(replan(&Fields, None, query), PlanArtifact::none());
        }
    }

    #[test]
    fn test_unparsable_query_is_not_an_error() {
        assert_eq!(replan(&Fields, Some(&schema()), "a b"), PlanArtifact::none());
    }

    #[test]
    fn test_absent_plan() {
        assert_eq!(replan(&Fields, Some(&schema()), "nothing"), PlanArtifact::none());
    }

    #[test]
    fn test_fault_is_captured() {
        let plan = replan(&Fields, Some(&schema()), "unknown");
        assert!(plan.text.is_empty());
        assert_eq!(plan.errors, vec![Diagnostic::new("Cannot query field \"unknown\".")]);
    }

    #[test]
    fn test_panic_is_captured() {
        let plan = replan(&Fields, Some(&schema()), "boom");
        assert_eq!(plan.errors, vec![Diagnostic::new("context exploded")]);
    }
}
