//! Query planning over a [`Supergraph`].
//!
//! Planning happens in two steps, mirroring the transform interface:
//! [`build_context`] validates the operation against the schema and tags each
//! field with the service that resolves it; [`build_plan`] splits the tagged
//! tree into fetches.

use std::fmt::Write;

use fwb_model::TransformFault;
use indexmap::IndexMap;

use crate::query::{FieldSelection, Operation};
use crate::supergraph::{MergedType, QUERY_TYPE, Supergraph};

const TYPENAME: &str = "__typename";

/// A query field validated against the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub type_name: String,
    pub is_list: bool,
    pub service: String,
    /// Key of the field's type when it is an entity.
    pub entity_key: Vec<String>,
    pub selections: Vec<ResolvedField>,
}

/// An operation ready to be planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanContext {
    pub operation_name: Option<String>,
    pub fields: Vec<ResolvedField>,
}

// =============================================================================
// PLAN TREE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Field {
        name: String,
        selections: Vec<Selection>,
    },
    InlineFragment {
        type_condition: String,
        selections: Vec<Selection>,
    },
}

impl Selection {
    fn leaf(name: &str) -> Self {
        Self::Field {
            name: name.to_string(),
            selections: Vec::new(),
        }
    }

    fn field_name(&self) -> Option<&str> {
        match self {
            Self::Field { name, .. } => Some(name),
            Self::InlineFragment { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchNode {
    pub service: String,
    /// Entity representations the fetch starts from, for dependent fetches.
    pub requires: Option<Vec<Selection>>,
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanNode {
    Fetch(FetchNode),
    Flatten { path: Vec<String>, node: Box<PlanNode> },
    Sequence(Vec<PlanNode>),
    Parallel(Vec<PlanNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub node: PlanNode,
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Validate `operation` against `supergraph`.
pub fn build_context(
    supergraph: &Supergraph,
    operation: &Operation,
) -> Result<PlanContext, TransformFault> {
    let root = supergraph
        .query_type()
        .ok_or_else(|| TransformFault::new("Schema is not configured for queries."))?;

    Ok(PlanContext {
        operation_name: operation.name.clone(),
        fields: resolve_fields(supergraph, root, &operation.selections)?,
    })
}

fn resolve_fields(
    supergraph: &Supergraph,
    parent: &MergedType,
    selections: &[FieldSelection],
) -> Result<Vec<ResolvedField>, TransformFault> {
    selections
        .iter()
        .map(|selection| {
            let field = parent.fields.get(&selection.name).ok_or_else(|| {
                TransformFault::new(format!(
                    "Cannot query field \"{}\" on type \"{}\".",
                    selection.name, parent.name
                ))
            })?;
            let type_name = field.ty.base_name();

            let (entity_key, selections) = match supergraph.object_type(type_name) {
                Some(_) if selection.selections.is_empty() => {
                    return Err(TransformFault::new(format!(
                        "Field \"{}\" of type \"{}\" must have a selection of subfields.",
                        selection.name, field.ty
                    )));
                }
                Some(object) => (
                    object.key.clone(),
                    resolve_fields(supergraph, object, &selection.selections)?,
                ),
                None if !selection.selections.is_empty() => {
                    return Err(TransformFault::new(format!(
                        "Field \"{}\" must not have a selection since type \"{}\" has no subfields.",
                        selection.name, field.ty
                    )));
                }
                None => (Vec::new(), Vec::new()),
            };

            Ok(ResolvedField {
                name: selection.name.clone(),
                type_name: type_name.to_string(),
                is_list: field.ty.is_list(),
                service: field.service.clone(),
                entity_key,
                selections,
            })
        })
        .collect()
}

// =============================================================================
// PLANNING
// =============================================================================

/// Fields of one entity that a service other than the parent fetch resolves.
struct Dependent {
    service: String,
    type_name: String,
    key: Vec<String>,
    path: Vec<String>,
    fields: Vec<ResolvedField>,
}

/// Split the validated operation into fetches.
///
/// Root fields are grouped per owning service and fetched in parallel.
/// Entity fields owned by another service become a dependent fetch that
/// runs after its parent, flattened at the entity's response path.
pub fn build_plan(context: &PlanContext) -> Result<Option<QueryPlan>, TransformFault> {
    let mut groups: IndexMap<&str, Vec<ResolvedField>> = IndexMap::new();
    for field in &context.fields {
        groups
            .entry(field.service.as_str())
            .or_default()
            .push(field.clone());
    }

    let mut nodes = Vec::new();
    for (service, fields) in groups {
        let mut dependents = Vec::new();
        let selections = split(service, QUERY_TYPE, &[], &fields, &[], &mut dependents)?;
        let fetch = PlanNode::Fetch(FetchNode {
            service: service.to_string(),
            requires: None,
            selections,
        });
        nodes.push(then_dependents(fetch, dependents)?);
    }

    Ok(collapse(nodes, PlanNode::Parallel).map(|node| QueryPlan { node }))
}

/// Build the selection `service` resolves for `fields` of `parent_type`,
/// pushing fields other services own onto `dependents`.
fn split(
    service: &str,
    parent_type: &str,
    parent_key: &[String],
    fields: &[ResolvedField],
    path: &[String],
    dependents: &mut Vec<Dependent>,
) -> Result<Vec<Selection>, TransformFault> {
    let mut selections = Vec::new();
    let mut remote: IndexMap<&str, Vec<ResolvedField>> = IndexMap::new();

    for field in fields {
        // Key fields are resolvable by every service that knows the entity.
        if field.service != service && !parent_key.contains(&field.name) {
            remote
                .entry(field.service.as_str())
                .or_default()
                .push(field.clone());
            continue;
        }

        let mut child_path = path.to_vec();
        child_path.push(field.name.clone());
        if field.is_list {
            child_path.push("@".to_string());
        }
        let children = split(
            service,
            &field.type_name,
            &field.entity_key,
            &field.selections,
            &child_path,
            dependents,
        )?;
        selections.push(Selection::Field {
            name: field.name.clone(),
            selections: children,
        });
    }

    if remote.is_empty() {
        return Ok(selections);
    }

    if parent_key.is_empty() {
        let field = remote.values().flatten().next().map_or("", |f| f.name.as_str());
        return Err(TransformFault::new(format!(
            "Cannot plan field \"{parent_type}.{field}\": type \"{parent_type}\" has no @key."
        )));
    }

    // The parent fetch must return what the dependent fetch starts from.
    let mut representation = vec![Selection::leaf(TYPENAME)];
    for key in parent_key {
        representation.push(Selection::leaf(key));
    }
    let mut with_key: Vec<Selection> = representation
        .iter()
        .filter(|required| {
            !selections
                .iter()
                .any(|s| s.field_name().is_some() && s.field_name() == required.field_name())
        })
        .cloned()
        .collect();
    with_key.append(&mut selections);

    for (remote_service, fields) in remote {
        dependents.push(Dependent {
            service: remote_service.to_string(),
            type_name: parent_type.to_string(),
            key: parent_key.to_vec(),
            path: path.to_vec(),
            fields,
        });
    }

    Ok(with_key)
}

fn dependent_node(dependent: Dependent) -> Result<PlanNode, TransformFault> {
    let Dependent {
        service,
        type_name,
        key,
        path,
        fields,
    } = dependent;

    let mut nested = Vec::new();
    let selections = split(&service, &type_name, &key, &fields, &path, &mut nested)?;

    let mut representation = vec![Selection::leaf(TYPENAME)];
    representation.extend(key.iter().map(|k| Selection::leaf(k)));

    let fetch = PlanNode::Fetch(FetchNode {
        service,
        requires: Some(vec![Selection::InlineFragment {
            type_condition: type_name.clone(),
            selections: representation,
        }]),
        selections: vec![Selection::InlineFragment {
            type_condition: type_name,
            selections,
        }],
    });

    let flatten = PlanNode::Flatten {
        path,
        node: Box::new(fetch),
    };
    then_dependents(flatten, nested)
}

fn then_dependents(first: PlanNode, dependents: Vec<Dependent>) -> Result<PlanNode, TransformFault> {
    let followers = dependents
        .into_iter()
        .map(dependent_node)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match collapse(followers, PlanNode::Parallel) {
        Some(next) => PlanNode::Sequence(vec![first, next]),
        None => first,
    })
}

/// One node stays as is; several are wrapped.
fn collapse(mut nodes: Vec<PlanNode>, wrap: fn(Vec<PlanNode>) -> PlanNode) -> Option<PlanNode> {
    match nodes.len() {
        0 => None,
        1 => nodes.pop(),
        _ => Some(wrap(nodes)),
    }
}

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Render a plan in the indented `QueryPlan { ... }` text form.
pub fn serialize_plan(plan: &QueryPlan) -> String {
    let mut out = String::from("QueryPlan {\n");
    write_node(&mut out, &plan.node, 1);
    out.push_str(",\n}");
    out
}

fn write_node(out: &mut String, node: &PlanNode, depth: usize) {
    let pad = "  ".repeat(depth);
    match node {
        PlanNode::Fetch(fetch) => {
            let _ = writeln!(out, "{pad}Fetch(service: \"{}\") {{", fetch.service);
            if let Some(requires) = &fetch.requires {
                write_selection_set(out, requires, depth + 1);
                out.push_str(" =>\n");
            }
            write_selection_set(out, &fetch.selections, depth + 1);
            out.push('\n');
            let _ = write!(out, "{pad}}}");
        }
        PlanNode::Flatten { path, node } => {
            let _ = writeln!(out, "{pad}Flatten(path: \"{}\") {{", path.join("."));
            write_node(out, node, depth + 1);
            out.push_str(",\n");
            let _ = write!(out, "{pad}}}");
        }
        PlanNode::Sequence(nodes) | PlanNode::Parallel(nodes) => {
            let kind = if matches!(node, PlanNode::Sequence(_)) {
                "Sequence"
            } else {
                "Parallel"
            };
            let _ = writeln!(out, "{pad}{kind} {{");
            for child in nodes {
                write_node(out, child, depth + 1);
                out.push_str(",\n");
            }
            let _ = write!(out, "{pad}}}");
        }
    }
}

fn write_selection_set(out: &mut String, selections: &[Selection], depth: usize) {
    let pad = "  ".repeat(depth);
    let _ = writeln!(out, "{pad}{{");
    for selection in selections {
        write_selection(out, selection, depth + 1);
    }
    let _ = write!(out, "{pad}}}");
}

fn write_selection(out: &mut String, selection: &Selection, depth: usize) {
    let pad = "  ".repeat(depth);
    let (head, children) = match selection {
        Selection::Field { name, selections } => (name.clone(), selections),
        Selection::InlineFragment {
            type_condition,
            selections,
        } => (format!("... on {type_condition}"), selections),
    };

    if children.is_empty() {
        let _ = writeln!(out, "{pad}{head}");
        return;
    }
    let _ = writeln!(out, "{pad}{head} {{");
    for child in children {
        write_selection(out, child, depth + 1);
    }
    let _ = writeln!(out, "{pad}}}");
}
