//! Composition: merging service documents into one supergraph.

use std::fmt::Write;

use fwb_model::{Diagnostic, Location, ServiceDefinition};
use indexmap::{IndexMap, IndexSet};

use crate::sdl::{ArgumentDef, Definition, ObjectTypeDef, ServiceDocument, TypeRef};

/// Root operation type every service may contribute fields to.
pub const QUERY_TYPE: &str = "Query";

const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// A field of the merged schema, tagged with the service that resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedField {
    pub name: String,
    pub arguments: Vec<ArgumentDef>,
    pub ty: TypeRef,
    pub service: String,
}

/// An object type of the merged schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedType {
    pub name: String,
    /// Service holding the base (non-extension) definition. `None` for the query root.
    pub owner: Option<String>,
    /// Key field set from the owner's first `@key`.
    pub key: Vec<String>,
    pub fields: IndexMap<String, MergedField>,
}

impl MergedType {
    pub fn is_entity(&self) -> bool {
        !self.key.is_empty()
    }
}

/// The composed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supergraph {
    scalars: IndexSet<String>,
    types: IndexMap<String, MergedType>,
}

impl Supergraph {
    pub fn object_type(&self, name: &str) -> Option<&MergedType> {
        self.types.get(name)
    }

    pub fn query_type(&self) -> Option<&MergedType> {
        self.types.get(QUERY_TYPE)
    }

    pub fn is_scalar(&self, name: &str) -> bool {
        BUILTIN_SCALARS.contains(&name) || self.scalars.contains(name)
    }

    /// Render the schema as SDL, custom scalars first, then object types in
    /// the order they were first seen.
    pub fn print(&self) -> String {
        let mut blocks = Vec::new();

        for scalar in &self.scalars {
            blocks.push(format!("scalar {scalar}"));
        }

        for merged in self.types.values() {
            let mut block = format!("type {} {{\n", merged.name);
            for field in merged.fields.values() {
                let _ = write!(block, "  {}", field.name);
                if !field.arguments.is_empty() {
                    let arguments: Vec<String> = field
                        .arguments
                        .iter()
                        .map(|arg| format!("{}: {}", arg.name, arg.ty))
                        .collect();
                    let _ = write!(block, "({})", arguments.join(", "));
                }
                let _ = writeln!(block, ": {}", field.ty);
            }
            block.push('}');
            blocks.push(block);
        }

        let mut printed = blocks.join("\n\n");
        printed.push('\n');
        printed
    }
}

struct Extension<'a> {
    service: &'a str,
    def: &'a ObjectTypeDef,
}

/// Merge parsed service documents.
///
/// Returns the supergraph, or every structural error found. Errors are
/// collected rather than stopping at the first one.
pub fn compose_services(
    services: &[ServiceDefinition<ServiceDocument>],
) -> Result<Supergraph, Vec<Diagnostic>> {
    let mut errors = Vec::new();
    let mut scalars = IndexSet::new();
    let mut types: IndexMap<String, MergedType> = IndexMap::new();
    let mut extensions = Vec::new();

    // Pass 1: base definitions establish ownership.
    for service in services {
        for definition in &service.document.definitions {
            match definition {
                Definition::Scalar(scalar) => {
                    scalars.insert(scalar.name.clone());
                }
                Definition::Object(def) if def.extension => extensions.push(Extension {
                    service: &service.name,
                    def,
                }),
                Definition::Object(def) => {
                    add_base_type(&mut types, &service.name, def, &mut errors);
                }
            }
        }
    }

    // Pass 2: extensions add fields to types someone owns.
    for Extension { service, def } in extensions {
        let Some(merged) = types.get_mut(&def.name) else {
            if def.name == QUERY_TYPE {
                let merged = types.entry(def.name.clone()).or_insert_with(|| MergedType {
                    name: def.name.clone(),
                    owner: None,
                    key: Vec::new(),
                    fields: IndexMap::new(),
                });
                merge_fields(merged, service, def, &mut errors);
            } else {
                errors.push(error_at(
                    format!(
                        "[{service}] Type \"{}\" is an extension type, but there is no type definition for \"{}\" in any subgraph.",
                        def.name, def.name
                    ),
                    def.location,
                ));
            }
            continue;
        };

        let foreign_owner = merged
            .owner
            .as_deref()
            .is_some_and(|owner| owner != service);
        if foreign_owner && !merged.is_entity() {
            errors.push(error_at(
                format!(
                    "[{service}] Type \"{}\" is extended but its owning service declares no @key.",
                    def.name
                ),
                def.location,
            ));
            continue;
        }
        merge_fields(merged, service, def, &mut errors);
    }

    let supergraph = Supergraph { scalars, types };
    check_references(&supergraph, services, &mut errors);

    match supergraph.query_type() {
        Some(query) if !query.fields.is_empty() => {}
        _ => errors.push(Diagnostic::new("Query root type must be provided.")),
    }

    if errors.is_empty() {
        Ok(supergraph)
    } else {
        Err(errors)
    }
}

fn add_base_type(
    types: &mut IndexMap<String, MergedType>,
    service: &str,
    def: &ObjectTypeDef,
    errors: &mut Vec<Diagnostic>,
) {
    let is_root = def.name == QUERY_TYPE;
    let merged = types.entry(def.name.clone()).or_insert_with(|| MergedType {
        name: def.name.clone(),
        owner: (!is_root).then(|| service.to_string()),
        key: def.keys.first().cloned().unwrap_or_default(),
        fields: IndexMap::new(),
    });

    if let Some(owner) = merged.owner.as_deref()
        && owner != service
    {
        errors.push(error_at(
            format!(
                "[{service}] There can be only one type named \"{}\"; it is already defined by \"{owner}\".",
                def.name
            ),
            def.location,
        ));
        return;
    }

    merge_fields(merged, service, def, errors);
}

fn merge_fields(
    merged: &mut MergedType,
    service: &str,
    def: &ObjectTypeDef,
    errors: &mut Vec<Diagnostic>,
) {
    for field in def.fields.iter().filter(|f| !f.external) {
        match merged.fields.get(&field.name) {
            Some(existing) if existing.ty != field.ty => {
                errors.push(error_at(
                    format!(
                        "[{service}] Field \"{}.{}\" has conflicting types: \"{}\" in \"{}\" and \"{}\" in \"{service}\".",
                        merged.name, field.name, existing.ty, existing.service, field.ty
                    ),
                    field.location,
                ));
            }
            // Same shape from another service: the first definition resolves it.
            Some(_) => {}
            None => {
                merged.fields.insert(
                    field.name.clone(),
                    MergedField {
                        name: field.name.clone(),
                        arguments: field.arguments.clone(),
                        ty: field.ty.clone(),
                        service: service.to_string(),
                    },
                );
            }
        }
    }
}

fn check_references(
    supergraph: &Supergraph,
    services: &[ServiceDefinition<ServiceDocument>],
    errors: &mut Vec<Diagnostic>,
) {
    for service in services {
        for definition in &service.document.definitions {
            let Definition::Object(def) = definition else {
                continue;
            };
            for field in &def.fields {
                let referenced = std::iter::once(&field.ty)
                    .chain(field.arguments.iter().map(|arg| &arg.ty));
                for ty in referenced {
                    let name = ty.base_name();
                    if !supergraph.is_scalar(name) && supergraph.object_type(name).is_none() {
                        errors.push(error_at(
                            format!("[{}] Unknown type \"{name}\".", service.name),
                            field.location,
                        ));
                    }
                }
            }
        }
    }
}

fn error_at(message: String, location: Location) -> Diagnostic {
    Diagnostic::new(message).with_location(Some(location))
}
