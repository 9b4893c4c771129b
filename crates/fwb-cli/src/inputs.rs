//! Reading service documents, queries and remote responses from disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use fwb_model::DocumentSet;
use indexmap::IndexMap;

/// A `SERVICE` argument: `path` or `name=path`.
///
/// Without an explicit name, the file stem names the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSource {
    pub name: String,
    pub path: PathBuf,
}

impl FromStr for ServiceSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some((name, path)) = value.split_once('=') {
            let name = name.trim();
            if name.is_empty() {
                return Err(format!("missing service name in '{value}'"));
            }
            if path.is_empty() {
                return Err(format!("missing path for service '{name}'"));
            }
            return Ok(Self {
                name: name.to_string(),
                path: PathBuf::from(path),
            });
        }

        let path = PathBuf::from(value);
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.trim().is_empty())
            .ok_or_else(|| format!("cannot derive a service name from '{value}'"))?
            .to_string();
        Ok(Self { name, path })
    }
}

impl fmt::Display for ServiceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.path.display())
    }
}

/// Read every service file, in argument order.
///
/// A later argument with the same name replaces the earlier text.
pub fn read_services(sources: &[ServiceSource]) -> Result<Vec<(String, String)>> {
    sources
        .iter()
        .map(|source| {
            let text = std::fs::read_to_string(&source.path)
                .with_context(|| format!("read service '{}'", source))?;
            Ok((source.name.clone(), text))
        })
        .collect()
}

/// Read a query document.
pub fn read_query(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read query {}", path.display()))
}

/// Read a remote services response: a JSON object of name to SDL.
///
/// Also accepts the object wrapped as `{ "services": { ... } }`.
pub fn read_remote_services(path: &Path) -> Result<IndexMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read remote services {}", path.display()))?;
    parse_remote_services(&content).with_context(|| format!("parse {}", path.display()))
}

/// Parse a remote services response.
pub fn parse_remote_services(content: &str) -> Result<IndexMap<String, String>> {
    let mut value: serde_json::Value = serde_json::from_str(content)?;
    if let Some(inner) = value.get_mut("services").filter(|inner| inner.is_object()) {
        value = inner.take();
    }
    if !value.is_object() {
        bail!("expected a JSON object of service name to SDL");
    }
    let services: IndexMap<String, String> = serde_json::from_value(value)?;

    // Blank names cannot be selected or saved.
    let documents: DocumentSet = services.into_iter().collect();
    Ok(documents
        .iter()
        .map(|(name, text)| (name.to_string(), text.to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_file_stem() {
        let source: ServiceSource = "schemas/products.graphql".parse().unwrap();
        assert_eq!(source.name, "products");
        assert_eq!(source.path, PathBuf::from("schemas/products.graphql"));
    }

    #[test]
    fn test_explicit_name() {
        let source: ServiceSource = "inventory=schemas/stock.graphql".parse().unwrap();
        assert_eq!(source.name, "inventory");
        assert_eq!(source.path, PathBuf::from("schemas/stock.graphql"));
        assert_eq!(source.to_string(), "inventory=schemas/stock.graphql");
    }

    #[test]
    fn test_rejects_empty_parts() {
        assert!("=a.graphql".parse::<ServiceSource>().is_err());
        assert!("products=".parse::<ServiceSource>().is_err());
        assert!("".parse::<ServiceSource>().is_err());
    }

    #[test]
    fn test_remote_services_shapes() {
        let flat = parse_remote_services(r#"{"b":"type B","a":"type A"}"#).unwrap();
        assert_eq!(flat.keys().collect::<Vec<_>>(), vec!["b", "a"]);

        let wrapped = parse_remote_services(r#"{"services":{"a":"type A"}}"#).unwrap();
        assert_eq!(wrapped.get("a").map(String::as_str), Some("type A"));

        let blank = parse_remote_services(r#"{"  ":"x","a":"y"}"#).unwrap();
        assert_eq!(blank.len(), 1);

        assert!(parse_remote_services("[1, 2]").is_err());
        assert!(parse_remote_services(r#"{"a": 1}"#).is_err());
    }
}
