//! Canonical template serialization
//!
//! Output is deterministic: every map in the graph is ordered, JSON is written
//! with a fixed 4-space indent and a trailing newline.

use crate::error::Result;
use crate::graph::{Output, Parameter, Resource, ResourceGraph};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Literal suffix some upstream resource definitions append to property names
pub const ERRONEOUS_PROPERTY_SUFFIX: &str = " (SecurityGroupIngress only)";

const INDENT: &[u8] = b"    ";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateDocument<'a> {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: &'static str,
    #[serde(skip_serializing_if = "is_empty")]
    parameters: &'a BTreeMap<String, Parameter>,
    resources: &'a BTreeMap<String, Resource>,
    #[serde(skip_serializing_if = "is_empty")]
    outputs: &'a BTreeMap<String, Output>,
}

fn is_empty<V>(map: &&BTreeMap<String, V>) -> bool {
    map.is_empty()
}

/// Validates the graph and renders it as template text
pub fn serialize(graph: &ResourceGraph) -> Result<String> {
    graph.validate()?;

    let document = TemplateDocument {
        format_version: TEMPLATE_FORMAT_VERSION,
        parameters: graph.parameters(),
        resources: graph.resources(),
        outputs: graph.outputs(),
    };

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut serializer)?;
    buf.push(b'\n');

    // serde_json only ever emits UTF-8
    let text = String::from_utf8_lossy(&buf);
    Ok(normalize(&text))
}

/// Strips [`ERRONEOUS_PROPERTY_SUFFIX`] wherever it occurs
pub fn normalize(text: &str) -> String {
    text.replace(ERRONEOUS_PROPERTY_SUFFIX, "")
}

/// Serializes the graph to `path` for offline inspection
pub fn write_to_file(graph: &ResourceGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let body = serialize(graph)?;
    std::fs::write(path, body)?;
    info!(path = %path.display(), "wrote template");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateError;
    use serde_json::json;

    fn small_graph() -> ResourceGraph {
        let mut graph = ResourceGraph::new();
        graph
            .add_resource(Resource::new(
                "VPCGamma",
                "AWS::EC2::VPC",
                json!({"CidrBlock": "10.0.0.0/16"}),
            ))
            .unwrap();
        graph
            .add_resource(Resource::new(
                "IngressGamma",
                "AWS::EC2::SecurityGroupIngress",
                json!({"SourceSecurityGroupId (SecurityGroupIngress only)": {"Ref": "VPCGamma"}}),
            ))
            .unwrap();
        graph
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let graph = small_graph();
        let first = serialize(&graph).unwrap();
        let second = serialize(&graph.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_layout() {
        let text = serialize(&small_graph()).unwrap();
        assert!(text.starts_with("{\n    \"AWSTemplateFormatVersion\": \"2010-09-09\",\n"));
        assert!(text.contains("\n        \"IngressGamma\": {"));
        assert!(text.ends_with("}\n"));
        assert!(!text.contains("\"Parameters\""));
    }

    #[test]
    fn test_erroneous_suffix_stripped() {
        let text = serialize(&small_graph()).unwrap();
        assert!(!text.contains(ERRONEOUS_PROPERTY_SUFFIX));
        assert!(text.contains("\"SourceSecurityGroupId\": {"));
        assert_eq!(normalize("a (SecurityGroupIngress only) b"), "a b");
    }

    #[test]
    fn test_invalid_graph_is_not_serialized() {
        let mut graph = small_graph();
        graph
            .add_resource(
                Resource::new("RouteGamma", "AWS::EC2::Route", json!({})).depends_on("Missing"),
            )
            .unwrap();
        assert!(matches!(
            serialize(&graph),
            Err(TemplateError::DanglingDependency { .. })
        ));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenantstack-service-cf-Gamma.json");
        write_to_file(&small_graph(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, serialize(&small_graph()).unwrap());
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["Resources"]["VPCGamma"]["Type"], "AWS::EC2::VPC");
    }
}
