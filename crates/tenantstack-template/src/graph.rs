//! In-memory resource graph
//!
//! A [`ResourceGraph`] is created empty for one synthesis run, filled by the
//! builder and consumed by the serializer. Insertion of an existing key is an
//! error rather than an overwrite.

use crate::error::{Result, TemplateError};
use crate::intrinsics::{PSEUDO_PREFIX, SUB_ESCAPE};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Stack input bound to a user-supplied value at apply time
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_echo: bool,
    #[serde(rename = "Type")]
    pub param_type: String,
}

impl Parameter {
    pub fn string() -> Self {
        Self {
            param_type: "String".to_string(),
            ..Self::default()
        }
    }

    pub fn of_type(param_type: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn allowed_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_pattern = Some(pattern.into());
        self
    }

    pub fn constraint_description(mut self, text: impl Into<String>) -> Self {
        self.constraint_description = Some(text.into());
        self
    }

    pub fn length(mut self, min: u32, max: u32) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn no_echo(mut self) -> Self {
        self.no_echo = true;
        self
    }
}

/// One infrastructure node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    #[serde(skip)]
    pub logical_id: String,
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "Properties")]
    pub properties: Value,
    /// Ordering edges the control plane cannot infer from value references
    #[serde(rename = "DependsOn", skip_serializing_if = "BTreeSet::is_empty")]
    pub depends_on: BTreeSet<String>,
}

impl Resource {
    pub fn new(logical_id: impl Into<String>, resource_type: &str, properties: Value) -> Self {
        Self {
            logical_id: logical_id.into(),
            resource_type: resource_type.to_string(),
            properties,
            depends_on: BTreeSet::new(),
        }
    }

    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.insert(logical_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Value,
}

impl Output {
    pub fn new(value: Value) -> Self {
        Self {
            description: None,
            value,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Value bound to a [`Parameter`] when a stack is created or updated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterValue {
    pub key: String,
    pub value: String,
}

impl ParameterValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGraph {
    parameters: BTreeMap<String, Parameter>,
    resources: BTreeMap<String, Resource>,
    outputs: BTreeMap<String, Output>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parameter(&mut self, key: impl Into<String>, parameter: Parameter) -> Result<()> {
        let key = key.into();
        if self.parameters.contains_key(&key) {
            return Err(TemplateError::DuplicateLogicalId(key));
        }
        self.parameters.insert(key, parameter);
        Ok(())
    }

    /// Adds a resource, returning its logical id for later references
    pub fn add_resource(&mut self, resource: Resource) -> Result<String> {
        let id = resource.logical_id.clone();
        if self.resources.contains_key(&id) || self.parameters.contains_key(&id) {
            return Err(TemplateError::DuplicateLogicalId(id));
        }
        tracing::trace!(logical_id = %id, resource_type = %resource.resource_type, "add resource");
        self.resources.insert(id.clone(), resource);
        Ok(id)
    }

    pub fn add_output(&mut self, key: impl Into<String>, output: Output) -> Result<()> {
        let key = key.into();
        if self.outputs.contains_key(&key) {
            return Err(TemplateError::DuplicateLogicalId(key));
        }
        self.outputs.insert(key, output);
        Ok(())
    }

    pub fn parameters(&self) -> &BTreeMap<String, Parameter> {
        &self.parameters
    }

    pub fn resources(&self) -> &BTreeMap<String, Resource> {
        &self.resources
    }

    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Checks that every dependency edge and every reference names a declared node
    pub fn validate(&self) -> Result<()> {
        for (id, resource) in &self.resources {
            for target in &resource.depends_on {
                if !self.resources.contains_key(target) {
                    return Err(TemplateError::DanglingDependency {
                        resource: id.clone(),
                        target: target.clone(),
                    });
                }
            }
            self.check_references(id, &resource.properties, &BTreeSet::new())?;
        }

        for (key, output) in &self.outputs {
            self.check_references(key, &output.value, &BTreeSet::new())?;
        }

        Ok(())
    }

    fn is_referable(&self, name: &str) -> bool {
        name.starts_with(PSEUDO_PREFIX)
            || self.resources.contains_key(name)
            || self.parameters.contains_key(name)
    }

    fn dangling(owner: &str, target: &str) -> TemplateError {
        TemplateError::DanglingReference {
            owner: owner.to_string(),
            target: target.to_string(),
        }
    }

    fn check_references(
        &self,
        owner: &str,
        value: &Value,
        locals: &BTreeSet<String>,
    ) -> Result<()> {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(target)) = map.get("Ref") {
                    if !self.is_referable(target) {
                        return Err(Self::dangling(owner, target));
                    }
                }

                if let Some(Value::Array(args)) = map.get("Fn::GetAtt") {
                    if let Some(Value::String(target)) = args.first() {
                        if !self.resources.contains_key(target) {
                            return Err(Self::dangling(owner, target));
                        }
                    }
                }

                if let Some(sub) = map.get("Fn::Sub") {
                    return self.check_sub(owner, sub, locals);
                }

                for child in map.values() {
                    self.check_references(owner, child, locals)?;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.check_references(owner, item, locals)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// `Fn::Sub` takes either a string or `[string, {name: value}]`
    fn check_sub(&self, owner: &str, sub: &Value, locals: &BTreeSet<String>) -> Result<()> {
        match sub {
            Value::String(text) => self.check_sub_text(owner, text, locals),
            Value::Array(args) => {
                let mut scope = locals.clone();
                if let Some(Value::Object(vars)) = args.get(1) {
                    for (name, var) in vars {
                        self.check_references(owner, var, locals)?;
                        scope.insert(name.clone());
                    }
                }
                match args.first() {
                    Some(Value::String(text)) => self.check_sub_text(owner, text, &scope),
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn check_sub_text(&self, owner: &str, text: &str, locals: &BTreeSet<String>) -> Result<()> {
        for name in sub_variables(text) {
            let target = name.split('.').next().unwrap_or(name);
            if !locals.contains(target) && !self.is_referable(target) {
                return Err(Self::dangling(owner, target));
            }
        }
        Ok(())
    }
}

/// Names inside `${...}`, skipping `${!Literal}` escapes
fn sub_variables(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = &after[..end];
        if !name.starts_with(SUB_ESCAPE) {
            names.push(name.trim());
        }
        rest = &after[end + 1..];
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrinsics::{get_att, reference, sub};
    use serde_json::json;

    fn vpc() -> Resource {
        Resource::new("VPCGamma", "AWS::EC2::VPC", json!({"CidrBlock": "10.0.0.0/16"}))
    }

    #[test]
    fn test_duplicate_logical_id_rejected() {
        let mut graph = ResourceGraph::new();
        graph.add_resource(vpc()).unwrap();
        assert!(matches!(
            graph.add_resource(vpc()),
            Err(TemplateError::DuplicateLogicalId(id)) if id == "VPCGamma"
        ));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_dangling_dependency_detected() {
        let mut graph = ResourceGraph::new();
        graph.add_resource(vpc().depends_on("GatewayGamma")).unwrap();
        assert!(matches!(
            graph.validate(),
            Err(TemplateError::DanglingDependency { resource, target })
                if resource == "VPCGamma" && target == "GatewayGamma"
        ));
    }

    #[test]
    fn test_references_resolve_against_resources_and_parameters() {
        let mut graph = ResourceGraph::new();
        graph.add_parameter("DomainName", Parameter::string()).unwrap();
        graph.add_resource(vpc()).unwrap();
        graph
            .add_resource(Resource::new(
                "SubnetGamma0",
                "AWS::EC2::Subnet",
                json!({
                    "VpcId": reference("VPCGamma"),
                    "Tags": [{"Key": "Name", "Value": sub("${AWS::StackName}-${DomainName}")}],
                    "Cidr": get_att("VPCGamma", "CidrBlock"),
                }),
            ))
            .unwrap();
        graph
            .add_output("Vpc", Output::new(reference("VPCGamma")))
            .unwrap();
        graph.validate().unwrap();
    }

    #[test]
    fn test_dangling_reference_detected() {
        let mut graph = ResourceGraph::new();
        graph
            .add_resource(Resource::new(
                "SubnetGamma0",
                "AWS::EC2::Subnet",
                json!({"VpcId": reference("VPCProd")}),
            ))
            .unwrap();
        assert!(matches!(
            graph.validate(),
            Err(TemplateError::DanglingReference { target, .. }) if target == "VPCProd"
        ));

        let mut graph = ResourceGraph::new();
        graph
            .add_output("Elb", Output::new(get_att("LoadBalancerGamma", "DNSName")))
            .unwrap();
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_sub_variables() {
        assert_eq!(
            sub_variables("${a}.${B.Arn} ${!literal} ${ c }"),
            vec!["a", "B.Arn", "c"]
        );
        assert!(sub_variables("no vars ${unterminated").is_empty());

        let mut graph = ResourceGraph::new();
        graph
            .add_resource(Resource::new(
                "RuleGamma",
                "AWS::ElasticLoadBalancingV2::ListenerRule",
                json!({"Host": {"Fn::Sub": ["${Local}.${Missing}", {"Local": "x"}]}}),
            ))
            .unwrap();
        assert!(matches!(
            graph.validate(),
            Err(TemplateError::DanglingReference { target, .. }) if target == "Missing"
        ));
    }

    #[test]
    fn test_resource_serialization_shape() {
        let resource = vpc().depends_on("B").depends_on("A");
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(
            value,
            json!({
                "Type": "AWS::EC2::VPC",
                "Properties": {"CidrBlock": "10.0.0.0/16"},
                "DependsOn": ["A", "B"],
            })
        );
        let bare = serde_json::to_value(vpc()).unwrap();
        assert!(bare.get("DependsOn").is_none());
    }

    #[test]
    fn test_parameter_serialization_shape() {
        let value = serde_json::to_value(
            Parameter::string()
                .allowed_pattern("[a-z]+")
                .length(8, 64)
                .no_echo(),
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "AllowedPattern": "[a-z]+",
                "MaxLength": 64,
                "MinLength": 8,
                "NoEcho": true,
                "Type": "String",
            })
        );
    }
}
