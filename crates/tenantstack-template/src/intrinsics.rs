//! Intrinsic function values understood by the control plane

use serde_json::{Value, json};

/// Prefix shared by pseudo parameters such as `AWS::StackName`
pub const PSEUDO_PREFIX: &str = "AWS::";
pub const STACK_NAME: &str = "AWS::StackName";
pub const REGION: &str = "AWS::Region";

/// Leading character of a literal `${!Name}` inside `Fn::Sub`
pub const SUB_ESCAPE: char = '!';

pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

pub fn sub(template: &str) -> Value {
    json!({ "Fn::Sub": template })
}

pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

pub fn base64(value: Value) -> Value {
    json!({ "Fn::Base64": value })
}

/// `Ref` to each id, in order
pub fn references<'a>(ids: impl IntoIterator<Item = &'a String>) -> Vec<Value> {
    ids.into_iter().map(|id| reference(id)).collect()
}

/// `[{Key, Value}]` tag list
pub fn name_tag(name: Value) -> Value {
    json!([{ "Key": "Name", "Value": name }])
}
