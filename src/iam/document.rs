//! IAM policy document model.
//!
//! Mirrors the IAM JSON policy grammar closely enough to round-trip documents
//! the service hands back: PascalCase wire names, and single-value fields that
//! may be written either as a string or as a list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CloudObjectResult;

/// Policy language version used for all generated documents.
pub const POLICY_VERSION: &str = "2012-10-17";

/// A value that IAM accepts as a bare string or a list of strings.
///
/// The parsed shape is preserved on re-serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Single(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            Self::Single(value) => std::slice::from_ref(value).iter().map(String::as_str),
            Self::Many(values) => values.as_slice().iter().map(String::as_str),
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Statement principal: either the `"*"` wildcard or a map of principal kind
/// (`AWS`, `Service`, `Federated`, ...) to identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Principal {
    Wildcard(String),
    Map(BTreeMap<String, OneOrMany>),
}

impl Principal {
    /// Principal map for a single AWS service, e.g. `ec2.amazonaws.com`.
    pub fn service(service: &str) -> Self {
        let mut map = BTreeMap::new();
        map.insert("Service".to_string(), OneOrMany::from(service));
        Self::Map(map)
    }
}

pub type ConditionMap = BTreeMap<String, BTreeMap<String, OneOrMany>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    pub action: OneOrMany,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub condition: ConditionMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            id: None,
            statement: statements,
        }
    }

    /// Single-statement allow document over the given actions and resources.
    pub fn single_allow(
        actions: impl Into<OneOrMany>,
        resources: impl Into<OneOrMany>,
    ) -> Self {
        Self::new(vec![Statement {
            sid: None,
            effect: Effect::Allow,
            principal: None,
            action: actions.into(),
            resource: Some(resources.into()),
            condition: ConditionMap::new(),
        }])
    }

    /// Trust policy allowing the given AWS service to assume a role.
    pub fn service_trust(service: &str) -> Self {
        Self::new(vec![Statement {
            sid: None,
            effect: Effect::Allow,
            principal: Some(Principal::service(service)),
            action: OneOrMany::from("sts:AssumeRole"),
            resource: None,
            condition: ConditionMap::new(),
        }])
    }

    /// Serialize to the compact JSON form the IAM APIs expect.
    pub fn to_json(&self) -> CloudObjectResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_allow_serializes_with_pascal_case_keys() {
        let doc = PolicyDocument::single_allow("s3:GetObject", "arn:aws:s3:::bucket/*");
        let json = doc.to_json().unwrap();
        assert!(json.contains(r#""Version":"2012-10-17""#));
        assert!(json.contains(r#""Effect":"Allow""#));
        assert!(json.contains(r#""Action":"s3:GetObject""#));
        assert!(json.contains(r#""Resource":"arn:aws:s3:::bucket/*""#));
        // Optional fields are omitted entirely
        assert!(!json.contains("Principal"));
        assert!(!json.contains("Condition"));
        assert!(!json.contains("Sid"));
    }

    #[test]
    fn service_trust_document_shape() {
        let doc = PolicyDocument::service_trust("ec2.amazonaws.com");
        let json = doc.to_json().unwrap();
        assert!(json.contains(r#""Principal":{"Service":"ec2.amazonaws.com"}"#));
        assert!(json.contains(r#""Action":"sts:AssumeRole""#));
    }

    #[test]
    fn accepts_single_string_action() {
        let doc: PolicyDocument = serde_json::from_str(
            r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"s3:GetObject","Resource":"*"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.statement[0].action, OneOrMany::from("s3:GetObject"));
    }

    #[test]
    fn accepts_action_list() {
        let doc: PolicyDocument = serde_json::from_str(
            r#"{"Version":"2012-10-17","Statement":[{"Effect":"Deny","Action":["s3:GetObject","s3:PutObject"],"Resource":"*"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.statement[0].effect, Effect::Deny);
        let actions: Vec<&str> = doc.statement[0].action.iter().collect();
        assert_eq!(actions, vec!["s3:GetObject", "s3:PutObject"]);
    }

    #[test]
    fn round_trip_preserves_value_shape() {
        let input = r#"{"Version":"2012-10-17","Statement":[{"Sid":"AllowRead","Effect":"Allow","Action":["s3:GetObject"],"Resource":"arn:aws:s3:::bucket/*"}]}"#;
        let doc: PolicyDocument = serde_json::from_str(input).unwrap();
        let output = serde_json::to_string(&doc).unwrap();
        // List stays a list, bare string stays a bare string
        assert!(output.contains(r#""Action":["s3:GetObject"]"#));
        assert!(output.contains(r#""Resource":"arn:aws:s3:::bucket/*""#));
    }

    #[test]
    fn parses_wildcard_principal_and_condition() {
        let input = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Principal":"*","Action":"sts:AssumeRole","Condition":{"StringEquals":{"sts:ExternalId":"abc"}}}]}"#;
        let doc: PolicyDocument = serde_json::from_str(input).unwrap();
        assert_eq!(
            doc.statement[0].principal,
            Some(Principal::Wildcard("*".to_string()))
        );
        assert!(doc.statement[0].condition.contains_key("StringEquals"));
    }
}
