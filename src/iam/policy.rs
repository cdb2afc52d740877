//! IAM managed policy wrapper.

use async_trait::async_trait;
use aws_sdk_iam::operation::create_policy::CreatePolicyOutput;
use aws_sdk_iam::operation::get_policy::GetPolicyOutput;
use aws_sdk_iam::operation::get_policy_version::GetPolicyVersionOutput;
use aws_sdk_iam::types::PolicyVersion;
use aws_sdk_iam::Client as IamClient;
use log::debug;

use crate::arn::Arn;
use crate::error::{CloudObjectError, CloudObjectResult};
use crate::iam::document::PolicyDocument;
use crate::object::CloudObject;

async fn create_policy(
    iam: &IamClient,
    name: &str,
    description: &str,
    document: &PolicyDocument,
) -> CloudObjectResult<CreatePolicyOutput> {
    let json = document.to_json()?;
    debug!("creating policy '{name}'");
    iam.create_policy()
        .policy_name(name)
        .description(description)
        .policy_document(json)
        .send()
        .await
        .map_err(|e| {
            CloudObjectError::Iam(format!(
                "failed to create policy '{name}': {}",
                e.into_service_error()
            ))
        })
}

/// Publishing a new default version is how managed policies are updated.
async fn update_policy(
    iam: &IamClient,
    arn: &Arn,
    document: &PolicyDocument,
) -> CloudObjectResult<()> {
    let json = document.to_json()?;
    debug!("publishing new default version for policy '{arn}'");
    iam.create_policy_version()
        .policy_arn(arn.to_string())
        .policy_document(json)
        .set_as_default(true)
        .send()
        .await
        .map_err(|e| {
            CloudObjectError::Iam(format!(
                "failed to create policy version for '{arn}': {}",
                e.into_service_error()
            ))
        })?;
    Ok(())
}

/// Version ids that have to be removed before the policy itself can go.
fn non_default_version_ids(versions: &[PolicyVersion]) -> Vec<&str> {
    versions
        .iter()
        .filter(|version| !version.is_default_version())
        .filter_map(PolicyVersion::version_id)
        .collect()
}

async fn delete_policy(iam: &IamClient, arn: &Arn) -> CloudObjectResult<()> {
    // IAM refuses to delete a policy that still has non-default versions.
    let listed = iam
        .list_policy_versions()
        .policy_arn(arn.to_string())
        .send()
        .await
        .map_err(|e| {
            CloudObjectError::Iam(format!(
                "failed to list versions of policy '{arn}': {}",
                e.into_service_error()
            ))
        })?;

    for version_id in non_default_version_ids(listed.versions()) {
        debug!("deleting version '{version_id}' of policy '{arn}'");
        iam.delete_policy_version()
            .policy_arn(arn.to_string())
            .version_id(version_id)
            .send()
            .await
            .map_err(|e| {
                CloudObjectError::Iam(format!(
                    "failed to delete version '{version_id}' of policy '{arn}': {}",
                    e.into_service_error()
                ))
            })?;
    }

    debug!("deleting policy '{arn}'");
    if let Err(e) = iam.delete_policy().policy_arn(arn.to_string()).send().await {
        let service_error = e.into_service_error();
        if !service_error.is_no_such_entity_exception() {
            return Err(CloudObjectError::Iam(format!(
                "failed to delete policy '{arn}': {service_error}"
            )));
        }
        debug!("policy '{arn}' already gone, nothing to delete");
    }
    Ok(())
}

async fn get_policy(iam: &IamClient, arn: &Arn) -> CloudObjectResult<GetPolicyOutput> {
    iam.get_policy()
        .policy_arn(arn.to_string())
        .send()
        .await
        .map_err(|e| {
            CloudObjectError::Iam(format!(
                "failed to get policy '{arn}': {}",
                e.into_service_error()
            ))
        })
}

async fn get_policy_version(
    iam: &IamClient,
    arn: &Arn,
    version_id: &str,
) -> CloudObjectResult<GetPolicyVersionOutput> {
    iam.get_policy_version()
        .policy_arn(arn.to_string())
        .version_id(version_id)
        .send()
        .await
        .map_err(|e| {
            CloudObjectError::Iam(format!(
                "failed to get version '{version_id}' of policy '{arn}': {}",
                e.into_service_error()
            ))
        })
}

/// IAM returns policy documents URL-encoded.
fn parse_encoded_document(encoded: &str) -> CloudObjectResult<PolicyDocument> {
    let decoded = percent_encoding::percent_decode_str(encoded)
        .decode_utf8()
        .map_err(|e| {
            CloudObjectError::MalformedResponse(format!(
                "policy document is not valid UTF-8 after decoding: {e}"
            ))
        })?;
    Ok(serde_json::from_str(&decoded)?)
}

/// Wrapper around a customer managed IAM policy.
#[derive(Debug, Clone)]
pub struct PolicyInstance {
    pub name: String,
    pub description: String,
    pub policy_document: PolicyDocument,
    arn: Option<Arn>,
}

impl PolicyInstance {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        policy_document: PolicyDocument,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            policy_document,
            arn: None,
        }
    }

    /// Adopt a managed policy that already exists in the account.
    pub fn existing(
        name: impl Into<String>,
        description: impl Into<String>,
        policy_document: PolicyDocument,
        arn: Arn,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            policy_document,
            arn: Some(arn),
        }
    }

    fn created_arn(&self) -> CloudObjectResult<&Arn> {
        self.arn
            .as_ref()
            .ok_or_else(|| CloudObjectError::NotYetCreated(self.name.clone()))
    }
}

#[async_trait]
impl CloudObject for PolicyInstance {
    async fn create(&mut self, iam: &IamClient) -> CloudObjectResult<()> {
        let out = create_policy(iam, &self.name, &self.description, &self.policy_document).await?;
        let arn = out
            .policy()
            .and_then(|policy| policy.arn())
            .ok_or_else(|| {
                CloudObjectError::MalformedResponse(
                    "CreatePolicy returned no policy ARN".to_string(),
                )
            })?;
        self.arn = Some(arn.parse()?);
        Ok(())
    }

    async fn read(&mut self, iam: &IamClient) -> CloudObjectResult<()> {
        let arn = self.created_arn()?.clone();
        let out = get_policy(iam, &arn).await?;
        let policy = out.policy().ok_or_else(|| {
            CloudObjectError::MalformedResponse("GetPolicy returned no policy".to_string())
        })?;
        let version_id = policy.default_version_id().ok_or_else(|| {
            CloudObjectError::MalformedResponse(format!(
                "policy '{arn}' has no default version"
            ))
        })?;

        let version_out = get_policy_version(iam, &arn, version_id).await?;
        let document = version_out
            .policy_version()
            .and_then(PolicyVersion::document)
            .ok_or_else(|| {
                CloudObjectError::MalformedResponse(format!(
                    "version '{version_id}' of policy '{arn}' has no document"
                ))
            })?;

        self.policy_document = parse_encoded_document(document)?;
        if let Some(name) = policy.policy_name() {
            self.name = name.to_string();
        }
        self.description = policy.description().unwrap_or_default().to_string();
        Ok(())
    }

    async fn update(&self, iam: &IamClient) -> CloudObjectResult<()> {
        let arn = self.created_arn()?;
        update_policy(iam, arn, &self.policy_document).await
    }

    async fn delete(&self, iam: &IamClient) -> CloudObjectResult<()> {
        let arn = self.created_arn()?;
        delete_policy(iam, arn).await
    }

    fn arn(&self) -> Option<&Arn> {
        self.arn.as_ref()
    }
}
