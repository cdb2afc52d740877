//! IAM role wrapper.

use async_trait::async_trait;
use aws_sdk_iam::operation::create_role::CreateRoleOutput;
use aws_sdk_iam::operation::get_role::GetRoleOutput;
use aws_sdk_iam::Client as IamClient;
use log::debug;

use crate::arn::Arn;
use crate::error::{CloudObjectError, CloudObjectResult};
use crate::iam::document::PolicyDocument;
use crate::object::CloudObject;

async fn create_role(
    iam: &IamClient,
    name: &str,
    description: &str,
    max_session_duration: i32,
    trust: &PolicyDocument,
) -> CloudObjectResult<CreateRoleOutput> {
    let document = trust.to_json()?;
    debug!("creating role '{name}'");
    iam.create_role()
        .role_name(name)
        .description(description)
        .max_session_duration(max_session_duration)
        .assume_role_policy_document(document)
        .send()
        .await
        .map_err(|e| {
            CloudObjectError::Iam(format!(
                "failed to create role '{name}': {}",
                e.into_service_error()
            ))
        })
}

async fn get_role(iam: &IamClient, name: &str) -> CloudObjectResult<GetRoleOutput> {
    iam.get_role().role_name(name).send().await.map_err(|e| {
        CloudObjectError::Iam(format!(
            "failed to get role '{name}': {}",
            e.into_service_error()
        ))
    })
}

async fn update_role(
    iam: &IamClient,
    name: &str,
    description: &str,
    trust: &PolicyDocument,
) -> CloudObjectResult<()> {
    debug!("updating role '{name}'");
    iam.update_role()
        .role_name(name)
        .description(description)
        .send()
        .await
        .map_err(|e| {
            CloudObjectError::Iam(format!(
                "failed to update role '{name}': {}",
                e.into_service_error()
            ))
        })?;

    let document = trust.to_json()?;
    iam.update_assume_role_policy()
        .role_name(name)
        .policy_document(document)
        .send()
        .await
        .map_err(|e| {
            CloudObjectError::Iam(format!(
                "failed to update assume role policy on '{name}': {}",
                e.into_service_error()
            ))
        })?;
    Ok(())
}

async fn delete_role(iam: &IamClient, name: &str) -> CloudObjectResult<()> {
    debug!("deleting role '{name}'");
    if let Err(e) = iam.delete_role().role_name(name).send().await {
        let service_error = e.into_service_error();
        if !service_error.is_no_such_entity_exception() {
            return Err(CloudObjectError::Iam(format!(
                "failed to delete role '{name}': {service_error}"
            )));
        }
        debug!("role '{name}' already gone, nothing to delete");
    }
    Ok(())
}

/// Wrapper around an IAM role and its assume-role (trust) policy.
///
/// The ARN field is private: it is only ever set from a service response
/// (via [`CloudObject::create`] or [`CloudObject::read`]) or by adopting an
/// existing role with [`RoleInstance::existing`].
#[derive(Debug, Clone)]
pub struct RoleInstance {
    pub name: String,
    pub description: String,
    pub assume_role_policy: PolicyDocument,
    pub max_session_duration: i32,
    arn: Option<Arn>,
}

impl RoleInstance {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        max_session_duration: i32,
        assume_role_policy: PolicyDocument,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            assume_role_policy,
            max_session_duration,
            arn: None,
        }
    }

    /// Adopt a role that already exists in the account.
    pub fn existing(
        name: impl Into<String>,
        description: impl Into<String>,
        max_session_duration: i32,
        assume_role_policy: PolicyDocument,
        arn: Arn,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            assume_role_policy,
            max_session_duration,
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
impl CloudObject for RoleInstance {
    async fn create(&mut self, iam: &IamClient) -> CloudObjectResult<()> {
        let out = create_role(
            iam,
            &self.name,
            &self.description,
            self.max_session_duration,
            &self.assume_role_policy,
        )
        .await?;
        let role = out.role().ok_or_else(|| {
            CloudObjectError::MalformedResponse("CreateRole returned no role".to_string())
        })?;
        self.arn = Some(role.arn().parse()?);
        Ok(())
    }

    async fn read(&mut self, iam: &IamClient) -> CloudObjectResult<()> {
        let out = get_role(iam, &self.name).await?;
        let role = out.role().ok_or_else(|| {
            CloudObjectError::MalformedResponse("GetRole returned no role".to_string())
        })?;
        self.arn = Some(role.arn().parse()?);
        self.name = role.role_name().to_string();
        self.description = role.description().unwrap_or_default().to_string();
        if let Some(duration) = role.max_session_duration() {
            self.max_session_duration = duration;
        }
        Ok(())
    }

    async fn update(&self, iam: &IamClient) -> CloudObjectResult<()> {
        let arn = self.created_arn()?;
        update_role(
            iam,
            arn.resource_name(),
            &self.description,
            &self.assume_role_policy,
        )
        .await
    }

    async fn delete(&self, iam: &IamClient) -> CloudObjectResult<()> {
        let arn = self.created_arn()?;
        delete_role(iam, arn.resource_name()).await
    }

    fn arn(&self) -> Option<&Arn> {
        self.arn.as_ref()
    }
}
