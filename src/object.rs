//! Shared CRUD surface for IAM-backed object wrappers.

use async_trait::async_trait;
use aws_sdk_iam::Client as IamClient;

use crate::arn::Arn;
use crate::error::CloudObjectResult;

/// Lifecycle operations common to all wrapped IAM resources.
///
/// Implementations are thin mappings onto the corresponding SDK calls; the
/// only state they keep is the ARN returned by the service on creation.
#[async_trait]
pub trait CloudObject {
    /// Create the remote resource and record the ARN it was assigned.
    async fn create(&mut self, iam: &IamClient) -> CloudObjectResult<()>;

    /// Refresh local fields from the remote resource.
    async fn read(&mut self, iam: &IamClient) -> CloudObjectResult<()>;

    /// Push local fields to the remote resource. Requires [`Self::is_created`].
    async fn update(&self, iam: &IamClient) -> CloudObjectResult<()>;

    /// Remove the remote resource. Requires [`Self::is_created`]; a resource
    /// that is already gone is not an error.
    async fn delete(&self, iam: &IamClient) -> CloudObjectResult<()>;

    /// ARN of the remote resource, if it has been created or adopted.
    fn arn(&self) -> Option<&Arn>;

    fn is_created(&self) -> bool {
        self.arn().is_some()
    }
}
