//! Object-oriented wrappers around AWS IAM resource management:
//! - `RoleInstance` and `PolicyInstance` with create/read/update/delete
//!   lifecycles mapped one-to-one onto the corresponding SDK calls
//! - ARN parsing helpers
//! - an IAM policy document model that round-trips the service's JSON
//!
//! The wrappers keep just enough state (the resource ARN) to answer "does
//! this already exist" and to guard mutations on resources that were never
//! created. Everything else is delegated to the AWS SDK.

mod arn;
mod client;
mod error;
mod iam;
mod object;

// Re-exports for a small, focused public API
pub use arn::{arnify, Arn};
pub use client::default_iam_client;
pub use error::{CloudObjectError, CloudObjectResult};
pub use iam::{
    ConditionMap, Effect, OneOrMany, PolicyDocument, PolicyInstance, Principal, RoleInstance,
    Statement, POLICY_VERSION,
};
pub use object::CloudObject;
