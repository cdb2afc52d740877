//! IAM role and customer managed policy wrappers.

pub mod document;
pub mod policy;
pub mod role;

pub use document::{
    ConditionMap, Effect, OneOrMany, PolicyDocument, Principal, Statement, POLICY_VERSION,
};
pub use policy::PolicyInstance;
pub use role::RoleInstance;
