//! ARN parsing helpers.

use std::fmt;
use std::str::FromStr;

use crate::error::CloudObjectError;

/// A parsed Amazon Resource Name.
///
/// ARNs carry six `:`-separated fields:
/// `arn:partition:service:region:account-id:resource`. The resource field may
/// itself contain `:` or `/` separators; everything after the fifth `:` is
/// kept verbatim so the string round-trips through [`fmt::Display`] exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arn {
    partition: String,
    service: String,
    region: String,
    account_id: String,
    resource: String,
}

impl Arn {
    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region field; empty for global services such as IAM.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// 12-digit account id, or empty for account-less ARNs (e.g. S3 buckets).
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// The raw resource field, e.g. `role/MyRole` or `policy/path/MyPolicy`.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Friendly trailing name of the resource field.
    ///
    /// IAM APIs that take a name rather than an ARN want this form:
    /// `role/ops/MyRole` yields `MyRole`.
    pub fn resource_name(&self) -> &str {
        match self.resource.rsplit_once('/') {
            Some((_, name)) => name,
            None => self
                .resource
                .rsplit_once(':')
                .map_or(self.resource.as_str(), |(_, name)| name),
        }
    }
}

impl FromStr for Arn {
    type Err = CloudObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CloudObjectError::InvalidArn {
            arn: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.splitn(6, ':').collect();
        if parts.len() != 6 {
            return Err(invalid("expected six colon-separated fields"));
        }
        if parts[0] != "arn" {
            return Err(invalid("missing 'arn' prefix"));
        }
        if parts[1].is_empty() {
            return Err(invalid("empty partition"));
        }
        if parts[2].is_empty() {
            return Err(invalid("empty service"));
        }
        let account_id = parts[4];
        if !account_id.is_empty()
            && (account_id.len() != 12 || !account_id.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(invalid("account id must be 12 ASCII digits"));
        }
        if parts[5].is_empty() {
            return Err(invalid("empty resource"));
        }

        Ok(Self {
            partition: parts[1].to_string(),
            service: parts[2].to_string(),
            region: parts[3].to_string(),
            account_id: account_id.to_string(),
            resource: parts[5].to_string(),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

/// Parse a comma-separated list of ARN strings.
///
/// Fails on the first element that does not parse; surrounding whitespace per
/// element is ignored.
pub fn arnify(input: &str) -> Result<Vec<Arn>, CloudObjectError> {
    input.split(',').map(|part| part.trim().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_role_arn_round_trips() {
        let text = "arn:aws:iam::123456789012:role/MyRole";
        let arn: Arn = text.parse().unwrap();
        assert_eq!(arn.partition(), "aws");
        assert_eq!(arn.service(), "iam");
        assert_eq!(arn.region(), "");
        assert_eq!(arn.account_id(), "123456789012");
        assert_eq!(arn.resource(), "role/MyRole");
        assert_eq!(arn.to_string(), text);
    }

    #[test]
    fn parse_regional_arn() {
        let arn: Arn = "arn:aws:dynamodb:us-east-1:123456789012:table/MyTable"
            .parse()
            .unwrap();
        assert_eq!(arn.region(), "us-east-1");
        assert_eq!(arn.resource_name(), "MyTable");
    }

    #[test]
    fn resource_name_strips_paths() {
        let arn: Arn = "arn:aws:iam::123456789012:role/ops/team/MyRole"
            .parse()
            .unwrap();
        assert_eq!(arn.resource_name(), "MyRole");
    }

    #[test]
    fn resource_name_handles_colon_separator() {
        let arn: Arn = "arn:aws:logs:us-east-1:123456789012:log-group:my-group"
            .parse()
            .unwrap();
        assert_eq!(arn.resource_name(), "my-group");
    }

    #[test]
    fn resource_name_without_separator_is_whole_field() {
        let arn: Arn = "arn:aws:s3:::my-bucket".parse().unwrap();
        assert_eq!(arn.resource_name(), "my-bucket");
        assert_eq!(arn.account_id(), "");
    }

    #[test]
    fn rejects_missing_prefix() {
        let err = "not-an-arn".parse::<Arn>().unwrap_err();
        assert!(matches!(err, CloudObjectError::InvalidArn { .. }));
    }

    #[test]
    fn rejects_too_few_fields() {
        assert!("arn:aws:iam".parse::<Arn>().is_err());
    }

    #[test]
    fn rejects_bad_account_id() {
        // Too short
        assert!("arn:aws:iam::12345678901:role/MyRole".parse::<Arn>().is_err());
        // Too long
        assert!("arn:aws:iam::1234567890123:role/MyRole"
            .parse::<Arn>()
            .is_err());
        // Non-numeric
        assert!("arn:aws:iam::12345678901a:role/MyRole"
            .parse::<Arn>()
            .is_err());
    }

    #[test]
    fn rejects_empty_resource() {
        assert!("arn:aws:iam::123456789012:".parse::<Arn>().is_err());
    }

    #[test]
    fn arnify_parses_comma_separated_list() {
        let arns = arnify(
            "arn:aws:iam::123456789012:role/MyRole, arn:aws:iam::123456789012:saml-provider/MyProvider",
        )
        .unwrap();
        assert_eq!(arns.len(), 2);
        assert_eq!(arns[0].resource_name(), "MyRole");
        assert_eq!(arns[1].resource_name(), "MyProvider");
    }

    #[test]
    fn arnify_fails_on_invalid_element() {
        assert!(arnify("arn:aws:iam::123456789012:role/MyRole,garbage").is_err());
    }
}
