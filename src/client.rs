//! AWS SDK client bootstrap.

use aws_config::BehaviorVersion;
use aws_sdk_iam::Client as IamClient;

/// Build an IAM client from the standard credential provider chain.
///
/// All instance methods take `&aws_sdk_iam::Client`, so callers that need a
/// specific profile, region or test endpoint can construct their own client
/// instead of using this helper.
pub async fn default_iam_client() -> IamClient {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    IamClient::new(&config)
}
