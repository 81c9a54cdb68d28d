use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use std::env;
use std::time::SystemTime;

const ROLE_NAME: &str = "bedrock";
const SESSION_NAME: &str = "bedrock-rag";

pub fn role_arn(account_id: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, ROLE_NAME)
}

/// Ambient SDK configuration (environment, profile, instance role) pinned to `region`.
pub async fn load_base_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

pub async fn account_id(config: &SdkConfig) -> Result<String> {
    let identity = aws_sdk_sts::Client::new(config)
        .get_caller_identity()
        .send()
        .await
        .context("failed to get caller identity")?;

    identity
        .account()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("caller identity has no account id"))
}

/// Assumes the `bedrock` role in `account_id` and returns a configuration
/// carrying the temporary credentials.
///
/// Also sets `AWS_DEFAULT_REGION` for the rest of the process.
pub async fn resolve(base: &SdkConfig, region: &str, account_id: &str) -> Result<SdkConfig> {
    env::set_var("AWS_DEFAULT_REGION", region);

    let role_arn = role_arn(account_id);
    log::info!("Assuming role {}", role_arn);

    let assumed = aws_sdk_sts::Client::new(base)
        .assume_role()
        .role_arn(&role_arn)
        .role_session_name(SESSION_NAME)
        .send()
        .await
        .with_context(|| format!("failed to assume role {}", role_arn))?;

    let creds = assumed
        .credentials()
        .ok_or_else(|| anyhow::anyhow!("assume role returned no credentials for {}", role_arn))?;

    let credentials = Credentials::new(
        creds.access_key_id(),
        creds.secret_access_key(),
        Some(creds.session_token().to_string()),
        SystemTime::try_from(creds.expiration().clone()).ok(),
        "AssumeRole",
    );

    Ok(base
        .to_builder()
        .region(Region::new(region.to_string()))
        .credentials_provider(SharedCredentialsProvider::new(credentials))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_arn_is_built_from_account() {
        assert_eq!(role_arn("123456789012"), "arn:aws:iam::123456789012:role/bedrock");
    }
}
