use anyhow::{Context, Result};
use aws_config::{Region, SdkConfig};
use aws_sdk_secretsmanager::{config, Client};

pub struct SecretService {
    client: Client,
}

impl SecretService {
    pub fn new(sdk_config: &SdkConfig, region: &str) -> Self {
        let conf = config::Builder::from(sdk_config)
            .region(Region::new(region.to_string()))
            .build();

        Self {
            client: Client::from_conf(conf),
        }
    }

    pub async fn get_secret(&self, name: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .with_context(|| format!("failed to fetch secret {}", name))?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("secret {} has no string value", name))
    }
}
