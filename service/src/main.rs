use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use tracing_subscriber::{fmt, EnvFilter};

use presign_service::{
    issuer::Issuer, naming, server, signing::S3SigningGateway, types::Environment,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // JSON format for staging/production log shippers, plain for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        Environment::Development => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let gateway = Arc::new(S3SigningGateway::new(s3_client));
    let issuer = Arc::new(Issuer::new(
        gateway,
        naming::DEFAULT_PREFIX,
        environment.default_ttl_secs(),
    ));

    server::start(issuer).await
}
