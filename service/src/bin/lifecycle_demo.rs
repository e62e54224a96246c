//! Runs one create → issue → upload → delete lifecycle run against the
//! configured object store and reports each step's outcome.

use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use tracing_subscriber::{fmt, EnvFilter};

use presign_service::{
    issuer::Issuer,
    lifecycle::{Coordinator, FailurePolicy, S3ObjectStore, StepOutcome},
    naming::{NamingPolicy, DEFAULT_PREFIX},
    signing::S3SigningGateway,
    types::Environment,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let environment = Environment::from_env();
    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));

    let gateway = Arc::new(S3SigningGateway::new(s3_client.clone()));
    let issuer = Arc::new(Issuer::new(
        gateway,
        DEFAULT_PREFIX,
        environment.default_ttl_secs(),
    ));

    let mut names = NamingPolicy::generate(DEFAULT_PREFIX)?;
    if let Some(bucket) = environment.bucket_name_hint() {
        NamingPolicy::ensure_valid(&bucket)?;
        names.bucket = bucket;
    }

    let coordinator = Coordinator::new(
        S3ObjectStore::new(s3_client),
        issuer,
        names,
        FailurePolicy::ContinueOnFailure,
        b"lifecycle demo body".to_vec(),
    );

    let run = coordinator.run().await;

    for step in &run.steps {
        match step.outcome {
            StepOutcome::Success => tracing::info!(step = step.name, "ok"),
            StepOutcome::Failure => tracing::warn!(
                step = step.name,
                error = step.error.as_deref().unwrap_or("unknown"),
                "failed"
            ),
        }
    }

    tracing::info!(
        bucket = %run.bucket,
        key = %run.key,
        failed = run.failed_steps(),
        total = run.steps.len(),
        "lifecycle run finished"
    );

    Ok(())
}
