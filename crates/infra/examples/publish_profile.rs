//! Example: create and publish a profile in one call
//!
//! Settings come from the environment (or a `courier.toml` / `courier.json`
//! file). With `COURIER_TOKEN_SECRET` set, requests are signed locally;
//! otherwise they go out unauthenticated.
//!
//! ```bash
//! COURIER_BASE_URL=http://localhost:8080 \
//! COURIER_TOKEN_SECRET=dev-secret \
//! RUST_LOG=courier_infra=debug \
//! cargo run -p courier-infra --example publish_profile -- user-42 "Ada Lovelace"
//! ```
//!
//! Set `COURIER_DEMO_BIO` to a file path to attach its contents as the bio.

use courier_domain::types::CreateProfile;
use courier_domain::{wrap_fallible, ErrorCode, Outcome};
use courier_infra::config;
use courier_infra::create_workflows;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let identity = args.next().unwrap_or_else(|| "demo-user".to_string());
    let display_name = args.next().unwrap_or_else(|| "Demo Profile".to_string());

    let bio = match std::env::var("COURIER_DEMO_BIO") {
        Ok(bio_path) => {
            match wrap_fallible(tokio::fs::read_to_string(bio_path), ErrorCode::Validation).await {
                Outcome::Success(text) => Some(text.trim().to_string()),
                Outcome::Failure(err) => {
                    warn!(error = %err, "ignoring unreadable bio file");
                    None
                }
            }
        }
        Err(_) => None,
    };

    let settings = config::load()?;
    let workflows = create_workflows(settings.into_transport_config(None)?)?;

    let request = CreateProfile { display_name, bio };
    match workflows.publishing.create_and_publish(&identity, &request).await {
        Outcome::Success(profile) => {
            info!(
                profile_id = %profile.id,
                status = %profile.status,
                published_at = ?profile.published_at,
                "profile published"
            );
        }
        Outcome::Failure(err) if err.code().is_transient() => {
            warn!(
                code = %err.code(),
                retry_after = ?err.retry_after(),
                "publishing failed with a transient error; try again later"
            );
        }
        Outcome::Failure(err) => {
            error!(code = %err.code(), status = err.status(), "{}", err.message());
            return Err(err.into());
        }
    }

    Ok(())
}
