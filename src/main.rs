//! SchoolQuest - Postcode-Seeded School World Generator
//!
//! Main entry point: generates a world for a postcode given on the command
//! line and prints the response envelope as pretty JSON.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use schoolquest::config;
use schoolquest::integrations::{OverpassClient, PostcodeClient};
use schoolquest::world::assembler::{self, WorldAssembler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SchoolQuest v{}", env!("CARGO_PKG_VERSION"));

    let postcode = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: schoolquest <POSTCODE>"))?;

    let config = config::load_config()?;

    let postcodes = PostcodeClient::with_base_url(config.apis.postcodes_base_url.clone());
    let buildings = OverpassClient::with_base_url(config.apis.overpass_base_url.clone());
    let assembler =
        WorldAssembler::with_policy(postcodes, buildings, config.world.to_policy());

    let result = assembler.generate(&postcode).await;
    let (status, response) = assembler::into_response(result);

    println!("{}", serde_json::to_string_pretty(&response)?);

    if status != 200 {
        std::process::exit(1);
    }
    Ok(())
}
