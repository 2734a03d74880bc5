// vision-ocr - Google Cloud Vision text detection client
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use std::io::Read;
use tracing::{debug, info};
use vision_ocr::cli::{parse_context, Args};
use vision_ocr::config::AppConfig;
use vision_ocr::utils::logging;
use vision_ocr::vision::{ReadOptions, VisionClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration, then apply CLI overrides
    let mut config = AppConfig::load()?;
    if let Some(api_key) = args.api_key.clone() {
        config.vision.api_key = api_key;
    }
    if let Some(endpoint) = args.endpoint.clone() {
        config.vision.endpoint_url = endpoint;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    debug!("Starting vision-ocr v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the client and per-call options
    let client = VisionClient::from_config(&config.vision)?;
    let mut options =
        ReadOptions::new().max_results(args.max_results.unwrap_or(config.vision.default_max_results));
    if let Some(raw) = args.context.as_deref() {
        options = options.context(parse_context(raw)?);
    }

    // Phase 4: Run text detection
    let result = if args.input == "-" {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        info!("Read {} bytes from stdin", data.len());
        client.read_from_binary(&data, &options).await?
    } else {
        client.read_image(args.input.as_bytes(), &options).await?
    };

    // Phase 5: Print the provider response
    let output = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{}", output);

    Ok(())
}
