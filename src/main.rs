//! # WhatsApp Relay
//!
//! Receives WhatsApp webhook notifications, answers the "hello" trigger from
//! the configured phone number and exposes a manual send endpoint.

pub mod config;
pub mod consts;
pub mod errors;
pub mod webhook;

use anyhow::Context;
use envconfig::Envconfig;
use ntex::web;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let shutdown_handler = logfire::configure()
        .install_panic_handler()
        .send_to_logfire(logfire::config::SendToLogfire::IfTokenPresent)
        .finish()?;

    let app_config = config::AppConfig::init_from_env()
        .context("failed to load configuration, check environment variables")?;

    if app_config.target_phone().is_none() {
        logfire::warn!("TARGET_PHONE_NUMBER is not set, no automated replies will be sent");
    }

    // One client for all workers, reqwest clients share their connection pool
    let whatsapp_client = webhook::whatsapp::client::WhatsAppClient::new(&app_config)
        .context("failed to build WhatsApp client")?;

    run_server(app_config, whatsapp_client).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Creates application state for one worker
fn create_app_state(
    app_config: &config::AppConfig,
    whatsapp_client: &webhook::whatsapp::client::WhatsAppClient,
) -> webhook::AppState {
    webhook::AppState {
        config: app_config.clone(),
        sender: Box::new(whatsapp_client.clone()),
    }
}

/// Configures and starts the web server
async fn run_server(
    app_config: config::AppConfig,
    whatsapp_client: webhook::whatsapp::client::WhatsAppClient,
) -> anyhow::Result<()> {
    let server_addr = (app_config.server_host.clone(), app_config.port);

    let server = web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .state(create_app_state(&app_config, &whatsapp_client))
            .configure(webhook::routes::whatsapp)
            .configure(webhook::routes::send_test)
    })
    .bind(server_addr.clone())?;

    logfire::info!(
        "Server listening on {host}:{port}",
        host = server_addr.0.clone(),
        port = server_addr.1 as i64
    );
    logfire::info!("Webhook URL: https://<your-domain>/webhook");
    logfire::info!(
        "Test send URL: https://<your-domain>/send-test?phone=<number>&msg=Hello%20test"
    );

    server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
