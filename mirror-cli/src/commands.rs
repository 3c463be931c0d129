use crate::Cli;
use anyhow::{Context, Result};
use bridge_desktop::ConsolePrompt;
use bridge_traits::library::PhotoLibrary;
use core_auth::{AuthManager, OAuth1Endpoints, OAuth1Signer};
use core_runtime::config::MirrorConfig;
use core_sync::{SyncCoordinator, SyncReport};
use provider_smugmug::{ResponseCapture, SmugMugConnector};
use std::sync::Arc;
use tracing::info;

fn build_config(cli: &Cli) -> Result<MirrorConfig> {
    let mut builder = MirrorConfig::builder()
        .output_dir(&cli.output)
        .credentials_path(&cli.config)
        .api_origin(cli.api_origin.clone());
    if let Some(dir) = &cli.capture_dir {
        builder = builder.capture_dir(dir);
    }
    Ok(builder.build()?)
}

fn auth_manager(config: &MirrorConfig) -> AuthManager {
    AuthManager::new(
        config.http_client.clone(),
        config.file_system.clone(),
        config.credentials_path.clone(),
    )
    .with_endpoints(OAuth1Endpoints::smugmug(&config.api_origin))
}

/// `photo-mirror auth`
pub async fn auth(cli: &Cli, force: bool) -> Result<()> {
    let config = build_config(cli)?;
    let manager = auth_manager(&config);
    let prompt = ConsolePrompt::stdio();

    if force {
        manager.reauthorize(&prompt).await?;
    } else {
        manager.authenticate(&prompt).await?;
    }

    println!(
        "Access token stored in {}",
        manager.credential_store().path().display()
    );
    Ok(())
}

/// `photo-mirror sync`
pub async fn sync(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let signer = auth_manager(&config)
        .authenticate(&ConsolePrompt::stdio())
        .await?;

    let library = connector(&config, signer);
    let user = library
        .authenticated_user()
        .await
        .context("Failed to look up the authenticated user")?;

    let output_root = config.output_dir.join(&user.name);
    info!(user = %user.name, output = %output_root.display(), "Mirroring library");

    let coordinator = SyncCoordinator::new(library, config.file_system.clone(), output_root);
    let report = coordinator.sync_library(&user.node_uri).await?;

    print_summary(&user.name, &report);
    Ok(())
}

fn connector(config: &MirrorConfig, signer: OAuth1Signer) -> Arc<dyn PhotoLibrary> {
    let mut connector = SmugMugConnector::new(config.http_client.clone(), signer)
        .with_api_origin(config.api_origin.clone());
    if let Some(dir) = &config.capture_dir {
        connector = connector.with_capture(ResponseCapture::new(config.file_system.clone(), dir));
    }
    Arc::new(connector)
}

fn print_summary(user: &str, report: &SyncReport) {
    let stats = &report.stats;
    println!("Mirror of {} {}", user, report.outcome.status);
    println!(
        "  folders: {} synced, {} resumed, {} skipped",
        stats.folders_synced, stats.folders_resumed, stats.folders_skipped
    );
    println!(
        "  albums:  {} synced, {} resumed, {} skipped",
        stats.albums_synced, stats.albums_resumed, stats.albums_skipped
    );
    println!(
        "  images:  {} synced, {} skipped",
        stats.images_synced, stats.images_skipped
    );
    println!(
        "  variants: {} downloaded ({} bytes), {} already present",
        stats.variants_downloaded, stats.bytes_downloaded, stats.variants_present
    );
}
