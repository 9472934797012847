/// Lostpaw - lost and found pet intake service
use lostpaw::{config::ServerConfig, context::AppContext, error::PetResult, jobs, server};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> PetResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    init_tracing(&config.logging.level, config.logging.json);

    // Print banner
    print_banner(&config.service.version);

    // Create application context
    let ctx = Arc::new(AppContext::new(config).await?);

    // Start background jobs
    let scheduler = Arc::new(jobs::JobScheduler::new(Arc::clone(&ctx)));
    scheduler.start();

    // Start server
    server::serve((*ctx).clone()).await?;

    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn print_banner(version: &str) {
    println!(
        r#"
    __                __
   / /   ____  _____/ /_____  ____ __      __
  / /   / __ \/ ___/ __/ __ \/ __ `/ | /| / /
 / /___/ /_/ (__  ) /_/ /_/ / /_/ /| |/ |/ /
/_____/\____/____/\__/ .___/\__,_/ |__/|__/
                    /_/
        Lost & Found Pet Intake v{}
        "#,
        version
    );
}
