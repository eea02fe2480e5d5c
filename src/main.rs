//! recache - match text against cached regular expressions
//!
//! Reads `PATTERN<TAB>TEXT` lines from stdin and prints whether each text
//! matches its pattern. Patterns are compiled once and served from the cache
//! configured through the environment (see [`Config::from_env`]).

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recache::{new_cache, Cache, Config};

/// Main entry point for the recache matcher.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache with the configured policy and capacity
/// 4. Match stdin lines until EOF or Ctrl+C
/// 5. Print cache statistics as JSON
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, policy={}, flag={}",
        config.capacity, config.policy, config.flag
    );

    let cache = new_cache(config.policy, config.capacity);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                handle_line(cache.as_ref(), &config, &line);
            }
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping");
                break;
            }
        }
    }

    let stats = cache.stats();
    info!(
        "Done: hits={}, misses={}, evictions={}, hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.hit_rate()
    );
    println!("{}", serde_json::to_string(&stats)?);

    Ok(())
}

/// Matches one `PATTERN<TAB>TEXT` line and prints the outcome.
fn handle_line(cache: &dyn Cache<Artifact = regex::Regex>, config: &Config, line: &str) {
    let Some((pattern, text)) = line.split_once('\t') else {
        warn!("Skipping line without a tab separator: {:?}", line);
        return;
    };

    match cache.get(pattern, config.flag) {
        Ok(regex) if regex.is_match(text) => println!("match\t{}", text),
        Ok(_) => println!("no-match\t{}", text),
        Err(err) => {
            warn!("Failed to compile {:?}: {}", pattern, err);
            println!("error\t{}", err);
        }
    }
}
