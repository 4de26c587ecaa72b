//! # Pratik Reader
//!
//! Line-oriented terminal client: reads commands from stdin and prints the
//! feed, the open post and playback state to stdout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pratik_core::ports::{
    AudioOutputFactory, ContentGenerator, ImageGenerator, PostStore, SpeechSynthesizer,
};
use pratik_infra::{EnvColorScheme, InMemoryPostStore, JsonFilePreferenceStore, OfflineGenerator};

mod command;
mod config;
mod reader;

use command::Command;
use config::ReaderConfig;
use reader::{Reader, Services};

const TICK: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ReaderConfig::from_env();
    let services = build_services(&config).await?;
    let mut reader = Reader::start(services, &config)
        .await
        .context("failed to load the feed")?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK);

    let greeting = format!("Theme: {}. Type `help` for commands.", reader.theme_name());
    write_out(&mut stdout, &greeting).await?;
    if let Some(listing) = reader.execute(Command::List).await? {
        write_out(&mut stdout, &listing).await?;
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                reader.tick(TICK);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(e) => {
                        write_out(&mut stdout, &e.to_string()).await?;
                        continue;
                    }
                };
                match reader.execute(command).await {
                    Ok(Some(reply)) => write_out(&mut stdout, &reply).await?,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "Command failed");
                        write_out(&mut stdout, &format!("Error: {e:#}")).await?;
                    }
                }
            }
        }
    }

    reader.execute(Command::Quit).await?;
    Ok(())
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n> ").await?;
    stdout.flush().await
}

/// Logs go to stderr so they do not interleave with command output.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,reader=info,pratik_core=info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

type Generators = (
    Arc<dyn ContentGenerator>,
    Arc<dyn ImageGenerator>,
    Arc<dyn SpeechSynthesizer>,
);

fn offline_generators() -> Generators {
    let content: Arc<dyn ContentGenerator> = Arc::new(OfflineGenerator);
    let images: Arc<dyn ImageGenerator> = Arc::new(OfflineGenerator);
    let speech: Arc<dyn SpeechSynthesizer> = Arc::new(OfflineGenerator);
    (content, images, speech)
}

#[cfg(feature = "http")]
fn remote_backends(url: &str) -> anyhow::Result<(Arc<dyn PostStore>, Generators)> {
    use pratik_infra::{ApiConfig, HttpGenerationClient, HttpPostStore};

    let store: Arc<dyn PostStore> = Arc::new(HttpPostStore::new(ApiConfig::new(url))?);
    let generation = Arc::new(HttpGenerationClient::new(ApiConfig::new(url))?);
    let content: Arc<dyn ContentGenerator> = generation.clone();
    let images: Arc<dyn ImageGenerator> = generation.clone();
    let speech: Arc<dyn SpeechSynthesizer> = generation;
    tracing::info!(url, "Using blog server");
    Ok((store, (content, images, speech)))
}

#[cfg(not(feature = "http"))]
fn remote_backends(_url: &str) -> anyhow::Result<(Arc<dyn PostStore>, Generators)> {
    anyhow::bail!("BLOG_API_URL is set but the reader was built without the `http` feature")
}

fn audio_outputs() -> Arc<dyn AudioOutputFactory> {
    #[cfg(feature = "audio-device")]
    let outputs: Arc<dyn AudioOutputFactory> = Arc::new(pratik_infra::CpalAudioOutputFactory);
    #[cfg(not(feature = "audio-device"))]
    let outputs: Arc<dyn AudioOutputFactory> = Arc::new(pratik_infra::NullAudioOutputFactory);
    outputs
}

async fn build_services(config: &ReaderConfig) -> anyhow::Result<Services> {
    let (store, (content, images, speech)) = match &config.api_url {
        Some(url) => remote_backends(url)?,
        None => {
            tracing::info!(seed_posts = config.seed_posts, "Using in-memory store");
            let store: Arc<dyn PostStore> = Arc::new(InMemoryPostStore::seeded(config.seed_posts));
            (store, offline_generators())
        }
    };

    let preferences = JsonFilePreferenceStore::open(&config.preferences_path)
        .await
        .with_context(|| {
            format!(
                "failed to open preferences at {}",
                config.preferences_path.display()
            )
        })?;

    Ok(Services {
        store,
        content,
        images,
        speech,
        outputs: audio_outputs(),
        preferences: Arc::new(preferences),
        probe: Box::new(EnvColorScheme),
    })
}
