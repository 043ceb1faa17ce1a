//! # hearth-agent
//!
//! Hearth assistant binary — wires the providers together and runs a
//! line-oriented REPL over the orchestrator, or a one-shot index rebuild.

#![deny(unsafe_code)]

mod providers;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hearth_embeddings::{EmbeddingProvider, EmbeddingStore, SimilarityRetriever};
use hearth_history::HistoryLog;
use hearth_intent::{CommandSynthesizer, IntentClassifier};
use hearth_llm::{OpenAiChat, OpenAiConfig, OpenAiEmbeddings};
use hearth_music::{MusicSearch, SpotifyClient, SpotifyConfig};
use hearth_runtime::{Orchestrator, OrchestratorDeps, StoreRebuilder, rebuild_index};
use hearth_session::{ConfirmationFlow, InMemorySessionStore};
use hearth_settings::{HearthSettings, expand_home, load_settings, load_settings_from_path};
use tracing::info;

use providers::{PlatformApi, RestCommandExecutor, RestEntitySource};

/// Hearth voice-assistant orchestrator.
#[derive(Parser, Debug)]
#[command(name = "hearth", about = "Hearth voice-assistant orchestrator")]
struct Cli {
    /// Settings file (defaults to `~/.hearth/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive REPL over the orchestrator (default).
    Run {
        /// Conversation key for this terminal.
        #[arg(long, default_value = "cli")]
        device_id: String,
    },
    /// Rebuild the retrieval index and exit.
    Rebuild,
}

#[tokio::main]
async fn main() -> Result<()> {
    hearth_logging::init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => load_settings().context("loading settings")?,
    };

    match cli.command.unwrap_or(Command::Run {
        device_id: "cli".to_string(),
    }) {
        Command::Run { device_id } => {
            let orchestrator = build_orchestrator(&settings)?;
            run_repl(&orchestrator, &device_id).await
        }
        Command::Rebuild => run_rebuild(&settings).await,
    }
}

/// Read a required secret from the environment.
fn env_secret(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .with_context(|| format!("{name} is not set"))
}

fn http_client(settings: &HearthSettings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(settings.api.request_timeout_ms))
        .build()
        .context("building HTTP client")
}

fn platform_api(settings: &HearthSettings) -> Result<PlatformApi> {
    Ok(PlatformApi {
        base_url: settings.platform.base_url.trim_end_matches('/').to_string(),
        token: env_secret("HEARTH_PLATFORM_TOKEN")?,
    })
}

fn embedding_provider(
    settings: &HearthSettings,
    client: &reqwest::Client,
) -> Result<Arc<dyn EmbeddingProvider>> {
    let api_key = env_secret("OPENAI_API_KEY")?;
    Ok(Arc::new(OpenAiEmbeddings::with_client(
        OpenAiConfig {
            base_url: settings.api.base_url.clone(),
            api_key,
            model: settings.api.embedding_model.clone(),
            temperature: None,
        },
        client.clone(),
    )))
}

fn build_orchestrator(settings: &HearthSettings) -> Result<Orchestrator> {
    let client = http_client(settings)?;
    let api_key = env_secret("OPENAI_API_KEY")?;
    let api = platform_api(settings)?;

    let entities = Arc::new(RestEntitySource::new(api.clone(), client.clone()));
    let executor = Arc::new(RestCommandExecutor::new(api, client.clone()));

    let embedder = embedding_provider(settings, &client)?;
    let store = Arc::new(EmbeddingStore::new(expand_home(&settings.index.persist_dir)));
    let retriever = Arc::new(SimilarityRetriever::new(Arc::clone(&embedder)));
    match store.load() {
        Ok(snapshot) => retriever.install(snapshot),
        Err(_) => info!("no persisted index yet; say 'rebuild database' to build one"),
    }
    if settings.index.auto_rebuild {
        retriever.set_rebuilder(Arc::new(StoreRebuilder::new(
            Arc::clone(&entities) as _,
            Arc::clone(&store),
            Arc::clone(&embedder),
            settings.vocabulary.clone(),
            settings.index.embed_batch_size,
        )));
    }

    let helper = Arc::new(OpenAiChat::with_client(
        OpenAiConfig {
            base_url: settings.api.base_url.clone(),
            api_key: api_key.clone(),
            model: settings.api.chat_model.clone(),
            temperature: Some(0.0),
        },
        client.clone(),
    ));
    let command = Arc::new(OpenAiChat::with_client(
        OpenAiConfig {
            base_url: settings.api.base_url.clone(),
            api_key,
            model: settings.api.command_model.clone(),
            temperature: None,
        },
        client.clone(),
    ));

    let music: Option<Arc<dyn MusicSearch>> =
        match (&settings.music.client_id, &settings.music.client_secret) {
            (Some(id), Some(secret)) => {
                let mut config = SpotifyConfig::new(id.clone(), secret.clone());
                config.market = settings.music.market.clone();
                Some(Arc::new(SpotifyClient::with_client(config, client)))
            }
            _ => {
                info!("music search disabled (no credentials configured)");
                None
            }
        };

    let history = Arc::new(HistoryLog::new(
        expand_home(&settings.history.path),
        settings.history.max_entries,
    ));
    let sessions = Arc::new(InMemorySessionStore::new());

    let confirmation = ConfirmationFlow::new(
        Arc::clone(&executor) as _,
        Arc::clone(&history),
        settings.session.confirm_words.clone(),
        settings.session.cancel_words.clone(),
        settings.api.request_timeout_ms,
    );

    let deps = OrchestratorDeps {
        entities,
        retriever,
        store,
        embedder,
        classifier: IntentClassifier::new(
            Arc::clone(&helper) as _,
            settings.api.request_timeout_ms,
        ),
        synthesizer: CommandSynthesizer::new(
            helper,
            command,
            settings.api.request_timeout_ms,
        ),
        music,
        sessions,
        confirmation,
        history,
    };

    Ok(Orchestrator::new(deps, settings.clone()))
}

async fn run_rebuild(settings: &HearthSettings) -> Result<()> {
    let client = http_client(settings)?;
    let api = platform_api(settings)?;
    let entities = RestEntitySource::new(api, client.clone());
    let embedder = embedding_provider(settings, &client)?;
    let store = EmbeddingStore::new(expand_home(&settings.index.persist_dir));

    let snapshot = rebuild_index(
        &entities,
        &store,
        embedder.as_ref(),
        &settings.vocabulary,
        settings.index.embed_batch_size,
    )
    .await
    .context("rebuilding index")?;

    println!("Indexed {} entities ({}d vectors).", snapshot.rows(), snapshot.dim());
    Ok(())
}

async fn run_repl(orchestrator: &Orchestrator, device_id: &str) -> Result<()> {
    println!("hearth ready — type a request, ctrl-d to exit");
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let reply = orchestrator.process(text, device_id).await;
        match reply.text {
            Some(text) => println!("{text}"),
            None => println!("(no response, success={})", reply.success),
        }
    }

    println!();
    Ok(())
}
