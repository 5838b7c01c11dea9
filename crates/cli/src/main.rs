#![deny(warnings)]

mod interactive;
mod web;

use anyhow::Context;
use clap::{Parser, Subcommand};
use empathy_engine_core::config::{
    resolve_api_key, resolve_backend, resolve_string_with_default, AppConfig, CloudConfig, Env,
    LocalConfig, StdEnv, DEFAULT_BIND_ADDR, DEFAULT_ELEVENLABS_BASE_URL,
    DEFAULT_ELEVENLABS_MODEL_ID, DEFAULT_ELEVENLABS_VOICE_ID, DEFAULT_ESPEAK_BINARY,
    DEFAULT_OUTPUT_DIR, ENV_ELEVENLABS_API_KEY, ENV_ELEVENLABS_VOICE_ID, ENV_EMPATHY_OUTPUT_DIR,
    ENV_ESPEAK_BINARY,
};
use empathy_engine_core::engine::EmpathyEngine;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "empathy-engine")]
#[command(about = "Speak text aloud with a voice that matches its emotion")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Same as the `interactive` subcommand.
    #[arg(long, global = true)]
    cli: bool,

    /// `local` or `cloud`. Defaults to cloud when an ElevenLabs key is set.
    #[arg(long, global = true)]
    backend: Option<String>,

    #[arg(long, global = true)]
    elevenlabs_api_key: Option<String>,

    #[arg(long, global = true)]
    voice_id: Option<String>,

    #[arg(long, global = true, default_value = DEFAULT_ELEVENLABS_MODEL_ID)]
    model_id: String,

    #[arg(long, global = true)]
    espeak_binary: Option<String>,

    /// Local voices, low-pitched first.
    #[arg(long = "local-voice", global = true)]
    local_voices: Vec<String>,

    #[arg(long, global = true)]
    output_dir: Option<String>,

    /// JSON file replacing the built-in emotion/intensity voice table.
    #[arg(long, global = true)]
    voice_table: Option<PathBuf>,

    #[arg(long, global = true, default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Serve the web form (default).
    Serve,
    /// Prompt for one line of text on stdin.
    Interactive,
    /// Print the analysis for TEXT as JSON without synthesizing.
    Analyze { text: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let command = match (&args.command, args.cli) {
        (Some(command), _) => command.clone(),
        (None, true) => Command::Interactive,
        (None, false) => Command::Serve,
    };

    let env = StdEnv;
    let cfg = build_config(args, &env)?;

    tracing::info!(
        backend = %cfg.backend,
        output_dir = %cfg.output_dir.display(),
        "config loaded"
    );

    let engine = EmpathyEngine::from_config(&cfg)
        .await
        .context("failed to start the engine")?;

    match command {
        Command::Serve => serve(engine, &cfg.bind_addr).await,
        Command::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            interactive::run(&engine, stdin, tokio::io::stdout()).await
        }
        Command::Analyze { text } => {
            let analysis = engine.analyze(&text)?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
            Ok(())
        }
    }
}

async fn serve(engine: EmpathyEngine, bind_addr: &str) -> anyhow::Result<()> {
    let app = web::router(Arc::new(engine));
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "web server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<AppConfig> {
    let elevenlabs_api_key =
        resolve_api_key(args.elevenlabs_api_key, ENV_ELEVENLABS_API_KEY, env)?;
    let backend = resolve_backend(args.backend, env, elevenlabs_api_key.as_ref())?;

    let cloud = CloudConfig {
        base_url: DEFAULT_ELEVENLABS_BASE_URL.to_owned(),
        voice_id: resolve_string_with_default(
            args.voice_id,
            ENV_ELEVENLABS_VOICE_ID,
            env,
            DEFAULT_ELEVENLABS_VOICE_ID,
        ),
        model_id: args.model_id,
    };

    let mut local = LocalConfig {
        binary: PathBuf::from(resolve_string_with_default(
            args.espeak_binary,
            ENV_ESPEAK_BINARY,
            env,
            DEFAULT_ESPEAK_BINARY,
        )),
        ..LocalConfig::default()
    };
    if !args.local_voices.is_empty() {
        local.voices = args.local_voices;
    }

    let output_dir = PathBuf::from(resolve_string_with_default(
        args.output_dir,
        ENV_EMPATHY_OUTPUT_DIR,
        env,
        DEFAULT_OUTPUT_DIR,
    ));

    Ok(AppConfig {
        backend,
        elevenlabs_api_key,
        cloud,
        local,
        output_dir,
        bind_addr: args.bind,
        voice_table: args.voice_table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use empathy_engine_core::config::{Backend, MapEnv, ENV_EMPATHY_BACKEND};

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("empathy-engine").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_local_without_a_key() {
        let cfg = build_config(parse(&[]), &MapEnv::default()).unwrap();
        assert_eq!(cfg.backend, Backend::Local);
        assert_eq!(cfg.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(cfg.local, LocalConfig::default());
    }

    #[test]
    fn key_in_env_selects_cloud() {
        let env = MapEnv::default()
            .with_var(ENV_ELEVENLABS_API_KEY, "sk-test")
            .with_var(ENV_ELEVENLABS_VOICE_ID, "voice-9");
        let cfg = build_config(parse(&[]), &env).unwrap();
        assert_eq!(cfg.backend, Backend::Cloud);
        assert_eq!(cfg.cloud.voice_id, "voice-9");
    }

    #[test]
    fn explicit_local_wins_over_key() {
        let env = MapEnv::default()
            .with_var(ENV_ELEVENLABS_API_KEY, "sk-test")
            .with_var(ENV_EMPATHY_BACKEND, "cloud");
        let cfg = build_config(parse(&["--backend", "local"]), &env).unwrap();
        assert_eq!(cfg.backend, Backend::Local);
    }

    #[test]
    fn cloud_without_key_is_an_error() {
        let env = MapEnv::default().with_var(ENV_EMPATHY_BACKEND, "cloud");
        assert!(build_config(parse(&[]), &env).is_err());
    }

    #[test]
    fn cli_flag_and_subcommands_parse() {
        assert!(parse(&["--cli"]).cli);
        assert_eq!(parse(&["interactive"]).command, Some(Command::Interactive));
        assert_eq!(
            parse(&["analyze", "hello there"]).command,
            Some(Command::Analyze {
                text: "hello there".into()
            })
        );
    }

    #[test]
    fn local_voices_override_defaults() {
        let args = parse(&["--local-voice", "en+m1", "--local-voice", "en+f4", "--output-dir", "out"]);
        let cfg = build_config(args, &MapEnv::default()).unwrap();
        assert_eq!(cfg.local.voices, ["en+m1", "en+f4"]);
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
    }
}
