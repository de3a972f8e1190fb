//! veo-generate - submit a prompt, wait for the video, save or print it.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use veodirector_domain::{Artifact, DirectorPreset, OperationHandle};
use veodirector_engine::infrastructure::config::EngineConfig;
use veodirector_engine::use_cases::ComposeRequest;
use veodirector_engine::{init_tracing, load_dotenv_from_repo_root, App};
use veodirector_shared::decode_operation_id;

/// Generate one video with Veo and wait for it to finish.
///
///   veo-generate "A lion in the savanna, cinematic wide shot"
///   veo-generate --preset villeneuve --scene "A lone rider crossing dunes"
///   veo-generate --operation "projects%2F...%2Foperations%2F123"
#[derive(Parser, Debug)]
#[command(name = "veo-generate", version)]
struct Args {
    /// Prompt sent to the model as-is
    #[arg(
        required_unless_present_any = ["preset", "operation"],
        conflicts_with_all = ["preset", "operation"]
    )]
    prompt: Option<String>,

    /// Compose the prompt from a director preset (nolan, anderson, kubrick, ...)
    #[arg(long, conflicts_with = "operation")]
    preset: Option<String>,

    /// Resume waiting on an operation that was already started (plain or URL-encoded)
    #[arg(long)]
    operation: Option<String>,

    /// Scene description placed before the preset's technical fragments
    #[arg(long, requires = "preset")]
    scene: Option<String>,

    /// Seconds to wait before each status query
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Status queries before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Write an inline video to this file
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();
    init_tracing("veodirector_engine=info,veo_generate=info");

    let args = Args::parse();

    let mut config = EngineConfig::from_env()?;
    if let Some(secs) = args.interval_secs {
        config.poll_policy.interval = Duration::from_secs(secs);
    }
    if let Some(attempts) = args.max_attempts {
        config.poll_policy.max_attempts = attempts;
    }
    config
        .poll_policy
        .validate()
        .context("invalid polling options")?;

    let app = App::from_config(&config);
    let generation = &app.use_cases.generation;

    let handle = match &args.operation {
        Some(operation) => OperationHandle::new(decode_operation_id(operation)?)?,
        None => {
            let prompt = match &args.preset {
                Some(preset) => {
                    let director: DirectorPreset = preset.parse()?;
                    println!("Preset: {} ({})", director.id(), director.description());
                    app.use_cases
                        .prompt
                        .execute(ComposeRequest {
                            preset: Some(director.id().to_string()),
                            scene_description: args.scene.clone(),
                            ..Default::default()
                        })?
                        .to_string()
                }
                None => args.prompt.clone().unwrap_or_default(),
            };

            println!("Prompt: {prompt}");
            generation.submit.execute(&prompt).await?
        }
    };
    println!("Operation: {handle}");

    let policy = generation.await_completion.policy();
    println!(
        "Waiting up to {}s (every {}s)...",
        policy.ceiling().as_secs(),
        policy.interval.as_secs()
    );

    let payload = generation
        .await_completion
        .execute(&handle, |progress| {
            println!(
                "  [{}/{}] {} ({}s)",
                progress.attempt,
                progress.max_attempts,
                progress.state,
                progress.elapsed.as_secs()
            );
        })
        .await?;

    let descriptor = generation.fetch_result.materialize(&payload).await?;
    println!(
        "Video ready: {}, {} seconds, {}",
        descriptor.artifact.mime_type(),
        descriptor.duration_seconds,
        descriptor.resolution
    );

    match &descriptor.artifact {
        Artifact::Inline { bytes, .. } => {
            println!("Inline video: {} bytes", bytes.len());
            if let Some(out) = &args.out {
                tokio::fs::write(out, bytes)
                    .await
                    .with_context(|| format!("writing {}", out.display()))?;
                println!("Saved to {}", out.display());
            }
        }
        Artifact::Reference { locator, uri, .. } => {
            println!("Stored at {locator}");
            println!("URL: {uri}");
            if args.out.is_some() {
                tracing::warn!("--out ignored: the video was stored remotely");
            }
        }
    }

    Ok(())
}
