use anyhow::Result;
use clap::Parser;
use pairpose::ai::GeminiComposeClient;
use pairpose::models::{BackgroundPreset, Config, PoseAction};
use pairpose::session::{Session, SlotId};
use pairpose::share::LocalShareClient;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "pairpose")]
#[command(about = "Blend two photos into one AI-generated pose")]
struct CliArgs {
    /// First photo (PNG, JPG or WEBP).
    #[arg(value_name = "FIRST_PHOTO")]
    first_photo: PathBuf,

    /// Second photo (PNG, JPG or WEBP).
    #[arg(value_name = "SECOND_PHOTO")]
    second_photo: PathBuf,

    /// Background preset: white, garden, park or home.
    #[arg(long, default_value = "white", value_parser = parse_background_arg)]
    background: BackgroundPreset,

    /// Pose: hug or kiss.
    #[arg(long, default_value = "hug", value_parser = parse_pose_arg)]
    pose: PoseAction,

    /// Dress both subjects in new elegant matching outfits.
    #[arg(long)]
    new_outfits: bool,

    /// Directory the finished creation is written to.
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// Also export the creation to the share directory.
    #[arg(long)]
    share: bool,
}

fn parse_background_arg(input: &str) -> std::result::Result<BackgroundPreset, String> {
    BackgroundPreset::from_key(input).map_err(|_| {
        format!(
            "Invalid background '{}'. Expected one of: white, garden, park, home",
            input
        )
    })
}

fn parse_pose_arg(input: &str) -> std::result::Result<PoseAction, String> {
    PoseAction::from_key(input)
        .map_err(|_| format!("Invalid pose '{}'. Expected: hug or kiss", input))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pairpose=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Image provider: Gemini (model: {})", config.image_model);
    let service = GeminiComposeClient::new(config.gemini_api_key, config.image_model);

    let preview_dir = tempfile::tempdir()?;
    let mut session = Session::new(preview_dir.path().to_path_buf());
    session.set_background(args.background);
    session.set_new_outfits(args.new_outfits);

    for (slot, path) in [
        (SlotId::First, &args.first_photo),
        (SlotId::Second, &args.second_photo),
    ] {
        session.upload(slot, path).await;
        if let Some(message) = session.error() {
            error!("{}", message);
            std::process::exit(1);
        }
        info!("Uploaded {}", path.display());
    }

    session.generate(args.pose, &service).await;
    if let Some(message) = session.error() {
        error!("{}", message);
        std::process::exit(1);
    }

    let saved = session.download(&args.output).await?;
    info!("Creation saved to {}", saved.display());

    if args.share {
        let share_dir = std::env::var("PAIRPOSE_SHARE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("shared"));
        let platform = LocalShareClient::new(share_dir);
        session.share(&platform).await;
        if let Some(message) = session.error() {
            error!("{}", message);
            std::process::exit(1);
        }
    }

    Ok(())
}
