use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use folio_core::{
    gallery::GalleryFrame, AppConfig, CircularGallery, Document, FolioError, IntroCallbacks,
    IntroSequencer, RenderGraph, Stage, Viewport,
};
use tracing_subscriber::EnvFilter;

/// Simulated seconds after which an intro run is abandoned.
const MAX_INTRO_SECONDS: f32 = 120.0;

fn main() -> folio_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Intro {
            width,
            height,
            seed,
            reduced_motion,
            resize_at,
            step,
        } => run_intro(
            config,
            Viewport::new(width, height),
            seed,
            reduced_motion,
            resize_at,
            step,
        ),
        Commands::Gallery {
            projects,
            jump,
            select,
            broken_media,
            json,
        } => run_gallery(config, &projects, jump, select, &broken_media, json),
    }
}

fn load_config(path: Option<&Path>) -> folio_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::load(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn run_intro(
    mut config: AppConfig,
    viewport: Viewport,
    seed: Option<u64>,
    reduced_motion: bool,
    resize_at: Option<ResizeAt>,
    step: f32,
) -> folio_core::Result<()> {
    if step <= 0.0 {
        return Err(FolioError::config("--step must be positive"));
    }
    config.intro.reduced_motion |= reduced_motion;
    tracing::info!(?viewport, seed, reduced_motion = config.intro.reduced_motion, "starting intro");

    let document = Document::new();
    let mut intro = match seed {
        Some(seed) => IntroSequencer::seeded(config.intro.clone(), viewport, document.clone(), seed),
        None => IntroSequencer::new(config.intro.clone(), viewport, document.clone()),
    };
    let gallery = CircularGallery::new(Vec::new(), config.gallery.clone(), document);
    let graph = RenderGraph::new(config.background.clone(), config.intro.reveal.tile_size);

    let mut callbacks = IntroCallbacks {
        on_loading_complete: || tracing::info!("loading complete"),
        on_reveal_complete: || tracing::info!("reveal complete"),
    };

    let mut pending_resize = resize_at;
    let mut stage = intro.stage();
    while stage != Stage::Ready && intro.elapsed() < MAX_INTRO_SECONDS {
        if let Some(resize) = pending_resize.filter(|resize| intro.elapsed() >= resize.at_seconds) {
            tracing::info!(width = resize.width, height = resize.height, "viewport resized");
            intro.resize(Viewport::new(resize.width, resize.height));
            pending_resize = None;
        }

        let next = intro.tick(step, &mut callbacks);
        if next != stage {
            let frame = graph.compose(&intro, &gallery);
            tracing::info!(
                elapsed = intro.elapsed(),
                stage = ?next,
                layers = frame.layers.len(),
                tiles = intro.tiles().len(),
                "stage reached"
            );
            stage = next;
        }
    }

    if stage != Stage::Ready {
        intro.teardown();
        return Err(FolioError::msg(format!(
            "intro did not reach ready within {MAX_INTRO_SECONDS}s"
        )));
    }

    println!("intro ready after {:.3}s", intro.elapsed());
    Ok(())
}

fn run_gallery(
    config: AppConfig,
    projects: &Path,
    jump: Option<usize>,
    select: Option<usize>,
    broken_media: &[String],
    json: bool,
) -> folio_core::Result<()> {
    let items = folio_core::load_items(projects)?;
    tracing::info!(count = items.len(), ?projects, "loaded projects");

    let mut gallery = CircularGallery::new(items, config.gallery.clone(), Document::new());
    for media in broken_media {
        gallery.report_media_error(media);
    }
    if let Some(index) = jump {
        gallery.jump_to(index)?;
        gallery.advance(config.gallery.rotation_seconds);
    }
    if let Some(index) = select {
        gallery.select_item(index)?;
    }

    let frame = gallery.frame();
    if json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        print_frame(&frame);
    }
    Ok(())
}

fn print_frame(frame: &GalleryFrame) {
    match frame {
        GalleryFrame::Empty { message } => println!("{message}"),
        GalleryFrame::Carousel {
            rotation,
            active_index,
            cards,
            detail,
            ..
        } => {
            println!("rotation {rotation:.1}°, active #{}", active_index + 1);
            for (index, card) in cards.iter().enumerate() {
                let marker = if index == *active_index { '>' } else { ' ' };
                println!(
                    "{marker} {:>2}. {:<32} {:>6.1}°  opacity {:.2}  scale {:.2}  [{}]",
                    index + 1,
                    card.title,
                    card.angle,
                    card.weight.opacity,
                    card.weight.scale,
                    card.status.label(),
                );
            }
            if let Some(detail) = detail {
                println!();
                println!("{} ({}, {})", detail.title, detail.category, detail.year);
                println!("  {}", detail.description);
                println!("  status: {} ({})", detail.status.label(), detail.badge);
                println!("  tech:   {}", detail.technologies.join(", "));
                println!("  live:   {}", detail.links.live);
                println!("  source: {}", detail.links.source);
                println!("  media:  {}", detail.media);
            }
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// A scheduled viewport change, written `SECONDS:WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeAt {
    at_seconds: f32,
    width: f32,
    height: f32,
}

fn parse_resize(raw: &str) -> Result<ResizeAt, String> {
    let (at, size) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected SECONDS:WIDTHxHEIGHT, got `{raw}`"))?;
    let (width, height) = size
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{size}`"))?;
    let number = |value: &str| {
        value
            .trim()
            .parse::<f32>()
            .map_err(|err| format!("`{value}`: {err}"))
    };
    Ok(ResizeAt {
        at_seconds: number(at)?,
        width: number(width)?,
        height: number(height)?,
    })
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless host for the portfolio intro and gallery", long_about = None)]
struct Cli {
    /// JSON configuration file; defaults apply to anything it omits.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the intro sequence in simulated time until main content mounts.
    Intro {
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        #[arg(long, default_value_t = 720.0)]
        height: f32,
        /// Seed for the tile stagger order and label scramble.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        reduced_motion: bool,
        /// Resize the viewport mid-run, e.g. `9.0:800x600`.
        #[arg(long, value_parser = parse_resize)]
        resize_at: Option<ResizeAt>,
        /// Simulated frame duration in seconds.
        #[arg(long, default_value_t = 1.0 / 60.0)]
        step: f32,
    },
    /// Render the project gallery as text or JSON.
    Gallery {
        #[arg(short, long, default_value = "data/projects.json")]
        projects: PathBuf,
        /// Rotate the given zero-based item to the front.
        #[arg(long)]
        jump: Option<usize>,
        /// Open the detail overlay for the given zero-based item.
        #[arg(long)]
        select: Option<usize>,
        /// Media references to treat as failed loads.
        #[arg(long = "broken-media")]
        broken_media: Vec<String>,
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resize_argument() {
        assert_eq!(
            parse_resize("9.5:800x600"),
            Ok(ResizeAt {
                at_seconds: 9.5,
                width: 800.0,
                height: 600.0
            })
        );
        assert!(parse_resize("800x600").is_err());
        assert!(parse_resize("1:800").is_err());
        assert!(parse_resize("1:wide x600").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
