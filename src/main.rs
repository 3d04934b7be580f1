//! slidealign CLI - lecture transcript to slide alignment
//!
//! Command-line interface for segmenting text and aligning transcripts with slides.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use log::error;
use slidealign::{
    build_provider, cosine_similarity, read_text, write_sentences, Config, EmbedderKind,
    MergeStrategy, Pipeline, Result, SentenceSegmenter,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "slidealign")]
#[command(author = "slidealign contributors")]
#[command(version)]
#[command(about = "Align lecture transcripts with slide text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file (flags override its values)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a text file into sentences
    Segment {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Minimum sentence length in characters
        #[arg(long)]
        min: Option<usize>,

        /// Maximum sentence length in characters
        #[arg(long)]
        max: Option<usize>,

        /// Merge strategy for short fragments
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Length at or below which a fragment counts as short (short-neighbour only)
        #[arg(long, default_value = "20")]
        short_length: usize,

        /// Directory to save the sentences to, one per line
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },

    /// Align a transcript with slide text
    Align {
        /// Transcript text file
        #[arg(short, long)]
        transcript: PathBuf,

        /// Slide text file
        #[arg(short, long)]
        slides: PathBuf,

        /// Similarity threshold below which a new slide starts (default: 0.8)
        #[arg(long)]
        threshold: Option<f32>,

        /// Embedding provider
        #[arg(short, long, value_enum)]
        embedder: Option<Embedder>,

        /// Model id on the Hugging Face Hub or local model directory
        #[arg(short, long)]
        model: Option<String>,

        /// Write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Show per-sentence best scores
        #[arg(long)]
        debug: bool,
    },

    /// Compute similarity between texts
    Similarity {
        /// First text
        text1: String,

        /// Second text
        text2: String,

        /// Embedding provider
        #[arg(short, long, value_enum)]
        embedder: Option<Embedder>,

        /// Model id on the Hugging Face Hub or local model directory
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    Forward,
    ShortNeighbour,
}

#[derive(Clone, Copy, ValueEnum)]
enum Embedder {
    Hashing,
    Onnx,
}

impl From<Embedder> for EmbedderKind {
    fn from(embedder: Embedder) -> Self {
        match embedder {
            Embedder::Hashing => EmbedderKind::Hashing,
            Embedder::Onnx => EmbedderKind::Onnx,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Commands::Segment {
            input,
            min,
            max,
            strategy,
            short_length,
            save_dir,
        } => segment_file(config, input, min, max, strategy, short_length, save_dir),

        Commands::Align {
            transcript,
            slides,
            threshold,
            embedder,
            model,
            json,
            debug,
        } => align_files(config, transcript, slides, threshold, embedder, model, json, debug),

        Commands::Similarity {
            text1,
            text2,
            embedder,
            model,
        } => compute_similarity(config, text1, text2, embedder, model),
    });

    if let Err(e) = result {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    }
}

fn apply_embedder(config: &mut Config, embedder: Option<Embedder>, model: Option<String>) {
    if let Some(embedder) = embedder {
        config.embedding.provider = embedder.into();
    }
    if let Some(model) = model {
        config.embedding.model = model;
    }
}

fn segment_file(
    mut config: Config,
    input: PathBuf,
    min: Option<usize>,
    max: Option<usize>,
    strategy: Option<Strategy>,
    short_length: usize,
    save_dir: Option<PathBuf>,
) -> Result<()> {
    if let Some(min) = min {
        config.segmentation.min_sentence_length = min;
    }
    if let Some(max) = max {
        config.segmentation.max_sentence_length = max;
    }
    match strategy {
        Some(Strategy::Forward) => config.segmentation.strategy = MergeStrategy::Forward,
        Some(Strategy::ShortNeighbour) => {
            config.segmentation.strategy = MergeStrategy::ShortNeighbour { short_length }
        }
        None => {}
    }

    let segmenter = SentenceSegmenter::from_config(&config)?;
    let text = read_text(&input, config.text.encoding)?;
    let sentences = segmenter.segment(&text);

    for (i, sentence) in sentences.iter().enumerate() {
        println!("{:>4}. {}", i + 1, sentence);
    }

    if let Some(dir) = save_dir {
        let name = input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let path = write_sentences(&dir, name, &sentences)?;
        println!();
        println!("✓ Saved {} sentences to {}", sentences.len(), path.display());
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn align_files(
    mut config: Config,
    transcript_path: PathBuf,
    slides_path: PathBuf,
    threshold: Option<f32>,
    embedder: Option<Embedder>,
    model: Option<String>,
    json: Option<PathBuf>,
    debug: bool,
) -> Result<()> {
    let start_time = Instant::now();

    if let Some(threshold) = threshold {
        config.alignment.similarity_threshold = threshold;
    }
    apply_embedder(&mut config, embedder, model);

    let transcript = read_text(&transcript_path, config.text.encoding)?;
    let slides = read_text(&slides_path, config.text.encoding)?;

    // Loading a model can take a while (and may download it)
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(format!("Loading {} embedder...", provider_label(&config)));
    pb.enable_steady_tick(Duration::from_millis(100));

    let pipeline = Pipeline::from_config(&config)?;
    pb.finish_and_clear();

    let pb = ProgressBar::new(0);
    pb.set_style(bar_style());
    pb.set_message("Embedding sentences...");

    let report = pipeline.run_with_progress(
        &transcript,
        &slides,
        |total| pb.set_length(total as u64),
        || pb.inc(1),
    )?;
    pb.finish_and_clear();

    if debug {
        println!("=== Alignment Analysis ===");
        println!("Transcript sentences: {}", report.transcript.len());
        println!("Slide sentences: {}", report.slides.len());
        println!("Threshold: {:.2}", report.threshold);
        println!();
        for i in 0..report.assignment.len() {
            let score = report.assignment.best_score(i).unwrap_or_default();
            let marker = if i > 0 && score < report.threshold {
                " <-- NEW SLIDE"
            } else {
                ""
            };
            match report.assignment.best_slide(i) {
                Some(j) => println!(
                    "  Sentence {}: best slide sentence {} ({:.4}){}",
                    i, j, score, marker
                ),
                None => println!("  Sentence {}: no slide sentences{}", i, marker),
            }
        }
        println!("\n=== Slides ===\n");
    }

    print!("{}", report.render_text());

    if let Some(path) = json {
        report.write_json(&path)?;
        println!();
        println!("✓ Saved report to {}", path.display());
    }

    log::info!("Alignment complete in {}", HumanDuration(start_time.elapsed()));
    Ok(())
}

fn compute_similarity(
    mut config: Config,
    text1: String,
    text2: String,
    embedder: Option<Embedder>,
    model: Option<String>,
) -> Result<()> {
    apply_embedder(&mut config, embedder, model);
    let provider = build_provider(&config.embedding)?;

    let a = provider.embed(&text1)?;
    let b = provider.embed(&text2)?;
    let similarity = cosine_similarity(&a, &b);

    println!("Similarity: {:.4}", similarity);
    println!("Text 1: {}", text1);
    println!("Text 2: {}", text2);

    Ok(())
}

fn provider_label(config: &Config) -> String {
    match config.embedding.provider {
        EmbedderKind::Hashing => "hashing".to_string(),
        EmbedderKind::Onnx => config.embedding.model.clone(),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(concat!(
            "{msg}\n{spinner:.green} [{elapsed_precise}] ",
            "[{bar:40.cyan/blue}] {pos}/{len} ({percent}%)"
        ))
        .map(|style| style.progress_chars("█▓▒░  "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
