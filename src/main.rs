use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use callcoach::{
    AnalysisConfig, AnthropicClient, AnthropicConfig, FillerVocabulary, InterpretStageConfig,
    Language, RenderConfig, analyze_locally, analyze_offline, analyze_with_model, execute_render,
    load_interpretation_file, read_transcript_file,
};

#[derive(Parser)]
#[command(name = "callcoach")]
#[command(author, version, about = "Sales call transcript analysis and coaching", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a call transcript and produce a coaching report
    Analyze {
        /// Input transcript file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the full analysis result (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the coaching report (text)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Pre-computed interpretation (JSON); skips the interpretation call
        #[arg(long)]
        interpretation: Option<PathBuf>,

        /// Speaker label of the sales rep
        #[arg(long)]
        me_speaker: Option<String>,

        /// Filler vocabulary language (cs or en)
        #[arg(long, default_value = "cs")]
        language: Language,

        /// Comma-separated filler terms replacing the built-in vocabulary
        #[arg(long, value_delimiter = ',')]
        fillers: Option<Vec<String>>,

        /// Run without any model; requires --interpretation
        #[arg(long)]
        offline: bool,

        /// Always build the coaching narrative locally
        #[arg(long)]
        skip_llm_narrative: bool,

        /// Retries per model call after a failed or invalid response
        #[arg(long, default_value = "2")]
        max_retries: u32,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse a transcript and print talk metrics without coaching
    Parse {
        /// Input transcript file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Speaker label of the sales rep
        #[arg(long)]
        me_speaker: Option<String>,

        /// Filler vocabulary language (cs or en)
        #[arg(long, default_value = "cs")]
        language: Language,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            report,
            interpretation,
            me_speaker,
            language,
            fillers,
            offline,
            skip_llm_narrative,
            max_retries,
            verbose,
        } => {
            setup_logging(verbose);
            let fillers = match fillers {
                Some(terms) => FillerVocabulary::custom(terms),
                None => FillerVocabulary::for_language(language),
            };
            let config = AnalysisConfig {
                me_speaker,
                fillers,
                skip_llm_narrative,
                interpret: InterpretStageConfig {
                    max_retries,
                    ..Default::default()
                },
            };
            analyze_transcript(input, output, report, interpretation, offline, &config).await
        }
        Commands::Parse {
            input,
            me_speaker,
            language,
            verbose,
        } => {
            setup_logging(verbose);
            let config = AnalysisConfig {
                me_speaker,
                fillers: FillerVocabulary::for_language(language),
                ..Default::default()
            };
            parse_transcript(input, &config)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn analyze_transcript(
    input: PathBuf,
    output: PathBuf,
    report: Option<PathBuf>,
    interpretation: Option<PathBuf>,
    offline: bool,
    config: &AnalysisConfig,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let raw = read_transcript_file(&input).context("Failed to read input transcript")?;

    let interpretation = match interpretation {
        Some(path) => {
            info!("Loading interpretation from {:?}", path);
            Some(load_interpretation_file(&path).context("Failed to load interpretation")?)
        }
        None => None,
    };

    let result = if offline {
        let Some(interpretation) = interpretation else {
            bail!("--offline requires --interpretation");
        };
        info!("Running offline analysis");
        analyze_offline(&raw, interpretation, config)
    } else {
        let client = AnthropicClient::new(AnthropicConfig::from_env()?);
        info!("Running analysis with model {}", client.model());
        analyze_with_model(&raw, &client, interpretation, config).await?
    };

    if result.parsed_transcript.is_empty() {
        warn!("No turns recognised in {:?}", input);
    }
    if result.used_fallback() {
        info!("Coaching narrative built locally");
    }

    let rendered = execute_render(
        &result,
        Some(&output),
        report.as_deref(),
        &RenderConfig::default(),
    )?;

    info!("Output written to {:?}", rendered.machine_path);
    if let Some(report_path) = rendered.human_path {
        info!("Coaching report written to {:?}", report_path);
    }

    info!(
        "Complete: score {}/100, rep talk {}%, {} coaching actions",
        result.interpretation.score,
        result.metrics.talk_ratio_me,
        result.coaching.actions.len()
    );

    Ok(())
}

fn parse_transcript(input: PathBuf, config: &AnalysisConfig) -> Result<()> {
    info!("Parsing transcript from {:?}", input);
    let raw = read_transcript_file(&input).context("Failed to read input transcript")?;
    let local = analyze_locally(&raw, config);
    let parsed = &local.parsed;
    let metrics = &local.metrics;

    println!("Transcript");
    println!("==========");
    println!("Turns: {}", parsed.turn_count);
    println!("Speakers: {:?}", parsed.speakers);
    println!("Rep: {:?}", parsed.me_speaker);
    println!();

    println!("Speaker Statistics");
    println!("------------------");
    for speaker in &parsed.speakers {
        let turns = parsed.turns.iter().filter(|t| t.speaker == *speaker);
        let (turn_count, word_count) =
            turns.fold((0, 0), |(n, w), t| (n + 1, w + t.word_count()));
        println!("{}: {} words, {} turns", speaker, word_count, turn_count);
    }
    println!();

    println!("Talk Metrics");
    println!("------------");
    println!(
        "Talk ratio: {}% rep / {}% prospect",
        metrics.talk_ratio_me, metrics.talk_ratio_prospect
    );
    println!(
        "Words: {} rep / {} prospect",
        metrics.total_words_me, metrics.total_words_prospect
    );
    println!("Filler-word rate: {}%", metrics.filler_word_rate);
    for (term, count) in metrics.filler_words.iter() {
        println!("  {}: {}", term, count);
    }

    Ok(())
}
