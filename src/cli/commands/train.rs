//! Train command - learn a value table with Monte Carlo self-contained games

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    adapters::MsgPackRepository,
    cli::{
        config::{
            DEFAULT_TABLE_PATH, apply_reward_schedule, build_opponent, load_trainer_config,
        },
        output::{format_number, print_kv, print_match_result, print_section},
    },
    monte_carlo::{
        Decay, MonteCarloTrainer, OpponentCredit, OpponentKind, TieBreak, TrainerConfig,
        TrainingResult, UpdateMode,
    },
    persistence::{SavedValueTable, TrainingMetadata},
    pipeline::{GreedyPolicy, LogObserver, MatchConfig, MatchPipeline, MatchResult, ProgressObserver},
    ports::TableRepository,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: MatchResult,
    evaluation: Option<MatchResult>,
    evaluation_opponent: Option<String>,
    table_size: usize,
    final_epsilon: f64,
    output: String,
    config: TrainerConfig,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Monte Carlo value table", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// JSON file with trainer settings; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Start from the -0.04 step penalty and 0.01 step-size floor
    #[arg(long, conflicts_with = "config")]
    pub legacy: bool,

    /// Number of training episodes
    #[arg(long, short = 'g')]
    pub episodes: Option<usize>,

    /// Discount factor, in (0, 1]
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate at the first episode
    #[arg(long)]
    pub epsilon_start: Option<f64>,

    /// Exploration rate at the last episode
    #[arg(long)]
    pub epsilon_end: Option<f64>,

    /// Decay shape: linear, exponential or multiplicative:<factor>
    #[arg(long)]
    pub epsilon_decay: Option<String>,

    /// every-visit or first-visit
    #[arg(long)]
    pub update: Option<String>,

    /// Training opponent (random, defensive, tactical or self-play)
    #[arg(long, short = 'o')]
    pub opponent: Option<String>,

    /// Credit for the opponent's moves (none or negated)
    #[arg(long)]
    pub opponent_credit: Option<String>,

    /// Let the AI take wins and blocks before consulting values
    #[arg(long)]
    pub agent_tactics: bool,

    /// Tie break between equally valued moves (random or lowest)
    #[arg(long)]
    pub tie_break: Option<String>,

    /// Reward schedule (win=1,draw=0,loss=-1)
    #[arg(long)]
    pub reward: Option<String>,

    /// Reward attached to every non-terminal move
    #[arg(long)]
    pub step_penalty: Option<f64>,

    /// Lower bound for the 1/N step size
    #[arg(long)]
    pub min_step_size: Option<f64>,

    /// Value of states the table has not seen
    #[arg(long)]
    pub default_value: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the trained table
    #[arg(long, short = 'O', default_value = DEFAULT_TABLE_PATH)]
    pub output: PathBuf,

    /// Also write the table as JSON with board-string keys
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Games played after training with exploration off (0 to skip)
    #[arg(long, default_value_t = 10_000)]
    pub eval_games: usize,

    /// Opponent for the post-training evaluation
    #[arg(long, default_value = "random")]
    pub eval_opponent: String,

    /// Log a progress line every N episodes
    #[arg(long)]
    pub log_every: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl TrainArgs {
    /// Merge the config file (or defaults) with explicit flags.
    pub fn trainer_config(&self) -> Result<TrainerConfig> {
        let mut config = match (&self.config, self.legacy) {
            (Some(path), _) => load_trainer_config(path)?,
            (None, true) => TrainerConfig::legacy(),
            (None, false) => TrainerConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        if let Some(start) = self.epsilon_start {
            config.epsilon.start = start;
        }
        if let Some(end) = self.epsilon_end {
            config.epsilon.end = end;
        }
        if let Some(decay) = &self.epsilon_decay {
            config.epsilon.decay = decay.parse::<Decay>()?;
        }
        if let Some(update) = &self.update {
            config.update = update.parse::<UpdateMode>()?;
        }
        if let Some(opponent) = &self.opponent {
            config.opponent = opponent.parse::<OpponentKind>()?;
        }
        if let Some(credit) = &self.opponent_credit {
            config.opponent_credit = credit.parse::<OpponentCredit>()?;
        }
        if self.agent_tactics {
            config.agent_tactics = true;
        }
        if let Some(tie_break) = &self.tie_break {
            config.tie_break = tie_break.parse::<TieBreak>()?;
        }
        if let Some(reward) = &self.reward {
            apply_reward_schedule(&mut config, reward)?;
        }
        if let Some(penalty) = self.step_penalty {
            config.step_penalty = penalty;
        }
        if let Some(floor) = self.min_step_size {
            config.min_step_size = floor;
        }
        if let Some(default_value) = self.default_value {
            config.default_value = default_value;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("invalid training configuration")?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.trainer_config()?;
    let eval_opponent = args.eval_opponent.parse::<OpponentKind>()?;
    let summary_path = args.summary.as_deref().map(sanitize_summary_path);

    print_section("Monte Carlo Training");
    print_kv("Episodes", &format_number(config.episodes));
    print_kv("Opponent", &config.opponent.to_string());
    print_kv("Gamma", &config.gamma.to_string());
    print_kv(
        "Epsilon",
        &format!(
            "{} -> {} ({:?})",
            config.epsilon.start, config.epsilon.end, config.epsilon.decay
        ),
    );
    print_kv("Update", &config.update.to_string());
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut trainer = MonteCarloTrainer::new(config.clone())?;
    if !args.no_progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(interval) = args.log_every.filter(|&n| n > 0) {
        trainer = trainer.with_observer(Box::new(LogObserver::new(interval)));
    }

    let result: TrainingResult = trainer.train()?;

    print_section("Training Results");
    print_match_result(&result.games);
    print_kv("States learned", &format_number(result.table_size));

    let saved = SavedValueTable::new(
        trainer.into_table(),
        TrainingMetadata::from_run(&config, &result),
    );
    MsgPackRepository::new()
        .save(&saved, &args.output)
        .with_context(|| format!("failed to save value table to {}", args.output.display()))?;
    println!("\n✓ Table saved to: {}", args.output.display());

    if let Some(json_path) = &args.export_json {
        saved.export_json(json_path)?;
        println!("✓ JSON export written to: {}", json_path.display());
    }

    let table = Arc::new(saved.into_table());
    let evaluation = if args.eval_games > 0 {
        let mut agent = GreedyPolicy::new("trained", Arc::clone(&table));
        let mut opponent = build_opponent(eval_opponent, &table);
        let mut pipeline = MatchPipeline::new(MatchConfig {
            num_games: args.eval_games,
            seed: config.seed.map(|s| s.wrapping_add(2)),
        });
        if !args.no_progress {
            pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
        }
        let evaluation = pipeline.run(&mut agent, opponent.as_mut())?;

        print_section(&format!("Evaluation vs {eval_opponent}"));
        print_match_result(&evaluation);
        Some(evaluation)
    } else {
        None
    };

    if let Some(summary_path) = summary_path {
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: result.games.clone(),
            evaluation_opponent: evaluation.as_ref().map(|_| eval_opponent.to_string()),
            evaluation,
            table_size: result.table_size,
            final_epsilon: result.final_epsilon,
            output: args.output.display().to_string(),
            config,
        };

        let file = File::create(&summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
