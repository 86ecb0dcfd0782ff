pub mod battle;
pub mod battle_logger;
pub mod calculations;
pub mod matrix;
pub mod model;
pub mod ruleset;

pub use crate::battle::{
    simulate_battle, simulate_outcome, BattleOutcome, BattleSimulationInput,
    BattleSimulationResult, Side, DEFAULT_MAX_TURNS,
};
pub use crate::model::{
    ChargedMoves, MoveCategory, MoveSnapshot, PokemonSnapshot, SnapshotError, SnapshotOverrides,
};
pub use crate::ruleset::{default_ruleset, get_type_effectiveness, BattleRuleset, RulesetError};

use crate::matrix::{compute_matrix, validate_roster};
use crate::model::RosterFile;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Log,
}

#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    pub input_path: PathBuf,
    pub ruleset_path: Option<PathBuf>,
    pub max_turns: Option<u32>,
    pub format: OutputFormat,
    pub overrides1: SnapshotOverrides,
    pub overrides2: SnapshotOverrides,
}

#[derive(Debug, Clone)]
pub struct MatrixOptions {
    pub roster_path: PathBuf,
    pub ruleset_path: Option<PathBuf>,
    pub max_turns: Option<u32>,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub enum Command {
    Simulate(SimulateOptions),
    Matrix(MatrixOptions),
    Ruleset,
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} file at {}", path.display()))?;
    let parsed = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    Ok(parsed)
}

pub fn load_input(path: &Path) -> anyhow::Result<BattleSimulationInput> {
    let input: BattleSimulationInput = load_json(path, "battle input")?;
    input
        .validate()
        .with_context(|| format!("Invalid battle input in {}", path.display()))?;
    Ok(input)
}

pub fn load_roster(path: &Path) -> anyhow::Result<RosterFile> {
    let roster: RosterFile = load_json(path, "roster")?;
    validate_roster(&roster).with_context(|| format!("Invalid roster in {}", path.display()))?;
    Ok(roster)
}

pub fn load_ruleset(path: &Path) -> anyhow::Result<BattleRuleset> {
    load_json(path, "ruleset")
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Simulate(opts) => run_simulate(opts),
        Command::Matrix(opts) => run_matrix(opts),
        Command::Ruleset => {
            println!("{}", serde_json::to_string_pretty(&default_ruleset())?);
            Ok(())
        }
    }
}

fn run_simulate(opts: SimulateOptions) -> anyhow::Result<()> {
    let mut input = load_input(&opts.input_path)?;
    if let Some(path) = &opts.ruleset_path {
        input.ruleset = Some(load_ruleset(path)?);
    }
    if opts.max_turns.is_some() {
        input.max_turns = opts.max_turns;
    }
    input.participant1 = input.participant1.apply_overrides(&opts.overrides1)?;
    input.participant2 = input.participant2.apply_overrides(&opts.overrides2)?;

    let result = simulate_battle(&input);
    match opts.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Log => {
            for line in &result.log {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn run_matrix(opts: MatrixOptions) -> anyhow::Result<()> {
    let roster = load_roster(&opts.roster_path)?;
    let ruleset = match &opts.ruleset_path {
        Some(path) => load_ruleset(path)?,
        None => default_ruleset(),
    };
    let max_turns = opts
        .max_turns
        .filter(|turns| *turns > 0)
        .unwrap_or(DEFAULT_MAX_TURNS);
    let matrix = compute_matrix(&roster.roster, &ruleset, max_turns);
    let names: Vec<&str> = roster.roster.iter().map(|mon| mon.form_id.as_str()).collect();
    matrix::write_csv(&matrix, &names, &opts.output_path)
        .with_context(|| format!("Failed to write {}", opts.output_path.display()))?;
    info!(path = %opts.output_path.display(), "matrix written");
    println!(
        "Wrote {}x{} matrix to {}",
        matrix.len(),
        matrix.first().map(|r| r.len()).unwrap_or(0),
        opts.output_path.display()
    );
    Ok(())
}
