use crate::battle::{simulate_outcome, BattleOutcome, Side};
use crate::model::{PokemonSnapshot, RosterFile};
use crate::ruleset::BattleRuleset;
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

/// Score of one battle from `side`'s point of view: win 1, draw 0.5, loss 0.
fn score_for(outcome: BattleOutcome, side: Side) -> f64 {
    match outcome {
        BattleOutcome::Winner(winner) if winner == side => 1.0,
        BattleOutcome::Winner(_) => 0.0,
        BattleOutcome::Draw => 0.5,
    }
}

/// Round-robin matchup scores. `matrix[i][j]` is how well `roster[i]` does
/// against `roster[j]`, averaged over both turn orders so the first-mover
/// advantage cancels out.
pub fn compute_matrix(
    roster: &[PokemonSnapshot],
    ruleset: &BattleRuleset,
    max_turns: u32,
) -> Vec<Vec<f64>> {
    let tasks: Vec<(usize, usize)> = (0..roster.len())
        .flat_map(|row| (0..roster.len()).map(move |col| (row, col)))
        .collect();
    let cell_results: Vec<CellResult> = tasks
        .par_iter()
        .map(|(row, col)| {
            let mon = &roster[*row];
            let rival = &roster[*col];
            let leading = simulate_outcome(mon, rival, ruleset, max_turns);
            let trailing = simulate_outcome(rival, mon, ruleset, max_turns);
            let score = (score_for(leading, Side::A) + score_for(trailing, Side::B)) / 2.0;
            CellResult {
                row: *row,
                col: *col,
                score,
            }
        })
        .collect();

    let mut matrix = vec![vec![0.0; roster.len()]; roster.len()];
    for cell in cell_results {
        matrix[cell.row][cell.col] = cell.score;
    }
    info!(
        size = roster.len(),
        battles = tasks.len() * 2,
        "matchup matrix computed"
    );
    matrix
}

/// CSV with a header row of form ids and one labelled row per combatant.
pub fn to_csv(matrix: &[Vec<f64>], names: &[&str]) -> String {
    let mut out = String::new();
    for name in names {
        out.push(',');
        out.push_str(name);
    }
    for (row_idx, row) in matrix.iter().enumerate() {
        out.push('\n');
        out.push_str(names.get(row_idx).copied().unwrap_or_default());
        for value in row {
            out.push(',');
            out.push_str(&format!("{value:.4}"));
        }
    }
    out
}

pub fn write_csv(matrix: &[Vec<f64>], names: &[&str], path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, to_csv(matrix, names))?;
    Ok(())
}

struct CellResult {
    row: usize,
    col: usize,
    score: f64,
}

pub fn validate_roster(roster: &RosterFile) -> anyhow::Result<()> {
    if roster.roster.len() < 2 {
        anyhow::bail!("Expected at least 2 Pokemon in the roster");
    }
    for mon in &roster.roster {
        mon.validate()?;
    }
    Ok(())
}
