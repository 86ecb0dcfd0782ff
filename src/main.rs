use go_battle_engine::{run, Command, MatrixOptions, OutputFormat, SimulateOptions};
use go_battle_engine::SnapshotOverrides;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: go-battle simulate --input battle.json [--ruleset ruleset.json] [--max-turns N] \
[--format json|log] [--level1 L] [--level2 L] [--ivs1 A/D/S] [--ivs2 A/D/S]\n\
       go-battle matrix --roster roster.json [--ruleset ruleset.json] [--max-turns N] [--output matrix.csv]\n\
       go-battle ruleset"
    );
    std::process::exit(1);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses `15/15/15` style attack/defense/stamina IVs.
fn parse_ivs(raw: &str, overrides: &mut SnapshotOverrides) -> anyhow::Result<()> {
    let parts: Vec<&str> = raw.split('/').collect();
    let [atk, def, sta] = parts.as_slice() else {
        anyhow::bail!("IVs must look like ATK/DEF/STA (e.g. 15/15/15), got {raw}");
    };
    overrides.iv_atk = Some(atk.trim().parse()?);
    overrides.iv_def = Some(def.trim().parse()?);
    overrides.iv_sta = Some(sta.trim().parse()?);
    Ok(())
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str, hint: &str) -> anyhow::Result<String> {
    args.next()
        .ok_or_else(|| anyhow::anyhow!("{flag} requires {hint}"))
}

fn parse_simulate(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    let mut opts = SimulateOptions {
        input_path: PathBuf::from("battle.json"),
        ..SimulateOptions::default()
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => {
                opts.input_path = PathBuf::from(next_value(&mut args, "--input", "a path")?);
            }
            "--ruleset" => {
                opts.ruleset_path = Some(PathBuf::from(next_value(&mut args, "--ruleset", "a path")?));
            }
            "--max-turns" => {
                opts.max_turns = Some(next_value(&mut args, "--max-turns", "a number")?.parse()?);
            }
            "--format" => {
                let val = next_value(&mut args, "--format", "json or log")?;
                opts.format = match val.to_ascii_lowercase().as_str() {
                    "json" => OutputFormat::Json,
                    "log" => OutputFormat::Log,
                    other => anyhow::bail!("Unknown format {other} (use json or log)"),
                };
            }
            "--level1" => {
                opts.overrides1.level = Some(next_value(&mut args, "--level1", "a level")?.parse()?);
            }
            "--level2" => {
                opts.overrides2.level = Some(next_value(&mut args, "--level2", "a level")?.parse()?);
            }
            "--ivs1" => parse_ivs(&next_value(&mut args, "--ivs1", "ATK/DEF/STA")?, &mut opts.overrides1)?,
            "--ivs2" => parse_ivs(&next_value(&mut args, "--ivs2", "ATK/DEF/STA")?, &mut opts.overrides2)?,
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }
    Ok(Command::Simulate(opts))
}

fn parse_matrix(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    let mut opts = MatrixOptions {
        roster_path: PathBuf::from("roster.json"),
        ruleset_path: None,
        max_turns: None,
        output_path: PathBuf::from("matrix.csv"),
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--roster" => {
                opts.roster_path = PathBuf::from(next_value(&mut args, "--roster", "a path")?);
            }
            "--ruleset" => {
                opts.ruleset_path = Some(PathBuf::from(next_value(&mut args, "--ruleset", "a path")?));
            }
            "--max-turns" => {
                opts.max_turns = Some(next_value(&mut args, "--max-turns", "a number")?.parse()?);
            }
            "--output" => {
                opts.output_path = PathBuf::from(next_value(&mut args, "--output", "a path")?);
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }
    Ok(Command::Matrix(opts))
}

fn parse_args() -> anyhow::Result<Command> {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("simulate") => parse_simulate(args),
        Some("matrix") => parse_matrix(args),
        Some("ruleset") => Ok(Command::Ruleset),
        Some("--help") | Some("-h") | None => usage(),
        Some(other) => Err(anyhow::anyhow!("Unknown command {other}")),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let command = parse_args()?;
    run(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_ivs() {
        let mut overrides = SnapshotOverrides::default();
        parse_ivs("15/10/0", &mut overrides).unwrap();
        assert_eq!(overrides.iv_atk, Some(15));
        assert_eq!(overrides.iv_def, Some(10));
        assert_eq!(overrides.iv_sta, Some(0));
        assert!(parse_ivs("15/15", &mut overrides).is_err());
        assert!(parse_ivs("a/b/c", &mut overrides).is_err());
    }

    #[test]
    fn test_parse_simulate_flags() {
        let command = parse_simulate(args(&[
            "--input", "b.json", "--max-turns", "20", "--format", "log", "--level1", "41.5",
        ]))
        .unwrap();
        let Command::Simulate(opts) = command else {
            panic!("expected simulate");
        };
        assert_eq!(opts.input_path, PathBuf::from("b.json"));
        assert_eq!(opts.max_turns, Some(20));
        assert_eq!(opts.format, OutputFormat::Log);
        assert_eq!(opts.overrides1.level, Some(41.5));
        assert!(opts.overrides2.is_empty());
    }

    #[test]
    fn test_parse_matrix_rejects_unknown_flag() {
        assert!(parse_matrix(args(&["--sims", "3"])).is_err());
    }
}
