//! Gridcalc - command-mode driver for the grid calculation engine

mod config;
mod error;
mod table;

use anyhow::{Context, bail};
use gridcalc_core::Document;
use std::env;
use std::io::{BufRead, Write};
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: gridcalc [OPTIONS]");
    eprintln!();
    eprintln!("Edits are read from stdin as `CELL TEXT` lines unless --set is given.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <CELL> <TEXT>   Commit TEXT to CELL (can be repeated)");
    eprintln!("  -t, --table               Print the grid as a markdown table when done");
    eprintln!("  -q, --quiet               Do not print value changes");
    eprintln!("  --rows <N>                Number of rows (default: 10)");
    eprintln!("  --cols <N>                Number of columns (default: 10)");
    eprintln!("  --config <FILE>           Load grid settings from a TOML file");
    eprintln!("  -h, --help                Print help");
}

struct Options {
    edits: Vec<(String, String)>,
    table: bool,
    quiet: bool,
    rows: Option<usize>,
    cols: Option<usize>,
    config_file: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<Options>> {
    let mut opts = Options {
        edits: Vec::new(),
        table: false,
        quiet: false,
        rows: None,
        cols: None,
        config_file: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-s" | "--set" => {
                if i + 2 >= args.len() {
                    bail!("--set requires a cell and a value");
                }
                opts.edits.push((args[i + 1].clone(), args[i + 2].clone()));
                i += 2;
            }
            "-t" | "--table" => opts.table = true,
            "-q" | "--quiet" => opts.quiet = true,
            "--rows" | "--cols" => {
                let flag = args[i].clone();
                i += 1;
                let Some(value) = args.get(i) else {
                    bail!("{} requires a number", flag);
                };
                let n = value
                    .parse::<usize>()
                    .with_context(|| format!("invalid value for {}: {}", flag, value))?;
                if flag == "--rows" {
                    opts.rows = Some(n);
                } else {
                    opts.cols = Some(n);
                }
            }
            "--config" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    bail!("--config requires a file path");
                };
                opts.config_file = Some(PathBuf::from(path));
            }
            arg => {
                print_usage();
                bail!("Unknown option: {}", arg);
            }
        }
        i += 1;
    }

    Ok(Some(opts))
}

/// Split a stdin line into cell id and text. The text keeps its own spacing.
fn parse_edit_line(line: &str) -> Option<(String, String)> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (cell, text) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    Some((cell.to_string(), text.to_string()))
}

/// Apply one edit, printing its changes. Returns false if the edit was rejected.
fn apply(doc: &mut Document, cell: &str, text: &str, quiet: bool) -> anyhow::Result<bool> {
    match doc.commit_edit(cell, text) {
        Ok(changes) => {
            if !quiet {
                let mut out = std::io::stdout().lock();
                for change in changes {
                    writeln!(out, "{} = {}", change.cell_id, change.display)?;
                }
            }
            Ok(true)
        }
        Err(e) => {
            eprintln!("Error: {}: {}", cell, e);
            Ok(false)
        }
    }
}

fn run() -> anyhow::Result<bool> {
    let args: Vec<String> = env::args().collect();
    let Some(opts) = parse_args(&args)? else {
        return Ok(true);
    };

    let (mut config, warnings) = config::load_config(opts.config_file.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    if let Some(rows) = opts.rows {
        config.rows = rows;
    }
    if let Some(cols) = opts.cols {
        config.columns = cols;
    }
    log::debug!("grid {}x{}", config.columns, config.rows);

    let mut doc = Document::new(&config).context("cannot create grid")?;

    let mut ok = true;
    if opts.edits.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            if let Some((cell, text)) = parse_edit_line(&line) {
                ok &= apply(&mut doc, &cell, &text, opts.quiet)?;
            }
        }
    } else {
        for (cell, text) in &opts.edits {
            ok &= apply(&mut doc, cell, text, opts.quiet)?;
        }
    }

    if opts.table {
        table::write_table(&mut std::io::stdout().lock(), &doc)?;
    }
    Ok(ok)
}

fn main() {
    env_logger::init();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
