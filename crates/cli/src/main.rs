//! defscan CLI: outline, search and check source files from the terminal.
//!
//! Calls `defscan-core` directly. Files are scanned in parallel; output keeps
//! the sorted file order.

mod walk;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use defscan_core::{
    Balance, DefinitionRecord, ProfileId, ScanError, ScanOptions, ScanResult, Scanner, Severity,
};

const DEFAULT_CONFIG_FILE: &str = ".defscan.toml";

/// Heuristic definition scanner for many languages.
#[derive(Parser)]
#[command(name = "defscan", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: ./.defscan.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Force a profile instead of detecting one per file
    #[arg(long, global = true)]
    profile: Option<ProfileId>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the definitions in each file
    Outline {
        /// Files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Hide definitions nested deeper than this
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Find definitions by name
    Find {
        /// Exact name, or a dotted qualified name such as `Config.load`
        name: String,

        /// Files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Only report functions and methods
        #[arg(long)]
        functions: bool,
    },
    /// Report diagnostics and delimiter balance; exits 1 on errors
    Check {
        /// Files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FileOutline {
    path: String,
    #[serde(flatten)]
    result: ScanResult,
}

#[derive(Serialize)]
struct Match<'a> {
    path: &'a str,
    qualified_name: String,
    #[serde(flatten)]
    record: &'a DefinitionRecord,
}

#[derive(Serialize)]
struct FileCheck<'a> {
    path: &'a str,
    profile: ProfileId,
    diagnostics: &'a [defscan_core::Diagnostic],
    balance: Balance,
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn load_options(config: Option<&Path>) -> Result<ScanOptions> {
    let (path, explicit) = match config {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if !explicit && !path.exists() {
        return Ok(ScanOptions::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("could not read config {}", path.display()))?;
    ScanOptions::from_toml_str(&content).with_context(|| format!("invalid config {}", path.display()))
}

struct Scanned {
    path: String,
    bytes: Vec<u8>,
    result: ScanResult,
}

/// Unreadable files are skipped with a warning; a failed scan aborts the run.
fn scan_all(scanner: &Scanner, files: &[PathBuf], profile: Option<ProfileId>) -> Result<Vec<Scanned>> {
    let results: Vec<Option<Scanned>> = files
        .par_iter()
        .map(|path| {
            let display_path = path.to_string_lossy().replace('\\', "/");
            let bytes = match std::fs::read(path) {
                Ok(b) => b,
                Err(e) => {
                    warn!(path = %display_path, error = %e, "could not read file");
                    return Ok(None);
                }
            };
            let outcome = scanner.scan_bytes(&bytes, &display_path, profile);
            scanned(display_path, bytes, outcome).map(Some)
        })
        .collect::<Result<_>>()?;
    Ok(results.into_iter().flatten().collect())
}

fn scanned(path: String, bytes: Vec<u8>, outcome: Result<ScanResult, ScanError>) -> Result<Scanned> {
    let result = outcome.with_context(|| format!("scan of {path} failed"))?;
    Ok(Scanned { path, bytes, result })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn outline(scanned: Vec<Scanned>, max_depth: Option<usize>, json: bool) -> Result<ExitCode> {
    let total: usize = scanned.iter().map(|s| s.result.definitions.len()).sum();
    let files: Vec<FileOutline> = scanned
        .into_iter()
        .map(|s| {
            let mut result = s.result;
            if let Some(max) = max_depth {
                prune(&mut result, max);
            }
            FileOutline { path: s.path, result }
        })
        .collect();

    if json {
        print_json(&files)?;
        return Ok(ExitCode::SUCCESS);
    }

    for f in &files {
        println!("{} ({})", f.path, f.result.profile);
        for d in &f.result.definitions {
            println!(
                "{:>6}  {}{:<10} {}",
                d.start_line,
                "  ".repeat(d.depth),
                d.kind.label(),
                display_name(d)
            );
        }
    }
    eprintln!("\n{total} definitions in {} files", files.len());
    Ok(ExitCode::SUCCESS)
}

/// Drop records nested deeper than `max_depth`, renumbering parent links.
fn prune(result: &mut ScanResult, max_depth: usize) {
    let records = std::mem::take(&mut result.definitions);
    let mut remap = vec![None; records.len()];
    for (i, d) in records.into_iter().enumerate() {
        if d.depth > max_depth {
            continue;
        }
        remap[i] = Some(result.definitions.len());
        let parent = d.parent.and_then(|p| remap[p]);
        result.definitions.push(DefinitionRecord { parent, ..d });
    }
}

fn find(scanned: &[Scanned], name: &str, functions_only: bool, json: bool) -> Result<ExitCode> {
    let mut matches = Vec::new();
    for s in scanned {
        for (i, d) in s.result.definitions.iter().enumerate() {
            if functions_only && !d.kind.is_callable() {
                continue;
            }
            let qualified = s.result.qualified_name(i).unwrap_or_else(|| d.name.clone());
            let hit = if name.contains('.') { qualified == name } else { d.name == name };
            if hit {
                matches.push(Match { path: &s.path, qualified_name: qualified, record: d });
            }
        }
    }

    if json {
        print_json(&matches)?;
    } else {
        if matches.is_empty() {
            eprintln!("No definitions named '{name}'");
            return Ok(ExitCode::from(1));
        }
        for m in &matches {
            println!(
                "{}:{}: {} {}\n    {}",
                m.path,
                m.record.start_line,
                m.record.kind.label(),
                m.qualified_name,
                m.record.signature
            );
        }
    }
    Ok(if matches.is_empty() { ExitCode::from(1) } else { ExitCode::SUCCESS })
}

fn check(scanner: &Scanner, scanned: &[Scanned], profile: Option<ProfileId>, json: bool) -> Result<ExitCode> {
    let reports: Vec<FileCheck> = scanned
        .iter()
        .map(|s| FileCheck {
            path: &s.path,
            profile: s.result.profile,
            diagnostics: &s.result.diagnostics,
            balance: scanner.check_balance(&s.bytes, &s.path, profile),
        })
        .collect();
    let failed = scanned.iter().any(|s| s.result.has_errors());

    if json {
        print_json(&reports)?;
    } else {
        for r in &reports {
            for d in r.diagnostics {
                println!(
                    "{}:{}:{}: {}[{}]: {}",
                    r.path,
                    d.span.line,
                    d.span.column + 1,
                    d.severity.as_str(),
                    d.kind.as_str(),
                    d.message
                );
            }
            if !r.balance.is_balanced() {
                let b = &r.balance;
                println!(
                    "{}: unbalanced {{}} +{}/-{}  () +{}/-{}  [] +{}/-{}",
                    r.path,
                    b.braces.unclosed,
                    b.braces.unopened,
                    b.parens.unclosed,
                    b.parens.unopened,
                    b.brackets.unclosed,
                    b.brackets.unopened
                );
            }
        }
        let errors = reports
            .iter()
            .flat_map(|r| r.diagnostics)
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = reports.iter().map(|r| r.diagnostics.len()).sum::<usize>() - errors;
        eprintln!("\n{} files: {errors} errors, {warnings} warnings", reports.len());
    }
    Ok(if failed { ExitCode::from(1) } else { ExitCode::SUCCESS })
}

fn display_name(d: &DefinitionRecord) -> &str {
    if d.name.is_empty() {
        "<anonymous>"
    } else {
        &d.name
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let options = load_options(cli.config.as_deref())?;
    let scanner = Scanner::new(options);

    match cli.command {
        Commands::Outline { paths, max_depth } => {
            let files = walk::collect_files(&paths, scanner.options())?;
            outline(scan_all(&scanner, &files, cli.profile)?, max_depth, cli.json)
        }
        Commands::Find { name, paths, functions } => {
            let files = walk::collect_files(&paths, scanner.options())?;
            find(&scan_all(&scanner, &files, cli.profile)?, &name, functions, cli.json)
        }
        Commands::Check { paths } => {
            let files = walk::collect_files(&paths, scanner.options())?;
            check(&scanner, &scan_all(&scanner, &files, cli.profile)?, cli.profile, cli.json)
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("defscan=warn,defscan_core=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_renumbers_parents() {
        let src = "class A:\n    def a(self):\n        def inner():\n            pass\nclass B:\n    def b(self):\n        pass\n";
        let mut result = defscan_core::scan(src, "m.py", None).expect("scan");
        prune(&mut result, 1);

        let shape: Vec<(&str, Option<usize>)> =
            result.definitions.iter().map(|d| (d.name.as_str(), d.parent)).collect();
        assert_eq!(shape, vec![("A", None), ("a", Some(0)), ("B", None), ("b", Some(2))]);
    }

    #[test]
    fn test_scan_failure_is_fatal_with_path_context() {
        let failure = ScanError::InvariantViolation {
            invariant: "masked_length",
            detail: "masked text is 3 bytes, source is 4".to_string(),
        };
        let err = scanned("src/a.rs".to_string(), b"fn a".to_vec(), Err(failure))
            .err()
            .expect("a failed scan is an error");
        let message = format!("{err:#}");
        assert!(message.starts_with("scan of src/a.rs failed"), "{message}");
        assert!(message.contains("masked_length"), "{message}");

        let result = defscan_core::scan("fn a() {}\n", "src/a.rs", None);
        let ok = scanned("src/a.rs".to_string(), Vec::new(), result).expect("scan");
        assert_eq!(ok.result.definitions.len(), 1);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let scanner = Scanner::new(ScanOptions::default());
        let files = [PathBuf::from("/definitely/not/here.rs")];
        let scanned = scan_all(&scanner, &files, None).expect("read errors are warnings");
        assert!(scanned.is_empty());
    }

    #[test]
    fn test_cli_parses_profile_names() {
        let cli = Cli::try_parse_from(["defscan", "outline", "--profile", "py", "src"]).expect("parse");
        assert_eq!(cli.profile, Some(ProfileId::Python));
        assert!(Cli::try_parse_from(["defscan", "outline", "--profile", "cobol", "src"]).is_err());
        assert!(Cli::try_parse_from(["defscan", "outline"]).is_err(), "paths are required");
    }
}
