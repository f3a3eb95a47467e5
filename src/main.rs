//! horn_syntax CLI - checks Horn-clause source files.
//!
//! Each path is scanned and parsed on its own; a failing file never stops
//! the rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use miette::{Diagnostic, NamedSource, Report};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use horn_syntax::{parse, scan, Clause, Query, Token};

#[derive(Debug, Parser)]
#[command(name = "horn_syntax", version, about = "Check Horn-clause source files")]
struct Cli {
    /// Source files, or directories whose files are checked in name order
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Print tokens and skip parsing
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the parsed clauses and query
    #[arg(long)]
    ast: bool,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "horn_syntax=warn",
        1 => "horn_syntax=debug",
        _ => "horn_syntax=trace",
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Expand directories into their regular files, sorted by name.
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        match fs::read_dir(path) {
            Ok(entries) => {
                let mut found: Vec<PathBuf> = entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .filter(|p| p.is_file())
                    .collect();
                found.sort();
                debug!(dir = %path.display(), files = found.len(), "expanded directory");
                files.extend(found);
            }
            // Keep the directory so the read failure gets reported per path.
            Err(_) => files.push(path.clone()),
        }
    }
    files
}

fn report<E>(diagnostic: E, name: &str, source: &str)
where
    E: Diagnostic + Send + Sync + 'static,
{
    let report =
        Report::new(diagnostic).with_source_code(NamedSource::new(name, source.to_string()));
    eprintln!("{:?}", report);
}

fn print_tokens(tokens: &[Token]) {
    println!("=== Tokens ===");
    for token in tokens {
        println!("{}", token);
    }
}

fn print_ast(clauses: &[Clause], query: Option<&Query>) {
    println!("=== Clauses ===");
    for (i, clause) in clauses.iter().enumerate() {
        println!("Clause {}:", i + 1);
        println!("  Head: {:?}", clause.head);
        if let Some(body) = &clause.body {
            println!("  Body:");
            for goal in body {
                println!("    {:?}", goal);
            }
        }
    }

    if let Some(query) = query {
        println!("\n=== Query ===");
        for goal in &query.goals {
            println!("  {:?}", goal);
        }
    }
}

/// Check one file; returns true when it is lexically and syntactically correct.
fn check_file(path: &Path, cli: &Cli) -> bool {
    let name = path.display().to_string();
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: cannot read: {}", name, e);
            return false;
        }
    };

    let (tokens, lex_errors) = scan(&source);
    if let Some(err) = lex_errors.into_iter().next() {
        eprintln!("{}: lexical error at {}:{}", name, err.line(), err.column());
        report(err, &name, &source);
        return false;
    }
    println!("{}: lexically correct", name);

    if cli.tokens {
        print_tokens(&tokens);
        return true;
    }

    match parse(tokens) {
        Ok(program) => {
            println!("{}: syntactically correct", name);
            if cli.ast {
                print_ast(&program.clauses, Some(&program.query));
            }
            true
        }
        Err(failure) => {
            eprintln!("{}: {} syntax error(s)", name, failure.diagnostics.len());
            if cli.ast {
                print_ast(&failure.partial.clauses, failure.partial.query.as_ref());
            }
            for diagnostic in failure.diagnostics {
                report(diagnostic, &name, &source);
            }
            false
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let files = expand_paths(&cli.paths);
    let failed = files.iter().filter(|path| !check_file(path, &cli)).count();
    info!(files = files.len(), failed, "batch complete");

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_for_verbosity() {
        assert_eq!(directive_for_verbosity(0), "horn_syntax=warn");
        assert_eq!(directive_for_verbosity(1), "horn_syntax=debug");
        assert_eq!(directive_for_verbosity(5), "horn_syntax=trace");
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["horn_syntax", "--ast", "-vv", "a.pl", "b.pl"]).unwrap();
        assert!(cli.ast);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.paths.len(), 2);
        assert!(Cli::try_parse_from(["horn_syntax", "--ast", "--tokens", "a.pl"]).is_err());
        assert!(Cli::try_parse_from(["horn_syntax"]).is_err());
    }
}
