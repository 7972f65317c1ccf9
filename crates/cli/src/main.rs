use std::io::{self, Read};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use pollex_core::{parse, print, SyntaxError};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Pollex expression codec.
#[derive(Parser)]
#[command(name = "pollex", version, about = "Pollex expression codec")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse expressions and report syntax errors
    Check {
        /// Expressions to check; with none, reads one per line from stdin
        exprs: Vec<String>,
    },

    /// Reprint expressions in canonical form
    Fmt {
        /// Expressions to format; with none, reads one per line from stdin
        exprs: Vec<String>,
    },

    /// Print the JSON tree of one expression
    Tree {
        /// Expression to parse; with none, reads the whole of stdin
        expr: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { exprs } => {
            cmd_check(&exprs, cli.output, cli.quiet);
        }
        Commands::Fmt { exprs } => {
            cmd_fmt(&exprs, cli.output, cli.quiet);
        }
        Commands::Tree { expr } => {
            cmd_tree(expr.as_deref(), cli.output, cli.quiet);
        }
    }
}

fn cmd_check(exprs: &[String], output: OutputFormat, quiet: bool) {
    let mut failures = 0usize;
    for (line, text) in gather_inputs(exprs, output, quiet) {
        match parse(&text) {
            Ok(_) => {
                if !quiet {
                    match output {
                        OutputFormat::Text => println!("ok"),
                        OutputFormat::Json => println!("{}", serde_json::json!({ "ok": true })),
                    }
                }
            }
            Err(err) => {
                report_parse_failure(line, &err, output, quiet);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        process::exit(1);
    }
}

fn cmd_fmt(exprs: &[String], output: OutputFormat, quiet: bool) {
    for (line, text) in gather_inputs(exprs, output, quiet) {
        match parse(&text) {
            Ok(expr) => {
                let canonical = print(&expr);
                match output {
                    OutputFormat::Text => println!("{}", canonical),
                    OutputFormat::Json => {
                        println!("{}", serde_json::json!({ "canonical": canonical }));
                    }
                }
            }
            Err(err) => {
                report_parse_failure(line, &err, output, quiet);
                process::exit(1);
            }
        }
    }
}

fn cmd_tree(expr: Option<&str>, output: OutputFormat, quiet: bool) {
    let text = match expr {
        Some(text) => text.to_owned(),
        None => read_stdin(output, quiet),
    };
    match parse(&text) {
        Ok(expr) => {
            let pretty = serde_json::to_string_pretty(&expr)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        Err(err) => {
            report_parse_failure(None, &err, output, quiet);
            process::exit(1);
        }
    }
}

/// Expressions given as arguments, or one per non-empty stdin line when
/// no arguments are present. The line number rides along for stdin
/// inputs so failures can name their source line.
fn gather_inputs(
    exprs: &[String],
    output: OutputFormat,
    quiet: bool,
) -> Vec<(Option<usize>, String)> {
    if !exprs.is_empty() {
        return exprs.iter().map(|e| (None, e.clone())).collect();
    }
    let text = read_stdin(output, quiet);
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (Some(i + 1), line.to_owned()))
        .collect()
}

fn read_stdin(output: OutputFormat, quiet: bool) -> String {
    let mut text = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut text) {
        report_error(&format!("error reading stdin: {}", e), output, quiet);
        process::exit(1);
    }
    text
}

fn report_parse_failure(line: Option<usize>, err: &SyntaxError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let mut value = err.to_json_value();
            if let (Some(n), Some(map)) = (line, value.as_object_mut()) {
                map.insert("line".to_owned(), serde_json::json!(n));
            }
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            if !quiet {
                match line {
                    Some(n) => eprintln!("line {}: {}", n, err),
                    None => eprintln!("{}", err),
                }
            }
        }
    }
}

fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
