//! sparql-rules: compile search rules from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Compile one rule
//! sparql-rules 'string(dcterms:title) contains ["foo", bar]'
//!
//! # Rules as JSON (a single rule or an array), from a file or stdin
//! sparql-rules --json rules.json
//! echo '{"field":"emf:hasParent","type":"object","operator":"set_to","value":["emf:1"]}' | sparql-rules --json -
//!
//! # Stable variable names
//! sparql-rules --deterministic 'numeric(emf:size) between [1, 10]'
//! ```

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde::Serialize;
use sparql_rules::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sparql-rules")]
#[command(version)]
#[command(about = "Compile search rules into SPARQL fragments", long_about = None)]
#[command(after_help = "EXAMPLES:
    sparql-rules 'string(emf:title) starts_with [abc]'
    sparql-rules 'object(anyRelation) set_to [emf:1, emf:2]'
    sparql-rules --json rules.json --format json")]
struct Cli {
    /// A rule in compact syntax: type(field) operator [values]
    rule: Option<String>,

    /// Read rules as JSON from a file ('-' for stdin)
    #[arg(long, conflicts_with_all = ["rule", "file"])]
    json: Option<String>,

    /// Read rules in compact syntax from a file, one per line
    #[arg(short, long, conflicts_with = "rule")]
    file: Option<PathBuf>,

    /// Configuration file (defaults to the user config dir)
    #[arg(short, long, env = "SPARQL_RULES_CONFIG")]
    config: Option<PathBuf>,

    /// Use sequential variable names (?v1, ?v2, ...)
    #[arg(short, long)]
    deterministic: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which operation a rule selects and what it compiles to
    Explain {
        /// The rule to explain
        rule: String,
    },
    /// List operations in precedence order
    Operators,
}

#[derive(Serialize)]
struct CompiledRule<'a> {
    rule: &'a SearchRule,
    operation: Option<String>,
    fragment: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Explain { rule }) => build_compiler(&cli).and_then(|c| explain_rule(&c, rule)),
        Some(Commands::Operators) => {
            show_operators();
            Ok(())
        }
        None => run(&cli),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_compiler(cli: &Cli) -> Result<RuleCompiler> {
    let config = CompilerConfig::load(cli.config.as_deref())?;
    let compiler = RuleCompiler::new(config);
    Ok(if cli.deterministic {
        compiler.with_variables(SequentialVariables::new())
    } else {
        compiler
    })
}

fn run(cli: &Cli) -> Result<()> {
    let rules = if let Some(source) = &cli.json {
        read_json_rules(source)?
    } else if let Some(path) = &cli.file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        parse_rules(&content)?
    } else if let Some(rule) = &cli.rule {
        vec![sparql_rules::parse(rule)?]
    } else {
        println!("{}", "sparql-rules: search rule compiler".cyan().bold());
        println!();
        println!("Usage: sparql-rules <RULE> [OPTIONS]");
        println!();
        println!("Try: sparql-rules --help");
        return Ok(());
    };

    let compiler = build_compiler(cli)?;
    let mut compiled = Vec::with_capacity(rules.len());
    for rule in &rules {
        let mut fragment = String::new();
        let operation = compiler.compile_into(rule, &mut fragment)?;
        compiled.push(CompiledRule {
            rule,
            operation: operation.map(|op| op.to_string()),
            fragment,
        });
    }

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&compiled)?),
        OutputFormat::Text => {
            for c in &compiled {
                if cli.verbose {
                    println!("{} {}", "Rule:".dimmed(), c.rule.to_string().yellow());
                }
                match (&c.operation, c.fragment.is_empty()) {
                    (None, _) => println!("{}", "(no operation applies)".dimmed()),
                    (Some(_), true) => println!("{}", "(empty fragment)".dimmed()),
                    (Some(_), false) => println!("{}", c.fragment.white()),
                }
            }
        }
    }
    Ok(())
}

/// A single rule object or an array of them.
fn read_json_rules(source: &str) -> Result<Vec<SearchRule>> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))?
    };

    let value: serde_json::Value = serde_json::from_str(&content).map_err(RuleError::from)?;
    let rules = if value.is_array() {
        serde_json::from_value(value).map_err(RuleError::from)?
    } else {
        vec![serde_json::from_value(value).map_err(RuleError::from)?]
    };
    Ok(rules)
}

fn explain_rule(compiler: &RuleCompiler, input: &str) -> Result<()> {
    println!("{}", "Rule Explanation".cyan().bold());
    println!();
    println!("{} {}", "Input:".dimmed(), input.yellow());
    println!();

    let rule = sparql_rules::parse(input)?;
    println!("{}", "Parsed Rule:".green().bold());
    println!("  {} {}", "Field:".dimmed(), rule.field.white());
    println!("  {} {}", "Type:".dimmed(), rule.value_type.to_string().cyan());
    println!(
        "  {} {}",
        "Operator:".dimmed(),
        rule.operator.as_deref().unwrap_or("<none>").cyan()
    );
    if !rule.values.is_empty() {
        println!("  {}", "Values:".dimmed());
        for v in &rule.values {
            println!("    • {:?}", v);
        }
    }
    println!();

    match compiler.select(&rule) {
        Some(op) => println!("{} {}", "Operation:".green().bold(), op.to_string().cyan()),
        None => {
            println!("{}", "No operation applies.".yellow());
            return Ok(());
        }
    }

    let fragment = compiler.compile(&rule)?;
    println!();
    println!("{}", "Generated SPARQL:".green().bold());
    if fragment.is_empty() {
        println!("  {}", "(empty fragment)".dimmed());
    } else {
        println!("  {}", fragment.white());
    }
    Ok(())
}

fn show_operators() {
    println!("{}", "Operations (first match wins)".cyan().bold());
    println!();
    println!(
        "{:4} {:18} {:10} {:28} {}",
        "#".white().bold(),
        "Operation".white().bold(),
        "Type".white().bold(),
        "Operator ids".white().bold(),
        "Values".white().bold()
    );
    println!("{}", "─".repeat(80).dimmed());

    for (i, op) in Operation::CATALOG.iter().enumerate() {
        let value_type = op.value_type().map(|t| t.to_string()).unwrap_or_else(|| "any".to_string());
        println!(
            "{:4} {:18} {:10} {:28} {}",
            (i + 1).to_string().dimmed(),
            op.to_string().cyan().bold(),
            value_type.yellow(),
            op.operator_ids().join(", ").white(),
            op.arity().dimmed()
        );
    }
}
