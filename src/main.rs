//! VibeExec - run a filter/project/limit pipeline over a delimited table file

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use log::info;
use std::path::PathBuf;
use vibeexec::access::{Schema, Value};
use vibeexec::executor::Executor;
use vibeexec::expression::Expression;
use vibeexec::source::{DelimitedFileSource, RowSource};

/// VibeExec - a pull-based query pipeline over a table file
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Table file: a `name:type,...` header followed by comma-separated rows
    #[arg(short, long)]
    input: PathBuf,

    /// Keep rows where LHS equals RHS; each side is a column, integer, true/false or 'text'
    #[arg(short = 'w', long = "where-eq", value_name = "LHS=RHS")]
    where_eq: Vec<String>,

    /// Columns to output, in order (default: all)
    #[arg(short, long)]
    select: Vec<String>,

    /// Maximum number of rows to output
    #[arg(short, long)]
    limit: Option<usize>,

    /// Number of rows to skip before output
    #[arg(long, default_value = "0")]
    offset: usize,

    /// Print the operator tree instead of running it
    #[arg(long)]
    explain: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let source = DelimitedFileSource::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let input_schema = source.schema();
    info!("Reading {} with schema {}", args.input.display(), input_schema);

    let mut plan = Executor::scan(source);
    for condition in &args.where_eq {
        let predicate = parse_condition(condition, &input_schema)
            .with_context(|| format!("Invalid --where-eq {:?}", condition))?;
        plan = Executor::filter(predicate, plan);
    }
    if !args.select.is_empty() {
        let list: Vec<_> = args
            .select
            .iter()
            .map(|name| (name.clone(), Expression::variable(name.as_str())))
            .collect();
        plan = Executor::project(list, plan);
    }
    if args.limit.is_some() || args.offset > 0 {
        plan = Executor::limit(plan, args.limit.unwrap_or(usize::MAX), args.offset);
    }

    if args.explain {
        print!("{}", plan.explain());
        plan.close().context("Failed to close plan")?;
        return Ok(());
    }

    let count = run(&mut plan)?;
    info!("{} row(s)", count);
    Ok(())
}

/// Drive the plan to completion, printing rows in output schema order
fn run(plan: &mut Executor) -> Result<usize> {
    let outcome = stream(plan);
    let closed = plan.close().context("Failed to close plan");
    let count = outcome?;
    closed?;
    Ok(count)
}

fn stream(plan: &mut Executor) -> Result<usize> {
    plan.open().context("Failed to open plan")?;
    let schema = plan.output_schema()?.clone();
    println!("{}", schema.column_names().collect::<Vec<_>>().join("\t"));

    let mut count = 0;
    while let Some(row) = plan.next().context("Query execution failed")? {
        let fields: Vec<String> = row
            .values_in(&schema)?
            .into_iter()
            .map(|value| match value {
                Value::Text(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        println!("{}", fields.join("\t"));
        count += 1;
    }
    Ok(count)
}

fn parse_condition(condition: &str, schema: &Schema) -> Result<Expression> {
    let Some((lhs, rhs)) = split_condition(condition) else {
        bail!("expected LHS=RHS");
    };
    Ok(Expression::eq(
        parse_operand(lhs, schema),
        parse_operand(rhs, schema),
    ))
}

/// Split at the first `=` outside a quoted literal
fn split_condition(condition: &str) -> Option<(&str, &str)> {
    let mut quoted = false;
    for (i, c) in condition.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '=' if !quoted => return Some((&condition[..i], &condition[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Column names win over literal readings of the same text
fn parse_operand(text: &str, schema: &Schema) -> Expression {
    let text = text.trim();
    if schema.contains(text) {
        return Expression::variable(text);
    }
    if let Some(quoted) = text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Expression::literal(quoted.replace("''", "'"));
    }
    if let Ok(i) = text.parse::<i64>() {
        return Expression::literal(i);
    }
    match text {
        "true" => Expression::literal(true),
        "false" => Expression::literal(false),
        // Unknown names stay variables so validation reports them
        _ => Expression::variable(text),
    }
}
