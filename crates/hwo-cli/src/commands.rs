use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span, warn};

use hwo_cli::input::{InputTable, override_map, read_table, read_windows};
use hwo_core::model::ValidationError;
use hwo_core::reconcile::column_samples;
use hwo_core::{EngineConfig, ProcessedTable, ProcessingSummary, TargetEngine, TargetPlan};

use crate::cli::{FieldsArgs, OutputFormatArg, RankArgs, TableArgs};
use crate::summary::{
    print_errors, print_fields, print_processing, print_ranking, print_reconciliation,
    print_scores, print_sequence,
};

pub fn load_engine(path: Option<&Path>) -> Result<TargetEngine> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading engine configuration");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    TargetEngine::new(config).context("invalid engine configuration")
}

pub fn run_fields(engine: &TargetEngine, args: &FieldsArgs) -> Result<()> {
    let catalog = engine.reconciler().catalog();
    match args.format {
        OutputFormatArg::Json => write_json(catalog),
        OutputFormatArg::Table => {
            print_fields(catalog);
            Ok(())
        }
    }
}

/// Returns `false` when a required field could not be mapped.
pub fn run_reconcile(engine: &TargetEngine, args: &TableArgs) -> Result<bool> {
    let table = load_table(&args.input)?;
    let overrides = override_map(&args.overrides)?;
    let samples = column_samples(
        &table.rows,
        table.headers.len(),
        engine.reconciler().config().sample_size,
    );
    let result = if overrides.is_empty() {
        engine.reconcile(&table.headers, &samples)
    } else {
        engine.reconcile_with_override(&table.headers, &samples, &overrides)?
    };
    match args.format {
        OutputFormatArg::Json => write_json(&result)?,
        OutputFormatArg::Table => print_reconciliation(&result),
    }
    Ok(result.can_proceed())
}

/// Returns `false` when any row was rejected.
pub fn run_score(engine: &TargetEngine, args: &TableArgs) -> Result<bool> {
    let processed = process(engine, args)?;
    match args.format {
        OutputFormatArg::Json => write_json(&processed)?,
        OutputFormatArg::Table => {
            print_processing(&processed);
            print_scores(&processed.scored);
            print_errors(&processed.errors);
        }
    }
    Ok(processed.errors.is_empty())
}

#[derive(Serialize)]
struct RankOutput<'a> {
    summary: &'a ProcessingSummary,
    plan: &'a TargetPlan,
    errors: &'a [ValidationError],
}

/// Returns `false` when any row was rejected or a target was left out of the
/// sequence.
pub fn run_rank(engine: &TargetEngine, args: &RankArgs) -> Result<bool> {
    let processed = process(engine, &args.table)?;
    let windows = match &args.windows {
        Some(path) => read_windows(path)?,
        None => BTreeMap::new(),
    };
    let mut plan = engine
        .plan(&processed.scored, args.sequence, &windows)
        .context("sequence optimization failed")?;
    if let Some(top) = args.top {
        plan.ranking.entries.truncate(top);
    }

    let excluded = plan
        .sequence
        .as_ref()
        .map_or(0, |sequence| sequence.excluded.len());
    match args.table.format {
        OutputFormatArg::Json => write_json(&RankOutput {
            summary: &processed.summary,
            plan: &plan,
            errors: &processed.errors,
        })?,
        OutputFormatArg::Table => {
            print_processing(&processed);
            print_ranking(&plan.ranking);
            if let Some(sequence) = &plan.sequence {
                print_sequence(sequence);
            }
            print_errors(&processed.errors);
        }
    }
    Ok(processed.errors.is_empty() && excluded == 0)
}

fn process(engine: &TargetEngine, args: &TableArgs) -> Result<ProcessedTable> {
    let table = load_table(&args.input)?;
    let overrides = override_map(&args.overrides)?;
    let span = info_span!("table", path = %args.input.display());
    let _guard = span.enter();
    let processed = engine.process_table(&table.headers, &table.rows, &overrides)?;
    if !processed.errors.is_empty() {
        warn!(rejected = processed.errors.len(), "some rows were rejected");
    }
    Ok(processed)
}

fn load_table(path: &Path) -> Result<InputTable> {
    let table = read_table(path)?;
    info!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "read input table"
    );
    Ok(table)
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value).context("write json")?;
    writeln!(handle)?;
    Ok(())
}
