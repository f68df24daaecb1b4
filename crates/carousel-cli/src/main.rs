use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use carousel_config::{CarouselConfig, ensure_workspace_config, validate_config};
use carousel_core::{
    Candidate, ExplorationOptions, SelectionContext, SelectionOptions, SelectionTuning, seed_day,
    select_distributed, select_with_exploration,
};
use clap::Parser;

mod cli;
mod filter;
mod output;

use cli::{Cli, Commands, LogFormat, SelectArgs};
use filter::VisibilityFilter;
use output::{SelectOutputFormat, SelectionRow, write_selection_json, write_selection_table};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);
    run(cli)
}

fn init_logging(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Human => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Select(args) => run_select(&cli.workspace, &args),
        Commands::SeedDay(args) => {
            println!("{}", seed_day(args.at_ms.unwrap_or_else(now_ms)));
            Ok(())
        }
    }
}

fn run_select(workspace: &Path, args: &SelectArgs) -> Result<()> {
    let config = ensure_workspace_config(workspace).with_context(|| {
        format!(
            "failed to load or create workspace config at {}",
            workspace.join(".carousel/config.toml").display()
        )
    })?;
    for warning in validate_config(&config) {
        eprintln!(
            "carousel config warning [{}]: {}",
            warning.code, warning.message
        );
    }

    let raw = fs::read_to_string(&args.candidates)
        .with_context(|| format!("failed to read candidate file {}", args.candidates.display()))?;
    let candidates: Vec<Candidate> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse candidate JSON {}", args.candidates.display()))?;

    tracing::info!(
        pool = candidates.len(),
        viewer = args.viewer_id.as_deref().unwrap_or("anon"),
        "running distribution selection"
    );

    let now = now_ms();
    let ctx = SelectionContext {
        viewer_id: args.viewer_id.clone(),
        exclude_ids: args.exclude.iter().cloned().collect(),
    };
    let options = SelectionOptions {
        seed_day: args.seed_day.clone(),
        reset_index: args.reset_index,
        now_ms: Some(now),
        sticky_ids: args.sticky.clone(),
        tuning: tuning_from_config(&config),
    };

    let rows = if args.explore {
        let exploration = ExplorationOptions {
            explore_count: config.exploration.explore_count,
            seen_ids: args.seen.iter().cloned().collect(),
        };
        let outcome =
            select_with_exploration(candidates, &ctx, &VisibilityFilter, &options, &exploration)?;

        let explore_ids = outcome
            .explore
            .iter()
            .map(|candidate| candidate.id.as_str())
            .collect::<HashSet<_>>();
        outcome
            .display
            .iter()
            .map(|candidate| {
                let segment = if explore_ids.contains(candidate.id.as_str()) {
                    "explore"
                } else {
                    "core"
                };
                SelectionRow::new(candidate, segment, now)
            })
            .collect::<Vec<_>>()
    } else {
        let selected = select_distributed(candidates, &ctx, &VisibilityFilter, &options)?;
        selected
            .iter()
            .map(|candidate| SelectionRow::new(candidate, "core", now))
            .collect()
    };

    let mut out = std::io::stdout();
    match args.output {
        SelectOutputFormat::Table => write_selection_table(&rows, &mut out)?,
        SelectOutputFormat::Json => write_selection_json(&rows, &mut out)?,
    }

    Ok(())
}

fn tuning_from_config(config: &CarouselConfig) -> SelectionTuning {
    let selection = &config.selection;
    SelectionTuning {
        tier_quotas: [
            selection.quota_active,
            selection.quota_recent,
            selection.quota_dormant,
        ],
        core_count: selection.core_count,
        mix: selection.mix,
        half_life_hours: selection.half_life_hours,
        active_within_days: selection.active_within_days,
        recent_within_days: selection.recent_within_days,
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuning_mapping_preserves_config_values() {
        let mut config = CarouselConfig::default();
        config.selection.core_count = 5;
        config.selection.quota_active = 2;
        config.selection.quota_recent = 2;
        config.selection.quota_dormant = 1;
        config.selection.mix = 0.5;

        let tuning = tuning_from_config(&config);
        assert_eq!(tuning.core_count, 5);
        assert_eq!(tuning.tier_quotas, [2, 2, 1]);
        assert_eq!(tuning.mix, 0.5);
        assert_eq!(tuning.half_life_hours, 12);
    }

    #[test]
    fn default_config_maps_to_default_tuning() {
        assert_eq!(
            tuning_from_config(&CarouselConfig::default()),
            SelectionTuning::default()
        );
    }
}
