//! `dler directives` command implementation

use std::path::Path;

use colored::Colorize;

use dler_core::{DirectiveEngine, EngineConfig, FileAction, ProcessOptions, ProcessReport, ProjectConfig};
use dler_fs::NormalizedPath;

use crate::cli::DirectivesArgs;
use crate::error::{CliError, Result};

/// Run the directives command from `cwd`.
///
/// Fails when the run fails or when any file could not be processed.
pub fn run_directives(cwd: &Path, args: &DirectivesArgs) -> Result<()> {
    let root = resolve_root(cwd, args.root.as_deref())?;

    if !args.json {
        println!(
            "{} Applying directives in {}",
            "=>".blue().bold(),
            root.as_str().cyan()
        );
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(execute(root, args))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} file(s) could not be processed",
            report.errors.len()
        )))
    }
}

async fn execute(root: NormalizedPath, args: &DirectivesArgs) -> Result<ProcessReport> {
    let project = ProjectConfig::load(&root).await?;

    let targets = if args.targets.is_empty() {
        project.directives.targets.clone()
    } else {
        args.targets.clone()
    };
    if targets.is_empty() {
        return Err(CliError::user(
            "No targets given. Pass --target or set `targets` under [directives] in dler.toml",
        ));
    }

    let mut config = EngineConfig::from_project(root, &project);
    if let Some(source_dir) = &args.source_dir {
        config.source_dir = source_dir.clone();
    }
    apply_overrides(&mut config.options, args);

    tracing::debug!(?targets, options = ?config.options, "resolved run configuration");
    Ok(DirectiveEngine::new(config).run(&targets).await?)
}

/// Layer CLI flags over options loaded from config.
pub fn apply_overrides(options: &mut ProcessOptions, args: &DirectivesArgs) {
    if let Some(concurrency) = args.concurrency {
        options.concurrency = concurrency;
    }
    if let Some(targets_concurrency) = args.targets_concurrency {
        options.targets_concurrency = targets_concurrency;
    }
    if let Some(batch_size) = args.batch_size {
        options.batch_size = batch_size;
    }
    if args.stop_on_error {
        options.stop_on_error = true;
    }
    if args.no_copy_fresh {
        options.copy_fresh_from_source = false;
    }
    if args.dry_run {
        options.dry_run = true;
    }
}

fn resolve_root(cwd: &Path, root: Option<&Path>) -> Result<NormalizedPath> {
    let path = match root {
        Some(root) => cwd.join(root),
        None => cwd.to_path_buf(),
    };
    let canonical = dunce::canonicalize(&path).map_err(|e| {
        CliError::user(format!("Project root {} is not accessible: {}", path.display(), e))
    })?;
    Ok(NormalizedPath::new(canonical))
}

fn print_report(report: &ProcessReport) {
    for file in &report.processed {
        let marker = match file.action {
            FileAction::Modified => "~".yellow(),
            FileAction::Removed => "-".red(),
        };
        println!(
            "   {} {} {} ({})",
            marker,
            file.path.as_str().cyan(),
            file.action,
            file.target.dimmed()
        );
    }

    for failure in &report.errors {
        println!(
            "   {} {}: {}",
            "!".red(),
            failure.path.as_str().cyan(),
            failure.message
        );
    }

    let summary = format!(
        "{} modified, {} removed, {} warning(s)",
        report.count(FileAction::Modified),
        report.count(FileAction::Removed),
        report.warnings
    );

    println!();
    if report.dry_run {
        println!("{} {} (nothing written)", "DRY RUN".yellow().bold(), summary);
    } else if report.is_success() {
        println!("{} {}", "OK".green().bold(), summary);
    } else {
        println!("{} {}, {} failed", "FAILED".red().bold(), summary, report.errors.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut options = ProcessOptions {
            concurrency: 16,
            batch_size: 5,
            ..ProcessOptions::default()
        };
        let args = DirectivesArgs {
            concurrency: Some(2),
            no_copy_fresh: true,
            ..DirectivesArgs::default()
        };

        apply_overrides(&mut options, &args);

        assert_eq!(options.concurrency, 2);
        assert_eq!(options.batch_size, 5);
        assert!(!options.copy_fresh_from_source);
        assert!(!options.dry_run);
    }

    #[test]
    fn unset_flags_keep_config_values() {
        let mut options = ProcessOptions {
            stop_on_error: true,
            ..ProcessOptions::default()
        };
        apply_overrides(&mut options, &DirectivesArgs::default());
        assert_eq!(
            options,
            ProcessOptions {
                stop_on_error: true,
                ..ProcessOptions::default()
            }
        );
    }

    #[test]
    fn missing_root_is_a_user_error() {
        let cwd = std::env::temp_dir();
        let err = resolve_root(&cwd, Some(Path::new("definitely-missing-dler-root"))).unwrap_err();
        assert!(matches!(err, CliError::User { .. }));
    }
}
