//! `ezplan load`

use anyhow::{Context, Result};
use clap::Args;
use ezplan_iolink::{LoaderConfig, TemplateLoader, TemplateStore, XmlSensorParser};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Args, Debug)]
pub(crate) struct LoadArgs {
    /// Directory holding template files
    dir: PathBuf,

    /// Loader configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template file extension, overrides the config file
    #[arg(long)]
    extension: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoadSummary {
    dir: String,
    version: Option<String>,
    templates: Vec<String>,
    failures: Vec<FailureLine>,
}

#[derive(Debug, Serialize)]
struct FailureLine {
    path: String,
    error: String,
}

pub(crate) async fn run(args: LoadArgs) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => LoaderConfig::from_file(path)
            .with_context(|| format!("cannot use loader config {}", path.display()))?,
        None => LoaderConfig::default(),
    };
    if let Some(extension) = args.extension {
        config = config.with_extension(extension);
    }

    let summary = load_summary(&args.dir, config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "loaded {} templates from {} (version {})",
            summary.templates.len(),
            summary.dir,
            summary.version.as_deref().unwrap_or("unknown")
        );
        for failure in &summary.failures {
            println!("  failed {}: {}", failure.path, failure.error);
        }
    }

    Ok(if summary.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub(crate) async fn load_summary(dir: &Path, config: LoaderConfig) -> Result<LoadSummary> {
    let store = TemplateStore::shared();
    let report = TemplateLoader::new(XmlSensorParser)
        .with_config(config)
        .load(dir, store.clone())
        .with_context(|| format!("cannot load templates from {}", dir.display()))?
        .join_all()
        .await;

    let mut failures: Vec<_> = report
        .failures
        .into_iter()
        .map(|err| FailureLine {
            path: err.path().display().to_string(),
            error: format!("{:#}", anyhow::Error::new(err)),
        })
        .collect();
    failures.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(LoadSummary {
        dir: dir.display().to_string(),
        version: store.version(),
        templates: store.names(),
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ezplan_test_utils::{broken_xml, TemplateDir};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn summary_lists_templates_and_failures() {
        let dir = TemplateDir::new();
        dir.write_sensors(3, "1.4");
        dir.write("zz_broken.lrp", &broken_xml());

        let summary = load_summary(dir.path(), LoaderConfig::default()).await.unwrap();

        assert_eq!(summary.templates, vec!["T000", "T001", "T002"]);
        assert_eq!(summary.version.as_deref(), Some("1.4"));
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].path.ends_with("zz_broken.lrp"));
        assert!(summary.failures[0].error.starts_with("template "));
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = TemplateDir::new();
        let result = load_summary(&dir.path().join("nope"), LoaderConfig::default()).await;
        assert!(result.is_err());
    }
}
