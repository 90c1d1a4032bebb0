//! Command line interface for appnera.
//!
//! Parses arguments, builds [`Settings`](crate::wrapper::Settings) from the
//! config file and flags, runs one command and reports the outcome.

mod args;
mod output;

pub use args::{Args, Command, RuntimeConfig};
pub use output::OutputManager;

use crate::{
    error::{AppneraError, CliError, Result},
    wrapper::{
        AppManager, AppRecord, AppSpec, ConfigFile, Settings, SettingsBuilder,
        detect_interpreter, template::Materializer,
    },
};
use anyhow::anyhow;

/// Main CLI entry point
///
/// Returns the process exit code; errors are printed here with recovery
/// suggestions.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let config = RuntimeConfig::from(&args);
    let output = config.output();

    match execute(&args, output).await {
        Ok(()) => Ok(0),
        Err(e) => {
            output.error(&format!("{}: {}", e.kind_label(), e))?;
            for suggestion in e.recovery_suggestions() {
                output.error_detail(&format!("hint: {suggestion}"))?;
            }
            Ok(1)
        }
    }
}

async fn execute(args: &Args, output: &OutputManager) -> Result<()> {
    let settings = load_settings(args)?;
    log::debug!("{:?}", settings);
    let manager = AppManager::new(settings);

    match &args.command {
        Command::Create { url, name, icon } => {
            create(&manager, AppSpec::new(url, name, icon), output).await
        }
        Command::List { json } => list(&manager, *json, output).await,
        Command::Show { name } => show(&manager, name, output).await,
        Command::Uninstall { name } => uninstall(&manager, name, output).await,
    }
}

/// Config file values first, then command line flags on top.
pub fn load_settings(args: &Args) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => match ConfigFile::default_path() {
            Some(path) => ConfigFile::load_optional(&path)?,
            None => ConfigFile::default(),
        },
    };

    let mut builder = SettingsBuilder::new().config_file(file);
    if let Some(dir) = &args.base_dir {
        builder = builder.base_dir(dir);
    }
    if let Some(dir) = &args.applications_dir {
        builder = builder.applications_dir(dir);
    }
    if let Some(dir) = &args.icons_dir {
        builder = builder.icons_dir(dir);
    }
    if let Some(dir) = &args.template_dir {
        builder = builder.template_dir(dir);
    }
    if let Some(dir) = &args.lock_dir {
        builder = builder.lock_dir(dir);
    }
    Ok(builder.build()?)
}

async fn create(manager: &AppManager, spec: AppSpec, output: &OutputManager) -> Result<()> {
    let settings = manager.settings();
    if detect_interpreter(settings.python()).is_none() {
        output.warn(&format!(
            "{} was not found; building the runtime will fail",
            settings.python()
        ))?;
    }
    for missing in Materializer::new(settings.template_dir()).missing_payload() {
        output.warn(&format!("template file {} is missing", missing.display()))?;
    }

    output.section(&format!("Creating {}", spec.name.trim()))?;
    let job = manager.submit(spec).map_err(|e| CliError::ExecutionFailed {
        command: "create".into(),
        reason: e.to_string(),
    })?;
    let record = job
        .wait(|stage| {
            // progress output failing must not abort the job
            let _ = output.progress(stage.description());
        })
        .await?;

    output.success(&format!("Created {}", record.name))?;
    output.indent(&format!("Directory: {}", record.dir.display()))?;
    output.indent(&format!("Launcher:  {}", record.layout().launcher().display()))?;
    Ok(())
}

async fn list(manager: &AppManager, json: bool, output: &OutputManager) -> Result<()> {
    let records = blocking(manager, |m| m.list()).await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        output.info("No apps installed")?;
        return Ok(());
    }
    let width = records.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for record in &records {
        println!("{:<width$}  {}", record.name, record.dir.display());
    }
    output.verbose(&format!("{} app(s) in {}", records.len(), manager.settings().base_dir().display()))?;
    Ok(())
}

async fn show(manager: &AppManager, name: &str, output: &OutputManager) -> Result<()> {
    let owned = name.to_string();
    let found: Option<(AppRecord, u64)> = blocking(manager, move |m| {
        m.find(&owned).map(|record| {
            let size = record.disk_usage();
            (record, size)
        })
    })
    .await?;
    let Some((record, size)) = found else {
        return Err(CliError::AppNotFound { name: name.into() }.into());
    };

    let layout = record.layout();
    println!("Name:          {}", record.name);
    println!("Id:            {}", record.id);
    println!("Directory:     {}", record.dir.display());
    println!("Launcher:      {}", layout.launcher().display());
    println!("Desktop entry: {}", layout.descriptor(&record.id).display());
    println!("Disk usage:    {:.1} MB", size as f64 / (1024.0 * 1024.0));
    output.verbose(&format!("Runtime: {}", layout.runtime_dir().display()))?;
    Ok(())
}

async fn uninstall(manager: &AppManager, name: &str, output: &OutputManager) -> Result<()> {
    let owned = name.to_string();
    let report = blocking(manager, move |m| m.uninstall_named(&owned)).await??;

    if report.was_absent() {
        output.warn(&format!("'{name}' was not installed; nothing to remove"))?;
        return Ok(());
    }
    output.success(&format!("Uninstalled {name}"))?;
    output.verbose(&format!(
        "desktop entry link removed: {}, icon link removed: {}, directory removed: {}",
        report.descriptor_link_removed, report.icon_link_removed, report.directory_removed
    ))?;
    Ok(())
}

/// Runs filesystem-bound work off the async executor.
async fn blocking<T, F>(manager: &AppManager, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&AppManager) -> T + Send + 'static,
{
    let manager = manager.clone();
    tokio::task::spawn_blocking(move || f(&manager))
        .await
        .map_err(|e| AppneraError::Anyhow(anyhow!("worker task failed: {e}")))
}
