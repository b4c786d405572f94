use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use enhancer_app::cli::CliArgs;
use enhancer_app::logging;
use enhancer_app::runner::Driver;
use enhancer_app::scenario::Scenario;
use enhancer_app::settings::AppSettings;
use enhancer_engine::{decode_body, parse_document, EngineHandle, SnapshotWriter};
use enhancer_logging::{enhancer_info, enhancer_warn};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logging::initialize(args.log, args.level());
    run(&args)
}

fn run(args: &CliArgs) -> anyhow::Result<()> {
    let settings = AppSettings::load(args.config.as_deref())?;
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };

    let bytes =
        fs::read(&args.page).with_context(|| format!("reading {}", args.page.display()))?;
    let decoded = decode_body(&bytes, None);
    enhancer_info!(
        "loaded {} ({} bytes, {})",
        args.page.display(),
        bytes.len(),
        decoded.encoding
    );
    let doc = parse_document(&decoded.text);

    let config = settings.enhancer_config();
    if config.base_url.is_none() {
        enhancer_warn!("no base_url configured; relative fetch targets will fail");
    }
    let engine = EngineHandle::new(settings.fetch_settings()).context("starting fetch engine")?;
    let mut driver = Driver::new(doc, config, engine, settings.settle_timeout());

    driver.initialize();
    for (index, step) in scenario.steps.iter().enumerate() {
        driver
            .play(step)
            .with_context(|| format!("scenario step {} ({step:?})", index + 1))?;
    }

    let page_name = args.page.display().to_string();
    let (html, transcript) = driver.finish(&page_name, chrono::Utc::now());

    let stem = file_stem(&args.page);
    let writer = SnapshotWriter::new(args.out_dir.clone());
    let html_path = writer.write(&format!("{stem}.enhanced.html"), &html)?;
    let report_path = writer.write(&format!("{stem}.transcript.json"), &transcript.to_json()?)?;
    enhancer_info!(
        "wrote {} and {}",
        html_path.display(),
        report_path.display()
    );
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string())
}
