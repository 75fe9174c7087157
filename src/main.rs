use anyhow::Context;
use clap::{Arg, Command};
use log::LevelFilter;
use safety_rating::{CatalogConfig, Platform, RiskEngine, Verdict};
use std::io::{self, BufRead};
use std::process;

fn main() {
    let matches = Command::new("safety-rating")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rates social-media text for scam, phishing, spam and link risk")
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Text to analyze (reads one text per line from stdin when omitted)"),
        )
        .arg(
            Arg::new("platform")
                .short('p')
                .long("platform")
                .value_name("NAME")
                .help("Platform the text came from: twitter, reddit, facebook, discord, instagram")
                .default_value("unknown"),
        )
        .arg(
            Arg::new("package")
                .long("package")
                .value_name("PACKAGE")
                .help("Android package name of the source app; overrides --platform")
                .conflicts_with("platform"),
        )
        .arg(
            Arg::new("catalog")
                .short('c')
                .long("catalog")
                .value_name("FILE")
                .help("Rule catalog file (YAML); the built-in catalog is used when omitted"),
        )
        .arg(
            Arg::new("generate-catalog")
                .long("generate-catalog")
                .value_name("FILE")
                .help("Write the built-in rule catalog to FILE and exit"),
        )
        .arg(
            Arg::new("test-catalog")
                .long("test-catalog")
                .help("Compile every rule in the catalog and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print one JSON verdict per line")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging, including matched rules")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-catalog") {
        generate_default_catalog(path);
        return;
    }

    let config = match load_catalog(matches.get_one::<String>("catalog")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading rule catalog: {e:#}");
            process::exit(1);
        }
    };

    let engine = match RiskEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ Rule catalog validation failed: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-catalog") {
        println!("Catalog version: {}", engine.catalog().version());
        println!("Number of rules: {}", config.rule_count());
        println!("✅ All rules compiled successfully.");
        return;
    }

    let platform = match matches.get_one::<String>("package") {
        Some(package) => Platform::from_package_name(package),
        None => matches
            .get_one::<String>("platform")
            .and_then(|name| name.parse().ok())
            .unwrap_or_default(),
    };
    let json = matches.get_flag("json");

    if let Some(text) = matches.get_one::<String>("text") {
        print_verdict(&engine.analyze(text, platform), json);
        return;
    }

    if let Err(e) = analyze_stdin(&engine, platform, json) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn load_catalog(path: Option<&String>) -> anyhow::Result<CatalogConfig> {
    match path {
        Some(path) => CatalogConfig::from_file(path),
        None => {
            log::debug!("No catalog file given, using built-in catalog");
            Ok(CatalogConfig::default())
        }
    }
}

fn generate_default_catalog(path: &str) {
    let config = CatalogConfig::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default rule catalog written to: {path}");
            println!("Edit the weights or rules, then check it with --test-catalog.");
        }
        Err(e) => {
            eprintln!("Error writing rule catalog: {e:#}");
            process::exit(1);
        }
    }
}

fn analyze_stdin(engine: &RiskEngine, platform: Platform, json: bool) -> anyhow::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        print_verdict(&engine.analyze(&line, platform), json);
    }
    Ok(())
}

fn print_verdict(verdict: &Verdict, json: bool) {
    if json {
        match serde_json::to_string(verdict) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("Failed to serialize verdict: {e}"),
        }
        return;
    }

    let icon = match verdict.risk_level() {
        safety_rating::RiskLevel::Safe => "✅",
        safety_rating::RiskLevel::Low => "🟡",
        safety_rating::RiskLevel::Medium => "🟠",
        safety_rating::RiskLevel::High => "🔴",
    };
    println!(
        "{icon} {} risk (score {}) on {}",
        verdict.risk_level(),
        verdict.overall_score(),
        verdict.platform()
    );
    for (category, score) in verdict.category_scores().iter() {
        if score > 0 {
            println!("   {category}: {score}");
        }
    }
    for warning in verdict.warnings() {
        println!("   ⚠ {warning}");
    }
    for factor in verdict.risk_factors() {
        println!("   • {factor}");
    }
}
