use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use rezeptbuch_config::Config;
use rezeptbuch_engine::models::Registry;
use rezeptbuch_engine::parsing::ParseOptions;
use rezeptbuch_engine::{BuildOptions, build_collection, import, io, validate};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("rezeptbuch");

    match args.get(1).map(String::as_str) {
        Some("build") => run_build(&args[2..]),
        Some("import") => run_import(program, &args[2..]),
        Some("users") => run_users(program, &args[2..]),
        Some("validate") => run_validate(&args[2..]),
        Some("clean") => run_clean(),
        _ => {
            print_usage(program);
            process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  build [corpus-dir] [-o <recipes.json>]   Build the merged collection");
    eprintln!("  import <form.csv> [corpus-dir]           Import form responses as recipe files");
    eprintln!("  users <users.json> [-o <registry.json>]  Build the user registry");
    eprintln!("  validate [collection.json]               Check an emitted collection");
    eprintln!("  clean                                    Remove generated files");
    eprintln!();
    eprintln!(
        "Paths left out on the command line are read from {}",
        Config::config_path().display()
    );
}

/// Loads the config file; a malformed file is fatal, an absent one is not.
fn load_config() -> Option<Config> {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    }
}

fn require<T>(value: Option<T>, what: &str) -> T {
    value.unwrap_or_else(|| {
        eprintln!("Error: No {what} given and none configured");
        eprintln!("Pass it on the command line or create {}", Config::config_path().display());
        process::exit(1);
    })
}

/// Splits a trailing "-o <path>" off an argument list.
fn split_output_flag(args: &[String]) -> (Vec<&str>, Option<PathBuf>) {
    let mut positional = Vec::new();
    let mut output = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-o" {
            output = iter.next().map(PathBuf::from);
        } else {
            positional.push(arg.as_str());
        }
    }
    (positional, output)
}

fn run_build(args: &[String]) -> Result<()> {
    let config = load_config();
    let (positional, output_flag) = split_output_flag(args);

    let corpus_dir = positional
        .first()
        .map(PathBuf::from)
        .or_else(|| config.as_ref().map(|c| c.corpus_dir.clone()));
    let corpus_dir = require(corpus_dir, "corpus directory");

    let output_path = output_flag.or_else(|| config.as_ref().map(|c| c.output_path.clone()));
    let output_path = require(output_path, "output path");

    if let Err(e) = io::validate_corpus_dir(&corpus_dir) {
        eprintln!(
            "Error: Corpus path '{}' is invalid: {e}",
            corpus_dir.display()
        );
        process::exit(1);
    }

    let registry = match config.as_ref().and_then(|c| c.registry_path.as_deref()) {
        Some(path) => io::load_registry(path)
            .with_context(|| format!("loading registry from {}", path.display()))?,
        None => Registry::new(),
    };
    log::debug!("registry loaded with {} users", registry.len());

    let mut options = BuildOptions::default();
    if let Some(config) = &config {
        if let Some(author) = &config.default_comment_author {
            options.parse = ParseOptions {
                default_comment_author: author.clone(),
            };
        }
        options.creator_overrides = config.creator_overrides.clone();
    }

    println!("Scanning {} ...", corpus_dir.display());
    let collection = build_collection(&corpus_dir, &registry, &options)
        .with_context(|| format!("building collection from {}", corpus_dir.display()))?;

    io::write_collection(&output_path, &collection)
        .with_context(|| format!("writing {}", output_path.display()))?;

    println!(
        "Processed {} recipes across {} categories",
        collection.total_recipes,
        collection.categories.len()
    );
    println!("Saved collection to {}", output_path.display());

    Ok(())
}

fn run_import(program: &str, args: &[String]) -> Result<()> {
    let config = load_config();
    let (positional, _) = split_output_flag(args);

    let Some(csv_path) = positional.first().map(PathBuf::from) else {
        eprintln!("Usage: {program} import <form.csv> [corpus-dir]");
        eprintln!();
        eprintln!("The CSV file should be exported from Google Forms.");
        process::exit(1);
    };

    if !csv_path.exists() {
        eprintln!("Error: File not found: {}", csv_path.display());
        process::exit(1);
    }

    let corpus_dir = positional
        .get(1)
        .map(PathBuf::from)
        .or_else(|| config.as_ref().map(|c| c.corpus_dir.clone()));
    let corpus_dir = require(corpus_dir, "corpus directory");
    let output_dir = corpus_dir.join("recipes");

    println!("Reading {} ...", csv_path.display());
    let content = fs::read_to_string(&csv_path)
        .with_context(|| format!("reading {}", csv_path.display()))?;
    let responses = import::parse_form_csv(&content)?;
    println!("Found {} importable response(s)", responses.len());

    for response in &responses {
        let recipe = import::convert_to_recipe(response);
        let path = output_dir.join(format!("{}.json", recipe.id));
        // One-recipe array per file, matching the hand-maintained corpus.
        io::write_recipe_file(&path, std::slice::from_ref(&recipe))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("  created {} ({})", path.display(), recipe.title);
    }

    println!("Imported {} recipe(s) to {}", responses.len(), output_dir.display());
    println!("Run '{program} build' to refresh the collection.");

    Ok(())
}

fn run_users(program: &str, args: &[String]) -> Result<()> {
    let config = load_config();
    let (positional, output_flag) = split_output_flag(args);

    let users_path = positional
        .first()
        .map(PathBuf::from)
        .or_else(|| config.as_ref().and_then(|c| c.users_path.clone()));
    let Some(users_path) = users_path else {
        eprintln!("Usage: {program} users <users.json> [-o <registry.json>]");
        process::exit(1);
    };

    let registry_path = output_flag
        .or_else(|| config.as_ref().and_then(|c| c.registry_path.clone()));
    let registry_path = require(registry_path, "registry output path");

    let users = io::load_users(&users_path)
        .with_context(|| format!("loading users from {}", users_path.display()))?;
    println!("Found {} users", users.len());

    let registry = Registry::from_users(users);
    io::write_registry(&registry_path, &registry)
        .with_context(|| format!("writing {}", registry_path.display()))?;

    println!("Saved registry to {}", registry_path.display());
    Ok(())
}

fn run_validate(args: &[String]) -> Result<()> {
    let config = load_config();

    let collection_path = args
        .first()
        .map(PathBuf::from)
        .or_else(|| config.as_ref().map(|c| c.output_path.clone()));
    let collection_path = require(collection_path, "collection path");

    let collection = io::load_collection(&collection_path)
        .with_context(|| format!("loading {}", collection_path.display()))?;

    println!("Validating {} ...", collection_path.display());
    println!("  Total recipes: {}", collection.total_recipes);
    println!("  Categories: {}", collection.categories.len());
    println!("  Generated: {}", collection.generated_at);

    let warnings = validate::validate_collection(&collection);
    if warnings.is_empty() {
        println!("  No validation warnings!");
        return Ok(());
    }

    println!();
    println!("Found {} validation warnings:", warnings.len());
    for warning in warnings.iter().take(10) {
        println!("  - {warning}");
    }
    if warnings.len() > 10 {
        println!("  ... and {} more warnings", warnings.len() - 10);
    }
    println!();
    println!("These are data quality issues in the source files, not build errors.");

    Ok(())
}

fn run_clean() -> Result<()> {
    let config = load_config();
    let Some(config) = config else {
        eprintln!("Error: Nothing to clean without a config file");
        process::exit(1);
    };

    println!("Cleaning generated files ...");
    remove_if_present(&config.output_path)?;
    if let Some(registry_path) = &config.registry_path {
        remove_if_present(registry_path)?;
    }
    println!("Clean complete");

    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            println!("  removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
    }
}
