use anyhow::Result;
use clap::Parser;
use commentq_bin::{argument_from_str, format_comment, load_document, open_settings, select_roots};
use commentq_config::settings::Setting;
use commentq_config::{config_set, config_store, config_store_write};
use commentq_query::{Argument, CommentEngine};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "commentq",
    version = "0.1.0",
    about = "Find comments in a markup file by text or by pseudo-attribute"
)]
struct Cli {
    #[clap(required = true, help = "The markup file to search")]
    file: PathBuf,

    #[clap(help = "Query arguments: [value] | [name value], optionally followed by true or false")]
    arguments: Vec<String>,

    #[clap(short = 'r', long = "root", help = "Search below every element with this tag name")]
    root: Option<String>,

    #[clap(long = "numbers", help = "Pass numeric arguments as numbers")]
    numbers: bool,

    #[clap(short = 'c', long = "count", help = "Only print the number of matches")]
    count: bool,

    #[clap(long = "strict", help = "Compare attribute values as strings")]
    strict: bool,

    #[clap(long = "keep-duplicates", help = "Keep comments that are found through more than one root")]
    keep_duplicates: bool,

    #[clap(long = "config", help = "Load settings from an existing json file")]
    config: Option<PathBuf>,

    #[clap(short = 'd', long = "debug", help = "Enable debug logging")]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        SimpleLogger::new().with_level(LevelFilter::Debug).init()?;
    }

    if let Some(path) = &cli.config {
        let storage = open_settings(path)?;
        config_store_write().set_storage(Box::new(storage));
    }

    // flags override the settings file for this run
    if cli.strict {
        config_set!(bool "query.coerce_types", false);
    }
    if cli.keep_duplicates {
        config_set!(bool "query.unique_results", false);
    }

    let document = load_document(&cli.file)?;
    let roots = select_roots(&document, cli.root.as_deref());

    let arguments: Vec<Argument> = cli
        .arguments
        .iter()
        .map(|value| argument_from_str(value, cli.numbers))
        .collect();

    let engine = CommentEngine::from_config();
    let comments = engine.comments(&document, &roots, &arguments)?;

    if cli.count {
        println!("{}", comments.len());
        return Ok(());
    }

    for value in comments.values(&document) {
        println!("{}", format_comment(value));
    }

    Ok(())
}
