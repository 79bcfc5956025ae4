use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{Level, debug};

use contentstore::cli::{Cli, Command};
use contentstore::config::{BUILTIN_PREFIX, Config};
use contentstore::domain::{EducationalContent, LevelContent, OncologyEntry};
use contentstore::validation::{self, Severity};
use contentstore::{Category, ContentLoader, ContentRecord, ContentStore, Entry, LoadedContent, QueryService, catalog};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::ERROR };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing: {}", e))?;
    debug!(?level, "Logging initialized");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    debug!(?config, "contentstore starting");

    match cli.command {
        Command::Catalogs => {
            for name in catalog::names() {
                println!("{}{}", BUILTIN_PREFIX.dimmed(), name);
            }
        }
        Command::Validate { strict } => run_validate(&config, strict)?,
        Command::Get { id, level, json } => {
            let loaded = load_content(&config)?;
            let query = QueryService::new(&loaded.store);
            let Some(entry) = query.get_entry(&id) else {
                eprintln!("{} Entry not found: {}", "✗".red(), id);
                std::process::exit(1);
            };
            match level {
                Some(n) => {
                    let Some(content) = entry.as_educational() else {
                        eprintln!("{} {} has no content levels", "✗".red(), id);
                        std::process::exit(1);
                    };
                    let Some(level) = content.level(n) else {
                        eprintln!("{} {} has no level {}", "✗".red(), id, n);
                        std::process::exit(1);
                    };
                    if json {
                        println!("{}", serde_json::to_string_pretty(level)?);
                    } else {
                        print_level(level);
                    }
                }
                None if json => println!("{}", serde_json::to_string_pretty(entry)?),
                None => print_entry(entry, &loaded.store),
            }
        }
        Command::Search {
            query: text,
            max_results,
            json,
        } => {
            let loaded = load_content(&config)?;
            let query = QueryService::new(&loaded.store);
            let results = query.search(&text);
            let limit = max_results.unwrap_or(config.search.max_results);
            let shown: Vec<&Entry> = results.iter().copied().take(limit).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else if results.is_empty() {
                println!("No entries match '{}'", text);
            } else {
                for entry in &shown {
                    print_summary_line(entry);
                }
                if results.len() > shown.len() {
                    println!("{}", format!("... and {} more", results.len() - shown.len()).dimmed());
                }
            }
        }
        Command::Category { category, json } => {
            let category: Category = category.parse().map_err(|e: String| eyre::eyre!(e))?;
            let loaded = load_content(&config)?;
            let query = QueryService::new(&loaded.store);
            let results = query.filter_by_category(category);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("No entries in category {}", category);
            } else {
                for entry in results {
                    print_summary_line(entry);
                }
            }
        }
        Command::Tag { tag } => {
            let loaded = load_content(&config)?;
            let query = QueryService::new(&loaded.store);
            let results = query.filter_by_tag(&tag);
            if results.is_empty() {
                println!("No entries tagged {}", tag);
            }
            for entry in results {
                print_summary_line(entry);
            }
        }
        Command::Related { id } => {
            let loaded = load_content(&config)?;
            let query = QueryService::new(&loaded.store);
            if query.get_entry(&id).is_none() {
                eprintln!("{} Entry not found: {}", "✗".red(), id);
                std::process::exit(1);
            }
            let related = query.related(&id);
            if related.is_empty() {
                println!("{} has no cross-references", id);
            }
            for resolved in related {
                let reference = resolved.reference;
                match resolved.target {
                    Some(target) => println!(
                        "{:<10} {} {}",
                        reference.relationship.to_string().yellow(),
                        reference.target_id.cyan(),
                        target.name()
                    ),
                    None => println!(
                        "{:<10} {} {}",
                        reference.relationship.to_string().yellow(),
                        reference.target_id.red(),
                        "(missing)".dimmed()
                    ),
                }
            }
        }
        Command::Count => {
            let loaded = load_content(&config)?;
            println!("{}", QueryService::new(&loaded.store).count());
        }
        Command::List => {
            let loaded = load_content(&config)?;
            for entry in loaded.store.iter() {
                print_summary_line(entry);
            }
        }
    }

    Ok(())
}

/// Load every configured source and build a validated store
fn load_content(config: &Config) -> Result<LoadedContent> {
    let loader = ContentLoader::new(&config.content).context("Failed to load content")?;
    loader
        .build(&config.validation)
        .context("Failed to build content store")
}

fn run_validate(config: &Config, strict: bool) -> Result<()> {
    let loader = ContentLoader::new(&config.content).context("Failed to load content")?;
    let store = ContentStore::new(loader.entries().to_vec()).context("Failed to build content store")?;
    let report = validation::validate(&store, &config.validation);

    for issue in report.issues() {
        let severity = match issue.severity {
            Severity::Error => issue.severity.to_string().red().bold(),
            Severity::Warning => issue.severity.to_string().yellow(),
        };
        println!(
            "{} [{}] {} ({}): {}",
            severity,
            issue.kind,
            issue.entry_id.cyan(),
            issue.source.to_string().dimmed(),
            issue.message
        );
    }

    let summary = format!(
        "{} entries, {} error(s), {} warning(s)",
        store.len(),
        report.error_count(),
        report.warning_count()
    );
    match report.check(strict || config.validation.warnings_as_errors) {
        Ok(()) => {
            println!("{} {}", "✓".green(), summary);
            Ok(())
        }
        Err(_) => {
            println!("{} {}", "✗".red(), summary);
            std::process::exit(1);
        }
    }
}

fn print_summary_line(entry: &Entry) {
    println!(
        "{:<36} {} {}",
        entry.id().cyan(),
        entry.name(),
        format!("({})", entry.category()).dimmed()
    );
}

fn print_entry(entry: &Entry, store: &ContentStore) {
    println!("{} {}", entry.name().bold(), format!("[{}]", entry.id()).dimmed());
    println!("  Category: {}", entry.category());
    if let Some(source) = store.source_of(entry.id()) {
        println!("  Source: {}", source.to_string().dimmed());
    }
    match entry {
        Entry::Oncology(oncology) => print_oncology(oncology),
        Entry::Educational(content) => print_educational(content),
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", title.bold());
    for item in items {
        println!("  - {}", item);
    }
}

fn print_oncology(entry: &OncologyEntry) {
    println!("  Spanish: {}", entry.name_es);
    println!("  ICD-11: {}", entry.icd11);
    println!("\n{}\n{}", "Description".bold(), entry.description);
    println!("\n{}\n{}", "Epidemiology".bold(), entry.epidemiology);
    print_list("Risk factors", &entry.risk_factors);
    print_list("Clinical features", &entry.clinical_features);
    println!("\n{}\n{}", "Staging".bold(), entry.staging);
    print_list("Diagnostics", &entry.diagnostics);
    println!("\n{}\n{}", "Treatment".bold(), entry.treatment);
    println!("\n{}\n{}", "Prognosis".bold(), entry.prognosis);
    println!("\n{}\n{}", "For patients".bold(), entry.patient_explanation);
}

fn print_educational(content: &EducationalContent) {
    if let Some(name_es) = &content.name_es {
        println!("  Spanish: {}", name_es);
    }
    if !content.alternate_names.is_empty() {
        println!("  Also known as: {}", content.alternate_names.join(", "));
    }
    println!("  Status: {} (v{}, updated {})", content.status, content.version, content.updated_at);
    for level in content.levels.values() {
        println!();
        print_level(level);
    }
    if !content.cross_references.is_empty() {
        println!("\n{}", "See also".bold());
        for reference in &content.cross_references {
            println!("  - {} ({})", reference.target_id.cyan(), reference.relationship);
        }
    }
}

fn print_level(level: &LevelContent) {
    println!("{} {}", format!("Level {}:", level.level).bold(), level.summary);
    println!("{}", level.explanation);
    if !level.key_terms.is_empty() {
        println!("\n{}", "Key terms".bold());
        for term in &level.key_terms {
            println!("  {}: {}", term.term.yellow(), term.definition);
        }
    }
    if let Some(notes) = level.clinical_notes.as_deref().filter(|n| !n.is_empty()) {
        println!("\n{} {}", "Clinical notes:".italic(), notes);
    }
}
