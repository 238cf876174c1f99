use clap::{Parser, Subcommand};
use colored::Colorize;
use futures::StreamExt;
use hero_catalog::config::{DEFAULT_BASE_URL, DEFAULT_DEBOUNCE};
use hero_catalog::views::{Dashboard, HeroDetail, HeroesView, Navigator};
use hero_catalog::{search, ClientConfig, Hero, HeroService, HttpTransport, InMemoryBackend, MessageLog};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hero-catalog")]
#[command(about = "Browse and edit the hero catalog")]
struct Args {
    /// Backend base URL; `api/heroes` is resolved against it
    #[arg(long, env = "HERO_CATALOG_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Quiet window before a typed search term is sent
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
    debounce_ms: u64,

    /// Serve requests from a seeded in-process table instead of HTTP
    #[arg(long)]
    in_memory: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every hero
    List,
    /// Show the top heroes
    Top,
    /// Show one hero
    Get { id: i32 },
    /// Read search terms from stdin, one per line, and print live results
    Search,
    /// Create a hero
    Add { name: String },
    /// Delete a hero
    Delete { id: i32 },
    /// Rename a hero through its detail view
    Rename { id: String, name: String },
}

/// Terminal "back": there is no history to pop, so just say so.
struct Terminal;

impl Navigator for Terminal {
    fn back(&self) {
        println!("{}", "<- back".dimmed());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    #[cfg(target_family = "windows")]
    {
        if colored::control::set_virtual_terminal(true).is_err() {
            eprintln!("failed to print colorfully.")
        };
    }

    let config = ClientConfig::default()
        .with_base_url(args.base_url)
        .with_debounce(Duration::from_millis(args.debounce_ms));
    let messages = MessageLog::new();
    let service = if args.in_memory {
        info!("using in-memory backend");
        HeroService::new(InMemoryBackend::seeded(), messages.clone(), &config)
    } else {
        info!(base_url = %config.base_url, "using http backend");
        HeroService::new(HttpTransport::default(), messages.clone(), &config)
    };

    match args.command {
        Command::List => {
            let mut view = HeroesView::new(service);
            view.load().await;
            print_heroes(view.heroes());
        }
        Command::Top => {
            let mut dashboard = Dashboard::new(service);
            dashboard.load().await;
            print_heroes(dashboard.heroes());
        }
        Command::Get { id } => match service.get(id).await {
            Some(hero) => print_heroes(&[hero]),
            None => println!("{}", format!("no hero with id {id}").red()),
        },
        Command::Search => run_search(service, config.debounce).await?,
        Command::Add { name } => {
            let mut view = HeroesView::new(service);
            if let Some(hero) = view.add(&name).await {
                print_heroes(std::slice::from_ref(hero));
            }
        }
        Command::Delete { id } => {
            if let Some(hero) = service.remove(id).await {
                print_heroes(&[hero]);
            }
        }
        Command::Rename { id, name } => {
            let mut detail = HeroDetail::open(service, Terminal, &id)?;
            detail.load().await;
            match detail.hero_mut() {
                Some(hero) => {
                    hero.name = name.trim().to_string();
                    print_heroes(&[hero.clone()]);
                    detail.save().await;
                }
                None => {
                    println!("{}", format!("no hero with id {}", detail.id()).red());
                    detail.go_back();
                }
            }
        }
    }

    print_messages(&messages);
    Ok(())
}

async fn run_search(service: HeroService, debounce: Duration) -> std::io::Result<()> {
    let (handle, mut results) = search::spawn(service, debounce);

    let printer = tokio::spawn(async move {
        while let Some(heroes) = results.next().await {
            println!("{}", format!("{} result(s)", heroes.len()).yellow());
            print_heroes(&heroes);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        handle.search(line);
    }
    drop(handle);

    if let Err(e) = printer.await {
        eprintln!("{}", e);
    }
    Ok(())
}

fn print_heroes(heroes: &[Hero]) {
    for hero in heroes {
        println!("{:>4}  {}", hero.id.to_string().green(), hero.name);
    }
}

fn print_messages(messages: &MessageLog) {
    for line in messages.messages() {
        if line.contains(" failed: ") {
            eprintln!("{}", line.red());
        } else {
            eprintln!("{}", line.dimmed());
        }
    }
}

fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("hero_catalog=debug")
        } else {
            EnvFilter::new("hero_catalog=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
