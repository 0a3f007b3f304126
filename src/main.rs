use std::io::{self, BufRead, Write};

use anyhow::Result;
use sips_core::{AppError, Config};
use sips_location::SystemLocationProvider;
use sips_services::{CafeId, EnrichedCafe};
use sips_ui::view::LOADING_MESSAGE;
use sips_ui::{render_deck, render_saved, CafeFinder, DeleteOutcome, SwipeDirection, ViewMode};

type Finder = CafeFinder<SystemLocationProvider>;

const HELP: &str = "Commands: [l]eft, [r]ight, [n]ext page, [s]aved, [b]rowse, d <id>, [q]uit";

#[tokio::main]
async fn main() -> Result<()> {
    sips_core::init()?;

    let (config, _) = Config::load_validated()?;
    tracing::info!("Data directory: {}", config.data_dir.display());

    let mut finder = CafeFinder::from_config(&config)?;

    println!("Sips & Spots");
    println!("{}", LOADING_MESSAGE);

    match finder.discover_with(print_progress).await {
        Ok(deck) => print!("{}", render_deck(deck)),
        Err(e) => {
            // Nothing to browse, but the saved list still works
            println!("{}", AppError::from(e).user_message());
        }
    }
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{} > ", prompt_label(finder.mode()));
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        match command {
            "" => continue,
            "q" | "quit" => break,
            "l" | "left" => swipe(&mut finder, SwipeDirection::Left).await,
            "r" | "right" => swipe(&mut finder, SwipeDirection::Right).await,
            "n" | "next" | "refresh" => {
                if finder.session().is_empty() {
                    println!("Nothing to refresh.");
                    continue;
                }
                println!("{}", LOADING_MESSAGE);
                let deck = finder.refresh_with(print_progress).await;
                print!("{}", render_deck(deck));
            }
            "s" | "saved" => show_saved(&mut finder),
            "b" | "browse" => print!("{}", render_deck(finder.show_deck())),
            "d" | "delete" => match parts.next().map(str::parse) {
                Some(Ok(id)) => delete(&mut finder, id),
                _ => println!("Usage: d <id>"),
            },
            _ => println!("{}", HELP),
        }
    }

    tracing::info!("Sips & Spots shutting down");
    Ok(())
}

fn prompt_label(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Deck => "deck",
        ViewMode::Saved => "saved",
    }
}

fn print_progress(position: usize, cafe: &EnrichedCafe) {
    println!("  {}. {}", position + 1, cafe.name);
}

async fn swipe(finder: &mut Finder, direction: SwipeDirection) {
    match finder.swipe(direction).await {
        Ok(Some(outcome)) => {
            tracing::debug!("{}", outcome.animation.transform());
            if finder.mode() == ViewMode::Saved {
                show_saved(finder);
            } else {
                print!("{}", render_deck(finder.deck()));
            }
        }
        Ok(None) => println!("Nothing to swipe."),
        Err(e) => println!("{}", AppError::from(e).user_message()),
    }
}

fn show_saved(finder: &mut Finder) {
    match finder.show_saved() {
        Ok(saved) => print!("{}", render_saved(&saved)),
        Err(e) => println!("{}", AppError::from(e).user_message()),
    }
}

fn delete(finder: &mut Finder, id: CafeId) {
    let mut ask = |prompt: &str| {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    };

    match finder.delete_saved(id, &mut ask) {
        Ok(DeleteOutcome::Deleted) => show_saved(finder),
        Ok(DeleteOutcome::NotFound) => println!("No saved cafe #{}", id),
        Ok(DeleteOutcome::Declined) => {}
        Err(e) => println!("{}", AppError::from(e).user_message()),
    }
}
