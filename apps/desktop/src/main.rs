use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use catalog::Catalog;
use clap::{Parser, Subcommand};
use client_core::{
    render_phase, run_search, ResultsView, SearchSession, SearchTicket, SelectionController,
    SelectionError, SheetProxyClient, DEFAULT_PROXY_URL,
};
use shared::domain::{AuthorId, CategoryId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Browse books by author and category")]
struct Args {
    /// Catalog file (.json or .toml); the built-in sample is used when omitted.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every author.
    Authors,
    /// List the categories offered for an author.
    Categories {
        #[arg(long)]
        author: i64,
    },
    /// Run the author → category search flow.
    Search {
        #[arg(long)]
        author: i64,
        #[arg(long)]
        category: i64,
        #[arg(long, default_value_t = 800)]
        latency_ms: u64,
    },
    /// Fetch one tab through the sheet proxy.
    Sheet {
        #[arg(long, default_value = DEFAULT_PROXY_URL)]
        proxy_url: String,
        #[arg(long)]
        tab: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    match args.command {
        Command::Authors => {
            let catalog = load_catalog(args.catalog.as_ref())?;
            for line in author_lines(&catalog) {
                println!("{line}");
            }
        }
        Command::Categories { author } => {
            let mut selection = SelectionController::new(load_catalog(args.catalog.as_ref())?);
            selection.choose_author(AuthorId(author))?;
            println!("{}", selection.category_prompt().label());
            for category in selection.offered_categories() {
                println!("{:>4}  {}", category.id, category.name);
            }
        }
        Command::Search {
            author,
            category,
            latency_ms,
        } => {
            let catalog = load_catalog(args.catalog.as_ref())?;
            let mut selection = SelectionController::new(catalog.clone());
            let mut session = SearchSession::new();
            let ticket = begin_search(
                &mut selection,
                &mut session,
                AuthorId(author),
                CategoryId(category),
            )?;
            print_view(&render_phase(&catalog, session.phase()));

            let outcome =
                run_search(&*catalog, ticket, Duration::from_millis(latency_ms)).await;
            session.apply(outcome);
            print_view(&render_phase(&catalog, session.phase()));
        }
        Command::Sheet { proxy_url, tab } => {
            let client = SheetProxyClient::new(&proxy_url)?;
            let values = client.fetch_tab(tab.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
    }

    Ok(())
}

fn author_lines(catalog: &Catalog) -> Vec<String> {
    catalog
        .list_authors()
        .iter()
        .map(|author| format!("{:>4}  {}", author.id, author.name))
        .collect()
}

/// Starts a search for the pair. A category the author does not offer is still
/// searched (and comes back empty) rather than treated as an error.
fn begin_search(
    selection: &mut SelectionController,
    session: &mut SearchSession,
    author: AuthorId,
    category: CategoryId,
) -> Result<SearchTicket> {
    selection.choose_author(author)?;
    match selection.choose_category(category) {
        Ok(()) => session
            .begin_for(selection)
            .context("search requires both an author and a category"),
        Err(SelectionError::CategoryNotOffered { author, category }) => {
            tracing::warn!(%author, %category, "category is not offered for this author");
            Ok(session.begin(author, category))
        }
        Err(err) => Err(err.into()),
    }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Arc<Catalog>> {
    let catalog = match path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::sample(),
    };
    Ok(Arc::new(catalog))
}

fn print_view(view: &ResultsView) {
    match view {
        ResultsView::Hidden => {}
        ResultsView::Loading => println!("Loading..."),
        ResultsView::Results(cards) => {
            for card in cards {
                println!("{card}\n");
            }
        }
        ResultsView::Empty => println!("{}", client_core::render::EMPTY_RESULTS_MESSAGE),
        ResultsView::Failed(message) => println!("Search failed: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_listing_has_no_placeholder_row() {
        let lines = author_lines(&Catalog::sample());
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("J.K. Rowling"));
        assert!(lines.iter().all(|line| !line.contains("--")));
    }

    #[tokio::test]
    async fn category_not_offered_searches_to_empty() {
        let catalog = Arc::new(Catalog::sample());
        let mut selection = SelectionController::new(catalog.clone());
        let mut session = SearchSession::new();
        let ticket = begin_search(&mut selection, &mut session, AuthorId(1), CategoryId(3))
            .expect("forced pair still searches");
        assert_eq!(render_phase(&catalog, session.phase()), ResultsView::Loading);

        let outcome = run_search(&*catalog, ticket, Duration::ZERO).await;
        assert!(session.apply(outcome));
        assert_eq!(render_phase(&catalog, session.phase()), ResultsView::Empty);
    }

    #[tokio::test]
    async fn offered_pair_searches_to_results() {
        let catalog = Arc::new(Catalog::sample());
        let mut selection = SelectionController::new(catalog.clone());
        let mut session = SearchSession::new();
        let ticket = begin_search(&mut selection, &mut session, AuthorId(2), CategoryId(2))
            .expect("ticket");
        session.apply(run_search(&*catalog, ticket, Duration::ZERO).await);
        let view = render_phase(&catalog, session.phase());
        assert_eq!(view.cards().len(), 1);
        assert_eq!(view.cards()[0].title, "1984");
    }

    #[test]
    fn unknown_author_is_still_an_error() {
        let mut selection = SelectionController::new(Arc::new(Catalog::sample()));
        let mut session = SearchSession::new();
        assert!(begin_search(&mut selection, &mut session, AuthorId(99), CategoryId(1)).is_err());
        assert!(!session.is_loading());
    }
}
