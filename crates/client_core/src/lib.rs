//! Client-side book browsing: cascading selection, searches and result view models.

pub mod render;
pub mod search;
pub mod selection;
pub mod sheet_client;

pub use render::{render_book, render_phase, BookCard, Cover, ResultsView};
pub use search::{
    run_search, BookSource, SearchOutcome, SearchPhase, SearchSession, SearchTicket,
    DEFAULT_SEARCH_LATENCY,
};
pub use selection::{CategoryPrompt, SelectionController, SelectionError, SelectionState};
pub use sheet_client::{SheetClientError, SheetProxyClient, DEFAULT_PROXY_URL};
