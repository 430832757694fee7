//! Events delivered from the backend worker to the UI thread.

use client_core::SearchOutcome;
use shared::domain::BookId;

use crate::backend_bridge::covers::CoverImage;

pub enum UiEvent {
    SearchFinished(SearchOutcome),
    CoverLoaded { book_id: BookId, image: CoverImage },
    CoverFailed { book_id: BookId, reason: String },
    BackendFailed(String),
}
