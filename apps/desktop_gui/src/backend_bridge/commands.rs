//! Backend commands queued from UI to backend worker.

use client_core::SearchTicket;
use shared::domain::BookId;

pub enum BackendCommand {
    Search { ticket: SearchTicket },
    FetchCover { book_id: BookId, url: String },
}
