//! View models for search results; UI front-ends only lay these out.

use std::fmt;

use catalog::Catalog;
use shared::domain::{Book, BookId};

use crate::search::SearchPhase;

pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const YEAR_PLACEHOLDER: &str = "Year not available";
pub const EMPTY_RESULTS_MESSAGE: &str = "No books found for this author and category.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cover {
    Image { url: String, alt: String },
    /// Rendered as a generic book icon.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCard {
    pub book_id: BookId,
    pub title: String,
    pub author_name: String,
    pub year_label: String,
    pub cover: Cover,
}

impl BookCard {
    pub fn byline(&self) -> String {
        format!("By {}", self.author_name)
    }
}

impl fmt::Display for BookCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  {}", self.byline())?;
        writeln!(f, "  {}", self.year_label)?;
        match &self.cover {
            Cover::Image { url, .. } => write!(f, "  cover: {url}"),
            Cover::Placeholder => write!(f, "  cover: [no cover]"),
        }
    }
}

pub fn render_book(catalog: &Catalog, book: &Book) -> BookCard {
    let author_name = catalog
        .author_name(book.author_id)
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();
    let year_label = book
        .year
        .map(|year| year.to_string())
        .unwrap_or_else(|| YEAR_PLACEHOLDER.to_string());
    let cover = match book.cover_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Cover::Image {
            url: url.to_string(),
            alt: book.title.clone(),
        },
        _ => Cover::Placeholder,
    };

    BookCard {
        book_id: book.id,
        title: book.title.clone(),
        author_name,
        year_label,
        cover,
    }
}

/// What the result area shows. Exactly one region is visible at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Hidden,
    Loading,
    Results(Vec<BookCard>),
    Empty,
    Failed(String),
}

impl ResultsView {
    pub fn shows_spinner(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn cards(&self) -> &[BookCard] {
        match self {
            Self::Results(cards) => cards.as_slice(),
            _ => &[],
        }
    }
}

pub fn render_phase(catalog: &Catalog, phase: &SearchPhase) -> ResultsView {
    match phase {
        SearchPhase::Idle => ResultsView::Hidden,
        SearchPhase::Loading => ResultsView::Loading,
        SearchPhase::Results(books) => {
            ResultsView::Results(books.iter().map(|b| render_book(catalog, b)).collect())
        }
        SearchPhase::Empty => ResultsView::Empty,
        SearchPhase::Failed(message) => ResultsView::Failed(message.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{AuthorId, CategoryId};

    fn book(cover_url: Option<&str>, year: Option<i32>, author: i64) -> Book {
        Book {
            id: BookId(50),
            title: "Animal Farm".into(),
            author_id: AuthorId(author),
            category_id: CategoryId(2),
            year,
            cover_url: cover_url.map(str::to_string),
        }
    }

    #[test]
    fn card_shows_title_author_year_and_cover() {
        let catalog = Catalog::sample();
        let card = render_book(
            &catalog,
            &book(Some("https://images.example.com/af.jpg"), Some(1945), 2),
        );
        assert_eq!(card.title, "Animal Farm");
        assert_eq!(card.byline(), "By George Orwell");
        assert_eq!(card.year_label, "1945");
        assert_eq!(
            card.cover,
            Cover::Image {
                url: "https://images.example.com/af.jpg".into(),
                alt: "Animal Farm".into()
            }
        );
    }

    #[test]
    fn missing_cover_renders_placeholder_icon() {
        let catalog = Catalog::sample();
        assert_eq!(
            render_book(&catalog, &book(None, Some(1945), 2)).cover,
            Cover::Placeholder
        );
        assert_eq!(
            render_book(&catalog, &book(Some("   "), Some(1945), 2)).cover,
            Cover::Placeholder
        );
        let text = render_book(&catalog, &book(None, Some(1945), 2)).to_string();
        assert!(text.contains("[no cover]"));
        assert!(!text.contains("http"));
    }

    #[test]
    fn missing_year_and_unknown_author_use_placeholders() {
        let catalog = Catalog::sample();
        let card = render_book(&catalog, &book(None, None, 404));
        assert_eq!(card.year_label, YEAR_PLACEHOLDER);
        assert_eq!(card.author_name, UNKNOWN_AUTHOR);
    }

    #[test]
    fn phases_map_to_exclusive_views() {
        let catalog = Catalog::sample();
        assert_eq!(render_phase(&catalog, &SearchPhase::Idle), ResultsView::Hidden);
        assert!(render_phase(&catalog, &SearchPhase::Loading).shows_spinner());
        assert_eq!(render_phase(&catalog, &SearchPhase::Empty), ResultsView::Empty);

        let books = catalog.books_matching(AuthorId(3), CategoryId(3));
        let view = render_phase(&catalog, &SearchPhase::Results(books));
        assert!(!view.shows_spinner());
        assert_eq!(view.cards().len(), 1);
        assert_eq!(view.cards()[0].title, "Pride and Prejudice");
        assert_eq!(view.cards()[0].year_label, "1813");
    }
}
