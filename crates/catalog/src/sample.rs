use shared::domain::{Author, AuthorId, Book, BookId, Category, CategoryId};

use crate::CatalogData;

fn author(id: i64, name: &str) -> Author {
    Author {
        id: AuthorId(id),
        name: name.to_string(),
    }
}

fn category(id: i64, name: &str, author_id: i64) -> Category {
    Category {
        id: CategoryId(id),
        name: name.to_string(),
        author_id: AuthorId(author_id),
    }
}

fn book(id: i64, title: &str, author_id: i64, category_id: i64, year: i32, cover: &str) -> Book {
    Book {
        id: BookId(id),
        title: title.to_string(),
        author_id: AuthorId(author_id),
        category_id: CategoryId(category_id),
        year: Some(year),
        cover_url: Some(cover.to_string()),
    }
}

pub(crate) fn sample_data() -> CatalogData {
    CatalogData {
        authors: vec![
            author(1, "J.K. Rowling"),
            author(2, "George Orwell"),
            author(3, "Jane Austen"),
        ],
        categories: vec![
            category(1, "Fantasy", 1),
            category(2, "Dystopian", 2),
            category(3, "Classic", 3),
            category(4, "Fiction", 1),
        ],
        books: vec![
            book(1, "Harry Potter", 1, 1, 1997, "https://images.example.com/hp.jpg"),
            book(2, "1984", 2, 2, 1949, "https://images.example.com/1984.jpg"),
            book(
                3,
                "Pride and Prejudice",
                3,
                3,
                1813,
                "https://images.example.com/p&p.jpg",
            ),
        ],
    }
}
