use serde::{Deserialize, Serialize};

/// A book listed on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for the book
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// URL-friendly slug for the book
    pub slug: String,
}

impl Book {
    pub fn new(id: &str, title: &str, author: &str, slug: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            slug: slug.to_string(),
        }
    }
}

/// The fixed catalogue served by `GET /books`.
pub fn catalogue() -> Vec<Book> {
    vec![
        Book::new(
            "book-1",
            "The Rust Programming Language",
            "Steve Klabnik",
            "rust-programming-language",
        ),
        Book::new(
            "book-2",
            "Programming Rust",
            "Jim Blandy",
            "programming-rust",
        ),
        Book::new(
            "book-3",
            "Rust for Rustaceans",
            "Jon Gjengset",
            "rust-for-rustaceans",
        ),
    ]
}
