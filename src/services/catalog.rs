//! Catalog browsing and creation service

use crate::{
    api::dashboard::DashboardCounts,
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor},
        book::{Book, BookDetails, BookSummary, CreateBook},
        genre::{CreateGenre, Genre},
        instance::{BookInstance, CreateInstance, InstanceStatus},
        language::{CreateLanguage, Language},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dashboard counts plus the visit tally (incremented per request)
    pub async fn dashboard(&self, title_keyword: &str) -> AppResult<DashboardCounts> {
        self.repository.visits.record().await?;

        Ok(DashboardCounts {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.instances.count().await?,
            num_instances_available: self
                .repository
                .instances
                .count_by_status(InstanceStatus::Available)
                .await?,
            num_authors: self.repository.authors.count().await?,
            title_keyword: title_keyword.to_string(),
            num_books_with_keyword: self
                .repository
                .books
                .count_title_contains(title_keyword)
                .await?,
            num_visits: self.repository.visits.total().await?,
        })
    }

    /// Search books by title substring, paginated
    pub async fn list_books(
        &self,
        title: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<BookSummary>, i64)> {
        self.repository.books.search(title, limit, offset).await
    }

    /// Book detail with author, language, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        let author = self.repository.authors.get_by_id(book.author_id).await?;
        let language = match book.language_id {
            Some(language_id) => Some(self.repository.languages.get_by_id(language_id).await?),
            None => None,
        };
        let genres = self.repository.books.genres_for(id).await?;
        let instances = self.repository.instances.list_for_book(id).await?;

        Ok(BookDetails {
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author,
            language,
            genres,
            instances,
        })
    }

    /// Create a book after checking its references exist
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        if self.repository.authors.get_by_id(book.author_id).await.is_err() {
            return Err(AppError::Validation(format!(
                "Author with id {} does not exist",
                book.author_id
            )));
        }
        if let Some(language_id) = book.language_id {
            if self.repository.languages.get_by_id(language_id).await.is_err() {
                return Err(AppError::Validation(format!(
                    "Language with id {} does not exist",
                    language_id
                )));
            }
        }
        self.repository.books.create(&book).await
    }

    /// Create a copy of an existing book
    pub async fn create_instance(
        &self,
        book_id: i32,
        instance: CreateInstance,
    ) -> AppResult<BookInstance> {
        // 404 for an unknown book, 400 for an unknown borrower
        self.repository.books.get_by_id(book_id).await?;
        if let Some(borrower_id) = instance.borrower_id {
            if self.repository.users.get_by_id(borrower_id).await.is_err() {
                return Err(AppError::Validation(format!(
                    "User with id {} does not exist",
                    borrower_id
                )));
            }
        }
        self.repository.instances.create(book_id, &instance).await
    }

    /// List authors, paginated
    pub async fn list_authors(&self, limit: i64, offset: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(limit, offset).await
    }

    /// Author with their books
    pub async fn get_author(&self, id: i32) -> AppResult<(Author, Vec<BookSummary>)> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok((author, books))
    }

    /// Create a new author
    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        self.repository.authors.create(&author).await
    }

    /// List all genres
    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    /// Create a genre; duplicate names (case-insensitive) conflict
    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        if self.repository.genres.name_exists(&genre.name).await? {
            return Err(AppError::Conflict(format!(
                "Genre \"{}\" already exists",
                genre.name
            )));
        }
        self.repository.genres.create(&genre).await
    }

    /// List all languages
    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    /// Create a language; duplicate names (case-insensitive) conflict
    pub async fn create_language(&self, language: CreateLanguage) -> AppResult<Language> {
        if self.repository.languages.name_exists(&language.name).await? {
            return Err(AppError::Conflict(format!(
                "Language \"{}\" already exists",
                language.name
            )));
        }
        self.repository.languages.create(&language).await
    }
}
