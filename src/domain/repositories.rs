//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;
use super::lending::{BorrowerKind, BorrowerRef, CopyStatus};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Department {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Staff {
    pub id: i32,
    pub name: String,
}

/// A student or professor together with their department.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Borrower {
    pub kind: BorrowerKind,
    pub id: i32,
    pub name: String,
    pub department_id: i32,
    /// Date of joining; students only
    pub joined_on: Option<NaiveDate>,
}

impl Borrower {
    pub fn reference(&self) -> BorrowerRef {
        BorrowerRef {
            kind: self.kind,
            id: self.id,
        }
    }
}

/// Input for registering a borrower
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBorrowerInput {
    pub kind: BorrowerKind,
    pub name: String,
    pub department_id: i32,
    pub joined_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

/// Book title with catalog details
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub department_id: i32,
    pub copy_count: i32,
    pub authors: Vec<String>,
}

/// Input for creating a book
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBookInput {
    pub title: String,
    pub department_id: i32,
    #[serde(default)]
    pub author_ids: Vec<i32>,
}

/// Physical copy as seen by the catalog
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Copy {
    pub id: i32,
    pub book_id: i32,
    pub purchase_date: NaiveDate,
    pub publication_date: NaiveDate,
    pub price: f64,
    pub edition: Option<f64>,
    pub status: CopyStatus,
    pub tampered: bool,
}

/// Input for adding a copy to a book
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCopyInput {
    pub purchase_date: NaiveDate,
    pub publication_date: NaiveDate,
    pub price: f64,
    pub edition: Option<f64>,
}

/// Repository trait for catalog entities (everything except the loan ledger)
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_department(&self, name: String) -> Result<Department, DomainError>;

    async fn find_department(&self, id: i32) -> Result<Option<Department>, DomainError>;

    async fn create_staff(&self, name: String) -> Result<Staff, DomainError>;

    async fn find_staff(&self, id: i32) -> Result<Option<Staff>, DomainError>;

    /// Register a student or professor in an existing department
    async fn create_borrower(&self, input: CreateBorrowerInput) -> Result<Borrower, DomainError>;

    async fn find_borrower(&self, borrower: BorrowerRef) -> Result<Option<Borrower>, DomainError>;

    async fn create_author(&self, name: String) -> Result<Author, DomainError>;

    /// Create a book owned by a department, linked to existing authors
    async fn create_book(&self, input: CreateBookInput) -> Result<Book, DomainError>;

    async fn find_book(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Add a physical copy; it starts AVAILABLE and untampered
    async fn add_copy(&self, book_id: i32, input: CreateCopyInput) -> Result<Copy, DomainError>;

    /// Copies of a book ordered by id
    async fn list_copies(&self, book_id: i32) -> Result<Vec<Copy>, DomainError>;
}
