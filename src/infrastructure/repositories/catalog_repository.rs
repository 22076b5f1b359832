//! SeaORM implementation of CatalogRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{
    Author, Book, Borrower, BorrowerKind, BorrowerRef, CatalogRepository, Copy, CopyStatus,
    CreateBookInput, CreateBorrowerInput, CreateCopyInput, Department, DomainError, Missing,
    Staff,
};
use crate::models::{author, book, book_authors, copy, department, professor, staff, student};

/// SeaORM-based implementation of CatalogRepository
pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn require_department(&self, id: i32) -> Result<(), DomainError> {
        let exists = department::Entity::find_by_id(id).count(&self.db).await? > 0;
        if !exists {
            return Err(DomainError::NotFound(Missing::Department));
        }
        Ok(())
    }
}

fn to_copy(model: copy::Model) -> Copy {
    Copy {
        id: model.id,
        book_id: model.book_id,
        purchase_date: model.purchase_date,
        publication_date: model.publication_date,
        price: model.price,
        edition: model.edition,
        status: model.status,
        tampered: model.tampered,
    }
}

fn non_blank(field: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn create_department(&self, name: String) -> Result<Department, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let saved = department::ActiveModel {
            name: Set(non_blank("name", name)?),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(Department {
            id: saved.id,
            name: saved.name,
        })
    }

    async fn find_department(&self, id: i32) -> Result<Option<Department>, DomainError> {
        let found = department::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(|d| Department {
            id: d.id,
            name: d.name,
        }))
    }

    async fn create_staff(&self, name: String) -> Result<Staff, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let saved = staff::ActiveModel {
            name: Set(non_blank("name", name)?),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(Staff {
            id: saved.id,
            name: saved.name,
        })
    }

    async fn find_staff(&self, id: i32) -> Result<Option<Staff>, DomainError> {
        let found = staff::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(|s| Staff {
            id: s.id,
            name: s.name,
        }))
    }

    async fn create_borrower(&self, input: CreateBorrowerInput) -> Result<Borrower, DomainError> {
        let name = non_blank("name", input.name)?;
        self.require_department(input.department_id).await?;
        let now = chrono::Utc::now().to_rfc3339();

        match input.kind {
            BorrowerKind::Student => {
                let joined_on = input.joined_on.ok_or_else(|| {
                    DomainError::Validation("students require a joined_on date".to_string())
                })?;
                let saved = student::ActiveModel {
                    name: Set(name),
                    joined_on: Set(joined_on),
                    department_id: Set(input.department_id),
                    created_at: Set(now.clone()),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;

                Ok(Borrower {
                    kind: BorrowerKind::Student,
                    id: saved.id,
                    name: saved.name,
                    department_id: saved.department_id,
                    joined_on: Some(saved.joined_on),
                })
            }
            BorrowerKind::Professor => {
                let saved = professor::ActiveModel {
                    name: Set(name),
                    department_id: Set(input.department_id),
                    created_at: Set(now.clone()),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;

                Ok(Borrower {
                    kind: BorrowerKind::Professor,
                    id: saved.id,
                    name: saved.name,
                    department_id: saved.department_id,
                    joined_on: None,
                })
            }
        }
    }

    async fn find_borrower(&self, borrower: BorrowerRef) -> Result<Option<Borrower>, DomainError> {
        let found = match borrower.kind {
            BorrowerKind::Student => student::Entity::find_by_id(borrower.id)
                .one(&self.db)
                .await?
                .map(|s| Borrower {
                    kind: BorrowerKind::Student,
                    id: s.id,
                    name: s.name,
                    department_id: s.department_id,
                    joined_on: Some(s.joined_on),
                }),
            BorrowerKind::Professor => professor::Entity::find_by_id(borrower.id)
                .one(&self.db)
                .await?
                .map(|p| Borrower {
                    kind: BorrowerKind::Professor,
                    id: p.id,
                    name: p.name,
                    department_id: p.department_id,
                    joined_on: None,
                }),
        };
        Ok(found)
    }

    async fn create_author(&self, name: String) -> Result<Author, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let saved = author::ActiveModel {
            name: Set(non_blank("name", name)?),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(Author {
            id: saved.id,
            name: saved.name,
        })
    }

    async fn create_book(&self, input: CreateBookInput) -> Result<Book, DomainError> {
        let title = non_blank("title", input.title)?;
        self.require_department(input.department_id).await?;

        let mut author_ids = input.author_ids;
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors = if author_ids.is_empty() {
            Vec::new()
        } else {
            author::Entity::find()
                .filter(author::Column::Id.is_in(author_ids.clone()))
                .order_by_asc(author::Column::Id)
                .all(&self.db)
                .await?
        };
        if authors.len() != author_ids.len() {
            return Err(DomainError::Validation(
                "one or more authors do not exist".to_string(),
            ));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let saved = book::ActiveModel {
            title: Set(title),
            department_id: Set(input.department_id),
            copy_count: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for author_id in &author_ids {
            book_authors::ActiveModel {
                book_id: Set(saved.id),
                author_id: Set(*author_id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(Book {
            id: saved.id,
            title: saved.title,
            department_id: saved.department_id,
            copy_count: saved.copy_count,
            authors: authors.into_iter().map(|a| a.name).collect(),
        })
    }

    async fn find_book(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let Some(found) = book::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let authors = found
            .find_related(author::Entity)
            .order_by_asc(author::Column::Id)
            .all(&self.db)
            .await?;

        Ok(Some(Book {
            id: found.id,
            title: found.title,
            department_id: found.department_id,
            copy_count: found.copy_count,
            authors: authors.into_iter().map(|a| a.name).collect(),
        }))
    }

    async fn add_copy(&self, book_id: i32, input: CreateCopyInput) -> Result<Copy, DomainError> {
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(DomainError::Validation(
                "price must be a non-negative amount".to_string(),
            ));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let bumped = book::Entity::update_many()
            .col_expr(
                book::Column::CopyCount,
                Expr::col(book::Column::CopyCount).add(1),
            )
            .col_expr(book::Column::UpdatedAt, Expr::value(now.clone()))
            .filter(book::Column::Id.eq(book_id))
            .exec(&txn)
            .await?;
        if bumped.rows_affected == 0 {
            return Err(DomainError::NotFound(Missing::Book));
        }

        let saved = copy::ActiveModel {
            book_id: Set(book_id),
            purchase_date: Set(input.purchase_date),
            publication_date: Set(input.publication_date),
            price: Set(input.price),
            edition: Set(input.edition),
            status: Set(CopyStatus::Available),
            tampered: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(to_copy(saved))
    }

    async fn list_copies(&self, book_id: i32) -> Result<Vec<Copy>, DomainError> {
        let copies = copy::Entity::find()
            .filter(copy::Column::BookId.eq(book_id))
            .order_by_asc(copy::Column::Id)
            .all(&self.db)
            .await?;

        Ok(copies.into_iter().map(to_copy).collect())
    }
}
