use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};

use crate::domain::{CopyStatus, DomainError};
use crate::models::{author, book, book_authors, copy, department, professor, staff, student};

const DEPARTMENTS: [&str; 3] = ["Mechanical", "Computer", "Electrical"];

const STAFF: [&str; 3] = ["Staff-1", "Staff-2", "Staff-3"];

// (department index, title, author indexes, copies)
const BOOKS: [(usize, &str, &[usize], u32); 6] = [
    (0, "Engineering Thermodynamics", &[0], 3),
    (0, "Fluid Mechanics", &[1], 2),
    (1, "Operating System Concepts", &[2, 3], 3),
    (1, "Compilers: Principles and Techniques", &[4], 2),
    (2, "Circuit Theory", &[5], 2),
    (2, "Power Systems Analysis", &[5], 2),
];

const AUTHORS: [&str; 6] = [
    "P. K. Nag",
    "F. M. White",
    "A. Silberschatz",
    "P. B. Galvin",
    "A. V. Aho",
    "C. L. Wadhwa",
];

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| DomainError::Validation(format!("invalid seed date {}-{}-{}", y, m, d)))
}

/// Loads a small fixed catalog in a single transaction. Does nothing if any
/// department or staff member already exists.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    let departments = department::Entity::find().count(db).await?;
    let staff_members = staff::Entity::find().count(db).await?;
    if departments > 0 || staff_members > 0 {
        tracing::info!("Catalog already populated, skipping demo seed");
        return Ok(());
    }

    let now = chrono::Utc::now().to_rfc3339();
    let txn = db.begin().await?;

    // 1. Staff
    for name in STAFF {
        staff::ActiveModel {
            name: Set(name.to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    // 2. Departments, each with three students and one professor
    let mut department_ids = Vec::with_capacity(DEPARTMENTS.len());
    for (index, name) in DEPARTMENTS.iter().enumerate() {
        let dept = department::ActiveModel {
            name: Set((*name).to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for n in 1..=3u32 {
            student::ActiveModel {
                name: Set(format!("{} Student {}", dept.name, n)),
                joined_on: Set(date(2019 + index as i32, 7, n)?),
                department_id: Set(dept.id),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        professor::ActiveModel {
            name: Set(format!("{} Professor", dept.name)),
            department_id: Set(dept.id),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        department_ids.push(dept.id);
    }

    // 3. Authors
    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for name in AUTHORS {
        let saved = author::ActiveModel {
            name: Set(name.to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        author_ids.push(saved.id);
    }

    // 4. Books with their authors and copies
    for (dept_index, title, authors, copies) in BOOKS {
        let saved = book::ActiveModel {
            title: Set(title.to_owned()),
            department_id: Set(department_ids[dept_index]),
            copy_count: Set(copies as i32),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for &author_index in authors {
            book_authors::ActiveModel {
                book_id: Set(saved.id),
                author_id: Set(author_ids[author_index]),
            }
            .insert(&txn)
            .await?;
        }

        for edition in 1..=copies {
            copy::ActiveModel {
                book_id: Set(saved.id),
                purchase_date: Set(date(2020, 1, edition)?),
                publication_date: Set(date(2015 + edition as i32, 6, 1)?),
                price: Set(450.0 + f64::from(edition) * 25.0),
                edition: Set(Some(f64::from(edition))),
                status: Set(CopyStatus::Available),
                tampered: Set(false),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    tracing::info!(
        departments = DEPARTMENTS.len(),
        books = BOOKS.len(),
        "Demo catalog seeded"
    );
    Ok(())
}
