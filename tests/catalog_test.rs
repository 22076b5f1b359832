use campus_library::db;
use campus_library::domain::{
    BorrowerKind, BorrowerRef, CatalogRepository, CopyStatus, CreateBookInput,
    CreateBorrowerInput, CreateCopyInput, DomainError, Missing,
};
use campus_library::infrastructure::SeaOrmCatalogRepository;
use campus_library::seed;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn copy_input(price: f64) -> CreateCopyInput {
    CreateCopyInput {
        purchase_date: NaiveDate::from_ymd_opt(2023, 8, 1).unwrap(),
        publication_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        price,
        edition: Some(2.0),
    }
}

#[tokio::test]
async fn test_book_with_authors_and_copies() {
    let db = setup_test_db().await;
    let catalog = SeaOrmCatalogRepository::new(db);

    let dept = catalog.create_department("Civil".to_string()).await.unwrap();
    let a1 = catalog.create_author("R. C. Hibbeler".to_string()).await.unwrap();
    let a2 = catalog.create_author("S. Timoshenko".to_string()).await.unwrap();

    let book = catalog
        .create_book(CreateBookInput {
            title: "Mechanics of Materials".to_string(),
            department_id: dept.id,
            author_ids: vec![a2.id, a1.id, a1.id],
        })
        .await
        .unwrap();
    assert_eq!(book.copy_count, 0);
    assert_eq!(book.authors, vec!["R. C. Hibbeler", "S. Timoshenko"]);

    let first = catalog.add_copy(book.id, copy_input(300.0)).await.unwrap();
    catalog.add_copy(book.id, copy_input(0.0)).await.unwrap();
    assert_eq!(first.status, CopyStatus::Available);
    assert!(!first.tampered);

    let fetched = catalog.find_book(book.id).await.unwrap().unwrap();
    assert_eq!(fetched.copy_count, 2);
    assert_eq!(catalog.list_copies(book.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_catalog_validation() {
    let db = setup_test_db().await;
    let catalog = SeaOrmCatalogRepository::new(db);
    let dept = catalog.create_department("Civil".to_string()).await.unwrap();

    let clerk = catalog.create_staff("Front Desk".to_string()).await.unwrap();
    let found = catalog.find_staff(clerk.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Front Desk");
    assert!(catalog.find_staff(clerk.id + 1).await.unwrap().is_none());

    let err = catalog.create_department("   ".to_string()).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = catalog
        .create_borrower(CreateBorrowerInput {
            kind: BorrowerKind::Student,
            name: "No Date".to_string(),
            department_id: dept.id,
            joined_on: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = catalog
        .create_borrower(CreateBorrowerInput {
            kind: BorrowerKind::Professor,
            name: "Nowhere".to_string(),
            department_id: 77,
            joined_on: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(Missing::Department)));

    let err = catalog
        .create_book(CreateBookInput {
            title: "Ghost Written".to_string(),
            department_id: dept.id,
            author_ids: vec![404],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = catalog.add_copy(404, copy_input(10.0)).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(Missing::Book)));

    let book = catalog
        .create_book(CreateBookInput {
            title: "Surveying".to_string(),
            department_id: dept.id,
            author_ids: vec![],
        })
        .await
        .unwrap();
    let err = catalog.add_copy(book.id, copy_input(-1.0)).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(
        catalog.find_book(book.id).await.unwrap().unwrap().copy_count,
        0
    );
}

#[tokio::test]
async fn test_borrowers_are_looked_up_by_kind() {
    let db = setup_test_db().await;
    let catalog = SeaOrmCatalogRepository::new(db);
    let dept = catalog.create_department("Civil".to_string()).await.unwrap();

    let student = catalog
        .create_borrower(CreateBorrowerInput {
            kind: BorrowerKind::Student,
            name: "Asha".to_string(),
            department_id: dept.id,
            joined_on: NaiveDate::from_ymd_opt(2022, 7, 15),
        })
        .await
        .unwrap();
    let professor = catalog
        .create_borrower(CreateBorrowerInput {
            kind: BorrowerKind::Professor,
            name: "Rao".to_string(),
            department_id: dept.id,
            joined_on: None,
        })
        .await
        .unwrap();

    // Both namespaces start at 1
    assert_eq!(student.id, 1);
    assert_eq!(professor.id, 1);

    let found = catalog
        .find_borrower(BorrowerRef::professor(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Rao");
    assert_eq!(found.reference(), professor.reference());
    assert!(
        catalog
            .find_borrower(BorrowerRef::student(2))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_demo_seed_runs_once() {
    let db = setup_test_db().await;

    seed::seed_demo_data(&db).await.unwrap();
    seed::seed_demo_data(&db).await.unwrap();

    let departments = campus_library::models::department::Entity::find()
        .count(&db)
        .await
        .unwrap();
    let copies = campus_library::models::copy::Entity::find()
        .count(&db)
        .await
        .unwrap();
    let staff = campus_library::models::staff::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(departments, 3);
    assert_eq!(copies, 14);
    assert_eq!(staff, 3);

    let catalog = SeaOrmCatalogRepository::new(db);
    let book = catalog.find_book(3).await.unwrap().unwrap();
    assert_eq!(book.copy_count, 3);
    assert_eq!(book.authors, vec!["A. Silberschatz", "P. B. Galvin"]);
}

#[tokio::test]
async fn test_demo_seed_skips_partially_loaded_catalog() {
    let db = setup_test_db().await;
    let catalog = SeaOrmCatalogRepository::new(db.clone());
    catalog.create_staff("Night Shift".to_string()).await.unwrap();

    seed::seed_demo_data(&db).await.unwrap();

    let staff = campus_library::models::staff::Entity::find()
        .count(&db)
        .await
        .unwrap();
    let departments = campus_library::models::department::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(staff, 1);
    assert_eq!(departments, 0);
}
