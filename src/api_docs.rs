use crate::api;
use crate::domain::{
    Author, Book, Borrower, BorrowerKind, BorrowerRef, Copy, CopyStatus, CreateBookInput,
    CreateBorrowerInput, CreateCopyInput, Department, FineNotice, FineReason, Staff,
};
use crate::services::{
    HistoryRow, ImpactRow, IssueRequest, IssuedCopy, LoanReceipt, ReturnRequest, ReturnSummary,
    ReturnedCopy, StatusRow,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::catalog::create_department,
        api::catalog::get_department,
        api::catalog::create_staff,
        api::catalog::get_staff,
        api::catalog::create_borrower,
        api::catalog::create_author,
        api::catalog::create_book,
        api::catalog::get_book,
        api::catalog::list_copies,
        api::catalog::add_copy,
        api::loan::issue_copies,
        api::loan::return_copies,
        api::loan::borrower_loans,
        api::report::impact_report,
        api::report::book_status,
    ),
    components(
        schemas(
            api::catalog::NameRequest,
            Department,
            Staff,
            Borrower,
            Author,
            Book,
            Copy,
            CopyStatus,
            CreateBookInput,
            CreateBorrowerInput,
            CreateCopyInput,
            BorrowerKind,
            BorrowerRef,
            FineReason,
            FineNotice,
            IssueRequest,
            IssuedCopy,
            LoanReceipt,
            ReturnRequest,
            ReturnedCopy,
            ReturnSummary,
            HistoryRow,
            ImpactRow,
            StatusRow,
        )
    ),
    tags(
        (name = "campus-library", description = "Campus library lending API")
    )
)]
pub struct ApiDoc;
