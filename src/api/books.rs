//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookCandidate},
    AppState,
};

/// Message returned when the id path segment is not a number
pub const NUMERIC_ID_MESSAGE: &str = "Must include numeric id in path";

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All books in insertion order", body = Vec<Book>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Insufficient rights")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_books().await?;
    Ok(Json(books))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookCandidate,
    responses(
        (status = 201, description = "Book created"),
        (status = 400, description = "Missing required fields or invalid input"),
        (status = 409, description = "Book id already taken")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<StatusCode> {
    state.services.books.create_book(BookCandidate::from(body)).await?;
    Ok(StatusCode::CREATED)
}

/// Get a book by ID.
///
/// The segment is read as a number the way a JavaScript `Number()` would
/// (`1.0`, `1e3`, `0x10`, `Infinity`). An id that matches nothing, including
/// numbers no integer id can equal, answers 200 with an empty body.
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details, or an empty body when no book matches", body = Book),
        (status = 400, description = "Id is not numeric")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let book = match parse_book_id(&id)? {
        Some(id) => state.services.books.get_book(id).await?,
        None => None,
    };

    let response = match book {
        Some(book) => Json(book).into_response(),
        None => StatusCode::OK.into_response(),
    };
    Ok(response)
}

/// Numeric value of a path segment as an integer id.
///
/// `Ok(None)` is a valid number that no integer id can equal (`1.5`, `Infinity`).
fn parse_book_id(segment: &str) -> AppResult<Option<i64>> {
    let value = parse_number(segment);
    if value.is_nan() {
        return Err(AppError::BadRequest(NUMERIC_ID_MESSAGE.to_string()));
    }

    let integral = value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value < i64::MAX as f64;
    Ok(integral.then(|| value as i64))
}

/// String to number conversion with JavaScript semantics; NaN when not a number
fn parse_number(segment: &str) -> f64 {
    let text = segment.trim();
    if text.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let lowered = text.get(..2).map(str::to_ascii_lowercase);
        if lowered.as_deref() == Some(prefix) {
            return parse_radix(&text[2..], radix);
        }
    }

    match text.strip_prefix(['+', '-']).unwrap_or(text) {
        "Infinity" if text.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        // f64::from_str also takes "inf" and "NaN", which are not numbers here
        unsigned if unsigned.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) => {
            text.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| c.to_digit(radix).map(|d| acc * radix as f64 + d as f64))
        .unwrap_or(f64::NAN)
}
