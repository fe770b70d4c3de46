//! `parlo-db`: sqlx/PostgreSQL persistence layer.
//!
//! `models` holds the row structs and insert DTOs; `repositories` holds
//! zero-sized structs whose async methods take `&PgPool` as the first
//! argument and return `Result<_, sqlx::Error>`.

pub mod models;
pub mod repositories;
