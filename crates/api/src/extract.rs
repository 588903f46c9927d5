//! Request extractors with the service's error format.
//!
//! Each wrapper delegates to the axum extractor of the same name and renders
//! its rejection as `400 VALIDATION_ERROR` through [`AppError`] instead of
//! axum's plain-text responses.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Drop-in replacement for [`axum::extract::Path`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Drop-in replacement for [`axum::extract::Query`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
