//! Request extractors whose rejections use the `{"detail": ...}` error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// [`axum::extract::Path`], rejecting with [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// [`axum::Json`] request body, rejecting with [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
