//! Extractors whose rejections render as the response envelope.
//!
//! `Json`, `Query` and `Path` wrap the axum extractors of the same name and
//! turn their rejections into [`ApiError`]. `Garde` additionally runs garde
//! validation on the extracted payload.

use std::ops::{Deref, DerefMut};

use axum::extract::{FromRequest, FromRequestParts, Request};
use garde::Validate;
use http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

#[derive(Debug, Clone, Copy, Default)]
pub struct Garde<E>(pub E);

impl<E> Deref for Garde<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E> DerefMut for Garde<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<E> Garde<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<T> FromRequest<AppState> for Garde<Json<T>>
where
    T: Validate<Context = ()>,
    Json<T>: FromRequest<AppState, Rejection = ApiError>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let inner = <Json<T> as FromRequest<AppState>>::from_request(req, state).await?;
        inner.0.validate()?;
        Ok(Garde(inner))
    }
}

impl<T> FromRequestParts<AppState> for Garde<Query<T>>
where
    T: Validate<Context = ()>,
    Query<T>: FromRequestParts<AppState, Rejection = ApiError>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let inner = <Query<T> as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;
        inner.0.validate()?;
        Ok(Garde(inner))
    }
}
