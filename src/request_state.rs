use aide::OperationInput;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use crate::{
    database::{AppState, DatabaseConnection},
    error::{ServiceError, ServiceResult},
    models::Session,
};

/// Per request state: a database connection and the session belonging to
/// the bearer token of the request, if any.
pub struct RequestState {
    pub db: DatabaseConnection,
    pub session: Option<Session>,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestState
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let connection = state
            .pool
            .acquire()
            .await
            .map_err(|err| ServiceError::InternalServerError(err.to_string()))?;
        let mut db = DatabaseConnection { connection };

        let session = if let Ok(TypedHeader(Authorization(bearer))) =
            parts.extract::<TypedHeader<Authorization<Bearer>>>().await
        {
            db.get_session_by_session_token(bearer.token()).await?
        } else {
            None
        };

        Ok(Self { db, session })
    }
}

impl RequestState {
    pub fn session_require(&self) -> ServiceResult<Session> {
        self.session
            .clone()
            .ok_or(ServiceError::Unauthorized("Missing login"))
    }
}

impl OperationInput for RequestState {}
