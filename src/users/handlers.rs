use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, instrument, warn};

use crate::{
    state::AppState,
    users::{
        dto::{FindUsersQuery, LoginRequest, PublicUser, RegisterRequest, UpdateUserRequest},
        error::AuthError,
        password::hash_password,
        repo_types::UserUpdate,
        services::CredentialService,
    },
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth", get(find_users))
        .route(
            "/auth/:id",
            get(find_user).patch(update_user).delete(remove_user),
        )
}

fn auth_error(e: AuthError) -> (StatusCode, String) {
    if let AuthError::Store(ref err) = e {
        error!(error = %err, "user store failure");
    }
    (e.status(), e.to_string())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), (StatusCode, String)> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    let service = CredentialService::new(state.users.clone());
    let user = service
        .register(&payload.email, &payload.password)
        .await
        .map_err(auth_error)?;

    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    let service = CredentialService::new(state.users.clone());
    let user = service
        .authenticate(&payload.email, &payload.password)
        .await
        .map_err(auth_error)?;

    Ok(Json(PublicUser::from(user)))
}

#[instrument(skip(state))]
pub async fn find_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state.users.find_one(id).await.map_err(|e| {
        error!(error = %e, "user store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    match user {
        Some(user) => Ok(Json(PublicUser::from(user))),
        None => {
            warn!(user_id = id, "user not found");
            Err((StatusCode::NOT_FOUND, "user not found".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn find_users(
    State(state): State<AppState>,
    Query(query): Query<FindUsersQuery>,
) -> Result<Json<Vec<PublicUser>>, (StatusCode, String)> {
    let users = state.users.find(&query.email).await.map_err(|e| {
        error!(error = %e, "user store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    if let Some(ref email) = payload.email {
        if !is_valid_email(email) {
            warn!(email = %email, "invalid email");
            return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
        }
    }

    // A new plaintext password is hashed here so the store only ever
    // sees composite credentials.
    let password = match payload.password {
        Some(plain) => Some(hash_password(&plain).map_err(|e| {
            error!(error = %e, "hash_password failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?),
        None => None,
    };

    let changes = UserUpdate {
        email: payload.email,
        password,
    };

    let user = state.users.update(id, changes).await.map_err(|e| {
        error!(error = %e, "user store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    match user {
        Some(user) => Ok(Json(PublicUser::from(user))),
        None => {
            warn!(user_id = id, "user not found");
            Err((StatusCode::NOT_FOUND, "user not found".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn remove_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state.users.remove(id).await.map_err(|e| {
        error!(error = %e, "user store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    match user {
        Some(user) => Ok(Json(PublicUser::from(user))),
        None => {
            warn!(user_id = id, "user not found");
            Err((StatusCode::NOT_FOUND, "user not found".into()))
        }
    }
}
