use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{repo::User, AuthUser},
    error::ApiError,
    reviews::{
        dto::{CreateReviewRequest, CreateShopReviewRequest, ReviewWithOwner, UpdateReviewRequest},
        repo::Review,
        rules,
    },
    state::AppState,
};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/all-reviews", get(list_all_reviews))
}

pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reviews",
            get(list_own_reviews).post(create_review).patch(update_review),
        )
        .route("/shop-reviews", get(list_shop_reviews).post(create_shop_review))
}

/// Resolve the verified caller to a user row. A valid token whose user was
/// deleted afterwards resolves to 404, not 401.
async fn current_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "token references missing user");
            ApiError::not_found("User not found")
        })
}

/// GET /all-reviews — public aggregate listing of complete reviews.
#[instrument(skip(state))]
pub async fn list_all_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewWithOwner>>, ApiError> {
    let reviews = Review::list_all_complete(&state.db).await?;
    Ok(Json(reviews))
}

/// GET /reviews — everything the caller owns, incomplete legacy records
/// included.
#[instrument(skip(state))]
pub async fn list_own_reviews(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Review>>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let reviews = Review::list_owned(&state.db, user.id).await?;
    Ok(Json(reviews))
}

/// POST /reviews — create a generic review.
#[instrument(skip(state, payload))]
pub async fn create_review(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let new = rules::validate_generic(payload)?;
    let user = current_user(&state, user_id).await?;

    let review = Review::create_generic(&state.db, user.id, new).await?;
    info!(review_id = %review.id, user_id = %user.id, "review created");
    Ok((StatusCode::CREATED, Json(review)))
}

/// PATCH /reviews — partial update of an owned review.
#[instrument(skip(state, payload))]
pub async fn update_review(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::validation("Review ID is required"))?;

    let user = current_user(&state, user_id).await?;

    // Ownership folded into the lookup: a foreign id and an unknown id are
    // the same 404.
    if Review::find_owned(&state.db, id, user.id).await?.is_none() {
        return Err(ApiError::not_found("Review not found"));
    }

    let patch = rules::update_patch(payload);
    let review = Review::apply_patch(&state.db, id, patch).await?;
    info!(review_id = %review.id, user_id = %user.id, "review updated");
    Ok(Json(review))
}

/// GET /shop-reviews — the caller's complete reviews.
///
/// Two-step read: the completeness filter runs in SQL first; if that query
/// fails at the store level, retry once without the filter and apply the
/// predicate in-process. Only a failure of the second read surfaces an error.
#[instrument(skip(state))]
pub async fn list_shop_reviews(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ReviewWithOwner>>, ApiError> {
    let user = current_user(&state, user_id).await?;

    match Review::list_owned_complete(&state.db, user.id).await {
        Ok(reviews) => Ok(Json(reviews)),
        Err(e) => {
            warn!(error = %e, user_id = %user.id, "filtered shop listing failed, retrying unfiltered");
            let all = Review::list_owned_with_owner(&state.db, user.id).await?;
            let reviews = all
                .into_iter()
                .filter(|r| {
                    rules::is_complete(
                        r.review.product_type.as_deref(),
                        r.review.product_name.as_deref(),
                    )
                })
                .collect();
            Ok(Json(reviews))
        }
    }
}

/// POST /shop-reviews — create a shop review.
#[instrument(skip(state, payload))]
pub async fn create_shop_review(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateShopReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let new = rules::validate_shop(payload)?;
    let user = current_user(&state, user_id).await?;

    let review = Review::create_shop(&state.db, user.id, new).await?;
    info!(review_id = %review.id, user_id = %user.id, "shop review created");
    Ok((StatusCode::CREATED, Json(review)))
}
