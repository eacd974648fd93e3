use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::reviews::dto::{OwnerInfo, ReviewWithOwner};
use crate::reviews::rules::{NewReview, NewShopReview, UpdatePatch};

/// One physical record for both review kinds. Generic submissions leave the
/// shop-only columns null; the completeness predicate (productType and
/// productName both set) separates the two in listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    pub description: Option<String>,
    pub bought_from: Option<String>,
    pub customer_name: Option<String>,
    pub mobile_number: Option<String>,
    pub product_quality: Option<String>,
    pub service_quality: Option<String>,
    pub would_recommend: Option<bool>,
    pub stars: Option<i32>,
    pub images: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub bought_from_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const REVIEW_COLS: &str = "id, user_id, product_name, product_type, description, bought_from, \
     customer_name, mobile_number, product_quality, service_quality, would_recommend, \
     stars, images, image_url, bought_from_url, created_at, updated_at";

const REVIEW_COLS_R: &str = "r.id, r.user_id, r.product_name, r.product_type, r.description, \
     r.bought_from, r.customer_name, r.mobile_number, r.product_quality, r.service_quality, \
     r.would_recommend, r.stars, r.images, r.image_url, r.bought_from_url, r.created_at, \
     r.updated_at";

#[derive(Debug, FromRow)]
struct ReviewOwnerRow {
    #[sqlx(flatten)]
    review: Review,
    owner_id: Uuid,
    owner_name: Option<String>,
    owner_email: String,
}

impl From<ReviewOwnerRow> for ReviewWithOwner {
    fn from(row: ReviewOwnerRow) -> Self {
        ReviewWithOwner {
            review: row.review,
            user: OwnerInfo {
                id: row.owner_id,
                name: row.owner_name,
                email: row.owner_email,
            },
        }
    }
}

impl Review {
    pub async fn create_generic(
        db: &PgPool,
        user_id: Uuid,
        new: NewReview,
    ) -> anyhow::Result<Review> {
        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (user_id, product_name, description, bought_from, stars, images)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REVIEW_COLS}
            "#,
        ))
        .bind(user_id)
        .bind(new.product_name)
        .bind(new.description)
        .bind(new.bought_from)
        .bind(new.stars)
        .bind(new.images)
        .fetch_one(db)
        .await?;
        Ok(review)
    }

    pub async fn create_shop(
        db: &PgPool,
        user_id: Uuid,
        new: NewShopReview,
    ) -> anyhow::Result<Review> {
        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (user_id, customer_name, mobile_number, product_type,
                                 product_name, description, stars, product_quality,
                                 service_quality, would_recommend, image_url, bought_from_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {REVIEW_COLS}
            "#,
        ))
        .bind(user_id)
        .bind(new.customer_name)
        .bind(new.mobile_number)
        .bind(new.product_type)
        .bind(new.product_name)
        .bind(new.description)
        .bind(new.stars)
        .bind(new.product_quality.as_str())
        .bind(new.service_quality.as_str())
        .bind(new.would_recommend)
        .bind(new.image_url)
        .bind(new.bought_from_url)
        .fetch_one(db)
        .await?;
        Ok(review)
    }

    /// Public listing: complete reviews across all owners, newest first,
    /// each joined with a minimal projection of its owner.
    pub async fn list_all_complete(db: &PgPool) -> anyhow::Result<Vec<ReviewWithOwner>> {
        let rows = sqlx::query_as::<_, ReviewOwnerRow>(&format!(
            r#"
            SELECT {REVIEW_COLS_R}, u.id AS owner_id, u.name AS owner_name, u.email AS owner_email
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.product_type IS NOT NULL AND r.product_name IS NOT NULL
            ORDER BY r.created_at DESC
            "#,
        ))
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Owner self-service listing: everything the caller owns, complete or
    /// not, newest first.
    pub async fn list_owned(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLS}
            FROM reviews
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Owner shop listing with the completeness filter applied in SQL.
    pub async fn list_owned_complete(
        db: &PgPool,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<ReviewWithOwner>> {
        let rows = sqlx::query_as::<_, ReviewOwnerRow>(&format!(
            r#"
            SELECT {REVIEW_COLS_R}, u.id AS owner_id, u.name AS owner_name, u.email AS owner_email
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.user_id = $1 AND r.product_type IS NOT NULL AND r.product_name IS NOT NULL
            ORDER BY r.created_at DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Unfiltered owner listing with owner projection. Used by the shop
    /// listing fallback, which applies the completeness predicate in-process.
    pub async fn list_owned_with_owner(
        db: &PgPool,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<ReviewWithOwner>> {
        let rows = sqlx::query_as::<_, ReviewOwnerRow>(&format!(
            r#"
            SELECT {REVIEW_COLS_R}, u.id AS owner_id, u.name AS owner_name, u.email AS owner_email
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Fetch a review only if the caller owns it. Ownership is folded into
    /// the lookup so "not yours" and "does not exist" are indistinguishable.
    pub async fn find_owned(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLS}
            FROM reviews
            WHERE id = $1 AND user_id = $2
            "#,
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(review)
    }

    /// Apply a partial update in a single statement. Null bind values fall
    /// through COALESCE and keep the stored column; updatedAt always moves.
    pub async fn apply_patch(db: &PgPool, id: Uuid, patch: UpdatePatch) -> anyhow::Result<Review> {
        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            UPDATE reviews
            SET product_name = COALESCE($2, product_name),
                description  = COALESCE($3, description),
                bought_from  = COALESCE($4, bought_from),
                stars        = COALESCE($5, stars),
                images       = COALESCE($6, images),
                updated_at   = now()
            WHERE id = $1
            RETURNING {REVIEW_COLS}
            "#,
        ))
        .bind(id)
        .bind(patch.product_name)
        .bind(patch.description)
        .bind(patch.bought_from)
        .bind(patch.stars)
        .bind(patch.images)
        .fetch_one(db)
        .await?;
        Ok(review)
    }
}
