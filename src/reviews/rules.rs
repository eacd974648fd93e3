//! Validation, completeness and update-merge rules for reviews.
//!
//! Everything here is pure: the handlers call these before touching the
//! store, so a validation failure never leaves a partial record behind.

use crate::error::ApiError;
use crate::reviews::dto::{CreateReviewRequest, CreateShopReviewRequest, UpdateReviewRequest};

/// Fixed vocabulary for productQuality and serviceQuality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Quality {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Excellent" => Some(Self::Excellent),
            "Good" => Some(Self::Good),
            "Average" => Some(Self::Average),
            "Poor" => Some(Self::Poor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }
}

/// Normalized generic submission, ready for insertion.
#[derive(Debug, PartialEq)]
pub struct NewReview {
    pub product_name: String,
    pub description: String,
    pub bought_from: Option<String>,
    pub stars: Option<i32>,
    pub images: Option<Vec<String>>,
}

/// Normalized shop submission, ready for insertion.
#[derive(Debug, PartialEq)]
pub struct NewShopReview {
    pub customer_name: Option<String>,
    pub mobile_number: Option<String>,
    pub product_type: String,
    pub product_name: String,
    pub description: Option<String>,
    pub stars: i32,
    pub product_quality: Quality,
    pub service_quality: Quality,
    pub would_recommend: bool,
    pub image_url: Option<String>,
    pub bought_from_url: Option<String>,
}

/// Fields a PATCH may touch. `None` means "leave the stored value alone".
#[derive(Debug, Default, PartialEq)]
pub struct UpdatePatch {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub bought_from: Option<String>,
    pub stars: Option<i32>,
    pub images: Option<Vec<String>>,
}

fn required_trimmed(value: Option<&str>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ApiError::validation(message)),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Validate a generic submission.
///
/// Only productName and description are required. `stars` passes through
/// unchecked; the generic path performs no range validation.
pub fn validate_generic(req: CreateReviewRequest) -> Result<NewReview, ApiError> {
    let product_name = required_trimmed(req.product_name.as_deref(), "Product name is required")?;
    let description = required_trimmed(req.description.as_deref(), "Description is required")?;

    Ok(NewReview {
        product_name,
        description,
        bought_from: trimmed(req.bought_from),
        stars: req.stars,
        images: req.images,
    })
}

/// Validate a shop submission.
///
/// Required fields are checked in a fixed order and the first failure wins:
/// productType, productName, productQuality, serviceQuality, wouldRecommend.
/// `stars` defaults to 5 when absent or zero; the store never distinguishes
/// "no rating given" from an explicit zero.
pub fn validate_shop(req: CreateShopReviewRequest) -> Result<NewShopReview, ApiError> {
    let product_type = required_trimmed(req.product_type.as_deref(), "Product type is required")?;
    let product_name = required_trimmed(req.product_name.as_deref(), "Product name is required")?;

    let product_quality = required_trimmed(
        req.product_quality.as_deref(),
        "Product quality rating is required",
    )
    .and_then(|v| {
        Quality::parse(&v).ok_or_else(|| ApiError::validation("Product quality rating is invalid"))
    })?;
    let service_quality = required_trimmed(
        req.service_quality.as_deref(),
        "Service quality rating is required",
    )
    .and_then(|v| {
        Quality::parse(&v).ok_or_else(|| ApiError::validation("Service quality rating is invalid"))
    })?;

    let would_recommend = req
        .would_recommend
        .ok_or_else(|| ApiError::validation("Recommendation is required"))?;

    let stars = req.stars.filter(|s| *s != 0).unwrap_or(5);

    Ok(NewShopReview {
        customer_name: trimmed(req.customer_name),
        mobile_number: trimmed(req.mobile_number),
        product_type,
        product_name,
        description: trimmed(req.description),
        stars,
        product_quality,
        service_quality,
        would_recommend,
        image_url: req.image_url,
        bought_from_url: req.bought_from_url,
    })
}

/// The completeness predicate: a review surfaces in public and shop listings
/// only when productType and productName are both present. Legacy records
/// created before the shop fields existed have a null productType and are
/// visible only to their owner through the generic listing.
pub fn is_complete(product_type: Option<&str>, product_name: Option<&str>) -> bool {
    product_type.is_some() && product_name.is_some()
}

/// Build the patch for a partial update.
///
/// A string field is applied only when present and non-empty after trimming;
/// `stars` and `images` only when present with the right type (the
/// deserializer enforces that). Anything else stays untouched.
pub fn update_patch(req: UpdateReviewRequest) -> UpdatePatch {
    UpdatePatch {
        product_name: trimmed(req.product_name).filter(|v| !v.is_empty()),
        description: trimmed(req.description).filter(|v| !v.is_empty()),
        bought_from: trimmed(req.bought_from).filter(|v| !v.is_empty()),
        stars: req.stars,
        images: req.images,
    }
}

impl UpdatePatch {
    /// True when the patch touches nothing; the update still refreshes
    /// `updatedAt` but every stored field keeps its value.
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.description.is_none()
            && self.bought_from.is_none()
            && self.stars.is_none()
            && self.images.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic(product_name: Option<&str>, description: Option<&str>) -> CreateReviewRequest {
        CreateReviewRequest {
            product_name: product_name.map(String::from),
            description: description.map(String::from),
            ..Default::default()
        }
    }

    fn full_shop() -> CreateShopReviewRequest {
        CreateShopReviewRequest {
            product_name: Some("iPhone 15".into()),
            product_type: Some("Accessories".into()),
            product_quality: Some("Good".into()),
            service_quality: Some("Excellent".into()),
            would_recommend: Some(true),
            ..Default::default()
        }
    }

    fn message(err: ApiError) -> String {
        match err {
            ApiError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn generic_requires_product_name() {
        let err = validate_generic(generic(None, Some("great"))).unwrap_err();
        assert_eq!(message(err), "Product name is required");
    }

    #[test]
    fn generic_rejects_empty_product_name() {
        let err = validate_generic(generic(Some(""), Some("great"))).unwrap_err();
        assert_eq!(message(err), "Product name is required");
    }

    #[test]
    fn generic_rejects_whitespace_only_fields() {
        let err = validate_generic(generic(Some("   "), Some("great"))).unwrap_err();
        assert_eq!(message(err), "Product name is required");

        let err = validate_generic(generic(Some("Phone"), Some(" \t "))).unwrap_err();
        assert_eq!(message(err), "Description is required");
    }

    #[test]
    fn generic_trims_required_fields() {
        let review = validate_generic(generic(Some("  Phone  "), Some(" nice "))).unwrap();
        assert_eq!(review.product_name, "Phone");
        assert_eq!(review.description, "nice");
    }

    #[test]
    fn generic_passes_stars_through_without_range_check() {
        let mut req = generic(Some("Phone"), Some("nice"));
        req.stars = Some(42);
        let review = validate_generic(req).unwrap();
        assert_eq!(review.stars, Some(42));
    }

    #[test]
    fn generic_keeps_optional_fields() {
        let mut req = generic(Some("Phone"), Some("nice"));
        req.bought_from = Some(" web store ".into());
        req.images = Some(vec!["https://example.com/a.jpg".into()]);
        let review = validate_generic(req).unwrap();
        assert_eq!(review.bought_from.as_deref(), Some("web store"));
        assert_eq!(review.images.unwrap().len(), 1);
    }

    #[test]
    fn shop_field_check_order_product_type_first() {
        // Everything missing: productType must be the reported field.
        let err = validate_shop(CreateShopReviewRequest::default()).unwrap_err();
        assert_eq!(message(err), "Product type is required");
    }

    #[test]
    fn shop_reports_first_missing_field_in_order() {
        let mut req = full_shop();
        req.product_name = None;
        req.product_quality = None;
        let err = validate_shop(req).unwrap_err();
        assert_eq!(message(err), "Product name is required");

        let mut req = full_shop();
        req.product_quality = None;
        req.service_quality = None;
        let err = validate_shop(req).unwrap_err();
        assert_eq!(message(err), "Product quality rating is required");

        let mut req = full_shop();
        req.service_quality = Some("  ".into());
        let err = validate_shop(req).unwrap_err();
        assert_eq!(message(err), "Service quality rating is required");

        let mut req = full_shop();
        req.would_recommend = None;
        let err = validate_shop(req).unwrap_err();
        assert_eq!(message(err), "Recommendation is required");
    }

    #[test]
    fn shop_rejects_quality_outside_vocabulary() {
        let mut req = full_shop();
        req.product_quality = Some("Amazing".into());
        let err = validate_shop(req).unwrap_err();
        assert_eq!(message(err), "Product quality rating is invalid");
    }

    #[test]
    fn shop_stars_default_to_five_when_absent() {
        let review = validate_shop(full_shop()).unwrap();
        assert_eq!(review.stars, 5);
    }

    #[test]
    fn shop_stars_zero_treated_as_not_provided() {
        let mut req = full_shop();
        req.stars = Some(0);
        let review = validate_shop(req).unwrap();
        assert_eq!(review.stars, 5);
    }

    #[test]
    fn shop_keeps_explicit_stars() {
        let mut req = full_shop();
        req.stars = Some(3);
        let review = validate_shop(req).unwrap();
        assert_eq!(review.stars, 3);
    }

    #[test]
    fn shop_trims_string_fields() {
        let mut req = full_shop();
        req.product_type = Some("  Accessories ".into());
        req.customer_name = Some(" Jo ".into());
        let review = validate_shop(req).unwrap();
        assert_eq!(review.product_type, "Accessories");
        assert_eq!(review.customer_name.as_deref(), Some("Jo"));
        assert_eq!(review.product_quality, Quality::Good);
        assert_eq!(review.service_quality, Quality::Excellent);
        assert!(review.would_recommend);
    }

    #[test]
    fn quality_vocabulary_roundtrip() {
        for name in ["Excellent", "Good", "Average", "Poor"] {
            assert_eq!(Quality::parse(name).unwrap().as_str(), name);
        }
        assert!(Quality::parse("excellent").is_none());
        assert!(Quality::parse("").is_none());
    }

    #[test]
    fn completeness_requires_both_fields() {
        assert!(is_complete(Some("Accessories"), Some("Phone")));
        assert!(!is_complete(None, Some("Phone")));
        assert!(!is_complete(Some("Accessories"), None));
        assert!(!is_complete(None, None));
    }

    #[test]
    fn update_patch_skips_absent_fields() {
        let patch = update_patch(UpdateReviewRequest::default());
        assert!(patch.is_empty());
    }

    #[test]
    fn update_patch_skips_empty_strings() {
        let req = UpdateReviewRequest {
            product_name: Some("".into()),
            description: Some("   ".into()),
            bought_from: Some("shop".into()),
            ..Default::default()
        };
        let patch = update_patch(req);
        assert!(patch.product_name.is_none());
        assert!(patch.description.is_none());
        assert_eq!(patch.bought_from.as_deref(), Some("shop"));
    }

    #[test]
    fn update_patch_trims_applied_strings() {
        let req = UpdateReviewRequest {
            product_name: Some("  Phone 2 ".into()),
            ..Default::default()
        };
        let patch = update_patch(req);
        assert_eq!(patch.product_name.as_deref(), Some("Phone 2"));
    }

    #[test]
    fn update_patch_carries_stars_and_images() {
        let req = UpdateReviewRequest {
            stars: Some(2),
            images: Some(vec!["https://example.com/a.jpg".into()]),
            ..Default::default()
        };
        let patch = update_patch(req);
        assert_eq!(patch.stars, Some(2));
        assert_eq!(patch.images.as_ref().map(Vec::len), Some(1));
        assert!(!patch.is_empty());
    }
}
