use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reviews::repo::Review;

/// Body for POST /reviews. Only productName and description are required;
/// the validation rules decide that, not the deserializer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub bought_from: Option<String>,
    pub stars: Option<i32>,
    pub images: Option<Vec<String>>,
}

/// Body for POST /shop-reviews.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShopReviewRequest {
    pub customer_name: Option<String>,
    pub mobile_number: Option<String>,
    pub product_type: Option<String>,
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub stars: Option<i32>,
    pub product_quality: Option<String>,
    pub service_quality: Option<String>,
    pub would_recommend: Option<bool>,
    pub image_url: Option<String>,
    pub bought_from_url: Option<String>,
}

/// Body for PATCH /reviews. Every field is optional; absent fields are left
/// untouched by the update policy.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub id: Option<Uuid>,
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub bought_from: Option<String>,
    pub stars: Option<i32>,
    pub images: Option<Vec<String>>,
}

/// Minimal projection of the owning user attached to listed reviews.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerInfo {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

/// A review joined with its owner, as returned by the listing endpoints.
#[derive(Debug, Serialize)]
pub struct ReviewWithOwner {
    #[serde(flatten)]
    pub review: Review,
    pub user: OwnerInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_uses_camel_case_wire_names() {
        let req: CreateReviewRequest = serde_json::from_str(
            r#"{"productName":"iPhone 15","description":"great","boughtFrom":"store","stars":4}"#,
        )
        .unwrap();
        assert_eq!(req.product_name.as_deref(), Some("iPhone 15"));
        assert_eq!(req.bought_from.as_deref(), Some("store"));
        assert_eq!(req.stars, Some(4));
    }

    #[test]
    fn update_request_tolerates_missing_fields() {
        let req: UpdateReviewRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(req.id.is_none());
        assert!(req.product_name.is_none());
        assert!(req.images.is_none());
    }

    #[test]
    fn shop_request_parses_full_payload() {
        let req: CreateShopReviewRequest = serde_json::from_str(
            r#"{
                "productName": "iPhone 15",
                "productType": "Accessories",
                "productQuality": "Good",
                "serviceQuality": "Excellent",
                "wouldRecommend": true,
                "mobileNumber": "555-0100",
                "imageUrl": "https://example.com/p.jpg"
            }"#,
        )
        .unwrap();
        assert_eq!(req.product_type.as_deref(), Some("Accessories"));
        assert_eq!(req.would_recommend, Some(true));
        assert!(req.stars.is_none());
    }
}
