use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::product_service::{
    AddOutcome, Product, ProductRegistry, DUPLICATE_CODE_MESSAGE,
};

/// Incoming product payload. All fields optional so that missing values
/// surface as field errors rather than a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct ProductDraft {
    pub code: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl ProductDraft {
    /// Boundary validation: required code and name, price > 0.
    ///
    /// Returns the fully-formed product, or the complete set of field-error
    /// pairs. The registry itself never sees an invalid draft, but does not
    /// rely on this having run for its own uniqueness invariant.
    pub fn validate(self) -> Result<Product, HashMap<String, String>> {
        let mut field_errors = HashMap::new();

        match &self.code {
            Some(code) if !code.is_empty() => {}
            _ => {
                field_errors.insert("code".to_string(), "code is required".to_string());
            }
        }
        match &self.name {
            Some(name) if !name.is_empty() => {}
            _ => {
                field_errors.insert("name".to_string(), "name is required".to_string());
            }
        }
        match self.price {
            Some(price) if price > Decimal::ZERO => {}
            Some(_) => {
                field_errors.insert(
                    "price".to_string(),
                    "price must be greater than 0".to_string(),
                );
            }
            None => {
                field_errors.insert("price".to_string(), "price is required".to_string());
            }
        }

        if !field_errors.is_empty() {
            return Err(field_errors);
        }

        // The checks above guarantee these are present
        Ok(Product {
            code: self.code.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
        })
    }
}

/// POST /api/products - Register a new product
///
/// Body: `{ "code": "PROD001", "name": "Laptop", "price": 1200.50 }`
///
/// Responses:
/// - 201 with the created product as the body
/// - 400 with `field_errors` when code/name are missing or price is not > 0
/// - 409 with `{"message": "a product with that code already exists"}`
pub async fn products_post(
    Extension(registry): Extension<Arc<ProductRegistry>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(draft): Json<ProductDraft>,
) -> ApiResult<Product> {
    let product = draft
        .validate()
        .map_err(|field_errors| ApiError::validation_error("invalid product payload", field_errors))?;

    match registry.add(product).await {
        AddOutcome::Added(created) => {
            tracing::info!(code = %created.code, user = %auth_user.username, "product added");
            Ok(ApiResponse::created(created))
        }
        AddOutcome::DuplicateCode => Err(ApiError::conflict(DUPLICATE_CODE_MESSAGE)),
    }
}

/// GET /api/products - List all registered products
///
/// Returns a JSON array in insertion order; an empty array when no products
/// have been registered.
pub async fn products_get(
    Extension(registry): Extension<Arc<ProductRegistry>>,
) -> ApiResult<Vec<Product>> {
    Ok(ApiResponse::success(registry.list_all().await))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(code: Option<&str>, name: Option<&str>, price: Option<i64>) -> ProductDraft {
        ProductDraft {
            code: code.map(str::to_string),
            name: name.map(str::to_string),
            price: price.map(Decimal::from),
        }
    }

    #[test]
    fn valid_draft_passes() {
        let product = draft(Some("PROD001"), Some("Laptop"), Some(1200))
            .validate()
            .unwrap();
        assert_eq!(product.code, "PROD001");
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.price, Decimal::from(1200));
    }

    #[test]
    fn empty_code_is_rejected() {
        let errors = draft(Some(""), Some("Laptop"), Some(1200)).validate().unwrap_err();
        assert!(errors.contains_key("code"));
        assert!(!errors.contains_key("name"));
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = ProductDraft::default().validate().unwrap_err();
        assert!(errors.contains_key("code"));
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("price"));
    }

    #[test]
    fn zero_and_negative_prices_are_rejected() {
        let errors = draft(Some("PROD001"), Some("Laptop"), Some(0)).validate().unwrap_err();
        assert_eq!(errors["price"], "price must be greater than 0");

        let errors = draft(Some("PROD001"), Some("Laptop"), Some(-5)).validate().unwrap_err();
        assert!(errors.contains_key("price"));
    }

    #[test]
    fn fractional_price_just_above_zero_passes() {
        let product = ProductDraft {
            code: Some("PROD001".to_string()),
            name: Some("Laptop".to_string()),
            price: Some(Decimal::new(1, 2)), // 0.01
        }
        .validate()
        .unwrap();
        assert_eq!(product.price, Decimal::new(1, 2));
    }
}
