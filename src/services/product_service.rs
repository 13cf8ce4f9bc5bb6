use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const ADDED_MESSAGE: &str = "product added successfully";
pub const DUPLICATE_CODE_MESSAGE: &str = "a product with that code already exists";

/// A registered product. Immutable once added; there is no update or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Business identifier, unique across the registry, case-sensitive
    pub code: String,
    pub name: String,
    pub price: Decimal,
}

/// Outcome of an add attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(Product),
    DuplicateCode,
}

impl AddOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            AddOutcome::Added(_) => ADDED_MESSAGE,
            AddOutcome::DuplicateCode => DUPLICATE_CODE_MESSAGE,
        }
    }
}

/// In-memory product registry.
///
/// Owns the authoritative product collection for the lifetime of the process
/// and enforces code uniqueness. One instance is shared by all request
/// handlers; the RwLock makes the check-then-append in `add` atomic with
/// respect to concurrent adds, while `list_all` takes a read lock and can
/// run alongside other readers.
#[derive(Debug, Default)]
pub struct ProductRegistry {
    products: RwLock<Vec<Product>>,
}

impl ProductRegistry {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
        }
    }

    /// Add a product unless its code is already registered.
    ///
    /// The code comparison is an exact, case-sensitive match. On conflict
    /// the collection is left untouched. The registry does not validate
    /// name or price; an empty code is just another string value here.
    pub async fn add(&self, product: Product) -> AddOutcome {
        let mut products = self.products.write().await;

        if products.iter().any(|p| p.code == product.code) {
            return AddOutcome::DuplicateCode;
        }

        products.push(product.clone());
        AddOutcome::Added(product)
    }

    /// Snapshot of all products in insertion order.
    ///
    /// Always a (possibly empty) owned vec; mutating it cannot touch the
    /// registry's internal state.
    pub async fn list_all(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }
}
