use crate::utils::error::{CartError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub type ProductFields = serde_json::Map<String, serde_json::Value>;

/// Product record as served by `GET /products/{id}`.
///
/// Only `id` and `amount` are interpreted; title, price, image and any
/// other attribute are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(flatten)]
    pub fields: ProductFields,
    pub amount: i64,
}

/// Available quantity for a product, served by `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: u64,
    pub amount: i64,
}

/// One product entry in the cart. `amount` is the quantity in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: u64,
    #[serde(flatten)]
    pub fields: ProductFields,
    pub amount: u32,
}

impl CartLineItem {
    pub fn from_product(product: Product, amount: u32) -> Self {
        Self {
            id: product.id,
            fields: product.fields,
            amount,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(|v| v.as_str())
    }

    pub fn price(&self) -> Option<f64> {
        self.fields.get("price").and_then(|v| v.as_f64())
    }
}

/// Ordered cart contents.
///
/// Every mutation returns a new `Cart`; the caller publishes it as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, product_id: u64) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    pub fn contains(&self, product_id: u64) -> bool {
        self.find(product_id).is_some()
    }

    pub fn with_item(&self, item: CartLineItem) -> Cart {
        let mut items = self.items.clone();
        items.push(item);
        Cart { items }
    }

    pub fn without(&self, product_id: u64) -> Cart {
        Cart {
            items: self
                .items
                .iter()
                .filter(|item| item.id != product_id)
                .cloned()
                .collect(),
        }
    }

    pub fn with_amount(&self, product_id: u64, amount: u32) -> Cart {
        Cart {
            items: self
                .items
                .iter()
                .map(|item| {
                    if item.id == product_id {
                        CartLineItem {
                            amount,
                            ..item.clone()
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        }
    }

    /// Total quantity across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of `price * amount`; items without a numeric price are skipped.
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .filter_map(|item| item.price().map(|price| price * f64::from(item.amount)))
            .sum()
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.amount < 1 {
                return Err(CartError::MalformedCart {
                    reason: format!("line item {} has amount 0", item.id),
                });
            }
            if !seen.insert(item.id) {
                return Err(CartError::MalformedCart {
                    reason: format!("duplicate line item for product {}", item.id),
                });
            }
        }
        Ok(())
    }

    /// Parses a persisted cart and checks its invariants.
    pub fn from_json(raw: &str) -> Result<Cart> {
        let cart: Cart = serde_json::from_str(raw)?;
        cart.validate()?;
        Ok(cart)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: u64,
    pub amount: i64,
}

/// Where `add_product` looks up availability for a product not yet in the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddStockCheck {
    /// The `amount` reported on the product record itself.
    #[default]
    ProductField,
    /// A separate `GET /stock/{id}` lookup.
    StockEndpoint,
}

/// User-facing notifications raised by cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    OutOfStock,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::OutOfStock => "Quantidade solicitada fora de estoque",
            Notice::AddFailed => "Erro na adição do produto",
            Notice::RemoveFailed => "Erro na remoção do produto",
            Notice::UpdateFailed => "Erro na alteração de quantidade do produto",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: u64, amount: u32) -> CartLineItem {
        serde_json::from_value(json!({
            "id": id,
            "title": format!("Tênis {}", id),
            "price": 139.9,
            "amount": amount
        }))
        .unwrap()
    }

    #[test]
    fn test_line_item_keeps_product_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe.jpg",
            "amount": 5
        }))
        .unwrap();

        let line = CartLineItem::from_product(product, 1);
        let value = serde_json::to_value(&line).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["amount"], 1);
        assert_eq!(value["image"], "https://example.com/shoe.jpg");
        assert_eq!(line.title(), Some("Tênis de Caminhada Leve Confortável"));
        assert_eq!(line.price(), Some(179.9));
    }

    #[test]
    fn test_with_amount_touches_only_matching_item() {
        let cart = Cart::new(vec![item(1, 1), item(2, 3), item(3, 1)]);
        let updated = cart.with_amount(2, 5);

        assert_eq!(updated.items()[0], cart.items()[0]);
        assert_eq!(updated.items()[1].amount, 5);
        assert_eq!(updated.items()[1].fields, cart.items()[1].fields);
        assert_eq!(updated.items()[2], cart.items()[2]);
        // 原本的購物車不受影響
        assert_eq!(cart.items()[1].amount, 3);
    }

    #[test]
    fn test_without_preserves_order() {
        let cart = Cart::new(vec![item(1, 1), item(2, 1), item(3, 1)]);
        let ids: Vec<u64> = cart.without(2).items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_summaries() {
        let cart = Cart::new(vec![item(1, 2), item(2, 1)]);
        assert_eq!(cart.item_count(), 3);
        assert!((cart.subtotal() - 139.9 * 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_json_rejects_bad_payloads() {
        assert!(Cart::from_json("not json").is_err());
        assert!(Cart::from_json(r#"{"id": 1}"#).is_err());
        assert!(Cart::from_json(r#"[{"id": 1, "amount": 0}]"#).is_err());
        assert!(Cart::from_json(r#"[{"id": 1, "amount": -2}]"#).is_err());
        assert!(Cart::from_json(r#"[{"id": 1, "amount": 1}, {"id": 1, "amount": 2}]"#).is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_order_and_fields() {
        let raw = r#"[{"id":2,"title":"B","amount":1},{"id":1,"title":"A","amount":4}]"#;
        let cart = Cart::from_json(raw).unwrap();
        assert_eq!(cart.items()[0].id, 2);
        assert_eq!(cart.items()[1].title(), Some("A"));
        assert_eq!(Cart::from_json(&cart.to_json().unwrap()).unwrap(), cart);
    }

    #[test]
    fn test_add_stock_check_names() {
        let check: AddStockCheck = serde_json::from_str("\"stock-endpoint\"").unwrap();
        assert_eq!(check, AddStockCheck::StockEndpoint);
        assert_eq!(AddStockCheck::default(), AddStockCheck::ProductField);
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            Notice::OutOfStock.to_string(),
            "Quantidade solicitada fora de estoque"
        );
        assert_eq!(Notice::RemoveFailed.message(), "Erro na remoção do produto");
    }
}
