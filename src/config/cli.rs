use crate::core::cart_store::CartStore;
use crate::core::{Cart, CatalogService, KeyValueStore, Notifier, UpdateProductAmount};
use clap::Subcommand;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CartCommand {
    /// Show the current cart
    List,
    /// Add one unit of a product
    Add { product_id: u64 },
    /// Remove a product from the cart
    Remove { product_id: u64 },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: u64,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Runs one command against the store. Failures surface as toasts, not errors.
pub async fn execute<C, S, N>(store: &mut CartStore<C, S, N>, command: &CartCommand)
where
    C: CatalogService,
    S: KeyValueStore,
    N: Notifier,
{
    match *command {
        CartCommand::List => {}
        CartCommand::Add { product_id } => store.add_product(product_id).await,
        CartCommand::Remove { product_id } => store.remove_product(product_id).await,
        CartCommand::Update { product_id, amount } => {
            store
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await
        }
    }
}

pub fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "🛒 Cart is empty".to_string();
    }

    let mut out = String::new();
    for item in cart.items() {
        let title = item.title().unwrap_or("(untitled)");
        let _ = match item.price() {
            Some(price) => writeln!(
                out,
                "#{:<4} {:<40} x{:<3} R$ {:.2}",
                item.id,
                title,
                item.amount,
                price * f64::from(item.amount)
            ),
            None => writeln!(out, "#{:<4} {:<40} x{:<3}", item.id, title, item.amount),
        };
    }
    let _ = write!(
        out,
        "{} items, subtotal R$ {:.2}",
        cart.item_count(),
        cart.subtotal()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_cart(&Cart::default()), "🛒 Cart is empty");
    }

    #[test]
    fn test_render_cart_lines_and_subtotal() {
        let cart = Cart::from_json(
            r#"[
                {"id": 1, "title": "Tênis Nike", "price": 100.0, "amount": 2},
                {"id": 2, "amount": 1}
            ]"#,
        )
        .unwrap();

        let rendered = render_cart(&cart);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Tênis Nike"));
        assert!(lines[0].contains("R$ 200.00"));
        assert!(lines[1].contains("(untitled)"));
        assert_eq!(lines[2], "3 items, subtotal R$ 200.00");
    }
}
