use crate::core::{
    AddStockCheck, Cart, CartLineItem, CatalogService, ConfigProvider, KeyValueStore, Notice,
    Notifier, Result, UpdateProductAmount,
};
use crate::utils::error::CartError;

pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    pub storage_key: String,
    pub add_stock_check: AddStockCheck,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            add_stock_check: AddStockCheck::default(),
        }
    }
}

impl CartSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            storage_key: config.storage_key().to_string(),
            add_stock_check: config.add_stock_check(),
        }
    }
}

/// Holds the cart and applies the three cart operations.
///
/// Operations never return errors: failures are logged and surfaced through
/// the [`Notifier`] as a toast, and the cart stays as it was. Every change
/// builds a new [`Cart`], writes it to the key-value store, and only then
/// replaces the in-memory value.
pub struct CartStore<C: CatalogService, S: KeyValueStore, N: Notifier> {
    catalog: C,
    storage: S,
    notifier: N,
    settings: CartSettings,
    cart: Cart,
}

impl<C: CatalogService, S: KeyValueStore, N: Notifier> CartStore<C, S, N> {
    /// Restores the cart persisted under the configured key.
    ///
    /// A missing entry yields an empty cart. A malformed entry is logged and
    /// also yields an empty cart; only a failing storage read is an error.
    pub async fn load(catalog: C, storage: S, notifier: N, settings: CartSettings) -> Result<Self> {
        let cart = match storage.get(&settings.storage_key).await? {
            Some(raw) => match Cart::from_json(&raw) {
                Ok(cart) => {
                    tracing::debug!(
                        "Restored cart with {} line items from '{}'",
                        cart.len(),
                        settings.storage_key
                    );
                    cart
                }
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Ignoring malformed cart stored under '{}': {}",
                        settings.storage_key,
                        e
                    );
                    Cart::default()
                }
            },
            None => Cart::default(),
        };

        Ok(Self {
            catalog,
            storage,
            notifier,
            settings,
            cart,
        })
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn into_cart(self) -> Cart {
        self.cart
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Adds one unit of `product_id`.
    ///
    /// A product already in the cart goes through
    /// [`update_product_amount`](Self::update_product_amount) with its amount
    /// plus one, so that operation's stock check and toasts apply.
    pub async fn add_product(&mut self, product_id: u64) {
        if let Some(existing) = self.cart.find(product_id) {
            let amount = i64::from(existing.amount) + 1;
            self.update_product_amount(UpdateProductAmount { product_id, amount })
                .await;
            return;
        }

        match self.try_add_new(product_id).await {
            Ok(()) => tracing::info!("🛒 Added product {} to cart", product_id),
            Err(e) => self.report(Notice::AddFailed, e),
        }
    }

    pub async fn remove_product(&mut self, product_id: u64) {
        match self.try_remove(product_id).await {
            Ok(()) => tracing::info!("🗑️ Removed product {} from cart", product_id),
            Err(e) => self.report(Notice::RemoveFailed, e),
        }
    }

    /// Sets the cart quantity of a product. Amounts `<= 0` are ignored.
    pub async fn update_product_amount(&mut self, update: UpdateProductAmount) {
        if update.amount <= 0 {
            tracing::debug!(
                "Ignoring non-positive amount {} for product {}",
                update.amount,
                update.product_id
            );
            return;
        }

        match self.try_update(update).await {
            Ok(()) => tracing::info!(
                "🔢 Product {} amount set to {}",
                update.product_id,
                update.amount
            ),
            Err(e) => self.report(Notice::UpdateFailed, e),
        }
    }

    /// Whether the stock endpoint reports at least `amount` units.
    pub async fn check_stock_availability(&self, product_id: u64, amount: i64) -> Result<bool> {
        match self.ensure_in_stock(product_id, amount).await {
            Ok(()) => Ok(true),
            Err(CartError::OutOfStock { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn try_add_new(&mut self, product_id: u64) -> Result<()> {
        let product = self.catalog.product(product_id).await?;

        match self.settings.add_stock_check {
            AddStockCheck::ProductField => {
                if product.amount < 1 {
                    return Err(CartError::OutOfStock {
                        product_id,
                        requested: 1,
                        available: product.amount,
                    });
                }
            }
            AddStockCheck::StockEndpoint => self.ensure_in_stock(product_id, 1).await?,
        }

        let cart = self.cart.with_item(CartLineItem::from_product(product, 1));
        self.commit(cart).await
    }

    async fn try_remove(&mut self, product_id: u64) -> Result<()> {
        if !self.cart.contains(product_id) {
            return Err(CartError::NotInCart { product_id });
        }

        let cart = self.cart.without(product_id);
        self.commit(cart).await
    }

    async fn try_update(&mut self, update: UpdateProductAmount) -> Result<()> {
        let UpdateProductAmount { product_id, amount } = update;

        if !self.cart.contains(product_id) {
            return Err(CartError::NotInCart { product_id });
        }

        // 超過 u32 的數量不可能被滿足
        let quantity = u32::try_from(amount).map_err(|_| CartError::OutOfStock {
            product_id,
            requested: amount,
            available: i64::from(u32::MAX),
        })?;

        self.ensure_in_stock(product_id, amount).await?;

        let cart = self.cart.with_amount(product_id, quantity);
        self.commit(cart).await
    }

    async fn ensure_in_stock(&self, product_id: u64, requested: i64) -> Result<()> {
        let stock = self.catalog.stock(product_id).await?;
        tracing::debug!(
            "Stock for product {}: {} available, {} requested",
            product_id,
            stock.amount,
            requested
        );

        if stock.amount < requested {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }
        Ok(())
    }

    /// Persists `cart`, then publishes it as the current cart.
    async fn commit(&mut self, cart: Cart) -> Result<()> {
        let serialized = cart.to_json()?;
        self.storage
            .set(&self.settings.storage_key, &serialized)
            .await?;
        self.cart = cart;
        Ok(())
    }

    fn report(&self, fallback: Notice, error: CartError) {
        match error {
            CartError::OutOfStock {
                product_id,
                requested,
                available,
            } => {
                tracing::info!(
                    "📦 Product {} out of stock (requested {}, available {})",
                    product_id,
                    requested,
                    available
                );
                self.notifier.notify(Notice::OutOfStock);
            }
            other => {
                tracing::warn!(
                    "❌ Cart operation failed: {} (Category: {:?}, retryable: {})",
                    other,
                    other.category(),
                    other.is_retryable()
                );
                self.notifier.notify(fallback);
            }
        }
    }
}
