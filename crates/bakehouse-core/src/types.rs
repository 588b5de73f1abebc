//! # Domain Types
//!
//! Core domain types used throughout Bakehouse.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryItem  │   │    Product      │   │ CatalogProduct  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  ingredients[]  │──►│  id             │       │
//! │  │  total_quantity │   │  weight_grams   │   │  cost_basis     │       │
//! │  │  unit           │   │  total_cost     │   │  (billing view) │       │
//! │  │  total_cost     │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Percentage    │   │      Unit       │   │ TenantProfile   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Grams, Pieces  │   │  bakery_name    │       │
//! │  │  5000 = 50%     │   │  Liters, Cups.. │   │  address, phone │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Billing types (LineItem, Bill, ...) live in [`crate::billing`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 5000 bps = 50% (the default markup)
/// 1250 bps = 12.5%
///
/// Used for both the markup (unbounded above) and the discount (0-100%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Creates a percentage from a whole number of percent.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Percentage(percent * 100)
    }

    /// Creates a percentage from a fractional percent (for convenience).
    ///
    /// Out-of-range input saturates (negative to zero). Client input goes
    /// through [`crate::validation::parse_percentage`], which rejects both ends.
    pub fn from_percentage(pct: f64) -> Self {
        Percentage((pct * 100.0).round() as u32)
    }

    /// Returns the value in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the value as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

/// `50%`, `12.5%`
impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Unit
// =============================================================================

/// Measurement unit of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Grams,
    Milliliters,
    Liters,
    Pieces,
    Cups,
    Tablespoons,
    Teaspoons,
}

/// (unit, long label, short label)
const UNIT_LABELS: [(Unit, &str, &str); 7] = [
    (Unit::Grams, "Grams (g)", "g"),
    (Unit::Milliliters, "Milliliters (ml)", "ml"),
    (Unit::Liters, "Liters (L)", "L"),
    (Unit::Pieces, "Pieces (pcs)", "pcs"),
    (Unit::Cups, "Cups", "cups"),
    (Unit::Tablespoons, "Tablespoons (tbsp)", "tbsp"),
    (Unit::Teaspoons, "Teaspoons (tsp)", "tsp"),
];

impl Unit {
    /// Every unit, in the order forms present them.
    pub const ALL: [Unit; 7] = [
        Unit::Grams,
        Unit::Milliliters,
        Unit::Liters,
        Unit::Pieces,
        Unit::Cups,
        Unit::Tablespoons,
        Unit::Teaspoons,
    ];

    fn labels(&self) -> (&'static str, &'static str) {
        UNIT_LABELS
            .iter()
            .find(|(unit, _, _)| unit == self)
            .map(|(_, long, short)| (*long, *short))
            .unwrap_or(("", ""))
    }

    /// Label shown in selection lists, e.g. `Grams (g)`.
    pub fn label(&self) -> &'static str {
        self.labels().0
    }

    /// Abbreviation shown next to quantities, e.g. `g`.
    pub fn short_label(&self) -> &'static str {
        self.labels().1
    }

    /// Stock level below which an item counts as running low.
    ///
    /// Countable items run out in single digits; everything measured by
    /// weight or volume is flagged below 100 units.
    pub fn low_stock_threshold(&self) -> f64 {
        match self {
            Unit::Pieces => 5.0,
            _ => 100.0,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_label())
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A raw material held in stock (flour, butter, eggs, ...).
///
/// ## Cost Model
/// ```text
/// Bought: 1000 g for ₹45.00
///      │
///      ▼
/// cost_per_unit = 4500 / 1000 = 4.5 paise per gram
///      │
///      ▼
/// Recipe uses 250 g ──► ingredient cost = round(4.5 × 250) = 1125 (₹11.25)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this item belongs to.
    pub tenant_id: String,

    /// Display name, e.g. "All-purpose flour".
    pub name: String,

    /// Quantity bought, in `unit`. Fractions allowed (2.5 liters).
    pub total_quantity: f64,

    pub unit: Unit,

    /// What the whole quantity cost, in paise.
    pub total_cost_cents: i64,

    /// Derived: total_cost_cents / total_quantity, in fractional paise.
    pub cost_per_unit: f64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Creates a new item with a fresh id and derived cost per unit.
    pub fn new(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        total_quantity: f64,
        unit: Unit,
        total_cost: Money,
        now: DateTime<Utc>,
    ) -> Self {
        InventoryItem {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            total_quantity,
            unit,
            total_cost_cents: total_cost.cents(),
            cost_per_unit: cost_per_unit(total_cost, total_quantity),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the editable fields and re-derives the cost per unit.
    pub fn apply_update(
        &mut self,
        name: impl Into<String>,
        total_quantity: f64,
        unit: Unit,
        total_cost: Money,
        now: DateTime<Utc>,
    ) {
        self.name = name.into();
        self.total_quantity = total_quantity;
        self.unit = unit;
        self.total_cost_cents = total_cost.cents();
        self.cost_per_unit = cost_per_unit(total_cost, total_quantity);
        self.updated_at = now;
    }

    /// Returns the total cost as Money.
    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents)
    }

    /// Cost of using `quantity` units of this item in a recipe.
    pub fn ingredient_cost(&self, quantity: f64) -> Money {
        self.total_cost().prorate(quantity, self.total_quantity)
    }

    /// Checks whether stock is below the unit's threshold.
    pub fn is_low_stock(&self) -> bool {
        self.total_quantity < self.unit.low_stock_threshold()
    }
}

/// Derives cost per unit in fractional paise. Zero when quantity is not positive.
pub fn cost_per_unit(total_cost: Money, total_quantity: f64) -> f64 {
    if total_quantity > 0.0 {
        total_cost.cents() as f64 / total_quantity
    } else {
        0.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// One ingredient line of a product recipe.
///
/// Name, unit and cost are snapshots taken when the recipe was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductIngredient {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub cost_cents: i64,
}

impl ProductIngredient {
    /// Prices `quantity` of an inventory item.
    pub fn from_inventory(item: &InventoryItem, quantity: f64) -> Self {
        ProductIngredient {
            ingredient_id: item.id.clone(),
            ingredient_name: item.name.clone(),
            quantity,
            unit: item.unit,
            cost_cents: item.ingredient_cost(quantity).cents(),
        }
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

/// A sellable bakery product defined as a recipe over inventory.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this product belongs to.
    pub tenant_id: String,

    /// Display name shown on bills and invoices.
    pub name: String,

    /// Finished weight in grams.
    pub weight_grams: f64,

    pub ingredients: Vec<ProductIngredient>,

    /// Σ ingredient cost, in paise. This is the product's cost basis.
    pub total_cost_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the cost basis as Money.
    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents)
    }

    /// Projects the product into the shape the billing engine consumes.
    pub fn to_catalog(&self) -> CatalogProduct {
        CatalogProduct {
            id: self.id.clone(),
            name: self.name.clone(),
            cost_basis_cents: self.total_cost_cents,
            weight_grams: self.weight_grams,
        }
    }
}

/// Catalog projection of a product: what billing needs to price a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub cost_basis_cents: i64,
    pub weight_grams: f64,
}

impl CatalogProduct {
    #[inline]
    pub fn cost_basis(&self) -> Money {
        Money::from_cents(self.cost_basis_cents)
    }
}

// =============================================================================
// Tenant Profile
// =============================================================================

/// Business details of a tenant, printed as the issuer block of invoices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TenantProfile {
    pub tenant_id: String,
    /// Owner's name.
    pub name: String,
    pub bakery_name: String,
    pub bakery_address: String,
    pub bakery_phone: String,
    pub bakery_email: String,
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TenantProfile {
    /// Profile of a tenant that has not filled anything in yet.
    pub fn empty(tenant_id: impl Into<String>) -> Self {
        TenantProfile {
            tenant_id: tenant_id.into(),
            ..Default::default()
        }
    }

    /// Applies a partial update; absent fields keep their value.
    pub fn apply(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(bakery_name) = update.bakery_name {
            self.bakery_name = bakery_name.trim().to_string();
        }
        if let Some(address) = update.bakery_address {
            self.bakery_address = address.trim().to_string();
        }
        if let Some(phone) = update.bakery_phone {
            self.bakery_phone = phone.trim().to_string();
        }
        if let Some(email) = update.bakery_email {
            self.bakery_email = email.trim().to_string();
        }
        self.updated_at = Some(now);
    }
}

/// Partial profile update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bakery_name: Option<String>,
    pub bakery_address: Option<String>,
    pub bakery_phone: Option<String>,
    pub bakery_email: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// Optional "Bill To" details of a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerDetails {
    /// Trims every field and turns blank strings into `None`.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        CustomerDetails {
            name: clean(self.name),
            phone: clean(self.phone),
            address: clean(self.address),
        }
    }

    /// True when there is nothing to print in a "Bill To" block.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.address.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
