//! # Billing Engine
//!
//! Composes a bill from catalog products, derives selling prices from a
//! markup, and freezes the result into an immutable [`Bill`].
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Bill Lifecycle                                  │
//! │                                                                         │
//! │   BillDraft (mutable)                           Bill (immutable)        │
//! │   ───────────────────                           ────────────────        │
//! │   add_item / set_item_quantity                                          │
//! │   set_item_price / set_markup     finalize()    id, bill_number         │
//! │   set_discount / set_customer   ─────────────►  frozen totals           │
//! │   additional costs                (one way)     created_at              │
//! │        │                                                                │
//! │        └── totals() recomputed on every call, nothing cached            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! ```text
//! subtotal               = Σ item.total
//! additional_costs_total = Σ cost.amount
//! discount_amount        = subtotal × discount / 100
//! total                  = subtotal + additional_costs_total − discount_amount
//! total_cost_basis       = Σ item.cost_price × item.quantity + additional_costs_total
//! profit                 = total − total_cost_basis
//! ```
//!
//! The discount applies to the item subtotal only. Additional costs are
//! passed through at cost, so they never add profit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CatalogProduct, CustomerDetails, Percentage};
use crate::validation::{validate_discount, validate_line_quantity, validate_non_negative_amount};

fn too_large(field: &str) -> CoreError {
    ValidationError::TooLarge {
        field: field.to_string(),
    }
    .into()
}

// =============================================================================
// Line Item
// =============================================================================

/// One product on a bill.
///
/// ## Snapshot Pattern
/// Name and cost price are copied from the catalog when the item is added.
/// Later recipe changes do not alter a draft or a committed bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product_id: String,
    pub product_name: String,
    /// Always ≥ 1 while the item is on a bill.
    pub quantity: i64,
    /// Cost basis per unit at add time.
    pub cost_price_cents: i64,
    /// Per-unit price charged to the customer.
    pub selling_price_cents: i64,
    /// selling_price × quantity
    pub total_cents: i64,
}

impl LineItem {
    /// Creates a line at quantity 1 priced from the current markup.
    pub fn from_catalog(product: &CatalogProduct, markup: Percentage) -> CoreResult<Self> {
        let mut item = LineItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: 1,
            cost_price_cents: product.cost_basis_cents,
            selling_price_cents: 0,
            total_cents: 0,
        };
        item.reprice(markup)?;
        Ok(item)
    }

    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// What this line cost to make: cost_price × quantity.
    pub fn cost_total(&self) -> CoreResult<Money> {
        self.cost_price()
            .checked_mul(self.quantity)
            .ok_or_else(|| too_large("costTotal"))
    }

    /// Derives selling price from cost price and recomputes the total.
    fn reprice(&mut self, markup: Percentage) -> CoreResult<()> {
        let selling = self
            .cost_price()
            .apply_markup(markup)
            .ok_or_else(|| too_large("sellingPrice"))?;
        self.selling_price_cents = selling.cents();
        self.recompute_total()
    }

    fn recompute_total(&mut self) -> CoreResult<()> {
        let total = self
            .selling_price()
            .checked_mul(self.quantity)
            .ok_or_else(|| too_large("total"))?;
        self.total_cents = total.cents();
        Ok(())
    }
}

// =============================================================================
// Additional Cost
// =============================================================================

/// A flat charge outside per-item pricing (packaging, delivery, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdditionalCost {
    pub id: String,
    /// May be empty while the user is still typing.
    pub description: String,
    pub amount_cents: i64,
}

impl AdditionalCost {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Costs worth printing: described and above zero.
    pub fn is_printable(&self) -> bool {
        !self.description.trim().is_empty() && self.amount_cents > 0
    }
}

/// A single-field edit of an additional cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdditionalCostUpdate {
    Description(String),
    Amount(Money),
}

// =============================================================================
// Totals
// =============================================================================

/// Derived figures of a draft or a committed bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillTotals {
    pub subtotal: Money,
    pub additional_costs_total: Money,
    pub discount_amount: Money,
    pub total: Money,
    pub total_cost_basis: Money,
    pub profit: Money,
}

impl BillTotals {
    /// Every step is checked; a figure that would overflow is reported as
    /// [`ValidationError::TooLarge`] naming that figure.
    fn compute(
        items: &[LineItem],
        additional_costs: &[AdditionalCost],
        discount: Percentage,
    ) -> CoreResult<Self> {
        let subtotal = Money::checked_sum(items.iter().map(LineItem::total))
            .ok_or_else(|| too_large("subtotal"))?;
        let additional_costs_total =
            Money::checked_sum(additional_costs.iter().map(AdditionalCost::amount))
                .ok_or_else(|| too_large("additionalCostsTotal"))?;
        let discount_amount = subtotal
            .percentage_of(discount)
            .ok_or_else(|| too_large("discountAmount"))?;
        let total = subtotal
            .checked_add(additional_costs_total)
            .and_then(|t| t.checked_sub(discount_amount))
            .ok_or_else(|| too_large("total"))?;

        let items_cost = items.iter().try_fold(Money::zero(), |acc, item| {
            acc.checked_add(item.cost_total()?)
                .ok_or_else(|| too_large("totalCostBasis"))
        })?;
        let total_cost_basis = items_cost
            .checked_add(additional_costs_total)
            .ok_or_else(|| too_large("totalCostBasis"))?;
        let profit = total
            .checked_sub(total_cost_basis)
            .ok_or_else(|| too_large("profit"))?;

        Ok(BillTotals {
            subtotal,
            additional_costs_total,
            discount_amount,
            total,
            total_cost_basis,
            profit,
        })
    }
}

// =============================================================================
// Bill Draft
// =============================================================================

/// The bill being composed.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding the same product bumps quantity)
/// - Every item has quantity between 1 and [`MAX_LINE_QUANTITY`] (setting
///   ≤ 0 removes it)
/// - Discount is within 0-100%
/// - Prices and amounts are never negative
/// - [`BillDraft::totals`] always succeeds: an edit that would overflow a
///   figure is rejected and the draft stays exactly as it was
///
/// [`MAX_LINE_QUANTITY`]: crate::validation::MAX_LINE_QUANTITY
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillDraft {
    customer: CustomerDetails,
    items: Vec<LineItem>,
    additional_costs: Vec<AdditionalCost>,
    discount: Percentage,
    markup: Percentage,
}

impl Default for BillDraft {
    fn default() -> Self {
        BillDraft::new(crate::DEFAULT_MARKUP)
    }
}

impl BillDraft {
    /// Creates an empty draft with the given markup and no discount.
    pub fn new(markup: Percentage) -> Self {
        BillDraft {
            customer: CustomerDetails::default(),
            items: Vec::new(),
            additional_costs: Vec::new(),
            discount: Percentage::zero(),
            markup,
        }
    }

    /// Rebuilds a draft from client-held state.
    ///
    /// Item totals are recomputed from selling price and quantity; lines
    /// with quantity ≤ 0 are dropped. A product listed on two lines is
    /// rejected rather than merged, since the lines may carry different
    /// manual prices.
    pub fn restore(
        customer: CustomerDetails,
        items: Vec<LineItem>,
        additional_costs: Vec<AdditionalCost>,
        markup: Percentage,
        discount: Percentage,
    ) -> CoreResult<Self> {
        validate_discount(discount)?;

        let mut restored: Vec<LineItem> = Vec::with_capacity(items.len());
        for mut item in items.into_iter().filter(|i| i.quantity > 0) {
            validate_line_quantity("quantity", item.quantity)?;
            validate_non_negative_amount("costPrice", item.cost_price())?;
            validate_non_negative_amount("sellingPrice", item.selling_price())?;
            if restored.iter().any(|e| e.product_id == item.product_id) {
                return Err(ValidationError::Duplicate {
                    field: "items".to_string(),
                    value: item.product_id,
                }
                .into());
            }
            item.recompute_total()?;
            restored.push(item);
        }

        for cost in &additional_costs {
            validate_non_negative_amount("amount", cost.amount())?;
        }

        let draft = BillDraft {
            customer: customer.normalized(),
            items: restored,
            additional_costs,
            discount,
            markup,
        };
        draft.totals()?;
        Ok(draft)
    }

    /// Applies `edit` to a copy and keeps the copy only if it succeeds and
    /// its totals still compute.
    fn transact<R>(
        &mut self,
        edit: impl FnOnce(&mut BillDraft) -> CoreResult<R>,
    ) -> CoreResult<R> {
        let mut next = self.clone();
        let out = edit(&mut next)?;
        next.totals()?;
        *self = next;
        Ok(out)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn additional_costs(&self) -> &[AdditionalCost] {
        &self.additional_costs
    }

    pub fn discount(&self) -> Percentage {
        self.discount
    }

    pub fn markup(&self) -> Percentage {
        self.markup
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Adds one unit of a catalog product.
    ///
    /// ## Behavior
    /// - Product already on the draft: quantity + 1, selling price re-derived
    ///   from the stored cost price with the current markup
    /// - New product: inserted at quantity 1
    /// - Product not in `catalog`: nothing happens, returns `Ok(false)`
    /// - Line already at [`MAX_LINE_QUANTITY`]: rejected, draft unchanged
    ///
    /// [`MAX_LINE_QUANTITY`]: crate::validation::MAX_LINE_QUANTITY
    pub fn add_item(&mut self, product_id: &str, catalog: &[CatalogProduct]) -> CoreResult<bool> {
        let Some(product) = catalog.iter().find(|p| p.id == product_id) else {
            return Ok(false);
        };

        self.transact(|draft| {
            let markup = draft.markup;
            match draft.items.iter_mut().find(|i| i.product_id == product_id) {
                Some(item) => {
                    validate_line_quantity("quantity", item.quantity.saturating_add(1))?;
                    item.quantity += 1;
                    item.reprice(markup)?;
                }
                None => draft.items.push(LineItem::from_catalog(product, markup)?),
            }
            Ok(true)
        })
    }

    /// Sets an item's quantity. Zero or below removes the item.
    ///
    /// The current selling price is kept, so a manual price survives.
    /// Unknown product ids are ignored.
    pub fn set_item_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.items.retain(|i| i.product_id != product_id);
            return Ok(());
        }
        validate_line_quantity("quantity", quantity)?;

        self.transact(|draft| {
            if let Some(item) = draft.items.iter_mut().find(|i| i.product_id == product_id) {
                item.quantity = quantity;
                item.recompute_total()?;
            }
            Ok(())
        })
    }

    /// Overrides one item's selling price without touching the markup.
    pub fn set_item_price(&mut self, product_id: &str, selling_price: Money) -> CoreResult<()> {
        validate_non_negative_amount("sellingPrice", selling_price)?;

        self.transact(|draft| {
            if let Some(item) = draft.items.iter_mut().find(|i| i.product_id == product_id) {
                item.selling_price_cents = selling_price.cents();
                item.recompute_total()?;
            }
            Ok(())
        })
    }

    /// Stores a new markup and reprices every item from its cost price.
    ///
    /// Manual price overrides are discarded.
    pub fn set_markup(&mut self, markup: Percentage) -> CoreResult<()> {
        self.transact(|draft| {
            draft.markup = markup;
            for item in &mut draft.items {
                item.reprice(markup)?;
            }
            Ok(())
        })
    }

    /// Stores a discount. Must be within 0-100%.
    pub fn set_discount(&mut self, discount: Percentage) -> CoreResult<()> {
        validate_discount(discount)?;
        self.transact(|draft| {
            draft.discount = discount;
            Ok(())
        })
    }

    /// Stores customer details; blank fields become absent.
    pub fn set_customer(&mut self, details: CustomerDetails) {
        self.customer = details.normalized();
    }

    // -------------------------------------------------------------------------
    // Additional Costs
    // -------------------------------------------------------------------------

    /// Appends an empty additional cost and returns its id.
    pub fn add_additional_cost(&mut self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.additional_costs.push(AdditionalCost {
            id: id.clone(),
            description: String::new(),
            amount_cents: 0,
        });
        id
    }

    /// Edits the description or the amount of an additional cost.
    pub fn update_additional_cost(
        &mut self,
        id: &str,
        update: AdditionalCostUpdate,
    ) -> CoreResult<()> {
        if let AdditionalCostUpdate::Amount(amount) = &update {
            validate_non_negative_amount("amount", *amount)?;
        }

        self.transact(|draft| {
            let cost = draft
                .additional_costs
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| CoreError::AdditionalCostNotFound(id.to_string()))?;

            match update {
                AdditionalCostUpdate::Description(description) => cost.description = description,
                AdditionalCostUpdate::Amount(amount) => cost.amount_cents = amount.cents(),
            }
            Ok(())
        })
    }

    /// Removes an additional cost. Returns `false` if the id was unknown.
    pub fn remove_additional_cost(&mut self, id: &str) -> bool {
        let before = self.additional_costs.len();
        self.additional_costs.retain(|c| c.id != id);
        self.additional_costs.len() != before
    }

    // -------------------------------------------------------------------------
    // Totals & Commit
    // -------------------------------------------------------------------------

    /// Derives every figure from the current state.
    ///
    /// Cannot fail for a draft produced by `new`, `restore` or the editing
    /// methods, which all check the totals before keeping a change.
    pub fn totals(&self) -> CoreResult<BillTotals> {
        BillTotals::compute(&self.items, &self.additional_costs, self.discount)
    }

    /// Freezes the draft into a bill.
    ///
    /// ## Errors
    /// [`CoreError::EmptyBill`] when there are no items. The draft itself is
    /// never modified, so the caller can keep editing after a failure.
    pub fn finalize(&self, tenant_id: &str, now: DateTime<Utc>) -> CoreResult<Bill> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyBill);
        }

        let totals = self.totals()?;

        Ok(Bill {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            bill_number: bill_number(now),
            customer_name: self.customer.name.clone(),
            customer_phone: self.customer.phone.clone(),
            customer_address: self.customer.address.clone(),
            items: self.items.clone(),
            additional_costs: self.additional_costs.clone(),
            subtotal_cents: totals.subtotal.cents(),
            additional_costs_total_cents: totals.additional_costs_total.cents(),
            discount_bps: self.discount.bps(),
            discount_amount_cents: totals.discount_amount.cents(),
            total_cents: totals.total.cents(),
            profit_cents: totals.profit.cents(),
            markup_bps: self.markup.bps(),
            created_at: now,
        })
    }
}

/// `BILL-<epoch millis>`
pub fn bill_number(now: DateTime<Utc>) -> String {
    format!("BILL-{}", now.timestamp_millis())
}

// =============================================================================
// Bill
// =============================================================================

/// A committed bill. Totals are frozen at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    pub id: String,
    pub tenant_id: String,
    pub bill_number: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub items: Vec<LineItem>,
    pub additional_costs: Vec<AdditionalCost>,
    pub subtotal_cents: i64,
    pub additional_costs_total_cents: i64,
    pub discount_bps: u32,
    pub discount_amount_cents: i64,
    pub total_cents: i64,
    pub profit_cents: i64,
    pub markup_bps: u32,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Bill {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn additional_costs_total(&self) -> Money {
        Money::from_cents(self.additional_costs_total_cents)
    }

    #[inline]
    pub fn discount(&self) -> Percentage {
        Percentage::from_bps(self.discount_bps)
    }

    #[inline]
    pub fn discount_amount(&self) -> Money {
        Money::from_cents(self.discount_amount_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }

    #[inline]
    pub fn markup(&self) -> Percentage {
        Percentage::from_bps(self.markup_bps)
    }

    /// Customer block as stored on the bill.
    pub fn customer(&self) -> CustomerDetails {
        CustomerDetails {
            name: self.customer_name.clone(),
            phone: self.customer_phone.clone(),
            address: self.customer_address.clone(),
        }
    }

    /// Overwrites the given fields verbatim.
    ///
    /// Stored totals are NOT re-derived from the new items: an edited bill
    /// reports whatever figures the caller supplied.
    pub fn overwrite(&mut self, patch: BillOverwrite) {
        if let Some(name) = patch.customer_name {
            self.customer_name = name;
        }
        if let Some(phone) = patch.customer_phone {
            self.customer_phone = phone;
        }
        if let Some(address) = patch.customer_address {
            self.customer_address = address;
        }
        if let Some(items) = patch.items {
            self.items = items;
        }
        if let Some(costs) = patch.additional_costs {
            self.additional_costs = costs;
        }
        if let Some(v) = patch.subtotal_cents {
            self.subtotal_cents = v;
        }
        if let Some(v) = patch.additional_costs_total_cents {
            self.additional_costs_total_cents = v;
        }
        if let Some(v) = patch.discount_bps {
            self.discount_bps = v;
        }
        if let Some(v) = patch.discount_amount_cents {
            self.discount_amount_cents = v;
        }
        if let Some(v) = patch.total_cents {
            self.total_cents = v;
        }
        if let Some(v) = patch.profit_cents {
            self.profit_cents = v;
        }
        if let Some(v) = patch.markup_bps {
            self.markup_bps = v;
        }
    }
}

/// Field-level overwrite of a committed bill.
///
/// Customer fields are doubly optional: `None` leaves the field alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillOverwrite {
    pub customer_name: Option<Option<String>>,
    pub customer_phone: Option<Option<String>>,
    pub customer_address: Option<Option<String>>,
    pub items: Option<Vec<LineItem>>,
    pub additional_costs: Option<Vec<AdditionalCost>>,
    pub subtotal_cents: Option<i64>,
    pub additional_costs_total_cents: Option<i64>,
    pub discount_bps: Option<u32>,
    pub discount_amount_cents: Option<i64>,
    pub total_cents: Option<i64>,
    pub profit_cents: Option<i64>,
    pub markup_bps: Option<u32>,
}

// =============================================================================
// Unit Tests
// =============================================================================
