//! # Recipe Costing
//!
//! Turns a product recipe (inventory ids + quantities) into priced
//! ingredient lines and a product cost basis.
//!
//! ```text
//! RecipeLine { flour, 500 g } ──┐
//! RecipeLine { butter, 100 g } ─┼──► resolve_ingredients(inventory, lines)
//! RecipeLine { eggs, 2 pcs } ───┘              │
//!                                              ▼
//!                         [ProductIngredient { cost: 2250 }, ...]
//!                                              │
//!                                              ▼
//!                          Product.total_cost = Σ ingredient cost
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{InventoryItem, Product, ProductIngredient};
use crate::validation::{validate_name, validate_not_empty, validate_positive_quantity};

/// One requested ingredient of a recipe, as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipeLine {
    pub ingredient_id: String,
    pub quantity: f64,
}

/// A product definition before it is costed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub weight_grams: f64,
    pub ingredients: Vec<RecipeLine>,
}

impl ProductDraft {
    /// Validates the definition and returns the trimmed name.
    ///
    /// ## Rules
    /// - name required
    /// - weight > 0
    /// - at least one ingredient, each with quantity > 0
    pub fn validate(&self) -> CoreResult<String> {
        let name = validate_name("name", &self.name)?;
        validate_positive_quantity("weight", self.weight_grams)?;
        validate_not_empty("ingredients", &self.ingredients)?;
        for line in &self.ingredients {
            validate_positive_quantity("ingredient quantity", line.quantity)?;
        }
        Ok(name)
    }
}

/// Prices every recipe line against the tenant's inventory.
///
/// Fails with [`CoreError::IngredientNotFound`] on the first id that is
/// not in `inventory`.
pub fn resolve_ingredients(
    inventory: &[InventoryItem],
    lines: &[RecipeLine],
) -> CoreResult<Vec<ProductIngredient>> {
    lines
        .iter()
        .map(|line| {
            inventory
                .iter()
                .find(|item| item.id == line.ingredient_id)
                .map(|item| ProductIngredient::from_inventory(item, line.quantity))
                .ok_or_else(|| CoreError::IngredientNotFound(line.ingredient_id.clone()))
        })
        .collect()
}

/// Sum of ingredient costs.
pub fn total_cost(ingredients: &[ProductIngredient]) -> Money {
    ingredients.iter().map(ProductIngredient::cost).sum()
}

/// Validates and costs a new product.
pub fn build_product(
    tenant_id: &str,
    draft: &ProductDraft,
    inventory: &[InventoryItem],
    now: DateTime<Utc>,
) -> CoreResult<Product> {
    let name = draft.validate()?;
    let ingredients = resolve_ingredients(inventory, &draft.ingredients)?;

    Ok(Product {
        id: uuid::Uuid::new_v4().to_string(),
        tenant_id: tenant_id.to_string(),
        name,
        weight_grams: draft.weight_grams,
        total_cost_cents: total_cost(&ingredients).cents(),
        ingredients,
        created_at: now,
        updated_at: now,
    })
}

/// Re-validates and re-costs an existing product in place.
///
/// Ingredient prices are re-read from the current inventory, so an update
/// picks up any change in what the raw materials cost.
pub fn rebuild_product(
    product: &mut Product,
    draft: &ProductDraft,
    inventory: &[InventoryItem],
    now: DateTime<Utc>,
) -> CoreResult<()> {
    let name = draft.validate()?;
    let ingredients = resolve_ingredients(inventory, &draft.ingredients)?;

    product.name = name;
    product.weight_grams = draft.weight_grams;
    product.total_cost_cents = total_cost(&ingredients).cents();
    product.ingredients = ingredients;
    product.updated_at = now;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Unit;

    fn inventory() -> Vec<InventoryItem> {
        let now = Utc::now();
        let mut flour =
            InventoryItem::new("t1", "Flour", 1000.0, Unit::Grams, Money::from_cents(4500), now);
        flour.id = "flour".to_string();
        let mut eggs =
            InventoryItem::new("t1", "Eggs", 12.0, Unit::Pieces, Money::from_cents(7200), now);
        eggs.id = "eggs".to_string();
        vec![flour, eggs]
    }

    fn line(id: &str, quantity: f64) -> RecipeLine {
        RecipeLine {
            ingredient_id: id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_build_product_sums_ingredient_costs() {
        let draft = ProductDraft {
            name: " Egg Bread ".to_string(),
            weight_grams: 550.0,
            ingredients: vec![line("flour", 500.0), line("eggs", 2.0)],
        };

        let product = build_product("t1", &draft, &inventory(), Utc::now()).unwrap();

        assert_eq!(product.name, "Egg Bread");
        assert_eq!(product.ingredients.len(), 2);
        assert_eq!(product.ingredients[0].cost_cents, 2250);
        assert_eq!(product.ingredients[1].cost_cents, 1200);
        assert_eq!(product.ingredients[1].unit, Unit::Pieces);
        assert_eq!(product.total_cost().cents(), 3450);
    }

    #[test]
    fn test_unknown_ingredient_is_not_found() {
        let lines = vec![line("flour", 100.0), line("butter", 50.0)];
        let err = resolve_ingredients(&inventory(), &lines).unwrap_err();
        assert!(matches!(err, CoreError::IngredientNotFound(id) if id == "butter"));
    }

    #[test]
    fn test_product_validation_rules() {
        let inventory = inventory();
        let valid = ProductDraft {
            name: "Bun".to_string(),
            weight_grams: 80.0,
            ingredients: vec![line("flour", 60.0)],
        };
        assert!(build_product("t1", &valid, &inventory, Utc::now()).is_ok());

        let no_name = ProductDraft {
            name: "  ".to_string(),
            ..valid.clone()
        };
        let no_weight = ProductDraft {
            weight_grams: 0.0,
            ..valid.clone()
        };
        let no_ingredients = ProductDraft {
            ingredients: vec![],
            ..valid.clone()
        };
        let zero_quantity = ProductDraft {
            ingredients: vec![line("flour", 0.0)],
            ..valid.clone()
        };

        for draft in [no_name, no_weight, no_ingredients, zero_quantity] {
            let err = build_product("t1", &draft, &inventory, Utc::now()).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)));
        }
    }

    #[test]
    fn test_rebuild_product_reprices_from_inventory() {
        let mut inventory = inventory();
        let draft = ProductDraft {
            name: "Bun".to_string(),
            weight_grams: 80.0,
            ingredients: vec![line("flour", 100.0)],
        };
        let mut product = build_product("t1", &draft, &inventory, Utc::now()).unwrap();
        assert_eq!(product.total_cost_cents, 450);

        let now = Utc::now();
        inventory[0].apply_update("Flour", 1000.0, Unit::Grams, Money::from_cents(9000), now);
        rebuild_product(&mut product, &draft, &inventory, now).unwrap();

        assert_eq!(product.total_cost_cents, 900);
        assert_eq!(product.updated_at, now);
    }
}
