//! Shared traits, identifiers and the monetary amount type.

use uuid::Uuid;

/// Monetary quantity in the currency's smallest unit (whole rupiah for IDR).
pub type Amount = i64;

/// Largest amount a single transaction, budget, goal target or allocation may carry.
pub const MAX_AMOUNT: Amount = 1_000_000_000_000_000;

/// Sums amounts, clamping at the `Amount` range instead of overflowing.
pub fn sum_amounts<I: IntoIterator<Item = Amount>>(amounts: I) -> Amount {
    amounts.into_iter().fold(0, Amount::saturating_add)
}

/// Exposes a stable identifier for entities stored in the finance state.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Associates entities with optional category ownership.
pub trait BelongsToCategory {
    fn category_id(&self) -> Option<&str>;
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> Amount;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Finds the entity with `id` in a slice.
pub fn find_by_id<'a, T: Identifiable>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

pub fn find_by_id_mut<'a, T: Identifiable>(items: &'a mut [T], id: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Generates a fresh identifier: a one-letter kind prefix followed by a v4 UUID.
pub fn new_id(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}
