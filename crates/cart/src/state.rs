//! Cart state and its pure operations.

use storefront_catalog::Product;

use crate::line::CartLine;

/// Sponsor id used until the user sets their own.
pub const DEFAULT_DISTRIBUTOR_ID: &str = "101289416";

/// Line items in insertion order plus the sponsoring distributor.
///
/// Invariant: at most one line per SKU, every quantity `>= 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    lines: Vec<CartLine>,
    distributor_id: String,
}

impl Default for CartState {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            distributor_id: DEFAULT_DISTRIBUTOR_ID.to_string(),
        }
    }
}

impl CartState {
    pub fn new(distributor_id: impl Into<String>) -> Self {
        Self {
            lines: Vec::new(),
            distributor_id: distributor_id.into(),
        }
    }

    /// Rebuild a state from arbitrary lines, restoring the invariants.
    ///
    /// Lines with quantity 0 are dropped; repeated SKUs are merged into the
    /// first occurrence with their quantities summed.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>, distributor_id: impl Into<String>) -> Self {
        let mut state = Self::new(distributor_id);
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            match state.position(line.sku.as_str()) {
                Some(idx) => {
                    let existing = &mut state.lines[idx];
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => state.lines.push(line),
            }
        }
        state
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn distributor_id(&self) -> &str {
        &self.distributor_id
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, sku: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.sku == sku)
    }

    fn position(&self, sku: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.sku == sku)
    }

    /// Increment the line for `product`, appending a new line at quantity 1
    /// if there is none.
    pub fn add(&mut self, product: &Product) {
        match self.position(product.sku().as_str()) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.lines.push(CartLine::new(product, 1)),
        }
    }

    /// Remove the line for `sku`. Returns whether a line was removed.
    pub fn remove(&mut self, sku: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.sku != sku);
        self.lines.len() != before
    }

    /// Set the quantity of `sku` to exactly `quantity`; `<= 0` removes the
    /// line. Returns whether a line changed; absent SKUs are a no-op.
    pub fn set_quantity(&mut self, sku: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(sku);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.position(sku) {
            Some(idx) => {
                self.lines[idx].quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Drop every line; the distributor id is kept.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Replace the distributor id verbatim (no validation).
    pub fn set_distributor_id(&mut self, id: impl Into<String>) {
        self.distributor_id = id.into();
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `price × quantity`, unrounded.
    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Sku;

    fn product(sku: &str, name: &str, price: f64) -> Product {
        Product::new(name, Sku::new(sku).unwrap(), price).unwrap()
    }

    #[test]
    fn default_state_uses_default_distributor() {
        let state = CartState::default();
        assert!(state.is_empty());
        assert_eq!(state.distributor_id(), DEFAULT_DISTRIBUTOR_ID);
    }

    #[test]
    fn adding_same_sku_twice_increments_one_line() {
        let mut state = CartState::default();
        let widget = product("X9", "Widget", 9.99);

        state.add(&widget);
        state.add(&widget);

        assert_eq!(state.lines().len(), 1);
        assert_eq!(state.line("X9").unwrap().quantity, 2);
        assert_eq!(state.total_items(), 2);
        assert!((state.total_price() - 19.98).abs() < 1e-9);
    }

    #[test]
    fn add_twice_then_remove_empties_cart() {
        let mut state = CartState::default();
        let widget = product("X9", "Widget", 9.99);

        state.add(&widget);
        state.add(&widget);
        assert!(state.remove("X9"));

        assert!(state.is_empty());
        assert_eq!(state.total_price(), 0.0);
        assert_eq!(state.total_items(), 0);
    }

    #[test]
    fn remove_absent_sku_is_noop() {
        let mut state = CartState::default();
        state.add(&product("A1", "Alpha", 1.0));

        assert!(!state.remove("NOPE"));
        assert_eq!(state.lines().len(), 1);
    }

    #[test]
    fn set_quantity_is_absolute() {
        let mut state = CartState::default();
        state.add(&product("A1", "Alpha", 2.5));

        assert!(state.set_quantity("A1", 5));
        assert_eq!(state.line("A1").unwrap().quantity, 5);
        assert_eq!(state.total_price(), 12.5);
    }

    #[test]
    fn set_quantity_zero_or_negative_removes() {
        let mut state = CartState::default();
        state.add(&product("A1", "Alpha", 1.0));
        state.add(&product("B2", "Beta", 1.0));

        assert!(state.set_quantity("A1", 0));
        assert!(state.set_quantity("B2", -3));
        assert!(state.is_empty());
    }

    #[test]
    fn set_quantity_on_absent_sku_leaves_cart_unchanged() {
        let mut state = CartState::default();
        state.add(&product("A1", "Alpha", 1.0));
        let before = state.clone();

        assert!(!state.set_quantity("NOPE", 4));
        assert!(!state.set_quantity("NOPE", 0));
        assert_eq!(state, before);
    }

    #[test]
    fn clear_keeps_distributor() {
        let mut state = CartState::new("555");
        state.add(&product("A1", "Alpha", 1.0));

        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.distributor_id(), "555");
    }

    #[test]
    fn distributor_id_is_verbatim() {
        let mut state = CartState::default();
        state.set_distributor_id("  id with spaces&x=1 ");
        assert_eq!(state.distributor_id(), "  id with spaces&x=1 ");
    }

    #[test]
    fn from_lines_restores_invariants() {
        let alpha = product("A1", "Alpha", 1.0);
        let beta = product("B2", "Beta", 2.0);
        let state = CartState::from_lines(
            vec![
                CartLine::new(&alpha, 2),
                CartLine::new(&beta, 0),
                CartLine::new(&alpha, 3),
            ],
            "42",
        );

        assert_eq!(state.lines().len(), 1);
        assert_eq!(state.line("A1").unwrap().quantity, 5);
        assert_eq!(state.distributor_id(), "42");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(usize),
            Remove(usize),
            Update(usize, i64),
            Clear,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (0usize..5).prop_map(Op::Add),
                2 => (0usize..6).prop_map(Op::Remove),
                3 => ((0usize..6), -2i64..6).prop_map(|(i, q)| Op::Update(i, q)),
                1 => Just(Op::Clear),
            ]
        }

        fn catalog() -> Vec<Product> {
            (0..5)
                .map(|i| product(&format!("S{i}"), &format!("Item {i}"), 1.25 * (i + 1) as f64))
                .collect()
        }

        proptest! {
            /// Property: totals match the lines and invariants hold after every operation.
            #[test]
            fn invariants_hold_after_every_operation(ops in proptest::collection::vec(op(), 0..60)) {
                let products = catalog();
                let mut state = CartState::default();

                for op in ops {
                    match op {
                        Op::Add(i) => state.add(&products[i]),
                        Op::Remove(i) => { state.remove(&format!("S{i}")); }
                        Op::Update(i, q) => { state.set_quantity(&format!("S{i}"), q); }
                        Op::Clear => state.clear(),
                    }

                    let expected_items: u64 = state.lines().iter().map(|l| u64::from(l.quantity)).sum();
                    prop_assert_eq!(state.total_items(), expected_items);

                    let expected_price: f64 = state.lines().iter().map(|l| l.price * f64::from(l.quantity)).sum();
                    prop_assert!((state.total_price() - expected_price).abs() < 1e-9);

                    let mut skus: Vec<&str> = state.lines().iter().map(|l| l.sku.as_str()).collect();
                    let count = skus.len();
                    skus.sort();
                    skus.dedup();
                    prop_assert_eq!(skus.len(), count);
                    prop_assert!(state.lines().iter().all(|l| l.quantity >= 1));
                    prop_assert_eq!(state.distributor_id(), DEFAULT_DISTRIBUTOR_ID);
                }
            }
        }
    }
}
