//! # Service Cart
//!
//! The in-memory cart of selected services for one booking session.
//!
//! ## Invariants
//! - Lines are unique by `service_id`; re-adding a service replaces its
//!   quantity, it never duplicates the line or accumulates
//! - Quantity is always >= 1; anything lower routes to removal
//! - Insertion order is preserved for display
//! - Maximum lines: 100; maximum quantity per line: 999
//!
//! The cart is the single source of truth for the (services, total,
//! duration) bundle handed to the slot selection workflow, and has no side
//! effects beyond its own state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::duration::Minutes;
use crate::error::ValidationError;
use crate::money::Amount;
use crate::types::{CartLine, Service};
use crate::validation::{validate_cart_size, validate_quantity};

// =============================================================================
// Cart
// =============================================================================

/// Ordered collection of selected service lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCart {
    lines: Vec<CartLine>,
}

impl ServiceCart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        ServiceCart { lines: Vec::new() }
    }

    /// Rebuilds a cart from persisted draft lines, preserving order.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        ServiceCart { lines }
    }

    /// Adds a service with the given quantity, or replaces the quantity of
    /// the existing line for the same service.
    ///
    /// ## Behavior
    /// - Quantity < 1 routes to [`ServiceCart::remove`]
    /// - Same service id never produces a second line
    /// - Price and name are frozen from the catalog at the time of adding
    ///
    /// ## Example
    /// ```rust
    /// use reserva_core::cart::ServiceCart;
    /// use reserva_core::types::Service;
    /// use reserva_core::{Amount, Minutes};
    ///
    /// let corte = Service {
    ///     id: "svc-1".into(),
    ///     name: "Corte".into(),
    ///     price: Amount::from_cents(250000),
    ///     duration: Minutes::new(45),
    /// };
    ///
    /// let mut cart = ServiceCart::new();
    /// cart.add_or_set_quantity(&corte, 3).unwrap();
    /// cart.add_or_set_quantity(&corte, 3).unwrap();
    /// assert_eq!(cart.line_count(), 1);
    /// assert_eq!(cart.total_quantity(), 3);
    /// ```
    pub fn add_or_set_quantity(
        &mut self,
        service: &Service,
        quantity: i64,
    ) -> Result<(), ValidationError> {
        if quantity < 1 {
            self.remove(&service.id);
            return Ok(());
        }
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.service_id == service.id) {
            line.quantity = quantity;
            return Ok(());
        }

        validate_cart_size(self.lines.len())?;
        self.lines.push(CartLine {
            service_id: service.id.clone(),
            name: service.name.clone(),
            unit_price: service.price,
            unit_duration: service.duration,
            quantity,
        });
        Ok(())
    }

    /// Sets the quantity of an existing line. Same routing rule as
    /// [`ServiceCart::add_or_set_quantity`]: below 1 removes. Unknown ids
    /// are a no-op, matching removal semantics.
    pub fn update_quantity(
        &mut self,
        service_id: &str,
        quantity: i64,
    ) -> Result<(), ValidationError> {
        if quantity < 1 {
            self.remove(service_id);
            return Ok(());
        }
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.service_id == service_id) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Drops the line for a service. No-op when absent.
    pub fn remove(&mut self, service_id: &str) {
        self.lines.retain(|l| l.service_id != service_id);
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities over all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Total price: Σ unit_price × quantity.
    pub fn total_price(&self) -> Amount {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total duration: Σ unit_duration × quantity.
    pub fn total_duration(&self) -> Minutes {
        self.lines.iter().map(CartLine::line_duration).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.lines.iter().any(|l| l.service_id == service_id)
    }
}

// =============================================================================
// Summary Projection
// =============================================================================

/// Cart summary for the UI boundary: the lines plus derived totals.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub line_count: usize,
    pub total_quantity: i64,
    pub total_price: Amount,
    pub total_duration: Minutes,
}

impl From<&ServiceCart> for CartSummary {
    fn from(cart: &ServiceCart) -> Self {
        CartSummary {
            lines: cart.lines.clone(),
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            total_price: cart.total_price(),
            total_duration: cart.total_duration(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
