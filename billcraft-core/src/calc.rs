//! Invoice financial calculation engine.
//!
//! Pure, synchronous derivation of all monetary totals for an invoice
//! draft. Runs on every field edit, so it takes a full snapshot of the
//! line items and produces a full new totals value; nothing here is
//! incremental or stateful.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::invoice::{InvoiceItem, InvoiceItemInput};

/// The three numbers the calculator needs from a line item, borrowed
/// from whichever representation the caller holds (form input or
/// persisted row).
#[derive(Debug, Clone, Copy)]
pub struct LineAmounts {
    pub quantity: Decimal,
    /// `None` means "not yet entered" and contributes zero
    pub unit_price: Option<Decimal>,
    /// Fraction in [0,1] expected, but not clamped
    pub discount_rate: Decimal,
}

impl From<&InvoiceItemInput> for LineAmounts {
    fn from(item: &InvoiceItemInput) -> Self {
        LineAmounts {
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount_rate: item.discount_rate,
        }
    }
}

impl From<&InvoiceItem> for LineAmounts {
    fn from(item: &InvoiceItem) -> Self {
        LineAmounts {
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount_rate: item.discount_rate,
        }
    }
}

/// All derived monetary figures for an invoice draft.
///
/// Every field is fully recomputed on each call; a totals value is
/// never partially stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of raw line amounts, before any discount
    pub subtotal: Decimal,

    /// Sum of per-line discount amounts
    pub line_discount_total: Decimal,

    /// Tax on the post-line-discount subtotal
    pub tax_amount: Decimal,

    /// `subtotal - line_discount_total + tax_amount - additional_discount`
    pub grand_total: Decimal,

    /// Per-line totals, in item order
    pub line_totals: Vec<Decimal>,
}

/// Derived total for a single line:
/// `quantity * (unit_price ?? 0) * (1 - discount_rate)`.
pub fn line_total(quantity: Decimal, unit_price: Option<Decimal>, discount_rate: Decimal) -> Decimal {
    let raw = quantity * unit_price.unwrap_or(Decimal::ZERO);
    raw - raw * discount_rate
}

/// Computes all invoice totals from a snapshot of line items.
///
/// The step order is fixed: raw line amounts, per-line discounts,
/// subtotal, line discount total, tax on the discounted subtotal, then
/// the flat `additional_discount` subtracted last (after tax). Tax is
/// charged on the post-line-discount amount; the flat discount does
/// not reduce the taxable base.
///
/// Never fails. Out-of-range rates and negative discounts flow through
/// arithmetically; range validation is a caller concern. Zero items
/// degenerates to zeroes minus `additional_discount`.
pub fn compute_totals(
    items: &[LineAmounts],
    global_tax_rate: Decimal,
    additional_discount: Decimal,
) -> InvoiceTotals {
    let mut subtotal = Decimal::ZERO;
    let mut line_discount_total = Decimal::ZERO;
    let mut line_totals = Vec::with_capacity(items.len());

    for item in items {
        let raw = item.quantity * item.unit_price.unwrap_or(Decimal::ZERO);
        let discount = raw * item.discount_rate;
        subtotal += raw;
        line_discount_total += discount;
        line_totals.push(raw - discount);
    }

    let subtotal_after_line_discounts = subtotal - line_discount_total;
    let tax_amount = subtotal_after_line_discounts * global_tax_rate;
    let grand_total = subtotal_after_line_discounts + tax_amount - additional_discount;

    InvoiceTotals {
        subtotal,
        line_discount_total,
        tax_amount,
        grand_total,
        line_totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal, unit_price: Option<Decimal>, discount_rate: Decimal) -> LineAmounts {
        LineAmounts {
            quantity,
            unit_price,
            discount_rate,
        }
    }

    #[test]
    fn plain_item_with_tax() {
        // One item, qty 2 @ 100, 8% tax
        let items = [line(dec!(2), Some(dec!(100)), Decimal::ZERO)];
        let totals = compute_totals(&items, dec!(0.08), Decimal::ZERO);

        assert_eq!(totals.subtotal, dec!(200));
        assert_eq!(totals.line_discount_total, dec!(0));
        assert_eq!(totals.tax_amount, dec!(16.00));
        assert_eq!(totals.grand_total, dec!(216.00));
        assert_eq!(totals.line_totals, vec![dec!(200)]);
    }

    #[test]
    fn line_discount_reduces_taxable_base() {
        // qty 1 @ 100 with a 10% line discount, 8% tax
        let items = [line(dec!(1), Some(dec!(100)), dec!(0.10))];
        let totals = compute_totals(&items, dec!(0.08), Decimal::ZERO);

        assert_eq!(totals.subtotal, dec!(100));
        assert_eq!(totals.line_discount_total, dec!(10.00));
        assert_eq!(totals.line_totals, vec![dec!(90.00)]);
        // Tax is charged on 90, not 100
        assert_eq!(totals.tax_amount, dec!(7.2000));
        assert_eq!(totals.grand_total, dec!(97.2000));
    }

    #[test]
    fn tax_equal_for_equal_post_discount_subtotals() {
        // Two drafts with identical post-discount subtotals must be
        // taxed identically, whether the discount came from the line
        // or the price.
        let discounted = [line(dec!(1), Some(dec!(100)), dec!(0.10))];
        let plain = [line(dec!(1), Some(dec!(90)), Decimal::ZERO)];

        let a = compute_totals(&discounted, dec!(0.08), Decimal::ZERO);
        let b = compute_totals(&plain, dec!(0.08), Decimal::ZERO);
        assert_eq!(a.tax_amount.normalize(), b.tax_amount.normalize());
    }

    #[test]
    fn null_price_contributes_zero() {
        let items = [
            line(dec!(1), Some(dec!(50)), Decimal::ZERO),
            line(dec!(1), None, Decimal::ZERO),
        ];
        let totals = compute_totals(&items, Decimal::ZERO, Decimal::ZERO);

        assert_eq!(totals.subtotal, dec!(50));
        assert_eq!(totals.grand_total, dec!(50));
        assert_eq!(totals.line_totals, vec![dec!(50), dec!(0)]);
    }

    #[test]
    fn additional_discount_is_not_clamped() {
        // A flat discount larger than the pre-discount total goes
        // negative; the calculator does not clamp.
        let items = [line(dec!(1), Some(dec!(100)), Decimal::ZERO)];
        let totals = compute_totals(&items, Decimal::ZERO, dec!(500));

        assert_eq!(totals.grand_total, dec!(-400));
    }

    #[test]
    fn zero_items_degenerate_to_zero() {
        let totals = compute_totals(&[], dec!(0.08), dec!(25));

        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.line_discount_total, Decimal::ZERO);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.grand_total, dec!(-25));
        assert!(totals.line_totals.is_empty());
    }

    #[test]
    fn grand_total_identity_holds() {
        let items = [
            line(dec!(3), Some(dec!(19.99)), dec!(0.05)),
            line(dec!(1.5), Some(dec!(80)), Decimal::ZERO),
            line(dec!(2), None, dec!(1)),
        ];
        let totals = compute_totals(&items, dec!(0.2), dec!(10));

        assert_eq!(
            totals.grand_total,
            totals.subtotal - totals.line_discount_total + totals.tax_amount - dec!(10)
        );
    }

    #[test]
    fn idempotent_for_identical_input() {
        let items = [
            line(dec!(2), Some(dec!(33.33)), dec!(0.15)),
            line(dec!(7), Some(dec!(0.01)), Decimal::ZERO),
        ];
        let a = compute_totals(&items, dec!(0.0825), dec!(1.50));
        let b = compute_totals(&items, dec!(0.0825), dec!(1.50));
        assert_eq!(a, b);
    }

    #[test]
    fn line_total_never_exceeds_raw_amount() {
        for (qty, price, rate) in [
            (dec!(1), dec!(100), dec!(0)),
            (dec!(4), dec!(25.50), dec!(0.5)),
            (dec!(10), dec!(3), dec!(1)),
        ] {
            let total = line_total(qty, Some(price), rate);
            assert!(total <= qty * price);
            assert_eq!(total, qty * price * (Decimal::ONE - rate));
        }
    }
}
