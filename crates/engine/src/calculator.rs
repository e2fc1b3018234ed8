//! Line amount derivation for quotation lines.
//!
//! A line's amount is never edited directly. It is recomputed from the other
//! fields whenever one of the formula's inputs changes.

use crate::{MoneyCents, numeric::soft_number};

/// Editable fields of a quotation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineField {
    Item,
    Size,
    Unit,
    Quantity,
    Rate,
    Discount,
    Tax,
}

impl LineField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Size => "Size",
            Self::Unit => "Unit",
            Self::Quantity => "Qty",
            Self::Rate => "Rate",
            Self::Discount => "Discount %",
            Self::Tax => "Tax %",
        }
    }

    /// Fields whose text is sanitized as a decimal on every keystroke.
    pub fn is_decimal(self) -> bool {
        matches!(
            self,
            Self::Quantity | Self::Rate | Self::Discount | Self::Tax
        )
    }
}

/// How a line amount is derived.
///
/// Quotation creation and quotation editing historically use different
/// formulas. Both are kept; every draft states which one it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountFormula {
    /// `qty × rate`, minus `discount%`, plus `tax%` on the discounted value.
    #[default]
    DiscountTax,
    /// `size × qty × rate`. Discount and tax are carried but not applied.
    SizeMultiplier,
}

/// Raw text of the numeric inputs of one line.
#[derive(Debug, Clone, Copy)]
pub struct LineInputs<'a> {
    pub quantity: &'a str,
    pub rate: &'a str,
    pub discount: &'a str,
    pub tax: &'a str,
    pub size: &'a str,
}

impl AmountFormula {
    /// Whether editing `field` re-triggers the amount computation.
    pub fn recomputes_on(self, field: LineField) -> bool {
        match self {
            Self::DiscountTax => matches!(
                field,
                LineField::Quantity | LineField::Rate | LineField::Discount | LineField::Tax
            ),
            Self::SizeMultiplier => matches!(
                field,
                LineField::Quantity | LineField::Rate | LineField::Size
            ),
        }
    }

    /// Computes the amount, rounded to the cent.
    ///
    /// Unreadable inputs count as 0, except the size multiplier which counts
    /// as 1.
    pub fn amount(self, inputs: LineInputs<'_>) -> MoneyCents {
        let quantity = soft_number(inputs.quantity, 0.0);
        let rate = soft_number(inputs.rate, 0.0);
        let value = match self {
            Self::DiscountTax => {
                let discount = soft_number(inputs.discount, 0.0);
                let tax = soft_number(inputs.tax, 0.0);
                discount_tax_amount(quantity, rate, discount, tax)
            }
            Self::SizeMultiplier => {
                let size = soft_number(inputs.size, 1.0);
                size * quantity * rate
            }
        };
        MoneyCents::from_major(value)
    }
}

fn discount_tax_amount(quantity: f64, rate: f64, discount: f64, tax: f64) -> f64 {
    let before_tax = quantity * rate;
    let after_discount = before_tax - before_tax * discount / 100.0;
    after_discount + after_discount * tax / 100.0
}
