//! Quotation form state: header fields, ordered lines with derived amounts,
//! validation into request bodies, and the line removal flow.
//!
//! Line removal has two paths. A line the server has never seen is dropped
//! locally, unless it is the last one. A persisted line goes through a
//! confirmation step:
//!
//! ```text
//! request_removal ──► awaiting confirmation ──confirm_removal──► delete call
//!                          │                                        │
//!                     cancel_removal                      ok: complete_removal
//!                          ▼                              err: unchanged
//!                        idle
//! ```

use api_types::{
    item::ItemView,
    quotation::{
        QuotationNew, QuotationStatus, QuotationSubPayload, QuotationSubView, QuotationUpdate,
        QuotationView,
    },
};
use chrono::NaiveDate;

use crate::{
    EngineError, MoneyCents, ResultEngine,
    calculator::{AmountFormula, LineField, LineInputs},
    form::FieldErrors,
    numeric::{leading_number, sanitize_decimal, soft_number},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header fields of the quotation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationField {
    Date,
    Buyer,
    ValidUntil,
    Remarks,
}

impl QuotationField {
    /// Wire name of the field, also the key of its validation errors.
    pub fn key(self) -> &'static str {
        match self {
            Self::Date => "quotation_date",
            Self::Buyer => "quotation_buyer_id",
            Self::ValidUntil => "quotation_valid_date",
            Self::Remarks => "quotation_remarks",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Buyer => "Buyer",
            Self::ValidUntil => "Valid until",
            Self::Remarks => "Remarks",
        }
    }
}

/// Error key of a line field, e.g. `item_0_qnty`.
pub fn line_error_key(index: usize, field: LineField) -> String {
    let suffix = match field {
        LineField::Item => "id",
        LineField::Size => "size",
        LineField::Unit => "unit",
        LineField::Quantity => "qnty",
        LineField::Rate => "rate",
        LineField::Discount => "discount",
        LineField::Tax => "tax",
    };
    format!("item_{index}_{suffix}")
}

/// Text state of one quotation line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineDraft {
    /// Server identity; `None` until the line has been saved.
    pub id: Option<u64>,
    pub item_id: String,
    pub size: String,
    pub unit: String,
    pub quantity: String,
    pub rate: String,
    pub discount: String,
    pub tax: String,
    amount: String,
}

impl LineDraft {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_view(sub: &QuotationSubView) -> Self {
        Self {
            id: Some(sub.id),
            item_id: sub.quotation_sub_item_id.to_string(),
            size: sub.quotation_sub_size.clone().unwrap_or_default(),
            unit: sub.quotation_sub_unit.clone().unwrap_or_default(),
            quantity: number_text(sub.quotation_sub_qnty),
            rate: number_text(sub.quotation_sub_rate),
            discount: number_text(sub.quotation_sub_discount),
            tax: number_text(sub.quotation_sub_tax),
            amount: MoneyCents::from_major(sub.quotation_sub_amount).to_string(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Derived amount, always formatted with two decimals once computed.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn field(&self, field: LineField) -> &str {
        match field {
            LineField::Item => &self.item_id,
            LineField::Size => &self.size,
            LineField::Unit => &self.unit,
            LineField::Quantity => &self.quantity,
            LineField::Rate => &self.rate,
            LineField::Discount => &self.discount,
            LineField::Tax => &self.tax,
        }
    }

    fn field_mut(&mut self, field: LineField) -> &mut String {
        match field {
            LineField::Item => &mut self.item_id,
            LineField::Size => &mut self.size,
            LineField::Unit => &mut self.unit,
            LineField::Quantity => &mut self.quantity,
            LineField::Rate => &mut self.rate,
            LineField::Discount => &mut self.discount,
            LineField::Tax => &mut self.tax,
        }
    }

    fn inputs(&self) -> LineInputs<'_> {
        LineInputs {
            quantity: &self.quantity,
            rate: &self.rate,
            discount: &self.discount,
            tax: &self.tax,
            size: &self.size,
        }
    }

    fn recompute(&mut self, formula: AmountFormula) {
        self.amount = formula.amount(self.inputs()).to_string();
    }

    fn amount_cents(&self) -> MoneyCents {
        MoneyCents::from_major(soft_number(&self.amount, 0.0))
    }
}

/// Pending confirmation for removing a persisted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRemoval {
    pub index: usize,
    pub id: u64,
}

/// Result of asking to remove a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The line was dropped locally.
    Removed,
    /// The line is the only one left and stays.
    Kept,
    /// The line exists on the server; the user must confirm first.
    AwaitingConfirmation(PendingRemoval),
}

/// Text state of the quotation create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationDraft {
    /// Server reference: the preview on create, the stored one on edit.
    pub reference: Option<String>,
    pub date: String,
    pub buyer_id: String,
    pub valid_until: String,
    pub remarks: String,
    pub status: QuotationStatus,
    lines: Vec<LineDraft>,
    formula: AmountFormula,
    pending_removal: Option<PendingRemoval>,
}

impl QuotationDraft {
    /// Empty create form dated `today`, with one blank line.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            reference: None,
            date: today.format(DATE_FORMAT).to_string(),
            buyer_id: String::new(),
            valid_until: String::new(),
            remarks: String::new(),
            status: QuotationStatus::Pending,
            lines: vec![LineDraft::blank()],
            formula: AmountFormula::DiscountTax,
            pending_removal: None,
        }
    }

    /// Edit form for a stored quotation.
    pub fn from_view(view: &QuotationView, today: NaiveDate) -> Self {
        let mut lines: Vec<LineDraft> = view.subs.iter().map(LineDraft::from_view).collect();
        if lines.is_empty() {
            lines.push(LineDraft::blank());
        }
        Self {
            reference: Some(view.quotation_ref.clone()),
            date: view
                .quotation_date
                .unwrap_or(today)
                .format(DATE_FORMAT)
                .to_string(),
            buyer_id: view.quotation_buyer_id.to_string(),
            valid_until: view
                .quotation_valid_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            remarks: view.quotation_remarks.clone().unwrap_or_default(),
            status: view.quotation_status,
            lines,
            formula: AmountFormula::SizeMultiplier,
            pending_removal: None,
        }
    }

    /// Overrides the amount formula, recomputing every line.
    pub fn with_formula(mut self, formula: AmountFormula) -> Self {
        self.formula = formula;
        for line in &mut self.lines {
            line.recompute(formula);
        }
        self
    }

    pub fn formula(&self) -> AmountFormula {
        self.formula
    }

    pub fn lines(&self) -> &[LineDraft] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&LineDraft> {
        self.lines.get(index)
    }

    pub fn field(&self, field: QuotationField) -> &str {
        match field {
            QuotationField::Date => &self.date,
            QuotationField::Buyer => &self.buyer_id,
            QuotationField::ValidUntil => &self.valid_until,
            QuotationField::Remarks => &self.remarks,
        }
    }

    pub fn set_field(&mut self, field: QuotationField, value: &str) {
        let slot = match field {
            QuotationField::Date => &mut self.date,
            QuotationField::Buyer => &mut self.buyer_id,
            QuotationField::ValidUntil => &mut self.valid_until,
            QuotationField::Remarks => &mut self.remarks,
        };
        *slot = value.to_string();
    }

    pub fn add_line(&mut self) {
        self.lines.push(LineDraft::blank());
    }

    /// Edits one line field and recomputes the amount when the formula
    /// depends on it. Numeric fields are sanitized.
    pub fn set_line_field(
        &mut self,
        index: usize,
        field: LineField,
        value: &str,
    ) -> ResultEngine<()> {
        let formula = self.formula;
        let line = self
            .lines
            .get_mut(index)
            .ok_or(EngineError::LineNotFound(index))?;
        *line.field_mut(field) = if field.is_decimal() {
            sanitize_decimal(value)
        } else {
            value.to_string()
        };
        if formula.recomputes_on(field) {
            line.recompute(formula);
        }
        Ok(())
    }

    /// Points a line at a catalog item. Rate, size and unit are reset from the
    /// item; the amount is recomputed if a quantity is already present.
    pub fn select_item(&mut self, index: usize, item: &ItemView) -> ResultEngine<()> {
        let formula = self.formula;
        let line = self
            .lines
            .get_mut(index)
            .ok_or(EngineError::LineNotFound(index))?;
        line.item_id = item.id.to_string();
        line.rate = number_text(item.item_price);
        line.size = item.item_size.clone().unwrap_or_default();
        line.unit = item.item_unit.clone().unwrap_or_default();
        if !line.quantity.is_empty() {
            line.recompute(formula);
        }
        Ok(())
    }

    /// Sum of the line amounts.
    pub fn total(&self) -> MoneyCents {
        self.lines.iter().map(LineDraft::amount_cents).sum()
    }

    pub fn pending_removal(&self) -> Option<PendingRemoval> {
        self.pending_removal
    }

    /// Asks to remove the line at `index`.
    pub fn request_removal(&mut self, index: usize) -> ResultEngine<Removal> {
        let line = self
            .lines
            .get(index)
            .ok_or(EngineError::LineNotFound(index))?;
        if let Some(id) = line.id {
            let pending = PendingRemoval { index, id };
            self.pending_removal = Some(pending);
            return Ok(Removal::AwaitingConfirmation(pending));
        }
        if self.lines.len() <= 1 {
            return Ok(Removal::Kept);
        }
        self.lines.remove(index);
        Ok(Removal::Removed)
    }

    /// Drops the pending confirmation without touching any line.
    pub fn cancel_removal(&mut self) {
        self.pending_removal = None;
    }

    /// Confirms the pending removal. Returns the line identity the delete call
    /// must target; the line stays until [`complete_removal`] runs.
    ///
    /// [`complete_removal`]: QuotationDraft::complete_removal
    pub fn confirm_removal(&self) -> ResultEngine<PendingRemoval> {
        self.pending_removal.ok_or(EngineError::NoPendingRemoval)
    }

    /// Applies a successful server delete: the line leaves the form. A form
    /// never ends up without lines; a blank one replaces the last.
    pub fn complete_removal(&mut self) -> ResultEngine<()> {
        let pending = self
            .pending_removal
            .take()
            .ok_or(EngineError::NoPendingRemoval)?;
        let position = self
            .lines
            .iter()
            .position(|line| line.id == Some(pending.id))
            .ok_or(EngineError::LineNotFound(pending.index))?;
        self.lines.remove(position);
        if self.lines.is_empty() {
            self.lines.push(LineDraft::blank());
        }
        Ok(())
    }

    /// Validates the form into a create body.
    pub fn validate_new(&self) -> Result<QuotationNew, FieldErrors> {
        let header = self.validate_header()?;
        Ok(QuotationNew {
            quotation_ref: self.reference.clone(),
            quotation_date: header.date,
            quotation_buyer_id: header.buyer_id,
            quotation_valid_date: header.valid_until,
            quotation_remarks: self.remarks.trim().to_string(),
            subs: header.subs,
        })
    }

    /// Validates the form into an update body.
    pub fn validate_update(&self) -> Result<QuotationUpdate, FieldErrors> {
        let header = self.validate_header()?;
        Ok(QuotationUpdate {
            quotation_date: header.date,
            quotation_buyer_id: header.buyer_id,
            quotation_valid_date: header.valid_until,
            quotation_remarks: self.remarks.trim().to_string(),
            quotation_status: self.status,
            subs: header.subs,
        })
    }

    fn validate_header(&self) -> Result<ValidHeader, FieldErrors> {
        let mut errors = FieldErrors::new();

        let buyer_id = self.buyer_id.trim();
        let buyer = if buyer_id.is_empty() {
            errors.insert(QuotationField::Buyer.key(), "Buyer is required");
            None
        } else {
            let parsed = buyer_id.parse::<u64>().ok();
            if parsed.is_none() {
                errors.insert(QuotationField::Buyer.key(), "Buyer must be selected from the list");
            }
            parsed
        };

        let valid_until = self.valid_until.trim();
        let valid = if valid_until.is_empty() {
            errors.insert(QuotationField::ValidUntil.key(), "Valid date is required");
            None
        } else {
            let parsed = parse_date(valid_until);
            if parsed.is_none() {
                errors.insert(
                    QuotationField::ValidUntil.key(),
                    "Valid date must be a date (YYYY-MM-DD)",
                );
            }
            parsed
        };

        let date = parse_date(self.date.trim());
        if date.is_none() {
            errors.insert(
                QuotationField::Date.key(),
                "Date must be a date (YYYY-MM-DD)",
            );
        }

        if self.lines.is_empty() {
            errors.insert("items", "At least one item is required");
        }

        let mut subs = Vec::with_capacity(self.lines.len());
        for (index, line) in self.lines.iter().enumerate() {
            let item_id = line.item_id.trim();
            let item = if item_id.is_empty() {
                errors.insert(line_error_key(index, LineField::Item), "Item is required");
                None
            } else {
                let parsed = item_id.parse::<u64>().ok();
                if parsed.is_none() {
                    errors.insert(
                        line_error_key(index, LineField::Item),
                        "Item must be selected from the catalog",
                    );
                }
                parsed
            };
            if line.quantity.trim().is_empty() {
                errors.insert(
                    line_error_key(index, LineField::Quantity),
                    "Quantity is required",
                );
            }
            if line.rate.trim().is_empty() {
                errors.insert(line_error_key(index, LineField::Rate), "Rate is required");
            }

            if let Some(item_id) = item {
                subs.push(QuotationSubPayload {
                    id: line.id,
                    quotation_sub_item_id: item_id,
                    quotation_sub_size: line.size.trim().to_string(),
                    quotation_sub_unit: line.unit.trim().to_string(),
                    quotation_sub_qnty: leading_number(&line.quantity).unwrap_or_default(),
                    quotation_sub_rate: leading_number(&line.rate).unwrap_or_default(),
                    quotation_sub_discount: soft_number(&line.discount, 0.0),
                    quotation_sub_tax: soft_number(&line.tax, 0.0),
                    quotation_sub_amount: line.amount_cents().to_major(),
                });
            }
        }

        match (errors.is_empty(), buyer, valid, date) {
            (true, Some(buyer_id), Some(valid_until), Some(date)) => Ok(ValidHeader {
                date,
                buyer_id,
                valid_until,
                subs,
            }),
            _ => Err(errors),
        }
    }
}

struct ValidHeader {
    date: NaiveDate,
    buyer_id: u64,
    valid_until: NaiveDate,
    subs: Vec<QuotationSubPayload>,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Stored number as editable text: `0` becomes empty, integers lose `.0`.
fn number_text(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use api_types::item::ItemStatus;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn catalog_item(id: u64, price: f64, size: Option<&str>) -> ItemView {
        ItemView {
            id,
            item_name: format!("Item {id}"),
            item_type: None,
            item_description: None,
            item_price: price,
            item_tax: 18.0,
            item_size: size.map(str::to_string),
            item_unit: Some("pcs".to_string()),
            item_status: ItemStatus::Active,
        }
    }

    fn stored_quotation() -> QuotationView {
        let sub = |id: u64, qty: f64| QuotationSubView {
            id,
            quotation_sub_item_id: 9,
            quotation_sub_size: Some("2".to_string()),
            quotation_sub_unit: Some("m".to_string()),
            quotation_sub_qnty: qty,
            quotation_sub_rate: 5.0,
            quotation_sub_discount: 0.0,
            quotation_sub_tax: 0.0,
            quotation_sub_amount: 2.0 * qty * 5.0,
        };
        QuotationView {
            id: 1,
            quotation_ref: "QT-0042".to_string(),
            quotation_date: Some(today()),
            quotation_buyer_id: 4,
            quotation_valid_date: NaiveDate::from_ymd_opt(2026, 4, 14),
            quotation_remarks: None,
            quotation_status: QuotationStatus::Pending,
            subs: vec![sub(100, 1.0), sub(101, 3.0)],
        }
    }

    #[test]
    fn create_form_recomputes_with_discount_and_tax() {
        let mut draft = QuotationDraft::new(today());
        draft.set_line_field(0, LineField::Quantity, "2").unwrap();
        draft.set_line_field(0, LineField::Rate, "100").unwrap();
        assert_eq!(draft.lines()[0].amount(), "200.00");

        draft.set_line_field(0, LineField::Discount, "10").unwrap();
        draft.set_line_field(0, LineField::Tax, "18").unwrap();
        assert_eq!(draft.lines()[0].amount(), "212.40");
    }

    #[test]
    fn edit_form_uses_size_multiplier() {
        let mut draft = QuotationDraft::from_view(&stored_quotation(), today());
        assert_eq!(draft.formula(), AmountFormula::SizeMultiplier);
        assert_eq!(draft.lines()[1].amount(), "30.00");

        draft.set_line_field(1, LineField::Discount, "50").unwrap();
        assert_eq!(draft.lines()[1].amount(), "30.00");

        draft.set_line_field(1, LineField::Size, "").unwrap();
        assert_eq!(draft.lines()[1].amount(), "15.00");
    }

    #[test]
    fn numeric_line_fields_are_sanitized() {
        let mut draft = QuotationDraft::new(today());
        draft.set_line_field(0, LineField::Rate, "12.345").unwrap();
        assert_eq!(draft.lines()[0].rate, "12.34");
        assert!(matches!(
            draft.set_line_field(3, LineField::Rate, "1"),
            Err(EngineError::LineNotFound(3))
        ));
    }

    #[test]
    fn selecting_item_resets_rate_and_recomputes() {
        let mut draft = QuotationDraft::new(today());
        draft.select_item(0, &catalog_item(7, 40.0, None)).unwrap();
        assert_eq!(draft.lines()[0].rate, "40");
        assert_eq!(draft.lines()[0].unit, "pcs");
        assert_eq!(draft.lines()[0].amount(), "");

        draft.set_line_field(0, LineField::Quantity, "3").unwrap();
        draft.set_line_field(0, LineField::Rate, "35").unwrap();
        assert_eq!(draft.lines()[0].amount(), "105.00");

        draft.select_item(0, &catalog_item(8, 10.0, Some("2"))).unwrap();
        assert_eq!(draft.lines()[0].item_id, "8");
        assert_eq!(draft.lines()[0].size, "2");
        assert_eq!(draft.lines()[0].amount(), "30.00");
    }

    #[test]
    fn last_unpersisted_line_stays() {
        let mut draft = QuotationDraft::new(today());
        assert_eq!(draft.request_removal(0).unwrap(), Removal::Kept);
        assert_eq!(draft.lines().len(), 1);

        draft.add_line();
        assert_eq!(draft.request_removal(1).unwrap(), Removal::Removed);
        assert_eq!(draft.lines().len(), 1);
    }

    #[test]
    fn persisted_line_needs_confirmation() {
        let mut draft = QuotationDraft::from_view(&stored_quotation(), today());

        let outcome = draft.request_removal(0).unwrap();
        let pending = PendingRemoval { index: 0, id: 100 };
        assert_eq!(outcome, Removal::AwaitingConfirmation(pending));
        assert_eq!(draft.lines().len(), 2);

        assert_eq!(draft.confirm_removal().unwrap(), pending);
        // Delete call failed: nothing changes, prompt still open.
        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.pending_removal(), Some(pending));

        draft.complete_removal().unwrap();
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].id, Some(101));
        assert_eq!(draft.pending_removal(), None);
    }

    #[test]
    fn cancelled_removal_has_no_side_effects() {
        let mut draft = QuotationDraft::from_view(&stored_quotation(), today());
        draft.request_removal(1).unwrap();
        draft.cancel_removal();
        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.confirm_removal(), Err(EngineError::NoPendingRemoval));
        assert_eq!(draft.complete_removal(), Err(EngineError::NoPendingRemoval));
    }

    #[test]
    fn removing_every_persisted_line_leaves_a_blank_one() {
        let mut view = stored_quotation();
        view.subs.truncate(1);
        let mut draft = QuotationDraft::from_view(&view, today());
        draft.request_removal(0).unwrap();
        draft.complete_removal().unwrap();
        assert_eq!(draft.lines().len(), 1);
        assert!(!draft.lines()[0].is_persisted());
    }

    #[test]
    fn empty_form_reports_required_fields() {
        let draft = QuotationDraft::new(today());
        let errors = draft.validate_new().unwrap_err();
        assert_eq!(errors.get("quotation_buyer_id"), Some("Buyer is required"));
        assert_eq!(
            errors.get("quotation_valid_date"),
            Some("Valid date is required")
        );
        assert_eq!(errors.get("item_0_id"), Some("Item is required"));
        assert_eq!(errors.get("item_0_qnty"), Some("Quantity is required"));
        assert_eq!(errors.get("item_0_rate"), Some("Rate is required"));
        assert_eq!(errors.first().unwrap().field, "quotation_buyer_id");
    }

    #[test]
    fn valid_create_form_builds_body() {
        let mut draft = QuotationDraft::new(today());
        draft.reference = Some("QT-0043".to_string());
        draft.set_field(QuotationField::Buyer, "4");
        draft.set_field(QuotationField::ValidUntil, "2026-04-01");
        draft.select_item(0, &catalog_item(7, 50.0, None)).unwrap();
        draft.set_line_field(0, LineField::Quantity, "2").unwrap();

        let body = draft.validate_new().unwrap();
        assert_eq!(body.quotation_ref.as_deref(), Some("QT-0043"));
        assert_eq!(body.quotation_buyer_id, 4);
        assert_eq!(body.subs.len(), 1);
        let sub = &body.subs[0];
        assert_eq!(sub.id, None);
        assert_eq!(sub.quotation_sub_discount, 0.0);
        assert_eq!(sub.quotation_sub_tax, 0.0);
        assert_eq!(sub.quotation_sub_amount, 100.0);
        assert_eq!(draft.total().to_string(), "100.00");
    }

    #[test]
    fn update_body_keeps_line_identities() {
        let mut draft = QuotationDraft::from_view(&stored_quotation(), today());
        draft.add_line();
        draft.select_item(2, &catalog_item(7, 50.0, None)).unwrap();
        draft.set_line_field(2, LineField::Quantity, "1").unwrap();
        draft.status = QuotationStatus::Accepted;

        let body = draft.validate_update().unwrap();
        let ids: Vec<_> = body.subs.iter().map(|sub| sub.id).collect();
        assert_eq!(ids, [Some(100), Some(101), None]);
        assert_eq!(body.quotation_status, QuotationStatus::Accepted);
        assert_eq!(body.subs[2].quotation_sub_amount, 50.0);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let mut draft = QuotationDraft::new(today());
        draft.set_field(QuotationField::ValidUntil, "next week");
        draft.set_field(QuotationField::Date, "");
        let errors = draft.validate_new().unwrap_err();
        assert_eq!(
            errors.get("quotation_valid_date"),
            Some("Valid date must be a date (YYYY-MM-DD)")
        );
        assert!(errors.get("quotation_date").is_some());
    }
}
