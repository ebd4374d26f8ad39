//! Invoice model.
//!
//! An invoice is the settlement artifact produced once, when a venue
//! finalizes a completed shift's hours. It is immutable after creation;
//! the engine hands it off to the external invoicing collaborator.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line item on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// The shift this line settles.
    pub shift_id: String,
    /// Role worked.
    pub role: String,
    /// Date the shift started on.
    pub date: NaiveDate,
    /// Final agreed billable hours.
    pub hours: Decimal,
    /// Hourly rate applied.
    pub rate: Decimal,
    /// `hours * rate`, rounded to cents.
    pub subtotal: Decimal,
}

/// The settlement artifact for one or more completed shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique invoice id.
    pub id: String,
    /// The venue being invoiced.
    pub venue_id: String,
    /// Line items, one per covered shift.
    pub line_items: Vec<InvoiceLine>,
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// Platform service fee on the subtotal.
    pub service_fee: Decimal,
    /// Amount payable: subtotal plus service fee less any discount.
    pub total: Decimal,
    /// Ids of the shifts this invoice covers.
    pub shift_ids: Vec<String>,
    /// When the invoice was issued.
    pub issued_at: DateTime<Utc>,
}
