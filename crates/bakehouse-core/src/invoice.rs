//! # Invoice Layout
//!
//! Pure formatting of a committed [`Bill`] and the issuing tenant's
//! [`TenantProfile`] into a paginated document. No PDF, no I/O: the
//! document is plain data that a client can draw, plus a text rendering.
//!
//! ## Document Shape
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               BAKER'S INVOICE                │  title
//! │ Sweet Crumbs                                 │  issuer block
//! │ 12 MG Road, Pune - 411001                    │  (placeholders when blank)
//! │ Phone: +91 98765 43210 | Email: hi@sc.in     │
//! │ Bill No: BILL-1710000000000                  │
//! │ Date: 09/03/2024                             │
//! │ Bill To: ...                                 │  only with customer details
//! ├──────────────────────────────────────────────┤
//! │ ITEM              QTY      RATE     AMOUNT   │  rows, split across pages
//! │ Chocolate Cake      2   ₹150.00    ₹300.00   │
//! │ Delivery            -         -     ₹20.00   │  printable additional costs
//! ├──────────────────────────────────────────────┤
//! │                  Subtotal:         ₹300.00   │  last page only
//! │                  Additional Costs:  ₹20.00   │  if > 0
//! │                  Discount (10%):   -₹30.00   │  if > 0
//! │                  TOTAL:            ₹290.00   │
//! │         Thank you for your business!         │
//! └──────────────────────────────────────────────┘
//! ```

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use ts_rs::TS;

use crate::billing::Bill;
use crate::money::Money;
use crate::types::{CustomerDetails, TenantProfile};

pub const INVOICE_TITLE: &str = "BAKER'S INVOICE";
pub const INVOICE_FOOTER: &str = "Thank you for your business!";

const PLACEHOLDER_NAME: &str = "Your Bakery Name";
const PLACEHOLDER_ADDRESS: &str = "Address Line 1, City, State - PIN";
const PLACEHOLDER_PHONE: &str = "+91 XXXXX XXXXX";
const PLACEHOLDER_EMAIL: &str = "your@email.com";

/// Width of the plain-text rendering.
const TEXT_WIDTH: usize = 60;

// =============================================================================
// Layout Settings
// =============================================================================

/// Page and locale settings for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceLayout {
    /// Table rows per page (clamped to at least 1).
    pub rows_per_page: usize,
    /// Offset from UTC used to print the bill date.
    pub utc_offset_minutes: i32,
}

impl Default for InvoiceLayout {
    /// 20 rows per page, dates in Indian Standard Time.
    fn default() -> Self {
        InvoiceLayout {
            rows_per_page: 20,
            utc_offset_minutes: 330,
        }
    }
}

// =============================================================================
// Document Types
// =============================================================================

/// Issuer block with placeholders already substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IssuerBlock {
    pub bakery_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl IssuerBlock {
    pub fn from_profile(profile: &TenantProfile) -> Self {
        fn or_placeholder(value: &str, placeholder: &str) -> String {
            let value = value.trim();
            if value.is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        }

        IssuerBlock {
            bakery_name: or_placeholder(&profile.bakery_name, PLACEHOLDER_NAME),
            address: or_placeholder(&profile.bakery_address, PLACEHOLDER_ADDRESS),
            phone: or_placeholder(&profile.bakery_phone, PLACEHOLDER_PHONE),
            email: or_placeholder(&profile.bakery_email, PLACEHOLDER_EMAIL),
        }
    }
}

/// One table row. Additional costs have no quantity or rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceRow {
    pub item: String,
    pub quantity: Option<i64>,
    pub rate: Option<Money>,
    pub amount: Money,
}

/// A labelled figure of the summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryLine {
    pub label: String,
    /// Negative for the discount line.
    pub amount: Money,
    /// Set on the TOTAL line.
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoicePage {
    /// 1-based.
    pub page_number: usize,
    pub rows: Vec<InvoiceRow>,
    /// Present on the last page only.
    pub summary: Option<Vec<SummaryLine>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDocument {
    pub title: String,
    pub issuer: IssuerBlock,
    pub bill_number: String,
    /// DD/MM/YYYY
    pub date: String,
    pub bill_to: Option<CustomerDetails>,
    pub pages: Vec<InvoicePage>,
    pub footer: String,
}

// =============================================================================
// Rendering
// =============================================================================

/// Lays out a committed bill as an invoice.
pub fn render_invoice(bill: &Bill, issuer: &TenantProfile, layout: &InvoiceLayout) -> InvoiceDocument {
    let offset = FixedOffset::east_opt(layout.utc_offset_minutes * 60).unwrap_or(Utc.fix());
    let date = bill.created_at.with_timezone(&offset).format("%d/%m/%Y").to_string();

    let customer = bill.customer();
    let bill_to = if customer.is_empty() { None } else { Some(customer) };

    let rows = table_rows(bill);
    let per_page = layout.rows_per_page.max(1);
    let mut pages: Vec<InvoicePage> = rows
        .chunks(per_page)
        .enumerate()
        .map(|(index, chunk)| InvoicePage {
            page_number: index + 1,
            rows: chunk.to_vec(),
            summary: None,
        })
        .collect();

    if pages.is_empty() {
        pages.push(InvoicePage {
            page_number: 1,
            rows: Vec::new(),
            summary: None,
        });
    }
    if let Some(last) = pages.last_mut() {
        last.summary = Some(summary_lines(bill));
    }

    InvoiceDocument {
        title: INVOICE_TITLE.to_string(),
        issuer: IssuerBlock::from_profile(issuer),
        bill_number: bill.bill_number.clone(),
        date,
        bill_to,
        pages,
        footer: INVOICE_FOOTER.to_string(),
    }
}

fn table_rows(bill: &Bill) -> Vec<InvoiceRow> {
    let items = bill.items.iter().map(|item| InvoiceRow {
        item: item.product_name.clone(),
        quantity: Some(item.quantity),
        rate: Some(item.selling_price()),
        amount: item.total(),
    });

    let costs = bill
        .additional_costs
        .iter()
        .filter(|cost| cost.is_printable())
        .map(|cost| InvoiceRow {
            item: cost.description.trim().to_string(),
            quantity: None,
            rate: None,
            amount: cost.amount(),
        });

    items.chain(costs).collect()
}

fn summary_lines(bill: &Bill) -> Vec<SummaryLine> {
    let mut lines = vec![SummaryLine {
        label: "Subtotal:".to_string(),
        amount: bill.subtotal(),
        emphasized: false,
    }];

    if bill.additional_costs_total().is_positive() {
        lines.push(SummaryLine {
            label: "Additional Costs:".to_string(),
            amount: bill.additional_costs_total(),
            emphasized: false,
        });
    }

    if !bill.discount().is_zero() {
        lines.push(SummaryLine {
            label: format!("Discount ({}):", bill.discount()),
            amount: -bill.discount_amount(),
            emphasized: false,
        });
    }

    lines.push(SummaryLine {
        label: "TOTAL:".to_string(),
        amount: bill.total(),
        emphasized: true,
    });
    lines
}

// =============================================================================
// Plain Text
// =============================================================================

impl InvoiceDocument {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Renders the document as fixed-width text, pages separated by a
    /// form feed.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(TEXT_WIDTH);

        for (index, page) in self.pages.iter().enumerate() {
            if index > 0 {
                out.push('\u{000C}');
                out.push('\n');
            }

            let _ = writeln!(out, "{:^width$}", self.title, width = TEXT_WIDTH);
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", self.issuer.bakery_name);
            let _ = writeln!(out, "{}", self.issuer.address);
            let _ = writeln!(
                out,
                "Phone: {} | Email: {}",
                self.issuer.phone, self.issuer.email
            );
            let _ = writeln!(out);
            let _ = writeln!(out, "Bill No: {}", self.bill_number);
            let _ = writeln!(out, "Date: {}", self.date);

            if let Some(customer) = &self.bill_to {
                let _ = writeln!(out);
                let _ = writeln!(out, "Bill To:");
                if let Some(name) = &customer.name {
                    let _ = writeln!(out, "{}", name);
                }
                if let Some(phone) = &customer.phone {
                    let _ = writeln!(out, "Phone: {}", phone);
                }
                if let Some(address) = &customer.address {
                    let _ = writeln!(out, "{}", address);
                }
            }

            let _ = writeln!(out);
            let _ = writeln!(out, "{:<28}{:>6}{:>12}{:>14}", "ITEM", "QTY", "RATE", "AMOUNT");
            let _ = writeln!(out, "{}", rule);
            for row in &page.rows {
                let quantity = row
                    .quantity
                    .map(|q| q.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let rate = row
                    .rate
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let _ = writeln!(
                    out,
                    "{:<28}{:>6}{:>12}{:>14}",
                    truncate(&row.item, 27),
                    quantity,
                    rate,
                    row.amount.to_string()
                );
            }

            if let Some(summary) = &page.summary {
                let _ = writeln!(out, "{}", rule);
                for line in summary {
                    let _ = writeln!(out, "{:>46}{:>14}", line.label, line.amount.to_string());
                }
                let _ = writeln!(out);
                let _ = writeln!(out, "{:^width$}", self.footer, width = TEXT_WIDTH);
            } else {
                let _ = writeln!(
                    out,
                    "{:>width$}",
                    format!("Page {} of {}", page.page_number, self.pages.len()),
                    width = TEXT_WIDTH
                );
            }
        }

        out
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
