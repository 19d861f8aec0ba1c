//! Invoice PDF rendering.
//!
//! Lays an invoice draft and its computed totals out onto A4 pages
//! with a single mutable cursor. The cursor tracks millimetres from
//! the top edge; before any line is drawn past the page-bottom
//! threshold a fresh page is started, so long item lists and long
//! notes/terms text flow across pages naturally.
//!
//! Preview and download share this one render path; the delivery
//! modes differ only in how the bytes leave the process.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::calc::InvoiceTotals;
use crate::models::invoice::{Invoice, InvoiceItem};
use crate::models::{Client, Profile};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP_MARGIN: f32 = 20.0;
const LEFT_MARGIN: f32 = 20.0;
const RIGHT_EDGE: f32 = 190.0;
/// Cursor positions past this start a new page
const PAGE_BOTTOM: f32 = 250.0;
/// Wrapping width for notes/terms paragraphs
const CONTENT_WIDTH: f32 = 170.0;

// Items table column offsets (mm from the left edge)
const COL_DESCRIPTION: f32 = 20.0;
const COL_QTY: f32 = 85.0;
const COL_UNIT: f32 = 105.0;
const COL_RATE: f32 = 130.0;
const COL_AMOUNT: f32 = 155.0;

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance in em units; used for wrapping and
/// right alignment since the builtin-font API exposes no metrics.
const AVG_GLYPH_EM: f32 = 0.5;

/// Rendering failures.
///
/// `MissingClient` is the renderer's one precondition; its display
/// text is the user-facing message.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Please select a client first")]
    MissingClient,

    #[error("pdf generation failed: {0}")]
    Pdf(String),
}

/// A fully rendered invoice document.
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    /// Serialized PDF bytes
    pub bytes: Vec<u8>,
    /// Download filename derived from invoice number and client name
    pub filename: String,
    /// Number of pages the layout produced
    pub pages: usize,
}

impl RenderedInvoice {
    /// Embeddable representation for inline preview.
    pub fn data_uri(&self) -> String {
        format!("data:application/pdf;base64,{}", BASE64.encode(&self.bytes))
    }
}

/// Derives the download filename: `invoice-<number>-<client>.pdf` with
/// runs of non-alphanumeric characters in the client name collapsed to
/// single hyphens.
pub fn invoice_filename(invoice_number: &str, client_name: &str) -> String {
    let mut slug = String::with_capacity(client_name.len());
    for c in client_name.chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    format!("invoice-{}-{}.pdf", invoice_number, slug)
}

fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded < Decimal::ZERO {
        format!("-${:.2}", -rounded)
    } else {
        format!("${:.2}", rounded)
    }
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Estimated rendered width of `text` at `size` points.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_EM * PT_TO_MM
}

/// Greedy word wrap against the estimated glyph width. A single word
/// longer than the limit is emitted on its own line rather than split.
fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let glyph_width = size * AVG_GLYPH_EM * PT_TO_MM;
    let max_chars = ((max_width / glyph_width) as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Mutable layout cursor over the growing document.
///
/// `y` is millimetres from the top edge of the current page; drawing
/// converts to the PDF's bottom-up coordinates.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(PageWriter {
            doc,
            layer,
            font,
            font_bold,
            y: TOP_MARGIN,
            pages: 1,
        })
    }

    /// Starts a new page when the cursor has passed the bottom
    /// threshold. Called per line, not per section.
    fn break_page_if_needed(&mut self) {
        if self.y > PAGE_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_MARGIN;
            self.pages += 1;
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer
            .use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - self.y), font);
    }

    /// Draws text so it ends at `right_x`.
    fn text_right(&self, text: &str, size: f32, right_x: f32, bold: bool) {
        self.text(text, size, right_x - text_width(text, size), bold);
    }

    fn hline(&self, x1: f32, x2: f32) {
        let y = Mm(PAGE_HEIGHT - self.y);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), y), false),
                (Point::new(Mm(x2), y), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    fn finish(self) -> Result<(Vec<u8>, usize), RenderError> {
        let pages = self.pages;
        let bytes = self
            .doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok((bytes, pages))
    }
}

/// Renders an invoice draft plus its computed totals into a paginated
/// A4 document.
///
/// The one precondition checked here is that a client is selected;
/// everything else is assumed pre-validated by the caller. Section
/// order: company header, invoice meta, client block, items table,
/// totals, then optional notes and terms.
pub fn render_invoice(
    invoice: &Invoice,
    items: &[InvoiceItem],
    totals: &InvoiceTotals,
    client: Option<&Client>,
    profile: &Profile,
) -> Result<RenderedInvoice, RenderError> {
    let client = client.ok_or(RenderError::MissingClient)?;

    let mut w = PageWriter::new(&format!("Invoice {}", invoice.invoice_number))?;

    // Company header
    w.text("INVOICE", 24.0, LEFT_MARGIN, true);
    w.advance(15.0);
    w.text(&profile.company_name, 12.0, LEFT_MARGIN, false);
    w.advance(5.0);
    for line in profile.company_address.lines() {
        w.text(line, 12.0, LEFT_MARGIN, false);
        w.advance(5.0);
    }
    if let Some(phone) = &profile.company_phone {
        w.text(&format!("Phone: {}", phone), 12.0, LEFT_MARGIN, false);
        w.advance(5.0);
    }
    if let Some(email) = &profile.company_email {
        w.text(&format!("Email: {}", email), 12.0, LEFT_MARGIN, false);
        w.advance(5.0);
    }

    // Invoice meta, right side at a fixed start
    w.y = 35.0;
    let meta_right = RIGHT_EDGE - 40.0;
    w.text_right(
        &format!("Invoice #: {}", invoice.invoice_number),
        10.0,
        meta_right,
        false,
    );
    w.advance(5.0);
    w.text_right(
        &format!("Date: {}", format_date(invoice.issue_date)),
        10.0,
        meta_right,
        false,
    );
    w.advance(5.0);
    w.text_right(
        &format!("Due Date: {}", format_date(invoice.due_date)),
        10.0,
        meta_right,
        false,
    );
    if let Some(reference) = &invoice.reference_number {
        w.advance(5.0);
        w.text_right(&format!("Ref: {}", reference), 10.0, meta_right, false);
    }

    // Client block
    w.advance(20.0);
    w.text("Bill To:", 12.0, LEFT_MARGIN, true);
    w.advance(8.0);
    w.text(&client.name, 12.0, LEFT_MARGIN, false);
    w.advance(5.0);
    if !client.email.is_empty() {
        w.text(&client.email, 12.0, LEFT_MARGIN, false);
    }
    w.advance(5.0);
    if let Some(phone) = &client.phone {
        w.text(phone, 12.0, LEFT_MARGIN, false);
    }
    w.advance(5.0);
    if !client.address.is_empty() {
        w.text(&client.address, 12.0, LEFT_MARGIN, false);
        w.advance(5.0);
        if let (Some(city), Some(state)) = (&client.city, &client.state) {
            let zip = client.zip_code.as_deref().unwrap_or("");
            w.text(&format!("{}, {} {}", city, state, zip), 12.0, LEFT_MARGIN, false);
            w.advance(5.0);
        }
        if let Some(country) = &client.country {
            w.text(country, 12.0, LEFT_MARGIN, false);
        }
    }

    // Items table header
    w.advance(15.0);
    w.text("Description", 10.0, COL_DESCRIPTION, true);
    w.text("Qty", 10.0, COL_QTY, true);
    w.text("Unit", 10.0, COL_UNIT, true);
    w.text("Rate", 10.0, COL_RATE, true);
    w.text("Amount", 10.0, COL_AMOUNT, true);
    w.advance(5.0);
    w.hline(LEFT_MARGIN, RIGHT_EDGE);
    w.advance(8.0);

    // Item rows, one page-break check per row
    for item in items {
        w.break_page_if_needed();
        let description = if item.description.is_empty() {
            "Item"
        } else {
            item.description.as_str()
        };
        w.text(description, 10.0, COL_DESCRIPTION, false);
        w.text(&item.quantity.to_string(), 10.0, COL_QTY, false);
        w.text(&item.unit, 10.0, COL_UNIT, false);
        w.text(
            &format_currency(item.unit_price.unwrap_or(Decimal::ZERO)),
            10.0,
            COL_RATE,
            false,
        );
        w.text(&format_currency(item.line_total), 10.0, COL_AMOUNT, false);
        w.advance(6.0);
    }

    // Totals block, emitted once after the final row
    w.advance(5.0);
    w.hline(LEFT_MARGIN, RIGHT_EDGE);
    w.advance(8.0);

    w.text("Subtotal:", 10.0, COL_RATE, true);
    w.text_right(&format_currency(totals.subtotal), 10.0, COL_AMOUNT, true);

    if totals.line_discount_total > Decimal::ZERO {
        w.advance(5.0);
        w.text("Line Discounts:", 10.0, COL_RATE, true);
        w.text_right(
            &format!("-{}", format_currency(totals.line_discount_total)),
            10.0,
            COL_AMOUNT,
            true,
        );
    }

    w.advance(5.0);
    let tax_percent = invoice.tax_rate * Decimal::ONE_HUNDRED;
    w.text(&format!("Tax ({:.2}%):", tax_percent), 10.0, COL_RATE, true);
    w.text_right(&format_currency(totals.tax_amount), 10.0, COL_AMOUNT, true);

    if invoice.additional_discount > Decimal::ZERO {
        w.advance(5.0);
        w.text("Additional Discount:", 10.0, COL_RATE, true);
        w.text_right(
            &format!("-{}", format_currency(invoice.additional_discount)),
            10.0,
            COL_AMOUNT,
            true,
        );
    }

    w.advance(5.0);
    w.hline(LEFT_MARGIN, RIGHT_EDGE);
    w.advance(8.0);
    w.text("Total:", 12.0, COL_RATE, true);
    w.text_right(&format_currency(totals.grand_total), 12.0, COL_AMOUNT, true);

    // Notes and terms, wrapped and paged per line
    let notes = invoice.notes.as_deref().filter(|s| !s.is_empty());
    let terms = invoice.terms.as_deref().filter(|s| !s.is_empty());
    if notes.is_some() || terms.is_some() {
        w.advance(20.0);
        w.break_page_if_needed();

        if let Some(notes) = notes {
            w.text("Notes:", 10.0, LEFT_MARGIN, true);
            w.advance(5.0);
            for line in wrap_text(notes, CONTENT_WIDTH, 10.0) {
                w.break_page_if_needed();
                w.text(&line, 10.0, LEFT_MARGIN, false);
                w.advance(5.0);
            }
        }

        if let Some(terms) = terms {
            w.advance(10.0);
            w.break_page_if_needed();
            w.text("Terms & Conditions:", 10.0, LEFT_MARGIN, true);
            w.advance(5.0);
            for line in wrap_text(terms, CONTENT_WIDTH, 10.0) {
                w.break_page_if_needed();
                w.text(&line, 10.0, LEFT_MARGIN, false);
                w.advance(5.0);
            }
        }
    }

    let filename = invoice_filename(&invoice.invoice_number, &client.name);
    let (bytes, pages) = w.finish()?;

    Ok(RenderedInvoice {
        bytes,
        filename,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{compute_totals, LineAmounts};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn sample_client(name: &str) -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            email: "billing@acme.test".to_string(),
            address: "1 Main St".to_string(),
            phone: None,
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            zip_code: Some("62704".to_string()),
            country: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_invoice(item_count: usize, notes: Option<&str>) -> (Invoice, Vec<InvoiceItem>) {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let items: Vec<InvoiceItem> = (0..item_count)
            .map(|i| InvoiceItem {
                id: Uuid::new_v4(),
                invoice_id: id,
                description: format!("Service {}", i + 1),
                quantity: dec!(1),
                unit: "hr".to_string(),
                unit_price: Some(dec!(50)),
                discount_rate: Decimal::ZERO,
                line_total: dec!(50),
                sort_order: i as i32,
            })
            .collect();

        let totals = compute_totals(
            &items.iter().map(LineAmounts::from).collect::<Vec<_>>(),
            dec!(0.08),
            Decimal::ZERO,
        );

        let invoice = Invoice {
            id,
            user_id: Uuid::new_v4(),
            client_id: Some(Uuid::new_v4()),
            invoice_number: "INV-2026-001".to_string(),
            reference_number: None,
            issue_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            status: crate::models::InvoiceStatus::Draft,
            tax_rate: dec!(0.08),
            additional_discount: Decimal::ZERO,
            subtotal: totals.subtotal,
            line_discount_total: totals.line_discount_total,
            tax_amount: totals.tax_amount,
            total_amount: totals.grand_total,
            notes: notes.map(|s| s.to_string()),
            terms: None,
            created_at: now,
            updated_at: now,
        };
        (invoice, items)
    }

    fn totals_for(invoice: &Invoice, items: &[InvoiceItem]) -> InvoiceTotals {
        compute_totals(
            &items.iter().map(LineAmounts::from).collect::<Vec<_>>(),
            invoice.tax_rate,
            invoice.additional_discount,
        )
    }

    #[test]
    fn missing_client_fails_without_artifact() {
        let (invoice, items) = sample_invoice(1, None);
        let totals = totals_for(&invoice, &items);
        let profile = Profile::placeholder(invoice.user_id);

        let err = render_invoice(&invoice, &items, &totals, None, &profile).unwrap_err();
        assert!(matches!(err, RenderError::MissingClient));
        assert_eq!(err.to_string(), "Please select a client first");
    }

    #[test]
    fn short_invoice_fits_one_page() {
        let (invoice, items) = sample_invoice(3, None);
        let totals = totals_for(&invoice, &items);
        let profile = Profile::placeholder(invoice.user_id);
        let client = sample_client("Acme Corp");

        let rendered =
            render_invoice(&invoice, &items, &totals, Some(&client), &profile).unwrap();
        assert_eq!(rendered.pages, 1);
        assert!(!rendered.bytes.is_empty());
        assert_eq!(rendered.filename, "invoice-INV-2026-001-Acme-Corp.pdf");
    }

    #[test]
    fn long_item_list_flows_to_second_page() {
        // Rows start around y=118 and advance 6mm each; 60 rows cross
        // the 250mm threshold well before the list ends.
        let (invoice, items) = sample_invoice(60, None);
        let totals = totals_for(&invoice, &items);
        let profile = Profile::placeholder(invoice.user_id);
        let client = sample_client("Acme Corp");

        let rendered =
            render_invoice(&invoice, &items, &totals, Some(&client), &profile).unwrap();
        assert!(rendered.pages >= 2);
    }

    #[test]
    fn long_notes_flow_across_pages() {
        let notes = "Thank you for your business. ".repeat(200);
        let (invoice, items) = sample_invoice(2, Some(&notes));
        let totals = totals_for(&invoice, &items);
        let profile = Profile::placeholder(invoice.user_id);
        let client = sample_client("Acme Corp");

        let rendered =
            render_invoice(&invoice, &items, &totals, Some(&client), &profile).unwrap();
        assert!(rendered.pages >= 2);
    }

    #[test]
    fn preview_uses_pdf_data_uri() {
        let (invoice, items) = sample_invoice(1, None);
        let totals = totals_for(&invoice, &items);
        let profile = Profile::placeholder(invoice.user_id);
        let client = sample_client("Acme Corp");

        let rendered =
            render_invoice(&invoice, &items, &totals, Some(&client), &profile).unwrap();
        assert!(rendered.data_uri().starts_with("data:application/pdf;base64,"));
    }

    #[test]
    fn filename_replaces_non_alphanumeric_runs() {
        assert_eq!(
            invoice_filename("INV-7", "Smith & Sons, Ltd."),
            "invoice-INV-7-Smith-Sons-Ltd.pdf"
        );
        assert_eq!(
            invoice_filename("1", "  spaced   name  "),
            "invoice-1-spaced-name.pdf"
        );
    }

    #[test]
    fn wrap_respects_width_and_keeps_words() {
        let text = "one two three four five six seven eight nine ten";
        let lines = wrap_text(text, 20.0, 10.0);
        assert!(lines.len() > 1);
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
        let max_chars = (20.0 / (10.0 * AVG_GLYPH_EM * PT_TO_MM)) as usize;
        for line in &lines {
            assert!(line.chars().count() <= max_chars);
        }
    }
}
