//! PDF receipts
//!
//! [`PdfWriter`] emits PDF 1.4 using the built-in Helvetica faces, so no
//! font data is embedded. Text is WinAnsi encoded; characters outside
//! Latin-1 print as `?`.

use rust_decimal::Decimal;
use shared::models::Order;

use super::{
    PDF_CONTENT_TYPE, ReceiptRenderer, RenderedDocument, ReportError, format_money,
    format_timestamp,
};

/// A4 in points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const PLACEHOLDER: &str = "N/A";

/// VAT rate contained in menu prices, in percent
const VAT_PERCENT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Approximate Helvetica advance width in em
fn glyph_width(c: char) -> f32 {
    match c {
        '0'..='9' => 0.556,
        ' ' | '.' | ',' | ':' | 'i' | 'j' | 'l' | '!' | '|' => 0.278,
        '-' | '(' | ')' | 'r' | 't' | 'f' => 0.333,
        'm' | 'M' | 'W' => 0.833,
        'w' => 0.722,
        'A'..='Z' => 0.667,
        _ => 0.556,
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(glyph_width).sum::<f32>() * size
}

/// Escape a string into a PDF literal, mapping to WinAnsi bytes
fn encode_text(text: &str, out: &mut Vec<u8>) {
    out.push(b'(');
    for c in text.chars() {
        let code = c as u32;
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(code as u8);
            }
            _ if (0x20..0x7F).contains(&code) || (0xA0..=0xFF).contains(&code) => {
                out.push(code as u8)
            }
            _ => out.push(b'?'),
        }
    }
    out.push(b')');
}

/// Page-oriented PDF builder
///
/// Coordinates are in points from the bottom-left corner.
pub struct PdfWriter {
    pages: Vec<Vec<u8>>,
    current: Vec<u8>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::with_capacity(4096),
        }
    }

    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) -> &mut Self {
        self.current.extend_from_slice(
            format!("BT /{} {} Tf {:.2} {:.2} Td ", font.resource(), size, x, y).as_bytes(),
        );
        encode_text(text, &mut self.current);
        self.current.extend_from_slice(b" Tj ET\n");
        self
    }

    /// Text ending at `right`
    pub fn text_right(&mut self, right: f32, y: f32, font: Font, size: f32, text: &str) -> &mut Self {
        self.text(right - text_width(text, size), y, font, size, text)
    }

    /// Text centered on the page
    pub fn text_center(&mut self, y: f32, font: Font, size: f32, text: &str) -> &mut Self {
        let x = ((PAGE_WIDTH - text_width(text, size)) / 2.0).max(MARGIN);
        self.text(x, y, font, size, text)
    }

    /// Horizontal line across the printable width
    pub fn rule(&mut self, y: f32, width: f32) -> &mut Self {
        self.current.extend_from_slice(
            format!(
                "{} w {:.2} {:.2} m {:.2} {:.2} l S\n",
                width,
                MARGIN,
                y,
                PAGE_WIDTH - MARGIN,
                y
            )
            .as_bytes(),
        );
        self
    }

    pub fn new_page(&mut self) -> &mut Self {
        let page = std::mem::replace(&mut self.current, Vec::with_capacity(4096));
        self.pages.push(page);
        self
    }

    /// Serialize the document with its cross-reference table
    pub fn finish(mut self) -> Vec<u8> {
        self.new_page();
        let page_count = self.pages.len();
        // 1 catalog, 2 pages, 3-4 fonts, then (page, contents) pairs
        let object_count = 4 + 2 * page_count;

        let mut out = Vec::with_capacity(8192);
        let mut offsets = Vec::with_capacity(object_count);
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let kids = (0..page_count)
            .map(|i| format!("{} 0 R", 5 + 2 * i))
            .collect::<Vec<_>>()
            .join(" ");

        let mut object = |out: &mut Vec<u8>, body: &[u8]| {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", offsets.len()).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        };

        object(&mut out, b"<< /Type /Catalog /Pages 2 0 R >>");
        object(
            &mut out,
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, page_count).as_bytes(),
        );
        for base in ["Helvetica", "Helvetica-Bold"] {
            object(
                &mut out,
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    base
                )
                .as_bytes(),
            );
        }
        for (i, content) in self.pages.iter().enumerate() {
            object(
                &mut out,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    PAGE_WIDTH,
                    PAGE_HEIGHT,
                    6 + 2 * i
                )
                .as_bytes(),
            );
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(content);
            stream.extend_from_slice(b"\nendstream");
            object(&mut out, &stream);
        }

        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", object_count + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                object_count + 1,
                xref_offset
            )
            .as_bytes(),
        );
        out
    }
}

/// Receipt layout
///
/// Prices already include VAT; the receipt shows the contained share.
pub struct PdfReceiptRenderer {
    restaurant_name: String,
}

impl PdfReceiptRenderer {
    pub fn new(restaurant_name: impl Into<String>) -> Self {
        Self {
            restaurant_name: restaurant_name.into(),
        }
    }

    fn render(&self, order: &Order) -> Vec<u8> {
        const COL_QTY: f32 = 360.0;
        const COL_UNIT: f32 = 450.0;
        const COL_TOTAL: f32 = PAGE_WIDTH - MARGIN;
        const LINE: f32 = 18.0;

        let mut pdf = PdfWriter::new();
        let mut y = PAGE_HEIGHT - MARGIN - 10.0;

        pdf.text_center(y, Font::Bold, 18.0, &self.restaurant_name);
        y -= 26.0;
        pdf.text_center(y, Font::Bold, 13.0, "ORDER RECEIPT");
        y -= 30.0;

        let info = [
            ("Receipt No:", Some(order.order_number.clone())),
            ("Date:", Some(format_timestamp(order.created_at))),
            ("Type:", Some(order.order_type.as_str().to_string())),
            ("Table:", order.table_name.clone()),
            ("Customer:", order.customer_name.clone()),
            ("Phone:", order.customer_phone.clone()),
            ("Address:", order.customer_address.clone()),
            ("Courier:", order.courier_name.clone()),
        ];
        for (label, value) in info {
            pdf.text(MARGIN, y, Font::Bold, 10.0, label);
            pdf.text(
                MARGIN + 90.0,
                y,
                Font::Regular,
                10.0,
                value.as_deref().unwrap_or(PLACEHOLDER),
            );
            y -= 15.0;
        }
        if let Some(notes) = &order.notes {
            pdf.text(MARGIN, y, Font::Bold, 10.0, "Notes:");
            pdf.text(MARGIN + 90.0, y, Font::Regular, 10.0, notes);
            y -= 15.0;
        }

        y -= 10.0;
        let header = |pdf: &mut PdfWriter, y: f32| {
            pdf.text(MARGIN, y, Font::Bold, 11.0, "Item")
                .text_right(COL_QTY, y, Font::Bold, 11.0, "Qty")
                .text_right(COL_UNIT, y, Font::Bold, 11.0, "Price")
                .text_right(COL_TOTAL, y, Font::Bold, 11.0, "Total")
                .rule(y - 6.0, 0.8);
        };
        header(&mut pdf, y);
        y -= LINE + 4.0;

        for item in &order.items {
            if y < MARGIN + 40.0 {
                pdf.new_page();
                y = PAGE_HEIGHT - MARGIN;
                header(&mut pdf, y);
                y -= LINE + 4.0;
            }
            pdf.text(MARGIN, y, Font::Regular, 10.0, &item.product_name)
                .text_right(COL_QTY, y, Font::Regular, 10.0, &item.quantity.to_string())
                .text_right(COL_UNIT, y, Font::Regular, 10.0, &format_money(item.price))
                .text_right(COL_TOTAL, y, Font::Regular, 10.0, &format_money(item.line_total()));
            y -= LINE;
        }

        if y < MARGIN + 100.0 {
            pdf.new_page();
            y = PAGE_HEIGHT - MARGIN;
        }
        pdf.rule(y + 8.0, 0.5);
        y -= 10.0;

        let (net, vat) = split_vat(order.total_amount);
        let vat_label = format!("VAT ({}%, included):", VAT_PERCENT);
        let totals = [
            ("Subtotal:", format_money(net), Font::Regular, 10.0),
            (vat_label.as_str(), format_money(vat), Font::Regular, 10.0),
            ("TOTAL:", format_money(order.total_amount), Font::Bold, 12.0),
        ];
        for (label, amount, font, size) in totals {
            pdf.text_right(COL_UNIT, y, font, size, label)
                .text_right(COL_TOTAL, y, font, size, &amount);
            y -= LINE;
        }

        y -= 20.0;
        pdf.text_center(y, Font::Regular, 10.0, "Thank you for your visit!");

        pdf.finish()
    }
}

/// Split a VAT-inclusive amount into (net, vat), both rounded to cents
fn split_vat(gross: Decimal) -> (Decimal, Decimal) {
    let rate = Decimal::from(VAT_PERCENT);
    let vat = (gross * rate / (Decimal::ONE_HUNDRED + rate)).round_dp(2);
    (gross - vat, vat)
}

impl ReceiptRenderer for PdfReceiptRenderer {
    fn render_receipt(&self, order: &Order) -> Result<RenderedDocument, ReportError> {
        if order.order_number.is_empty() {
            return Err(ReportError::Receipt(format!(
                "order {} has no number",
                order.id
            )));
        }
        Ok(RenderedDocument {
            bytes: self.render(order),
            content_type: PDF_CONTENT_TYPE,
            filename: format!("receipt_{}.pdf", order.order_number),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderItem, OrderStatus, OrderType};
    use std::str::FromStr;

    fn order() -> Order {
        Order {
            id: "o1".to_string(),
            order_number: "SIP-20240305-0007".to_string(),
            items: vec![
                OrderItem {
                    product_id: "p1".to_string(),
                    product_name: "Döner (large)".to_string(),
                    quantity: 2,
                    price: Decimal::from_str("85.0").unwrap(),
                },
                OrderItem {
                    product_id: "p2".to_string(),
                    product_name: "Ayran".to_string(),
                    quantity: 1,
                    price: Decimal::from_str("15.0").unwrap(),
                },
            ],
            total_amount: Decimal::from(185),
            status: OrderStatus::Delivered,
            order_type: OrderType::DineIn,
            table_id: Some("t1".to_string()),
            table_name: Some("Table 1".to_string()),
            courier_id: None,
            courier_name: None,
            customer_id: None,
            customer_name: None,
            customer_phone: None,
            customer_address: None,
            notes: None,
            created_at: 1_709_644_800_000,
            updated_at: 1_709_644_800_000,
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_receipt_document() {
        let doc = PdfReceiptRenderer::new("Harbour Grill")
            .render_receipt(&order())
            .unwrap();

        assert_eq!(doc.content_type, "application/pdf");
        assert_eq!(doc.filename, "receipt_SIP-20240305-0007.pdf");
        assert!(doc.bytes.starts_with(b"%PDF-1.4"));
        assert!(doc.bytes.ends_with(b"%%EOF\n"));
        assert!(contains(&doc.bytes, b"(Harbour Grill)"));
        assert!(contains(&doc.bytes, b"(SIP-20240305-0007)"));
        assert!(contains(&doc.bytes, b"(ORDER RECEIPT)"));
        // Missing courier and customer
        assert!(contains(&doc.bytes, b"(N/A)"));
        assert!(contains(&doc.bytes, b"(185.00)"));
        assert!(contains(&doc.bytes, b"(16.82)"));
        // Latin-1 kept as a single byte, parentheses escaped
        assert!(contains(&doc.bytes, b"(D\xF6ner \\(large\\))"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = PdfReceiptRenderer::new("R").render(&order());
        let text = String::from_utf8_lossy(&bytes);
        let xref_at: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|s| s.lines().next())
            .and_then(|s| s.parse().ok())
            .unwrap();
        assert!(bytes[xref_at..].starts_with(b"xref"));

        let table = String::from_utf8_lossy(&bytes[xref_at..]);
        for (n, line) in table.lines().skip(3).take_while(|l| l.ends_with(" n ")).enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            let expected = format!("{} 0 obj", n + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn test_long_orders_span_pages() {
        let mut long = order();
        long.items = (0..120)
            .map(|i| OrderItem {
                product_id: format!("p{}", i),
                product_name: format!("Dish {}", i),
                quantity: 1,
                price: Decimal::ONE,
            })
            .collect();
        let bytes = PdfReceiptRenderer::new("R").render(&long);
        assert!(!contains(&bytes, b"/Count 1 "));
        assert!(contains(&bytes, b"(Dish 119)"));
    }

    #[test]
    fn test_non_latin_replaced() {
        let mut out = Vec::new();
        encode_text("Çay 茶", &mut out);
        assert_eq!(out, b"(\xC7ay ?)");
    }

    #[test]
    fn test_split_vat() {
        let (net, vat) = split_vat(Decimal::from(110));
        assert_eq!(vat, Decimal::from(10));
        assert_eq!(net, Decimal::from(100));
    }
}
