//! Excel order reports
//!
//! Writes a minimal SpreadsheetML package (one sheet, inline strings, a
//! small style table) with the `zip` crate.

use rust_decimal::Decimal;
use shared::models::{Order, OrderStatus, OrderType};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::FileOptions;

use super::{RenderedDocument, ReportError, ReportRenderer, XLSX_CONTENT_TYPE, format_timestamp};

const PLACEHOLDER: &str = "-";
const COLUMNS: [(&str, f32); 7] = [
    ("Order No", 22.0),
    ("Date", 18.0),
    ("Type", 12.0),
    ("Customer", 22.0),
    ("Amount", 14.0),
    ("Status", 14.0),
    ("Courier", 22.0),
];

// Indexes into `cellXfs` in styles.xml
const STYLE_TITLE: u8 = 1;
const STYLE_HEADER: u8 = 2;
const STYLE_AMOUNT: u8 = 3;
const STYLE_TOTAL_LABEL: u8 = 4;
const STYLE_TOTAL_AMOUNT: u8 = 5;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Orders" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="4"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="16"/><name val="Calibri"/></font><font><b/><sz val="11"/><color rgb="FFFFFFFF"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FFFFA500"/><bgColor indexed="64"/></patternFill></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="6"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1" applyAlignment="1"><alignment horizontal="center"/></xf><xf numFmtId="0" fontId="2" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1" applyAlignment="1"><alignment horizontal="center"/></xf><xf numFmtId="2" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="0" fontId="3" fillId="0" borderId="0" xfId="0" applyFont="1"/><xf numFmtId="2" fontId="3" fillId="0" borderId="0" xfId="0" applyNumberFormat="1" applyFont="1"/></cellXfs></styleSheet>"#;

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters are not allowed in XML 1.0
            c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

/// Column letter for a zero-based index (A..Z is enough here)
fn column(index: usize) -> char {
    (b'A' + index as u8) as char
}

enum Cell {
    Text(String),
    Amount(Decimal),
}

/// Sheet XML under construction
struct SheetBuilder {
    rows: String,
}

impl SheetBuilder {
    fn new() -> Self {
        Self {
            rows: String::with_capacity(16 * 1024),
        }
    }

    fn row(&mut self, number: usize, cells: &[(Cell, u8)]) {
        self.rows.push_str(&format!("<row r=\"{}\">", number));
        for (i, (cell, style)) in cells.iter().enumerate() {
            let reference = format!("{}{}", column(i), number);
            match cell {
                Cell::Text(text) => self.rows.push_str(&format!(
                    "<c r=\"{}\" s=\"{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                    reference,
                    style,
                    escape_xml(text)
                )),
                Cell::Amount(amount) => self.rows.push_str(&format!(
                    "<c r=\"{}\" s=\"{}\"><v>{}</v></c>",
                    reference,
                    style,
                    amount.round_dp(2)
                )),
            }
        }
        self.rows.push_str("</row>");
    }

    fn finish(self) -> String {
        let cols: String = COLUMNS
            .iter()
            .enumerate()
            .map(|(i, (_, width))| {
                format!(
                    "<col min=\"{0}\" max=\"{0}\" width=\"{1}\" customWidth=\"1\"/>",
                    i + 1,
                    width
                )
            })
            .collect();
        let last = column(COLUMNS.len() - 1);
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
             <cols>{}</cols><sheetData>{}</sheetData>\
             <mergeCells count=\"1\"><mergeCell ref=\"A1:{}1\"/></mergeCells></worksheet>",
            cols, self.rows, last
        )
    }
}

fn type_label(order_type: OrderType) -> &'static str {
    match order_type {
        OrderType::DineIn => "Dine-in",
        OrderType::Takeaway => "Takeaway",
        OrderType::Delivery => "Delivery",
    }
}

fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Pending",
        OrderStatus::Preparing => "Preparing",
        OrderStatus::Ready => "Ready",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Cancelled => "Cancelled",
    }
}

fn text_or_placeholder(value: &Option<String>) -> Cell {
    Cell::Text(
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(PLACEHOLDER)
            .to_string(),
    )
}

#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxReportRenderer;

impl XlsxReportRenderer {
    pub fn new() -> Self {
        Self
    }

    fn sheet_xml(&self, title: &str, orders: &[Order]) -> String {
        let mut sheet = SheetBuilder::new();
        sheet.row(1, &[(Cell::Text(title.to_string()), STYLE_TITLE)]);

        let header: Vec<_> = COLUMNS
            .iter()
            .map(|(name, _)| (Cell::Text(name.to_string()), STYLE_HEADER))
            .collect();
        sheet.row(3, &header);

        let mut row = 4;
        for order in orders {
            sheet.row(
                row,
                &[
                    (Cell::Text(order.order_number.clone()), 0),
                    (Cell::Text(format_timestamp(order.created_at)), 0),
                    (Cell::Text(type_label(order.order_type).to_string()), 0),
                    (text_or_placeholder(&order.customer_name), 0),
                    (Cell::Amount(order.total_amount), STYLE_AMOUNT),
                    (Cell::Text(status_label(order.status).to_string()), 0),
                    (text_or_placeholder(&order.courier_name), 0),
                ],
            );
            row += 1;
        }

        // Revenue excludes cancelled orders
        let revenue: Decimal = orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total_amount)
            .sum();
        sheet.row(
            row + 1,
            &[
                (Cell::Text("TOTAL".to_string()), STYLE_TOTAL_LABEL),
                (Cell::Text(format!("{} orders", orders.len())), STYLE_TOTAL_LABEL),
                (Cell::Text(String::new()), 0),
                (Cell::Text(String::new()), 0),
                (Cell::Amount(revenue), STYLE_TOTAL_AMOUNT),
            ],
        );

        sheet.finish()
    }
}

impl ReportRenderer for XlsxReportRenderer {
    fn render_report(
        &self,
        title: &str,
        file_stem: &str,
        orders: &[Order],
    ) -> Result<RenderedDocument, ReportError> {
        let sheet = self.sheet_xml(title, orders);

        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            let options: FileOptions<()> =
                FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            let parts: [(&str, &str); 6] = [
                ("[Content_Types].xml", CONTENT_TYPES_XML),
                ("_rels/.rels", ROOT_RELS_XML),
                ("xl/workbook.xml", WORKBOOK_XML),
                ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML),
                ("xl/styles.xml", STYLES_XML),
                ("xl/worksheets/sheet1.xml", &sheet),
            ];
            for (path, content) in parts {
                zip.start_file(path, options)?;
                zip.write_all(content.as_bytes())?;
            }
            zip.finish()?;
        }

        Ok(RenderedDocument {
            bytes: buf.into_inner(),
            content_type: XLSX_CONTENT_TYPE,
            filename: format!("{}.xlsx", file_stem),
        })
    }
}
