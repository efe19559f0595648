//! A4 PDF report: one table row per checked URL.
//!
//! Rows are grouped by link set in ascending identity order, with URLs in
//! lexicographic order inside a set. Long URLs are shortened to keep the
//! table on the page; availability is colored green, everything else red.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};
use std::collections::BTreeMap;

use crate::domain::entities::{LinkSet, LinkSetId, LinkStatus};
use crate::error::ReportError;

pub const TITLE: &str = "Link Status Report";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MAX_URL_CHARS: usize = 50;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 10.0;
const BOTTOM: f32 = 20.0;
const ROW_HEIGHT: f32 = 8.0;
const SET_GAP: f32 = 2.0;

// Left edge of each column: Set ID, URL, Status, Timestamp.
const COLUMNS: [f32; 4] = [MARGIN, MARGIN + 20.0, MARGIN + 100.0, MARGIN + 130.0];
const HEADERS: [&str; 4] = ["Set ID", "URL", "Status", "Timestamp"];

/// Renders `link_sets` into a complete PDF document.
///
/// `printpdf` documents are not `Send`, so callers on the runtime should go
/// through [`render_pdf`].
pub fn render_pdf_blocking(
    link_sets: &BTreeMap<LinkSetId, LinkSet>,
) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new(TITLE, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut table = Table {
        layer: doc.get_page(page).get_layer(layer),
        doc: &doc,
        regular,
        bold,
        y: PAGE_HEIGHT.0 - MARGIN,
    };

    table.title();
    table.header();

    for (id, set) in link_sets {
        let stamp = set.timestamp.format(TIMESTAMP_FORMAT).to_string();
        for (url, status) in &set.links {
            table.row(*id, url, *status, &stamp);
        }
        table.y -= SET_GAP;
    }

    Ok(doc.save_to_bytes()?)
}

/// Renders on the blocking pool.
pub async fn render_pdf(link_sets: BTreeMap<LinkSetId, LinkSet>) -> Result<Vec<u8>, ReportError> {
    tokio::task::spawn_blocking(move || render_pdf_blocking(&link_sets)).await?
}

/// Shortens URLs over 50 characters to their first 47 plus `...`.
pub fn display_url(url: &str) -> String {
    if url.chars().count() > MAX_URL_CHARS {
        let head: String = url.chars().take(MAX_URL_CHARS - 3).collect();
        format!("{head}...")
    } else {
        url.to_string()
    }
}

fn status_color(status: LinkStatus) -> Color {
    match status {
        LinkStatus::Available => rgb(0, 128, 0),
        LinkStatus::NotAvailable => rgb(255, 0, 0),
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// Cursor over the current page. `y` is the baseline of the next line,
/// measured from the bottom edge.
struct Table<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Table<'_> {
    fn title(&mut self) {
        self.y -= 7.0;
        self.layer
            .use_text(TITLE, 16.0, Mm(MARGIN), Mm(self.y), &self.bold);
        self.y -= 12.0;
    }

    fn header(&mut self) {
        for (text, x) in HEADERS.iter().zip(COLUMNS) {
            self.layer.use_text(*text, 12.0, Mm(x), Mm(self.y), &self.bold);
        }
        self.y -= 10.0;
    }

    fn row(&mut self, id: LinkSetId, url: &str, status: LinkStatus, stamp: &str) {
        if self.y < BOTTOM {
            self.next_page();
        }

        let font = &self.regular;
        self.layer
            .use_text(id.to_string(), 10.0, Mm(COLUMNS[0]), Mm(self.y), font);
        self.layer
            .use_text(display_url(url), 10.0, Mm(COLUMNS[1]), Mm(self.y), font);

        self.layer.set_fill_color(status_color(status));
        self.layer
            .use_text(status.as_str(), 10.0, Mm(COLUMNS[2]), Mm(self.y), font);
        self.layer.set_fill_color(rgb(0, 0, 0));

        self.layer
            .use_text(stamp, 10.0, Mm(COLUMNS[3]), Mm(self.y), font);
        self.y -= ROW_HEIGHT;
    }

    fn next_page(&mut self) {
        let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT.0 - MARGIN - 7.0;
        self.header();
    }
}
