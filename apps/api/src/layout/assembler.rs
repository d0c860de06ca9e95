//! Document assembler: lays out one full census report.
//!
//! Order is fixed: page header, Block I, Block II, Block III, forced page break,
//! then Block IV (column header, paginated business rows, totals). Every call owns
//! a fresh [`ReportCanvas`], so concurrent renders share nothing.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ReportError;
use crate::layout::blocks::{draw_block, FixedBlock, BODY_FONT, BOLD_FONT};
use crate::layout::canvas::{ReportCanvas, ReportTitles};
use crate::layout::display::DisplayPage;
use crate::layout::geometry::PageGeometry;
use crate::layout::paginator::{
    OverflowPolicy, PaginationEvent, Paginator, PaginatorConfig, BLOCK_IV_HEADER_HEIGHT,
    TOTALS_ROW_HEIGHT,
};
use crate::layout::row_height::{measure_rows, MeasuredRow};
use crate::layout::table::{Cell, Slot, Table, TableRow, HEADER_GRAY};
use crate::models::census::{BusinessRecord, IndustryCategory, LocationRecord, SummaryCounts};
use crate::pdf::writer::write_pdf;

/// Block IV column widths: No, Nama Usaha, Nama Pemilik, 3.1–3.7, Jumlah Tenaga Kerja.
pub const BLOCK_IV_COLUMNS: [f32; 11] = [
    30.0, 100.0, 100.0, 30.0, 30.0, 30.0, 30.0, 30.0, 30.0, 30.0, 60.0,
];
/// Horizontal inset inside Block IV cells.
pub const ROW_PADDING: f32 = 3.0;
/// Business and owner names wrap at their column width minus this.
pub const NAME_WRAP_INSET: f32 = 12.0;

const BLOCK_IV_TITLE: &str = "BLOK IV. KETERANGAN USAHA";

/// Everything about a render that is not input data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub titles: ReportTitles,
    pub overflow_policy: OverflowPolicy,
    pub geometry: PageGeometry,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            titles: ReportTitles::default(),
            overflow_policy: OverflowPolicy::Fail,
            geometry: PageGeometry::letter(),
        }
    }
}

/// Aggregates printed in the Block IV totals row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockTotals {
    /// Businesses carrying each category, indexed by [`IndustryCategory::index`].
    pub per_category: [u32; 7],
    pub workers: u64,
}

impl BlockTotals {
    /// Single pass over the records.
    pub fn compute(businesses: &[BusinessRecord]) -> Self {
        let mut totals = Self::default();
        for business in businesses {
            for category in &business.category_codes {
                totals.per_category[category.index()] += 1;
            }
            totals.workers += u64::from(business.worker_count);
        }
        totals
    }
}

/// Where one business row landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedRow {
    pub ordinal: usize,
    pub page_number: u32,
    pub top: f32,
    pub height: f32,
}

/// A fully laid-out report, ready to serialise.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub pages: Vec<DisplayPage>,
    pub rows: Vec<PlacedRow>,
    pub totals: BlockTotals,
    /// Page carrying the totals row.
    pub totals_page: u32,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// A rendered report: its PDF bytes plus the layout summary.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub row_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the report without serialising it.
pub fn assemble(
    location: &LocationRecord,
    summary: &SummaryCounts,
    businesses: &[BusinessRecord],
    config: &ReportConfig,
) -> Result<ReportLayout, ReportError> {
    let mut canvas = ReportCanvas::new(config.geometry, config.titles.clone());

    for block in [FixedBlock::Location, FixedBlock::Enumeration, FixedBlock::Recap] {
        draw_block(&mut canvas, block, location, summary);
    }
    canvas.break_page(BLOCK_IV_TITLE);

    let totals = BlockTotals::compute(businesses);
    let measured = measure_rows(
        businesses,
        BLOCK_IV_COLUMNS[1] - NAME_WRAP_INSET,
        BLOCK_IV_COLUMNS[2] - NAME_WRAP_INSET,
        BODY_FONT,
    );
    let heights: Vec<f32> = measured.iter().map(|row| row.height).collect();

    let x = config.geometry.margin;
    let header = block_iv_header();
    debug_assert!((header.height() - BLOCK_IV_HEADER_HEIGHT).abs() < 1e-3);
    let mut paginator = Paginator::new(
        &heights,
        &config.geometry,
        PaginatorConfig::block_iv(config.overflow_policy),
    );
    let mut rows = Vec::with_capacity(measured.len());
    let mut totals_page = canvas.page_number();

    while let Some(event) = paginator.step(&mut canvas.state)? {
        match event {
            PaginationEvent::PageBreak { reason, .. } => {
                canvas.sync_page(&format!("{reason:?}"));
            }
            PaginationEvent::Header { top, .. } => {
                canvas.extend(header.draw(x, top));
            }
            PaginationEvent::Row {
                page_number,
                index,
                top,
                height,
            } => {
                let row = &measured[index];
                canvas.extend(business_row(row, &businesses[index]).draw(x, top));
                rows.push(PlacedRow {
                    ordinal: row.ordinal,
                    page_number,
                    top,
                    height,
                });
            }
            PaginationEvent::Totals { page_number, top } => {
                canvas.extend(totals_row(&totals).draw(x, top));
                totals_page = page_number;
            }
        }
    }

    Ok(ReportLayout {
        pages: canvas.finish(),
        rows,
        totals,
        totals_page,
    })
}

/// Lays out and serialises the report to PDF bytes.
pub fn render(
    location: &LocationRecord,
    summary: &SummaryCounts,
    businesses: &[BusinessRecord],
    config: &ReportConfig,
) -> Result<RenderedReport, ReportError> {
    let layout = assemble(location, summary, businesses, config)?;
    let bytes = write_pdf(&layout.pages, &config.geometry)?;

    info!(
        pages = layout.page_count(),
        rows = layout.rows.len(),
        bytes = bytes.len(),
        "report rendered"
    );

    Ok(RenderedReport {
        bytes,
        page_count: layout.page_count(),
        row_count: layout.rows.len(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Block IV tables
// ────────────────────────────────────────────────────────────────────────────

fn block_iv_table() -> Table {
    Table::new(BLOCK_IV_COLUMNS.to_vec(), ROW_PADDING)
}

fn header_cell(text: &str) -> Cell {
    Cell::text(text, BODY_FONT).centered().background(HEADER_GRAY)
}

/// Title row plus the two-row column spec; 80pt in total.
fn block_iv_header() -> Table {
    let mut table = block_iv_table();
    table.push_row(TableRow::cells(
        20.0,
        vec![Cell::text(BLOCK_IV_TITLE, BOLD_FONT)
            .span(BLOCK_IV_COLUMNS.len())
            .centered()
            .background(HEADER_GRAY)],
    ));
    table.push_row(TableRow::cells(
        30.0,
        vec![
            header_cell("No").row_span(2),
            header_cell("Nama Usaha").row_span(2),
            header_cell("Nama Pemilik").row_span(2),
            header_cell("Kode Jenis Industri\nMikro Kecil dan Menengah").span(7),
            header_cell("Jumlah\nTenaga Kerja").row_span(2),
        ],
    ));

    let mut codes = vec![Slot::Covered, Slot::Covered, Slot::Covered];
    codes.extend(
        IndustryCategory::ALL
            .iter()
            .map(|category| Slot::from(header_cell(category.code()))),
    );
    codes.push(Slot::Covered);
    table.push_row(TableRow::new(30.0, codes));
    table
}

fn business_row(row: &MeasuredRow, business: &BusinessRecord) -> Table {
    let mut cells = vec![
        Cell::text(row.ordinal.to_string(), BODY_FONT).centered(),
        Cell::lines(row.business_name.lines.clone(), BODY_FONT),
        Cell::lines(row.owner_name.lines.clone(), BODY_FONT),
    ];
    cells.extend(IndustryCategory::ALL.iter().map(|&category| {
        if business.has_category(category) {
            Cell::check(BODY_FONT)
        } else {
            Cell::empty(BODY_FONT)
        }
    }));
    cells.push(Cell::text(business.worker_count.to_string(), BODY_FONT).centered());

    let mut table = block_iv_table();
    table.push_row(TableRow::cells(row.height, cells));
    table
}

fn totals_row(totals: &BlockTotals) -> Table {
    let total_cell = |text: String| Cell::text(text, BOLD_FONT).centered().background(HEADER_GRAY);

    let mut cells = vec![total_cell("Jumlah".to_string()).span(3)];
    cells.extend(totals.per_category.iter().map(|count| total_cell(count.to_string())));
    cells.push(total_cell(totals.workers.to_string()));

    let mut table = block_iv_table();
    table.push_row(TableRow::cells(TOTALS_ROW_HEIGHT, cells));
    table
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
