//! Tabular paginator for Block IV.
//!
//! A state machine over pre-measured row heights. Each [`Paginator::step`] mutates
//! the layout cursor and yields one [`PaginationEvent`]; the caller draws whatever
//! the event names at the position it carries.
//!
//! ```text
//! AwaitingHeader ──► RenderingHeader ──► RenderingRows ──┬──► AwaitingTotals ──► Done
//!       ▲                                      │          │
//!       └──────────── page break ◄─────────────┴──────────┘ (row/totals do not fit)
//! ```
//!
//! Every page that carries rows or the totals row starts with the column header.
//! At most `row_budget` rows are attempted per page, and only as many as actually
//! fit are committed; the rest carry over to the next page.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ReportError;
use crate::layout::geometry::{PageGeometry, PageLayoutState, BASE_LINE_HEIGHT, ROW_HEIGHT};

/// Height of the Block IV title row plus its two-row column spec.
pub const BLOCK_IV_HEADER_HEIGHT: f32 = 80.0;
/// Height of the trailing "Jumlah" row.
pub const TOTALS_ROW_HEIGHT: f32 = BASE_LINE_HEIGHT;

/// What to do with a row taller than an empty page's row area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Abort the render with [`ReportError::LayoutOverflow`].
    #[default]
    Fail,
    /// Draw the row anyway on its own page, crossing the bottom margin.
    ForceDraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaginatorConfig {
    pub header_height: f32,
    pub totals_height: f32,
    /// Row height assumed when estimating the per-page row budget.
    pub nominal_row_height: f32,
    pub overflow: OverflowPolicy,
}

impl PaginatorConfig {
    pub fn block_iv(overflow: OverflowPolicy) -> Self {
        Self {
            header_height: BLOCK_IV_HEADER_HEIGHT,
            totals_height: TOTALS_ROW_HEIGHT,
            nominal_row_height: ROW_HEIGHT,
            overflow,
        }
    }

    /// `floor(row area / nominal row height)`, never less than one.
    pub fn row_budget(&self, geometry: &PageGeometry) -> usize {
        let row_area = geometry.content_height() - self.header_height;
        ((row_area / self.nominal_row_height).floor() as usize).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakReason {
    /// The next row is taller than the space left.
    RowDoesNotFit,
    /// The page already holds its budgeted number of rows.
    RowBudgetReached,
    /// All rows are placed but the totals row does not fit.
    TotalsDoNotFit,
}

/// One layout decision. `top` is the y of the element's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaginationEvent {
    PageBreak {
        page_number: u32,
        reason: BreakReason,
    },
    Header {
        page_number: u32,
        top: f32,
    },
    Row {
        page_number: u32,
        index: usize,
        top: f32,
        height: f32,
    },
    Totals {
        page_number: u32,
        top: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingHeader,
    RenderingHeader,
    RenderingRows,
    AwaitingTotals,
    Done,
}

pub struct Paginator<'a> {
    row_heights: &'a [f32],
    config: PaginatorConfig,
    row_budget: usize,
    phase: Phase,
    pending_break: Option<BreakReason>,
    next_row: usize,
    rows_on_page: usize,
}

impl<'a> Paginator<'a> {
    /// Starts in `AwaitingHeader`; the first header is drawn at the current cursor
    /// without a page break.
    pub fn new(row_heights: &'a [f32], geometry: &PageGeometry, config: PaginatorConfig) -> Self {
        Self {
            row_heights,
            config,
            row_budget: config.row_budget(geometry),
            phase: Phase::AwaitingHeader,
            pending_break: None,
            next_row: 0,
            rows_on_page: 0,
        }
    }

    #[cfg(test)]
    pub fn row_budget(&self) -> usize {
        self.row_budget
    }

    /// Advances to the next event, mutating `state`. Returns `Ok(None)` once done.
    pub fn step(
        &mut self,
        state: &mut PageLayoutState,
    ) -> Result<Option<PaginationEvent>, ReportError> {
        loop {
            match self.phase {
                Phase::AwaitingHeader => {
                    if let Some(reason) = self.pending_break.take() {
                        let page_number = state.break_page();
                        return Ok(Some(PaginationEvent::PageBreak {
                            page_number,
                            reason,
                        }));
                    }
                    self.phase = Phase::RenderingHeader;
                }

                Phase::RenderingHeader => {
                    let top = state.cursor_y;
                    state.advance(self.config.header_height);
                    self.rows_on_page = 0;
                    self.phase = Phase::RenderingRows;
                    return Ok(Some(PaginationEvent::Header {
                        page_number: state.page_number,
                        top,
                    }));
                }

                Phase::RenderingRows => {
                    if self.next_row >= self.row_heights.len() {
                        // A fresh page always takes the totals, fitting or not.
                        if state.fits(self.config.totals_height) || self.rows_on_page == 0 {
                            self.phase = Phase::AwaitingTotals;
                        } else {
                            self.schedule_break(BreakReason::TotalsDoNotFit);
                        }
                        continue;
                    }

                    let index = self.next_row;
                    let height = self.row_heights[index];

                    if self.rows_on_page >= self.row_budget {
                        self.schedule_break(BreakReason::RowBudgetReached);
                        continue;
                    }
                    if !state.fits(height) {
                        if self.rows_on_page > 0 {
                            self.schedule_break(BreakReason::RowDoesNotFit);
                            continue;
                        }
                        self.handle_oversized_row(index, height, state)?;
                    }

                    let top = state.cursor_y;
                    state.advance(height);
                    self.next_row += 1;
                    self.rows_on_page += 1;
                    return Ok(Some(PaginationEvent::Row {
                        page_number: state.page_number,
                        index,
                        top,
                        height,
                    }));
                }

                Phase::AwaitingTotals => {
                    let top = state.cursor_y;
                    state.advance(self.config.totals_height);
                    self.phase = Phase::Done;
                    return Ok(Some(PaginationEvent::Totals {
                        page_number: state.page_number,
                        top,
                    }));
                }

                Phase::Done => return Ok(None),
            }
        }
    }

    /// Runs the machine to completion.
    #[cfg(test)]
    pub fn run(mut self, state: &mut PageLayoutState) -> Result<Vec<PaginationEvent>, ReportError> {
        let mut events = Vec::new();
        while let Some(event) = self.step(state)? {
            events.push(event);
        }
        Ok(events)
    }

    fn schedule_break(&mut self, reason: BreakReason) {
        self.pending_break = Some(reason);
        self.phase = Phase::AwaitingHeader;
    }

    /// Row does not fit even directly under a fresh header.
    fn handle_oversized_row(
        &self,
        index: usize,
        height: f32,
        state: &PageLayoutState,
    ) -> Result<(), ReportError> {
        match self.config.overflow {
            OverflowPolicy::Fail => Err(ReportError::LayoutOverflow {
                ordinal: index + 1,
                required: height,
                available: state.remaining(),
            }),
            OverflowPolicy::ForceDraw => {
                warn!(
                    ordinal = index + 1,
                    required = height,
                    available = state.remaining(),
                    "row taller than page, drawing past bottom margin"
                );
                Ok(())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn letter_state() -> PageLayoutState {
        PageLayoutState::new(PageGeometry::letter())
    }

    fn run_letter(heights: &[f32]) -> Vec<PaginationEvent> {
        let mut state = letter_state();
        let config = PaginatorConfig::block_iv(OverflowPolicy::Fail);
        Paginator::new(heights, &state.geometry, config)
            .run(&mut state)
            .unwrap()
    }

    /// Geometry whose row area below the header is exactly 190pt.
    fn tight_geometry() -> PageGeometry {
        PageGeometry {
            page_width: 612.0,
            page_height: 420.0,
            margin: 50.0,
            header_height: 100.0,
        }
    }

    fn tight_config() -> PaginatorConfig {
        PaginatorConfig {
            header_height: 80.0,
            totals_height: 19.0,
            nominal_row_height: 19.0,
            overflow: OverflowPolicy::Fail,
        }
    }

    fn row_pages(events: &[PaginationEvent]) -> Vec<(usize, u32)> {
        events
            .iter()
            .filter_map(|e| match e {
                PaginationEvent::Row {
                    index, page_number, ..
                } => Some((*index, *page_number)),
                _ => None,
            })
            .collect()
    }

    fn count_headers(events: &[PaginationEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, PaginationEvent::Header { .. }))
            .count()
    }

    fn totals_page(events: &[PaginationEvent]) -> u32 {
        events
            .iter()
            .find_map(|e| match e {
                PaginationEvent::Totals { page_number, .. } => Some(*page_number),
                _ => None,
            })
            .unwrap()
    }

    // ── budget ──────────────────────────────────────────────────────────────

    #[test]
    fn test_letter_row_budget_is_22() {
        let config = PaginatorConfig::block_iv(OverflowPolicy::Fail);
        assert_eq!(config.row_budget(&PageGeometry::letter()), 22);
    }

    #[test]
    fn test_row_budget_never_zero() {
        let config = PaginatorConfig {
            nominal_row_height: 10_000.0,
            ..tight_config()
        };
        assert_eq!(config.row_budget(&tight_geometry()), 1);
    }

    // ── scenarios ───────────────────────────────────────────────────────────

    #[test]
    fn test_no_rows_is_header_then_totals() {
        let events = run_letter(&[]);
        assert_eq!(
            events,
            vec![
                PaginationEvent::Header {
                    page_number: 1,
                    top: 692.0
                },
                PaginationEvent::Totals {
                    page_number: 1,
                    top: 612.0
                },
            ]
        );
    }

    #[test]
    fn test_rows_keep_input_order_exactly_once() {
        let heights = vec![19.0; 50];
        let events = run_letter(&heights);
        let indices: Vec<usize> = row_pages(&events).into_iter().map(|(i, _)| i).collect();
        assert_eq!(indices, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_budget_plus_one_spills_single_row_to_second_page() {
        let heights = vec![19.0; 23];
        let events = run_letter(&heights);
        let placement = row_pages(&events);

        assert!(placement[..22].iter().all(|&(_, page)| page == 1));
        assert_eq!(placement[22], (22, 2));
        assert_eq!(count_headers(&events), 2);
        assert_eq!(totals_page(&events), 2);
        assert!(events.contains(&PaginationEvent::PageBreak {
            page_number: 2,
            reason: BreakReason::RowBudgetReached
        }));
    }

    #[test]
    fn test_header_redrawn_before_rows_on_every_page() {
        let heights = vec![19.0; 70];
        let events = run_letter(&heights);
        for (i, event) in events.iter().enumerate() {
            if let PaginationEvent::PageBreak { page_number, .. } = event {
                assert!(matches!(
                    events[i + 1],
                    PaginationEvent::Header { page_number: p, top } if p == *page_number && top == 692.0
                ));
            }
        }
        // 70 rows at 22 per page → 4 pages of rows.
        assert_eq!(count_headers(&events), 4);
    }

    #[test]
    fn test_tall_rows_commit_fewer_than_budget() {
        // 5-line rows (95pt): only 5 fit in 562pt even though the budget is 22.
        let heights = vec![95.0; 7];
        let placement = row_pages(&run_letter(&heights));
        assert_eq!(placement.iter().filter(|&&(_, p)| p == 1).count(), 5);
        assert_eq!(placement.iter().filter(|&&(_, p)| p == 2).count(), 2);
    }

    #[test]
    fn test_shortfall_is_not_redistributed_backward() {
        // A tall row that does not fit pushes itself and everything after it forward,
        // even if later short rows would have fit on the earlier page.
        let mut heights = vec![19.0; 20];
        heights.push(200.0);
        heights.push(19.0);
        let placement = row_pages(&run_letter(&heights));
        assert_eq!(placement[20], (20, 2));
        assert_eq!(placement[21], (21, 2));
    }

    // ── boundaries ──────────────────────────────────────────────────────────

    #[test]
    fn test_rows_exactly_filling_page_do_not_break() {
        let geometry = tight_geometry();
        let mut state = PageLayoutState::new(geometry);
        let heights = vec![19.0; 10]; // 190pt == row area
        let events = Paginator::new(&heights, &geometry, tight_config())
            .run(&mut state)
            .unwrap();

        let placement = row_pages(&events);
        assert!(placement.iter().all(|&(_, page)| page == 1));
        // Nothing left for the totals: they move to page 2 under a fresh header.
        assert_eq!(totals_page(&events), 2);
        assert!(events.contains(&PaginationEvent::PageBreak {
            page_number: 2,
            reason: BreakReason::TotalsDoNotFit
        }));
        assert_eq!(count_headers(&events), 2);
    }

    #[test]
    fn test_epsilon_over_page_breaks_before_overflowing_row() {
        let geometry = tight_geometry();
        let mut state = PageLayoutState::new(geometry);
        let mut heights = vec![19.0; 9];
        heights.push(19.5); // cumulative 190.5
        let events = Paginator::new(&heights, &geometry, tight_config())
            .run(&mut state)
            .unwrap();

        let placement = row_pages(&events);
        assert!(placement[..9].iter().all(|&(_, page)| page == 1));
        assert_eq!(placement[9], (9, 2));
        assert!(events.contains(&PaginationEvent::PageBreak {
            page_number: 2,
            reason: BreakReason::RowDoesNotFit
        }));
    }

    #[test]
    fn test_totals_stay_when_they_fit() {
        let geometry = tight_geometry();
        let mut state = PageLayoutState::new(geometry);
        let heights = vec![19.0; 9]; // 171pt, 19pt left for totals
        let events = Paginator::new(&heights, &geometry, tight_config())
            .run(&mut state)
            .unwrap();
        assert_eq!(totals_page(&events), 1);
        assert_eq!(count_headers(&events), 1);
        assert_eq!(state.cursor_y, geometry.bottom());
    }

    // ── overflow ────────────────────────────────────────────────────────────

    #[test]
    fn test_oversized_row_fails_by_default() {
        let mut state = letter_state();
        let heights = vec![19.0, 700.0];
        let result = Paginator::new(
            &heights,
            &state.geometry,
            PaginatorConfig::block_iv(OverflowPolicy::Fail),
        )
        .run(&mut state);

        match result {
            Err(ReportError::LayoutOverflow {
                ordinal,
                required,
                available,
            }) => {
                assert_eq!(ordinal, 2);
                assert_eq!(required, 700.0);
                assert_eq!(available, 562.0);
            }
            other => panic!("expected LayoutOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_row_force_drawn_alone() {
        let mut state = letter_state();
        let heights = vec![19.0, 700.0, 19.0];
        let events = Paginator::new(
            &heights,
            &state.geometry,
            PaginatorConfig::block_iv(OverflowPolicy::ForceDraw),
        )
        .run(&mut state)
        .unwrap();

        let placement = row_pages(&events);
        assert_eq!(placement, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(totals_page(&events), 3);
    }

    #[test]
    fn test_page_numbers_only_increase() {
        let heights: Vec<f32> = (0..120).map(|i| 19.0 * (1 + i % 4) as f32).collect();
        let events = run_letter(&heights);
        let pages: Vec<u32> = events
            .iter()
            .map(|e| match e {
                PaginationEvent::PageBreak { page_number, .. }
                | PaginationEvent::Header { page_number, .. }
                | PaginationEvent::Row { page_number, .. }
                | PaginationEvent::Totals { page_number, .. } => *page_number,
            })
            .collect();
        assert!(pages.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_rows_never_cross_bottom_margin() {
        let heights: Vec<f32> = (0..80).map(|i| 19.0 * (1 + i % 3) as f32).collect();
        for event in run_letter(&heights) {
            if let PaginationEvent::Row { top, height, .. } = event {
                assert!(top - height >= 50.0 - 1e-3);
            }
        }
    }
}
