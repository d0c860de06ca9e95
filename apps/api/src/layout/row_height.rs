//! Row-height measurement for Block IV business rows.

use crate::layout::font_metrics::FontSpec;
use crate::layout::geometry::BASE_LINE_HEIGHT;
use crate::layout::wrap::{wrap_text, WrappedCell};
use crate::models::census::BusinessRecord;

/// Height of a business row: the taller of its two wrapped name fields, at least
/// one line, times [`BASE_LINE_HEIGHT`].
pub fn row_height(
    business_name: &str,
    owner_name: &str,
    col_width_name: f32,
    col_width_owner: f32,
    font: FontSpec,
) -> f32 {
    let name_lines = wrap_text(business_name, font, col_width_name).line_count();
    let owner_lines = wrap_text(owner_name, font, col_width_owner).line_count();
    name_lines.max(owner_lines).max(1) as f32 * BASE_LINE_HEIGHT
}

/// A business row with its wrapped cells and final height.
///
/// Wrapping is deterministic, so the drawn lines are the ones [`row_height`] counted.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    /// 1-based position in the input.
    pub ordinal: usize,
    pub business_name: WrappedCell,
    pub owner_name: WrappedCell,
    pub height: f32,
}

/// Wraps and measures every business in input order.
pub fn measure_rows(
    businesses: &[BusinessRecord],
    text_width_name: f32,
    text_width_owner: f32,
    font: FontSpec,
) -> Vec<MeasuredRow> {
    businesses
        .iter()
        .enumerate()
        .map(|(i, business)| {
            let height = row_height(
                &business.business_name,
                &business.owner_name,
                text_width_name,
                text_width_owner,
                font,
            );
            let name = wrap_text(&business.business_name, font, text_width_name);
            let owner = wrap_text(&business.owner_name, font, text_width_owner);
            MeasuredRow {
                ordinal: i + 1,
                business_name: name,
                owner_name: owner,
                height,
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
