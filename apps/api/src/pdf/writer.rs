//! Translates display pages into a PDF document with `lopdf`.
//!
//! Both faces are standard Type1 fonts referenced by name, so nothing is embedded
//! and the advances the viewer uses are the ones layout measured with. No creation
//! date or ID is written: identical layouts give identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::errors::ReportError;
use crate::layout::display::{DisplayPage, DrawOp, Rect};
use crate::layout::font_metrics::{win_ansi_byte, FontFace};
use crate::layout::geometry::PageGeometry;

/// Serialises `pages` in order into a complete PDF file.
pub fn write_pdf(pages: &[DisplayPage], geometry: &PageGeometry) -> Result<Vec<u8>, ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = add_font_resources(&mut doc);

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                geometry.page_width.into(),
                geometry.page_height.into(),
            ],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn add_font_resources(doc: &mut Document) -> ObjectId {
    let mut fonts = lopdf::Dictionary::new();
    for face in [FontFace::TimesRoman, FontFace::TimesBold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    doc.add_object(dictionary! { "Font" => fonts })
}

// ────────────────────────────────────────────────────────────────────────────
// Content stream
// ────────────────────────────────────────────────────────────────────────────

fn page_operations(page: &DisplayPage) -> Vec<Operation> {
    let mut ops = Vec::new();
    for item in &page.items {
        match item {
            DrawOp::Text { x, y, font, text } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(font.face.resource_name().as_bytes().to_vec()),
                        font.size.into(),
                    ],
                ));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(text))],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::FillRect { rect, gray } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("g", vec![(*gray).into()]));
                ops.push(rect_op(rect));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::StrokeRect { rect, line_width } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("w", vec![(*line_width).into()]));
                ops.push(Operation::new("G", vec![0.into()]));
                ops.push(rect_op(rect));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::Polyline { points, line_width } => {
                let Some((&(x0, y0), rest)) = points.split_first() else {
                    continue;
                };
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("w", vec![(*line_width).into()]));
                ops.push(Operation::new("m", vec![x0.into(), y0.into()]));
                for &(x, y) in rest {
                    ops.push(Operation::new("l", vec![x.into(), y.into()]));
                }
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    ops
}

fn rect_op(rect: &Rect) -> Operation {
    Operation::new(
        "re",
        vec![
            rect.x.into(),
            rect.y.into(),
            rect.width.into(),
            rect.height.into(),
        ],
    )
}

/// Same byte choice as layout measurement: unencodable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::FontSpec;

    fn make_page(page_number: u32, text: &str) -> DisplayPage {
        let mut page = DisplayPage::new(page_number);
        page.items.push(DrawOp::FillRect {
            rect: Rect::new(50.0, 600.0, 100.0, 20.0),
            gray: 0.83,
        });
        page.items.push(DrawOp::Text {
            x: 55.0,
            y: 605.0,
            font: FontSpec::new(FontFace::TimesBold, 10.0),
            text: text.to_string(),
        });
        page.items.push(DrawOp::StrokeRect {
            rect: Rect::new(50.0, 600.0, 100.0, 20.0),
            line_width: 0.5,
        });
        page.items.push(DrawOp::Polyline {
            points: vec![(60.0, 610.0), (62.0, 607.0), (66.0, 614.0)],
            line_width: 1.0,
        });
        page
    }

    #[test]
    fn test_page_count_and_media_box() {
        let pages = vec![make_page(1, "satu"), make_page(2, "dua"), make_page(3, "tiga")];
        let bytes = write_pdf(&pages, &PageGeometry::letter()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        let page_ids = doc.get_pages();
        assert_eq!(page_ids.len(), 3);

        let first = doc.get_dictionary(page_ids[&1]).unwrap();
        let media_box = first.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[3].as_float().unwrap(), 792.0);
    }

    #[test]
    fn test_text_reaches_content_stream() {
        let bytes = write_pdf(&[make_page(1, "Jumlah")], &PageGeometry::letter()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = doc.get_pages()[&1];
        let content = doc.get_and_decode_page_content(page_id).unwrap();

        let shown: Vec<&Operation> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .collect();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].operands[0].as_str().unwrap(), b"Jumlah");
        assert!(content.operations.iter().any(|op| op.operator == "re"));
    }

    #[test]
    fn test_fonts_are_standard_type1() {
        let bytes = write_pdf(&[make_page(1, "x")], &PageGeometry::letter()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let mut names: Vec<String> = doc
            .objects
            .values()
            .filter_map(|object| object.as_dict().ok())
            .filter(|dict| dict.get(b"Type").and_then(Object::as_name).ok() == Some(&b"Font"[..]))
            .map(|dict| {
                assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Type1");
                String::from_utf8_lossy(dict.get(b"BaseFont").unwrap().as_name().unwrap())
                    .into_owned()
            })
            .collect();
        names.sort();
        assert_eq!(names, vec!["Times-Bold", "Times-Roman"]);
    }

    #[test]
    fn test_non_latin_characters_become_question_marks() {
        assert_eq!(encode_win_ansi("Café"), b"Caf\xe9".to_vec());
        assert_eq!(encode_win_ansi("Ω"), b"?".to_vec());
        assert_eq!(encode_win_ansi("Æ\u{0085}€"), vec![0xC6, b'?', b'?']);
    }

    #[test]
    fn test_output_is_deterministic() {
        let pages = vec![make_page(1, "a"), make_page(2, "b")];
        let a = write_pdf(&pages, &PageGeometry::letter()).unwrap();
        let b = write_pdf(&pages, &PageGeometry::letter()).unwrap();
        assert_eq!(a, b);
    }
}
