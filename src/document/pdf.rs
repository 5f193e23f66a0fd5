//! PDF emission of a [`DocumentLayout`]

use crate::core::error::RenderError;
use crate::document::layout::{DocumentLayout, FontWeight, PageLayout};
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

const LAYER_NAME: &str = "Layer 1";
const RULE_THICKNESS: f32 = 0.5;

/// Draw every page of `layout` and return the PDF bytes
pub fn write_pdf(layout: &DocumentLayout, title: &str, creator: &str) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(layout.width), Mm(layout.height), LAYER_NAME);
    let doc = doc.with_creator(creator).with_producer(creator);

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
    let fonts = Fonts { regular, bold };

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(layout.width), Mm(layout.height), LAYER_NAME);
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, layout.height, &fonts);
    }

    doc.save_to_bytes().map_err(pdf_error)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Layout coordinates grow downwards from the top; PDF ones grow upwards
fn draw_page(layer: &PdfLayerReference, page: &PageLayout, height: f32, fonts: &Fonts) {
    layer.set_outline_thickness(RULE_THICKNESS);
    for rule in &page.rules {
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(rule.x1), Mm(height - rule.y1)), false),
                (Point::new(Mm(rule.x2), Mm(height - rule.y2)), false),
            ],
            is_closed: false,
        });
    }

    for run in &page.texts {
        let font = match run.weight {
            FontWeight::Regular => &fonts.regular,
            FontWeight::Bold => &fonts.bold,
        };
        layer.use_text(run.text.as_str(), run.size, Mm(run.x), Mm(height - run.y), font);
    }
}

fn pdf_error(err: printpdf::Error) -> RenderError {
    RenderError::Pdf {
        message: err.to_string(),
    }
}
