use crate::dom::{js_err, rect_of};
use crate::markup;
use proximity_core::{split_words, GeometryProvider, GlyphStyleSink, GlyphTextSink, Rect};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Glyph cells rendered into a target element, in label order.
pub struct GlyphMarkup {
    pub cells: Vec<web::HtmlElement>,
}

fn span(document: &web::Document, style: &str) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element("span")
        .map_err(js_err)?
        .dyn_into::<web::HtmlElement>()
        .map_err(|_| anyhow::anyhow!("span is not an HtmlElement"))?;
    el.set_attribute("style", style).map_err(js_err)?;
    Ok(el)
}

/// Replace `target`'s content with word groups of per-glyph cells styled with
/// `glyph_style`, plus a visually hidden copy of the label for screen readers.
pub fn render_label(
    document: &web::Document,
    target: &web::HtmlElement,
    label: &str,
    glyph_style: &str,
) -> anyhow::Result<GlyphMarkup> {
    target.set_text_content(None);
    let words = split_words(label);
    let mut cells = Vec::new();
    for (i, word) in words.iter().enumerate() {
        let word_el = span(document, markup::WORD_STYLE)?;
        for ch in word {
            let cell = span(document, glyph_style)?;
            cell.set_attribute("aria-hidden", "true").map_err(js_err)?;
            cell.set_text_content(Some(&ch.to_string()));
            word_el.append_child(&cell).map_err(js_err)?;
            cells.push(cell);
        }
        target.append_child(&word_el).map_err(js_err)?;
        if i + 1 < words.len() {
            let spacer = span(document, markup::SPACER_STYLE)?;
            spacer.set_text_content(Some(markup::NBSP));
            target.append_child(&spacer).map_err(js_err)?;
        }
    }
    let sr = span(document, markup::SR_ONLY_STYLE)?;
    sr.set_text_content(Some(label));
    target.append_child(&sr).map_err(js_err)?;
    Ok(GlyphMarkup { cells })
}

/// Live layout reads for the text effect.
pub struct DomGlyphLayout {
    container: web::Element,
    cells: Vec<web::HtmlElement>,
}

impl DomGlyphLayout {
    pub fn new(container: web::Element, cells: Vec<web::HtmlElement>) -> Self {
        Self { container, cells }
    }
}

impl GeometryProvider for DomGlyphLayout {
    fn container_rect(&self) -> Option<Rect> {
        Some(rect_of(&self.container))
    }

    fn glyph_rect(&self, index: usize) -> Option<Rect> {
        self.cells.get(index).map(|c| rect_of(c))
    }
}

/// Writes `font-variation-settings` onto the glyph cells.
pub struct DomGlyphSink {
    cells: Vec<web::HtmlElement>,
}

impl DomGlyphSink {
    pub fn new(cells: Vec<web::HtmlElement>) -> Self {
        Self { cells }
    }
}

impl GlyphStyleSink for DomGlyphSink {
    fn set_variation_settings(&mut self, index: usize, settings: &str) {
        if let Some(cell) = self.cells.get(index) {
            let _ = cell
                .style()
                .set_property("font-variation-settings", settings);
        }
    }
}

/// Writes the displayed character into the glyph cells.
pub struct DomGlyphText {
    cells: Vec<web::HtmlElement>,
}

impl DomGlyphText {
    pub fn new(cells: Vec<web::HtmlElement>) -> Self {
        Self { cells }
    }
}

impl GlyphTextSink for DomGlyphText {
    fn set_glyph_text(&mut self, index: usize, ch: char) {
        if let Some(cell) = self.cells.get(index) {
            cell.set_text_content(Some(&ch.to_string()));
        }
    }
}
