// Inline styles and small string builders for the effect markup.
// Kept free of web-sys so it can be tested host-side.

pub const WORD_STYLE: &str = "display:inline-block;white-space:nowrap";
pub const SPACER_STYLE: &str = "display:inline-block";
pub const SCRAMBLE_GLYPH_STYLE: &str = "display:inline-block";
pub const CANVAS_STYLE: &str = "display:block";

// Visually hidden but read by assistive technology.
pub const SR_ONLY_STYLE: &str = "position:absolute;width:1px;height:1px;padding:0;margin:-1px;\
overflow:hidden;clip:rect(0,0,0,0);white-space:nowrap;border:0";

pub const NBSP: &str = "\u{00a0}";

#[inline]
pub fn glyph_style(near_settings: &str) -> String {
    format!(
        "display:inline-block;letter-spacing:0.01em;font-variation-settings:{}",
        near_settings
    )
}

#[inline]
pub fn translate(x: f32, y: f32) -> String {
    format!("translate3d({}px, {}px, 0)", x, y)
}

#[inline]
pub fn px(v: f64) -> String {
    format!("{}px", v)
}
