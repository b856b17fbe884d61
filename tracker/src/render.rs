use shared::{CanvasSize, PixelPoint};

pub const STROKE_COLOR: &str = "#2ecc71";
pub const STROKE_WIDTH: f64 = 2.0;

/// Draw the projected path as an SVG polyline on a blank canvas.
pub fn render_svg(pixels: &[PixelPoint], canvas: CanvasSize) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" \
         width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = canvas.width,
        h = canvas.height
    );

    if pixels.len() >= 2 {
        let points = pixels
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        svg.push_str(&format!(
            "  <polyline fill=\"none\" stroke=\"{STROKE_COLOR}\" \
             stroke-width=\"{STROKE_WIDTH}\" points=\"{points}\"/>\n"
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
