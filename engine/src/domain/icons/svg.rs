//! SVG markup for marker icons and cluster badges.

use crate::domain::category::LocationCategory;

use super::IconStyle;

const STROKE: &str = "#FFFFFF";
const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";
/// Pictogram paths are authored on a 24x24 grid.
const PICTOGRAM_GRID: f64 = 24.0;

/// Marker icon markup for a category at `size` pixels.
pub(super) fn marker_markup(category: LocationCategory, size: u32, style: IconStyle) -> String {
    let side = f64::from(size);
    let centre = side / 2.0;
    // Live icons reserve an outer band for the pulsing ring.
    let radius = if category.is_live() {
        side * 0.36
    } else {
        (centre - 2.0).max(centre / 2.0)
    };
    let color = category.color();
    let gradient_id = format!("fill-{}", category.as_str());

    let mut svg = open_svg(size);
    let fill = match style {
        IconStyle::Standard => color.to_owned(),
        IconStyle::Emphasis => {
            push_emphasis_defs(&mut svg, &gradient_id, color);
            format!("url(#{gradient_id})")
        }
    };

    if category.is_live() {
        push_live_ring(&mut svg, centre, radius, color);
    }

    let filter = match style {
        IconStyle::Standard => "",
        IconStyle::Emphasis => r#" filter="url(#shadow)""#,
    };
    svg.push_str(&format!(
        r#"<circle cx="{centre}" cy="{centre}" r="{radius}" fill="{fill}" stroke="{STROKE}" stroke-width="2"{filter}/>"#
    ));

    match category.pictogram() {
        Some(path) => {
            let glyph = radius * 1.1;
            let scale = glyph / PICTOGRAM_GRID;
            let offset = centre - glyph / 2.0;
            svg.push_str(&format!(
                r#"<g transform="translate({offset} {offset}) scale({scale})"><path d="{path}" fill="{STROKE}"/></g>"#
            ));
        }
        None => push_label(&mut svg, centre, radius * 0.8, category.label()),
    }

    svg.push_str("</svg>");
    svg
}

/// Cluster badge markup showing `label` on a `color` disc.
pub(super) fn badge_markup(label: &str, color: &str, size: u32) -> String {
    let side = f64::from(size);
    let centre = side / 2.0;
    let inner = centre - 4.0;
    let font_size = if label.len() > 2 {
        side * 0.3
    } else {
        side * 0.4
    };

    let mut svg = open_svg(size);
    svg.push_str(&format!(
        r#"<circle cx="{centre}" cy="{centre}" r="{centre}" fill="{color}" fill-opacity="0.3"/>"#
    ));
    svg.push_str(&format!(
        r#"<circle cx="{centre}" cy="{centre}" r="{inner}" fill="{color}" stroke="{STROKE}" stroke-width="2"/>"#
    ));
    push_label(&mut svg, centre, font_size, label);
    svg.push_str("</svg>");
    svg
}

fn open_svg(size: u32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    )
}

fn push_emphasis_defs(svg: &mut String, gradient_id: &str, color: &str) {
    svg.push_str(&format!(
        concat!(
            r#"<defs><radialGradient id="{id}" cx="35%" cy="35%" r="70%">"#,
            r#"<stop offset="0%" stop-color="{stroke}" stop-opacity="0.55"/>"#,
            r#"<stop offset="45%" stop-color="{color}"/>"#,
            r#"<stop offset="100%" stop-color="{color}"/></radialGradient>"#,
            r#"<filter id="shadow" x="-30%" y="-30%" width="160%" height="160%">"#,
            r##"<feDropShadow dx="0" dy="1" stdDeviation="1.5" flood-color="#000000" flood-opacity="0.45"/>"##,
            r#"</filter></defs>"#,
        ),
        id = gradient_id,
        stroke = STROKE,
        color = color,
    ));
}

fn push_live_ring(svg: &mut String, centre: f64, radius: f64, color: &str) {
    let outer = centre - 1.0;
    svg.push_str(&format!(
        concat!(
            r#"<circle cx="{c}" cy="{c}" r="{r}" fill="none" stroke="{color}" stroke-width="2">"#,
            r#"<animate attributeName="r" from="{r}" to="{outer}" dur="1.5s" repeatCount="indefinite"/>"#,
            r#"<animate attributeName="opacity" from="0.8" to="0" dur="1.5s" repeatCount="indefinite"/>"#,
            r#"</circle>"#,
        ),
        c = centre,
        r = radius,
        outer = outer,
        color = color,
    ));
}

fn push_label(svg: &mut String, centre: f64, font_size: f64, label: &str) {
    svg.push_str(&format!(
        r#"<text x="{centre}" y="{centre}" text-anchor="middle" dominant-baseline="central" font-family="{FONT_FAMILY}" font-size="{font_size}" font-weight="bold" fill="{STROKE}">{label}</text>"#
    ));
}
