use crate::options::OverlayOptions;
use crate::overlay::{DrawnBox, DrawnEdge, DrawnLabel, OverlayFrame};
use std::fmt::Write as _;

const ARROWHEAD_WIDTH: f64 = 8.0;
const ARROWHEAD_HEIGHT: f64 = 6.0;
const ANCHOR_BOX_STROKE: &str = "#cbd5e1";

/// Serializes a frame as a standalone overlay `<svg>`.
///
/// The surface covers its container (`width/height: 100%`, `viewBox` = container size, no
/// aspect-ratio correction) and never receives pointer input. Output depends only on `frame`
/// and `options`.
pub fn render_overlay_svg(frame: &OverlayFrame, options: &OverlayOptions) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg""#);
    if let Some(id) = options.svg_id.as_deref().filter(|id| !id.is_empty()) {
        let _ = write!(&mut out, r#" id="{}""#, escape_attr(id));
    }
    let _ = writeln!(
        &mut out,
        r#" class="tether-overlay" viewBox="0 0 {} {}" preserveAspectRatio="none" style="position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;z-index:1">"#,
        fmt(frame.width.max(0.0)),
        fmt(frame.height.max(0.0))
    );

    if !frame.edges.is_empty() {
        out.push_str("<defs>\n");
        for e in &frame.edges {
            render_marker(&mut out, e);
        }
        out.push_str("</defs>\n");
    }

    if options.include_anchor_boxes {
        out.push_str(r#"<g class="anchors">"#);
        for b in &frame.boxes {
            render_anchor_box(&mut out, b);
        }
        out.push_str("</g>\n");
    }

    out.push_str(r#"<g class="edges">"#);
    for e in &frame.edges {
        render_edge(&mut out, e, options);
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="labels">"#);
    for l in &frame.labels {
        render_label(&mut out, l, options);
    }
    out.push_str("</g>\n");

    out.push_str("</svg>\n");
    out
}

fn render_marker(out: &mut String, e: &DrawnEdge) {
    let _ = writeln!(
        out,
        r#"<marker id="{}" markerWidth="{}" markerHeight="{}" refX="{}" refY="{}" orient="auto"><polygon points="0 0,{} {},0 {}" fill="{}" /></marker>"#,
        escape_attr(&e.marker_id),
        fmt(ARROWHEAD_WIDTH),
        fmt(ARROWHEAD_HEIGHT),
        fmt(ARROWHEAD_WIDTH),
        fmt(ARROWHEAD_HEIGHT / 2.0),
        fmt(ARROWHEAD_WIDTH),
        fmt(ARROWHEAD_HEIGHT / 2.0),
        fmt(ARROWHEAD_HEIGHT),
        e.stroke
    );
}

fn render_edge(out: &mut String, e: &DrawnEdge, options: &OverlayOptions) {
    let _ = write!(
        out,
        r#"<line data-from="{}" data-to="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" marker-end="url(#{})" />"#,
        escape_attr(&e.from),
        escape_attr(&e.to),
        fmt(e.line.x1),
        fmt(e.line.y1),
        fmt(e.line.x2),
        fmt(e.line.y2),
        e.stroke,
        fmt(options.stroke_width),
        escape_attr(&e.marker_id)
    );
}

fn render_label(out: &mut String, l: &DrawnLabel, options: &OverlayOptions) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" fill="{}" font-size="{}" font-weight="{}" font-family="{}">{}</text>"#,
        fmt(l.x),
        fmt(l.y),
        escape_attr(&options.label_color),
        fmt(options.label_font_size),
        options.label_font_weight,
        escape_attr(&options.font_family),
        escape_xml(&l.text)
    );
}

fn render_anchor_box(out: &mut String, b: &DrawnBox) {
    let _ = write!(
        out,
        r#"<rect data-id="{}" x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-dasharray="4 2" />"#,
        escape_attr(&b.id),
        fmt(b.rect.x),
        fmt(b.rect.y),
        fmt(b.rect.width),
        fmt(b.rect.height),
        ANCHOR_BOX_STROKE
    );
}

fn fmt(v: f64) -> String {
    // Shortest round-trippable form, without `-0` or tiny float noise.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
