//! SVG renderer: converts a `RenderSpec` into a standalone SVG string.

use std::fmt::Write as _;

use covermap_protocol::{RenderCommand, RenderSpec, TextAlign};

/// Render a spec as an SVG document string.
///
/// The spec's `width` and `height` become both the viewBox and the pixel
/// size. Groups become nested `<g>` elements so the document mirrors the
/// tree.
pub fn render_svg(spec: &RenderSpec) -> String {
    let (width, height) = (spec.width, spec.height);
    let mut svg = String::with_capacity(spec.commands.len() * 160 + 256);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );
    let _ = write!(
        svg,
        r##"<rect width="{width}" height="{height}" fill="#ffffff"/>"##,
    );

    for cmd in &spec.commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                fill,
                border,
                tooltip,
                ..
            } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                    fmt_num(rect.x),
                    fmt_num(rect.y),
                    fmt_num(rect.w),
                    fmt_num(rect.h),
                    fill.to_hex(),
                );
                if let Some(border) = border {
                    let _ = write!(svg, r#" stroke="{}" stroke-width="1""#, border.to_hex());
                }
                match tooltip {
                    Some(tip) => {
                        let _ = write!(svg, "><title>{}</title></rect>", escape_xml(tip));
                    }
                    None => svg.push_str("/>"),
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{}" text-anchor="{anchor}" style="pointer-events:none">{}</text>"#,
                    fmt_num(position.x),
                    fmt_num(position.y),
                    color.to_hex(),
                    fmt_num(*font_size),
                    escape_xml(text),
                );
            }
            RenderCommand::BeginGroup { id } => {
                let _ = write!(svg, r#"<g data-path="{}">"#, escape_xml(id));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Two decimals, trailing zeros trimmed.
fn fmt_num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use covermap_protocol::{Color, Point, Rect};

    fn spec(commands: Vec<RenderCommand>) -> RenderSpec {
        RenderSpec {
            width: 800.0,
            height: 400.0,
            commands,
        }
    }

    #[test]
    fn basic_svg_output() {
        let svg = render_svg(&spec(vec![RenderCommand::DrawRect {
            rect: Rect::new(10.0, 20.5, 100.0, 18.0),
            fill: Color::rgb8(0x1a, 0x98, 0x50),
            border: Some(Color::rgb8(128, 128, 128)),
            path: "main.go".into(),
            tooltip: Some("main.go (100.0% covered)".into()),
        }]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 800 400""#));
        assert!(svg.contains(r##"x="10" y="20.5""##));
        assert!(svg.contains("#1a9850"));
        assert!(svg.contains(r##"stroke="#808080""##));
        assert!(svg.contains("<title>main.go (100.0% covered)</title>"));
    }

    #[test]
    fn escapes_xml_entities() {
        let svg = render_svg(&spec(vec![RenderCommand::DrawText {
            position: Point::new(0.0, 0.0),
            text: "a<b>&\"c\"".into(),
            color: Color::rgb8(0, 0, 0),
            font_size: 10.0,
            align: TextAlign::Center,
        }]));
        assert!(svg.contains("a&lt;b&gt;&amp;&quot;c&quot;"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn groups_nest() {
        let svg = render_svg(&spec(vec![
            RenderCommand::BeginGroup { id: "pkg".into() },
            RenderCommand::EndGroup,
        ]));
        assert!(svg.contains(r#"<g data-path="pkg"></g>"#));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(16.0), "16");
        assert_eq!(fmt_num(1.1), "1.1");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(0.0), "0");
    }
}
