use crate::config::RenderConfig;
use crate::scene::Scene;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(scene: &Scene, theme: &Theme, config: &RenderConfig) -> String {
    let (min_x, min_y, max_x, max_y) = scene.bounds();
    let pad = config.padding;
    let width = (max_x - min_x + pad * 2.0).max(200.0);
    let height = (max_y - min_y + pad * 2.0).max(200.0);
    let origin_x = min_x - pad;
    let origin_y = min_y - pad;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"{origin_x:.2} {origin_y:.2} {width:.2} {height:.2}\">",
    ));

    svg.push_str(&format!(
        "<rect x=\"{origin_x:.2}\" y=\"{origin_y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"{}\" markerHeight=\"{}\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        config.arrow_size, config.arrow_size, theme.line_color
    ));
    svg.push_str("</defs>");

    for edge in &scene.edges {
        svg.push_str(&format!(
            "<path d=\"M {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.6\" marker-end=\"url(#arrow)\"/>",
            edge.start.0,
            edge.start.1,
            edge.c1.0,
            edge.c1.1,
            edge.c2.0,
            edge.c2.1,
            edge.end.0,
            edge.end.1,
            theme.line_color
        ));
    }

    for id in &scene.draw_order {
        let Some(node) = scene.nodes.get(id) else {
            continue;
        };
        let (fill, border, text) = if node.completed {
            (
                theme.completed_fill.as_str(),
                theme.completed_border.as_str(),
                theme.completed_text.as_str(),
            )
        } else {
            (
                theme.node_fill.as_str(),
                theme.node_border.as_str(),
                theme.node_text.as_str(),
            )
        };
        let left = node.x - node.width / 2.0;
        let top = node.y - node.height / 2.0;
        svg.push_str(&format!(
            "<g id=\"node-{}\" class=\"node{}\" data-group=\"{}\">",
            escape_xml(&node.id),
            if node.completed { " completed" } else { "" },
            escape_xml(&node.group)
        ));
        svg.push_str(&format!(
            "<rect x=\"{left:.2}\" y=\"{top:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" ry=\"{}\" fill=\"{fill}\" stroke=\"{border}\" stroke-width=\"1.6\"/>",
            node.width, node.height, config.corner_radius, config.corner_radius
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{text}\">{}</text>",
            node.x,
            node.y,
            theme.font_family,
            theme.font_size,
            escape_xml(&node.label)
        ));
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path) -> Result<()> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::graph::build_graph;
    use crate::layout::compute_layout;
    use crate::model::RawNode;

    fn render_basic(done: &[&str]) -> String {
        let graph = build_graph(&[
            RawNode::new("A", "Alpha"),
            RawNode::new("B", "Beta & Gamma").with_prerequisites(&["A"]),
        ])
        .unwrap();
        let config = LayoutConfig::default();
        let layout = compute_layout(&graph, &config).unwrap();
        let scene = Scene::build(&layout, &graph.edges, &config, |id| done.contains(&id));
        render_svg(&scene, &Theme::dark(), &RenderConfig::default())
    }

    #[test]
    fn render_svg_basic() {
        let svg = render_basic(&[]);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("id=\"node-A\""));
        assert!(svg.contains("Alpha"));
        assert!(svg.contains("Beta &amp; Gamma"));
        assert!(svg.contains("marker-end=\"url(#arrow)\""));
        assert!(!svg.contains("completed"));
    }

    #[test]
    fn completed_node_gets_completed_styling() {
        let theme = Theme::dark();
        let svg = render_basic(&["B"]);
        assert!(svg.contains("class=\"node completed\""));
        assert!(svg.contains(&theme.completed_fill));
    }

    #[test]
    fn empty_scene_still_yields_valid_svg() {
        let graph = build_graph(&[]).unwrap();
        let config = LayoutConfig::default();
        let layout = compute_layout(&graph, &config).unwrap();
        let scene = Scene::build(&layout, &graph.edges, &config, |_| false);
        let svg = render_svg(&scene, &Theme::light(), &RenderConfig::default());
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }
}
