//! SVG flamegraph generation from an analyzed sample tree.
//!
//! Frame widths are proportional to cumulative sample counts, so the input
//! must be a count-propagated tree. Siblings are laid out left to right in
//! ordered-view order (hottest first).

use crate::analysis::OrderedNode;
use crate::utils::error::FlamegraphError;
use log::info;

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
    pub frame_height: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Stack Sample Profile".to_string(),
            width: 1200,
            frame_height: 16,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

const TITLE_HEIGHT: usize = 30;
const CHAR_WIDTH: f64 = 7.0;

struct RenderContext<'c> {
    out: String,
    total: u64,
    frame_height: usize,
    graph_height: usize,
    config: &'c FlamegraphConfig,
}

/// Render `view` (an analyzed, ordered tree) as an SVG document
///
/// # Errors
/// * `FlamegraphError::EmptyTree` - no samples under the root
pub fn generate_flamegraph(
    view: &OrderedNode<'_>,
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    let total: u64 = view.calls.iter().map(|(_, node)| node.samples).sum();
    if total == 0 {
        return Err(FlamegraphError::EmptyTree);
    }

    let default_config = FlamegraphConfig::default();
    let config = config.unwrap_or(&default_config);
    info!(
        "Generating flamegraph for {} samples across {} roots",
        total,
        view.calls.len()
    );

    // the synthetic "all" frame sits on level 0
    let depth = calculate_max_depth(view) + 1;
    let graph_height = depth * config.frame_height;
    let total_height = graph_height + TITLE_HEIGHT + 10;

    let mut ctx = RenderContext {
        out: String::new(),
        total,
        frame_height: config.frame_height,
        graph_height,
        config,
    };

    ctx.out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = config.width,
        h = total_height
    ));
    ctx.out.push_str(
        r#"<style>.frame { font: 12px monospace; } .frame:hover { stroke: black; stroke-width: 1; cursor: pointer; }</style>"#,
    );
    ctx.out.push_str(&format!(
        r#"<text x="{}" y="20" font-size="16" text-anchor="middle" font-weight="bold">{}</text>"#,
        config.width / 2,
        escape_xml(&config.title)
    ));

    render_frame(&mut ctx, "all", total, 0, 0.0, config.width as f64);
    render_children(&mut ctx, view, 1, 0.0);

    ctx.out.push_str("</svg>");

    info!("Flamegraph generated successfully ({} bytes)", ctx.out.len());
    Ok(ctx.out)
}

fn render_children(ctx: &mut RenderContext<'_>, node: &OrderedNode<'_>, level: usize, x: f64) {
    let scale = ctx.config.width as f64 / ctx.total as f64;
    let mut current_x = x;

    for (label, child) in &node.calls {
        let w = child.samples as f64 * scale;
        // invisible frames (and everything above them) are skipped
        if w >= 0.5 {
            render_frame(ctx, label, child.samples, level, current_x, w);
            render_children(ctx, child, level + 1, current_x);
        }
        current_x += w;
    }
}

fn render_frame(ctx: &mut RenderContext<'_>, label: &str, samples: u64, level: usize, x: f64, w: f64) {
    // root at the bottom
    let y = TITLE_HEIGHT + ctx.graph_height - (level + 1) * ctx.frame_height;
    let percentage = samples as f64 / ctx.total as f64 * 100.0;
    let escaped = escape_xml(label);

    ctx.out.push_str(&format!(
        r#"<g class="frame"><title>{} ({} samples, {:.2}%)</title><rect x="{:.2}" y="{}" width="{:.2}" height="{}" fill="{}" rx="1"/>"#,
        escaped,
        samples,
        percentage,
        x,
        y,
        w,
        ctx.frame_height - 1,
        frame_color(label)
    ));

    if let Some(text) = get_truncated_name(label, w) {
        ctx.out.push_str(&format!(
            r#"<text x="{:.2}" y="{}" dx="3" dy="12" pointer-events="none">{}</text>"#,
            x,
            y,
            escape_xml(&text)
        ));
    }

    ctx.out.push_str("</g>");
}

fn calculate_max_depth(node: &OrderedNode<'_>) -> usize {
    node.calls
        .iter()
        .map(|(_, child)| 1 + calculate_max_depth(child))
        .max()
        .unwrap_or(0)
}

/// Classic warm flamegraph palette, stable per label
fn frame_color(label: &str) -> String {
    // FNV-1a keeps colors identical across runs
    let hash = label.bytes().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
        (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    });
    let r = 205 + (hash % 50) as u8;
    let g = ((hash >> 8) % 230) as u8;
    let b = ((hash >> 16) % 55) as u8;
    format!("rgb({}, {}, {})", r, g, b)
}

/// Label text that fits in `width` pixels, or `None` when nothing useful fits
pub fn get_truncated_name(name: &str, width: f64) -> Option<String> {
    if width < 35.0 {
        return None;
    }

    let max_chars = ((width - 6.0) / CHAR_WIDTH) as usize;
    let char_count = name.chars().count();

    if char_count <= max_chars {
        Some(name.to_string())
    } else if max_chars > 3 {
        let kept: String = name.chars().take(max_chars - 2).collect();
        Some(format!("{}..", kept))
    } else {
        None
    }
}

fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
