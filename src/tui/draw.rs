use ratatui::style::{Color, Modifier, Style};

const LEVELS: [&str; 8] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::Blue,
    Color::LightRed,
    Color::LightGreen,
    Color::LightMagenta,
];

/// Stable color for a line type, keyed by its position in the legend.
pub fn type_color(kind: &str, types: &[String]) -> Color {
    types
        .iter()
        .position(|t| t == kind)
        .map(|i| PALETTE[i % PALETTE.len()])
        .unwrap_or(Color::Gray)
}

/// Bar of `width` cells proportional to `value / max`, topped with a partial block.
pub fn share_bar(value: usize, max: usize, width: usize) -> String {
    if max == 0 || width == 0 {
        return String::new();
    }
    let eighths = (value * width * LEVELS.len()).div_ceil(max);
    let full = (eighths / LEVELS.len()).min(width);
    let rest = eighths % LEVELS.len();
    let mut bar = "█".repeat(full);
    if rest > 0 && full < width {
        bar.push_str(LEVELS[rest - 1]);
    }
    bar
}

pub fn intensity_color(value: usize, max: usize) -> Style {
    if max == 0 {
        return Style::default().fg(Color::White);
    }

    let ratio = value as f64 / max as f64;
    if ratio > 0.8 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if ratio > 0.6 {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if ratio > 0.4 {
        Style::default().fg(Color::Green)
    } else if ratio > 0.2 {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Blue)
    }
}

/// Scale a style down to a dim rendition when a layer is mostly faded out.
pub fn layer_style(style: Style, opacity: f64) -> Style {
    if opacity < 0.6 {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}
