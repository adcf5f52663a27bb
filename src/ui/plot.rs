use eframe::egui::{Stroke, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, PlotUi, Points, Polygon};

use crate::color::band_fill;
use crate::views::chart::{day_label, ChartItem, ChartSpec, XAxis, YFormat};

// ---------------------------------------------------------------------------
// ChartSpec → egui_plot
// ---------------------------------------------------------------------------

/// Render one chart payload. All interpretation of the spec (axis formats,
/// legend membership, band shading) happens here; the builders stay UI-free.
pub fn chart(ui: &mut Ui, spec: &ChartSpec) {
    let mut plot = Plot::new(spec.id)
        .height(spec.height)
        .legend(Legend::default())
        .y_axis_label(spec.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    if !spec.x_label.is_empty() {
        plot = plot.x_axis_label(spec.x_label);
    }

    // Hidden x axis: the chart sits flush above another one sharing its
    // date range, which carries the tick labels for both.
    plot = plot.show_axes([spec.x_visible, true]);

    if spec.x_visible && spec.x_axis == XAxis::Date {
        plot = plot.x_axis_formatter(|mark, _range| day_label(mark.value));
    }

    match spec.y_format {
        YFormat::Percent => {
            plot = plot.y_axis_formatter(|mark, _range| {
                format!("{:.0}%", mark.value * 100.0)
            });
        }
        YFormat::Thousands => {
            plot = plot.y_axis_formatter(|mark, _range| thousands(mark.value));
        }
        YFormat::Plain => {}
    }

    if let Some(ticks) = spec.y_ticks {
        // Fixed integer axis (the CI level scale): pad the range and hide
        // fractional tick labels.
        if let (Some(first), Some(last)) = (ticks.first(), ticks.last()) {
            plot = plot.include_y(first - 0.3).include_y(last + 0.3);
        }
        plot = plot.y_axis_formatter(|mark, _range| {
            if mark.value.fract() == 0.0 {
                format!("{}", mark.value as i64)
            } else {
                String::new()
            }
        });
    }

    plot.show(ui, |plot_ui| {
        for item in &spec.items {
            draw_item(plot_ui, item);
        }
    });
}

fn draw_item(plot_ui: &mut PlotUi, item: &ChartItem) {
    match item {
        ChartItem::Line {
            name,
            color,
            dashed,
            points,
        } => {
            let mut line = Line::new(PlotPoints::from(points.clone()))
                .color(*color)
                .width(1.5);
            if *dashed {
                line = line.style(LineStyle::dashed_loose());
            }
            if let Some(name) = name {
                line = line.name(name);
            }
            plot_ui.line(line);
        }
        ChartItem::Band {
            color,
            dashed_edges,
            lower,
            upper,
        } => {
            if lower.is_empty() || upper.is_empty() {
                return;
            }
            let ring: Vec<[f64; 2]> = lower
                .iter()
                .copied()
                .chain(upper.iter().rev().copied())
                .collect();
            plot_ui.polygon(
                Polygon::new(PlotPoints::from(ring))
                    .fill_color(band_fill(*color))
                    .stroke(Stroke::NONE),
            );
            for edge in [lower, upper] {
                let mut line = Line::new(PlotPoints::from(edge.clone()))
                    .color(*color)
                    .width(1.0);
                if *dashed_edges {
                    line = line.style(LineStyle::dashed_loose());
                }
                plot_ui.line(line);
            }
        }
        ChartItem::Markers {
            name,
            color,
            points,
        } => {
            let mut markers = Points::new(PlotPoints::from(points.clone()))
                .color(*color)
                .radius(3.0);
            if let Some(name) = name {
                markers = markers.name(name);
            }
            plot_ui.points(markers);
        }
        ChartItem::VSegment {
            name,
            color,
            x,
            y_min,
            y_max,
        } => {
            let mut line = Line::new(PlotPoints::from(vec![[*x, *y_min], [*x, *y_max]]))
                .color(*color)
                .width(1.5);
            if let Some(name) = name {
                line = line.name(name);
            }
            plot_ui.line(line);
        }
    }
}

fn thousands(v: f64) -> String {
    let negative = v < 0.0;
    let mut n = v.abs().round() as i64;
    let mut groups = Vec::new();
    loop {
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
        if n == 0 {
            break;
        }
    }
    if let Some(last) = groups.last_mut() {
        *last = last.trim_start_matches('0').to_string();
        if last.is_empty() {
            *last = "0".to_string();
        }
    }
    groups.reverse();
    let body = groups.join(",");
    if negative {
        format!("-{body}")
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::thousands;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(950.0), "950");
        assert_eq!(thousands(24100.0), "24,100");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(-28500.0), "-28,500");
    }
}
