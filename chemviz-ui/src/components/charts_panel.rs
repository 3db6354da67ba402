//! Charts Panel Component
//!
//! Type distribution (bar), flowrate trend (line) and type percentages (pie)
//! drawn on HTML5 canvases from the shared dataset resource.

use leptos::*;
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use chemviz::view::{CategoryCount, ChartSet, Share, TrendPoint};

use crate::components::loading::ChartSkeleton;
use crate::state::use_global_state;

/// Colors cycled across bars and slices
const SERIES_COLORS: [&str; 6] = [
    "#FF9800", // Orange (primary)
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
];

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const LABEL: &str = "#9ca3af"; // gray-400

const MARGIN_LEFT: f64 = 50.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;

#[component]
pub fn ChartsPanel() -> impl IntoView {
    let state = use_global_state();
    let dataset = state.dataset;
    let charts = create_memo(move |_| state.charts());

    let bar_ref = create_node_ref::<html::Canvas>();
    let line_ref = create_node_ref::<html::Canvas>();
    let pie_ref = create_node_ref::<html::Canvas>();

    // Redraw whenever the data or a canvas changes
    create_effect(move |_| {
        let Some(set) = charts.get() else {
            return;
        };
        if let Some(canvas) = bar_ref.get() {
            draw_bars(&canvas, &set.distribution);
        }
        if let Some(canvas) = line_ref.get() {
            draw_trend(&canvas, &set.trend);
        }
        if let Some(canvas) = pie_ref.get() {
            draw_pie(&canvas, &set.shares);
        }
    });

    view! {
        <Suspense fallback=move || view! { <ChartSkeleton /> }>
            {move || dataset.with(Option::is_some).unwrap_or(false).then(|| view! {
                <section class="grid grid-cols-1 xl:grid-cols-2 gap-4">
                    <ChartCard title="Equipment Type Distribution">
                        <canvas node_ref=bar_ref width="600" height="300" class="w-full rounded-lg" />
                    </ChartCard>
                    <ChartCard title="Flowrate Trends">
                        <canvas node_ref=line_ref width="600" height="300" class="w-full rounded-lg" />
                    </ChartCard>
                    <ChartCard title="Type Percentages">
                        <canvas node_ref=pie_ref width="600" height="300" class="w-full rounded-lg" />
                        <ShareLegend charts=charts />
                    </ChartCard>
                </section>
            })}
        </Suspense>
    }
}

#[component]
fn ChartCard(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-xl p-4">
            <h3 class="text-lg font-semibold mb-3">{title}</h3>
            {children()}
        </div>
    }
}

/// Slice colors with their labels and percentages
#[component]
fn ShareLegend(charts: Memo<Option<ChartSet>>) -> impl IntoView {
    view! {
        <div class="flex justify-center flex-wrap gap-4 mt-4">
            {move || {
                charts.get()
                    .map(|set| set.shares)
                    .unwrap_or_default()
                    .into_iter()
                    .enumerate()
                    .map(|(idx, share)| {
                        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
                        view! {
                            <div class="flex items-center space-x-2">
                                <div
                                    class="w-3 h-3 rounded-full"
                                    style=format!("background-color: {}", color)
                                />
                                <span class="text-sm text-gray-300">
                                    {format!("{} ({:.1}%)", share.label, share.percent)}
                                </span>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

fn context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);
}

fn no_data(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style(&"#6b7280".into());
    ctx.set_font("16px sans-serif");
    let _ = ctx.fill_text("No data", width / 2.0 - 30.0, height / 2.0);
}

/// Horizontal grid with value labels from `lo` (bottom) to `hi` (top)
fn draw_grid(ctx: &CanvasRenderingContext2d, width: f64, chart_height: f64, lo: f64, hi: f64) {
    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");

    for i in 0..=5 {
        let y = MARGIN_TOP + (i as f64 / 5.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(width - MARGIN_RIGHT, y);
        ctx.stroke();

        let value = hi - (i as f64 / 5.0) * (hi - lo);
        ctx.set_fill_style(&LABEL.into());
        let _ = ctx.fill_text(&format!("{:.1}", value), 5.0, y + 4.0);
    }
}

fn draw_bars(canvas: &HtmlCanvasElement, distribution: &[CategoryCount]) {
    let Some(ctx) = context(canvas) else {
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    clear(&ctx, width, height);

    let max = distribution.iter().map(|c| c.count).max().unwrap_or(0) as f64;
    if distribution.is_empty() || max <= 0.0 {
        no_data(&ctx, width, height);
        return;
    }

    let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    draw_grid(&ctx, width, chart_height, 0.0, max);

    let slot = chart_width / distribution.len() as f64;
    let bar_width = slot * 0.6;
    for (idx, category) in distribution.iter().enumerate() {
        let bar_height = scale(category.count as f64, 0.0, max) * chart_height;
        let x = MARGIN_LEFT + idx as f64 * slot + (slot - bar_width) / 2.0;
        let y = MARGIN_TOP + chart_height - bar_height;

        ctx.set_fill_style(&SERIES_COLORS[idx % SERIES_COLORS.len()].into());
        ctx.fill_rect(x, y, bar_width, bar_height);

        ctx.set_fill_style(&LABEL.into());
        let _ = ctx.fill_text(&category.label, x, height - 10.0);
    }
}

fn draw_trend(canvas: &HtmlCanvasElement, trend: &[TrendPoint]) {
    let Some(ctx) = context(canvas) else {
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    clear(&ctx, width, height);

    let Some((lo, hi)) = padded_bounds(trend) else {
        no_data(&ctx, width, height);
        return;
    };

    let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    draw_grid(&ctx, width, chart_height, lo, hi);

    let x_at = |idx: usize| {
        if trend.len() <= 1 {
            MARGIN_LEFT + chart_width / 2.0
        } else {
            MARGIN_LEFT + (idx as f64 / (trend.len() - 1) as f64) * chart_width
        }
    };
    let y_at = |value: f64| MARGIN_TOP + (1.0 - scale(value, lo, hi)) * chart_height;

    let color = SERIES_COLORS[0];
    ctx.set_stroke_style(&color.into());
    ctx.set_fill_style(&color.into());
    ctx.set_line_width(2.0);

    // Unparseable values break the line
    for segment in trend_segments(trend) {
        ctx.begin_path();
        for (i, (idx, value)) in segment.iter().enumerate() {
            if i == 0 {
                ctx.move_to(x_at(*idx), y_at(*value));
            } else {
                ctx.line_to(x_at(*idx), y_at(*value));
            }
        }
        ctx.stroke();

        for (idx, value) in &segment {
            ctx.begin_path();
            let _ = ctx.arc(x_at(*idx), y_at(*value), 3.0, 0.0, PI * 2.0);
            ctx.fill();
        }
    }

    // Label at most ~8 points along the x-axis
    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("12px sans-serif");
    let step = (trend.len() / 8).max(1);
    for (idx, point) in trend.iter().enumerate().step_by(step) {
        let _ = ctx.fill_text(&point.label, x_at(idx) - 15.0, height - 10.0);
    }
}

fn draw_pie(canvas: &HtmlCanvasElement, shares: &[Share]) {
    let Some(ctx) = context(canvas) else {
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    clear(&ctx, width, height);

    let slices = pie_slices(shares);
    if slices.is_empty() {
        no_data(&ctx, width, height);
        return;
    }

    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = (height / 2.0 - 20.0).max(10.0);
    for (idx, (start, end)) in slices.into_iter().enumerate() {
        ctx.set_fill_style(&SERIES_COLORS[idx % SERIES_COLORS.len()].into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, start, end);
        ctx.close_path();
        ctx.fill();
    }
}

/// Position of `value` within `[lo, hi]` as 0..=1
fn scale(value: f64, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return 0.5;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Trend bounds with 10% headroom, or `None` when nothing is plottable
fn padded_bounds(trend: &[TrendPoint]) -> Option<(f64, f64)> {
    let (lo, hi) = trend
        .iter()
        .filter_map(|p| p.value)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    let range = hi - lo;
    let padding = if range > 0.0 { range * 0.1 } else { 1.0 };
    Some((lo - padding, hi + padding))
}

/// Runs of consecutive plottable points as `(index, value)` pairs
fn trend_segments(trend: &[TrendPoint]) -> Vec<Vec<(usize, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (idx, point) in trend.iter().enumerate() {
        match point.value {
            Some(value) => current.push((idx, value)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Start and end angle of each non-empty slice, clockwise from 12 o'clock
fn pie_slices(shares: &[Share]) -> Vec<(f64, f64)> {
    let mut start = -PI / 2.0;
    shares
        .iter()
        .filter(|s| s.percent > 0.0)
        .map(|s| {
            let end = start + s.percent / 100.0 * PI * 2.0;
            let slice = (start, end);
            start = end;
            slice
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: Option<f64>) -> TrendPoint {
        TrendPoint {
            label: String::new(),
            value,
        }
    }

    fn share(percent: f64) -> Share {
        Share {
            label: String::new(),
            count: 0,
            percent,
        }
    }

    #[test]
    fn test_segments_split_at_gaps() {
        let trend = vec![
            point(Some(1.0)),
            point(Some(2.0)),
            point(None),
            point(None),
            point(Some(5.0)),
        ];
        assert_eq!(
            trend_segments(&trend),
            vec![vec![(0, 1.0), (1, 2.0)], vec![(4, 5.0)]]
        );
        assert!(trend_segments(&[point(None)]).is_empty());
    }

    #[test]
    fn test_padded_bounds() {
        assert_eq!(padded_bounds(&[point(None)]), None);
        assert_eq!(padded_bounds(&[point(Some(3.0))]), Some((2.0, 4.0)));

        let (lo, hi) = padded_bounds(&[point(Some(0.0)), point(Some(10.0))]).unwrap();
        assert!((lo + 1.0).abs() < 1e-9);
        assert!((hi - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_pie_slices_cover_circle() {
        let slices = pie_slices(&[share(25.0), share(0.0), share(75.0)]);
        assert_eq!(slices.len(), 2);
        assert!((slices[0].0 + PI / 2.0).abs() < 1e-9);
        assert!((slices[1].1 - slices[0].0 - PI * 2.0).abs() < 1e-9);
        assert!(pie_slices(&[share(0.0)]).is_empty());
    }

    #[test]
    fn test_scale_flat_range() {
        assert_eq!(scale(5.0, 5.0, 5.0), 0.5);
        assert_eq!(scale(15.0, 0.0, 10.0), 1.0);
    }
}
