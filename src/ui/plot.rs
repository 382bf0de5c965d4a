use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot};

use crate::color::{diverging, generate_palette};
use crate::data::model::FieldValue;
use crate::state::{AppState, EMPTY_RESULT_MESSAGE};
use crate::stats::buckets::{BucketMode, PriceStat};
use crate::stats::summary::{format_count, format_price, PriceSummary};
use crate::ui::table;

const CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render KPIs, charts and the listings table for the current subset.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a listings file to begin  (File → Open…)");
        });
        return;
    }

    ui.heading("Vehicle Pricing Summary");
    kpi_row(ui, &state.summary);
    ui.separator();

    if state.summary.is_empty() {
        ui.label(RichText::new(EMPTY_RESULT_MESSAGE).color(Color32::YELLOW));
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            count_by_year_chart(ui, state);
            price_box_chart(ui, state);
            uplift_chart(ui, state);
            ui.separator();
            mileage_section(ui, state);
            ui.separator();
            table::listings_table(ui, state);
        });
}

fn kpi_row(ui: &mut Ui, summary: &PriceSummary) {
    let (min, median, max) = match summary {
        PriceSummary::Empty => (None, None, None),
        PriceSummary::Populated {
            min, median, max, ..
        } => (*min, *median, *max),
    };
    let cells = [
        ("Total Vehicles", format_count(summary.count())),
        ("Minimum Price", format_price(min)),
        ("Median Price", format_price(median)),
        ("Max Price", format_price(max)),
    ];
    ui.columns(cells.len(), |cols| {
        for (col, (title, value)) in cols.iter_mut().zip(cells) {
            col.weak(title);
            col.heading(value);
        }
    });
}

/// Axis formatter that shows `labels[i]` at integer positions only.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn fixed_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Overview charts
// ---------------------------------------------------------------------------

fn count_by_year_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Vehicle Count by Model Year (Colored by Brand)");

    let data = &state.charts.year_brand;
    let years: Vec<&FieldValue> = {
        let set: BTreeSet<&FieldValue> = data.iter().map(|c| &c.year).collect();
        set.into_iter().collect()
    };
    let brands: BTreeSet<&FieldValue> = data.iter().map(|c| &c.brand).collect();

    // egui_plot stacks bar-by-index, so every brand gets one bar per year.
    let mut charts: Vec<BarChart> = Vec::with_capacity(brands.len());
    for brand in brands {
        let bars: Vec<Bar> = years
            .iter()
            .enumerate()
            .map(|(x, &year)| {
                let count = data
                    .iter()
                    .find(|c| &c.year == year && &c.brand == brand)
                    .map_or(0, |c| c.count);
                Bar::new(x as f64, count as f64)
                    .name(format!("{year} · {brand}"))
                    .width(0.7)
            })
            .collect();
        let color = state
            .color_map
            .as_ref()
            .map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(brand));
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(brand.to_string())
            .color(color)
            .stack_on(&below);
        charts.push(chart);
    }

    let labels = years.iter().map(|y| y.to_string()).collect();
    fixed_plot("count_by_year")
        .legend(Legend::default())
        .x_axis_label("Model Year")
        .y_axis_label("Number of Vehicles")
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn price_box_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Price Distribution by Model (Boxplot)");

    let boxes = &state.charts.price_boxes;
    let palette = generate_palette(boxes.len());
    let labels = boxes.iter().map(|b| b.model.to_string()).collect();

    fixed_plot("price_by_model")
        .x_axis_label("Vehicle Model")
        .y_axis_label("Price ($)")
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            for (x, (b, color)) in boxes.iter().zip(palette).enumerate() {
                let spread = BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker);
                let elem = BoxElem::new(x as f64, spread)
                    .name(format!("{} ({} listings)", b.model, b.count))
                    .box_width(0.6);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(b.model.to_string()).color(color));
            }
        });
}

fn uplift_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Median Price Difference by Model Year");
    ui.weak("Baseline = median price of the oldest model year after filters");

    let uplift = &state.charts.uplift;
    let bars: Vec<Bar> = uplift
        .iter()
        .enumerate()
        .map(|(x, u)| {
            Bar::new(x as f64, u.pct_vs_baseline)
                .name(format!(
                    "{}: median {}, {:+.2}% vs baseline",
                    u.year,
                    format_price(Some(u.median_price)),
                    u.pct_vs_baseline
                ))
                .fill(diverging(u.pct_vs_baseline))
                .width(0.7)
        })
        .collect();
    let labels = uplift.iter().map(|u| u.year.to_string()).collect();

    fixed_plot("uplift_by_year")
        .x_axis_label("Model Year")
        .y_axis_label("% Difference vs Oldest Model Year")
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}

// ---------------------------------------------------------------------------
// Mileage vs price
// ---------------------------------------------------------------------------

fn mileage_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Mileage vs Price");

    let Some(bounds) = state.cap_bounds else {
        ui.label("Mileage/Price chart unavailable: Mileage or Price is missing after filters.");
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        let mut quantiles = state.bucket_mode == BucketMode::Quantile;
        if ui.checkbox(&mut quantiles, "Use quantile mileage buckets").changed() {
            state.set_bucket_mode(if quantiles {
                BucketMode::Quantile
            } else {
                BucketMode::Fixed
            });
        }

        ui.separator();
        ui.label("Price summary");
        let current = state.price_stat;
        egui::ComboBox::from_id_salt("price_stat")
            .selected_text(current.label())
            .show_ui(ui, |ui: &mut Ui| {
                for stat in [PriceStat::Median, PriceStat::Mean] {
                    if ui.selectable_label(current == stat, stat.label()).clicked() {
                        state.set_price_stat(stat);
                    }
                }
            });

        ui.separator();
        let mut cap = state.mileage_cap;
        let slider = egui::Slider::new(&mut cap, 0.0..=bounds.max)
            .step_by(1_000.0)
            .text("Max mileage to include (cap)");
        if ui.add(slider).changed() {
            state.set_mileage_cap(cap);
        }
    });

    let Some(report) = &state.charts.mileage else {
        return;
    };
    let stat = state.price_stat.label();
    ui.strong(format!("{stat} Price by Mileage Bucket"));

    let bars: Vec<Bar> = report
        .buckets
        .iter()
        .enumerate()
        .map(|(x, b)| {
            Bar::new(x as f64, b.price)
                .name(format!(
                    "{}: {stat} {} · {} vehicles",
                    b.label,
                    format_price(Some(b.price)),
                    format_count(b.count)
                ))
                .width(0.7)
        })
        .collect();
    let labels = report.buckets.iter().map(|b| b.label.clone()).collect();

    let axis = match report.mode_used {
        BucketMode::Fixed => "Mileage Bucket (miles)",
        BucketMode::Quantile => "Mileage Bucket (miles, deciles)",
    };
    fixed_plot("price_by_mileage")
        .x_axis_label(axis)
        .y_axis_label(format!("{stat} Price ($)"))
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE))
        });
}
