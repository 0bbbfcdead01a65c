use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Line, Plot, PlotPoints, Points};

use crate::analytics::distribution::{FiveNumberSummary, Histogram};
use crate::analytics::series::Month;
use crate::analytics::summary::Summary;
use crate::color::KeyColors;
use crate::state::AppState;
use crate::ui::format;

/// Histogram bin counts used by the distribution sections.
const FREQUENCY_BINS: usize = 20;
const VALUE_BINS: usize = 30;

const ACCENT: Color32 = Color32::from_rgb(52, 152, 219);

// ---------------------------------------------------------------------------
// Central panel – the dashboard itself
// ---------------------------------------------------------------------------

/// Render every metric tile, chart and table for the current report.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a transactions file to view the dashboard  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Customer Behavior Analysis Dashboard");
            ui.add_space(8.0);

            kpi_row(ui, &report.summary);
            ui.separator();

            if report.amounts.is_empty() {
                ui.add_space(24.0);
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label("No transactions match the current filters.");
                });
                return;
            }

            section(ui, "Monthly Revenue Trend");
            monthly_line(
                ui,
                "monthly_revenue_plot",
                month_points(&report.monthly_revenue, |&v| v),
                "Revenue ($)",
            );

            section(ui, "Revenue by Product Category");
            key_value_bars(
                ui,
                "category_revenue_plot",
                &report.revenue_by_category,
                "Revenue ($)",
            );

            section(ui, "Revenue by Country");
            key_value_bars(
                ui,
                "country_revenue_plot",
                &report.revenue_by_country,
                "Revenue ($)",
            );

            section(ui, "Top 10 Customers by Revenue");
            top_customers_table(ui, &report.top_customers);

            section(ui, "Customer Purchase Frequency Distribution");
            histogram_chart(
                ui,
                "purchase_frequency_plot",
                &report.purchase_frequency,
                FREQUENCY_BINS,
                "Transactions per customer",
            );

            section(ui, "Payment Method Distribution");
            key_value_bars(
                ui,
                "payment_counts_plot",
                &as_f64_table(&report.payment_method_counts),
                "Transactions",
            );

            ui.add_space(12.0);
            ui.columns(2, |cols: &mut [Ui]| {
                metric(
                    &mut cols[0],
                    "Avg Revenue per Customer",
                    &format::currency(report.summary.avg_revenue_per_customer),
                );
                metric(
                    &mut cols[1],
                    "Avg Quantity per Transaction",
                    &format!("{:.2}", report.summary.avg_quantity),
                );
            });

            section(ui, "Monthly Transaction Count");
            monthly_line(
                ui,
                "monthly_tx_plot",
                month_points(&report.monthly_transactions, |&n| n as f64),
                "Transactions",
            );

            section(ui, "Revenue Distribution");
            histogram_chart(
                ui,
                "amount_hist_plot",
                &report.amounts,
                VALUE_BINS,
                "Transaction amount ($)",
            );

            section(ui, "Quantity Distribution");
            histogram_chart(
                ui,
                "quantity_hist_plot",
                &report.quantities,
                VALUE_BINS,
                "Quantity",
            );

            section(ui, "Revenue by Payment Method");
            key_value_bars(
                ui,
                "payment_revenue_plot",
                &report.revenue_by_payment_method,
                "Revenue ($)",
            );

            section(ui, "Top 10 Countries by Transactions");
            key_value_bars(
                ui,
                "top_countries_plot",
                &as_f64_table(&report.top_countries),
                "Transactions",
            );

            section(ui, "Customer Revenue Distribution");
            customer_revenue_box(ui, &report.customer_revenue);

            ui.add_space(16.0);
        });
}

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, summary: &Summary) {
    ui.columns(4, |cols: &mut [Ui]| {
        metric(
            &mut cols[0],
            "Total Revenue",
            &format::currency_whole(summary.total_revenue),
        );
        metric(
            &mut cols[1],
            "Total Transactions",
            &format::count(summary.total_transactions as u64),
        );
        metric(
            &mut cols[2],
            "Total Customers",
            &format::count(summary.total_customers as u64),
        );
        metric(
            &mut cols[3],
            "Avg Order Value",
            &format::currency(summary.avg_order_value),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small().weak());
        ui.label(RichText::new(value).heading().strong());
    });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Month series as plot points anchored at each month's last day.
fn month_points<V>(series: &[(Month, V)], value: impl Fn(&V) -> f64) -> Vec<[f64; 2]> {
    series
        .iter()
        .map(|(month, v)| [month.last_day().num_days_from_ce() as f64, value(v)])
        .collect()
}

fn monthly_line(ui: &mut Ui, id: &str, points: Vec<[f64; 2]>, y_label: &str) {
    Plot::new(id)
        .height(240.0)
        .y_axis_label(y_label)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_formatter(|mark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%Y-%m").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            let line_points: PlotPoints = points.iter().copied().collect();
            plot_ui.line(Line::new(line_points).color(ACCENT).width(1.5));
            let marker_points: PlotPoints = points.iter().copied().collect();
            plot_ui.points(Points::new(marker_points).radius(3.0).color(ACCENT));
        });
}

/// One bar per key at integer x positions, labelled through the axis
/// formatter.
fn key_value_bars(ui: &mut Ui, id: &str, table: &[(String, f64)], y_label: &str) {
    let colors = KeyColors::new(table.iter().map(|(k, _)| k.as_str()));
    let labels: Vec<String> = table.iter().map(|(k, _)| k.clone()).collect();

    let bars: Vec<Bar> = table
        .iter()
        .enumerate()
        .map(|(i, (key, value))| {
            Bar::new(i as f64, *value)
                .width(0.6)
                .name(key)
                .fill(colors.color_for(key))
        })
        .collect();

    Plot::new(id)
        .height(240.0)
        .y_axis_label(y_label)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if idx < labels.len() {
                labels[idx].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn histogram_chart(ui: &mut Ui, id: &str, values: &[f64], bins: usize, x_label: &str) {
    let Some(hist) = Histogram::build(values, bins) else {
        ui.label("No data.");
        return;
    };

    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .centers()
        .into_iter()
        .zip(hist.counts.iter())
        .map(|(center, &count)| {
            Bar::new(center, count as f64)
                .width(width * 0.95)
                .fill(ACCENT)
        })
        .collect();

    Plot::new(id)
        .height(220.0)
        .x_axis_label(x_label)
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn customer_revenue_box(ui: &mut Ui, values: &[f64]) {
    let Some(summary) = FiveNumberSummary::compute(values) else {
        ui.label("No data.");
        return;
    };

    let box_elem = BoxElem::new(
        0.0,
        BoxSpread::new(
            summary.whisker_low,
            summary.q1,
            summary.median,
            summary.q3,
            summary.whisker_high,
        ),
    )
    .box_width(0.5)
    .fill(ACCENT.gamma_multiply(0.3))
    .stroke(Stroke::new(1.5, ACCENT));

    Plot::new("customer_revenue_box_plot")
        .height(260.0)
        .y_axis_label("Revenue per customer ($)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![box_elem]));

            if !summary.outliers.is_empty() {
                let outlier_points: PlotPoints =
                    summary.outliers.iter().map(|&v| [0.0, v]).collect();
                plot_ui.points(
                    Points::new(outlier_points)
                        .radius(3.0)
                        .color(ACCENT.gamma_multiply(0.7)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Top customers table
// ---------------------------------------------------------------------------

fn top_customers_table(ui: &mut Ui, rows: &[(String, f64)]) {
    use egui_extras::{Column, TableBuilder};

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(40.0))
        .column(Column::remainder())
        .column(Column::auto().at_least(110.0))
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Customer");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Revenue");
            });
        })
        .body(|mut body| {
            for (rank, (customer, revenue)) in rows.iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label((rank + 1).to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(customer.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format::currency(*revenue));
                    });
                });
            }
        });
}

fn as_f64_table(table: &[(String, u64)]) -> Vec<(String, f64)> {
    table
        .iter()
        .map(|(k, n)| (k.clone(), *n as f64))
        .collect()
}
