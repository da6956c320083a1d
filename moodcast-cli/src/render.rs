use std::fmt::Write;

use chrono::Local;
use moodcast_core::{
    DashboardView,
    catalog::split_activity,
    present::{ChartPoint, ForecastCard},
};

const BAR_WIDTH: usize = 30;

/// Render the whole dashboard as plain text.
pub fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n== Cuaca di {} ==", view.city);
    if view.loading {
        let _ = writeln!(out, "Memuat data...");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Terjadi kesalahan: {error}");
    }

    if let Some(current) = &view.current {
        let _ = writeln!(out, "{:.1}°C  {}", current.temperature, current.description);
        let _ = writeln!(out, "  Suhu:       {} °C", current.temperature);
        let _ = writeln!(out, "  Kelembapan: {}%", current.humidity_pct);
        let _ = writeln!(out, "  Angin:      {} m/s", current.wind_speed_mps);
        let _ = writeln!(out, "  Lokasi:     {}", current.location_name);
        let _ = writeln!(out, "  Ikon:       {}", current.icon_url);
    }

    let (marker, message) = split_activity(&view.activity);
    let _ = writeln!(out, "\n-- Saran aktivitas --\n{marker} {message}");

    let _ = writeln!(out, "\n-- Rekomendasi lagu --");
    for track in &view.playlist {
        let _ = writeln!(out, "  {}\n    {}", track.title, track.embed_url);
    }

    if !view.chart.is_empty() {
        let _ = writeln!(out, "\n-- Grafik suhu 5 hari --");
        out.push_str(&chart(&view.chart));
    }

    if !view.carousel.is_empty() {
        let _ = writeln!(out, "\n-- Ramalan cuaca 5 hari ke depan --");
        for card in &view.carousel {
            out.push_str(&card_line(card));
        }
    }

    let _ = writeln!(out, "\n(diperbarui {})", Local::now().format("%H:%M:%S"));
    out
}

/// Horizontal bars scaled between the coldest and warmest point.
fn chart(points: &[ChartPoint]) -> String {
    let min = points.iter().map(|p| p.temperature).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.temperature).fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(f64::EPSILON);
    let label_width = points.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for point in points {
        let filled = 1 + (((point.temperature - min) / span) * (BAR_WIDTH - 1) as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {:<label_width$} {:<bar_width$} {:.1}°C",
            point.label,
            "█".repeat(filled),
            point.temperature,
            bar_width = BAR_WIDTH,
        );
    }
    out
}

fn card_line(card: &ForecastCard) -> String {
    format!("  {}: {}, {:.1}°C\n", card.label, card.description, card.temperature)
}
