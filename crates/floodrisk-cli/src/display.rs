//! Vertical card display for assessment results.

use std::fmt::Write;

use floodrisk_assess::Degradation;
use floodrisk_core::AssessmentResult;

const LABEL_WIDTH: usize = 22;

fn field(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$} {value}");
}

/// Render one result as a grouped card.
pub fn render_card(result: &AssessmentResult, degradations: &[Degradation]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Flood risk: {} ({}) ===",
        result.risk_level(),
        result.risk_probability()
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Context");
    field(&mut out, "source", result.source_path().as_str());
    field(&mut out, "region", result.region());
    field(&mut out, "season", result.season());
    field(
        &mut out,
        "assessed at",
        result.produced_at().format("%Y-%m-%d %H:%M UTC"),
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Estimates");
    field(&mut out, "elevation", result.elevation_estimate().unwrap_or("Unknown"));
    field(
        &mut out,
        "distance from water",
        result.distance_from_water_estimate().unwrap_or("Unknown"),
    );
    let _ = writeln!(out);

    if let Some(detection) = result.detection() {
        let _ = writeln!(out, "Detection");
        field(&mut out, "terrain", detection.terrain.terrain_type.label());
        let counts = &detection.counts;
        field(
            &mut out,
            "counts",
            format!(
                "water {} / building {} / vegetation {} / vehicle {} / person {}",
                counts.water_body, counts.building, counts.vegetation, counts.vehicle, counts.person
            ),
        );
        if !detection.objects.is_empty() {
            field(&mut out, "objects", detection.objects.join(", "));
        }
        let _ = writeln!(out);
    }

    if !result.score_breakdown().is_empty() {
        let _ = writeln!(out, "Score breakdown");
        for component in result.score_breakdown() {
            field(
                &mut out,
                &format!("{:>5.1}", component.points),
                &component.notes,
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Analysis");
    let _ = writeln!(out, "  {}", result.narrative());
    let _ = writeln!(out);

    let _ = writeln!(out, "Recommendations");
    for (i, rec) in result.recommendations().iter().enumerate() {
        let _ = writeln!(out, "  {}. {rec}", i + 1);
    }

    if !degradations.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Degraded");
        for d in degradations {
            field(&mut out, &d.stage.to_string(), &d.reason);
        }
    }

    out
}

/// One line per saved assessment.
pub fn render_history(entries: &[AssessmentResult]) -> String {
    if entries.is_empty() {
        return "No analysis history found.\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{}  {:<17} {:>5}  {:<16} {}/{}",
            entry.produced_at().format("%Y-%m-%d %H:%M"),
            entry.risk_level().label(),
            entry.risk_probability(),
            entry.source_path().as_str(),
            entry.region(),
            entry.season(),
        );
    }
    let noun = if entries.len() == 1 { "entry" } else { "entries" };
    let _ = writeln!(out, "{} {noun}", entries.len());
    out
}
