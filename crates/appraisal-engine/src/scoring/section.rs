use super::domain::{Month, PerformanceSection};
use super::row::recalc_row;
use tracing::debug;

/// Re-derives the subtotals of `section` from its rows as they stand.
/// Every row counts, including blank placeholders.
pub fn recalc_section(section: &PerformanceSection) -> PerformanceSection {
    let subtotal_weight: u32 = section
        .rows
        .iter()
        .map(|row| u32::from(row.metrics.weight))
        .sum();
    let subtotal_weighted_average: f64 = section
        .rows
        .iter()
        .map(|row| row.metrics.weighted_average)
        .sum();

    debug!(
        section = %section.name,
        rows = section.rows.len(),
        subtotal_weight,
        subtotal_weighted_average,
        "section subtotals recalculated"
    );

    PerformanceSection {
        name: section.name.clone(),
        rows: section.rows.clone(),
        subtotal_weight,
        subtotal_weighted_average,
    }
}

/// Recalculates every row for `active`, then the section subtotals.
pub fn recalc_section_rows(section: &PerformanceSection, active: &[Month]) -> PerformanceSection {
    let rows = section
        .rows
        .iter()
        .map(|row| recalc_row(row, active))
        .collect();

    recalc_section(&PerformanceSection {
        name: section.name.clone(),
        rows,
        subtotal_weight: 0,
        subtotal_weighted_average: 0.0,
    })
}
