use super::domain::{KpiCalcType, Month, PerformanceRow, RowMetrics, RowMode, TotalsOverride};
use super::weight::{resolve_weight, round_half_up, round_percent, round_to};
use std::collections::BTreeMap;
use tracing::debug;

/// Recomputes every derived field of `row` for the given active months.
///
/// All twelve months get a per-month percentage; only `active` months feed
/// the totals. The input row is left untouched.
pub fn recalc_row(row: &PerformanceRow, active: &[Month]) -> PerformanceRow {
    let month_percent = Month::ALL
        .into_iter()
        .map(|month| {
            let entry = row.entry(month);
            (
                month,
                month_percent(&row.mode, entry.target_value(), entry.actual_value()),
            )
        })
        .collect::<BTreeMap<_, _>>();

    let (summed_target, summed_actual) = active_sums(row, active);

    let (target_total, actual_total) = match row.mode {
        RowMode::Standard => (summed_target, summed_actual),
        RowMode::Par { .. } => (par_target_total(summed_target), summed_actual),
        RowMode::Kpi {
            totals_override, ..
        } => kpi_totals(totals_override, summed_target, summed_actual),
    };

    let percent_achieved = percent_achieved(&row.mode, target_total, actual_total);
    let weight = resolve_weight(percent_achieved as f64);
    let weighted_average = round_to(percent_achieved as f64 * f64::from(weight), 2);

    debug!(
        pillar = %row.pillar,
        kra = %row.key_result_area,
        percent_achieved,
        weight,
        "row recalculated"
    );

    PerformanceRow {
        metrics: RowMetrics {
            month_percent,
            target_total,
            actual_total,
            percent_achieved,
            weight,
            actual_rating: percent_achieved,
            weighted_average,
        },
        ..row.clone()
    }
}

/// Sums of target and actual over the active months.
pub(crate) fn active_sums(row: &PerformanceRow, active: &[Month]) -> (f64, f64) {
    active.iter().fold((0.0, 0.0), |(target, actual), month| {
        let entry = row.entry(*month);
        (target + entry.target_value(), actual + entry.actual_value())
    })
}

fn month_percent(mode: &RowMode, target: f64, actual: f64) -> f64 {
    let percent = match mode {
        RowMode::Standard => {
            if target > 0.0 {
                round_half_up(actual / target * 100.0)
            } else {
                0.0
            }
        }
        RowMode::Par { .. } => {
            if target > 0.0 && actual > 0.0 {
                round_half_up(target / actual * 100.0)
            } else {
                0.0
            }
        }
        RowMode::Kpi { calc_type, .. } => round_to(kpi_raw_percent(*calc_type, target, actual), 2),
    };

    if percent.is_finite() {
        percent
    } else {
        0.0
    }
}

fn kpi_raw_percent(calc_type: KpiCalcType, target: f64, actual: f64) -> f64 {
    match calc_type {
        KpiCalcType::PercentageWeighted => actual * target / 100.0,
        KpiCalcType::TargetRatio => {
            if target > 0.0 {
                actual / target * 100.0
            } else {
                0.0
            }
        }
        KpiCalcType::Compliance => {
            if actual >= target {
                100.0
            } else if target <= 0.0 {
                0.0
            } else {
                actual / target * 100.0
            }
        }
    }
}

/// PAR target totals are whole-numbered only once they reach half a unit;
/// smaller fractional totals are carried as entered.
fn par_target_total(summed: f64) -> f64 {
    if summed.abs() >= 0.5 {
        round_half_up(summed)
    } else {
        summed
    }
}

/// Operator totals win whenever one is present and not entirely zero.
fn kpi_totals(
    totals_override: Option<TotalsOverride>,
    summed_target: f64,
    summed_actual: f64,
) -> (f64, f64) {
    match totals_override {
        Some(totals) if totals.target_total != 0.0 || totals.actual_total != 0.0 => {
            (totals.target_total, totals.actual_total)
        }
        _ => (summed_target, summed_actual),
    }
}

fn percent_achieved(mode: &RowMode, target_total: f64, actual_total: f64) -> i64 {
    match *mode {
        RowMode::Standard | RowMode::Kpi { .. } => {
            if target_total > 0.0 {
                round_percent(actual_total / target_total * 100.0)
            } else {
                0
            }
        }
        RowMode::Par { par_weight } => {
            if target_total > 0.0 && actual_total > 0.0 {
                round_percent(target_total / actual_total * 100.0 * par_weight)
            } else {
                0
            }
        }
    }
}
