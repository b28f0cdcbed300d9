use super::mapping::{
    month_header, MonthField, KEY_RESULT_AREA, KPI_CALC_TYPE, PAR_WEIGHT, PERCENT_ACHIEVED,
    PILLAR, RATING, SECTION, SPECIAL_TYPE, TARGET, TOTAL_ACTUAL, TOTAL_TARGET, WEIGHT,
    WEIGHTED_AVERAGE,
};
use crate::scoring::{Month, PerformanceRow, PerformanceSection, RowMode};

/// Header row for a table covering `active` months.
pub fn export_header(active: &[Month]) -> Vec<String> {
    let mut header: Vec<String> = [
        SECTION,
        PILLAR,
        KEY_RESULT_AREA,
        TARGET,
        SPECIAL_TYPE,
        KPI_CALC_TYPE,
        PAR_WEIGHT,
    ]
    .iter()
    .map(|label| label.to_string())
    .collect();

    for month in active {
        for field in MonthField::ORDERED {
            header.push(month_header(*month, field));
        }
    }

    header.extend(
        [
            TOTAL_TARGET,
            TOTAL_ACTUAL,
            PERCENT_ACHIEVED,
            WEIGHT,
            RATING,
            WEIGHTED_AVERAGE,
        ]
        .iter()
        .map(|label| label.to_string()),
    );
    header
}

/// Flattens sections into a header row, one row per performance row, and
/// one subtotal row per section after all data rows.
///
/// Rows are written as they are; callers recalculate before exporting.
pub fn export_table(sections: &[PerformanceSection], active: &[Month]) -> Vec<Vec<String>> {
    let header = export_header(active);
    let width = header.len();
    let mut table = vec![header];

    for section in sections {
        for row in &section.rows {
            table.push(export_row(&section.name, row, active));
        }
    }

    for section in sections {
        let mut subtotal = vec![String::new(); width];
        subtotal[width - 3] = section.subtotal_weight.to_string();
        subtotal[width - 1] = format!("{:.2}", section.subtotal_weighted_average);
        table.push(subtotal);
    }

    table
}

fn export_row(section: &str, row: &PerformanceRow, active: &[Month]) -> Vec<String> {
    let (calc_type, par_weight) = match row.mode {
        RowMode::Standard => (String::new(), String::new()),
        RowMode::Par { par_weight } => (String::new(), format_input(par_weight)),
        RowMode::Kpi { calc_type, .. } => (calc_type.label().to_string(), String::new()),
    };

    let mut cells = vec![
        section.to_string(),
        row.pillar.clone(),
        row.key_result_area.clone(),
        row.target_description.clone(),
        row.mode.special_type_label().to_string(),
        calc_type,
        par_weight,
    ];

    let metrics = &row.metrics;
    for month in active {
        let entry = row.entry(*month);
        cells.push(entry.target.map(format_input).unwrap_or_default());
        cells.push(entry.actual.map(format_input).unwrap_or_default());
        let percent = metrics.month_percent.get(month).copied().unwrap_or(0.0);
        cells.push(format_month_percent(&row.mode, percent));
    }

    cells.push(format_total(metrics.target_total));
    cells.push(format_total(metrics.actual_total));
    cells.push(metrics.percent_achieved.to_string());
    cells.push(metrics.weight.to_string());
    cells.push(metrics.actual_rating.to_string());
    cells.push(format!("{:.2}", metrics.weighted_average));
    cells
}

/// Operator inputs are written with the shortest exact representation so
/// they read back unchanged.
fn format_input(value: f64) -> String {
    format!("{value}")
}

/// Totals are tidied to four decimals to hide summation noise.
fn format_total(value: f64) -> String {
    let tidy = (value * 10_000.0).round() / 10_000.0;
    format!("{tidy}")
}

fn format_month_percent(mode: &RowMode, percent: f64) -> String {
    match mode {
        RowMode::Kpi { .. } => format!("{percent:.2}"),
        RowMode::Standard | RowMode::Par { .. } => format!("{percent:.0}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{recalc_section_rows, KpiCalcType};

    const Q1: [Month; 3] = [Month::Jan, Month::Feb, Month::Mar];

    #[test]
    fn header_lists_active_month_triples() {
        let header = export_header(&Q1);

        assert_eq!(header.len(), 7 + 9 + 6);
        assert_eq!(header[7], "Jan Target");
        assert_eq!(header[8], "Jan Actual");
        assert_eq!(header[9], "Jan %");
        assert_eq!(header[15], "Mar %");
        assert_eq!(header.last().map(String::as_str), Some("Weighted Average"));
    }

    #[test]
    fn data_rows_repeat_section_and_subtotals_follow() {
        let mut section = PerformanceSection::new("Finance & Credit");
        section.rows.push(
            PerformanceRow::new("Finance & Credit", "Savings", "Mobilise deposits", RowMode::Standard)
                .with_month(Month::Jan, 100.0, 95.0),
        );
        section.rows.push(
            PerformanceRow::new(
                "Finance & Credit",
                "Compliance",
                "File returns on time",
                RowMode::Kpi {
                    calc_type: KpiCalcType::Compliance,
                    totals_override: None,
                },
            )
            .with_month(Month::Feb, 3.0, 2.0),
        );
        let section = recalc_section_rows(&section, &Q1);

        let table = export_table(&[section], &Q1);

        assert_eq!(table.len(), 4);
        let standard = &table[1];
        assert_eq!(standard[0], "Finance & Credit");
        assert_eq!(standard[4], "");
        assert_eq!(standard[7], "100");
        assert_eq!(standard[9], "95");
        assert_eq!(standard[10], "", "empty months stay blank");

        let kpi = &table[2];
        assert_eq!(kpi[0], "Finance & Credit");
        assert_eq!(kpi[4], "KPI");
        assert_eq!(kpi[5], "Compliance");
        assert_eq!(kpi[12], "66.67");

        let subtotal = &table[3];
        assert!(subtotal[..subtotal.len() - 3].iter().all(String::is_empty));
        assert_eq!(subtotal[subtotal.len() - 3], "5");
        assert_eq!(subtotal[subtotal.len() - 2], "");
        assert_eq!(subtotal[subtotal.len() - 1], "447.00");
    }

    #[test]
    fn par_rows_carry_their_weight() {
        let mut section = PerformanceSection::new("Finance & Credit");
        section.rows.push(PerformanceRow::new(
            "Finance & Credit",
            "Portfolio at risk",
            "Hold PAR under 5%",
            RowMode::Par { par_weight: 1.5 },
        ));

        let table = export_table(&[section], &Q1);

        assert_eq!(table[1][4], "PAR");
        assert_eq!(table[1][5], "");
        assert_eq!(table[1][6], "1.5");
    }

    #[test]
    fn totals_hide_floating_noise() {
        assert_eq!(format_total(0.1 + 0.2), "0.3");
        assert_eq!(format_total(300.0), "300");
        assert_eq!(format_input(49.6), "49.6");
    }
}
