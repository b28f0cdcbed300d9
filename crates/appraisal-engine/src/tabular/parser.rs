use super::mapping::{column_for_header, kpi_calc_type_for, section_for_name, Column, MonthField};
use super::normalizer::{clean_cell, normalize_name, parse_number};
use super::ImportOutcome;
use crate::scoring::{
    active_sums, default_par_weight, recalc_row, recalc_section, Month, MonthEntry,
    PerformanceRow, PerformanceSection, RowMode, SectionTemplate, TotalsOverride,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// KPI totals closer than this to the month sums are treated as derived,
/// not as operator overrides. Exported totals carry four decimals.
const OVERRIDE_TOLERANCE: f64 = 1e-4;

/// Column positions discovered from the header row.
struct ColumnIndex {
    positions: HashMap<Column, usize>,
}

impl ColumnIndex {
    fn from_header(header: &[String], active: &[Month]) -> Self {
        let mut positions = HashMap::new();
        for (position, cell) in header.iter().enumerate() {
            let Some(column) = column_for_header(cell) else {
                continue;
            };
            if let Column::MonthValue(month, _) = column {
                if !active.contains(&month) {
                    continue;
                }
            }
            positions.entry(column).or_insert(position);
        }
        Self { positions }
    }

    fn cell<'a>(&self, record: &'a [String], column: Column) -> &'a str {
        self.positions
            .get(&column)
            .and_then(|position| record.get(*position))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn has(&self, column: Column) -> bool {
        self.positions.contains_key(&column)
    }
}

/// Parses a decoded table (header row first) into canonical sections.
///
/// Rows without a section name are skipped; rows naming an unknown section
/// are dropped and the name reported. Every accepted row is recalculated
/// for `active` before it is returned.
pub fn import_table(table: &[Vec<String>], active: &[Month]) -> ImportOutcome {
    let Some((header, records)) = table.split_first() else {
        return ImportOutcome::default();
    };

    let columns = ColumnIndex::from_header(header, active);
    if !columns.has(Column::Section) {
        warn!("import table has no Section column; nothing imported");
        return ImportOutcome::default();
    }

    let mut grouped: HashMap<SectionTemplate, Vec<PerformanceRow>> = HashMap::new();
    let mut unrecognized = Vec::new();
    let mut seen_unrecognized = HashSet::new();

    for record in records {
        let section_name = clean_cell(columns.cell(record, Column::Section));
        if section_name.is_empty() {
            continue;
        }

        match section_for_name(&section_name) {
            Some(template) => {
                let row = parse_row(&columns, record, active);
                grouped
                    .entry(template)
                    .or_default()
                    .push(recalc_row(&row, active));
            }
            None => {
                if seen_unrecognized.insert(normalize_name(&section_name)) {
                    warn!(section = %section_name, "dropping rows for unrecognized section");
                    unrecognized.push(section_name);
                }
            }
        }
    }

    let sections = SectionTemplate::ordered()
        .into_iter()
        .filter_map(|template| {
            grouped.remove(&template).map(|rows| {
                recalc_section(&PerformanceSection {
                    name: template.label().to_string(),
                    rows,
                    subtotal_weight: 0,
                    subtotal_weighted_average: 0.0,
                })
            })
        })
        .collect::<Vec<_>>();

    debug!(
        sections = sections.len(),
        unrecognized = unrecognized.len(),
        "table imported"
    );

    ImportOutcome {
        sections,
        unrecognized_section_names: unrecognized,
    }
}

fn parse_row(columns: &ColumnIndex, record: &[String], active: &[Month]) -> PerformanceRow {
    let mut months = BTreeMap::new();
    for month in active {
        let entry = MonthEntry {
            target: parse_number(columns.cell(record, Column::MonthValue(*month, MonthField::Target))),
            actual: parse_number(columns.cell(record, Column::MonthValue(*month, MonthField::Actual))),
        };
        if entry != MonthEntry::default() {
            months.insert(*month, entry);
        }
    }

    let mut row = PerformanceRow {
        pillar: clean_cell(columns.cell(record, Column::Pillar)),
        key_result_area: clean_cell(columns.cell(record, Column::KeyResultArea)),
        target_description: clean_cell(columns.cell(record, Column::Target)),
        mode: RowMode::Standard,
        months,
        ..PerformanceRow::default()
    };
    row.mode = parse_mode(columns, record, &row, active);
    row
}

fn parse_mode(
    columns: &ColumnIndex,
    record: &[String],
    row: &PerformanceRow,
    active: &[Month],
) -> RowMode {
    match normalize_name(columns.cell(record, Column::SpecialType)).as_str() {
        "par" => RowMode::Par {
            par_weight: parse_number(columns.cell(record, Column::ParWeight))
                .unwrap_or_else(default_par_weight),
        },
        "kpi" => RowMode::Kpi {
            calc_type: kpi_calc_type_for(columns.cell(record, Column::KpiCalcType)),
            totals_override: kpi_override(columns, record, row, active),
        },
        _ => RowMode::Standard,
    }
}

/// A KPI row's totals only count as an override when they disagree with
/// what the active months add up to.
fn kpi_override(
    columns: &ColumnIndex,
    record: &[String],
    row: &PerformanceRow,
    active: &[Month],
) -> Option<TotalsOverride> {
    let target_total = parse_number(columns.cell(record, Column::TotalTarget));
    let actual_total = parse_number(columns.cell(record, Column::TotalActual));
    if target_total.is_none() && actual_total.is_none() {
        return None;
    }

    let (summed_target, summed_actual) = active_sums(row, active);
    let target_total = target_total.unwrap_or(summed_target);
    let actual_total = actual_total.unwrap_or(summed_actual);

    let differs = (target_total - summed_target).abs() > OVERRIDE_TOLERANCE
        || (actual_total - summed_actual).abs() > OVERRIDE_TOLERANCE;
    differs.then_some(TotalsOverride {
        target_total,
        actual_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::KpiCalcType;

    const Q1: [Month; 3] = [Month::Jan, Month::Feb, Month::Mar];

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    const HEADER: &[&str] = &[
        "Section",
        "Pillar",
        "Key Result Area",
        "Target",
        "Special Type",
        "KPI Calc Type",
        "PAR Weight",
        "Jan Target",
        "Jan Actual",
        "Jan %",
        "Feb Target",
        "Feb Actual",
        "Feb %",
        "Mar Target",
        "Mar Actual",
        "Mar %",
        "Total Target",
        "Total Actual",
    ];

    #[test]
    fn rows_are_grouped_and_recalculated() {
        let input = table(&[
            HEADER,
            &[
                "Finance & Credit", "Finance", "Savings", "Mobilise deposits", "", "", "",
                "100", "95", "999", "100", "95", "", "100", "95", "", "1", "1",
            ],
        ]);

        let outcome = import_table(&input, &Q1);

        assert!(outcome.unrecognized_section_names.is_empty());
        assert_eq!(outcome.sections.len(), 1);
        let section = &outcome.sections[0];
        assert_eq!(section.name, "Finance & Credit");
        let metrics = &section.rows[0].metrics;
        assert_eq!(metrics.target_total, 300.0);
        assert_eq!(metrics.percent_achieved, 95);
        assert_eq!(section.subtotal_weight, 4);
        assert_eq!(section.subtotal_weighted_average, 380.0);
    }

    #[test]
    fn unknown_sections_are_reported_once() {
        let input = table(&[
            HEADER,
            &["Sales", "Sales", "Leads", "Close deals"],
            &["Sales", "Sales", "Leads", "Open accounts"],
            &["", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "4", ""],
        ]);

        let outcome = import_table(&input, &Q1);

        assert!(outcome.sections.is_empty());
        assert_eq!(outcome.unrecognized_section_names, vec!["Sales".to_string()]);
    }

    #[test]
    fn inactive_month_columns_are_ignored() {
        let input = table(&[
            &["Section", "Pillar", "Apr Target", "Apr Actual", "Jan Target", "Jan Actual"],
            &["Finance & Credit", "Finance", "10", "10", "20", "10"],
        ]);

        let outcome = import_table(&input, &Q1);
        let row = &outcome.sections[0].rows[0];

        assert!(!row.months.contains_key(&Month::Apr));
        assert_eq!(row.entry(Month::Jan), MonthEntry::new(20.0, 10.0));
        assert_eq!(row.metrics.percent_achieved, 50);
    }

    #[test]
    fn special_types_select_row_mode() {
        let input = table(&[
            HEADER,
            &["Finance & Credit", "", "", "", "PAR", "", ""],
            &["Finance & Credit", "", "", "", "par", "", "0.5"],
            &["Finance & Credit", "", "", "", "KPI", "target ratio", ""],
            &["Finance & Credit", "", "", "", "KPI", "", ""],
        ]);

        let outcome = import_table(&input, &Q1);
        let modes: Vec<RowMode> = outcome.sections[0].rows.iter().map(|row| row.mode).collect();

        assert_eq!(modes[0], RowMode::Par { par_weight: 1.0 });
        assert_eq!(modes[1], RowMode::Par { par_weight: 0.5 });
        assert_eq!(
            modes[2],
            RowMode::Kpi {
                calc_type: KpiCalcType::TargetRatio,
                totals_override: None,
            }
        );
        assert_eq!(
            modes[3],
            RowMode::Kpi {
                calc_type: KpiCalcType::PercentageWeighted,
                totals_override: None,
            }
        );
    }

    #[test]
    fn kpi_totals_that_differ_become_override() {
        let input = table(&[
            HEADER,
            &[
                "Finance & Credit", "Audit", "Compliance", "Close findings", "KPI", "Compliance", "",
                "0", "0", "", "", "", "", "", "", "", "10", "10",
            ],
            &[
                "Finance & Credit", "Audit", "Compliance", "File returns", "KPI", "Target Ratio", "",
                "4", "3", "", "", "", "", "", "", "", "4", "3",
            ],
        ]);

        let outcome = import_table(&input, &Q1);
        let rows = &outcome.sections[0].rows;

        match rows[0].mode {
            RowMode::Kpi {
                totals_override: Some(totals),
                ..
            } => {
                assert_eq!(totals.target_total, 10.0);
                assert_eq!(totals.actual_total, 10.0);
            }
            other => panic!("expected override, got {other:?}"),
        }
        assert_eq!(rows[0].metrics.month_percent[&Month::Jan], 100.0);
        assert_eq!(rows[0].metrics.percent_achieved, 100);

        assert!(matches!(
            rows[1].mode,
            RowMode::Kpi {
                totals_override: None,
                ..
            }
        ));
        assert_eq!(rows[1].metrics.percent_achieved, 75);
    }

    #[test]
    fn non_numeric_cells_read_as_missing() {
        let input = table(&[
            HEADER,
            &[
                "Finance & Credit", "", "", "", "", "", "", "abc", "12", "",
            ],
        ]);

        let outcome = import_table(&input, &Q1);
        let row = &outcome.sections[0].rows[0];

        assert_eq!(row.entry(Month::Jan).target, None);
        assert_eq!(row.entry(Month::Jan).actual, Some(12.0));
        assert_eq!(row.metrics.percent_achieved, 0);
    }

    #[test]
    fn missing_section_column_imports_nothing() {
        let input = table(&[&["Pillar", "Jan Target"], &["Finance", "1"]]);
        let outcome = import_table(&input, &Q1);
        assert!(outcome.sections.is_empty());
        assert!(outcome.unrecognized_section_names.is_empty());
    }

    #[test]
    fn empty_table_imports_nothing() {
        assert_eq!(import_table(&[], &Q1), ImportOutcome::default());
    }
}
