use appraisal_engine::scoring::{
    recalc_section_rows, resolve_active_months, KpiCalcType, Month, PerformanceRow,
    PerformanceSection, ReportingPeriod, RowMode, TotalsOverride,
};
use appraisal_engine::tabular::{
    export_table, import_table, merge_import, write_csv, TableReader,
};
use std::io::Cursor;

fn sample_sections(active: &[Month]) -> Vec<PerformanceSection> {
    let mut sections = PerformanceSection::standard_set();

    sections[0].rows.push(
        PerformanceRow::new(
            "Membership & Customer Satisfaction",
            "Member growth",
            "Recruit new members",
            RowMode::Standard,
        )
        .with_month(Month::Apr, 120.0, 131.0)
        .with_month(Month::May, 120.0, 98.5)
        .with_month(Month::Jun, 120.0, 140.0),
    );
    sections[0].rows.push(PerformanceRow::new(
        "Membership & Customer Satisfaction",
        "Complaints",
        "Resolve complaints within 48 hours",
        RowMode::Standard,
    ));

    sections[1].rows.push(
        PerformanceRow::new(
            "Finance & Credit",
            "Portfolio quality",
            "Portfolio at risk, 30 days",
            RowMode::Par { par_weight: 1.25 },
        )
        .with_month(Month::Apr, 0.1, 0.2)
        .with_month(Month::May, 0.1, 0.2)
        .with_month(Month::Jun, 0.1, 0.15),
    );

    sections[2].rows.push(
        PerformanceRow::new(
            "Business Operations, Audit, ICT & HR",
            "Audit",
            "Close audit findings",
            RowMode::Kpi {
                calc_type: KpiCalcType::Compliance,
                totals_override: Some(TotalsOverride {
                    target_total: 12.0,
                    actual_total: 9.0,
                }),
            },
        )
        .with_month(Month::Apr, 4.0, 4.0)
        .with_month(Month::May, 4.0, 2.0),
    );
    sections[2].rows.push(
        PerformanceRow::new(
            "Business Operations, Audit, ICT & HR",
            "ICT",
            "System uptime",
            RowMode::Kpi {
                calc_type: KpiCalcType::TargetRatio,
                totals_override: None,
            },
        )
        .with_month(Month::Apr, 99.5, 99.9)
        .with_month(Month::Jun, 99.5, 97.25),
    );

    sections
        .iter()
        .map(|section| recalc_section_rows(section, active))
        .collect()
}

#[test]
fn export_then_import_reproduces_rows() {
    let active = resolve_active_months(&ReportingPeriod::Quarterly { quarter: 2 });
    let original = sample_sections(&active);

    let table = export_table(&original, &active);
    let outcome = import_table(&table, &active);

    assert!(outcome.unrecognized_section_names.is_empty());
    assert_eq!(outcome.sections.len(), original.len());

    for (imported, source) in outcome.sections.iter().zip(&original) {
        assert_eq!(imported.name, source.name);
        assert_eq!(imported.rows.len(), source.rows.len());
        assert_eq!(imported.subtotal_weight, source.subtotal_weight);
        assert_eq!(
            imported.subtotal_weighted_average,
            source.subtotal_weighted_average
        );

        for (row, expected) in imported.rows.iter().zip(&source.rows) {
            assert_eq!(row.pillar, expected.pillar);
            assert_eq!(row.key_result_area, expected.key_result_area);
            assert_eq!(row.target_description, expected.target_description);
            assert_eq!(row.mode, expected.mode);
            for month in &active {
                assert_eq!(row.entry(*month), expected.entry(*month), "{month:?}");
            }
            assert_eq!(row.metrics, expected.metrics);
        }
    }
}

#[test]
fn csv_round_trip_survives_quoting() {
    let active = resolve_active_months(&ReportingPeriod::Quarterly { quarter: 2 });
    let original = sample_sections(&active);

    let mut buffer = Vec::new();
    write_csv(&export_table(&original, &active), &mut buffer).expect("csv writes");
    let table = TableReader::from_reader(Cursor::new(buffer)).expect("csv reads");
    let outcome = import_table(&table, &active);

    let names: Vec<&str> = outcome
        .sections
        .iter()
        .map(|section| section.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Membership & Customer Satisfaction",
            "Finance & Credit",
            "Business Operations, Audit, ICT & HR",
        ]
    );
    assert_eq!(outcome.sections[2].rows[0].metrics.percent_achieved, 75);
}

#[test]
fn import_under_different_period_only_reads_active_months() {
    let q2 = resolve_active_months(&ReportingPeriod::Quarterly { quarter: 2 });
    let annual = resolve_active_months(&ReportingPeriod::Annual);
    let original = sample_sections(&annual);

    let table = export_table(&original, &annual);
    let outcome = import_table(&table, &q2);

    let row = &outcome.sections[0].rows[0];
    assert_eq!(row.entry(Month::May).actual, Some(98.5));
    assert!(row.months.keys().all(|month| q2.contains(month)));
}

#[test]
fn import_merge_keeps_sections_absent_from_file() {
    let active = resolve_active_months(&ReportingPeriod::Quarterly { quarter: 2 });
    let existing = sample_sections(&active);

    let csv = "Section,Pillar,Key Result Area,Target,Apr Target,Apr Actual\n\
\"Finance & Credit\",Finance & Credit,Savings,Mobilise deposits,50,55\n\
Sales,Sales,Leads,Convert leads,10,10\n";
    let table = TableReader::from_reader(Cursor::new(csv)).expect("csv reads");
    let outcome = import_table(&table, &active);
    assert_eq!(outcome.unrecognized_section_names, vec!["Sales".to_string()]);

    let merged = merge_import(&existing, outcome);

    assert_eq!(merged[0], existing[0]);
    assert_eq!(merged[1].rows.len(), 1);
    assert_eq!(merged[1].rows[0].key_result_area, "Savings");
    assert_eq!(merged[1].rows[0].metrics.percent_achieved, 110);
    assert_eq!(merged[2], existing[2]);
}
