use crate::infra::PeriodArgs;
use appraisal_engine::config::AppConfig;
use appraisal_engine::error::AppError;
use appraisal_engine::scoring::{
    resolve_active_months, Appraisal, AppraisalEngine, AppraisalReport, PerformanceSection,
    BEHAVIORAL_SHARE, STRATEGIC_SHARE,
};
use appraisal_engine::tabular::soft_skills::soft_skills_from_path;
use appraisal_engine::tabular::{export_table, import_table, merge_import, write_csv, TableReader};
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Appraisal table exported as CSV
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Optional Skill,Description,Rating CSV with behavioural ratings
    #[arg(long)]
    pub(crate) soft_skills: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) period: PeriodArgs,
    /// Print every row with its derived metrics
    #[arg(long)]
    pub(crate) list_rows: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Appraisal document (JSON) to evaluate
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination CSV file (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) period: PeriodArgs,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        csv,
        soft_skills,
        period,
        list_rows,
    } = args;

    let config = AppConfig::load()?;
    let period = period.resolve(config.appraisal.default_period);
    let active_months = resolve_active_months(&period);

    let table = TableReader::from_path(&csv)?;
    let outcome = import_table(&table, &active_months);
    let unrecognized = outcome.unrecognized_section_names.clone();
    let sections = merge_import(&PerformanceSection::standard_set(), outcome);

    let soft_skills = match soft_skills {
        Some(path) => soft_skills_from_path(path)?,
        None => Vec::new(),
    };

    let appraisal = Appraisal {
        period: Some(period),
        sections,
        soft_skills,
    };
    let report = AppraisalEngine::new(config.appraisal).evaluate(&appraisal);

    println!("Performance appraisal score");
    println!("Source: {}", csv.display());
    render_report(&report, &unrecognized, list_rows);
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        input,
        output,
        period,
    } = args;

    let config = AppConfig::load()?;
    let reader = BufReader::new(File::open(&input)?);
    let mut appraisal: Appraisal = serde_json::from_reader(reader)?;
    if period.period_type.is_some() {
        appraisal.period = Some(period.resolve(config.appraisal.default_period));
    }

    let report = AppraisalEngine::new(config.appraisal).evaluate(&appraisal);
    let table = export_table(&report.sections, &report.active_months);

    match output {
        Some(path) => {
            write_csv(&table, File::create(&path)?)?;
            println!(
                "Exported {} rows for {} to {}",
                table.len().saturating_sub(1),
                report.period.label(),
                path.display()
            );
        }
        None => write_csv(&table, std::io::stdout().lock())?,
    }

    Ok(())
}

fn render_report(report: &AppraisalReport, unrecognized: &[String], list_rows: bool) {
    let summary = report.summary();
    let months = summary
        .active_months
        .iter()
        .map(|month| month.label())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Period: {} [{}]", summary.period_label, months);

    if !unrecognized.is_empty() {
        println!(
            "Warning: rows skipped for unrecognized sections: {}",
            unrecognized.join("; ")
        );
    }

    println!("\nSection B: strategic objectives");
    for entry in &summary.sections {
        println!(
            "- {}: {} rows | weight {} | weighted average {:.2}",
            entry.name, entry.row_count, entry.subtotal_weight, entry.subtotal_weighted_average
        );
    }

    if list_rows {
        for section in &report.sections {
            if section.rows.is_empty() {
                continue;
            }
            println!("\n{}", section.name);
            for row in &section.rows {
                let special = row.mode.special_type_label();
                let tag = if special.is_empty() {
                    String::new()
                } else {
                    format!(" [{special}]")
                };
                println!(
                    "  - {} / {}{}: target {} | actual {} | {}% | weight {} | weighted {:.2}",
                    row.pillar,
                    row.key_result_area,
                    tag,
                    row.metrics.target_total,
                    row.metrics.actual_total,
                    row.metrics.percent_achieved,
                    row.metrics.weight,
                    row.metrics.weighted_average
                );
            }
        }
    }

    if !summary.soft_skills.is_empty() {
        println!("\nSection C: behavioural traits");
        for skill in &summary.soft_skills {
            match (skill.rating, skill.weight, skill.weighted_score) {
                (Some(rating), Some(weight), Some(score)) => println!(
                    "- {}: rating {} | weight {} | weighted {:.2}",
                    skill.skill_name, rating, weight, score
                ),
                _ => println!("- {}: not rated", skill.skill_name),
            }
        }
    }

    let score = summary.score;
    println!("\nOverall rating");
    println!(
        "- Strategic objectives ({:.0}%): {}",
        STRATEGIC_SHARE * 100.0,
        score.strategic_objectives_score
    );
    println!(
        "- Behavioural traits ({:.0}%): {}",
        BEHAVIORAL_SHARE * 100.0,
        score.behavioral_score
    );
    println!("- Overall: {}", score.overall_rating);
}
