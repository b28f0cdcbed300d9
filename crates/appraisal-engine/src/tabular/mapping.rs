use super::normalizer::normalize_name;
use crate::scoring::{KpiCalcType, Month, SectionTemplate};
use std::collections::HashMap;
use std::sync::OnceLock;

pub(crate) const SECTION: &str = "Section";
pub(crate) const PILLAR: &str = "Pillar";
pub(crate) const KEY_RESULT_AREA: &str = "Key Result Area";
pub(crate) const TARGET: &str = "Target";
pub(crate) const SPECIAL_TYPE: &str = "Special Type";
pub(crate) const KPI_CALC_TYPE: &str = "KPI Calc Type";
pub(crate) const PAR_WEIGHT: &str = "PAR Weight";
pub(crate) const TOTAL_TARGET: &str = "Total Target";
pub(crate) const TOTAL_ACTUAL: &str = "Total Actual";
pub(crate) const PERCENT_ACHIEVED: &str = "% Achieved";
pub(crate) const WEIGHT: &str = "Weight";
pub(crate) const RATING: &str = "Rating";
pub(crate) const WEIGHTED_AVERAGE: &str = "Weighted Average";

/// Which of the three per-month cells a header refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MonthField {
    Target,
    Actual,
    Percent,
}

impl MonthField {
    pub(crate) const ORDERED: [Self; 3] = [Self::Target, Self::Actual, Self::Percent];

    pub(crate) const fn suffix(self) -> &'static str {
        match self {
            Self::Target => "Target",
            Self::Actual => "Actual",
            Self::Percent => "%",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "target" => Some(Self::Target),
            "actual" => Some(Self::Actual),
            "%" => Some(Self::Percent),
            _ => None,
        }
    }
}

pub(crate) fn month_header(month: Month, field: MonthField) -> String {
    format!("{} {}", month.label(), field.suffix())
}

/// Columns the importer knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Column {
    Section,
    Pillar,
    KeyResultArea,
    Target,
    SpecialType,
    KpiCalcType,
    ParWeight,
    MonthValue(Month, MonthField),
    TotalTarget,
    TotalActual,
}

pub(crate) fn column_for_header(header: &str) -> Option<Column> {
    let normalized = normalize_name(header);
    let fixed = [
        (SECTION, Column::Section),
        (PILLAR, Column::Pillar),
        (KEY_RESULT_AREA, Column::KeyResultArea),
        (TARGET, Column::Target),
        (SPECIAL_TYPE, Column::SpecialType),
        (KPI_CALC_TYPE, Column::KpiCalcType),
        (PAR_WEIGHT, Column::ParWeight),
        (TOTAL_TARGET, Column::TotalTarget),
        (TOTAL_ACTUAL, Column::TotalActual),
    ];
    if let Some((_, column)) = fixed
        .iter()
        .find(|(label, _)| normalize_name(label) == normalized)
    {
        return Some(*column);
    }

    let (month_label, field) = normalized.rsplit_once(' ')?;
    let month = Month::from_label(month_label)?;
    let field = MonthField::parse(field)?;
    Some(Column::MonthValue(month, field))
}

static SECTION_NAME_MAP: OnceLock<HashMap<String, SectionTemplate>> = OnceLock::new();

pub(crate) fn section_for_name(name: &str) -> Option<SectionTemplate> {
    section_name_map().get(&normalize_name(name)).copied()
}

fn section_name_map() -> &'static HashMap<String, SectionTemplate> {
    SECTION_NAME_MAP.get_or_init(|| {
        SectionTemplate::ordered()
            .into_iter()
            .map(|template| (normalize_name(template.label()), template))
            .collect()
    })
}

/// Unknown or blank calc types fall back to percentage-weighted.
pub(crate) fn kpi_calc_type_for(value: &str) -> KpiCalcType {
    let normalized: String = normalize_name(value)
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect();
    match normalized.as_str() {
        "targetratio" => KpiCalcType::TargetRatio,
        "compliance" => KpiCalcType::Compliance,
        _ => KpiCalcType::PercentageWeighted,
    }
}
