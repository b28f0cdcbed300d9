use super::domain::{AppraisalScore, Month};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SectionSubtotalEntry {
    pub name: String,
    pub row_count: usize,
    pub subtotal_weight: u32,
    pub subtotal_weighted_average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoftSkillEntry {
    pub skill_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppraisalSummary {
    pub period_label: String,
    pub active_months: Vec<Month>,
    pub sections: Vec<SectionSubtotalEntry>,
    pub soft_skills: Vec<SoftSkillEntry>,
    pub score: AppraisalScore,
}
