//! Reads behavioural-trait ratings from a `Skill,Description,Rating` CSV.

use super::normalizer::parse_number;
use super::TabularError;
use crate::scoring::SoftSkillScore;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SoftSkillRow {
    #[serde(rename = "Skill")]
    skill: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Rating", default, deserialize_with = "lenient_number")]
    rating: Option<f64>,
}

/// Skills keep file order; blank or non-numeric ratings leave the skill
/// unrated rather than failing the read.
pub fn parse_soft_skills<R: Read>(reader: R) -> Result<Vec<SoftSkillScore>, TabularError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut skills = Vec::new();

    for record in csv_reader.deserialize::<SoftSkillRow>() {
        let row = record?;
        if row.skill.is_empty() {
            continue;
        }

        skills.push(SoftSkillScore {
            skill_name: row.skill,
            description: row.description,
            rating: row.rating,
            weight: None,
            weighted_score: None,
        });
    }

    Ok(skills)
}

pub fn soft_skills_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<SoftSkillScore>, TabularError> {
    let file = std::fs::File::open(path)?;
    parse_soft_skills(file)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(parse_number))
}
