use super::domain::{AppraisalScore, PerformanceSection, SoftSkillScore};
use super::weight::{resolve_weight, round_percent};
use tracing::debug;

/// Share of the overall rating carried by strategic objectives (Section B).
pub const STRATEGIC_SHARE: f64 = 0.7;
/// Share of the overall rating carried by behavioural traits (Section C).
pub const BEHAVIORAL_SHARE: f64 = 0.3;

/// Derives weight and weighted score from the entered rating.
pub fn score_soft_skill(skill: &SoftSkillScore) -> SoftSkillScore {
    let (weight, weighted_score) = match skill.rating.filter(|rating| rating.is_finite()) {
        Some(rating) => {
            let weight = resolve_weight(rating);
            (Some(weight), Some(rating * f64::from(weight)))
        }
        None => (None, None),
    };

    SoftSkillScore {
        weight,
        weighted_score,
        ..skill.clone()
    }
}

/// Combines section subtotals and soft-skill ratings into the 70/30
/// overall rating. Unrated skills are left out of both sums.
pub fn compose_score(
    sections: &[PerformanceSection],
    soft_skills: &[SoftSkillScore],
) -> AppraisalScore {
    let total_weight: f64 = sections
        .iter()
        .map(|section| f64::from(section.subtotal_weight))
        .sum();
    let total_weighted_average: f64 = sections
        .iter()
        .map(|section| section.subtotal_weighted_average)
        .sum();

    let strategic_objectives_score = if total_weight > 0.0 {
        round_percent(total_weighted_average / total_weight * STRATEGIC_SHARE)
    } else {
        0
    };

    let (skill_weight, skill_weighted) = soft_skills
        .iter()
        .map(score_soft_skill)
        .filter_map(|skill| Some((skill.weight?, skill.weighted_score?)))
        .fold((0.0, 0.0), |(weights, scores), (weight, score)| {
            (weights + f64::from(weight), scores + score)
        });

    let behavioral_score = if skill_weight > 0.0 {
        round_percent(skill_weighted / skill_weight * BEHAVIORAL_SHARE)
    } else {
        0
    };

    let overall_rating = round_percent((strategic_objectives_score + behavioral_score) as f64);

    debug!(
        strategic_objectives_score,
        behavioral_score, overall_rating, "appraisal score composed"
    );

    AppraisalScore {
        strategic_objectives_score,
        behavioral_score,
        overall_rating,
    }
}
