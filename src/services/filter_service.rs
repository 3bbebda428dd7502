use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::candidate::Candidate;
use crate::models::stage::Stage;

/// Plain description of the active search/filter/sort criteria for a
/// candidate list. Every listing screen builds one of these and calls
/// [`derive`]; no screen carries its own filtering code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub search_text: String,
    pub stage: StageFilter,
    pub rating_band: RatingBand,
    pub notice_period_band: NoticePeriodBand,
    pub resigned: ResignedFilter,
    pub sort_key: Option<SortKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageFilter {
    #[default]
    All,
    Only(Stage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingBand {
    #[default]
    All,
    /// rating >= 4.0
    High,
    /// 3.0 <= rating < 4.0
    Medium,
    /// rating < 3.0
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticePeriodBand {
    #[default]
    All,
    /// <= 30 days
    Short,
    /// 31..=60 days
    Medium,
    /// > 60 days
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResignedFilter {
    #[default]
    All,
    Resigned,
    NotResigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    AppliedDateAsc,
    AppliedDateDesc,
    NameAsc,
    NameDesc,
    ExperienceDesc,
    RatingDesc,
    RatingAsc,
    InterviewDateAsc,
    NoticePeriodAsc,
    ExpectedCompDesc,
}

/// Derive the displayed candidate list from the full list and a filter
/// specification. Pure: same inputs always produce the same ordered output.
/// Filters compose by AND; sorting is applied last; ties break by candidate
/// id ascending. Without a sort key the surviving candidates keep their
/// original relative order.
///
/// Malformed records never cause a failure here: a candidate missing a
/// numeric field is excluded from threshold filters on that field and sorts
/// after everyone else on it.
pub fn derive(candidates: &[Candidate], spec: &FilterSpec) -> Vec<Candidate> {
    let needle = spec.search_text.trim().to_lowercase();

    let mut out: Vec<Candidate> = candidates
        .iter()
        .filter(|c| matches_search(c, &needle))
        .filter(|c| matches_stage(c, spec.stage))
        .filter(|c| matches_rating(c, spec.rating_band))
        .filter(|c| matches_notice_period(c, spec.notice_period_band))
        .filter(|c| matches_resigned(c, spec.resigned))
        .cloned()
        .collect();

    if let Some(key) = spec.sort_key {
        out.sort_by(|a, b| compare(a, b, key).then_with(|| a.id.cmp(&b.id)));
    }
    out
}

fn matches_search(c: &Candidate, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let hit = |field: &str| field.to_lowercase().contains(needle);
    hit(&c.name)
        || hit(&c.email)
        || c.education.as_deref().is_some_and(hit)
        || c.experience.as_deref().is_some_and(hit)
        || c.skills.iter().any(|s| hit(s))
}

fn matches_stage(c: &Candidate, filter: StageFilter) -> bool {
    match filter {
        StageFilter::All => true,
        StageFilter::Only(stage) => c.stage == stage,
    }
}

fn matches_rating(c: &Candidate, band: RatingBand) -> bool {
    let Some(rating) = c.rating else {
        // Unrated candidates are excluded from any threshold band.
        return band == RatingBand::All;
    };
    match band {
        RatingBand::All => true,
        RatingBand::High => rating >= 4.0,
        RatingBand::Medium => (3.0..4.0).contains(&rating),
        RatingBand::Low => rating < 3.0,
    }
}

fn matches_notice_period(c: &Candidate, band: NoticePeriodBand) -> bool {
    let days = c
        .interview_fix
        .as_ref()
        .and_then(|f| f.notice_period_days);
    let Some(days) = days else {
        return band == NoticePeriodBand::All;
    };
    match band {
        NoticePeriodBand::All => true,
        NoticePeriodBand::Short => days <= 30,
        NoticePeriodBand::Medium => (31..=60).contains(&days),
        NoticePeriodBand::Long => days > 60,
    }
}

fn matches_resigned(c: &Candidate, filter: ResignedFilter) -> bool {
    // No scheduling metadata means the candidate has not resigned.
    let resigned = c.interview_fix.as_ref().is_some_and(|f| f.resigned);
    match filter {
        ResignedFilter::All => true,
        ResignedFilter::Resigned => resigned,
        ResignedFilter::NotResigned => !resigned,
    }
}

fn compare(a: &Candidate, b: &Candidate, key: SortKey) -> Ordering {
    let asc = true;
    let desc = false;
    match key {
        SortKey::AppliedDateAsc => a.applied_at.cmp(&b.applied_at),
        SortKey::AppliedDateDesc => b.applied_at.cmp(&a.applied_at),
        SortKey::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
        SortKey::ExperienceDesc => nulls_last(
            a.experience.as_deref().map(str::to_lowercase),
            b.experience.as_deref().map(str::to_lowercase),
            desc,
        ),
        SortKey::RatingDesc => nulls_last_f64(a.rating, b.rating, desc),
        SortKey::RatingAsc => nulls_last_f64(a.rating, b.rating, asc),
        SortKey::InterviewDateAsc => nulls_last(
            a.interview_fix.as_ref().and_then(|f| f.interview_at),
            b.interview_fix.as_ref().and_then(|f| f.interview_at),
            asc,
        ),
        SortKey::NoticePeriodAsc => nulls_last(
            a.interview_fix.as_ref().and_then(|f| f.notice_period_days),
            b.interview_fix.as_ref().and_then(|f| f.notice_period_days),
            asc,
        ),
        SortKey::ExpectedCompDesc => nulls_last::<Decimal>(
            a.interview_fix.as_ref().and_then(|f| f.expected_compensation),
            b.interview_fix.as_ref().and_then(|f| f.expected_compensation),
            desc,
        ),
    }
}

/// Compares in list order: missing values go to the end regardless of the
/// key's direction, so the direction is applied only when both sides are
/// present.
fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            if ascending {
                x.cmp(&y)
            } else {
                y.cmp(&x)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn nulls_last_f64(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            if ascending {
                x.total_cmp(&y)
            } else {
                y.total_cmp(&x)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn candidate(name: &str, rating: Option<f64>) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: None,
            education: None,
            experience: None,
            skills: vec![],
            rating,
            avatar_url: None,
            resume_url: None,
            cover_letter_url: None,
            applied_at: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            job_id: Uuid::new_v4(),
            stage: Stage::PostInterVet,
            interview_fix: None,
        }
    }

    fn ids(list: &[Candidate]) -> Vec<Uuid> {
        list.iter().map(|c| c.id).collect()
    }

    #[test]
    fn empty_spec_is_a_no_op() {
        let input = vec![
            candidate("Bakai", Some(4.8)),
            candidate("Aida", Some(3.2)),
            candidate("Chyngyz", Some(4.0)),
        ];
        let out = derive(&input, &FilterSpec::default());
        assert_eq!(ids(&out), ids(&input));
    }

    #[test]
    fn derive_is_idempotent() {
        let input = vec![
            candidate("Bakai", Some(4.8)),
            candidate("Aida", None),
            candidate("Chyngyz", Some(4.0)),
        ];
        let spec = FilterSpec {
            rating_band: RatingBand::All,
            sort_key: Some(SortKey::RatingDesc),
            ..Default::default()
        };
        let once = derive(&input, &spec);
        let twice = derive(&once, &spec);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn high_band_keeps_only_four_and_above_in_original_order() {
        let input = vec![
            candidate("Bakai", Some(4.8)),
            candidate("Aida", Some(3.2)),
            candidate("Chyngyz", Some(4.0)),
        ];
        let spec = FilterSpec {
            rating_band: RatingBand::High,
            ..Default::default()
        };
        let out = derive(&input, &spec);
        assert_eq!(ids(&out), vec![input[0].id, input[2].id]);
    }

    #[test]
    fn unrated_candidates_are_excluded_from_threshold_bands() {
        let input = vec![candidate("Bakai", Some(2.0)), candidate("Aida", None)];
        let low = derive(
            &input,
            &FilterSpec {
                rating_band: RatingBand::Low,
                ..Default::default()
            },
        );
        assert_eq!(ids(&low), vec![input[0].id]);
        let all = derive(&input, &FilterSpec::default());
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn rating_sort_directions_are_exact_reverses_without_ties() {
        let input = vec![
            candidate("Bakai", Some(4.8)),
            candidate("Aida", Some(3.2)),
            candidate("Chyngyz", Some(4.0)),
        ];
        let desc = derive(
            &input,
            &FilterSpec {
                sort_key: Some(SortKey::RatingDesc),
                ..Default::default()
            },
        );
        let asc = derive(
            &input,
            &FilterSpec {
                sort_key: Some(SortKey::RatingAsc),
                ..Default::default()
            },
        );
        let mut reversed = ids(&desc);
        reversed.reverse();
        assert_eq!(ids(&asc), reversed);
    }

    #[test]
    fn missing_ratings_sort_last_in_both_directions() {
        let input = vec![
            candidate("Aida", None),
            candidate("Bakai", Some(1.0)),
            candidate("Chyngyz", Some(5.0)),
        ];
        for key in [SortKey::RatingAsc, SortKey::RatingDesc] {
            let out = derive(
                &input,
                &FilterSpec {
                    sort_key: Some(key),
                    ..Default::default()
                },
            );
            assert_eq!(out.last().unwrap().id, input[0].id, "{key:?}");
        }

        // Ascending must still order the rated candidates, with the unrated
        // one after them rather than ahead of them.
        let asc = derive(
            &input,
            &FilterSpec {
                sort_key: Some(SortKey::RatingAsc),
                ..Default::default()
            },
        );
        assert_eq!(ids(&asc), vec![input[1].id, input[2].id, input[0].id]);
    }

    #[test]
    fn missing_notice_periods_sort_last_on_ascending_sort() {
        let mut short = candidate("Bakai", None);
        short.interview_fix = Some(crate::models::candidate::InterviewFix {
            notice_period_days: Some(15),
            resigned: false,
            resignation_date: None,
            location_preference: None,
            current_compensation: None,
            expected_compensation: None,
            has_other_offers: false,
            call_outcome: Default::default(),
            interview_at: None,
        });
        let mut long = candidate("Chyngyz", None);
        long.interview_fix = Some(crate::models::candidate::InterviewFix {
            notice_period_days: Some(60),
            ..short.interview_fix.clone().unwrap()
        });
        let no_metadata = candidate("Aida", None);
        let input = vec![no_metadata.clone(), long.clone(), short.clone()];

        let out = derive(
            &input,
            &FilterSpec {
                sort_key: Some(SortKey::NoticePeriodAsc),
                ..Default::default()
            },
        );
        assert_eq!(ids(&out), vec![short.id, long.id, no_metadata.id]);
    }

    #[test]
    fn search_matches_any_field_case_insensitively() {
        let mut with_skill = candidate("Bakai", None);
        with_skill.skills = vec!["PostgreSQL".into(), "Rust".into()];
        let mut with_education = candidate("Aida", None);
        with_education.education = Some("Kyrgyz State Technical University".into());
        let other = candidate("Chyngyz", None);
        let input = vec![with_skill.clone(), with_education.clone(), other];

        let by_skill = derive(
            &input,
            &FilterSpec {
                search_text: "rust".into(),
                ..Default::default()
            },
        );
        assert_eq!(ids(&by_skill), vec![with_skill.id]);

        let by_education = derive(
            &input,
            &FilterSpec {
                search_text: "TECHNICAL".into(),
                ..Default::default()
            },
        );
        assert_eq!(ids(&by_education), vec![with_education.id]);
    }

    #[test]
    fn filters_compose_by_and() {
        let mut a = candidate("Bakai", Some(4.5));
        a.stage = Stage::InterviewFix;
        let mut b = candidate("Aida", Some(4.5));
        b.stage = Stage::PostInterVet;
        let mut c = candidate("Chyngyz", Some(2.0));
        c.stage = Stage::InterviewFix;
        let input = vec![a.clone(), b, c];

        let out = derive(
            &input,
            &FilterSpec {
                stage: StageFilter::Only(Stage::InterviewFix),
                rating_band: RatingBand::High,
                ..Default::default()
            },
        );
        assert_eq!(ids(&out), vec![a.id]);
    }

    #[test]
    fn ties_break_by_id_ascending() {
        let mut input = vec![
            candidate("Bakai", Some(4.0)),
            candidate("Aida", Some(4.0)),
            candidate("Chyngyz", Some(4.0)),
        ];
        let spec = FilterSpec {
            sort_key: Some(SortKey::RatingDesc),
            ..Default::default()
        };
        let out = derive(&input, &spec);
        let mut expected = ids(&input);
        expected.sort();
        assert_eq!(ids(&out), expected);

        // Input order must not matter when everything ties.
        input.reverse();
        assert_eq!(ids(&derive(&input, &spec)), expected);
    }
}
