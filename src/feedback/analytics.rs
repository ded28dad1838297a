//! Aggregates over stored submissions for the dashboard.
//!
//! Everything here is a single pass over a slice; no state is kept between
//! calls.

use serde::Serialize;
use std::collections::BTreeMap;

use super::Submission;

/// Age groups shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBucket {
    Kids,
    Teenagers,
    Adults,
    Elderly,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::Kids,
        AgeBucket::Teenagers,
        AgeBucket::Adults,
        AgeBucket::Elderly,
    ];

    pub fn of(age: u32) -> Self {
        match age {
            0..=12 => AgeBucket::Kids,
            13..=19 => AgeBucket::Teenagers,
            20..=59 => AgeBucket::Adults,
            _ => AgeBucket::Elderly,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Kids => "Kids (0-12)",
            AgeBucket::Teenagers => "Teenagers (13-19)",
            AgeBucket::Adults => "Adults (20-59)",
            AgeBucket::Elderly => "Elderly (60+)",
        }
    }
}

/// One non-empty age bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeGroup {
    pub bucket: AgeBucket,
    pub label: &'static str,
    pub count: usize,
    /// Share of all submissions, rounded to the nearest integer.
    pub percentage: u32,
}

/// Overall sentiment from the mean rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Mixed,
    Unhappy,
}

impl Mood {
    pub fn from_mean(mean_rating: f64) -> Self {
        if mean_rating >= 4.0 {
            Mood::Happy
        } else if mean_rating >= 3.0 {
            Mood::Mixed
        } else {
            Mood::Unhappy
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Mood::Happy => "Customers are happy",
            Mood::Mixed => "Mixed feedback",
            Mood::Unhappy => "Customers are unhappy",
        }
    }
}

/// Count per star value; every value 1..=5 is present.
pub fn rating_histogram(submissions: &[Submission]) -> BTreeMap<u8, usize> {
    let mut counts: BTreeMap<u8, usize> = (1..=5).map(|stars| (stars, 0)).collect();
    for s in submissions {
        *counts.entry(s.rating.get()).or_default() += 1;
    }
    counts
}

/// Non-empty age buckets in age order.
pub fn age_groups(submissions: &[Submission]) -> Vec<AgeGroup> {
    let total = submissions.len();
    AgeBucket::ALL
        .iter()
        .filter_map(|&bucket| {
            let count = submissions.iter().filter(|s| AgeBucket::of(s.age) == bucket).count();
            (count > 0).then(|| AgeGroup {
                bucket,
                label: bucket.label(),
                count,
                percentage: percentage(count, total),
            })
        })
        .collect()
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// Mean star rating, 0 with no submissions.
pub fn mean_rating(submissions: &[Submission]) -> f64 {
    if submissions.is_empty() {
        return 0.0;
    }
    let sum: u32 = submissions.iter().map(|s| s.rating.get() as u32).sum();
    sum as f64 / submissions.len() as f64
}

/// Mean age rounded to the nearest year, 0 with no submissions.
pub fn mean_age(submissions: &[Submission]) -> u32 {
    if submissions.is_empty() {
        return 0;
    }
    let sum: u64 = submissions.iter().map(|s| s.age as u64).sum();
    (sum as f64 / submissions.len() as f64).round() as u32
}

/// Dashboard summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub total: usize,
    pub ratings: BTreeMap<u8, usize>,
    pub mean_rating: f64,
    pub mood: Mood,
    pub mood_headline: &'static str,
    pub age_groups: Vec<AgeGroup>,
    pub mean_age: u32,
}

impl Analytics {
    pub fn from_submissions(submissions: &[Submission]) -> Self {
        let mean = mean_rating(submissions);
        let mood = Mood::from_mean(mean);
        Analytics {
            total: submissions.len(),
            ratings: rating_histogram(submissions),
            mean_rating: mean,
            mood,
            mood_headline: mood.headline(),
            age_groups: age_groups(submissions),
            mean_age: mean_age(submissions),
        }
    }
}
