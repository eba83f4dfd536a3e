//! Synthetic stand-in for the accelerator export with the same headline
//! figures: 590 rows, the reference status split, yearly counts and a
//! 231-row business model completion.

use chrono::{NaiveDate, NaiveDateTime};

use crate::dataset::Dataset;
use crate::models::{Status, Submission};

pub const REFERENCE_TOTAL: usize = 590;

const STATUS_SPLIT: [(Status, usize); 7] = [
    (Status::Rejected, 334),
    (Status::Alumni, 111),
    (Status::Pending, 104),
    (Status::Approved, 21),
    (Status::BlueBox, 11),
    (Status::RedBox, 8),
    (Status::GoldBox, 1),
];

const YEAR_SPLIT: [(i32, usize); 5] = [(2021, 109), (2022, 157), (2023, 144), (2024, 160), (2025, 20)];

const BUSINESS_MODELS: usize = 231;

fn pick<K: Copy>(split: &[(K, usize)], index: usize) -> K {
    let mut upper = 0;
    for (key, count) in split {
        upper += count;
        if index < upper {
            return *key;
        }
    }
    split[split.len() - 1].0
}

fn created_at(index: usize) -> NaiveDateTime {
    let year = pick(&YEAR_SPLIT, index);
    let month = (index % 12) as u32 + 1;
    let day = (index % 28) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("fixture dates are valid")
}

pub fn submission(id: &str, status: Status, created_at: NaiveDateTime) -> Submission {
    Submission {
        id: id.to_string(),
        created_at,
        status,
        idea_type: None,
        business_model: None,
        problem_description: None,
        value_proposition: None,
    }
}

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid fixture date")
}

pub fn reference_submissions() -> Vec<Submission> {
    (0..REFERENCE_TOTAL)
        .map(|index| Submission {
            id: (1000 + index).to_string(),
            created_at: created_at(index),
            status: pick(&STATUS_SPLIT, index),
            idea_type: Some(if index % 4 == 3 { "PROJECT" } else { "IDEA" }.to_string()),
            business_model: (index < BUSINESS_MODELS).then(|| format!("Model {index}")),
            problem_description: (index % 2 == 0).then(|| format!("Problem {index}")),
            value_proposition: (index % 3 == 0).then(|| format!("Value {index}")),
        })
        .collect()
}

pub fn reference_dataset() -> Dataset {
    Dataset::new(reference_submissions(), true)
}

/// CSV form of [`reference_dataset`]; absent text alternates between empty
/// and whitespace-only cells.
pub fn reference_csv() -> String {
    let mut text = String::from(
        "id,title,status,type,createdDate,meta.tagline,meta.businessmodeldescription,meta.problemdescription,meta.valuepropdescription\n",
    );
    for (index, submission) in reference_submissions().iter().enumerate() {
        let blank = if index % 2 == 0 { "" } else { "   " };
        let text_or_blank = |value: &Option<String>| value.clone().unwrap_or_else(|| blank.to_string());
        text.push_str(&format!(
            "{},Idea {},{},{},{},tagline {},{},{},{}\n",
            submission.id,
            index,
            submission.status.code(),
            text_or_blank(&submission.idea_type),
            submission.created_at.and_utc().timestamp_millis(),
            index,
            text_or_blank(&submission.business_model),
            text_or_blank(&submission.problem_description),
            text_or_blank(&submission.value_proposition),
        ));
    }
    text
}
