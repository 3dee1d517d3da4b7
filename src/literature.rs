//! Literature (bibliography) entries.
//!
//! Defines the stored `Literature` record, the `LiteratureDraft` bound from
//! forms and CLI flags, tag parsing, and the two sample references used when
//! neither the store nor the bootstrap file has data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoltaError};
use crate::fields::{LiteratureStatus, Priority};

/// A bibliography entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Literature {
    pub id: u64,
    pub title: String,
    /// Semicolon-delimited author list, e.g. `"Zhang, L.; Wang, H."`.
    pub authors: String,
    pub year: i32,
    pub journal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub status: LiteratureStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub saved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_date: NaiveDate,
}

impl Literature {
    /// Individual authors, trimmed.
    pub fn author_list(&self) -> Vec<&str> {
        self.authors.split(';').map(str::trim).filter(|a| !a.is_empty()).collect()
    }
}

/// Typed form values for creating or editing a literature entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiteratureDraft {
    pub title: String,
    pub authors: String,
    pub year: i32,
    pub journal: String,
    pub volume: String,
    pub pages: String,
    pub abstract_text: String,
    pub tags: Vec<String>,
    pub status: LiteratureStatus,
    pub priority: Priority,
    pub doi: String,
    pub url: String,
    pub notes: String,
}

impl LiteratureDraft {
    /// Defaults of a fresh add form: current year, reviewed, medium priority.
    pub fn new(year: i32) -> Self {
        LiteratureDraft {
            year,
            status: LiteratureStatus::Reviewed,
            priority: Priority::Medium,
            ..Default::default()
        }
    }

    pub fn from_literature(item: &Literature) -> Self {
        LiteratureDraft {
            title: item.title.clone(),
            authors: item.authors.clone(),
            year: item.year,
            journal: item.journal.clone(),
            volume: item.volume.clone().unwrap_or_default(),
            pages: item.pages.clone().unwrap_or_default(),
            abstract_text: item.abstract_text.clone(),
            tags: item.tags.clone(),
            status: item.status,
            priority: item.priority,
            doi: item.doi.clone().unwrap_or_default(),
            url: item.url.clone().unwrap_or_default(),
            notes: item.notes.clone().unwrap_or_default(),
        }
    }

    /// Trim every field and enforce the required set:
    /// title, authors, journal, abstract and at least one tag.
    pub fn validate(mut self) -> Result<Self> {
        for field in [
            &mut self.title,
            &mut self.authors,
            &mut self.journal,
            &mut self.volume,
            &mut self.pages,
            &mut self.abstract_text,
            &mut self.doi,
            &mut self.url,
            &mut self.notes,
        ] {
            *field = field.trim().to_string();
        }
        self.tags = self.tags.iter().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect();

        if self.title.is_empty()
            || self.authors.is_empty()
            || self.journal.is_empty()
            || self.abstract_text.is_empty()
            || self.tags.is_empty()
        {
            return Err(VoltaError::required_fields());
        }
        Ok(self)
    }
}

/// Split comma-separated tag inputs, trimming and dropping empties.
/// Order is preserved; the first spelling of a duplicate wins.
pub fn split_tags(inputs: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for raw in inputs {
        for part in raw.split(',') {
            let tag = part.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}

/// Convert an empty string into `None`.
pub fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Fallback records when neither the store nor the bootstrap file has data.
pub fn sample_literature() -> Vec<Literature> {
    vec![
        Literature {
            id: 1,
            title: "Advanced Electrochemical Energy Storage Technologies: A Comprehensive Review".into(),
            authors: "Zhang, L.; Wang, H.; Chen, X.; Liu, Y.; Patel, R.".into(),
            year: 2024,
            journal: "Nature Energy".into(),
            volume: Some("9".into()),
            pages: Some("123-145".into()),
            abstract_text: "This comprehensive review covers recent advancements in electrochemical energy storage systems, focusing on next-generation battery technologies and supercapacitors. The paper discusses material innovations, performance metrics, and future challenges in the field, providing insights into sustainable energy solutions for the coming decades.".into(),
            tags: vec![
                "electrochemistry".into(),
                "battery".into(),
                "energy storage".into(),
                "review".into(),
                "sustainability".into(),
            ],
            doi: Some("10.1038/s41560-024-01455-2".into()),
            url: Some("https://doi.org/10.1038/s41560-024-01455-2".into()),
            status: LiteratureStatus::Reviewed,
            priority: Priority::High,
            saved: true,
            notes: Some("Excellent review of current technologies. Need to follow up on solid-state battery section.".into()),
            added_date: date(2024, 1, 15),
        },
        Literature {
            id: 2,
            title: "Solid-State Batteries: Materials Engineering and Interface Design".into(),
            authors: "Miller, J.; Thompson, R.; Davis, K.; Rodriguez, A.; Tanaka, S.".into(),
            year: 2023,
            journal: "Science Advances".into(),
            volume: Some("9".into()),
            pages: Some("eabg3156".into()),
            abstract_text: "This research investigates the materials science behind solid-state batteries, with emphasis on interface engineering between solid electrolytes and electrodes. The study presents novel characterization techniques for interface analysis and proposes solutions for overcoming current limitations in solid-state battery technology through advanced material design.".into(),
            tags: vec![
                "battery".into(),
                "materials".into(),
                "solid-state".into(),
                "interface".into(),
                "engineering".into(),
            ],
            doi: Some("10.1126/sciadv.adh3156".into()),
            url: Some("https://doi.org/10.1126/sciadv.adh3156".into()),
            status: LiteratureStatus::Cited,
            priority: Priority::High,
            saved: true,
            notes: Some("Key paper for understanding interface challenges in solid-state batteries.".into()),
            added_date: date(2023, 11, 20),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> LiteratureDraft {
        LiteratureDraft {
            title: " Sodium-ion cathodes ".into(),
            authors: "Kim, S.; Lee, J.".into(),
            journal: "Joule".into(),
            abstract_text: "Layered oxide cathodes.".into(),
            tags: vec!["battery".into(), "  ".into()],
            ..LiteratureDraft::new(2025)
        }
    }

    #[test]
    fn test_validate_trims_and_drops_empty_tags() {
        let draft = complete_draft().validate().unwrap();
        assert_eq!(draft.title, "Sodium-ion cathodes");
        assert_eq!(draft.tags, vec!["battery".to_string()]);
    }

    #[test]
    fn test_validate_requires_tags_and_abstract() {
        let mut draft = complete_draft();
        draft.tags.clear();
        assert!(matches!(draft.validate(), Err(VoltaError::Validation(_))));

        let mut draft = complete_draft();
        draft.abstract_text = "   ".into();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_split_tags() {
        let tags = split_tags(&["battery, Energy Storage".into(), "battery,,review".into()]);
        assert_eq!(tags, vec!["battery", "Energy Storage", "review"]);
    }

    #[test]
    fn test_absent_optional_fields_are_omitted_from_json() {
        let mut item = sample_literature().remove(0);
        item.volume = None;
        item.notes = None;
        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("volume").is_none());
        assert!(value.get("notes").is_none());
        assert_eq!(value["abstract"], item.abstract_text);
        assert_eq!(value["addedDate"], "2024-01-15");
    }

    #[test]
    fn test_author_list() {
        let item = &sample_literature()[1];
        assert_eq!(item.author_list().len(), 5);
        assert_eq!(item.author_list()[0], "Miller, J.");
    }
}
