//! Dashboard composition: pipeline results → sections of panels
//!
//! Layout follows the survey questionnaire: participant profile, reading
//! access and equipment, internet and ratings, reading frequency, home
//! communities, descriptive answers.

pub mod chart;

use chrono::{DateTime, Utc};
use serde::Serialize;
use survey_common::columns::{
    BEFORE_AFTER_EXPERIENCE, COMMUNITY_INTERNET_QUALITY, COMMUNITY_READING_ACCESS, COURSE,
    EQUIPMENT_USED, GENERAL_ACCESS_FREQUENCY, HOME_COMMUNITY, LONG_TEXT_JUSTIFICATION,
    LONG_TEXT_READING_FREQUENCY, UNIVERSITY, UNIVERSITY_TECH_RATING,
};
use survey_common::config::DashboardConfig;
use survey_common::pipeline::{
    collect_free_text, count_categorical, count_multi_value_tags, count_normalized_categorical,
    sort_descending_by_count, summarize_by_group, to_ordered_frequency_series,
    OrderedFrequencySeries, UnmatchedLabelPolicy,
};
use survey_common::{Result, Snapshot};

pub use chart::{ChartKind, ChartPoint, ChartSpec, Palette};

/// Shown when the store could not be reached or queried
pub const UNAVAILABLE_WARNING: &str =
    "Could not load survey responses. Check the database configuration and connection.";

/// Shown when the query returned zero rows
pub const EMPTY_WARNING: &str = "No survey responses found in the database.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardStatus {
    Ready,
    Empty,
    Unavailable,
}

/// One numbered free-text answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedAnswer {
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelBody {
    Chart(ChartSpec),
    Statistic { label: String, value: String },
    FreeText { answers: Vec<NumberedAnswer> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub id: &'static str,
    pub heading: String,
    pub body: PanelBody,
    /// Caveat shown under the panel body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Panel {
    fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub panels: Vec<Panel>,
}

/// Everything the page needs for one render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub status: DashboardStatus,
    pub warning: Option<String>,
    pub total_responses: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    pub sections: Vec<Section>,
}

impl DashboardReport {
    /// Store failure: one warning, no data
    pub fn unavailable() -> Self {
        Self {
            status: DashboardStatus::Unavailable,
            warning: Some(UNAVAILABLE_WARNING.to_string()),
            total_responses: 0,
            fetched_at: None,
            sections: Vec::new(),
        }
    }

    fn empty(snapshot: &Snapshot) -> Self {
        Self {
            status: DashboardStatus::Empty,
            warning: Some(EMPTY_WARNING.to_string()),
            total_responses: 0,
            fetched_at: Some(snapshot.fetched_at()),
            sections: Vec::new(),
        }
    }
}

/// Number free-text answers from 1
pub fn number_answers(answers: Vec<String>) -> Vec<NumberedAnswer> {
    answers
        .into_iter()
        .enumerate()
        .map(|(i, text)| NumberedAnswer { number: i + 1, text })
        .collect()
}

fn panel(id: &'static str, heading: &str, body: PanelBody) -> Panel {
    Panel {
        id,
        heading: heading.to_string(),
        body,
        note: None,
    }
}

fn section(title: &str, panels: Vec<Panel>) -> Section {
    Section {
        title: title.to_string(),
        panels,
    }
}

/// Run every analysis over `snapshot` and lay the results out
pub fn build_dashboard(snapshot: &Snapshot, settings: &DashboardConfig) -> Result<DashboardReport> {
    if snapshot.is_empty() {
        return Ok(DashboardReport::empty(snapshot));
    }

    let sections = vec![
        participant_profile(snapshot)?,
        reading_access(snapshot, settings)?,
        internet_and_ratings(snapshot)?,
        reading_frequency(snapshot, settings)?,
        home_communities(snapshot)?,
        descriptive_answers(snapshot)?,
    ];

    Ok(DashboardReport {
        status: DashboardStatus::Ready,
        warning: None,
        total_responses: snapshot.row_count(),
        fetched_at: Some(snapshot.fetched_at()),
        sections,
    })
}

fn participant_profile(snapshot: &Snapshot) -> Result<Section> {
    let universities = sort_descending_by_count(&count_categorical(snapshot, UNIVERSITY)?);
    let courses = sort_descending_by_count(&count_normalized_categorical(snapshot, COURSE)?);

    Ok(section(
        "Participant Profile",
        vec![
            panel(
                UNIVERSITY,
                "Distribution by University",
                PanelBody::Chart(
                    ChartSpec::from_series(
                        "Responses by University",
                        ChartKind::Bar,
                        Palette::Primary,
                        universities,
                    )
                    .with_axes("University", "Responses"),
                ),
            ),
            panel(
                COURSE,
                "Distribution by Course",
                PanelBody::Chart(
                    ChartSpec::from_series(
                        "Responses by Course",
                        ChartKind::Pie,
                        Palette::Qualitative,
                        courses,
                    )
                    .with_axes("Course", "Responses"),
                ),
            ),
        ],
    ))
}

fn reading_access(snapshot: &Snapshot, settings: &DashboardConfig) -> Result<Section> {
    let delimiter = settings.tag_delimiter.as_str();
    let access = sort_descending_by_count(&count_multi_value_tags(
        snapshot,
        COMMUNITY_READING_ACCESS,
        delimiter,
    )?);
    let equipment =
        sort_descending_by_count(&count_multi_value_tags(snapshot, EQUIPMENT_USED, delimiter)?);

    Ok(section(
        "Reading Access and Equipment",
        vec![
            panel(
                COMMUNITY_READING_ACCESS,
                "Ways of Accessing Reading in the Community",
                PanelBody::Chart(
                    ChartSpec::from_series(
                        "How books and reading were accessed in the community",
                        ChartKind::Bar,
                        Palette::Primary,
                        access,
                    )
                    .with_axes("Form of access", "Responses"),
                ),
            ),
            panel(
                EQUIPMENT_USED,
                "Equipment Used Before University",
                PanelBody::Chart(
                    ChartSpec::from_series(
                        "Equipment used to access reading",
                        ChartKind::Bar,
                        Palette::Primary,
                        equipment,
                    )
                    .with_axes("Equipment", "Responses"),
                ),
            ),
        ],
    ))
}

fn internet_and_ratings(snapshot: &Snapshot) -> Result<Section> {
    let internet =
        sort_descending_by_count(&count_categorical(snapshot, COMMUNITY_INTERNET_QUALITY)?);
    let tech = sort_descending_by_count(&count_categorical(snapshot, UNIVERSITY_TECH_RATING)?);

    Ok(section(
        "Internet Access and Ratings",
        vec![
            panel(
                COMMUNITY_INTERNET_QUALITY,
                "Quality of Internet Access in the Community",
                PanelBody::Chart(
                    ChartSpec::from_series(
                        "What internet access is like in the community",
                        ChartKind::Funnel,
                        Palette::Primary,
                        internet,
                    )
                    .with_axes("Rating", "Responses"),
                ),
            ),
            panel(
                UNIVERSITY_TECH_RATING,
                "Rating of Technology Resources at the University",
                PanelBody::Chart(
                    ChartSpec::from_series(
                        "Rating of technology resources at the university",
                        ChartKind::HorizontalBar,
                        Palette::Primary,
                        tech,
                    )
                    .with_axes("Rating", "Responses"),
                ),
            ),
        ],
    ))
}

/// Answers left off a frequency chart, listed so they stay visible
pub fn dropped_answers_note(
    series: &OrderedFrequencySeries,
    policy: &UnmatchedLabelPolicy,
) -> Option<String> {
    if series.unmatched.is_empty() || !matches!(policy, UnmatchedLabelPolicy::Drop) {
        return None;
    }
    let total: u64 = series.unmatched.iter().map(|(_, count)| count).sum();
    let labels: Vec<String> = series
        .unmatched
        .iter()
        .map(|(label, count)| format!("\"{}\" ({})", label, count))
        .collect();
    Some(format!(
        "{} answer(s) outside the frequency scale are not charted: {}",
        total,
        labels.join(", ")
    ))
}

fn reading_frequency(snapshot: &Snapshot, settings: &DashboardConfig) -> Result<Section> {
    let vocabulary = &settings.frequency_vocabulary;
    let policy = &settings.unmatched_labels;

    let general = to_ordered_frequency_series(
        &count_categorical(snapshot, GENERAL_ACCESS_FREQUENCY)?,
        vocabulary,
        policy,
    )?;
    let long_text = to_ordered_frequency_series(
        &count_categorical(snapshot, LONG_TEXT_READING_FREQUENCY)?,
        vocabulary,
        policy,
    )?;

    Ok(section(
        "Reading Practice Frequency",
        vec![
            panel(
                GENERAL_ACCESS_FREQUENCY,
                "Frequency of Access to Books and Reading (After University)",
                PanelBody::Chart(
                    ChartSpec::from_series(
                        "Overall frequency of access to books and reading",
                        ChartKind::Bar,
                        Palette::Primary,
                        general.points.clone(),
                    )
                    .with_axes("Frequency", "Responses"),
                ),
            )
            .with_note(dropped_answers_note(&general, policy)),
            panel(
                LONG_TEXT_READING_FREQUENCY,
                "Frequency of Reading Long Texts (20+ Pages)",
                PanelBody::Chart(
                    ChartSpec::from_series(
                        "Frequency of reading long texts",
                        ChartKind::Bar,
                        Palette::Qualitative,
                        long_text.points.clone(),
                    )
                    .with_axes("Frequency", "Responses")
                    .without_values(),
                ),
            )
            .with_note(dropped_answers_note(&long_text, policy)),
        ],
    ))
}

fn home_communities(snapshot: &Snapshot) -> Result<Section> {
    let summary = summarize_by_group(snapshot, HOME_COMMUNITY)?;
    let mean = summary.mean_display();
    let groups = sort_descending_by_count(&summary.counts);

    Ok(section(
        "Home Communities",
        vec![
            panel(
                HOME_COMMUNITY,
                "Responses by Home Community",
                PanelBody::Chart(
                    ChartSpec::from_series(
                        "Responses by home community",
                        ChartKind::Bar,
                        Palette::Qualitative,
                        groups,
                    )
                    .with_axes("Community", "Responses"),
                ),
            ),
            panel(
                "home_community_mean",
                "Average Responses per Community",
                PanelBody::Statistic {
                    label: "Average responses per community".to_string(),
                    value: mean,
                },
            ),
        ],
    ))
}

fn descriptive_answers(snapshot: &Snapshot) -> Result<Section> {
    let justifications = collect_free_text(snapshot, LONG_TEXT_JUSTIFICATION)?;
    let experiences = collect_free_text(snapshot, BEFORE_AFTER_EXPERIENCE)?;

    Ok(section(
        "Descriptive Answers",
        vec![
            panel(
                LONG_TEXT_JUSTIFICATION,
                "Justifications About Reading Long Texts",
                PanelBody::FreeText {
                    answers: number_answers(justifications),
                },
            ),
            panel(
                BEFORE_AFTER_EXPERIENCE,
                "Experiences Before and After University",
                PanelBody::FreeText {
                    answers: number_answers(experiences),
                },
            ),
        ],
    ))
}

/// Heading for a free-text column, `None` for any other column
pub fn free_text_heading(column: &str) -> Option<&'static str> {
    match column {
        LONG_TEXT_JUSTIFICATION => Some("Justifications About Reading Long Texts"),
        BEFORE_AFTER_EXPERIENCE => Some("Experiences Before and After University"),
        _ => None,
    }
}
