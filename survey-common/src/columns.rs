//! Column contract of the survey response table
//!
//! Snapshots with rows are validated against [`EXPECTED_COLUMNS`] when they
//! are fetched, so the pipeline never discovers a missing column mid-render.

pub const UNIVERSITY: &str = "university";
/// Free text; counted after normalization
pub const COURSE: &str = "course";
/// Comma-separated list
pub const COMMUNITY_READING_ACCESS: &str = "community_reading_access";
/// Comma-separated list
pub const EQUIPMENT_USED: &str = "equipment_used";
pub const COMMUNITY_INTERNET_QUALITY: &str = "community_internet_quality";
pub const UNIVERSITY_TECH_RATING: &str = "university_tech_rating";
/// Ordered frequency scale
pub const GENERAL_ACCESS_FREQUENCY: &str = "general_access_frequency";
/// Ordered frequency scale
pub const LONG_TEXT_READING_FREQUENCY: &str = "long_text_reading_frequency";
/// Optional free text
pub const LONG_TEXT_JUSTIFICATION: &str = "long_text_justification";
/// Optional free text
pub const BEFORE_AFTER_EXPERIENCE: &str = "before_after_experience";
/// Group key
pub const HOME_COMMUNITY: &str = "home_community";

pub const EXPECTED_COLUMNS: [&str; 11] = [
    UNIVERSITY,
    COURSE,
    COMMUNITY_READING_ACCESS,
    EQUIPMENT_USED,
    COMMUNITY_INTERNET_QUALITY,
    UNIVERSITY_TECH_RATING,
    GENERAL_ACCESS_FREQUENCY,
    LONG_TEXT_READING_FREQUENCY,
    LONG_TEXT_JUSTIFICATION,
    BEFORE_AFTER_EXPERIENCE,
    HOME_COMMUNITY,
];

/// Columns holding free-text answers shown verbatim
pub const FREE_TEXT_COLUMNS: [&str; 2] = [LONG_TEXT_JUSTIFICATION, BEFORE_AFTER_EXPERIENCE];
