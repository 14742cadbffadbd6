use serde::Deserialize;
use std::fmt;

pub const TITLE: &str = "Title";
pub const RELEASE_DATE: &str = "Release Date";
pub const DEVELOPER: &str = "Developer";
pub const PUBLISHER: &str = "Publisher";
pub const GENRES: &str = "Genres";
pub const PRODUCT_RATING: &str = "Product Rating";
pub const USER_SCORE: &str = "User Score";
pub const USER_RATINGS_COUNT: &str = "User Ratings Count";
pub const PLATFORMS_INFO: &str = "Platforms Info";

pub const GENRE: &str = "Genre";
pub const AGE_RATING: &str = "Age Rating";
pub const PLATFORM: &str = "Platform";

/// Columns every raw dataset must carry before cleaning starts.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    TITLE,
    RELEASE_DATE,
    DEVELOPER,
    PUBLISHER,
    GENRES,
    PRODUCT_RATING,
    USER_SCORE,
    USER_RATINGS_COUNT,
    PLATFORMS_INFO,
];

/// Columns that only feed derived fields and are removed once cleaning is done.
pub const DERIVED_ONLY_COLUMNS: [&str; 3] = [USER_SCORE, USER_RATINGS_COUNT, PLATFORMS_INFO];

/// Column layout of a cleaned record, in export order.
pub const CLEANED_COLUMNS: [&str; 7] = [
    TITLE,
    RELEASE_DATE,
    DEVELOPER,
    PUBLISHER,
    GENRE,
    AGE_RATING,
    PLATFORM,
];

/// Closed set of age ratings kept after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeRating {
    Teen,
    Everyone,
    Mature,
    EveryoneTenPlus,
    RatePending,
    AdultsOnly,
}

impl AgeRating {
    pub const ALL: [AgeRating; 6] = [
        AgeRating::Teen,
        AgeRating::Everyone,
        AgeRating::Mature,
        AgeRating::EveryoneTenPlus,
        AgeRating::RatePending,
        AgeRating::AdultsOnly,
    ];

    /// The label as published by the rating board in the raw dataset.
    pub fn raw_label(&self) -> &'static str {
        match self {
            AgeRating::Teen => "Rated T For Teen",
            AgeRating::Everyone => "Rated E For Everyone",
            AgeRating::Mature => "Rated M For Mature",
            AgeRating::EveryoneTenPlus => "Rated E +10 For Everyone +10",
            AgeRating::RatePending => "Rated RP For Rate Pending",
            AgeRating::AdultsOnly => "Rated AO For Adults Only",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeRating::Teen => "Teen",
            AgeRating::Everyone => "Everyone",
            AgeRating::Mature => "Mature",
            AgeRating::EveryoneTenPlus => "Everyone +10",
            AgeRating::RatePending => "Rate Pending",
            AgeRating::AdultsOnly => "Adults Only",
        }
    }

    /// Maps a raw or already-normalized label onto the closed set.
    /// Anything else is treated as missing.
    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|rating| rating.raw_label() == value || rating.label() == value)
    }
}

impl fmt::Display for AgeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One element of the serialized `Platforms Info` list. Other keys
/// (metascores and their counts) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformDetail {
    #[serde(rename = "Platform")]
    pub platform: String,
}

/// Categorical dimensions the aggregator reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    ReleaseDate,
    Developer,
    Publisher,
    Genre,
    AgeRating,
    Platform,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::ReleaseDate,
        Dimension::Developer,
        Dimension::Publisher,
        Dimension::Genre,
        Dimension::AgeRating,
        Dimension::Platform,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Dimension::ReleaseDate => RELEASE_DATE,
            Dimension::Developer => DEVELOPER,
            Dimension::Publisher => PUBLISHER,
            Dimension::Genre => GENRE,
            Dimension::AgeRating => AGE_RATING,
            Dimension::Platform => PLATFORM,
        }
    }

    /// Lower-case label used in report sentences.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::ReleaseDate => "release date",
            Dimension::Developer => "developer",
            Dimension::Publisher => "publisher",
            Dimension::Genre => "genre",
            Dimension::AgeRating => "age rating",
            Dimension::Platform => "platform",
        }
    }

    /// Suffix of the chart artifact for this dimension, if it has one of its own.
    pub fn chart_suffix(&self) -> Option<&'static str> {
        match self {
            Dimension::ReleaseDate => None,
            Dimension::Developer => Some("developer"),
            Dimension::Publisher => Some("publisher"),
            Dimension::Genre => Some("genre"),
            Dimension::AgeRating => Some("age_rating"),
            Dimension::Platform => Some("platform"),
        }
    }
}
