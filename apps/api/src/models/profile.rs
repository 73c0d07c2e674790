use serde::{Deserialize, Serialize};

/// What the user wants to do abroad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    Study,
    Work,
    #[default]
    Both,
    Business,
    Family,
    Asylum,
    /// A value outside the wizard's list, passed through to the prompt as sent.
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "High School")]
    HighSchool,
    #[default]
    Bachelor,
    Master,
    PhD,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetRange {
    Low,
    #[default]
    Medium,
    High,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "ASAP")]
    Asap,
    #[default]
    #[serde(rename = "6 months")]
    SixMonths,
    #[serde(rename = "1 year+")]
    OneYearPlus,
    #[serde(untagged)]
    Other(String),
}

/// Which supporting documents the user already has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentChecklist {
    pub passport: bool,
    pub bank_statement: bool,
    pub language_test: bool,
    pub degree: bool,
    pub cv: bool,
}

/// Self-reported profile assembled by the wizard.
///
/// Nothing here is validated beyond JSON parsing; missing fields take the
/// wizard's starting values. Numeric answers (age, years of experience, GPA)
/// stay as the strings the form produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub nationality: String,
    pub residence: String,
    pub age: String,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,

    pub goal: Goal,

    pub education_level: EducationLevel,
    pub field_of_study: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificates: Option<String>,

    pub years_of_experience: String,
    pub job_title: String,
    pub skills: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,

    pub target_countries: Vec<String>,
    pub budget: BudgetRange,
    pub timeframe: Timeframe,
    pub willing_to_learn_language: bool,

    pub documents: DocumentChecklist,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            nationality: String::new(),
            residence: String::new(),
            age: String::new(),
            languages: Vec::new(),
            marital_status: None,
            goal: Goal::default(),
            education_level: EducationLevel::default(),
            field_of_study: String::new(),
            gpa: None,
            certificates: None,
            years_of_experience: String::new(),
            job_title: String::new(),
            skills: String::new(),
            portfolio: None,
            target_countries: Vec::new(),
            budget: BudgetRange::default(),
            timeframe: Timeframe::default(),
            willing_to_learn_language: true,
            documents: DocumentChecklist::default(),
        }
    }
}
