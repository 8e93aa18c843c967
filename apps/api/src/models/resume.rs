use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Normalized, sectioned view of a résumé. Every collection defaults to empty,
/// so scorers never need to tell "missing" apart from "empty".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredResume {
    pub personal_info: PersonalInfo,
    pub contact_info: ContactInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: SkillSet,
    pub languages_spoken: Vec<SpokenLanguage>,
    pub certifications: Vec<Certification>,
    pub projects: Vec<ProjectEntry>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: Option<String>,
    pub year: Option<String>,
    pub gpa: Option<String>,
}

/// Best-effort work history entry. Unresolved fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

/// Skill buckets. A vocabulary term may land in more than one bucket
/// (`technical` is the broad bucket, the others are specialisations).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSet {
    pub technical: BTreeSet<String>,
    pub soft: BTreeSet<String>,
    pub tools: BTreeSet<String>,
    pub frameworks: BTreeSet<String>,
    pub databases: BTreeSet<String>,
    pub languages: BTreeSet<String>,
}

impl SkillSet {
    pub fn extend(&mut self, other: SkillSet) {
        self.technical.extend(other.technical);
        self.soft.extend(other.soft);
        self.tools.extend(other.tools);
        self.frameworks.extend(other.frameworks);
        self.databases.extend(other.databases);
        self.languages.extend(other.languages);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub language: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

impl StructuredResume {
    /// Folds a detector's partial result into this one. Scalar fields keep the
    /// first non-empty value seen; collections are appended.
    pub fn merge(&mut self, fragment: StructuredResume) {
        let StructuredResume {
            personal_info,
            contact_info,
            education,
            experience,
            skills,
            languages_spoken,
            certifications,
            projects,
            summary,
        } = fragment;

        merge_opt(&mut self.personal_info.full_name, personal_info.full_name);
        merge_opt(&mut self.personal_info.date_of_birth, personal_info.date_of_birth);
        merge_opt(&mut self.personal_info.nationality, personal_info.nationality);
        merge_opt(&mut self.personal_info.location, personal_info.location);

        merge_opt(&mut self.contact_info.email, contact_info.email);
        merge_opt(&mut self.contact_info.phone, contact_info.phone);
        merge_opt(&mut self.contact_info.address, contact_info.address);
        merge_opt(&mut self.contact_info.linkedin, contact_info.linkedin);
        merge_opt(&mut self.contact_info.website, contact_info.website);

        self.education.extend(education);
        self.experience.extend(experience);
        self.skills.extend(skills);
        self.languages_spoken.extend(languages_spoken);
        self.certifications.extend(certifications);
        self.projects.extend(projects);

        if self.summary.is_empty() {
            self.summary = summary;
        }
    }
}

fn merge_opt(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}
