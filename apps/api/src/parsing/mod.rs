//! Structured résumé extraction.
//!
//! Each detector is an independent pure function from flat text to a partial
//! [`StructuredResume`]. [`extract_structured`] runs all of them and merges the
//! fragments. A detector that panics contributes nothing; the run continues.

pub mod certifications;
pub mod contact;
pub mod education;
pub mod experience;
pub mod languages;
pub mod projects;
pub mod sections;
pub mod skills;
pub mod summary;
pub mod text;
pub mod vocabulary;

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::models::resume::StructuredResume;

type Detector = fn(&str) -> StructuredResume;

const DETECTORS: &[(&str, Detector)] = &[
    ("personal_info", contact::detect_personal),
    ("contact_info", contact::detect_contact),
    ("education", education::detect_education),
    ("experience", experience::detect_experience),
    ("skills", skills::detect_skills),
    ("languages_spoken", languages::detect_languages),
    ("certifications", certifications::detect_certifications),
    ("projects", projects::detect_projects),
    ("summary", summary::detect_summary),
];

/// Never fails: unidentified sections stay empty and are logged at debug level.
pub fn extract_structured(text: &str) -> StructuredResume {
    let mut resume = StructuredResume::default();

    for (section, detect) in DETECTORS {
        match panic::catch_unwind(AssertUnwindSafe(|| detect(text))) {
            Ok(fragment) => {
                if fragment == StructuredResume::default() {
                    debug!(section, "No data extracted");
                }
                resume.merge(fragment);
            }
            Err(payload) => {
                warn!(
                    section,
                    reason = %panic_message(payload.as_ref()),
                    "Detector panicked; section left empty"
                );
            }
        }
    }

    resume
}

/// Text of a panic payload raised with a string message.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
