//! Fixed recommendation tables, selected by score band.
//!
//! Bands: `< 30`, `< 60`, `< 80`, `>= 80`. Messages are looked up, never composed.

pub struct BandMessages {
    pub weak: &'static [&'static str],
    pub developing: &'static [&'static str],
    pub solid: &'static [&'static str],
    pub strong: &'static [&'static str],
}

pub const SKILLS: BandMessages = BandMessages {
    weak: &[
        "List the programming languages you have used professionally",
        "Add the frameworks and tools you work with day to day",
        "Include a dedicated technical skills section",
    ],
    developing: &[
        "Broaden your skills section with frameworks and tooling",
        "Mention the databases you have worked with",
    ],
    solid: &["Highlight the skills most relevant to the roles you target"],
    strong: &["Keep your skills list current as your stack evolves"],
};

pub const EXPERIENCE: BandMessages = BandMessages {
    weak: &[
        "Describe each role with its title, company and dates",
        "State how many years you spent in each position",
        "Include internships, freelance work and relevant volunteering",
    ],
    developing: &[
        "Quantify the impact of your work with concrete results",
        "Show progression in responsibility across roles",
    ],
    solid: &["Emphasise leadership and ownership in senior roles"],
    strong: &["Trim older roles so recent achievements stand out"],
};

pub const EDUCATION: BandMessages = BandMessages {
    weak: &[
        "Add your highest completed degree and institution",
        "Consider certifications or courses to strengthen your profile",
    ],
    developing: &[
        "Include graduation years and relevant coursework",
        "Consider pursuing a higher degree or professional certification",
    ],
    solid: &["Mention honours, GPA or a thesis topic where relevant"],
    strong: &["Keep education concise and let experience lead"],
};

pub const NO_SKILLS: &str = "Add your technical skills to the résumé";
pub const NO_EXPERIENCE: &str = "Add your work experience with titles, companies and durations";
pub const NO_EDUCATION: &str = "Add your education history with degrees and institutions";

pub fn for_score(table: &BandMessages, score: f64) -> Vec<String> {
    let messages = if score < 30.0 {
        table.weak
    } else if score < 60.0 {
        table.developing
    } else if score < 80.0 {
        table.solid
    } else {
        table.strong
    };
    messages.iter().map(|m| m.to_string()).collect()
}

/// Order-preserving union: each message appears once, at its first position.
pub fn union<'a>(lists: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for message in lists.into_iter().flatten() {
        if !merged.contains(message) {
            merged.push(message.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(for_score(&SKILLS, 29.9).len(), SKILLS.weak.len());
        assert_eq!(for_score(&SKILLS, 30.0)[0], SKILLS.developing[0]);
        assert_eq!(for_score(&SKILLS, 59.5)[0], SKILLS.developing[0]);
        assert_eq!(for_score(&SKILLS, 60.0)[0], SKILLS.solid[0]);
        assert_eq!(for_score(&SKILLS, 80.0)[0], SKILLS.strong[0]);
        assert_eq!(for_score(&SKILLS, 100.0)[0], SKILLS.strong[0]);
    }

    #[test]
    fn test_union_deduplicates_in_first_seen_order() {
        let a = vec!["x".to_string(), "y".to_string()];
        let b = vec!["y".to_string(), "z".to_string(), "x".to_string()];
        assert_eq!(union([a.as_slice(), b.as_slice()]), vec!["x", "y", "z"]);
    }
}
