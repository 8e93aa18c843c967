//! Read-only vocabulary tables shared by every analysis run.
//!
//! Terms are written in their canonical spelling; matching is case-insensitive.
//! A term may appear in several tables (e.g. `Python` is both a technical skill and
//! a programming language).

/// Broad technical vocabulary: languages, frameworks, runtimes and platforms.
pub const TECHNICAL_SKILLS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C++",
    "C#",
    "Rust",
    "Golang",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
    "Scala",
    "Perl",
    "HTML",
    "CSS",
    "SQL",
    "React",
    "Angular",
    "Vue.js",
    "Node.js",
    "Express.js",
    "Django",
    "Flask",
    "Spring Boot",
    "Ruby on Rails",
    "Laravel",
    ".NET",
    "GraphQL",
    "REST",
    "Machine Learning",
    "Deep Learning",
    "Data Analysis",
    "TensorFlow",
    "PyTorch",
    "Microservices",
    "DevOps",
    "Linux",
];

pub const PROGRAMMING_LANGUAGES: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C++",
    "C#",
    "Rust",
    "Golang",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
    "Scala",
    "Perl",
];

pub const FRAMEWORKS: &[&str] = &[
    "React",
    "Angular",
    "Vue.js",
    "Node.js",
    "Express.js",
    "Django",
    "Flask",
    "Spring Boot",
    "Ruby on Rails",
    "Laravel",
    ".NET",
    "TensorFlow",
    "PyTorch",
    "Bootstrap",
    "Tailwind",
    "jQuery",
];

pub const TOOLS: &[&str] = &[
    "Git",
    "GitHub",
    "GitLab",
    "Docker",
    "Kubernetes",
    "Jenkins",
    "Terraform",
    "Ansible",
    "AWS",
    "Azure",
    "Google Cloud",
    "Jira",
    "Confluence",
    "Webpack",
    "Figma",
    "Postman",
    "Tableau",
    "Excel",
];

pub const DATABASES: &[&str] = &[
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "SQLite",
    "Oracle",
    "SQL Server",
    "Cassandra",
    "Elasticsearch",
    "DynamoDB",
    "MariaDB",
    "Firebase",
];

pub const SOFT_SKILLS: &[&str] = &[
    "Communication",
    "Leadership",
    "Teamwork",
    "Problem Solving",
    "Critical Thinking",
    "Time Management",
    "Adaptability",
    "Creativity",
    "Collaboration",
    "Mentoring",
    "Negotiation",
    "Project Management",
];

pub const SPOKEN_LANGUAGES: &[&str] = &[
    "English",
    "Spanish",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Dutch",
    "Russian",
    "Arabic",
    "Mandarin",
    "Chinese",
    "Japanese",
    "Korean",
    "Hindi",
    "Turkish",
    "Polish",
    "Swedish",
    "Greek",
    "Hebrew",
    "Vietnamese",
];

/// Proficiency words, strongest first so the first hit on a line wins.
pub const PROFICIENCY_LEVELS: &[&str] = &[
    "Native",
    "Bilingual",
    "Fluent",
    "Proficient",
    "Advanced",
    "Professional",
    "Upper Intermediate",
    "Intermediate",
    "Conversational",
    "Elementary",
    "Basic",
    "Beginner",
    "C2",
    "C1",
    "B2",
    "B1",
    "A2",
    "A1",
];

/// Certification keyword → issuing body (empty when the keyword names no vendor).
pub const CERTIFICATION_KEYWORDS: &[(&str, &str)] = &[
    ("AWS Certified", "Amazon Web Services"),
    ("Microsoft Certified", "Microsoft"),
    ("Google Cloud Certified", "Google"),
    ("Oracle Certified", "Oracle"),
    ("Cisco Certified", "Cisco"),
    ("CCNA", "Cisco"),
    ("CCNP", "Cisco"),
    ("CompTIA", "CompTIA"),
    ("PMP", "Project Management Institute"),
    ("CISSP", "ISC2"),
    ("ITIL", "Axelos"),
    ("Scrum Master", "Scrum Alliance"),
    ("CKA", "Cloud Native Computing Foundation"),
    ("Certified", ""),
    ("Certification", ""),
    ("Certificate", ""),
];

/// Section header synonyms introducing a free-text summary.
pub const SUMMARY_HEADERS: &[&str] = &[
    "summary",
    "professional summary",
    "career summary",
    "objective",
    "career objective",
    "profile",
    "professional profile",
    "overview",
    "about",
    "about me",
];

/// Returns whether `term` occurs in `haystack_lower` (already lowercased) on term
/// boundaries: the characters around the match may not extend a word, so `Java`
/// is not found inside `JavaScript` and `SQL` is not found inside `PostgreSQL`.
pub fn contains_term(haystack_lower: &str, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return false;
    }
    haystack_lower
        .match_indices(&needle)
        .any(|(start, _)| is_bounded(haystack_lower, start, start + needle.len(), &needle))
}

fn is_bounded(haystack: &str, start: usize, end: usize, needle: &str) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[end..].chars().next();

    let starts_with_word = needle.chars().next().is_some_and(is_word_char);
    let ends_with_word = needle.chars().next_back().is_some_and(is_word_char);

    let left_ok = !starts_with_word || !before.is_some_and(is_word_char);
    let right_ok = !ends_with_word || !after.is_some_and(extends_term);
    left_ok && right_ok
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// `C` followed by `++` or `#` is a different term.
fn extends_term(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}

/// Canonical terms from `table` found in `haystack_lower`.
pub fn find_terms<'a>(haystack_lower: &str, table: &[&'a str]) -> Vec<&'a str> {
    table
        .iter()
        .copied()
        .filter(|term| contains_term(haystack_lower, term))
        .collect()
}
