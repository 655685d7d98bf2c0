//! Synonym equivalence classes for skill matching.
//!
//! Lookup is by exact normalized form: a skill that equals a group key or one of its
//! aliases pulls in the whole group. There is no substring matching here.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::skills::normalize::normalize_skill;

/// Built-in alias groups: `(canonical key, aliases)`.
pub const SYNONYM_GROUPS: &[(&str, &[&str])] = &[
    (
        "rest api",
        &["restful api", "restful apis", "rest apis", "api development", "rest services"],
    ),
    (
        "nosql",
        &["no sql", "mongodb", "mongo", "non-relational", "document database"],
    ),
    (
        "llm",
        &[
            "large language model",
            "language model",
            "llms",
            "transformer model",
            "generative ai",
        ],
    ),
    (
        "nlp",
        &["natural language processing", "text processing", "language understanding"],
    ),
    ("ml", &["machine learning", "ml algorithms", "predictive modeling"]),
    (
        "deep learning",
        &["neural networks", "cnn", "rnn", "lstm", "neural net"],
    ),
    ("ai", &["artificial intelligence", "intelligent systems"]),
    (
        "aws",
        &["amazon web services", "amazon aws", "ec2", "s3", "lambda"],
    ),
    ("gcp", &["google cloud platform", "google cloud", "gcp services"]),
    ("azure", &["microsoft azure", "azure cloud"]),
    (
        "ci/cd",
        &["continuous integration", "continuous deployment", "cicd", "devops"],
    ),
    (
        "api",
        &["apis", "application programming interface", "web api", "rest api"],
    ),
    (
        "docker",
        &["containerization", "containers", "docker containers"],
    ),
    ("kubernetes", &["k8s", "container orchestration", "kube"]),
    ("python", &["python programming", "python3", "python development"]),
    ("javascript", &["js", "node.js", "nodejs", "typescript"]),
    ("java", &["java programming", "java development", "spring boot"]),
    (
        "sql",
        &["database", "relational database", "mysql", "postgresql"],
    ),
    ("git", &["version control", "github", "gitlab", "source control"]),
];

static BUILTIN: LazyLock<SynonymTable> = LazyLock::new(|| SynonymTable::from_groups(SYNONYM_GROUPS));

/// One equivalence group with every member already normalized.
#[derive(Debug, Clone)]
struct SynonymGroup {
    key: String,
    aliases: Vec<String>,
}

impl SynonymGroup {
    fn contains(&self, normalized: &str) -> bool {
        self.key == normalized || self.aliases.iter().any(|a| a == normalized)
    }
}

/// Immutable synonym table. Safe to share across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    groups: Vec<SynonymGroup>,
}

impl SynonymTable {
    /// The table compiled into the binary.
    pub fn builtin() -> &'static SynonymTable {
        &BUILTIN
    }

    pub fn from_groups(groups: &[(&str, &[&str])]) -> Self {
        let mut table = Self::default();
        for (key, aliases) in groups {
            table = table.with_group(key, aliases);
        }
        table
    }

    /// Returns a copy of the table extended with one more group.
    pub fn with_group(mut self, key: &str, aliases: &[&str]) -> Self {
        self.groups.push(SynonymGroup {
            key: normalize_skill(key),
            aliases: aliases.iter().map(|a| normalize_skill(a)).collect(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Normalized form of `skill` plus every member of every group it belongs to.
    pub fn expand(&self, skill: &str) -> BTreeSet<String> {
        let normalized = normalize_skill(skill);
        let mut variations = BTreeSet::new();

        for group in self.groups.iter().filter(|g| g.contains(&normalized)) {
            variations.insert(group.key.clone());
            variations.extend(group.aliases.iter().cloned());
        }

        variations.insert(normalized);
        variations
    }
}

/// Expands a skill with the built-in table.
pub fn expand_skill_synonyms(skill: &str) -> BTreeSet<String> {
    SynonymTable::builtin().expand(skill)
}
