//! End-to-end matching scenarios through the public library API.

use std::sync::Arc;

use matcher::embedding::{EmbeddingProvider, HashingEmbedder};
use matcher::parsing::{parse_job, parse_resume};
use matcher::scoring::OverlapKind;
use matcher::skills::SkillVocabulary;
use matcher::{JobDocument, MatchingEngine, ResumeDocument};

fn engine() -> MatchingEngine {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new(4096));
    MatchingEngine::new(Some(provider))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const BACKEND_JOB_TEXT: &str = "Backend Engineer. Required skills: Python, Django, PostgreSQL, \
Docker, Kubernetes, AWS. Build backend services and REST APIs. 5-7 years of experience.";

const BACKEND_RESUME_TEXT: &str = "Backend Engineer. Skills: Python, Flask, MySQL, Docker, AWS. \
Built backend services and REST APIs. 3 years of experience.";

const JAVA_RESUME_TEXT: &str = "Java Developer. Skills: Java, Spring Boot, MySQL, REST APIs, \
Microservices, Hibernate.";

fn backend_job() -> JobDocument {
    JobDocument {
        title: Some("Backend Engineer".to_string()),
        raw_text: BACKEND_JOB_TEXT.to_string(),
        skills_required: strings(&["Python", "Django", "PostgreSQL", "Docker", "Kubernetes", "AWS"]),
        experience_required: Some(6.0),
        ..Default::default()
    }
}

fn backend_resume(name: &str) -> ResumeDocument {
    ResumeDocument {
        name: name.to_string(),
        raw_text: BACKEND_RESUME_TEXT.to_string(),
        skills: strings(&["Python", "Flask", "MySQL", "Docker", "AWS"]),
        experience_years: Some(3.0),
        ..Default::default()
    }
}

fn java_resume() -> ResumeDocument {
    ResumeDocument {
        name: "Sam Ortiz".to_string(),
        raw_text: JAVA_RESUME_TEXT.to_string(),
        skills: strings(&["Java", "Spring Boot", "MySQL", "REST APIs"]),
        experience_years: Some(8.0),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_identical_profile_scores_at_least_95() {
    let text = "Senior Rust engineer building distributed systems: Rust, Tokio, PostgreSQL, \
Kafka, Kubernetes. 6 years of experience.";
    let skills = strings(&["Rust", "Tokio", "PostgreSQL", "Kafka", "Kubernetes"]);

    let job = JobDocument {
        title: Some("Senior Rust Engineer".to_string()),
        raw_text: text.to_string(),
        skills_required: skills.clone(),
        experience_required: Some(5.0),
        ..Default::default()
    };
    let resume = ResumeDocument {
        name: "Ana Lima".to_string(),
        raw_text: text.to_string(),
        skills,
        experience_years: Some(6.0),
        ..Default::default()
    };

    let result = engine().match_resume(&resume, &job, None).await.unwrap();
    assert!(result.suitability_score >= 95.0, "{}", result.suitability_score);
    assert!(result.semantic_similarity > 99.0);
    assert_eq!(result.skill_overlap, 100.0);
    assert_eq!(result.experience_relevance, 100.0);
    assert!(result.missing_skills.is_empty());
}

#[tokio::test]
async fn test_partial_match_lands_mid_range() {
    let result = engine()
        .match_resume(&backend_resume("Jordan Lee"), &backend_job(), None)
        .await
        .unwrap();

    assert_eq!(result.overlap_strategy, OverlapKind::Semantic);
    assert!(result.skill_overlap > 0.0 && result.skill_overlap < 100.0);
    assert!(result.experience_relevance < 100.0);
    assert!(result.semantic_similarity >= 40.0);
    assert!(
        (60.0..=90.0).contains(&result.suitability_score),
        "score {}",
        result.suitability_score
    );
    assert!(result.matching_skills.iter().any(|s| s == "python"));
    assert!(result.missing_skills.iter().any(|s| s == "kubernetes"));
}

#[tokio::test]
async fn test_domain_mismatch_is_capped_at_40() {
    let job = JobDocument {
        title: Some("Digital Marketing Manager".to_string()),
        raw_text: "Digital Marketing Manager. Required skills: Digital Marketing, SEO, \
Social Media, Content Strategy, Google Analytics, Brand Campaigns."
            .to_string(),
        skills_required: strings(&[
            "Digital Marketing",
            "SEO",
            "Social Media",
            "Content Strategy",
            "Google Analytics",
        ]),
        ..Default::default()
    };

    let result = engine().match_resume(&java_resume(), &job, None).await.unwrap();
    assert!(result.semantic_similarity < 40.0);
    assert!(result.suitability_score <= 40.0, "{}", result.suitability_score);
}

#[tokio::test]
async fn test_resume_without_skills_misses_every_job_skill() {
    let job = JobDocument {
        skills_required: strings(&["Python", "Docker", "python", "AWS"]),
        ..Default::default()
    };
    let resume = ResumeDocument {
        name: "Dana Kim".to_string(),
        ..Default::default()
    };

    let result = engine().match_resume(&resume, &job, None).await.unwrap();
    assert_eq!(result.skill_overlap, 0.0);
    assert!(result.matching_skills.is_empty());
    assert_eq!(result.missing_skills, strings(&["Python", "Docker", "AWS"]));
}

#[tokio::test]
async fn test_long_job_skill_list_is_reported_in_full() {
    let required = strings(&[
        "Rust", "Go", "Haskell", "Erlang", "Elixir", "Scala", "Kotlin", "Swift", "Zig",
        "Ocaml", "Clojure", "Fortran", "Cobol", "Ada",
    ]);
    let job = JobDocument {
        skills_required: required.clone(),
        ..Default::default()
    };
    let resume = ResumeDocument {
        name: "Dana Kim".to_string(),
        ..Default::default()
    };

    let result = engine().match_resume(&resume, &job, None).await.unwrap();
    assert_eq!(result.skill_overlap, 0.0);
    assert!(result.matching_skills.is_empty());
    assert_eq!(result.missing_skills.len(), 14);
    assert_eq!(result.missing_skills, required);
}

#[tokio::test]
async fn test_batch_is_sorted_and_stable() {
    let job = backend_job();
    let strong = ResumeDocument {
        name: "Riley Chen".to_string(),
        raw_text: BACKEND_JOB_TEXT.to_string(),
        skills: job.skills_required.clone(),
        experience_years: Some(7.0),
        ..Default::default()
    };
    let resumes = vec![
        java_resume(),
        backend_resume("Twin One"),
        ResumeDocument::default(),
        strong,
        backend_resume("Twin Two"),
    ];

    let results = engine().batch_match(&resumes, &job, None).await;
    let names: Vec<&str> = results.iter().map(|r| r.candidate_name.as_str()).collect();

    assert_eq!(results.len(), 4);
    assert!(results
        .windows(2)
        .all(|pair| pair[0].suitability_score >= pair[1].suitability_score));
    assert_eq!(names, vec!["Riley Chen", "Twin One", "Twin Two", "Sam Ortiz"]);
    assert_eq!(results[1].suitability_score, results[2].suitability_score);
}

#[tokio::test]
async fn test_plain_text_documents_end_to_end() {
    let vocabulary = SkillVocabulary::builtin();
    let resume = parse_resume(
        "Jane Smith\njane.smith@example.com\nBackend developer with 6 years of experience.\n\
SKILLS\nPython, Flask, PostgreSQL, Docker",
        &vocabulary,
    );
    let job = parse_job(
        "Senior Backend Engineer\nRequired Skills:\nPython, Django, PostgreSQL, Docker\n\
Requirements:\n- 5+ years of experience with backend services",
        &vocabulary,
    );

    assert_eq!(resume.experience_years, Some(6.0));
    assert_eq!(job.experience_required, Some(5.0));

    let result = engine().match_resume(&resume, &job, None).await.unwrap();
    assert_eq!(result.candidate_name, "Jane Smith");
    assert_eq!(result.experience_relevance, 100.0);
    assert!((0.0..=100.0).contains(&result.suitability_score));
    assert!(result
        .matching_skills
        .iter()
        .any(|s| s.eq_ignore_ascii_case("python")));
}
