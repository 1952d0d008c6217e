use job_autopilot::scoring::{SCORE_CEILING, SCORE_FLOOR};
use job_autopilot::{
    classify, CompatibilityBucket, CompatibilityScore, CompatibilityScorer, FixedJitter,
    JobPosting, KeywordProfile, RandomJitter,
};

fn default_profile() -> KeywordProfile {
    KeywordProfile::new([
        "data analyst",
        "business intelligence",
        "big data",
        "power bi",
        "python",
        "sql",
        "tableau",
        "data science",
        "analytics",
        "etl",
        "data warehouse",
        "machine learning",
        "azure",
        "databricks",
        "spark",
        "pandas",
        "numpy",
        "visualization",
    ])
}

fn postings() -> Vec<JobPosting> {
    vec![
        JobPosting::new("Cashier", "Part-time retail position"),
        JobPosting::new("Data Analyst", "Experience with Python and SQL required"),
        JobPosting::new("BI Developer", "Power BI, Tableau and ETL on Azure"),
        JobPosting::new("", ""),
        JobPosting::new(
            "Lead Data Analyst",
            "Business intelligence, big data analytics, Python, SQL, Power BI, Tableau, \
             data science, ETL, data warehouse, machine learning, Azure, Databricks, Spark, \
             pandas, numpy and visualization",
        ),
    ]
}

#[test]
fn scores_stay_within_floor_and_ceiling() {
    let scorer = CompatibilityScorer::new(default_profile());
    let mut jitter = RandomJitter::seeded(42);

    for posting in postings() {
        for _ in 0..200 {
            let score = scorer.score(&posting, &mut jitter).value();
            assert!(
                (SCORE_FLOOR..=SCORE_CEILING).contains(&score),
                "{} out of range for '{}'",
                score,
                posting.title
            );
        }
    }
}

#[test]
fn every_score_maps_to_exactly_one_bucket() {
    for value in 0..=100u8 {
        let bucket = classify(CompatibilityScore::new(value));
        let expected = if value > 90 {
            CompatibilityBucket::High
        } else if value > 60 {
            CompatibilityBucket::Medium
        } else {
            CompatibilityBucket::Low
        };
        assert_eq!(bucket, expected, "score {}", value);
    }
}

#[test]
fn bucket_boundaries() {
    let at = |v| classify(CompatibilityScore::new(v));
    assert_eq!(at(60), CompatibilityBucket::Low);
    assert_eq!(at(61), CompatibilityBucket::Medium);
    assert_eq!(at(90), CompatibilityBucket::Medium);
    assert_eq!(at(91), CompatibilityBucket::High);
}

#[test]
fn more_keyword_matches_never_lower_the_raw_score() {
    let scorer = CompatibilityScorer::new(default_profile());
    let base = JobPosting::new("Analyst", "Reporting with SQL");
    let richer = JobPosting::new("Analyst", "Reporting with SQL, Python and Power BI dashboards");

    let a = scorer.breakdown(&base);
    let b = scorer.breakdown(&richer);
    assert!(b.matches > a.matches);
    assert!(b.raw() >= a.raw());
}

#[test]
fn same_posting_and_jitter_give_same_score() {
    let scorer = CompatibilityScorer::new(default_profile());
    for posting in postings() {
        let first = scorer.score(&posting, &mut FixedJitter(2));
        let second = scorer.score(&posting, &mut FixedJitter(2));
        assert_eq!(first, second);
    }

    let all = postings();
    let posting = &all[1];
    let run = |seed| {
        let mut jitter = RandomJitter::seeded(seed);
        (0..20)
            .map(|_| scorer.score(posting, &mut jitter).value())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn unrelated_posting_scores_the_floor_and_is_low() {
    let scorer = CompatibilityScorer::new(KeywordProfile::new(["python", "sql", "power bi"]));
    let posting = JobPosting::new("Cashier", "Part-time retail position");

    let scored = scorer.assess(&posting, &mut FixedJitter(0));
    assert_eq!(scored.score.value(), SCORE_FLOOR);
    assert_eq!(scored.bucket, CompatibilityBucket::Low);
}

#[test]
fn partial_match_is_medium_or_low() {
    let scorer = CompatibilityScorer::new(KeywordProfile::new(["python", "sql", "power bi"]));
    let posting = JobPosting::new("Data Analyst", "Experience with Python and SQL required");

    let breakdown = scorer.breakdown(&posting);
    assert_eq!(breakdown.matches, 2);
    assert_eq!(breakdown.key_skill_hits, 3);

    let mut jitter = RandomJitter::seeded(1);
    for _ in 0..50 {
        let bucket = scorer.assess(&posting, &mut jitter).bucket;
        assert_ne!(bucket, CompatibilityBucket::High);
    }

    // 66.67 base + 7.5 bonus
    assert_eq!(scorer.score(&posting, &mut FixedJitter(0)).value(), 74);
}

#[test]
fn full_match_hits_the_ceiling_and_is_high() {
    let scorer = CompatibilityScorer::new(default_profile());
    let posting = postings().pop().unwrap();

    let scored = scorer.assess(&posting, &mut FixedJitter(0));
    assert_eq!(scored.score.value(), SCORE_CEILING);
    assert_eq!(scored.bucket, CompatibilityBucket::High);
    assert_eq!(scored.badge(), "Compatibility: 95%");
}

#[test]
fn empty_posting_never_fails() {
    let scorer = CompatibilityScorer::new(default_profile());
    let score = scorer.score(&JobPosting::new("", ""), &mut FixedJitter(0));
    assert_eq!(score.value(), SCORE_FLOOR);
}
