use colpofind_core::{
    similarity, AggregationPipeline, CandidateRecord, DuplicateResolver, KeywordWeight,
    RelevanceClassifier, RelevanceScorer, ResolvedRecord, ScoredRecord, SourceKind, Vocabulary,
};

fn candidate(source: SourceKind, title: &str, summary: &str) -> CandidateRecord {
    CandidateRecord::new(source, title).with_summary(summary)
}

fn scored(title: &str, score: u32, link: (&str, &str)) -> ScoredRecord {
    ScoredRecord::new(
        CandidateRecord::new(SourceKind::Other, title).with_link(link.0, link.1),
        score,
    )
}

fn titles(records: &[ResolvedRecord]) -> Vec<&str> {
    records.iter().map(|r| r.title()).collect()
}

#[test]
fn test_similarity_bounds() {
    for s in ["", "a", "Colposcopy image dataset", "HPV and CIN2+"] {
        assert_eq!(similarity(s, s), 1.0);
    }
    assert_eq!(similarity("abc", "xyz"), 0.0);
    assert_eq!(similarity("colposcopy", "QWERTZ"), 0.0);
}

#[test]
fn test_classifier_examples() {
    let classifier = RelevanceClassifier::default();
    assert!(!classifier.is_relevant("unrelated text"));
    assert!(classifier.is_relevant("Patient screened for cervical cancer"));
    assert!(!classifier.is_relevant(""));
}

#[test]
fn test_score_specificity_monotonicity() {
    let scorer = RelevanceScorer::default();
    assert!(scorer.score("colposcopy image dataset", "") >= scorer.score("dataset", ""));
    assert_eq!(scorer.score("dataset", ""), 1);
    // colposcopy image (4) + colposcopy (3) + dataset (1)
    assert_eq!(scorer.score("colposcopy image dataset", ""), 8);
}

#[test]
fn test_case_only_titles_collapse() {
    let resolver = DuplicateResolver::default();
    let resolved = resolver.resolve(vec![
        scored("HPV and Cervical Cancer Screening", 3, ("pubmed", "https://pubmed/1")),
        scored("hpv and cervical cancer screening", 5, ("pdf", "https://x/1.pdf")),
    ]);

    assert_eq!(resolved.len(), 1);
    let record = &resolved[0];
    assert_eq!(record.relevance_score(), 5);
    assert_eq!(record.duplicate_count, 2);
    assert_eq!(record.title(), "hpv and cervical cancer screening");
    assert_eq!(record.links().len(), 2);
    assert_eq!(record.links()["pubmed"], "https://pubmed/1");
    assert_eq!(record.links()["pdf"], "https://x/1.pdf");
}

#[test]
fn test_anchor_only_clustering() {
    let a = "abcdefghijklmnopqrst";
    let b = "abcdefghijklmnopqrXY";
    let c = "UVcdefghijklmnopqrXY";
    assert!(similarity(a, b) > 0.85);
    assert!(similarity(b, c) > 0.85);
    assert!(similarity(a, c) <= 0.85);

    let resolved = DuplicateResolver::default().resolve(vec![
        scored(a, 3, ("main", "https://a")),
        scored(b, 2, ("pdf", "https://b.pdf")),
        scored(c, 1, ("doi", "https://c")),
    ]);

    assert_eq!(titles(&resolved), vec![a, c]);
    assert_eq!(resolved[0].duplicate_count, 2);
    assert_eq!(resolved[0].links().len(), 2);
    assert_eq!(resolved[1].duplicate_count, 1);
    assert_eq!(resolved[1].links()["doi"], "https://c");
}

#[test]
fn test_resolve_is_idempotent() {
    let resolver = DuplicateResolver::default();
    let first = resolver.resolve(vec![
        scored("abcdefghijklmnopqrst", 3, ("main", "https://a")),
        scored("abcdefghijklmnopqrXY", 2, ("pdf", "https://b.pdf")),
        scored("UVcdefghijklmnopqrXY", 1, ("doi", "https://c")),
        scored("HPV and Cervical Cancer Screening", 3, ("pubmed", "https://p")),
        scored("hpv and cervical cancer screening", 5, ("pdf", "https://q.pdf")),
    ]);
    assert_eq!(first.len(), 3);

    let again = resolver.resolve(first.iter().map(|r| r.scored.clone()).collect());
    assert_eq!(again.len(), first.len());
    assert!(again.iter().all(|r| r.duplicate_count == 1));
    assert_eq!(titles(&again), titles(&first));
}

#[test]
fn test_resolve_again_merges_when_non_anchor_wins() {
    // B outscores anchor A, and B is close to C while A is not
    let resolver = DuplicateResolver::default();
    let first = resolver.resolve(vec![
        scored("abcdefghijklmnopqrst", 1, ("main", "https://a")),
        scored("abcdefghijklmnopqrXY", 5, ("pdf", "https://b.pdf")),
        scored("UVcdefghijklmnopqrXY", 1, ("doi", "https://c")),
    ]);
    assert_eq!(
        titles(&first),
        vec!["abcdefghijklmnopqrXY", "UVcdefghijklmnopqrXY"]
    );
    assert_eq!(first[0].duplicate_count, 2);

    let again = resolver.resolve(first.iter().map(|r| r.scored.clone()).collect());
    assert_eq!(titles(&again), vec!["abcdefghijklmnopqrXY"]);
    assert_eq!(again[0].duplicate_count, 2);
    assert_eq!(again[0].links().len(), 3);
}

#[test]
fn test_run_single_empty_batch() {
    let pipeline = AggregationPipeline::default();
    let out = pipeline.run(vec![Vec::<CandidateRecord>::new()]);
    assert!(out.is_empty());

    let out = pipeline.run(Vec::<Vec<CandidateRecord>>::new());
    assert!(out.is_empty());
}

#[test]
fn test_run_filters_and_sorts_stably() {
    let pipeline = AggregationPipeline::default();
    let batches = vec![
        vec![
            candidate(SourceKind::PubMed, "HPV vaccination uptake in rural clinics", ""),
            candidate(SourceKind::PubMed, "Retinal imaging for diabetics", "eye fundus"),
        ],
        vec![],
        vec![
            candidate(SourceKind::Arxiv, "Cervical biopsy outcomes", ""),
            candidate(SourceKind::GoogleScholar, "Colposcopy training program", ""),
        ],
    ];

    let out = pipeline.run(batches);
    assert_eq!(
        titles(&out),
        vec![
            "Colposcopy training program",
            "HPV vaccination uptake in rural clinics",
            "Cervical biopsy outcomes",
        ]
    );
    let scores: Vec<u32> = out.iter().map(|r| r.relevance_score()).collect();
    assert_eq!(scores, vec![3, 2, 2]);
}

#[test]
fn test_run_merges_across_sources() {
    let pipeline = AggregationPipeline::default();
    let out = pipeline.run(vec![
        vec![candidate(SourceKind::GoogleScholar, "Colposcopy Image Dataset", "")
            .with_link("main", "https://scholar/x")],
        vec![candidate(SourceKind::PubMed, "colposcopy image dataset", "cervical cancer screening")
            .with_link("pubmed", "https://pubmed/x")],
    ]);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].source(), SourceKind::PubMed);
    assert_eq!(out[0].duplicate_count, 2);
    assert_eq!(out[0].links().len(), 2);
}

#[test]
fn test_pipelines_with_different_vocabularies_run_concurrently() {
    let eye = Vocabulary {
        relevant_terms: vec!["retina".to_string()],
        keywords: vec![KeywordWeight::new("retina", 10)],
    };
    let eye_pipeline = AggregationPipeline::new(
        RelevanceClassifier::from_vocabulary(&eye),
        RelevanceScorer::from_vocabulary(&eye).unwrap(),
        DuplicateResolver::default(),
    );
    let default_pipeline = AggregationPipeline::default();

    let batch = || {
        vec![vec![
            candidate(SourceKind::Other, "Retina scans", "retina"),
            candidate(SourceKind::Other, "Colposcopy atlas", ""),
        ]]
    };

    let (eye_out, default_out) = std::thread::scope(|scope| {
        let eye_handle = scope.spawn(|| eye_pipeline.run(batch()));
        let default_handle = scope.spawn(|| default_pipeline.run(batch()));
        (eye_handle.join().unwrap(), default_handle.join().unwrap())
    });

    assert_eq!(titles(&eye_out), vec!["Retina scans"]);
    assert_eq!(eye_out[0].relevance_score(), 20);
    assert_eq!(titles(&default_out), vec!["Colposcopy atlas"]);
    assert_eq!(default_out[0].relevance_score(), 3);
}
