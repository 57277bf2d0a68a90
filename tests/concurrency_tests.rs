//! Concurrency and thread safety tests for the matching pipeline

use std::sync::Arc;
use std::thread;

use realeader::{
    MatchPipeline, Matcher, MemStorage, NewTherapist, SeedConfig, SeededEmbedder, Storage,
};

fn shared_pipeline() -> MatchPipeline<MemStorage, SeededEmbedder> {
    let storage = MemStorage::seeded(&SeedConfig::default()).expect("seed");
    MatchPipeline::new(
        Arc::new(storage),
        Arc::new(SeededEmbedder::default()),
        Matcher::default(),
    )
}

#[test]
fn concurrent_searches_agree() {
    let pipeline = shared_pipeline();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = pipeline.clone();
            thread::spawn(move || {
                pipeline
                    .search_text("burnout at work", Some(3), None)
                    .expect("search should succeed")
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = &results[0];
    for (i, result) in results.iter().enumerate().skip(1) {
        assert_eq!(first, result, "Thread {i} produced a different ranking");
    }
}

#[test]
fn searches_run_alongside_inserts() {
    let pipeline = shared_pipeline();

    let writer = {
        let pipeline = pipeline.clone();
        thread::spawn(move || {
            for i in 0..50 {
                pipeline
                    .storage()
                    .create_therapist(NewTherapist {
                        name: format!("extra-{i}"),
                        title: "t".into(),
                        bio: "b".into(),
                        photo: String::new(),
                        specialties: vec![],
                        rating: 4.0,
                        reviews: 0,
                        available: true,
                        vector_embedding: Some(vec![0.1; 384]),
                    })
                    .expect("insert");
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = pipeline.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    let matches = pipeline.search_text("grief", Some(5), None).expect("search");
                    assert!(matches.len() >= 3 && matches.len() <= 5);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(pipeline.storage().all_therapists().unwrap().len(), 53);
    assert_eq!(pipeline.search_text("grief", Some(100), None).unwrap().len(), 53);
}
