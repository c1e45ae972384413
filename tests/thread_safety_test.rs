//! Tests for thread-safe concurrent access to the codec cache.

use serde_json::json;
use shapecodec::{
    generate_encoder, CaseStrategy, CodecCache, Configuration, Decoder, Shaped, TypeRef,
    TypeShape,
};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: u32,
    name: String,
    manager: Option<Box<User>>,
}

impl Shaped for User {
    fn shape() -> TypeShape<Self> {
        TypeShape::<Self>::record()
            .field("id", |u| &u.id)
            .field("name", |u| &u.name)
            .field("manager", |u| &u.manager)
            .build(|fields| {
                Ok(User {
                    id: fields.take()?,
                    name: fields.take()?,
                    manager: fields.take()?,
                })
            })
    }
}

fn user(i: u32) -> User {
    User {
        id: i,
        name: format!("User{}", i),
        manager: Some(Box::new(User {
            id: 0,
            name: "Boss".to_string(),
            manager: None,
        })),
    }
}

#[test]
fn test_concurrent_derivation_of_same_type() {
    let cache: Arc<CodecCache> = Arc::new(CodecCache::new());
    let config: Arc<Configuration> = Arc::new(Configuration::new());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let config = Arc::clone(&config);
            thread::spawn(move || {
                let encoder = cache.encoder::<User>(&config).unwrap();
                let decoder = cache.decoder::<User>(&config).unwrap();
                let encoded = encoder.encode(&user(i));
                assert_eq!(encoded["Name"], json!(format!("User{}", i)));
                assert_eq!(decoder.decode(&encoded).unwrap(), user(i));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // racing derivations still leave one entry per type
    let count = cache.encoder_count();
    cache.encoder::<User>(&config).unwrap();
    assert_eq!(cache.encoder_count(), count);
    assert!(cache.contains_encoder::<Option<Box<User>>>(&config));
}

#[test]
fn test_concurrent_mixed_configurations() {
    let cache: CodecCache = CodecCache::new();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let cache = cache.clone();
            thread::spawn(move || {
                let strategy = if i % 2 == 0 {
                    CaseStrategy::CamelCase
                } else {
                    CaseStrategy::SnakeCase
                };
                let config = Configuration::new().with_case_strategy(strategy);
                let encoded = cache.encoder::<User>(&config).unwrap().encode(&user(i));
                assert_eq!(encoded["id"], json!(i));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let camel = Configuration::new().with_case_strategy(CaseStrategy::CamelCase);
    let snake = Configuration::new().with_case_strategy(CaseStrategy::SnakeCase);
    assert!(cache.contains_encoder::<User>(&camel));
    assert!(cache.contains_encoder::<User>(&snake));
}

#[test]
fn test_decoder_shared_across_threads() {
    let config = Configuration::new();
    let decoder: Decoder<User> = CodecCache::new().decoder(&config).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let decoder = decoder.clone();
            thread::spawn(move || {
                let result = decoder.decode(&json!({"Id": i, "Name": "x", "Manager": {"Id": "bad"}}));
                let error = result.unwrap_err();
                assert_eq!(error.path.to_string(), ".Manager.Id");
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_prewarm_alongside_lookups() {
    let cache: CodecCache = CodecCache::new();
    let config: Arc<Configuration> = Arc::new(Configuration::new());

    let warmer = {
        let cache = cache.clone();
        let config = Arc::clone(&config);
        thread::spawn(move || {
            let result = cache.prewarm(&[TypeRef::of::<User>()], &config);
            assert!(result.is_success());
        })
    };

    let reader = {
        let cache = cache.clone();
        let config = Arc::clone(&config);
        thread::spawn(move || {
            let encoder = cache.encoder::<Vec<User>>(&config).unwrap();
            assert_eq!(encoder.encode(&Vec::new()), json!([]));
        })
    };

    warmer.join().unwrap();
    reader.join().unwrap();
    assert!(cache.contains_decoder::<User>(&config));
    assert!(cache.contains_encoder::<Vec<User>>(&config));
}

#[test]
fn test_global_cache_from_many_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let encoder = generate_encoder::<Vec<u32>>(&Configuration::new()).unwrap();
                assert_eq!(encoder.encode(&vec![i, i + 1]), json!([i, i + 1]));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(CodecCache::global().contains_encoder::<Vec<u32>>(&Configuration::new()));
}
