use super::service::Part;
use super::*;
use crate::content::store::ContentStore;
use crate::content::types::HeroContent;
use crate::persistence::MemoryStorage;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Barrier, Semaphore};

/// Replies according to `reply`, recording every prompt it sees.
struct StubService<F> {
    reply: F,
    prompts: Mutex<Vec<String>>,
}

impl<F> StubService<F>
where
    F: Fn(&str) -> Result<GenerateContentResponse, ServiceError> + Send + Sync,
{
    fn new(reply: F) -> Arc<Self> {
        Arc::new(Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> ImageService for StubService<F>
where
    F: Fn(&str) -> Result<GenerateContentResponse, ServiceError> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.reply)(prompt)
    }
}

fn image(data: &str) -> Result<GenerateContentResponse, ServiceError> {
    Ok(GenerateContentResponse::with_parts(vec![Part::image("image/png", data)]))
}

fn rejected() -> Result<GenerateContentResponse, ServiceError> {
    Err(ServiceError::Rejected {
        status: 500,
        message: "Server error (500 Internal Server Error): boom".into(),
    })
}

#[tokio::test]
async fn midnight_masquerade_keeps_the_one_success() {
    let stub = StubService::new(|prompt: &str| {
        if prompt.contains("luxury private karaoke suite") {
            image("QQ==")
        } else {
            rejected()
        }
    });
    let generator = BackgroundGenerator::new(stub.clone());

    let report = generator.generate("Midnight Masquerade").await.unwrap();

    let seen = stub.seen();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|p| p.contains("Midnight Masquerade")));

    assert_eq!(report.attempted, 3);
    assert_eq!(report.failed, 2);
    assert!(report.is_partial());
    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.candidates[0].style, StyleVariant::Luxury);
    assert_eq!(report.candidates[0].image.to_data_uri(), "data:image/png;base64,QQ==");

    assert!(!generator.is_busy());
    assert_eq!(generator.results().await, report.candidates);
    assert_eq!(
        generator.status().await,
        GenerationStatus::Completed { candidates: 1, failed: 2 }
    );
}

#[tokio::test]
async fn all_branches_failing_is_an_aggregate_error() {
    let stub = StubService::new(|_: &str| rejected());
    let generator = BackgroundGenerator::new(stub.clone());

    let err = generator.generate("LKC").await.unwrap_err();
    assert_eq!(err, GenerateError::AllVariantsFailed { attempted: 3 });
    assert_eq!(stub.seen().len(), 3);
    assert!(generator.results().await.is_empty());
    assert_eq!(generator.status().await, GenerationStatus::Failed { attempted: 3 });
    assert!(!generator.is_busy());
}

#[tokio::test]
async fn text_only_and_malformed_replies_count_as_failures() {
    let stub = StubService::new(|prompt: &str| {
        if prompt.starts_with("Photorealistic") {
            Ok(GenerateContentResponse::with_parts(vec![Part::text("Sorry, no images today")]))
        } else if prompt.starts_with("Abstract") {
            image("%%%")
        } else {
            image("iVBORw0KGgo=")
        }
    });
    let generator = BackgroundGenerator::new(stub);

    let report = generator.generate("LKC").await.unwrap();
    assert_eq!(report.failed, 2);
    assert_eq!(report.candidates[0].style, StyleVariant::Luxury);
}

#[tokio::test]
async fn full_success_is_not_partial() {
    let generator = BackgroundGenerator::new(StubService::new(|_: &str| image("QQ==")));

    let report = generator.generate("LKC").await.unwrap();
    assert_eq!(report.candidates.len(), 3);
    assert!(!report.is_partial());

    let mut styles: Vec<_> = report.candidates.iter().map(|c| c.style.as_str()).collect();
    styles.sort_unstable();
    assert_eq!(styles, ["abstract", "luxury", "party"]);
}

/// Every call waits for all three to arrive, so this only completes if the
/// branches are in flight at the same time.
struct RendezvousService {
    barrier: Barrier,
}

#[async_trait]
impl ImageService for RendezvousService {
    fn name(&self) -> &'static str {
        "rendezvous"
    }

    async fn generate(&self, _prompt: &str) -> Result<GenerateContentResponse, ServiceError> {
        self.barrier.wait().await;
        image("QQ==")
    }
}

#[tokio::test]
async fn branches_run_concurrently() {
    let generator = BackgroundGenerator::new(Arc::new(RendezvousService {
        barrier: Barrier::new(3),
    }));

    let report = tokio::time::timeout(Duration::from_secs(5), generator.generate("LKC"))
        .await
        .expect("branches were serialized")
        .unwrap();
    assert_eq!(report.candidates.len(), 3);
}

/// Holds every call until permits are released.
struct GatedService {
    gate: Semaphore,
    calls: AtomicUsize,
}

#[async_trait]
impl ImageService for GatedService {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn generate(&self, _prompt: &str) -> Result<GenerateContentResponse, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        image("QQ==")
    }
}

#[tokio::test]
async fn second_run_while_busy_is_rejected() {
    let service = Arc::new(GatedService {
        gate: Semaphore::new(0),
        calls: AtomicUsize::new(0),
    });
    let generator = Arc::new(BackgroundGenerator::new(service.clone()));

    let first = tokio::spawn({
        let generator = generator.clone();
        async move { generator.generate("first").await }
    });
    while !generator.is_busy() {
        tokio::task::yield_now().await;
    }

    assert_eq!(generator.status().await, GenerationStatus::Generating);
    assert_eq!(generator.generate("second").await, Err(GenerateError::Busy));

    service.gate.add_permits(3);
    let report = first.await.unwrap().unwrap();
    assert_eq!(report.candidates.len(), 3);
    assert_eq!(service.calls.load(Ordering::SeqCst), 3);
    assert!(!generator.is_busy());
}

#[tokio::test]
async fn new_run_clears_previous_results() {
    let fail_next = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = fail_next.clone();
    let generator = BackgroundGenerator::new(StubService::new(move |_: &str| {
        if flag.load(Ordering::SeqCst) {
            rejected()
        } else {
            image("QQ==")
        }
    }));

    generator.generate("LKC").await.unwrap();
    assert_eq!(generator.results().await.len(), 3);

    fail_next.store(true, Ordering::SeqCst);
    assert!(generator.generate("LKC").await.is_err());
    assert!(generator.results().await.is_empty());
}

#[tokio::test]
async fn hero_heading_is_the_context() {
    let store = ContentStore::load(Arc::new(MemoryStorage::new()), "lkc_site_data").await;
    let mut hero: HeroContent = store.section().await;
    hero.heading_text = String::new();
    let _ = store.replace(hero).await;

    let stub = StubService::new(|_: &str| image("QQ=="));
    let generator = BackgroundGenerator::new(stub.clone());
    generator.generate_from_hero(&store).await.unwrap();

    assert!(stub.seen().iter().all(|p| p.contains(". Karaoke Club. ")));
    // Generation never writes content.
    assert_eq!(store.section::<HeroContent>().await.heading_text, "");
}
