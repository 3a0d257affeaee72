use super::*;
use crate::persistence::{MemoryStorage, PersistenceError, PersistenceResult, SnapshotStorage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const KEY: &str = "lkc_site_data";

/// Reads nothing and refuses every write.
#[derive(Default)]
struct FailingStorage {
    writes: AtomicUsize,
}

#[async_trait]
impl SnapshotStorage for FailingStorage {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn read(&self, _key: &str) -> PersistenceResult<Option<String>> {
        Ok(None)
    }

    async fn write(&self, _key: &str, _blob: &str) -> PersistenceResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(PersistenceError::Unavailable("quota exceeded".into()))
    }
}

async fn fresh_store() -> (Arc<MemoryStorage>, ContentStore) {
    let storage = Arc::new(MemoryStorage::new());
    let store = ContentStore::load(storage.clone(), KEY).await;
    (storage, store)
}

/// A distinct value for every section kind.
fn edited(kind: SectionKind) -> SectionValue {
    let mut snapshot = defaults::snapshot();
    match kind {
        SectionKind::Header => snapshot.header.logo_url = ImageRef::new("/images/new-logo.png"),
        SectionKind::Hero => snapshot.hero.heading_text = "Midnight Masquerade".into(),
        SectionKind::Highlights => snapshot.highlights.feature_list.push("Free cloakroom".into()),
        SectionKind::Features => snapshot.features.occasions.items.clear(),
        SectionKind::Vibe => snapshot.vibe.bottom_text = "Encore!".into(),
        SectionKind::Testimonials => snapshot.testimonials.items.truncate(1),
        SectionKind::Battery => snapshot.battery.stat_number = "70,000".into(),
        SectionKind::Footer => snapshot.footer.cta_button_text = "Reserve".into(),
        SectionKind::FoodMenu => snapshot.food_menu[0].items[0].price = "50".into(),
        SectionKind::DrinksMenu => snapshot.drinks_menu.header_image_url = None,
        SectionKind::Gallery => snapshot.gallery.images.clear(),
    }
    snapshot.get(kind)
}

#[tokio::test]
async fn empty_storage_seeds_defaults() {
    let (_, store) = fresh_store().await;
    assert!(matches!(store.load_source(), LoadSource::Defaults(_)));
    assert_eq!(store.snapshot().await, defaults::snapshot());
    assert_eq!(store.storage_key(), KEY);
}

#[tokio::test]
async fn read_your_write_for_every_section() {
    let (_, store) = fresh_store().await;

    for kind in SectionKind::ALL {
        let value = edited(kind);
        assert_ne!(value, defaults::snapshot().get(kind), "{kind} edit is a no-op");

        let outcome = store.update_section(kind, value.clone()).await.unwrap();
        assert!(outcome.is_persisted());
        assert_eq!(store.get_section(kind).await, value);
    }
}

#[tokio::test]
async fn update_replaces_only_the_named_section() {
    let (_, store) = fresh_store().await;
    let before = store.snapshot().await;

    let _ = store.update_section(SectionKind::Battery, edited(SectionKind::Battery)).await.unwrap();

    let after = store.snapshot().await;
    assert_ne!(after.battery, before.battery);
    assert_eq!(after.hero, before.hero);
    assert_eq!(after.food_menu, before.food_menu);
}

#[tokio::test]
async fn kind_mismatch_is_rejected_and_store_untouched() {
    let (storage, store) = fresh_store().await;

    let err = store
        .update_section(SectionKind::Hero, edited(SectionKind::Footer))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ContentError::KindMismatch {
            expected: SectionKind::Hero,
            found: SectionKind::Footer
        }
    ));
    assert_eq!(store.snapshot().await, defaults::snapshot());
    assert!(storage.get(KEY).await.is_none());
}

#[tokio::test]
async fn typed_access_round_trips() {
    let (_, store) = fresh_store().await;

    let mut hero: HeroContent = store.section().await;
    hero.badge_text = "Closed Mondays".into();
    assert!(store.replace(hero.clone()).await.is_persisted());

    assert_eq!(store.section::<HeroContent>().await, hero);
}

#[tokio::test]
async fn persisted_content_survives_reload() {
    let (storage, store) = fresh_store().await;
    let footer = edited(SectionKind::Footer);
    let _ = store.update_section(SectionKind::Footer, footer.clone()).await.unwrap();
    drop(store);

    let reloaded = ContentStore::load(storage, KEY).await;
    assert_eq!(reloaded.load_source(), &LoadSource::Persisted);
    assert_eq!(reloaded.get_section(SectionKind::Footer).await, footer);
}

#[tokio::test]
async fn reset_all_restores_every_default() {
    let (storage, store) = fresh_store().await;
    for kind in SectionKind::ALL {
        let _ = store.update_section(kind, edited(kind)).await.unwrap();
    }
    assert_ne!(store.snapshot().await, defaults::snapshot());

    assert!(store.reset_all().await.is_persisted());
    assert_eq!(store.snapshot().await, defaults::snapshot());

    // The reset is durable too.
    let reloaded = ContentStore::load(storage, KEY).await;
    assert_eq!(reloaded.snapshot().await, defaults::snapshot());
}

#[tokio::test]
async fn corrupted_blob_falls_back_to_defaults() {
    let storage = Arc::new(MemoryStorage::with_blob(KEY, "{\"version\":1,\"content\":{\"hero\":"));
    let store = ContentStore::load(storage, KEY).await;

    assert!(matches!(store.load_source(), LoadSource::Defaults(_)));
    assert_eq!(store.snapshot().await, defaults::snapshot());
}

#[tokio::test]
async fn tampered_blob_fails_checksum() {
    let blob = snapshot::encode(&defaults::snapshot()).unwrap();
    let tampered = blob.replacen("London Karaoke Club", "London Karaoke Klub", 1);
    assert_ne!(blob, tampered);

    assert!(matches!(
        snapshot::decode(&tampered),
        Err(snapshot::SnapshotError::ChecksumMismatch { .. })
    ));

    let store = ContentStore::load(Arc::new(MemoryStorage::with_blob(KEY, tampered)), KEY).await;
    assert_eq!(store.section::<HeroContent>().await.heading_text, "London Karaoke Club");
}

#[tokio::test]
async fn newer_version_is_refused() {
    let blob = snapshot::encode(&defaults::snapshot())
        .unwrap()
        .replacen("\"version\":1", "\"version\":9", 1);

    match snapshot::decode(&blob) {
        Err(snapshot::SnapshotError::UnsupportedVersion { found, supported }) => {
            assert_eq!(found, 9);
            assert_eq!(supported, SNAPSHOT_VERSION);
        }
        other => panic!("expected version refusal, got {other:?}"),
    }

    let store = ContentStore::load(Arc::new(MemoryStorage::with_blob(KEY, blob)), KEY).await;
    assert!(matches!(store.load_source(), LoadSource::Defaults(_)));
}

#[tokio::test]
async fn bare_snapshot_without_ids_is_accepted() {
    // Blob written before envelopes and item ids existed: the snapshot
    // object itself, no version, no checksum.
    let mut content = serde_json::to_value(defaults::snapshot()).unwrap();
    for category in content["foodMenu"].as_array_mut().unwrap() {
        for item in category["items"].as_array_mut().unwrap() {
            item.as_object_mut().unwrap().remove("id");
        }
    }
    let blob = content.to_string();

    let decoded = snapshot::decode(&blob).unwrap();
    assert_eq!(decoded.version, 0);
    assert!(decoded.saved_at.is_none());

    let food = &decoded.snapshot.food_menu[0].items;
    assert_eq!(food[0].name, "Soho Grazing Board");
    assert_ne!(food[0].id, food[1].id);
}

#[tokio::test]
async fn bare_snapshot_keeps_operator_edits_on_load() {
    let mut edited = defaults::snapshot();
    edited.hero.heading_text = "Operator Edit".into();
    let blob = serde_json::to_string(&edited).unwrap();

    let store = ContentStore::load(Arc::new(MemoryStorage::with_blob(KEY, blob)), KEY).await;

    assert_eq!(store.load_source(), &LoadSource::Persisted);
    assert_eq!(store.section::<HeroContent>().await.heading_text, "Operator Edit");
}

#[test]
fn bare_blob_that_is_not_a_snapshot_is_malformed() {
    assert!(matches!(
        snapshot::decode("{\"hero\": 1}"),
        Err(snapshot::SnapshotError::Malformed(_))
    ));
}

#[tokio::test]
async fn failed_write_through_keeps_memory_authoritative() {
    let storage = Arc::new(FailingStorage::default());
    let store = ContentStore::load(storage.clone(), KEY).await;

    let value = edited(SectionKind::Hero);
    let outcome = store.update_section(SectionKind::Hero, value.clone()).await.unwrap();

    assert!(matches!(outcome, WriteThrough::Failed(PersistenceError::Unavailable(_))));
    assert_eq!(store.get_section(SectionKind::Hero).await, value);
    assert_eq!(storage.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reset_persists_once() {
    let storage = Arc::new(FailingStorage::default());
    let store = ContentStore::load(storage.clone(), KEY).await;

    let _ = store.reset_all().await;
    assert_eq!(storage.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn inline_images_are_counted() {
    let (_, store) = fresh_store().await;
    let mut hero: HeroContent = store.section().await;
    hero.background_image_url = InlineImage::encode("image/png", b"\x89PNG").into();
    let _ = store.replace(hero).await;

    let (count, bytes) = store.snapshot().await.inline_image_stats();
    assert_eq!(count, 1);
    assert_eq!(bytes, "data:image/png;base64,iVBORw==".len());
}

#[tokio::test]
async fn menu_edit_flows_through_the_store() {
    let (_, store) = fresh_store().await;

    let mut food: Vec<MenuCategory> = store.section().await;
    let target = food[1].items[1].id;
    food.delete_item(1, target).unwrap();
    let added = food.add_placeholder(1).unwrap();
    let _ = store.replace(food).await;

    let food: Vec<MenuCategory> = store.section().await;
    assert!(food[1].find(target).is_none());
    assert_eq!(food[1].find(added).unwrap().name, "New Item");
    assert_eq!(food[1].items.len(), 3);
}

#[test]
fn section_kinds_parse_from_tab_names() {
    assert_eq!("food".parse::<SectionKind>().unwrap(), SectionKind::FoodMenu);
    assert_eq!("drinksMenu".parse::<SectionKind>().unwrap(), SectionKind::DrinksMenu);
    assert_eq!("Hero".parse::<SectionKind>().unwrap(), SectionKind::Hero);
    assert!("faq".parse::<SectionKind>().is_err());
}

#[test]
fn bare_body_parses_as_requested_kind() {
    let body = defaults::snapshot().get(SectionKind::Battery).body_json().unwrap();
    let value = SectionValue::from_json(SectionKind::Battery, &body).unwrap();
    assert_eq!(value.kind(), SectionKind::Battery);
    assert!(SectionValue::from_json(SectionKind::Hero, &body).is_err());
}
