//! Operator actions, callable from any front end.
//!
//! Every handler takes the shared [`AppContext`], speaks JSON strings and
//! reports failures as user-facing messages. Handlers that change content
//! require an unlocked admin gate.

use crate::admin::AdminError;
use crate::content::types::{DrinksMenu, HeroContent};
use crate::content::{
    ItemId, MenuCategory, MenuEditor, MenuField, SectionKind, SectionValue, WriteThrough,
};
use crate::context::AppContext;
use crate::generator::GenerateError;
use bytes::Bytes;
use serde_json::json;
use std::path::Path;
use tracing::{info, instrument};

fn err(e: impl std::fmt::Display) -> String {
    e.to_string()
}

/// JSON fragment describing how the write-through went.
fn persisted(outcome: &WriteThrough) -> serde_json::Value {
    match outcome {
        WriteThrough::Persisted => json!({ "persisted": true }),
        WriteThrough::Failed(e) => json!({
            "persisted": false,
            "warning": format!("Changes are live but could not be saved: {e}"),
        }),
    }
}

fn with_outcome(mut body: serde_json::Value, outcome: &WriteThrough) -> String {
    if let (Some(map), serde_json::Value::Object(extra)) =
        (body.as_object_mut(), persisted(outcome))
    {
        map.extend(extra);
    }
    body.to_string()
}

/* ---------- 1.  SESSION ---------- */

pub fn login(ctx: &AppContext, password: &str) -> Result<String, String> {
    ctx.gate.unlock(password).map_err(err)?;
    Ok("Logged in".to_string())
}

pub fn logout(ctx: &AppContext) -> Result<String, String> {
    ctx.gate.lock();
    Ok("Logged out".to_string())
}

/* ---------- 2.  SECTIONS ---------- */

/// Current body of one section, pretty-printed.
pub async fn get_section(ctx: &AppContext, kind: &str) -> Result<String, String> {
    let kind: SectionKind = kind.parse().map_err(err)?;
    ctx.store.get_section(kind).await.body_json().map_err(err)
}

/// Replace a section with the given JSON body.
#[instrument(skip(ctx, body), fields(bytes = body.len()))]
pub async fn update_section(ctx: &AppContext, kind: &str, body: &str) -> Result<String, String> {
    ctx.gate.require_unlocked().map_err(err)?;
    let kind: SectionKind = kind.parse().map_err(err)?;
    let value = SectionValue::from_json(kind, body)
        .map_err(|e| format!("Invalid {kind} content: {e}"))?;

    let outcome = ctx.store.update_section(kind, value).await.map_err(err)?;
    Ok(with_outcome(json!({ "section": kind }), &outcome))
}

/// Restore every section to factory content. Irreversible.
pub async fn reset_all(ctx: &AppContext, confirm: bool) -> Result<String, String> {
    ctx.gate.require_unlocked().map_err(err)?;
    if !confirm {
        return Err(err(AdminError::ConfirmationRequired));
    }
    let outcome = ctx.store.reset_all().await;
    Ok(with_outcome(json!({ "reset": true }), &outcome))
}

/* ---------- 3.  IMAGES ---------- */

/// Encode an uploaded image. The returned `dataUri` can be placed in any
/// image field through `update_section`.
pub async fn upload_image(
    ctx: &AppContext,
    bytes: Vec<u8>,
    mime: Option<&str>,
) -> Result<String, String> {
    ctx.gate.require_unlocked().map_err(err)?;
    let image = ctx.ingest.ingest(Bytes::from(bytes), mime).await.map_err(err)?;
    Ok(json!({
        "mimeType": image.mime_type(),
        "dataUri": image.to_data_uri(),
    })
    .to_string())
}

/// Same as [`upload_image`], reading the bytes from disk.
pub async fn upload_image_file(ctx: &AppContext, path: &Path) -> Result<String, String> {
    ctx.gate.require_unlocked().map_err(err)?;
    let image = ctx.ingest.ingest_file(path).await.map_err(err)?;
    Ok(json!({
        "mimeType": image.mime_type(),
        "dataUri": image.to_data_uri(),
    })
    .to_string())
}

/// Run the three-style generation for the current hero heading.
pub async fn generate_backgrounds(ctx: &AppContext) -> Result<String, String> {
    ctx.gate.require_unlocked().map_err(err)?;
    match ctx.generator.generate_from_hero(&ctx.store).await {
        Ok(report) => serde_json::to_string(&report).map_err(err),
        Err(GenerateError::AllVariantsFailed { .. }) => {
            Err("Failed to generate images. Please try again.".to_string())
        }
        Err(e) => Err(err(e)),
    }
}

pub async fn generation_status(ctx: &AppContext) -> Result<String, String> {
    serde_json::to_string(&ctx.generator.status().await).map_err(err)
}

/// Make one of the last generated candidates the hero background.
#[instrument(skip(ctx))]
pub async fn adopt_background(ctx: &AppContext, candidate: usize) -> Result<String, String> {
    ctx.gate.require_unlocked().map_err(err)?;
    let results = ctx.generator.results().await;
    let chosen = results
        .get(candidate)
        .ok_or_else(|| format!("No generated image #{candidate} (have {})", results.len()))?;

    let mut hero: HeroContent = ctx.store.section().await;
    hero.background_image_url = chosen.image.clone().into();
    let outcome = ctx.store.replace(hero).await;
    info!(style = %chosen.style, "generated background adopted");

    Ok(with_outcome(json!({ "style": chosen.style }), &outcome))
}

/* ---------- 4.  MENUS ---------- */

/// Menus with editable item lists: food categories and cocktails.
async fn load_menu(
    ctx: &AppContext,
    kind: SectionKind,
) -> Result<(Vec<MenuCategory>, Option<DrinksMenu>), String> {
    match kind {
        SectionKind::FoodMenu => Ok((ctx.store.section().await, None)),
        SectionKind::DrinksMenu => {
            let mut drinks: DrinksMenu = ctx.store.section().await;
            let cocktails = std::mem::take(&mut drinks.cocktails);
            Ok((cocktails, Some(drinks)))
        }
        other => Err(format!("{other} has no menu items")),
    }
}

async fn store_menu(
    ctx: &AppContext,
    categories: Vec<MenuCategory>,
    drinks: Option<DrinksMenu>,
) -> WriteThrough {
    match drinks {
        Some(mut drinks) => {
            drinks.cocktails = categories;
            ctx.store.replace(drinks).await
        }
        None => ctx.store.replace(categories).await,
    }
}

fn parse_field(field: &str) -> Result<MenuField, String> {
    match field.trim().to_ascii_lowercase().as_str() {
        "name" => Ok(MenuField::Name),
        "description" => Ok(MenuField::Description),
        "price" => Ok(MenuField::Price),
        "note" => Ok(MenuField::Note),
        other => Err(format!("Unknown menu field: {other}")),
    }
}

fn parse_id(id: &str) -> Result<ItemId, String> {
    id.parse().map_err(|e| format!("Invalid item id {id:?}: {e}"))
}

pub async fn add_menu_item(
    ctx: &AppContext,
    menu: &str,
    category: usize,
) -> Result<String, String> {
    ctx.gate.require_unlocked().map_err(err)?;
    let kind: SectionKind = menu.parse().map_err(err)?;
    let (mut categories, drinks) = load_menu(ctx, kind).await?;

    let id = categories.add_placeholder(category).map_err(err)?;
    let outcome = store_menu(ctx, categories, drinks).await;
    Ok(with_outcome(json!({ "id": id.to_string() }), &outcome))
}

pub async fn delete_menu_item(
    ctx: &AppContext,
    menu: &str,
    category: usize,
    id: &str,
) -> Result<String, String> {
    ctx.gate.require_unlocked().map_err(err)?;
    let kind: SectionKind = menu.parse().map_err(err)?;
    let id = parse_id(id)?;
    let (mut categories, drinks) = load_menu(ctx, kind).await?;

    let removed = categories.delete_item(category, id).map_err(err)?;
    let outcome = store_menu(ctx, categories, drinks).await;
    Ok(with_outcome(json!({ "removed": removed.name }), &outcome))
}

pub async fn edit_menu_item(
    ctx: &AppContext,
    menu: &str,
    category: usize,
    id: &str,
    field: &str,
    value: &str,
) -> Result<String, String> {
    ctx.gate.require_unlocked().map_err(err)?;
    let kind: SectionKind = menu.parse().map_err(err)?;
    let id = parse_id(id)?;
    let field = parse_field(field)?;
    let (mut categories, drinks) = load_menu(ctx, kind).await?;

    categories.edit_item(category, id, field, value).map_err(err)?;
    let outcome = store_menu(ctx, categories, drinks).await;
    Ok(with_outcome(json!({ "id": id.to_string() }), &outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::defaults;
    use crate::generator::service::{GenerateContentResponse, Part};
    use crate::generator::{ImageService, ServiceError};
    use crate::persistence::MemoryStorage;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    struct OneImage;

    #[async_trait]
    impl ImageService for OneImage {
        fn name(&self) -> &'static str {
            "one-image"
        }

        async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, ServiceError> {
            if prompt.starts_with("Abstract") {
                Ok(GenerateContentResponse::with_parts(vec![Part::image("image/png", "QQ==")]))
            } else {
                Err(ServiceError::Transport("Connection error - unable to reach the API".into()))
            }
        }
    }

    async fn context() -> AppContext {
        AppContext::with_parts(
            Config::default(),
            Arc::new(MemoryStorage::new()),
            Arc::new(OneImage),
        )
        .await
    }

    async fn unlocked() -> AppContext {
        let ctx = context().await;
        login(&ctx, "admin123").unwrap();
        ctx
    }

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn edits_require_login() {
        let ctx = context().await;
        let body = get_section(&ctx, "battery").await.unwrap();

        assert!(update_section(&ctx, "battery", &body).await.is_err());
        assert_eq!(login(&ctx, "nope"), Err("Incorrect password".to_string()));

        login(&ctx, "admin123").unwrap();
        let reply = parse(&update_section(&ctx, "battery", &body).await.unwrap());
        assert_eq!(reply["persisted"], true);

        logout(&ctx).unwrap();
        assert!(reset_all(&ctx, true).await.is_err());
    }

    #[tokio::test]
    async fn section_body_round_trips_through_json() {
        let ctx = unlocked().await;
        let mut hero = parse(&get_section(&ctx, "hero").await.unwrap());
        hero["headingText"] = "Midnight Masquerade".into();

        update_section(&ctx, "hero", &hero.to_string()).await.unwrap();

        let stored: HeroContent = ctx.store.section().await;
        assert_eq!(stored.heading_text, "Midnight Masquerade");
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let ctx = unlocked().await;
        let err = update_section(&ctx, "footer", "{\"ctaHeading\": 3}").await.unwrap_err();
        assert!(err.starts_with("Invalid footer content"), "{err}");
        assert!(update_section(&ctx, "faq", "{}").await.is_err());
    }

    #[tokio::test]
    async fn reset_needs_confirmation() {
        let ctx = unlocked().await;
        let body = json!({ "ctaHeading": "x", "ctaText": "y", "ctaButtonText": "z" }).to_string();
        update_section(&ctx, "footer", &body).await.unwrap();

        assert!(reset_all(&ctx, false).await.unwrap_err().contains("confirmation required"));
        assert_ne!(ctx.store.snapshot().await, defaults::snapshot());

        reset_all(&ctx, true).await.unwrap();
        assert_eq!(ctx.store.snapshot().await, defaults::snapshot());
    }

    #[tokio::test]
    async fn oversize_upload_leaves_store_alone() {
        let ctx = unlocked().await;
        let before = ctx.store.snapshot().await;

        let err = upload_image(&ctx, vec![0u8; 4 * 1024 * 1024 + 1], Some("image/png"))
            .await
            .unwrap_err();
        assert_eq!(err, "File is too large. Maximum size is 4MB.");
        assert_eq!(ctx.store.snapshot().await, before);
    }

    #[tokio::test]
    async fn upload_returns_data_uri() {
        let ctx = unlocked().await;
        let reply = parse(&upload_image(&ctx, b"GIF89a\x01\0\x01\0".to_vec(), None).await.unwrap());
        assert_eq!(reply["mimeType"], "image/gif");
        assert!(reply["dataUri"].as_str().unwrap().starts_with("data:image/gif;base64,"));
    }

    #[tokio::test]
    async fn generated_background_can_be_adopted() {
        let ctx = unlocked().await;
        let report = parse(&generate_backgrounds(&ctx).await.unwrap());
        assert_eq!(report["attempted"], 3);
        assert_eq!(report["failed"], 2);
        assert_eq!(report["candidates"][0]["style"], "abstract");
        assert_eq!(report["candidates"][0]["image"], "data:image/png;base64,QQ==");

        let status = parse(&generation_status(&ctx).await.unwrap());
        assert_eq!(status["state"], "completed");

        assert!(adopt_background(&ctx, 1).await.is_err());
        adopt_background(&ctx, 0).await.unwrap();

        let hero: HeroContent = ctx.store.section().await;
        assert_eq!(hero.background_image_url.as_str(), "data:image/png;base64,QQ==");
    }

    #[tokio::test]
    async fn menu_items_are_edited_by_id() {
        let ctx = unlocked().await;

        let added = parse(&add_menu_item(&ctx, "food", 1).await.unwrap());
        let id = added["id"].as_str().unwrap().to_string();

        edit_menu_item(&ctx, "food", 1, &id, "price", "11").await.unwrap();
        let food: Vec<MenuCategory> = ctx.store.section().await;
        let item = food[1].items.last().unwrap();
        assert_eq!((item.name.as_str(), item.price.as_str()), ("New Item", "11"));

        let removed = parse(&delete_menu_item(&ctx, "food", 1, &id).await.unwrap());
        assert_eq!(removed["removed"], "New Item");
        assert!(delete_menu_item(&ctx, "food", 1, &id).await.is_err());
        assert!(edit_menu_item(&ctx, "food", 1, "not-a-uuid", "price", "1").await.is_err());
    }

    #[tokio::test]
    async fn cocktail_edits_keep_the_rest_of_the_drinks_menu() {
        let ctx = unlocked().await;
        let before: DrinksMenu = ctx.store.section().await;

        add_menu_item(&ctx, "drinks", 0).await.unwrap();

        let after: DrinksMenu = ctx.store.section().await;
        assert_eq!(after.cocktails[0].items.len(), before.cocktails[0].items.len() + 1);
        assert_eq!(after.bottles, before.bottles);
        assert_eq!(after.header_image_url, before.header_image_url);
        assert!(add_menu_item(&ctx, "hero", 0).await.is_err());
    }
}
