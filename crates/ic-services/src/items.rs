//! Item lifecycle: create, owner-only edit/delete, and the friends feed.

use chrono::Utc;
use ic_core::forms::{ItemDraft, ItemForm};
use ic_core::{
    AppError, Item, ItemRepo, Page, PageRequest, Result, UserRef, ITEMS_PER_PAGE,
};
use std::sync::Arc;
use uuid::Uuid;

pub struct ItemService {
    items: Arc<dyn ItemRepo>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepo>) -> Self {
        Self { items }
    }

    pub async fn create(&self, owner: &UserRef, form: &ItemForm) -> Result<Item> {
        let draft = form.validate().map_err(AppError::Validation)?;
        let now = Utc::now();
        let mut item = Item {
            id: Uuid::now_v7(),
            owner: owner.clone(),
            title: String::new(),
            description: String::new(),
            photo: None,
            category: Default::default(),
            size: None,
            condition: Default::default(),
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        apply(&mut item, draft);
        self.items.insert_item(&item).await?;

        tracing::info!(item_id = %item.id, owner = %owner.username, "item posted");
        Ok(item)
    }

    pub async fn get(&self, id: Uuid) -> Result<Item> {
        self.items
            .get_item(id)
            .await?
            .ok_or_else(|| AppError::not_found("Item", id))
    }

    /// Loads an item for its edit form; only the owner may open it.
    pub async fn editable(&self, actor: Uuid, id: Uuid) -> Result<Item> {
        let item = self.get(id).await?;
        if !item.is_owned_by(actor) {
            return Err(AppError::unauthorized("You can only edit your own items."));
        }
        Ok(item)
    }

    pub async fn update(&self, actor: Uuid, id: Uuid, form: &ItemForm) -> Result<Item> {
        let mut item = self.editable(actor, id).await?;
        let draft = form.validate().map_err(AppError::Validation)?;
        apply(&mut item, draft);
        item.updated_at = Utc::now();
        self.items.update_item(&item).await?;

        tracing::info!(item_id = %item.id, "item updated");
        Ok(item)
    }

    /// Loads an item for its delete confirmation; only the owner may open it.
    pub async fn deletable(&self, actor: Uuid, id: Uuid) -> Result<Item> {
        let item = self.get(id).await?;
        if !item.is_owned_by(actor) {
            return Err(AppError::unauthorized("You can only delete your own items."));
        }
        Ok(item)
    }

    pub async fn delete(&self, actor: Uuid, id: Uuid) -> Result<Item> {
        let item = self.deletable(actor, id).await?;
        self.items.delete_item(item.id).await?;

        tracing::info!(item_id = %item.id, "item deleted");
        Ok(item)
    }

    /// Available items of the viewer and of the viewer's friends, newest first.
    pub async fn feed(&self, viewer: Uuid, page: Option<&str>) -> Result<Page<Item>> {
        let total = self.items.count_feed(viewer).await?;
        let request = PageRequest::resolve(page, ITEMS_PER_PAGE, total);
        let items = self
            .items
            .list_feed(viewer, request.limit(), request.offset())
            .await?;
        Ok(Page::new(items, request, total))
    }

    /// Every item the owner listed, available or not.
    pub async fn owned_by(&self, owner: Uuid, page: Option<&str>) -> Result<Page<Item>> {
        let total = self.items.count_owned(owner, false).await?;
        let request = PageRequest::resolve(page, ITEMS_PER_PAGE, total);
        let items = self
            .items
            .list_owned(owner, false, request.limit(), request.offset())
            .await?;
        Ok(Page::new(items, request, total))
    }
}

fn apply(item: &mut Item, draft: ItemDraft) {
    item.title = draft.title;
    item.description = draft.description;
    item.photo = draft.photo;
    item.category = draft.category;
    item.size = draft.size;
    item.condition = draft.condition;
}
