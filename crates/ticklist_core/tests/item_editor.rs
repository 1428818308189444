mod common;

use common::{FlakyStore, KEY};
use std::sync::Arc;
use ticklist_core::{
    decode, ColorScheme, EditorState, Item, ItemEditor, ItemId, ItemRepository, ItemStore,
    MemoryItemStore, NavigationRequest, RepoError, SaveOutcome, TodoApp,
};

fn editor_over<S: ItemStore>(store: S) -> ItemEditor<S> {
    ItemEditor::new(Arc::new(ItemRepository::new(store, KEY)))
}

async fn persisted(store: &MemoryItemStore) -> Vec<Item> {
    decode(&store.get(KEY).await.unwrap().unwrap()).unwrap()
}

#[tokio::test]
async fn scenario_edit_title_keeps_completed_flag() {
    let store = Arc::new(MemoryItemStore::with_entry(
        KEY,
        r#"[{"id":5,"title":"old","completed":true}]"#,
    ));
    let mut editor = editor_over(Arc::clone(&store));

    let loaded = editor.load_item(ItemId(5)).await.unwrap();
    assert_eq!(loaded.as_ref().map(|item| item.title.as_str()), Some("old"));

    assert!(editor.edit_title("new"));
    let outcome = editor.save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
    assert_eq!(outcome.navigation(), NavigationRequest::Back);
    assert_eq!(editor.state(), &EditorState::Done);

    assert_eq!(
        persisted(&store).await,
        vec![Item {
            id: ItemId(5),
            title: "new".to_string(),
            completed: true,
        }]
    );
}

#[tokio::test]
async fn save_changes_only_the_edited_title() {
    let store = Arc::new(MemoryItemStore::with_entry(
        KEY,
        r#"[{"id":1,"title":"a","completed":false},{"id":2,"title":"b","completed":true},{"id":3,"title":"c","completed":false}]"#,
    ));
    let before = persisted(&store).await;
    let mut editor = editor_over(Arc::clone(&store));

    editor.load_item(ItemId(2)).await.unwrap();
    editor.edit_title("X");
    editor.save().await.unwrap();

    let after = persisted(&store).await;
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.completed, new.completed);
        if old.id == ItemId(2) {
            assert_eq!(new.title, "X");
        } else {
            assert_eq!(old.title, new.title);
        }
    }
}

#[tokio::test]
async fn edit_title_alone_does_not_persist() {
    let original = r#"[{"id":1,"title":"a","completed":false}]"#;
    let store = Arc::new(MemoryItemStore::with_entry(KEY, original));
    let mut editor = editor_over(Arc::clone(&store));

    editor.load_item(ItemId(1)).await.unwrap();
    editor.edit_title("draft");

    assert_eq!(editor.item().unwrap().title, "draft");
    assert_eq!(store.get(KEY).await.unwrap().as_deref(), Some(original));
}

#[tokio::test]
async fn unknown_id_loads_empty_buffer() {
    let mut editor = editor_over(MemoryItemStore::with_entry(
        KEY,
        r#"[{"id":1,"title":"a","completed":false}]"#,
    ));

    assert_eq!(editor.load_item(ItemId(7)).await.unwrap(), None);
    assert_eq!(editor.state(), &EditorState::Ready(None));
}

#[tokio::test]
async fn item_deleted_before_save_is_a_silent_pass_through() {
    let store = Arc::new(MemoryItemStore::with_entry(
        KEY,
        r#"[{"id":1,"title":"a","completed":false},{"id":2,"title":"b","completed":false}]"#,
    ));
    let repo = Arc::new(ItemRepository::new(Arc::clone(&store), KEY));
    let mut editor = ItemEditor::new(Arc::clone(&repo));

    editor.load_item(ItemId(1)).await.unwrap();
    editor.edit_title("renamed");
    assert!(repo.remove(ItemId(1)).await.unwrap());

    let outcome = editor.save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::NotFound);
    assert_eq!(outcome.navigation(), NavigationRequest::Back);
    assert_eq!(persisted(&store).await, vec![Item::new(2, "b")]);
}

#[tokio::test]
async fn failed_save_can_be_retried() {
    let store = Arc::new(FlakyStore::with_snapshot(
        r#"[{"id":1,"title":"a","completed":false}]"#,
    ));
    let mut editor = editor_over(Arc::clone(&store));
    editor.load_item(ItemId(1)).await.unwrap();
    editor.edit_title("b");

    store.fail_writes(true);
    assert!(matches!(editor.save().await, Err(RepoError::Storage(_))));
    assert_eq!(editor.state(), &EditorState::Ready(Some(Item::new(1, "b"))));

    store.fail_writes(false);
    assert_eq!(editor.save().await.unwrap(), SaveOutcome::Saved);
    let saved = decode(&store.raw().await.unwrap()).unwrap();
    assert_eq!(saved, vec![Item::new(1, "b")]);
}

#[tokio::test]
async fn unreadable_store_leaves_editor_empty() {
    let store = Arc::new(FlakyStore::with_snapshot("[]"));
    store.fail_reads(true);
    let mut editor = editor_over(Arc::clone(&store));

    assert!(matches!(
        editor.load_item(ItemId(1)).await,
        Err(RepoError::Storage(_))
    ));
    assert_eq!(editor.state(), &EditorState::Ready(None));
}

#[tokio::test]
async fn list_sees_editor_change_after_reload() {
    let app = TodoApp::in_memory(ColorScheme::Dark);
    let list = app.list_synchronizer();
    list.load().await.unwrap();
    let target = list.add("draft title").await.unwrap();

    let route = list.open_editor(target.id);
    let NavigationRequest::OpenEditor(id) = route else {
        panic!("expected editor route, got {route:?}");
    };
    let mut editor = app.item_editor();
    editor.load_item(id).await.unwrap();
    editor.edit_title("final title");
    editor.save().await.unwrap();

    assert_eq!(list.get(target.id).unwrap().title, "draft title");
    list.load().await.unwrap();
    assert_eq!(list.get(target.id).unwrap().title, "final title");
}

#[tokio::test]
async fn stale_list_persist_before_reload_overwrites_editor_change() {
    let app = TodoApp::in_memory(ColorScheme::Light);
    let list = app.list_synchronizer();
    list.load().await.unwrap();

    let mut editor = app.item_editor();
    editor.load_item(ItemId(1)).await.unwrap();
    editor.edit_title("edited elsewhere");
    editor.save().await.unwrap();

    // Last writer wins: the list view never reloaded.
    list.toggle_completed(ItemId(2)).await.unwrap();
    let stored = app.repository().get_by_id(ItemId(1)).await.unwrap().unwrap();
    assert_ne!(stored.title, "edited elsewhere");
}
