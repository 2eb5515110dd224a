//! State machine tests: selection, dirty tracking, guarded navigation and
//! the creation dialog, driven through test doubles.
use document_versions::manager::Messages;
use document_versions::store::StoreRequest;
use document_versions::test_utils::{RecordingStore, ScriptedPrompt, record, summary};
use document_versions::{
    CreationState, KeyChord, ModalTarget, NewVersion, Rejection, Switch, VersionManager, ViewState,
};

type Manager = VersionManager<RecordingStore, ScriptedPrompt, ViewState>;

fn new_manager() -> Manager {
    VersionManager::new(RecordingStore::new(), ScriptedPrompt::new(), ViewState::default())
}

/// Document 1 with versions 3, 2, 1 listed and version 3 loaded
fn loaded_manager() -> Manager {
    let mut manager = new_manager();
    manager.open_document(1);
    manager.versions_loaded(
        1,
        vec![summary(3, "third"), summary(2, "second"), summary(1, "first")],
    );
    assert!(manager.version_loaded(record(1, 3, "third", "content 3")));
    manager
}

#[test]
fn test_open_document_requests_listing_once() {
    let mut manager = new_manager();
    manager.open_document(7);
    manager.open_document(7);

    assert_eq!(
        manager.store().requests,
        vec![StoreRequest::ListVersions(7)]
    );
    assert_eq!(manager.document_id(), Some(7));
}

#[test]
fn test_listing_selects_newest_and_loads_it() {
    let mut manager = new_manager();
    manager.open_document(1);
    manager.versions_loaded(1, vec![summary(3, "third"), summary(2, "second")]);

    // Optimistic labels straight from the listing
    assert_eq!(manager.selection().selected_version_id(), Some(3));
    assert_eq!(manager.selection().selected_subtitle(), "third");
    assert_eq!(manager.store().fetched(), vec![3]);
    assert!(!manager.selection().comparator_expanded());

    // Authoritative labels from the fetch
    let mut fetched = record(1, 3, "third (renamed)", "content 3");
    fetched.created_at = summary(9, "").created_at;
    assert!(manager.version_loaded(fetched.clone()));

    assert_eq!(manager.buffer(), Some("content 3"));
    assert_eq!(manager.observer().content, "content 3");
    assert_eq!(manager.observer().subtitle, "third (renamed)");
    assert_eq!(manager.observer().date, Some(fetched.created_at));
    assert_eq!(manager.selection().selected_subtitle(), "third (renamed)");
    assert!(!manager.is_dirty());
}

#[test]
fn test_dirty_always_matches_comparison() {
    let mut manager = loaded_manager();

    for edit in ["content 3!", "", "content", "content 3", "something else", "content 3"] {
        manager.content_changed(edit);
        assert_eq!(manager.is_dirty(), edit != "content 3", "after edit {:?}", edit);
    }
}

#[test]
fn test_empty_listing_clears_everything() {
    let mut manager = loaded_manager();
    manager.content_changed("unsaved");
    manager.refresh_directory();
    manager.versions_loaded(1, Vec::new());

    let selection = manager.selection();
    assert_eq!(selection.selected_version_id(), None);
    assert_eq!(selection.selected_subtitle(), "");
    assert_eq!(selection.selected_date(), None);
    assert_eq!(manager.buffer(), Some(""));
    assert_eq!(manager.observer().content, "");
    assert_eq!(manager.observer().subtitle, "");
    assert_eq!(manager.observer().date, None);
}

#[test]
fn test_empty_document_can_get_its_first_version() {
    let mut manager = new_manager();
    manager.open_document(5);
    manager.versions_loaded(5, Vec::new());

    // Nothing loaded counts as changed
    assert!(manager.is_dirty());
    manager.content_changed("first words");
    assert_eq!(manager.add_version(), Ok(()));
    manager.set_subtitle("initial").unwrap();

    let created = manager.submit().expect("submit");
    assert_eq!(created.content, "first words");
    assert_eq!(created.document_id, 5);
}

#[test]
fn test_out_of_order_content_response_is_dropped() {
    let mut manager = loaded_manager();

    assert_eq!(manager.click_version(1), Ok(Switch::Switched));
    assert_eq!(manager.click_version(2), Ok(Switch::Switched));
    assert_eq!(manager.store().fetched(), vec![3, 1, 2]);

    // V1 resolves late, after V2 was selected
    assert!(!manager.version_loaded(record(1, 1, "first", "content 1")));
    assert_eq!(manager.buffer(), Some("content 3"));

    assert!(manager.version_loaded(record(1, 2, "second", "content 2")));
    assert_eq!(manager.buffer(), Some("content 2"));
    assert_eq!(manager.observer().content, "content 2");
    assert_eq!(manager.selection().selected_version_id(), Some(2));

    // A duplicate answer cannot overwrite later edits
    manager.content_changed("content 2 edited");
    assert!(!manager.version_loaded(record(1, 2, "second", "content 2")));
    assert_eq!(manager.buffer(), Some("content 2 edited"));
}

#[test]
fn test_switching_documents_never_leaks_content() {
    let mut manager = new_manager();
    manager.open_document(1);
    manager.versions_loaded(1, vec![summary(3, "doc one")]);

    // Document changes before version 3 arrives
    manager.open_document(2);
    assert!(!manager.version_loaded(record(1, 3, "doc one", "secret of doc 1")));
    assert!(!manager.versions_loaded(1, vec![summary(3, "doc one")]));
    assert_ne!(manager.buffer(), Some("secret of doc 1"));

    assert!(manager.versions_loaded(2, vec![summary(8, "doc two")]));
    assert!(manager.version_loaded(record(2, 8, "doc two", "doc 2 text")));
    assert_eq!(manager.buffer(), Some("doc 2 text"));
    assert_eq!(manager.directory().document_id(), Some(2));
}

#[test]
fn test_switching_to_document_without_versions_empties_buffer() {
    let mut manager = loaded_manager();
    manager.open_document(2);
    manager.versions_loaded(2, Vec::new());

    assert_eq!(manager.buffer(), Some(""));
    assert_eq!(manager.selection().selected_version_id(), None);
}

#[test]
fn test_declined_switch_changes_nothing() {
    let mut manager = loaded_manager();
    manager.content_changed("my edits");

    let selection_before = manager.selection().clone();
    let view_before = manager.observer().clone();
    let requests_before = manager.store().requests.len();
    assert!(manager.is_dirty());

    manager.prompt_mut().answer(false);
    assert_eq!(manager.click_version(1), Ok(Switch::Declined));

    assert_eq!(manager.selection(), &selection_before);
    assert_eq!(manager.observer(), &view_before);
    assert_eq!(manager.buffer(), Some("my edits"));
    assert!(manager.is_dirty());
    assert_eq!(manager.store().requests.len(), requests_before);
    assert_eq!(
        manager.prompt().confirmations,
        vec![Messages::default().discard_changes]
    );
}

#[test]
fn test_confirmed_switch_loads_other_version() {
    let mut manager = loaded_manager();
    manager.content_changed("my edits");

    manager.prompt_mut().answer(true);
    assert_eq!(manager.click_version(1), Ok(Switch::Switched));
    assert_eq!(manager.selection().selected_version_id(), Some(1));
    assert!(manager.selection().comparator_expanded());

    assert!(manager.version_loaded(record(1, 1, "first", "content 1")));
    assert_eq!(manager.buffer(), Some("content 1"));
    assert!(!manager.is_dirty());

    manager.collapse_comparator();
    assert!(!manager.selection().comparator_expanded());
}

#[test]
fn test_clean_switch_does_not_prompt() {
    let mut manager = loaded_manager();
    assert_eq!(manager.click_version(2), Ok(Switch::Switched));
    assert!(manager.prompt().confirmations.is_empty());
}

#[test]
fn test_unknown_version_click() {
    let mut manager = loaded_manager();
    assert_eq!(
        manager.click_version(42),
        Err(Rejection::UnknownVersion { id: 42 })
    );
    assert_eq!(manager.selection().selected_version_id(), Some(3));
}

#[test]
fn test_contentless_version_resets_labels() {
    let mut manager = new_manager();
    manager.open_document(1);
    manager.versions_loaded(1, vec![summary(4, "empty one")]);

    let mut empty = record(1, 4, "empty one", "");
    empty.content = None;
    assert!(manager.version_loaded(empty));

    assert_eq!(manager.buffer(), Some(""));
    assert_eq!(manager.selection().selected_subtitle(), "");
    assert_eq!(manager.selection().selected_date(), None);
    assert_eq!(manager.selection().selected_version_id(), Some(4));
    assert_eq!(manager.observer().subtitle, "");
}

#[test]
fn test_empty_version_content_is_clean() {
    let mut manager = new_manager();
    manager.open_document(1);
    manager.versions_loaded(1, vec![summary(3, "third")]);
    assert!(manager.version_loaded(record(1, 3, "third", "")));

    assert_eq!(manager.buffer(), Some(""));
    assert!(!manager.is_dirty());
    assert_eq!(manager.request_save(), Err(Rejection::NothingToSave));
    assert_eq!(manager.creation_state(), &CreationState::Closed);
    assert_eq!(
        manager.prompt().notices,
        vec![Messages::default().nothing_to_save]
    );

    manager.content_changed("something");
    assert!(manager.is_dirty());
    manager.content_changed("");
    assert!(!manager.is_dirty());
}

#[test]
fn test_submit_with_empty_subtitle_stays_open() {
    let mut manager = loaded_manager();
    manager.content_changed("new text");
    manager.add_version().unwrap();

    assert_eq!(manager.submit(), Err(Rejection::SubtitleRequired));
    assert!(matches!(manager.creation_state(), CreationState::Open { .. }));
    assert_eq!(
        manager.prompt().notices,
        vec![Messages::default().subtitle_required]
    );
    assert!(manager.store().created().is_empty());
}

#[test]
fn test_submit_issues_exactly_one_create_request() {
    let mut manager = new_manager();
    manager.open_document(42);
    manager.versions_loaded(42, vec![summary(1, "base")]);
    manager.version_loaded(record(42, 1, "base", "old text"));

    manager.content_changed("new text");
    manager.add_version().unwrap();
    manager.set_subtitle("draft A").unwrap();

    let expected = NewVersion {
        subtitle: "draft A".to_string(),
        document_id: 42,
        content: "new text".to_string(),
    };
    assert_eq!(manager.submit(), Ok(expected.clone()));
    assert_eq!(manager.store().created(), vec![&expected]);
    assert_eq!(manager.creation_state(), &CreationState::Closed);
    assert_eq!(manager.draft_subtitle(), None);

    // No speculative insertion into the listing
    assert_eq!(manager.directory().len(), 1);

    // A second submit has no dialog to commit
    assert_eq!(manager.submit(), Err(Rejection::DialogClosed));
    assert_eq!(manager.store().created().len(), 1);
}

#[test]
fn test_creation_waits_for_listing() {
    let mut manager = new_manager();
    manager.open_document(3);

    assert_eq!(manager.add_version(), Err(Rejection::Loading));
    assert_eq!(manager.request_save(), Err(Rejection::Loading));
    assert_eq!(manager.creation_state(), &CreationState::Closed);
    assert!(manager.prompt().notices.is_empty());

    manager.versions_loaded(3, Vec::new());
    manager.add_version().unwrap();
    manager.set_subtitle("blank").unwrap();
    let created = manager.submit().expect("submit");
    assert_eq!(created.content, "");
    assert_eq!(created.document_id, 3);
}

#[test]
fn test_document_switch_discards_draft_and_content() {
    let mut manager = new_manager();
    manager.open_document(1);
    manager.versions_loaded(1, vec![summary(1, "base")]);
    manager.version_loaded(record(1, 1, "base", "doc one text"));

    manager.content_changed("doc one text edited");
    manager.add_version().unwrap();
    manager.set_subtitle("draft A").unwrap();

    manager.open_document(2);
    assert_eq!(manager.creation_state(), &CreationState::Closed);
    assert_eq!(manager.buffer(), Some(""));
    assert_eq!(manager.observer().content, "");
    assert_eq!(manager.observer().subtitle, "");
    assert_eq!(manager.observer().date, None);
    assert_eq!(manager.selection().selected_version_id(), None);

    assert_eq!(manager.submit(), Err(Rejection::DialogClosed));
    assert_eq!(manager.add_version(), Err(Rejection::Loading));
    assert!(manager.store().created().is_empty());
}

#[test]
fn test_content_of_document_never_saved_under_another() {
    let mut manager = new_manager();
    manager.open_document(1);
    manager.versions_loaded(1, vec![summary(1, "base")]);
    manager.version_loaded(record(1, 1, "base", "doc one text"));
    manager.content_changed("doc one text edited");

    manager.open_document(2);
    manager.versions_loaded(2, vec![summary(5, "two")]);

    // Listing applied, content still in flight
    manager.content_changed("typed in doc two");
    manager.add_version().unwrap();
    manager.set_subtitle("mine").unwrap();
    let created = manager.submit().expect("submit");
    assert_eq!(created.document_id, 2);
    assert_eq!(created.content, "typed in doc two");
}

#[test]
fn test_submit_without_document_is_rejected() {
    let mut manager = new_manager();
    manager.content_changed("text");
    manager.add_version().unwrap();
    manager.set_subtitle("orphan").unwrap();

    assert_eq!(manager.submit(), Err(Rejection::NoDocument));
    assert_eq!(manager.draft_subtitle(), Some("orphan"));
    assert!(manager.store().created().is_empty());
}

#[test]
fn test_repeated_save_while_clean_notifies_once() {
    let mut manager = loaded_manager();

    assert_eq!(manager.request_save(), Err(Rejection::NothingToSave));
    assert_eq!(manager.request_save(), Err(Rejection::NothingToSave));

    assert_eq!(manager.prompt().notices.len(), 1);
    assert_eq!(manager.creation_state(), &CreationState::Closed);
}

#[test]
fn test_save_notice_rearms_after_edit() {
    let mut manager = loaded_manager();
    manager.request_save().unwrap_err();

    manager.content_changed("content 3 changed");
    manager.content_changed("content 3");
    manager.request_save().unwrap_err();

    assert_eq!(manager.prompt().notices.len(), 2);
}

#[test]
fn test_save_notice_rearms_after_other_input() {
    let mut manager = loaded_manager();
    manager.request_save().unwrap_err();

    manager.collapse_comparator();
    manager.request_save().unwrap_err();

    assert!(!manager.handle_key(&KeyChord::plain('x')));
    assert!(manager.handle_key(&KeyChord::ctrl('s')));
    assert!(manager.handle_key(&KeyChord::ctrl('s')));

    manager.click_version(2).unwrap();
    manager.request_save().unwrap_err();

    assert_eq!(manager.prompt().notices.len(), 4);
}

#[test]
fn test_save_while_dirty_opens_dialog_once() {
    let mut manager = loaded_manager();
    manager.content_changed("edited");

    assert_eq!(manager.request_save(), Ok(()));
    manager.set_subtitle("half typed").unwrap();

    assert_eq!(manager.request_save(), Ok(()));
    assert_eq!(manager.draft_subtitle(), Some("half typed"));
    assert!(manager.prompt().notices.is_empty());
}

#[test]
fn test_save_shortcut_routing() {
    let mut manager = loaded_manager();
    manager.content_changed("edited");

    assert!(!manager.handle_key(&KeyChord::plain('s')));
    assert_eq!(manager.creation_state(), &CreationState::Closed);

    assert!(manager.handle_key(&KeyChord::meta('s')));
    assert!(matches!(manager.creation_state(), CreationState::Open { .. }));
}

#[test]
fn test_save_shortcut_sees_current_dirty_state() {
    let mut manager = loaded_manager();

    assert!(manager.handle_key(&KeyChord::ctrl('s')));
    assert_eq!(manager.creation_state(), &CreationState::Closed);

    manager.content_changed("now dirty");
    assert!(manager.handle_key(&KeyChord::ctrl('s')));
    assert!(matches!(manager.creation_state(), CreationState::Open { .. }));
}

#[test]
fn test_add_version_requires_changes() {
    let mut manager = loaded_manager();

    assert_eq!(manager.add_version(), Err(Rejection::NothingChanged));
    assert_eq!(manager.add_version(), Err(Rejection::NothingChanged));
    assert_eq!(manager.creation_state(), &CreationState::Closed);
    assert_eq!(
        manager.prompt().notices,
        vec![
            Messages::default().nothing_changed,
            Messages::default().nothing_changed
        ]
    );
}

#[test]
fn test_modal_dismissal() {
    let mut manager = loaded_manager();
    manager.content_changed("edited");
    manager.add_version().unwrap();
    manager.set_subtitle("draft").unwrap();

    assert!(!manager.modal_click(ModalTarget::Content));
    assert_eq!(manager.draft_subtitle(), Some("draft"));

    assert!(manager.modal_click(ModalTarget::Backdrop));
    assert_eq!(manager.creation_state(), &CreationState::Closed);

    manager.add_version().unwrap();
    assert_eq!(manager.draft_subtitle(), Some(""));
    assert!(manager.cancel_creation());
    assert!(manager.store().created().is_empty());
}

#[test]
fn test_refresh_reselects_newest() {
    let mut manager = loaded_manager();
    manager.click_version(1).unwrap();
    manager.version_loaded(record(1, 1, "first", "content 1"));

    manager.refresh_directory();
    manager.versions_loaded(
        1,
        vec![
            summary(4, "fourth"),
            summary(3, "third"),
            summary(2, "second"),
            summary(1, "first"),
        ],
    );

    assert_eq!(manager.selection().selected_version_id(), Some(4));
    assert_eq!(manager.store().fetched().last(), Some(&4));
}

#[test]
fn test_localized_messages() {
    let messages = Messages {
        nothing_to_save: "수정된 내용이 없습니다.".to_string(),
        ..Messages::default()
    };
    let mut manager = new_manager().with_messages(messages);
    manager.open_document(1);
    manager.versions_loaded(1, vec![summary(1, "a")]);
    manager.version_loaded(record(1, 1, "a", "text"));

    manager.request_save().unwrap_err();
    assert_eq!(manager.prompt().notices, vec!["수정된 내용이 없습니다."]);
}
