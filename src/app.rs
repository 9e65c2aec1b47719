//! Application state and core logic

use crate::config::TuiConfig;
use crate::document::{Entry, FieldPath, FieldSpec, Identified, Section};
use crate::platform::{is_command, is_move_modifier};
use crate::state::transition::BeginOutcome;
use crate::state::{
    AppState, FieldValue, Focus, FormField, PendingMutation, SectionCursor, TransitionKind,
    TransitionTracker,
};
use crate::store::{Action, DocumentStorage, DocumentStore, IdGenerator};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Where an edited field value is written
#[derive(Debug, Clone, PartialEq)]
enum FieldTarget {
    /// Into the document, dispatched through the store
    Document(FieldPath),
    /// Into the add-item draft, relative to the entry
    Draft(FieldPath),
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Owner of the resume document
    pub store: DocumentStore,
    /// Pending delete/move animations
    pub transitions: TransitionTracker,
    storage: Box<dyn DocumentStorage>,
    config: TuiConfig,
    /// Whether quitting writes unsaved changes
    autosave: bool,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App, loading the document from `storage`
    pub async fn new(
        config: TuiConfig,
        storage: Box<dyn DocumentStorage>,
        ids: Box<dyn IdGenerator>,
    ) -> Result<Self> {
        let mut load_error = None;
        let document = match storage.load().await {
            Ok(Some(document)) => document,
            Ok(None) => Default::default(),
            Err(e) => {
                load_error = Some(format!(
                    "Failed to load {}:\n{e}\nStarting with an empty resume.",
                    storage.location()
                ));
                Default::default()
            }
        };

        let mut store = DocumentStore::new(document, ids);
        let mut state = AppState::new(|| store.fresh_id());
        state.current_section = config.start_section();
        state.sidebar_index = state.current_section.index();

        // Never overwrite a file we could not read unless asked to
        let autosave = load_error.is_none();
        if let Some(message) = load_error {
            state.push_error(message);
        }

        Ok(Self {
            state,
            store,
            transitions: TransitionTracker::new(config.animation_duration()),
            storage,
            config,
            autosave,
            quit: false,
        })
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Configuration with the current tab remembered
    pub fn config(&self) -> TuiConfig {
        TuiConfig {
            last_section: Some(self.state.current_section.key().to_string()),
            ..self.config.clone()
        }
    }

    pub fn storage_location(&self) -> String {
        self.storage.location()
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        if is_command(key.modifiers) {
            match key.code {
                KeyCode::Char('s') => {
                    self.save().await;
                    return Ok(());
                }
                KeyCode::Char('r') => {
                    self.reload().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        match self.state.focus {
            Focus::Sidebar => self.handle_sidebar_key(key),
            Focus::Section => self.handle_section_key(key),
        }
        Ok(())
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.state.move_sidebar_up(),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_sidebar_down(),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                if let Some(section) = Section::from_index(self.state.sidebar_index) {
                    self.select_section(section);
                    self.state.focus = Focus::Section;
                }
            }
            // Number keys jump straight into a tab
            KeyCode::Char(c) => {
                let section = c
                    .to_digit(10)
                    .and_then(|d| (d as usize).checked_sub(1))
                    .and_then(Section::from_index);
                if let Some(section) = section {
                    self.select_section(section);
                    self.state.focus = Focus::Section;
                }
            }
            _ => {}
        }
    }

    fn handle_section_key(&mut self, key: KeyEvent) {
        if is_command(key.modifiers) && key.code == KeyCode::Char('y') {
            self.copy_current_item();
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.state.focus = Focus::Sidebar;
                self.state.sidebar_index = self.state.current_section.index();
            }
            KeyCode::Up if is_move_modifier(key.modifiers) => {
                self.request_transition(TransitionKind::MoveUp)
            }
            KeyCode::Down if is_move_modifier(key.modifiers) => {
                self.request_transition(TransitionKind::MoveDown)
            }
            KeyCode::Up | KeyCode::BackTab => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Tab => self.move_cursor(1),
            KeyCode::Delete => self.request_transition(TransitionKind::Remove),
            _ => self.handle_row_key(key),
        }
    }

    /// Keys acting on the focused row
    fn handle_row_key(&mut self, key: KeyEvent) {
        let section = self.state.current_section;
        let activate = matches!(key.code, KeyCode::Enter | KeyCode::Char(' '));
        let cursor = self.state.current().cursor;

        match cursor {
            SectionCursor::AddHeader if activate => {
                self.state.current_mut().add_form.toggle();
                self.snap_cursor();
            }
            SectionCursor::AddSubmit if activate => self.submit_draft(),
            SectionCursor::AddField(index)
                if key.code == KeyCode::Enter && !self.is_multiline_add_field(index) =>
            {
                self.submit_draft()
            }
            SectionCursor::Item(index) if activate && !section.is_single_field() => {
                if let Some(id) = self.item_id(index) {
                    self.state.current_mut().toggle_expanded(&id);
                    self.snap_cursor();
                }
            }
            _ => self.edit_focused_field(key),
        }
    }

    fn is_multiline_add_field(&self, index: usize) -> bool {
        self.state
            .current_section
            .field(index)
            .is_some_and(|f| f.is_multiline)
    }

    fn move_cursor(&mut self, delta: isize) {
        let document = self.store.document();
        self.state.current_mut().move_cursor(delta, document);
    }

    fn snap_cursor(&mut self) {
        let document = self.store.document();
        self.state.current_mut().snap_cursor(document);
    }

    fn item_id(&self, index: usize) -> Option<String> {
        self.store
            .document()
            .ids(self.state.current_section)
            .get(index)
            .map(|id| id.to_string())
    }

    /// The editable field under the cursor and where its value goes
    fn focused_field(&self) -> Option<(FieldTarget, FormField)> {
        let section = self.state.current_section;
        let tab = self.state.current();
        let document = self.store.document();
        let config = document.section_config(section);

        match tab.cursor {
            SectionCursor::Enable => Some((
                FieldTarget::Document(FieldPath::config(section).key("enable")),
                FormField::toggle("enable", "section.enable.label", config.enable),
            )),
            SectionCursor::Heading => Some((
                FieldTarget::Document(FieldPath::config(section).key("heading")),
                FormField::text(&FieldSpec::HEADING, &config.heading),
            )),
            SectionCursor::AddField(index) => {
                let field = tab.add_form.field(index)?;
                Some((
                    FieldTarget::Draft(FieldPath::root().key(field.name.clone())),
                    field,
                ))
            }
            SectionCursor::Item(index) if section.is_single_field() => {
                let spec = section.field(0)?;
                let entry = document.entry(section, index)?;
                Some((
                    FieldTarget::Document(FieldPath::entry(section, index).key(spec.name)),
                    FormField::for_entry(spec, &entry),
                ))
            }
            SectionCursor::ItemEnable(index) => match document.entry(section, index)? {
                Entry::Education(e) => Some((
                    FieldTarget::Document(FieldPath::entry(section, index).key("enable")),
                    FormField::toggle("enable", "item.enable", e.enable),
                )),
                Entry::Skill(_) => None,
            },
            SectionCursor::ItemField(index, field) => {
                let spec = section.field(field)?;
                let entry = document.entry(section, index)?;
                Some((
                    FieldTarget::Document(FieldPath::entry(section, index).key(spec.name)),
                    FormField::for_entry(spec, &entry),
                ))
            }
            _ => None,
        }
    }

    /// Apply a typing key to the focused field and write the result through
    fn edit_focused_field(&mut self, key: KeyEvent) {
        let Some((target, mut field)) = self.focused_field() else {
            return;
        };
        let typing = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
        let before = field.value.clone();
        let is_toggle = matches!(before, FieldValue::Toggle(_));

        match (is_toggle, key.code) {
            (true, KeyCode::Enter | KeyCode::Char(' ')) => field.toggle_checked(),
            (true, _) => return,
            (false, KeyCode::Char(c)) if typing => field.push_char(c),
            (false, KeyCode::Enter) => field.push_char('\n'),
            (false, KeyCode::Backspace) => field.pop_char(),
            _ => return,
        }

        if field.value != before {
            self.write_field(target, field.to_json());
        }
    }

    fn write_field(&mut self, target: FieldTarget, value: serde_json::Value) {
        match target {
            FieldTarget::Document(path) => self.apply(Action::SetField { path, value }),
            FieldTarget::Draft(path) => {
                if let Err(e) = self.state.current_mut().add_form.edit(&path, value) {
                    self.push_error(format!("Failed to edit draft: {e}"));
                }
            }
        }
    }

    /// Dispatch one action, surfacing failures in the error dialog
    fn apply(&mut self, action: Action) {
        match self.store.dispatch(action) {
            Ok(true) => {
                self.state.dirty = true;
                let document = self.store.document();
                for section in Section::ALL {
                    self.state.section_mut(section).prune_expanded(document);
                }
            }
            Ok(false) => {}
            Err(e) => self.push_error(format!("Update failed: {e}")),
        }
    }

    fn submit_draft(&mut self) {
        let section = self.state.current_section;
        let store = &mut self.store;
        let form = &mut self.state.section_mut(section).add_form;
        let Some(entry) = form.submit(|| store.fresh_id()) else {
            return;
        };
        let stays_open = form.is_open();

        tracing::debug!("Adding {} entry {}", section.key(), entry.id());
        self.apply(Action::AddItem { entry });

        let tab = self.state.current_mut();
        tab.cursor = if stays_open {
            SectionCursor::AddField(0)
        } else {
            SectionCursor::AddHeader
        };
    }

    /// Start a delete or move animation for the item under the cursor
    fn request_transition(&mut self, kind: TransitionKind) {
        let section = self.state.current_section;
        let Some(index) = self.state.current().cursor.item_index() else {
            return;
        };
        let Some(id) = self.item_id(index) else {
            return;
        };
        let len = self.store.document().len(section);

        // Edge moves change nothing, so there is nothing to animate
        let skip = match kind {
            TransitionKind::MoveUp => index == 0,
            TransitionKind::MoveDown => index + 1 >= len,
            TransitionKind::Remove => false,
        };

        let mutation = PendingMutation::new(section, id.clone(), kind);
        match self.transitions.begin(mutation, skip, Instant::now()) {
            BeginOutcome::CommitNow(mutation) => self.commit(mutation),
            BeginOutcome::Started => {}
            // Asking again fast-forwards the running animation
            BeginOutcome::AlreadyAnimating => {
                if let Some(mutation) = self.transitions.complete(section, &id) {
                    self.commit(mutation);
                }
            }
        }
    }

    /// Commit mutations whose animation finished
    pub fn tick(&mut self, now: Instant) {
        for mutation in self.transitions.poll(now) {
            self.commit(mutation);
        }
    }

    /// Commit every pending mutation right away
    pub fn finish_transitions(&mut self) {
        for mutation in self.transitions.finish_all() {
            self.commit(mutation);
        }
    }

    /// Dispatch a mutation whose animation completed, keeping the cursor on
    /// the moved item
    pub fn commit(&mut self, mutation: PendingMutation) {
        let section = mutation.section;
        if section != self.state.current_section || !self.store.contains(section, &mutation.id) {
            tracing::debug!(
                "Skipping {:?} of {}, no longer shown",
                mutation.kind,
                mutation.id
            );
            return;
        }

        let id = mutation.id.clone();
        let follows = self
            .state
            .current()
            .cursor
            .item_index()
            .and_then(|i| self.item_id(i))
            .is_some_and(|focused| focused == id);

        self.apply(mutation.into_action());

        let document = self.store.document();
        let tab = self.state.section_mut(section);
        if follows {
            if let Some(position) = document.position(section, &id) {
                tab.cursor = match tab.cursor {
                    SectionCursor::Item(_) => SectionCursor::Item(position),
                    SectionCursor::ItemEnable(_) => SectionCursor::ItemEnable(position),
                    SectionCursor::ItemField(_, f) => SectionCursor::ItemField(position, f),
                    other => other,
                };
            }
        }
        tab.snap_cursor(document);
    }

    /// Switch tabs. The tab left behind loses its draft and pending animations.
    pub fn select_section(&mut self, section: Section) {
        let previous = self.state.current_section;
        if previous == section {
            return;
        }

        let dropped = self.transitions.unmount(previous);
        if dropped > 0 {
            tracing::warn!(
                "Dropped {dropped} pending change(s) in {} after leaving the tab",
                previous.key()
            );
        }
        let fresh = self.store.fresh_id();
        self.state.section_mut(previous).add_form.discard(fresh);

        self.state.current_section = section;
        self.state.sidebar_index = section.index();
        self.snap_cursor();
        tracing::debug!("Switched to {}", section.key());
    }

    /// Write the document to storage
    pub async fn save(&mut self) {
        self.finish_transitions();
        match self.storage.save(self.store.document()).await {
            Ok(()) => {
                self.state.dirty = false;
                self.autosave = true;
                self.state.status_message = Some(format!(
                    "Saved {}",
                    chrono::Local::now().format("%H:%M:%S")
                ));
            }
            Err(e) => self.push_error(format!("Failed to save:\n{e}")),
        }
    }

    /// Replace the document with the stored one, dropping unsaved changes
    pub async fn reload(&mut self) {
        let document = match self.storage.load().await {
            Ok(document) => document.unwrap_or_default(),
            Err(e) => {
                self.push_error(format!("Failed to reload:\n{e}"));
                return;
            }
        };

        let mut dropped = 0;
        for section in Section::ALL {
            dropped += self.transitions.unmount(section);
            let fresh = self.store.fresh_id();
            self.state.section_mut(section).add_form.discard(fresh);
        }
        if dropped > 0 {
            tracing::debug!("Reload dropped {dropped} pending change(s)");
        }
        self.apply(Action::Replace(document));
        self.state.dirty = false;
        self.autosave = true;
        for section in Section::ALL {
            let document = self.store.document();
            let tab = self.state.section_mut(section);
            tab.prune_expanded(document);
            tab.snap_cursor(document);
        }
        self.state.status_message = Some("Reloaded".to_string());
    }

    /// Save unsaved changes on the way out
    pub async fn save_on_exit(&mut self) -> Result<()> {
        self.finish_transitions();
        if !self.state.dirty || !self.autosave {
            return Ok(());
        }
        self.storage.save(self.store.document()).await?;
        self.state.dirty = false;
        Ok(())
    }

    fn copy_current_item(&mut self) {
        let section = self.state.current_section;
        let Some(entry) = self
            .state
            .current()
            .cursor
            .item_index()
            .and_then(|i| self.store.document().entry(section, i))
        else {
            return;
        };

        match self.copy_to_clipboard(&entry.to_plain_text()) {
            Ok(()) => {
                self.state.status_message = Some(format!("Copied \"{}\"", entry.summary()));
            }
            Err(e) => self.push_error(format!("Failed to copy: {e}")),
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, EducationEntry, SkillEntry};
    use crate::error::StoreError;
    use crate::store::{MockDocumentStorage, SequentialIds};
    use std::path::PathBuf;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn document() -> Document {
        let mut document = Document::default();
        document.data.skills = ["Go", "Rust", "Zig"]
            .iter()
            .enumerate()
            .map(|(i, s)| SkillEntry {
                id: format!("s{i}"),
                skill: s.to_string(),
                ..Default::default()
            })
            .collect();
        document.data.education = vec![EducationEntry {
            id: "e0".to_string(),
            institution: "MIT".to_string(),
            major: "Physics".to_string(),
            ..Default::default()
        }];
        document
    }

    fn storage_with(document: Option<Document>) -> MockDocumentStorage {
        let mut storage = MockDocumentStorage::new();
        storage
            .expect_load()
            .returning(move || Ok(document.clone()));
        storage
            .expect_location()
            .returning(|| "/tmp/resume.json".to_string());
        storage
    }

    async fn app_with(storage: MockDocumentStorage, animation_ms: u64) -> App {
        let config = TuiConfig {
            animation_ms: Some(animation_ms),
            last_section: Some("skills".to_string()),
            document_path: Some(PathBuf::from("/tmp/resume.json")),
        };
        App::new(config, Box::new(storage), Box::new(SequentialIds::new("id")))
            .await
            .unwrap()
    }

    async fn skills_app(animation_ms: u64) -> App {
        let mut app = app_with(storage_with(Some(document())), animation_ms).await;
        app.state.focus = Focus::Section;
        app
    }

    fn skills(app: &App) -> Vec<String> {
        app.store
            .document()
            .data
            .skills
            .iter()
            .map(|s| s.skill.clone())
            .collect()
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    mod startup {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_opens_configured_section() {
            let app = app_with(storage_with(Some(document())), 0).await;
            assert_eq!(app.state.current_section, Section::Skills);
            assert_eq!(app.state.sidebar_index, 1);
            assert_eq!(app.store.document().len(Section::Skills), 3);
        }

        #[tokio::test]
        async fn test_missing_document_starts_empty() {
            let app = app_with(storage_with(None), 0).await;
            assert_eq!(app.store.document(), &Document::default());
            assert!(!app.state.has_errors());
        }

        #[tokio::test]
        async fn test_load_failure_is_reported_and_disables_autosave() {
            let mut storage = MockDocumentStorage::new();
            storage.expect_load().returning(|| {
                Err(StoreError::Io {
                    path: PathBuf::from("/tmp/resume.json"),
                    source: std::io::Error::other("denied"),
                })
            });
            storage
                .expect_location()
                .returning(|| "/tmp/resume.json".to_string());
            storage.expect_save().never();

            let mut app = app_with(storage, 0).await;
            assert!(app.state.has_errors());
            assert!(app.state.current_error().unwrap().contains("/tmp/resume.json"));

            app.state.dirty = true;
            app.save_on_exit().await.unwrap();
        }
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_sidebar_enter_focuses_section() {
            let mut app = app_with(storage_with(Some(document())), 0).await;
            app.handle_key(key(KeyCode::Up)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(app.state.focus, Focus::Section);
            assert_eq!(app.state.current_section, Section::Education);

            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert_eq!(app.state.focus, Focus::Sidebar);
        }

        #[tokio::test]
        async fn test_q_quits_from_sidebar_only() {
            let mut app = skills_app(0).await;
            app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
            assert!(!app.should_quit());

            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn test_error_dialog_swallows_keys_until_dismissed() {
            let mut app = skills_app(0).await;
            app.push_error("boom");
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            assert_eq!(app.state.current().cursor, SectionCursor::Enable);
            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert!(!app.state.has_errors());
            assert_eq!(app.state.focus, Focus::Section);
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_toggle_section_enable() {
            let mut app = skills_app(0).await;
            app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
            assert!(!app.store.document().config.skills.enable);
            assert!(app.state.dirty);
        }

        #[tokio::test]
        async fn test_heading_edits_dispatch_per_keystroke() {
            let mut app = skills_app(0).await;
            app.state.current_mut().cursor = SectionCursor::Heading;
            app.handle_key(key(KeyCode::Backspace)).await.unwrap();
            type_text(&mut app, "z").await;
            assert_eq!(app.store.document().config.skills.heading, "Skillz");
            assert_eq!(app.store.revision(), 2);
        }

        #[tokio::test]
        async fn test_skill_row_is_inline_editable() {
            let mut app = skills_app(0).await;
            app.state.current_mut().cursor = SectionCursor::Item(0);
            type_text(&mut app, "lang").await;
            assert_eq!(skills(&app)[0], "Golang");
        }

        #[tokio::test]
        async fn test_control_chars_are_not_typed() {
            let mut app = skills_app(0).await;
            app.state.current_mut().cursor = SectionCursor::Item(0);
            app.handle_key(ctrl(KeyCode::Char('x'))).await.unwrap();
            assert_eq!(skills(&app)[0], "Go");
            assert_eq!(app.store.revision(), 0);
        }

        #[tokio::test]
        async fn test_expand_education_and_edit_field() {
            let mut app = skills_app(0).await;
            app.select_section(Section::Education);
            app.state.current_mut().cursor = SectionCursor::Item(0);
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(app.state.current().is_expanded("e0"));

            app.handle_key(key(KeyCode::Down)).await.unwrap();
            assert_eq!(app.state.current().cursor, SectionCursor::ItemEnable(0));
            app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
            assert!(!app.store.document().data.education[0].enable);

            app.handle_key(key(KeyCode::Down)).await.unwrap();
            type_text(&mut app, " Boston").await;
            assert_eq!(app.store.document().data.education[0].institution, "MIT Boston");
        }

        #[tokio::test]
        async fn test_multiline_description_takes_enter() {
            let mut app = skills_app(0).await;
            app.select_section(Section::Education);
            app.state.current_mut().toggle_expanded("e0");
            app.state.current_mut().cursor = SectionCursor::ItemField(0, 6);
            type_text(&mut app, "a").await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            type_text(&mut app, "b").await;
            assert_eq!(app.store.document().data.education[0].description, "a\nb");
        }
    }

    mod add_item {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_add_skill_keeps_form_open() {
            let mut app = skills_app(0).await;
            app.state.current_mut().cursor = SectionCursor::AddHeader;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            assert_eq!(app.state.current().cursor, SectionCursor::AddField(0));

            type_text(&mut app, "Python").await;
            assert_eq!(app.store.revision(), 0);
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            assert_eq!(skills(&app), vec!["Go", "Rust", "Zig", "Python"]);
            let tab = app.state.current();
            assert!(tab.add_form.is_open());
            assert_eq!(tab.add_form.draft().text("skill"), "");
            assert_eq!(tab.cursor, SectionCursor::AddField(0));

            let ids = app.store.document().ids(Section::Skills);
            assert_eq!(ids.len(), 4);
            assert_ne!(tab.add_form.draft().id(), ids[3]);
        }

        #[tokio::test]
        async fn test_empty_submit_is_silent() {
            let mut app = skills_app(0).await;
            app.state.current_mut().add_form.toggle();
            app.state.current_mut().cursor = SectionCursor::AddSubmit;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(skills(&app).len(), 3);
            assert!(!app.state.has_errors());
            assert_eq!(app.store.revision(), 0);
        }

        #[tokio::test]
        async fn test_add_education_closes_form() {
            let mut app = skills_app(0).await;
            app.select_section(Section::Education);
            app.state.current_mut().add_form.toggle();

            app.state.current_mut().cursor = SectionCursor::AddField(0);
            type_text(&mut app, "ETH").await;
            app.state.current_mut().cursor = SectionCursor::AddField(2);
            type_text(&mut app, "Math").await;
            app.state.current_mut().cursor = SectionCursor::AddSubmit;
            app.handle_key(key(KeyCode::Char(' '))).await.unwrap();

            assert_eq!(app.store.document().len(Section::Education), 2);
            assert!(!app.state.current().add_form.is_open());
            assert_eq!(app.state.current().cursor, SectionCursor::AddHeader);
        }

        #[tokio::test]
        async fn test_switching_tabs_discards_draft() {
            let mut app = skills_app(0).await;
            app.state.current_mut().add_form.toggle();
            app.state.current_mut().cursor = SectionCursor::AddField(0);
            type_text(&mut app, "Elm").await;

            app.select_section(Section::Education);
            app.select_section(Section::Skills);

            let form = &app.state.current().add_form;
            assert!(!form.is_open());
            assert_eq!(form.draft().text("skill"), "");
            assert_eq!(skills(&app).len(), 3);
        }
    }

    mod transitions {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_delete_waits_for_animation() {
            let mut app = skills_app(300).await;
            app.state.current_mut().cursor = SectionCursor::Item(1);
            app.handle_key(key(KeyCode::Delete)).await.unwrap();

            assert_eq!(skills(&app).len(), 3);
            assert!(app.transitions.is_item_animating(Section::Skills, "s1"));

            app.tick(Instant::now() + Duration::from_secs(1));
            assert_eq!(skills(&app), vec!["Go", "Zig"]);
            assert_eq!(app.state.current().cursor, SectionCursor::Item(1));

            // Nothing left to commit
            app.tick(Instant::now() + Duration::from_secs(2));
            assert_eq!(skills(&app), vec!["Go", "Zig"]);
        }

        #[tokio::test]
        async fn test_second_delete_fast_forwards() {
            let mut app = skills_app(300).await;
            app.state.current_mut().cursor = SectionCursor::Item(2);
            app.handle_key(key(KeyCode::Delete)).await.unwrap();
            app.handle_key(key(KeyCode::Delete)).await.unwrap();
            assert_eq!(skills(&app), vec!["Go", "Rust"]);
            assert!(!app.transitions.is_animating());
        }

        #[tokio::test]
        async fn test_move_down_cursor_follows_item() {
            let mut app = skills_app(0).await;
            app.state.current_mut().cursor = SectionCursor::Item(0);
            app.handle_key(ctrl(KeyCode::Down)).await.unwrap();
            assert_eq!(skills(&app), vec!["Rust", "Go", "Zig"]);
            assert_eq!(app.state.current().cursor, SectionCursor::Item(1));
        }

        #[tokio::test]
        async fn test_edge_move_commits_without_change() {
            let mut app = skills_app(300).await;
            app.state.current_mut().cursor = SectionCursor::Item(0);
            app.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::ALT))
                .await
                .unwrap();
            assert!(!app.transitions.is_animating());
            assert_eq!(app.store.revision(), 0);
            assert!(!app.state.dirty);
        }

        #[tokio::test]
        async fn test_leaving_tab_drops_pending_delete() {
            let mut app = skills_app(300).await;
            app.state.current_mut().cursor = SectionCursor::Item(0);
            app.handle_key(key(KeyCode::Delete)).await.unwrap();

            app.select_section(Section::Education);
            app.tick(Instant::now() + Duration::from_secs(1));
            assert_eq!(skills(&app).len(), 3);
        }

        #[tokio::test]
        async fn test_commit_for_vanished_item_is_skipped() {
            let mut app = skills_app(0).await;
            app.commit(PendingMutation::new(Section::Skills, "nope", TransitionKind::Remove));
            assert_eq!(app.store.revision(), 0);
        }
    }

    mod persistence {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_ctrl_s_saves_and_clears_dirty() {
            let mut storage = storage_with(Some(document()));
            storage
                .expect_save()
                .times(1)
                .withf(|doc: &Document| doc.data.skills.len() == 2)
                .returning(|_| Ok(()));

            let mut app = app_with(storage, 300).await;
            app.state.focus = Focus::Section;
            app.state.current_mut().cursor = SectionCursor::Item(0);
            app.handle_key(key(KeyCode::Delete)).await.unwrap();

            // Pending delete is committed before writing
            app.handle_key(ctrl(KeyCode::Char('s'))).await.unwrap();
            assert!(!app.state.dirty);
            assert!(app.state.status_message.as_deref().unwrap().starts_with("Saved"));
        }

        #[tokio::test]
        async fn test_save_failure_is_reported() {
            let mut storage = storage_with(Some(document()));
            storage
                .expect_save()
                .returning(|_| Err(StoreError::Encode(serde_json::Error::io(std::io::Error::other("x")))));

            let mut app = app_with(storage, 0).await;
            app.state.dirty = true;
            app.save().await;
            assert!(app.state.dirty);
            assert!(app.state.has_errors());
        }

        #[tokio::test]
        async fn test_exit_saves_only_when_dirty() {
            let mut storage = storage_with(Some(document()));
            storage.expect_save().times(1).returning(|_| Ok(()));

            let mut app = app_with(storage, 0).await;
            app.save_on_exit().await.unwrap();

            app.state.dirty = true;
            app.save_on_exit().await.unwrap();
            assert!(!app.state.dirty);
        }

        #[tokio::test]
        async fn test_reload_replaces_document_and_drops_pending() {
            let mut storage = MockDocumentStorage::new();
            let mut loads = 0;
            storage.expect_load().times(2).returning(move || {
                loads += 1;
                let mut document = document();
                if loads > 1 {
                    document.data.skills.truncate(1);
                }
                Ok(Some(document))
            });
            storage
                .expect_location()
                .returning(|| "/tmp/resume.json".to_string());

            let mut app = app_with(storage, 300).await;
            app.state.focus = Focus::Section;
            app.state.current_mut().cursor = SectionCursor::Item(2);
            app.handle_key(key(KeyCode::Delete)).await.unwrap();
            app.state.dirty = true;

            app.handle_key(ctrl(KeyCode::Char('r'))).await.unwrap();
            assert_eq!(skills(&app), vec!["Go"]);
            assert!(!app.transitions.is_animating());
            assert!(!app.state.dirty);
            assert_eq!(app.state.current().cursor, SectionCursor::Item(0));
        }

        #[tokio::test]
        async fn test_reload_discards_open_draft() {
            let mut app = skills_app(0).await;
            app.state.current_mut().cursor = SectionCursor::AddHeader;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            type_text(&mut app, "Elm").await;
            assert_eq!(app.state.current().add_form.draft().text("skill"), "Elm");

            app.handle_key(ctrl(KeyCode::Char('r'))).await.unwrap();
            let tab = app.state.current();
            assert!(!tab.add_form.is_open());
            assert_eq!(tab.add_form.draft().text("skill"), "");
            assert_eq!(tab.cursor, SectionCursor::AddHeader);
            assert_eq!(skills(&app), vec!["Go", "Rust", "Zig"]);
            assert_eq!(app.state.status_message.as_deref(), Some("Reloaded"));
        }

        #[tokio::test]
        async fn test_config_remembers_current_section() {
            let mut app = skills_app(0).await;
            app.select_section(Section::Education);
            assert_eq!(app.config().last_section.as_deref(), Some("education"));
            assert_eq!(app.storage_location(), "/tmp/resume.json");
        }
    }
}
