//! # Authoring form controller
//!
//! [`AuthoringController`] owns the editable fields of a post and the save state
//! machine:
//!
//! ```text
//!            begin_submit                finish(Ok)
//! Editing ──────────────▶ Saving ──────────────────▶ Succeeded
//!    ▲                      │  finish(Err)
//!    │ any edit             ▼
//!    └──────────────────  Failed
//! ```
//!
//! Saving is split in three so a UI can keep the controller in reactive state
//! without holding a borrow across an await:
//!
//! 1. [`begin_submit`](AuthoringController::begin_submit) checks the gate
//!    (session resolved, privileged, not already saving), validates, moves to
//!    `Saving` and returns a [`SaveRequest`] snapshot.
//! 2. [`execute_save`] runs the slug check, then the write, then clears the draft.
//! 3. [`finish`](AuthoringController::finish) records the outcome and, for a newly
//!    created post, hands back the slug to redirect to.
//!
//! [`submit`](AuthoringController::submit) chains the three for callers that own
//! the controller outright.
//!
//! ## Slug derivation
//!
//! While creating a post, every title change re-derives the slug with
//! [`slugify`] until the slug field is edited by hand. From then on the slug is
//! the author's.
//!
//! ## Drafts
//!
//! An uploaded `.md` file replaces the body and is written to the draft slot.
//! The first manual body edit while that draft (or one recovered on mount) is
//! shown clears the slot: the author now owns the content. When the slot cannot
//! be written the author gets a notice and the slot is emptied, so an older
//! draft never comes back on reload.

use store::draft::is_markdown_file;
use store::models::{join_tags, parse_tags, DEFAULT_AUTHOR};
use store::slug::{is_valid_slug, slugify};
use store::{ContentStore, Draft, DraftSlot, Post, PostFields, PostId, PostRepository, StoreError};

use crate::resolver::{resolve_initial_content, ContentSource};
use crate::session::Session;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthoringError {
    #[error("Authentication not ready. Please wait.")]
    SessionPending,
    #[error("Only signed-in admins can save posts.")]
    Unauthorized,
    #[error("A save is already in progress.")]
    SaveInProgress,
    #[error("Slug '{0}' is already in use.")]
    DuplicateSlug(String),
    #[error("{0}")]
    Validation(String),
    #[error("'{0}' is not a Markdown (.md) file.")]
    UnsupportedFile(String),
    #[error("Draft could not be stored in this browser: {0}")]
    DraftStorage(String),
    #[error("Content store unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Save rejected: {0}")]
    Rejected(String),
}

impl From<StoreError> for AuthoringError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlugTaken(slug) => AuthoringError::DuplicateSlug(slug),
            StoreError::Unavailable(msg) => AuthoringError::ServiceUnavailable(msg),
            StoreError::Rejected(msg) => AuthoringError::Rejected(msg),
            StoreError::NotFound(_) => AuthoringError::Rejected(err.to_string()),
        }
    }
}

/// Raw form input. Tags are kept as typed (comma separated).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    pub title: String,
    pub slug: String,
    pub tags: String,
    pub author_name: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit { id: PostId, stored_slug: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveState {
    Editing,
    Saving,
    Succeeded,
    Failed(AuthoringError),
}

/// Snapshot of a validated form, taken when the save starts.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveRequest {
    mode: Mode,
    fields: PostFields,
}

impl SaveRequest {
    pub fn fields(&self) -> &PostFields {
        &self.fields
    }

    pub fn is_create(&self) -> bool {
        self.mode == Mode::Create
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveOutcome {
    pub id: PostId,
    pub slug: String,
    pub created: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthoringController {
    mode: Mode,
    form: FormFields,
    slug_touched: bool,
    /// Label of the draft currently shown in the body, if any.
    recovered_label: Option<String>,
    state: SaveState,
    notice: Option<String>,
}

impl AuthoringController {
    /// Controller for a new post. The body comes from a recovered draft, if any.
    pub fn new_post(drafts: &impl DraftSlot) -> Self {
        let initial = resolve_initial_content(None, drafts.load());
        let form = FormFields {
            author_name: DEFAULT_AUTHOR.to_string(),
            body: initial.body,
            ..FormFields::default()
        };
        Self::from_parts(Mode::Create, form, initial.source)
    }

    /// Controller for an existing post.
    pub fn edit_post(post: &Post, drafts: &impl DraftSlot) -> Self {
        let initial = resolve_initial_content(Some(post), drafts.load());
        let form = FormFields {
            title: post.title.clone(),
            slug: post.slug.clone(),
            tags: join_tags(&post.tags),
            author_name: post.author_name.clone(),
            body: initial.body,
        };
        let mode = Mode::Edit {
            id: post.id.clone(),
            stored_slug: post.slug.clone(),
        };
        Self::from_parts(mode, form, initial.source)
    }

    fn from_parts(mode: Mode, form: FormFields, source: ContentSource) -> Self {
        let recovered_label = match source {
            ContentSource::RecoveredDraft { label } => {
                tracing::info!(%label, "recovered unsaved draft");
                Some(label)
            }
            ContentSource::Existing | ContentSource::Blank => None,
        };
        Self {
            mode,
            form,
            slug_touched: false,
            recovered_label,
            state: SaveState::Editing,
            notice: None,
        }
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_new(&self) -> bool {
        self.mode == Mode::Create
    }

    pub fn state(&self) -> &SaveState {
        &self.state
    }

    pub fn is_saving(&self) -> bool {
        self.state == SaveState::Saving
    }

    /// Last success or error message for the author.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Label of the uploaded or recovered draft being shown.
    pub fn recovered_label(&self) -> Option<&str> {
        self.recovered_label.as_deref()
    }

    /// Public URL the post will have.
    pub fn url_preview(&self) -> String {
        format!("/blog/{}", self.form.slug)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.touch();
        self.form.title = title.into();
        if self.is_new() && !self.slug_touched {
            self.form.slug = slugify(&self.form.title);
        }
    }

    /// Manual slug edit. Stops title-driven derivation for good.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.touch();
        self.slug_touched = true;
        self.form.slug = slug.into();
    }

    pub fn set_tags(&mut self, tags: impl Into<String>) {
        self.touch();
        self.form.tags = tags.into();
    }

    pub fn set_author_name(&mut self, author_name: impl Into<String>) {
        self.touch();
        self.form.author_name = author_name.into();
    }

    /// Manual body edit. The stored draft is dropped; if that fails the label
    /// stays so the next edit tries again.
    pub fn edit_body(&mut self, body: impl Into<String>, drafts: &impl DraftSlot) {
        self.touch();
        self.form.body = body.into();
        let Some(label) = self.recovered_label.clone() else {
            return;
        };
        tracing::debug!(%label, "manual edit, dropping stored draft");
        match drafts.clear() {
            Ok(()) => self.recovered_label = None,
            Err(e) => {
                tracing::warn!("failed to clear draft: {e}");
                self.notice = Some(AuthoringError::DraftStorage(e.to_string()).to_string());
            }
        }
    }

    /// Show an error that happened outside the controller, such as a file
    /// that could not be read.
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Replace the body with an uploaded markdown file and persist it as the draft.
    pub fn load_upload(
        &mut self,
        file_name: &str,
        content: String,
        drafts: &impl DraftSlot,
    ) -> Result<(), AuthoringError> {
        if !is_markdown_file(file_name) {
            let err = AuthoringError::UnsupportedFile(file_name.to_string());
            self.notice = Some(err.to_string());
            return Err(err);
        }

        self.touch();
        let draft = Draft::new(content, file_name);
        match drafts.save(&draft) {
            Ok(()) => self.recovered_label = Some(draft.label),
            Err(e) => {
                tracing::warn!(file_name, "failed to persist uploaded draft: {e}");
                self.notice = Some(AuthoringError::DraftStorage(e.to_string()).to_string());
                // An older draft left in the slot would come back on reload.
                self.recovered_label = match drafts.clear() {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!("failed to clear stale draft: {e}");
                        Some(draft.label)
                    }
                };
            }
        }
        self.form.body = draft.body;
        tracing::info!(file_name, "markdown file loaded");
        Ok(())
    }

    /// Start a save: check the gate, validate, and move to `Saving`.
    pub fn begin_submit(&mut self, session: &Session) -> Result<SaveRequest, AuthoringError> {
        let gate = if self.is_saving() {
            Err(AuthoringError::SaveInProgress)
        } else if !session.is_resolved() {
            Err(AuthoringError::SessionPending)
        } else if !session.is_privileged() {
            Err(AuthoringError::Unauthorized)
        } else {
            Ok(())
        };
        if let Err(e) = gate {
            tracing::debug!("submit refused: {e}");
            self.notice = Some(e.to_string());
            return Err(e);
        }

        let fields = match self.validated_fields() {
            Ok(fields) => fields,
            Err(e) => {
                self.fail(e.clone());
                return Err(e);
            }
        };

        self.state = SaveState::Saving;
        self.notice = None;
        Ok(SaveRequest {
            mode: self.mode.clone(),
            fields,
        })
    }

    /// Record the result of [`execute_save`]. Returns the slug to redirect to
    /// when a new post was created.
    pub fn finish(&mut self, result: Result<SaveOutcome, AuthoringError>) -> Option<String> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.fail(e);
                return None;
            }
        };

        self.state = SaveState::Succeeded;
        self.recovered_label = None;
        self.mode = Mode::Edit {
            id: outcome.id,
            stored_slug: outcome.slug.clone(),
        };

        if outcome.created {
            self.notice = Some("Post published successfully!".to_string());
            Some(outcome.slug)
        } else {
            self.notice = Some("Post updated successfully!".to_string());
            None
        }
    }

    /// [`begin_submit`](Self::begin_submit), [`execute_save`] and
    /// [`finish`](Self::finish) in one call.
    pub async fn submit<S: ContentStore, D: DraftSlot>(
        &mut self,
        session: &Session,
        repo: &PostRepository<S>,
        drafts: &D,
    ) -> Result<Option<String>, AuthoringError> {
        let request = self.begin_submit(session)?;
        let result = execute_save(request, repo, drafts).await;
        let failure = result.as_ref().err().cloned();
        let follow_up = self.finish(result);
        match failure {
            Some(e) => Err(e),
            None => Ok(follow_up),
        }
    }

    fn touch(&mut self) {
        if matches!(self.state, SaveState::Succeeded | SaveState::Failed(_)) {
            self.state = SaveState::Editing;
            self.notice = None;
        }
    }

    fn fail(&mut self, err: AuthoringError) {
        tracing::warn!("save failed: {err}");
        self.notice = Some(err.to_string());
        self.state = SaveState::Failed(err);
    }

    fn validated_fields(&self) -> Result<PostFields, AuthoringError> {
        let title = self.form.title.trim();
        if title.is_empty() {
            return Err(AuthoringError::Validation("Title is required.".to_string()));
        }

        let slug = self.form.slug.trim();
        if slug.is_empty() {
            return Err(AuthoringError::Validation("Slug is required.".to_string()));
        }
        if !is_valid_slug(slug) {
            return Err(AuthoringError::Validation(format!(
                "Slug '{slug}' may only contain lowercase letters, digits and single hyphens."
            )));
        }

        let author_name = match self.form.author_name.trim() {
            "" => DEFAULT_AUTHOR,
            name => name,
        };

        Ok(PostFields {
            title: title.to_string(),
            slug: slug.to_string(),
            body: self.form.body.clone(),
            tags: parse_tags(&self.form.tags),
            author_name: author_name.to_string(),
        })
    }
}

/// Perform a save: slug check first, then the write, then clear the draft.
///
/// The slug check runs for new posts and for edits that change the slug, and
/// ignores the post being edited. A conflict returns
/// [`AuthoringError::DuplicateSlug`] without writing. The store enforces the same
/// constraint on write, so a post created between check and write still fails
/// with `DuplicateSlug`.
pub async fn execute_save<S: ContentStore, D: DraftSlot>(
    request: SaveRequest,
    repo: &PostRepository<S>,
    drafts: &D,
) -> Result<SaveOutcome, AuthoringError> {
    let SaveRequest { mode, fields } = request;
    let slug = fields.slug.clone();

    let (excluding, slug_changed) = match &mode {
        Mode::Create => (None, true),
        Mode::Edit { id, stored_slug } => (Some(id), *stored_slug != slug),
    };
    if slug_changed && repo.slug_in_use(&slug, excluding).await? {
        return Err(AuthoringError::DuplicateSlug(slug));
    }

    let (id, created) = match mode {
        Mode::Create => (repo.create_post(fields).await?, true),
        Mode::Edit { id, .. } => {
            repo.update_post(&id, fields).await?;
            (id, false)
        }
    };

    if let Err(e) = drafts.clear() {
        tracing::warn!("post saved but draft not cleared: {e}");
    }

    Ok(SaveOutcome { id, slug, created })
}

#[cfg(test)]
mod tests {
    use store::{MemoryDraftSlot, MemoryStore};

    use super::*;
    use crate::policy::AdminClaim;
    use crate::session::tests::admin_identity;

    fn admin() -> Session {
        Session::resolved(Some(admin_identity()), &AdminClaim)
    }

    fn filled(drafts: &MemoryDraftSlot, title: &str) -> AuthoringController {
        let mut controller = AuthoringController::new_post(drafts);
        controller.set_title(title);
        controller.set_tags("pwn, htb");
        controller
    }

    #[test]
    fn test_title_derives_slug_until_manual_edit() {
        let drafts = MemoryDraftSlot::new();
        let mut controller = AuthoringController::new_post(&drafts);

        controller.set_title("My First Post!");
        assert_eq!(controller.form().slug, "my-first-post");

        controller.set_title("My First Post, Revised");
        assert_eq!(controller.form().slug, "my-first-post-revised");

        controller.set_slug("custom");
        controller.set_title("Something Else Entirely");
        assert_eq!(controller.form().slug, "custom");

        // Clearing the slug by hand still counts as a manual edit.
        controller.set_slug("");
        controller.set_title("Again");
        assert_eq!(controller.form().slug, "");
    }

    #[test]
    fn test_title_char_by_char() {
        let drafts = MemoryDraftSlot::new();
        let mut controller = AuthoringController::new_post(&drafts);
        let mut typed = String::new();
        for ch in "My First Post!".chars() {
            typed.push(ch);
            controller.set_title(typed.clone());
        }
        assert_eq!(controller.form().slug, "my-first-post");
        assert_eq!(controller.url_preview(), "/blog/my-first-post");
    }

    #[test]
    fn test_edit_mode_never_derives_slug() {
        let drafts = MemoryDraftSlot::new();
        let post = Post {
            id: PostId("post-1".to_string()),
            title: "Lame".to_string(),
            slug: "lame".to_string(),
            body: "body".to_string(),
            tags: vec!["htb".to_string(), "smb".to_string()],
            author_name: "Me".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let mut controller = AuthoringController::edit_post(&post, &drafts);
        assert_eq!(controller.form().tags, "htb, smb");

        controller.set_title("Lame (retired)");
        assert_eq!(controller.form().slug, "lame");
        assert!(!controller.is_new());
    }

    #[test]
    fn test_new_post_recovers_draft() {
        let drafts = MemoryDraftSlot::new();
        drafts.save(&Draft::new("X", "f.md")).unwrap();

        let controller = AuthoringController::new_post(&drafts);
        assert_eq!(controller.form().body, "X");
        assert_eq!(controller.recovered_label(), Some("f.md"));
        assert_eq!(controller.form().author_name, DEFAULT_AUTHOR);
    }

    #[test]
    fn test_manual_edit_after_recovery_clears_draft() {
        let drafts = MemoryDraftSlot::new();
        drafts.save(&Draft::new("X", "f.md")).unwrap();
        let mut controller = AuthoringController::new_post(&drafts);

        controller.edit_body("X plus my edits", &drafts);
        assert_eq!(drafts.load(), None);
        assert_eq!(controller.recovered_label(), None);
        assert_eq!(controller.form().body, "X plus my edits");
    }

    #[test]
    fn test_manual_edit_without_recovery_keeps_slot_untouched() {
        let drafts = MemoryDraftSlot::new();
        let mut controller = AuthoringController::new_post(&drafts);
        // A draft written by another tab after mount is not ours to clear.
        drafts.save(&Draft::new("other", "o.md")).unwrap();

        controller.edit_body("typing", &drafts);
        assert_eq!(drafts.load(), Some(Draft::new("other", "o.md")));
    }

    #[test]
    fn test_upload_persists_draft() {
        let drafts = MemoryDraftSlot::new();
        let mut controller = AuthoringController::new_post(&drafts);

        controller
            .load_upload("lame.md", "# Lame".to_string(), &drafts)
            .unwrap();
        assert_eq!(controller.form().body, "# Lame");
        assert_eq!(controller.recovered_label(), Some("lame.md"));
        assert_eq!(drafts.load(), Some(Draft::new("# Lame", "lame.md")));

        // A remounted editor sees the upload.
        let remounted = AuthoringController::new_post(&drafts.clone());
        assert_eq!(remounted.form().body, "# Lame");
    }

    #[test]
    fn test_upload_rejects_non_markdown() {
        let drafts = MemoryDraftSlot::new();
        let mut controller = AuthoringController::new_post(&drafts);

        let err = controller
            .load_upload("notes.txt", "text".to_string(), &drafts)
            .unwrap_err();
        assert_eq!(err, AuthoringError::UnsupportedFile("notes.txt".to_string()));
        assert_eq!(controller.form().body, "");
        assert_eq!(drafts.load(), None);
        assert!(controller.notice().is_some());
    }

    /// Slot whose writes can be switched to fail, like a full localStorage.
    #[derive(Clone, Default)]
    struct FlakySlot {
        inner: MemoryDraftSlot,
        fail_save: std::rc::Rc<std::cell::Cell<bool>>,
        fail_clear: std::rc::Rc<std::cell::Cell<bool>>,
    }

    impl DraftSlot for FlakySlot {
        fn save(&self, draft: &Draft) -> Result<(), StoreError> {
            if self.fail_save.get() {
                return Err(StoreError::Unavailable("QuotaExceededError".to_string()));
            }
            self.inner.save(draft)
        }

        fn load(&self) -> Option<Draft> {
            self.inner.load()
        }

        fn clear(&self) -> Result<(), StoreError> {
            if self.fail_clear.get() {
                return Err(StoreError::Unavailable("storage blocked".to_string()));
            }
            self.inner.clear()
        }
    }

    #[test]
    fn test_failed_upload_save_drops_abandoned_draft() {
        let drafts = FlakySlot::default();
        drafts.inner.save(&Draft::new("OLD abandoned draft", "old.md")).unwrap();
        let mut controller = AuthoringController::new_post(&drafts);
        drafts.fail_save.set(true);

        controller
            .load_upload("new.md", "NEW upload".to_string(), &drafts)
            .unwrap();
        assert_eq!(controller.form().body, "NEW upload");
        assert_eq!(controller.recovered_label(), None);
        let notice = controller.notice().unwrap();
        assert!(notice.contains("QuotaExceededError"), "{notice}");

        // Reloading must not bring the old draft back.
        assert_eq!(drafts.load(), None);
        let reloaded = AuthoringController::new_post(&drafts);
        assert_eq!(reloaded.form().body, "");
    }

    #[test]
    fn test_failed_upload_save_and_clear_keeps_label_for_retry() {
        let drafts = FlakySlot::default();
        drafts.inner.save(&Draft::new("OLD", "old.md")).unwrap();
        let mut controller = AuthoringController::new_post(&drafts);
        drafts.fail_save.set(true);
        drafts.fail_clear.set(true);

        controller
            .load_upload("new.md", "NEW".to_string(), &drafts)
            .unwrap();
        assert_eq!(controller.recovered_label(), Some("new.md"));
        assert!(controller.notice().is_some());

        // Once storage recovers, the next manual edit clears the slot.
        drafts.fail_clear.set(false);
        controller.edit_body("NEW, edited", &drafts);
        assert_eq!(controller.recovered_label(), None);
        assert_eq!(drafts.load(), None);
    }

    #[test]
    fn test_failed_clear_on_edit_keeps_recovered_label() {
        let drafts = FlakySlot::default();
        drafts.inner.save(&Draft::new("X", "f.md")).unwrap();
        let mut controller = AuthoringController::new_post(&drafts);
        assert_eq!(controller.recovered_label(), Some("f.md"));

        drafts.fail_clear.set(true);
        controller.edit_body("X!", &drafts);
        assert_eq!(controller.recovered_label(), Some("f.md"));
        assert!(controller.notice().unwrap().contains("storage blocked"));
        assert_eq!(drafts.load(), Some(Draft::new("X", "f.md")));

        drafts.fail_clear.set(false);
        controller.edit_body("X!!", &drafts);
        assert_eq!(controller.recovered_label(), None);
        assert_eq!(drafts.load(), None);
    }

    #[test]
    fn test_report_error_sets_notice() {
        let drafts = MemoryDraftSlot::new();
        let mut controller = AuthoringController::new_post(&drafts);
        controller.report_error("Could not read writeup.md");
        assert_eq!(controller.notice(), Some("Could not read writeup.md"));
        assert_eq!(*controller.state(), SaveState::Editing);
    }

    #[test]
    fn test_submit_gated_on_session() {
        let drafts = MemoryDraftSlot::new();
        let mut controller = filled(&drafts, "Lame");

        assert_eq!(
            controller.begin_submit(&Session::pending()).unwrap_err(),
            AuthoringError::SessionPending
        );
        assert_eq!(
            controller
                .begin_submit(&Session::resolved(None, &AdminClaim))
                .unwrap_err(),
            AuthoringError::Unauthorized
        );
        assert_eq!(controller.state(), &SaveState::Editing);
    }

    #[test]
    fn test_submit_validates() {
        let drafts = MemoryDraftSlot::new();
        let mut controller = AuthoringController::new_post(&drafts);

        let err = controller.begin_submit(&admin()).unwrap_err();
        assert_eq!(err, AuthoringError::Validation("Title is required.".to_string()));
        assert_eq!(controller.state(), &SaveState::Failed(err));

        controller.set_title("Lame");
        controller.set_slug("Not A Slug");
        assert!(matches!(
            controller.begin_submit(&admin()),
            Err(AuthoringError::Validation(_))
        ));

        // Editing again leaves the failed state.
        controller.set_slug("lame");
        assert_eq!(controller.state(), &SaveState::Editing);
        assert_eq!(controller.notice(), None);
    }

    #[test]
    fn test_second_submit_while_saving_is_refused() {
        let drafts = MemoryDraftSlot::new();
        let mut controller = filled(&drafts, "Lame");

        let request = controller.begin_submit(&admin()).unwrap();
        assert!(controller.is_saving());
        assert!(request.is_create());
        assert_eq!(request.fields().tags, vec!["pwn".to_string(), "htb".to_string()]);

        assert_eq!(
            controller.begin_submit(&admin()).unwrap_err(),
            AuthoringError::SaveInProgress
        );
        assert!(controller.is_saving());
    }

    #[tokio::test]
    async fn test_in_flight_submit_issues_one_write() {
        let repo = PostRepository::new(MemoryStore::new());
        let drafts = MemoryDraftSlot::new();
        let mut controller = filled(&drafts, "Lame");

        let request = controller.begin_submit(&admin()).unwrap();
        assert!(controller.begin_submit(&admin()).is_err());
        let result = execute_save(request, &repo, &drafts).await;
        controller.finish(result);

        assert_eq!(repo.store().write_count(), 1);
        assert_eq!(controller.state(), &SaveState::Succeeded);
    }

    #[tokio::test]
    async fn test_create_clears_draft_and_redirects() {
        let repo = PostRepository::new(MemoryStore::new());
        let drafts = MemoryDraftSlot::new();
        drafts.save(&Draft::new("# Lame\n\nwriteup", "lame.md")).unwrap();
        let mut controller = filled(&drafts, "HTB: Lame");

        let follow_up = controller.submit(&admin(), &repo, &drafts).await.unwrap();

        assert_eq!(follow_up, Some("htb-lame".to_string()));
        assert_eq!(drafts.load(), None);
        assert_eq!(controller.state(), &SaveState::Succeeded);
        assert_eq!(controller.notice(), Some("Post published successfully!"));
        assert!(!controller.is_new());

        let post = repo.get_by_slug("htb-lame").await.unwrap().unwrap();
        assert_eq!(post.body, "# Lame\n\nwriteup");
        assert_eq!(post.author_name, DEFAULT_AUTHOR);
        assert_eq!(repo.list_posts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_saving_again_after_create_updates() {
        let repo = PostRepository::new(MemoryStore::new());
        let drafts = MemoryDraftSlot::new();
        let mut controller = filled(&drafts, "Lame");
        controller.submit(&admin(), &repo, &drafts).await.unwrap();

        controller.edit_body("more", &drafts);
        let follow_up = controller.submit(&admin(), &repo, &drafts).await.unwrap();

        assert_eq!(follow_up, None);
        assert_eq!(controller.notice(), Some("Post updated successfully!"));
        assert_eq!(repo.list_posts().await.unwrap().len(), 1);
        assert_eq!(repo.store().write_count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_slug_leaves_store_unmodified() {
        let repo = PostRepository::new(MemoryStore::new());
        let drafts = MemoryDraftSlot::new();
        filled(&drafts, "Lame")
            .submit(&admin(), &repo, &drafts)
            .await
            .unwrap();

        drafts.save(&Draft::new("second attempt", "again.md")).unwrap();
        let mut controller = filled(&drafts, "Lame");
        let err = controller.submit(&admin(), &repo, &drafts).await.unwrap_err();

        assert_eq!(err, AuthoringError::DuplicateSlug("lame".to_string()));
        assert_eq!(controller.state(), &SaveState::Failed(err));
        assert_eq!(controller.notice(), Some("Slug 'lame' is already in use."));
        assert_eq!(repo.store().write_count(), 1);
        assert_eq!(repo.list_posts().await.unwrap().len(), 1);
        // The unsaved work survives the failure.
        assert_eq!(drafts.load(), Some(Draft::new("second attempt", "again.md")));
    }

    #[tokio::test]
    async fn test_edit_to_taken_slug_fails() {
        let repo = PostRepository::new(MemoryStore::new());
        let drafts = MemoryDraftSlot::new();
        filled(&drafts, "Lame")
            .submit(&admin(), &repo, &drafts)
            .await
            .unwrap();
        filled(&drafts, "Blue")
            .submit(&admin(), &repo, &drafts)
            .await
            .unwrap();

        let blue = repo.get_by_slug("blue").await.unwrap().unwrap();
        let mut controller = AuthoringController::edit_post(&blue, &drafts);
        controller.set_slug("lame");
        let err = controller.submit(&admin(), &repo, &drafts).await.unwrap_err();

        assert_eq!(err, AuthoringError::DuplicateSlug("lame".to_string()));
        assert_eq!(repo.get_by_slug("blue").await.unwrap().unwrap(), blue);
    }

    #[tokio::test]
    async fn test_edit_keeps_own_slug() {
        let repo = PostRepository::new(MemoryStore::new());
        let drafts = MemoryDraftSlot::new();
        filled(&drafts, "Lame")
            .submit(&admin(), &repo, &drafts)
            .await
            .unwrap();
        let saved = repo.get_by_slug("lame").await.unwrap().unwrap();

        let mut controller = AuthoringController::edit_post(&saved, &drafts);
        controller.set_tags("htb");
        let follow_up = controller.submit(&admin(), &repo, &drafts).await.unwrap();

        assert_eq!(follow_up, None);
        let updated = repo.get_by_slug("lame").await.unwrap().unwrap();
        assert_eq!(updated.tags, vec!["htb".to_string()]);
        assert_eq!(updated.created_at, saved.created_at);
        assert!(updated.updated_at >= saved.updated_at);
    }

    #[tokio::test]
    async fn test_store_unavailable_fails_without_mutation() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let repo = PostRepository::new(store);
        let drafts = MemoryDraftSlot::new();
        drafts.save(&Draft::new("keep me", "k.md")).unwrap();
        let mut controller = filled(&drafts, "Lame");

        let err = controller.submit(&admin(), &repo, &drafts).await.unwrap_err();

        assert!(matches!(err, AuthoringError::ServiceUnavailable(_)));
        assert!(matches!(controller.state(), SaveState::Failed(_)));
        assert_eq!(drafts.load(), Some(Draft::new("keep me", "k.md")));
        assert_eq!(repo.store().write_count(), 0);

        // Nothing is retried; the author submits again once the store is back.
        repo.store().set_offline(false);
        assert_eq!(
            controller.submit(&admin(), &repo, &drafts).await.unwrap(),
            Some("lame".to_string())
        );
    }
}
