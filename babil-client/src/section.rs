use std::sync::Arc;

use chrono::Utc;

use crate::{
    api::{AuthorSnapshot, Comment, CommentId, Error, Time},
    render_rows, seed, Forest, NodeUi, Row, UiState,
};

/// User actions on a comment section
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SectionMsg {
    Submit {
        text: String,
        parent_id: Option<CommentId>,
    },
    Like(CommentId),
    Dislike(CommentId),
    ToggleReplyForm(CommentId),
    ToggleReplies(CommentId),
}

/// A comment widget: the comments, their display flags, and who is writing
///
/// Lives as long as the widget is shown. All changes go through its methods.
#[derive(Clone, Debug)]
pub struct CommentSection {
    forest: Forest,
    ui: UiState,
    current_user: AuthorSnapshot,
}

impl CommentSection {
    pub fn new(forest: Forest, current_user: AuthorSnapshot) -> CommentSection {
        CommentSection {
            forest,
            ui: UiState::new(),
            current_user,
        }
    }

    pub fn seeded() -> CommentSection {
        CommentSection::new(seed::initial_forest(), seed::current_user())
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Shows the replies of every comment that has some
    pub fn expand_all(&mut self) {
        self.ui.expand_all(&self.forest);
    }

    pub fn current_user(&self) -> &AuthorSnapshot {
        &self.current_user
    }

    pub fn set_current_user(&mut self, user: AuthorSnapshot) {
        self.current_user = user;
    }

    pub fn submit(
        &mut self,
        raw_text: &str,
        parent_id: Option<&CommentId>,
    ) -> Result<Arc<Comment>, Error> {
        self.submit_at(raw_text, parent_id, Utc::now())
    }

    /// Validates and posts a comment or reply as the current user
    ///
    /// Once a reply is posted, the reply form it came from is closed.
    pub fn submit_at(
        &mut self,
        raw_text: &str,
        parent_id: Option<&CommentId>,
        now: Time,
    ) -> Result<Arc<Comment>, Error> {
        let text = raw_text.trim();
        if text.is_empty() {
            tracing::debug!(?parent_id, "ignoring blank submission");
            return Err(Error::EmptyText);
        }
        let comment =
            self.forest
                .create_comment_at(text, parent_id, self.current_user.clone(), now)?;
        if let Some(p) = parent_id {
            self.ui.close_reply_form(p);
        }
        Ok(comment)
    }

    pub fn toggle_like(&mut self, id: &CommentId) -> Result<Arc<Comment>, Error> {
        self.forest.toggle_like(id)
    }

    pub fn toggle_dislike(&mut self, id: &CommentId) -> Result<Arc<Comment>, Error> {
        self.forest.toggle_dislike(id)
    }

    pub fn toggle_reply_form(&mut self, id: &CommentId) -> NodeUi {
        self.ui.toggle_reply_form(id)
    }

    pub fn toggle_replies_expanded(&mut self, id: &CommentId) -> NodeUi {
        self.ui.toggle_replies_expanded(id)
    }

    pub fn update(&mut self, msg: SectionMsg) -> Result<(), Error> {
        self.update_at(msg, Utc::now())
    }

    pub fn update_at(&mut self, msg: SectionMsg, now: Time) -> Result<(), Error> {
        tracing::trace!(?msg, "handling section message");
        match msg {
            SectionMsg::Submit { text, parent_id } => {
                self.submit_at(&text, parent_id.as_ref(), now)?;
            }
            SectionMsg::Like(id) => {
                self.toggle_like(&id)?;
            }
            SectionMsg::Dislike(id) => {
                self.toggle_dislike(&id)?;
            }
            SectionMsg::ToggleReplyForm(id) => {
                self.toggle_reply_form(&id);
            }
            SectionMsg::ToggleReplies(id) => {
                self.toggle_replies_expanded(&id);
            }
        }
        Ok(())
    }

    pub fn rows(&self, now: Time) -> Vec<Row> {
        render_rows(&self.forest, &self.ui, now)
    }
}
