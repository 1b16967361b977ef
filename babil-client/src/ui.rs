use std::{collections::HashMap, sync::Arc};

use crate::{
    api::{time_ago, Comment, CommentId, Time},
    Forest,
};

pub const TOP_LEVEL_PLACEHOLDER: &str = "Ajouter un commentaire...";

/// Display flags of a single comment
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NodeUi {
    pub reply_form_visible: bool,
    pub replies_expanded: bool,
}

/// Display flags of every comment, kept apart from the comments themselves
///
/// Comments without an entry use the default flags: form hidden, replies collapsed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UiState {
    nodes: HashMap<CommentId, NodeUi>,
}

impl UiState {
    pub fn new() -> UiState {
        UiState::default()
    }

    pub fn get(&self, id: &CommentId) -> NodeUi {
        self.nodes.get(id).copied().unwrap_or_default()
    }

    pub fn toggle_reply_form(&mut self, id: &CommentId) -> NodeUi {
        let n = self.nodes.entry(id.clone()).or_default();
        n.reply_form_visible = !n.reply_form_visible;
        *n
    }

    pub fn toggle_replies_expanded(&mut self, id: &CommentId) -> NodeUi {
        let n = self.nodes.entry(id.clone()).or_default();
        n.replies_expanded = !n.replies_expanded;
        *n
    }

    pub fn close_reply_form(&mut self, id: &CommentId) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.reply_form_visible = false;
        }
    }

    pub fn expand_all(&mut self, forest: &Forest) {
        for (_, c) in forest.walk() {
            if !c.children.is_empty() {
                self.nodes.entry(c.id.clone()).or_default().replies_expanded = true;
            }
        }
    }
}

/// One visible comment, ready to be drawn
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub comment: Arc<Comment>,
    pub depth: usize,
    pub time_ago: String,
    pub ui: NodeUi,
}

impl Row {
    pub fn reply_count(&self) -> usize {
        self.comment.children.len()
    }

    pub fn likes_label(&self) -> String {
        count_label(self.comment.likes)
    }

    pub fn dislikes_label(&self) -> String {
        count_label(self.comment.dislikes)
    }

    /// Label of the button showing or hiding replies, if there are any
    pub fn replies_toggle_label(&self) -> Option<String> {
        match (self.reply_count(), self.ui.replies_expanded) {
            (0, _) => None,
            (n, true) => Some(format!("Masquer {n} réponses")),
            (n, false) => Some(format!("Afficher {n} réponses")),
        }
    }

    pub fn reply_placeholder(&self) -> String {
        format!("Répondre à {}...", self.comment.author.name)
    }
}

fn count_label(n: u64) -> String {
    match n {
        0 => String::new(),
        n => n.to_string(),
    }
}

/// Visible rows of `forest` in display order
///
/// Replies only appear below a comment whose replies are expanded.
pub fn render_rows(forest: &Forest, ui: &UiState, now: Time) -> Vec<Row> {
    forest
        .walk_where(|c| ui.get(&c.id).replies_expanded)
        .map(|(depth, c)| Row {
            comment: c.clone(),
            depth,
            time_ago: time_ago(c.created_at, now),
            ui: ui.get(&c.id),
        })
        .collect()
}
