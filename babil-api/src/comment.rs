use std::{fmt, sync::Arc};

use uuid::Uuid;

use crate::{AuthorSnapshot, Time};

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn generate() -> CommentId {
        CommentId(Uuid::new_v4().to_string())
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> CommentId {
        CommentId(String::from(s))
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One comment or reply, along with the replies it owns
///
/// Nodes are shared through `Arc` and never mutated in place: every change
/// produces a new node, so two snapshots of a tree can be compared by pointer.
///
/// Dropping and comparing walk the replies with an explicit stack, so trees
/// of any depth are fine.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,

    /// `None` for a top-level comment
    #[serde(default)]
    pub parent_id: Option<CommentId>,

    pub author: AuthorSnapshot,
    pub text: String,
    pub created_at: Time,

    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
    #[serde(default)]
    pub liked_by_current_user: bool,
    #[serde(default)]
    pub disliked_by_current_user: bool,

    /// Replies, oldest first
    #[serde(default)]
    pub children: Vec<Arc<Comment>>,
}

impl Comment {
    pub fn new(
        id: CommentId,
        parent_id: Option<CommentId>,
        author: AuthorSnapshot,
        text: String,
        created_at: Time,
    ) -> Comment {
        Comment {
            id,
            parent_id,
            author,
            text,
            created_at,
            likes: 0,
            dislikes: 0,
            liked_by_current_user: false,
            disliked_by_current_user: false,
            children: Vec::new(),
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Returns this comment with the current user's like flipped
    ///
    /// Liking clears a dislike the current user had set, so both flags are
    /// never set at once.
    pub fn with_like_toggled(&self) -> Comment {
        let mut c = self.clone();
        toggle_reaction(
            &mut c.liked_by_current_user,
            &mut c.likes,
            &mut c.disliked_by_current_user,
            &mut c.dislikes,
        );
        c
    }

    /// Returns this comment with the current user's dislike flipped
    pub fn with_dislike_toggled(&self) -> Comment {
        let mut c = self.clone();
        toggle_reaction(
            &mut c.disliked_by_current_user,
            &mut c.dislikes,
            &mut c.liked_by_current_user,
            &mut c.likes,
        );
        c
    }

    /// Returns this comment with `reply` appended as its newest reply
    pub fn with_reply(&self, reply: Arc<Comment>) -> Comment {
        let mut c = self.clone();
        c.children.push(reply);
        c
    }
}

impl Comment {
    fn same_own_fields(&self, other: &Comment) -> bool {
        self.id == other.id
            && self.parent_id == other.parent_id
            && self.author == other.author
            && self.text == other.text
            && self.created_at == other.created_at
            && self.likes == other.likes
            && self.dislikes == other.dislikes
            && self.liked_by_current_user == other.liked_by_current_user
            && self.disliked_by_current_user == other.disliked_by_current_user
            && self.children.len() == other.children.len()
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Comment) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if !a.same_own_fields(b) {
                return false;
            }
            stack.extend(
                a.children
                    .iter()
                    .zip(&b.children)
                    .filter(|(x, y)| !Arc::ptr_eq(x, y))
                    .map(|(x, y)| (&**x, &**y)),
            );
        }
        true
    }
}

impl Eq for Comment {}

impl Drop for Comment {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(c) = stack.pop() {
            // shared subtrees are still owned elsewhere and stay alive
            if let Ok(mut c) = Arc::try_unwrap(c) {
                stack.append(&mut c.children);
            }
        }
    }
}

fn toggle_reaction(on: &mut bool, count: &mut u64, other_on: &mut bool, other_count: &mut u64) {
    if *on {
        *on = false;
        *count = count.saturating_sub(1);
        return;
    }
    *on = true;
    *count = count.saturating_add(1);
    if *other_on {
        *other_on = false;
        *other_count = other_count.saturating_sub(1);
    }
}
