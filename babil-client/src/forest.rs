use std::{collections::HashSet, slice, sync::Arc};

use chrono::Utc;

use crate::api::{AuthorSnapshot, Comment, CommentId, Error, Time};

/// All the comments of a section, as an ordered list of top-level comments
/// with their replies nested inside
///
/// Top-level comments are newest first, replies are oldest first. Cloning a
/// `Forest` is cheap and gives a snapshot that later mutations will not touch.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Forest {
    roots: Arc<Vec<Arc<Comment>>>,
}

impl Forest {
    pub fn new() -> Forest {
        Forest::default()
    }

    /// Builds a forest out of an initial snapshot, checking that it is well-formed
    pub fn from_seed(roots: Vec<Comment>) -> Result<Forest, Error> {
        let roots = roots.into_iter().map(Arc::new).collect::<Vec<_>>();
        validate(&roots)?;
        Ok(Forest {
            roots: Arc::new(roots),
        })
    }

    pub fn roots(&self) -> &[Arc<Comment>] {
        &self.roots
    }

    /// Number of comments, replies included
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order traversal of every comment along with its depth
    pub fn walk(&self) -> Walk<'_, fn(&Comment) -> bool> {
        self.walk_where(always as fn(&Comment) -> bool)
    }

    /// Pre-order traversal that only enters the replies of comments for
    /// which `descend` returns true
    pub fn walk_where<F>(&self, descend: F) -> Walk<'_, F>
    where
        F: FnMut(&Comment) -> bool,
    {
        Walk {
            stack: vec![(0, self.roots.iter())],
            descend,
        }
    }

    pub fn find_by_id(&self, id: &CommentId) -> Option<&Arc<Comment>> {
        self.walk().map(|(_, c)| c).find(|c| c.id == *id)
    }

    pub fn create_comment(
        &mut self,
        text: &str,
        parent_id: Option<&CommentId>,
        author: AuthorSnapshot,
    ) -> Result<Arc<Comment>, Error> {
        self.create_comment_at(text, parent_id, author, Utc::now())
    }

    /// Adds a comment, at the top of the forest or as the last reply of `parent_id`
    pub fn create_comment_at(
        &mut self,
        text: &str,
        parent_id: Option<&CommentId>,
        author: AuthorSnapshot,
        created_at: Time,
    ) -> Result<Arc<Comment>, Error> {
        let text = text.trim();
        if text.is_empty() {
            tracing::warn!(?parent_id, "refusing to create comment with empty text");
            return Err(Error::EmptyText);
        }
        let parent_path = match parent_id {
            None => None,
            Some(p) => match self.path_to(p) {
                Some(path) => Some((p, path)),
                None => {
                    tracing::warn!(parent = %p, "refusing to reply to unknown comment");
                    return Err(Error::NotFound(p.clone()));
                }
            },
        };

        let comment = Arc::new(Comment::new(
            self.fresh_id(),
            parent_id.cloned(),
            author,
            String::from(text),
            created_at,
        ));
        match parent_path {
            None => Arc::make_mut(&mut self.roots).insert(0, comment.clone()),
            Some((p, path)) => {
                self.replace_at(&path, |parent| parent.with_reply(comment.clone()))
                    .ok_or_else(|| Error::NotFound(p.clone()))?;
            }
        }
        tracing::debug!(id = %comment.id, ?parent_id, "created comment");
        Ok(comment)
    }

    pub fn toggle_like(&mut self, id: &CommentId) -> Result<Arc<Comment>, Error> {
        let res = self.update(id, Comment::with_like_toggled)?;
        tracing::debug!(%id, liked = res.liked_by_current_user, likes = res.likes, "toggled like");
        Ok(res)
    }

    pub fn toggle_dislike(&mut self, id: &CommentId) -> Result<Arc<Comment>, Error> {
        let res = self.update(id, Comment::with_dislike_toggled)?;
        tracing::debug!(
            %id,
            disliked = res.disliked_by_current_user,
            dislikes = res.dislikes,
            "toggled dislike"
        );
        Ok(res)
    }
}

impl Forest {
    fn update(
        &mut self,
        id: &CommentId,
        f: impl FnOnce(&Comment) -> Comment,
    ) -> Result<Arc<Comment>, Error> {
        let res = self
            .path_to(id)
            .and_then(|path| self.replace_at(&path, f));
        res.ok_or_else(|| {
            tracing::warn!(%id, "requested update of comment that is not in forest");
            Error::NotFound(id.clone())
        })
    }

    fn fresh_id(&self) -> CommentId {
        loop {
            let id = CommentId::generate();
            if self.find_by_id(&id).is_none() {
                return id;
            }
        }
    }

    /// Child indices leading from the top level to the first comment with this id
    fn path_to(&self, id: &CommentId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut stack = vec![self.roots.iter().enumerate()];
        while let Some(level) = stack.last_mut() {
            match level.next() {
                Some((i, c)) => {
                    path.push(i);
                    if c.id == *id {
                        return Some(path);
                    }
                    stack.push(c.children.iter().enumerate());
                }
                None => {
                    stack.pop();
                    path.pop();
                }
            }
        }
        None
    }

    /// Replaces the comment at `path` by `f` of it, rebuilding each of its
    /// ancestors and leaving every other subtree shared with the old forest
    fn replace_at(
        &mut self,
        path: &[usize],
        f: impl FnOnce(&Comment) -> Comment,
    ) -> Option<Arc<Comment>> {
        let mut chain = Vec::with_capacity(path.len());
        let mut level: &[Arc<Comment>] = &self.roots;
        for &i in path {
            let node = level.get(i)?;
            chain.push(node.clone());
            level = &node.children;
        }
        let target = chain.pop()?;

        let updated = Arc::new(f(&*target));
        let mut rebuilt = updated.clone();
        for (ancestor, &i) in chain.iter().rev().zip(path.iter().skip(1).rev()) {
            let mut parent = Comment::clone(ancestor);
            parent.children[i] = rebuilt;
            rebuilt = Arc::new(parent);
        }
        Arc::make_mut(&mut self.roots)[path[0]] = rebuilt;
        Some(updated)
    }
}

fn always(_: &Comment) -> bool {
    true
}

fn validate(roots: &[Arc<Comment>]) -> Result<(), Error> {
    let mut seen = HashSet::new();
    let mut stack = roots.iter().map(|c| (None, c)).collect::<Vec<_>>();
    while let Some((parent, c)) = stack.pop() {
        if !seen.insert(&c.id) {
            return Err(Error::IdAlreadyUsed(c.id.clone()));
        }
        if c.parent_id.as_ref() != parent {
            return Err(Error::ParentMismatch {
                child: c.id.clone(),
                parent: parent.cloned(),
            });
        }
        if c.text.trim().is_empty() {
            return Err(Error::EmptyText);
        }
        if c.liked_by_current_user && c.disliked_by_current_user {
            return Err(Error::ConflictingReactions(c.id.clone()));
        }
        stack.extend(c.children.iter().map(|child| (Some(&c.id), child)));
    }
    Ok(())
}

/// Iterator returned by [`Forest::walk`] and [`Forest::walk_where`]
pub struct Walk<'a, F> {
    stack: Vec<(usize, slice::Iter<'a, Arc<Comment>>)>,
    descend: F,
}

impl<'a, F> Iterator for Walk<'a, F>
where
    F: FnMut(&Comment) -> bool,
{
    type Item = (usize, &'a Arc<Comment>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, level) = self.stack.last_mut()?;
            let depth = *depth;
            match level.next() {
                Some(c) => {
                    if !c.children.is_empty() && (self.descend)(&**c) {
                        self.stack.push((depth + 1, c.children.iter()));
                    }
                    return Some((depth, c));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
