use crate::CommentId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Comment text is empty")]
    EmptyText,

    #[error("No comment with id {0}")]
    NotFound(CommentId),

    #[error("Comment id already used {0}")]
    IdAlreadyUsed(CommentId),

    /// `parent` is where the comment actually sits, `None` at the top level
    #[error("Comment {child} declares a parent other than the one it sits under")]
    ParentMismatch {
        child: CommentId,
        parent: Option<CommentId>,
    },

    #[error("Comment {0} is both liked and disliked by the current user")]
    ConflictingReactions(CommentId),
}

impl Error {
    /// Rejected input, that would be rejected again if resubmitted as-is
    pub fn is_validation(&self) -> bool {
        !self.is_not_found()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Message suitable for displaying inline next to the form or button that failed
    pub fn user_message(&self) -> String {
        match self {
            Error::EmptyText => String::from("Le commentaire ne peut pas être vide."),
            Error::NotFound(_) => String::from("Ce commentaire n'existe plus."),
            Error::IdAlreadyUsed(id) => format!("Identifiant de commentaire en double : {id}."),
            Error::ParentMismatch { child, .. } => {
                format!("Le commentaire {child} n'est pas rangé sous son parent.")
            }
            Error::ConflictingReactions(id) => {
                format!("Le commentaire {id} ne peut pas être à la fois aimé et non aimé.")
            }
        }
    }
}
