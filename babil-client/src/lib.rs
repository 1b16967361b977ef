mod forest;
pub use forest::{Forest, Walk};

mod section;
pub use section::{CommentSection, SectionMsg};

pub mod seed;

mod ui;
pub use ui::{render_rows, NodeUi, Row, UiState, TOP_LEVEL_PLACEHOLDER};

#[cfg(test)]
mod fuzz;

pub mod api {
    pub use babil_api::*;
}
