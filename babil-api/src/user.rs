#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn stub() -> UserId {
        UserId(String::from("stub"))
    }
}

/// Identity of a comment's author, frozen at the time the comment was written
///
/// Renaming a user later does not change the snapshots held by their old comments.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSnapshot {
    pub id: UserId,
    pub name: String,
    pub initial: String,
    pub avatar_url: Option<String>,
}

impl AuthorSnapshot {
    pub fn new(id: UserId, name: String, avatar_url: Option<String>) -> AuthorSnapshot {
        let initial = initials_of(&name);
        AuthorSnapshot {
            id,
            name,
            initial,
            avatar_url,
        }
    }

    pub fn stub() -> AuthorSnapshot {
        AuthorSnapshot::new(UserId::stub(), String::from("Stub User"), None)
    }
}

/// First letter of at most the two first words, uppercased
fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .flat_map(|c| c.to_uppercase())
        .collect()
}
