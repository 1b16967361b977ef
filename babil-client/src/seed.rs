//! Snapshot the comment section starts from

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::{
    api::{AuthorSnapshot, Comment, CommentId, Time, UserId},
    Forest,
};

pub fn current_user() -> AuthorSnapshot {
    AuthorSnapshot::new(
        UserId(String::from("user123")),
        String::from("Tsague Inares"),
        None,
    )
}

pub fn initial_forest() -> Forest {
    Forest::from_seed(initial_comments()).expect("built-in seed is well-formed")
}

pub fn initial_comments() -> Vec<Comment> {
    let alice = author("alice.martin", "Alice Martin");
    let bob = author("bob.dupont", "Bob Dupont");
    let charlie = author("charlie.brown", "Charlie Brown");
    let david = author("david.s", "David S.");

    let c1 = comment(
        "c1",
        None,
        &alice,
        "Ça c'est fait. Bon travail à l'équipe !",
        at(10, 0),
        15,
        2,
    );
    let r1_1 = comment(
        "r1-1",
        Some("c1"),
        &bob,
        "Merci Alice ! On a mis les bouchées doubles.",
        at(11, 30),
        5,
        0,
    );
    let r1_2 = comment(
        "r1-2",
        Some("c1"),
        &charlie,
        "Super ! Est-ce qu'on peut avoir un point sur le next step ?",
        at(12, 0),
        8,
        1,
    );
    let r1_2_1 = comment(
        "r1-2-1",
        Some("r1-2"),
        &alice,
        "Oui Charlie, je prépare ça pour demain matin.",
        at(14, 0),
        2,
        0,
    );
    let c2 = comment(
        "c2",
        None,
        &david,
        "Je confirme, c'est validé de mon côté.",
        at(15, 45),
        10,
        0,
    );

    let r1_2 = r1_2.with_reply(Arc::new(r1_2_1));
    let c1 = c1.with_reply(Arc::new(r1_1)).with_reply(Arc::new(r1_2));
    vec![c1, c2]
}

fn author(id: &str, name: &str) -> AuthorSnapshot {
    AuthorSnapshot::new(UserId(String::from(id)), String::from(name), None)
}

fn at(hour: u32, min: u32) -> Time {
    Utc.with_ymd_and_hms(2025, 7, 7, hour, min, 0)
        .single()
        .expect("seed timestamps are valid")
}

fn comment(
    id: &str,
    parent: Option<&str>,
    author: &AuthorSnapshot,
    text: &str,
    created_at: Time,
    likes: u64,
    dislikes: u64,
) -> Comment {
    let mut c = Comment::new(
        CommentId::from(id),
        parent.map(CommentId::from),
        author.clone(),
        String::from(text),
        created_at,
    );
    c.likes = likes;
    c.dislikes = dislikes;
    c
}
