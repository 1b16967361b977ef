use std::{io, sync::Arc};

use anyhow::Context;
use babil_api::{AuthorSnapshot, Comment, CommentId, Time, UserId};
use chrono::{Duration, Utc};
use rand::Rng;

const NUM_USERS: usize = 6;
const NUM_COMMENTS: usize = 120;
const TOP_LEVEL_PROBABILITY: f64 = 0.25;
const MAX_REACTIONS: u64 = 40;
const COMMENT_WORD_COUNT: usize = 12;
const MAX_MINUTES_BETWEEN_COMMENTS: i64 = 600;

fn gen_users(rng: &mut impl Rng) -> Vec<AuthorSnapshot> {
    (0..NUM_USERS)
        .map(|i| {
            let avatar = rng
                .gen_bool(0.3)
                .then(|| format!("https://avatars.example.org/{i}.png"));
            AuthorSnapshot::new(UserId(format!("user{i}")), lipsum::lipsum_title(), avatar)
        })
        .collect()
}

fn gen_comment(
    rng: &mut impl Rng,
    i: usize,
    parent: Option<CommentId>,
    author: AuthorSnapshot,
    date: Time,
) -> Comment {
    let mut c = Comment::new(
        CommentId(format!("g{i}")),
        parent,
        author,
        lipsum::lipsum_words(COMMENT_WORD_COUNT),
        date,
    );
    c.likes = rng.gen_range(0..MAX_REACTIONS);
    c.dislikes = rng.gen_range(0..MAX_REACTIONS);
    match rng.gen_range(0..3) {
        0 => {
            c.liked_by_current_user = true;
            c.likes += 1;
        }
        1 => {
            c.disliked_by_current_user = true;
            c.dislikes += 1;
        }
        _ => (),
    }
    c
}

/// Random forest, returned newest top-level comment first
fn gen_forest(rng: &mut impl Rng, now: Time) -> Vec<Comment> {
    let users = gen_users(rng);

    // Parents always come before their replies, so that dates increase down the tree
    let mut date = now - Duration::minutes(MAX_MINUTES_BETWEEN_COMMENTS * NUM_COMMENTS as i64);
    let mut parents = Vec::with_capacity(NUM_COMMENTS);
    let mut nodes = Vec::with_capacity(NUM_COMMENTS);
    for i in 0..NUM_COMMENTS {
        let parent = match i == 0 || rng.gen_bool(TOP_LEVEL_PROBABILITY) {
            true => None,
            false => Some(rng.gen_range(0..i)),
        };
        date = date + Duration::minutes(rng.gen_range(1..=MAX_MINUTES_BETWEEN_COMMENTS));
        let author = users[rng.gen_range(0..users.len())].clone();
        let parent_id = parent.map(|p: usize| CommentId(format!("g{p}")));
        nodes.push(Some(gen_comment(rng, i, parent_id, author, date)));
        parents.push(parent);
    }

    // Attach from the newest, so each comment has all its replies when it is attached
    let mut replies: Vec<Vec<Comment>> = vec![Vec::new(); NUM_COMMENTS];
    let mut roots = Vec::new();
    for i in (0..NUM_COMMENTS).rev() {
        let mut c = nodes[i].take().expect("each comment is attached once");
        let mut children = std::mem::take(&mut replies[i]);
        children.reverse();
        c.children = children.into_iter().map(Arc::new).collect();
        match parents[i] {
            Some(p) => replies[p].push(c),
            None => roots.push(c),
        }
    }
    roots
}

fn main() -> anyhow::Result<()> {
    let roots = gen_forest(&mut rand::thread_rng(), Utc::now());
    serde_json::to_writer_pretty(io::stdout().lock(), &roots).context("writing generated seed")?;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use babil_client::Forest;

    use super::*;

    #[test]
    fn generated_seed_is_valid() {
        let roots = gen_forest(&mut rand::thread_rng(), Utc::now());
        let forest = Forest::from_seed(roots).expect("generated seed is well-formed");
        assert_eq!(forest.len(), NUM_COMMENTS);

        let dates = forest
            .roots()
            .iter()
            .map(|c| c.created_at)
            .collect::<Vec<_>>();
        let mut newest_first = dates.clone();
        newest_first.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, newest_first);

        for (_, c) in forest.walk() {
            for pair in c.children.windows(2) {
                assert!(pair[0].created_at < pair[1].created_at);
            }
        }
    }
}
