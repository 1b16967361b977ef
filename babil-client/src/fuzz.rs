#![cfg(test)]

use std::{cmp, collections::HashSet, ops::RangeTo, sync::Arc};
use bolero::generator::TypeGenerator;

use crate::{
    api::{Comment, CommentId, Error},
    seed, Forest,
};

#[derive(Clone, Debug, bolero::generator::TypeGenerator)]
enum FuzzOp {
    Create {
        parent: Option<usize>,
        #[generator(bolero::generator::gen_with::<String>().len(0..20usize))]
        text: String,
    },
    Like(usize),
    Dislike(usize),
    LikeTwice(usize),
    LikeDislikeUndo(usize),
    Missing,
}

fn resize_int(fuzz_id: usize, RangeTo { end }: RangeTo<usize>) -> Option<usize> {
    if end == 0 {
        return None;
    }
    let bucket_size = cmp::max(1, usize::MAX / end); // in case we rounded to 0
    let id = fuzz_id / bucket_size;
    Some(cmp::min(id, end - 1)) // in case id was actually over end - 1 due to rounding
}

fn nth_id(f: &Forest, fuzz_id: usize) -> Option<CommentId> {
    let i = resize_int(fuzz_id, ..f.len())?;
    f.walk().nth(i).map(|(_, c)| c.id.clone())
}

fn subtree_ids(c: &Comment) -> HashSet<CommentId> {
    let mut res = HashSet::new();
    let mut stack = vec![c];
    while let Some(c) = stack.pop() {
        res.insert(c.id.clone());
        stack.extend(c.children.iter().map(|c| &**c));
    }
    res
}

fn children_ids(c: &Comment) -> Vec<CommentId> {
    c.children.iter().map(|c| c.id.clone()).collect()
}

fn check_invariants(f: &Forest) {
    let mut seen = HashSet::new();
    for (_, c) in f.walk() {
        assert!(seen.insert(c.id.clone()), "duplicate id {}", c.id);
        assert!(
            !(c.liked_by_current_user && c.disliked_by_current_user),
            "comment {} is both liked and disliked",
            c.id
        );
        assert!(!c.text.trim().is_empty());
        for child in c.children.iter() {
            assert_eq!(child.parent_id.as_ref(), Some(&c.id));
        }
    }
}

/// Every top-level comment that does not contain `id` is shared with `before`
fn check_untouched_roots(before: &Forest, after: &Forest, id: &CommentId) {
    assert_eq!(before.roots().len(), after.roots().len());
    for (old, new) in before.roots().iter().zip(after.roots().iter()) {
        if !subtree_ids(old).contains(id) {
            assert!(Arc::ptr_eq(old, new), "root {} was needlessly rebuilt", old.id);
        }
    }
}

fn run(f: &mut Forest, op: FuzzOp) {
    let before = f.clone();
    match op {
        FuzzOp::Create { parent, text } => {
            let parent = parent.and_then(|p| nth_id(f, p));
            let res = f.create_comment(&text, parent.as_ref(), seed::current_user());
            match (res, parent) {
                (Err(e), _) => {
                    assert_eq!(e, Error::EmptyText);
                    assert!(text.trim().is_empty());
                    assert_eq!(*f, before);
                }
                (Ok(c), None) => {
                    assert_eq!(f.roots()[0].id, c.id);
                    assert_eq!(f.roots().len(), before.roots().len() + 1);
                }
                (Ok(c), Some(p)) => {
                    let old = before.find_by_id(&p).unwrap();
                    let new = f.find_by_id(&p).unwrap();
                    assert_eq!(new.children.len(), old.children.len() + 1);
                    assert_eq!(new.children.last().unwrap().id, c.id);
                    for (_, old) in before.walk() {
                        if old.id != p {
                            let new = f.find_by_id(&old.id).unwrap();
                            assert_eq!(children_ids(old), children_ids(new));
                        }
                    }
                    check_untouched_roots(&before, f, &p);
                }
            }
        }
        FuzzOp::Like(i) => {
            if let Some(id) = nth_id(f, i) {
                let old = before.find_by_id(&id).unwrap().clone();
                let new = f.toggle_like(&id).unwrap();
                assert_eq!(new.liked_by_current_user, !old.liked_by_current_user);
                assert_eq!(new.children, old.children);
                check_untouched_roots(&before, f, &id);
            }
        }
        FuzzOp::Dislike(i) => {
            if let Some(id) = nth_id(f, i) {
                let old = before.find_by_id(&id).unwrap().clone();
                let new = f.toggle_dislike(&id).unwrap();
                assert_eq!(new.disliked_by_current_user, !old.disliked_by_current_user);
                check_untouched_roots(&before, f, &id);
            }
        }
        FuzzOp::LikeTwice(i) => {
            if let Some(id) = nth_id(f, i) {
                let old = before.find_by_id(&id).unwrap().clone();
                f.toggle_like(&id).unwrap();
                let new = f.toggle_like(&id).unwrap();
                if !old.disliked_by_current_user {
                    assert_eq!(*new, *old);
                }
                assert_eq!(new.likes, old.likes);
            }
        }
        FuzzOp::LikeDislikeUndo(i) => {
            if let Some(id) = nth_id(f, i) {
                let old = before.find_by_id(&id).unwrap().clone();
                if !old.liked_by_current_user {
                    f.toggle_like(&id).unwrap();
                    f.toggle_dislike(&id).unwrap();
                    let new = f.toggle_dislike(&id).unwrap();
                    assert_eq!(new.likes, old.likes);
                    assert!(!new.liked_by_current_user && !new.disliked_by_current_user);
                }
            }
        }
        FuzzOp::Missing => {
            let missing = CommentId::from("does-not-exist");
            assert_eq!(
                f.toggle_like(&missing),
                Err(Error::NotFound(missing.clone()))
            );
            assert_eq!(
                f.create_comment("hi", Some(&missing), seed::current_user()),
                Err(Error::NotFound(missing))
            );
            assert_eq!(*f, before);
        }
    }
    check_invariants(f);
}

#[test]
fn forest_operations_keep_invariants() {
    bolero::check!()
        .with_generator(bolero::generator::gen_with::<Vec<FuzzOp>>().len(1..100usize))
        .cloned()
        .for_each(|ops| {
            let mut f = seed::initial_forest();
            for op in ops {
                run(&mut f, op);
            }
        })
}

#[test]
fn forest_operations_from_empty() {
    bolero::check!()
        .with_generator(bolero::generator::gen_with::<Vec<FuzzOp>>().len(1..50usize))
        .cloned()
        .for_each(|ops| {
            let mut f = Forest::new();
            for op in ops {
                run(&mut f, op);
            }
        })
}
