use ordered_tree::{Tree, TreeError};
use quickcheck_macros::quickcheck;

use std::collections::HashSet;

use crate::Op;

/// The height a tree of `n` distinct elements has after rebalancing: `ceil(lg(n + 1)) - 1`.
fn optimal_height(n: usize) -> Result<usize, TreeError> {
    match n {
        0 => Err(TreeError::Empty),
        n => Ok((usize::BITS - 1 - n.leading_zeros()) as usize),
    }
}

/// Applies a set of operations to a tree and to a sorted vector.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we hold the same elements, and that every step
/// reports the same outcome the model does.
fn do_ops<T>(ops: &[Op<T>], tree: &mut Tree<T>, model: &mut Vec<T>) -> bool
where
    T: Ord + Clone + std::fmt::Debug,
{
    for op in ops {
        match op {
            Op::Insert(x) => {
                tree.insert(x.clone());
                let pos = model.partition_point(|y| y <= x);
                model.insert(pos, x.clone());
            }
            Op::Remove(x) => match model.iter().position(|y| y == x) {
                Some(pos) => {
                    model.remove(pos);
                    if tree.remove(x).as_ref() != Ok(x) {
                        return false;
                    }
                }
                None => {
                    if tree.remove(x) != Err(TreeError::NotFound) {
                        return false;
                    }
                }
            },
            Op::Rebalance => tree.rebalance(),
            Op::Iter => {
                if !tree.inorder().eq(model.iter()) {
                    return false;
                }
            }
        }

        if tree.len() != model.len() || tree.iter().count() != model.len() {
            return false;
        }
    }

    tree.inorder().eq(model.iter())
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let _ = pretty_env_logger::try_init();

    let mut tree = Tree::new();
    let mut model = Vec::new();

    do_ops(&ops, &mut tree, &mut model) && model.iter().all(|x| tree.find(x))
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    let mut sorted = xs.clone();
    sorted.sort_unstable();
    xs.iter().all(|x| tree.find(x)) && tree.len() == xs.len() && tree.inorder().eq(sorted.iter())
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.find(x) && tree.successor(x) != Some(x) && tree.predecessor(x) != Some(x))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while tree.remove(delete).is_ok() {}
    }

    let mut still_present = xs;
    for delete in &deletes {
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    still_present.sort_unstable();
    deletes.iter().all(|x| !tree.find(x))
        && still_present.iter().all(|x| tree.find(x))
        && tree.len() == still_present.len()
        && tree.inorder().eq(still_present.iter())
}

#[quickcheck]
fn rebalance_is_height_optimal(xs: HashSet<i16>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    tree.rebalance();
    let first: Vec<_> = tree.preorder().copied().collect();

    tree.rebalance();
    let second: Vec<_> = tree.preorder().copied().collect();

    tree.height() == optimal_height(xs.len()) && first == second && tree.is_balanced()
}

#[quickcheck]
fn rebalance_keeps_duplicates(xs: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    tree.rebalance();

    let mut sorted = xs;
    sorted.sort_unstable();
    tree.len() == sorted.len() && tree.inorder().eq(sorted.iter())
}

#[quickcheck]
fn neighbors(xs: Vec<i8>, q: i8) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    let successor = xs.iter().filter(|x| **x > q).min();
    let predecessor = xs.iter().filter(|x| **x < q).max();

    tree.successor(&q) == successor && tree.predecessor(&q) == predecessor
}

#[quickcheck]
fn range(xs: Vec<i8>, a: i8, b: i8) -> bool {
    let (low, high) = (a.min(b), a.max(b));
    let tree: Tree<_> = xs.iter().copied().collect();

    let mut expected: Vec<_> = xs.iter().filter(|x| low <= **x && **x <= high).collect();
    expected.sort_unstable();

    tree.range_find(&low, &high) == expected
}

#[quickcheck]
fn replace_with_equal_keeps_contents(xs: Vec<i8>, q: i8) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let before: Vec<_> = tree.inorder().copied().collect();

    let replaced = tree.replace(&q, q);
    let after: Vec<_> = tree.inorder().copied().collect();

    replaced == xs.iter().find(|x| **x == q).copied() && before == after
}

#[quickcheck]
fn clone_is_equal(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.into_iter().collect();
    tree.clone() == tree
}

#[quickcheck]
fn clone_after_removals_keeps_shape(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut model = Vec::new();
    if !do_ops(&ops, &mut tree, &mut model) {
        return false;
    }

    let cloned = tree.clone();
    cloned.height() == tree.height()
        && cloned.preorder().eq(tree.preorder())
        && cloned.levelorder().eq(tree.levelorder())
        && cloned.len() == tree.len()
}
