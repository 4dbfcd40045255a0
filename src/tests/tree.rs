use crate::hash::HashValue;
use crate::merkle_tree::MerkleTree;
use crate::node::LeafNode;
use crate::sha::Sha256;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

type Tree = MerkleTree<Sha256>;
type Leaf = LeafNode<Sha256>;
type Hash = HashValue<Sha256>;

const WORDS: [&str; 9] = [
    "Hello", "World", "how", "are", "you", "I", "am", "doing", "alright!",
];

fn tree_of(words: &[&str]) -> Tree {
    let mut tree = Tree::new();
    for word in words {
        tree.add_leaf(Some(Leaf::from_data(word)));
    }
    tree
}

#[test]
fn every_occupied_leaf_has_a_validating_proof() {
    let tree = tree_of(&WORDS);
    let root = tree.root_hash().unwrap();

    for word in WORDS {
        let digest = Hash::from_data(word);
        let proof = tree.build_existence_proof(&digest).unwrap();
        assert!(proof.validate(&digest, root), "no valid proof for {word:?}");
    }
}

#[test]
fn leaves_added_from_streams_prove_like_in_memory_leaves() {
    let mut tree = Tree::new();
    for word in &WORDS[..5] {
        tree.add_leaf(Some(Leaf::from_data(word)));
    }
    for word in &WORDS[5..] {
        let leaf = Leaf::from_stream(&mut word.as_bytes()).unwrap();
        tree.add_leaf(Some(leaf));
    }

    assert_eq!(tree.root_hash(), tree_of(&WORDS).root_hash());

    let digest = Hash::from_data("doing");
    let proof = tree.build_existence_proof(&digest).unwrap();
    assert!(proof.validate(&digest, tree.root_hash().unwrap()));
}

#[test]
fn removal_invalidates_an_earlier_proof_against_the_new_root() {
    let mut tree = tree_of(&WORDS);
    let old_root = tree.root_hash().unwrap().clone();

    let digest = Hash::from_data("doing");
    let proof = tree.build_existence_proof(&digest).unwrap();
    assert!(proof.validate(&digest, &old_root));

    tree.remove_leaf(&digest).unwrap();
    let new_root = tree.root_hash().unwrap();

    // The snapshot still proves membership in the pre-removal tree, and
    // nothing in the post-removal one.
    assert!(proof.validate(&digest, &old_root));
    assert!(!proof.validate(&digest, new_root));
    assert!(tree.build_existence_proof(&digest).is_none());
}

#[test]
fn updating_a_position_makes_the_new_digest_provable() {
    let mut tree = tree_of(&WORDS);

    let new_digest = Hash::from_data("new word");
    assert!(tree.build_existence_proof(&new_digest).is_none());

    tree.update_leaf_at(2, Leaf::from_data("new word")).unwrap();

    let proof = tree.build_existence_proof(&new_digest).unwrap();
    assert!(proof.validate(&new_digest, tree.root_hash().unwrap()));
}

#[test]
fn the_root_depends_only_on_the_occupied_layout_not_on_history() {
    // Reach the same occupied set at the same positions along two different
    // mutation histories.
    let direct = tree_of(&["Hello", "World", "how"]);

    let mut churned = Tree::new();
    churned.add_leaf(Some(Leaf::from_data("Hello")));
    churned.add_leaf(Some(Leaf::from_data("stale")));
    churned.add_leaf(Some(Leaf::from_data("how")));
    churned
        .update_leaf(&Hash::from_data("stale"), Leaf::from_data("World"))
        .unwrap();

    assert_eq!(direct.root_hash(), churned.root_hash());
}

#[test]
fn a_proof_survives_unrelated_mutations_of_the_tree() {
    let mut tree = tree_of(&WORDS);
    let root = tree.root_hash().unwrap().clone();

    let digest = Hash::from_data("World");
    let proof = tree.build_existence_proof(&digest).unwrap();

    tree.add_leaf(Some(Leaf::from_data("more")));
    tree.remove_leaf(&Hash::from_data("you")).unwrap();

    // Detached snapshot: still valid against the root it was built from.
    assert!(proof.validate(&digest, &root));
}

proptest! {
    #[test]
    fn occupied_digests_map_back_to_distinct_positions(
        words in prop::collection::hash_set("[a-z]{1,12}", 1..40)
    ) {
        let words: Vec<String> = words.into_iter().collect();
        let mut tree = Tree::new();
        let mut positions = Vec::new();
        for word in &words {
            positions.push(tree.add_leaf(Some(Leaf::from_data(word))));
        }

        // Append-only insertion fills 0..n-1 in order.
        prop_assert_eq!(positions, (0..words.len()).collect::<Vec<_>>());
        prop_assert_eq!(tree.leaf_count(), words.len());

        let root = tree.root_hash().unwrap().clone();
        for word in &words {
            let digest = Hash::from_data(word);
            let proof = tree.build_existence_proof(&digest).unwrap();
            prop_assert!(proof.validate(&digest, &root));
        }
    }

    #[test]
    fn proofs_round_trip_after_arbitrary_removals(
        words in prop::collection::hash_set("[a-z]{1,12}", 2..30),
        removal_seed in any::<u64>(),
    ) {
        let words: Vec<String> = words.into_iter().collect();
        let mut tree = Tree::new();
        for word in &words {
            tree.add_leaf(Some(Leaf::from_data(word)));
        }

        let (removed, kept): (Vec<_>, Vec<_>) = words
            .iter()
            .enumerate()
            .partition(|(i, _)| (removal_seed >> (i % 64)) & 1 == 1);

        for (_, word) in &removed {
            tree.remove_leaf(&Hash::from_data(word)).unwrap();
        }

        for (_, word) in &removed {
            prop_assert!(tree.build_existence_proof(&Hash::from_data(word)).is_none());
        }

        if let Some(root) = tree.root_hash().cloned() {
            for (_, word) in &kept {
                let digest = Hash::from_data(word);
                let proof = tree.build_existence_proof(&digest).unwrap();
                prop_assert!(proof.validate(&digest, &root));
            }
        } else {
            prop_assert!(kept.is_empty());
        }
    }

    #[test]
    fn freed_slots_are_reassigned_before_the_bottom_level_grows(
        words in prop::collection::hash_set("[a-z]{1,12}", 4..20),
    ) {
        let words: Vec<String> = words.into_iter().collect();
        let mut tree = Tree::new();
        for word in &words {
            tree.add_leaf(Some(Leaf::from_data(word)));
        }

        let first = tree.remove_leaf(&Hash::from_data(&words[0])).unwrap();
        let second = tree.remove_leaf(&Hash::from_data(&words[1])).unwrap();

        prop_assert_eq!(tree.add_leaf(Some(Leaf::from_data("fresh-one"))), first);
        prop_assert_eq!(tree.add_leaf(Some(Leaf::from_data("fresh-two"))), second);
        prop_assert_eq!(
            tree.add_leaf(Some(Leaf::from_data("fresh-three"))),
            words.len()
        );
        prop_assert_eq!(tree.leaf_slots(), words.len() + 1);
    }
}
