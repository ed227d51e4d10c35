use rand::Rng;
use sequoia::RbTree;

const KEY_RANGE: std::ops::Range<i32> = -200..200;

/// Runs `rounds` random insertions and deletions against a sorted-`Vec`
/// model of the key multiset, checking the red-black invariants and the
/// in-order traversal after every single operation.
///
/// Deletions draw from the whole key range, so absent-key no-ops are
/// exercised about as often as real removals early on.
pub fn check_against_model(rounds: usize) {
    let mut rng = rand::thread_rng();
    let mut tree: RbTree<i32> = RbTree::new();
    let mut model: Vec<i32> = Vec::new();

    for _ in 0..rounds {
        let key = rng.gen_range(KEY_RANGE);
        if rng.gen_bool(0.5) {
            tree.insert(key);
            let pos = model.binary_search(&key).unwrap_or_else(|e| e);
            model.insert(pos, key);
        } else {
            let removed = tree.delete(&key);
            match model.binary_search(&key) {
                Ok(pos) => {
                    assert_eq!(removed, Some(key));
                    model.remove(pos);
                }
                Err(_) => assert_eq!(removed, None),
            }
        }
        tree.assert_invariants();
        assert_eq!(tree.len(), model.len());
        let keys: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(keys, model);
    }
}
