use crate::{matching::Matching, preferences::Preferences};

// argsort of a random vector
fn random_permutation(len: usize) -> Vec<usize> {
    let weights = nalgebra::DVector::<f64>::new_random(len);
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| weights[a].total_cmp(&weights[b]));
    order
}

/// Complete random preferences, every hospital with the same capacity.
pub(crate) fn random_instance(m: usize, n: usize, capacity: usize) -> Preferences {
    Preferences::new(
        vec![capacity; m],
        (0..m).map(|_| random_permutation(n)).collect(),
        (0..n).map(|_| random_permutation(m)).collect(),
    )
    .expect("permutations are valid preferences")
}

/// Every one-to-one matching of `k` students onto `k` hospitals.
pub(crate) fn all_assignments(k: usize) -> Vec<Matching> {
    fn permute(prefix: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<Vec<usize>>) {
        if prefix.len() == used.len() {
            out.push(prefix.clone());
            return;
        }
        for i in 0..used.len() {
            if !used[i] {
                used[i] = true;
                prefix.push(i);
                permute(prefix, used, out);
                prefix.pop();
                used[i] = false;
            }
        }
    }

    let mut permutations = Vec::new();
    permute(&mut Vec::with_capacity(k), &mut vec![false; k], &mut permutations);
    permutations
        .into_iter()
        .map(|p| Matching::new(p.into_iter().map(Some).collect(), vec![0; k], 0))
        .collect()
}
