use anyhow::{ensure, Result};
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Forest hyperparameters. Defaults mirror the original analysis:
/// 50 trees, minimum split weight 10, seed 1.
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_trees: usize,
    pub min_weight_split: f32,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 50,
            min_weight_split: 10.0,
            seed: 1,
        }
    }
}

/// Random forest classifier: bootstrap-bagged decision trees with a
/// majority-vote prediction.
pub struct RandomForest {
    trees: Vec<DecisionTree<f64, usize>>,
}

impl RandomForest {
    /// Train the forest. Each tree is fit on a bootstrap resample of the rows
    /// drawn with a seeded generator, so training is deterministic.
    pub fn fit(x: &Array2<f64>, y: &Array1<usize>, params: &ForestParams) -> Result<Self> {
        ensure!(
            x.nrows() == y.len(),
            "feature matrix has {} rows but {} targets",
            x.nrows(),
            y.len()
        );
        ensure!(x.nrows() > 0, "cannot fit a forest on zero rows");

        let n = x.nrows();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let records = x.select(Axis(0), &sample);
            let targets = y.select(Axis(0), &sample);
            let dataset = Dataset::new(records, targets);

            let tree = DecisionTree::params()
                .min_weight_split(params.min_weight_split)
                .fit(&dataset)?;
            trees.push(tree);
        }

        Ok(Self { trees })
    }

    /// Predict win/loss labels by majority vote across the trees.
    /// An exact tie goes to the negative class.
    pub fn predict(&self, x: &Array2<f64>) -> Array1<usize> {
        let mut win_votes = vec![0usize; x.nrows()];
        for tree in &self.trees {
            let preds = tree.predict(x);
            for (votes, pred) in win_votes.iter_mut().zip(preds.iter()) {
                *votes += *pred;
            }
        }

        Array1::from_iter(
            win_votes
                .into_iter()
                .map(|votes| usize::from(votes * 2 > self.trees.len())),
        )
    }
}
