//! Controller parameters and the genetic operators over them

use rand::Rng;
use rand_distr::StandardNormal;

use super::observation::input_size;
use crate::game::Board;
use crate::tensor::Matrix;

/// Units in each of the two hidden layers
pub const HIDDEN_UNITS: usize = 16;

/// One output per direction
pub const OUTPUTS: usize = 4;

/// Weights and biases of one controller
///
/// Three weight matrices (`input×16`, `16×16`, `16×4`) and two bias rows
/// (`1×16`, `1×16`); the output layer has no bias. This is the unit that
/// gets persisted, mutated and crossed over.
#[derive(Debug, Clone, PartialEq)]
pub struct Variables {
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
}

impl Variables {
    pub fn new(weights: Vec<Matrix>, biases: Vec<Matrix>) -> Self {
        Self { weights, biases }
    }

    /// Fresh controller for `board` with standard normal parameters
    pub fn random<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Self {
        let weights: Vec<Matrix> = Self::weight_shapes(board)
            .into_iter()
            .map(|(rows, cols)| Matrix::random_normal(rows, cols, rng))
            .collect();
        let biases = weights[..weights.len() - 1]
            .iter()
            .map(|w| Matrix::random_normal(1, w.cols(), rng))
            .collect();

        Self { weights, biases }
    }

    fn weight_shapes(board: &Board) -> [(usize, usize); 3] {
        [
            (input_size(board), HIDDEN_UNITS),
            (HIDDEN_UNITS, HIDDEN_UNITS),
            (HIDDEN_UNITS, OUTPUTS),
        ]
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix] {
        &self.biases
    }

    /// True if these parameters have the topology expected for `board`
    pub fn fits(&self, board: &Board) -> bool {
        let shapes = Self::weight_shapes(board);
        self.weights.len() == shapes.len()
            && self.biases.len() == shapes.len() - 1
            && self.weights.iter().zip(shapes).all(|(w, s)| w.dims() == s)
            && self
                .biases
                .iter()
                .zip(&self.weights)
                .all(|(b, w)| b.dims() == (1, w.cols()))
    }

    /// Copy where each entry is independently redrawn from a standard
    /// normal with probability `p`
    pub fn mutated<R: Rng + ?Sized>(&self, p: f64, rng: &mut R) -> Self {
        let mut mutate = |matrices: &[Matrix]| -> Vec<Matrix> {
            matrices
                .iter()
                .map(|m| {
                    m.map(|x| {
                        if rng.gen::<f64>() < p {
                            rng.sample(StandardNormal)
                        } else {
                            x
                        }
                    })
                })
                .collect()
        };

        let weights = mutate(&self.weights);
        let biases = mutate(&self.biases);
        Self { weights, biases }
    }

    /// Cross these parameters with `other`.
    ///
    /// Each entry is redrawn from a standard normal with probability `p`.
    /// Otherwise a weight is drawn uniformly between the two parents'
    /// values, and a bias is copied from one parent picked by coin flip.
    ///
    /// # Panics
    ///
    /// If the two parents do not share a topology.
    pub fn offspring<R: Rng + ?Sized>(&self, other: &Variables, p: f64, rng: &mut R) -> Self {
        assert!(
            self.same_topology(other),
            "cannot cross controllers with different topologies"
        );

        let weights = self
            .weights
            .iter()
            .zip(&other.weights)
            .map(|(a, b)| {
                zip_entries(a, b, |v1, v2| {
                    if p > 0.0 && rng.gen::<f64>() < p {
                        return rng.sample(StandardNormal);
                    }
                    let (lo, hi) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
                    rng.gen_range(lo..=hi)
                })
            })
            .collect();

        let biases = self
            .biases
            .iter()
            .zip(&other.biases)
            .map(|(a, b)| {
                zip_entries(a, b, |v1, v2| {
                    if rng.gen::<f64>() < p {
                        rng.sample(StandardNormal)
                    } else if rng.gen_bool(0.5) {
                        v2
                    } else {
                        v1
                    }
                })
            })
            .collect();

        Self { weights, biases }
    }

    fn same_topology(&self, other: &Variables) -> bool {
        let dims = |ms: &[Matrix]| ms.iter().map(Matrix::dims).collect::<Vec<_>>();
        dims(&self.weights) == dims(&other.weights) && dims(&self.biases) == dims(&other.biases)
    }
}

fn zip_entries<F: FnMut(f64, f64) -> f64>(a: &Matrix, b: &Matrix, f: F) -> Matrix {
    match a.try_zip_map(b, f) {
        Ok(m) => m,
        Err(err) => panic!("{err}"),
    }
}
