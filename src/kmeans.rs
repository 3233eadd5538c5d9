use log::{debug, info};
use rand::prelude::*;

use crate::error::{KMeansError, Result};
use crate::vector::Vector;

/// Decimal places centroid components are rounded to after each update
/// step. Keeps the convergence comparison stable against floating-point
/// noise.
pub const CENTROID_DECIMALS: u32 = 4;

/// How the initial centroid list is chosen from the input points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitStrategy {
    /// The first k points, in input order. Deterministic.
    #[default]
    FirstK,
    /// A uniform sample of k distinct points, seedable for
    /// reproducibility.
    RandomSample,
}

/// Configuration for one clustering run.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters. Must satisfy 1 < k < n.
    pub k: usize,

    /// Iteration cap. Must satisfy 1 < max_iter < 1000.
    pub max_iter: usize,

    /// Component deltas up to this value still count as converged.
    /// Centroids are rounded to [`CENTROID_DECIMALS`] places before
    /// comparing, so the default of 0.0 is exact equality on the rounded
    /// grid.
    pub tolerance: f64,

    /// Centroid seeding strategy.
    pub init: InitStrategy,

    /// Seed for `RandomSample` initialization; `None` draws from the
    /// thread RNG.
    pub seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 2,
            max_iter: 200,
            tolerance: 0.0,
            init: InitStrategy::FirstK,
            seed: None,
        }
    }
}

impl KMeansConfig {
    /// Configuration with the given cluster count and default everything
    /// else.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_init(mut self, init: InitStrategy) -> Self {
        self.init = init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Final centroids in cluster-id order, components rounded to
    /// [`CENTROID_DECIMALS`] places.
    pub centroids: Vec<Vector>,

    /// Point index to cluster id, always in `[0, k)`.
    pub assignments: Vec<usize>,

    /// Iterations executed.
    pub iterations: usize,

    /// False when the iteration cap was hit before the centroid list
    /// stabilized. The centroids are still the last ones computed; an
    /// unconverged run is a result, not an error.
    pub converged: bool,
}

/// Lloyd's-algorithm k-means over a fixed point list.
#[derive(Debug, Clone, Default)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    /// Cluster `points` into `k` groups.
    ///
    /// Validates all parameters before any other work, then alternates
    /// assignment and update steps until the centroid list stops moving
    /// or the iteration cap is reached.
    pub fn fit(&self, points: &[Vector]) -> Result<KMeansFit> {
        self.validate(points)?;

        let k = self.config.k;
        info!(
            "k-means: k={}, n={}, d={}, max_iter={}",
            k,
            points.len(),
            points[0].dim(),
            self.config.max_iter
        );

        let mut centroids = self.initial_centroids(points);
        let mut assignments = vec![0usize; points.len()];
        let mut iterations = 0;
        let mut converged = false;

        for iter in 0..self.config.max_iter {
            iterations = iter + 1;

            assign_points(points, &centroids, &mut assignments)?;
            let updated = update_centroids(points, &assignments, k, iterations)?;

            converged = lists_converged(&centroids, &updated, self.config.tolerance);
            centroids = updated;
            if converged {
                break;
            }
            debug!("iteration {}: centroids still moving", iterations);
        }

        if converged {
            info!("converged after {} iterations", iterations);
        } else {
            info!("iteration cap reached after {} iterations", iterations);
        }

        Ok(KMeansFit {
            centroids,
            assignments,
            iterations,
            converged,
        })
    }

    fn validate(&self, points: &[Vector]) -> Result<()> {
        let n = points.len();
        let k = self.config.k;

        if n < 1 {
            return Err(KMeansError::InvalidParameter {
                name: "n",
                reason: "need at least one point".into(),
            });
        }
        if !(1 < k && k < n) {
            return Err(KMeansError::InvalidParameter {
                name: "k",
                reason: format!("need 1 < k < n, got k={} with n={}", k, n),
            });
        }

        let dim = points[0].dim();
        if dim < 1 {
            return Err(KMeansError::InvalidParameter {
                name: "d",
                reason: "points must have at least one component".into(),
            });
        }
        if let Some(point) = points.iter().find(|p| p.dim() != dim) {
            return Err(KMeansError::DimensionMismatch {
                op: "fit",
                left: dim,
                right: point.dim(),
            });
        }

        if !(1 < self.config.max_iter && self.config.max_iter < 1000) {
            return Err(KMeansError::InvalidParameter {
                name: "max_iter",
                reason: format!("need 1 < max_iter < 1000, got {}", self.config.max_iter),
            });
        }
        if !(self.config.tolerance >= 0.0) {
            return Err(KMeansError::InvalidParameter {
                name: "tolerance",
                reason: format!("must be a non-negative number, got {}", self.config.tolerance),
            });
        }
        Ok(())
    }

    fn initial_centroids(&self, points: &[Vector]) -> Vec<Vector> {
        let k = self.config.k;
        match self.config.init {
            InitStrategy::FirstK => points.iter().take(k).cloned().collect(),
            InitStrategy::RandomSample => {
                let mut indices: Vec<usize> = (0..points.len()).collect();
                match self.config.seed {
                    Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
                    None => indices.shuffle(&mut thread_rng()),
                }
                indices.iter().take(k).map(|&i| points[i].clone()).collect()
            }
        }
    }
}

/// Label every point with the index of its nearest centroid. Ties go to
/// the lowest centroid index.
fn assign_points(
    points: &[Vector],
    centroids: &[Vector],
    assignments: &mut [usize],
) -> Result<()> {
    for (i, point) in points.iter().enumerate() {
        let mut best_cluster = 0;
        let mut best_dist = f64::INFINITY;

        for (c, centroid) in centroids.iter().enumerate() {
            let dist = point.euclidean_distance(centroid)?;
            if dist < best_dist {
                best_dist = dist;
                best_cluster = c;
            }
        }
        assignments[i] = best_cluster;
    }
    Ok(())
}

/// Recompute each centroid as the component-wise mean of its members,
/// rounded to [`CENTROID_DECIMALS`] places. A memberless cluster fails
/// the run with `EmptyCluster`.
fn update_centroids(
    points: &[Vector],
    assignments: &[usize],
    k: usize,
    iteration: usize,
) -> Result<Vec<Vector>> {
    let dim = points[0].dim();
    let mut sums = vec![Vector::zeros(dim); k];
    let mut counts = vec![0usize; k];

    for (point, &cluster) in points.iter().zip(assignments) {
        sums[cluster] = sums[cluster].add(point)?;
        counts[cluster] += 1;
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(cluster, (sum, count))| {
            if count == 0 {
                return Err(KMeansError::EmptyCluster { cluster, iteration });
            }
            Ok(sum.scale(1.0 / count as f64).rounded(CENTROID_DECIMALS))
        })
        .collect()
}

/// Index-aligned comparison of two centroid lists.
fn lists_converged(previous: &[Vector], updated: &[Vector], tolerance: f64) -> bool {
    previous
        .iter()
        .zip(updated)
        .all(|(a, b)| a.approx_eq(b, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataSet;

    fn grid(points: &[(f64, f64)]) -> Vec<Vector> {
        points
            .iter()
            .map(|&(x, y)| Vector::new(vec![x, y]))
            .collect()
    }

    #[test]
    fn test_k_of_one_is_rejected() {
        let points: Vec<Vector> = (0..10).map(|i| Vector::new(vec![i as f64, 0.0])).collect();
        let err = KMeans::new(KMeansConfig::new(1)).fit(&points).unwrap_err();
        assert!(matches!(err, KMeansError::InvalidParameter { name: "k", .. }));
    }

    #[test]
    fn test_k_equal_to_n_is_rejected() {
        let points: Vec<Vector> = (0..5).map(|i| Vector::new(vec![i as f64])).collect();
        let err = KMeans::new(KMeansConfig::new(5)).fit(&points).unwrap_err();
        assert!(matches!(err, KMeansError::InvalidParameter { name: "k", .. }));
    }

    #[test]
    fn test_no_points_is_rejected() {
        let err = KMeans::new(KMeansConfig::new(2)).fit(&[]).unwrap_err();
        assert!(matches!(err, KMeansError::InvalidParameter { name: "n", .. }));
    }

    #[test]
    fn test_iteration_cap_bounds_are_rejected() {
        let points: Vec<Vector> = (0..10).map(|i| Vector::new(vec![i as f64])).collect();
        for max_iter in [0, 1, 1000] {
            let config = KMeansConfig::new(2).with_max_iter(max_iter);
            let err = KMeans::new(config).fit(&points).unwrap_err();
            assert!(matches!(
                err,
                KMeansError::InvalidParameter { name: "max_iter", .. }
            ));
        }
    }

    #[test]
    fn test_mixed_dimensions_are_rejected() {
        let points = vec![
            Vector::new(vec![0.0, 0.0]),
            Vector::new(vec![1.0, 1.0]),
            Vector::new(vec![2.0]),
            Vector::new(vec![3.0, 3.0]),
        ];
        let err = KMeans::new(KMeansConfig::new(2)).fit(&points).unwrap_err();
        assert!(matches!(err, KMeansError::DimensionMismatch { op: "fit", .. }));
    }

    #[test]
    fn test_two_well_separated_clusters() {
        let points = grid(&[(0.0, 0.0), (10.0, 0.0), (0.0, 1.0), (10.0, 1.0)]);
        let fit = KMeans::new(KMeansConfig::new(2)).fit(&points).unwrap();

        assert!(fit.converged);
        assert!(fit.iterations <= 3);
        assert_eq!(fit.centroids[0], Vector::new(vec![0.0, 0.5]));
        assert_eq!(fit.centroids[1], Vector::new(vec![10.0, 0.5]));
        assert_eq!(fit.assignments, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_assignments_stay_in_range() {
        let points = grid(&[
            (0.0, 0.0),
            (0.2, 0.1),
            (5.0, 5.0),
            (5.1, 4.9),
            (10.0, 0.0),
            (10.2, 0.3),
        ]);
        let fit = KMeans::new(KMeansConfig::new(3)).fit(&points).unwrap();
        assert!(fit.assignments.iter().all(|&c| c < 3));
        assert_eq!(fit.assignments.len(), points.len());
        assert_eq!(fit.centroids.len(), 3);
    }

    #[test]
    fn test_converged_centroids_are_a_fixed_point() {
        let points = grid(&[(0.0, 0.0), (10.0, 0.0), (0.0, 1.0), (10.0, 1.0)]);
        let fit = KMeans::new(KMeansConfig::new(2)).fit(&points).unwrap();
        assert!(fit.converged);

        // One more assignment + update cycle reproduces the converged
        // centroids exactly.
        let mut assignments = vec![0usize; points.len()];
        assign_points(&points, &fit.centroids, &mut assignments).unwrap();
        let again = update_centroids(&points, &assignments, 2, fit.iterations + 1).unwrap();
        assert_eq!(again, fit.centroids);
    }

    #[test]
    fn test_iteration_cap_returns_unconverged_result() {
        let points: Vec<Vector> = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0]
            .iter()
            .map(|&x| Vector::new(vec![x]))
            .collect();
        let config = KMeansConfig::new(2).with_max_iter(2);
        let fit = KMeans::new(config).fit(&points).unwrap();

        assert!(!fit.converged);
        assert_eq!(fit.iterations, 2);
        assert_eq!(fit.centroids.len(), 2);
    }

    #[test]
    fn test_duplicate_seeds_empty_a_cluster() {
        let points = grid(&[(0.0, 0.0), (0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let err = KMeans::new(KMeansConfig::new(2)).fit(&points).unwrap_err();
        assert!(matches!(
            err,
            KMeansError::EmptyCluster { cluster: 1, iteration: 1 }
        ));
    }

    #[test]
    fn test_seeded_random_sample_is_reproducible() {
        let points = grid(&[
            (0.0, 0.0),
            (0.1, 0.0),
            (10.0, 0.0),
            (10.1, 0.0),
            (5.0, 5.0),
            (5.1, 5.0),
        ]);
        let config = KMeansConfig::new(2)
            .with_init(InitStrategy::RandomSample)
            .with_seed(42);

        let first = KMeans::new(config.clone()).fit(&points).unwrap();
        let second = KMeans::new(config).fit(&points).unwrap();

        assert_eq!(first.centroids, second.centroids);
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.iterations, second.iterations);
    }

    #[test]
    fn test_fit_from_parsed_rows() {
        let input = "0.0,0.0\n10.0,0.0\n0.0,1.0\n10.0,1.0\n";
        let ds = DataSet::from_reader(input.as_bytes(), 2).unwrap();
        let fit = KMeans::new(KMeansConfig::new(2)).fit(ds.points()).unwrap();

        assert!(fit.converged);
        assert_eq!(fit.centroids[0], Vector::new(vec![0.0, 0.5]));
        assert_eq!(fit.centroids[1], Vector::new(vec![10.0, 0.5]));
    }
}
