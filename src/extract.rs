use ndarray::Array2;

/// Cluster index of every point, in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterAssignment(Vec<usize>);

impl ClusterAssignment {
    pub fn new(labels: Vec<usize>) -> Self {
        ClusterAssignment(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    /// Number of distinct labels actually used.
    pub fn num_clusters(&self) -> usize {
        self.cluster_sizes().iter().filter(|&&s| s > 0).count()
    }

    /// Points per label, indexed by label up to the largest one seen.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let width = self.0.iter().max().map_or(0, |&m| m + 1);
        let mut sizes = vec![0usize; width];
        for &label in &self.0 {
            sizes[label] += 1;
        }
        sizes
    }
}

impl From<Vec<usize>> for ClusterAssignment {
    fn from(labels: Vec<usize>) -> Self {
        ClusterAssignment(labels)
    }
}

/// Column of the largest entry in each row, lowest column on ties.
pub fn argmax_rows(m: &Array2<f64>) -> ClusterAssignment {
    let labels = m
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            let mut best_val = f64::NEG_INFINITY;
            for (j, &v) in row.iter().enumerate() {
                if v > best_val {
                    best_val = v;
                    best = j;
                }
            }
            best
        })
        .collect();
    ClusterAssignment(labels)
}
