use serde::Serialize;

use crate::{Feature, InsufficientDataError, InventoryTable};

/// Fewest rows for which a Pearson coefficient is defined.
pub const MIN_CORRELATION_ROWS: usize = 2;

const FEATURE_COUNT: usize = Feature::ALL.len();

/// Pairwise Pearson coefficients over [`Feature::ALL`].
///
/// `coefficients[i][j]` pairs `features[i]` with `features[j]`. A feature
/// with zero variance has `None` across its row and column, diagonal included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub features: Vec<Feature>,
    pub coefficients: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: Feature, column: Feature) -> Option<f64> {
        self.coefficients[row.index()][column.index()]
    }
}

pub fn correlation_matrix(table: &InventoryTable) -> Result<CorrelationMatrix, InsufficientDataError> {
    let rows = table.len();
    if rows < MIN_CORRELATION_ROWS {
        return Err(InsufficientDataError {
            rows,
            required: MIN_CORRELATION_ROWS,
        });
    }

    let mut means = [0.0_f64; FEATURE_COUNT];
    let mut constant = [true; FEATURE_COUNT];
    let first = &table.records()[0];
    for record in table.records() {
        for feature in Feature::ALL {
            let value = feature.value(record);
            means[feature.index()] += value;
            constant[feature.index()] &= value == feature.value(first);
        }
    }
    for mean in &mut means {
        *mean /= rows as f64;
    }

    // Upper triangle of the co-moment matrix; mirrored below.
    let mut comoments = [[0.0_f64; FEATURE_COUNT]; FEATURE_COUNT];
    for record in table.records() {
        let mut deviations = [0.0_f64; FEATURE_COUNT];
        for feature in Feature::ALL {
            deviations[feature.index()] = feature.value(record) - means[feature.index()];
        }
        for i in 0..FEATURE_COUNT {
            for j in i..FEATURE_COUNT {
                comoments[i][j] += deviations[i] * deviations[j];
            }
        }
    }

    // A constant column can leave rounding residue in its variance when the
    // mean is not representable, so degeneracy is decided on the raw values.
    let degenerate = |i: usize| constant[i] || comoments[i][i] <= 0.0;

    let mut coefficients = vec![vec![None; FEATURE_COUNT]; FEATURE_COUNT];
    for i in 0..FEATURE_COUNT {
        if degenerate(i) {
            continue;
        }
        coefficients[i][i] = Some(1.0);
        for j in (i + 1)..FEATURE_COUNT {
            if degenerate(j) {
                continue;
            }
            let r = comoments[i][j] / (comoments[i][i] * comoments[j][j]).sqrt();
            let r = r.clamp(-1.0, 1.0);
            coefficients[i][j] = Some(r);
            coefficients[j][i] = Some(r);
        }
    }

    Ok(CorrelationMatrix {
        features: Feature::ALL.to_vec(),
        coefficients,
    })
}
