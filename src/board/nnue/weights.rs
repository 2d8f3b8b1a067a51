//! Loading and runtime storage of NNUEU network weights.
//!
//! Weight files are plain CSV (one row per line, comma-separated integer
//! fields); parsing them is treated as an external-collaborator concern
//! per the engine's error-handling design, so failures are reported as a
//! typed [`NnueLoadError`] rather than panicking, and a bad `EvalFile`
//! load leaves the previously-loaded network in place.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::transformer::DeltaTable;
use super::{FEATURE_COUNT, FIRST_OUT, KING_BUCKETS, SECOND_HEAD_OUT, THIRD_OUT};

/// Deterministic seed for the placeholder network generated when no
/// `EvalFile` has ever been loaded. No trained weights ship with this
/// crate; this placeholder keeps the engine runnable (and its evaluation
/// function well-defined) out of the box.
const PLACEHOLDER_SEED: u64 = 0x4E_4E_55_45_55_5F_30_31;

#[derive(Debug)]
pub enum NnueLoadError {
    Io { file: String, source: std::io::Error },
    Shape { file: String, expected: usize, found: usize },
    Parse { file: String, field: String },
}

impl fmt::Display for NnueLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NnueLoadError::Io { file, source } => write!(f, "failed to read {file}: {source}"),
            NnueLoadError::Shape { file, expected, found } => {
                write!(f, "{file}: expected {expected} values, found {found}")
            }
            NnueLoadError::Parse { file, field } => write!(f, "{file}: could not parse {field:?} as an integer"),
        }
    }
}

impl std::error::Error for NnueLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NnueLoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub struct NnueWeights {
    pub(crate) first_layer_bias: [i16; FIRST_OUT],
    /// Transposed from the on-disk `[8][640]` layout to `[640][8]`, feature-major
    /// for the accumulator's per-feature add/remove loops.
    pub(crate) first_layer_weights: Box<[[i16; FIRST_OUT]; FEATURE_COUNT]>,
    pub(crate) second_layer_turn: Box<[[[i8; FIRST_OUT]; SECOND_HEAD_OUT]; KING_BUCKETS]>,
    pub(crate) second_layer_not_turn: Box<[[[i8; FIRST_OUT]; SECOND_HEAD_OUT]; KING_BUCKETS]>,
    pub(crate) second_layer_turn_bias: [i16; SECOND_HEAD_OUT],
    pub(crate) second_layer_not_turn_bias: [i16; SECOND_HEAD_OUT],
    pub(crate) third_layer_weights: [[i8; super::SECOND_OUT]; THIRD_OUT],
    pub(crate) third_layer_biases: [i16; THIRD_OUT],
    pub(crate) final_layer_weights: [[i8; THIRD_OUT]; 1],
    pub(crate) final_layer_biases: [i16; 1],
}

static CURRENT: LazyLock<RwLock<Arc<NnueWeights>>> =
    LazyLock::new(|| RwLock::new(Arc::new(NnueWeights::placeholder())));

/// The fused `firstW[add] - firstW[remove]` table for the currently-active
/// weight set, rebuilt only when a new `EvalFile` is loaded.
static CURRENT_DELTAS: LazyLock<RwLock<Arc<DeltaTable>>> =
    LazyLock::new(|| RwLock::new(Arc::new(DeltaTable::build(&CURRENT.read()))));

/// The currently-active weight set (the placeholder network until an
/// `EvalFile` is successfully loaded).
#[must_use]
pub(crate) fn current() -> Arc<NnueWeights> {
    Arc::clone(&CURRENT.read())
}

/// The fused add/remove delta table for the currently-active weight set.
#[must_use]
pub(crate) fn current_deltas() -> Arc<DeltaTable> {
    Arc::clone(&CURRENT_DELTAS.read())
}

/// Parse and install the weight directory at `dir`, replacing the
/// currently-active network only on full success.
pub fn load_from_dir(dir: &Path) -> Result<(), NnueLoadError> {
    let weights = NnueWeights::load_from_dir(dir)?;
    let deltas = DeltaTable::build(&weights);
    *CURRENT.write() = Arc::new(weights);
    *CURRENT_DELTAS.write() = Arc::new(deltas);
    Ok(())
}

fn read_csv_ints(dir: &Path, name: &str) -> Result<Vec<i64>, NnueLoadError> {
    let path = dir.join(name);
    let text = fs::read_to_string(&path).map_err(|source| NnueLoadError::Io { file: name.to_string(), source })?;
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|field| {
            field.trim().parse::<i64>().map_err(|_| NnueLoadError::Parse {
                file: name.to_string(),
                field: field.to_string(),
            })
        })
        .collect()
}

fn expect_len(file: &str, values: &[i64], expected: usize) -> Result<(), NnueLoadError> {
    if values.len() != expected {
        return Err(NnueLoadError::Shape { file: file.to_string(), expected, found: values.len() });
    }
    Ok(())
}

impl NnueWeights {
    fn load_from_dir(dir: &Path) -> Result<Self, NnueLoadError> {
        let first_bias = read_csv_ints(dir, "first_linear_biases.csv")?;
        expect_len("first_linear_biases.csv", &first_bias, FIRST_OUT)?;
        let mut first_layer_bias = [0i16; FIRST_OUT];
        for (slot, v) in first_layer_bias.iter_mut().zip(&first_bias) {
            *slot = *v as i16;
        }

        let first_weights = read_csv_ints(dir, "first_linear_weights.csv")?;
        expect_len("first_linear_weights.csv", &first_weights, FIRST_OUT * FEATURE_COUNT)?;
        let mut first_layer_weights = Box::new([[0i16; FIRST_OUT]; FEATURE_COUNT]);
        for r in 0..FIRST_OUT {
            for c in 0..FEATURE_COUNT {
                first_layer_weights[c][r] = first_weights[r * FEATURE_COUNT + c] as i16;
            }
        }

        let second_turn_w = read_csv_ints(dir, "second_layer_turn_weights.csv")?;
        expect_len("second_layer_turn_weights.csv", &second_turn_w, SECOND_HEAD_OUT * KING_BUCKETS * FIRST_OUT)?;
        let second_layer_turn = reshape_second_layer(&second_turn_w);

        let second_not_turn_w = read_csv_ints(dir, "second_layer_not_turn_weights.csv")?;
        expect_len(
            "second_layer_not_turn_weights.csv",
            &second_not_turn_w,
            SECOND_HEAD_OUT * KING_BUCKETS * FIRST_OUT,
        )?;
        let second_layer_not_turn = reshape_second_layer(&second_not_turn_w);

        let second_turn_b = read_csv_ints(dir, "second_layer_turn_biases.csv")?;
        expect_len("second_layer_turn_biases.csv", &second_turn_b, SECOND_HEAD_OUT)?;
        let mut second_layer_turn_bias = [0i16; SECOND_HEAD_OUT];
        for (slot, v) in second_layer_turn_bias.iter_mut().zip(&second_turn_b) {
            *slot = *v as i16;
        }

        let second_not_turn_b = read_csv_ints(dir, "second_layer_not_turn_biases.csv")?;
        expect_len("second_layer_not_turn_biases.csv", &second_not_turn_b, SECOND_HEAD_OUT)?;
        let mut second_layer_not_turn_bias = [0i16; SECOND_HEAD_OUT];
        for (slot, v) in second_layer_not_turn_bias.iter_mut().zip(&second_not_turn_b) {
            *slot = *v as i16;
        }

        let third_w = read_csv_ints(dir, "third_layer_weights.csv")?;
        expect_len("third_layer_weights.csv", &third_w, THIRD_OUT * super::SECOND_OUT)?;
        let mut third_layer_weights = [[0i8; super::SECOND_OUT]; THIRD_OUT];
        for o in 0..THIRD_OUT {
            for i in 0..super::SECOND_OUT {
                third_layer_weights[o][i] = third_w[o * super::SECOND_OUT + i] as i8;
            }
        }

        let third_b = read_csv_ints(dir, "third_layer_biases.csv")?;
        expect_len("third_layer_biases.csv", &third_b, THIRD_OUT)?;
        let mut third_layer_biases = [0i16; THIRD_OUT];
        for (slot, v) in third_layer_biases.iter_mut().zip(&third_b) {
            *slot = *v as i16;
        }

        let final_w = read_csv_ints(dir, "final_layer_weights.csv")?;
        expect_len("final_layer_weights.csv", &final_w, THIRD_OUT)?;
        let mut final_layer_weights = [[0i8; THIRD_OUT]; 1];
        for i in 0..THIRD_OUT {
            final_layer_weights[0][i] = final_w[i] as i8;
        }

        let final_b = read_csv_ints(dir, "final_layer_biases.csv")?;
        expect_len("final_layer_biases.csv", &final_b, 1)?;
        let final_layer_biases = [final_b[0] as i16];

        Ok(NnueWeights {
            first_layer_bias,
            first_layer_weights,
            second_layer_turn,
            second_layer_not_turn,
            second_layer_turn_bias,
            second_layer_not_turn_bias,
            third_layer_weights,
            third_layer_biases,
            final_layer_weights,
            final_layer_biases,
        })
    }

    /// A deterministic, seeded-random network used until a real `EvalFile`
    /// is loaded. It produces well-defined (if meaningless) evaluations
    /// rather than leaving the engine without a network at all.
    fn placeholder() -> Self {
        let mut rng = StdRng::seed_from_u64(PLACEHOLDER_SEED);
        let mut first_layer_bias = [0i16; FIRST_OUT];
        for b in &mut first_layer_bias {
            *b = rng.gen_range(-256..=256);
        }

        let mut first_layer_weights = Box::new([[0i16; FIRST_OUT]; FEATURE_COUNT]);
        for row in first_layer_weights.iter_mut() {
            for w in row.iter_mut() {
                *w = rng.gen_range(-64..=64);
            }
        }

        let gen_second_layer = |rng: &mut StdRng| -> Box<[[[i8; FIRST_OUT]; SECOND_HEAD_OUT]; KING_BUCKETS]> {
            let mut table = Box::new([[[0i8; FIRST_OUT]; SECOND_HEAD_OUT]; KING_BUCKETS]);
            for bucket in table.iter_mut() {
                for out in bucket.iter_mut() {
                    for w in out.iter_mut() {
                        *w = rng.gen_range(-32..=32);
                    }
                }
            }
            table
        };
        let second_layer_turn = gen_second_layer(&mut rng);
        let second_layer_not_turn = gen_second_layer(&mut rng);

        let mut second_layer_turn_bias = [0i16; SECOND_HEAD_OUT];
        let mut second_layer_not_turn_bias = [0i16; SECOND_HEAD_OUT];
        for b in second_layer_turn_bias.iter_mut().chain(second_layer_not_turn_bias.iter_mut()) {
            *b = rng.next_u64() as i16;
        }

        let mut third_layer_weights = [[0i8; super::SECOND_OUT]; THIRD_OUT];
        for row in &mut third_layer_weights {
            for w in row.iter_mut() {
                *w = rng.gen_range(-32..=32);
            }
        }
        let mut third_layer_biases = [0i16; THIRD_OUT];
        for b in &mut third_layer_biases {
            *b = rng.gen_range(-256..=256);
        }

        let mut final_layer_weights = [[0i8; THIRD_OUT]; 1];
        for w in &mut final_layer_weights[0] {
            *w = rng.gen_range(-32..=32);
        }
        let final_layer_biases = [rng.gen_range(0..=NNUE_MIDPOINT_BIAS_RANGE)];

        NnueWeights {
            first_layer_bias,
            first_layer_weights,
            second_layer_turn,
            second_layer_not_turn,
            second_layer_turn_bias,
            second_layer_not_turn_bias,
            third_layer_weights,
            third_layer_biases,
            final_layer_weights,
            final_layer_biases,
        }
    }
}

const NNUE_MIDPOINT_BIAS_RANGE: i16 = 2048;

fn reshape_second_layer(flat: &[i64]) -> Box<[[[i8; FIRST_OUT]; SECOND_HEAD_OUT]; KING_BUCKETS]> {
    // On disk: 4 rows x 512 columns, row r column (k*8 + i) is the weight
    // for king bucket k, output r, input i.
    let mut table = Box::new([[[0i8; FIRST_OUT]; SECOND_HEAD_OUT]; KING_BUCKETS]);
    let cols = KING_BUCKETS * FIRST_OUT;
    for r in 0..SECOND_HEAD_OUT {
        for k in 0..KING_BUCKETS {
            for i in 0..FIRST_OUT {
                table[k][r][i] = flat[r * cols + k * FIRST_OUT + i] as i8;
            }
        }
    }
    table
}
