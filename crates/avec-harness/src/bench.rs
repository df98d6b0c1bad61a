use std::{
    hint::black_box,
    time::{Duration, Instant},
};

use avec_error::{Context, Result, ensure};
use avec_mem::DynArray;

/// Timings of one push workload.
#[derive(Clone, Copy, Debug)]
pub struct BenchReport {
    pub count: usize,
    pub dyn_array: Duration,
    pub vec: Duration,
}

impl BenchReport {

    /// `DynArray` time over `Vec` time.
    pub fn ratio(&self) -> f64 {
        self.dyn_array.as_secs_f64() / self.vec.as_secs_f64().max(f64::MIN_POSITIVE)
    }
}

/// Appends `count` integers to an empty `DynArray` and to an empty `Vec`.
pub fn push_back(count: usize) -> Result<BenchReport> {
    let start = Instant::now();
    let mut array = DynArray::new();
    for i in 0..count {
        array.push_back(black_box(i)).ctx_err("benchmark push")?;
    }
    black_box(&array);
    let dyn_array = start.elapsed();
    ensure!(array.len() == count, "benchmark pushed {} of {}", array.len(), count);
    drop(array);

    let start = Instant::now();
    let mut vec = Vec::new();
    for i in 0..count {
        vec.push(black_box(i));
    }
    black_box(&vec);
    let vec_time = start.elapsed();

    Ok(BenchReport {
        count,
        dyn_array,
        vec: vec_time,
    })
}
