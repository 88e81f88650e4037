//! Size sweep: times transpose + multiply for N = 2, 4, ..., 2^max and prints CSV.
//!
//! ```bash
//! cargo run --release -- 11          # up to 2048x2048
//! PARMUL_WORKERS=1 cargo run --release
//! ```

use std::process::ExitCode;
use std::time::Instant;

use parmul::{Engine, MatrixMut, MatrixRef};
use rand::{rngs::StdRng, Rng, SeedableRng};

const DEFAULT_MAX_EXPONENT: u32 = 10;

fn random_matrix(size: usize, rng: &mut StdRng) -> Vec<f32> {
    (0..size * size).map(|_| rng.random::<f32>()).collect()
}

fn time_one(engine: &Engine, size: usize, rng: &mut StdRng) -> parmul::Result<f64> {
    let a = random_matrix(size, rng);
    let mut b = random_matrix(size, rng);
    let mut c = vec![0.0f32; size * size];

    let left = MatrixRef::new(&a, size)?;
    let mut right = MatrixMut::new(&mut b, size)?;
    let mut out = MatrixMut::new(&mut c, size)?;

    let start = Instant::now();
    engine.multiply(&mut out, left, &mut right)?;
    let elapsed = start.elapsed().as_secs_f64();

    std::hint::black_box(&c);
    Ok(elapsed)
}

fn main() -> ExitCode {
    let max_exponent = match std::env::args().nth(1) {
        None => DEFAULT_MAX_EXPONENT,
        Some(arg) => match arg.parse::<u32>() {
            Ok(e) if (1..=15).contains(&e) => e,
            _ => {
                eprintln!("usage: parmul [max_exponent in 1..=15]");
                return ExitCode::from(2);
            }
        },
    };

    let engine = Engine::default();
    let mut rng = StdRng::seed_from_u64(42);

    println!("Size,Time");
    for size in (1..=max_exponent).map(|n| 2usize.pow(n)) {
        match time_one(&engine, size, &mut rng) {
            Ok(seconds) => println!("{size},{seconds}"),
            Err(e) => {
                eprintln!("size {size}: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
