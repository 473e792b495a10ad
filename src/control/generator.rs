/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::coordinator::Building;

/**
 * Produces random demo requests for a building.
 *
 * The random source is injected so a seeded generator replays the same requests.
 */
pub struct RequestGenerator<R: Rng> {
    rng: R,
    max_requests: usize,
}

impl RequestGenerator<StdRng> {
    pub fn from_seed(seed: Option<u64>, max_requests: usize) -> RequestGenerator<StdRng> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        RequestGenerator::new(rng, max_requests)
    }
}

impl<R: Rng> RequestGenerator<R> {
    pub fn new(rng: R, max_requests: usize) -> RequestGenerator<R> {
        RequestGenerator {
            rng,
            max_requests: max_requests.max(1),
        }
    }

    /// Two distinct floors in `0..n_floors`, uniformly drawn.
    pub fn next_pair(&mut self, n_floors: usize) -> (usize, usize) {
        let start = self.rng.random_range(0..n_floors);
        let mut end = self.rng.random_range(0..n_floors - 1);
        if end >= start {
            end += 1;
        }
        (start, end)
    }

    /// A random batch size in `1..=max_requests`.
    pub fn next_count(&mut self) -> usize {
        self.rng.random_range(1..=self.max_requests)
    }

    /// Submits `count` random requests, returning how many the building accepted.
    pub fn generate(&mut self, building: &mut Building, count: usize) -> usize {
        let mut accepted = 0;
        for _ in 0..count {
            let (start, end) = self.next_pair(building.n_floors());
            if building.add_request(start as i64, end as i64) {
                accepted += 1;
            }
        }
        debug!("Generated {} random request(s), {} accepted", count, accepted);
        accepted
    }
}
