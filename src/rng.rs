use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Named ChaCha8 streams derived from one master seed. A stream keeps its
/// position between calls, so repeated regenerations draw fresh values.
pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    /// The stream called `name`, seeded from the master on first use.
    pub fn stream(&mut self, name: &str) -> &mut ChaCha8Rng {
        let master = &mut self.master;
        self.streams
            .entry(name.to_owned())
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(master.next_u64()))
    }
}
