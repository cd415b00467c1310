use crate::trip::TripId;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const PREFIX: &str = "TRIP-";
const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub trait TripIdGenerator: Send + Sync {
    fn next_id(&self) -> TripId;
}

/// `TRIP-` followed by nine random base-36 characters.
pub struct RandomTripIds {
    rng: Mutex<SmallRng>,
}

impl RandomTripIds {
    pub fn from_os_rng() -> RandomTripIds {
        RandomTripIds {
            rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> RandomTripIds {
        RandomTripIds {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl TripIdGenerator for RandomTripIds {
    fn next_id(&self) -> TripId {
        let mut rng = self.rng.lock();
        let suffix = (0..SUFFIX_LEN)
            .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
            .collect::<String>();
        Arc::from(format!("{}{}", PREFIX, suffix))
    }
}
