use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

use crate::error::{Error, Result};

// 考える時間と食べる時間の範囲
#[derive(Debug, Clone)]
pub struct Pace {
    think: RangeInclusive<Duration>,
    eat: RangeInclusive<Duration>,
}

impl Pace {
    pub fn new(think: RangeInclusive<Duration>, eat: RangeInclusive<Duration>) -> Result<Self> {
        if think.start() > think.end() || eat.start() > eat.end() {
            return Err(Error::InvalidPace);
        }
        Ok(Pace { think, eat })
    }

    // unit 単位で 1〜2 考え、1〜3 食べる
    pub fn with_unit(unit: Duration) -> Self {
        Pace {
            think: unit..=unit * 2,
            eat: unit..=unit * 3,
        }
    }

    pub fn think(&self) -> Duration {
        sample(&self.think)
    }

    pub fn eat(&self) -> Duration {
        sample(&self.eat)
    }
}

fn sample(range: &RangeInclusive<Duration>) -> Duration {
    rand::thread_rng().gen_range(range.clone())
}
