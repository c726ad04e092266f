//! Fixed-depth moving-average filter for ADC codes

/// Circular moving average over the last `N` samples
///
/// The first sample fills every slot, so the output starts at that sample
/// instead of ramping up from zero.
#[derive(Debug, Clone)]
pub struct MovingAverage<const N: usize> {
    slots: [u16; N],
    index: usize,
    primed: bool,
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MovingAverage<N> {
    /// Create an empty filter
    pub const fn new() -> Self {
        Self {
            slots: [0; N],
            index: 0,
            primed: false,
        }
    }

    /// Push a sample and return the new average (truncating division)
    pub fn push(&mut self, sample: u16) -> u16 {
        if N == 0 {
            return sample;
        }
        if !self.primed {
            self.slots = [sample; N];
            self.primed = true;
        }
        self.slots[self.index] = sample;
        self.index = (self.index + 1) % N;
        self.average()
    }

    /// Current average, 0 before the first sample
    pub fn average(&self) -> u16 {
        if N == 0 || !self.primed {
            return 0;
        }
        let sum: u32 = self.slots.iter().map(|&s| u32::from(s)).sum();
        (sum / N as u32) as u16
    }

    /// Whether at least one sample has been pushed
    pub fn is_primed(&self) -> bool {
        self.primed
    }
}
