/// Score bookkeeping for one session: milestones crossed and whether the
/// point target has been reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub original: u64,
    pub target_delta: u64,
    pub milestone_interval: u64,
    pub last_milestone: u64,
}

/// What a single score observation changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Observation {
    /// Milestones newly crossed, ascending. One notification each.
    pub milestones: Vec<u64>,
    pub target_reached: bool,
}

impl Progress {
    pub fn new(original: u64, target_delta: u64, milestone_interval: u64) -> Self {
        Self {
            original,
            target_delta,
            milestone_interval: milestone_interval.max(1),
            last_milestone: original,
        }
    }

    pub fn target(&self) -> u64 {
        self.original.saturating_add(self.target_delta)
    }

    pub fn observe(&mut self, score: u64) -> Observation {
        let mut milestones = Vec::new();
        while score >= self.last_milestone + self.milestone_interval {
            self.last_milestone += self.milestone_interval;
            milestones.push(self.last_milestone);
        }
        Observation {
            milestones,
            target_reached: score >= self.target(),
        }
    }
}
