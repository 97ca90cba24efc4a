use crate::{Session, StateError, Status};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Bad,
}

/// Result of one state-machine step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A new candidate entry was marked current; its index is returned so the
    /// caller can synchronize the workspace to it.
    Candidate(usize),
    /// The computed candidate already carries a verdict: the boundary between
    /// the last good and first bad entry is the answer.
    Converged,
}

impl Session {
    /// True once a good entry sits directly below a bad one.
    pub fn is_found(&self) -> bool {
        let mut last_good = None;
        for (i, e) in self.entries.iter().enumerate() {
            match e.status {
                Status::Good => last_good = Some(i),
                Status::Bad => {
                    if i > 0 && last_good == Some(i - 1) {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// 1-based position of the last good entry, defaulting to 1 when nothing
    /// has been marked good yet. Used to window status output and to bound
    /// operator overrides.
    pub fn last_good_position(&self) -> usize {
        let mut last_good = 1;
        for (i, e) in self.entries.iter().enumerate() {
            if e.status == Status::Good {
                last_good = i + 1;
            }
        }
        last_good
    }

    /// Pick the very first candidate: the integer midpoint of the whole
    /// timeline. Only valid on a freshly seeded session.
    pub fn first_pick(&mut self) -> usize {
        let idx = self.entries.len() / 2;
        self.entries[idx].status = Status::Current;
        idx
    }

    /// Resolve the current candidate with a verdict and compute the next one.
    ///
    /// The candidate arithmetic is plain floor division on index distances:
    /// a good verdict moves halfway up towards the first bad entry above (or
    /// the end of the timeline), a bad verdict moves halfway down towards the
    /// last good entry below (or index 0). When the computed index already
    /// carries a verdict the search has converged.
    pub fn advance(&mut self, verdict: Verdict) -> Result<Step, StateError> {
        if self.is_found() {
            return Ok(Step::Converged);
        }

        let current = self
            .entries
            .iter()
            .position(|e| e.status == Status::Current)
            .ok_or(StateError::NoCurrent)?;
        let last_good = self.entries.iter().rposition(|e| e.status == Status::Good);
        let next_bad = self.entries[current + 1..]
            .iter()
            .position(|e| e.status == Status::Bad)
            .map(|off| current + 1 + off);

        let next = match verdict {
            Verdict::Good => {
                self.entries[current].status = Status::Good;
                let bound = next_bad.unwrap_or(self.entries.len());
                current + (bound - current) / 2
            }
            Verdict::Bad => {
                self.entries[current].status = Status::Bad;
                let bound = last_good.unwrap_or(0);
                current - (current - bound) / 2
            }
        };

        if self.entries[next].status != Status::Unmarked {
            return Ok(Step::Converged);
        }
        self.entries[next].status = Status::Current;
        Ok(Step::Candidate(next))
    }

    /// Operator override: jump the current marker to a specific hash. Only
    /// entries strictly between the last good and the first bad entry are
    /// eligible; anything else is rejected without mutating the session.
    pub fn set_current(&mut self, hash: &str) -> Result<usize, StateError> {
        let last_good = self.last_good_position();
        let mut found = None;
        for (i, e) in self.entries.iter().enumerate() {
            if i + 1 <= last_good {
                continue;
            }
            if e.status == Status::Bad {
                break;
            }
            if e.hash == hash {
                found = Some(i);
                break;
            }
        }
        let idx = found.ok_or(StateError::OutsideInterval)?;
        for e in &mut self.entries {
            if e.status == Status::Current {
                e.status = Status::Unmarked;
            }
        }
        self.entries[idx].status = Status::Current;
        Ok(idx)
    }
}
