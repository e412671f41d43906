use crate::config::ArbitrationSetting;

/// The two things that can produce audio.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Owner {
    Player,
    Background,
}

impl Owner {
    fn other(self) -> Self {
        match self {
            Owner::Player => Owner::Background,
            Owner::Background => Owner::Player,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Policy {
    /// At most one owner sounds at a time; a new claim displaces the other.
    #[default]
    Exclusive,
    /// Both may play at once.
    Independent,
}

impl From<ArbitrationSetting> for Policy {
    fn from(setting: ArbitrationSetting) -> Self {
        match setting {
            ArbitrationSetting::Exclusive => Policy::Exclusive,
            ArbitrationSetting::Independent => Policy::Independent,
        }
    }
}

/// Single place that records who currently holds the audio output.
#[derive(Debug, Default)]
pub struct PlaybackArbiter {
    policy: Policy,
    player: bool,
    background: bool,
}

impl PlaybackArbiter {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Record `owner` as playing. Returns the owner that must now go quiet,
    /// if any.
    pub fn claim(&mut self, owner: Owner) -> Option<Owner> {
        *self.slot(owner) = true;
        let other = owner.other();
        if self.policy == Policy::Exclusive && self.holds(other) {
            *self.slot(other) = false;
            return Some(other);
        }
        None
    }

    pub fn release(&mut self, owner: Owner) {
        *self.slot(owner) = false;
    }

    pub fn holds(&self, owner: Owner) -> bool {
        match owner {
            Owner::Player => self.player,
            Owner::Background => self.background,
        }
    }

    fn slot(&mut self, owner: Owner) -> &mut bool {
        match owner {
            Owner::Player => &mut self.player,
            Owner::Background => &mut self.background,
        }
    }
}
