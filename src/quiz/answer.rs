use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerState {
    #[default]
    Unanswered,
    Selected(String),
    Skipped,
}

impl AnswerState {
    pub fn is_recorded(&self) -> bool {
        !matches!(self, AnswerState::Unanswered)
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            AnswerState::Selected(answer) => Some(answer),
            _ => None,
        }
    }
}

/// Dense per-question record, one slot per question index. Slots are only
/// ever overwritten, never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    slots: Vec<AnswerState>,
}

impl AnswerRecord {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![AnswerState::Unanswered; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> &AnswerState {
        const UNANSWERED: AnswerState = AnswerState::Unanswered;
        self.slots.get(index).unwrap_or(&UNANSWERED)
    }

    pub fn is_recorded(&self, index: usize) -> bool {
        self.get(index).is_recorded()
    }

    /// Returns false when `index` is outside the session.
    pub fn record(&mut self, index: usize, state: AnswerState) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnswerState> {
        self.slots.iter()
    }
}
