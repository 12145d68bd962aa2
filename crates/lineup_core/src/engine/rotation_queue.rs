//! RotationQueue - fairness order of "who comes off next"
//!
//! An ordered set of player ids: each id appears at most once, the front is
//! the next player scheduled to leave the field. Inactive players are parked
//! outside the order so that reactivation is an explicit insert.

use serde::{Deserialize, Serialize};

use crate::models::PlayerId;

/// Where an id is placed by [`RotationQueue::insert_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueuePosition {
    Front,
    Back,
    /// Clamped to the queue length.
    Index(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationQueue {
    order: Vec<PlayerId>,
    inactive: Vec<PlayerId>,
}

impl RotationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh queue in the given order; repeated ids keep their first position.
    pub fn initialize(ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let mut queue = Self::new();
        for id in ids {
            queue.insert_at(id, QueuePosition::Back);
        }
        queue
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.order.contains(id)
    }

    #[inline]
    pub fn position_of(&self, id: &PlayerId) -> Option<usize> {
        self.order.iter().position(|p| p == id)
    }

    /// Next player scheduled to leave the field.
    #[inline]
    pub fn front(&self) -> Option<&PlayerId> {
        self.order.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerId> {
        self.order.iter()
    }

    pub fn to_vec(&self) -> Vec<PlayerId> {
        self.order.clone()
    }

    /// Players parked by [`Self::deactivate_player`].
    pub fn inactive(&self) -> &[PlayerId] {
        &self.inactive
    }

    /// Inserts `id` at `position`. Returns `false` when it is already queued.
    pub fn insert_at(&mut self, id: PlayerId, position: QueuePosition) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.inactive.retain(|p| p != &id);
        let index = match position {
            QueuePosition::Front => 0,
            QueuePosition::Back => self.order.len(),
            QueuePosition::Index(i) => i.min(self.order.len()),
        };
        self.order.insert(index, id);
        true
    }

    /// Permanent insertion, e.g. a former goalie returning to outfield play.
    /// Appended at the back.
    pub fn add_player(&mut self, id: PlayerId) -> bool {
        self.insert_at(id, QueuePosition::Back)
    }

    /// Permanent removal, e.g. a player promoted to goalie.
    pub fn remove_player(&mut self, id: &PlayerId) -> bool {
        let before = self.order.len() + self.inactive.len();
        self.order.retain(|p| p != id);
        self.inactive.retain(|p| p != id);
        before != self.order.len() + self.inactive.len()
    }

    /// Temporarily takes a player out of the rotation.
    pub fn deactivate_player(&mut self, id: &PlayerId) -> bool {
        match self.position_of(id) {
            Some(index) => {
                let id = self.order.remove(index);
                self.inactive.push(id);
                true
            }
            None => false,
        }
    }

    /// Brings a deactivated player back at the back of the queue.
    pub fn activate_player(&mut self, id: &PlayerId) -> bool {
        if !self.inactive.contains(id) {
            return false;
        }
        self.insert_at(id.clone(), QueuePosition::Back)
    }

    #[inline]
    pub fn reactivate_player(&mut self, id: &PlayerId) -> bool {
        self.activate_player(id)
    }

    pub fn move_to_back(&mut self, id: &PlayerId) -> bool {
        match self.position_of(id) {
            Some(index) => {
                let id = self.order.remove(index);
                self.order.push(id);
                true
            }
            None => false,
        }
    }

    /// Stable reorder: ids matching `first` move ahead of the rest, each
    /// group keeping its relative order.
    pub fn prioritize(&mut self, first: impl Fn(&PlayerId) -> bool) {
        let (mut ahead, behind): (Vec<PlayerId>, Vec<PlayerId>) =
            std::mem::take(&mut self.order).into_iter().partition(|id| first(id));
        ahead.extend(behind);
        self.order = ahead;
    }

    /// Aligns the queue with the currently eligible ids: drops ids no longer
    /// eligible, appends missing ones at the back, keeps relative order.
    pub fn sync_with(&mut self, eligible: &[PlayerId]) {
        self.order.retain(|p| eligible.contains(p));
        self.inactive.retain(|p| !eligible.contains(p));
        for id in eligible {
            if !self.contains(id) {
                self.order.push(id.clone());
            }
        }
    }
}
