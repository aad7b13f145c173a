use std::collections::{BTreeMap, VecDeque};

use voxgate_geom::Vec3;

/// Discrete inputs consumed once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Jump,
    ToggleEditMode,
    ToggleHighlight,
    /// Place or remove at the current selection.
    Edit,
    /// Place against the face of the looked-at cell.
    Place,
    Look { dir: Vec3 },
    Reset,
}

pub struct EventEnvelope {
    pub id: u64,
    pub tick: u64,
    pub kind: Event,
}

/// Events bucketed by the tick they fire on.
pub struct EventQueue {
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        self.emit_at(self.now, kind)
    }

    pub fn emit_at(&mut self, tick: u64, kind: Event) -> u64 {
        let id = self.alloc_id();
        let env = EventEnvelope { id, tick, kind };
        self.by_tick.entry(tick.max(self.now)).or_default().push_back(env);
        id
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.by_tick.get_mut(&self.now)?.pop_front()
    }

    pub fn advance_tick(&mut self) {
        if self.by_tick.get(&self.now).is_some_and(VecDeque::is_empty) {
            self.by_tick.remove(&self.now);
        }
        self.now = self.now.wrapping_add(1);
    }
}

pub fn log_event(env: &EventEnvelope) {
    let (tick, id) = (env.tick, env.id);
    match env.kind {
        Event::Jump => log::debug!(target: "events", "[tick {} #{}] Jump", tick, id),
        Event::ToggleEditMode => {
            log::info!(target: "events", "[tick {} #{}] ToggleEditMode", tick, id)
        }
        Event::ToggleHighlight => {
            log::info!(target: "events", "[tick {} #{}] ToggleHighlight", tick, id)
        }
        Event::Edit => log::info!(target: "events", "[tick {} #{}] Edit", tick, id),
        Event::Place => log::info!(target: "events", "[tick {} #{}] Place", tick, id),
        Event::Look { dir } => log::trace!(
            target: "events",
            "[tick {} #{}] Look dir=({:.2}, {:.2}, {:.2})",
            tick,
            id,
            dir.x,
            dir.y,
            dir.z
        ),
        Event::Reset => log::info!(target: "events", "[tick {} #{}] Reset", tick, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_fire_on_their_tick_in_order() {
        let mut q = EventQueue::new();
        q.emit_at(1, Event::Jump);
        q.emit_now(Event::Edit);
        q.emit_now(Event::Reset);
        assert_eq!(q.pop_ready().map(|e| e.kind), Some(Event::Edit));
        assert_eq!(q.pop_ready().map(|e| e.kind), Some(Event::Reset));
        assert!(q.pop_ready().is_none());
        q.advance_tick();
        assert_eq!(q.pop_ready().map(|e| e.kind), Some(Event::Jump));
        q.advance_tick();
        assert!(q.pop_ready().is_none());
        assert!(q.by_tick.is_empty());
    }

    #[test]
    fn envelopes_carry_the_emitted_id() {
        let mut q = EventQueue::new();
        let a = q.emit_now(Event::Jump);
        let b = q.emit_now(Event::Place);
        assert_ne!(a, b);
        let first = q.pop_ready().expect("first event");
        assert_eq!((first.id, first.kind), (a, Event::Jump));
        log_event(&first);
        assert_eq!(q.pop_ready().map(|e| e.id), Some(b));
    }

    #[test]
    fn past_events_fire_now() {
        let mut q = EventQueue::new();
        q.advance_tick();
        q.advance_tick();
        q.emit_at(0, Event::Jump);
        assert_eq!(q.pop_ready().map(|e| e.tick), Some(0));
    }
}
