//! Delayed work requested by the sequencer
//!
//! The sequencer never owns a timer. Transitions leave `Scheduled` requests in an
//! outbox; the host runs each one after its delay and hands the `Task` back to
//! `Sequencer::fire`. `TimerQueue` is an in-memory host with a virtual clock.

use std::collections::BTreeMap;

use super::screen::Screen;
use super::sequencer::Sequencer;

/// Continuation to run when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Finish a screen switch by showing the target
    ShowScreen(Screen),
    /// Reveal the next character of the stage 1 message
    RevealNext { generation: u32 },
    /// Show the stage 1 next button after the reveal finished
    RevealAdvance { generation: u32 },
    /// Show the stage 2 next button once every wish is revealed
    WishesAdvance { cycle: u32 },
    /// Remove the wrong-password shake
    EndShake { serial: u32 },
}

/// A task with the delay it should run after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub delay_ms: u32,
    pub task: Task,
}

impl Scheduled {
    pub fn after(delay_ms: u32, task: Task) -> Self {
        Self { delay_ms, task }
    }
}

/// Virtual-clock timer. Tasks due at the same instant run in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    seq: u64,
    pending: BTreeMap<(u64, u64), Task>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, request: Scheduled) {
        let due = self.now_ms + u64::from(request.delay_ms);
        self.pending.insert((due, self.seq), request.task);
        self.seq += 1;
    }

    pub fn schedule_all(&mut self, requests: impl IntoIterator<Item = Scheduled>) {
        for request in requests {
            self.schedule(request);
        }
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|&(due, _)| due)
    }

    /// Remove the earliest task due at or before `until_ms`, moving the clock to it
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Task> {
        let (&key, _) = self.pending.iter().next()?;
        if key.0 > until_ms {
            return None;
        }
        self.now_ms = self.now_ms.max(key.0);
        self.pending.remove(&key)
    }

    /// Run every task due up to `until_ms`, including tasks scheduled while
    /// running. Returns how many tasks fired.
    pub fn run_until(&mut self, sequencer: &mut Sequencer, until_ms: u64) -> usize {
        self.schedule_all(sequencer.take_scheduled());

        let mut fired = 0;
        while let Some(task) = self.pop_due(until_ms) {
            sequencer.fire(task);
            self.schedule_all(sequencer.take_scheduled());
            fired += 1;
        }

        self.now_ms = self.now_ms.max(until_ms);
        fired
    }

    /// Advance the clock by `ms`, running whatever comes due
    pub fn run_for(&mut self, sequencer: &mut Sequencer, ms: u64) -> usize {
        let until = self.now_ms + ms;
        self.run_until(sequencer, until)
    }

    /// Run until nothing is pending
    pub fn settle(&mut self, sequencer: &mut Sequencer) -> usize {
        self.schedule_all(sequencer.take_scheduled());

        let mut fired = 0;
        while let Some(due) = self.next_due() {
            fired += self.run_until(sequencer, due);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(Scheduled::after(300, Task::ShowScreen(Screen::Landing)));
        queue.schedule(Scheduled::after(30, Task::RevealNext { generation: 1 }));
        queue.schedule(Scheduled::after(30, Task::RevealNext { generation: 2 }));

        assert_eq!(queue.next_due(), Some(30));
        assert_eq!(queue.pop_due(10), None);
        assert_eq!(
            queue.pop_due(1000),
            Some(Task::RevealNext { generation: 1 })
        );
        assert_eq!(
            queue.pop_due(1000),
            Some(Task::RevealNext { generation: 2 })
        );
        assert_eq!(queue.now_ms(), 30);
        assert_eq!(
            queue.pop_due(1000),
            Some(Task::ShowScreen(Screen::Landing))
        );
        assert_eq!(queue.now_ms(), 300);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_delays_are_relative_to_clock() {
        let mut queue = TimerQueue::new();
        queue.schedule(Scheduled::after(100, Task::EndShake { serial: 1 }));
        assert_eq!(queue.pop_due(100), Some(Task::EndShake { serial: 1 }));

        queue.schedule(Scheduled::after(50, Task::EndShake { serial: 2 }));
        assert_eq!(queue.next_due(), Some(150));
        assert_eq!(queue.len(), 1);
    }
}
