//! Last-request-wins bookkeeping for navigation fetches.
//!
//! Each request takes a ticket for its slot (e.g. "lesson" or "level"). When its
//! fetch completes, the result is only delivered if no newer ticket was issued
//! for the same slot in the meantime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
  slot: &'static str,
  generation: u64,
}

impl Ticket {
  pub fn generation(&self) -> u64 {
    self.generation
  }
}

/// Cheap to clone; clones share the same counters.
#[derive(Clone, Default)]
pub struct Generations {
  latest: Arc<Mutex<HashMap<&'static str, u64>>>,
}

impl Generations {
  pub fn new() -> Self {
    Self::default()
  }

  /// Issue a ticket that supersedes every earlier ticket for `slot`.
  pub fn begin(&self, slot: &'static str) -> Ticket {
    let mut latest = self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let generation = latest.entry(slot).or_insert(0);
    *generation += 1;
    Ticket { slot, generation: *generation }
  }

  pub fn is_current(&self, ticket: &Ticket) -> bool {
    let latest = self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    latest.get(ticket.slot).copied() == Some(ticket.generation)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[test]
  fn newer_ticket_supersedes_older() {
    let g = Generations::new();
    let first = g.begin("lesson");
    assert!(g.is_current(&first));
    let second = g.begin("lesson");
    assert!(!g.is_current(&first));
    assert!(g.is_current(&second));
    assert!(second.generation() > first.generation());
  }

  #[test]
  fn slots_are_independent() {
    let g = Generations::new();
    let lesson = g.begin("lesson");
    let level = g.begin("level");
    assert!(g.is_current(&lesson));
    assert!(g.is_current(&level));
  }

  #[test]
  fn clones_share_state() {
    let g = Generations::new();
    let t = g.begin("lesson");
    g.clone().begin("lesson");
    assert!(!g.is_current(&t));
  }

  #[tokio::test]
  async fn slow_early_request_cannot_overwrite_later_result() {
    let g = Generations::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    for (name, delay_ms) in [("slow-first", 80u64), ("fast-second", 5)] {
      let ticket = g.begin("lesson");
      let g = g.clone();
      let tx = tx.clone();
      tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        if g.is_current(&ticket) {
          let _ = tx.send(name);
        }
      });
    }
    drop(tx);

    let mut delivered = Vec::new();
    while let Some(name) = rx.recv().await {
      delivered.push(name);
    }
    assert_eq!(delivered, vec!["fast-second"]);
  }
}
