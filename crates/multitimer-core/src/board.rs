//! Multi-timer board.
//!
//! Pairs the configuration store with one controller per timer and routes
//! user actions and tick instants to them. Timers are fully independent; the
//! board only fans instants out in store order.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::error::TimerError;
use crate::events::Event;
use crate::notify::Notifier;
use crate::store::{MemoryStore, TimerStore};
use crate::timer::{TimerConfig, TimerController, TimerId, TimerPatch, TimerPhase, TimerSnapshot};

pub struct TimerBoard<S: TimerStore = MemoryStore> {
    store: S,
    controllers: HashMap<TimerId, TimerController>,
    notifier: Box<dyn Notifier>,
}

fn entry<'a, S: TimerStore>(
    store: &'a S,
    controllers: &'a mut HashMap<TimerId, TimerController>,
    id: &TimerId,
) -> Result<(&'a TimerConfig, &'a mut TimerController), TimerError> {
    let config = store.get(id).ok_or(TimerError::NotFound(*id))?;
    let controller = controllers.get_mut(id).ok_or(TimerError::NotFound(*id))?;
    Ok((config, controller))
}

impl<S: TimerStore> TimerBoard<S> {
    /// Build a board over `store`; configs already in it start Idle.
    pub fn new(store: S, notifier: impl Notifier + 'static) -> Self {
        let controllers = store
            .list()
            .into_iter()
            .map(|c| (c.id, TimerController::new(c.id)))
            .collect();
        Self {
            store,
            controllers,
            notifier: Box::new(notifier),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn phase(&self, id: &TimerId) -> Option<TimerPhase> {
        self.controllers.get(id).map(|c| c.phase())
    }

    pub fn controller(&self, id: &TimerId) -> Option<&TimerController> {
        self.controllers.get(id)
    }

    pub fn has_running(&self) -> bool {
        self.controllers
            .values()
            .any(|c| c.phase() == TimerPhase::Running)
    }

    pub fn snapshot<Tz: TimeZone>(&self, id: &TimerId, now: &DateTime<Tz>) -> Result<TimerSnapshot, TimerError> {
        let config = self.store.get(id).ok_or(TimerError::NotFound(*id))?;
        let controller = self.controllers.get(id).ok_or(TimerError::NotFound(*id))?;
        Ok(controller.snapshot(config, now))
    }

    pub fn snapshots<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<TimerSnapshot> {
        self.store
            .list()
            .into_iter()
            .filter_map(|config| {
                self.controllers
                    .get(&config.id)
                    .map(|c| c.snapshot(config, now))
            })
            .collect()
    }

    /// Find a timer by 1-based board position, full id, or unique id prefix.
    ///
    /// Numbers shorter than a short id are positions. Longer all-digit tokens
    /// are tried as id prefixes first, then as positions.
    pub fn resolve(&self, token: &str) -> Result<TimerId, TimerError> {
        let configs = self.store.list();
        let unresolved = |reason: &str| TimerError::Unresolved {
            token: token.to_string(),
            reason: reason.to_string(),
        };
        let position = token.parse::<usize>().ok();
        let by_position = |position: usize| {
            position
                .checked_sub(1)
                .and_then(|i| configs.get(i))
                .map(|c| c.id)
                .ok_or_else(|| unresolved("no timer at that position"))
        };
        if let Some(position) = position.filter(|_| token.len() < TimerId::SHORT_LEN) {
            return by_position(position);
        }
        let needle = token.to_ascii_lowercase();
        let mut matches = configs.iter().filter(|c| {
            let full = c.id.to_string();
            full.starts_with(&needle) || c.id.as_uuid().simple().to_string().starts_with(&needle)
        });
        match (matches.next(), matches.next()) {
            (Some(c), None) => Ok(c.id),
            (Some(_), Some(_)) => Err(unresolved("prefix matches several timers")),
            (None, _) => match position {
                Some(position) => by_position(position),
                None => Err(unresolved("no timer with that id")),
            },
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create a timer with the store's defaults.
    pub fn add<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Event {
        let config = self.store.create();
        self.controllers
            .insert(config.id, TimerController::new(config.id));
        debug!(id = %config.id, title = %config.title, "timer created");
        Event::TimerCreated {
            id: config.id,
            title: config.title,
            at: now.with_timezone(&Utc),
        }
    }

    pub fn start<Tz: TimeZone>(&mut self, id: &TimerId, now: &DateTime<Tz>) -> Result<Option<Event>, TimerError> {
        let (config, controller) = entry(&self.store, &mut self.controllers, id)?;
        controller.start(config, now)
    }

    pub fn pause<Tz: TimeZone>(&mut self, id: &TimerId, now: &DateTime<Tz>) -> Result<Option<Event>, TimerError> {
        let (config, controller) = entry(&self.store, &mut self.controllers, id)?;
        Ok(controller.pause(config, now, self.notifier.as_ref()))
    }

    pub fn reset<Tz: TimeZone>(&mut self, id: &TimerId, now: &DateTime<Tz>) -> Result<Option<Event>, TimerError> {
        let controller = self.controllers.get_mut(id).ok_or(TimerError::NotFound(*id))?;
        Ok(controller.reset(now))
    }

    /// Write `patch` to the store and re-evaluate the start gate.
    pub fn edit<Tz: TimeZone>(
        &mut self,
        id: &TimerId,
        patch: &TimerPatch,
        now: &DateTime<Tz>,
    ) -> Result<Event, TimerError> {
        let controller = self.controllers.get_mut(id).ok_or(TimerError::NotFound(*id))?;
        controller.ensure_editable()?;
        let (config, timing_changed) = self.store.update(id, patch)?;
        controller.config_edited(timing_changed);
        debug!(%id, timing_changed, "config edited");
        Ok(Event::ConfigEdited {
            id: *id,
            timing_changed,
            phase: controller.phase(),
            can_start: controller.can_start(&config, now),
            validation: controller.validation_message(&config, now),
            at: now.with_timezone(&Utc),
        })
    }

    /// Remove the timer; its countdown stops before the config is dropped.
    pub fn delete<Tz: TimeZone>(&mut self, id: &TimerId, now: &DateTime<Tz>) -> Result<Event, TimerError> {
        let mut controller = self.controllers.remove(id).ok_or(TimerError::NotFound(*id))?;
        controller.cancel();
        self.store.delete(id)?;
        debug!(%id, "timer deleted");
        Ok(Event::TimerDeleted {
            id: *id,
            at: now.with_timezone(&Utc),
        })
    }

    pub fn begin_title_edit<Tz: TimeZone>(&mut self, id: &TimerId, now: &DateTime<Tz>) -> Result<Event, TimerError> {
        let (config, controller) = entry(&self.store, &mut self.controllers, id)?;
        let draft = controller.begin_title_edit(&config.title)?.to_string();
        Ok(Event::TitleEditStarted {
            id: *id,
            draft,
            at: now.with_timezone(&Utc),
        })
    }

    pub fn update_title_draft(&mut self, id: &TimerId, text: impl Into<String>) -> Result<(), TimerError> {
        let controller = self.controllers.get_mut(id).ok_or(TimerError::NotFound(*id))?;
        controller.update_title_draft(text)
    }

    /// Commit the draft to the store.
    pub fn commit_title_edit<Tz: TimeZone>(&mut self, id: &TimerId, now: &DateTime<Tz>) -> Result<Event, TimerError> {
        let controller = self.controllers.get_mut(id).ok_or(TimerError::NotFound(*id))?;
        let title = controller.commit_title_edit()?;
        let (config, timing_changed) = self.store.update(id, &TimerPatch::title(title))?;
        controller.config_edited(timing_changed);
        Ok(Event::TitleEditCommitted {
            id: *id,
            title: config.title,
            at: now.with_timezone(&Utc),
        })
    }

    pub fn cancel_title_edit<Tz: TimeZone>(&mut self, id: &TimerId, now: &DateTime<Tz>) -> Result<Event, TimerError> {
        let controller = self.controllers.get_mut(id).ok_or(TimerError::NotFound(*id))?;
        controller.cancel_title_edit()?;
        Ok(Event::TitleEditCancelled {
            id: *id,
            at: now.with_timezone(&Utc),
        })
    }

    /// Deliver one instant to every running timer, in store order.
    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Vec<Event> {
        let notifier = self.notifier.as_ref();
        let mut events = Vec::new();
        for config in self.store.list() {
            if let Some(controller) = self.controllers.get_mut(&config.id) {
                if let Some(event) = controller.tick(config, now, notifier) {
                    events.push(event);
                }
            }
        }
        events
    }
}
