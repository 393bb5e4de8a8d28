//! The live actor collection

use super::{Actor, ActorKey, ActorKind};
use crate::foundation::collections::OrderedHandleMap;
use crate::world::RoomId;
use std::collections::BTreeSet;

/// Owns every live actor, the player included
///
/// Only the simulation thread touches this. Removing an actor invalidates its
/// handle; later lookups through the stale key return `None`.
#[derive(Default)]
pub struct ActorCollection {
    actors: OrderedHandleMap<ActorKey, Actor>,
    player: Option<ActorKey>,
}

impl ActorCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an actor at the end of the collision order
    pub fn spawn(&mut self, actor: Actor) -> ActorKey {
        let is_player = actor.kind() == ActorKind::PlayerCharacter;
        let key = self.actors.insert(actor);
        if is_player {
            if let Some(previous) = self.player.replace(key) {
                log::warn!("Second player spawned; dropping handle {:?}", previous);
            }
        }
        key
    }

    /// Append several actors in order
    pub fn extend(&mut self, actors: impl IntoIterator<Item = Actor>) -> Vec<ActorKey> {
        actors.into_iter().map(|actor| self.spawn(actor)).collect()
    }

    /// Remove one actor, invalidating its handle
    pub fn remove(&mut self, key: ActorKey) -> Option<Actor> {
        if self.player == Some(key) {
            self.player = None;
        }
        self.actors.remove(key)
    }

    /// Handle of the player character
    pub fn player_key(&self) -> Option<ActorKey> {
        self.player.filter(|key| self.actors.contains(*key))
    }

    /// The player character
    pub fn player(&self) -> Option<&Actor> {
        self.player.and_then(|key| self.actors.get(key))
    }

    /// The player character, mutably
    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        self.player.and_then(|key| self.actors.get_mut(key))
    }

    /// Look up an actor
    pub fn get(&self, key: ActorKey) -> Option<&Actor> {
        self.actors.get(key)
    }

    /// Look up an actor mutably
    pub fn get_mut(&mut self, key: ActorKey) -> Option<&mut Actor> {
        self.actors.get_mut(key)
    }

    /// Two distinct actors at once; `None` if either is gone or both keys match
    pub fn get_pair_mut(&mut self, a: ActorKey, b: ActorKey) -> Option<(&mut Actor, &mut Actor)> {
        self.actors.get_pair_mut(a, b)
    }

    /// Whether the handle still refers to a live actor
    pub fn contains(&self, key: ActorKey) -> bool {
        self.actors.contains(key)
    }

    /// Number of live actors
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actors are live
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Handles in collection order
    pub fn keys(&self) -> &[ActorKey] {
        self.actors.keys()
    }

    /// Iterate actors in collection order
    pub fn iter(&self) -> impl Iterator<Item = (ActorKey, &Actor)> + '_ {
        self.actors.iter()
    }

    /// Iterate actors mutably (no particular order)
    pub fn actors_mut(&mut self) -> impl Iterator<Item = &mut Actor> + '_ {
        self.actors.values_mut()
    }

    /// Destinations of the doors owned by `room`
    pub fn door_destinations(&self, room: &RoomId) -> BTreeSet<RoomId> {
        self.iter()
            .filter(|(_, actor)| &actor.room == room)
            .filter_map(|(_, actor)| actor.door_destination().cloned())
            .collect()
    }

    /// Take every non-player actor owned by one of `rooms` out of the collection
    pub fn take_rooms(&mut self, rooms: &BTreeSet<RoomId>) -> Vec<Actor> {
        self.actors
            .drain_where(|actor| actor.kind() != ActorKind::PlayerCharacter && rooms.contains(&actor.room))
    }

    /// Take every actor flagged for removal
    pub fn take_removed(&mut self) -> Vec<Actor> {
        let removed = self.actors.drain_where(Actor::is_marked_removed);
        if self.player.map_or(false, |key| !self.actors.contains(key)) {
            self.player = None;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntityCatalog;
    use crate::foundation::math::Vec2;

    fn terrain(room: &str) -> Actor {
        Actor::terrain(Vec2::zeros(), 10.0, 10.0, RoomId::from(room))
    }

    #[test]
    fn test_stale_handle_after_remove() {
        let mut actors = ActorCollection::new();
        let key = actors.spawn(terrain("A"));
        assert!(actors.remove(key).is_some());
        assert!(actors.get(key).is_none());

        let reused = actors.spawn(terrain("B"));
        assert_ne!(key, reused);
        assert!(actors.get(key).is_none());
    }

    #[test]
    fn test_take_rooms_keeps_player_and_order() {
        let catalog = EntityCatalog::default();
        let mut actors = ActorCollection::new();
        let player = actors.spawn(Actor::player(Vec2::zeros(), catalog.get("Player").unwrap(), 2.0, RoomId::from("C")));
        let a = actors.spawn(terrain("A"));
        actors.spawn(terrain("C"));
        let b = actors.spawn(terrain("B"));

        let rooms: BTreeSet<RoomId> = [RoomId::from("C")].into_iter().collect();
        let taken = actors.take_rooms(&rooms);

        assert_eq!(taken.len(), 1);
        assert_eq!(actors.player_key(), Some(player));
        assert_eq!(actors.keys(), &[player, a, b]);
        let rooms: BTreeSet<RoomId> = actors
            .iter()
            .filter(|(key, _)| *key != player)
            .map(|(_, actor)| actor.room.clone())
            .collect();
        assert_eq!(rooms, ["A", "B"].into_iter().map(RoomId::from).collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_door_destinations_only_from_room() {
        let mut actors = ActorCollection::new();
        actors.spawn(Actor::door(Vec2::zeros(), 4.0, 40.0, RoomId::from("B"), RoomId::from("A")));
        actors.spawn(Actor::door(Vec2::zeros(), 4.0, 40.0, RoomId::from("C"), RoomId::from("B")));

        let from_a = actors.door_destinations(&RoomId::from("A"));
        assert_eq!(from_a.into_iter().collect::<Vec<_>>(), vec![RoomId::from("B")]);
    }

    #[test]
    fn test_take_removed() {
        let mut actors = ActorCollection::new();
        let keep = actors.spawn(terrain("A"));
        let gone = actors.spawn(terrain("A"));
        actors.get_mut(gone).unwrap().mark_removed();

        assert_eq!(actors.take_removed().len(), 1);
        assert!(actors.contains(keep));
        assert!(!actors.contains(gone));
    }
}
