//! # Room Streaming
//!
//! Keeps the live actor collection in step with the set of reachable rooms
//! without blocking the tick on room I/O.
//!
//! The manager is either `Idle` or `Loading` one background batch. A batch
//! builds fresh actors for the rooms to load and drops the actors retired by
//! the previous splice; it never sees the live collection. The simulation
//! thread polls the batch's single-slot channel once per tick and, once a
//! result is there, joins the worker and splices the result in.

use super::{MapError, RoomId, RoomProvider};
use crate::config::EntityCatalog;
use crate::entity::{Actor, ActorCollection, ActorKey};
use crate::foundation::time::Stopwatch;
use crossbeam_channel::{Receiver, TryRecvError};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Streaming failures; logged, never propagated out of a tick
#[derive(Debug, Error)]
pub enum StreamingError {
    /// The worker thread could not be started
    #[error("Failed to spawn streaming worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker died before reporting a result
    #[error("Streaming worker panicked")]
    WorkerPanicked,
}

/// Rooms to load and unload, computed from the reachable set
///
/// A room is never in both sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingRequest {
    /// Reachable rooms not yet loaded
    pub load: BTreeSet<RoomId>,
    /// Loaded rooms no longer reachable
    pub unload: BTreeSet<RoomId>,
}

impl StreamingRequest {
    /// Difference between what is reachable and what is loaded
    pub fn between(reachable: &BTreeSet<RoomId>, loaded: &BTreeSet<RoomId>) -> Self {
        Self {
            load: reachable.difference(loaded).cloned().collect(),
            unload: loaded.difference(reachable).cloned().collect(),
        }
    }

    /// Whether there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.load.is_empty() && self.unload.is_empty()
    }
}

/// The current room plus every room its doors lead to
pub fn reachable_rooms(current: &RoomId, actors: &ActorCollection) -> BTreeSet<RoomId> {
    let mut reachable = actors.door_destinations(current);
    reachable.insert(current.clone());
    reachable
}

/// What a splice changed
#[derive(Debug, Default)]
pub struct SpliceReport {
    /// Rooms whose actors were appended
    pub loaded: Vec<RoomId>,
    /// Rooms whose actors were removed
    pub unloaded: Vec<RoomId>,
    /// Rooms that failed to load (retried later)
    pub failed: Vec<RoomId>,
    /// Handles of the appended actors, in collection order
    pub spawned: Vec<ActorKey>,
}

#[derive(Default)]
struct BatchResult {
    rooms: Vec<(RoomId, Vec<Actor>)>,
    failed: Vec<(RoomId, MapError)>,
}

struct LoadTask {
    handle: JoinHandle<()>,
    receiver: Receiver<BatchResult>,
    request: StreamingRequest,
    stopwatch: Stopwatch,
}

enum StreamingState {
    Idle,
    Loading(LoadTask),
}

/// Background room loader
pub struct StreamingManager {
    provider: Arc<dyn RoomProvider>,
    catalog: Arc<EntityCatalog>,
    probe_thickness: f32,
    enabled: bool,
    state: StreamingState,
    loaded: BTreeSet<RoomId>,
    retired: Vec<Actor>,
    batches: u64,
}

impl StreamingManager {
    /// Idle manager with nothing loaded
    pub fn new(provider: Arc<dyn RoomProvider>, catalog: Arc<EntityCatalog>, probe_thickness: f32) -> Self {
        Self {
            provider,
            catalog,
            probe_thickness,
            enabled: true,
            state: StreamingState::Idle,
            loaded: BTreeSet::new(),
            retired: Vec::new(),
            batches: 0,
        }
    }

    /// Room provider shared with the worker
    pub fn provider(&self) -> &Arc<dyn RoomProvider> {
        &self.provider
    }

    /// Turn background batches on or off; `flush` works either way
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Probe thickness for actors built by later batches
    pub fn set_probe_thickness(&mut self, probe_thickness: f32) {
        self.probe_thickness = probe_thickness;
    }

    /// Whether no batch is in flight
    pub fn is_idle(&self) -> bool {
        matches!(self.state, StreamingState::Idle)
    }

    /// Rooms whose actors are in the live collection
    pub fn loaded_rooms(&self) -> &BTreeSet<RoomId> {
        &self.loaded
    }

    /// Number of batches started so far
    pub fn batches_started(&self) -> u64 {
        self.batches
    }

    /// Non-blocking per-tick step
    ///
    /// Splices a finished batch, then starts a new one if rooms still need
    /// loading or unloading and nothing is in flight.
    pub fn poll(&mut self, current: &RoomId, actors: &mut ActorCollection) -> Option<SpliceReport> {
        let report = self.try_complete(current, actors);

        if self.enabled && self.is_idle() {
            let request = StreamingRequest::between(&reachable_rooms(current, actors), &self.loaded);
            if !request.is_empty() {
                self.start(request);
            }
        }

        report
    }

    /// Block until every reachable room is loaded and every unreachable one unloaded
    ///
    /// Only for use outside the tick loop (startup, respawn). Rooms that fail
    /// during the flush are not retried by it.
    pub fn flush(&mut self, current: &RoomId, actors: &mut ActorCollection) -> SpliceReport {
        let mut total = SpliceReport::default();
        let mut failed = BTreeSet::new();

        loop {
            if let Some(report) = self.wait_complete(current, actors) {
                failed.extend(report.failed.iter().cloned());
                total.loaded.extend(report.loaded);
                total.unloaded.extend(report.unloaded);
                total.failed.extend(report.failed);
                total.spawned.extend(report.spawned);
            }

            let mut request = StreamingRequest::between(&reachable_rooms(current, actors), &self.loaded);
            request.load.retain(|room| !failed.contains(room));
            if request.is_empty() || !self.start(request) {
                break;
            }
        }

        log::debug!(
            "Flushed streaming: {} rooms loaded, {} unloaded, {} failed",
            total.loaded.len(),
            total.unloaded.len(),
            total.failed.len()
        );
        total
    }

    fn start(&mut self, request: StreamingRequest) -> bool {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let provider = Arc::clone(&self.provider);
        let catalog = Arc::clone(&self.catalog);
        let probe_thickness = self.probe_thickness;
        let rooms: Vec<RoomId> = request.load.iter().cloned().collect();
        let retired = std::mem::take(&mut self.retired);

        log::debug!(
            "Starting streaming batch: load {:?}, unload {:?}, {} retired actors",
            request.load,
            request.unload,
            retired.len()
        );

        let spawned = thread::Builder::new().name("room-streaming".to_string()).spawn(move || {
            drop(retired);
            let result = load_rooms(provider.as_ref(), &catalog, probe_thickness, rooms);
            let _ = sender.send(result);
        });

        match spawned {
            Ok(handle) => {
                self.batches += 1;
                self.state = StreamingState::Loading(LoadTask {
                    handle,
                    receiver,
                    request,
                    stopwatch: Stopwatch::start_new(),
                });
                true
            }
            Err(e) => {
                log::error!("{}", StreamingError::from(e));
                false
            }
        }
    }

    fn try_complete(&mut self, current: &RoomId, actors: &mut ActorCollection) -> Option<SpliceReport> {
        let outcome = match &self.state {
            StreamingState::Idle => return None,
            StreamingState::Loading(task) => match task.receiver.try_recv() {
                Ok(result) => Ok(result),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => Err(StreamingError::WorkerPanicked),
            },
        };
        self.finish(outcome, current, actors)
    }

    fn wait_complete(&mut self, current: &RoomId, actors: &mut ActorCollection) -> Option<SpliceReport> {
        let outcome = match &self.state {
            StreamingState::Idle => return None,
            StreamingState::Loading(task) => task.receiver.recv().map_err(|_| StreamingError::WorkerPanicked),
        };
        self.finish(outcome, current, actors)
    }

    fn finish(
        &mut self,
        outcome: Result<BatchResult, StreamingError>,
        current: &RoomId,
        actors: &mut ActorCollection,
    ) -> Option<SpliceReport> {
        let StreamingState::Loading(task) = std::mem::replace(&mut self.state, StreamingState::Idle) else {
            return None;
        };

        // The worker has sent its result (or died), so this join returns at once
        let panicked = task.handle.join().is_err();
        log::debug!("Streaming batch finished after {:?}", task.stopwatch.elapsed());

        match outcome {
            Ok(result) => {
                if panicked {
                    log::error!("{}", StreamingError::WorkerPanicked);
                }
                Some(self.splice(task.request, result, current, actors))
            }
            Err(e) => {
                // Every room of the batch counts as failed so a flush can give up on it
                let lost: Vec<RoomId> = task.request.load.iter().cloned().collect();
                log::error!("{}; rooms {:?} not loaded", e, lost);
                let mut report = self.splice(task.request, BatchResult::default(), current, actors);
                report.failed.extend(lost);
                Some(report)
            }
        }
    }

    /// Merge a finished batch into the live collection
    ///
    /// The reachable set is recomputed here: rooms that became reachable again
    /// while the batch ran are kept, and freshly built rooms that are no longer
    /// reachable are retired instead of appended.
    fn splice(
        &mut self,
        request: StreamingRequest,
        result: BatchResult,
        current: &RoomId,
        actors: &mut ActorCollection,
    ) -> SpliceReport {
        let mut report = SpliceReport::default();
        let reachable = reachable_rooms(current, actors);

        let unload: BTreeSet<RoomId> = request
            .unload
            .into_iter()
            .filter(|room| !reachable.contains(room))
            .collect();
        if !unload.is_empty() {
            let removed = actors.take_rooms(&unload);
            log::debug!("Unloaded rooms {:?} ({} actors)", unload, removed.len());
            self.retired.extend(removed);
            for room in &unload {
                self.loaded.remove(room);
            }
            report.unloaded.extend(unload);
        }

        for (room, room_actors) in result.rooms {
            if reachable.contains(&room) && !self.loaded.contains(&room) {
                log::debug!("Loaded room {} ({} actors)", room, room_actors.len());
                report.spawned.extend(actors.extend(room_actors));
                self.loaded.insert(room.clone());
                report.loaded.push(room);
            } else {
                self.retired.extend(room_actors);
            }
        }

        for (room, error) in result.failed {
            log::warn!("Failed to load room {}: {}", room, error);
            report.failed.push(room);
        }

        report
    }
}

impl Drop for StreamingManager {
    fn drop(&mut self) {
        if let StreamingState::Loading(task) = std::mem::replace(&mut self.state, StreamingState::Idle) {
            if task.handle.join().is_err() {
                log::error!("{}", StreamingError::WorkerPanicked);
            }
        }
    }
}

fn load_rooms(
    provider: &dyn RoomProvider,
    catalog: &EntityCatalog,
    probe_thickness: f32,
    rooms: Vec<RoomId>,
) -> BatchResult {
    let mut result = BatchResult {
        rooms: Vec::with_capacity(rooms.len()),
        failed: Vec::new(),
    };

    for room in rooms {
        let built = provider.load_room(&room).and_then(|descriptors| {
            descriptors
                .iter()
                .map(|descriptor| descriptor.build(&room, catalog, probe_thickness))
                .collect::<Result<Vec<_>, _>>()
        });
        match built {
            Ok(room_actors) => result.rooms.push((room, room_actors)),
            Err(e) => result.failed.push((room, e)),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ActorDescriptor, DescriptorKind};
    use crate::world::{RoomExtent, RoomInfo, WorldMap};
    use crossbeam_channel::Sender;
    use std::time::{Duration, Instant};

    fn terrain() -> ActorDescriptor {
        ActorDescriptor::new("", DescriptorKind::Terrain { width: 100.0, height: 10.0 }, 0.0, 90.0)
    }

    fn door(to: &str) -> ActorDescriptor {
        let kind = DescriptorKind::Door {
            destination: RoomId::from(to),
            width: 4.0,
            height: 40.0,
        };
        ActorDescriptor::new("", kind, 96.0, 50.0)
    }

    fn info(doors: &[&str]) -> RoomInfo {
        RoomInfo {
            extent: RoomExtent::new(0.0, 0.0, 100.0, 100.0),
            doors: doors.iter().map(|d| RoomId::from(*d)).collect(),
        }
    }

    /// A <-> B, C standalone
    fn world() -> WorldMap {
        let mut map = WorldMap::new();
        map.add_room(RoomId::from("A"), info(&["B"]), vec![terrain(), door("B")]);
        map.add_room(RoomId::from("B"), info(&["A"]), vec![terrain(), terrain(), door("A")]);
        map.add_room(RoomId::from("C"), info(&[]), vec![terrain()]);
        map
    }

    fn manager(provider: impl RoomProvider + 'static) -> StreamingManager {
        StreamingManager::new(Arc::new(provider), Arc::new(EntityCatalog::default()), 2.0)
    }

    fn poll_until_idle(manager: &mut StreamingManager, current: &RoomId, actors: &mut ActorCollection) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            manager.poll(current, actors);
            if manager.is_idle() {
                return;
            }
            assert!(Instant::now() < deadline, "streaming batch never finished");
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn rooms_of(actors: &ActorCollection) -> BTreeSet<RoomId> {
        actors.iter().map(|(_, actor)| actor.room.clone()).collect()
    }

    /// Provider whose loads block until the test opens the gate
    struct GatedMap {
        inner: WorldMap,
        gate: Receiver<()>,
    }

    impl RoomProvider for GatedMap {
        fn room_info(&self, room: &RoomId) -> Option<&RoomInfo> {
            self.inner.room_info(room)
        }

        fn load_room(&self, room: &RoomId) -> Result<Vec<ActorDescriptor>, MapError> {
            let _ = self.gate.recv();
            self.inner.load_room(room)
        }
    }

    fn gated() -> (GatedMap, Sender<()>) {
        let (open, gate) = crossbeam_channel::unbounded();
        (GatedMap { inner: world(), gate }, open)
    }

    struct PanickingMap;

    impl RoomProvider for PanickingMap {
        fn room_info(&self, _room: &RoomId) -> Option<&RoomInfo> {
            None
        }

        fn load_room(&self, _room: &RoomId) -> Result<Vec<ActorDescriptor>, MapError> {
            panic!("map provider exploded");
        }
    }

    #[test]
    fn test_request_sets_are_disjoint() {
        let reachable: BTreeSet<RoomId> = ["A", "B"].into_iter().map(RoomId::from).collect();
        let loaded: BTreeSet<RoomId> = ["B", "C"].into_iter().map(RoomId::from).collect();
        let request = StreamingRequest::between(&reachable, &loaded);

        assert_eq!(request.load, [RoomId::from("A")].into_iter().collect::<BTreeSet<_>>());
        assert_eq!(request.unload, [RoomId::from("C")].into_iter().collect::<BTreeSet<_>>());
        assert!(request.load.is_disjoint(&request.unload));
    }

    #[test]
    fn test_flush_loads_current_room_and_neighbours() {
        let mut streaming = manager(world());
        let mut actors = ActorCollection::new();
        let current = RoomId::from("A");

        let report = streaming.flush(&current, &mut actors);

        assert_eq!(report.loaded, vec![RoomId::from("A"), RoomId::from("B")]);
        assert_eq!(actors.len(), 5);
        assert_eq!(rooms_of(&actors), ["A", "B"].into_iter().map(RoomId::from).collect::<BTreeSet<_>>());
        assert!(streaming.is_idle());
    }

    #[test]
    fn test_poll_never_blocks_and_splices_only_after_completion() {
        let (map, open) = gated();
        let mut streaming = manager(map);
        let mut actors = ActorCollection::new();
        let current = RoomId::from("C");

        assert!(streaming.poll(&current, &mut actors).is_none());
        assert!(!streaming.is_idle());

        // Worker is stuck on the gate; the tick goes on with nothing spliced
        for _ in 0..10 {
            assert!(streaming.poll(&current, &mut actors).is_none());
        }
        assert!(actors.is_empty());
        assert_eq!(streaming.batches_started(), 1);

        open.send(()).unwrap();
        poll_until_idle(&mut streaming, &current, &mut actors);

        assert_eq!(actors.len(), 1);
        assert_eq!(streaming.loaded_rooms(), &[RoomId::from("C")].into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_unreachable_room_is_unloaded() {
        let mut streaming = manager(world());
        let mut actors = ActorCollection::new();
        streaming.flush(&RoomId::from("C"), &mut actors);
        let stale: Vec<ActorKey> = actors.keys().to_vec();

        // A's door makes B reachable, so a second batch follows the first
        let current = RoomId::from("A");
        poll_until_idle(&mut streaming, &current, &mut actors);

        assert_eq!(rooms_of(&actors), ["A", "B"].into_iter().map(RoomId::from).collect::<BTreeSet<_>>());
        assert_eq!(streaming.batches_started(), 3);
        assert!(stale.iter().all(|key| actors.get(*key).is_none()));
    }

    #[test]
    fn test_failed_room_is_retried() {
        let mut map = world();
        map.add_room(RoomId::from("D"), info(&[]), vec![ActorDescriptor::new("Dragon", DescriptorKind::Monster, 0.0, 0.0)]);
        let mut streaming = manager(map);
        let mut actors = ActorCollection::new();
        let current = RoomId::from("D");

        let report = streaming.flush(&current, &mut actors);
        assert_eq!(report.failed, vec![RoomId::from("D")]);
        assert!(actors.is_empty());

        // Next tick starts a fresh attempt
        streaming.poll(&current, &mut actors);
        assert_eq!(streaming.batches_started(), 2);
    }

    #[test]
    fn test_worker_panic_leaves_manager_usable() {
        let mut streaming = manager(PanickingMap);
        let mut actors = ActorCollection::new();
        let current = RoomId::from("A");

        streaming.poll(&current, &mut actors);
        streaming.set_enabled(false);
        poll_until_idle(&mut streaming, &current, &mut actors);

        assert!(actors.is_empty());
        assert!(streaming.loaded_rooms().is_empty());
    }

    #[test]
    fn test_flush_gives_up_on_panicking_worker() {
        let mut streaming = manager(PanickingMap);
        let mut actors = ActorCollection::new();
        let current = RoomId::from("A");

        let report = streaming.flush(&current, &mut actors);
        assert_eq!(report.failed, vec![RoomId::from("A")]);
        assert_eq!(streaming.batches_started(), 1);
        assert!(streaming.is_idle());
        assert!(actors.is_empty());
    }

    #[test]
    fn test_malformed_room_fails_alone() {
        let mut map = WorldMap::new();
        let bad = ActorDescriptor::new("", DescriptorKind::Terrain { width: -5.0, height: 10.0 }, 0.0, 90.0);
        map.add_room(RoomId::from("A"), info(&["B", "Bad"]), vec![terrain(), door("B"), door("Bad")]);
        map.add_room(RoomId::from("B"), info(&["A"]), vec![terrain(), door("A")]);
        map.add_room(RoomId::from("Bad"), info(&["A"]), vec![bad, door("A")]);
        let mut streaming = manager(map);
        let mut actors = ActorCollection::new();
        let current = RoomId::from("A");

        let report = streaming.flush(&current, &mut actors);
        assert_eq!(report.failed, vec![RoomId::from("Bad")]);

        let expected: BTreeSet<RoomId> = ["A", "B"].into_iter().map(RoomId::from).collect();
        assert_eq!(rooms_of(&actors), expected);
        assert_eq!(streaming.loaded_rooms(), &expected);
    }

    #[test]
    fn test_disabled_manager_only_flushes() {
        let mut streaming = manager(world());
        streaming.set_enabled(false);
        let mut actors = ActorCollection::new();
        let current = RoomId::from("C");

        assert!(streaming.poll(&current, &mut actors).is_none());
        assert!(streaming.is_idle());

        streaming.flush(&current, &mut actors);
        assert_eq!(actors.len(), 1);
    }
}
