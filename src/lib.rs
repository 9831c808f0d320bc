//! Node and dependency-graph substrate for a heterogeneous (CPU + GPU) task
//! runtime.
//!
//! This crate provides the data structures an executor needs to make correct
//! concurrent scheduling decisions over a DAG of host and device tasks. It:
//! - Represents five task kinds (host, pull, push, transfer, kernel) as a
//!   closed sum type with typed, checked access.
//! - Records dependency edges and keeps an atomic pending-predecessor counter
//!   per node, whose zero-crossing is the sole readiness signal.
//! - Merges device tasks that must share a physical device with a weighted
//!   union-find forest embedded in the nodes.
//! - Lets the members of one affinity set agree on a device through a
//!   lock-free, single-winner claim.
//!
//! Key modules:
//! - `config`: binds allocator, stream and buffer types via the `Config`
//!   trait.
//! - `task`: the `Task` sum type, its five payloads and `TaskKind`.
//! - `node`: `Node`, the graph vertex with adjacency and readiness state.
//! - `graph`: the `Graph` arena: insertion, edges, affinity resolution and
//!   GraphViz output.
//! - `group`: `DeviceGroup`, the shared claim/join object.
//! - `types`: handles (`NodeId`, `GroupId`, `DeviceId`, `GraphId`).
//!
//! Quick start:
//! 1. Implement `Config` for your allocator, stream and buffer types.
//! 2. `Graph::insert` tasks, wire them with `Graph::precede`, and merge
//!    device affinities with `Graph::union` or `Graph::unite_affinities`.
//! 3. Call `Graph::resolve_device_groups`, then hand `&Graph` to worker
//!    threads: start from `Graph::sources`, `DeviceGroup::claim` a device
//!    for grouped tasks, and `Graph::complete` each finished node to learn
//!    which successors became ready.
//!
//! Construction requires `&mut Graph` and is single-writer. During a run the
//! only mutated state is atomic: pending counters strictly decrease to zero
//! and a group's device is installed at most once.

/// Public interface to configure the graph.
///
/// Exposes the `Config` trait binding the collaborator types device work
/// receives, and the `DeviceBuffer` trait for pulled memory.
pub mod config;
/// The node arena.
///
/// Contains node insertion with back-reference validation, dependency edges
/// and readiness propagation, union-find affinity resolution with device
/// group assignment, and GraphViz output.
pub mod graph;
/// Shared device placement for one affinity set.
pub mod group;
/// Graph vertices.
pub mod node;
mod sync;
/// Task payloads.
///
/// Defines the `Task` sum type, the five payload structs and the `Payload`
/// trait used for typed access.
pub mod task;
/// Handles and collection aliases used across the crate.
pub mod types;
