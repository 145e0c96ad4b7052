//! Allocation transitions: request, release, cancel, and promotion.
//!
//! These are the only operations that move instances between a resource's
//! available pool and its allocation edges. Each one validates every
//! precondition before touching the graph, and each returns a description of
//! what it did so a front-end can report it without re-reading the graph.
//!
//! # Promotion
//!
//! After a release, the pending requests on that resource are considered in
//! ascending order of requested amount (ties: older process first). The first
//! one that fits in the available pool is converted into an allocation. At
//! most one request is promoted per release.

use crate::error::RagError;
use crate::graph::{EdgeId, EdgeKind, NodeId, ResourceGraph};

/// Which branch a [`request`](ResourceGraph::request) took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Enough instances were available; they were allocated immediately.
    Allocated,
    /// Not enough instances; a request edge now records the wait.
    Queued,
}

/// A pending request that a release converted into an allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Promotion {
    /// Process whose request was granted.
    pub process: String,
    /// Resource the instances came from.
    pub resource: String,
    /// Number of instances granted.
    pub instances: u32,
}

/// Effects of a [`release`](ResourceGraph::release).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// Instances returned to the resource.
    pub released: u32,
    /// Available instances after the release and any promotion.
    pub available: u32,
    /// The request promoted by this release, if any.
    pub promoted: Option<Promotion>,
}

impl ResourceGraph {
    /// Asks for `amount` instances of `resource` on behalf of `process`.
    ///
    /// If the resource has at least `amount` instances available they are
    /// allocated at once (growing an existing allocation edge when the
    /// process already holds some). Otherwise a request edge is created.
    ///
    /// # Errors
    ///
    /// - [`RagError::NotFound`] if either name is missing or of the wrong kind
    /// - [`RagError::InvalidCount`] if `amount` is 0 or exceeds the resource total
    /// - [`RagError::DuplicateRequest`] if the process is already waiting on it
    pub fn request(
        &mut self,
        process: &str,
        resource: &str,
        amount: u32,
    ) -> Result<RequestOutcome, RagError> {
        let p = self.process_id(process)?;
        let r = self.resource_id(resource)?;
        let (total, available) = self
            .counts(r)
            .ok_or_else(|| RagError::resource_not_found(resource))?;

        if amount < 1 {
            return Err(RagError::invalid_count(
                amount,
                "a request needs at least one instance",
            ));
        }
        if amount > total {
            return Err(RagError::invalid_count(
                amount,
                format!("'{resource}' only has {total} instances"),
            ));
        }
        if self.find_edge(p, r, EdgeKind::Request).is_some() {
            return Err(RagError::DuplicateRequest {
                process: process.to_string(),
                resource: resource.to_string(),
            });
        }

        let outcome = if available >= amount {
            self.set_available(r, available - amount);
            self.grow_edge(EdgeKind::Allocation, r, p, amount);
            RequestOutcome::Allocated
        } else {
            self.connect(EdgeKind::Request, p, r, amount);
            RequestOutcome::Queued
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(process, resource, amount, ?outcome, "alloc_request");
        Ok(outcome)
    }

    /// Returns `amount` held instances of `resource` from `process`, then
    /// promotes at most one pending request on that resource.
    ///
    /// # Errors
    ///
    /// - [`RagError::NotFound`] if either name is missing or of the wrong kind
    /// - [`RagError::NoAllocation`] if the process holds none of the resource
    /// - [`RagError::InvalidCount`] if `amount` is 0 or more than is held
    pub fn release(
        &mut self,
        process: &str,
        resource: &str,
        amount: u32,
    ) -> Result<ReleaseOutcome, RagError> {
        let p = self.process_id(process)?;
        let r = self.resource_id(resource)?;
        let edge_id = self
            .find_edge(r, p, EdgeKind::Allocation)
            .ok_or_else(|| RagError::NoAllocation {
                process: process.to_string(),
                resource: resource.to_string(),
            })?;
        let held = self.edge_data(edge_id).map_or(0, |e| e.instances);

        if amount < 1 {
            return Err(RagError::invalid_count(
                amount,
                "a release needs at least one instance",
            ));
        }
        if amount > held {
            return Err(RagError::invalid_count(
                amount,
                format!("'{process}' only holds {held} of '{resource}'"),
            ));
        }

        self.shrink_edge(edge_id, amount);
        self.give_back(r, amount);
        let promoted = self.promote(r);
        let available = self.counts(r).map_or(0, |(_, a)| a);

        #[cfg(feature = "tracing")]
        tracing::debug!(process, resource, amount, available, "alloc_release");
        Ok(ReleaseOutcome {
            released: amount,
            available,
            promoted,
        })
    }

    /// Withdraws a pending request. Returns the number of instances that had
    /// been requested. Availability is unaffected.
    ///
    /// # Errors
    ///
    /// [`RagError::NotFound`] if either name is missing or there is no
    /// pending request from `process` on `resource`.
    pub fn cancel_request(&mut self, process: &str, resource: &str) -> Result<u32, RagError> {
        let p = self.process_id(process)?;
        let r = self.resource_id(resource)?;
        let edge_id = self
            .find_edge(p, r, EdgeKind::Request)
            .ok_or_else(|| RagError::NotFound {
                kind: "request",
                name: format!("{process} -> {resource}"),
            })?;
        let instances = self.disconnect_internal(edge_id).map_or(0, |e| e.instances);

        #[cfg(feature = "tracing")]
        tracing::debug!(process, resource, instances, "alloc_cancel");
        Ok(instances)
    }

    /// Converts the smallest satisfiable pending request on `resource` into
    /// an allocation.
    fn promote(&mut self, resource: NodeId) -> Option<Promotion> {
        let (_, available) = self.counts(resource)?;
        let node = self.node_data(resource)?;

        // (amount, process, edge): sorting gives smallest-first, then oldest process.
        let mut pending: Vec<(u32, NodeId, EdgeId)> = node
            .incoming
            .iter()
            .filter_map(|&id| {
                let edge = self.edge_data(id)?;
                (edge.kind == EdgeKind::Request).then_some((edge.instances, edge.from, id))
            })
            .collect();
        pending.sort_unstable();

        let (amount, process, edge_id) = pending
            .into_iter()
            .find(|&(amount, _, _)| amount <= available)?;

        self.disconnect_internal(edge_id);
        self.set_available(resource, available - amount);
        self.grow_edge(EdgeKind::Allocation, resource, process, amount);

        let promotion = Promotion {
            process: self.name_of(process)?.to_string(),
            resource: self.name_of(resource)?.to_string(),
            instances: amount,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            process = %promotion.process,
            resource = %promotion.resource,
            amount,
            "alloc_promote"
        );
        Some(promotion)
    }
}
