//! Bot ownership and the FIFO claim protocol.
//!
//! Bot creation is asynchronous: the orchestrator asks the host for `n`
//! bots and the host acknowledges each one later with a connect event. The
//! allocator matches those acknowledgements back to the session that asked,
//! oldest request first.

use crate::host::{EntityId, PlayerId};
use std::collections::{HashMap, VecDeque};

/// Pending bot creations for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotRequest {
    pub owner: PlayerId,
    pub remaining: usize,
}

/// Result of presenting a freshly created bot to the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The bot now belongs to this session.
    Assigned(PlayerId),
    /// No request was pending; the bot must be destroyed.
    Orphan,
}

/// Owns the bot→owner map and the ordered request queue.
#[derive(Debug, Default)]
pub struct BotAllocator {
    requests: VecDeque<BotRequest>,
    owner_of: HashMap<EntityId, PlayerId>,
}

impl BotAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `owner` wants `n` bots. An existing request for the same
    /// session is replaced (not summed); its queue position is kept.
    pub fn request_bots(&mut self, owner: PlayerId, n: usize) {
        if n == 0 {
            return;
        }
        if let Some(request) = self.requests.iter_mut().find(|r| r.owner == owner) {
            request.remaining = n;
        } else {
            self.requests.push_back(BotRequest { owner, remaining: n });
        }
    }

    /// Claim a freshly created bot against the oldest pending request.
    ///
    /// The oldest entry is served until fully satisfied before the next one
    /// gets anything; there is no round-robin across sessions.
    pub fn claim_on_create(&mut self, bot: EntityId) -> ClaimOutcome {
        let Some(front) = self.requests.front_mut() else {
            return ClaimOutcome::Orphan;
        };

        let owner = front.owner;
        front.remaining -= 1;
        if front.remaining == 0 {
            self.requests.pop_front();
        }

        self.owner_of.insert(bot, owner);
        ClaimOutcome::Assigned(owner)
    }

    /// Forget a bot; returns its former owner, if it was managed.
    pub fn release(&mut self, bot: EntityId) -> Option<PlayerId> {
        self.owner_of.remove(&bot)
    }

    /// Drop any outstanding request for a session. Called on force-end so a
    /// later creation cannot attach to a session that no longer exists.
    pub fn purge_request(&mut self, owner: PlayerId) {
        self.requests.retain(|r| r.owner != owner);
    }

    pub fn owner_of(&self, bot: EntityId) -> Option<PlayerId> {
        self.owner_of.get(&bot).copied()
    }

    pub fn is_managed(&self, bot: EntityId) -> bool {
        self.owner_of.contains_key(&bot)
    }

    pub fn has_pending_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
        self.owner_of.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_session_claims_all() {
        let mut allocator = BotAllocator::new();
        let owner = PlayerId(1);
        allocator.request_bots(owner, 3);

        for i in 0..3 {
            let bot = EntityId(10 + i);
            assert_eq!(allocator.claim_on_create(bot), ClaimOutcome::Assigned(owner));
            assert_eq!(allocator.owner_of(bot), Some(owner));
        }
        assert!(!allocator.has_pending_requests());
    }

    #[test]
    fn test_fifo_across_sessions() {
        let mut allocator = BotAllocator::new();
        let a = PlayerId(1);
        let b = PlayerId(2);
        allocator.request_bots(a, 3);
        allocator.request_bots(b, 2);

        let owners: Vec<_> = (0..5)
            .map(|i| match allocator.claim_on_create(EntityId(i)) {
                ClaimOutcome::Assigned(owner) => owner,
                ClaimOutcome::Orphan => panic!("unexpected orphan"),
            })
            .collect();

        // A is exhausted before B sees anything.
        assert_eq!(owners, vec![a, a, a, b, b]);
    }

    #[test]
    fn test_unrequested_bot_is_orphan() {
        let mut allocator = BotAllocator::new();
        assert_eq!(allocator.claim_on_create(EntityId(9)), ClaimOutcome::Orphan);
        assert!(!allocator.is_managed(EntityId(9)));
    }

    #[test]
    fn test_request_is_replaced_not_summed() {
        let mut allocator = BotAllocator::new();
        let owner = PlayerId(1);
        allocator.request_bots(owner, 4);
        allocator.request_bots(owner, 2);

        assert_eq!(allocator.claim_on_create(EntityId(1)), ClaimOutcome::Assigned(owner));
        assert_eq!(allocator.claim_on_create(EntityId(2)), ClaimOutcome::Assigned(owner));
        // The replaced request held 2, not 6.
        assert_eq!(allocator.claim_on_create(EntityId(3)), ClaimOutcome::Orphan);
    }

    #[test]
    fn test_purge_prevents_stale_claim() {
        let mut allocator = BotAllocator::new();
        let gone = PlayerId(1);
        let live = PlayerId(2);
        allocator.request_bots(gone, 2);
        allocator.request_bots(live, 1);

        allocator.purge_request(gone);
        assert_eq!(allocator.claim_on_create(EntityId(1)), ClaimOutcome::Assigned(live));
        assert_eq!(allocator.claim_on_create(EntityId(2)), ClaimOutcome::Orphan);
    }

    #[test]
    fn test_release_forgets_owner() {
        let mut allocator = BotAllocator::new();
        let owner = PlayerId(1);
        allocator.request_bots(owner, 1);
        allocator.claim_on_create(EntityId(5));

        assert_eq!(allocator.release(EntityId(5)), Some(owner));
        assert_eq!(allocator.release(EntityId(5)), None);
        assert!(!allocator.is_managed(EntityId(5)));
    }
}
