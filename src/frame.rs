/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

/// Single-slot "run me on the next frame" request, the way a browser's
/// animation-frame callback works. A tick that wants to keep going asks for
/// the next frame; anything that stops the loop cancels the pending request,
/// and a cancelled request can never fire.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<FrameHandle>,
    next_id: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next frame, replacing any request already queued.
    pub fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    /// Drop the pending request, if any.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Claim the pending request so it runs exactly once.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}
