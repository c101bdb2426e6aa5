//! Session lifecycle and scheduled tasks
//!
//! Two tasks drive a running session: a periodic spawn timer and a
//! self-rescheduling frame callback. The [`Scheduler`] owns both handles and
//! cancels them together on stop. The platform side implements [`TaskHost`].

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Stopped,
    Running,
    /// Frames keep rendering; physics and spawning are suspended
    Paused,
}

impl Mode {
    /// Running or paused: frames are being scheduled
    pub fn is_active(&self) -> bool {
        !matches!(self, Mode::Stopped)
    }
}

/// Opaque handle to a scheduled platform task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub i32);

/// Platform timer services
pub trait TaskHost {
    /// Start a repeating spawn timer
    fn start_spawn_timer(&mut self, interval_ms: u32) -> TaskHandle;
    /// Ask for one frame callback at the display refresh cadence
    fn request_frame(&mut self) -> TaskHandle;
    /// Cancel a timer or pending frame. Unknown handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);
}

/// Lifecycle state machine plus the two task handles
#[derive(Debug, Default)]
pub struct Scheduler {
    mode: Mode,
    spawn_task: Option<TaskHandle>,
    frame_task: Option<TaskHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn spawn_task(&self) -> Option<TaskHandle> {
        self.spawn_task
    }

    pub fn frame_task(&self) -> Option<TaskHandle> {
        self.frame_task
    }

    /// Stopped -> Running. Arms both tasks. Returns false if already active.
    pub fn start(&mut self, host: &mut dyn TaskHost, spawn_interval_ms: u32) -> bool {
        if self.mode.is_active() {
            return false;
        }
        self.mode = Mode::Running;
        self.spawn_task = Some(host.start_spawn_timer(spawn_interval_ms));
        self.frame_task = Some(host.request_frame());
        log::info!("Session started (spawn every {} ms)", spawn_interval_ms);
        true
    }

    /// Running <-> Paused. The spawn timer is cancelled on pause and re-armed
    /// with the interval current at resume. Returns the new mode, or `None`
    /// when stopped.
    pub fn toggle_pause(&mut self, host: &mut dyn TaskHost, spawn_interval_ms: u32) -> Option<Mode> {
        match self.mode {
            Mode::Stopped => None,
            Mode::Running => {
                if let Some(task) = self.spawn_task.take() {
                    host.cancel(task);
                }
                self.mode = Mode::Paused;
                log::info!("Paused");
                Some(Mode::Paused)
            }
            Mode::Paused => {
                self.spawn_task = Some(host.start_spawn_timer(spawn_interval_ms));
                self.mode = Mode::Running;
                log::info!("Resumed (spawn every {} ms)", spawn_interval_ms);
                Some(Mode::Running)
            }
        }
    }

    /// Any mode -> Stopped, cancelling both tasks
    pub fn stop(&mut self, host: &mut dyn TaskHost) {
        if let Some(task) = self.spawn_task.take() {
            host.cancel(task);
        }
        if let Some(task) = self.frame_task.take() {
            host.cancel(task);
        }
        if self.mode.is_active() {
            log::info!("Session stopped");
        }
        self.mode = Mode::Stopped;
    }

    /// The pending frame callback has fired. Returns false for a stale
    /// callback that arrived after stop.
    pub fn frame_fired(&mut self) -> bool {
        self.frame_task = None;
        self.mode.is_active()
    }

    /// Request the next frame while the session is active
    pub fn schedule_next_frame(&mut self, host: &mut dyn TaskHost) {
        if self.mode.is_active() && self.frame_task.is_none() {
            self.frame_task = Some(host.request_frame());
        }
    }

    /// Whether a spawn timer callback should act
    pub fn accepts_spawn(&self) -> bool {
        self.mode == Mode::Running
    }
}

/// Kind of task tracked by [`ManualTaskHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Spawn { interval_ms: u32 },
    Frame,
}

/// Task host that only records what was scheduled.
///
/// Used for headless runs and tests: the caller decides when a "timer" fires
/// by calling the game's callbacks directly.
#[derive(Debug, Default)]
pub struct ManualTaskHost {
    next: i32,
    pending: Vec<(TaskHandle, TaskKind)>,
    cancelled: Vec<TaskHandle>,
}

impl ManualTaskHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: TaskKind) -> TaskHandle {
        self.next += 1;
        let handle = TaskHandle(self.next);
        self.pending.push((handle, kind));
        handle
    }

    /// Tasks that are scheduled and not cancelled
    pub fn pending(&self) -> &[(TaskHandle, TaskKind)] {
        &self.pending
    }

    pub fn cancelled(&self) -> &[TaskHandle] {
        &self.cancelled
    }

    /// The live spawn timer, if any
    pub fn spawn_timer(&self) -> Option<(TaskHandle, u32)> {
        self.pending.iter().find_map(|&(h, kind)| match kind {
            TaskKind::Spawn { interval_ms } => Some((h, interval_ms)),
            TaskKind::Frame => None,
        })
    }

    pub fn frame_pending(&self) -> bool {
        self.pending.iter().any(|(_, kind)| *kind == TaskKind::Frame)
    }

    /// Consume the pending frame request, as the platform does when the
    /// callback runs. Returns false if none was pending.
    pub fn take_frame(&mut self) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(_, kind)| *kind != TaskKind::Frame);
        self.pending.len() != before
    }
}

impl TaskHost for ManualTaskHost {
    fn start_spawn_timer(&mut self, interval_ms: u32) -> TaskHandle {
        self.push(TaskKind::Spawn { interval_ms })
    }

    fn request_frame(&mut self) -> TaskHandle {
        self.push(TaskKind::Frame)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        if self.pending.len() != before {
            self.cancelled.push(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_arms_both_tasks() {
        let mut host = ManualTaskHost::new();
        let mut sched = Scheduler::new();
        assert_eq!(sched.mode(), Mode::Stopped);

        assert!(sched.start(&mut host, 1500));
        assert_eq!(sched.mode(), Mode::Running);
        assert_eq!(host.spawn_timer().map(|(_, ms)| ms), Some(1500));
        assert!(host.frame_pending());

        // Second start is a no-op
        assert!(!sched.start(&mut host, 1500));
        assert_eq!(host.pending().len(), 2);
    }

    #[test]
    fn test_pause_is_noop_when_stopped() {
        let mut host = ManualTaskHost::new();
        let mut sched = Scheduler::new();
        assert_eq!(sched.toggle_pause(&mut host, 1500), None);
        assert_eq!(sched.mode(), Mode::Stopped);
        assert!(host.pending().is_empty());
    }

    #[test]
    fn test_pause_cancels_spawn_and_resume_uses_new_interval() {
        let mut host = ManualTaskHost::new();
        let mut sched = Scheduler::new();
        sched.start(&mut host, 1500);
        let (first, _) = host.spawn_timer().unwrap();

        assert_eq!(sched.toggle_pause(&mut host, 1500), Some(Mode::Paused));
        assert!(host.spawn_timer().is_none());
        assert_eq!(host.cancelled(), &[first]);
        // Frame loop keeps going while paused
        assert!(host.frame_pending());
        assert!(!sched.accepts_spawn());

        assert_eq!(sched.toggle_pause(&mut host, 800), Some(Mode::Running));
        assert_eq!(host.spawn_timer().map(|(_, ms)| ms), Some(800));
        assert!(sched.accepts_spawn());
    }

    #[test]
    fn test_stop_cancels_everything() {
        let mut host = ManualTaskHost::new();
        let mut sched = Scheduler::new();
        sched.start(&mut host, 1000);
        sched.toggle_pause(&mut host, 1000);
        sched.stop(&mut host);
        assert_eq!(sched.mode(), Mode::Stopped);
        assert!(host.pending().is_empty());
        assert!(sched.spawn_task().is_none());
        assert!(sched.frame_task().is_none());
    }

    #[test]
    fn test_stale_frame_after_stop() {
        let mut host = ManualTaskHost::new();
        let mut sched = Scheduler::new();
        sched.start(&mut host, 1000);
        sched.stop(&mut host);
        assert!(!sched.frame_fired());
        sched.schedule_next_frame(&mut host);
        assert!(!host.frame_pending());
    }

    #[test]
    fn test_frame_reschedules_while_active() {
        let mut host = ManualTaskHost::new();
        let mut sched = Scheduler::new();
        sched.start(&mut host, 1000);
        assert!(host.take_frame());
        assert!(sched.frame_fired());
        sched.schedule_next_frame(&mut host);
        assert!(host.frame_pending());
        assert!(sched.frame_task().is_some());
    }
}
