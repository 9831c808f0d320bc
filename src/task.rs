use crate::{
    config::{Config, DeviceBuffer},
    graph::GraphError,
    types::{DeviceId, NodeId},
};
use core::slice;
use derive_more::{Debug, Display};
use std::sync::OnceLock;

/// Work of a host task.
pub type HostWork = Box<dyn Fn() + Send + Sync>;
/// Work of a pull task: allocates device memory and copies host data into it.
pub type PullWork<C> = Box<
    dyn Fn(&<C as Config>::Allocator, &<C as Config>::Stream) -> <C as Config>::Buffer
        + Send
        + Sync,
>;
/// Work of a push, transfer or kernel task: enqueues operations on a stream.
pub type StreamWork<C> = Box<dyn Fn(&<C as Config>::Stream) + Send + Sync>;

/// Discriminant of a [`Task`].
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TaskKind {
    #[display("host")]
    Host,
    #[display("pull")]
    Pull,
    #[display("push")]
    Push,
    #[display("kernel")]
    Kernel,
    #[display("transfer")]
    Transfer,
}

impl TaskKind {
    /// Whether tasks of this kind run on a GPU device.
    #[must_use]
    pub const fn is_device(self) -> bool {
        !matches!(self, Self::Host)
    }
}

/// Kind-specific work carried by a node. Exactly one variant is active.
#[derive(Debug)]
pub enum Task<C: Config> {
    Host(Host),
    Pull(Pull<C>),
    Push(Push<C>),
    Kernel(Kernel<C>),
    Transfer(Transfer<C>),
}

impl<C: Config> Task<C> {
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Host(_) => TaskKind::Host,
            Self::Pull(_) => TaskKind::Pull,
            Self::Push(_) => TaskKind::Push,
            Self::Kernel(_) => TaskKind::Kernel,
            Self::Transfer(_) => TaskKind::Transfer,
        }
    }

    /// Nodes this task reads device buffers from, in declaration order.
    ///
    /// These are lookup relations into the same graph, never ownership.
    #[must_use]
    pub fn references(&self) -> &[NodeId] {
        match self {
            Self::Host(_) | Self::Pull(_) => &[],
            Self::Push(push) => slice::from_ref(&push.source),
            Self::Kernel(kernel) => &kernel.sources,
            Self::Transfer(transfer) => &transfer.endpoints,
        }
    }

    /// Typed view of the active variant.
    ///
    /// # Errors
    /// `GraphError::TypeMismatch` if `T` is not the active variant.
    pub fn payload<T: Payload<C>>(&self) -> Result<&T, GraphError> {
        let found = self.kind();
        T::from_task(self).ok_or(GraphError::TypeMismatch {
            expected: <T as Payload<C>>::KIND,
            found,
        })
    }

    /// Mutable typed view of the active variant.
    ///
    /// # Errors
    /// `GraphError::TypeMismatch` if `T` is not the active variant.
    pub fn payload_mut<T: Payload<C>>(&mut self) -> Result<&mut T, GraphError> {
        let found = self.kind();
        T::from_task_mut(self).ok_or(GraphError::TypeMismatch {
            expected: <T as Payload<C>>::KIND,
            found,
        })
    }
}

/// A variant of [`Task`] that can be viewed through [`Task::payload`].
pub trait Payload<C: Config>: Sized {
    /// Kind of task this payload belongs to.
    const KIND: TaskKind;
    fn from_task(task: &Task<C>) -> Option<&Self>;
    fn from_task_mut(task: &mut Task<C>) -> Option<&mut Self>;
}

/// Runs a callable on a CPU worker.
#[derive(Debug)]
pub struct Host {
    #[debug(skip)]
    work: HostWork,
}

impl Host {
    pub fn new(work: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            work: Box::new(work),
        }
    }

    pub fn run(&self) {
        (self.work)();
    }
}

/// Allocates a device buffer and fills it from host memory.
#[derive(Debug)]
pub struct Pull<C: Config> {
    #[debug(skip)]
    work: PullWork<C>,
    device: Option<DeviceId>,
    /// Written once, by the first `run`.
    buffer: OnceLock<C::Buffer>,
}

impl<C: Config> Pull<C> {
    pub fn new(
        work: impl Fn(&C::Allocator, &C::Stream) -> C::Buffer + Send + Sync + 'static,
    ) -> Self {
        Self {
            work: Box::new(work),
            device: None,
            buffer: OnceLock::new(),
        }
    }

    /// Pin the pull to a target device.
    #[must_use]
    pub fn on(mut self, device: DeviceId) -> Self {
        self.device = Some(device);
        self
    }

    #[must_use]
    pub const fn device(&self) -> Option<DeviceId> {
        self.device
    }

    /// Execute the work and keep the produced buffer.
    ///
    /// The work runs at most once; later calls return the stored buffer.
    pub fn run(&self, allocator: &C::Allocator, stream: &C::Stream) -> &C::Buffer {
        self.buffer.get_or_init(|| (self.work)(allocator, stream))
    }

    /// The device buffer, or `None` before the pull has executed.
    #[must_use]
    pub fn buffer(&self) -> Option<&C::Buffer> {
        self.buffer.get()
    }

    /// Size of the device buffer in bytes, `0` before execution.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buffer.get().map_or(0, DeviceBuffer::size)
    }

    /// Release ownership of the device buffer, e.g. at teardown.
    pub fn take_buffer(&mut self) -> Option<C::Buffer> {
        self.buffer.take()
    }
}

/// Copies a pulled device buffer back to host memory.
#[derive(Debug)]
pub struct Push<C: Config> {
    #[debug(skip)]
    work: StreamWork<C>,
    source: NodeId,
}

impl<C: Config> Push<C> {
    pub fn new(source: NodeId, work: impl Fn(&C::Stream) + Send + Sync + 'static) -> Self {
        Self {
            work: Box::new(work),
            source,
        }
    }

    /// The pull node whose buffer is pushed.
    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }

    pub fn run(&self, stream: &C::Stream) {
        (self.work)(stream);
    }
}

/// Peer-to-peer copy between the buffers of two pull nodes.
#[derive(Debug)]
pub struct Transfer<C: Config> {
    #[debug(skip)]
    work: StreamWork<C>,
    /// `[source, target]`.
    endpoints: [NodeId; 2],
}

impl<C: Config> Transfer<C> {
    pub fn new(
        source: NodeId,
        target: NodeId,
        work: impl Fn(&C::Stream) + Send + Sync + 'static,
    ) -> Self {
        Self {
            work: Box::new(work),
            endpoints: [source, target],
        }
    }

    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.endpoints[0]
    }

    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.endpoints[1]
    }

    pub fn run(&self, stream: &C::Stream) {
        (self.work)(stream);
    }
}

/// Launches a device kernel over the buffers of its source pulls.
#[derive(Debug)]
pub struct Kernel<C: Config> {
    #[debug(skip)]
    work: StreamWork<C>,
    device: Option<DeviceId>,
    sources: Vec<NodeId>,
}

impl<C: Config> Kernel<C> {
    pub fn new(
        sources: impl IntoIterator<Item = NodeId>,
        work: impl Fn(&C::Stream) + Send + Sync + 'static,
    ) -> Self {
        Self {
            work: Box::new(work),
            device: None,
            sources: sources.into_iter().collect(),
        }
    }

    /// Pin the kernel to a target device.
    #[must_use]
    pub fn on(mut self, device: DeviceId) -> Self {
        self.device = Some(device);
        self
    }

    #[must_use]
    pub const fn device(&self) -> Option<DeviceId> {
        self.device
    }

    /// Kernel inputs, in argument order.
    #[must_use]
    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    pub fn run(&self, stream: &C::Stream) {
        (self.work)(stream);
    }
}

impl<C: Config> Payload<C> for Host {
    const KIND: TaskKind = TaskKind::Host;

    fn from_task(task: &Task<C>) -> Option<&Self> {
        match task {
            Task::Host(host) => Some(host),
            _ => None,
        }
    }

    fn from_task_mut(task: &mut Task<C>) -> Option<&mut Self> {
        match task {
            Task::Host(host) => Some(host),
            _ => None,
        }
    }
}

impl<C: Config> Payload<C> for Pull<C> {
    const KIND: TaskKind = TaskKind::Pull;

    fn from_task(task: &Task<C>) -> Option<&Self> {
        match task {
            Task::Pull(pull) => Some(pull),
            _ => None,
        }
    }

    fn from_task_mut(task: &mut Task<C>) -> Option<&mut Self> {
        match task {
            Task::Pull(pull) => Some(pull),
            _ => None,
        }
    }
}

impl<C: Config> Payload<C> for Push<C> {
    const KIND: TaskKind = TaskKind::Push;

    fn from_task(task: &Task<C>) -> Option<&Self> {
        match task {
            Task::Push(push) => Some(push),
            _ => None,
        }
    }

    fn from_task_mut(task: &mut Task<C>) -> Option<&mut Self> {
        match task {
            Task::Push(push) => Some(push),
            _ => None,
        }
    }
}

impl<C: Config> Payload<C> for Kernel<C> {
    const KIND: TaskKind = TaskKind::Kernel;

    fn from_task(task: &Task<C>) -> Option<&Self> {
        match task {
            Task::Kernel(kernel) => Some(kernel),
            _ => None,
        }
    }

    fn from_task_mut(task: &mut Task<C>) -> Option<&mut Self> {
        match task {
            Task::Kernel(kernel) => Some(kernel),
            _ => None,
        }
    }
}

impl<C: Config> Payload<C> for Transfer<C> {
    const KIND: TaskKind = TaskKind::Transfer;

    fn from_task(task: &Task<C>) -> Option<&Self> {
        match task {
            Task::Transfer(transfer) => Some(transfer),
            _ => None,
        }
    }

    fn from_task_mut(task: &mut Task<C>) -> Option<&mut Self> {
        match task {
            Task::Transfer(transfer) => Some(transfer),
            _ => None,
        }
    }
}

impl<C: Config> From<Host> for Task<C> {
    fn from(host: Host) -> Self {
        Self::Host(host)
    }
}

impl<C: Config> From<Pull<C>> for Task<C> {
    fn from(pull: Pull<C>) -> Self {
        Self::Pull(pull)
    }
}

impl<C: Config> From<Push<C>> for Task<C> {
    fn from(push: Push<C>) -> Self {
        Self::Push(push)
    }
}

impl<C: Config> From<Kernel<C>> for Task<C> {
    fn from(kernel: Kernel<C>) -> Self {
        Self::Kernel(kernel)
    }
}

impl<C: Config> From<Transfer<C>> for Task<C> {
    fn from(transfer: Transfer<C>) -> Self {
        Self::Transfer(transfer)
    }
}
