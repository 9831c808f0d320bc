use core::fmt::Debug;

/// Configuration entry-point for instantiating a graph.
///
/// A concrete `Config` binds the collaborator types that device work
/// callables receive: the memory allocator handed to pulls, the device
/// stream handed to every device task, and the buffer a pull produces.
/// The graph never allocates or synchronizes streams itself; it only stores
/// and forwards these values.
pub trait Config: Sized + 'static {
    /// Device memory allocator supplied to pull work.
    type Allocator;
    /// Device stream supplied to pull, push, transfer and kernel work.
    type Stream;
    /// Device buffer produced by executing a pull.
    type Buffer: DeviceBuffer;
}

/// Device memory owned by a pull node after it has executed.
pub trait DeviceBuffer: Debug + Send + Sync {
    /// Size of the buffer in bytes.
    fn size(&self) -> usize;
}
