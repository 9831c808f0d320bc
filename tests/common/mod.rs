#![allow(dead_code)]

use hfg::{
    config::{Config, DeviceBuffer},
    graph::Graph,
    task::{Host, Kernel, Pull, Push, Transfer},
    types::{DeviceId, NodeId},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Buffer(pub Vec<u8>);

impl DeviceBuffer for Buffer {
    fn size(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug)]
pub struct TestConfig;

impl Config for TestConfig {
    type Allocator = ();
    type Stream = ();
    type Buffer = Buffer;
}

pub type TestGraph = Graph<TestConfig>;

pub fn host() -> Host {
    Host::new(|| {})
}

pub fn pull(device: u16) -> Pull<TestConfig> {
    Pull::<TestConfig>::new(|_, _| Buffer(vec![0; 16])).on(DeviceId(device))
}

pub fn push(source: NodeId) -> Push<TestConfig> {
    Push::<TestConfig>::new(source, |_| {})
}

pub fn transfer(source: NodeId, target: NodeId) -> Transfer<TestConfig> {
    Transfer::<TestConfig>::new(source, target, |_| {})
}

pub fn kernel(device: u16, sources: &[NodeId]) -> Kernel<TestConfig> {
    Kernel::<TestConfig>::new(sources.iter().copied(), |_| {}).on(DeviceId(device))
}
