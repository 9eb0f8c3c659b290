//! Common test utilities shared across integration tests.
#![allow(dead_code)]

use num_bigint::BigUint;
use pedersen_auth::server::{InMemoryRegistry, Server, ServerConfig};
use pedersen_auth::GroupParameters;
use rand::{CryptoRng, RngCore};

/// Initialize test tracing (call once at the beginning of tests).
///
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("pedersen_auth=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// The toy group `p = 23, q = 11, g = 4, h = 9`.
pub fn small_params() -> GroupParameters {
    GroupParameters::new(
        BigUint::from(23u32),
        BigUint::from(11u32),
        BigUint::from(4u32),
        BigUint::from(9u32),
    )
    .expect("toy group is valid")
}

/// Deterministic "randomness": every byte requested is the same value.
///
/// With `q = 11` the sampler keeps the low nibble, so `FixedRng(7)` always
/// draws 7.
pub struct FixedRng(pub u8);

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes([self.0; 4])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes([self.0; 8])
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for FixedRng {}

/// An entropy source that always fails.
pub struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        unimplemented!("FailingRng only supports try_fill_bytes")
    }

    fn next_u64(&mut self) -> u64 {
        unimplemented!("FailingRng only supports try_fill_bytes")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        unimplemented!("FailingRng only supports try_fill_bytes")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "entropy source unavailable",
        )))
    }
}

impl CryptoRng for FailingRng {}

/// Starts a server on an ephemeral port and returns its address.
pub async fn start_test_server(
    params: GroupParameters,
) -> (String, InMemoryRegistry, tokio::task::JoinHandle<()>) {
    let registry = InMemoryRegistry::new();
    let server = Server::new(ServerConfig {
        port: 0,
        ..ServerConfig::default()
    })
    .with_params(params)
    .with_registry(std::sync::Arc::new(registry.clone()));

    let listener = server.bind().await.expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address").to_string();

    let handle = tokio::spawn(async move {
        server.serve(listener).await.expect("server loop");
    });

    (addr, registry, handle)
}

/// Frames `payload` the way the wire protocol does.
pub fn framed(payload: &[u8]) -> Vec<u8> {
    let mut out = (payload.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(payload);
    out
}
