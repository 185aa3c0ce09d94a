// Chain data collaborator
// Supplies raw facts (supply, holders, authorities, activity) to the collectors

pub mod errors;
pub mod traits;
pub mod rpc_client;
pub mod snapshot;

pub use errors::*;
pub use traits::*;
pub use rpc_client::RpcChainClient;
pub use snapshot::ChainSnapshot;
