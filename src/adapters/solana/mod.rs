pub mod pool;
pub mod rpc;
pub mod wallet;

pub use pool::{check_health, resolve_endpoints, HealthReport, RpcPool, DEFAULT_RPC_URL};
pub use rpc::{SolanaClient, SolanaClientError};
pub use wallet::WalletManager;
