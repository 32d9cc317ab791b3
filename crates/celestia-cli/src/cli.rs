use std::time::Duration;

use celestia_client::{Fee, NamespaceId};
use clap::{Parser, Subcommand};

/// Query and submit blobs to a data-availability node over JSON-RPC.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node RPC URL.
    #[arg(long, default_value = "http://127.0.0.1:26658", env = "CELESTIA_RPC_URL")]
    pub rpc_url: String,

    /// Bearer token for the node's RPC. Without it the client connects
    /// unauthenticated, which only allows public methods.
    #[arg(long, env = "CELESTIA_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the latest header known to the node.
    Head,

    /// Print the headers at one or more heights.
    Header {
        #[arg(required = true)]
        heights: Vec<u64>,
    },

    /// Print the shares of a namespace in the block at `height`.
    Shares {
        height: u64,
        /// Namespace id in hex.
        namespace: NamespaceId,
    },

    /// Pay for a blob and print the transaction receipt.
    Submit {
        /// Namespace id in hex.
        namespace: NamespaceId,
        /// Blob contents, taken as UTF-8 text unless `--hex` is given.
        data: String,
        /// Treat `data` as hex-encoded bytes.
        #[arg(long)]
        hex: bool,
        /// Fee in the chain's base denomination.
        #[arg(long, default_value = "2000")]
        fee: Fee,
        #[arg(long, default_value = "80000")]
        gas_limit: u64,
    },
}
